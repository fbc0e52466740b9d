mod app;
mod async_ops;
mod board;
mod config;
mod theme;
mod ui;
mod views;

pub use config::config_dir;

use anyhow::Result;
use app::App;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::broadcast;

use taskdeck_api_client::AuthChange;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dev_panel: bool,
}

/// Launch the TUI.
pub fn run(options: RunOptions) -> Result<()> {
    let config_dir = config::config_dir().ok();
    let mut app_config = config::load_config();
    if options.dev_panel {
        app_config.dev_panel = true;
    }
    let mut app = App::new(app_config, config_dir);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result
}

/// Pull every report the broadcast channel holds right now. A lagged receiver
/// skips ahead; the sequence numbers make the missed reports safe to drop.
fn drain_auth_changes(app: &mut App, rx: &mut broadcast::Receiver<AuthChange>) {
    loop {
        match rx.try_recv() {
            Ok(change) => app.on_auth_change(change),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    // Subscribe before the bootstrap command can publish anything.
    let mut auth_rx = app.events.subscribe();
    app.maybe_bootstrap();

    loop {
        drain_auth_changes(app, &mut auth_rx);

        // Run queued backend work. Applying a result first means a sign-in
        // lands its token before the fetches that need it are popped.
        while let Some(cmd) = app.pending_commands.pop_front() {
            let result = rt.block_on(async_ops::execute(
                cmd,
                &app.config,
                app.config_dir.as_deref(),
                app.access_token.as_deref(),
                &app.events,
            ));
            app.apply_command_result(result);
            drain_auth_changes(app, &mut auth_rx);
        }

        app.tick_route();
        app.tick_voice();
        app.expire_flash();

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key.code) {
                    break;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::app::{App, Route};
    use taskdeck_api::Identity;
    use taskdeck_api_client::AuthChange;
    use taskdeck_core::AppConfig;

    #[test]
    fn anonymous_visitor_is_bounced_to_sign_in_then_returned() {
        let mut app = App::new(AppConfig::default(), None);
        app.on_auth_change(AuthChange {
            seq: 1,
            identity: None,
        });
        app.tick_route();
        assert_eq!(
            app.route,
            Route::Auth {
                return_to: "/".to_string()
            }
        );

        app.on_auth_change(AuthChange {
            seq: 2,
            identity: Some(Identity {
                id: "u-1".to_string(),
                email: "u@example.com".to_string(),
            }),
        });
        assert_eq!(app.route, Route::Dashboard);
    }

    #[test]
    fn unresolved_session_keeps_the_dashboard_route() {
        let mut app = App::new(AppConfig::default(), None);
        app.tick_route();
        assert_eq!(app.route, Route::Dashboard);
    }
}
