use std::time::{Duration, Instant};

use taskdeck_core::GateSettings;

use crate::context::SessionContext;

/// What a protected route should do right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session still resolving; show a placeholder.
    Loading,
    /// Send the user to sign-in, remembering where they were headed.
    Redirect { from: String },
    /// Session resolved to an identity; render the route.
    Render,
}

/// Gate for routes that require a signed-in user.
///
/// While the session is resolving, the gate waits up to a bounded timeout
/// before giving up and redirecting. The wait is bounded so a hung bootstrap
/// can never leave the user on a spinner forever.
#[derive(Debug)]
pub struct RouteGate {
    started: Instant,
    timeout: Duration,
}

impl RouteGate {
    pub fn new(settings: &GateSettings) -> Self {
        Self {
            started: Instant::now(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// Restart the bounded wait, e.g. when navigation re-enters a protected
    /// route.
    pub fn reset(&mut self) {
        self.started = Instant::now();
    }

    pub fn decide(&self, session: &SessionContext, requested: &str) -> GateDecision {
        decide_at(
            self.started.elapsed(),
            self.timeout,
            session.identity().is_some(),
            session.is_loading(),
            requested,
        )
    }
}

/// The gate rule, pure in its inputs. An identity always renders; a resolving
/// session gets the benefit of the doubt until `timeout`; everything else
/// redirects, carrying the requested route for the post-sign-in return.
pub fn decide_at(
    elapsed: Duration,
    timeout: Duration,
    authenticated: bool,
    loading: bool,
    requested: &str,
) -> GateDecision {
    if authenticated {
        GateDecision::Render
    } else if loading && elapsed < timeout {
        GateDecision::Loading
    } else {
        GateDecision::Redirect {
            from: requested.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn authenticated_sessions_render() {
        assert_eq!(
            decide_at(Duration::ZERO, TIMEOUT, true, false, "/"),
            GateDecision::Render
        );
        // An identity wins even while another operation is in flight.
        assert_eq!(
            decide_at(Duration::from_secs(9), TIMEOUT, true, true, "/"),
            GateDecision::Render
        );
    }

    #[test]
    fn resolving_sessions_wait_until_the_timeout() {
        assert_eq!(
            decide_at(Duration::from_secs(4), TIMEOUT, false, true, "/"),
            GateDecision::Loading
        );
        assert_eq!(
            decide_at(Duration::from_secs(5), TIMEOUT, false, true, "/"),
            GateDecision::Redirect {
                from: "/".to_string()
            }
        );
    }

    #[test]
    fn anonymous_sessions_redirect_immediately_with_the_return_path() {
        assert_eq!(
            decide_at(Duration::ZERO, TIMEOUT, false, false, "/"),
            GateDecision::Redirect {
                from: "/".to_string()
            }
        );
    }
}
