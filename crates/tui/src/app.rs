use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use crossterm::event::KeyCode;

use taskdeck_api_client::{AuthChange, AuthEvents};
use taskdeck_core::{
    Achievement, AppConfig, Priority, Profile, ProfilePatch, SignupProfile, Suggestion, Task,
    TaskDraft, TaskFilter, TaskPatch, TaskSort, canned_suggestions, canned_transcripts,
    validate_email, validate_name, validate_password, validate_title,
};
use taskdeck_session::{GateDecision, RouteGate, SessionContext};

use crate::async_ops::{AsyncCommand, CommandResult};
use crate::board::TaskBoard;
use crate::config::{self, SettingField};

/// Where the user is (or is being sent). The dashboard route is protected;
/// the auth route remembers where the user was headed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Auth { return_to: String },
}

/// Top-level tab navigation on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tasks,
    Assistant,
    Settings,
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

/// How long the simulated voice capture "listens" before producing a canned
/// transcript.
pub const VOICE_CAPTURE_DELAY: Duration = Duration::from_millis(1200);

/// Profile fields editable from the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Phone,
    Location,
    Bio,
}

impl ProfileField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Phone => "Phone",
            Self::Location => "Location",
            Self::Bio => "Bio",
        }
    }

    pub fn current(self, profile: &Profile) -> String {
        match self {
            Self::Name => profile.name.clone(),
            Self::Phone => profile.phone.clone().unwrap_or_default(),
            Self::Location => profile.location.clone().unwrap_or_default(),
            Self::Bio => profile.bio.clone().unwrap_or_default(),
        }
    }

    /// A patch carrying only this field.
    pub fn patch(self, value: String) -> ProfilePatch {
        let mut patch = ProfilePatch::default();
        match self {
            Self::Name => patch.name = Some(value),
            Self::Phone => patch.phone = Some(value),
            Self::Location => patch.location = Some(value),
            Self::Bio => patch.bio = Some(value),
        }
        patch
    }
}

// ── Auth form ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
    Phone,
    Location,
    Bio,
    Submit,
    ToggleMode,
    Forgot,
}

#[derive(Debug)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub focus: usize,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub location: String,
    pub bio: String,
    pub error: Option<String>,
    pub info: Option<String>,
    pub busy: bool,
}

impl AuthForm {
    pub fn new() -> Self {
        Self {
            mode: AuthMode::SignIn,
            focus: 0,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            phone: String::new(),
            location: String::new(),
            bio: String::new(),
            error: None,
            info: None,
            busy: false,
        }
    }

    /// Fields shown for the current mode, in focus order. Phone, location and
    /// bio are optional sign-up fields.
    pub fn fields(&self) -> Vec<AuthField> {
        match self.mode {
            AuthMode::SignIn => vec![
                AuthField::Email,
                AuthField::Password,
                AuthField::Submit,
                AuthField::ToggleMode,
                AuthField::Forgot,
            ],
            AuthMode::SignUp => vec![
                AuthField::Name,
                AuthField::Email,
                AuthField::Password,
                AuthField::Phone,
                AuthField::Location,
                AuthField::Bio,
                AuthField::Submit,
                AuthField::ToggleMode,
            ],
        }
    }

    /// Mutable access to the text buffer behind a field, when it has one.
    fn buffer_mut(&mut self, field: AuthField) -> Option<&mut String> {
        match field {
            AuthField::Name => Some(&mut self.name),
            AuthField::Email => Some(&mut self.email),
            AuthField::Password => Some(&mut self.password),
            AuthField::Phone => Some(&mut self.phone),
            AuthField::Location => Some(&mut self.location),
            AuthField::Bio => Some(&mut self.bio),
            AuthField::Submit | AuthField::ToggleMode | AuthField::Forgot => None,
        }
    }

    pub fn focused(&self) -> AuthField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        self.focus = 0;
        self.error = None;
        self.info = None;
    }

    fn validate(&self) -> Result<(), String> {
        if self.mode == AuthMode::SignUp {
            validate_name(&self.name).map_err(|e| e.to_string())?;
        }
        validate_email(&self.email).map_err(|e| e.to_string())?;
        validate_password(&self.password).map_err(|e| e.to_string())?;
        Ok(())
    }
}

impl Default for AuthForm {
    fn default() -> Self {
        Self::new()
    }
}

// ── Task form ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFormField {
    Title,
    Description,
    DueDate,
    Priority,
    Submit,
}

impl TaskFormField {
    const ORDER: [Self; 5] = [
        Self::Title,
        Self::Description,
        Self::DueDate,
        Self::Priority,
        Self::Submit,
    ];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Modal form for creating or editing a task. Stays open with its input
/// preserved until the backend confirms the write.
#[derive(Debug)]
pub struct TaskForm {
    pub editing_id: Option<String>,
    pub focus: TaskFormField,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
    pub error: Option<String>,
    pub busy: bool,
}

impl TaskForm {
    pub fn blank() -> Self {
        let tomorrow = (Utc::now() + ChronoDuration::days(1)).date_naive();
        Self {
            editing_id: None,
            focus: TaskFormField::Title,
            title: String::new(),
            description: String::new(),
            due_date: tomorrow.format("%Y-%m-%d").to_string(),
            priority: Priority::Medium,
            error: None,
            busy: false,
        }
    }

    pub fn for_task(task: &Task) -> Self {
        Self {
            editing_id: Some(task.id.clone()),
            focus: TaskFormField::Title,
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.date_naive().format("%Y-%m-%d").to_string(),
            priority: task.priority,
            error: None,
            busy: false,
        }
    }

    pub fn prefilled(title: &str, description: &str, priority: Priority) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            priority,
            ..Self::blank()
        }
    }

    fn parse_due_date(&self) -> Result<chrono::DateTime<Utc>, String> {
        let date = NaiveDate::parse_from_str(self.due_date.trim(), "%Y-%m-%d")
            .map_err(|_| "Due date must be YYYY-MM-DD".to_string())?;
        Ok(date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc())
    }
}

// ── App ─────────────────────────────────────────────────────────────────

pub struct App {
    pub config: AppConfig,
    pub config_dir: Option<PathBuf>,
    pub config_dirty: bool,

    pub events: AuthEvents,
    pub session: SessionContext,
    pub gate: RouteGate,
    pub route: Route,
    pub access_token: Option<String>,

    pub tab: Tab,
    pub board: TaskBoard,
    pub filter: TaskFilter,
    pub sort: TaskSort,
    pub selected: usize,
    pub confirm_delete: Option<String>,

    pub achievements: Vec<Achievement>,
    pub remote_suggestions: Vec<Suggestion>,
    pub assistant_index: usize,
    pub assistant_heard: Option<String>,
    pub voice_started: Option<Instant>,

    pub auth_form: AuthForm,
    pub task_form: Option<TaskForm>,

    pub settings_index: usize,
    pub editing: Option<SettingField>,
    pub editing_profile: Option<ProfileField>,
    pub edit_buffer: String,

    pub flash_message: Option<(String, FlashLevel)>,
    pub flash_set_at: Option<Instant>,

    pub pending_commands: VecDeque<AsyncCommand>,
    pub debug_log: VecDeque<String>,
}

impl App {
    pub fn new(config: AppConfig, config_dir: Option<PathBuf>) -> Self {
        let gate = RouteGate::new(&config.gate);
        Self {
            config,
            config_dir,
            config_dirty: false,
            events: AuthEvents::new(),
            session: SessionContext::new(),
            gate,
            route: Route::Dashboard,
            access_token: None,
            tab: Tab::Tasks,
            board: TaskBoard::new(),
            filter: TaskFilter::default(),
            sort: TaskSort::default(),
            selected: 0,
            confirm_delete: None,
            achievements: Vec::new(),
            remote_suggestions: Vec::new(),
            assistant_index: 0,
            assistant_heard: None,
            voice_started: None,
            auth_form: AuthForm::new(),
            task_form: None,
            settings_index: 0,
            editing: None,
            editing_profile: None,
            edit_buffer: String::new(),
            flash_message: None,
            flash_set_at: None,
            pending_commands: VecDeque::new(),
            debug_log: VecDeque::new(),
        }
    }

    // ── Flash messages ───────────────────────────────────────────────

    pub fn flash_success(&mut self, msg: impl Into<String>) {
        self.set_flash(msg.into(), FlashLevel::Success);
    }

    pub fn flash_error(&mut self, msg: impl Into<String>) {
        self.set_flash(msg.into(), FlashLevel::Error);
    }

    pub fn flash_info(&mut self, msg: impl Into<String>) {
        self.set_flash(msg.into(), FlashLevel::Info);
    }

    fn set_flash(&mut self, msg: String, level: FlashLevel) {
        self.flash_message = Some((msg, level));
        self.flash_set_at = Some(Instant::now());
    }

    pub fn expire_flash(&mut self) {
        if let Some(at) = self.flash_set_at {
            if at.elapsed().as_secs() >= 4 {
                self.flash_message = None;
                self.flash_set_at = None;
            }
        }
    }

    // ── Command queue ────────────────────────────────────────────────

    pub fn queue(&mut self, cmd: AsyncCommand) {
        self.pending_commands.push_back(cmd);
    }

    fn log_debug(&mut self, line: impl Into<String>) {
        if !self.config.dev_panel {
            return;
        }
        if self.debug_log.len() >= 50 {
            self.debug_log.pop_front();
        }
        self.debug_log.push_back(line.into());
    }

    // ── Session flow ─────────────────────────────────────────────────

    /// Kick off the one-time bootstrap. Safe to call every tick.
    pub fn maybe_bootstrap(&mut self) {
        if self.session.begin_bootstrap() {
            self.queue(AsyncCommand::BootstrapSession);
        }
    }

    /// Apply a sequence-stamped auth report from the broadcast channel.
    pub fn on_auth_change(&mut self, change: AuthChange) {
        let was_authenticated = self.session.identity().is_some();
        self.log_debug(format!(
            "auth change seq={} identity={}",
            change.seq,
            change
                .identity
                .as_ref()
                .map(|i| i.id.as_str())
                .unwrap_or("none")
        ));
        self.session.apply_auth_change(&change);

        match change.identity {
            Some(identity) => {
                let user_id = identity.id;
                self.queue(AsyncCommand::FetchProfile {
                    seq: change.seq,
                    user_id: user_id.clone(),
                });
                self.board.loading = true;
                self.queue(AsyncCommand::FetchTasks {
                    user_id: user_id.clone(),
                });
                self.queue(AsyncCommand::FetchAchievements {
                    user_id: user_id.clone(),
                });
                self.queue(AsyncCommand::FetchSuggestions { user_id });
                if matches!(self.route, Route::Auth { .. }) {
                    // Post-sign-in return to the route the gate bounced from.
                    self.route = Route::Dashboard;
                    self.gate.reset();
                    self.tab = Tab::Tasks;
                }
            }
            None => {
                self.access_token = None;
                self.board.clear();
                self.achievements.clear();
                self.remote_suggestions.clear();
                self.selected = 0;
                if was_authenticated {
                    self.flash_info("Signed out");
                }
            }
        }
    }

    /// Route bookkeeping done once per tick: a protected route that the gate
    /// gives up on redirects to sign-in, carrying the return path.
    pub fn tick_route(&mut self) {
        if self.route == Route::Dashboard {
            if let GateDecision::Redirect { from } = self.gate.decide(&self.session, "/") {
                self.route = Route::Auth { return_to: from };
            }
        }
    }

    fn current_user_id(&self) -> Option<String> {
        self.session.identity().map(|i| i.id.clone())
    }

    // ── Derived view state ───────────────────────────────────────────

    pub fn visible_tasks(&self) -> Vec<usize> {
        self.board.visible(self.filter, self.sort)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let visible = self.visible_tasks();
        visible.get(self.selected).and_then(|&i| self.board.get(i))
    }

    /// Canned suggestions first, then whatever the backend holds.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        let user_id = self.current_user_id().unwrap_or_default();
        let mut all = canned_suggestions(&user_id);
        all.extend(self.remote_suggestions.iter().cloned());
        all
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    // ── Key handling ─────────────────────────────────────────────────

    /// Returns `true` when the app should exit.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        if self.task_form.is_some() {
            self.handle_task_form_key(key);
            return false;
        }
        if self.confirm_delete.is_some() {
            self.handle_confirm_delete_key(key);
            return false;
        }
        match self.route {
            Route::Auth { .. } => {
                self.handle_auth_key(key);
                false
            }
            Route::Dashboard => self.handle_dashboard_key(key),
        }
    }

    fn handle_auth_key(&mut self, key: KeyCode) {
        if self.auth_form.busy {
            return;
        }
        match key {
            KeyCode::Tab | KeyCode::Down => {
                let len = self.auth_form.fields().len();
                self.auth_form.focus = (self.auth_form.focus + 1) % len;
            }
            KeyCode::BackTab | KeyCode::Up => {
                let len = self.auth_form.fields().len();
                self.auth_form.focus = (self.auth_form.focus + len - 1) % len;
            }
            KeyCode::Char(c) => {
                let focused = self.auth_form.focused();
                if let Some(buffer) = self.auth_form.buffer_mut(focused) {
                    buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                let focused = self.auth_form.focused();
                if let Some(buffer) = self.auth_form.buffer_mut(focused) {
                    buffer.pop();
                }
            }
            KeyCode::Enter => match self.auth_form.focused() {
                AuthField::Submit => self.submit_auth(),
                AuthField::ToggleMode => self.auth_form.toggle_mode(),
                AuthField::Forgot => self.request_password_reset(),
                // Text fields advance to the next field.
                _ => {
                    let len = self.auth_form.fields().len();
                    self.auth_form.focus = (self.auth_form.focus + 1) % len;
                }
            },
            _ => {}
        }
    }

    fn submit_auth(&mut self) {
        if let Err(msg) = self.auth_form.validate() {
            self.auth_form.error = Some(msg);
            return;
        }
        self.auth_form.error = None;
        self.auth_form.info = None;
        self.auth_form.busy = true;
        self.session.begin_auth_op();
        let email = self.auth_form.email.trim().to_string();
        let password = self.auth_form.password.clone();
        match self.auth_form.mode {
            AuthMode::SignIn => self.queue(AsyncCommand::SignIn { email, password }),
            AuthMode::SignUp => {
                let optional = |s: &str| {
                    let s = s.trim();
                    (!s.is_empty()).then(|| s.to_string())
                };
                self.queue(AsyncCommand::SignUp {
                    email,
                    password,
                    profile: SignupProfile {
                        name: self.auth_form.name.trim().to_string(),
                        avatar: None,
                        phone: optional(&self.auth_form.phone),
                        location: optional(&self.auth_form.location),
                        bio: optional(&self.auth_form.bio),
                    },
                });
            }
        }
    }

    fn request_password_reset(&mut self) {
        if let Err(msg) = validate_email(self.auth_form.email.trim()) {
            self.auth_form.error = Some(msg.to_string());
            return;
        }
        self.auth_form.error = None;
        self.auth_form.busy = true;
        self.queue(AsyncCommand::RequestPasswordReset {
            email: self.auth_form.email.trim().to_string(),
        });
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) -> bool {
        if self.editing.is_some() || self.editing_profile.is_some() {
            self.handle_edit_key(key);
            return false;
        }

        // Tab switching is shared across tabs.
        match key {
            KeyCode::Char('1') => {
                self.tab = Tab::Tasks;
                return false;
            }
            KeyCode::Char('2') => {
                self.tab = Tab::Assistant;
                return false;
            }
            KeyCode::Char('3') => {
                self.tab = Tab::Settings;
                return false;
            }
            KeyCode::Char('4') if self.config.dev_panel => {
                self.tab = Tab::Debug;
                return false;
            }
            KeyCode::Char('q') => return true,
            _ => {}
        }

        match self.tab {
            Tab::Tasks => self.handle_tasks_key(key),
            Tab::Assistant => self.handle_assistant_key(key),
            Tab::Settings => self.handle_settings_key(key),
            Tab::Debug => {}
        }
        false
    }

    fn handle_tasks_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.visible_tasks().len();
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char(' ') => self.toggle_selected_task(),
            KeyCode::Char('n') => self.task_form = Some(TaskForm::blank()),
            KeyCode::Char('e') => {
                let form = self.selected_task().map(TaskForm::for_task);
                if form.is_some() {
                    self.task_form = form;
                }
            }
            KeyCode::Char('d') => {
                let id = self.selected_task().map(|t| t.id.clone());
                if id.is_some() {
                    self.confirm_delete = id;
                }
            }
            KeyCode::Char('f') => {
                self.filter = self.filter.cycle();
                self.clamp_selection();
            }
            KeyCode::Char('s') => {
                self.sort = self.sort.cycle();
                self.clamp_selection();
            }
            KeyCode::Char('r') => self.refresh_dashboard(),
            _ => {}
        }
    }

    fn toggle_selected_task(&mut self) {
        let target = self
            .selected_task()
            .map(|t| (t.id.clone(), TaskPatch::completed(!t.completed)));
        if let Some((id, patch)) = target {
            self.queue(AsyncCommand::UpdateTask { id, patch });
        }
    }

    fn refresh_dashboard(&mut self) {
        if let Some(user_id) = self.current_user_id() {
            self.board.loading = true;
            self.queue(AsyncCommand::FetchTasks {
                user_id: user_id.clone(),
            });
            self.queue(AsyncCommand::FetchAchievements {
                user_id: user_id.clone(),
            });
            self.queue(AsyncCommand::FetchSuggestions { user_id });
        }
    }

    fn handle_confirm_delete_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(id) = self.confirm_delete.take() {
                    self.queue(AsyncCommand::DeleteTask { id });
                }
            }
            _ => {
                self.confirm_delete = None;
            }
        }
    }

    fn handle_assistant_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.suggestions().len();
                if len > 0 {
                    self.assistant_index = (self.assistant_index + 1).min(len - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.assistant_index = self.assistant_index.saturating_sub(1);
            }
            KeyCode::Enter => {
                let suggestions = self.suggestions();
                if let Some(s) = suggestions.get(self.assistant_index) {
                    self.task_form =
                        Some(TaskForm::prefilled(&s.title, &s.description, s.priority));
                }
            }
            KeyCode::Char('v') => self.simulate_voice(),
            _ => {}
        }
    }

    /// Simulated voice capture: no audio is recorded. A listening state runs
    /// for a fixed delay, then [`Self::tick_voice`] produces a canned
    /// transcript and opens a prefilled task form.
    fn simulate_voice(&mut self) {
        if self.voice_started.is_none() {
            self.assistant_heard = None;
            self.voice_started = Some(Instant::now());
        }
    }

    /// Finish a pending capture once the listening delay elapses. Called once
    /// per tick.
    pub fn tick_voice(&mut self) {
        let Some(started) = self.voice_started else {
            return;
        };
        if started.elapsed() < VOICE_CAPTURE_DELAY {
            return;
        }
        self.voice_started = None;
        let transcripts = canned_transcripts();
        let nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let transcript = transcripts[nanos as usize % transcripts.len()];
        self.assistant_heard = Some(transcript.to_string());
        self.task_form = Some(TaskForm::prefilled(transcript, "", Priority::Medium));
    }

    fn handle_settings_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                let max = config::selectable_field_count().saturating_sub(1);
                self.settings_index = (self.settings_index + 1).min(max);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.settings_index = self.settings_index.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(field) = config::nth_selectable_field(self.settings_index) {
                    if field.is_toggle() {
                        field.toggle(&mut self.config);
                        self.config_dirty = true;
                    } else {
                        self.edit_buffer = field.raw_value(&self.config);
                        self.editing = Some(field);
                    }
                }
            }
            KeyCode::Char('s') => self.save_settings(),
            KeyCode::Char('p') => self.begin_profile_edit(ProfileField::Name),
            KeyCode::Char('h') => self.begin_profile_edit(ProfileField::Phone),
            KeyCode::Char('l') => self.begin_profile_edit(ProfileField::Location),
            KeyCode::Char('b') => self.begin_profile_edit(ProfileField::Bio),
            KeyCode::Char('o') => {
                self.session.begin_auth_op();
                self.queue(AsyncCommand::SignOut);
            }
            _ => {}
        }
    }

    fn begin_profile_edit(&mut self, field: ProfileField) {
        if let Some(profile) = self.session.profile() {
            self.edit_buffer = field.current(profile);
            self.editing_profile = Some(field);
        }
    }

    fn save_settings(&mut self) {
        match config::save_config(&self.config) {
            Ok(()) => {
                self.config_dirty = false;
                self.flash_success("Settings saved");
            }
            Err(e) => self.flash_error(format!("Save failed: {e}")),
        }
    }

    fn handle_edit_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.edit_buffer.push(c),
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            KeyCode::Enter => {
                if let Some(field) = self.editing.take() {
                    field.set_value(&mut self.config, &self.edit_buffer);
                    self.config_dirty = true;
                } else if let Some(field) = self.editing_profile.take() {
                    let value = self.edit_buffer.trim().to_string();
                    let rejected = (field == ProfileField::Name)
                        .then(|| validate_name(&value).err())
                        .flatten();
                    if let Some(e) = rejected {
                        self.flash_error(e.to_string());
                    } else if let Some(user_id) = self.current_user_id() {
                        self.queue(AsyncCommand::UpdateProfile {
                            user_id,
                            patch: field.patch(value),
                        });
                    }
                }
                self.edit_buffer.clear();
            }
            KeyCode::Esc => {
                self.editing = None;
                self.editing_profile = None;
                self.edit_buffer.clear();
            }
            _ => {}
        }
    }

    fn handle_task_form_key(&mut self, key: KeyCode) {
        let Some(form) = self.task_form.as_mut() else {
            return;
        };
        if form.busy {
            return;
        }
        match key {
            KeyCode::Esc => {
                self.task_form = None;
                self.assistant_heard = None;
            }
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            KeyCode::Char(c) => match form.focus {
                TaskFormField::Title => form.title.push(c),
                TaskFormField::Description => form.description.push(c),
                TaskFormField::DueDate => form.due_date.push(c),
                TaskFormField::Priority => {
                    if c == ' ' {
                        form.priority = form.priority.cycle();
                    }
                }
                TaskFormField::Submit => {}
            },
            KeyCode::Backspace => match form.focus {
                TaskFormField::Title => {
                    form.title.pop();
                }
                TaskFormField::Description => {
                    form.description.pop();
                }
                TaskFormField::DueDate => {
                    form.due_date.pop();
                }
                _ => {}
            },
            KeyCode::Left | KeyCode::Right => {
                if form.focus == TaskFormField::Priority {
                    form.priority = form.priority.cycle();
                }
            }
            KeyCode::Enter => {
                if form.focus == TaskFormField::Submit {
                    self.submit_task_form();
                } else {
                    form.focus = form.focus.next();
                }
            }
            _ => {}
        }
    }

    fn submit_task_form(&mut self) {
        let Some(form) = self.task_form.as_mut() else {
            return;
        };
        if let Err(e) = validate_title(form.title.trim()) {
            form.error = Some(e.to_string());
            return;
        }
        let due_date = match form.parse_due_date() {
            Ok(d) => d,
            Err(msg) => {
                form.error = Some(msg);
                return;
            }
        };
        let Some(user_id) = self.session.identity().map(|i| i.id.clone()) else {
            return;
        };
        let form = self.task_form.as_mut().expect("form checked above");
        form.error = None;
        form.busy = true;
        let title = form.title.trim().to_string();
        let description = form.description.trim().to_string();
        let priority = form.priority;
        match form.editing_id.clone() {
            Some(id) => {
                let patch = TaskPatch {
                    title: Some(title),
                    description: Some(description),
                    due_date: Some(due_date),
                    priority: Some(priority),
                    completed: None,
                };
                self.queue(AsyncCommand::UpdateTask { id, patch });
            }
            None => {
                self.queue(AsyncCommand::CreateTask {
                    draft: TaskDraft {
                        title,
                        description,
                        due_date,
                        priority,
                        user_id,
                    },
                });
            }
        }
    }

    // ── Command results ──────────────────────────────────────────────

    pub fn apply_command_result(&mut self, result: CommandResult) {
        match result {
            CommandResult::Bootstrap(stored) => {
                self.access_token = stored.map(|s| s.access_token);
                self.log_debug("bootstrap finished");
            }
            CommandResult::SignedIn(result) | CommandResult::SignedUp(result) => {
                self.session.finish_auth_op();
                self.auth_form.busy = false;
                match result {
                    Ok(stored) => {
                        self.access_token = Some(stored.access_token);
                        self.auth_form = AuthForm::new();
                    }
                    Err(e) => self.auth_form.error = Some(e),
                }
            }
            CommandResult::SignedOut => {
                self.session.finish_auth_op();
            }
            CommandResult::ResetRequested(result) => {
                self.auth_form.busy = false;
                match result {
                    Ok(msg) => self.auth_form.info = Some(msg),
                    Err(e) => self.auth_form.error = Some(e),
                }
            }
            CommandResult::Profile { seq, profile } => {
                self.session.apply_profile(seq, profile);
            }
            CommandResult::Tasks(tasks) => {
                self.board.set_tasks(tasks);
                self.clamp_selection();
            }
            CommandResult::TaskCreated(result) => match result {
                Ok(task) => {
                    self.board.apply_created(task);
                    self.task_form = None;
                    self.assistant_heard = None;
                    self.flash_success("Task created");
                }
                Err(e) => self.fail_task_form(e),
            },
            CommandResult::TaskUpdated(result) => match result {
                Ok(task) => {
                    self.board.apply_updated(task);
                    if self.task_form.is_some() {
                        self.task_form = None;
                        self.flash_success("Task updated");
                    }
                    self.clamp_selection();
                }
                Err(e) => {
                    if self.task_form.is_some() {
                        self.fail_task_form(e);
                    } else {
                        self.flash_error(format!("Update failed: {e}"));
                    }
                }
            },
            CommandResult::TaskDeleted { id, deleted } => {
                self.board.apply_deleted(&id, deleted);
                if deleted {
                    self.flash_success("Task deleted");
                } else {
                    self.flash_error("Delete failed; task kept");
                }
                self.clamp_selection();
            }
            CommandResult::Achievements(achievements) => {
                self.achievements = achievements;
            }
            CommandResult::Suggestions(suggestions) => {
                self.remote_suggestions = suggestions;
            }
            CommandResult::ProfileUpdated(result) => match result {
                Ok(profile) => {
                    self.session
                        .apply_profile(self.session.last_seq(), Some(profile));
                    self.flash_success("Profile updated");
                }
                Err(e) => self.flash_error(format!("Profile update failed: {e}")),
            },
        }
    }

    fn fail_task_form(&mut self, error: String) {
        if let Some(form) = self.task_form.as_mut() {
            form.busy = false;
            form.error = Some(error);
        }
    }
}
