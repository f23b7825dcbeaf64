//! Application state management for passvault.
//!
//! This module contains the core `App` struct that owns the session
//! controller, the current view, form state, the vault contents and the
//! channel that background API tasks report back on.

use std::sync::Arc;

use anyhow::Result;
use chrono::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use passvault_core::api::{ApiClient, ApiError, Credential};
use passvault_core::clock::Clock;
use passvault_core::config::Config;
use passvault_core::generator::{self, GeneratorOptions};
use passvault_core::import::{self, ImportError, ImportSummary};
use passvault_core::models::{NewPasswordEntry, PasswordEntry, PasswordUpdate};
use passvault_core::session::{
    DeauthNotifier, DurableStore, EntryNotice, InteractionEvent, InvoluntaryCause, NavPayload,
    Navigator, Route, SessionController, TerminationReason, TokenStore,
};

use crate::toast::ToastQueue;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 64;

/// Maximum length for password input.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for entry form fields.
const MAX_FIELD_LENGTH: usize = 512;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overlay / modal state on top of the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    Editing,
    ConfirmingDelete,
    /// Typing the path of a CSV file to import
    Importing,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Focus within the login and register forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthFocus {
    #[default]
    Username,
    Password,
    Button,
}

impl AuthFocus {
    pub fn next(self) -> Self {
        match self {
            AuthFocus::Username => AuthFocus::Password,
            AuthFocus::Password => AuthFocus::Button,
            AuthFocus::Button => AuthFocus::Username,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            AuthFocus::Username => AuthFocus::Button,
            AuthFocus::Password => AuthFocus::Username,
            AuthFocus::Button => AuthFocus::Password,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
    pub focus: AuthFocus,
    pub error: Option<String>,
}

impl AuthForm {
    pub fn with_username(username: String) -> Self {
        let focus = if username.is_empty() {
            AuthFocus::Username
        } else {
            AuthFocus::Password
        };
        Self {
            username,
            focus,
            ..Default::default()
        }
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            AuthFocus::Username => {
                if can_add_username_char(self.username.chars().count(), c) {
                    self.username.push(c);
                }
            }
            AuthFocus::Password => {
                if can_add_password_char(self.password.chars().count(), c) {
                    self.password.push(c);
                }
            }
            AuthFocus::Button => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            AuthFocus::Username => {
                self.username.pop();
            }
            AuthFocus::Password => {
                self.password.pop();
            }
            AuthFocus::Button => {}
        }
    }

    /// Trimmed username and raw password, or the message to show.
    fn credentials(&self) -> Result<(String, String), &'static str> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err("Username and password required");
        }
        Ok((username.to_string(), self.password.clone()))
    }
}

/// Field focus in the create/edit modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryField {
    #[default]
    Key,
    Value,
    LoginUri,
    Notes,
}

impl EntryField {
    pub fn title(self) -> &'static str {
        match self {
            EntryField::Key => "Name",
            EntryField::Value => "Password",
            EntryField::LoginUri => "Login URL",
            EntryField::Notes => "Notes",
        }
    }

    pub fn next(self) -> Self {
        match self {
            EntryField::Key => EntryField::Value,
            EntryField::Value => EntryField::LoginUri,
            EntryField::LoginUri => EntryField::Notes,
            EntryField::Notes => EntryField::Key,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            EntryField::Key => EntryField::Notes,
            EntryField::Value => EntryField::Key,
            EntryField::LoginUri => EntryField::Value,
            EntryField::Notes => EntryField::LoginUri,
        }
    }
}

/// State of the create/edit modal.
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    /// Id of the entry being edited; `None` when creating
    pub editing: Option<String>,
    pub key: String,
    pub value: String,
    pub login_uri: String,
    pub notes: String,
    pub focus: EntryField,
    pub error: Option<String>,
}

impl EntryForm {
    pub fn edit(entry: &PasswordEntry) -> Self {
        Self {
            editing: Some(entry.id.clone()),
            key: entry.key.clone(),
            value: entry.value.clone(),
            login_uri: entry.login_uri.clone().unwrap_or_default(),
            notes: entry.notes.clone().unwrap_or_default(),
            // The name is fixed once created
            focus: EntryField::Value,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    pub fn field(&self, field: EntryField) -> &str {
        match field {
            EntryField::Key => &self.key,
            EntryField::Value => &self.value,
            EntryField::LoginUri => &self.login_uri,
            EntryField::Notes => &self.notes,
        }
    }

    fn focused_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            EntryField::Key if self.is_edit() => None,
            EntryField::Key => Some(&mut self.key),
            EntryField::Value => Some(&mut self.value),
            EntryField::LoginUri => Some(&mut self.login_uri),
            EntryField::Notes => Some(&mut self.notes),
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.focused_mut() {
            if can_add_field_char(field.chars().count(), c) {
                field.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.focused_mut() {
            field.pop();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        if self.is_edit() && self.focus == EntryField::Key {
            self.focus = self.focus.next();
        }
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
        if self.is_edit() && self.focus == EntryField::Key {
            self.focus = self.focus.prev();
        }
    }

    fn optional(s: &str) -> Option<String> {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn to_new_entry(&self) -> Result<NewPasswordEntry, &'static str> {
        if self.key.trim().is_empty() {
            return Err("Name is required");
        }
        if self.value.is_empty() {
            return Err("Password is required");
        }
        Ok(NewPasswordEntry {
            key: self.key.trim().to_string(),
            value: self.value.clone(),
            notes: Self::optional(&self.notes),
            login_uri: Self::optional(&self.login_uri),
        })
    }

    pub fn to_update(&self) -> Result<PasswordUpdate, &'static str> {
        if self.value.is_empty() {
            return Err("Password is required");
        }
        Ok(PasswordUpdate {
            value: self.value.clone(),
            notes: Self::optional(&self.notes),
            login_uri: Self::optional(&self.login_uri),
        })
    }
}

// ============================================================================
// Router
// ============================================================================

/// Current view plus at most one navigation waiting to be applied.
#[derive(Debug)]
pub struct Router {
    current: Route,
    pending: Option<(Route, Option<NavPayload>)>,
}

impl Router {
    pub fn new(current: Route) -> Self {
        Self {
            current,
            pending: None,
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    fn take_pending(&mut self) -> Option<(Route, Option<NavPayload>)> {
        self.pending.take()
    }
}

impl Navigator for Router {
    fn navigate_to(&mut self, route: Route, payload: Option<NavPayload>) {
        self.pending = Some((route, payload));
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Outcome of a background API call.
#[derive(Debug)]
enum TaskResult {
    Passwords(Result<Vec<PasswordEntry>, ApiError>),
    Saved {
        created: bool,
        result: Result<PasswordEntry, ApiError>,
    },
    Deleted(Result<PasswordEntry, ApiError>),
    Imported(Result<ImportSummary, ImportError>),
}

/// A task result tagged with the session it was started in.
#[derive(Debug)]
struct TaskMessage {
    epoch: u64,
    result: TaskResult,
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub config: Config,
    clock: Arc<dyn Clock>,
    pub session: SessionController,
    api: ApiClient,
    deauth: DeauthNotifier,
    pub router: Router,
    pub entry_notice: EntryNotice,
    pub toasts: ToastQueue,
    pub state: AppState,

    // Login / register forms
    pub login_form: AuthForm,
    pub register_form: AuthForm,

    // Dashboard
    pub passwords: Vec<PasswordEntry>,
    pub loading: bool,
    pub search_query: String,
    pub selection: usize,
    pub entry_form: EntryForm,
    pub reveal_value: bool,
    pub import_path: String,
    pub importing: bool,

    // Generator
    pub generator: GeneratorOptions,
    pub generated: Option<String>,

    // Bumped whenever a session starts or ends; stale task results are dropped
    session_epoch: u64,
    was_authenticated: bool,

    // Background task channel
    task_rx: mpsc::Receiver<TaskMessage>,
    task_tx: mpsc::Sender<TaskMessage>,
}

impl App {
    /// Create a new application instance, restoring any stored session.
    pub fn new(config: Config, backend: Box<dyn DurableStore>, clock: Arc<dyn Clock>) -> Result<Self> {
        let credential = Credential::new();
        let api = ApiClient::new(&config.api_base_url, credential.clone())?;
        debug!(base_url = api.base_url(), "API client configured");

        let store = TokenStore::new(backend, credential);
        let mut session =
            SessionController::new(store, Arc::clone(&clock), config.inactivity_timeout());
        let deauth = DeauthNotifier::new(session.subscribe_events());

        let authenticated = session.is_authenticated();
        let mut router = Router::new(Route::ENTRY);
        if authenticated {
            router.navigate_to(Route::Dashboard, None);
        }

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let login_form = AuthForm::with_username(config.last_username.clone().unwrap_or_default());

        Ok(Self {
            config,
            clock,
            session,
            api,
            deauth,
            router,
            entry_notice: EntryNotice::new(),
            toasts: ToastQueue::new(),
            state: AppState::Normal,

            login_form,
            register_form: AuthForm::default(),

            passwords: Vec::new(),
            loading: false,
            search_query: String::new(),
            selection: 0,
            entry_form: EntryForm::default(),
            reveal_value: false,
            import_path: String::new(),
            importing: false,

            generator: GeneratorOptions::default(),
            generated: None,

            session_epoch: 0,
            was_authenticated: authenticated,

            task_rx: rx,
            task_tx: tx,
        })
    }

    pub fn current_route(&self) -> Route {
        self.router.current()
    }

    pub fn time_until_timeout(&self) -> Option<Duration> {
        self.session.time_until_timeout()
    }

    // =========================================================================
    // Event loop hooks
    // =========================================================================

    /// Feed a terminal interaction to the session and to the login view's
    /// logout notice.
    pub fn handle_interaction(&mut self, event: InteractionEvent) {
        self.session.handle_interaction(event);
        if self.router.current() == Route::ENTRY {
            self.entry_notice.on_interaction(event, &mut self.toasts);
        }
        self.sync_session();
    }

    /// Run once per loop iteration: timeout, task results, redirects, toasts.
    pub fn tick(&mut self) {
        if let Some(reason) = self.session.tick() {
            debug!(?reason, "Session ended by timer");
        }
        self.check_background_tasks();
        self.sync_session();
        self.deauth.pump(&mut self.router);
        self.apply_navigation();
        self.toasts.expire(self.clock.now());
    }

    /// Notice session start/end that happened inside the controller.
    fn sync_session(&mut self) {
        let authenticated = self.session.is_authenticated();
        if authenticated == self.was_authenticated {
            return;
        }
        self.was_authenticated = authenticated;
        self.session_epoch += 1;
        if !authenticated {
            self.clear_vault();
        }
    }

    /// Forget everything decrypted from the backend.
    fn clear_vault(&mut self) {
        self.passwords.clear();
        self.selection = 0;
        self.search_query.clear();
        self.entry_form = EntryForm::default();
        self.reveal_value = false;
        self.loading = false;
        self.import_path.clear();
        self.importing = false;
        if matches!(
            self.state,
            AppState::Searching
                | AppState::Editing
                | AppState::ConfirmingDelete
                | AppState::Importing
        ) {
            self.state = AppState::Normal;
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn navigate(&mut self, route: Route) {
        self.router.navigate_to(route, None);
        self.apply_navigation();
    }

    fn apply_navigation(&mut self) {
        let Some((mut route, mut payload)) = self.router.take_pending() else {
            return;
        };

        if route.requires_session() && !self.session.is_authenticated() {
            debug!(?route, "View requires a session, showing login");
            route = Route::ENTRY;
            payload = None;
        }

        let previous = self.router.current;
        if previous == Route::ENTRY && route != Route::ENTRY {
            self.entry_notice.on_leave(&mut self.toasts);
        }
        self.router.current = route;

        if !matches!(self.state, AppState::ConfirmingQuit | AppState::Quitting) {
            self.state = AppState::Normal;
        }

        match route {
            Route::Login => {
                self.entry_notice.on_enter(payload, &mut self.toasts);
                let username = std::mem::take(&mut self.login_form.username);
                self.login_form = AuthForm::with_username(username);
            }
            Route::Register => self.register_form = AuthForm::default(),
            Route::Dashboard => self.refresh_passwords(),
            Route::Generator => {}
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let (username, password) = match self.login_form.credentials() {
            Ok(creds) => creds,
            Err(msg) => {
                self.login_form.error = Some(msg.to_string());
                return Err(anyhow::anyhow!(msg));
            }
        };

        self.login_form.error = None;

        match self.api.login(&username, &password).await {
            Ok(token) => {
                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                self.complete_login(&token);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_form.error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Start the session with a freshly issued token and open the vault.
    pub fn complete_login(&mut self, token: &str) {
        self.session.login(token);
        self.was_authenticated = true;
        self.session_epoch += 1;
        self.login_form.password.clear();
        info!("Login successful");
        self.navigate(Route::Dashboard);
    }

    pub async fn attempt_register(&mut self) -> Result<()> {
        let (username, password) = match self.register_form.credentials() {
            Ok(creds) => creds,
            Err(msg) => {
                self.register_form.error = Some(msg.to_string());
                return Err(anyhow::anyhow!(msg));
            }
        };

        self.register_form.error = None;

        match self.api.register(&username, &password).await {
            Ok(user) => {
                info!(username = %user.username, "Account created");
                self.login_form.username = user.username;
                self.toasts.success("Registration successful!", self.clock.now());
                self.navigate(Route::Login);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                self.register_form.error = Some(match e {
                    ApiError::Unauthorized => "Registration was refused".to_string(),
                    ref other => other.user_message(),
                });
                Err(e.into())
            }
        }
    }

    /// User-initiated logout. Returns to the login view without a notice.
    pub fn logout(&mut self) {
        self.session.logout(TerminationReason::Voluntary);
        self.sync_session();
        self.navigate(Route::Login);
    }

    // =========================================================================
    // Background API calls
    // =========================================================================

    async fn send_result(tx: &mpsc::Sender<TaskMessage>, message: TaskMessage) {
        if let Err(e) = tx.send(message).await {
            warn!(error = %e, "Failed to deliver background task result");
        }
    }

    /// Fetch the vault contents in the background.
    pub fn refresh_passwords(&mut self) {
        if !self.session.is_authenticated() {
            return;
        }
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let epoch = self.session_epoch;
        self.loading = true;

        tokio::spawn(async move {
            let result = api.list_passwords().await;
            Self::send_result(
                &tx,
                TaskMessage {
                    epoch,
                    result: TaskResult::Passwords(result),
                },
            )
            .await;
        });
    }

    pub fn submit_entry_form(&mut self) {
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let epoch = self.session_epoch;

        match self.entry_form.editing.clone() {
            Some(id) => {
                let update = match self.entry_form.to_update() {
                    Ok(update) => update,
                    Err(msg) => {
                        self.entry_form.error = Some(msg.to_string());
                        return;
                    }
                };
                tokio::spawn(async move {
                    let result = api.update_password(&id, &update).await;
                    Self::send_result(
                        &tx,
                        TaskMessage {
                            epoch,
                            result: TaskResult::Saved {
                                created: false,
                                result,
                            },
                        },
                    )
                    .await;
                });
            }
            None => {
                let entry = match self.entry_form.to_new_entry() {
                    Ok(entry) => entry,
                    Err(msg) => {
                        self.entry_form.error = Some(msg.to_string());
                        return;
                    }
                };
                tokio::spawn(async move {
                    let result = api.create_password(&entry).await;
                    Self::send_result(
                        &tx,
                        TaskMessage {
                            epoch,
                            result: TaskResult::Saved {
                                created: true,
                                result,
                            },
                        },
                    )
                    .await;
                });
            }
        }
        self.entry_form.error = None;
    }

    pub fn confirm_delete(&mut self) {
        self.state = AppState::Normal;
        let Some(id) = self.selected_entry().map(|e| e.id.clone()) else {
            return;
        };
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let epoch = self.session_epoch;

        tokio::spawn(async move {
            let result = api.delete_password(&id).await;
            Self::send_result(
                &tx,
                TaskMessage {
                    epoch,
                    result: TaskResult::Deleted(result),
                },
            )
            .await;
        });
    }

    pub fn start_import(&mut self) {
        self.state = AppState::Importing;
    }

    /// Import the CSV file named in the import prompt in the background.
    pub fn submit_import(&mut self) {
        let path = import::expand_home(&self.import_path);
        if path.as_os_str().is_empty() {
            self.toasts.error("Enter the path of a CSV file", self.clock.now());
            return;
        }
        self.state = AppState::Normal;
        self.importing = true;

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let epoch = self.session_epoch;
        info!(path = %path.display(), "Importing passwords from CSV");

        tokio::spawn(async move {
            let result = import::import_file(&api, &path).await;
            Self::send_result(
                &tx,
                TaskMessage {
                    epoch,
                    result: TaskResult::Imported(result),
                },
            )
            .await;
        });
    }

    /// Drain completed background tasks and apply their results
    fn check_background_tasks(&mut self) {
        let mut messages = Vec::new();
        while let Ok(message) = self.task_rx.try_recv() {
            messages.push(message);
        }

        for message in messages {
            self.process_task_message(message);
        }
    }

    fn process_task_message(&mut self, message: TaskMessage) {
        if message.epoch != self.session_epoch || !self.session.is_authenticated() {
            debug!(
                epoch = message.epoch,
                current = self.session_epoch,
                "Dropping result from an ended session"
            );
            return;
        }

        let now = self.clock.now();
        match message.result {
            TaskResult::Passwords(Ok(passwords)) => {
                debug!(count = passwords.len(), "Vault loaded");
                self.loading = false;
                self.passwords = passwords;
                self.clamp_selection();
            }
            TaskResult::Passwords(Err(e)) => {
                self.loading = false;
                self.handle_api_error(e, "Failed to fetch passwords.");
            }
            TaskResult::Saved {
                created,
                result: Ok(entry),
            } => {
                let message = if created {
                    "Password created successfully!".to_string()
                } else {
                    format!("'{}' was updated successfully!", entry.key)
                };
                self.toasts.success(message, now);
                match self.passwords.iter_mut().find(|p| p.id == entry.id) {
                    Some(existing) => *existing = entry,
                    None => self.passwords.push(entry),
                }
                self.entry_form = EntryForm::default();
                if self.state == AppState::Editing {
                    self.state = AppState::Normal;
                }
            }
            TaskResult::Saved { result: Err(e), .. } => {
                if !e.is_unauthorized() {
                    self.entry_form.error = Some(e.user_message());
                }
                self.handle_api_error(e, "Failed to save password.");
            }
            TaskResult::Deleted(Ok(entry)) => {
                self.passwords.retain(|p| p.id != entry.id);
                self.clamp_selection();
                self.toasts.success(format!("'{}' was deleted.", entry.key), now);
            }
            TaskResult::Deleted(Err(e)) => {
                self.handle_api_error(e, "Failed to delete password.");
            }
            TaskResult::Imported(result) => {
                self.importing = false;
                match result {
                    Ok(summary) => {
                        self.toasts.success(summary.message(), now);
                        self.import_path.clear();
                        self.refresh_passwords();
                    }
                    Err(ImportError::Api(e)) => self.handle_api_error(e, "Import failed."),
                    Err(e) => {
                        warn!(error = %e, "CSV import failed");
                        self.toasts.error(e.to_string(), now);
                    }
                }
            }
        }
    }

    /// A rejected token ends the session; anything else is a toast.
    fn handle_api_error(&mut self, e: ApiError, context: &str) {
        if e.is_unauthorized() {
            warn!("Backend rejected the session token");
            self.session
                .logout(TerminationReason::Involuntary(InvoluntaryCause::TokenRejected));
            self.sync_session();
            return;
        }
        error!(error = %e, "{}", context);
        let message = match e {
            ApiError::ServerError(_) | ApiError::InvalidResponse(_) => context.to_string(),
            other => other.user_message(),
        };
        self.toasts.error(message, self.clock.now());
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    pub fn filtered_passwords(&self) -> Vec<&PasswordEntry> {
        self.passwords
            .iter()
            .filter(|p| p.matches_search(&self.search_query))
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&PasswordEntry> {
        self.filtered_passwords().get(self.selection).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered_passwords().len();
        self.selection = self.selection.min(len.saturating_sub(1));
    }

    pub fn select_next(&mut self, step: usize) {
        let max = self.filtered_passwords().len().saturating_sub(1);
        self.selection = (self.selection + step).min(max);
        self.reveal_value = false;
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
        self.reveal_value = false;
    }

    pub fn start_create(&mut self) {
        self.entry_form = EntryForm::default();
        self.state = AppState::Editing;
    }

    pub fn start_edit(&mut self) {
        if let Some(entry) = self.selected_entry() {
            self.entry_form = EntryForm::edit(entry);
            self.state = AppState::Editing;
        }
    }

    pub fn start_delete(&mut self) {
        if self.selected_entry().is_some() {
            self.state = AppState::ConfirmingDelete;
        }
    }

    /// Fill the form's password from the generator.
    pub fn fill_generated_value(&mut self) {
        self.entry_form.value = generator::generate(&self.generator);
    }

    pub fn generate_password(&mut self) {
        self.generated = Some(generator::generate(&self.generator));
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
