use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use librarian_core::api::{ApiClient, ChatOutgoing, ChatReply, RegisterRequest};
use librarian_core::error::ApiError;
use librarian_core::models::{ChatTurn, Transcript, TurnState, UserProfile};
use librarian_core::session::{Gate, Session};
use librarian_core::store::ConversationStore;

use crate::ui::notice::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Outcome of a spawned network task, drained by the event loop. Tasks never
/// touch `App` directly; completions that arrive after the user navigated
/// away are applied harmlessly or ignored, never panic.
#[derive(Debug)]
pub enum AppEvent {
    SessionResolved(Option<UserProfile>),
    LoginSettled(Result<UserProfile, ApiError>),
    RegisterSettled(Result<UserProfile, ApiError>),
    ChatSettled(Result<ChatReply, ApiError>),
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: usize,
    pub error: Option<String>,
    pub busy: bool,
}

impl LoginForm {
    pub const FIELDS: usize = 2;

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.email,
            _ => &mut self.password,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Self::FIELDS;
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + Self::FIELDS - 1) % Self::FIELDS;
    }
}

#[derive(Debug, Default)]
pub struct RegisterForm {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: String,
    pub focus: usize,
    pub error: Option<String>,
    pub busy: bool,
}

impl RegisterForm {
    pub const FIELDS: usize = 4;

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.email,
            1 => &mut self.name,
            2 => &mut self.password,
            _ => &mut self.role,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Self::FIELDS;
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + Self::FIELDS - 1) % Self::FIELDS;
    }
}

pub struct App {
    pub view: View,
    pub input_mode: InputMode,
    pub running: bool,
    pub pending_quit: bool,

    pub session: Session,
    pub login: LoginForm,
    pub register: RegisterForm,

    pub transcript: Transcript,
    pub turn: TurnState,
    pub conversation_id: Option<String>,
    pub where_filter: Option<Map<String, Value>>,
    pub chat_input: String,
    /// `usize::MAX` means "follow the bottom"; any other value is a manual
    /// scroll position clamped by the renderer.
    pub scroll_offset: usize,
    /// Largest valid scroll offset as of the last frame, set by the renderer.
    pub max_scroll: usize,
    /// Most recently recommended title, shown in the status line.
    pub last_title: Option<String>,

    api: Arc<ApiClient>,
    conversations: ConversationStore,
    events_tx: UnboundedSender<AppEvent>,
    notice: Option<Notice>,
}

impl App {
    pub fn new(
        api: Arc<ApiClient>,
        conversations: ConversationStore,
    ) -> (Self, UnboundedReceiver<AppEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let app = Self {
            view: View::Login,
            input_mode: InputMode::Editing,
            running: true,
            pending_quit: false,
            session: Session::new(),
            login: LoginForm::default(),
            register: RegisterForm::default(),
            transcript: Transcript::new(),
            turn: TurnState::Idle,
            conversation_id: None,
            where_filter: None,
            chat_input: String::new(),
            scroll_offset: usize::MAX,
            max_scroll: 0,
            last_title: None,
            api,
            conversations,
            events_tx,
            notice: None,
        };
        (app, events_rx)
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn tick(&mut self) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired()) {
            self.notice = None;
        }
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Re-derive the session from the identity endpoint. Not queued or
    /// deduplicated: concurrent refreshes race and the last to settle wins,
    /// which is fine because the check is read-only.
    pub fn refresh_session(&mut self) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let user = match api.me().await {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::debug!("identity check failed: {e}");
                    None
                }
            };
            let _ = tx.send(AppEvent::SessionResolved(user));
        });
    }

    /// Delete the stored token locally; the follow-up refresh fails and the
    /// gate bounces the view to Login.
    pub fn logout(&mut self) {
        if let Err(e) = self.api.logout() {
            tracing::warn!("failed to delete stored token: {e}");
        }
        self.notify(Notice::info("Logged out"));
        self.refresh_session();
    }

    // ------------------------------------------------------------------
    // Auth forms
    // ------------------------------------------------------------------

    pub fn submit_login(&mut self) {
        if self.login.busy {
            return;
        }
        let email = self.login.email.trim().to_string();
        let password = self.login.password.clone();
        if email.is_empty() || password.is_empty() {
            self.login.error = Some("Email and password are required".to_string());
            return;
        }
        self.login.error = None;
        self.login.busy = true;

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            // Login persists the token; the identity check then establishes
            // the session from server truth rather than token presence.
            let result = match api.login(&email, &password).await {
                Ok(_) => api.me().await,
                Err(e) => Err(e),
            };
            let _ = tx.send(AppEvent::LoginSettled(result));
        });
    }

    pub fn submit_register(&mut self) {
        if self.register.busy {
            return;
        }
        let email = self.register.email.trim().to_string();
        let password = self.register.password.clone();
        if email.is_empty() || password.is_empty() {
            self.register.error = Some("Email and password are required".to_string());
            return;
        }
        self.register.error = None;
        self.register.busy = true;

        let name = self.register.name.trim();
        let role = self.register.role.trim();
        let request = RegisterRequest {
            email,
            name: (!name.is_empty()).then(|| name.to_string()),
            password,
            role: (!role.is_empty()).then(|| role.to_string()),
        };

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.register(&request).await;
            let _ = tx.send(AppEvent::RegisterSettled(result));
        });
    }

    // ------------------------------------------------------------------
    // Chat
    // ------------------------------------------------------------------

    /// Enter the guarded chat view: resume the persisted conversation handle
    /// and seed the greeting if nothing has been said yet.
    pub fn enter_chat(&mut self) {
        self.view = View::Chat;
        self.input_mode = InputMode::Editing;
        if self.conversation_id.is_none() {
            self.conversation_id = self.conversations.load();
        }
        self.transcript.seed_greeting();
        self.scroll_offset = usize::MAX;
    }

    /// Submit the current input as one chat turn. Empty input is a no-op and
    /// a submit while a turn is pending is rejected outright; the transcript
    /// gains exactly one user entry per accepted submit, immediately.
    pub fn submit_chat(&mut self) {
        if self.turn.is_busy() {
            return;
        }
        let text = self.chat_input.trim().to_string();
        if text.is_empty() {
            return;
        }
        if let Some(rest) = text.strip_prefix("/filter") {
            self.apply_filter_command(rest);
            self.chat_input.clear();
            return;
        }
        self.chat_input.clear();

        // Optimistic append before the network dispatch; never rolled back.
        self.transcript.push(ChatTurn::user(text.clone()));
        self.turn = TurnState::Sending;
        self.scroll_offset = usize::MAX;

        let outgoing = ChatOutgoing {
            message: text,
            conversation_id: self.conversation_id.clone(),
            where_filter: self.where_filter.clone(),
        };
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.send_chat(&outgoing).await;
            let _ = tx.send(AppEvent::ChatSettled(result));
        });
    }

    fn on_chat_settled(&mut self, result: Result<ChatReply, ApiError>) {
        match result {
            Ok(reply) => {
                // Always take the server's id, even when unchanged, and
                // persist it so a restart resumes this conversation.
                self.conversation_id = Some(reply.conversation_id.clone());
                if let Err(e) = self.conversations.save(&reply.conversation_id) {
                    tracing::warn!("failed to persist conversation id: {e:#}");
                    self.notify(Notice::error("Could not save the conversation handle"));
                }
                self.transcript.push(ChatTurn::assistant(reply.answer));
                if reply.title.is_some() {
                    self.last_title = reply.title;
                }
                self.turn = TurnState::Resolved;
            }
            Err(err) => {
                tracing::warn!("chat turn failed: {err}");
                self.transcript
                    .push(ChatTurn::assistant(format!("⚠️ {}", err.user_message())));
                self.turn = TurnState::Failed;
            }
        }
        self.scroll_offset = usize::MAX;
    }

    fn apply_filter_command(&mut self, rest: &str) {
        match parse_filter(rest) {
            Ok(None) => {
                self.where_filter = None;
                self.notify(Notice::info("Retrieval filter cleared"));
            }
            Ok(Some(filter)) => {
                let summary = filter_summary(&filter);
                self.where_filter = Some(filter);
                self.notify(Notice::success(format!("Filtering on {summary}")));
            }
            Err(term) => {
                self.notify(Notice::warning(format!(
                    "Malformed filter term '{term}', expected key=value"
                )));
            }
        }
    }

    /// Bracketed paste into whichever input currently has focus. Form fields
    /// are single-line, so line breaks are dropped there.
    pub fn paste(&mut self, text: &str) {
        let single_line: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        match self.view {
            View::Login => self.login.focused_mut().push_str(&single_line),
            View::Register => self.register.focused_mut().push_str(&single_line),
            View::Chat => {
                if self.input_mode == InputMode::Editing {
                    self.chat_input.push_str(text);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    pub fn scroll_up(&mut self, lines: usize) {
        let base = if self.scroll_offset == usize::MAX {
            self.max_scroll
        } else {
            self.scroll_offset
        };
        self.scroll_offset = base.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        if self.scroll_offset == usize::MAX {
            return;
        }
        let next = self.scroll_offset.saturating_add(lines);
        self.scroll_offset = if next >= self.max_scroll {
            usize::MAX
        } else {
            next
        };
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = usize::MAX;
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    pub fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SessionResolved(user) => {
                self.session.resolve(user);
                match Gate::evaluate(&self.session) {
                    Gate::Admitted => {
                        // Startup auto-resume: a valid session skips the login
                        // form entirely.
                        if self.view == View::Login {
                            self.enter_chat();
                        }
                    }
                    Gate::Denied => {
                        if self.view == View::Chat {
                            self.view = View::Login;
                            self.input_mode = InputMode::Editing;
                            self.notify(Notice::warning("Session expired, please log in"));
                        }
                    }
                    Gate::Pending => {}
                }
            }
            AppEvent::LoginSettled(result) => {
                self.login.busy = false;
                match result {
                    Ok(profile) => {
                        self.login.password.clear();
                        let greeting = format!("Welcome back, {}", profile.display_name());
                        self.session.resolve(Some(profile));
                        self.notify(Notice::success(greeting));
                        self.enter_chat();
                    }
                    Err(err) => {
                        tracing::warn!("login failed: {err}");
                        self.login.error = Some(err.user_message());
                    }
                }
            }
            AppEvent::RegisterSettled(result) => {
                self.register.busy = false;
                match result {
                    Ok(profile) => {
                        self.login = LoginForm {
                            email: profile.email,
                            ..LoginForm::default()
                        };
                        self.view = View::Login;
                        self.notify(Notice::success("Account created, log in to continue"));
                    }
                    Err(err) => {
                        tracing::warn!("registration failed: {err}");
                        self.register.error = Some(err.user_message());
                    }
                }
            }
            AppEvent::ChatSettled(result) => self.on_chat_settled(result),
        }
    }
}

/// Parse the body of a `/filter` command. `Ok(None)` clears the filter, a
/// malformed term is returned as `Err` and nothing is applied.
pub fn parse_filter(rest: &str) -> Result<Option<Map<String, Value>>, String> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(None);
    }
    let mut filter = Map::new();
    for term in rest.split_whitespace() {
        match term.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                filter.insert(key.to_string(), Value::String(value.to_string()));
            }
            _ => return Err(term.to_string()),
        }
    }
    Ok(Some(filter))
}

fn filter_summary(filter: &Map<String, Value>) -> String {
    filter
        .iter()
        .map(|(k, v)| match v {
            Value::String(s) => format!("{k}={s}"),
            other => format!("{k}={other}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use librarian_core::models::{Role, GREETING};
    use librarian_core::store::MemoryTokenStore;
    use tempfile::tempdir;

    fn test_app(dir: &std::path::Path) -> (App, UnboundedReceiver<AppEvent>) {
        // Unroutable base: nothing in these tests may depend on a live server
        let tokens = Arc::new(MemoryTokenStore::with_token("tok"));
        let api = Arc::new(ApiClient::new("http://localhost:1", tokens));
        App::new(api, ConversationStore::new(dir))
    }

    fn reply(conversation_id: &str, answer: &str) -> ChatReply {
        serde_json::from_value(serde_json::json!({
            "conversation_id": conversation_id,
            "answer": answer,
        }))
        .unwrap()
    }

    fn profile(email: &str) -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "id": "1",
            "email": email,
            "role": "user",
            "created_at": "2026-08-05T12:00:00",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn blank_input_submit_is_a_no_op() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.enter_chat();
        let seeded = app.transcript.len();

        for input in ["", "   ", "\t\n"] {
            app.chat_input = input.to_string();
            app.submit_chat();
            assert_eq!(app.transcript.len(), seeded);
            assert_eq!(app.turn, TurnState::Idle);
        }
    }

    #[tokio::test]
    async fn submit_appends_exactly_one_user_entry_immediately() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.enter_chat();
        let seeded = app.transcript.len();

        app.chat_input = "  recommend me a mystery  ".to_string();
        app.submit_chat();

        assert_eq!(app.transcript.len(), seeded + 1);
        let last = app.transcript.turns().last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "recommend me a mystery");
        assert!(app.turn.is_busy());
        assert!(app.chat_input.is_empty());
    }

    #[tokio::test]
    async fn submit_while_sending_is_rejected() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.enter_chat();

        app.chat_input = "first".to_string();
        app.submit_chat();
        let after_first = app.transcript.len();

        app.chat_input = "second".to_string();
        app.submit_chat();
        assert_eq!(app.transcript.len(), after_first);
        assert_eq!(app.chat_input, "second");
    }

    #[tokio::test]
    async fn settled_turn_appends_exactly_one_assistant_entry() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.enter_chat();

        app.chat_input = "recommend me a mystery".to_string();
        app.submit_chat();
        let before = app.transcript.len();

        app.on_event(AppEvent::ChatSettled(Ok(reply("abc123", "Try Rebecca."))));
        assert_eq!(app.transcript.len(), before + 1);
        let last = app.transcript.turns().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "Try Rebecca.");
        assert_eq!(app.turn, TurnState::Resolved);
        assert!(!app.turn.is_busy());
    }

    #[tokio::test]
    async fn conversation_id_is_adopted_and_persisted() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.enter_chat();
        assert!(app.conversation_id.is_none());

        app.on_event(AppEvent::ChatSettled(Ok(reply("abc123", "Try Rebecca."))));
        assert_eq!(app.conversation_id.as_deref(), Some("abc123"));

        // A fresh app over the same data dir resumes the conversation
        let (mut restarted, _rx) = test_app(dir.path());
        restarted.enter_chat();
        assert_eq!(restarted.conversation_id.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn failure_annotates_transcript_without_rollback() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.enter_chat();

        app.chat_input = "hello".to_string();
        app.submit_chat();
        let user_entries = app
            .transcript
            .turns()
            .iter()
            .filter(|t| t.role == Role::User)
            .count();

        app.on_event(AppEvent::ChatSettled(Err(ApiError::Status {
            status: 404,
            detail: Some("conversation not found".to_string()),
        })));

        let last = app.transcript.turns().last().unwrap();
        assert_eq!(last.content, "⚠️ conversation not found");
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(app.turn, TurnState::Failed);
        // The optimistic entry is still there
        let after = app
            .transcript
            .turns()
            .iter()
            .filter(|t| t.role == Role::User)
            .count();
        assert_eq!(after, user_entries);
    }

    #[tokio::test]
    async fn greeting_is_seeded_once_per_transcript() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.enter_chat();
        app.enter_chat();
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript.turns()[0].content, GREETING);
    }

    #[tokio::test]
    async fn logout_clears_session_via_failed_refresh() {
        let dir = tempdir().unwrap();
        let (mut app, mut rx) = test_app(dir.path());
        app.session.resolve(Some(profile("reader@example.com")));
        app.enter_chat();

        // Logout deletes the token locally; the refresh it triggers fails
        // fast and resolves the session anonymous.
        app.logout();
        let event = rx.recv().await.unwrap();
        app.on_event(event);

        assert!(app.session.user().is_none());
        assert_eq!(app.view, View::Login);
    }

    #[tokio::test]
    async fn denied_session_bounces_chat_to_login() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.session.resolve(Some(profile("reader@example.com")));
        app.enter_chat();
        assert_eq!(app.view, View::Chat);

        app.on_event(AppEvent::SessionResolved(None));
        assert_eq!(app.view, View::Login);
        assert_eq!(Gate::evaluate(&app.session), Gate::Denied);
    }

    #[tokio::test]
    async fn startup_resolution_with_user_enters_chat() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        assert_eq!(app.view, View::Login);

        app.on_event(AppEvent::SessionResolved(Some(profile(
            "reader@example.com",
        ))));
        assert_eq!(app.view, View::Chat);
        assert_eq!(Gate::evaluate(&app.session), Gate::Admitted);
    }

    #[tokio::test]
    async fn login_settling_enters_chat_and_clears_password() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.login.email = "reader@example.com".to_string();
        app.login.password = "pw".to_string();
        app.login.busy = true;

        app.on_event(AppEvent::LoginSettled(Ok(profile("reader@example.com"))));
        assert_eq!(app.view, View::Chat);
        assert!(app.login.password.is_empty());
        assert!(!app.login.busy);
        assert!(app.session.user().is_some());
    }

    #[tokio::test]
    async fn login_failure_surfaces_inline_error() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.login.busy = true;

        app.on_event(AppEvent::LoginSettled(Err(ApiError::Status {
            status: 401,
            detail: Some("Invalid credentials".to_string()),
        })));
        assert_eq!(app.view, View::Login);
        assert_eq!(app.login.error.as_deref(), Some("Invalid credentials"));
        assert!(!app.login.busy);
    }

    #[tokio::test]
    async fn registration_success_returns_to_login_with_email_prefilled() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.view = View::Register;
        app.register.busy = true;

        app.on_event(AppEvent::RegisterSettled(Ok(profile("new@example.com"))));
        assert_eq!(app.view, View::Login);
        assert_eq!(app.login.email, "new@example.com");
        assert!(!app.register.busy);
    }

    #[test]
    fn filter_command_parses_terms() {
        let filter = parse_filter(" genre=fantasy language=en ").unwrap().unwrap();
        assert_eq!(filter["genre"], "fantasy");
        assert_eq!(filter["language"], "en");

        assert!(parse_filter("").unwrap().is_none());
        assert_eq!(parse_filter("genre").unwrap_err(), "genre");
        assert_eq!(parse_filter("genre=").unwrap_err(), "genre=");
        assert_eq!(parse_filter("=fantasy").unwrap_err(), "=fantasy");
    }

    #[tokio::test]
    async fn malformed_filter_leaves_previous_filter_untouched() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.enter_chat();

        app.chat_input = "/filter genre=fantasy".to_string();
        app.submit_chat();
        assert!(app.where_filter.is_some());

        app.chat_input = "/filter oops".to_string();
        app.submit_chat();
        assert_eq!(app.where_filter.as_ref().unwrap()["genre"], "fantasy");

        app.chat_input = "/filter".to_string();
        app.submit_chat();
        assert!(app.where_filter.is_none());
    }

    #[tokio::test]
    async fn scrolling_clamps_and_resumes_follow() {
        let dir = tempdir().unwrap();
        let (mut app, _rx) = test_app(dir.path());
        app.max_scroll = 10;
        assert_eq!(app.scroll_offset, usize::MAX);

        app.scroll_up(3);
        assert_eq!(app.scroll_offset, 7);
        app.scroll_down(2);
        assert_eq!(app.scroll_offset, 9);
        app.scroll_down(5);
        assert_eq!(app.scroll_offset, usize::MAX);

        app.scroll_up(usize::MAX);
        assert_eq!(app.scroll_offset, 0);
    }
}
