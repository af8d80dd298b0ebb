use crate::{
    boundary::{Session, User},
    Failure,
};

/// Persistent storage of the session token.
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn delete(&self);
}

/// The two mutually exclusive top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    App,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    /// A stored token is being verified by the backend.
    Verifying { token: String },
    Authenticated { token: String, user: User },
}

/// Owns the session token and decides which view is visible.
#[derive(Debug)]
pub struct SessionController<S> {
    store: S,
    state: SessionState,
}

impl<S> SessionController<S>
where
    S: TokenStore,
{
    pub const fn new(store: S) -> Self {
        Self {
            store,
            state: SessionState::LoggedOut,
        }
    }

    /// Read the stored token.
    ///
    /// Returns the token that has to be verified by the backend.
    pub fn restore_session(&mut self) -> Option<String> {
        let token = self.store.load().filter(|t| !t.trim().is_empty())?;
        log::debug!("Found stored token: verify it");
        self.state = SessionState::Verifying {
            token: token.clone(),
        };
        Some(token)
    }

    pub fn verification_succeeded(&mut self, user: User) -> View {
        let SessionState::Verifying { token } = &self.state else {
            log::debug!("Ignore outdated token verification");
            return self.view();
        };
        log::info!("Restored session of {}", user.email);
        self.state = SessionState::Authenticated {
            token: token.clone(),
            user,
        };
        View::App
    }

    /// A failed verification is never fatal:
    /// the user simply has to log in again.
    pub fn verification_failed(&mut self, failure: &Failure) -> View {
        if !matches!(self.state, SessionState::Verifying { .. }) {
            log::debug!("Ignore outdated token verification");
            return self.view();
        }
        log::warn!("Unable to verify stored token: {failure}");
        self.logout()
    }

    pub fn complete_login(&mut self, session: Session) -> View {
        let Session { token, user } = session;
        log::info!("Logged in as {}", user.email);
        self.store.save(&token);
        self.state = SessionState::Authenticated { token, user };
        View::App
    }

    /// Returns the message to show on the login view.
    pub fn login_failed(&mut self, failure: &Failure) -> String {
        log::error!("Unable to login: {failure}");
        self.store.delete();
        self.state = SessionState::LoggedOut;
        failure.user_message("Login failed")
    }

    /// Always ends on the login view without a stored token.
    pub fn logout(&mut self) -> View {
        log::debug!("Delete stored token");
        self.store.delete();
        self.state = SessionState::LoggedOut;
        View::Login
    }

    /// Handle a 401 response of an authenticated request.
    ///
    /// Returns `true` if this caused a logout.
    /// Responses that arrive after the session
    /// has already ended are ignored.
    pub fn unauthorized(&mut self) -> bool {
        if matches!(self.state, SessionState::LoggedOut) {
            return false;
        }
        log::warn!("Session is no longer valid");
        self.logout();
        true
    }

    #[must_use]
    pub const fn view(&self) -> View {
        match self.state {
            SessionState::Authenticated { .. } => View::App,
            SessionState::LoggedOut | SessionState::Verifying { .. } => View::Login,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            SessionState::LoggedOut | SessionState::Verifying { .. } => None,
        }
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            SessionState::LoggedOut | SessionState::Verifying { .. } => None,
        }
    }
}
