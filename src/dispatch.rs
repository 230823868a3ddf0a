use log::{debug, error, info, warn};
use reqwest::Method;
use serde_json::Value;

use crate::api;
use crate::api::auth::{ErrorResponse, LoginRequest, LoginResponse};
use crate::client::{AuthPolicy, DispatchError, Reply, RestClient};
use crate::feedback::Feedback;
use crate::session::storage::Storage;
use crate::session::{Session, SessionStore};

/// The two screens of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    LoggedOut,
    LoggedIn,
}

/// What a failed dispatch was trying to do, used to prefix the error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Load,
    Save,
    Update,
    Delete,
}

impl Action {
    fn failure_prefix(self) -> &'static str {
        match self {
            Action::Load => "failed to load data",
            Action::Save => "failed to save",
            Action::Update => "failed to update",
            Action::Delete => "failed to delete",
        }
    }
}

/// Runs authorized requests on behalf of user actions.
///
/// Every dispatch resets the banners and raises the busy indicator first, and
/// drops the busy indicator once the request finished, whatever the outcome.
/// Failures never reach the caller as errors: they are written to the error
/// banner and the caller receives "no result".
pub struct Dispatcher<S: Storage, F: Feedback> {
    client: RestClient,
    session: SessionStore<S>,
    feedback: F,
    state: UiState,
}

impl<S: Storage, F: Feedback> Dispatcher<S, F> {
    pub const LOGIN_FAILED_MESSAGE: &'static str = "login failed";
    pub const LOGIN_SUCCESS_MESSAGE: &'static str = "login successful";
    pub const LOGOUT_SUCCESS_MESSAGE: &'static str = "logout successful";

    /// Builds a dispatcher and runs the start-up check on the stored session.
    pub fn new(client: RestClient, session: SessionStore<S>, feedback: F) -> Self {
        let mut dispatcher = Self::resume(client, session, feedback);
        dispatcher.start();
        dispatcher
    }

    /// Builds a dispatcher over the stored session as is, without checking the
    /// token expiry locally. The server decides whether the token still holds.
    pub fn resume(client: RestClient, session: SessionStore<S>, feedback: F) -> Self {
        let state = if session.token().is_some() {
            UiState::LoggedIn
        } else {
            UiState::LoggedOut
        };
        Self {
            client,
            session,
            feedback,
            state,
        }
    }

    /// Start-up check: only a stored session with an unexpired token logs the
    /// console in, anything else is wiped.
    pub fn start(&mut self) -> UiState {
        let stored = self.session.load();
        self.state = match stored {
            Some(session) if self.session.is_valid(&session.token) => {
                info!("Resuming session of user '{}'", session.username());
                UiState::LoggedIn
            }
            Some(_) => {
                info!("Stored session has expired, please log in again");
                self.session.clear();
                UiState::LoggedOut
            }
            None => {
                self.session.clear();
                UiState::LoggedOut
            }
        };
        self.state
    }

    pub async fn fetch(&mut self, path: &str) -> Option<Value> {
        self.begin();
        let result = self
            .send(Method::GET, path, AuthPolicy::Authenticated, None)
            .await
            .and_then(|reply| reply.json());
        self.end();
        self.finish(Action::Load, result)
    }

    pub async fn post(&mut self, path: &str, data: &Value, auth: AuthPolicy) -> Option<Value> {
        self.begin();
        let result = self
            .send(Method::POST, path, auth, Some(data))
            .await
            .and_then(|reply| reply.json());
        self.end();
        self.finish(Action::Save, result)
    }

    pub async fn put(&mut self, path: &str, data: &Value) -> bool {
        self.begin();
        let result = self
            .send(Method::PUT, path, AuthPolicy::Authenticated, Some(data))
            .await;
        self.end();
        self.finish(Action::Update, result).is_some()
    }

    pub async fn delete(&mut self, path: &str) -> bool {
        self.begin();
        let result = self
            .send(Method::DELETE, path, AuthPolicy::Authenticated, None)
            .await;
        self.end();
        self.finish(Action::Delete, result).is_some()
    }

    /// Exchanges credentials for a session. A rejected login is reported on the
    /// error banner with the server's message, it is not a session expiry.
    pub async fn login(&mut self, username: &str, password: &str) -> Option<&Session> {
        self.begin();
        let payload = LoginRequest { username, password };
        let payload = match serde_json::to_value(&payload) {
            Ok(payload) => payload,
            Err(err) => {
                self.end();
                self.feedback
                    .show_error(&format!("{}: {err}", Self::LOGIN_FAILED_MESSAGE));
                return None;
            }
        };
        let result = self
            .client
            .send(Method::POST, api::LOGIN_PATH, None, Some(&payload))
            .await;
        self.end();

        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                warn!("Login request failed: {err}");
                self.feedback
                    .show_error(&format!("{}: {err}", Self::LOGIN_FAILED_MESSAGE));
                return None;
            }
        };

        if !reply.is_success() {
            warn!("Server rejected login, status {}", reply.status);
            self.feedback.show_error(&Self::login_rejected_message(&reply));
            return None;
        }

        let session = match Self::parse_login(&reply, username) {
            Ok(session) => session,
            Err(message) => {
                self.feedback.show_error(&message);
                return None;
            }
        };

        if let Err(err) = self.session.save(session) {
            error!("Save session failed: {err:#}");
            self.feedback
                .show_error(&format!("{}: {err:#}", Self::LOGIN_FAILED_MESSAGE));
            return None;
        }

        self.state = UiState::LoggedIn;
        self.feedback.show_success(Self::LOGIN_SUCCESS_MESSAGE);
        self.session.current()
    }

    /// Drops the session when the user confirmed. Returns whether it happened.
    pub fn logout(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.session.clear();
        self.state = UiState::LoggedOut;
        self.feedback.show_success(Self::LOGOUT_SUCCESS_MESSAGE);
        true
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    fn begin(&mut self) {
        self.feedback.set_busy(true);
        self.feedback.hide_messages();
    }

    fn end(&mut self) {
        self.feedback.set_busy(false);
    }

    async fn send(
        &mut self,
        method: Method,
        path: &str,
        auth: AuthPolicy,
        payload: Option<&Value>,
    ) -> Result<Reply, DispatchError> {
        let token = match auth {
            AuthPolicy::Authenticated => self.session.token(),
            AuthPolicy::Anonymous => None,
        };
        let result = self.client.execute(method, path, token, payload).await;

        if let Err(DispatchError::SessionExpired) = result {
            warn!("Server rejected the session token, logging out");
            self.session.clear();
            self.state = UiState::LoggedOut;
        }
        result
    }

    fn finish<T>(&mut self, action: Action, result: Result<T, DispatchError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(DispatchError::SessionExpired) => {
                self.feedback
                    .show_error(&DispatchError::SessionExpired.to_string());
                None
            }
            Err(err) => {
                debug!("Dispatch failed: {err}");
                self.feedback
                    .show_error(&format!("{}: {err}", action.failure_prefix()));
                None
            }
        }
    }

    fn parse_login(reply: &Reply, username: &str) -> Result<Session, String> {
        let resp: LoginResponse = match serde_json::from_str(&reply.body) {
            Ok(resp) => resp,
            Err(err) => {
                return Err(format!(
                    "{}: invalid login response: {err}",
                    Self::LOGIN_FAILED_MESSAGE
                ))
            }
        };

        let token = match resp.token {
            Some(token) if !token.is_empty() => token,
            _ => {
                return Err(format!(
                    "{}: server did not return a token",
                    Self::LOGIN_FAILED_MESSAGE
                ))
            }
        };

        let username = resp.username.unwrap_or_else(|| username.to_string());
        let user_id = resp.user_id.unwrap_or_default();
        Ok(Session::new(token, username, user_id))
    }

    /// The server's `message` field when it sent one.
    fn login_rejected_message(reply: &Reply) -> String {
        serde_json::from_str::<ErrorResponse>(&reply.body)
            .ok()
            .and_then(|resp| resp.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| String::from(Self::LOGIN_FAILED_MESSAGE))
    }
}
