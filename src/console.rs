use log::{info, warn};
use serde_json::Value;

use crate::api;
use crate::api::auth::RegisterRequest;
use crate::api::entity::{record_id, Entity};
use crate::client::AuthPolicy;
use crate::dispatch::{Dispatcher, UiState};
use crate::feedback::Feedback;
use crate::session::storage::Storage;

/// The administration screens: which entity is shown, what was loaded for it,
/// and the actions on its records.
pub struct Console<S: Storage, F: Feedback> {
    dispatcher: Dispatcher<S, F>,
    entity: Option<Entity>,
    records: Vec<Value>,
}

impl<S: Storage, F: Feedback> Console<S, F> {
    pub const LOGIN_REQUIRED_MESSAGE: &'static str = "log in to access the data";
    pub const ACCOUNT_CREATED_MESSAGE: &'static str = "account created";

    pub fn new(dispatcher: Dispatcher<S, F>) -> Self {
        Self {
            dispatcher,
            entity: None,
            records: Vec::new(),
        }
    }

    pub fn start(&mut self) -> UiState {
        let state = self.dispatcher.start();
        if state == UiState::LoggedOut {
            self.reset();
        }
        state
    }

    /// Logs in and, like opening the main screen, loads the student list.
    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        if self.dispatcher.login(username, password).await.is_none() {
            return false;
        }
        info!("Logged in as '{username}'");
        if self.load(Entity::Student).await.is_some() {
            self.dispatcher
                .feedback_mut()
                .keep_success(Dispatcher::<S, F>::LOGIN_SUCCESS_MESSAGE);
        }
        true
    }

    pub fn logout(&mut self, confirmed: bool) -> bool {
        if !self.dispatcher.logout(confirmed) {
            return false;
        }
        self.reset();
        true
    }

    /// Creates an account. Never sends the current session token.
    pub async fn register(&mut self, username: &str, password: &str, email: &str) -> bool {
        let payload = RegisterRequest {
            username,
            password,
            email,
        };
        let payload = match serde_json::to_value(&payload) {
            Ok(payload) => payload,
            Err(err) => {
                self.dispatcher
                    .feedback_mut()
                    .show_error(&format!("failed to save: {err}"));
                return false;
            }
        };

        let created = self
            .dispatcher
            .post(api::USER_PATH, &payload, AuthPolicy::Anonymous)
            .await
            .is_some();
        if created {
            self.dispatcher
                .feedback_mut()
                .show_success(Self::ACCOUNT_CREATED_MESSAGE);
        }
        self.after_dispatch();
        created
    }

    /// Fetches the list of `entity` and makes it the current screen.
    pub async fn load(&mut self, entity: Entity) -> Option<&[Value]> {
        if !self.require_session() {
            return None;
        }

        let data = self.dispatcher.fetch(entity.path()).await;
        self.after_dispatch();
        let data = data?;

        self.entity = Some(entity);
        self.records = into_records(entity, data);
        Some(&self.records)
    }

    pub async fn create(&mut self, entity: Entity, payload: &Value) -> Option<Value> {
        if !self.require_session() {
            return None;
        }

        let created = self
            .dispatcher
            .post(entity.path(), payload, AuthPolicy::Authenticated)
            .await;
        self.after_dispatch();
        let created = created?;

        self.refresh_after_change(entity, "saved").await;
        Some(created)
    }

    pub async fn update(&mut self, entity: Entity, id: u64, payload: &Value) -> bool {
        if !self.require_session() {
            return false;
        }

        let updated = self.dispatcher.put(&entity.record_path(id), payload).await;
        self.after_dispatch();
        if !updated {
            return false;
        }

        self.refresh_after_change(entity, "updated").await;
        true
    }

    /// Deletes one record when the user confirmed.
    pub async fn delete(&mut self, entity: Entity, id: u64, confirmed: bool) -> bool {
        if !self.require_session() {
            return false;
        }
        if !confirmed {
            return false;
        }

        let deleted = self.dispatcher.delete(&entity.record_path(id)).await;
        self.after_dispatch();
        if !deleted {
            return false;
        }

        self.refresh_after_change(entity, "deleted").await;
        true
    }

    /// Looks up a loaded record of the current entity by id.
    pub fn find(&self, id: u64) -> Option<&Value> {
        self.records.iter().find(|r| record_id(r) == Some(id))
    }

    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn state(&self) -> UiState {
        self.dispatcher.state()
    }

    pub fn dispatcher(&self) -> &Dispatcher<S, F> {
        &self.dispatcher
    }

    pub fn feedback(&self) -> &F {
        self.dispatcher.feedback()
    }

    /// Reloads the list of `entity` after one of its records changed, then
    /// reports the change. A failed reload keeps its error banner instead.
    async fn refresh_after_change(&mut self, entity: Entity, verb: &str) {
        info!("{} {verb}", entity.singular());
        let data = self.dispatcher.fetch(entity.path()).await;
        self.after_dispatch();
        let Some(data) = data else {
            warn!("{} {verb}, but reloading {} failed", entity.singular(), entity.path());
            return;
        };

        self.entity = Some(entity);
        self.records = into_records(entity, data);
        self.dispatcher
            .feedback_mut()
            .show_success(&format!("{} {verb} successfully", entity.singular()));
    }

    fn require_session(&mut self) -> bool {
        if self.dispatcher.session().token().is_some() {
            return true;
        }
        self.dispatcher
            .feedback_mut()
            .show_error(Self::LOGIN_REQUIRED_MESSAGE);
        false
    }

    fn after_dispatch(&mut self) {
        if self.dispatcher.state() == UiState::LoggedOut {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.entity = None;
        self.records.clear();
    }
}

fn into_records(entity: Entity, data: Value) -> Vec<Value> {
    match data {
        Value::Array(records) => records,
        Value::Null => Vec::new(),
        other => {
            warn!(
                "Server returned a non-list for {}, showing it as one record",
                entity.path()
            );
            vec![other]
        }
    }
}
