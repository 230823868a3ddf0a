#![allow(dead_code)]

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, EncodingKey, Header};
use registrar::client::RestClient;
use registrar::console::Console;
use registrar::dispatch::Dispatcher;
use registrar::feedback::Banners;
use registrar::session::storage::{MemoryStorage, Storage};
use registrar::session::{Session, SessionStore};
use serde::Serialize;
use wiremock::MockServer;

#[derive(Serialize)]
struct Claims<'a> {
    sub: &'a str,
    exp: i64,
}

/// Mints a signed token expiring `ttl_secs` from now, negative for the past.
pub fn mint_token(username: &str, ttl_secs: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let claims = Claims {
        sub: username,
        exp: now + ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"registrar test secret"),
    )
    .unwrap()
}

pub fn logged_in_storage(token: &str) -> MemoryStorage {
    let mut store = SessionStore::open(MemoryStorage::new());
    store.save(Session::new(token, "ana", 7)).unwrap();
    store.into_storage()
}

pub fn dispatcher<S: Storage>(url: &str, storage: S) -> Dispatcher<S, Banners> {
    let client = RestClient::new(url, false).unwrap();
    Dispatcher::new(client, SessionStore::open(storage), Banners::default())
}

/// A dispatcher that skips the local expiry check on the stored session.
pub fn resumed_dispatcher<S: Storage>(url: &str, storage: S) -> Dispatcher<S, Banners> {
    let client = RestClient::new(url, false).unwrap();
    Dispatcher::resume(client, SessionStore::open(storage), Banners::default())
}

pub fn console<S: Storage>(url: &str, storage: S) -> Console<S, Banners> {
    let client = RestClient::new(url, false).unwrap();
    let dispatcher = Dispatcher::new(client, SessionStore::open(storage), Banners::default());
    Console::new(dispatcher)
}

pub async fn received_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}
