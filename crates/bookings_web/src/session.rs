//! In-memory visitor sessions.
//!
//! Sessions are identified by the `session` cookie. Values are stored as
//! JSON so handlers can stash typed records between pages.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::context::AppContext;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug)]
struct SessionData {
    secret: String,
    values: HashMap<String, serde_json::Value>,
    expires_at: DateTime<Utc>,
}

impl SessionData {
    fn new(lifetime: Duration) -> Self {
        Self {
            secret: Uuid::new_v4().simple().to_string(),
            values: HashMap::new(),
            expires_at: Utc::now() + lifetime,
        }
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Shared store of all live sessions.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    lifetime: Duration,
}

impl SessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            lifetime,
        }
    }

    /// Resume the session with the given id, or start a new one when the id
    /// is absent, unknown or expired. The flag is true for a new session.
    pub fn load_or_create(&self, id: Option<&str>) -> (Session, bool) {
        let mut sessions = self.sessions.write();

        if let Some(id) = id {
            match sessions.get(id).map(SessionData::is_expired) {
                Some(false) => return (self.handle(id.to_string()), false),
                Some(true) => {
                    debug!("Session expired");
                    sessions.remove(id);
                }
                None => {}
            }
        }

        sessions.retain(|_, data| !data.is_expired());
        let id = Uuid::new_v4().simple().to_string();
        sessions.insert(id.clone(), SessionData::new(self.lifetime));
        (self.handle(id), true)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    fn handle(&self, id: String) -> Session {
        Session {
            id,
            store: self.clone(),
        }
    }
}

/// Handle to one visitor's session, attached to each request.
#[derive(Clone)]
pub struct Session {
    id: String,
    store: SessionStore,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Per-session secret used to derive anti-forgery tokens.
    pub fn secret(&self) -> Option<String> {
        self.store
            .sessions
            .read()
            .get(&self.id)
            .map(|data| data.secret.clone())
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> serde_json::Result<()> {
        let value = serde_json::to_value(value)?;
        if let Some(data) = self.store.sessions.write().get_mut(&self.id) {
            data.values.insert(key.to_string(), value);
        }
        Ok(())
    }

    pub fn put_string(&self, key: &str, value: impl Into<String>) {
        if let Some(data) = self.store.sessions.write().get_mut(&self.id) {
            data.values
                .insert(key.to_string(), serde_json::Value::String(value.into()));
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self
            .store
            .sessions
            .read()
            .get(&self.id)?
            .values
            .get(key)?
            .clone();
        serde_json::from_value(value).ok()
    }

    /// String value for a key, empty when absent.
    pub fn get_string(&self, key: &str) -> String {
        self.get(key).unwrap_or_default()
    }

    /// Remove a value and return it.
    pub fn pop<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self
            .store
            .sessions
            .write()
            .get_mut(&self.id)?
            .values
            .remove(key)?;
        serde_json::from_value(value).ok()
    }

    pub fn pop_string(&self, key: &str) -> String {
        self.pop(key).unwrap_or_default()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.store
            .sessions
            .read()
            .get(&self.id)
            .is_some_and(|data| data.values.contains_key(key))
    }
}

/// Address of the connected client, when the server knows it.
#[derive(Debug, Clone, Copy)]
pub struct ClientAddr(pub Option<SocketAddr>);

/// Middleware attaching a [`Session`] and [`ClientAddr`] to every request
/// and issuing the session cookie for new visitors.
pub async fn attach_session(
    State(app): State<Arc<AppContext>>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Response {
    let existing = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let (session, created) = app.sessions.load_or_create(existing.as_deref());

    let (mut parts, body) = req.into_parts();
    let client = ConnectInfo::<SocketAddr>::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|ConnectInfo(addr)| addr);
    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(session.clone());
    req.extensions_mut().insert(ClientAddr(client));

    let response = next.run(req).await;
    if !created {
        return response;
    }

    let cookie = Cookie::build((SESSION_COOKIE, session.id().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(app.config.in_production)
        .max_age(time::Duration::seconds(app.config.session_lifetime.num_seconds()));
    (jar.add(cookie), response).into_response()
}
