//! Integration tests for the LopCafe client.
//!
//! Tests run the real [`ApiClient`] against [`FakeApi`], an in-process axum
//! server on an ephemeral port. The fake answers with scripted responses and
//! records every request it sees, so tests can assert on headers and bodies
//! and on the absence of requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lopcafe-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let api = FakeApi::start().await;
//! api.respond_json("GET", "/recipes/", 200, json!([]));
//! let client = api.client();
//! assert!(client.fetch_recipes().await.unwrap().is_empty());
//! assert_eq!(api.requests().len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use lopcafe_client::{ApiClient, ClientConfig, MemorySessionStore, SessionStore};
use lopcafe_core::Role;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// A request the fake API received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    /// Header value as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Body as lossy UTF-8 (for multipart inspection).
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Json(StatusCode, Value),
    Text(StatusCode, String),
    Empty(StatusCode),
}

impl IntoResponse for Scripted {
    fn into_response(self) -> Response {
        match self {
            Self::Json(status, body) => (status, axum::Json(body)).into_response(),
            Self::Text(status, body) => {
                (status, [(header::CONTENT_TYPE, "text/html")], body).into_response()
            }
            Self::Empty(status) => status.into_response(),
        }
    }
}

#[derive(Default)]
struct FakeState {
    requests: Mutex<Vec<RecordedRequest>>,
    routes: Mutex<HashMap<(String, String), Scripted>>,
}

/// In-process stand-in for the LopCafe HTTP API.
///
/// Unscripted routes answer 404 with the API's error body shape.
pub struct FakeApi {
    base_url: String,
    state: Arc<FakeState>,
    server: JoinHandle<()>,
}

impl FakeApi {
    /// Bind 127.0.0.1 on a free port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new().fallback(record).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read fake API address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            server,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Answer `method path` with a JSON body.
    pub fn respond_json(&self, method: &str, path: &str, status: u16, body: Value) {
        self.script(method, path, Scripted::Json(status_code(status), body));
    }

    /// Answer `method path` with a non-JSON body.
    pub fn respond_text(&self, method: &str, path: &str, status: u16, body: &str) {
        self.script(
            method,
            path,
            Scripted::Text(status_code(status), body.to_string()),
        );
    }

    /// Answer `method path` with no body.
    pub fn respond_empty(&self, method: &str, path: &str, status: u16) {
        self.script(method, path, Scripted::Empty(status_code(status)));
    }

    fn script(&self, method: &str, path: &str, response: Scripted) {
        self.state
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method.to_ascii_uppercase(), path.to_string()), response);
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request.
    ///
    /// # Panics
    ///
    /// Panics if no request has been received.
    #[must_use]
    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("Fake API has not received any request")
    }

    /// Client config pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the base URL is rejected.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url, "unused-session.json")
            .expect("Fake API URL should be valid")
    }

    /// Client with a fresh, logged-out in-memory session.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        self.client_with(Arc::new(MemorySessionStore::new()))
    }

    /// Client already holding `token` as `role`.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory store rejects the session.
    #[must_use]
    pub fn client_as(&self, token: &str, role: Role) -> ApiClient {
        let store = MemorySessionStore::new();
        store
            .set_session(SecretString::from(token.to_string()), role)
            .expect("In-memory session store never fails");
        self.client_with(Arc::new(store))
    }

    /// Client reading its session from `store`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client_with(&self, store: Arc<dyn SessionStore>) -> ApiClient {
        ApiClient::new(&self.config(), store).expect("Failed to build API client")
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn record(State(state): State<Arc<FakeState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let method = parts.method.as_str().to_string();
    let path = parts.uri.path().to_string();
    let key = (method.clone(), path.clone());

    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method,
            path,
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body,
        });

    let scripted = state
        .routes
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned();

    scripted.map_or_else(
        || {
            (
                StatusCode::NOT_FOUND,
                axum::Json(json!({"error": true, "message": "Not found", "code": 404})),
            )
                .into_response()
        },
        IntoResponse::into_response,
    )
}

/// A sample order as the API returns it.
#[must_use]
pub fn sample_order(id: i32, status: &str) -> Value {
    json!({
        "id": id,
        "recipe_id": 3,
        "recipe_name": "Latte",
        "quantity": 2,
        "unit_price": 4.5,
        "status": status,
        "ordered_at": "2024-05-01T09:30:00.123456",
        "user_id": 7
    })
}

/// A sample recipe as the API returns it.
#[must_use]
pub fn sample_recipe(id: i32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "Silky milk over a double shot",
        "price": 4.5,
        "takeaway": true,
        "image_url": "/uploads/1700000000_latte.png",
        "brew_method": {"id": 1, "name": "Espresso", "details": "9 bar"},
        "ingredients": [
            {"id": 1, "name": "Espresso", "quantity": "2 shots"},
            {"id": 2, "name": "Milk", "quantity": "200ml"}
        ]
    })
}
