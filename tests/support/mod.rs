//! Shared test harness: an in-process fake of the invoicing REST API and a
//! front end wired to it, both on ephemeral ports.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use invoice_admin::api::{serve, AppState, SharedState};
use invoice_admin::config::Config;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const USER_EMAIL: &str = "user@example.com";
pub const PASSWORD: &str = "Secret1!";

/// Mutable state of the fake API, inspectable from tests
pub struct FakeApi {
    pub clients: Mutex<Vec<Value>>,
    pub products: Mutex<Vec<Value>>,
    pub invoices: Mutex<Vec<Value>>,
    pub profile: Mutex<Value>,
    pub next_id: AtomicI64,
    /// Every request received, by `METHOD /path`
    pub calls: Mutex<Vec<String>>,
    pub refresh_calls: AtomicUsize,
    pub refresh_succeeds: AtomicBool,
    /// Lifetime of issued access tokens; negative issues already expired tokens
    pub token_ttl_secs: AtomicI64,
}

impl FakeApi {
    fn new() -> Self {
        Self {
            clients: Mutex::new(vec![
                json!({"id": 1, "name": "Acme", "email": "billing@acme.test", "address": "1 Road",
                       "phoneNumber": "555-0100", "paymentPreferences": "Bank Transfer"}),
                json!({"id": 2, "name": "Globex", "email": "ap@globex.test", "address": null,
                       "phoneNumber": null, "paymentPreferences": "PayPal"}),
            ]),
            products: Mutex::new(vec![
                json!({"id": 1, "name": "Widget", "description": "A widget", "price": 10.5, "deleted": false}),
                json!({"id": 2, "name": "Gadget", "description": null, "price": 4.0, "deleted": true}),
            ]),
            invoices: Mutex::new(vec![
                json!({"id": 1, "invoiceNumber": "INV-001", "issueDate": "2025-01-01",
                       "dueDate": "2025-01-31", "status": "PAID", "paymentTerms": "MONTHLY",
                       "totalAmount": 31.5, "clientId": 1, "clientName": "Acme",
                       "clientEmail": "billing@acme.test", "clientAddress": "1 Road",
                       "items": [{"id": 1, "productId": 1, "productName": "Widget",
                                  "quantity": 3, "unitPrice": 10.5, "totalPrice": 31.5}]}),
                json!({"id": 2, "invoiceNumber": "INV-002", "issueDate": "2025-02-01",
                       "dueDate": "2025-02-08", "status": "PENDING", "paymentTerms": "WEEKLY",
                       "totalAmount": 21.0, "clientId": 2, "clientName": "Globex",
                       "items": [{"id": 2, "productId": 1, "productName": "Widget",
                                  "quantity": 2, "unitPrice": 10.5, "totalPrice": 21.0}]}),
            ]),
            profile: Mutex::new(json!({"name": "Ana", "email": USER_EMAIL,
                                       "phoneNumber": null, "address": null})),
            next_id: AtomicI64::new(100),
            calls: Mutex::new(Vec::new()),
            refresh_calls: AtomicUsize::new(0),
            refresh_succeeds: AtomicBool::new(true),
            token_ttl_secs: AtomicI64::new(3600),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn issue_tokens(&self, user_id: i64, role: &str) -> Value {
        let exp = chrono::Utc::now().timestamp() + self.token_ttl_secs.load(Ordering::SeqCst);
        json!({
            "accessToken": token(json!({"userId": user_id, "role": role, "exp": exp})),
            "refreshToken": format!("refresh-{}-{}", role, user_id),
        })
    }
}

pub fn token(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"fake-api-signing-key"),
    )
    .expect("Failed to create token")
}

type Fake = Arc<FakeApi>;

fn envelope(data: Value) -> Response {
    Json(json!({"data": data})).into_response()
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"message": message}))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

macro_rules! authorized {
    ($fake:expr, $headers:expr, $call:expr) => {{
        $fake.record($call);
        if bearer(&$headers).is_none() {
            return message(StatusCode::UNAUTHORIZED, "Missing token");
        }
    }};
}

async fn login(State(fake): State<Fake>, Json(body): Json<Value>) -> Response {
    fake.record("POST /auth/login".to_string());
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match (email, password) {
        (ADMIN_EMAIL, PASSWORD) => envelope(fake.issue_tokens(1, "ADMIN")),
        (USER_EMAIL, PASSWORD) => envelope(fake.issue_tokens(2, "USER")),
        ("tokenless@example.com", _) => envelope(json!({"refreshToken": "r"})),
        _ => message(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

async fn refresh(State(fake): State<Fake>, headers: HeaderMap) -> Response {
    fake.record("POST /auth/refresh".to_string());
    fake.refresh_calls.fetch_add(1, Ordering::SeqCst);
    // Let concurrent callers pile up behind the first refresh
    tokio::time::sleep(Duration::from_millis(50)).await;

    let Some(refresh_token) = bearer(&headers) else {
        return message(StatusCode::UNAUTHORIZED, "Missing refresh token");
    };
    if !fake.refresh_succeeds.load(Ordering::SeqCst) {
        return message(StatusCode::UNAUTHORIZED, "Refresh token expired");
    }
    let mut parts = refresh_token.splitn(3, '-').skip(1);
    let role = parts.next().unwrap_or("USER").to_string();
    let user_id = parts.next().and_then(|id| id.parse().ok()).unwrap_or(0);

    fake.token_ttl_secs.store(3600, Ordering::SeqCst);
    envelope(fake.issue_tokens(user_id, &role))
}

fn matches(record: &Value, field: &str, wanted: Option<&String>) -> bool {
    match wanted {
        Some(wanted) => record[field]
            .as_str()
            .map(|v| v.to_lowercase().contains(&wanted.to_lowercase()))
            .unwrap_or(false),
        None => true,
    }
}

async fn list_clients(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    authorized!(fake, headers, "GET /clients".to_string());
    // `name=slow` answers late with the unfiltered list
    let name = query.get("name").filter(|name| *name != "slow");
    if name.is_none() && query.contains_key("name") {
        tokio::time::sleep(Duration::from_millis(400)).await;
    }
    let clients: Vec<Value> = fake
        .clients
        .lock()
        .unwrap()
        .iter()
        .filter(|c| matches(c, "name", name))
        .filter(|c| matches(c, "email", query.get("email")))
        .cloned()
        .collect();
    envelope(Value::Array(clients))
}

fn find(records: &Mutex<Vec<Value>>, id: i64) -> Option<Value> {
    records.lock().unwrap().iter().find(|r| r["id"] == id).cloned()
}

async fn get_client(State(fake): State<Fake>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    authorized!(fake, headers, format!("GET /clients/{}", id));
    match find(&fake.clients, id) {
        Some(client) => envelope(client),
        None => message(StatusCode::NOT_FOUND, "Client not found"),
    }
}

async fn create_client(State(fake): State<Fake>, headers: HeaderMap, Json(mut body): Json<Value>) -> Response {
    authorized!(fake, headers, "POST /clients".to_string());
    if fake.clients.lock().unwrap().iter().any(|c| c["email"] == body["email"]) {
        return message(StatusCode::CONFLICT, "Email already used");
    }
    body["id"] = json!(fake.next_id.fetch_add(1, Ordering::SeqCst));
    fake.clients.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(json!({"data": body, "message": "Client created"}))).into_response()
}

async fn update_client(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(mut body): Json<Value>,
) -> Response {
    authorized!(fake, headers, format!("PUT /clients/{}", id));
    let mut clients = fake.clients.lock().unwrap();
    match clients.iter_mut().find(|c| c["id"] == id) {
        Some(client) => {
            body["id"] = json!(id);
            *client = body;
            Json(json!({"message": "Client updated"})).into_response()
        }
        None => message(StatusCode::NOT_FOUND, "Client not found"),
    }
}

async fn delete_client(State(fake): State<Fake>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    authorized!(fake, headers, format!("DELETE /clients/{}", id));
    fake.clients.lock().unwrap().retain(|c| c["id"] != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_products(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    authorized!(fake, headers, "GET /products".to_string());
    let min = query.get("minPrice").and_then(|v| v.parse::<f64>().ok());
    let products: Vec<Value> = fake
        .products
        .lock()
        .unwrap()
        .iter()
        .filter(|p| matches(p, "name", query.get("search")))
        .filter(|p| min.map(|m| p["price"].as_f64().unwrap_or(0.0) >= m).unwrap_or(true))
        .cloned()
        .collect();
    envelope(Value::Array(products))
}

async fn list_invoices(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    authorized!(fake, headers, "GET /invoices".to_string());
    let invoices: Vec<Value> = fake
        .invoices
        .lock()
        .unwrap()
        .iter()
        .filter(|i| matches(i, "status", query.get("status")))
        .filter(|i| matches(i, "clientName", query.get("clientName")))
        .cloned()
        .collect();
    envelope(Value::Array(invoices))
}

async fn get_invoice(State(fake): State<Fake>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    authorized!(fake, headers, format!("GET /invoices/{}", id));
    match find(&fake.invoices, id) {
        Some(invoice) => envelope(invoice),
        None => message(StatusCode::NOT_FOUND, "Invoice not found"),
    }
}

async fn create_invoice(State(fake): State<Fake>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    authorized!(fake, headers, "POST /invoices".to_string());
    let id = fake.next_id.fetch_add(1, Ordering::SeqCst);
    let invoice = json!({"id": id, "invoiceNumber": format!("INV-{:03}", id),
                         "issueDate": "2025-03-01", "dueDate": "2025-03-01", "status": "PENDING",
                         "paymentTerms": body["paymentTerms"], "totalAmount": 0.0,
                         "clientId": body["clientId"], "items": []});
    fake.invoices.lock().unwrap().push(invoice);
    (StatusCode::CREATED, Json(json!({"message": "Invoice created"}))).into_response()
}

async fn update_status(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Path((id, status)): Path<(i64, String)>,
) -> Response {
    authorized!(fake, headers, format!("PATCH /invoices/{}/status/{}", id, status));
    let mut invoices = fake.invoices.lock().unwrap();
    match invoices.iter_mut().find(|i| i["id"] == id) {
        Some(invoice) => {
            invoice["status"] = json!(status);
            Json(json!({"message": "Status updated"})).into_response()
        }
        None => message(StatusCode::NOT_FOUND, "Invoice not found"),
    }
}

async fn send_email(State(fake): State<Fake>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    authorized!(fake, headers, format!("POST /invoices/{}/send-email", id));
    Json(json!({"message": format!("Invoice {} sent", id)})).into_response()
}

async fn get_profile(State(fake): State<Fake>, headers: HeaderMap) -> Response {
    authorized!(fake, headers, "GET /user/profile".to_string());
    envelope(fake.profile.lock().unwrap().clone())
}

async fn put_profile(State(fake): State<Fake>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    authorized!(fake, headers, "PUT /user/profile".to_string());
    *fake.profile.lock().unwrap() = body;
    Json(json!({"message": "Profile updated"})).into_response()
}

async fn register_request(State(fake): State<Fake>, Json(body): Json<Value>) -> Response {
    fake.record("POST /user/register/request".to_string());
    if body["email"] == ADMIN_EMAIL {
        return message(StatusCode::BAD_REQUEST, "Email already registered");
    }
    Json(json!({"message": "Verification link sent"})).into_response()
}

async fn register_complete(
    State(fake): State<Fake>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    fake.record("PUT /user/register/complete".to_string());
    match query.get("verificationToken").map(String::as_str) {
        Some("valid-token") => Json(json!({"message": "Registered"})).into_response(),
        _ => message(StatusCode::BAD_REQUEST, "Invalid verification token"),
    }
}

fn fake_router(fake: Fake) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/products", get(list_products))
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}/status/{status}", patch(update_status))
        .route("/invoices/{id}/send-email", post(send_email))
        .route("/user/profile", get(get_profile).put(put_profile))
        .route("/user/register/request", post(register_request))
        .route("/user/register/complete", axum::routing::put(register_complete))
        .with_state(fake)
}

/// A running fake API plus a front end pointed at it
pub struct TestEnv {
    pub fake: Fake,
    pub state: SharedState,
    pub base_url: String,
    pub http: reqwest::Client,
}

impl TestEnv {
    pub async fn start() -> Self {
        let fake = Arc::new(FakeApi::new());
        let api_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let api_addr = api_listener.local_addr().unwrap();
        let router = fake_router(fake.clone());
        tokio::spawn(async move {
            let _ = axum::serve(api_listener, router).await;
        });

        let mut config = Config::default();
        config.api.base_url = format!("http://{}", api_addr);
        config.api.timeout_secs = Some(5);
        let state = Arc::new(AppState::new(config).unwrap());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let serve_state = state.clone();
        tokio::spawn(async move {
            let _ = serve(listener, serve_state).await;
        });

        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            fake,
            state,
            base_url: format!("http://{}", addr),
            http,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sign in; returns the response and the `Cookie` header value to reuse
    pub async fn login(&self, email: &str, password: &str) -> (reqwest::Response, Option<String>) {
        let response = self
            .http
            .post(self.url("/login"))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .unwrap();
        let cookie = response
            .headers()
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        (response, cookie)
    }

    pub async fn login_cookie(&self, email: &str) -> String {
        let (response, cookie) = self.login(email, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        cookie.expect("login should set a session cookie")
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> reqwest::Response {
        let mut request = self.http.get(self.url(path));
        if let Some(cookie) = cookie {
            request = request.header("cookie", cookie);
        }
        request.send().await.unwrap()
    }

    pub async fn post_json(&self, path: &str, cookie: &str, body: Value) -> reqwest::Response {
        self.http
            .post(self.url(path))
            .header("cookie", cookie)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn post(&self, path: &str, cookie: &str) -> reqwest::Response {
        self.http
            .post(self.url(path))
            .header("cookie", cookie)
            .send()
            .await
            .unwrap()
    }
}

pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Session id carried by a `name=value` cookie pair
pub fn session_id(cookie: &str) -> String {
    cookie.split_once('=').map(|(_, id)| id.to_string()).unwrap_or_default()
}
