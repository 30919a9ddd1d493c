//! In-memory stand-in for the Aircall REST API.
//!
//! Serves the `/v1` endpoints the client covers from seeded data, enforces
//! basic or bearer authentication with fixed mock credentials, and paginates
//! list endpoints the way Aircall does.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const MOCK_APP_ID: &str = "mock-app-id";
pub const MOCK_APP_SECRET: &str = "mock-app-secret";
pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";

const DEFAULT_PER_PAGE: u64 = 20;
const MAX_PER_PAGE: u64 = 50;
const SEED_TIMESTAMP: &str = "2024-01-01T00:00:00.000Z";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Meta {
    pub count: u64,
    pub total: u64,
    pub current_page: u64,
    pub per_page: u64,
    pub next_page_link: Option<String>,
    pub previous_page_link: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub users_count: u64,
    pub numbers_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub direct_link: String,
    pub name: String,
    pub email: String,
    pub available: bool,
    pub availability_status: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Number {
    pub id: u64,
    pub direct_link: String,
    pub name: String,
    pub digits: String,
    pub country: String,
    pub time_zone: String,
    pub open: bool,
    pub users: Vec<User>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Call {
    pub id: u64,
    pub direct_link: String,
    pub direction: String,
    pub status: String,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub duration: Option<u64>,
    pub raw_digits: String,
    pub archived: bool,
    pub user: Option<User>,
    pub assigned_to: Option<User>,
    pub number: Option<Number>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub id: Option<u64>,
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub direct_link: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub information: Option<String>,
    pub is_shared: bool,
    pub phone_numbers: Vec<ContactInfo>,
    pub emails: Vec<ContactInfo>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Webhook {
    pub webhook_id: String,
    pub direct_link: String,
    pub created_at: String,
    pub custom_name: Option<String>,
    pub url: String,
    pub active: bool,
    pub token: String,
    pub events: Vec<String>,
}

#[derive(Deserialize)]
pub struct CreateContact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub information: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<ContactInfo>,
    #[serde(default)]
    pub emails: Vec<ContactInfo>,
}

#[derive(Deserialize)]
pub struct WebhookInput {
    pub custom_name: Option<String>,
    pub url: Option<String>,
    pub events: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct TransferCall {
    pub user_id: u64,
}

#[derive(Deserialize)]
pub struct LinkCall {
    pub link: String,
}

#[derive(Deserialize)]
pub struct InsightCards {
    pub contents: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Everything the mock serves.
#[derive(Debug)]
pub struct Store {
    pub company: Company,
    pub users: BTreeMap<u64, User>,
    pub numbers: BTreeMap<u64, Number>,
    pub calls: BTreeMap<u64, Call>,
    pub contacts: BTreeMap<u64, Contact>,
    pub webhooks: BTreeMap<String, Webhook>,
    next_id: u64,
}

impl Store {
    /// Two users, two numbers, three calls, two contacts and one webhook.
    pub fn seeded() -> Self {
        let ada = user(1, "Ada Lovelace", "ada@example.com", true);
        let grace = user(2, "Grace Hopper", "grace@example.com", false);

        let support = Number {
            id: 10,
            direct_link: link("numbers", 10),
            name: "Support".to_string(),
            digits: "+33 1 00 00 00 00".to_string(),
            country: "FR".to_string(),
            time_zone: "Europe/Paris".to_string(),
            open: true,
            users: vec![ada.clone(), grace.clone()],
        };
        let sales = Number {
            id: 11,
            direct_link: link("numbers", 11),
            name: "Sales".to_string(),
            digits: "+1 555-0100".to_string(),
            country: "US".to_string(),
            time_zone: "America/New_York".to_string(),
            open: false,
            users: vec![grace.clone()],
        };

        let calls = [
            call(100, "inbound", &ada, &support, 1_700_000_000, Some(62)),
            call(101, "outbound", &grace, &sales, 1_700_000_600, Some(15)),
            call(102, "inbound", &ada, &support, 1_700_001_200, None),
        ];

        let contacts = [
            Contact {
                id: 200,
                direct_link: link("contacts", 200),
                first_name: Some("Alan".to_string()),
                last_name: Some("Turing".to_string()),
                company_name: Some("Bletchley".to_string()),
                information: None,
                is_shared: true,
                phone_numbers: vec![contact_info(1, "Work", "+44 20 7946 0000")],
                emails: vec![contact_info(2, "Work", "alan@example.com")],
            },
            Contact {
                id: 201,
                direct_link: link("contacts", 201),
                first_name: Some("Katherine".to_string()),
                last_name: Some("Johnson".to_string()),
                company_name: None,
                information: Some("Prefers mornings".to_string()),
                is_shared: false,
                phone_numbers: vec![contact_info(3, "Mobile", "+1 555-0199")],
                emails: Vec::new(),
            },
        ];

        let webhook = Webhook {
            webhook_id: "wh-300".to_string(),
            direct_link: "https://api.aircall.io/v1/webhooks/wh-300".to_string(),
            created_at: SEED_TIMESTAMP.to_string(),
            custom_name: Some("crm-sync".to_string()),
            url: "https://crm.example.com/aircall".to_string(),
            active: true,
            token: "token-300".to_string(),
            events: vec!["call.created".to_string(), "call.ended".to_string()],
        };

        Self {
            company: Company {
                name: "Acme Telephony".to_string(),
                users_count: 2,
                numbers_count: 2,
            },
            users: [ada, grace].into_iter().map(|u| (u.id, u)).collect(),
            numbers: [support, sales].into_iter().map(|n| (n.id, n)).collect(),
            calls: calls.into_iter().map(|c| (c.id, c)).collect(),
            contacts: contacts.into_iter().map(|c| (c.id, c)).collect(),
            webhooks: BTreeMap::from([(webhook.webhook_id.clone(), webhook)]),
            next_id: 1000,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn link(resource: &str, id: u64) -> String {
    format!("https://api.aircall.io/v1/{resource}/{id}")
}

fn user(id: u64, name: &str, email: &str, available: bool) -> User {
    User {
        id,
        direct_link: link("users", id),
        name: name.to_string(),
        email: email.to_string(),
        available,
        availability_status: if available { "available" } else { "unavailable" }.to_string(),
        created_at: SEED_TIMESTAMP.to_string(),
    }
}

fn call(id: u64, direction: &str, user: &User, number: &Number, started_at: i64, duration: Option<u64>) -> Call {
    Call {
        id,
        direct_link: link("calls", id),
        direction: direction.to_string(),
        status: if duration.is_some() { "done" } else { "answered" }.to_string(),
        started_at,
        ended_at: duration.map(|d| started_at + d as i64),
        duration,
        raw_digits: "+44 20 7946 0000".to_string(),
        archived: false,
        user: Some(user.clone()),
        assigned_to: None,
        number: Some(Number {
            users: Vec::new(),
            ..number.clone()
        }),
    }
}

fn contact_info(id: u64, label: &str, value: &str) -> ContactInfo {
    ContactInfo {
        id: Some(id),
        label: label.to_string(),
        value: value.to_string(),
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    let api = Router::new()
        .route("/ping", get(ping))
        .route("/company", get(company))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/numbers", get(list_numbers))
        .route("/numbers/{id}", get(get_number))
        .route("/calls", get(list_calls))
        .route("/calls/{id}", get(get_call))
        .route("/calls/{id}/transfers", post(transfer_call))
        .route("/calls/{id}/link", post(link_call))
        .route("/calls/{id}/insight_cards", post(create_insight_cards))
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/search", get(search_contacts))
        .route("/contacts/{id}", get(get_contact).delete(delete_contact))
        .route("/webhooks", get(list_webhooks).post(create_webhook))
        .route(
            "/webhooks/{id}",
            get(get_webhook).put(update_webhook).delete(delete_webhook),
        )
        .layer(middleware::from_fn(require_auth))
        .with_state(db);
    Router::new().nest("/v1", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_auth(request: Request, next: Next) -> Result<Response, StatusCode> {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(is_valid_authorization);
    if !authorized {
        debug!(uri = %request.uri(), "rejecting unauthenticated request");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

/// Accepts `Bearer MOCK_ACCESS_TOKEN` or basic auth for
/// `MOCK_APP_ID:MOCK_APP_SECRET`.
pub fn is_valid_authorization(value: &str) -> bool {
    if let Some(token) = value.strip_prefix("Bearer ") {
        return token == MOCK_ACCESS_TOKEN;
    }
    value
        .strip_prefix("Basic ")
        .and_then(|encoded| STANDARD.decode(encoded).ok())
        .is_some_and(|decoded| decoded == format!("{MOCK_APP_ID}:{MOCK_APP_SECRET}").as_bytes())
}

/// Slice `items` to the requested page and describe it with a `Meta` block.
pub fn paginate<T>(items: Vec<T>, page: Option<u64>, per_page: Option<u64>, path: &str) -> (Meta, Vec<T>) {
    let total = items.len() as u64;
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let current_page = page.unwrap_or(1).max(1);
    let skip = (current_page - 1).saturating_mul(per_page);

    let page_items: Vec<T> = items
        .into_iter()
        .skip(skip as usize)
        .take(per_page as usize)
        .collect();

    let page_link = |page: u64| format!("/v1{path}?page={page}&per_page={per_page}");
    let meta = Meta {
        count: page_items.len() as u64,
        total,
        current_page,
        per_page,
        next_page_link: (current_page.saturating_mul(per_page) < total)
            .then(|| page_link(current_page + 1)),
        previous_page_link: (current_page > 1).then(|| page_link(current_page - 1)),
    };
    (meta, page_items)
}

async fn ping() -> Json<Value> {
    Json(json!({ "ping": "pong" }))
}

async fn company(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    Json(json!({ "company": store.company }))
}

async fn list_users(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Value> {
    let store = db.read().await;
    let (meta, users) = paginate(store.users.values().cloned().collect(), query.page, query.per_page, "/users");
    Json(json!({ "meta": meta, "users": users }))
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let user = store.users.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let numbers: Vec<&Number> = store
        .numbers
        .values()
        .filter(|n| n.users.iter().any(|u| u.id == id))
        .collect();
    let mut body = json!({ "user": user });
    body["user"]["numbers"] = json!(numbers);
    Ok(Json(body))
}

async fn list_numbers(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Value> {
    let store = db.read().await;
    let (meta, numbers) = paginate(store.numbers.values().cloned().collect(), query.page, query.per_page, "/numbers");
    Json(json!({ "meta": meta, "numbers": numbers }))
}

async fn get_number(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let number = store.numbers.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "number": number })))
}

async fn list_calls(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Value> {
    let store = db.read().await;
    let (meta, calls) = paginate(store.calls.values().cloned().collect(), query.page, query.per_page, "/calls");
    Json(json!({ "meta": meta, "calls": calls }))
}

async fn get_call(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let call = store.calls.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "call": call })))
}

async fn transfer_call(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<TransferCall>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let target = store
        .users
        .get(&input.user_id)
        .cloned()
        .ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let call = store.calls.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    call.assigned_to = Some(target);
    info!(call_id = id, user_id = input.user_id, "call transferred");
    Ok(StatusCode::NO_CONTENT)
}

async fn link_call(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<LinkCall>,
) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let call = store.calls.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    if input.link.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    Ok(Json(json!({ "call": call })))
}

async fn create_insight_cards(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<InsightCards>,
) -> Result<StatusCode, StatusCode> {
    let store = db.read().await;
    if !store.calls.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    if input.contents.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    Ok(StatusCode::CREATED)
}

async fn list_contacts(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Value> {
    let store = db.read().await;
    let (meta, contacts) = paginate(store.contacts.values().cloned().collect(), query.page, query.per_page, "/contacts");
    Json(json!({ "meta": meta, "contacts": contacts }))
}

fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

async fn search_contacts(State(db): State<Db>, Query(query): Query<SearchQuery>) -> Json<Value> {
    let store = db.read().await;
    let phone = query.phone_number.as_deref().map(digits_only);
    let email = query.email.as_deref().map(str::to_ascii_lowercase);
    let matches: Vec<Contact> = store
        .contacts
        .values()
        .filter(|c| {
            phone
                .as_ref()
                .is_none_or(|p| c.phone_numbers.iter().any(|n| digits_only(&n.value) == *p))
        })
        .filter(|c| {
            email
                .as_ref()
                .is_none_or(|e| c.emails.iter().any(|m| m.value.to_ascii_lowercase() == *e))
        })
        .cloned()
        .collect();
    let (meta, contacts) = paginate(matches, query.page, query.per_page, "/contacts/search");
    Json(json!({ "meta": meta, "contacts": contacts }))
}

async fn get_contact(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let contact = store.contacts.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "contact": contact })))
}

async fn create_contact(
    State(db): State<Db>,
    Json(input): Json<CreateContact>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    if input.phone_numbers.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let mut store = db.write().await;
    let id = store.next_id();
    let mut assign_id = |mut entry: ContactInfo| {
        entry.id = Some(store.next_id());
        entry
    };
    let phone_numbers: Vec<ContactInfo> = input.phone_numbers.into_iter().map(&mut assign_id).collect();
    let emails: Vec<ContactInfo> = input.emails.into_iter().map(&mut assign_id).collect();
    let contact = Contact {
        id,
        direct_link: link("contacts", id),
        first_name: input.first_name,
        last_name: input.last_name,
        company_name: input.company_name,
        information: input.information,
        is_shared: true,
        phone_numbers,
        emails,
    };
    store.contacts.insert(id, contact.clone());
    info!(contact_id = id, "contact created");
    Ok((StatusCode::CREATED, Json(json!({ "contact": contact }))))
}

async fn delete_contact(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store
        .contacts
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_webhooks(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Value> {
    let store = db.read().await;
    let (meta, webhooks) = paginate(store.webhooks.values().cloned().collect(), query.page, query.per_page, "/webhooks");
    Json(json!({ "meta": meta, "webhooks": webhooks }))
}

async fn get_webhook(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let webhook = store.webhooks.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "webhook": webhook })))
}

async fn create_webhook(
    State(db): State<Db>,
    Json(input): Json<WebhookInput>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let url = input.url.ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let mut store = db.write().await;
    let id = store.next_id();
    let webhook_id = format!("wh-{id}");
    let webhook = Webhook {
        webhook_id: webhook_id.clone(),
        direct_link: format!("https://api.aircall.io/v1/webhooks/{webhook_id}"),
        created_at: SEED_TIMESTAMP.to_string(),
        custom_name: input.custom_name,
        url,
        active: true,
        token: format!("token-{id}"),
        events: input.events.unwrap_or_else(|| vec!["call.created".to_string()]),
    };
    store.webhooks.insert(webhook_id.clone(), webhook.clone());
    info!(%webhook_id, "webhook created");
    Ok((StatusCode::CREATED, Json(json!({ "webhook": webhook }))))
}

async fn update_webhook(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<WebhookInput>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let webhook = store.webhooks.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(custom_name) = input.custom_name {
        webhook.custom_name = Some(custom_name);
    }
    if let Some(url) = input.url {
        webhook.url = url;
    }
    if let Some(events) = input.events {
        webhook.events = events;
    }
    Ok(Json(json!({ "webhook": webhook })))
}

async fn delete_webhook(State(db): State<Db>, Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store
        .webhooks
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
