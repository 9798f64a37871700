//! In-process fake of the restaurant backend
//!
//! Mirrors the REST surface the client consumes, keeps everything in a
//! mutex-guarded state, records every request and can be told to fail
//! specific calls.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use bistro_client::{
    BistroClient, Category, CredentialStore, DiningTable, MemoryCredentialStore, MenuItem,
    OneshotHttpClient, Order, OrderStatus, Session, User, UserRole,
};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::client::RegisterRequest;
use shared::models::{MenuItemCreate, OrderCreate, OrderItem, OrderStatusUpdate};

pub const ADMIN_EMAIL: &str = "admin@bistro.test";
pub const WAITER_EMAIL: &str = "waiter@bistro.test";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub bearer: Option<String>,
}

#[derive(Debug, Default)]
pub struct BackendState {
    pub users: Vec<(User, String)>,
    pub tokens: HashMap<String, i64>,
    pub menu: Vec<MenuItem>,
    pub orders: Vec<Order>,
    pub tables: Vec<DiningTable>,
    pub next_id: i64,

    pub fail_order_create: bool,
    pub fail_active_orders: bool,
    pub fail_status_update: bool,
    pub fail_table_updates: bool,
    pub fail_table_list: bool,

    pub requests: Vec<RecordedRequest>,
    pub created_orders: Vec<OrderCreate>,
    pub table_updates: Vec<(i64, Value)>,
}

impl BackendState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<User> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        let user_id = self.tokens.get(token)?;
        self.users
            .iter()
            .find(|(u, _)| u.id == *user_id)
            .map(|(u, _)| u.clone())
    }

    pub fn order(&self, id: i64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn table(&self, id: i64) -> Option<&DiningTable> {
        self.tables.iter().find(|t| t.id == id)
    }

    /// Every request as `METHOD path`, oldest first
    pub fn request_log(&self) -> Vec<String> {
        self.requests
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    /// Requests excluding the table/order list polls
    pub fn writes(&self) -> Vec<String> {
        self.requests
            .iter()
            .filter(|r| r.method != "GET")
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

pub type SharedState = Arc<Mutex<BackendState>>;

#[derive(Clone)]
pub struct FakeBackend {
    state: SharedState,
}

impl FakeBackend {
    /// Seeded with an admin and a waiter, four menu items and three tables
    pub fn new() -> Self {
        let mut state = BackendState {
            next_id: 100,
            ..Default::default()
        };

        let admin = user(1, ADMIN_EMAIL, UserRole::Admin);
        let waiter = user(2, WAITER_EMAIL, UserRole::Waiter);
        state.users.push((admin, PASSWORD.to_string()));
        state.users.push((waiter, PASSWORD.to_string()));

        state.menu = vec![
            menu_item(1, "Burger", 10.0, Category::MainCourse),
            menu_item(2, "Lemonade", 5.0, Category::Beverage),
            menu_item(3, "Soup", 6.5, Category::Appetizer),
            menu_item(4, "Tiramisu", 7.25, Category::Dessert),
        ];

        state.tables = (1..=3)
            .map(|n| DiningTable {
                id: n,
                number: n as i32,
                capacity: 4,
                is_occupied: false,
                current_order_id: None,
            })
            .collect();

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/token", post(login))
            .route("/users/me", get(me))
            .route("/users/", post(register))
            .route("/menu/items", get(list_menu).post(create_menu_item))
            .route(
                "/menu/items/{id}",
                get(get_menu_item).delete(delete_menu_item),
            )
            .route("/orders", get(list_orders).post(create_order))
            .route("/orders/active", get(active_orders))
            .route("/orders/{id}", get(get_order))
            .route("/orders/{id}/status", put(update_status))
            .route("/tables", get(list_tables))
            .route("/tables/{id}", get(get_table).put(update_table))
            .layer(middleware::from_fn_with_state(self.state.clone(), record))
            .with_state(self.state.clone())
    }

    pub fn client(&self) -> BistroClient<OneshotHttpClient> {
        BistroClient::in_process(self.router())
    }

    pub fn client_with_store(
        &self,
        store: Arc<dyn CredentialStore>,
    ) -> BistroClient<OneshotHttpClient> {
        let http = OneshotHttpClient::new(self.router(), Session::new());
        BistroClient::new(http, store)
    }

    /// Client already logged in as `email`
    pub async fn logged_in(&self, email: &str) -> BistroClient<OneshotHttpClient> {
        let client = self.client_with_store(Arc::new(MemoryCredentialStore::new()));
        client.auth().login(email, PASSWORD).await.unwrap();
        client
    }

    /// Insert an order directly into the backend
    pub fn seed_order(&self, table_id: i64, status: OrderStatus) -> Order {
        let mut state = self.state();
        let id = state.next_id();
        let order = Order {
            id,
            table_id,
            status,
            total_amount: 10.0,
            created_at: None,
            updated_at: None,
            items: vec![OrderItem {
                id: id * 10,
                order_id: id,
                menu_item_id: 1,
                quantity: 1,
                price: 10.0,
            }],
        };
        state.orders.push(order.clone());
        order
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }
}

pub fn user(id: i64, email: &str, role: UserRole) -> User {
    User {
        id,
        email: email.to_string(),
        full_name: format!("User {}", id),
        role,
        is_active: true,
    }
}

pub fn menu_item(id: i64, name: &str, price: f64, category: Category) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        description: String::new(),
        price,
        category,
        is_available: true,
        image_url: None,
    }
}

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn detail(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "detail": message })))
}

fn unauthorized() -> ApiError {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

async fn record(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().unwrap().requests.push(RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        bearer,
    });
    next.run(request).await
}

fn require_user(state: &BackendState, headers: &HeaderMap) -> Result<User, ApiError> {
    state.user_for(headers).ok_or_else(unauthorized)
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<SharedState>, Form(form): Form<LoginForm>) -> ApiResult<Value> {
    let mut state = state.lock().unwrap();
    let user_id = state
        .users
        .iter()
        .find(|(u, p)| u.email == form.username && *p == form.password)
        .map(|(u, _)| u.id)
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Incorrect username or password"))?;

    let token = format!("token-{}-{}", user_id, state.tokens.len());
    state.tokens.insert(token.clone(), user_id);
    let body = json!({ "access_token": token, "token_type": "bearer" });
    Ok(Json(body))
}

async fn me(State(state): State<SharedState>, headers: HeaderMap) -> ApiResult<User> {
    let state = state.lock().unwrap();
    require_user(&state, &headers).map(Json)
}

async fn register(
    State(state): State<SharedState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<User> {
    let mut state = state.lock().unwrap();
    if state.users.iter().any(|(u, _)| u.email == request.email) {
        return Err(detail(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let id = state.next_id();
    let created = User {
        id,
        email: request.email,
        full_name: request.full_name,
        role: request.role,
        is_active: true,
    };
    state.users.push((created.clone(), request.password));
    Ok(Json(created))
}

#[derive(Deserialize)]
struct MenuQuery {
    category: Option<Category>,
}

async fn list_menu(
    State(state): State<SharedState>,
    Query(query): Query<MenuQuery>,
) -> Json<Vec<MenuItem>> {
    let state = state.lock().unwrap();
    Json(
        state
            .menu
            .iter()
            .filter(|m| query.category.is_none_or(|c| m.category == c))
            .cloned()
            .collect(),
    )
}

async fn get_menu_item(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> ApiResult<MenuItem> {
    let state = state.lock().unwrap();
    state
        .menu
        .iter()
        .find(|m| m.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Menu item not found"))
}

async fn create_menu_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(item): Json<MenuItemCreate>,
) -> ApiResult<MenuItem> {
    let mut state = state.lock().unwrap();
    let caller = require_user(&state, &headers)?;
    if !caller.is_admin() {
        return Err(detail(StatusCode::FORBIDDEN, "Not enough permissions"));
    }
    let id = state.next_id();
    let created = MenuItem {
        id,
        name: item.name,
        description: item.description,
        price: item.price,
        category: item.category,
        is_available: item.is_available,
        image_url: item.image_url,
    };
    state.menu.push(created.clone());
    Ok(Json(created))
}

async fn delete_menu_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    let mut state = state.lock().unwrap();
    require_user(&state, &headers)?;
    let before = state.menu.len();
    state.menu.retain(|m| m.id != id);
    if state.menu.len() == before {
        return Err(detail(StatusCode::NOT_FOUND, "Menu item not found"));
    }
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
struct OrderQuery {
    status: Option<OrderStatus>,
}

async fn list_orders(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<OrderQuery>,
) -> ApiResult<Vec<Order>> {
    let state = state.lock().unwrap();
    require_user(&state, &headers)?;
    Ok(Json(
        state
            .orders
            .iter()
            .filter(|o| query.status.is_none_or(|s| o.status == s))
            .cloned()
            .collect(),
    ))
}

async fn active_orders(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Vec<Order>> {
    let state = state.lock().unwrap();
    require_user(&state, &headers)?;
    if state.fail_active_orders {
        return Err(detail(
            StatusCode::SERVICE_UNAVAILABLE,
            "Database unavailable",
        ));
    }
    let active = state
        .orders
        .iter()
        .filter(|o| o.is_active())
        .cloned()
        .collect();
    Ok(Json(active))
}

async fn get_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Order> {
    let state = state.lock().unwrap();
    require_user(&state, &headers)?;
    state
        .order(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Order not found"))
}

async fn create_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<OrderCreate>,
) -> ApiResult<Order> {
    let mut state = state.lock().unwrap();
    require_user(&state, &headers)?;
    if state.fail_order_create {
        return Err(detail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not create order",
        ));
    }

    let id = state.next_id();
    let mut items = Vec::with_capacity(request.items.len());
    for line in &request.items {
        let item_id = state.next_id();
        items.push(OrderItem {
            id: item_id,
            order_id: id,
            menu_item_id: line.menu_item_id,
            quantity: line.quantity,
            price: line.price,
        });
    }
    let order = Order {
        id,
        table_id: request.table_id,
        status: request.status,
        total_amount: request.total_amount,
        created_at: Some("2024-05-01T12:00:00".to_string()),
        updated_at: None,
        items,
    };
    state.created_orders.push(request);
    state.orders.push(order.clone());
    Ok(Json(order))
}

async fn update_status(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(update): Json<OrderStatusUpdate>,
) -> ApiResult<Order> {
    let mut state = state.lock().unwrap();
    require_user(&state, &headers)?;
    if state.fail_status_update {
        return Err(detail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Status update failed",
        ));
    }
    let order = state
        .orders
        .iter_mut()
        .find(|o| o.id == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Order not found"))?;
    order.status = update.status;
    Ok(Json(order.clone()))
}

async fn list_tables(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Vec<DiningTable>> {
    let state = state.lock().unwrap();
    require_user(&state, &headers)?;
    if state.fail_table_list {
        return Err(detail(
            StatusCode::SERVICE_UNAVAILABLE,
            "Database unavailable",
        ));
    }
    Ok(Json(state.tables.clone()))
}

async fn get_table(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<DiningTable> {
    let state = state.lock().unwrap();
    require_user(&state, &headers)?;
    state
        .table(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Table not found"))
}

async fn update_table(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(update): Json<Value>,
) -> ApiResult<DiningTable> {
    let mut state = state.lock().unwrap();
    require_user(&state, &headers)?;
    state.table_updates.push((id, update.clone()));
    if state.fail_table_updates {
        return Err(detail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Table update failed",
        ));
    }
    let table = state
        .tables
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Table not found"))?;
    if let Some(occupied) = update.get("is_occupied").and_then(Value::as_bool) {
        table.is_occupied = occupied;
    }
    if let Some(order_id) = update.get("current_order_id") {
        table.current_order_id = order_id.as_i64();
    }
    Ok(Json(table.clone()))
}
