#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use teloxide::types::ChatId;
use tokio::net::TcpListener;

use medistore::api::ApiClient;
use medistore::app::AppContext;
use medistore::db::{init_db, LocalStorage};
use medistore::forms::ShippingDetails;
use medistore::models::{LoginRequest, RegisterRequest};
use medistore::models::Role;

pub const PASSWORD: &str = "secret123";
pub const SELLER_EMAIL: &str = "seller@medistore.test";
pub const ADMIN_EMAIL: &str = "admin@medistore.test";

/// In-memory stand-in for the MediStore REST API.
#[derive(Default)]
pub struct Backend {
    users: Vec<Value>,
    passwords: HashMap<String, String>,
    tokens: HashMap<String, String>,
    categories: Vec<Value>,
    medicines: Vec<Value>,
    orders: Vec<Value>,
    reviews: Vec<Value>,
    next_id: usize,
    /// Every authenticated request answers 401 while set.
    pub revoke_tokens: bool,
    /// Status updates answer 500 while set.
    pub fail_status_updates: bool,
    /// User and medicine deletions answer 500 while set.
    pub fail_deletes: bool,
}

pub type Shared = Arc<Mutex<Backend>>;

impl Backend {
    fn seeded() -> Self {
        let mut backend = Backend::default();
        backend.users.push(json!({
            "id": "s1",
            "name": "Square Pharmacy",
            "email": SELLER_EMAIL,
            "role": "SELLER",
            "status": "ACTIVE"
        }));
        backend.users.push(json!({
            "id": "a1",
            "name": "Store Admin",
            "email": ADMIN_EMAIL,
            "role": "ADMIN",
            "status": "ACTIVE"
        }));
        for email in [SELLER_EMAIL, ADMIN_EMAIL] {
            backend
                .passwords
                .insert(email.to_string(), PASSWORD.to_string());
        }
        backend.categories = vec![
            json!({"id": "c1", "name": "Pain Relief"}),
            json!({"id": "c2", "name": "Gastrointestinal"}),
        ];
        backend.medicines = vec![
            json!({
                "id": "m1",
                "name": "Napa Extra",
                "description": "Paracetamol and caffeine",
                "price": 2.5,
                "stock": 5,
                "manufacturer": "Beximco",
                "categoryId": "c1",
                "category": {"id": "c1", "name": "Pain Relief"},
                "sellerId": "s1"
            }),
            json!({
                "id": "m2",
                "name": "Seclo 20",
                "description": "Omeprazole",
                "price": 7.0,
                "stock": 40,
                "manufacturer": "Square",
                "categoryId": "c2",
                "category": {"id": "c2", "name": "Gastrointestinal"},
                "sellerId": "s1"
            }),
        ];
        backend
    }

    fn caller(&self, headers: &HeaderMap) -> Result<Value, Response> {
        if self.revoke_tokens {
            return Err(fail(StatusCode::UNAUTHORIZED, "Token expired"));
        }
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| self.tokens.get(token))
            .and_then(|id| self.users.iter().find(|user| user["id"] == *id))
            .cloned()
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Unauthorized"))
    }

    /// Like `caller`, but answers 403 unless the caller has `role`.
    fn caller_with_role(&self, headers: &HeaderMap, role: &str) -> Result<Value, Response> {
        let user = self.caller(headers)?;
        if user["role"].as_str().map(str::to_uppercase).as_deref() != Some(role) {
            return Err(fail(StatusCode::FORBIDDEN, "Forbidden"));
        }
        Ok(user)
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    pub fn user(&self, id: &str) -> Option<Value> {
        self.users.iter().find(|u| u["id"] == id).cloned()
    }

    pub fn medicine(&self, id: &str) -> Option<Value> {
        self.medicines.iter().find(|m| m["id"] == id).cloned()
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter_map(|c| c["name"].as_str().map(str::to_string))
            .collect()
    }

    pub fn stock_of(&self, medicine_id: &str) -> u64 {
        self.medicines
            .iter()
            .find(|m| m["id"] == medicine_id)
            .and_then(|m| m["stock"].as_u64())
            .unwrap_or(0)
    }
}

fn ok(data: Value) -> Response {
    (StatusCode::OK, Json(json!({"success": true, "data": data}))).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"success": false, "message": message}))).into_response()
}

async fn sign_up(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = backend.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if backend.passwords.contains_key(&email) {
        return fail(StatusCode::BAD_REQUEST, "Email already in use");
    }
    let user = json!({
        "id": format!("u{}", backend.users.len() + 1),
        "name": body["name"],
        "email": email,
        "role": body["role"],
        "status": "active",
        "phone": body["phone"]
    });
    let password = body["password"].as_str().unwrap_or_default().to_string();
    backend.passwords.insert(email, password);
    backend.users.push(user.clone());
    ok(user)
}

async fn sign_in(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = backend.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if backend.passwords.get(email).map(String::as_str) != Some(password) {
        return fail(StatusCode::BAD_REQUEST, "Invalid email or password");
    }
    let Some(user) = backend.users.iter().find(|u| u["email"] == email).cloned() else {
        return fail(StatusCode::BAD_REQUEST, "Invalid email or password");
    };
    let token = format!("token-{}", user["id"].as_str().unwrap_or_default());
    backend
        .tokens
        .insert(token.clone(), user["id"].as_str().unwrap_or_default().to_string());
    ok(json!({"token": token, "user": user}))
}

async fn me(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    let backend = backend.lock().unwrap();
    match backend.caller(&headers) {
        Ok(user) => ok(user),
        Err(response) => response,
    }
}

async fn list_medicines(
    State(backend): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let backend = backend.lock().unwrap();
    let search = query.get("search").map(|s| s.to_lowercase());
    let found: Vec<Value> = backend
        .medicines
        .iter()
        .filter(|m| match &search {
            Some(search) => m["name"]
                .as_str()
                .is_some_and(|name| name.to_lowercase().contains(search.as_str())),
            None => true,
        })
        .filter(|m| match query.get("categoryId") {
            Some(category) => m["categoryId"] == *category,
            None => true,
        })
        .cloned()
        .collect();
    ok(Value::Array(found))
}

async fn get_medicine(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    let backend = backend.lock().unwrap();
    match backend.medicines.iter().find(|m| m["id"] == id) {
        Some(medicine) => ok(medicine.clone()),
        None => fail(StatusCode::NOT_FOUND, "Medicine not found"),
    }
}

async fn list_categories(State(backend): State<Shared>) -> Response {
    ok(Value::Array(backend.lock().unwrap().categories.clone()))
}

async fn medicine_reviews(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    let backend = backend.lock().unwrap();
    let reviews: Vec<Value> = backend
        .reviews
        .iter()
        .filter(|r| r["medicineId"] == id)
        .cloned()
        .collect();
    ok(Value::Array(reviews))
}

async fn create_review(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    let author = match backend.caller(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if backend.medicine(body["medicineId"].as_str().unwrap_or_default()).is_none() {
        return fail(StatusCode::NOT_FOUND, "Medicine not found");
    }
    let review = json!({
        "id": backend.fresh_id("r"),
        "medicineId": body["medicineId"],
        "userId": author["id"],
        "rating": body["rating"],
        "comment": body["comment"],
        "createdAt": Utc::now().to_rfc3339(),
        "user": {"name": author["name"]}
    });
    backend.reviews.push(review.clone());
    ok(review)
}

async fn update_me(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    let caller = match backend.caller(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let Some(user) = backend.users.iter_mut().find(|u| u["id"] == caller["id"]) else {
        return fail(StatusCode::NOT_FOUND, "User not found");
    };
    for field in ["name", "phone", "address", "photo"] {
        if let Some(value) = body.get(field) {
            user[field] = value.clone();
        }
    }
    ok(user.clone())
}

async fn admin_users(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    let backend = backend.lock().unwrap();
    if let Err(response) = backend.caller_with_role(&headers, "ADMIN") {
        return response;
    }
    ok(Value::Array(backend.users.clone()))
}

async fn update_user_status(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    if let Err(response) = backend.caller_with_role(&headers, "ADMIN") {
        return response;
    }
    match backend.users.iter_mut().find(|u| u["id"] == id) {
        Some(user) => {
            user["status"] = body["status"].clone();
            ok(user.clone())
        }
        None => fail(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn delete_user(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut backend = backend.lock().unwrap();
    if let Err(response) = backend.caller_with_role(&headers, "ADMIN") {
        return response;
    }
    if backend.fail_deletes {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    let before = backend.users.len();
    backend.users.retain(|u| u["id"] != id);
    if backend.users.len() == before {
        return fail(StatusCode::NOT_FOUND, "User not found");
    }
    ok(json!({"id": id}))
}

async fn admin_orders(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    let backend = backend.lock().unwrap();
    if let Err(response) = backend.caller_with_role(&headers, "ADMIN") {
        return response;
    }
    ok(Value::Array(backend.orders.clone()))
}

async fn create_category(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    if let Err(response) = backend.caller_with_role(&headers, "ADMIN") {
        return response;
    }
    if backend.categories.iter().any(|c| c["name"] == body["name"]) {
        return fail(StatusCode::BAD_REQUEST, "Category already exists");
    }
    let category = json!({
        "id": backend.fresh_id("c"),
        "name": body["name"],
        "description": body.get("description").cloned().unwrap_or(Value::Null)
    });
    backend.categories.push(category.clone());
    ok(category)
}

async fn update_category(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    if let Err(response) = backend.caller_with_role(&headers, "ADMIN") {
        return response;
    }
    match backend.categories.iter_mut().find(|c| c["id"] == id) {
        Some(category) => {
            category["name"] = body["name"].clone();
            ok(category.clone())
        }
        None => fail(StatusCode::NOT_FOUND, "Category not found"),
    }
}

async fn delete_category(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut backend = backend.lock().unwrap();
    if let Err(response) = backend.caller_with_role(&headers, "ADMIN") {
        return response;
    }
    if backend.medicines.iter().any(|m| m["categoryId"] == id) {
        return fail(StatusCode::BAD_REQUEST, "Category still has medicines");
    }
    backend.categories.retain(|c| c["id"] != id);
    ok(json!({"id": id}))
}

async fn seller_medicines(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    let backend = backend.lock().unwrap();
    let seller = match backend.caller_with_role(&headers, "SELLER") {
        Ok(user) => user,
        Err(response) => return response,
    };
    let own: Vec<Value> = backend
        .medicines
        .iter()
        .filter(|m| m["sellerId"] == seller["id"])
        .cloned()
        .collect();
    ok(Value::Array(own))
}

fn medicine_from(backend: &Backend, id: &str, seller_id: &Value, body: &Value) -> Value {
    let category = backend
        .categories
        .iter()
        .find(|c| c["id"] == body["categoryId"])
        .cloned()
        .unwrap_or(Value::Null);
    json!({
        "id": id,
        "name": body["name"],
        "description": body["description"],
        "price": body["price"],
        "stock": body["stock"],
        "manufacturer": body["manufacturer"],
        "categoryId": body["categoryId"],
        "category": category,
        "sellerId": seller_id,
        "image": body.get("image").cloned().unwrap_or(Value::Null)
    })
}

async fn create_medicine(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    let seller = match backend.caller_with_role(&headers, "SELLER") {
        Ok(user) => user,
        Err(response) => return response,
    };
    let id = backend.fresh_id("m");
    let medicine = medicine_from(&backend, &id, &seller["id"], &body);
    backend.medicines.push(medicine.clone());
    ok(medicine)
}

async fn update_medicine(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    let seller = match backend.caller_with_role(&headers, "SELLER") {
        Ok(user) => user,
        Err(response) => return response,
    };
    let Some(index) = backend
        .medicines
        .iter()
        .position(|m| m["id"] == id && m["sellerId"] == seller["id"])
    else {
        return fail(StatusCode::NOT_FOUND, "Medicine not found");
    };
    let medicine = medicine_from(&backend, &id, &seller["id"], &body);
    backend.medicines[index] = medicine.clone();
    ok(medicine)
}

async fn delete_medicine(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut backend = backend.lock().unwrap();
    let seller = match backend.caller_with_role(&headers, "SELLER") {
        Ok(user) => user,
        Err(response) => return response,
    };
    if backend.fail_deletes {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    let before = backend.medicines.len();
    backend
        .medicines
        .retain(|m| !(m["id"] == id && m["sellerId"] == seller["id"]));
    if backend.medicines.len() == before {
        return fail(StatusCode::NOT_FOUND, "Medicine not found");
    }
    ok(json!({"id": id}))
}

async fn create_order(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    let customer = match backend.caller(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let requested = body["items"].as_array().cloned().unwrap_or_default();
    let mut items = Vec::new();
    let mut total = 0.0;
    for item in &requested {
        let quantity = item["quantity"].as_u64().unwrap_or(0);
        let Some(medicine) = backend
            .medicines
            .iter_mut()
            .find(|m| m["id"] == item["medicineId"])
        else {
            return fail(StatusCode::NOT_FOUND, "Medicine not found");
        };
        let stock = medicine["stock"].as_u64().unwrap_or(0);
        if stock < quantity {
            return fail(StatusCode::BAD_REQUEST, "Insufficient stock");
        }
        medicine["stock"] = json!(stock - quantity);
        let price = medicine["price"].as_f64().unwrap_or(0.0);
        total += price * quantity as f64;
        items.push(json!({
            "medicineId": medicine["id"],
            "sellerId": medicine["sellerId"],
            "quantity": quantity,
            "price": price,
            "medicine": {"name": medicine["name"]}
        }));
    }

    let order = json!({
        "id": format!("o{}", backend.orders.len() + 1),
        "customerId": customer["id"],
        "items": items,
        "status": "PLACED",
        "shippingName": body["shippingName"],
        "shippingAddress": body["shippingAddress"],
        "shippingPhone": body["shippingPhone"],
        "paymentMethod": "COD",
        "totalAmount": total,
        "createdAt": Utc::now().to_rfc3339()
    });
    backend.orders.push(order.clone());
    ok(order)
}

async fn customer_orders(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    let backend = backend.lock().unwrap();
    let customer = match backend.caller(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let orders: Vec<Value> = backend
        .orders
        .iter()
        .filter(|o| o["customerId"] == customer["id"])
        .cloned()
        .collect();
    ok(Value::Array(orders))
}

async fn seller_orders(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    let backend = backend.lock().unwrap();
    let seller = match backend.caller(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let orders: Vec<Value> = backend
        .orders
        .iter()
        .filter(|o| {
            o["items"]
                .as_array()
                .is_some_and(|items| items.iter().any(|i| i["sellerId"] == seller["id"]))
        })
        .cloned()
        .collect();
    ok(Value::Array(orders))
}

async fn update_order_status(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    if let Err(response) = backend.caller(&headers) {
        return response;
    }
    if backend.fail_status_updates {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    match backend.orders.iter_mut().find(|o| o["id"] == id) {
        Some(order) => {
            order["status"] = body["status"].clone();
            ok(order.clone())
        }
        None => fail(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn cancel_order(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut backend = backend.lock().unwrap();
    let customer = match backend.caller(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let Some(order) = backend
        .orders
        .iter_mut()
        .find(|o| o["id"] == id && o["customerId"] == customer["id"])
    else {
        return fail(StatusCode::NOT_FOUND, "Order not found");
    };
    if order["status"] != "PLACED" && order["status"] != "placed" {
        return fail(StatusCode::BAD_REQUEST, "Only placed orders can be cancelled");
    }
    order["status"] = json!("CANCELLED");
    ok(order.clone())
}

fn routes() -> Router<Shared> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/me", get(me).put(update_me))
        .route("/medicines", get(list_medicines))
        .route("/medicines/{id}", get(get_medicine))
        .route("/categories", get(list_categories))
        .route("/reviews", post(create_review))
        .route("/reviews/medicine/{id}", get(medicine_reviews))
        .route("/orders", post(create_order).get(customer_orders))
        .route("/orders/{id}/cancel", patch(cancel_order))
        .route("/seller/orders", get(seller_orders))
        .route("/seller/orders/{id}/status", patch(update_order_status))
        .route("/seller/medicines", get(seller_medicines).post(create_medicine))
        .route(
            "/seller/medicines/{id}",
            put(update_medicine).delete(delete_medicine),
        )
        .route("/admin/users", get(admin_users))
        .route("/admin/users/{id}", delete(delete_user))
        .route("/admin/users/{id}/status", patch(update_user_status))
        .route("/admin/orders", get(admin_orders))
        .route("/admin/orders/{id}/status", patch(update_order_status))
        .route("/admin/categories", post(create_category))
        .route(
            "/admin/categories/{id}",
            put(update_category).delete(delete_category),
        )
}

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api/v1", addr)
}

pub struct TestApp {
    pub ctx: AppContext,
    pub backend: Shared,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let backend: Shared = Arc::new(Mutex::new(Backend::seeded()));
        let router = Router::new()
            .nest("/api/v1", routes())
            .with_state(backend.clone());
        let base_url = serve(router).await;

        let api = ApiClient::new(&base_url, Duration::from_secs(5)).unwrap();
        let pool = init_db("sqlite::memory:").await.unwrap();
        let ctx = AppContext::new(api, LocalStorage::new(pool), 5);
        TestApp { ctx, backend }
    }

    /// Registers and signs in a fresh customer on `chat`.
    pub async fn customer(&self, chat: ChatId, email: &str) {
        medistore::services::account::register(
            &self.ctx,
            chat,
            RegisterRequest {
                name: "Mina Rahman".into(),
                email: email.into(),
                password: PASSWORD.into(),
                role: Role::Customer,
                phone: Some("01812345678".into()),
            },
        )
        .await
        .unwrap();
    }

    /// Signs `chat` in with one of the seeded staff accounts.
    pub async fn staff(&self, chat: ChatId, email: &str) {
        medistore::services::account::login(
            &self.ctx,
            chat,
            LoginRequest {
                email: email.into(),
                password: PASSWORD.into(),
            },
        )
        .await
        .unwrap();
    }

    pub fn backend(&self) -> std::sync::MutexGuard<'_, Backend> {
        self.backend.lock().unwrap()
    }
}

pub fn shipping() -> ShippingDetails {
    ShippingDetails {
        name: "Mina Rahman".into(),
        address: "12 Lake Road, Dhaka".into(),
        phone: "01812345678".into(),
    }
}
