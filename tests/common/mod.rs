//! In-process stub of the yam backend for integration tests.
//!
//! Serves the documented HTTP contract from in-memory state, issues real
//! HS256 tokens, and reports failures as `{"error": {"message": ...}}` the
//! way the real backend does. Binds an ephemeral port per test.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use jsonwebtoken::{encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{json, Value};

pub const JWT_SECRET: &str = "yam-stub-secret";

type Shared = Arc<Mutex<StubData>>;
type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

#[derive(Default)]
pub struct StubData {
    pub users: HashMap<i64, Value>,
    pub products: HashMap<i64, Value>,
    pub businesses: HashMap<i64, Value>,
    pub sales: HashMap<i64, Value>,
    pub business_sales: HashMap<i64, Value>,
    next_id: i64,
}

impl StubData {
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct StubBackend {
    pub base_url: String,
    pub state: Shared,
}

impl StubBackend {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(StubData::default()));
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub backend");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn token_for(&self, user_id: i64) -> String {
        token_for(user_id)
    }

    pub fn seed_user(&self, id: i64, username: &str, password: &str) {
        let mut data = self.state.lock().unwrap();
        data.users.insert(
            id,
            json!({
                "id": id,
                "username": username,
                "password": password,
                "firstName": "Test",
                "lastName": "User",
                "email": format!("{}@example.com", username),
            }),
        );
    }

    pub fn seed_product(&self, id: i64, user_id: i64, name: &str, price: f64, cost: f64, quantity: i64) {
        let mut data = self.state.lock().unwrap();
        data.products.insert(
            id,
            json!({
                "id": id,
                "userId": user_id,
                "name": name,
                "price": price,
                "cost": cost,
                "quantity": quantity,
                "type": "ceramics",
            }),
        );
    }

    pub fn seed_business(&self, id: i64, user_id: i64, name: &str) {
        let mut data = self.state.lock().unwrap();
        data.businesses.insert(
            id,
            json!({
                "id": id,
                "userId": user_id,
                "name": name,
                "contactInfo": "555-0100",
            }),
        );
    }

    pub fn seed_sale(&self, id: i64, product_id: i64, user_id: i64, quantity: i64, price: f64, date: &str) {
        let mut data = self.state.lock().unwrap();
        data.sales.insert(
            id,
            json!({
                "id": id,
                "productId": product_id,
                "userId": user_id,
                "quantitySold": quantity,
                "salePrice": price,
                "saleDate": date,
            }),
        );
    }

    pub fn seed_business_sale(
        &self,
        id: i64,
        business_id: i64,
        product_id: i64,
        user_id: i64,
        quantity: i64,
        price: f64,
        percentage: f64,
        date: &str,
    ) {
        let mut data = self.state.lock().unwrap();
        data.business_sales.insert(
            id,
            json!({
                "id": id,
                "businessId": business_id,
                "productId": product_id,
                "userId": user_id,
                "quantitySold": quantity,
                "salePrice": price,
                "businessPercentage": percentage,
                "saleDate": date,
            }),
        );
    }
}

/// A unique config dir per call so token stores never collide across tests.
pub fn temp_config_dir(tag: &str) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "yam-cli-test-{}-{}-{}",
        std::process::id(),
        tag,
        n
    ));
    std::fs::create_dir_all(&dir).expect("create temp config dir");
    dir
}

pub fn token_for(user_id: i64) -> String {
    encode(
        &Header::default(),
        &json!({ "id": user_id, "username": format!("user-{}", user_id) }),
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("encode stub token")
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/:id", get(get_user).patch(patch_user).delete(delete_user))
        .route("/users/:id/allSalesInfo", get(all_sales_info))
        .route("/users/:id/products", get(list_products).post(create_product))
        .route(
            "/users/:id/products/:product_id",
            get(get_product).patch(patch_product).delete(delete_product),
        )
        .route("/users/:id/businesses", get(list_businesses).post(create_business))
        .route(
            "/users/:id/businesses/:business_id",
            get(get_business).patch(patch_business).delete(delete_business),
        )
        .route("/products/:id/sales", get(list_sales).post(create_sale))
        .route(
            "/products/:id/sales/:sale_id",
            get(get_sale).patch(patch_sale).delete(delete_sale),
        )
        .route(
            "/businesses/:id/businessSales",
            get(list_business_sales).post(create_business_sale),
        )
        .route(
            "/businesses/:id/businessSales/:business_sale_id",
            get(get_business_sale)
                .patch(patch_business_sale)
                .delete(delete_business_sale),
        )
        .with_state(state)
}

fn fail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": { "message": message } })))
}

fn fail_list(status: StatusCode, messages: &[&str]) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": { "message": messages } })))
}

/// Decode the bearer token; any problem is a 401.
fn require_auth(headers: &HeaderMap) -> Result<i64, (StatusCode, Json<Value>)> {
    let raw = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;

    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Value>(
        raw,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &validation,
    )
    .map_err(|_| fail(StatusCode::UNAUTHORIZED, "Invalid token"))?;

    data.claims
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid token"))
}

fn strip_password(user: &Value) -> Value {
    let mut user = user.clone();
    if let Some(obj) = user.as_object_mut() {
        obj.remove("password");
    }
    user
}

fn merge(record: &mut Value, patch: &Value) {
    if let (Some(target), Some(source)) = (record.as_object_mut(), patch.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
}

// ----- auth -----

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResult {
    let username = body
        .get("username")
        .and_then(Value::as_str)
        .ok_or_else(|| fail_list(StatusCode::BAD_REQUEST, &["username is required"]))?
        .to_string();

    let mut data = state.lock().unwrap();
    if data
        .users
        .values()
        .any(|u| u.get("username").and_then(Value::as_str) == Some(username.as_str()))
    {
        return Err(fail(StatusCode::CONFLICT, "username already taken"));
    }

    let id = data.next_id();
    let mut user = body.clone();
    merge(&mut user, &json!({ "id": id }));
    data.users.insert(id, user);

    Ok(Json(json!({ "token": token_for(id) })))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResult {
    let username = body.get("username").and_then(Value::as_str).unwrap_or("");
    let password = body.get("password").and_then(Value::as_str).unwrap_or("");

    let data = state.lock().unwrap();
    let found = data.users.values().find(|u| {
        u.get("username").and_then(Value::as_str) == Some(username)
            && u.get("password").and_then(Value::as_str) == Some(password)
    });

    match found.and_then(|u| u.get("id").and_then(Value::as_i64)) {
        Some(id) => Ok(Json(json!({ "token": token_for(id) }))),
        None => Err(fail(StatusCode::UNAUTHORIZED, "Invalid username/password")),
    }
}

// ----- users -----

async fn get_user(State(state): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> ApiResult {
    require_auth(&headers)?;
    let data = state.lock().unwrap();
    match data.users.get(&id) {
        Some(user) => Ok(Json(json!({ "user": strip_password(user) }))),
        None => Err(fail(StatusCode::NOT_FOUND, "user not found")),
    }
}

async fn patch_user(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    match data.users.get_mut(&id) {
        Some(user) => {
            merge(user, &body);
            Ok(Json(json!({ "user": strip_password(user) })))
        }
        None => Err(fail(StatusCode::NOT_FOUND, "user not found")),
    }
}

async fn delete_user(State(state): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    match data.users.remove(&id) {
        Some(_) => Ok(Json(json!({ "deleted": id }))),
        None => Err(fail(StatusCode::NOT_FOUND, "user not found")),
    }
}

async fn all_sales_info(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult {
    require_auth(&headers)?;
    let data = state.lock().unwrap();
    let mut rows = Vec::new();

    for sale in data.sales.values() {
        if sale.get("userId").and_then(Value::as_i64) != Some(id) {
            continue;
        }
        let product_id = sale.get("productId").and_then(Value::as_i64).unwrap_or(0);
        let product = data.products.get(&product_id);
        rows.push(json!({
            "saleId": sale.get("id"),
            "productId": product_id,
            "name": product.and_then(|p| p.get("name")).cloned().unwrap_or(json!("unknown")),
            "cost": product.and_then(|p| p.get("cost")).cloned().unwrap_or(json!(0.0)),
            "quantitySold": sale.get("quantitySold"),
            "salePrice": sale.get("salePrice"),
            "saleDate": sale.get("saleDate"),
        }));
    }

    for sale in data.business_sales.values() {
        if sale.get("userId").and_then(Value::as_i64) != Some(id) {
            continue;
        }
        let product_id = sale.get("productId").and_then(Value::as_i64).unwrap_or(0);
        let business_id = sale.get("businessId").and_then(Value::as_i64).unwrap_or(0);
        let product = data.products.get(&product_id);
        let business = data.businesses.get(&business_id);
        rows.push(json!({
            "businessSaleId": sale.get("id"),
            "productId": product_id,
            "businessId": business_id,
            "name": product.and_then(|p| p.get("name")).cloned().unwrap_or(json!("unknown")),
            "cost": product.and_then(|p| p.get("cost")).cloned().unwrap_or(json!(0.0)),
            "businessName": business.and_then(|b| b.get("name")).cloned().unwrap_or(Value::Null),
            "businessPercentage": sale.get("businessPercentage"),
            "quantitySold": sale.get("quantitySold"),
            "salePrice": sale.get("salePrice"),
            "saleDate": sale.get("saleDate"),
        }));
    }

    Ok(Json(json!({ "sales": rows })))
}

// ----- products -----

async fn list_products(State(state): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> ApiResult {
    require_auth(&headers)?;
    let data = state.lock().unwrap();
    let products: Vec<&Value> = data
        .products
        .values()
        .filter(|p| p.get("userId").and_then(Value::as_i64) == Some(id))
        .collect();
    Ok(Json(json!({ "products": products })))
}

async fn create_product(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult {
    require_auth(&headers)?;
    if body.get("name").and_then(Value::as_str).is_none() {
        return Err(fail_list(StatusCode::BAD_REQUEST, &["name is required"]));
    }

    let mut data = state.lock().unwrap();
    let product_id = data.next_id();
    let mut product = body.clone();
    merge(&mut product, &json!({ "id": product_id, "userId": id }));
    if product.get("quantity").is_none() {
        merge(&mut product, &json!({ "quantity": 0 }));
    }
    data.products.insert(product_id, product.clone());
    Ok(Json(json!({ "product": product })))
}

/// Products are scoped by their owner in the path; someone else's product
/// reads as absent.
async fn get_product(
    State(state): State<Shared>,
    Path((user_id, product_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> ApiResult {
    require_auth(&headers)?;
    let data = state.lock().unwrap();
    match data.products.get(&product_id) {
        Some(product) if product.get("userId").and_then(Value::as_i64) == Some(user_id) => {
            Ok(Json(json!({ "product": product })))
        }
        _ => Err(fail(StatusCode::NOT_FOUND, "product not found")),
    }
}

async fn patch_product(
    State(state): State<Shared>,
    Path((user_id, product_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    match data.products.get_mut(&product_id) {
        Some(product) if product.get("userId").and_then(Value::as_i64) == Some(user_id) => {
            merge(product, &body);
            Ok(Json(json!({ "product": product })))
        }
        _ => Err(fail(StatusCode::NOT_FOUND, "product not found")),
    }
}

async fn delete_product(
    State(state): State<Shared>,
    Path((user_id, product_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    let owned = data
        .products
        .get(&product_id)
        .map(|p| p.get("userId").and_then(Value::as_i64) == Some(user_id))
        .unwrap_or(false);
    if !owned {
        return Err(fail(StatusCode::NOT_FOUND, "product not found"));
    }
    data.products.remove(&product_id);
    Ok(Json(json!({ "deleted": product_id })))
}

// ----- businesses -----

async fn list_businesses(State(state): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> ApiResult {
    require_auth(&headers)?;
    let data = state.lock().unwrap();
    let businesses: Vec<&Value> = data
        .businesses
        .values()
        .filter(|b| b.get("userId").and_then(Value::as_i64) == Some(id))
        .collect();
    Ok(Json(json!({ "businesses": businesses })))
}

async fn create_business(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    let business_id = data.next_id();
    let mut business = body.clone();
    merge(&mut business, &json!({ "id": business_id, "userId": id }));
    data.businesses.insert(business_id, business.clone());
    Ok(Json(json!({ "business": business })))
}

async fn get_business(
    State(state): State<Shared>,
    Path((user_id, business_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> ApiResult {
    require_auth(&headers)?;
    let data = state.lock().unwrap();
    match data.businesses.get(&business_id) {
        Some(business) if business.get("userId").and_then(Value::as_i64) == Some(user_id) => {
            Ok(Json(json!({ "business": business })))
        }
        _ => Err(fail(StatusCode::NOT_FOUND, "business not found")),
    }
}

async fn patch_business(
    State(state): State<Shared>,
    Path((user_id, business_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    match data.businesses.get_mut(&business_id) {
        Some(business) if business.get("userId").and_then(Value::as_i64) == Some(user_id) => {
            merge(business, &body);
            Ok(Json(json!({ "business": business })))
        }
        _ => Err(fail(StatusCode::NOT_FOUND, "business not found")),
    }
}

async fn delete_business(
    State(state): State<Shared>,
    Path((user_id, business_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    let owned = data
        .businesses
        .get(&business_id)
        .map(|b| b.get("userId").and_then(Value::as_i64) == Some(user_id))
        .unwrap_or(false);
    if !owned {
        return Err(fail(StatusCode::NOT_FOUND, "business not found"));
    }
    data.businesses.remove(&business_id);
    Ok(Json(json!({ "deleted": business_id })))
}

// ----- sales -----
// Sales are addressed by product, not by user; ownership rides on the
// record's userId, which is how the real backend behaves.

async fn list_sales(State(state): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> ApiResult {
    require_auth(&headers)?;
    let data = state.lock().unwrap();
    let sales: Vec<&Value> = data
        .sales
        .values()
        .filter(|s| s.get("productId").and_then(Value::as_i64) == Some(id))
        .collect();
    Ok(Json(json!({ "sales": sales })))
}

async fn create_sale(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    let owner = data
        .products
        .get(&id)
        .and_then(|p| p.get("userId"))
        .cloned()
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "product not found"))?;

    let sale_id = data.next_id();
    let mut sale = body.clone();
    merge(&mut sale, &json!({ "id": sale_id, "productId": id, "userId": owner }));
    data.sales.insert(sale_id, sale.clone());
    Ok(Json(json!({ "sale": sale })))
}

async fn get_sale(
    State(state): State<Shared>,
    Path((product_id, sale_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> ApiResult {
    require_auth(&headers)?;
    let data = state.lock().unwrap();
    match data.sales.get(&sale_id) {
        Some(sale) if sale.get("productId").and_then(Value::as_i64) == Some(product_id) => {
            Ok(Json(json!({ "sale": sale })))
        }
        _ => Err(fail(StatusCode::NOT_FOUND, "sale not found")),
    }
}

async fn patch_sale(
    State(state): State<Shared>,
    Path((product_id, sale_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    match data.sales.get_mut(&sale_id) {
        Some(sale) if sale.get("productId").and_then(Value::as_i64) == Some(product_id) => {
            merge(sale, &body);
            Ok(Json(json!({ "sale": sale })))
        }
        _ => Err(fail(StatusCode::NOT_FOUND, "sale not found")),
    }
}

async fn delete_sale(
    State(state): State<Shared>,
    Path((product_id, sale_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    let matches = data
        .sales
        .get(&sale_id)
        .map(|s| s.get("productId").and_then(Value::as_i64) == Some(product_id))
        .unwrap_or(false);
    if !matches {
        return Err(fail(StatusCode::NOT_FOUND, "sale not found"));
    }
    data.sales.remove(&sale_id);
    Ok(Json(json!({ "deleted": sale_id })))
}

// ----- business sales -----

async fn list_business_sales(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult {
    require_auth(&headers)?;
    let data = state.lock().unwrap();
    let sales: Vec<&Value> = data
        .business_sales
        .values()
        .filter(|s| s.get("businessId").and_then(Value::as_i64) == Some(id))
        .collect();
    Ok(Json(json!({ "businessSales": sales })))
}

async fn create_business_sale(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    let owner = data
        .businesses
        .get(&id)
        .and_then(|b| b.get("userId"))
        .cloned()
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "business not found"))?;

    let sale_id = data.next_id();
    let mut sale = body.clone();
    merge(&mut sale, &json!({ "id": sale_id, "businessId": id, "userId": owner }));
    data.business_sales.insert(sale_id, sale.clone());
    Ok(Json(json!({ "businessSale": sale })))
}

async fn get_business_sale(
    State(state): State<Shared>,
    Path((business_id, business_sale_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> ApiResult {
    require_auth(&headers)?;
    let data = state.lock().unwrap();
    match data.business_sales.get(&business_sale_id) {
        Some(sale) if sale.get("businessId").and_then(Value::as_i64) == Some(business_id) => {
            Ok(Json(json!({ "businessSale": sale })))
        }
        _ => Err(fail(StatusCode::NOT_FOUND, "business sale not found")),
    }
}

async fn patch_business_sale(
    State(state): State<Shared>,
    Path((business_id, business_sale_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    match data.business_sales.get_mut(&business_sale_id) {
        Some(sale) if sale.get("businessId").and_then(Value::as_i64) == Some(business_id) => {
            merge(sale, &body);
            Ok(Json(json!({ "businessSale": sale })))
        }
        _ => Err(fail(StatusCode::NOT_FOUND, "business sale not found")),
    }
}

async fn delete_business_sale(
    State(state): State<Shared>,
    Path((business_id, business_sale_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> ApiResult {
    require_auth(&headers)?;
    let mut data = state.lock().unwrap();
    let matches = data
        .business_sales
        .get(&business_sale_id)
        .map(|s| s.get("businessId").and_then(Value::as_i64) == Some(business_id))
        .unwrap_or(false);
    if !matches {
        return Err(fail(StatusCode::NOT_FOUND, "business sale not found"));
    }
    data.business_sales.remove(&business_sale_id);
    Ok(Json(json!({ "deleted": business_sale_id })))
}
