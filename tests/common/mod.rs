//! In-process mock of the pricing, auth and WordPress upstreams.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Path, RawQuery, State},
    http::{HeaderMap, Method, Request, StatusCode},
    routing::{any, get, post},
    Json, Router,
};
use rx_gateway::{create_router, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const ACCESS_TOKEN: &str = "mock-access-token";

#[derive(Clone, Default)]
pub struct Upstream {
    pub token_requests: Arc<AtomicUsize>,
    pub graphql_requests: Arc<AtomicUsize>,
}

impl Upstream {
    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn graphql_requests(&self) -> usize {
        self.graphql_requests.load(Ordering::SeqCst)
    }
}

pub struct TestGateway {
    pub app: Router,
    pub upstream: Upstream,
    pub base_url: String,
}

impl TestGateway {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_to_json(response.into_body()).await)
    }
}

pub async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Starts the mock upstream and a gateway wired against it.
pub async fn spawn_gateway() -> TestGateway {
    spawn_gateway_with(|_| {}).await
}

pub async fn spawn_gateway_with(customize: impl FnOnce(&mut Config)) -> TestGateway {
    let upstream = Upstream::default();
    let base_url = spawn_upstream(upstream.clone()).await;

    let mut config = Config {
        pricing_api_url: base_url.clone(),
        auth_url: format!("{}/oauth2/token", base_url),
        client_id: "gateway-client".to_string(),
        client_secret: "gateway-secret".to_string(),
        proxy_target_url: Some(base_url.clone()),
        proxy_allowed_paths: vec!["echo".to_string()],
        wordpress_api_url: Some(format!("{}/graphql", base_url)),
        wordpress_auth_token: Some("Basic d3A6c2VjcmV0".to_string()),
        ..Config::default()
    };
    customize(&mut config);

    let state = AppState::from_config(&config).unwrap();
    TestGateway {
        app: create_router(state),
        upstream,
        base_url,
    }
}

async fn spawn_upstream(upstream: Upstream) -> String {
    let app = Router::new()
        .route("/oauth2/token", post(token))
        .route("/drugs/names", post(drug_names))
        .route("/drugprices/byName", post(price_by_name))
        .route("/drugprices/byGSN", post(echo_json))
        .route("/drugprices/byNdcCode", post(echo_json))
        .route("/multidrugprices/byName", post(echo_json))
        .route("/multidrugprices/byGSN", post(echo_json))
        .route("/pharmacies", get(pharmacies))
        .route("/echo/*rest", any(echo_request))
        .route("/graphql", post(graphql))
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", ACCESS_TOKEN))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "missing bearer token"})))
}

async fn token(State(upstream): State<Upstream>, headers: HeaderMap, body: String) -> (StatusCode, Json<Value>) {
    upstream.token_requests.fetch_add(1, Ordering::SeqCst);
    let basic = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !basic.starts_with("Basic ") || !body.contains("grant_type=client_credentials") {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_request"})));
    }

    (
        StatusCode::OK,
        Json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600
        })),
    )
}

async fn drug_names(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let prefix = body["prefixText"].as_str().unwrap_or_default().to_lowercase();
    let names: Vec<&str> = ["TYLENOL", "TYLENOL PM", "FEVERALL"]
        .into_iter()
        .filter(|name| name.to_lowercase().starts_with(&prefix))
        .collect();
    (StatusCode::OK, Json(json!(names)))
}

async fn price_by_name(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    match body["drugName"].as_str().unwrap_or_default() {
        "TYLENOL" => (StatusCode::OK, Json(price_sheet("TYLENOL", "B"))),
        "FEVERALL" => (StatusCode::OK, Json(price_sheet("FEVERALL", "B"))),
        "ACETAMINOPHEN" => (StatusCode::OK, Json(price_sheet("ACETAMINOPHEN", "G"))),
        "MAPAP" => (StatusCode::OK, Json(mapap_sheet())),
        "BROKEN" => (StatusCode::BAD_GATEWAY, Json(json!({"message": "pricing backend down"}))),
        _ => (StatusCode::NOT_FOUND, Json(json!({"message": "Drug not found"}))),
    }
}

/// Acetaminophen family sheet with `selected_name` as the selected variant.
pub fn price_sheet(selected_name: &str, flag: &str) -> Value {
    let variant = |name: &str, bg: &str| {
        json!({"medName": name, "bgFlag": bg, "selected": name == selected_name})
    };
    json!({
        "drug": {"medName": selected_name, "bgFlag": flag, "gsn": 4489, "quantity": 30},
        "alternateDrugs": [
            variant("ACETAMINOPHEN", "G"),
            variant("TYLENOL", "B"),
            variant("FEVERALL", "B"),
            variant("MAPAP", "B")
        ],
        "forms": [
            {"form": "TABLET", "gsn": 4489, "selected": true},
            {"form": "CAPSULE", "gsn": 4495},
            {"form": "LIQUID", "gsn": 16622},
            {"form": "SUPP.RECT", "gsn": 4493}
        ],
        "strengths": [
            {"strength": "325 mg", "gsn": 4489},
            {"strength": "500 mg", "gsn": 4484, "selected": true},
            {"strength": "160 mg/5 mL", "gsn": 16622},
            {"strength": "120 mg", "gsn": 4493}
        ],
        "quantities": [
            {"quantity": 30, "uom": "TABLET", "gsn": 4489},
            {"quantity": 100, "uom": "TABLET", "gsn": 4484, "selected": true},
            {"quantity": 120, "uom": "ML", "gsn": 16622},
            {"quantity": 12, "uom": "SUPP.RECT", "gsn": 4493}
        ],
        "pharmacyPricings": [
            {"pharmacy": {"name": "Corner Drug"}, "prices": [{"price": 4.5}]}
        ]
    })
}

/// Sheet fetched on its own when MAPAP is picked; its forms differ from the family sheet.
pub fn mapap_sheet() -> Value {
    json!({
        "drug": {"medName": "MAPAP", "bgFlag": "G", "gsn": 4495, "quantity": 60},
        "alternateDrugs": [{"medName": "MAPAP", "bgFlag": "G", "selected": true}],
        "forms": [
            {"form": "CAPSULE", "gsn": 4495, "selected": true},
            {"form": "SUPP.RECT", "gsn": 4493}
        ],
        "strengths": [{"strength": "500 mg", "gsn": 4495, "selected": true}],
        "quantities": [{"quantity": 60, "uom": "CAPSULE", "gsn": 4495, "selected": true}]
    })
}

async fn echo_json(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({ "received": body })))
}

async fn pharmacies(headers: HeaderMap, RawQuery(query): RawQuery) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let query = query.unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({
            "pharmacies": [
                {"name": "Corner Drug", "distance": 1.2},
                {"name": "Main St Pharmacy", "distance": 2.8}
            ],
            "query": query
        })),
    )
}

async fn echo_request(
    method: Method,
    Path(rest): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(&'static str, &'static str); 1], Json<Value>) {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    let status = if rest.trim_start_matches('/') == "teapot" {
        StatusCode::IM_A_TEAPOT
    } else {
        StatusCode::OK
    };

    (
        status,
        [("content-type", "application/vnd.echo+json")],
        Json(json!({
            "method": method.as_str(),
            "path": rest,
            "query": query,
            "contentType": header("content-type"),
            "authorization": header("authorization"),
            "body": String::from_utf8_lossy(&body)
        })),
    )
}

async fn graphql(State(upstream): State<Upstream>, Json(body): Json<Value>) -> Json<Value> {
    upstream.graphql_requests.fetch_add(1, Ordering::SeqCst);
    let query = body["query"].as_str().unwrap_or_default();

    let data = if query.contains("GetPostBySlug") {
        if body["variables"]["slug"] == "generic-savings" {
            json!({"post": {
                "id": "cG9zdDox",
                "title": "Generic savings",
                "content": "<p>Generics cost less.</p>",
                "date": "2024-05-01T10:00:00",
                "featuredImage": null
            }})
        } else {
            json!({"post": null})
        }
    } else if query.contains("GetDiscounts") {
        json!({"discounts": {"nodes": [{
            "id": "ZGlzYzox",
            "title": "Spring refill discount",
            "slug": "spring-refill",
            "content": "<p>Save on refills.</p>",
            "featuredImage": {"node": {"sourceUrl": "https://cdn.example/spring.png", "altText": "Spring"}},
            "discountMeta": {"discountCode": "SPRING10", "discountAmount": "10%", "expiryDate": "2024-06-30", "terms": "One per customer"}
        }]}})
    } else {
        json!({"posts": {"nodes": [
            {"id": "cG9zdDox", "title": "Generic savings", "slug": "generic-savings", "excerpt": "<p>Save</p>", "date": "2024-05-01T10:00:00"},
            {"id": "cG9zdDoy", "title": "Reading your label", "slug": "reading-your-label", "excerpt": "<p>Labels</p>", "date": "2024-04-12T09:00:00"}
        ]}})
    };

    Json(json!({ "data": data }))
}
