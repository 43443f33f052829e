use crate::errors::{AppError, ErrorKind, Result};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Html;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;
use villa_core::admin::{AdminGate, AdminSession};
use villa_core::chat::{ChatCategory, ScriptedResponder};
use villa_core::compare::{
    comparison_table, CompareSelection, ComparisonTable, ToggleOutcome, CAPACITY_NOTICE,
};
use villa_core::config::SiteConfig;
use villa_core::errors::{ErrorKind as CoreKind, FieldErrors, VillaError};
use villa_core::home::{similar_properties, HomeSections, SIMILAR_LIMIT};
use villa_core::lead::{Lead, LeadForm, LeadInbox};
use villa_core::listing::{CompareCategory, ListingQuery, SearchTab, SortOrder, TypeFilter};
use villa_core::search::{suggest, Suggestions};
use villa_core::seed::Catalog;
use villa_core::store::{PropertyDraft, PropertyStore, SharedPropertyStore};
use villa_core::types::{BlogItem, Property};

#[derive(Debug, Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
    store: SharedPropertyStore,
    admin: AdminGate,
    sessions: Arc<Mutex<HashMap<String, AdminSession>>>,
    leads: Arc<Mutex<LeadInbox>>,
    responder: Arc<ScriptedResponder>,
}

impl AppState {
    pub fn new(config: &SiteConfig, catalog: Catalog) -> Self {
        AppState {
            store: PropertyStore::seeded(&catalog).shared(),
            catalog: Arc::new(catalog),
            admin: AdminGate::new(config.admin.clone(), config.delays.admin_login()),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            leads: Arc::new(Mutex::new(LeadInbox::default())),
            responder: Arc::new(ScriptedResponder::new(&config.contact)),
        }
    }

    fn live_properties(&self) -> Vec<Property> {
        lock(&self.store).all().to_vec()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn core_error(kind: CoreKind) -> AppError {
    VillaError::from(kind).into()
}

pub fn create_route(state: AppState) -> Router {
    let api = Router::new()
        .route("/home", get(get_home))
        .route("/properties", get(list_properties))
        .route("/properties/{id}", get(get_property))
        .route("/blogs", get(list_blogs))
        .route("/blogs/{id}", get(get_blog))
        .route("/search", get(search))
        .route("/compare", post(compare))
        .route("/chat", post(chat))
        .route("/leads", post(submit_lead))
        .route("/admin/login", post(admin_login))
        .route("/admin/properties", post(add_property))
        .route("/admin/properties/{id}", delete(delete_property));
    Router::new()
        .route("/", get(html))
        .nest("/api/v1", api)
        .with_state(state)
}

async fn html() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

#[tracing::instrument(level = "INFO", skip_all)]
async fn get_home(State(state): State<AppState>) -> Json<HomeSections> {
    Json(HomeSections::build(&state.catalog, &state.live_properties()))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    #[serde(rename = "type")]
    property_type: Option<String>,
    max_price: Option<String>,
    location: Option<String>,
    sort: Option<String>,
}

fn parse_sort(value: &str) -> Option<SortOrder> {
    match value {
        "featured" => Some(SortOrder::Featured),
        "price_asc" => Some(SortOrder::PriceLowToHigh),
        "price_desc" => Some(SortOrder::PriceHighToLow),
        label => SortOrder::from_str(label).ok(),
    }
}

/// Lakhs, taken as given. Only the storefront slider snaps to steps.
fn parse_max_price(value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
        .ok_or_else(|| AppError::invalid_query("max_price", value))
}

impl ListingParams {
    fn into_query(self) -> Result<ListingQuery> {
        let mut query = ListingQuery::default();
        if let Some(value) = self.property_type {
            query.filter.property_type =
                TypeFilter::from_str(&value).map_err(|_| AppError::invalid_query("type", &value))?;
        }
        if let Some(value) = self.max_price {
            query.filter.max_price = parse_max_price(&value)?;
        }
        if let Some(location) = self.location {
            query.filter.location = location;
        }
        if let Some(value) = self.sort {
            query.sort = parse_sort(&value).ok_or_else(|| AppError::invalid_query("sort", &value))?;
        }
        Ok(query)
    }
}

#[tracing::instrument(level = "INFO", skip(state))]
async fn list_properties(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Vec<Property>>> {
    let query = params.into_query()?;
    Ok(Json(query.apply(&state.live_properties())))
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PropertyDetail {
    pub property: Property,
    pub similar: Vec<Property>,
}

#[tracing::instrument(level = "INFO", skip(state))]
async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PropertyDetail>> {
    let live = state.live_properties();
    let property = live
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| core_error(CoreKind::PropertyNotFound(id.clone())))?;
    let popular = HomeSections::build(&state.catalog, &live).popular;
    Ok(Json(PropertyDetail {
        similar: similar_properties(&popular, &id, SIMILAR_LIMIT),
        property,
    }))
}

async fn list_blogs(State(state): State<AppState>) -> Json<Vec<BlogItem>> {
    Json(state.catalog.blogs.clone())
}

#[tracing::instrument(level = "INFO", skip(state))]
async fn get_blog(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<BlogItem>> {
    state
        .catalog
        .blog(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| core_error(CoreKind::BlogNotFound(id)))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    tab: Option<String>,
    #[serde(default)]
    location: String,
    #[serde(default)]
    project: String,
}

#[tracing::instrument(level = "INFO", skip(state))]
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Suggestions>> {
    let tab = match params.tab.as_deref() {
        None | Some("") => SearchTab::default(),
        Some(value) => {
            SearchTab::from_str(value).map_err(|_| AppError::invalid_query("tab", value))?
        }
    };
    Ok(Json(suggest(
        tab,
        &state.catalog.locations,
        &state.live_properties(),
        &params.location,
        &params.project,
    )))
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    ids: Vec<String>,
    #[serde(default)]
    category: CompareCategory,
}

#[tracing::instrument(level = "INFO", skip(state))]
async fn compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<ComparisonTable>> {
    let mut selection = CompareSelection::new();
    for id in &request.ids {
        if selection.contains(id) {
            continue;
        }
        if selection.toggle(id) == ToggleOutcome::Rejected {
            return Err(ErrorKind::CompareCapacity(CAPACITY_NOTICE).into());
        }
    }
    let live = state.live_properties();
    if let Some(missing) = selection
        .ids()
        .iter()
        .find(|id| !live.iter().any(|p| &p.id == *id))
    {
        return Err(core_error(CoreKind::PropertyNotFound(missing.clone())));
    }
    Ok(Json(comparison_table(
        &selection.resolve(&live),
        request.category,
    )))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatReply {
    pub reply: String,
    pub category: ChatCategory,
}

#[tracing::instrument(level = "INFO", skip(state))]
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>> {
    if request.message.trim().is_empty() {
        let mut errors = FieldErrors::default();
        errors.push("message", "is required");
        return Err(VillaError::from(errors).into());
    }
    let (category, reply) = state.responder.answer(&request.message);
    Ok(Json(ChatReply {
        reply: reply.to_string(),
        category,
    }))
}

#[tracing::instrument(level = "INFO", skip_all)]
async fn submit_lead(
    State(state): State<AppState>,
    Json(form): Json<LeadForm>,
) -> Result<(StatusCode, Json<Lead>)> {
    let lead = lock(&state.leads).submit(form)?;
    Ok((StatusCode::CREATED, Json(lead)))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
}

#[tracing::instrument(level = "INFO", skip_all)]
async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let session = state
        .admin
        .login(&request.username, &request.password, state.store.clone())
        .await?;
    let token = uuid::Uuid::new_v4().to_string();
    lock(&state.sessions).insert(token.clone(), session);
    info!("Issued admin token for {}", request.username);
    Ok(Json(LoginResponse { token }))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn session_for(state: &AppState, headers: &HeaderMap) -> Result<AdminSession> {
    bearer(headers)
        .and_then(|token| lock(&state.sessions).get(token).cloned())
        .ok_or_else(|| core_error(CoreKind::NotAuthenticated))
}

#[tracing::instrument(level = "INFO", skip_all)]
async fn add_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<PropertyDraft>,
) -> Result<(StatusCode, Json<Property>)> {
    let session = session_for(&state, &headers)?;
    let property = session.add_property(draft)?;
    Ok((StatusCode::CREATED, Json(property)))
}

#[tracing::instrument(level = "INFO", skip(state, headers))]
async fn delete_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Property>> {
    let session = session_for(&state, &headers)?;
    Ok(Json(session.delete_property(&id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use villa_core::config::DelayConfig;

    fn app() -> Router {
        let config = SiteConfig {
            delays: DelayConfig::instant(),
            ..Default::default()
        };
        create_route(AppState::new(&config, Catalog::seed()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn ids(value: &Value) -> Vec<String> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect()
    }

    async fn login(app: &Router) -> String {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/api/v1/admin/login",
                json!({"username": "admin", "password": "admin"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn landing_page_is_served() {
        let response = app().oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("99Villa"));
    }

    #[tokio::test]
    async fn home_has_trending_reversed() {
        let (status, body) = send(&app(), get_request("/api/v1/home")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body["trending"]), vec!["p4", "p3", "p2", "p1"]);
        assert_eq!(body["heroSlides"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn listing_filters_and_sorts() {
        let app = app();
        let (_, body) = send(&app, get_request("/api/v1/properties?type=Villa&sort=price_desc")).await;
        assert_eq!(ids(&body), vec!["h4", "h1", "p2"]);

        let (_, body) = send(
            &app,
            get_request("/api/v1/properties?type=Villa&max_price=100&sort=Price%3A%20Low%20to%20High"),
        )
        .await;
        assert_eq!(ids(&body), vec!["p2", "h1"]);

        let (_, body) = send(&app, get_request("/api/v1/properties?location=KHOPOLI")).await;
        assert_eq!(ids(&body), vec!["h3", "p2", "p3"]);
    }

    #[tokio::test]
    async fn max_price_is_applied_exactly() {
        let app = app();
        let (status, body) = send(&app, get_request("/api/v1/properties?max_price=14")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["p1", "p4"]);

        let (_, body) = send(&app, get_request("/api/v1/properties?max_price=15")).await;
        assert_eq!(ids(&body), vec!["p1", "p3", "p4"]);
    }

    #[tokio::test]
    async fn malformed_max_price_is_bad_request() {
        let app = app();
        for value in ["cheap", "inf", "NaN"] {
            let uri = format!("/api/v1/properties?max_price={value}");
            let (status, body) = send(&app, get_request(&uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{value}");
            assert_eq!(body["code"], 40003, "{value}");
        }
    }

    #[tokio::test]
    async fn unknown_type_is_bad_request() {
        let (status, body) = send(&app(), get_request("/api/v1/properties?type=Castle")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 40003);
    }

    #[tokio::test]
    async fn property_detail_includes_similar() {
        let app = app();
        let (status, body) = send(&app, get_request("/api/v1/properties/p2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["property"]["type"], "Villa");
        assert_eq!(ids(&body["similar"]), vec!["p1", "p3"]);

        let (status, body) = send(&app, get_request("/api/v1/properties/zz")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 40401);
    }

    #[tokio::test]
    async fn blogs_are_listed_and_fetched() {
        let app = app();
        let (_, body) = send(&app, get_request("/api/v1/blogs")).await;
        assert_eq!(ids(&body), vec!["b1", "b2", "b3"]);
        let (status, _) = send(&app, get_request("/api/v1/blogs/b2")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, get_request("/api/v1/blogs/b9")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_respects_tab() {
        let (status, body) = send(
            &app(),
            get_request("/api/v1/search?tab=Villa%2FBungalow&project=khopoli"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body["projects"]), vec!["h3", "p2"]);
    }

    #[tokio::test]
    async fn compare_caps_at_three() {
        let app = app();
        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/compare", json!({"ids": ["h1", "p1", "h1"]}), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body["properties"]), vec!["h1", "p1"]);
        assert_eq!(body["rows"][0]["label"], "Price");

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/compare",
                json!({"ids": ["h1", "h2", "h3", "h4"]}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], CAPACITY_NOTICE);
    }

    #[tokio::test]
    async fn chat_replies_by_keyword() {
        let app = app();
        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/chat", json!({"message": "Where are you?"}), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Location");

        let (status, body) =
            send(&app, json_request("POST", "/api/v1/chat", json!({"message": " "}), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "message");
    }

    #[tokio::test]
    async fn leads_are_validated() {
        let app = app();
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/leads",
                json!({"name": "Asha", "phone": "+91 98765 43210", "interest": "Investment"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);

        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/leads", json!({"name": "", "phone": "12"}), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn bad_login_is_unauthorized() {
        let (status, body) = send(
            &app(),
            json_request(
                "POST",
                "/api/v1/admin/login",
                json!({"username": "admin", "password": "wrong"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid username or password. Please try again.");
    }

    #[tokio::test]
    async fn admin_routes_require_token() {
        let app = app();
        let draft = json!({"title": "Sea View Plot", "price": "₹ 30 L", "location": "Uran"});
        let (status, _) = send(
            &app,
            json_request("POST", "/api/v1/admin/properties", draft.clone(), Some("forged")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = login(&app).await;
        let (status, added) = send(
            &app,
            json_request("POST", "/api/v1/admin/properties", draft, Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(added["type"], "Plot");
        assert_eq!(added["status"], "For Sale");

        let (_, listing) = send(&app, get_request("/api/v1/properties?location=uran")).await;
        assert_eq!(ids(&listing), vec![added["id"].as_str().unwrap().to_string()]);
    }

    #[tokio::test]
    async fn admin_delete_removes_from_home() {
        let app = app();
        let token = login(&app).await;
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/v1/admin/properties/p1")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "p1");

        let (_, home) = send(&app, get_request("/api/v1/home")).await;
        assert_eq!(ids(&home["popular"]), vec!["p2", "p3", "p4"]);

        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/admin/properties", json!({"title": "x"}), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"].as_array().unwrap().len(), 2);
    }
}
