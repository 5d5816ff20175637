#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    routing::get,
};
use crudgate::{
    ApiError, ApiField, ApiFields, ApiInput, ApiToDbField, ApiUpdates, EngineConfig, FieldMap,
    FieldType, InputHandler, ListQuery, PredicateSet, Source, Validated, to_condition,
};
use sea_orm::sea_query::{Alias, Asterisk, PostgresQueryBuilder, Query as SqlQuery};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub zip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub sku: String,
    pub qty: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
    pub role: String,
    pub address: Option<Address>,
    pub items: Option<Vec<LineItem>>,
}

impl ApiInput for CreateUser {
    fn api_fields() -> ApiFields {
        ApiFields::new([
            ApiField::new("name")
                .with_required(true)
                .with_type(FieldType::String)
                .with_validate(["not_blank"])
                .with_db_column("full_name"),
            ApiField::new("email")
                .with_required(true)
                .with_validate(["email"])
                .with_convert("lowercase")
                .with_db_column("email"),
            ApiField::new("age")
                .with_type(FieldType::Int)
                .with_validate(["non_negative"])
                .with_db_column("age"),
            ApiField::new("role").with_default("member").with_db_column("role"),
            ApiField::new("address").with_nested(ApiFields::new([
                ApiField::new("city").with_required(true).with_validate(["not_blank"]),
                ApiField::new("zip").with_type(FieldType::String),
            ])),
            ApiField::new("items").with_type(FieldType::Array).with_nested(ApiFields::new([
                ApiField::new("sku").with_required(true).with_validate(["not_blank"]),
                ApiField::new("qty").with_type(FieldType::Int).with_validate(["positive"]),
            ])),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetUser {
    pub id: Uuid,
    pub verbose: bool,
    pub tenant: Option<String>,
    pub session: Option<String>,
}

impl ApiInput for GetUser {
    fn api_fields() -> ApiFields {
        ApiFields::new([
            ApiField::new("id")
                .with_source(Source::Url)
                .with_type(FieldType::Uuid)
                .with_required(true)
                .with_validate(["uuid"]),
            ApiField::new("verbose")
                .with_source(Source::Url)
                .with_type(FieldType::Bool)
                .with_default(false),
            ApiField::new("x-tenant").with_alias("tenant").with_source(Source::Header),
            ApiField::new("session").with_source(Source::Cookie),
        ])
    }
}

/// Allow-list for the `users` table.
pub fn user_field_map() -> FieldMap {
    CreateUser::api_fields()
        .db_field_map("users")
        .with(
            "role",
            ApiToDbField::new("users", "role").with_predicates(PredicateSet::EQUAL_AND_NOT_EQUAL),
        )
        .with(
            "age",
            ApiToDbField::new("users", "age")
                .with_predicates(PredicateSet::ONLY_GREATER.union(PredicateSet::ONLY_LESS)),
        )
        .with(
            "id",
            ApiToDbField::new("users", "id").with_predicates(
                PredicateSet::ONLY_IN_AND_NOT_IN.union(PredicateSet::ONLY_EQUAL),
            ),
        )
}

#[derive(Clone, FromRef)]
pub struct AppState {
    pub create_user: Arc<InputHandler<CreateUser>>,
    pub get_user: Arc<InputHandler<GetUser>>,
    pub users: Arc<FieldMap>,
}

pub fn setup_state(config: EngineConfig) -> AppState {
    let config = Arc::new(config);
    AppState {
        create_user: Arc::new(InputHandler::for_input(Arc::clone(&config))),
        get_user: Arc::new(InputHandler::for_input(config)),
        users: Arc::new(user_field_map()),
    }
}

async fn create_user(Validated(input): Validated<CreateUser>) -> (StatusCode, Json<CreateUser>) {
    (StatusCode::CREATED, Json(input))
}

async fn get_user(Validated(input): Validated<GetUser>) -> Json<GetUser> {
    Json(input)
}

async fn list_users(
    State(users): State<Arc<FieldMap>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let selectors = query.selectors()?.to_db_selectors(&users)?;
    let orders = query.orders()?.to_db_orders(&users)?;

    let mut select = SqlQuery::select();
    select
        .column(Asterisk)
        .from(Alias::new("users"))
        .cond_where(to_condition(&selectors)?);
    for order in &orders {
        select.order_by(order.column(), order.to_order());
    }
    Ok(Json(json!({ "sql": select.to_string(PostgresQueryBuilder) })))
}

async fn update_user(
    State(users): State<Arc<FieldMap>>,
    Path(_id): Path<String>,
    Json(updates): Json<ApiUpdates>,
) -> Result<Json<Value>, ApiError> {
    let updates = updates.to_db_updates(&users)?;
    let columns: Vec<&str> = updates.iter().map(|update| update.field.as_str()).collect();
    Ok(Json(json!({ "columns": columns })))
}

/// Send crate logs to the test harness's captured output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn setup_test_app(config: EngineConfig) -> Router {
    init_tracing();
    let api = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).patch(update_user))
        .with_state(setup_state(config));

    Router::new().nest("/api/v1", api)
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

/// `/api/v1/users` with the given query pairs, form-encoded.
pub fn list_uri(pairs: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("/api/v1/users?{query}")
}
