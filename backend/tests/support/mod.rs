//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! each file pulls this module in with `mod support;` and uses the subset it
//! needs.
#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use recipe_backend::Trace;
use recipe_backend::domain::{AccountService, LabelService, RecipeService, UploadIdSource};
use recipe_backend::inbound::http::configure_api;
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::outbound::memory::{InMemoryImageStore, InMemoryStore};
use recipe_backend::outbound::security::BcryptPasswordHasher;

/// Lowest work factor bcrypt accepts; keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;
pub const PASSWORD: &str = "testpass123";

/// Upload id source returning a fixed value so image paths are predictable.
pub struct FixedUploadIds(pub &'static str);

impl UploadIdSource for FixedUploadIds {
    fn next_id(&self) -> String {
        self.0.to_owned()
    }
}

/// Adapters backing one test application.
pub struct Backend {
    pub state: HttpState,
    pub images: Arc<InMemoryImageStore>,
}

/// Wire services over fresh in-memory adapters.
pub fn backend() -> Backend {
    let store = Arc::new(InMemoryStore::new());
    let images = Arc::new(InMemoryImageStore::new());
    let accounts = AccountService::new(
        store.clone(),
        store.clone(),
        Arc::new(BcryptPasswordHasher::new(TEST_BCRYPT_COST)),
    );
    let labels = LabelService::new(store.clone());
    let recipes = RecipeService::new(
        store.clone(),
        store,
        images.clone(),
        Arc::new(FixedUploadIds("test-uuid")),
    );
    Backend {
        state: HttpState::with_account_service(
            Arc::new(accounts),
            Arc::new(labels),
            Arc::new(recipes),
        ),
        images,
    }
}

/// Build the API the way the server does, under `/api/v1`.
pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await
}

/// Build a JSON request, optionally authenticated with `token`.
pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request {
    let mut req = test::TestRequest::default().method(method).uri(uri);
    if let Some(token) = token {
        req = req.insert_header((header::AUTHORIZATION, format!("Token {token}")));
    }
    match body {
        Some(body) => req.set_json(body).to_request(),
        None => req.to_request(),
    }
}

/// Send a request and decode the JSON body; empty bodies decode to `Null`.
pub async fn send<S>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, body)
}

/// Register `email` and return a fresh token for it.
pub async fn sign_up<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, _) = send(
        app,
        json_request(
            Method::POST,
            "/api/v1/user/create",
            None,
            Some(json!({ "email": email, "password": PASSWORD, "name": "Test Name" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration of {email}");
    token_for(app, email, PASSWORD).await
}

/// Exchange credentials for a token, asserting success.
pub async fn token_for<S>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/v1/user/token",
            None,
            Some(json!({ "email": email, "password": password })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "token for {email}: {body}");
    body["token"].as_str().expect("token string").to_owned()
}

/// Create a label of `kind` ("tags" or "ingredients") and return its id.
pub async fn create_label<S>(app: &S, token: &str, kind: &str, name: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            &format!("/api/v1/recipe/{kind}"),
            Some(token),
            Some(json!({ "name": name })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create {kind} {name}: {body}");
    body["id"].as_i64().expect("label id")
}

/// Create a recipe from `body` and return its id.
pub async fn create_recipe<S>(app: &S, token: &str, body: Value) -> i64
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        json_request(Method::POST, "/api/v1/recipe/recipes", Some(token), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create recipe: {body}");
    body["id"].as_i64().expect("recipe id")
}

/// Names from a JSON array of labels.
pub fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .filter_map(|item| item["name"].as_str().map(str::to_owned))
        .collect()
}
