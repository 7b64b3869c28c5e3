use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::api::ApiResult;
use crate::auth::credentials::{self, Credentials, Scheme};
use crate::auth::resolve;
use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::{cart, orders, products, session, users};
use crate::routing::matcher::{classify, is_api_path, CollectionRoute, Resource, Route};
use crate::routing::policy::{authorize, lookup, self_target_guard, ApiMethod, RouteEntry, Rule};
use crate::state::AppState;
use crate::static_files;

const JSON: &str = "application/json";
const ANY: &str = "*/*";
const PREFLIGHT_HEADERS: &str = "Content-Type,Accept";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Authenticated caller together with the credentials it presented
struct Caller {
    user: User,
    credentials: Credentials,
}

/// Fallback handler for every request the router does not claim itself.
///
/// Runs the request through static check, preflight, route resolution,
/// method check, accept check, authentication, authorization, body parsing
/// and finally the resource operation. Each step may end the request.
pub async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if method == Method::GET && !is_api_path(&path) {
        let response = static_files::serve(&state.config.server.public_dir, request).await;
        tracing::debug!("{} {} -> static {}", method, path, response.status());
        return response;
    }

    match handle(&state, request).await {
        Ok(response) => {
            tracing::debug!("{} {} -> {}", method, path, response.status());
            response
        }
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                tracing::error!("{} {} -> {}: {}", method, path, status, err);
            } else {
                tracing::info!("{} {} -> {}: {}", method, path, status, err);
            }
            err.into_response()
        }
    }
}

async fn handle(state: &AppState, request: Request) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let route = classify(parts.uri.path());
    let entry = route.as_ref().and_then(lookup);

    if parts.method == Method::OPTIONS {
        let entry = entry.ok_or(ApiError::NotFound)?;
        return Ok(preflight(entry));
    }

    let (Some(route), Some(entry)) = (route, entry) else {
        return Err(ApiError::NotFound);
    };

    let method = ApiMethod::from_http(&parts.method).ok_or(ApiError::MethodNotAllowed)?;
    let rule = entry.rule(method).ok_or(ApiError::MethodNotAllowed)?;

    check_accept(&parts.headers)?;

    let caller = authenticate(state, &parts.headers, rule).await?;
    if let Some(caller) = &caller {
        authorize(rule, &caller.user)?;
        self_target_guard(&route, method, &caller.user)?;
    }

    let payload = if method.has_body() {
        read_json(&parts.headers, body, state.config.api.max_request_size_bytes).await?
    } else {
        Value::Null
    };

    invoke(state, &route, method, caller, payload)
        .await
        .map(IntoResponse::into_response)
}

/// 204 answer to an OPTIONS request listing the route's methods
fn preflight(entry: &RouteEntry) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();

    if let Ok(methods) = HeaderValue::from_str(&entry.allow_header()) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, methods);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(PREFLIGHT_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(PREFLIGHT_HEADERS),
    );

    response
}

/// The client must accept JSON, possibly among other types
fn check_accept(headers: &HeaderMap) -> Result<(), ApiError> {
    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains(JSON) || accept.contains(ANY));

    if accepts_json {
        Ok(())
    } else {
        Err(ApiError::NotAcceptable)
    }
}

/// Resolve the caller for every rule except `Public`.
///
/// A rejected bearer token gets a plain 401; everything else is challenged
/// for Basic credentials.
async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    rule: Rule,
) -> Result<Option<Caller>, ApiError> {
    if rule == Rule::Public {
        return Ok(None);
    }

    let scheme = credentials::scheme(headers);
    if rule == Rule::BasicOnly && scheme != Some(Scheme::Basic) {
        return Err(ApiError::auth_challenge());
    }

    let credentials = credentials::extract(headers, &state.config.security);
    match resolve(state.store.as_ref(), &credentials).await? {
        Some(user) => Ok(Some(Caller { user, credentials })),
        None if scheme == Some(Scheme::Bearer) => Err(ApiError::unauthorized()),
        None => Err(ApiError::auth_challenge()),
    }
}

/// Read and parse a JSON request body, bounded by `limit` bytes
async fn read_json(headers: &HeaderMap, body: Body, limit: usize) -> Result<Value, ApiError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.contains(JSON));
    if !is_json {
        return Err(ApiError::bad_request(
            "Invalid Content-Type. Expected application/json",
        ));
    }

    let bytes = to_bytes(body, limit)
        .await
        .map_err(|e| ApiError::bad_request(format!("Unable to read request body: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::bad_request(format!("Malformed JSON: {}", e)))
}

/// Every rule but `Public` has produced a caller before an operation runs
fn require(caller: Option<&Caller>) -> Result<&Caller, ApiError> {
    caller.ok_or_else(ApiError::auth_challenge)
}

async fn invoke(
    state: &AppState,
    route: &Route,
    method: ApiMethod,
    caller: Option<Caller>,
    body: Value,
) -> ApiResult {
    use crate::routing::policy::ApiMethod::{Delete, Get, Post, Put};

    let store = state.store.as_ref();
    let caller = caller.as_ref();
    let user = move || require(caller).map(|caller| &caller.user);

    match route {
        Route::Collection(collection) => match (collection, method) {
            (CollectionRoute::Register, Post) => users::register(store, body).await,
            (CollectionRoute::Login, Get) => {
                let caller = require(caller)?;
                match &caller.credentials {
                    Credentials::Basic { password, .. } => {
                        session::login(&caller.user, password, &state.config.security)
                    }
                    Credentials::Bearer { .. } | Credentials::None => Err(ApiError::auth_challenge()),
                }
            }
            (CollectionRoute::Authorize, Get) => session::authorize(user()?),
            (CollectionRoute::Users, Get) => users::list(store).await,
            (CollectionRoute::Products, Get) => products::list(store).await,
            (CollectionRoute::Products, Post) => products::create(store, body).await,
            (CollectionRoute::Cart, Get) => cart::view(),
            (CollectionRoute::Orders, Get) => orders::list(store, user()?).await,
            (CollectionRoute::Orders, Post) => orders::create(store, user()?, body).await,
            (CollectionRoute::Register, Get | Put | Delete)
            | (
                CollectionRoute::Login
                | CollectionRoute::Authorize
                | CollectionRoute::Users
                | CollectionRoute::Cart,
                Post | Put | Delete,
            )
            | (CollectionRoute::Products | CollectionRoute::Orders, Put | Delete) => {
                Err(ApiError::MethodNotAllowed)
            }
        },
        Route::Item(resource, id) => match (resource, method) {
            (Resource::Users, Get) => users::view(store, id).await,
            (Resource::Users, Put) => users::update_role(store, id, body).await,
            (Resource::Users, Delete) => users::delete(store, id).await,
            (Resource::Products, Get) => products::view(store, id).await,
            (Resource::Products, Put) => products::update(store, id, body).await,
            (Resource::Products, Delete) => products::delete(store, id).await,
            (Resource::Orders, Get) => orders::view(store, user()?, id).await,
            (Resource::Users | Resource::Products, Post) | (Resource::Orders, Post | Put | Delete) => {
                Err(ApiError::MethodNotAllowed)
            }
        },
    }
}
