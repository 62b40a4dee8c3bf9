pub mod auth;
pub mod like;
pub mod listing;
pub mod user;

use common::{ErrorResponse, FieldErrors};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::session::Session;
use crate::settings;

fn api_base() -> String {
    settings::get_settings().api_base_url()
}

/// A failed API call, either at transport level or reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status, `None` when the request never got a response
    pub status: Option<u16>,
    pub message: String,
    pub errors: FieldErrors,
}

impl ApiError {
    fn transport(message: String) -> Self {
        Self {
            status: None,
            message,
            errors: FieldErrors::new(),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.status == Some(401)
    }

    /// First message reported for a form field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.errors
            .get(name)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.message
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

fn with_auth(builder: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
    match session {
        Some(session) => builder.header("Authorization", &session.authorization_header()),
        None => builder,
    }
}

async fn send(method: &str, endpoint: &str, request: Result<Request, gloo_net::Error>) -> ApiResult<Response> {
    let request = request.map_err(|e| {
        let error_msg = format!("Failed to serialize request: {}", e);
        log::error!("{} {} - {}", method, endpoint, error_msg);
        ApiError::transport(error_msg)
    })?;

    let response = request.send().await.map_err(|e| {
        let error_msg = format!("Request failed: {}", e);
        log::error!("{} {} - {}", method, endpoint, error_msg);
        ApiError::transport(error_msg)
    })?;

    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    log::warn!("{} {} - Non-OK response: {}", method, endpoint, status);
    let error = match response.json::<ErrorResponse>().await {
        Ok(body) => {
            log::error!("{} {} - API error {}: {}", method, endpoint, body.code, body.message);
            ApiError {
                status: Some(status),
                message: body.message,
                errors: body.errors.unwrap_or_default(),
            }
        }
        Err(_) => ApiError {
            status: Some(status),
            message: format!("HTTP error: {}", status),
            errors: FieldErrors::new(),
        },
    };
    Err(error)
}

async fn read_json<T>(method: &str, endpoint: &str, response: Response) -> ApiResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    log::trace!("{} {} - Response received, parsing JSON", method, endpoint);
    let body = response.json().await.map_err(|e| {
        let error_msg = format!("Failed to parse response: {}", e);
        log::error!("{} {} - {}", method, endpoint, error_msg);
        ApiError::transport(error_msg)
    })?;
    log::info!("{} {} - Success", method, endpoint);
    Ok(body)
}

/// Common GET request handler
pub async fn get<T>(endpoint: &str, session: Option<&Session>) -> ApiResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    let url = format!("{}{}", api_base(), endpoint);
    log::debug!("GET request to: {}", url);
    let request = with_auth(Request::get(&url), session).build();
    let response = send("GET", endpoint, request).await?;
    read_json("GET", endpoint, response).await
}

/// Common POST request handler
pub async fn post<T, B>(endpoint: &str, session: Option<&Session>, body: &B) -> ApiResult<T>
where
    T: for<'de> Deserialize<'de>,
    B: Serialize,
{
    let url = format!("{}{}", api_base(), endpoint);
    log::debug!("POST request to: {}", url);
    let request = with_auth(Request::post(&url), session).json(body);
    let response = send("POST", endpoint, request).await?;
    read_json("POST", endpoint, response).await
}

/// POST without a request body, for action endpoints
pub async fn post_empty<T>(endpoint: &str, session: &Session) -> ApiResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    let url = format!("{}{}", api_base(), endpoint);
    log::debug!("POST request to: {}", url);
    let request = with_auth(Request::post(&url), Some(session)).build();
    let response = send("POST", endpoint, request).await?;
    read_json("POST", endpoint, response).await
}

/// POST expecting `204 No Content`
pub async fn post_no_content(endpoint: &str, session: &Session) -> ApiResult<()> {
    let url = format!("{}{}", api_base(), endpoint);
    log::debug!("POST request to: {}", url);
    let request = with_auth(Request::post(&url), Some(session)).build();
    send("POST", endpoint, request).await?;
    log::info!("POST {} - Success", endpoint);
    Ok(())
}

/// Common PUT request handler
pub async fn put<T, B>(endpoint: &str, session: &Session, body: &B) -> ApiResult<T>
where
    T: for<'de> Deserialize<'de>,
    B: Serialize,
{
    let url = format!("{}{}", api_base(), endpoint);
    log::debug!("PUT request to: {}", url);
    let request = with_auth(Request::put(&url), Some(session)).json(body);
    let response = send("PUT", endpoint, request).await?;
    read_json("PUT", endpoint, response).await
}

/// Common PATCH request handler
pub async fn patch<T, B>(endpoint: &str, session: &Session, body: &B) -> ApiResult<T>
where
    T: for<'de> Deserialize<'de>,
    B: Serialize,
{
    let url = format!("{}{}", api_base(), endpoint);
    log::debug!("PATCH request to: {}", url);
    let request = with_auth(Request::patch(&url), Some(session)).json(body);
    let response = send("PATCH", endpoint, request).await?;
    read_json("PATCH", endpoint, response).await
}

/// Common DELETE request handler; the API answers `204 No Content`
pub async fn delete(endpoint: &str, session: &Session) -> ApiResult<()> {
    let url = format!("{}{}", api_base(), endpoint);
    log::debug!("DELETE request to: {}", url);
    let request = with_auth(Request::delete(&url), Some(session)).build();
    send("DELETE", endpoint, request).await?;
    log::info!("DELETE {} - Success", endpoint);
    Ok(())
}
