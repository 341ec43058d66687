//! HTTP helpers for Lambda functions.

use lambda_http::http::Method;
use lambda_http::{Body, Response};
use serde::Serialize;

use crate::Error;

/// Headers attached to every response of the read-only endpoints.
pub const CORS_GET_HEADERS: [(&str, &str); 5] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Credentials", "true"),
    ("Access-Control-Allow-Methods", "GET, OPTIONS"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type, Authorization, X-Requested-With",
    ),
    ("Content-Type", "application/json"),
];

/// Error payload: `{"error": ..., "details": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        if err.is_fault() {
            Self {
                error: "Internal server error".to_string(),
                details: Some(err.message()),
            }
        } else {
            Self {
                error: err.message(),
                details: None,
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Body>, lambda_http::Error> {
    let mut builder = Response::builder().status(status);
    for (name, value) in CORS_GET_HEADERS {
        builder = builder.header(name, value);
    }
    Ok(builder.body(Body::from(serde_json::to_string(data)?))?)
}

/// Create an error response whose status and body follow the error kind.
pub fn error_response(err: &Error) -> Result<Response<Body>, lambda_http::Error> {
    json_response(err.status_code(), &ErrorBody::from(err))
}

/// Acknowledge a CORS preflight request.
pub fn preflight_response() -> Result<Response<Body>, lambda_http::Error> {
    json_response(
        200,
        &MessageBody {
            message: "CORS preflight successful",
        },
    )
}

/// Outcome of checking the method of a read-only endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodGate {
    Preflight,
    Read,
}

/// Accept GET and OPTIONS; everything else is rejected with 405.
pub fn gate_read_only(method: &Method) -> crate::Result<MethodGate> {
    match *method {
        Method::OPTIONS => Ok(MethodGate::Preflight),
        Method::GET => Ok(MethodGate::Read),
        _ => Err(Error::MethodNotAllowed),
    }
}

/// Strip the API Gateway `/api` stage prefix if present.
pub fn route_path(raw_path: &str) -> &str {
    match raw_path.strip_prefix("/api") {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => raw_path,
    }
}
