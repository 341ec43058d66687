//! Read-only API Gateway handlers for the business directory and appointments.
//!
//! Each Lambda binary in `src/bin` wires one of these modules to a
//! `DynamoStore` built at cold start.

pub mod appointments;
pub mod business_directory;

use std::borrow::Cow;

use lambda_http::{Body, Response};
use tracing::{error, warn};

/// Percent-decode one path segment, keeping it raw if it is not valid UTF-8.
pub(crate) fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| segment.to_string())
}

/// Turn a domain error into its response, logging it at a matching level.
pub(crate) fn reject(err: &shared::Error) -> Result<Response<Body>, lambda_http::Error> {
    if err.is_fault() {
        error!(error = %err, "Request failed");
    } else {
        warn!(status = err.status_code(), error = %err, "Request rejected");
    }
    shared::error_response(err)
}
