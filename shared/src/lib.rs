//! Shared library for WebLaunch Lambda functions.
//!
//! This crate provides configuration, error handling, HTTP helpers, record
//! models, and the DynamoDB-backed read ports used by every Lambda.

pub mod config;
pub mod dynamo;
pub mod error;
pub mod http;
pub mod models;
pub mod store;

pub use config::Config;
pub use dynamo::DynamoStore;
pub use error::{Error, Result};
pub use http::{error_response, json_response, preflight_response, CORS_GET_HEADERS};
pub use models::{AppointmentItem, BusinessDirectoryItem, BusinessRecord};
pub use store::{AppointmentRepository, BusinessRepository};
