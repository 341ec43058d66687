//! Appointment lookup for the owner or the designated person.
//!
//! Endpoints:
//! - GET /appointment/{appointmentId}/user/{userId}
//! - GET /appointment?appointmentId=...&user=...
//!
//! Identifiers are resolved through [`EXTRACTION_CHAIN`]; the first strategy
//! yielding a non-empty value wins, independently for each identifier.

use lambda_http::{Body, Request, RequestExt, Response};
use serde::Serialize;
use shared::http::{gate_read_only, MethodGate};
use shared::{AppointmentItem, AppointmentRepository, Error, Result};
use tracing::{debug, info};

use crate::{decode_segment, reject};

/// A place in the request where appointment identifiers may be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// `/appointment/{appointmentId}/user/{userId}` anywhere in the path.
    RestPath,
    /// API Gateway path parameters `appointmentId` and `userId`.
    PathParameters,
    /// Query string parameters `appointmentId` and `user`.
    QueryString,
}

/// Strategies in priority order.
pub const EXTRACTION_CHAIN: [ExtractionStrategy; 3] = [
    ExtractionStrategy::RestPath,
    ExtractionStrategy::PathParameters,
    ExtractionStrategy::QueryString,
];

/// Identifiers found by a single strategy.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractedIds {
    pub appointment_id: Option<String>,
    pub user_id: Option<String>,
}

impl ExtractionStrategy {
    pub fn extract(self, event: &Request) -> ExtractedIds {
        match self {
            ExtractionStrategy::RestPath => ids_from_rest_path(event.uri().path()),
            ExtractionStrategy::PathParameters => {
                let params = event.path_parameters();
                ExtractedIds {
                    appointment_id: non_empty(params.first("appointmentId")),
                    user_id: non_empty(params.first("userId")),
                }
            }
            ExtractionStrategy::QueryString => {
                let params = event.query_string_parameters();
                ExtractedIds {
                    appointment_id: non_empty(params.first("appointmentId")),
                    user_id: non_empty(params.first("user")),
                }
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}

fn ids_from_rest_path(path: &str) -> ExtractedIds {
    let segments: Vec<&str> = path.split('/').collect();
    segments
        .windows(4)
        .find_map(|window| match window {
            ["appointment", appointment_id, "user", user_id]
                if !appointment_id.is_empty() && !user_id.is_empty() =>
            {
                Some(ExtractedIds {
                    appointment_id: Some(decode_segment(appointment_id)),
                    user_id: Some(decode_segment(user_id)),
                })
            }
            _ => None,
        })
        .unwrap_or_default()
}

/// Identifiers required to look up an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentLookup {
    pub appointment_id: String,
    pub user_id: String,
}

/// Resolve both identifiers through `chain`, or fail with a validation error.
pub fn extract_lookup(event: &Request, chain: &[ExtractionStrategy]) -> Result<AppointmentLookup> {
    let mut resolved = ExtractedIds::default();
    for strategy in chain {
        let found = strategy.extract(event);
        debug!(?strategy, ?found, "Tried identifier extraction");
        resolved.appointment_id = resolved.appointment_id.or(found.appointment_id);
        resolved.user_id = resolved.user_id.or(found.user_id);
    }

    match resolved {
        ExtractedIds {
            appointment_id: Some(appointment_id),
            user_id: Some(user_id),
        } => Ok(AppointmentLookup {
            appointment_id,
            user_id,
        }),
        _ => Err(Error::Validation(
            "Missing required parameters: appointmentId and user".to_string(),
        )),
    }
}

/// Ownership-checked reads from the appointments table.
pub struct AppointmentService<R> {
    repository: R,
}

impl<R: AppointmentRepository> AppointmentService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Fetch the appointment if `lookup.user_id` owns it or is its designated person.
    pub async fn get_appointment(&self, lookup: &AppointmentLookup) -> Result<AppointmentItem> {
        let item = self
            .repository
            .get_appointment(&lookup.appointment_id)
            .await?
            .ok_or_else(|| Error::NotFound("Appointment not found".to_string()))?;

        if !item.is_accessible_by(&lookup.user_id) {
            return Err(Error::Forbidden(
                "Access denied. This appointment does not belong to the specified user.".to_string(),
            ));
        }

        Ok(item)
    }
}

#[derive(Debug, Serialize)]
struct AppointmentReply {
    appointment: AppointmentItem,
}

async fn route<R: AppointmentRepository>(
    service: &AppointmentService<R>,
    event: &Request,
) -> Result<Option<AppointmentReply>> {
    if gate_read_only(event.method())? == MethodGate::Preflight {
        return Ok(None);
    }

    let lookup = extract_lookup(event, &EXTRACTION_CHAIN)?;
    info!(appointment_id = %lookup.appointment_id, "Getting appointment");

    let appointment = service.get_appointment(&lookup).await?;
    Ok(Some(AppointmentReply { appointment }))
}

/// Lambda entry point for the appointment endpoints.
pub async fn handle<R: AppointmentRepository>(
    service: &AppointmentService<R>,
    event: Request,
) -> std::result::Result<Response<Body>, lambda_http::Error> {
    info!(method = %event.method(), path = event.uri().path(), "Processing appointment request");

    match route(service, &event).await {
        Ok(Some(reply)) => shared::json_response(200, &reply),
        Ok(None) => shared::preflight_response(),
        Err(err) => reject(&err),
    }
}
