//! Business Directory - public listing of businesses registered as users.
//!
//! Endpoints:
//! - GET /businesses - List all businesses, or filter with `?type=`
//! - GET /businesses/{id} - Get one business
//!
//! Only public-facing attributes are returned; records without a business
//! name are never surfaced.

use lambda_http::{Body, Request, RequestExt, Response};
use serde::Serialize;
use shared::http::{gate_read_only, route_path, MethodGate};
use shared::{BusinessDirectoryItem, BusinessRepository, Error, Result};
use tracing::{debug, info};

use crate::{decode_segment, reject};

/// Read-only query facade over the users table.
pub struct BusinessDirectoryService<R> {
    repository: R,
}

impl<R: BusinessRepository> BusinessDirectoryService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// All public businesses, in store order.
    pub async fn get_all_businesses(&self) -> Result<Vec<BusinessDirectoryItem>> {
        let records = self.repository.scan_businesses(None).await?;
        Ok(records
            .into_iter()
            .filter_map(BusinessDirectoryItem::from_record)
            .collect())
    }

    /// Public businesses whose stored type equals `business_type` exactly.
    pub async fn get_businesses_by_type(&self, business_type: &str) -> Result<Vec<BusinessDirectoryItem>> {
        let records = self.repository.scan_businesses(Some(business_type)).await?;
        Ok(records
            .into_iter()
            .filter(|record| record.business_type.as_deref() == Some(business_type))
            .filter_map(BusinessDirectoryItem::from_record)
            .collect())
    }

    /// A single public business, or `None` when absent or unnamed.
    pub async fn get_business_by_id(&self, id: &str) -> Result<Option<BusinessDirectoryItem>> {
        let record = self.repository.get_business(id).await?;
        Ok(record.and_then(BusinessDirectoryItem::from_record))
    }
}

/// Routes served by the directory Lambda.
#[derive(Debug, PartialEq, Eq)]
enum Route {
    List,
    Detail(String),
    Unknown,
}

impl Route {
    fn parse(path: &str, id_param: Option<&str>) -> Self {
        if let Some(id) = id_param.filter(|id| !id.is_empty()) {
            return Route::Detail(id.to_string());
        }
        if is_collection(path) {
            return Route::List;
        }
        match path.rsplit_once('/') {
            Some((parent, id)) if is_collection(parent) => Route::Detail(decode_segment(id)),
            _ => Route::Unknown,
        }
    }
}

fn is_collection(path: &str) -> bool {
    path == "/businesses" || path.ends_with("/businesses")
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Reply {
    Businesses { businesses: Vec<BusinessDirectoryItem> },
    Business { business: BusinessDirectoryItem },
}

async fn route<R: BusinessRepository>(service: &BusinessDirectoryService<R>, event: &Request) -> Result<Option<Reply>> {
    if gate_read_only(event.method())? == MethodGate::Preflight {
        return Ok(None);
    }

    let path_params = event.path_parameters();
    match Route::parse(route_path(event.uri().path()), path_params.first("id")) {
        Route::List => {
            let query = event.query_string_parameters();
            let businesses = match query.first("type").filter(|t| !t.is_empty()) {
                Some(business_type) => service.get_businesses_by_type(business_type).await?,
                None => service.get_all_businesses().await?,
            };
            debug!(count = businesses.len(), "Listed businesses");
            Ok(Some(Reply::Businesses { businesses }))
        }
        Route::Detail(id) if id.is_empty() => Err(Error::Validation("Business ID is required".to_string())),
        Route::Detail(id) => match service.get_business_by_id(&id).await? {
            Some(business) => Ok(Some(Reply::Business { business })),
            None => Err(Error::NotFound("Business not found".to_string())),
        },
        Route::Unknown => Err(Error::NotFound("Endpoint not found".to_string())),
    }
}

/// Lambda entry point for the directory endpoints.
pub async fn handle<R: BusinessRepository>(
    service: &BusinessDirectoryService<R>,
    event: Request,
) -> std::result::Result<Response<Body>, lambda_http::Error> {
    info!(method = %event.method(), path = event.uri().path(), "Processing business directory request");

    match route(service, &event).await {
        Ok(Some(reply)) => shared::json_response(200, &reply),
        Ok(None) => shared::preflight_response(),
        Err(err) => reject(&err),
    }
}
