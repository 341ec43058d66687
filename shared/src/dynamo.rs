//! DynamoDB adapter for the read ports.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::models::{AppointmentItem, BusinessRecord, BUSINESS_ATTRIBUTES};
use crate::store::{AppointmentRepository, BusinessRepository};
use crate::{Config, Result};

/// `location` is a DynamoDB reserved word and must be aliased.
const LOCATION_ALIAS: &str = "#location";

/// Both tables behind one client, created once per cold start.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
    users_table: String,
    appointments_table: String,
}

impl DynamoStore {
    /// Build a client for the configured region.
    pub async fn connect(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .load()
            .await;

        Self::new(Client::new(&sdk_config), config)
    }

    /// Wrap an existing client.
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            users_table: config.users_table_name.clone(),
            appointments_table: config.appointments_table_name.clone(),
        }
    }
}

#[async_trait]
impl BusinessRepository for DynamoStore {
    async fn scan_businesses(&self, business_type: Option<&str>) -> Result<Vec<BusinessRecord>> {
        let mut request = self
            .client
            .scan()
            .table_name(&self.users_table)
            .projection_expression(business_projection())
            .expression_attribute_names(LOCATION_ALIAS, "location")
            .filter_expression(business_filter(business_type.is_some()))
            .expression_attribute_values(":empty", AttributeValue::S(String::new()));

        if let Some(business_type) = business_type {
            request = request
                .expression_attribute_values(":type", AttributeValue::S(business_type.to_string()));
        }

        let mut pages = request.into_paginator().send();
        let mut records = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page?;
            records.extend(decode_businesses(page.items.unwrap_or_default()));
        }

        debug!(table = %self.users_table, count = records.len(), "Scanned business records");
        Ok(records)
    }

    async fn get_business(&self, id: &str) -> Result<Option<BusinessRecord>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.users_table)
            .key("id", AttributeValue::S(id.to_string()))
            .projection_expression(business_projection())
            .expression_attribute_names(LOCATION_ALIAS, "location")
            .send()
            .await?;

        output.item.map(from_item).transpose()
    }
}

#[async_trait]
impl AppointmentRepository for DynamoStore {
    async fn get_appointment(&self, appointment_id: &str) -> Result<Option<AppointmentItem>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.appointments_table)
            .key("appointmentId", AttributeValue::S(appointment_id.to_string()))
            .send()
            .await?;

        output.item.map(from_item).transpose()
    }
}

/// Projection over the directory attributes, with `location` aliased.
fn business_projection() -> String {
    BUSINESS_ATTRIBUTES
        .iter()
        .map(|&name| if name == "location" { LOCATION_ALIAS } else { name })
        .collect::<Vec<_>>()
        .join(", ")
}

fn business_filter(by_type: bool) -> &'static str {
    if by_type {
        "attribute_exists(businessName) AND businessName <> :empty AND businessType = :type"
    } else {
        "attribute_exists(businessName) AND businessName <> :empty"
    }
}

/// Decode scanned items, skipping any that cannot be read as a business.
fn decode_businesses(items: Vec<HashMap<String, AttributeValue>>) -> Vec<BusinessRecord> {
    items
        .into_iter()
        .filter_map(|item| match from_item::<BusinessRecord>(item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "Skipping unreadable business record");
                None
            }
        })
        .collect()
}

/// Deserialize a stored item through its JSON form.
fn from_item<T: DeserializeOwned>(item: HashMap<String, AttributeValue>) -> Result<T> {
    Ok(serde_json::from_value(item_to_json(item))?)
}

/// Convert a DynamoDB item into a JSON object.
pub fn item_to_json(item: HashMap<String, AttributeValue>) -> Value {
    Value::Object(
        item.into_iter()
            .map(|(name, value)| (name, attribute_to_json(value)))
            .collect::<Map<_, _>>(),
    )
}

fn attribute_to_json(value: AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s),
        AttributeValue::N(n) => number_to_json(n),
        AttributeValue::Bool(b) => Value::Bool(b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(list) => Value::Array(list.into_iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => item_to_json(map),
        AttributeValue::Ss(set) => Value::Array(set.into_iter().map(Value::String).collect()),
        AttributeValue::Ns(set) => Value::Array(set.into_iter().map(number_to_json).collect()),
        AttributeValue::B(blob) => Value::String(STANDARD.encode(blob.as_ref())),
        AttributeValue::Bs(blobs) => Value::Array(
            blobs
                .into_iter()
                .map(|blob| Value::String(STANDARD.encode(blob.as_ref())))
                .collect(),
        ),
        _ => Value::Null,
    }
}

/// DynamoDB numbers arrive as strings; keep integers exact.
fn number_to_json(n: String) -> Value {
    if let Ok(i) = n.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(u) = n.parse::<u64>() {
        return Value::Number(u.into());
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::primitives::Blob;
    use serde_json::json;

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    #[test]
    fn test_projection_aliases_location() {
        assert_eq!(
            business_projection(),
            "id, businessName, businessDescription, businessType, contact, email, images, #location, createdAt"
        );
    }

    #[test]
    fn test_filter_expression() {
        assert!(!business_filter(false).contains(":type"));
        assert!(business_filter(true).ends_with("businessType = :type"));
    }

    #[test]
    fn test_attribute_conversion() {
        let item = HashMap::from([
            ("name".to_string(), s("Cafe")),
            ("count".to_string(), AttributeValue::N("42".to_string())),
            ("price".to_string(), AttributeValue::N("12.5".to_string())),
            ("open".to_string(), AttributeValue::Bool(true)),
            ("gone".to_string(), AttributeValue::Null(true)),
            ("images".to_string(), AttributeValue::L(vec![s("a.png"), s("b.png")])),
            ("tags".to_string(), AttributeValue::Ss(vec!["x".to_string()])),
            (
                "address".to_string(),
                AttributeValue::M(HashMap::from([("city".to_string(), s("Cork"))])),
            ),
            ("raw".to_string(), AttributeValue::B(Blob::new(b"hi".to_vec()))),
        ]);

        assert_eq!(
            item_to_json(item),
            json!({
                "name": "Cafe",
                "count": 42,
                "price": 12.5,
                "open": true,
                "gone": null,
                "images": ["a.png", "b.png"],
                "tags": ["x"],
                "address": {"city": "Cork"},
                "raw": "aGk=",
            })
        );
    }

    #[test]
    fn test_scan_decoding_skips_only_unreadable_items() {
        let items = vec![
            HashMap::from([
                ("id".to_string(), s("b1")),
                ("businessName".to_string(), s("Cafe")),
                ("contact".to_string(), AttributeValue::N("353871234567".to_string())),
                ("images".to_string(), AttributeValue::L(vec![AttributeValue::N("7".to_string())])),
            ]),
            HashMap::from([("businessName".to_string(), s("No Key"))]),
            HashMap::from([
                ("id".to_string(), s("b2")),
                ("businessName".to_string(), s("Salon")),
            ]),
        ];

        let records = decode_businesses(items);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
        assert_eq!(records[0].contact.as_deref(), Some("353871234567"));
        assert_eq!(records[0].images.as_deref(), Some(&["7".to_string()][..]));
    }

    #[test]
    fn test_appointment_from_item_keeps_stored_shape() {
        let item = HashMap::from([
            ("appointmentId".to_string(), s("A1")),
            ("userId".to_string(), s("u1")),
            ("personId".to_string(), s("u2")),
            ("duration".to_string(), AttributeValue::N("45".to_string())),
            ("price".to_string(), s("25.00")),
            ("notes".to_string(), AttributeValue::Null(true)),
            ("managementToken".to_string(), s("tok")),
        ]);

        let appointment: AppointmentItem = from_item(item).unwrap();
        assert_eq!(appointment.person_id(), Some("u2"));
        assert_eq!(
            serde_json::to_value(&appointment).unwrap(),
            json!({
                "appointmentId": "A1",
                "userId": "u1",
                "personId": "u2",
                "duration": 45,
                "price": "25.00",
                "notes": null,
                "managementToken": "tok",
            })
        );
    }
}
