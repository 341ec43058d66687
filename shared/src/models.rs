//! Shared data models.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

const DEFAULT_BUSINESS_TYPE: &str = "Business";

/// Attributes read from the users table for the business directory.
pub const BUSINESS_ATTRIBUTES: [&str; 9] = [
    "id",
    "businessName",
    "businessDescription",
    "businessType",
    "contact",
    "email",
    "images",
    "location",
    "createdAt",
];

/// A user record as stored, restricted to the directory attributes.
///
/// Every attribute except `id` may be missing on the stored item. Scalars of
/// the wrong type are read as their string form; lists and maps where a
/// string is expected are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    #[serde(deserialize_with = "required_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub business_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub business_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

impl BusinessRecord {
    /// Only records with a non-empty business name are public businesses.
    pub fn is_public(&self) -> bool {
        self.business_name
            .as_deref()
            .is_some_and(|name| !name.is_empty())
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_to_string))
}

fn required_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_to_string(Value::deserialize(deserializer)?)
        .ok_or_else(|| serde::de::Error::custom("expected a scalar identifier"))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(values)) => Some(values.into_iter().filter_map(scalar_to_string).collect()),
        _ => None,
    })
}

/// Public view of a business listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDirectoryItem {
    pub id: String,
    pub business_name: String,
    pub business_description: String,
    pub business_type: String,
    pub contact: String,
    pub email: String,
    pub images: Vec<String>,
    pub location: String,
    pub created_at: String,
}

impl BusinessDirectoryItem {
    /// Project a stored record onto its public view, or `None` if it is not a
    /// public business.
    pub fn from_record(record: BusinessRecord) -> Option<Self> {
        if !record.is_public() {
            return None;
        }

        Some(Self {
            id: record.id,
            business_name: record.business_name.unwrap_or_default(),
            business_description: record.business_description.unwrap_or_default(),
            business_type: record
                .business_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_BUSINESS_TYPE.to_string()),
            contact: record.contact.unwrap_or_default(),
            email: record.email.unwrap_or_default(),
            images: record.images.unwrap_or_default(),
            location: record.location.unwrap_or_default(),
            created_at: record.created_at.unwrap_or_default(),
        })
    }
}

/// A scheduled appointment, returned to its owner exactly as stored.
///
/// Known attributes: `appointmentId`, `userId`, `personId`,
/// `appointmentDateTime`, `serviceName`, `fullName`, `email`, `phone`,
/// `duration`, `price`, `paymentStatus`, `managementToken`, `notes`,
/// `status`, `createdAt`, `updatedAt`. Only the identifiers are read here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentItem(Map<String, Value>);

impl AppointmentItem {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }

    fn string_attribute(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn appointment_id(&self) -> Option<&str> {
        self.string_attribute("appointmentId")
    }

    pub fn user_id(&self) -> Option<&str> {
        self.string_attribute("userId")
    }

    pub fn person_id(&self) -> Option<&str> {
        self.string_attribute("personId")
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The owner and the designated person may read the appointment.
    pub fn is_accessible_by(&self, requester: &str) -> bool {
        self.user_id() == Some(requester) || self.person_id() == Some(requester)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn appointment(value: Value) -> AppointmentItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let record = BusinessRecord {
            id: "b1".to_string(),
            business_name: Some("Cafe".to_string()),
            ..Default::default()
        };

        let item = BusinessDirectoryItem::from_record(record).unwrap();
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "id": "b1",
                "businessName": "Cafe",
                "businessDescription": "",
                "businessType": "Business",
                "contact": "",
                "email": "",
                "images": [],
                "location": "",
                "createdAt": "",
            })
        );
    }

    #[test]
    fn test_record_without_name_is_not_public() {
        let unnamed = BusinessRecord {
            id: "u1".to_string(),
            ..Default::default()
        };
        let empty = BusinessRecord {
            id: "u2".to_string(),
            business_name: Some(String::new()),
            ..Default::default()
        };

        assert!(BusinessDirectoryItem::from_record(unnamed).is_none());
        assert!(BusinessDirectoryItem::from_record(empty).is_none());
    }

    #[test]
    fn test_record_deserializes_from_partial_item() {
        let record: BusinessRecord = serde_json::from_value(json!({
            "id": "b2",
            "businessName": "Florist",
            "images": ["a.png", "b.png"],
        }))
        .unwrap();

        assert_eq!(record.images.unwrap(), vec!["a.png", "b.png"]);
        assert!(record.location.is_none());
    }

    #[test]
    fn test_record_tolerates_mistyped_attributes() {
        let record: BusinessRecord = serde_json::from_value(json!({
            "id": "b3",
            "businessName": "Cafe",
            "contact": 353871234567_u64,
            "email": null,
            "location": {"city": "Cork"},
            "images": [1, "a.png", {"bad": true}],
            "createdAt": true,
        }))
        .unwrap();

        assert_eq!(record.contact.as_deref(), Some("353871234567"));
        assert!(record.email.is_none());
        assert!(record.location.is_none());
        assert_eq!(record.images.as_deref(), Some(&["1".to_string(), "a.png".to_string()][..]));
        assert_eq!(record.created_at.as_deref(), Some("true"));

        let view = BusinessDirectoryItem::from_record(record).unwrap();
        assert_eq!(view.location, "");

        let not_a_list: BusinessRecord =
            serde_json::from_value(json!({"id": "b4", "images": "a.png"})).unwrap();
        assert!(not_a_list.images.is_none());
    }

    #[test]
    fn test_record_without_id_is_rejected() {
        assert!(serde_json::from_value::<BusinessRecord>(json!({"businessName": "Cafe"})).is_err());
    }

    #[test]
    fn test_access_check() {
        let item = appointment(json!({"appointmentId": "A1", "userId": "u1", "personId": "u2"}));
        assert!(item.is_accessible_by("u1"));
        assert!(item.is_accessible_by("u2"));
        assert!(!item.is_accessible_by("u3"));

        let no_person = appointment(json!({"appointmentId": "A2", "userId": "u1"}));
        assert!(!no_person.is_accessible_by(""));

        let no_owner = appointment(json!({"appointmentId": "A3", "userId": null}));
        assert!(!no_owner.is_accessible_by("u1"));
    }

    #[test]
    fn test_appointment_is_passed_through_unchanged() {
        let stored = json!({
            "appointmentId": "A1",
            "userId": "u1",
            "duration": "30",
            "price": "25.00",
            "managementToken": "tok",
            "notes": null,
            "reminderSent": true,
        });

        let item = appointment(stored.clone());
        assert_eq!(item.appointment_id(), Some("A1"));
        assert_eq!(item.attributes().len(), 7);
        assert_eq!(serde_json::to_value(&item).unwrap(), stored);
    }
}
