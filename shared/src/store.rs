//! Read ports over the backing tables.
//!
//! Handlers depend on these traits; `DynamoStore` is the production adapter
//! and tests substitute in-memory implementations.

use async_trait::async_trait;

use crate::models::{AppointmentItem, BusinessRecord};
use crate::Result;

/// Read access to business records in the users table.
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    /// Scan for records with a non-empty business name, optionally restricted
    /// to an exact business type. Order is whatever the store yields.
    async fn scan_businesses(&self, business_type: Option<&str>) -> Result<Vec<BusinessRecord>>;

    /// Point lookup of a user record by `id`.
    async fn get_business(&self, id: &str) -> Result<Option<BusinessRecord>>;
}

/// Read access to the appointments table.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Point lookup of an appointment by `appointmentId`.
    async fn get_appointment(&self, appointment_id: &str) -> Result<Option<AppointmentItem>>;
}
