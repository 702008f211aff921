use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::schema::{DefaultValue, Entity, FieldSpec, FieldType};

pub const STATUS_PENDING: &str = "pending";

/// Fields owned by the service rather than the submitting client.
pub const SERVER_MANAGED_FIELDS: &[&str] = &["status", "assigned_center_id"];

/// A service request raised by a user for one of their products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceRequest {
    pub user_id: String,
    pub product_id: String,
    /// Problem description
    pub issue_description: String,
    pub preferred_date: Option<NaiveDate>,
    /// City for assignment
    pub city: Option<String>,
    /// Photo/video evidence links
    pub media_urls: Option<Vec<String>>,
    /// pending, assigned, in_progress, completed or cancelled
    pub status: String,
    pub assigned_center_id: Option<String>,
}

impl Entity for ServiceRequest {
    const COLLECTION: &'static str = "servicerequest";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("user_id", FieldType::Str),
        FieldSpec::required("product_id", FieldType::Str),
        FieldSpec::required("issue_description", FieldType::Str),
        FieldSpec::optional("preferred_date", FieldType::Date),
        FieldSpec::optional("city", FieldType::Str),
        FieldSpec::optional("media_urls", FieldType::StrList),
        FieldSpec::with_default("status", FieldType::Str, DefaultValue::Str(STATUS_PENDING)),
        FieldSpec::optional("assigned_center_id", FieldType::Str),
    ];
}
