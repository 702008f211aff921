use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::schema::{Constraint, DefaultValue, Entity, FieldSpec, FieldType};
use super::warranty::compute_warranty_end;

/// A consumer-owned product stored in their digital vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Owner user id
    pub user_id: String,
    /// Brand, e.g. "Samsung"
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    /// Category, e.g. "TV", "Washer"
    pub category: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    /// Warranty duration in months (0-120, default 12)
    pub warranty_months: Option<i32>,
    /// Link to an invoice uploaded elsewhere
    pub invoice_url: Option<String>,
}

impl Entity for Product {
    const COLLECTION: &'static str = "product";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("user_id", FieldType::Str),
        FieldSpec::required("brand", FieldType::Str),
        FieldSpec::required("model", FieldType::Str),
        FieldSpec::required("serial_number", FieldType::Str),
        FieldSpec::optional("category", FieldType::Str),
        FieldSpec::optional("purchase_date", FieldType::Date),
        FieldSpec::optional("warranty_months", FieldType::Int)
            .defaults_to(DefaultValue::Int(12))
            .constrained(Constraint::Range { min: 0.0, max: 120.0 }),
        FieldSpec::optional("invoice_url", FieldType::Str),
    ];
}

impl Product {
    pub fn warranty_end(&self) -> Option<NaiveDate> {
        compute_warranty_end(self.purchase_date, self.warranty_months.map(i64::from))
    }
}
