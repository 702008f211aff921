use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::schema::{Constraint, DefaultValue, Entity, FieldSpec, FieldType};

/// Authorized service center registered by an OEM or partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceCenter {
    pub name: String,
    /// Brands supported
    pub brands: Vec<String>,
    pub address: String,
    pub city: String,
    pub phone: Option<String>,
    /// Average rating (0-5)
    pub rating: Option<f64>,
}

impl Entity for ServiceCenter {
    const COLLECTION: &'static str = "servicecenter";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", FieldType::Str),
        FieldSpec::required("brands", FieldType::StrList).constrained(Constraint::NonEmpty),
        FieldSpec::required("address", FieldType::Str),
        FieldSpec::required("city", FieldType::Str),
        FieldSpec::optional("phone", FieldType::Str),
        FieldSpec::optional("rating", FieldType::Float)
            .defaults_to(DefaultValue::Float(4.5))
            .constrained(Constraint::Range { min: 0.0, max: 5.0 }),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn center(rating: Value) -> Value {
        json!({
            "name": "QuickFix",
            "brands": ["LG", "Sony"],
            "address": "12 MG Road",
            "city": "Pune",
            "rating": rating
        })
    }

    #[test]
    fn test_rating_defaults_when_omitted() {
        let mut payload = center(Value::Null);
        payload.as_object_mut().unwrap().remove("rating");
        let center = ServiceCenter::validate(payload.as_object().unwrap()).unwrap();
        assert_eq!(center.rating, Some(4.5));
    }

    #[test]
    fn test_explicit_null_rating_stays_unset() {
        let payload = center(Value::Null);
        let center = ServiceCenter::validate(payload.as_object().unwrap()).unwrap();
        assert_eq!(center.rating, None);
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        for rating in [json!(-0.1), json!(5.5), json!(6)] {
            let payload = center(rating);
            let err = ServiceCenter::validate(payload.as_object().unwrap()).unwrap_err();
            assert_eq!(err.errors[0].field, "rating");
            assert_eq!(err.errors[0].code, "range");
        }
    }

    #[test]
    fn test_integer_rating_is_accepted() {
        let payload = center(json!(5));
        let center = ServiceCenter::validate(payload.as_object().unwrap()).unwrap();
        assert_eq!(center.rating, Some(5.0));
    }

    #[test]
    fn test_brands_must_be_non_empty() {
        let mut payload = center(json!(4.0));
        payload["brands"] = json!([]);
        let err = ServiceCenter::validate(payload.as_object().unwrap()).unwrap_err();
        assert_eq!(err.errors[0].field, "brands");
        assert_eq!(err.errors[0].code, "length");
    }
}
