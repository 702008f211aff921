use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::schema::{parse_date, DefaultValue, Entity, FieldSpec, FieldType};

/// Days counted per warranty month.
pub const DAYS_PER_MONTH: u64 = 30;

/// Warranty linked to a product. No endpoint writes these yet; product
/// listings derive the end date instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Warranty {
    pub product_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub extended: bool,
}

impl Entity for Warranty {
    const COLLECTION: &'static str = "warranty";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("product_id", FieldType::Str),
        FieldSpec::required("start_date", FieldType::Date),
        FieldSpec::required("end_date", FieldType::Date),
        FieldSpec::with_default("extended", FieldType::Bool, DefaultValue::Bool(false)),
    ];
}

/// End of a warranty of `months` 30-day blocks starting at `purchase_date`.
///
/// Returns `None` when either input is missing or `months` is not positive.
pub fn compute_warranty_end(
    purchase_date: Option<NaiveDate>,
    months: Option<i64>,
) -> Option<NaiveDate> {
    let purchase_date = purchase_date?;
    let months = u64::try_from(months?).ok().filter(|m| *m > 0)?;
    purchase_date.checked_add_days(Days::new(months.checked_mul(DAYS_PER_MONTH)?))
}

/// Same as [`compute_warranty_end`], reading the raw stored fields.
///
/// Unparseable dates and non-integral month counts yield `None`.
pub fn warranty_end_from_stored(
    purchase_date: Option<&Value>,
    months: Option<&Value>,
) -> Option<NaiveDate> {
    let purchase_date = purchase_date.and_then(Value::as_str).and_then(parse_date);
    let months = months.and_then(|m| {
        m.as_i64().or_else(|| {
            m.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
    });
    compute_warranty_end(purchase_date, months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_uses_thirty_day_months() {
        assert_eq!(
            compute_warranty_end(Some(date(2024, 1, 1)), Some(12)),
            Some(date(2024, 12, 26))
        );
        assert_eq!(compute_warranty_end(Some(date(2024, 1, 31)), Some(1)), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_missing_or_non_positive_inputs() {
        let d = date(2024, 6, 15);
        assert_eq!(compute_warranty_end(None, Some(12)), None);
        assert_eq!(compute_warranty_end(Some(d), None), None);
        assert_eq!(compute_warranty_end(Some(d), Some(0)), None);
        assert_eq!(compute_warranty_end(Some(d), Some(-3)), None);
    }

    #[test]
    fn test_overflow_yields_none() {
        assert_eq!(compute_warranty_end(Some(NaiveDate::MAX), Some(1)), None);
        assert_eq!(compute_warranty_end(Some(date(2024, 1, 1)), Some(i64::MAX)), None);
    }

    #[test]
    fn test_stored_forms() {
        let expected = Some(date(2024, 12, 26));
        assert_eq!(
            warranty_end_from_stored(Some(&json!("2024-01-01")), Some(&json!(12))),
            expected
        );
        assert_eq!(
            warranty_end_from_stored(Some(&json!("2024-01-01T10:00:00Z")), Some(&json!(12))),
            expected
        );
        assert_eq!(
            warranty_end_from_stored(Some(&json!("2024-01-01")), Some(&json!(12.0))),
            expected
        );
    }

    #[test]
    fn test_malformed_stored_values_yield_none() {
        assert_eq!(warranty_end_from_stored(Some(&json!("not a date")), Some(&json!(12))), None);
        assert_eq!(warranty_end_from_stored(Some(&json!(20240101)), Some(&json!(12))), None);
        assert_eq!(warranty_end_from_stored(Some(&Value::Null), Some(&json!(12))), None);
        assert_eq!(warranty_end_from_stored(Some(&json!("2024-01-01")), Some(&json!("12"))), None);
        assert_eq!(warranty_end_from_stored(None, None), None);
    }

    #[test]
    fn test_warranty_requires_both_dates() {
        let payload = json!({"product_id": "p1", "start_date": "2024-01-01"});
        let err = Warranty::validate(payload.as_object().unwrap()).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["end_date"]);
    }

    #[test]
    fn test_warranty_defaults_to_not_extended() {
        let payload = json!({
            "product_id": "p1",
            "start_date": "2024-01-01",
            "end_date": "2025-01-01"
        });
        let warranty = Warranty::validate(payload.as_object().unwrap()).unwrap();
        assert!(!warranty.extended);
        assert_eq!(warranty.end_date, date(2025, 1, 1));
    }
}
