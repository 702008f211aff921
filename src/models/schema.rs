use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::ValidateEmail;

use crate::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Str,
    /// String checked by [`Constraint::Email`].
    Email,
    Bool,
    Int,
    Float,
    /// ISO `YYYY-MM-DD`, stored as a string.
    Date,
    StrList,
}

impl FieldType {
    pub fn annotation(self) -> &'static str {
        match self {
            FieldType::Str => "str",
            FieldType::Email => "EmailStr",
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Date => "date",
            FieldType::StrList => "List[str]",
        }
    }

    /// Checks the JSON type and returns the value in its stored form.
    fn coerce(self, raw: &Value) -> Option<Value> {
        match self {
            FieldType::Str | FieldType::Email => raw.is_string().then(|| raw.clone()),
            FieldType::Bool => raw.is_boolean().then(|| raw.clone()),
            FieldType::Int => raw.as_i64().map(Value::from),
            FieldType::Float => raw.as_f64().map(Value::from),
            FieldType::Date => raw
                .as_str()
                .and_then(parse_date)
                .map(|date| Value::String(date.to_string())),
            FieldType::StrList => raw
                .as_array()
                .filter(|items| items.iter().all(Value::is_string))
                .map(|_| raw.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'static str),
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            DefaultValue::Bool(v) => Value::from(v),
            DefaultValue::Int(v) => Value::from(v),
            DefaultValue::Float(v) => Value::from(v),
            DefaultValue::Str(v) => Value::from(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Inclusive numeric range.
    Range { min: f64, max: f64 },
    Email,
    NonEmpty,
}

impl Constraint {
    fn check(self, field: &str, value: &Value) -> Result<(), FieldError> {
        match self {
            Constraint::Range { min, max } => match value.as_f64() {
                Some(n) if n >= min && n <= max => Ok(()),
                _ => Err(FieldError::new(
                    field,
                    "range",
                    format!("must be between {min} and {max}"),
                )),
            },
            Constraint::Email => {
                let email = value.as_str().unwrap_or_default().to_string();
                if email.validate_email() {
                    Ok(())
                } else {
                    Err(FieldError::new(field, "email", "must be a valid email address"))
                }
            }
            Constraint::NonEmpty => match value {
                Value::Array(items) if items.is_empty() => {
                    Err(FieldError::new(field, "length", "must not be empty"))
                }
                Value::String(s) if s.is_empty() => {
                    Err(FieldError::new(field, "length", "must not be empty"))
                }
                _ => Ok(()),
            },
        }
    }
}

/// Declared shape of a single entity field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    /// Accepts `null` and is reported as `Optional[...]`.
    pub nullable: bool,
    pub default: Option<DefaultValue>,
    pub constraint: Option<Constraint>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
            nullable: false,
            default: None,
            constraint: None,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            required: false,
            nullable: true,
            ..Self::required(name, ty)
        }
    }

    /// Non-nullable field that falls back to `default` when omitted.
    pub const fn with_default(name: &'static str, ty: FieldType, default: DefaultValue) -> Self {
        Self {
            required: false,
            default: Some(default),
            ..Self::required(name, ty)
        }
    }

    pub const fn defaults_to(self, default: DefaultValue) -> Self {
        Self {
            required: false,
            default: Some(default),
            ..self
        }
    }

    pub const fn constrained(self, constraint: Constraint) -> Self {
        Self {
            constraint: Some(constraint),
            ..self
        }
    }

    pub fn annotation(&self) -> String {
        if self.nullable {
            format!("Optional[{}]", self.ty.annotation())
        } else {
            self.ty.annotation().to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    /// One of `missing`, `type`, `range`, `email`, `length`.
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("validation failed for {} field(s)", .errors.len())]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

/// Checks `payload` against `fields`, collecting every violation.
///
/// On success the returned record holds exactly the declared fields, in
/// declaration order. Defaults apply only to omitted keys; an explicit `null`
/// is kept for nullable fields and rejected for the rest. Absent optionals
/// are stored as null and undeclared payload keys are dropped.
pub fn validate_fields(
    fields: &[FieldSpec],
    payload: &Document,
) -> Result<Document, ValidationFailure> {
    let mut record = Document::with_capacity(fields.len());
    let mut errors = Vec::new();

    for spec in fields {
        let raw = match payload.get(spec.name) {
            None if spec.required => {
                errors.push(FieldError::new(spec.name, "missing", "field required"));
                continue;
            }
            None => {
                let value = spec.default.map(DefaultValue::to_value).unwrap_or(Value::Null);
                record.insert(spec.name.to_string(), value);
                continue;
            }
            Some(Value::Null) if spec.nullable => {
                record.insert(spec.name.to_string(), Value::Null);
                continue;
            }
            Some(Value::Null) if spec.required => {
                errors.push(FieldError::new(spec.name, "missing", "field required"));
                continue;
            }
            Some(raw) => raw,
        };

        let Some(value) = spec.ty.coerce(raw) else {
            errors.push(FieldError::new(
                spec.name,
                "type",
                format!("expected {}", spec.ty.annotation()),
            ));
            continue;
        };

        if let Some(constraint) = spec.constraint {
            if let Err(e) = constraint.check(spec.name, &value) {
                errors.push(e);
                continue;
            }
        }

        record.insert(spec.name.to_string(), value);
    }

    if errors.is_empty() {
        Ok(record)
    } else {
        Err(ValidationFailure { errors })
    }
}

/// Parses a stored or submitted date: `YYYY-MM-DD`, RFC 3339, or a naive
/// `YYYY-MM-DDTHH:MM:SS[.f]` date-time (truncated to its date).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectionSchema {
    pub name: String,
    /// Field name to type annotation, in declaration order.
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

/// A record kind persisted in its own collection.
pub trait Entity: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;
    const FIELDS: &'static [FieldSpec];

    fn validate(payload: &Document) -> Result<Self, ValidationFailure> {
        let record = validate_fields(Self::FIELDS, payload)?;
        serde_json::from_value(Value::Object(record)).map_err(|e| ValidationFailure {
            errors: vec![FieldError::new("body", "type", e.to_string())],
        })
    }

    fn to_document(&self) -> Result<Document, serde_json::Error> {
        serde_json::to_value(self).and_then(serde_json::from_value)
    }

    fn schema() -> CollectionSchema {
        CollectionSchema {
            name: Self::COLLECTION.to_string(),
            fields: Self::FIELDS
                .iter()
                .map(|f| (f.name.to_string(), Value::String(f.annotation())))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::required("name", FieldType::Str),
        FieldSpec::optional("when", FieldType::Date),
        FieldSpec::optional("count", FieldType::Int)
            .defaults_to(DefaultValue::Int(12))
            .constrained(Constraint::Range { min: 0.0, max: 120.0 }),
        FieldSpec::with_default("active", FieldType::Bool, DefaultValue::Bool(true)),
        FieldSpec::optional("tags", FieldType::StrList),
    ];

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_defaults_and_nulls_are_filled() {
        let record = validate_fields(FIELDS, &doc(json!({"name": "tv"}))).unwrap();
        assert_eq!(
            Value::Object(record),
            json!({"name": "tv", "when": null, "count": 12, "active": true, "tags": null})
        );
    }

    #[test]
    fn test_explicit_null_is_kept_for_nullable_fields() {
        let record =
            validate_fields(FIELDS, &doc(json!({"name": "tv", "count": null, "when": null})))
                .unwrap();
        assert_eq!(record["count"], Value::Null);
        assert_eq!(record["when"], Value::Null);
    }

    #[test]
    fn test_explicit_null_is_rejected_for_non_nullable_fields() {
        let err = validate_fields(FIELDS, &doc(json!({"name": null, "active": null}))).unwrap_err();
        let codes: Vec<_> =
            err.errors.iter().map(|e| (e.field.as_str(), e.code.as_str())).collect();
        assert_eq!(codes, vec![("name", "missing"), ("active", "type")]);
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let record =
            validate_fields(FIELDS, &doc(json!({"name": "tv", "_id": "x", "id": "y"}))).unwrap();
        assert!(!record.contains_key("_id"));
        assert!(!record.contains_key("id"));
    }

    #[test]
    fn test_every_violation_is_reported() {
        let err = validate_fields(
            FIELDS,
            &doc(json!({"when": "yesterday", "count": 121, "active": "yes", "tags": [1]})),
        )
        .unwrap_err();
        let codes: Vec<_> =
            err.errors.iter().map(|e| (e.field.as_str(), e.code.as_str())).collect();
        assert_eq!(
            codes,
            vec![
                ("name", "missing"),
                ("when", "type"),
                ("count", "range"),
                ("active", "type"),
                ("tags", "type"),
            ]
        );
    }

    #[test]
    fn test_int_rejects_fractional_numbers() {
        let err = validate_fields(FIELDS, &doc(json!({"name": "tv", "count": 12.5}))).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["count"]);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        for count in [0, 120] {
            assert!(validate_fields(FIELDS, &doc(json!({"name": "tv", "count": count}))).is_ok());
        }
        assert!(validate_fields(FIELDS, &doc(json!({"name": "tv", "count": -1}))).is_err());
    }

    #[test]
    fn test_dates_are_normalized() {
        let record = validate_fields(
            FIELDS,
            &doc(json!({"name": "tv", "when": "2024-03-05T18:30:00Z"})),
        )
        .unwrap();
        assert_eq!(record["when"], json!("2024-03-05"));
    }

    #[test]
    fn test_parse_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(parse_date("2024-01-01"), expected);
        assert_eq!(parse_date("2024-01-01T23:59:59+05:30"), expected);
        assert_eq!(parse_date("2024-01-01T08:00:00.250"), expected);
        assert_eq!(parse_date("01/01/2024"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_annotations() {
        let annotations: Vec<_> = FIELDS.iter().map(FieldSpec::annotation).collect();
        assert_eq!(
            annotations,
            vec!["str", "Optional[date]", "Optional[int]", "bool", "Optional[List[str]]"]
        );
    }
}
