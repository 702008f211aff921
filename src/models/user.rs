use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::schema::{Constraint, DefaultValue, Entity, FieldSpec, FieldType};

/// End user who stores products and books services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Full name
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// City for geo features
    pub city: Option<String>,
    pub is_active: bool,
}

impl Entity for User {
    const COLLECTION: &'static str = "user";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", FieldType::Str),
        FieldSpec::required("email", FieldType::Email).constrained(Constraint::Email),
        FieldSpec::optional("phone", FieldType::Str),
        FieldSpec::optional("city", FieldType::Str),
        FieldSpec::with_default("is_active", FieldType::Bool, DefaultValue::Bool(true)),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> crate::store::Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_user_defaults_to_active() {
        let payload = json!({"name": "Asha", "email": "asha@example.com"});
        let user = User::validate(&doc(payload)).unwrap();
        assert!(user.is_active);
        assert_eq!(user.phone, None);
    }

    #[test]
    fn test_malformed_email_is_rejected() {
        let payload = json!({"name": "Asha", "email": "asha.example.com"});
        let err = User::validate(&doc(payload)).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "email");
        assert_eq!(err.errors[0].code, "email");
    }

    #[test]
    fn test_email_is_reported_as_email_type() {
        let schema = User::schema();
        assert_eq!(schema.fields["email"], "EmailStr");
        assert_eq!(schema.fields["phone"], "Optional[str]");
    }
}
