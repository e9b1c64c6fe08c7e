//! Request bodies and their field rules.

pub mod comment;
pub mod offer;
pub mod user;

pub use comment::CreateCommentDto;
pub use offer::{CreateOfferDto, UpdateOfferDto};
pub use user::{CreateUserDto, LoginUserDto};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::FieldError;

/// Field-level rules for a request body, checked against the raw JSON
/// object before the typed body is built. Every rejected field is reported,
/// whether it has the wrong type or breaks a rule.
pub trait Validate: DeserializeOwned {
    fn validate(fields: &mut Fields<'_>);
}

/// Reads typed fields out of a raw JSON object and collects one
/// `FieldError` per rejected field.
pub struct Fields<'a> {
    raw: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    pub fn new(raw: &'a Map<String, Value>) -> Self {
        Self {
            raw,
            errors: Vec::new(),
        }
    }

    /// A field that must be present, non-null and of type `F`.
    pub fn required<F: DeserializeOwned>(&mut self, name: &str) -> Option<F> {
        self.field(name, true)
    }

    /// A field that may be absent or null.
    pub fn optional<F: DeserializeOwned>(&mut self, name: &str) -> Option<F> {
        self.field(name, false)
    }

    pub fn field<F: DeserializeOwned>(&mut self, name: &str, required: bool) -> Option<F> {
        let raw = self.raw;
        match raw.get(name) {
            None | Some(Value::Null) => {
                if required {
                    self.reject(name, Value::Null, format!("{} is required", name));
                }
                None
            }
            Some(value) => match serde_json::from_value::<F>(value.clone()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    self.reject(name, value.clone(), e.to_string());
                    None
                }
            },
        }
    }

    pub fn reject(&mut self, field: &str, value: impl Into<Value>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, value, message));
    }

    pub fn length(&mut self, field: &str, value: &str, (min, max): (usize, usize)) {
        let len = value.chars().count();
        if len < min {
            self.reject(field, value, format!("Minimum {} length must be {} chars", field, min));
        } else if len > max {
            self.reject(field, value, format!("Maximum {} length must be {} chars", field, max));
        }
    }

    pub fn range(&mut self, field: &str, value: i64, (min, max): (i64, i64)) {
        if value < min || value > max {
            self.reject(field, value, format!("{} must be between {} and {}", field, min, max));
        }
    }

    pub fn coordinates(&mut self, latitude: Option<f64>, longitude: Option<f64>) {
        if let Some(lat) = latitude {
            if !(-90.0..=90.0).contains(&lat) {
                self.reject(
                    "latitude",
                    json_number(lat),
                    "latitude must have a correct lat. coordinate format",
                );
            }
        }
        if let Some(lon) = longitude {
            if !(-180.0..=180.0).contains(&lon) {
                self.reject(
                    "longitude",
                    json_number(lon),
                    "longitude must have a correct long. coordinate format",
                );
            }
        }
    }

    pub fn email(&mut self, email: &str) {
        if !is_email(email) {
            self.reject("email", email, "email must be valid");
        }
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Run `T`'s rules over a raw JSON object.
pub fn check<T: Validate>(raw: &Map<String, Value>) -> Vec<FieldError> {
    let mut fields = Fields::new(raw);
    T::validate(&mut fields);
    fields.into_errors()
}

/// Field names `T` rejects in `body`, in report order.
#[cfg(test)]
pub(crate) fn rejected<T: Validate>(body: Value) -> Vec<String> {
    match body {
        Value::Object(raw) => check::<T>(&raw).into_iter().map(|e| e.field).collect(),
        other => panic!("expected a JSON object, got {}", other),
    }
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn is_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_email("a@b.com"));
        assert!(is_email("first.last@mail.example.org"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.com"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("a@@b.com"));
        assert!(!is_email("a@b.com."));
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let raw = Map::new();
        let mut fields = Fields::new(&raw);
        fields.length("username", "Жанна", (1, 5));
        fields.length("username", "", (1, 5));

        let errors = fields.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "username");
    }

    #[test]
    fn missing_required_field_and_null_optional() {
        let raw = serde_json::json!({"rating": null, "text": 7});
        let raw = raw.as_object().unwrap();
        let mut fields = Fields::new(raw);

        assert_eq!(fields.optional::<i64>("rating"), None);
        assert_eq!(fields.required::<String>("title"), None);
        assert_eq!(fields.required::<String>("text"), None);

        let errors = fields.into_errors();
        let names: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, vec!["title", "text"]);
        assert_eq!(errors[0].messages, vec!["title is required"]);
        assert_eq!(errors[1].value, serde_json::json!(7));
    }
}
