//! Field checks shared by the request payloads.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::FieldErrors;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NULL: &str = "This field may not be null.";
pub const INVALID_STRING: &str = "Not a valid string.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const INVALID_NUMBER: &str = "A valid number is required.";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Payload field deserializer that keeps an explicit `null` as `Some(Value::Null)`,
/// so it is not mistaken for an omitted field. Use with `#[serde(default)]`.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Accept a JSON string, or a number rendered as one.
pub fn string(errors: &mut FieldErrors, field: &str, value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => {
            errors.add(field, NULL);
            None
        }
        _ => {
            errors.add(field, INVALID_STRING);
            None
        }
    }
}

/// Trim a text field and enforce its length. `allow_blank` mirrors optional
/// text columns that store an empty string.
pub fn text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<Value>,
    max_len: Option<usize>,
    allow_blank: bool,
) -> Option<String> {
    let value = string(errors, field, value)?.trim().to_string();
    if value.is_empty() && !allow_blank {
        errors.add(field, BLANK);
        return None;
    }
    if let Some(max) = max_len {
        if value.chars().count() > max {
            errors.add(
                field,
                format!("Ensure this field has no more than {max} characters."),
            );
            return None;
        }
    }
    Some(value)
}

/// Record a "required" error when a full write omitted the field.
pub fn require<T>(errors: &mut FieldErrors, field: &str, value: &Option<T>, required: bool) {
    if required && value.is_none() && errors.get(field).is_none() {
        errors.add(field, REQUIRED);
    }
}

pub fn email(errors: &mut FieldErrors, field: &str, value: Option<Value>) -> Option<String> {
    let value = text(errors, field, value, Some(255), false)?;
    if !EMAIL_RE.is_match(&value) {
        errors.add(field, "Enter a valid email address.");
        return None;
    }
    Some(value)
}

pub fn min_length(errors: &mut FieldErrors, field: &str, value: &str, min: usize) -> bool {
    if value.chars().count() < min {
        errors.add(
            field,
            format!("Ensure this field has at least {min} characters."),
        );
        return false;
    }
    true
}

/// An `INTEGER` column. Integral numbers and numeric strings are accepted.
pub fn integer(errors: &mut FieldErrors, field: &str, value: Option<Value>) -> Option<i32> {
    let parsed = match value? {
        Value::Null => {
            errors.add(field, NULL);
            return None;
        }
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let Some(n) = parsed else {
        errors.add(field, INVALID_INTEGER);
        return None;
    };

    match i32::try_from(n) {
        Ok(n) => Some(n),
        Err(_) if n > 0 => {
            errors.add(
                field,
                format!("Ensure this value is less than or equal to {}.", i32::MAX),
            );
            None
        }
        Err(_) => {
            errors.add(
                field,
                format!("Ensure this value is greater than or equal to {}.", i32::MIN),
            );
            None
        }
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// A decimal given as a JSON number or a numeric string.
pub fn number(errors: &mut FieldErrors, field: &str, value: Option<Value>) -> Option<Decimal> {
    let parsed = match value? {
        Value::Null => {
            errors.add(field, NULL);
            return None;
        }
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    };
    if parsed.is_none() {
        errors.add(field, INVALID_NUMBER);
    }
    parsed
}

/// Enforce `NUMERIC(max_digits, decimal_places)`.
pub fn decimal(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<Value>,
    max_digits: u32,
    decimal_places: u32,
) -> Option<Decimal> {
    let value = number(errors, field, value)?.normalize();
    if value.scale() > decimal_places {
        errors.add(
            field,
            format!("Ensure that there are no more than {decimal_places} decimal places."),
        );
        return None;
    }
    let whole_digits = max_digits - decimal_places;
    let limit = Decimal::from(10u64.pow(whole_digits));
    if value.abs().trunc() >= limit {
        errors.add(
            field,
            format!("Ensure that there are no more than {whole_digits} digits before the decimal point."),
        );
        return None;
    }
    let mut value = value;
    value.rescale(decimal_places);
    Some(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn text_trims_and_checks_blank_and_length() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            text(&mut errors, "title", Some(json!("  Soup ")), Some(255), false),
            Some("Soup".to_string())
        );
        assert_eq!(text(&mut errors, "title", None, Some(255), false), None);
        assert!(errors.is_empty());

        assert_eq!(text(&mut errors, "title", Some(json!("  ")), None, false), None);
        assert_eq!(errors.get("title"), Some(&[BLANK.to_string()][..]));

        assert_eq!(
            text(&mut errors, "link", Some(json!("")), Some(255), true),
            Some(String::new())
        );
        assert_eq!(text(&mut errors, "link", Some(json!("x".repeat(256))), Some(255), true), None);
        assert!(errors.get("link").is_some());
    }

    #[test]
    fn text_rejects_null_and_non_strings() {
        let mut errors = FieldErrors::new();
        assert_eq!(text(&mut errors, "link", Some(Value::Null), None, true), None);
        assert_eq!(errors.get("link"), Some(&[NULL.to_string()][..]));

        assert_eq!(text(&mut errors, "title", Some(json!(["Soup"])), None, false), None);
        assert_eq!(errors.get("title"), Some(&[INVALID_STRING.to_string()][..]));

        assert_eq!(
            text(&mut errors, "name", Some(json!(42)), None, false).as_deref(),
            Some("42")
        );
    }

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "present")]
        link: Option<Value>,
    }

    #[test]
    fn explicit_null_is_not_omission() {
        let omitted: Sample = serde_json::from_value(json!({})).unwrap();
        assert!(omitted.link.is_none());

        let null: Sample = serde_json::from_value(json!({ "link": null })).unwrap();
        assert_eq!(null.link, Some(Value::Null));
    }

    #[test]
    fn require_skips_fields_that_already_failed() {
        let mut errors = FieldErrors::new();
        let blank = text(&mut errors, "name", Some(json!(" ")), None, false);
        require(&mut errors, "name", &blank, true);
        assert_eq!(errors.get("name").map(|m| m.len()), Some(1));

        let null = integer(&mut errors, "time_minutes", Some(Value::Null));
        require(&mut errors, "time_minutes", &null, true);
        assert_eq!(errors.get("time_minutes"), Some(&[NULL.to_string()][..]));

        require::<String>(&mut errors, "title", &None, false);
        assert!(errors.get("title").is_none());
        require::<String>(&mut errors, "title", &None, true);
        assert_eq!(errors.get("title"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn email_format() {
        let mut errors = FieldErrors::new();
        assert!(email(&mut errors, "email", Some(json!("cook@example.com"))).is_some());
        assert!(errors.is_empty());
        assert!(email(&mut errors, "email", Some(json!("not-an-email"))).is_none());
        assert!(errors.get("email").is_some());
    }

    #[test]
    fn password_min_length() {
        let mut errors = FieldErrors::new();
        assert!(min_length(&mut errors, "password", "testpass123", 5));
        assert!(!min_length(&mut errors, "password", "pw", 5));
        assert!(errors.get("password").is_some());
    }

    #[test]
    fn integer_accepts_numbers_and_numeric_strings() {
        let mut errors = FieldErrors::new();
        assert_eq!(integer(&mut errors, "time_minutes", Some(json!(22))), Some(22));
        assert_eq!(integer(&mut errors, "time_minutes", Some(json!(" 30 "))), Some(30));
        assert_eq!(integer(&mut errors, "time_minutes", Some(json!(10.0))), Some(10));
        assert!(errors.is_empty());

        assert_eq!(integer(&mut errors, "time_minutes", Some(json!("soon"))), None);
        assert_eq!(integer(&mut errors, "time_minutes", Some(json!(1.5))), None);
        assert_eq!(integer(&mut errors, "time_minutes", Some(json!(true))), None);
        assert_eq!(
            errors.get("time_minutes"),
            Some(&[INVALID_INTEGER.to_string(), INVALID_INTEGER.to_string(), INVALID_INTEGER.to_string()][..])
        );

        assert_eq!(integer(&mut errors, "servings", Some(json!(3_000_000_000u64))), None);
        assert!(errors.get("servings").is_some());
    }

    #[test]
    fn number_accepts_strings_and_numbers() {
        let mut errors = FieldErrors::new();
        assert_eq!(number(&mut errors, "price", Some(json!("5.25"))).map(|d| d.to_string()), Some("5.25".to_string()));
        assert_eq!(number(&mut errors, "price", Some(json!(5.25))).map(|d| d.to_string()), Some("5.25".to_string()));
        assert!(errors.is_empty());

        assert_eq!(number(&mut errors, "price", Some(json!("abc"))), None);
        assert_eq!(errors.get("price"), Some(&[INVALID_NUMBER.to_string()][..]));

        assert_eq!(number(&mut errors, "cost", Some(Value::Null)), None);
        assert_eq!(errors.get("cost"), Some(&[NULL.to_string()][..]));
    }

    #[test]
    fn decimal_places_and_digits() {
        let mut errors = FieldErrors::new();
        let price = decimal(&mut errors, "price", Some(json!("5.5")), 5, 2);
        assert_eq!(price.map(|p| p.to_string()), Some("5.50".to_string()));

        let price = decimal(&mut errors, "price", Some(json!("999.99")), 5, 2);
        assert_eq!(price.map(|p| p.to_string()), Some("999.99".to_string()));
        assert!(errors.is_empty());

        assert!(decimal(&mut errors, "price", Some(json!("1.234")), 5, 2).is_none());
        assert!(decimal(&mut errors, "price", Some(json!(1000)), 5, 2).is_none());
        assert_eq!(errors.get("price").map(|m| m.len()), Some(2));
    }
}
