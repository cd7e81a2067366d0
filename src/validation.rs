//! Rules for the create-user form.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::{Address, NewUser};

const MIN_NAME_LEN: usize = 3;
const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ().-]+$").expect("phone pattern is valid"));

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(-[0-9]+)?$").expect("zipcode pattern is valid"));

#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub street: Option<String>,
    pub suite: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Phone,
    Street,
    City,
    Zipcode,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Street => "street",
            Field::City => "city",
            Field::Zipcode => "zipcode",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every failing field of a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    #[cfg(test)]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl UserForm {
    /// Check every rule and convert to a request body with trimmed values.
    pub fn validate(&self) -> Result<NewUser, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(Field::Name, "Name is required");
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.push(
                Field::Name,
                format!("Name must be at least {MIN_NAME_LEN} characters"),
            );
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(Field::Email, "Email is required");
        } else if !EMAIL_RE.is_match(email) {
            errors.push(Field::Email, "Email address is not valid");
        }

        let phone = self.phone.trim();
        if phone.is_empty() {
            errors.push(Field::Phone, "Phone is required");
        } else if !PHONE_RE.is_match(phone) {
            errors.push(Field::Phone, "Phone must contain only digits");
        } else {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
                errors.push(
                    Field::Phone,
                    format!("Phone must have {MIN_PHONE_DIGITS} to {MAX_PHONE_DIGITS} digits"),
                );
            }
        }

        let street = non_blank(&self.street);
        let suite = non_blank(&self.suite);
        let city = non_blank(&self.city);
        let zipcode = non_blank(&self.zipcode);

        let has_address = street.is_some() || city.is_some() || zipcode.is_some();
        if has_address {
            if street.is_none() {
                errors.push(Field::Street, "Street is required when an address is given");
            }
            if city.is_none() {
                errors.push(Field::City, "City is required when an address is given");
            }
        }
        if let Some(zip) = zipcode {
            if !ZIP_RE.is_match(zip) {
                errors.push(Field::Zipcode, "Zipcode must be digits, e.g. 92998-3874");
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let address = has_address.then(|| Address {
            street: street.unwrap_or_default().to_string(),
            suite: suite.unwrap_or_default().to_string(),
            city: city.unwrap_or_default().to_string(),
            zipcode: zipcode.unwrap_or_default().to_string(),
            geo: None,
        });

        Ok(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn form(name: &str, email: &str, phone: &str) -> UserForm {
        UserForm {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            ..UserForm::default()
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let new_user = form("  Ada Lovelace ", " ada@example.com", "555-0100 99 ")
            .validate()
            .unwrap();
        assert_eq!(new_user.name, "Ada Lovelace");
        assert_eq!(new_user.email, "ada@example.com");
        assert_eq!(new_user.phone, "555-0100 99");
        assert!(new_user.address.is_none());
    }

    #[rstest]
    #[case("", Field::Name, "Name is required")]
    #[case("   ", Field::Name, "Name is required")]
    #[case("Al", Field::Name, "Name must be at least 3 characters")]
    fn test_rejects_bad_name(#[case] name: &str, #[case] field: Field, #[case] message: &str) {
        let errors = form(name, "a@b.co", "5550100").validate().unwrap_err();
        assert_eq!(errors.get(field), Some(message));
    }

    #[rstest]
    #[case("")]
    #[case("plainaddress")]
    #[case("missing@tld")]
    #[case("two@@example.com")]
    #[case("spaces in@example.com")]
    fn test_rejects_malformed_email(#[case] email: &str) {
        let errors = form("Ada", email, "5550100").validate().unwrap_err();
        assert!(errors.get(Field::Email).is_some());
        assert!(errors.get(Field::Name).is_none());
    }

    #[rstest]
    #[case("")]
    #[case("call me")]
    #[case("555-CALL-NOW")]
    #[case("12345")]
    #[case("1234567890123456")]
    fn test_rejects_bad_phone(#[case] phone: &str) {
        let errors = form("Ada", "ada@example.com", phone).validate().unwrap_err();
        assert!(errors.get(Field::Phone).is_some());
    }

    #[rstest]
    #[case("+44 (20) 7946-0958")]
    #[case("1.770.736.8031")]
    #[case("5550100")]
    fn test_accepts_formatted_phone(#[case] phone: &str) {
        assert!(form("Ada", "ada@example.com", phone).validate().is_ok());
    }

    #[test]
    fn test_reports_every_failing_field() {
        let errors = form("", "nope", "abc").validate().unwrap_err();
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![Field::Name, Field::Email, Field::Phone]);
        assert_eq!(
            errors.to_string(),
            "name: Name is required; email: Email address is not valid; phone: Phone must contain only digits"
        );
    }

    #[test]
    fn test_partial_address_requires_street_and_city() {
        let mut f = form("Ada", "ada@example.com", "5550100");
        f.zipcode = Some("12345".to_string());
        let errors = f.validate().unwrap_err();
        assert!(errors.get(Field::Street).is_some());
        assert!(errors.get(Field::City).is_some());
    }

    #[test]
    fn test_rejects_bad_zipcode() {
        let mut f = form("Ada", "ada@example.com", "5550100");
        f.street = Some("Main St".to_string());
        f.city = Some("Springfield".to_string());
        f.zipcode = Some("ABC".to_string());
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.iter().count(), 1);
        assert!(errors.get(Field::Zipcode).is_some());
    }

    #[test]
    fn test_full_address_is_carried() {
        let mut f = form("Ada", "ada@example.com", "5550100");
        f.street = Some(" Main St ".to_string());
        f.suite = Some("Apt. 1".to_string());
        f.city = Some("Springfield".to_string());
        f.zipcode = Some("92998-3874".to_string());
        let address = f.validate().unwrap().address.unwrap();
        assert_eq!(address.street, "Main St");
        assert_eq!(address.one_line(), "Main St Apt. 1 Springfield 92998-3874");
    }

    #[test]
    fn test_blank_address_fields_are_ignored() {
        let mut f = form("Ada", "ada@example.com", "5550100");
        f.street = Some("  ".to_string());
        assert!(f.validate().unwrap().address.is_none());
    }
}
