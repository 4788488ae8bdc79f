use serde::Deserialize;
use thiserror::Error;
use time::OffsetDateTime;

/// Raw contact form payload as posted by the front-end. Required fields are
/// optional here so that a missing field surfaces as a validation error
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub submitted_at: Option<OffsetDateTime>,
}

/// A validated, normalized form submission. Constructed only through
/// [`ContactPayload::validate`] and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub submitted_at: OffsetDateTime,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Name must be less than 100 characters")]
    NameTooLong,
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email")]
    EmailInvalid,
    #[error("Email must be less than 255 characters")]
    EmailTooLong,
    #[error("Phone must be less than 20 characters")]
    PhoneTooLong,
    #[error("Message is required")]
    MessageRequired,
    #[error("Message must be less than 1000 characters")]
    MessageTooLong,
}

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 255;
const PHONE_MAX: usize = 20;
const MESSAGE_MAX: usize = 1000;

impl ContactPayload {
    /// Checks fields in a fixed precedence order and reports only the first
    /// violation, since the form shows one error at a time. Fields are
    /// trimmed before any check; an empty-after-trim phone counts as absent.
    pub fn validate(self) -> Result<FormSubmission, ValidationError> {
        let name = self.name.as_deref().unwrap_or("").trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if name.chars().count() > NAME_MAX {
            return Err(ValidationError::NameTooLong);
        }

        let email = self.email.as_deref().unwrap_or("").trim();
        if email.is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if !is_valid_email_address(email) {
            return Err(ValidationError::EmailInvalid);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(ValidationError::EmailTooLong);
        }

        let phone = self
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if let Some(phone) = phone {
            if phone.chars().count() > PHONE_MAX {
                return Err(ValidationError::PhoneTooLong);
            }
        }

        let message = self.message.as_deref().unwrap_or("").trim();
        if message.is_empty() {
            return Err(ValidationError::MessageRequired);
        }
        if message.chars().count() > MESSAGE_MAX {
            return Err(ValidationError::MessageTooLong);
        }

        Ok(FormSubmission {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            message: message.to_string(),
            submitted_at: self.submitted_at.unwrap_or_else(OffsetDateTime::now_utc),
        })
    }
}

fn is_valid_email_address(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains(' ') {
        return false;
    }
    let mut parts = trimmed.split('@');
    let local = parts.next().unwrap_or("");
    let domain = match parts.next() {
        Some(d) => d,
        None => return false,
    };
    if parts.next().is_some() {
        return false;
    }
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    domain.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn payload() -> ContactPayload {
        ContactPayload {
            name: Some("Jo".into()),
            email: Some("jo@x.com".into()),
            phone: None,
            message: Some("Hi there".into()),
            submitted_at: None,
        }
    }

    #[test]
    fn accepts_a_minimal_submission() {
        let submission = payload().validate().unwrap();
        assert_eq!(submission.name, "Jo");
        assert_eq!(submission.email, "jo@x.com");
        assert_eq!(submission.phone, None);
        assert_eq!(submission.message, "Hi there");
    }

    #[test]
    fn defaults_submitted_at_when_absent() {
        let before = OffsetDateTime::now_utc();
        let submission = payload().validate().unwrap();
        assert!(submission.submitted_at >= before);
    }

    #[test]
    fn keeps_supplied_submitted_at() {
        let mut p = payload();
        p.submitted_at = Some(datetime!(2025-03-01 12:00 UTC));
        let submission = p.validate().unwrap();
        assert_eq!(submission.submitted_at, datetime!(2025-03-01 12:00 UTC));
    }

    #[test]
    fn trims_fields_and_drops_empty_phone() {
        let mut p = payload();
        p.name = Some("  Jo  ".into());
        p.phone = Some("   ".into());
        let submission = p.validate().unwrap();
        assert_eq!(submission.name, "Jo");
        assert_eq!(submission.phone, None);
    }

    #[test]
    fn name_missing_or_blank_is_required() {
        let mut p = payload();
        p.name = None;
        assert_eq!(p.clone().validate().unwrap_err(), ValidationError::NameRequired);
        p.name = Some("   ".into());
        assert_eq!(p.validate().unwrap_err(), ValidationError::NameRequired);
    }

    #[test]
    fn name_length_is_bounded() {
        let mut p = payload();
        p.name = Some("x".repeat(100));
        assert!(p.clone().validate().is_ok());
        p.name = Some("x".repeat(101));
        assert_eq!(p.validate().unwrap_err(), ValidationError::NameTooLong);
    }

    #[test]
    fn email_checks_run_in_order() {
        let mut p = payload();
        p.email = None;
        assert_eq!(p.clone().validate().unwrap_err(), ValidationError::EmailRequired);
        p.email = Some("not-an-email".into());
        assert_eq!(p.clone().validate().unwrap_err(), ValidationError::EmailInvalid);
        let long_local = "x".repeat(250);
        p.email = Some(format!("{}@example.com", long_local));
        assert_eq!(p.validate().unwrap_err(), ValidationError::EmailTooLong);
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["a@b", "a b@c.com", "a@@b.com", "@b.com", "a@", "a@.com", "a@com."] {
            let mut p = payload();
            p.email = Some(bad.into());
            assert_eq!(
                p.validate().unwrap_err(),
                ValidationError::EmailInvalid,
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn phone_length_is_bounded_when_present() {
        let mut p = payload();
        p.phone = Some("0".repeat(20));
        assert!(p.clone().validate().is_ok());
        p.phone = Some("0".repeat(21));
        assert_eq!(p.validate().unwrap_err(), ValidationError::PhoneTooLong);
    }

    #[test]
    fn message_checks_come_last() {
        let mut p = payload();
        p.message = None;
        assert_eq!(p.clone().validate().unwrap_err(), ValidationError::MessageRequired);
        p.message = Some("x".repeat(1001));
        assert_eq!(p.validate().unwrap_err(), ValidationError::MessageTooLong);
    }

    #[test]
    fn name_violation_wins_over_later_fields() {
        let p = ContactPayload::default();
        assert_eq!(p.validate().unwrap_err(), ValidationError::NameRequired);
    }
}
