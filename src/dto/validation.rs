//! Validation helpers for DTOs.

use validator::{ValidationError, ValidationErrors};

/// Error code used for absent or blank required fields.
pub const REQUIRED: &str = "required";

/// Minimum length accepted for a staff password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Rejects blank strings with the `required` code so they read like missing fields.
pub fn validate_present(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(REQUIRED));
    }
    Ok(())
}

/// Validates a replacement password: present and at least
/// [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        let mut err = ValidationError::new(REQUIRED);
        err.message = Some("Missing required fields: staff_email, new_password".into());
        return Err(err);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        let mut err = ValidationError::new("password_length");
        err.message = Some(
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long").into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Render validation failures as a single client-facing message.
///
/// Missing fields are reported before other rule violations; within each group
/// fields are listed alphabetically. Explicit messages win over generated ones.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut entries: Vec<(bool, String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |err| {
                let missing = err.code == REQUIRED;
                let message = match &err.message {
                    Some(message) => message.to_string(),
                    None if missing => format!("Missing required field: {field}"),
                    None => format!("Invalid value for field: {field}"),
                };
                (!missing, field.to_string(), message)
            })
        })
        .collect();
    entries.sort();
    entries.dedup_by(|a, b| a.2 == b.2);

    if entries.is_empty() {
        return "Invalid request body".into();
    }
    entries
        .into_iter()
        .map(|(_, _, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Scored {
        #[validate(required, custom(function = "validate_present"))]
        to_phone: Option<String>,
        #[validate(range(min = 0.0, max = 100.0))]
        risk_score: Option<f64>,
        #[validate(custom(function = "validate_new_password"))]
        new_password: Option<String>,
    }

    #[test]
    fn test_validate_present() {
        assert!(validate_present("+27821234567").is_ok());
        assert!(validate_present("").is_err());
        assert!(validate_present("   ").is_err());
    }

    #[test]
    fn test_validate_new_password() {
        assert!(validate_new_password("secret").is_ok());
        assert_eq!(
            validate_new_password("abc").unwrap_err().code,
            "password_length"
        );
        assert_eq!(validate_new_password("").unwrap_err().code, REQUIRED);
    }

    #[test]
    fn test_describe_names_missing_field_first() {
        let scored = Scored {
            to_phone: None,
            risk_score: Some(140.0),
            new_password: Some("abc".into()),
        };
        let message = describe_errors(&scored.validate().unwrap_err());

        assert!(message.starts_with("Missing required field: to_phone"));
        assert!(message.contains("Password must be at least 6 characters long"));
        assert!(message.contains("Invalid value for field: risk_score"));
    }

    #[test]
    fn test_blank_string_reads_as_missing() {
        let scored = Scored {
            to_phone: Some(" ".into()),
            risk_score: None,
            new_password: None,
        };
        assert_eq!(
            describe_errors(&scored.validate().unwrap_err()),
            "Missing required field: to_phone"
        );
    }
}
