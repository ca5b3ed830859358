use chrono::NaiveDate;

/// Validate an email: must contain '@' and '.', max 254 chars.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Email is required".to_string());
    }
    if trimmed.len() > 254 {
        return Some("Email must be at most 254 characters".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

/// Validate a new password: min 8 chars.
pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Password is required".to_string());
    }
    if password.chars().count() < 8 {
        return Some("Password must be at least 8 characters".to_string());
    }
    None
}

pub fn validate_confirmation(password: &str, confirmation: &str) -> Option<String> {
    if password != confirmation {
        return Some("Passwords do not match".to_string());
    }
    None
}

/// A one-time code is exactly six digits.
pub fn validate_otp(otp: &str) -> Option<String> {
    let otp = otp.trim();
    if otp.len() != 6 || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Some("Please enter the 6-digit code".to_string());
    }
    None
}

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Parse a strictly positive amount.
pub fn parse_amount(value: &str, field_name: &str) -> Result<f64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field_name} is required"));
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!("{field_name} must be a number greater than zero")),
    }
}

/// Parse a non-negative whole number.
pub fn parse_count(value: &str, field_name: &str) -> Result<u32, String> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("{field_name} must be a whole number"))
}

/// Validate a required `YYYY-MM-DD` date.
pub fn validate_date(value: &str, field_name: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err() {
        return Some(format!("{field_name} must be a valid date"));
    }
    None
}

/// Accept only values from `allowed`.
pub fn validate_choice(value: &str, field_name: &str, allowed: &[&str]) -> Option<String> {
    if allowed.contains(&value) {
        None
    } else {
        Some(format!("{field_name} is not a valid choice"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_rules() {
        assert!(validate_password("short").is_some());
        assert!(validate_password("long enough").is_none());
        assert!(validate_confirmation("a", "b").is_some());
        assert!(validate_confirmation("a", "a").is_none());
    }

    #[test]
    fn otp_is_six_digits() {
        assert!(validate_otp("123456").is_none());
        assert!(validate_otp(" 123456 ").is_none());
        assert!(validate_otp("12345").is_some());
        assert!(validate_otp("12a456").is_some());
    }

    #[test]
    fn amounts_must_be_positive() {
        assert_eq!(parse_amount("1500.50", "Amount"), Ok(1500.5));
        assert!(parse_amount("0", "Amount").is_err());
        assert!(parse_amount("-4", "Amount").is_err());
        assert!(parse_amount("abc", "Amount").is_err());
        assert_eq!(parse_amount("", "Amount"), Err("Amount is required".to_string()));
    }

    #[test]
    fn dates_and_choices() {
        assert!(validate_date("2026-10-18", "Due date").is_none());
        assert!(validate_date("18/10/2026", "Due date").is_some());
        assert!(validate_choice("rent", "Type", &["rent", "other"]).is_none());
        assert!(validate_choice("bribe", "Type", &["rent", "other"]).is_some());
        assert!(validate_email("jane@dorm.ph").is_none());
        assert!(validate_email("jane").is_some());
    }
}
