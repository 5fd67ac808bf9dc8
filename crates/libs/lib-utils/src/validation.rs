//! # Validation Utilities
//!
//! Input validation helpers. Each returns a user-facing message on failure.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate email format (basic check).
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.contains('@') && email.contains('.') {
        Ok(())
    } else {
        Err("Invalid email format".to_string())
    }
}

/// Validate that a number is finite and not negative.
pub fn validate_non_negative(value: f64, field_name: &str) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be a non-negative number", field_name))
    }
}

/// Validate that a number is finite and strictly positive.
pub fn validate_positive(value: f64, field_name: &str) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be greater than zero", field_name))
    }
}

/// Validate that a number lies in `[min, max]`.
pub fn validate_in_range(value: f64, min: f64, max: f64, field_name: &str) -> Result<(), String> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(format!("{} must be between {} and {}", field_name, min, max))
    }
}
