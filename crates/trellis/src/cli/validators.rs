//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Validate a confidence threshold.
///
/// Accepts a decimal number between 0.0 and 1.0 inclusive.
pub fn validate_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid threshold '{s}': expected a number like 0.5"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!(
            "Threshold must be between 0.0 and 1.0, got {value}"
        ));
    }

    Ok(value)
}

/// Validate a positive task count.
pub fn validate_max_tasks(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid task count '{s}': expected a positive integer"))?;

    if value == 0 {
        return Err("Task count must be greater than zero".to_string());
    }

    Ok(value)
}
