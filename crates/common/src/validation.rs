use validator::{Validate, ValidationErrors};

/// Flattens field errors into one line, first message per field, fields sorted.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            errs.first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{} is invalid", field))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

pub fn check<T: Validate>(input: &T) -> Result<(), String> {
    input.validate().map_err(|e| validation_message(&e))
}

/// `range` lets NaN through, so amounts also go through this.
pub fn finite_amount(value: f64) -> Result<(), validator::ValidationError> {
    if value.is_finite() {
        return Ok(());
    }
    let mut err = validator::ValidationError::new("not_finite");
    err.message = Some("Amount must be a number".into());
    Err(err)
}
