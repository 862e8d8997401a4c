use crate::error::ComputeError;

/// Round to `decimals` places, halves away from zero.
///
/// Values too large to scale have no fractional part left and come back unchanged.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10.0_f64.powi(decimals);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Reject NaN and infinities before they reach any formula.
pub fn ensure_finite(field: &str, value: f64) -> Result<f64, ComputeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComputeError::InvalidFieldValue {
            field: field.to_string(),
            value,
        })
    }
}

/// Require a strictly positive operand, e.g. anything headed into `log10`.
pub fn ensure_positive(
    operation: &'static str,
    field: &str,
    value: f64,
) -> Result<f64, ComputeError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ComputeError::domain(
            operation,
            format!("{} must be positive, got {}", field, value),
        ))
    }
}

/// `10·log10(value)`, refusing non-positive or non-finite ratios.
pub fn linear_to_db(operation: &'static str, value: f64) -> Result<f64, ComputeError> {
    if !value.is_finite() {
        return Err(ComputeError::domain(
            operation,
            format!("linear value is not finite ({})", value),
        ));
    }
    let value = ensure_positive(operation, "linear value", value)?;
    Ok(10.0 * value.log10())
}

/// Check that a derived value is still representable.
pub fn ensure_result_finite(operation: &'static str, value: f64) -> Result<f64, ComputeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComputeError::domain(
            operation,
            format!("result is not finite ({})", value),
        ))
    }
}
