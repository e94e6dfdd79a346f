// Validation utilities
// Author: Gabriel Demetrios Lafis

/// Validate that a numeric setting is not zero
pub fn validate_non_zero<T>(value: T, name: &str) -> Result<(), String>
where
    T: PartialEq + Default,
{
    if value == T::default() {
        Err(format!("'{}' must be greater than zero", name))
    } else {
        Ok(())
    }
}

/// Validate that a string setting is not empty
pub fn validate_not_empty(value: &str, name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("'{}' cannot be empty", name))
    } else {
        Ok(())
    }
}

/// Clamp both ends of a range into `bounds`
pub fn clamp_range(range: (f64, f64), bounds: (f64, f64)) -> (f64, f64) {
    let (min, max) = bounds;
    let clamp = |v: f64| v.max(min).min(max);

    (clamp(range.0), clamp(range.1))
}
