//! Input coercion and validation for process lists.
//!
//! The scheduler assumes positive integer bursts and quantum. Everything
//! that reaches it from the outside passes through here first:
//! - Raw numeric input is coerced to an integer ≥ 1
//! - Raw process lists are checked for duplicate IDs, zero bursts,
//!   and remaining time exceeding burst

use std::collections::HashSet;

use crate::models::Process;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two processes share the same ID.
    DuplicateId,
    /// A process requires no CPU time.
    ZeroBurst,
    /// A process has more remaining time than its burst.
    RemainingExceedsBurst,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Coerces a raw numeric value to a time quantity ≥ 1.
///
/// Non-finite values and anything below 1 become 1; fractions are truncated.
pub fn coerce_time_units(raw: f64) -> u32 {
    if !raw.is_finite() || raw < 1.0 {
        return 1;
    }
    if raw >= u32::MAX as f64 {
        return u32::MAX;
    }
    raw as u32
}

/// Coerces raw text input (e.g. a form field) to a time quantity ≥ 1.
///
/// Blank or non-numeric text becomes 1.
pub fn coerce_time_units_str(raw: &str) -> u32 {
    raw.trim()
        .parse::<f64>()
        .map(coerce_time_units)
        .unwrap_or(1)
}

/// Validates a raw process list.
///
/// Checks:
/// 1. No duplicate process IDs
/// 2. Every burst is at least 1
/// 3. `remaining <= burst` for every process
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_processes(processes: &[Process]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for p in processes {
        if !ids.insert(p.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate process ID: {}", p.id),
            ));
        }

        if p.burst == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroBurst,
                format!("Process '{}' has zero burst", p.name),
            ));
        }

        if p.remaining > p.burst {
            errors.push(ValidationError::new(
                ValidationErrorKind::RemainingExceedsBurst,
                format!(
                    "Process '{}' has remaining {} above burst {}",
                    p.name, p.remaining, p.burst
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
