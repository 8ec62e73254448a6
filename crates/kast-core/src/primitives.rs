//! # Innate Primitives
//!
//! Hardcoded runtime constants for the KAST engine.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Operator symbols accepted by predicate definitions, in table order.
///
/// Every symbol here resolves to exactly one
/// [`Comparison`](crate::operator::Comparison).
pub const OPERATOR_SYMBOLS: [&str; 6] = ["<", "<=", "==", "!=", ">", ">="];

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for knowledge names arriving from outside the process.
///
/// Frames carrying longer names are rejected at the boundary (HTTP adapter,
/// file sources) before they reach the store.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum number of named values in a single frame.
///
/// Caps how many names one frame may introduce at once. The low-level store
/// still grows by the unknown names of successive frames.
pub const MAX_FRAME_WIDTH: usize = 4096;

/// Check a frame against the boundary limits.
///
/// Returns the offending name (or a width description) on failure.
pub fn check_frame_limits<'a>(names: impl ExactSizeIterator<Item = &'a String>) -> Result<(), String> {
    if names.len() > MAX_FRAME_WIDTH {
        return Err(format!(
            "frame carries {} values, maximum is {}",
            names.len(),
            MAX_FRAME_WIDTH
        ));
    }
    for name in names {
        if name.is_empty() || name.len() > MAX_NAME_LENGTH {
            return Err(format!("invalid knowledge name '{}'", name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_table_has_six_symbols() {
        assert_eq!(OPERATOR_SYMBOLS.len(), 6);
    }

    #[test]
    fn frame_limits_reject_empty_and_oversized_names() {
        let ok = ["pose".to_string()];
        assert!(check_frame_limits(ok.iter()).is_ok());

        let empty = [String::new()];
        assert!(check_frame_limits(empty.iter()).is_err());

        let long = ["x".repeat(MAX_NAME_LENGTH + 1)];
        assert!(check_frame_limits(long.iter()).is_err());
    }
}
