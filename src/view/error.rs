//! View composition error types

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort composing a view
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    /// A week occurs more than once in a view, so the two views cannot be aligned
    #[error("Cannot align {side} view: week {week} occurs more than once")]
    DuplicateWeek { side: &'static str, week: NaiveDate },
}

/// Errors raised while building the pair plot
///
/// These never abort a render; the session reports them inline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// Too few rows to estimate a density
    #[error("not enough observations for a density estimate (need at least 2, got {0})")]
    NotEnoughObservations(usize),
}

/// Result type alias for view composition
pub type ViewResult<T> = Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlotError::NotEnoughObservations(1);
        assert_eq!(
            err.to_string(),
            "not enough observations for a density estimate (need at least 2, got 1)"
        );

        let err = ViewError::DuplicateWeek {
            side: "covid",
            week: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot align covid view: week 2021-01-01 occurs more than once"
        );
    }
}
