//! Limit Source Port (Driven Port)
//!
//! Pull-style reader of limits from an external template.

use crate::domain::shared::DomainError;
use crate::domain::trading::Limit;

/// Limit source errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LimitSourceError {
    /// Template could not be opened or parsed.
    #[error("Failed to open {path}: {message}")]
    Open {
        /// Template path.
        path: String,
        /// Error details.
        message: String,
    },

    /// Workbook must contain exactly one sheet.
    #[error("Workbook has {found} sheets, expected exactly 1")]
    SheetCount {
        /// Number of sheets found.
        found: usize,
    },

    /// Price cell is not a number.
    #[error("Row {row}: invalid price {value:?}")]
    InvalidPrice {
        /// 1-based row number.
        row: u32,
        /// Raw cell text.
        value: String,
    },

    /// Lots cell is not a whole number.
    #[error("Row {row}: invalid lots {value:?}")]
    InvalidLots {
        /// 1-based row number.
        row: u32,
        /// Raw cell text.
        value: String,
    },

    /// Cells parsed but do not form a valid limit.
    #[error("Row {row}: {source}")]
    InvalidLimit {
        /// 1-based row number.
        row: u32,
        /// Domain validation failure.
        #[source]
        source: DomainError,
    },
}

/// Port for limit templates.
///
/// A finite, restartable iterator. `Ok(None)` means the source is exhausted.
#[cfg_attr(test, mockall::automock)]
pub trait LimitSourcePort: Send {
    /// Next marked limit, resuming after the previous one.
    fn next_limit(&mut self) -> Result<Option<Limit>, LimitSourceError>;

    /// Restart from the first row.
    fn rewind(&mut self);
}
