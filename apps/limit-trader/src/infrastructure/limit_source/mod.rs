//! Limit Sources
//!
//! Implementations of `LimitSourcePort`.

mod xlsx;

pub use xlsx::{LimitSheet, LimitSheetLayout, SheetCell, XlsxLimitSource};
