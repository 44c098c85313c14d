//! Domain Layer
//!
//! Value types shared by every backend, with no infrastructure dependencies.
//!
//! # Bounded Contexts
//!
//! - [`trading`]: limits, instruments and the per-backend instrument catalog
//! - [`shared`]: identifiers and domain errors

pub mod shared;
pub mod trading;
