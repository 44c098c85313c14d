//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for the broker backends and limit templates
//! - **Use Cases**: The CLI commands, expressed against ports only

pub mod ports;
pub mod use_cases;

pub use ports::*;
pub use use_cases::*;
