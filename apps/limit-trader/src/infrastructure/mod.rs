//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the application layer. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**: Implement ports for external systems
//!   - `broker/`: QUIK (socket) and Tinkoff (REST) adapters
//!   - `limit_source/`: xlsx limit templates

pub mod broker;
pub mod limit_source;
