// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::default_trait_access
    )
)]

//! Limit Trader - Rust Core Library
//!
//! Places buy limit orders read from an xlsx template, and cancels them again,
//! through one of two brokerage backends behind a single port.
//!
//! # Architecture (Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Limits, instruments and the per-backend instrument catalog
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `TradeClientPort`, `LimitSourcePort`
//!   - `use_cases`: `SetLimits`, `ClearLimits`, `ListTickers`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `broker::quik`: line-delimited JSON over two TCP sockets
//!   - `broker::tinkoff`: REST with fixed-wait retry on HTTP 429
//!   - `broker::Backend`: the closed set of backends
//!   - `limit_source`: xlsx template reader
//!
//! - **Cross-cutting**: `broker` (rate-limit retry), `config`, `telemetry`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Broker-agnostic retry policy.
pub mod broker;

/// YAML configuration with environment interpolation.
pub mod config;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use domain::shared::{DomainError, InstrumentCode, OrderId, Ticker};
pub use domain::trading::{Instrument, InstrumentCatalog, Limit, Stock};

pub use application::ports::{
    LimitSourceError, LimitSourcePort, TradeClientError, TradeClientPort,
};
pub use application::use_cases::{
    ClearLimitsUseCase, ListTickersUseCase, SetLimitsError, SetLimitsUseCase,
};

pub use infrastructure::broker::{
    Backend, QuikBrokerAdapter, QuikConfig, QuikError, TinkoffBrokerAdapter, TinkoffConfig,
    TinkoffError,
};
pub use infrastructure::limit_source::XlsxLimitSource;
