//! FlexiBot Observability - structured logging and optional trace export
//!
//! Console logs go to stderr so they never interleave with chat output on
//! stdout. When an OTLP endpoint is configured, spans are exported as well.
//!
//! # Quick Start
//!
//! ```no_run
//! use flexibot_observability::{ObservabilityConfig, init};
//!
//! let config = ObservabilityConfig::new("flexibot")
//!     .with_log_level("debug");
//!
//! init(config)?;
//!
//! tracing::info!("Chat started");
//! # Ok::<(), flexibot_observability::ObservabilityError>(())
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_SERVICE_NAME` or `SERVICE_NAME` - Service name
//! - `OTEL_SERVICE_VERSION` or `SERVICE_VERSION` - Service version
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` - OTLP endpoint
//! - `FLEXIBOT_LOG` or `RUST_LOG` - Log level filter

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracing;

pub use config::ObservabilityConfig;
pub use error::ObservabilityError;
pub use telemetry::{init, init_from_env, shutdown};
pub use tracing::{record_duration, record_error};

// Span macros are exported at the crate root via #[macro_export]
// as flexibot_observability::completion_span!(), etc.
