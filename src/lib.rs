//! Synheart ROI - Health return-on-investment dashboard engine
//!
//! ROI turns a month of daily health samples into the figures behind a
//! personal health dashboard: 7-day rolling averages, a composite health
//! score, baseline-vs-current improvements and a radar profile, alongside a
//! ledger of the money and time invested in health.
//!
//! ## Modules
//!
//! - **Sources**: seeded synthetic samples or recorded fixtures
//! - **Aggregator**: rolling averages, health score, improvements, radar
//! - **Ledger**: recurring health investments and their totals
//! - **Dashboard**: state container, action dispatch and view projections

pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod encoder;
pub mod error;
pub mod insights;
pub mod ledger;
pub mod source;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::{DashboardConfig, RangePolicy};
pub use dashboard::{Action, DashboardState, ViewMode, ViewProjection};
pub use encoder::DashboardEncoder;
pub use error::RoiError;
pub use ledger::InvestmentLedger;
pub use source::{FixtureSource, HealthSampleSource, SyntheticSource};

/// ROI version embedded in all payloads
pub const ROI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for payloads
pub const PRODUCER_NAME: &str = "synheart-roi";
