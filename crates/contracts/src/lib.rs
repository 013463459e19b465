//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the phase analyzer:
//! telemetry events, paired samples, classification results and the analysis
//! configuration. Business crates depend on this crate only; reverse
//! dependencies are prohibited.
//!
//! ## Time Model
//! - Each device reports its own monotonic tick count in milliseconds (`i64`)
//! - Leader and follower ticks share no origin; they are only ever compared
//!   through the antiphase target of a paired sample

mod analysis_config;
mod diagnostics;
mod error;
mod event;
mod role;
mod sync;

pub use analysis_config::*;
pub use diagnostics::ExtractionStats;
pub use error::*;
pub use event::*;
pub use role::DeviceRole;
pub use sync::*;
