//! # Ingestion
//!
//! Firmware log ingestion module.
//!
//! Responsibilities:
//! - Normalize raw serial-log lines (control sequences, inflated spacing)
//! - Recognize period updates, activation starts and role announcements
//! - Extract follower link-quality samples (signal strength, round-trip, sync quality)
//! - Produce an ordered, optionally deduplicated activation stream
//!
//! ## Usage Example
//!
//! ```ignore
//! use contracts::{DeviceRole, ExtractorConfig};
//! use ingestion::EventExtractor;
//!
//! let extractor = EventExtractor::new(ExtractorConfig::default())?;
//! let leader = extractor.extract_text(&leader_log, DeviceRole::Leader)?;
//! let follower = extractor.extract_text(&follower_log, DeviceRole::Follower)?;
//! println!("{} / {}", leader.activations.len(), follower.activations.len());
//! ```

mod error;
mod extractor;
mod patterns;

// Re-exports
pub use contracts::ExtractionStats;
pub use error::{IngestionError, Result};
pub use extractor::{EventExtractor, StreamExtraction};
pub use patterns::{ActivationTrigger, LogPatterns, PhaseMatch};
