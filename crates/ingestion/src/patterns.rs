//! Line patterns for firmware serial logs.
//!
//! Patterns run against a *cleaned* line: terminal control sequences
//! removed, then every whitespace character and NUL removed. Captures taken
//! from an inflated-width capture (`I  ( 1 2 3 4 )`) and a normal one
//! (`I (1234)`) therefore look identical.
//!
//! Examples (raw form):
//!
//! ```text
//! I (6072) TIME_SYNC: Motor epoch set: 6072947 us, cycle: 2000 ms
//! I (8123) MOTOR_TASK: SERVER: Cycle starts ACTIVE
//! I (9123) MOTOR_TASK: CLIENT: Cycle starts INACTIVE      <- never an activation
//! I (9200) TIME_SYNC: Beacon RTT measured: 81452 μs, offset: 120 μs
//! I (9300) TIME_SYNC_TASK: Sync beacon received: seq=4, quality=92%, rtt=81452 μs
//! I (9400) BLE_MANAGER: Beacon processed (seq: 4, rssi: -61 dBm)
//! ```

use contracts::{DeviceRole, MetricKind};
use regex::Regex;

use crate::error::{IngestionError, Result};

/// Which textual trigger reported an activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationTrigger {
    /// `Cycle starts ACTIVE`
    CycleStart,
    /// `Motor cmd ACTIVE`
    MotorCommand,
}

/// Result of matching the activation pattern against one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseMatch {
    Active(ActivationTrigger),
    /// Inactive half of the cycle; shares the tag but is not an activation
    Inactive,
}

/// Compiled pattern set, built once per extractor
#[derive(Debug, Clone)]
pub struct LogPatterns {
    control: Regex,
    tick: Regex,
    period: Regex,
    activation: Regex,
    role: Regex,
    signal_strength: Regex,
    round_trip: Regex,
    sync_quality: Regex,
}

impl LogPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            control: compile("control", r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b")?,
            tick: compile("tick", r"(?:^|[^A-Za-z0-9_])[EWIDV]\((\d+)\)")?,
            period: compile(
                "period",
                r"Motorepochset(?:fromhandshake)?:\d+(?:us|μs|µs),cycle:(\d+)ms",
            )?,
            activation: compile(
                "activation",
                r"MOTOR_TASK:.*?(Cyclestarts|Motorcmd:?)(IN)?ACTIVE",
            )?,
            role: compile(
                "role",
                r"(?i)(CLIENT|SERVER)roleassigned|roleassigned:(CLIENT|SERVER)",
            )?,
            signal_strength: compile("signal_strength", r"(?i)rssi[=:](-?\d+(?:\.\d+)?)")?,
            round_trip: compile(
                "round_trip",
                r"(?i)(?:RTTmeasured:|rtt[=:])(\d+(?:\.\d+)?)",
            )?,
            sync_quality: compile("sync_quality", r"(?i)quality[=:](\d+(?:\.\d+)?)%?")?,
        })
    }

    /// Strip control sequences and all whitespace/NUL characters
    pub fn clean(&self, raw: &str) -> String {
        self.control
            .replace_all(raw, "")
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\0')
            .collect()
    }

    /// Device tick of a log line (`I(1234)`), if present
    pub fn tick(&self, line: &str) -> Option<i64> {
        capture_number(&self.tick, line, 1)
    }

    /// Cycle period announced by a motor epoch line
    pub fn period(&self, line: &str) -> Option<i64> {
        capture_number(&self.period, line, 1)
    }

    /// Active/inactive phase start on a motor task line
    pub fn phase(&self, line: &str) -> Option<PhaseMatch> {
        let caps = self.activation.captures(line)?;
        if caps.get(2).is_some() {
            return Some(PhaseMatch::Inactive);
        }
        let trigger = match caps.get(1).map(|m| m.as_str()) {
            Some("Cyclestarts") => ActivationTrigger::CycleStart,
            _ => ActivationTrigger::MotorCommand,
        };
        Some(PhaseMatch::Active(trigger))
    }

    /// Role announced by the firmware (`SERVER` leads, `CLIENT` follows)
    pub fn announced_role(&self, line: &str) -> Option<DeviceRole> {
        let caps = self.role.captures(line)?;
        caps.get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| DeviceRole::from_firmware_label(m.as_str()))
    }

    /// Raw metric value of `kind` on this line (first occurrence)
    pub fn metric(&self, line: &str, kind: MetricKind) -> Option<f64> {
        let pattern = match kind {
            MetricKind::SignalStrength => &self.signal_strength,
            MetricKind::RoundTripTime => &self.round_trip,
            MetricKind::SyncQuality => &self.sync_quality,
        };
        pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    }
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| IngestionError::InvalidPattern { name, source })
}

/// Ticks and periods are 32-bit millisecond counters on the device
fn capture_number(pattern: &Regex, line: &str, group: usize) -> Option<i64> {
    pattern
        .captures(line)
        .and_then(|caps| caps.get(group))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(i64::from)
}
