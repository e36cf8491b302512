//! Scheduler configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::session::DEFAULT_REJECTION_WARNING;

/// Invalid scheduler settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerConfigError {
    #[error("tick-ms must be greater than zero")]
    ZeroTick,

    #[error("rejection-warning must be greater than zero")]
    ZeroRejectionWarning,
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Extra time units between the end of one scheduled run and the next
    #[serde(rename = "buffer-units", default = "default_buffer_units")]
    pub buffer_units: u32,

    /// Length of one time unit in milliseconds
    #[serde(rename = "tick-ms", default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Consecutive rejections before the user is warned
    #[serde(rename = "rejection-warning", default = "default_rejection_warning")]
    pub rejection_warning: u32,
}

fn default_buffer_units() -> u32 {
    5
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_rejection_warning() -> u32 {
    DEFAULT_REJECTION_WARNING
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            buffer_units: default_buffer_units(),
            tick_ms: default_tick_ms(),
            rejection_warning: default_rejection_warning(),
        }
    }
}

impl SchedulerConfig {
    /// Reject settings that would give zero-length job periods or a warning with no rejections
    pub fn validate(&self) -> Result<(), SchedulerConfigError> {
        if self.tick_ms == 0 {
            return Err(SchedulerConfigError::ZeroTick);
        }
        if self.rejection_warning == 0 {
            return Err(SchedulerConfigError::ZeroRejectionWarning);
        }
        Ok(())
    }

    /// Get one time unit as a Duration
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Period of the recurring job for a task of `duration` units
    pub fn period(&self, duration: u32) -> Duration {
        self.tick() * duration.saturating_add(self.buffer_units)
    }
}
