//! Shared detection meter
//!
//! Every guard with line of sight adds to one meter. On steps where nobody
//! contributed, the meter drains. Reaching the maximum fires a one-shot
//! full-detection event that stays latched until the meter is empty again.

use serde::{Deserialize, Serialize};

use crate::core::config::DetectionConfig;
use crate::core::types::GuardId;

/// One-shot event: the meter filled up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullDetection {
    /// First guard whose contribution crossed the threshold
    pub source: GuardId,
}

#[derive(Debug, Clone)]
pub struct DetectionAccumulator {
    value: f32,
    max: f32,
    drain_rate: f32,
    triggered: bool,
    contributed: bool,
}

impl DetectionAccumulator {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            value: 0.0,
            max: if config.max_detection > 0.0 {
                config.max_detection
            } else {
                DetectionConfig::default().max_detection
            },
            drain_rate: config.drain_rate.max(0.0),
            triggered: false,
            contributed: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Value in 0..=1 for UI
    pub fn normalized(&self) -> f32 {
        self.value / self.max
    }

    pub fn is_full(&self) -> bool {
        self.value >= self.max
    }

    /// Whether full detection has fired since the meter last emptied
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Whether any guard contributed during the current step
    pub fn has_contribution(&self) -> bool {
        self.contributed
    }

    /// Add a guard's contribution for this step
    ///
    /// Returns the full-detection event only for the contribution that first
    /// reaches the maximum in a fill cycle.
    pub fn add_contribution(&mut self, amount: f32, source: GuardId) -> Option<FullDetection> {
        debug_assert!(amount >= 0.0, "negative contribution {} from {}", amount, source);
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };

        self.contributed = true;
        self.value = (self.value + amount).min(self.max);

        let fired = if self.value >= self.max && !self.triggered {
            self.triggered = true;
            tracing::info!("full detection triggered by {}", source);
            Some(FullDetection { source })
        } else {
            None
        };

        self.check_invariants();
        fired
    }

    /// End-of-step bookkeeping: drain when idle, then clear the step flag
    pub fn tick(&mut self, dt: f32) {
        if !self.contributed && self.value > 0.0 {
            self.value = (self.value - self.drain_rate * dt).max(0.0);
        }

        self.contributed = false;

        if self.value <= 0.0 {
            self.triggered = false;
        }

        self.check_invariants();
    }

    /// Empty the meter and clear the latch
    pub fn reset(&mut self) {
        self.value = 0.0;
        self.triggered = false;
        self.check_invariants();
    }

    #[inline]
    fn check_invariants(&self) {
        debug_assert!(
            (0.0..=self.max).contains(&self.value),
            "detection meter {} outside [0, {}]",
            self.value,
            self.max
        );
        debug_assert!(
            !self.is_full() || self.triggered,
            "full meter must be latched"
        );
    }
}
