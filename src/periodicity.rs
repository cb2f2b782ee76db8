//! Repetition period of a sum of equally spaced sinusoids, and the display
//! window clamp derived from it.
//!
//! A sum of `N` cosines with frequencies evenly spread over `[f_min, f_max]`
//! has a spacing of `Δf / (N - 1)` and therefore repeats every
//! `(N - 1) / Δf` seconds. Plotting past that point shows the packet again,
//! which looks like a second, independent localisation. The guard limits the
//! window to [`REPETITION_SAFETY_FACTOR`] of one period.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PacketError, Result};
use crate::utils::{
    to_millis, COMPARISON_WINDOW_MAX, COMPARISON_WINDOW_MIN, REPETITION_SAFETY_FACTOR,
};

/// Parameters of a summed multi-frequency signal plus the window the caller wants to show.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WaveSumSpec {
    pub n_waves: usize,
    pub f_min: f64,  // Hz
    pub f_max: f64,  // Hz
    pub requested_duration: f64,  // seconds
}

/// Outcome of [`compute`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GuardResult {
    pub repetition_period: f64,
    pub effective_duration: f64,
    pub was_truncated: bool,
}

impl WaveSumSpec {
    pub fn new(n_waves: usize, f_min: f64, f_max: f64, requested_duration: f64) -> Self {
        Self { n_waves, f_min, f_max, requested_duration }
    }

    pub fn delta_f(&self) -> f64 {
        self.f_max - self.f_min
    }

    /// Checks the preconditions of [`compute`].
    pub fn validate(&self) -> Result<()> {
        if self.n_waves < 2 {
            return Err(PacketError::invalid(format!(
                "need at least 2 waves, got {}",
                self.n_waves
            )));
        }
        if !self.f_min.is_finite() || !self.f_max.is_finite() {
            return Err(PacketError::invalid("frequencies must be finite"));
        }
        if self.f_min <= 0.0 {
            return Err(PacketError::invalid(format!(
                "f_min must be positive, got {} Hz",
                self.f_min
            )));
        }
        if self.f_max <= self.f_min {
            return Err(PacketError::invalid(format!(
                "f_max ({} Hz) must exceed f_min ({} Hz)",
                self.f_max, self.f_min
            )));
        }
        if !self.requested_duration.is_finite() || self.requested_duration <= 0.0 {
            return Err(PacketError::invalid(format!(
                "requested duration must be positive, got {} s",
                self.requested_duration
            )));
        }
        Ok(())
    }
}

/// Computes the repetition period of `spec` and clamps its requested duration.
pub fn compute(spec: WaveSumSpec) -> Result<GuardResult> {
    spec.validate()?;

    let delta_f = spec.delta_f();
    let repetition_period = (spec.n_waves - 1) as f64 / delta_f;
    let effective_duration = spec.requested_duration.min(repetition_period * REPETITION_SAFETY_FACTOR);
    let was_truncated = effective_duration < spec.requested_duration;

    debug!(
        "Periodicity guard - N: {}, Δf: {:.3} Hz, T_rep: {:.6}s, requested: {:.6}s, effective: {:.6}s, truncated: {}",
        spec.n_waves, delta_f, repetition_period, spec.requested_duration, effective_duration, was_truncated
    );

    Ok(GuardResult { repetition_period, effective_duration, was_truncated })
}

impl GuardResult {
    /// Warning text for the renderer, present only when the window was shortened.
    pub fn notice(&self) -> Option<String> {
        if !self.was_truncated {
            return None;
        }
        Some(format!(
            "Duration limited to {:.0} ms to avoid periodic repetitions (T_rep = {:.0} ms)",
            to_millis(self.effective_duration),
            to_millis(self.repetition_period)
        ))
    }
}

/// Shared window for two packets plotted one above the other.
///
/// Each scenario's envelope repeats every `1 / Δf`; a non-positive `Δf` counts
/// as one second. The shorter period wins so neither plot shows a second peak,
/// then the result is kept within the readable range of the comparison view.
pub fn comparison_window(delta_f_a: f64, delta_f_b: f64) -> f64 {
    let period = |delta_f: f64| if delta_f > 0.0 { 1.0 / delta_f } else { 1.0 };
    let window = period(delta_f_a).min(period(delta_f_b)) * REPETITION_SAFETY_FACTOR;
    window.clamp(COMPARISON_WINDOW_MIN, COMPARISON_WINDOW_MAX)
}
