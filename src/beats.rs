//! Plot window for two interfering tones.
//!
//! Two close frequencies beat at `|f1 - f2|`. The window is sized to show
//! [`BEATS_TARGET_COUNT`] beats; when the tones are (almost) equal there is
//! nothing to beat, so a fixed number of carrier periods is shown instead.

use log::debug;
use serde::Serialize;

use crate::utils::{
    BEATS_CARRIER_PERIODS, BEATS_DENSE_COUNT, BEATS_FAST_COUNT, BEATS_MIN_FREQUENCY,
    BEATS_TARGET_COUNT, BEATS_WINDOW_MAX, BEATS_WINDOW_MIN, CARRIER_WINDOW_MAX,
    CARRIER_WINDOW_MIN,
};

/// How busy the chosen window looks.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub enum BeatDensity {
    /// More than [`BEATS_FAST_COUNT`] beats squeezed in (window hit its lower bound)
    Fast { beats: f64 },
    /// Between [`BEATS_DENSE_COUNT`] and [`BEATS_FAST_COUNT`] beats
    Dense { beats: f64 },
    Clear { beats: f64 },
    /// No measurable beat; count of carrier periods in the window
    Carrier { periods: f64 },
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BeatsWindow {
    pub duration: f64,  // seconds
    pub beat_frequency: f64,
    pub mean_frequency: f64,
    pub density: BeatDensity,
}

/// Picks the time window for plotting `f1` and `f2` together.
pub fn beats_window(f1: f64, f2: f64) -> BeatsWindow {
    let mean_frequency = (f1 + f2) / 2.0;
    let beat_frequency = (f1 - f2).abs();

    let (duration, density) = if beat_frequency > BEATS_MIN_FREQUENCY {
        let duration = (BEATS_TARGET_COUNT / beat_frequency).clamp(BEATS_WINDOW_MIN, BEATS_WINDOW_MAX);
        let beats = duration * beat_frequency;
        let density = if beats > BEATS_FAST_COUNT {
            BeatDensity::Fast { beats }
        } else if beats > BEATS_DENSE_COUNT {
            BeatDensity::Dense { beats }
        } else {
            BeatDensity::Clear { beats }
        };
        (duration, density)
    } else {
        let duration = if mean_frequency > 0.0 {
            (BEATS_CARRIER_PERIODS / mean_frequency).clamp(CARRIER_WINDOW_MIN, CARRIER_WINDOW_MAX)
        } else {
            1.0
        };
        (duration, BeatDensity::Carrier { periods: duration * mean_frequency })
    };

    debug!("Beats window - f_beat: {:.3} Hz, f_mean: {:.3} Hz, duration: {:.4}s, {:?}",
           beat_frequency, mean_frequency, duration, density);

    BeatsWindow { duration, beat_frequency, mean_frequency, density }
}

impl BeatsWindow {
    /// Status line describing what the window shows.
    pub fn summary(&self) -> String {
        match self.density {
            BeatDensity::Fast { beats } => format!(
                "Very fast beats! f_beat={:.1} Hz -> {:.0} beats in {:.3}s",
                self.beat_frequency, beats, self.duration
            ),
            BeatDensity::Dense { beats } | BeatDensity::Clear { beats } => format!(
                "Duration: {:.3} s = {:.1} beats (f_beat={:.1} Hz)",
                self.duration, beats, self.beat_frequency
            ),
            BeatDensity::Carrier { periods } => format!(
                "Duration: {:.3} s = {:.0} carrier periods",
                self.duration, periods
            ),
        }
    }
}
