use std::f64::consts::PI;
use log::debug;
use rayon::prelude::*;

use crate::error::{PacketError, Result};
use crate::periodicity::{compute, WaveSumSpec};
use crate::utils::{linspace, plot_sample_count, MAX_PLOT_SAMPLES};

/// Which stretch of time to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// `[0, d]`
    Forward,
    /// `[-d, d]`, the packet centred on t = 0 with its past and future
    Symmetric,
}

/// Time axis and summed signal, ready to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPacket {
    pub times: Vec<f64>,
    pub samples: Vec<f64>,
}

impl SampledPacket {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Component frequencies of the packet, each carrying amplitude `1 / N`
pub fn component_frequencies(n_waves: usize, f_min: f64, f_max: f64) -> Vec<(f64, f64)> {
    let amplitude = if n_waves > 0 { 1.0 / n_waves as f64 } else { 0.0 };
    linspace(f_min, f_max, n_waves)
        .into_iter()
        .map(|freq| (freq, amplitude))
        .collect()
}

/// Value of the summed signal at time `t`.
pub fn packet_value(components: &[(f64, f64)], t: f64) -> f64 {
    components
        .iter()
        .map(|&(freq, amp)| amp * (2.0 * PI * freq * t).cos())
        .sum()
}

/// Samples the packet described by `spec` over the window allowed by the guard.
///
/// # Arguments
///
/// * `spec` - Wave parameters and requested duration
/// * `window` - One-sided or symmetric time axis
///
/// # Returns
///
/// The sampled packet, `InvalidSpec` when `spec` fails the guard, or
/// `TooManySamples` when the window is longer than the renderer can take.
pub fn sample_packet(spec: &WaveSumSpec, window: Window) -> Result<SampledPacket> {
    let duration = compute(*spec)?.effective_duration;
    let (start, span) = match window {
        Window::Forward => (0.0, duration),
        Window::Symmetric => (-duration, 2.0 * duration),
    };

    let count = plot_sample_count(span);
    if count > MAX_PLOT_SAMPLES {
        return Err(PacketError::TooManySamples { requested: count, max: MAX_PLOT_SAMPLES });
    }

    let components = component_frequencies(spec.n_waves, spec.f_min, spec.f_max);
    let times = linspace(start, start + span, count);
    let samples: Vec<f64> = times
        .par_iter()
        .map(|&t| packet_value(&components, t))
        .collect();

    debug!("Sampled packet - Window: {:?}, Samples: {}, Components: [{}]",
           window, count, format_components_debug(&components));

    Ok(SampledPacket { times, samples })
}

/// Formats components for debug output
pub fn format_components_debug(components: &[(f64, f64)]) -> String {
    match components {
        [] => String::new(),
        [only] => format!("({:.1} Hz, {:.3})", only.0, only.1),
        [first, .., last] => format!(
            "({:.1} Hz, {:.3}) .. ({:.1} Hz, {:.3}) x{}",
            first.0, first.1, last.0, last.1, components.len()
        ),
    }
}
