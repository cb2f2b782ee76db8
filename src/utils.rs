use log::debug;

pub const REPETITION_SAFETY_FACTOR: f64 = 0.8;  // Fraction of one repetition period we allow on screen
pub const SAMPLES_PER_SECOND: f64 = 20000.0;  // Time-domain plot resolution
pub const MIN_PLOT_SAMPLES: usize = 2;
pub const MAX_PLOT_SAMPLES: usize = 2_000_000;  // Renderer cap, reached when delta_f is tiny
pub const SPEED_OF_SOUND: f64 = 340.0;  // m/s, air at 20°C
pub const DEFAULT_DURATION: f64 = 1.5;  // Seconds requested by the demo slider by default

// Side-by-side comparison window bounds (seconds)
pub const COMPARISON_WINDOW_MIN: f64 = 0.05;
pub const COMPARISON_WINDOW_MAX: f64 = 0.5;

// Beats window: target count, bounds, and density thresholds
pub const BEATS_TARGET_COUNT: f64 = 4.0;
pub const BEATS_MIN_FREQUENCY: f64 = 0.01;  // Hz, below this the tones count as equal
pub const BEATS_WINDOW_MIN: f64 = 0.02;
pub const BEATS_WINDOW_MAX: f64 = 10.0;
pub const BEATS_CARRIER_PERIODS: f64 = 10.0;
pub const CARRIER_WINDOW_MIN: f64 = 0.05;
pub const CARRIER_WINDOW_MAX: f64 = 5.0;
pub const BEATS_DENSE_COUNT: f64 = 6.0;
pub const BEATS_FAST_COUNT: f64 = 10.0;

// Envelope width measurement
pub const ENVELOPE_MINIMUM_THRESHOLD: f64 = 0.05;
pub const ENVELOPE_SEARCH_OFFSET: usize = 10;
pub const ENVELOPE_FLOOR: f64 = 1e-10;

// Multi-packet sweep over a spatial axis (metres)
pub const SWEEP_SPACE_HALF_WIDTH: f64 = 35.0;
pub const SWEEP_SPACE_SAMPLES: usize = 10000;
pub const SWEEP_MINIMUM_THRESHOLD: f64 = 0.08;

/// Evenly spaced values over `[start, end]`, endpoints included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Number of plot samples needed to cover `span` seconds.
pub fn plot_sample_count(span: f64) -> usize {
    let count = ((span * SAMPLES_PER_SECOND) as usize).max(MIN_PLOT_SAMPLES);
    debug!("Plot sample count - Span: {:.6}s, Samples: {}", span, count);
    count
}

/// Seconds to milliseconds, for display
pub fn to_millis(seconds: f64) -> f64 {
    seconds * 1000.0
}
