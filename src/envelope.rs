use log::{debug, warn};
use realfft::RealFftPlanner;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{PacketError, Result};
use crate::utils::{ENVELOPE_FLOOR, ENVELOPE_MINIMUM_THRESHOLD, ENVELOPE_SEARCH_OFFSET};

/// Measured extent of a packet on its sample axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketWidth {
    pub width: f64,
    pub left_index: usize,
    pub right_index: usize,
}

/// Amplitude envelope of `signal`: magnitude of its analytic signal.
pub fn hilbert_envelope(signal: &[f64]) -> Result<Vec<f64>> {
    let n = signal.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    // Forward real FFT gives the non-negative half of the spectrum
    let mut real_planner = RealFftPlanner::<f64>::new();
    let forward = real_planner.plan_fft_forward(n);
    let mut indata = signal.to_vec();
    let mut half_spectrum = forward.make_output_vec();
    forward
        .process(&mut indata, &mut half_spectrum)
        .map_err(|e| PacketError::Fft(format!("{:?}", e)))?;

    // Analytic spectrum: keep DC (and Nyquist for even n), double positive bins,
    // leave negative bins at zero
    let mut analytic = vec![Complex::new(0.0, 0.0); n];
    for (k, &bin) in half_spectrum.iter().enumerate() {
        let is_edge = k == 0 || (n % 2 == 0 && k == n / 2);
        analytic[k] = if is_edge { bin } else { bin * 2.0 };
    }

    let mut planner = FftPlanner::<f64>::new();
    let inverse = planner.plan_fft_inverse(n);
    inverse.process(&mut analytic);

    let scale = 1.0 / n as f64;
    Ok(analytic.iter().map(|c| c.norm() * scale).collect())
}

/// Width of a packet between the first lateral minima of its envelope.
///
/// Starting from the envelope maximum, the search walks outward looking for
/// the first local minimum that falls under `threshold` (relative to the peak),
/// skipping the first [`ENVELOPE_SEARCH_OFFSET`] samples next to the peak and
/// next to either edge. When either side has no such minimum, the full width
/// at half maximum is used instead.
pub fn packet_width(times: &[f64], envelope: &[f64], threshold: f64) -> PacketWidth {
    let len = times.len().min(envelope.len());
    let last = len.saturating_sub(1);
    let whole = PacketWidth { width: 0.0, left_index: 0, right_index: last };
    if len == 0 {
        return whole;
    }

    let max_env = envelope[..len].iter().cloned().fold(f64::MIN, f64::max);
    if max_env < ENVELOPE_FLOOR {
        return whole;
    }
    let norm: Vec<f64> = envelope[..len].iter().map(|v| v / max_env).collect();

    let center = norm
        .iter()
        .enumerate()
        .fold(0, |best, (i, &v)| if v > norm[best] { i } else { best });

    let is_minimum = |i: usize| {
        i > 0 && i < last && norm[i] < norm[i - 1] && norm[i] < norm[i + 1] && norm[i] < threshold
    };

    let offset = ENVELOPE_SEARCH_OFFSET;
    let left = if center > offset {
        ((offset + 1)..=(center - offset)).rev().find(|&i| is_minimum(i))
    } else {
        None
    };
    let right_end = len.saturating_sub(offset);
    let right = ((center + offset)..right_end).find(|&i| is_minimum(i));

    let (left_index, right_index) = match (left, right) {
        (Some(l), Some(r)) => (l, r),
        _ => {
            debug!("No lateral minima around index {}, falling back to FWHM", center);
            let first = norm.iter().position(|&v| v > 0.5);
            let last_above = norm.iter().rposition(|&v| v > 0.5);
            match (first, last_above) {
                (Some(l), Some(r)) => (l, r),
                _ => {
                    warn!("Envelope never exceeds half maximum");
                    return whole;
                }
            }
        }
    };

    PacketWidth {
        width: (times[right_index] - times[left_index]).abs(),
        left_index,
        right_index,
    }
}

/// [`packet_width`] with the default minimum threshold.
pub fn default_packet_width(times: &[f64], envelope: &[f64]) -> PacketWidth {
    packet_width(times, envelope, ENVELOPE_MINIMUM_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_waves::{sample_packet, Window};
    use crate::periodicity::WaveSumSpec;
    use std::f64::consts::PI;

    #[test]
    fn envelope_of_a_cosine_is_flat() {
        // whole number of cycles so the FFT sees no leakage
        let n = 1024;
        let signal: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 16.0 * i as f64 / n as f64).cos())
            .collect();
        let env = hilbert_envelope(&signal).unwrap();
        assert_eq!(env.len(), n);
        assert!(env.iter().all(|v| (v - 1.0).abs() < 1e-9));
    }

    #[test]
    fn envelope_tracks_beat_amplitude() {
        let n = 2048;
        // carrier 64 cycles, modulation 2 cycles
        let signal: Vec<f64> = (0..n)
            .map(|i| {
                let x = i as f64 / n as f64;
                (1.0 + 0.5 * (2.0 * PI * 2.0 * x).cos()) * (2.0 * PI * 64.0 * x).cos()
            })
            .collect();
        let env = hilbert_envelope(&signal).unwrap();
        assert!((env[0] - 1.5).abs() < 1e-6);
        assert!((env[n / 4] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_signal_has_empty_envelope() {
        assert!(hilbert_envelope(&[]).unwrap().is_empty());
    }

    #[test]
    fn symmetric_packet_width_spans_first_minima() {
        let spec = WaveSumSpec::new(50, 100.0, 130.0, 1.0);
        let packet = sample_packet(&spec, Window::Symmetric).unwrap();
        let env = hilbert_envelope(&packet.samples).unwrap();
        let width = default_packet_width(&packet.times, &env);

        // first envelope zeros at ±(N-1)/(N·Δf), close to ±1/Δf
        let expected = 2.0 / spec.delta_f();
        assert!(width.left_index < width.right_index);
        assert!((width.width - expected).abs() < 0.25 * expected, "width {}", width.width);
    }

    #[test]
    fn flat_envelope_falls_back_to_half_maximum() {
        let times: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let env = vec![1.0; 100];
        let width = default_packet_width(&times, &env);
        assert_eq!((width.left_index, width.right_index), (0, 99));
        assert_eq!(width.width, 99.0);
    }

    #[test]
    fn silent_envelope_has_zero_width() {
        let times: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let width = default_packet_width(&times, &[0.0; 10]);
        assert_eq!(width, PacketWidth { width: 0.0, left_index: 0, right_index: 9 });
    }
}
