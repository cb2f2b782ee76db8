//! Spatial and temporal extent of a packet in a non-dispersive medium, and
//! the uncertainty products built from them.

use std::f64::consts::PI;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::envelope::{hilbert_envelope, packet_width};
use crate::error::{PacketError, Result};
use crate::utils::{
    linspace, SPEED_OF_SOUND, SWEEP_MINIMUM_THRESHOLD, SWEEP_SPACE_HALF_WIDTH,
    SWEEP_SPACE_SAMPLES,
};

/// Theoretical figures for a packet spanning `[f_min, f_max]`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyFigures {
    pub lambda_min: f64,  // m, at f_max
    pub lambda_max: f64,  // m, at f_min
    pub k_min: f64,  // rad/m
    pub k_max: f64,
    pub k_center: f64,
    pub delta_k: f64,
    pub delta_x: f64,  // m, 4π/Δk
    pub delta_f: f64,  // Hz
    pub delta_omega: f64,  // rad/s
    pub delta_t: f64,  // s, 4π/Δω
    pub phase_velocity: f64,
    pub group_velocity: f64,
}

impl UncertaintyFigures {
    pub fn new(f_min: f64, f_max: f64, speed: f64) -> Self {
        let lambda_min = speed / f_max;
        let lambda_max = speed / f_min;
        let k_min = 2.0 * PI / lambda_max;
        let k_max = 2.0 * PI / lambda_min;
        let delta_k = k_max - k_min;
        let delta_x = if delta_k > 0.0 { 4.0 * PI / delta_k } else { 0.0 };

        let delta_f = f_max - f_min;
        let delta_omega = 2.0 * PI * delta_f;
        let delta_t = if delta_omega > 0.0 { 4.0 * PI / delta_omega } else { 0.0 };

        let omega_min = 2.0 * PI * f_min;
        let omega_max = 2.0 * PI * f_max;
        let phase_velocity = if k_min > 0.0 { omega_min / k_min } else { 0.0 };
        // dω/dk; a degenerate range has no slope to measure
        let group_velocity = if k_max != k_min {
            (omega_max - omega_min) / (k_max - k_min)
        } else {
            phase_velocity
        };

        let figures = Self {
            lambda_min,
            lambda_max,
            k_min,
            k_max,
            k_center: (k_min + k_max) / 2.0,
            delta_k,
            delta_x,
            delta_f,
            delta_omega,
            delta_t,
            phase_velocity,
            group_velocity,
        };
        debug!("Uncertainty figures - Δk: {:.4} rad/m, Δx: {:.3} m, Δt: {:.3} ms",
               figures.delta_k, figures.delta_x, figures.delta_t * 1000.0);
        figures
    }

    /// Figures for sound in air.
    pub fn in_air(f_min: f64, f_max: f64) -> Self {
        Self::new(f_min, f_max, SPEED_OF_SOUND)
    }

    pub fn space_product(&self) -> f64 {
        self.delta_x * self.delta_k
    }

    pub fn time_product(&self) -> f64 {
        self.delta_t * self.delta_omega
    }

    /// Relative error of a measured Δx·Δk against the 4π target, in percent.
    pub fn product_error_percent(measured_product: f64) -> f64 {
        (measured_product - 4.0 * PI).abs() / (4.0 * PI) * 100.0
    }
}

/// Series of spatial packets with a growing band, each measured against 4π.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    pub n_packets: usize,
    pub lambda_min: f64,  // m, shared shortest wavelength
    pub lambda_step: f64,  // m, added to the longest wavelength per packet
    pub n_waves: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            n_packets: 8,
            lambda_min: 2.0,
            lambda_step: 0.8,
            n_waves: 60,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SweepRow {
    pub index: usize,  // 1-based
    pub lambda_max: f64,
    pub delta_lambda: f64,
    pub delta_k: f64,
    pub delta_x: f64,
    pub product: f64,
    pub error_percent: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SweepReport {
    pub rows: Vec<SweepRow>,
    pub mean_product: f64,
    pub std_product: f64,  // sample standard deviation
}

/// Builds and measures every packet of the sweep.
///
/// Packet `i` spans wavenumbers `2π/λ_max .. 2π/λ_min` with
/// `λ_max = λ_min + (i + 1)·step`, is sampled over `[-35, 35]` m and its width
/// is taken between the first envelope minima below 8 % of the peak.
pub fn sweep_packets(config: &SweepConfig) -> Result<SweepReport> {
    if config.n_packets == 0 || config.n_waves < 2 {
        return Err(PacketError::invalid(format!(
            "sweep needs at least one packet of 2+ waves, got {} x {}",
            config.n_packets, config.n_waves
        )));
    }
    if !(config.lambda_min > 0.0) || !(config.lambda_step > 0.0) {
        return Err(PacketError::invalid("sweep wavelengths must be positive"));
    }

    let x = linspace(-SWEEP_SPACE_HALF_WIDTH, SWEEP_SPACE_HALF_WIDTH, SWEEP_SPACE_SAMPLES);
    let k_max = 2.0 * PI / config.lambda_min;
    let amplitude = 1.0 / config.n_waves as f64;

    let rows = (0..config.n_packets)
        .into_par_iter()
        .map(|i| {
            let lambda_max = config.lambda_min + (i + 1) as f64 * config.lambda_step;
            let k_min = 2.0 * PI / lambda_max;
            let delta_k = k_max - k_min;
            let wavenumbers = linspace(k_min, k_max, config.n_waves);

            let y: Vec<f64> = x
                .iter()
                .map(|&pos| wavenumbers.iter().map(|&k| amplitude * (k * pos).cos()).sum())
                .collect();
            let envelope = hilbert_envelope(&y)?;
            let delta_x = packet_width(&x, &envelope, SWEEP_MINIMUM_THRESHOLD).width;
            let product = delta_x * delta_k;

            Ok(SweepRow {
                index: i + 1,
                lambda_max,
                delta_lambda: lambda_max - config.lambda_min,
                delta_k,
                delta_x,
                product,
                error_percent: UncertaintyFigures::product_error_percent(product),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let n = rows.len() as f64;
    let mean_product = rows.iter().map(|r| r.product).sum::<f64>() / n;
    let std_product = if rows.len() > 1 {
        (rows.iter().map(|r| (r.product - mean_product).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };

    info!("Multi-packet sweep - {} packets, mean Δx·Δk: {:.3}, std: {:.3}",
          rows.len(), mean_product, std_product);

    Ok(SweepReport { rows, mean_product, std_product })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_hit_four_pi() {
        let figures = UncertaintyFigures::in_air(100.0, 200.0);
        assert!((figures.space_product() - 4.0 * PI).abs() < 1e-9);
        assert!((figures.time_product() - 4.0 * PI).abs() < 1e-9);
        assert!(UncertaintyFigures::product_error_percent(figures.space_product()) < 1e-6);
    }

    #[test]
    fn non_dispersive_velocities_match_medium() {
        let figures = UncertaintyFigures::in_air(256.0, 280.0);
        assert!((figures.phase_velocity - SPEED_OF_SOUND).abs() < 1e-9);
        assert!((figures.group_velocity - SPEED_OF_SOUND).abs() < 1e-6);
    }

    #[test]
    fn wider_band_gives_narrower_packet() {
        let narrow = UncertaintyFigures::in_air(100.0, 105.0);
        let wide = UncertaintyFigures::in_air(100.0, 200.0);
        assert!(wide.delta_x < narrow.delta_x);
        assert!(wide.delta_t < narrow.delta_t);
        // Δt = 2/Δf
        assert!((wide.delta_t - 0.02).abs() < 1e-12);
    }

    #[test]
    fn degenerate_range_has_no_extent() {
        let figures = UncertaintyFigures::in_air(150.0, 150.0);
        assert_eq!(figures.delta_x, 0.0);
        assert_eq!(figures.delta_t, 0.0);
        assert_eq!(figures.group_velocity, figures.phase_velocity);
    }

    #[test]
    fn sweep_products_stay_near_four_pi() {
        let report = sweep_packets(&SweepConfig::default()).unwrap();
        assert_eq!(report.rows.len(), 8);
        for row in &report.rows {
            assert!(row.error_percent < 5.0, "packet {}: Δx·Δk = {}", row.index, row.product);
        }
        assert!((report.mean_product - 4.0 * PI).abs() < 0.05 * 4.0 * PI);
        assert!(report.std_product < 0.5);
    }

    #[test]
    fn sweep_bands_widen_and_packets_narrow() {
        let report = sweep_packets(&SweepConfig { n_packets: 4, ..SweepConfig::default() }).unwrap();
        let indices: Vec<usize> = report.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
        for pair in report.rows.windows(2) {
            assert!(pair[1].delta_k > pair[0].delta_k);
            assert!(pair[1].delta_x < pair[0].delta_x);
        }
        assert!((report.rows[0].delta_lambda - 0.8).abs() < 1e-12);
    }

    #[test]
    fn single_packet_sweep_has_zero_spread() {
        let report = sweep_packets(&SweepConfig { n_packets: 1, ..SweepConfig::default() }).unwrap();
        assert_eq!(report.std_product, 0.0);
        assert_eq!(report.mean_product, report.rows[0].product);
    }

    #[test]
    fn degenerate_sweeps_are_rejected() {
        for config in [
            SweepConfig { n_packets: 0, ..SweepConfig::default() },
            SweepConfig { n_waves: 1, ..SweepConfig::default() },
            SweepConfig { lambda_step: 0.0, ..SweepConfig::default() },
        ] {
            assert!(matches!(sweep_packets(&config), Err(PacketError::InvalidSpec { .. })));
        }
    }
}
