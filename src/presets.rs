use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use log::{info, warn};

use crate::beats::{beats_window, BeatsWindow};
use crate::error::{PacketError, Result};
use crate::periodicity::WaveSumSpec;

pub const DEFAULT_PRESET: &str = "Standard packet";
pub const DEFAULT_BEATS_PRESET: &str = "Standard tuning fork A 440 Hz";

// A named packet configuration offered by the demo
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PacketPreset {
    pub f_min: f64,
    pub f_max: f64,
    pub n_waves: usize,
    pub description: String,
}

impl PacketPreset {
    fn new(f_min: f64, f_max: f64, n_waves: usize, description: &str) -> Self {
        Self { f_min, f_max, n_waves, description: description.to_string() }
    }

    /// Pairs the preset with the duration the user asked to see.
    pub fn with_duration(&self, requested_duration: f64) -> WaveSumSpec {
        WaveSumSpec::new(self.n_waves, self.f_min, self.f_max, requested_duration)
    }
}

// Holds presets keyed by name, kept sorted for listing
#[derive(Debug, Clone, PartialEq)]
pub struct PresetBook {
    pub presets: BTreeMap<String, PacketPreset>,
}

impl PresetBook {
    pub fn builtin() -> Self {
        let presets = [
            (DEFAULT_PRESET, PacketPreset::new(100.0, 130.0, 50,
                "Balanced setup: moderate localisation, easy to read.")),
            ("Super-localized", PacketPreset::new(100.0, 200.0, 80,
                "Wide band gives a narrow packet (small Δx). Shows the uncertainty principle.")),
            ("Quasi-monochromatic", PacketPreset::new(100.0, 105.0, 30,
                "Narrow band gives a wide packet (large Δx), close to a pure tone.")),
            ("Thomson experiment (1897)", PacketPreset::new(256.0, 280.0, 60,
                "Sound packets in the spirit of Thomson's particle experiments.")),
            ("Radar pulse", PacketPreset::new(500.0, 700.0, 100,
                "Short, wide-band pulse: the range/velocity trade-off.")),
            ("Voice band", PacketPreset::new(200.0, 400.0, 70,
                "Typical formant band of the human voice, well localised in time.")),
        ]
        .into_iter()
        .map(|(name, preset)| (name.to_string(), preset))
        .collect();

        Self { presets }
    }

    /// Parses a preset table from YAML text, adding any missing built-ins.
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        let presets: BTreeMap<String, PacketPreset> = serde_yaml::from_str(yaml_str)?;
        let mut book = Self { presets };

        if !book.presets.contains_key(DEFAULT_PRESET) {
            warn!("'{}' preset not found. Adding built-in presets.", DEFAULT_PRESET);
            for (name, preset) in Self::builtin().presets {
                book.presets.entry(name).or_insert(preset);
            }
        }
        info!("Loaded {} presets", book.presets.len());
        Ok(book)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.presets)?)
    }

    pub fn get(&self, name: &str) -> Result<&PacketPreset> {
        self.presets
            .get(name)
            .ok_or_else(|| PacketError::UnknownPreset(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }
}

impl Default for PresetBook {
    fn default() -> Self {
        Self::builtin()
    }
}

// A historical two-tone setup for the beats view
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BeatsPreset {
    pub f1: f64,
    pub f2: f64,
    pub a1: f64,
    pub a2: f64,
    pub duration: f64,  // seconds, used when the automatic window is off
    pub description: String,
}

impl BeatsPreset {
    fn new(f1: f64, f2: f64, duration: f64, description: &str) -> Self {
        Self { f1, f2, a1: 1.0, a2: 1.0, duration, description: description.to_string() }
    }

    /// Automatic plot window for this pair of tones.
    pub fn window(&self) -> BeatsWindow {
        beats_window(self.f1, self.f2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeatsBook {
    pub presets: BTreeMap<String, BeatsPreset>,
}

impl BeatsBook {
    pub fn builtin() -> Self {
        let presets = [
            (DEFAULT_BEATS_PRESET, BeatsPreset::new(440.0, 445.0, 2.0,
                "A at 440 Hz has been the international tuning standard since 1955 (ISO 16).")),
            ("Verdi tuning fork A 432 Hz", BeatsPreset::new(432.0, 437.0, 2.0,
                "Verdi favoured A at 432 Hz on artistic grounds, the so-called scientific pitch.")),
            ("Helmholtz experiment (1863)", BeatsPreset::new(256.0, 261.0, 3.0,
                "Helmholtz studied beats with acoustic resonators at 256 Hz (middle C).")),
            ("Heisenberg experiment (1927)", BeatsPreset::new(1000.0, 1100.0, 1.5,
                "Sound waves as a first illustration of the uncertainty principle.")),
            ("AM radio", BeatsPreset::new(800.0, 810.0, 2.0,
                "About 10 Hz beats, like those heard between neighbouring AM stations.")),
            ("Slow musical beats", BeatsPreset::new(440.0, 442.0, 4.0,
                "2 beats per second: what musicians listen for when tuning by ear.")),
            ("Fast beats (interference)", BeatsPreset::new(1000.0, 1020.0, 1.0,
                "20 beats per second: at the edge between separate tone and roughness.")),
        ]
        .into_iter()
        .map(|(name, preset)| (name.to_string(), preset))
        .collect();

        Self { presets }
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        let presets: BTreeMap<String, BeatsPreset> = serde_yaml::from_str(yaml_str)?;
        info!("Loaded {} beats presets", presets.len());
        Ok(Self { presets })
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.presets)?)
    }

    pub fn get(&self, name: &str) -> Result<&BeatsPreset> {
        self.presets
            .get(name)
            .ok_or_else(|| PacketError::UnknownPreset(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }
}

impl Default for BeatsBook {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::periodicity::compute;

    #[test]
    fn builtin_presets_are_valid_packets() {
        let book = PresetBook::builtin();
        assert_eq!(book.presets.len(), 6);
        for (name, preset) in &book.presets {
            assert!(compute(preset.with_duration(1.0)).is_ok(), "{} should validate", name);
        }
    }

    #[test]
    fn super_localized_matches_documented_example() {
        let book = PresetBook::builtin();
        let result = compute(book.get("Super-localized").unwrap().with_duration(2.0)).unwrap();
        assert!((result.repetition_period - 0.79).abs() < 1e-12);
        assert!(result.was_truncated);
    }

    #[test]
    fn yaml_round_trip_keeps_table() {
        let book = PresetBook::builtin();
        let yaml = book.to_yaml().unwrap();
        assert_eq!(PresetBook::from_yaml(&yaml).unwrap(), book);
    }

    #[test]
    fn custom_table_gains_builtins() {
        let yaml = "Mine:\n  f_min: 10.0\n  f_max: 20.0\n  n_waves: 5\n  description: test\n";
        let book = PresetBook::from_yaml(yaml).unwrap();
        assert_eq!(book.get("Mine").unwrap().n_waves, 5);
        assert!(book.get(DEFAULT_PRESET).is_ok());
    }

    #[test]
    fn beats_presets_have_close_tones() {
        let book = BeatsBook::builtin();
        assert_eq!(book.presets.len(), 7);
        for (name, preset) in &book.presets {
            let window = preset.window();
            assert!(window.beat_frequency > 0.0 && window.beat_frequency <= 100.0, "{}", name);
            assert!(window.duration >= 0.02 && window.duration <= 10.0, "{}", name);
            assert_eq!((preset.a1, preset.a2), (1.0, 1.0));
        }
    }

    #[test]
    fn slow_musical_beats_show_two_seconds() {
        let book = BeatsBook::builtin();
        let window = book.get("Slow musical beats").unwrap().window();
        assert!((window.duration - 2.0).abs() < 1e-9);
        assert!(book.get(DEFAULT_BEATS_PRESET).is_ok());
    }

    #[test]
    fn beats_yaml_round_trip_keeps_table() {
        let book = BeatsBook::builtin();
        assert_eq!(BeatsBook::from_yaml(&book.to_yaml().unwrap()).unwrap(), book);
        assert!(matches!(book.get("nope"), Err(PacketError::UnknownPreset(_))));
    }

    #[test]
    fn bad_yaml_and_unknown_names_fail() {
        assert!(matches!(PresetBook::from_yaml("- not a map"), Err(PacketError::PresetFormat(_))));
        assert!(matches!(PresetBook::builtin().get("nope"), Err(PacketError::UnknownPreset(_))));
    }
}
