//! Numerical core of a wave-packet demo: repetition period of a sum of
//! equally spaced sinusoids, the plotting-window guard derived from it, and
//! the sampling/envelope helpers a renderer needs around it.

pub mod beats;
pub mod envelope;
pub mod error;
pub mod make_waves;
pub mod periodicity;
pub mod presets;
pub mod uncertainty;
pub mod utils;

pub use error::PacketError;
pub use periodicity::{compute, GuardResult, WaveSumSpec};
