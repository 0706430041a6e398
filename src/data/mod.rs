//! Dataset generation.

pub mod synth;

pub use synth::*;
