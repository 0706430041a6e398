//! Numerical primitives for the least-squares fit.

pub mod wls;

pub use wls::*;
