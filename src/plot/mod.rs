//! Plot rendering and styling.
//!
//! - declarative appearance settings (`style`)
//! - PNG rendering of data + fitted line (`png`)

pub mod png;
pub mod style;

pub use png::*;
pub use style::*;
