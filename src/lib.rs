//! Terminal fireworks: shells rise under gravity, burst at their apex into
//! shaped swarms of fading particles.

pub mod canvas;
pub mod display;
pub mod error;
pub mod fireworks;

pub use display::{Display, Options, Stats, start, stop};
pub use error::{Error, Result};
