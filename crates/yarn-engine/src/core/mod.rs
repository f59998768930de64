pub mod oscillator;
pub mod rng;
pub mod time;

pub use oscillator::{Oscillator, RandomRange};
pub use rng::Rng;
pub use time::FrameClock;
