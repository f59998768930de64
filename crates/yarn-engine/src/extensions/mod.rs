// extensions/mod.rs
//
// Animation helpers shared by the strand systems: easing curves, per-frame
// low-pass filters, and timed tweens for the transition timeline.

pub mod easing;
pub mod tween;

pub use easing::{Easing, approach, shortest_angle_delta_deg};
pub use tween::Tween;
