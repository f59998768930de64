pub mod api;
pub mod core;
pub mod curve;
pub mod strand;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, CurveKind, MenuConfig, StrandConfig};
pub use api::menu::Menu;
pub use api::types::{EventRecord, MenuEvent, StrandId, Viewport};
pub use core::{FrameClock, Rng};
pub use curve::{CurveMotion, CurveSample, CurveStrategy, RopeConfig, SegmentChain, StrandCurve};
pub use strand::{Strand, StrandState, TransitionPhase, TransitionToken};
pub use renderer::glyph::{GlyphBuffer, GlyphRecord};
pub use renderer::stroke::{StrokeColor, StrokePass, StrokeStyle};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::{ProtocolLayout, StrandRecord};

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorState, VectorVertex};

// Extensions: easing and tweens for the transition timeline
pub use extensions::{Easing, Tween, approach};
