use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::config::ConfigError;

/// Index of a strand in the menu, in configuration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrandId(pub u32);

impl StrandId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Host viewport in CSS pixels. Only [`Viewport::new`] builds one, so every
/// dimension is finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    device_pixel_ratio: f32,
}

impl Viewport {
    /// Backing stores never exceed this scale, however dense the display.
    pub const MAX_BACKING_SCALE: f32 = 2.0;

    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Result<Self, ConfigError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height) && valid(device_pixel_ratio)) {
            return Err(ConfigError::InvalidViewport {
                width,
                height,
                device_pixel_ratio,
            });
        }
        Ok(Self {
            width,
            height,
            device_pixel_ratio,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn backing_scale(&self) -> f32 {
        self.device_pixel_ratio.min(Self::MAX_BACKING_SCALE)
    }

    /// Canvas backing store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        let s = self.backing_scale();
        (
            (self.width * s).round() as u32,
            (self.height * s).round() as u32,
        )
    }

    /// Horizontal position as a fraction of the width, clamped to [0, 1].
    pub fn x_fraction(&self, x: f32) -> f32 {
        (x / self.width).clamp(0.0, 1.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            device_pixel_ratio: 1.0,
        }
    }
}

/// Something the host should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    /// A strand was clicked; open its page.
    Activated { strand: StrandId, target: String },
    /// The open page started closing.
    Closing { strand: StrandId },
    /// The strand finished easing back; the menu accepts input again.
    Released { strand: StrandId },
}

impl MenuEvent {
    pub const KIND_ACTIVATED: f32 = 1.0;
    pub const KIND_CLOSING: f32 = 2.0;
    pub const KIND_RELEASED: f32 = 3.0;

    pub fn strand(&self) -> StrandId {
        match self {
            MenuEvent::Activated { strand, .. }
            | MenuEvent::Closing { strand }
            | MenuEvent::Released { strand } => *strand,
        }
    }

    /// Wire form. The host resolves click targets from the strand index.
    pub fn record(&self) -> EventRecord {
        let kind = match self {
            MenuEvent::Activated { .. } => Self::KIND_ACTIVATED,
            MenuEvent::Closing { .. } => Self::KIND_CLOSING,
            MenuEvent::Released { .. } => Self::KIND_RELEASED,
        };
        EventRecord {
            kind,
            strand: self.strand().0 as f32,
            a: 0.0,
            b: 0.0,
        }
    }
}

/// A menu event as read by the host from wasm memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EventRecord {
    pub kind: f32,
    pub strand: f32,
    pub a: f32,
    pub b: f32,
}

impl EventRecord {
    pub const FLOATS: usize = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_scale_capped_at_two() {
        let v = Viewport::new(800.0, 600.0, 3.0).expect("valid viewport");
        assert_eq!(v.backing_scale(), 2.0);
        assert_eq!(v.backing_size(), (1600, 1200));
        let v = Viewport::new(800.0, 600.0, 1.5).expect("valid viewport");
        assert_eq!(v.backing_size(), (1200, 900));
    }

    #[test]
    fn rejects_bad_viewports() {
        assert!(Viewport::new(0.0, 600.0, 1.0).is_err());
        assert!(Viewport::new(800.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(800.0, 600.0, f32::NAN).is_err());
        assert!(Viewport::new(f32::INFINITY, 600.0, 1.0).is_err());
    }

    #[test]
    fn viewport_keeps_validated_dimensions() {
        let v = Viewport::new(800.0, 600.0, 2.5).expect("valid viewport");
        assert_eq!((v.width(), v.height(), v.device_pixel_ratio()), (800.0, 600.0, 2.5));
        assert_eq!(v.size(), Vec2::new(800.0, 600.0));
        assert!(v.x_fraction(0.0).is_finite());
        assert!(Viewport::default().x_fraction(0.0).is_finite());
    }

    #[test]
    fn x_fraction_clamped() {
        let v = Viewport::default();
        assert_eq!(v.x_fraction(640.0), 0.5);
        assert_eq!(v.x_fraction(-20.0), 0.0);
        assert_eq!(v.x_fraction(5000.0), 1.0);
    }

    #[test]
    fn event_records() {
        let e = MenuEvent::Activated {
            strand: StrandId(2),
            target: "/shop".into(),
        };
        assert_eq!(e.record().kind, MenuEvent::KIND_ACTIVATED);
        assert_eq!(e.record().strand, 2.0);
        assert_eq!(MenuEvent::Released { strand: StrandId(1) }.record().kind, 3.0);
        assert_eq!(std::mem::size_of::<EventRecord>(), EventRecord::FLOATS * 4);
    }
}
