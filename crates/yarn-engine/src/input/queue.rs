/// Input events the menu understands.
///
/// Hosts either forward raw pointer events in viewport coordinates and let
/// the engine hit-test the strands, or do their own hit-testing and send the
/// per-strand events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/cursor moved to viewport coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A touch/click began at viewport coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at viewport coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// A click completed at viewport coordinates (x, y).
    Click { x: f32, y: f32 },
    /// The pointer entered a strand's hit band. `x` is the pointer's
    /// horizontal fraction of the viewport.
    StrandEnter { strand: u32, x: f32 },
    StrandMove { strand: u32, x: f32 },
    StrandLeave { strand: u32 },
    StrandClick { strand: u32 },
    /// The close button was pressed.
    Close,
    /// A key was pressed. Escape closes an open page.
    KeyDown { key_code: u32 },
    /// Device orientation gamma in degrees.
    Tilt { gamma: f32 },
}

impl InputEvent {
    pub const ESCAPE: u32 = 27;
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_in_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::KeyDown { key_code: InputEvent::ESCAPE });
        q.push(InputEvent::StrandEnter { strand: 2, x: 0.4 });
        assert_eq!(q.len(), 3);
        let events = q.drain();
        assert!(q.is_empty());
        assert_eq!(events[0], InputEvent::PointerDown { x: 10.0, y: 20.0 });
        assert_eq!(events[2], InputEvent::StrandEnter { strand: 2, x: 0.4 });
    }

    #[test]
    fn iter_does_not_consume() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Close);
        assert_eq!(q.iter().count(), 1);
        assert_eq!(q.len(), 1);
    }
}
