use crate::game::Direction;

/// Accept `requested` unless it is the exact reverse of `current`.
///
/// Same-direction requests are accepted; they change nothing.
pub fn request_direction(current: Direction, requested: Direction) -> Direction {
    if current.is_opposite(requested) {
        current
    } else {
        requested
    }
}

/// Buffers the direction change to apply at the next tick.
///
/// Every request is checked against the heading the snake last moved in,
/// so a burst of key presses within one tick cannot chain into a reversal.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    pending: Option<Direction>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `requested` if it is legal from `heading`. Returns whether it
    /// was accepted.
    pub fn request(&mut self, heading: Direction, requested: Direction) -> bool {
        if request_direction(heading, requested) != requested {
            return false;
        }
        self.pending = Some(requested);
        true
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    /// Take the pending direction, leaving the buffer empty
    pub fn take(&mut self) -> Option<Direction> {
        self.pending.take()
    }
}
