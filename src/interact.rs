//! Pointer interaction state machine.
//!
//! Drag-to-paint and drag-to-pan arrive from the host as a stream of
//! pointer down/move/up events. This module keeps the gesture state
//! explicit (`Idle`, `Drawing` or `Panning`) and turns the stream into
//! plain data: stamp centers for the mask engine, or pan deltas for the
//! host's viewport. The machine never touches the mask or the view
//! itself.

use crate::volume::mask::interpolate_stamps;

/// What a pointer-down begins. The host decides from the active tool and
/// modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMode {
    /// Paint (or erase) along the drag path.
    Paint,
    /// Pan the viewport along the drag path.
    Pan,
}

/// The current gesture state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerState {
    /// No button held.
    Idle,
    /// Painting; remembers the last stamped slice coordinate.
    Drawing {
        /// Last stamped center, in slice pixel coordinates.
        last: (i32, i32),
    },
    /// Panning; remembers the last pointer position.
    Panning {
        /// Last pointer position, in host view coordinates.
        last: (f32, f32),
    },
}

/// What the host should do in response to one pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Nothing to apply.
    None,
    /// Apply one stamp per center, in order, to the active slice.
    Stamps(Vec<(i32, i32)>),
    /// Shift the viewport by this delta, in host view coordinates.
    Pan {
        /// Horizontal shift.
        dx: f32,
        /// Vertical shift.
        dy: f32,
    },
}

/// The interaction state machine. One instance per viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    state: PointerState,
}

impl Default for Interaction {
    fn default() -> Interaction {
        Interaction {
            state: PointerState::Idle,
        }
    }
}

impl Interaction {
    /// A fresh machine in the `Idle` state.
    pub fn new() -> Interaction {
        Interaction::default()
    }

    /// The current state, for host-side cursor feedback.
    pub fn state(&self) -> PointerState {
        self.state
    }

    /// Pointer pressed at `pos` (slice pixel coordinates for painting,
    /// view coordinates for panning).
    ///
    /// Entering `Paint` mode emits the first stamp immediately, so a
    /// click without any drag still paints.
    pub fn pointer_down(&mut self, mode: PointerMode, pos: (f32, f32)) -> Gesture {
        match mode {
            PointerMode::Paint => {
                let center = round_pos(pos);
                self.state = PointerState::Drawing { last: center };
                Gesture::Stamps(vec![center])
            }
            PointerMode::Pan => {
                self.state = PointerState::Panning { last: pos };
                Gesture::None
            }
        }
    }

    /// Pointer moved to `pos`.
    ///
    /// While drawing, emits the interpolated stamp centers between the
    /// previous and current position (previous excluded, it was stamped
    /// already) so fast drags leave no gaps. While panning, emits the
    /// position delta. Idle moves are ignored.
    pub fn pointer_move(&mut self, pos: (f32, f32)) -> Gesture {
        match self.state {
            PointerState::Idle => Gesture::None,
            PointerState::Drawing { last } => {
                let center = round_pos(pos);
                if center == last {
                    return Gesture::None;
                }
                let mut centers = interpolate_stamps(last, center);
                let _ = centers.remove(0);
                self.state = PointerState::Drawing { last: center };
                Gesture::Stamps(centers)
            }
            PointerState::Panning { last } => {
                self.state = PointerState::Panning { last: pos };
                Gesture::Pan {
                    dx: pos.0 - last.0,
                    dy: pos.1 - last.1,
                }
            }
        }
    }

    /// Pointer released; the machine returns to `Idle`.
    pub fn pointer_up(&mut self) -> Gesture {
        self.state = PointerState::Idle;
        Gesture::None
    }
}

fn round_pos(pos: (f32, f32)) -> (i32, i32) {
    (pos.0.round() as i32, pos.1.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::{Gesture, Interaction, PointerMode, PointerState};

    #[test]
    fn click_paints_once() {
        let mut machine = Interaction::new();
        let gesture = machine.pointer_down(PointerMode::Paint, (4.2, 7.6));
        assert_eq!(gesture, Gesture::Stamps(vec![(4, 8)]));
        assert_eq!(machine.pointer_up(), Gesture::None);
        assert_eq!(machine.state(), PointerState::Idle);
    }

    #[test]
    fn drag_emits_gap_free_stamps() {
        let mut machine = Interaction::new();
        let _ = machine.pointer_down(PointerMode::Paint, (0., 0.));
        match machine.pointer_move((4., 2.)) {
            Gesture::Stamps(centers) => {
                // previous position is not re-stamped
                assert_ne!(centers.first(), Some(&(0, 0)));
                assert_eq!(centers.last(), Some(&(4, 2)));
            }
            g => panic!("unexpected gesture: {:?}", g),
        }
    }

    #[test]
    fn jitter_below_a_pixel_is_quiet() {
        let mut machine = Interaction::new();
        let _ = machine.pointer_down(PointerMode::Paint, (5., 5.));
        assert_eq!(machine.pointer_move((5.2, 4.9)), Gesture::None);
    }

    #[test]
    fn panning_reports_deltas() {
        let mut machine = Interaction::new();
        assert_eq!(machine.pointer_down(PointerMode::Pan, (10., 10.)), Gesture::None);
        assert_eq!(
            machine.pointer_move((13., 8.)),
            Gesture::Pan { dx: 3., dy: -2. }
        );
        assert_eq!(
            machine.pointer_move((13., 9.)),
            Gesture::Pan { dx: 0., dy: 1. }
        );
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let mut machine = Interaction::new();
        assert_eq!(machine.pointer_move((1., 1.)), Gesture::None);
    }
}
