//! Synthetic touch strokes for the headless driver
//!
//! Produces a finger that lands somewhere on the surface, wanders for a
//! random number of moves, lifts, and lands again elsewhere.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::TouchAction;

/// Largest per-event drift in pixels
const MAX_STEP_PX: f32 = 24.0;

/// One synthetic pointer event in surface pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    pub x: f32,
    pub y: f32,
    pub action: TouchAction,
}

/// Endless stream of down / move... / up strokes
pub struct StrokeGenerator {
    rng: StdRng,
    width: f32,
    height: f32,
    x: f32,
    y: f32,
    /// Moves left in the current stroke; `None` while lifted
    remaining: Option<u32>,
}

impl StrokeGenerator {
    pub fn new(seed: u64, width: u32, height: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            width: width.max(1) as f32,
            height: height.max(1) as f32,
            x: 0.0,
            y: 0.0,
            remaining: None,
        }
    }
}

impl Iterator for StrokeGenerator {
    type Item = TouchEvent;

    fn next(&mut self) -> Option<TouchEvent> {
        let action = match self.remaining {
            None => {
                self.x = self.rng.gen_range(0.0..self.width);
                self.y = self.rng.gen_range(0.0..self.height);
                self.remaining = Some(self.rng.gen_range(4..40));
                TouchAction::Down
            }
            Some(0) => {
                self.remaining = None;
                TouchAction::Up
            }
            Some(n) => {
                self.x = (self.x + self.rng.gen_range(-MAX_STEP_PX..=MAX_STEP_PX)).clamp(0.0, self.width);
                self.y = (self.y + self.rng.gen_range(-MAX_STEP_PX..=MAX_STEP_PX)).clamp(0.0, self.height);
                self.remaining = Some(n - 1);
                TouchAction::Move
            }
        };
        Some(TouchEvent {
            x: self.x,
            y: self.y,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strokes_start_with_down_and_end_with_up() {
        let events: Vec<TouchEvent> = StrokeGenerator::new(1, 1080, 1920).take(500).collect();
        assert_eq!(events[0].action, TouchAction::Down);

        let mut lifted = false;
        for pair in events.windows(2) {
            match pair[1].action {
                TouchAction::Down => assert_eq!(pair[0].action, TouchAction::Up),
                TouchAction::Move => assert_ne!(pair[0].action, TouchAction::Up),
                TouchAction::Up => lifted = true,
                TouchAction::Cancel => panic!("generator never cancels"),
            }
        }
        assert!(lifted);
    }

    #[test]
    fn events_stay_on_surface() {
        for event in StrokeGenerator::new(2, 320, 480).take(2000) {
            assert!((0.0..=320.0).contains(&event.x));
            assert!((0.0..=480.0).contains(&event.y));
        }
    }

    #[test]
    fn seeded_generators_agree() {
        let a: Vec<_> = StrokeGenerator::new(3, 100, 100).take(100).collect();
        let b: Vec<_> = StrokeGenerator::new(3, 100, 100).take(100).collect();
        assert_eq!(a, b);
    }
}
