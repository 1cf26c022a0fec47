//! Hand-landmark tracking — the trait seam plus the window-driven simulator.
//!
//! A tracker returns zero or more hands per frame, each with 21 normalized
//! landmark positions; only the thumb tip and the index fingertip are
//! consumed downstream.  Consumers never know whether landmarks came from a
//! real detector or the simulator.

use std::sync::mpsc::Receiver;

use crate::camera::Frame;

// ════════════════════════════════════════════════════════════════════════════
// Landmarks
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARKS_PER_HAND: usize = 21;
/// Landmark index of the thumb tip.
pub const THUMB_TIP: usize = 4;
/// Landmark index of the index fingertip.
pub const INDEX_FINGER_TIP: usize = 8;

/// One landmark, normalized to the frame: x and y in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    /// Pixel coordinates within a `width`×`height` frame.
    pub fn to_pixel(self, width: usize, height: usize) -> (i32, i32) {
        (
            (self.x * width as f32).round() as i32,
            (self.y * height as f32).round() as i32,
        )
    }
}

/// The 21 landmarks of one detected hand.
#[derive(Clone, Debug)]
pub struct HandLandmarks {
    pub points: [Landmark; LANDMARKS_PER_HAND],
}

impl HandLandmarks {
    pub fn thumb_tip(&self) -> Landmark {
        self.points[THUMB_TIP]
    }

    pub fn index_tip(&self) -> Landmark {
        self.points[INDEX_FINGER_TIP]
    }
}

/// Euclidean pixel distance between thumb tip and index fingertip.
pub fn pinch_distance_px(hand: &HandLandmarks, width: usize, height: usize) -> f32 {
    let (tx, ty) = hand.thumb_tip().to_pixel(width, height);
    let (ix, iy) = hand.index_tip().to_pixel(width, height);
    let dx = (ix - tx) as f32;
    let dy = (iy - ty) as f32;
    (dx * dx + dy * dy).sqrt()
}

// ════════════════════════════════════════════════════════════════════════════
// HandTracker trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Knobs passed to the detector backend.
#[derive(Clone, Copy, Debug)]
pub struct TrackerConfig {
    pub max_hands: usize,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            max_hands: 1,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.7,
        }
    }
}

/// Anything that can find hands in a frame.
pub trait HandTracker: Send + 'static {
    /// Detect hands in an already mirror-flipped RGB frame.  At most
    /// `max_hands` results; the caller uses the first one only.
    fn detect(&mut self, frame: &Frame) -> Vec<HandLandmarks>;
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandTracker — pointer-driven simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the dashboard window (simulation mode).
///
/// The window event loop stays decoupled from gesture logic: it just
/// forwards these over a channel and the tracker folds them into a hand.
#[derive(Clone, Copy, Debug)]
pub enum SimInput {
    /// Pointer position in normalized frame coordinates.
    Pointer { x: f32, y: f32 },
    /// Toggle simulated hand presence.
    ToggleHand,
}

/// Tracker backend driven by [`SimInput`] events from the dashboard.
///
/// While the simulated hand is present, the thumb tip sits at the frame
/// centre and the index fingertip follows the mouse, so the pinch distance
/// is simply how far the pointer is from the centre of the video panel.
pub struct SimHandTracker {
    rx: Receiver<SimInput>,
    cfg: TrackerConfig,
    present: bool,
    pointer: Landmark,
}

impl SimHandTracker {
    pub fn new(rx: Receiver<SimInput>, cfg: TrackerConfig) -> Self {
        SimHandTracker {
            rx,
            cfg,
            present: false,
            pointer: Landmark { x: 0.5, y: 0.5 },
        }
    }
}

impl HandTracker for SimHandTracker {
    fn detect(&mut self, _frame: &Frame) -> Vec<HandLandmarks> {
        while let Ok(input) = self.rx.try_recv() {
            match input {
                SimInput::Pointer { x, y } => self.pointer = Landmark { x, y },
                SimInput::ToggleHand => self.present = !self.present,
            }
        }
        if !self.present {
            return Vec::new();
        }
        let thumb = Landmark { x: 0.5, y: 0.5 };
        let mut hands = vec![synthetic_hand(thumb, self.pointer)];
        hands.truncate(self.cfg.max_hands);
        hands
    }
}

/// Build a 21-point hand whose thumb tip and index fingertip land exactly
/// at the given normalized positions.  The remaining joints are spread
/// along the connecting segment so the overlay reads as a hand rather
/// than two dots.
pub fn synthetic_hand(thumb: Landmark, index: Landmark) -> HandLandmarks {
    let mut points = [thumb; LANDMARKS_PER_HAND];
    for (i, p) in points.iter_mut().enumerate() {
        let t = i as f32 / (LANDMARKS_PER_HAND - 1) as f32;
        *p = Landmark {
            x: thumb.x + (index.x - thumb.x) * t,
            y: thumb.y + (index.y - thumb.y) * t,
        };
    }
    points[THUMB_TIP] = thumb;
    points[INDEX_FINGER_TIP] = index;
    HandLandmarks { points }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn to_pixel_scales_and_rounds() {
        let lm = Landmark { x: 0.5, y: 0.25 };
        assert_eq!(lm.to_pixel(640, 480), (320, 120));
        let edge = Landmark { x: 1.0, y: 1.0 };
        assert_eq!(edge.to_pixel(640, 480), (640, 480));
    }

    #[test]
    fn pinch_distance_is_euclidean() {
        // 3-4-5 triangle: dx = 30 px, dy = 40 px
        let hand = synthetic_hand(
            Landmark { x: 0.0, y: 0.0 },
            Landmark { x: 0.3, y: 0.4 },
        );
        assert_eq!(pinch_distance_px(&hand, 100, 100), 50.0);
    }

    #[test]
    fn synthetic_hand_pins_both_tips() {
        let thumb = Landmark { x: 0.2, y: 0.6 };
        let index = Landmark { x: 0.8, y: 0.3 };
        let hand = synthetic_hand(thumb, index);
        assert_eq!(hand.thumb_tip(), thumb);
        assert_eq!(hand.index_tip(), index);
        assert_eq!(hand.points.len(), LANDMARKS_PER_HAND);
    }

    #[test]
    fn sim_tracker_reports_nothing_until_toggled() {
        let (tx, rx) = mpsc::channel();
        let mut tracker = SimHandTracker::new(rx, TrackerConfig::default());
        let frame = Frame::new(64, 48);

        assert!(tracker.detect(&frame).is_empty());

        tx.send(SimInput::ToggleHand).unwrap();
        tx.send(SimInput::Pointer { x: 0.75, y: 0.5 }).unwrap();
        let hands = tracker.detect(&frame);
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].index_tip(), Landmark { x: 0.75, y: 0.5 });

        tx.send(SimInput::ToggleHand).unwrap();
        assert!(tracker.detect(&frame).is_empty());
    }

    #[test]
    fn sim_tracker_honours_max_hands() {
        let (tx, rx) = mpsc::channel();
        let mut tracker = SimHandTracker::new(
            rx,
            TrackerConfig {
                max_hands: 0,
                ..TrackerConfig::default()
            },
        );
        tx.send(SimInput::ToggleHand).unwrap();
        assert!(tracker.detect(&Frame::new(8, 8)).is_empty());
    }
}
