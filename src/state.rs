//! State shared between the capture loop and the dashboard.
//!
//! The capture loop is the only writer; the dashboard only reads.  Both
//! halves receive an explicit [`Shared`] handle — there are no ambient
//! globals.  The latest annotated frame travels through a single-slot
//! mutex with overwrite-latest semantics: no queue, no backpressure, a
//! slow reader simply sees the freshest frame when it next looks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::camera::Frame;

// ════════════════════════════════════════════════════════════════════════════
// Telemetry — the sampler's outputs, refreshed once per processed frame
// ════════════════════════════════════════════════════════════════════════════

/// Snapshot of what the capture loop last measured.
///
/// `volume_percent` is the *committed* volume and is always in 0–100.
/// A frame without a detected hand leaves `volume_percent` and
/// `distance_px` untouched from the previous frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Telemetry {
    /// Committed volume percent (0–100).
    pub volume_percent: u8,
    /// Last measured pinch distance, in frame pixels.
    pub distance_px: f32,
    /// Whether the most recent frame contained a hand.
    pub hand_detected: bool,
    /// Frames processed so far.  Zero means the camera hasn't delivered
    /// anything yet, which the dashboard shows as "Initializing".
    pub frames: u64,
}

impl Default for Telemetry {
    fn default() -> Self {
        Telemetry {
            volume_percent: 50,
            distance_px: 0.0,
            hand_detected: false,
            frames: 0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Shared — the handle passed to both loop entry points
// ════════════════════════════════════════════════════════════════════════════

/// Cheap-to-clone handle (three `Arc`s) shared by the capture loop and the
/// dashboard.
#[derive(Clone)]
pub struct Shared {
    telemetry: Arc<Mutex<Telemetry>>,
    running: Arc<AtomicBool>,
    frame_slot: Arc<Mutex<Option<Frame>>>,
}

impl Shared {
    pub fn new() -> Self {
        Shared {
            telemetry: Arc::new(Mutex::new(Telemetry::default())),
            running: Arc::new(AtomicBool::new(true)),
            frame_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Mutate the telemetry record under the lock.  Writer side.
    pub fn update(&self, f: impl FnOnce(&mut Telemetry)) {
        f(&mut lock_ignoring_poison(&self.telemetry));
    }

    /// Clone the current telemetry.  Reader side.
    pub fn snapshot(&self) -> Telemetry {
        lock_ignoring_poison(&self.telemetry).clone()
    }

    /// Publish an annotated frame, replacing whatever was in the slot.
    pub fn publish_frame(&self, frame: Frame) {
        *lock_ignoring_poison(&self.frame_slot) = Some(frame);
    }

    /// Take the latest published frame, leaving the slot empty.
    pub fn take_frame(&self) -> Option<Frame> {
        lock_ignoring_poison(&self.frame_slot).take()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Cooperative cancellation: the capture loop polls this every
    /// iteration and exits within one frame's processing time.
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Default for Shared {
    fn default() -> Self {
        Self::new()
    }
}

/// A poisoned mutex here only means the other thread panicked mid-write;
/// the shutdown path still needs the data, so carry on with it.
fn lock_ignoring_poison<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
