//! The capture loop — frames in, volume out.
//!
//! One worker thread continuously reads camera frames, asks the tracker
//! for landmarks, turns the pinch distance into a volume percent, pushes
//! committed changes to the audio endpoint, and publishes the annotated
//! frame for the dashboard.  The loop polls the shared `running` flag
//! every iteration and exits within one frame's processing time; the
//! camera is released by drop when the thread unwinds, before the
//! shutdown join returns.
//!
//! Error containment: a failed frame read skips the iteration, a failed
//! volume push is logged and swallowed.  Nothing in steady state can stop
//! the loop.

use std::thread;
use std::time::Duration;

use crate::audio::{percent_to_level, AudioEndpoint};
use crate::camera::{Camera, Frame};
use crate::draw;
use crate::hand::{pinch_distance_px, HandLandmarks, HandTracker};
use crate::mapping::{gate_passes, volume_for_distance};
use crate::state::Shared;

// ════════════════════════════════════════════════════════════════════════════
// Sampler
// ════════════════════════════════════════════════════════════════════════════

pub struct Sampler<C, T> {
    camera: C,
    tracker: T,
    /// `None` means the endpoint was unavailable at startup; the loop
    /// runs display-only and never attempts a push.
    endpoint: Option<Box<dyn AudioEndpoint>>,
    shared: Shared,
    /// Pinch-distance domain mapped onto 0–100%.
    domain: (f32, f32),
    /// Percent delta required before a commit.
    dead_band: u8,
}

impl<C: Camera, T: HandTracker> Sampler<C, T> {
    pub fn new(
        camera: C,
        tracker: T,
        endpoint: Option<Box<dyn AudioEndpoint>>,
        shared: Shared,
        domain: (f32, f32),
        dead_band: u8,
    ) -> Self {
        Sampler {
            camera,
            tracker,
            endpoint,
            shared,
            domain,
            dead_band,
        }
    }

    /// Spawn the capture loop on its own thread.
    pub fn spawn(self) -> SamplerHandle {
        let thread = thread::spawn(move || self.run());
        SamplerHandle {
            thread: Some(thread),
        }
    }

    fn run(mut self) {
        while self.shared.is_running() {
            let frame = match self.camera.read_frame() {
                Some(f) => f,
                None => {
                    // transient read failure — skip to the next iteration
                    thread::sleep(Duration::from_millis(5));
                    continue;
                }
            };
            self.process(frame);
        }
        // Sampler (and with it the camera) drops here, exactly once.
    }

    /// Process one captured frame end to end.
    fn process(&mut self, mut frame: Frame) {
        frame.mirror_horizontal();

        let hand = self.tracker.detect(&frame).into_iter().next();

        match &hand {
            None => {
                // volume and distance keep their previous values
                self.shared.update(|t| {
                    t.hand_detected = false;
                    t.frames += 1;
                });
            }
            Some(hand) => {
                let distance = pinch_distance_px(hand, frame.width, frame.height);
                let raw = volume_for_distance(distance, self.domain);
                let mut committed = None;
                self.shared.update(|t| {
                    if gate_passes(t.volume_percent, raw, self.dead_band) {
                        t.volume_percent = raw;
                        committed = Some(raw);
                    }
                    t.distance_px = distance;
                    t.hand_detected = true;
                    t.frames += 1;
                });
                if let Some(percent) = committed {
                    self.push_volume(percent);
                }
                annotate(&mut frame, hand, distance);
            }
        }

        draw::draw_text(&mut frame, "Pinch to Control Volume", 20, 16, 2, draw::WHITE);

        // Telemetry for this frame is fully written before the frame
        // itself becomes visible to the dashboard.
        self.shared.publish_frame(frame);
    }

    fn push_volume(&mut self, percent: u8) {
        if let Some(endpoint) = self.endpoint.as_mut() {
            let level = percent_to_level(percent, endpoint.volume_range());
            if let Err(e) = endpoint.set_volume(level) {
                log::warn!("volume push failed: {e}");
            }
        }
    }
}

/// Draw the two fingertip markers, the connecting line and the live pixel
/// distance onto the frame the dashboard will show.
fn annotate(frame: &mut Frame, hand: &HandLandmarks, distance: f32) {
    let (tx, ty) = hand.thumb_tip().to_pixel(frame.width, frame.height);
    let (ix, iy) = hand.index_tip().to_pixel(frame.width, frame.height);

    draw::draw_line(frame, tx, ty, ix, iy, 3, draw::MAGENTA);
    draw::fill_circle(frame, tx, ty, 10, draw::MAGENTA);
    draw::fill_circle(frame, ix, iy, 10, draw::MAGENTA);

    let label = format!("{}px", distance as i32);
    draw::draw_text(
        frame,
        &label,
        (tx + ix) / 2,
        (ty + iy) / 2 - 20,
        2,
        draw::MAGENTA,
    );
}

// ════════════════════════════════════════════════════════════════════════════
// SamplerHandle
// ════════════════════════════════════════════════════════════════════════════

/// Handle to the capture-loop thread.
pub struct SamplerHandle {
    thread: Option<thread::JoinHandle<()>>,
}

impl SamplerHandle {
    /// Wait for the loop to exit.  Call after [`Shared::shutdown`]; the
    /// camera is guaranteed released once this returns.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("capture loop panicked");
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{synthetic_hand, Landmark};
    use crate::mapping::{PINCH_MAX_PX, PINCH_MIN_PX, VOLUME_DEAD_BAND};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const DOMAIN: (f32, f32) = (PINCH_MIN_PX, PINCH_MAX_PX);

    // ── mocks ────────────────────────────────────────────────────────────

    struct MockCamera {
        released: Arc<AtomicUsize>,
    }

    impl Camera for MockCamera {
        fn read_frame(&mut self) -> Option<Frame> {
            thread::sleep(Duration::from_millis(2));
            Some(Frame::new(64, 48))
        }
    }

    impl Drop for MockCamera {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ScriptedTracker {
        script: VecDeque<Option<HandLandmarks>>,
    }

    impl ScriptedTracker {
        fn new(script: Vec<Option<HandLandmarks>>) -> Self {
            ScriptedTracker {
                script: script.into(),
            }
        }
    }

    impl HandTracker for ScriptedTracker {
        fn detect(&mut self, _frame: &Frame) -> Vec<HandLandmarks> {
            match self.script.pop_front().flatten() {
                Some(hand) => vec![hand],
                None => Vec::new(),
            }
        }
    }

    #[derive(Clone, Default)]
    struct CountingEndpoint {
        calls: Arc<AtomicUsize>,
        levels: Arc<Mutex<Vec<f32>>>,
        fail: bool,
    }

    impl AudioEndpoint for CountingEndpoint {
        fn volume_range(&self) -> (f32, f32) {
            // native units == percent, so pushed levels are easy to read
            (0.0, 100.0)
        }

        fn set_volume(&mut self, level: f32) -> Result<(), String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err("endpoint rejected the call".into());
            }
            self.levels.lock().unwrap().push(level);
            Ok(())
        }
    }

    // ── helpers ──────────────────────────────────────────────────────────

    /// A hand whose pinch distance in a 640×480 frame is exactly `d` px:
    /// thumb at pixel (160, 240), index `d` to the right.
    fn hand_at(d: f32) -> Option<HandLandmarks> {
        Some(synthetic_hand(
            Landmark { x: 0.25, y: 0.5 },
            Landmark {
                x: (160.0 + d) / 640.0,
                y: 0.5,
            },
        ))
    }

    fn sampler_with(
        script: Vec<Option<HandLandmarks>>,
        endpoint: Option<Box<dyn AudioEndpoint>>,
    ) -> (Sampler<MockCamera, ScriptedTracker>, Shared) {
        let shared = Shared::new();
        let sampler = Sampler::new(
            MockCamera {
                released: Arc::new(AtomicUsize::new(0)),
            },
            ScriptedTracker::new(script),
            endpoint,
            shared.clone(),
            DOMAIN,
            VOLUME_DEAD_BAND,
        );
        (sampler, shared)
    }

    fn feed(sampler: &mut Sampler<MockCamera, ScriptedTracker>, n: usize) {
        for _ in 0..n {
            sampler.process(Frame::new(640, 480));
        }
    }

    // ── per-frame logic ──────────────────────────────────────────────────

    #[test]
    fn wide_pinch_commits_and_pushes_once() {
        let endpoint = CountingEndpoint::default();
        let (calls, levels) = (endpoint.calls.clone(), endpoint.levels.clone());
        let (mut sampler, shared) =
            sampler_with(vec![hand_at(200.0), hand_at(200.0)], Some(Box::new(endpoint)));

        feed(&mut sampler, 2);

        let t = shared.snapshot();
        assert_eq!(t.volume_percent, 100);
        assert_eq!(t.distance_px, 200.0);
        assert!(t.hand_detected);
        // second identical frame is inside the dead-band: one push only
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*levels.lock().unwrap(), vec![100.0]);
    }

    #[test]
    fn no_hand_frame_leaves_volume_and_distance_unchanged() {
        let (mut sampler, shared) = sampler_with(vec![hand_at(200.0), None], None);

        feed(&mut sampler, 1);
        let after_hand = shared.snapshot();
        feed(&mut sampler, 1);
        let after_gap = shared.snapshot();

        assert_eq!(after_gap.volume_percent, after_hand.volume_percent);
        assert_eq!(after_gap.distance_px, after_hand.distance_px);
        assert!(!after_gap.hand_detected);
        assert_eq!(after_gap.frames, 2);
    }

    #[test]
    fn dead_band_oscillation_keeps_baseline() {
        // distances 115 / 118 / 117 px map to raw volumes 50 / 52 / 51 —
        // all within ±3 of the 50% baseline
        let endpoint = CountingEndpoint::default();
        let calls = endpoint.calls.clone();
        let (mut sampler, shared) = sampler_with(
            vec![hand_at(115.0), hand_at(118.0), hand_at(117.0)],
            Some(Box::new(endpoint)),
        );

        feed(&mut sampler, 3);

        assert_eq!(shared.snapshot().volume_percent, 50);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        // distance still tracks every frame even when the gate holds
        assert_eq!(shared.snapshot().distance_px, 117.0);
    }

    #[test]
    fn absent_endpoint_still_updates_state() {
        let (mut sampler, shared) = sampler_with(vec![hand_at(200.0), hand_at(30.0)], None);

        feed(&mut sampler, 2);

        let t = shared.snapshot();
        assert_eq!(t.volume_percent, 0);
        assert!(t.hand_detected);
    }

    #[test]
    fn push_failure_is_swallowed_and_commit_stands() {
        let endpoint = CountingEndpoint {
            fail: true,
            ..CountingEndpoint::default()
        };
        let calls = endpoint.calls.clone();
        let (mut sampler, shared) = sampler_with(vec![hand_at(200.0)], Some(Box::new(endpoint)));

        feed(&mut sampler, 1);

        // the displayed value and the OS volume may diverge; the loop goes on
        assert_eq!(shared.snapshot().volume_percent, 100);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn committed_volume_stays_in_range_under_any_sequence() {
        let script = vec![
            hand_at(-50.0),
            hand_at(0.0),
            hand_at(30.0),
            hand_at(115.0),
            hand_at(200.0),
            hand_at(4000.0),
            None,
        ];
        let (mut sampler, shared) = sampler_with(script, None);
        for _ in 0..7 {
            feed(&mut sampler, 1);
            assert!(shared.snapshot().volume_percent <= 100);
        }
    }

    #[test]
    fn annotated_frame_is_published_after_telemetry() {
        let (mut sampler, shared) = sampler_with(vec![hand_at(200.0)], None);
        feed(&mut sampler, 1);

        let frame = shared.take_frame().expect("frame published");
        assert_eq!((frame.width, frame.height), (640, 480));
        // the magenta overlay landed on the frame
        let magenta = frame
            .data
            .chunks_exact(3)
            .any(|px| px[0] == 255 && px[1] == 0 && px[2] == 255);
        assert!(magenta);
        assert_eq!(shared.snapshot().frames, 1);
    }

    // ── loop lifecycle ───────────────────────────────────────────────────

    #[test]
    fn shutdown_stops_loop_and_releases_camera_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let shared = Shared::new();
        let sampler = Sampler::new(
            MockCamera {
                released: released.clone(),
            },
            ScriptedTracker::new(Vec::new()),
            None,
            shared.clone(),
            DOMAIN,
            VOLUME_DEAD_BAND,
        );

        let handle = sampler.spawn();
        thread::sleep(Duration::from_millis(30));
        shared.shutdown();
        handle.join();

        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert!(shared.snapshot().frames > 0);
    }
}
