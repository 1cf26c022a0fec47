//! Application wiring — configuration, thread startup, the display loop,
//! and orderly shutdown.
//!
//! Exactly two threads of control: the capture loop (spawned worker) and
//! the window event loop (main thread, where the toolkit needs to live).
//! State flows one way, sampler → shared → dashboard; the only feedback
//! paths are the shutdown flag and the simulation input channel.

use std::sync::mpsc;

use crate::audio;
use crate::dashboard::Dashboard;
use crate::error::AppError;
use crate::hand::{SimHandTracker, TrackerConfig};
use crate::mapping::{PINCH_MAX_PX, PINCH_MIN_PX, VOLUME_DEAD_BAND};
use crate::sampler::Sampler;
use crate::state::Shared;

#[cfg(not(feature = "webcam"))]
use crate::camera::SimCamera;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Tunables, defaults as given.  None of these are persisted.
pub struct AppConfig {
    pub device_index: u32,
    pub capture_width: usize,
    pub capture_height: usize,
    /// Pinch-distance domain (px) mapped onto 0–100% volume.
    pub pinch_domain_px: (f32, f32),
    /// Percent delta required before a new volume is committed.
    pub dead_band: u8,
    pub tracker: TrackerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            device_index: 0,
            capture_width: 640,
            capture_height: 480,
            pinch_domain_px: (PINCH_MIN_PX, PINCH_MAX_PX),
            dead_band: VOLUME_DEAD_BAND,
            tracker: TrackerConfig::default(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.  Returns once the window is closed and the
/// capture loop has been joined (camera released).
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let shared = Shared::new();

    // ── Sim input channel: dashboard → tracker ────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel();
    let mut dashboard = Dashboard::new(sim_tx)?;

    log::debug!("tracker config: {:?}", cfg.tracker);
    let tracker = SimHandTracker::new(sim_rx, cfg.tracker);

    // Endpoint absence is not fatal: display-only mode.
    let endpoint = audio::open_endpoint();

    #[cfg(feature = "webcam")]
    let camera = crate::camera::webcam::Webcam::open(
        cfg.device_index,
        cfg.capture_width as u32,
        cfg.capture_height as u32,
    )?;
    #[cfg(not(feature = "webcam"))]
    let camera = SimCamera::new(cfg.capture_width, cfg.capture_height);

    let handle = Sampler::new(
        camera,
        tracker,
        endpoint,
        shared.clone(),
        cfg.pinch_domain_px,
        cfg.dead_band,
    )
    .spawn();

    // ── Display loop ──────────────────────────────────────────────────────
    while dashboard.is_open() && shared.is_running() {
        if !dashboard.poll_input() {
            break;
        }
        let telemetry = shared.snapshot();
        let frame = shared.take_frame();
        dashboard.render(&telemetry, frame);
    }

    // Window closed or quit pressed: stop the capture loop without
    // blocking the teardown, then join so the camera is released before
    // the process exits.
    shared.shutdown();
    drop(dashboard);
    handle.join();
    Ok(())
}
