//! Software-rendered dashboard using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                 HAND GESTURE VOLUME CONTROL                      │
//! ├───────────────────────────────────────┬──────────────────────────┤
//! │  CAMERA FEED                          │  VOLUME CONTROL          │
//! │  ┌─────────────────────────────────┐  │                          │
//! │  │                                 │  │     72%        ║█║       │
//! │  │   annotated frame (620×465)     │  │                ║█║       │
//! │  │                                 │  │  ┌─ STATUS ─┐  ║░║       │
//! │  └─────────────────────────────────┘  │  └──────────┘            │
//! │                                       │  ┌─ HOW TO USE ─┐        │
//! │  key legend                           │  └──────────────┘        │
//! └───────────────────────────────────────┴──────────────────────────┘
//! ```
//!
//! The dashboard reads the shared telemetry and the latest published
//! frame; it never writes anything back except the shutdown signal and,
//! in simulation mode, raw [`SimInput`] events for the tracker.

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use std::sync::mpsc::Sender;

use crate::camera::Frame;
use crate::draw::{draw_label, draw_rect_outline, fill_rect, label_width};
use crate::error::AppError;
use crate::hand::SimInput;
use crate::state::Telemetry;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 1000;
pub const WIN_H: usize = 700;

const VIDEO_W: usize = 620;
const VIDEO_H: usize = 465;
const VIDEO_X: usize = 20;
const VIDEO_Y: usize = 150;

const PANEL_X: usize = 660; // right column
const PANEL_W: usize = 320;

const BAR_X: usize = 910;
const BAR_Y: usize = 190;
const BAR_W: usize = 40;
const BAR_H: usize = 200;

const BG_COLOR: u32 = 0xFF1A1A2E;
const PANEL_BG: u32 = 0xFF16213E;
const BOX_BG: u32 = 0xFF0F3460;
const ACCENT: u32 = 0xFF00D4FF;
const GREEN: u32 = 0xFF00FF00;
const YELLOW: u32 = 0xFFFFFF00;
const TEXT: u32 = 0xFFEEEEEE;
const DIM_TEXT: u32 = 0xFF888888;

// ════════════════════════════════════════════════════════════════════════════
// Dashboard
// ════════════════════════════════════════════════════════════════════════════

pub struct Dashboard {
    window: Window,
    buf: Vec<u32>,
    /// Last scaled video panel content; kept so the panel shows the most
    /// recent frame even on ticks where the sampler published nothing.
    video: Vec<u32>,
    sim_tx: Sender<SimInput>,
}

impl Dashboard {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Hand Gesture Volume Control",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Dashboard {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            video: vec![0xFF000000; VIDEO_W * VIDEO_H],
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll window input.  Returns false when the user asked to quit.
    ///
    /// Simulation inputs: the mouse position over the video panel becomes
    /// the index fingertip, `H` toggles hand presence.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }
        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            return false;
        }
        if self.window.is_key_pressed(Key::H, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::ToggleHand);
        }
        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let (x, y) = pointer_to_frame(mx, my);
            let _ = self.sim_tx.send(SimInput::Pointer { x, y });
        }
        true
    }

    /// Render one refresh tick from the latest telemetry and, when one
    /// was published since the last tick, a fresh annotated frame.
    pub fn render(&mut self, telemetry: &Telemetry, frame: Option<Frame>) {
        if let Some(frame) = frame {
            let scaled = frame.scale_to(VIDEO_W, VIDEO_H);
            for (dst, px) in self.video.iter_mut().zip(scaled.data.chunks_exact(3)) {
                *dst = pack_argb(px[0], px[1], px[2]);
            }
        }

        self.buf.fill(BG_COLOR);

        // ── Title band ────────────────────────────────────────────────────
        fill_rect(&mut self.buf, WIN_W, 10, 10, WIN_W - 20, 70, PANEL_BG);
        let title = "HAND GESTURE VOLUME CONTROL";
        let tx = (WIN_W - label_width(title, 4)) / 2;
        draw_label(&mut self.buf, WIN_W, title, tx, 30, 4, ACCENT);

        // ── Camera feed ───────────────────────────────────────────────────
        fill_rect(&mut self.buf, WIN_W, 10, 90, 640, WIN_H - 100, PANEL_BG);
        draw_label(&mut self.buf, WIN_W, "CAMERA FEED", VIDEO_X, 115, 2, TEXT);
        self.blit_video();
        draw_rect_outline(
            &mut self.buf,
            WIN_W,
            VIDEO_X - 1,
            VIDEO_Y - 1,
            VIDEO_W + 2,
            VIDEO_H + 2,
            BOX_BG,
        );

        // ── Right column ──────────────────────────────────────────────────
        fill_rect(&mut self.buf, WIN_W, PANEL_X - 10, 90, PANEL_W + 20, WIN_H - 100, PANEL_BG);
        draw_label(&mut self.buf, WIN_W, "VOLUME CONTROL", PANEL_X + 60, 115, 2, TEXT);

        let percent_label = format!("{}%", telemetry.volume_percent);
        draw_label(&mut self.buf, WIN_W, &percent_label, PANEL_X + 20, 230, 9, ACCENT);

        self.draw_volume_bar(telemetry.volume_percent);
        self.draw_status_box(telemetry);
        self.draw_instructions();

        draw_label(
            &mut self.buf,
            WIN_W,
            "H=TOGGLE HAND  MOUSE=PINCH  Q=QUIT",
            VIDEO_X,
            WIN_H - 40,
            2,
            DIM_TEXT,
        );

        // Refresh failures are contained here: log at debug and carry on.
        if let Err(e) = self.window.update_with_buffer(&self.buf, WIN_W, WIN_H) {
            log::debug!("dashboard refresh failed: {e}");
        }
    }

    // ── widgets ───────────────────────────────────────────────────────────

    fn blit_video(&mut self) {
        for row in 0..VIDEO_H {
            let dst = (VIDEO_Y + row) * WIN_W + VIDEO_X;
            let src = row * VIDEO_W;
            self.buf[dst..dst + VIDEO_W].copy_from_slice(&self.video[src..src + VIDEO_W]);
        }
    }

    fn draw_volume_bar(&mut self, percent: u8) {
        draw_rect_outline(&mut self.buf, WIN_W, BAR_X, BAR_Y, BAR_W, BAR_H, TEXT);
        let fill = bar_fill_px(percent, BAR_H - 4);
        if fill > 0 {
            fill_rect(
                &mut self.buf,
                WIN_W,
                BAR_X + 2,
                BAR_Y + 2 + (BAR_H - 4 - fill),
                BAR_W - 4,
                fill,
                ACCENT,
            );
        }
    }

    fn draw_status_box(&mut self, telemetry: &Telemetry) {
        let (line, color) = status_line(telemetry);

        fill_rect(&mut self.buf, WIN_W, PANEL_X, 420, PANEL_W - 20, 100, BOX_BG);
        draw_label(&mut self.buf, WIN_W, "STATUS", PANEL_X + 110, 432, 2, TEXT);
        fill_rect(&mut self.buf, WIN_W, PANEL_X + 14, 462, 6, 6, color);
        draw_label(&mut self.buf, WIN_W, line, PANEL_X + 28, 460, 2, color);

        let distance = format!("DISTANCE: {} PX", telemetry.distance_px as i32);
        draw_label(&mut self.buf, WIN_W, &distance, PANEL_X + 28, 490, 2, TEXT);
    }

    fn draw_instructions(&mut self) {
        const LINES: [&str; 4] = [
            "1. SHOW YOUR HAND TO THE CAMERA",
            "2. PALM FACING FORWARD",
            "3. PINCH FINGERS = LOWER VOLUME",
            "4. SPREAD FINGERS = HIGHER VOLUME",
        ];
        fill_rect(&mut self.buf, WIN_W, PANEL_X, 535, PANEL_W - 20, 120, BOX_BG);
        draw_label(&mut self.buf, WIN_W, "HOW TO USE", PANEL_X + 95, 545, 2, TEXT);
        for (i, line) in LINES.iter().enumerate() {
            draw_label(
                &mut self.buf,
                WIN_W,
                line,
                PANEL_X + 14,
                572 + i * 18,
                1,
                0xFFCCCCCC,
            );
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pure helpers (testable without a window)
// ════════════════════════════════════════════════════════════════════════════

fn pack_argb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Filled height of the volume bar for a given percent.
fn bar_fill_px(percent: u8, bar_h: usize) -> usize {
    bar_h * percent.min(100) as usize / 100
}

/// Map a window mouse position onto normalized video-frame coordinates.
fn pointer_to_frame(mx: f32, my: f32) -> (f32, f32) {
    let x = (mx - VIDEO_X as f32) / VIDEO_W as f32;
    let y = (my - VIDEO_Y as f32) / VIDEO_H as f32;
    (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
}

/// Status text and its color for the current telemetry.
fn status_line(telemetry: &Telemetry) -> (&'static str, u32) {
    if telemetry.frames == 0 {
        ("INITIALIZING...", YELLOW)
    } else if telemetry.hand_detected {
        ("HAND DETECTED", GREEN)
    } else {
        ("WAITING FOR HAND...", YELLOW)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
