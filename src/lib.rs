//! # pinch_volume
//!
//! Maps the pinch gesture seen by a webcam — the distance between the
//! thumb tip and the index fingertip — onto the operating system's audio
//! output volume, with a live dashboard.
//!
//! ## Pipeline
//!
//! | Stage | What happens |
//! |---|---|
//! | Capture | Read a frame, mirror-flip it so motion matches the user |
//! | Track | Ask the hand tracker for landmarks; first hand only |
//! | Map | Pinch distance 30–200 px → volume 0–100%, clamped linear |
//! | Gate | Commit only when the raw value moves more than ±3% |
//! | Push | Convert percent to endpoint-native units and set it |
//! | Show | Publish the annotated frame + telemetry to the dashboard |
//!
//! The capture loop runs on a worker thread; the dashboard owns the main
//! thread.  They share a mutex-guarded telemetry record, a single-slot
//! latest-frame handoff and an atomic `running` flag — nothing else.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: a synthetic camera feed, with the
//!   mouse standing in for the index fingertip (`H` toggles the hand).
//! * `webcam` — real camera frames via `nokhwa`.
//! * `system-volume` — push committed volume to the ALSA Master mixer.
//!
//! Without `system-volume` (or when the mixer can't be opened) the app
//! runs in display-only mode: everything works except the actual OS
//! volume call.
//!
//! ### Simulation inputs
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse over the video panel | Index fingertip position |
//! | `H` | Toggle hand presence |
//! | `Q` / `Escape` / close button | Quit |

pub mod app;
pub mod audio;
pub mod camera;
pub mod dashboard;
pub mod draw;
pub mod error;
pub mod hand;
pub mod mapping;
pub mod sampler;
pub mod state;
