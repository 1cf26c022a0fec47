//! System audio endpoint — trait seam, discovery with graceful fallback,
//! and the percent ↔ native-unit conversion.
//!
//! The endpoint speaks its own unit space (ALSA raw mixer units, Core
//! Audio dB, …); this side converts from the 0–100 percent the rest of
//! the app uses, via the endpoint-reported range.

use crate::mapping::interp;

// ════════════════════════════════════════════════════════════════════════════
// AudioEndpoint trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can set the OS output volume.
pub trait AudioEndpoint: Send + 'static {
    /// Device-native (min, max) volume levels.
    fn volume_range(&self) -> (f32, f32);

    /// Set the output level, in native units.  A failure here is logged
    /// and swallowed by the caller; it never stops the capture loop.
    fn set_volume(&mut self, level: f32) -> Result<(), String>;
}

/// Convert a 0–100 percent into the endpoint's native unit space.
pub fn percent_to_level(percent: u8, range: (f32, f32)) -> f32 {
    interp(percent.min(100) as f32, (0.0, 100.0), range)
}

// ════════════════════════════════════════════════════════════════════════════
// open_endpoint — probe for a usable endpoint
// ════════════════════════════════════════════════════════════════════════════

/// Try to open the system audio endpoint.
///
/// `None` means no endpoint is reachable; the sampler then runs in
/// display-only mode for the remainder of the run and never attempts a
/// volume push.  Logged once, here.
#[cfg(feature = "system-volume")]
pub fn open_endpoint() -> Option<Box<dyn AudioEndpoint>> {
    match alsa_backend::AlsaMaster::open() {
        Ok(endpoint) => {
            let (min, max) = endpoint.volume_range();
            log::info!("audio endpoint ready: ALSA Master, range {min}..{max}");
            Some(Box::new(endpoint))
        }
        Err(e) => {
            log::warn!("audio endpoint unavailable ({e}) — display-only mode");
            None
        }
    }
}

/// Display-only build: there is no endpoint to open.
#[cfg(not(feature = "system-volume"))]
pub fn open_endpoint() -> Option<Box<dyn AudioEndpoint>> {
    log::warn!("built without the `system-volume` feature — display-only mode");
    None
}

// ════════════════════════════════════════════════════════════════════════════
// ALSA backend (feature = "system-volume")
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "system-volume")]
mod alsa_backend {
    use super::AudioEndpoint;
    use alsa::mixer::{Mixer, SelemId};

    /// "Master" simple mixer element on the default card.  The raw volume
    /// range reported by ALSA is the native unit space.
    pub struct AlsaMaster {
        mixer: Mixer,
        range: (i64, i64),
    }

    impl AlsaMaster {
        pub fn open() -> Result<Self, String> {
            let mixer = Mixer::new("default", false).map_err(|e| e.to_string())?;
            let range = {
                let selem = mixer
                    .find_selem(&SelemId::new("Master", 0))
                    .ok_or_else(|| "no Master mixer element".to_string())?;
                selem.get_playback_volume_range()
            };
            Ok(AlsaMaster { mixer, range })
        }
    }

    impl AudioEndpoint for AlsaMaster {
        fn volume_range(&self) -> (f32, f32) {
            (self.range.0 as f32, self.range.1 as f32)
        }

        fn set_volume(&mut self, level: f32) -> Result<(), String> {
            let selem = self
                .mixer
                .find_selem(&SelemId::new("Master", 0))
                .ok_or_else(|| "Master mixer element vanished".to_string())?;
            selem
                .set_playback_volume_all(level.round() as i64)
                .map_err(|e| e.to_string())
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
