//! Pinch-distance → volume mapping and the jitter dead-band.
//!
//! The thresholds are tunable defaults, not protocol: `AppConfig` carries
//! them so a caller can widen the pinch domain or loosen the dead-band.

/// Pinch distance (px) that maps to 0% volume.
pub const PINCH_MIN_PX: f32 = 30.0;
/// Pinch distance (px) that maps to 100% volume.
pub const PINCH_MAX_PX: f32 = 200.0;
/// Minimum percent delta before a new volume is committed and pushed.
pub const VOLUME_DEAD_BAND: u8 = 3;

/// Clamped linear interpolation: map `v` from `[d0, d1]` onto `[r0, r1]`.
///
/// Values outside the domain clamp to the nearest endpoint, matching the
/// behaviour of a clamped `lerp`.  A degenerate domain yields `r0`.
pub fn interp(v: f32, (d0, d1): (f32, f32), (r0, r1): (f32, f32)) -> f32 {
    if d1 <= d0 {
        return r0;
    }
    let t = ((v - d0) / (d1 - d0)).clamp(0.0, 1.0);
    r0 + (r1 - r0) * t
}

/// Map a pinch distance onto a raw volume percent, rounded to the nearest
/// integer.  Always in 0–100 by construction.
pub fn volume_for_distance(distance_px: f32, domain: (f32, f32)) -> u8 {
    interp(distance_px, domain, (0.0, 100.0)).round() as u8
}

/// Dead-band gate: a raw volume is committed only when it has moved more
/// than `band` percent away from the committed value.  Suppresses
/// jitter-driven flicker and excessive endpoint calls.
pub fn gate_passes(committed: u8, raw: u8, band: u8) -> bool {
    (raw as i16 - committed as i16).abs() > band as i16
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: (f32, f32) = (PINCH_MIN_PX, PINCH_MAX_PX);

    #[test]
    fn domain_floor_maps_to_zero() {
        assert_eq!(volume_for_distance(30.0, DOMAIN), 0);
        assert_eq!(volume_for_distance(12.5, DOMAIN), 0);
        assert_eq!(volume_for_distance(0.0, DOMAIN), 0);
    }

    #[test]
    fn domain_ceiling_maps_to_hundred() {
        assert_eq!(volume_for_distance(200.0, DOMAIN), 100);
        assert_eq!(volume_for_distance(480.0, DOMAIN), 100);
    }

    #[test]
    fn midpoint_maps_to_fifty() {
        assert_eq!(volume_for_distance(115.0, DOMAIN), 50);
    }

    #[test]
    fn interior_is_linear() {
        // volume = round((d - 30) / 170 * 100)
        assert_eq!(volume_for_distance(47.0, DOMAIN), 10);
        assert_eq!(volume_for_distance(64.0, DOMAIN), 20);
        assert_eq!(volume_for_distance(183.0, DOMAIN), 90);
    }

    #[test]
    fn mapped_volume_always_in_range() {
        let mut d = -500.0;
        while d < 1000.0 {
            assert!(volume_for_distance(d, DOMAIN) <= 100);
            d += 7.3;
        }
    }

    #[test]
    fn degenerate_domain_maps_to_floor() {
        assert_eq!(volume_for_distance(50.0, (100.0, 100.0)), 0);
    }

    #[test]
    fn gate_requires_strictly_more_than_band() {
        assert!(!gate_passes(50, 50, 3));
        assert!(!gate_passes(50, 53, 3));
        assert!(!gate_passes(50, 47, 3));
        assert!(gate_passes(50, 54, 3));
        assert!(gate_passes(50, 46, 3));
    }

    #[test]
    fn oscillation_inside_band_never_commits() {
        let committed = 50u8;
        for raw in [50u8, 52, 51, 49, 47, 53, 50] {
            assert!(
                !gate_passes(committed, raw, VOLUME_DEAD_BAND),
                "raw {} should stay inside the dead-band",
                raw
            );
        }
    }
}
