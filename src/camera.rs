//! Camera capture — the trait seam plus the simulation and webcam backends.
//!
//! Construction covers open-and-configure; releasing the device is the
//! implementor's `Drop`, so the capture loop releases the camera exactly
//! once when its thread unwinds, before the shutdown join returns.

use std::thread;
use std::time::Duration;

// ════════════════════════════════════════════════════════════════════════════
// Frame
// ════════════════════════════════════════════════════════════════════════════

/// One RGB8 frame.  `data.len() == width * height * 3`.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Frame {
    /// A black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Frame {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    /// Mirror-flip in place so on-screen motion matches the user's real
    /// hand motion.  Applied before landmark detection.
    pub fn mirror_horizontal(&mut self) {
        if self.width < 2 {
            return;
        }
        for row in self.data.chunks_exact_mut(self.width * 3) {
            let mut l = 0;
            let mut r = self.width - 1;
            while l < r {
                for c in 0..3 {
                    row.swap(l * 3 + c, r * 3 + c);
                }
                l += 1;
                r -= 1;
            }
        }
    }

    /// Nearest-neighbour rescale, used to fit the dashboard's video panel.
    pub fn scale_to(&self, dw: usize, dh: usize) -> Frame {
        let mut out = Frame::new(dw, dh);
        if self.width == 0 || self.height == 0 || dw == 0 || dh == 0 {
            return out;
        }
        for y in 0..dh {
            let sy = y * self.height / dh;
            for x in 0..dw {
                let sx = x * self.width / dw;
                let s = (sy * self.width + sx) * 3;
                let d = (y * dw + x) * 3;
                out.data[d..d + 3].copy_from_slice(&self.data[s..s + 3]);
            }
        }
        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Camera trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver frames to the capture loop.
pub trait Camera: Send + 'static {
    /// Blocking read of the next frame, bounded by the hardware frame
    /// rate.  `None` means this read failed; the caller skips the
    /// iteration and tries again — a failed read is never fatal.
    fn read_frame(&mut self) -> Option<Frame>;
}

// ════════════════════════════════════════════════════════════════════════════
// SimCamera — synthetic frames (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Default backend: emits a dark test pattern at ~30 fps so the dashboard
/// has something to show without any hardware attached.
pub struct SimCamera {
    width: usize,
    height: usize,
    tick: u64,
}

impl SimCamera {
    pub fn new(width: usize, height: usize) -> Self {
        SimCamera {
            width,
            height,
            tick: 0,
        }
    }
}

impl Camera for SimCamera {
    fn read_frame(&mut self) -> Option<Frame> {
        thread::sleep(Duration::from_millis(33));
        self.tick = self.tick.wrapping_add(1);

        let mut frame = Frame::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let i = (y * self.width + x) * 3;
                frame.data[i] = 26;
                frame.data[i + 1] = 26;
                frame.data[i + 2] = 46 + (x * 28 / self.width.max(1)) as u8;
            }
        }
        // Slow sweep line so the panel visibly animates.
        if self.width > 0 {
            let sweep = (self.tick as usize * 4) % self.width;
            for y in 0..self.height {
                let i = (y * self.width + sweep) * 3;
                frame.data[i] = 48;
                frame.data[i + 1] = 72;
                frame.data[i + 2] = 110;
            }
        }
        Some(frame)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Webcam — real hardware (feature = "webcam")
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "webcam")]
pub mod webcam {
    use super::{Camera, Frame};
    use crate::error::AppError;
    use nokhwa::pixel_format::RgbFormat;
    use nokhwa::utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    };

    /// Webcam backend via `nokhwa`.  Opening the device is the only fatal
    /// failure in the whole capture path.
    pub struct Webcam {
        inner: nokhwa::Camera,
    }

    impl Webcam {
        pub fn open(index: u32, width: u32, height: u32) -> Result<Self, AppError> {
            let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
                CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, 30),
            ));
            let mut inner = nokhwa::Camera::new(CameraIndex::Index(index), requested)
                .map_err(|e| AppError::Camera(e.to_string()))?;
            inner
                .open_stream()
                .map_err(|e| AppError::Camera(e.to_string()))?;
            log::info!("webcam {} open at {}", index, inner.camera_format());
            Ok(Webcam { inner })
        }
    }

    impl Camera for Webcam {
        fn read_frame(&mut self) -> Option<Frame> {
            let buffer = self.inner.frame().ok()?;
            let image = buffer.decode_image::<RgbFormat>().ok()?;
            Some(Frame {
                width: image.width() as usize,
                height: image.height() as usize,
                data: image.into_raw(),
            })
        }
    }

    impl Drop for Webcam {
        fn drop(&mut self) {
            let _ = self.inner.stop_stream();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned(width: usize, height: usize) -> Frame {
        let mut f = Frame::new(width, height);
        for (i, b) in f.data.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        f
    }

    #[test]
    fn mirror_moves_left_edge_to_right_edge() {
        let mut f = Frame::new(4, 1);
        f.data[0..3].copy_from_slice(&[9, 8, 7]);
        f.mirror_horizontal();
        assert_eq!(&f.data[9..12], &[9, 8, 7]);
        assert_eq!(&f.data[0..3], &[0, 0, 0]);
    }

    #[test]
    fn mirror_twice_is_identity() {
        let original = patterned(7, 3);
        let mut f = original.clone();
        f.mirror_horizontal();
        assert_ne!(f, original);
        f.mirror_horizontal();
        assert_eq!(f, original);
    }

    #[test]
    fn mirror_tolerates_degenerate_frames() {
        Frame::new(0, 0).mirror_horizontal();
        Frame::new(1, 5).mirror_horizontal();
    }

    #[test]
    fn scale_produces_requested_dimensions() {
        let f = patterned(640, 480);
        let s = f.scale_to(620, 465);
        assert_eq!((s.width, s.height), (620, 465));
        assert_eq!(s.data.len(), 620 * 465 * 3);
    }

    #[test]
    fn scale_preserves_corner_pixels() {
        let mut f = Frame::new(10, 10);
        f.data[0..3].copy_from_slice(&[255, 1, 2]);
        let s = f.scale_to(5, 5);
        assert_eq!(&s.data[0..3], &[255, 1, 2]);
    }

    #[test]
    fn sim_camera_emits_full_frames() {
        let mut cam = SimCamera::new(64, 48);
        let f = cam.read_frame().unwrap();
        assert_eq!((f.width, f.height), (64, 48));
        assert_eq!(f.data.len(), 64 * 48 * 3);
    }
}
