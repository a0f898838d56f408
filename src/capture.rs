//! Screen snapshot capture and crop-region mapping.
//!
//! The screen is grabbed exactly once at session start. Whatever changes on
//! the real display afterwards is not reflected; the session inspects the
//! frozen snapshot only.

use screenshots::Screen;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no display available to capture")]
    NoScreen,
    #[error("screen capture failed: {0}")]
    Grab(String),
}

/// Immutable full-screen bitmap, RGBA8 row-major.
pub struct Snapshot {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Snapshot {
    /// Grab the primary display. Failure here is fatal to the session; there
    /// is no retry.
    pub fn capture() -> Result<Self, CaptureError> {
        let screens = Screen::all().map_err(|e| CaptureError::Grab(e.to_string()))?;
        let screen = screens.first().ok_or(CaptureError::NoScreen)?;
        let image = screen
            .capture()
            .map_err(|e| CaptureError::Grab(e.to_string()))?;

        let width = image.width() as usize;
        let height = image.height() as usize;
        log::info!("captured {}x{} snapshot", width, height);

        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    /// Build a snapshot from raw RGBA bytes. Used by tests and keeps the
    /// session logic independent of a real display.
    pub fn from_rgba(width: usize, height: usize, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), width * height * 4, "RGBA length mismatch");
        assert!(width > 0 && height > 0, "empty snapshot");
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at (x, y) as an (r, g, b) triple. Alpha is ignored; the screen
    /// grab is always opaque.
    pub fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height);
        let idx = (y * self.width + x) * 4;
        (self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2])
    }

    /// Pixel at (x, y) packed as 0xAARRGGBB for the softbuffer surface.
    pub fn pixel_argb(&self, x: usize, y: usize) -> u32 {
        let (r, g, b) = self.pixel(x, y);
        0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    /// Extract `region` as tightly packed RGB8 bytes, ready for the resizer.
    pub fn crop_rgb(&self, region: CropRegion) -> Vec<u8> {
        debug_assert!(region.x + region.w <= self.width);
        debug_assert!(region.y + region.h <= self.height);

        let mut out = Vec::with_capacity(region.w * region.h * 3);
        for y in region.y..region.y + region.h {
            for x in region.x..region.x + region.w {
                let idx = (y * self.width + x) * 4;
                out.extend_from_slice(&self.pixels[idx..idx + 3]);
            }
        }
        out
    }
}

/// Rectangle of snapshot pixels centred (as near as clamping allows) on the
/// cursor. Always a subset of the snapshot bounds and never empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRegion {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl CropRegion {
    /// Region of side `2 * zoom + 1` centred on (cx, cy), clamped into
    /// `[0, width) x [0, height)`. Cursor coordinates outside the snapshot
    /// clamp rather than error; at the display edges the region shrinks
    /// instead of extending past the bitmap.
    pub fn centred(cx: i32, cy: i32, zoom: u32, width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0);
        let z = zoom as i64;
        let cx = (cx as i64).clamp(0, width as i64 - 1);
        let cy = (cy as i64).clamp(0, height as i64 - 1);

        let x0 = (cx - z).max(0);
        let y0 = (cy - z).max(0);
        let x1 = (cx + z).min(width as i64 - 1);
        let y1 = (cy + z).min(height as i64 - 1);

        Self {
            x: x0 as usize,
            y: y0 as usize,
            w: (x1 - x0 + 1) as usize,
            h: (y1 - y0 + 1) as usize,
        }
    }
}
