// Global debug flag - set once at startup from EYEDROP_DEBUG
use std::sync::atomic::AtomicBool;
pub static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

pub mod capture;
pub mod clipboard;
pub mod colour;
pub mod ui;

/// Side of the square magnified preview, in pixels. The sampled pixel is the
/// geometric centre of this image.
pub const MAGNIFIED_SIZE: usize = 100;

/// Magnifier panel geometry: the preview pane on the left plus the colour
/// text pane on the right.
pub const PANEL_WIDTH: u32 = 180;
pub const PANEL_HEIGHT: u32 = 100;

/// Offset of the panel from the cursor, so the panel never covers the pixel
/// being sampled.
pub const PANEL_OFFSET_X: i32 = 50;
pub const PANEL_OFFSET_Y: i32 = -25;

// Debug print macro - only prints if DEBUG_ENABLED is true
// Compiled out entirely in release builds
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_println {
    ($($arg:tt)*) => {
        if $crate::DEBUG_ENABLED.load(std::sync::atomic::Ordering::Relaxed) {
            println!($($arg)*);
        }
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_println {
    ($($arg:tt)*) => {};
}
