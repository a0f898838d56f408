//! The floating magnifier panel: box-filtered preview, contrast marker and
//! colour text, repositioned beside the cursor on every motion event.

use std::rc::Rc;

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorIcon, Window, WindowId, WindowLevel};

use super::app::ViewState;
use super::renderer::Renderer;
use super::text_rasterizing::TextRenderer;
use crate::{MAGNIFIED_SIZE, PANEL_HEIGHT, PANEL_WIDTH};

// Panel colours, packed 0xAARRGGBB
const PANEL_BG: u32 = 0xFF_20_20_20;
const TEXT_COLOUR: u32 = 0xFF_D0_D0_D0;

const MARKER_GLYPH_SIZE: f32 = 18.;
const TEXT_SIZE: f32 = 13.;

/// Box-resample `crop` (packed RGB8, `w` x `h`) up to the fixed
/// `MAGNIFIED_SIZE` square.
///
/// The crop is never larger than the preview, so this is always a pure
/// upscale, and box resampling of a pure upscale is block replication:
/// output pixel (x, y) shows source pixel `(x * w / SIZE, y * h / SIZE)`.
/// Colour values pass through untouched - the sampled centre pixel must be
/// exactly what is on screen.
pub fn magnify(crop: &[u8], w: usize, h: usize) -> Vec<u8> {
    debug_assert_eq!(crop.len(), w * h * 3);
    debug_assert!(w >= 1 && h >= 1);

    let mut dst = vec![0u8; MAGNIFIED_SIZE * MAGNIFIED_SIZE * 3];
    for y in 0..MAGNIFIED_SIZE {
        let src_y = y * h / MAGNIFIED_SIZE;
        for x in 0..MAGNIFIED_SIZE {
            let src_x = x * w / MAGNIFIED_SIZE;
            let src = (src_y * w + src_x) * 3;
            let out = (y * MAGNIFIED_SIZE + x) * 3;
            dst[out..out + 3].copy_from_slice(&crop[src..src + 3]);
        }
    }
    dst
}

/// Small borderless always-on-top window next to the cursor. Holds no session
/// state; everything it draws arrives in the [`ViewState`] per event.
pub struct Magnifier {
    window: Rc<Window>,
    renderer: Renderer,
    text: TextRenderer,
    pixels: Vec<u32>,
}

impl Magnifier {
    /// Create the panel at `pos`. Window construction failure is fatal, same
    /// as the overlay itself.
    pub fn create(event_loop: &ActiveEventLoop, pos: (i32, i32)) -> Self {
        let attributes = Window::default_attributes()
            .with_inner_size(PhysicalSize::new(PANEL_WIDTH, PANEL_HEIGHT))
            .with_position(PhysicalPosition::new(pos.0, pos.1))
            .with_decorations(false)
            .with_resizable(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_active(false);

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .expect("create magnifier window"),
        );
        window.set_cursor(CursorIcon::Crosshair);

        let renderer = Renderer::new(window.clone(), PANEL_WIDTH, PANEL_HEIGHT);
        let mut magnifier = Self {
            window,
            renderer,
            text: TextRenderer::new(),
            pixels: vec![PANEL_BG; (PANEL_WIDTH * PANEL_HEIGHT) as usize],
        };

        // Placeholder cross until the first sample arrives
        magnifier.text.draw_text_centred(
            &mut magnifier.pixels,
            PANEL_WIDTH as usize,
            "+",
            (MAGNIFIED_SIZE / 2) as f32,
            (MAGNIFIED_SIZE / 2) as f32,
            MARKER_GLYPH_SIZE,
            0xFFFF_FFFF,
        );
        magnifier.present();
        magnifier
    }

    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    /// Reposition beside the cursor and redraw from the current view. Runs on
    /// every motion/zoom/mode event; allocation-light by construction.
    pub fn update(&mut self, view: &ViewState) {
        self.window
            .set_outer_position(PhysicalPosition::new(view.panel_pos.0, view.panel_pos.1));
        self.compose(view);
        self.present();
    }

    fn compose(&mut self, view: &ViewState) {
        let width = PANEL_WIDTH as usize;
        self.pixels.fill(PANEL_BG);

        // Preview pane: magnified crop in the left MAGNIFIED_SIZE square
        for y in 0..MAGNIFIED_SIZE {
            for x in 0..MAGNIFIED_SIZE {
                let src = (y * MAGNIFIED_SIZE + x) * 3;
                let argb = 0xFF00_0000
                    | (view.magnified[src] as u32) << 16
                    | (view.magnified[src + 1] as u32) << 8
                    | view.magnified[src + 2] as u32;
                self.pixels[y * width + x] = argb;
            }
        }

        // Contrast marker over the sampled (centre) pixel
        let centre = (MAGNIFIED_SIZE / 2) as f32;
        self.text.draw_text_centred(
            &mut self.pixels,
            width,
            "+",
            centre,
            centre,
            MARKER_GLYPH_SIZE,
            view.marker,
        );

        // Colour text in the right pane
        let text_x = (MAGNIFIED_SIZE + (PANEL_WIDTH as usize - MAGNIFIED_SIZE) / 2) as f32;
        self.text.draw_text_centred(
            &mut self.pixels,
            width,
            &view.formatted,
            text_x,
            PANEL_HEIGHT as f32 / 2.,
            TEXT_SIZE,
            TEXT_COLOUR,
        );
    }

    /// Push the composed panel to the surface.
    pub fn present(&mut self) {
        let mut buffer = self.renderer.lock_buffer();
        let len = buffer.len().min(self.pixels.len());
        buffer[..len].copy_from_slice(&self.pixels[..len]);
        let _ = buffer.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnify_output_is_fixed_size() {
        let crop = vec![128u8; 5 * 5 * 3];
        let out = magnify(&crop, 5, 5);
        assert_eq!(out.len(), MAGNIFIED_SIZE * MAGNIFIED_SIZE * 3);
    }

    #[test]
    fn uniform_crop_stays_uniform() {
        let mut crop = Vec::new();
        for _ in 0..(3 * 3) {
            crop.extend_from_slice(&[10, 20, 30]);
        }
        let out = magnify(&crop, 3, 3);
        for pixel in out.chunks_exact(3) {
            assert_eq!(pixel, [10, 20, 30]);
        }
    }

    #[test]
    fn centre_of_upscale_matches_crop_centre() {
        // 5x5 crop, centre pixel tagged; the box upscale maps the centre of
        // the 100x100 output back onto it
        let mut crop = vec![0u8; 5 * 5 * 3];
        let centre = (2 * 5 + 2) * 3;
        crop[centre] = 200;
        crop[centre + 1] = 100;
        crop[centre + 2] = 50;

        let out = magnify(&crop, 5, 5);
        let mid = (MAGNIFIED_SIZE / 2 * MAGNIFIED_SIZE + MAGNIFIED_SIZE / 2) * 3;
        assert_eq!(&out[mid..mid + 3], &[200, 100, 50]);
    }

    #[test]
    fn blocks_replicate_without_blending() {
        // Two-pixel crop: left half of the preview is pixel 0, right half is
        // pixel 1, and no output pixel mixes the two
        let crop = [100, 0, 0, 0, 100, 0];
        let out = magnify(&crop, 2, 1);
        for x in 0..MAGNIFIED_SIZE {
            let idx = x * 3;
            let expected: [u8; 3] = if x < MAGNIFIED_SIZE / 2 {
                [100, 0, 0]
            } else {
                [0, 100, 0]
            };
            assert_eq!(&out[idx..idx + 3], &expected, "column {x}");
        }
    }

    #[test]
    fn single_pixel_crop_fills_the_preview() {
        let out = magnify(&[7, 8, 9], 1, 1);
        for pixel in out.chunks_exact(3) {
            assert_eq!(pixel, [7, 8, 9]);
        }
    }
}
