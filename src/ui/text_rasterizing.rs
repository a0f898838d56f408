//! Glyph rasterizing into a packed ARGB pixel buffer.
//!
//! Uses the system font database; the panel only ever shows short ASCII
//! colour strings and the marker glyph, so any sans-serif will do.

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache};

pub struct TextRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    /// Draw `text` centred on (x, y). `colour` is packed 0xAARRGGBB; glyph
    /// coverage is alpha-blended over whatever is already in `pixels`.
    pub fn draw_text_centred(
        &mut self,
        pixels: &mut [u32],
        width: usize,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        colour: u32,
    ) {
        let attrs = Attrs::new().family(Family::SansSerif);
        let metrics = Metrics::relative(size, 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let Some(run) = buffer.layout_runs().next() else {
            return;
        };

        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for glyph in run.glyphs {
            min_x = min_x.min(glyph.x);
            max_x = max_x.max(glyph.x + glyph.w);
        }
        let text_width = max_x - min_x;
        let text_height = run.line_height;

        let offset = (x - text_width / 2., y - text_height / 2.);
        self.blit_runs(&buffer, pixels, width, offset, colour);
    }

    fn blit_runs(
        &mut self,
        buffer: &Buffer,
        pixels: &mut [u32],
        width: usize,
        offset: (f32, f32),
        colour: u32,
    ) {
        let fg_r = colour >> 16 & 0xFF;
        let fg_g = colour >> 8 & 0xFF;
        let fg_b = colour & 0xFF;

        for run in buffer.layout_runs() {
            let baseline = run.line_y;

            for glyph in run.glyphs {
                let physical = glyph.physical(offset, 1.);
                let Some(image) = self
                    .swash_cache
                    .get_image(&mut self.font_system, physical.cache_key)
                else {
                    continue;
                };

                let glyph_x = physical.x + image.placement.left;
                let glyph_y = physical.y + baseline as i32 - image.placement.top;
                let glyph_w = image.placement.width as usize;
                let glyph_h = image.placement.height as usize;

                for cy in 0..glyph_h {
                    for cx in 0..glyph_w {
                        let alpha = image.data[cy * glyph_w + cx] as u32;
                        if alpha == 0 {
                            continue;
                        }

                        let px = glyph_x as isize + cx as isize;
                        let py = glyph_y as isize + cy as isize;
                        if px < 0 || py < 0 || px >= width as isize {
                            continue;
                        }
                        let idx = py as usize * width + px as usize;
                        if idx >= pixels.len() {
                            continue;
                        }

                        let bg = pixels[idx];
                        let inv = 255 - alpha;
                        let r = ((bg >> 16 & 0xFF) * inv + fg_r * alpha + 127) / 255;
                        let g = ((bg >> 8 & 0xFF) * inv + fg_g * alpha + 127) / 255;
                        let b = ((bg & 0xFF) * inv + fg_b * alpha + 127) / 255;
                        pixels[idx] = 0xFF00_0000 | r << 16 | g << 8 | b;
                    }
                }
            }
        }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}
