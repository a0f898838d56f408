//! CPU presentation: a softbuffer surface over a winit window.

use softbuffer::{Context, Surface};
use std::num::NonZeroU32;
use std::rc::Rc;
use winit::window::Window;

pub struct Renderer {
    // Kept alive for the surface; never touched after construction
    _context: Context<Rc<Window>>,
    surface: Surface<Rc<Window>, Rc<Window>>,
    width: u32,
    height: u32,
}

impl Renderer {
    /// Failure to create a surface is a fatal setup error, same as failing to
    /// create the window itself.
    pub fn new(window: Rc<Window>, width: u32, height: u32) -> Self {
        let context = Context::new(window.clone()).expect("softbuffer context");
        let mut surface = Surface::new(&context, window).expect("softbuffer surface");

        surface
            .resize(
                NonZeroU32::new(width).expect("zero-width surface"),
                NonZeroU32::new(height).expect("zero-height surface"),
            )
            .expect("softbuffer resize");

        Self {
            _context: context,
            surface,
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
            let _ = self.surface.resize(
                NonZeroU32::new(width).expect("zero-width surface"),
                NonZeroU32::new(height).expect("zero-height surface"),
            );
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Lock the presentation buffer for direct drawing. Call `.present()` on
    /// the returned buffer when done; dropping it early discards the frame.
    pub fn lock_buffer(&mut self) -> softbuffer::Buffer<'_, Rc<Window>, Rc<Window>> {
        self.surface.buffer_mut().expect("lock softbuffer buffer")
    }
}
