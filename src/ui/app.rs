//! Session state and the event dispatcher.
//!
//! All ambient state (cursor, zoom, colour mode, last sample) lives in one
//! [`Session`] struct, and every input event goes through a single `match` in
//! [`Session::dispatch`]. The windowing side ([`DropperApp`]) owns the
//! session plus the overlay surface and the magnifier panel, and holds no
//! sampling logic of its own.

use std::rc::Rc;

use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use super::magnifier::{magnify, Magnifier};
use super::mouse::WheelAccumulator;
use super::renderer::Renderer;
use crate::capture::{CropRegion, Snapshot};
use crate::colour::{committed_colour, format_colour, marker_argb, ColourMode};
use crate::debug_println;
use crate::{MAGNIFIED_SIZE, PANEL_OFFSET_X, PANEL_OFFSET_Y};

/// Magnification level, saturating in `[MIN, MAX]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Zoom(u32);

impl Zoom {
    pub const MIN: u32 = 0;
    pub const MAX: u32 = 10;

    /// Add `steps`, silently capping at both ends. Stepping past a bound is a
    /// no-op, not an error.
    pub fn adjust(&mut self, steps: i32) {
        self.0 = (self.0 as i32 + steps).clamp(Self::MIN as i32, Self::MAX as i32) as u32;
    }

    pub fn current(&self) -> u32 {
        self.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Zoom(2)
    }
}

/// Input events after platform normalisation. Wheel deltas and key presses
/// arrive here already reduced to whole zoom steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer moved to physical screen coordinates.
    Motion { x: i32, y: i32 },
    /// Zoom step request, +-1 per wheel notch or key press.
    Zoom(i32),
    /// Right-click: switch between Rgb and Hex colour text.
    ToggleMode,
    /// Left-click: freeze the current colour and end the session.
    Commit,
}

/// Session phase. Committing is terminal; there is no cancel transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Active,
    Committing,
}

/// Everything the magnifier panel needs for one redraw. Recomputed by the
/// motion pipeline; the panel keeps none of it between events.
pub struct ViewState {
    /// Box-filtered crop, packed RGB8, `MAGNIFIED_SIZE` square.
    pub magnified: Vec<u8>,
    /// The pixel at the geometric centre of `magnified`.
    pub sampled: (u8, u8, u8),
    /// `sampled` formatted per the active colour mode.
    pub formatted: String,
    /// Contrast marker colour, packed 0xAARRGGBB.
    pub marker: u32,
    /// Panel outer position: cursor plus the fixed offset.
    pub panel_pos: (i32, i32),
}

/// The session proper: frozen snapshot plus all mutable inspection state.
/// Pure with respect to windowing, so the whole state machine is testable
/// without a display.
pub struct Session {
    snapshot: Snapshot,
    cursor: (i32, i32),
    zoom: Zoom,
    mode: ColourMode,
    phase: Phase,
    view: ViewState,
}

impl Session {
    /// Start an Active session over `snapshot`, cursor defaulted to the
    /// centre until the first motion event arrives.
    pub fn new(snapshot: Snapshot) -> Self {
        let cursor = (
            snapshot.width() as i32 / 2,
            snapshot.height() as i32 / 2,
        );
        let mut session = Self {
            snapshot,
            cursor,
            zoom: Zoom::default(),
            mode: ColourMode::default(),
            phase: Phase::Active,
            view: ViewState {
                magnified: vec![0; MAGNIFIED_SIZE * MAGNIFIED_SIZE * 3],
                sampled: (0, 0, 0),
                formatted: String::new(),
                marker: 0xFFFF_FFFF,
                panel_pos: (cursor.0 + PANEL_OFFSET_X, cursor.1 + PANEL_OFFSET_Y),
            },
        };
        session.refresh();
        session
    }

    /// The single dispatch point for the state machine. Returns the frozen
    /// colour string exactly once, on the Active -> Committing transition;
    /// events after that are ignored.
    pub fn dispatch(&mut self, event: InputEvent) -> Option<String> {
        if self.phase == Phase::Committing {
            return None;
        }

        match event {
            InputEvent::Motion { x, y } => {
                self.cursor = (x, y);
                self.refresh();
                None
            }
            InputEvent::Zoom(steps) => {
                self.zoom.adjust(steps);
                debug_println!("zoom -> {}", self.zoom.current());
                self.refresh();
                None
            }
            InputEvent::ToggleMode => {
                self.mode = self.mode.toggled();
                debug_println!("colour mode -> {:?}", self.mode);
                self.refresh();
                None
            }
            InputEvent::Commit => {
                self.phase = Phase::Committing;
                Some(committed_colour(self.view.sampled))
            }
        }
    }

    /// The motion pipeline: crop, magnify, sample the centre, format, marker,
    /// panel position. Hot path - runs synchronously on every pointer move.
    fn refresh(&mut self) {
        let region = CropRegion::centred(
            self.cursor.0,
            self.cursor.1,
            self.zoom.current(),
            self.snapshot.width(),
            self.snapshot.height(),
        );
        let crop = self.snapshot.crop_rgb(region);
        let magnified = magnify(&crop, region.w, region.h);

        let mid = (MAGNIFIED_SIZE / 2 * MAGNIFIED_SIZE + MAGNIFIED_SIZE / 2) * 3;
        let sampled = (magnified[mid], magnified[mid + 1], magnified[mid + 2]);

        self.view = ViewState {
            magnified,
            sampled,
            formatted: format_colour(self.mode, sampled),
            marker: marker_argb(sampled),
            panel_pos: (
                self.cursor.0 + PANEL_OFFSET_X,
                self.cursor.1 + PANEL_OFFSET_Y,
            ),
        };
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn zoom(&self) -> u32 {
        self.zoom.current()
    }

    pub fn mode(&self) -> ColourMode {
        self.mode
    }
}

/// Windowing shell around the session: the fullscreen overlay surface and
/// the floating magnifier panel.
pub struct DropperApp {
    overlay: Rc<Window>,
    renderer: Renderer,
    magnifier: Option<Magnifier>,
    pub(super) wheel: WheelAccumulator,
    pub session: Session,
}

impl DropperApp {
    pub fn new(overlay: Rc<Window>, snapshot: Snapshot) -> Self {
        let size = overlay.inner_size();
        let renderer = Renderer::new(overlay.clone(), size.width.max(1), size.height.max(1));
        Self {
            overlay,
            renderer,
            magnifier: None,
            wheel: WheelAccumulator::default(),
            session: Session::new(snapshot),
        }
    }

    /// Feed one normalised event through the dispatcher. `Some(colour)` means
    /// the session just committed; the caller must publish the colour before
    /// tearing any window down, then exit.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<String> {
        let committed = self.session.dispatch(event);
        if committed.is_none() {
            if let Some(magnifier) = &mut self.magnifier {
                magnifier.update(self.session.view());
            }
        }
        committed
    }

    /// Create and show the magnifier panel. Called once, after the one-shot
    /// startup delay.
    pub fn show_magnifier(&mut self, event_loop: &ActiveEventLoop) {
        if self.magnifier.is_some() {
            return;
        }
        let mut magnifier = Magnifier::create(event_loop, self.session.view().panel_pos);
        magnifier.update(self.session.view());
        self.magnifier = Some(magnifier);
        self.overlay.request_redraw();
    }

    pub fn magnifier_id(&self) -> Option<WindowId> {
        self.magnifier.as_ref().map(|m| m.window_id())
    }

    pub fn present_magnifier(&mut self) {
        if let Some(magnifier) = &mut self.magnifier {
            magnifier.present();
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    /// Blit the frozen snapshot onto the overlay surface.
    pub fn render_overlay(&mut self) {
        let width = self.renderer.width() as usize;
        let height = self.renderer.height() as usize;
        let snapshot = &self.session.snapshot;

        let cols = width.min(snapshot.width());
        let rows = height.min(snapshot.height());

        let mut buffer = self.renderer.lock_buffer();
        for y in 0..rows {
            for x in 0..cols {
                buffer[y * width + x] = snapshot.pixel_argb(x, y);
            }
        }
        let _ = buffer.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 16x16 snapshot where pixel (x, y) is (x*16, y*16, 30).
    fn gradient_session() -> Session {
        let (w, h) = (16usize, 16usize);
        let mut rgba = Vec::with_capacity(w * h * 4);
        for y in 0..h {
            for x in 0..w {
                rgba.extend_from_slice(&[(x * 16) as u8, (y * 16) as u8, 30, 255]);
            }
        }
        Session::new(Snapshot::from_rgba(w, h, rgba))
    }

    #[test]
    fn zoom_saturates_at_both_ends() {
        let mut zoom = Zoom::default();
        assert_eq!(zoom.current(), 2);

        zoom.adjust(100);
        assert_eq!(zoom.current(), Zoom::MAX);
        zoom.adjust(1);
        assert_eq!(zoom.current(), Zoom::MAX);

        zoom.adjust(-100);
        assert_eq!(zoom.current(), Zoom::MIN);
        zoom.adjust(-1);
        assert_eq!(zoom.current(), Zoom::MIN);
    }

    #[test]
    fn motion_tracks_the_hovered_pixel() {
        let mut session = gradient_session();
        session.dispatch(InputEvent::Zoom(-2)); // zoom 0: single-pixel crop
        session.dispatch(InputEvent::Motion { x: 5, y: 7 });

        assert_eq!(session.view().sampled, (80, 112, 30));
        assert_eq!(session.view().formatted, "(80,112,30)");
        assert_eq!(session.view().panel_pos, (5 + PANEL_OFFSET_X, 7 + PANEL_OFFSET_Y));
    }

    #[test]
    fn default_zoom_commit_preserves_uniform_colour() {
        // The box upscale must pass colour values through untouched: at the
        // default zoom a uniform (10,20,30) screen shows "(10,20,30)" and
        // commits "rgb(10,20,30)", never a brightened sum of crop pixels
        let (w, h) = (64usize, 64usize);
        let mut rgba = Vec::with_capacity(w * h * 4);
        for _ in 0..w * h {
            rgba.extend_from_slice(&[10, 20, 30, 255]);
        }
        let mut session = Session::new(Snapshot::from_rgba(w, h, rgba));

        session.dispatch(InputEvent::Motion { x: 32, y: 32 });
        assert_eq!(session.zoom(), 2);
        assert_eq!(session.view().sampled, (10, 20, 30));
        assert_eq!(session.view().formatted, "(10,20,30)");
        assert_eq!(
            session.dispatch(InputEvent::Commit),
            Some("rgb(10,20,30)".to_string())
        );
    }

    #[test]
    fn toggle_switches_text_format_in_place() {
        let mut session = gradient_session();
        session.dispatch(InputEvent::Zoom(-2));
        session.dispatch(InputEvent::Motion { x: 5, y: 7 });

        session.dispatch(InputEvent::ToggleMode);
        assert_eq!(session.mode(), ColourMode::Hex);
        // 255-80 = 175 = 0xaf, 255-112 = 143 = 0x8f, 255-30 = 225 = 0xe1
        assert_eq!(session.view().formatted, "#af8fe1");

        session.dispatch(InputEvent::ToggleMode);
        assert_eq!(session.mode(), ColourMode::Rgb);
        assert_eq!(session.view().formatted, "(80,112,30)");
    }

    #[test]
    fn marker_is_mode_independent() {
        let mut session = gradient_session();
        session.dispatch(InputEvent::Zoom(-2));
        session.dispatch(InputEvent::Motion { x: 5, y: 7 });
        let marker_rgb_mode = session.view().marker;

        session.dispatch(InputEvent::ToggleMode);
        assert_eq!(session.view().marker, marker_rgb_mode);
        // max(80, 112, 30) = 112, 255-112 = 143 = 0x8f
        assert_eq!(marker_rgb_mode, 0xFF8F8F8F);
    }

    #[test]
    fn commit_freezes_rgb_form_and_is_terminal() {
        let mut session = gradient_session();
        session.dispatch(InputEvent::Zoom(-2));
        session.dispatch(InputEvent::Motion { x: 5, y: 7 });
        // Hex mode on screen must not change what gets committed
        session.dispatch(InputEvent::ToggleMode);

        let mut commits = Vec::new();
        let events = [
            InputEvent::Commit,
            InputEvent::Motion { x: 1, y: 1 },
            InputEvent::Zoom(1),
            InputEvent::ToggleMode,
            InputEvent::Commit,
        ];
        for event in events {
            if let Some(colour) = session.dispatch(event) {
                commits.push(colour);
            }
        }

        // Exactly one publish per session, with the colour current at the
        // first (terminal) click
        assert_eq!(commits, vec!["rgb(80,112,30)".to_string()]);
    }

    #[test]
    fn edge_cursor_still_samples() {
        let mut session = gradient_session();
        session.dispatch(InputEvent::Motion { x: 0, y: 0 });
        // Clamped crop is 3x3 at the corner; its centre maps to (1, 1)
        assert_eq!(session.view().sampled, (16, 16, 30));

        session.dispatch(InputEvent::Motion { x: -10, y: 500 });
        assert!(!session.view().formatted.is_empty());
    }

    #[test]
    fn zoom_steps_past_bounds_are_noops_through_dispatch() {
        let mut session = gradient_session();
        for _ in 0..20 {
            session.dispatch(InputEvent::Zoom(1));
        }
        assert_eq!(session.zoom(), Zoom::MAX);
        for _ in 0..40 {
            session.dispatch(InputEvent::Zoom(-1));
        }
        assert_eq!(session.zoom(), Zoom::MIN);
    }
}
