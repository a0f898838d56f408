//! Pointer, wheel and key normalisation for the dispatcher.
//!
//! Everything here reduces raw winit input to [`InputEvent`]s; no session
//! logic lives on this side.

use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta};
use winit::keyboard::{Key, NamedKey};

use super::app::{DropperApp, InputEvent};

impl DropperApp {
    pub fn handle_mouse_move(&mut self, x: f64, y: f64) -> Option<String> {
        self.handle_event(InputEvent::Motion {
            x: x as i32,
            y: y as i32,
        })
    }

    /// Left press commits, right press toggles the colour mode. Releases and
    /// other buttons are ignored.
    pub fn handle_mouse_click(
        &mut self,
        state: ElementState,
        button: MouseButton,
    ) -> Option<String> {
        if state != ElementState::Pressed {
            return None;
        }
        match button {
            MouseButton::Left => self.handle_event(InputEvent::Commit),
            MouseButton::Right => self.handle_event(InputEvent::ToggleMode),
            _ => None,
        }
    }

    pub fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) -> Option<String> {
        let steps = self.wheel.steps(delta);
        if steps == 0 {
            return None;
        }
        self.handle_event(InputEvent::Zoom(steps))
    }

    /// Discrete zoom steps from the keyboard, mirroring the wheel: Up / `+`
    /// zooms in, Down / `-` zooms out.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<String> {
        if !event.state.is_pressed() {
            return None;
        }
        let steps = match &event.logical_key {
            Key::Named(NamedKey::ArrowUp) => 1,
            Key::Named(NamedKey::ArrowDown) => -1,
            Key::Character(c) if matches!(c.as_str(), "+" | "=") => 1,
            Key::Character(c) if c.as_str() == "-" => -1,
            _ => return None,
        };
        self.handle_event(InputEvent::Zoom(steps))
    }
}

/// One wheel notch expressed in pixel-delta travel. Trackpads report smooth
/// pixel deltas, dozens of small events per gesture; a notch's worth of
/// accumulated travel maps to one zoom step.
const NOTCH_PIXELS: f64 = 40.;

/// Reduces raw wheel deltas to whole zoom steps. Line deltas are already in
/// notches: +-1 per event, whatever the platform's magnitude convention.
/// Pixel deltas accumulate until a full notch has built up, so a trackpad
/// flick nudges the zoom instead of slamming it across the whole range.
/// Scrolling up zooms in either way.
#[derive(Debug, Default)]
pub struct WheelAccumulator {
    pixels: f64,
}

impl WheelAccumulator {
    pub fn steps(&mut self, delta: MouseScrollDelta) -> i32 {
        match delta {
            MouseScrollDelta::LineDelta(_x, y) => {
                // A real wheel notch arrived; stale trackpad remainder is
                // meaningless alongside it
                self.pixels = 0.;
                if y > 0. {
                    1
                } else if y < 0. {
                    -1
                } else {
                    0
                }
            }
            MouseScrollDelta::PixelDelta(pos) => {
                self.pixels += pos.y;
                let steps = (self.pixels / NOTCH_PIXELS).trunc();
                self.pixels -= steps * NOTCH_PIXELS;
                steps as i32
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    fn pixel(y: f64) -> MouseScrollDelta {
        MouseScrollDelta::PixelDelta(PhysicalPosition::new(0., y))
    }

    #[test]
    fn line_deltas_normalise_to_single_steps() {
        let mut wheel = WheelAccumulator::default();
        assert_eq!(wheel.steps(MouseScrollDelta::LineDelta(0., 1.)), 1);
        assert_eq!(wheel.steps(MouseScrollDelta::LineDelta(0., 3.)), 1);
        assert_eq!(wheel.steps(MouseScrollDelta::LineDelta(0., -1.)), -1);
        assert_eq!(wheel.steps(MouseScrollDelta::LineDelta(0., -0.5)), -1);
        assert_eq!(wheel.steps(MouseScrollDelta::LineDelta(2., 0.)), 0);
    }

    #[test]
    fn pixel_deltas_accumulate_into_notches() {
        let mut wheel = WheelAccumulator::default();
        assert_eq!(wheel.steps(pixel(10.)), 0);
        assert_eq!(wheel.steps(pixel(10.)), 0);
        assert_eq!(wheel.steps(pixel(10.)), 0);
        // Fourth small event completes the notch
        assert_eq!(wheel.steps(pixel(10.)), 1);
        // Remainder starts over
        assert_eq!(wheel.steps(pixel(10.)), 0);
    }

    #[test]
    fn large_pixel_delta_carries_its_remainder() {
        let mut wheel = WheelAccumulator::default();
        assert_eq!(wheel.steps(pixel(130.)), 3);
        assert_eq!(wheel.steps(pixel(30.)), 1); // 10 left over + 30
    }

    #[test]
    fn negative_pixel_deltas_mirror_positive() {
        let mut wheel = WheelAccumulator::default();
        assert_eq!(wheel.steps(pixel(-30.)), 0);
        assert_eq!(wheel.steps(pixel(-30.)), -1);
    }

    #[test]
    fn opposing_small_deltas_cancel() {
        let mut wheel = WheelAccumulator::default();
        assert_eq!(wheel.steps(pixel(30.)), 0);
        assert_eq!(wheel.steps(pixel(-30.)), 0);
        assert_eq!(wheel.steps(pixel(39.)), 0);
    }

    #[test]
    fn trackpad_flick_is_a_few_steps_not_the_whole_range() {
        // ~90 px of travel split over six events: two steps, not six
        let mut wheel = WheelAccumulator::default();
        let total: i32 = (0..6).map(|_| wheel.steps(pixel(15.))).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn line_notch_discards_stale_pixel_remainder() {
        let mut wheel = WheelAccumulator::default();
        assert_eq!(wheel.steps(pixel(39.)), 0);
        assert_eq!(wheel.steps(MouseScrollDelta::LineDelta(0., 1.)), 1);
        // The 39 px remainder is gone; a fresh pixel event starts from zero
        assert_eq!(wheel.steps(pixel(10.)), 0);
    }
}
