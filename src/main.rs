// Hide console window on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::rc::Rc;
use std::time::{Duration, Instant};

use eyedrop::capture::Snapshot;
use eyedrop::clipboard;
use eyedrop::ui::DropperApp;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorIcon, Fullscreen, Window, WindowId};

/// One-shot delay between the overlay being mapped and the magnifier panel
/// first appearing. The only timer in the program.
const MAGNIFIER_DELAY: Duration = Duration::from_millis(50);

struct App {
    // Taken at startup, moved into the session when the overlay comes up
    snapshot: Option<Snapshot>,
    overlay: Option<Rc<Window>>,
    dropper: Option<DropperApp>,
    magnifier_due: Option<Instant>,
}

impl App {
    /// Terminal transition: print and publish the frozen colour, then leave
    /// the event loop. Publishing happens while both windows are still alive;
    /// clipboard integration is unreliable during window teardown on some
    /// platforms, so this ordering is load-bearing.
    fn finish_commit(&mut self, event_loop: &ActiveEventLoop, colour: String) {
        println!("{colour}");
        clipboard::publish(&colour);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.overlay.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("eyedrop")
            .with_fullscreen(Some(Fullscreen::Borderless(None)))
            .with_decorations(false);
        let overlay = Rc::new(
            event_loop
                .create_window(attributes)
                .expect("create overlay window"),
        );
        overlay.set_cursor(CursorIcon::Crosshair);

        let snapshot = self.snapshot.take().expect("snapshot already consumed");
        self.dropper = Some(DropperApp::new(overlay.clone(), snapshot));
        overlay.request_redraw();
        self.overlay = Some(overlay);
        self.magnifier_due = Some(Instant::now() + MAGNIFIER_DELAY);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let is_overlay = self
            .overlay
            .as_ref()
            .is_some_and(|window| window.id() == window_id);

        let committed = match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                None
            }
            WindowEvent::Resized(size) => {
                if is_overlay {
                    if let Some(app) = &mut self.dropper {
                        app.resize(size.width, size.height);
                    }
                    if let Some(overlay) = &self.overlay {
                        overlay.request_redraw();
                    }
                }
                None
            }
            WindowEvent::RedrawRequested => {
                if let Some(app) = &mut self.dropper {
                    if is_overlay {
                        app.render_overlay();
                    } else if Some(window_id) == app.magnifier_id() {
                        app.present_magnifier();
                    }
                }
                None
            }
            WindowEvent::CursorMoved { position, .. } if is_overlay => self
                .dropper
                .as_mut()
                .and_then(|app| app.handle_mouse_move(position.x, position.y)),
            WindowEvent::MouseInput { state, button, .. } if is_overlay => self
                .dropper
                .as_mut()
                .and_then(|app| app.handle_mouse_click(state, button)),
            WindowEvent::MouseWheel { delta, .. } if is_overlay => self
                .dropper
                .as_mut()
                .and_then(|app| app.handle_mouse_wheel(delta)),
            WindowEvent::KeyboardInput { event, .. } if is_overlay => self
                .dropper
                .as_mut()
                .and_then(|app| app.handle_key(&event)),
            _ => None,
        };

        if let Some(colour) = committed {
            self.finish_commit(event_loop, colour);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // The one-shot magnifier delay; once it fires the loop goes back to
        // plain event-driven waiting.
        let Some(due) = self.magnifier_due else {
            return;
        };
        if Instant::now() >= due {
            self.magnifier_due = None;
            if let Some(app) = &mut self.dropper {
                app.show_magnifier(event_loop);
            }
            event_loop.set_control_flow(ControlFlow::Wait);
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(due));
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if std::env::var_os("EYEDROP_DEBUG").is_some() {
        eyedrop::DEBUG_ENABLED.store(true, std::sync::atomic::Ordering::Relaxed);
    }

    // Grab the screen before any window exists, so the snapshot never
    // contains the tool's own overlay
    let snapshot = Snapshot::capture()?;

    let event_loop = EventLoop::new()?;
    let mut app = App {
        snapshot: Some(snapshot),
        overlay: None,
        dropper: None,
        magnifier_due: None,
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}
