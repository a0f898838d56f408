pub mod app;
pub mod magnifier;
mod mouse;
mod renderer;
mod text_rasterizing;

pub use app::{DropperApp, InputEvent, Session};
