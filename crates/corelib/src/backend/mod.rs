mod headless;
mod limiter;

pub use headless::*;
pub use limiter::*;

use crate::events::Event;
use crate::gfx::Bitmap;
use crate::math::{UVec2, Vec2};

/// Platform contract consumed by the application loop
pub trait Backend {
    /// Size of the drawable area in pixels
    fn size(&self) -> UVec2;

    /// Replaces `out` with every event pending since the last call
    fn poll_events(&mut self, out: &mut Vec<Event>);

    /// Current pointer position
    fn mouse_position(&self) -> Vec2;

    /// Shows the frame to the user
    fn present(&mut self, frame: &Bitmap) -> Result<(), String>;
}
