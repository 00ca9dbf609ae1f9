mod label;
mod text_field;

pub use label::*;
pub use text_field::*;

use corelib::events::FrameInput;
use draw::Surface;

/// Element driven by the application loop
pub trait Widget {
    /// Paints the widget using its current state
    fn draw(&self, surface: &mut dyn Surface);

    /// Processes the frame input
    fn update(&mut self, input: &FrameInput);

    /// Reloads persisted state, called before the first frame
    fn restore(&mut self) {}

    /// Stores persistent state, called after the last frame
    fn persist(&self) -> Result<(), String> {
        Ok(())
    }
}
