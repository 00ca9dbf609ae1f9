mod keyboard;
mod mouse;

pub use keyboard::*;
pub use mouse::*;
