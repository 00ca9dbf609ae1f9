mod canvas;
mod surface;
mod text;

pub use canvas::*;
pub use surface::*;
pub use text::*;
