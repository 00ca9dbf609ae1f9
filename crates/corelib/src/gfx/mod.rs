mod bitmap;
mod color;

pub use bitmap::*;
pub use color::*;
