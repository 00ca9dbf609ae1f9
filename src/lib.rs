pub mod app;
pub mod prelude;
pub mod save;
mod widgets;

pub use widgets::*;

#[doc(inline)]
pub use corelib;

#[doc(inline)]
pub use draw;
