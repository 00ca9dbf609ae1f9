pub use crate::app::App;
pub use crate::save::LoadStatus;
pub use crate::widgets::*;

pub use corelib::app::AppConfig;
#[cfg(feature = "logs")]
pub use corelib::app::{LogConfig, init_logs};
pub use corelib::backend::{Backend, HeadlessBackend, InputScript};
pub use corelib::events::{Event, FrameInput};
pub use corelib::gfx::{Bitmap, Color};
pub use corelib::input::{KeyCode, MouseButton};
pub use corelib::math::{Rect, Vec2, vec2};

pub use draw::{Canvas, DrawRecorder, Font, FontSpec, Surface, TextRenderer};
