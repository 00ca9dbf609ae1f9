pub mod app;
pub mod backend;
pub mod events;
pub mod gfx;
pub mod input;
pub mod math;
