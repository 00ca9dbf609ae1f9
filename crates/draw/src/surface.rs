use corelib::gfx::{Bitmap, Color};
use corelib::math::{Rect, UVec2, Vec2};

/// Explicit draw target passed to widgets every frame
pub trait Surface {
    fn size(&self) -> UVec2;

    /// Fills the whole surface with `color`
    fn clear(&mut self, color: Color);

    /// Outlines `rect` with a border of `thickness` pixels, drawn inwards
    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: u32);

    /// Straight line including both end points
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);

    /// Blends `bitmap` with its top-left corner at `pos`
    fn blit(&mut self, bitmap: &Bitmap, pos: Vec2);
}

/// Draw call stored by `DrawRecorder`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    StrokeRect {
        rect: Rect,
        color: Color,
        thickness: u32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    Blit {
        pos: Vec2,
        size: UVec2,
    },
}

/// Surface that only records the calls in order
#[derive(Debug, Clone, Default)]
pub struct DrawRecorder {
    size: UVec2,
    commands: Vec<DrawCommand>,
}

impl DrawRecorder {
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            commands: vec![],
        }
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the recorded commands leaving the recorder empty
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for DrawRecorder {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: u32) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            thickness,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn blit(&mut self, bitmap: &Bitmap, pos: Vec2) {
        self.commands.push(DrawCommand::Blit {
            pos,
            size: bitmap.size(),
        });
    }
}
