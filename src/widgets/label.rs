use super::Widget;
use corelib::events::FrameInput;
use corelib::gfx::{Bitmap, Color};
use corelib::math::{Vec2, vec2};
use draw::{FontSpec, Surface, TextRenderer};

/// Settings to create a `Label`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelConfig {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub fg_color: Color,
    #[serde(default)]
    pub font: FontSpec,
}

impl LabelConfig {
    pub fn new(x: f32, y: f32, text: &str, fg_color: Color) -> Self {
        Self {
            x,
            y,
            text: text.to_string(),
            fg_color,
            font: FontSpec::default(),
        }
    }

    /// Font used to render the text
    pub fn font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    /// Same font file with another size
    pub fn font_size(mut self, size: f32) -> Self {
        self.font.size = size;
        self
    }
}

/// Static text, rendered once when created
#[derive(Debug, Clone)]
pub struct Label {
    position: Vec2,
    text: String,
    fg_color: Color,
    font: FontSpec,
    bitmap: Bitmap,
}

impl Label {
    pub fn new(config: LabelConfig, renderer: &mut dyn TextRenderer) -> Self {
        let LabelConfig {
            x,
            y,
            text,
            fg_color,
            font,
        } = config;

        let bitmap = renderer.render(&text, fg_color);
        Self {
            position: vec2(x, y),
            text,
            fg_color,
            font,
            bitmap,
        }
    }

    /// Creates the label loading the font from `config.font`
    pub fn load(config: LabelConfig) -> Result<Self, String> {
        let mut font = config.font.load()?;
        Ok(Self::new(config, &mut font))
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn fg_color(&self) -> Color {
        self.fg_color
    }

    #[inline]
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    #[inline]
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

impl Widget for Label {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.blit(&self.bitmap, self.position);
    }

    fn update(&mut self, _input: &FrameInput) {}
}
