use super::Widget;
use crate::save::{self, LoadStatus};
use corelib::events::FrameInput;
use corelib::gfx::{Bitmap, Color};
use corelib::input::KeyCode;
use corelib::math::{Rect, Vec2, vec2};
use draw::{Font, FontSpec, Surface, TextRenderer};
use std::path::PathBuf;

/// Directory prefix used to persist the field content
pub const DEFAULT_PATH_PREFIX: &str = "data/textfields/";

/// How much of the bounding box is painted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DrawType {
    /// 1px outline of the whole box
    #[default]
    Box,
    /// Underline along the bottom edge
    Line,
    None,
}

/// Horizontal placement of the text inside the field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Centered,
}

/// Settings to create a `TextField`, fixed once the field exists
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextFieldConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Identifies the persisted file, two fields with the same name share it
    pub name: String,
    pub fg_color: Color,
    pub bg_color: Color,
    pub hl_color: Color,
    pub draw_type: DrawType,
    pub font: FontSpec,
    pub alignment: Alignment,
    pub path_prefix: String,
    /// Initial text
    pub value: String,
}

impl Default for TextFieldConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 30.0,
            name: "field".to_string(),
            fg_color: Color::WHITE,
            bg_color: Color::GREEN,
            hl_color: Color::RED,
            draw_type: DrawType::default(),
            font: FontSpec::default(),
            alignment: Alignment::default(),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            value: String::new(),
        }
    }
}

impl TextFieldConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Position and size of the bounding box
    pub fn bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Text color, decoration color and decoration color while focused
    pub fn colors(mut self, fg: Color, bg: Color, hl: Color) -> Self {
        self.fg_color = fg;
        self.bg_color = bg;
        self.hl_color = hl;
        self
    }

    pub fn draw_type(mut self, draw_type: DrawType) -> Self {
        self.draw_type = draw_type;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font.size = size;
        self
    }

    /// Prefix of the save file path, used verbatim (keep the trailing separator)
    pub fn path_prefix(mut self, prefix: &str) -> Self {
        self.path_prefix = prefix.to_string();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }
}

/// Single line text input.
/// Clicking inside the box focuses it, clicking outside or pressing Escape
/// removes the focus. While focused, key presses edit the text.
pub struct TextField {
    config: TextFieldConfig,
    text: String,
    focused: bool,
    bitmap: Bitmap,
    renderer: Box<dyn TextRenderer>,
}

impl std::fmt::Debug for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextField")
            .field("name", &self.config.name)
            .field("text", &self.text)
            .field("focused", &self.focused)
            .field("bitmap", &self.bitmap)
            .finish()
    }
}

impl TextField {
    pub fn new<R>(config: TextFieldConfig, renderer: R) -> Self
    where
        R: TextRenderer + 'static,
    {
        let mut renderer: Box<dyn TextRenderer> = Box::new(renderer);
        let text = config.value.clone();
        let bitmap = renderer.render(&text, config.fg_color);

        Self {
            config,
            text,
            focused: false,
            bitmap,
            renderer,
        }
    }

    /// Creates the field loading the font from `config.font`
    pub fn load_font(config: TextFieldConfig) -> Result<Self, String> {
        let font = Font::load(&config.font)?;
        Ok(Self::new(config, font))
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text, the bitmap is refreshed on the next update
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[inline]
    pub fn config(&self) -> &TextFieldConfig {
        &self.config
    }

    #[inline]
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        let TextFieldConfig {
            x,
            y,
            width,
            height,
            ..
        } = self.config;
        Rect::from_xywh(x, y, width, height)
    }

    /// File used by `save` and `load`
    pub fn save_path(&self) -> PathBuf {
        save::text_path(&self.config.path_prefix, &self.config.name)
    }

    /// Position where the cached text bitmap is drawn
    pub fn text_position(&self) -> Vec2 {
        let TextFieldConfig { x, y, width, .. } = self.config;
        match self.config.alignment {
            Alignment::Left => vec2(x, y),
            Alignment::Centered => {
                let half_text = self.bitmap.width() as f32 / 2.0;
                vec2((x + width / 2.0 - half_text).trunc(), y)
            }
        }
    }

    /// Writes the current text to `save_path`, overwriting it
    pub fn save(&self) -> Result<PathBuf, String> {
        let path = self.save_path();
        save::save_text(&path, &self.text)
            .map_err(|e| format!("Cannot save text field '{}': {e}", self.config.name))?;
        Ok(path)
    }

    /// Replaces the text with the persisted one, if any.
    /// The text stays untouched unless the result is `LoadStatus::Restored`.
    pub fn load(&mut self) -> LoadStatus {
        match save::load_text(&self.save_path()) {
            Ok(text) => {
                self.text = text;
                LoadStatus::Restored
            }
            Err(status) => status,
        }
    }

    fn check_focus(&mut self, input: &FrameInput) {
        let bounds = self.bounds();
        input.mouse_downs().for_each(|_| {
            self.focused = bounds.contains_strict(input.pointer);
        });
    }

    fn process_keys(&mut self, input: &FrameInput) {
        for (key, text) in input.key_downs() {
            match key {
                // the rest of the frame keys still apply
                KeyCode::Escape => self.focused = false,
                KeyCode::Backspace => {
                    self.text.pop();
                }
                _ => {
                    if let Some(c) = text {
                        self.text.push(c);
                    }
                }
            }
        }
    }
}

impl Widget for TextField {
    fn draw(&self, surface: &mut dyn Surface) {
        let color = if self.focused {
            self.config.hl_color
        } else {
            self.config.bg_color
        };

        let bounds = self.bounds();
        match self.config.draw_type {
            DrawType::Box => surface.stroke_rect(bounds, color, 1),
            DrawType::Line => {
                let bottom = bounds.max().y;
                surface.line(vec2(bounds.x(), bottom), bounds.max(), color);
            }
            DrawType::None => {}
        }

        surface.blit(&self.bitmap, self.text_position());
    }

    fn update(&mut self, input: &FrameInput) {
        self.check_focus(input);

        self.bitmap = self.renderer.render(&self.text, self.config.fg_color);

        if self.focused {
            self.process_keys(input);
        }
    }

    fn restore(&mut self) {
        match self.load() {
            LoadStatus::Restored => log::info!("Text field '{}' restored", self.config.name),
            LoadStatus::NotFound => log::debug!("No saved text for field '{}'", self.config.name),
            LoadStatus::Corrupt(reason) => {
                log::warn!("Ignoring saved text for field '{}': {reason}", self.config.name)
            }
        }
    }

    fn persist(&self) -> Result<(), String> {
        self.save().map(|_| ())
    }
}
