use corelib::gfx::{Bitmap, Color};
use cosmic_text::fontdb::{self, Source};
use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Stretch, Style, SwashCache,
    SwashContent, Weight,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Font file loaded when no other one is configured
pub const DEFAULT_FONT_PATH: &str = "data/fonts/default_fira.ttf";
/// Font size in pixels used when no other one is configured
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Rasterizes a single line of text into a bitmap
pub trait TextRenderer {
    fn render(&mut self, text: &str, color: Color) -> Bitmap;
}

/// Reference to a font file and the size to use it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FontSpec {
    pub path: PathBuf,
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FONT_PATH),
            size: DEFAULT_FONT_SIZE,
        }
    }
}

impl FontSpec {
    pub fn new<P: Into<PathBuf>>(path: P, size: f32) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Same file with another size
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn load(&self) -> Result<Font, String> {
        Font::load(self)
    }
}

/// Text rasterizer backed by cosmic-text
pub struct Font {
    font_system: FontSystem,
    swash: SwashCache,
    buffer: Buffer,
    family: Arc<String>,
    weight: Weight,
    style: Style,
    stretch: Stretch,
    size: f32,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("family", &self.family)
            .field("size", &self.size)
            .finish()
    }
}

impl Font {
    /// Reads the font file, failing if it's missing or has no usable face
    pub fn load(info: &FontSpec) -> Result<Self, String> {
        let data = read_font_file(&info.path)?;
        let font = Self::from_bytes(data, info.size)
            .map_err(|e| format!("Cannot load font '{}': {e}", info.path.display()))?;

        log::debug!(
            "Font '{}' loaded from '{}' (size {})",
            font.family,
            info.path.display(),
            info.size
        );
        Ok(font)
    }

    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self, String> {
        if size <= 0.0 {
            return Err(format!("Invalid font size {size}"));
        }

        // only the given face is used, system fonts are not loaded
        let mut font_system =
            FontSystem::new_with_locale_and_db("en-US".to_string(), fontdb::Database::new());
        let ids = font_system
            .db_mut()
            .load_font_source(Source::Binary(Arc::new(data)));
        let raw_id = *ids
            .first()
            .ok_or_else(|| "Cannot create the font".to_string())?;
        let face = font_system
            .db()
            .face(raw_id)
            .ok_or_else(|| "Invalid font type".to_string())?;
        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .ok_or_else(|| "Font without family name".to_string())?;
        let (weight, style, stretch) = (face.weight, face.style, face.stretch);

        let buffer = Buffer::new(&mut font_system, Metrics::new(size, line_height(size)));

        Ok(Self {
            font_system,
            swash: SwashCache::new(),
            buffer,
            family: Arc::new(family),
            weight,
            style,
            stretch,
            size,
        })
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[inline]
    pub fn line_height(&self) -> f32 {
        line_height(self.size)
    }

    fn shape(&mut self, text: &str) {
        let attrs = Attrs::new()
            .family(Family::Name(&self.family))
            .weight(self.weight)
            .style(self.style)
            .stretch(self.stretch);

        // no wrapping, the text is a single line
        self.buffer.set_size(&mut self.font_system, None, None);
        self.buffer
            .set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        self.buffer.shape_until_scroll(&mut self.font_system, false);
    }

    fn block_size(&self) -> (u32, u32) {
        let mut width: f32 = 0.0;
        let mut lines: usize = 0;
        for run in self.buffer.layout_runs() {
            width = run.line_w.max(width);
            lines += 1;
        }

        let height = lines.max(1) as f32 * self.line_height();
        (width.ceil() as u32, height.ceil() as u32)
    }
}

impl TextRenderer for Font {
    fn render(&mut self, text: &str, color: Color) -> Bitmap {
        self.shape(text);
        let (width, height) = self.block_size();
        let mut bmp = Bitmap::new(width, height);
        if bmp.is_empty() {
            return bmp;
        }

        let [r, g, b, a] = color.to_rgba_u8();
        for run in self.buffer.layout_runs() {
            for layout in run.glyphs {
                let glyph = layout.physical((0.0, 0.0), 1.0);
                let Some(image) = self
                    .swash
                    .get_image_uncached(&mut self.font_system, glyph.cache_key)
                else {
                    continue;
                };

                let pw = image.placement.width as usize;
                let ph = image.placement.height as usize;
                if pw == 0 || ph == 0 {
                    continue;
                }

                let ox = glyph.x + image.placement.left;
                let oy = run.line_y as i32 + glyph.y - image.placement.top;

                for gy in 0..ph {
                    for gx in 0..pw {
                        let x = ox + gx as i32;
                        let y = oy + gy as i32;
                        if x < 0 || y < 0 {
                            continue;
                        }

                        let idx = gy * pw + gx;
                        let px = match image.content {
                            SwashContent::Mask => {
                                let coverage = image.data[idx] as u32;
                                [r, g, b, (coverage * a as u32 / 255) as u8]
                            }
                            SwashContent::Color => {
                                let i = idx * 4;
                                [
                                    image.data[i],
                                    image.data[i + 1],
                                    image.data[i + 2],
                                    image.data[i + 3],
                                ]
                            }
                            // not produced by cosmic-text yet
                            SwashContent::SubpixelMask => continue,
                        };

                        bmp.blend_pixel(x as _, y as _, px);
                    }
                }
            }
        }

        bmp
    }
}

#[inline]
fn line_height(size: f32) -> f32 {
    size * 1.2
}

fn read_font_file(path: &Path) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("Cannot read font file '{}': {e}", path.display()))
}
