use crate::surface::Surface;
use corelib::gfx::{Bitmap, Color};
use corelib::math::{Rect, UVec2, Vec2};

/// Software surface that rasterizes into a `Bitmap`
#[derive(Debug, Clone)]
pub struct Canvas {
    bitmap: Bitmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bitmap: Bitmap::new(width, height),
        }
    }

    #[inline]
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    #[inline]
    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }

    #[inline]
    fn plot(&mut self, x: i64, y: i64, rgba: [u8; 4]) {
        if x < 0 || y < 0 {
            return;
        }

        self.bitmap.blend_pixel(x as _, y as _, rgba);
    }
}

/// Pixel coordinate of `v`, saturated to the i32 range and widened so offsets never overflow
#[inline]
fn floor_px(v: f32) -> i64 {
    v.floor() as i32 as i64
}

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

#[inline]
fn region(x: i64, y: i64, max_x: i64, max_y: i64) -> u8 {
    let mut code = 0;
    if x < 0 {
        code |= LEFT;
    } else if x > max_x {
        code |= RIGHT;
    }
    if y < 0 {
        code |= TOP;
    } else if y > max_y {
        code |= BOTTOM;
    }
    code
}

/// Cohen-Sutherland clipping of the segment against `[0, max_x] x [0, max_y]`
fn clip_line(
    mut p0: (i64, i64),
    mut p1: (i64, i64),
    max_x: i64,
    max_y: i64,
) -> Option<((i64, i64), (i64, i64))> {
    // i128 keeps the cross products of two i32 spans exact
    let lerp = |a: i64, da: i64, num: i64, den: i64| -> i64 {
        a + (da as i128 * num as i128 / den as i128) as i64
    };

    loop {
        let c0 = region(p0.0, p0.1, max_x, max_y);
        let c1 = region(p1.0, p1.1, max_x, max_y);
        if c0 | c1 == 0 {
            return Some((p0, p1));
        }
        if c0 & c1 != 0 {
            return None;
        }

        let (code, (x0, y0), (x1, y1)) = if c0 != 0 {
            (c0, p0, p1)
        } else {
            (c1, p1, p0)
        };
        let (dx, dy) = (x1 - x0, y1 - y0);

        let clipped = if code & TOP != 0 {
            (lerp(x0, dx, -y0, dy), 0)
        } else if code & BOTTOM != 0 {
            (lerp(x0, dx, max_y - y0, dy), max_y)
        } else if code & RIGHT != 0 {
            (max_x, lerp(y0, dy, max_x - x0, dx))
        } else {
            (0, lerp(y0, dy, -x0, dx))
        };

        if c0 != 0 {
            p0 = clipped;
        } else {
            p1 = clipped;
        }
    }
}

/// Source indices `start..end` that land inside `0..dst_len` when shifted by `offset`
#[inline]
fn visible_span(offset: i64, src_len: u32, dst_len: u32) -> std::ops::Range<u32> {
    let start = (-offset).clamp(0, src_len as i64);
    let end = (dst_len as i64 - offset).clamp(start, src_len as i64);
    start as u32..end as u32
}

impl Surface for Canvas {
    fn size(&self) -> UVec2 {
        self.bitmap.size()
    }

    fn clear(&mut self, color: Color) {
        self.bitmap.fill(color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: u32) {
        if rect.is_empty() || thickness == 0 {
            return;
        }

        let (min, max) = (rect.min(), rect.max());
        let (min_x, min_y) = (floor_px(min.x), floor_px(min.y));
        let (max_x, max_y) = (floor_px(max.x), floor_px(max.y));
        let t = thickness as i64;
        let size = self.bitmap.size();

        let rgba = color.to_rgba_u8();
        for y in min_y.max(0)..max_y.min(size.y as i64) {
            let is_row_border = y < min_y + t || y >= max_y - t;
            for x in min_x.max(0)..max_x.min(size.x as i64) {
                let is_border = is_row_border || x < min_x + t || x >= max_x - t;
                if is_border {
                    self.plot(x, y, rgba);
                }
            }
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        if self.bitmap.is_empty() {
            return;
        }

        let size = self.bitmap.size();
        let Some(((mut x0, mut y0), (x1, y1))) = clip_line(
            (floor_px(from.x), floor_px(from.y)),
            (floor_px(to.x), floor_px(to.y)),
            size.x as i64 - 1,
            size.y as i64 - 1,
        ) else {
            return;
        };

        let rgba = color.to_rgba_u8();
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, rgba);
            if x0 == x1 && y0 == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn blit(&mut self, bitmap: &Bitmap, pos: Vec2) {
        if bitmap.is_empty() {
            return;
        }

        // pixel positions are truncated, not rounded
        let ox = pos.x as i32 as i64;
        let oy = pos.y as i32 as i64;
        let size = self.bitmap.size();

        let cols = visible_span(ox, bitmap.width(), size.x);
        for sy in visible_span(oy, bitmap.height(), size.y) {
            for sx in cols.clone() {
                if let Some(px) = bitmap.pixel(sx, sy) {
                    self.plot(ox + sx as i64, oy + sy as i64, px);
                }
            }
        }
    }
}
