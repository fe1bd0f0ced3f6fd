//! Presentation: turns a [`Snapshot`] into draw calls on a [`Surface`].
//!
//! The game only ever speaks in play-field units. A surface owns the mapping
//! to physical pixels and the images it can draw.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::game::{Phase, Snapshot};
use crate::geometry::Rect;
use crate::pixels::{self, PixelBuf, Rgb};
use crate::types::{
    BIRD_HEIGHT, BIRD_WIDTH, BOARD_HEIGHT, BOARD_WIDTH, ImageId, PIPE_HEIGHT, PIPE_WIDTH,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Glyph height in play-field units.
    pub size: f64,
    pub align: Align,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn new(size: f64, align: Align) -> Self {
        Self {
            size,
            align,
            color: pixels::WHITE,
        }
    }
}

/// Something the presentation layer can draw on.
pub trait Surface {
    /// Wipe the whole surface back to the background.
    fn clear(&mut self);
    /// Draw an image into a play-field rectangle. Images that are not loaded
    /// yet are skipped.
    fn draw_image(&mut self, image: ImageId, rect: Rect);
    /// `x` is the left edge or the centre, depending on `style.align`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle);
    /// Dim everything drawn so far.
    fn shade(&mut self);
}

// ── Scene ───────────────────────────────────────────────────────────────────

const HUD_SCORE: TextStyle = TextStyle::new(45.0, Align::Left);
const IDLE_SCORE: TextStyle = TextStyle::new(32.0, Align::Left);
const TITLE: TextStyle = TextStyle::new(48.0, Align::Center);
const BODY: TextStyle = TextStyle::new(32.0, Align::Center);
const HINT: TextStyle = TextStyle::new(24.0, Align::Center);

pub fn present(snap: &Snapshot<'_>, surface: &mut impl Surface) {
    surface.clear();
    surface.draw_image(ImageId::Bird, snap.bird.rect());

    if snap.phase == Phase::NotStarted {
        surface.draw_text("SCORE: 0", BOARD_WIDTH * 0.05, BOARD_HEIGHT * 0.05, IDLE_SCORE);
        surface.draw_text("TAP TO START", BOARD_WIDTH / 2.0, BOARD_HEIGHT * 0.7, HINT);
        return;
    }

    for pipe in snap.obstacles {
        surface.draw_image(pipe.image, pipe.rect());
    }

    match snap.phase {
        Phase::Playing => {
            surface.draw_text(
                &snap.score.to_string(),
                BOARD_WIDTH * 0.05,
                BOARD_HEIGHT * 0.03,
                HUD_SCORE,
            );
        }
        Phase::GameOver { .. } => {
            let cx = BOARD_WIDTH / 2.0;
            let cy = BOARD_HEIGHT / 2.0;
            surface.shade();
            surface.draw_text("GAME OVER", cx, cy - 90.0, TITLE);
            surface.draw_text(&format!("SCORE: {}", snap.score), cx, cy - 10.0, BODY);
            surface.draw_text(&format!("HIGH SCORE: {}", snap.high_score), cx, cy + 30.0, BODY);
            surface.draw_text("TAP TO RESTART", cx, cy + 90.0, HINT);
        }
        Phase::NotStarted => {}
    }
}

// ── Terminal canvas ─────────────────────────────────────────────────────────

/// Play-field to pixel factors, recomputed whenever the terminal resizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub fn for_pixels(pw: usize, ph: usize) -> Self {
        Self {
            x: pw as f64 / BOARD_WIDTH,
            y: ph as f64 / BOARD_HEIGHT,
        }
    }
}

/// A pre-rasterized image. `None` pixels are transparent.
#[derive(Clone, Debug)]
pub struct Sprite {
    w: i32,
    h: i32,
    px: Vec<Option<Rgb>>,
}

impl Sprite {
    fn blank(w: i32, h: i32) -> Self {
        let (w, h) = (w.max(1), h.max(1));
        Self {
            w,
            h,
            px: vec![None; (w * h) as usize],
        }
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if (0..self.w).contains(&x) && (0..self.h).contains(&y) {
            self.px[(y * self.w + x) as usize] = Some(c);
        }
    }

    fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn blit(&self, buf: &mut PixelBuf, x: i32, y: i32) {
        for sy in 0..self.h {
            for sx in 0..self.w {
                if let Some(c) = self.px[(sy * self.w + sx) as usize] {
                    buf.set(x + sx, y + sy, c);
                }
            }
        }
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    use pixels::{PIPE_HI, PIPE_L, PIPE_M, PIPE_R};
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

/// Shaded pipe body with a wider lip on the end facing the gap.
fn pipe_sprite(w: i32, h: i32, lip_at_bottom: bool, scale: Scale) -> Sprite {
    let mut s = Sprite::blank(w, h);
    let inset = ((3.0 * scale.x).round() as i32).min(s.w / 4);
    let lip_h = ((24.0 * scale.y).round() as i32).clamp(1, s.h);
    let lip_y = if lip_at_bottom { s.h - lip_h } else { 0 };

    for x in inset..s.w - inset {
        let c = pipe_shade(x - inset, s.w - inset * 2);
        s.fill(x, 0, 1, s.h, c);
    }
    for x in 0..s.w {
        let c = pipe_shade(x, s.w);
        s.fill(x, lip_y, 1, lip_h, c);
        s.set(x, lip_y, pixels::CAP_DARK);
        s.set(x, lip_y + lip_h - 1, pixels::CAP_DARK);
    }
    s
}

fn bird_sprite(w: i32, h: i32) -> Sprite {
    use pixels::{BIRD_BEAK, BIRD_EYE, BIRD_HI, BIRD_PUPIL, BIRD_WING, BIRD_Y};
    let mut s = Sprite::blank(w, h);
    let (w, h) = (s.w, s.h);
    let beak_w = (w / 5).max(1);
    let body_w = (w - beak_w).max(1);

    s.fill(0, 0, body_w, h, BIRD_Y);
    if h >= 3 {
        s.fill(1, 0, body_w - 2, 1, BIRD_HI);
    }
    if h >= 2 && body_w >= 4 {
        s.fill(1, h / 2, body_w / 3, (h / 3).max(1), BIRD_WING);
    }
    if body_w >= 3 {
        let eye = (w / 8).max(1);
        let ex = body_w - eye - 1;
        let ey = (h / 5).min(h - 1);
        s.fill(ex, ey, eye, eye.min(h - ey), BIRD_EYE);
        s.set(ex + eye - 1, ey + eye.min(h - ey) - 1, BIRD_PUPIL);
    }
    let beak_h = (h / 3).max(1);
    s.fill(body_w, h / 2 - beak_h / 2, beak_w, beak_h, BIRD_BEAK);
    s
}

/// The terminal's drawing surface.
pub struct Canvas {
    buf: PixelBuf,
    scale: Scale,
    sprites: HashMap<ImageId, Sprite>,
}

impl Canvas {
    /// A canvas of `pw` x `ph` pixels, with no images loaded yet.
    pub fn new(pw: usize, ph: usize) -> Self {
        Self {
            buf: PixelBuf::new(pw, ph),
            scale: Scale::for_pixels(pw, ph),
            sprites: HashMap::new(),
        }
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn pixels(&self) -> &PixelBuf {
        &self.buf
    }

    /// New size: images have to be loaded again at the new scale.
    pub fn resize(&mut self, pw: usize, ph: usize) {
        self.buf.resize(pw, ph);
        self.scale = Scale::for_pixels(pw, ph);
        self.sprites.clear();
        log::debug!("canvas {pw}x{ph}, scale {:.3}x{:.3}", self.scale.x, self.scale.y);
    }

    pub fn is_ready(&self, image: ImageId) -> bool {
        self.sprites.contains_key(&image)
    }

    /// Rasterize every image for the current scale.
    pub fn load_images(&mut self) {
        let sx = |v: f64| (v * self.scale.x).round() as i32;
        let sy = |v: f64| (v * self.scale.y).round() as i32;
        let (bw, bh) = (sx(BIRD_WIDTH), sy(BIRD_HEIGHT));
        let (pw, ph) = (sx(PIPE_WIDTH), sy(PIPE_HEIGHT));

        self.sprites.insert(ImageId::Bird, bird_sprite(bw, bh));
        self.sprites
            .insert(ImageId::TopPipe, pipe_sprite(pw, ph, true, self.scale));
        self.sprites
            .insert(ImageId::BottomPipe, pipe_sprite(pw, ph, false, self.scale));
    }

    pub fn flush(&self, out: &mut impl Write) -> io::Result<()> {
        self.buf.render(out)
    }

    fn to_px(&self, x: f64, y: f64) -> (i32, i32) {
        (
            (x * self.scale.x).floor() as i32,
            (y * self.scale.y).floor() as i32,
        )
    }
}

impl Surface for Canvas {
    fn clear(&mut self) {
        self.buf.gradient(pixels::SKY_TOP, pixels::SKY_BOT);
    }

    fn draw_image(&mut self, image: ImageId, rect: Rect) {
        let Some(sprite) = self.sprites.get(&image) else {
            return;
        };
        let (x, y) = self.to_px(rect.x, rect.y);
        sprite.blit(&mut self.buf, x, y);
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
        let k = ((style.size * self.scale.y / pixels::GLYPH_H as f64).round() as i32).max(1);
        let (mut px, py) = self.to_px(x, y);
        if style.align == Align::Center {
            px -= pixels::text_cells(text) * k / 2;
        }
        pixels::draw_text(&mut self.buf, px, py, k, text, style.color);
    }

    fn shade(&mut self) {
        self.buf.darken();
    }
}
