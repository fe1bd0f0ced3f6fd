use std::io::{self, Write};

use crossterm::{cursor, queue, style};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn halved(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    fn term(self) -> style::Color {
        style::Color::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

pub const SKY_TOP: Rgb = Rgb(70, 180, 200);
pub const SKY_BOT: Rgb = Rgb(190, 232, 245);
pub const PIPE_L: Rgb = Rgb(74, 122, 26);
pub const PIPE_M: Rgb = Rgb(100, 170, 40);
pub const PIPE_R: Rgb = Rgb(115, 191, 46);
pub const PIPE_HI: Rgb = Rgb(145, 215, 62);
pub const CAP_DARK: Rgb = Rgb(60, 100, 20);
pub const BIRD_Y: Rgb = Rgb(245, 200, 66);
pub const BIRD_HI: Rgb = Rgb(255, 225, 100);
pub const BIRD_WING: Rgb = Rgb(215, 165, 35);
pub const BIRD_EYE: Rgb = Rgb(255, 255, 255);
pub const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
pub const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

/// Two pixels per terminal cell: the upper one is the foreground of `▀`,
/// the lower one its background.
pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Vertical gradient over the whole buffer.
    pub fn gradient(&mut self, top: Rgb, bottom: Rgb) {
        let h = self.h.max(1);
        for y in 0..self.h {
            let c = Rgb::lerp(top, bottom, (y * 256 / h) as u16);
            self.px[y * self.w..(y + 1) * self.w].fill(c);
        }
    }

    pub fn darken(&mut self) {
        for p in &mut self.px {
            *p = p.halved();
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = None;
        let mut prev_bg = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if prev_bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.term()))?;
                    prev_bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                } else {
                    if prev_fg != Some(top) {
                        queue!(out, style::SetForegroundColor(top.term()))?;
                        prev_fg = Some(top);
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev_fg = None;
                prev_bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

pub const GLYPH_W: i32 = 3;
pub const GLYPH_H: i32 = 5;

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn letter(ch: char) -> Option<[u8; 15]> {
    Some(match ch {
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'C' => [1,1,1, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'G' => [1,1,1, 1,0,0, 1,0,1, 1,0,1, 1,1,1],
        'H' => [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'I' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'O' => DIGITS[0],
        'P' => [1,1,1, 1,0,1, 1,1,1, 1,0,0, 1,0,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => DIGITS[5],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        ':' => [0,0,0, 0,1,0, 0,0,0, 0,1,0, 0,0,0],
        _ => return None,
    })
}

/// Bitmap for `ch`, or `None` for blanks and characters the font lacks.
pub fn glyph(ch: char) -> Option<[u8; 15]> {
    match ch.to_ascii_uppercase() {
        d @ '0'..='9' => Some(DIGITS[d as usize - '0' as usize]),
        other => letter(other),
    }
}

/// Width in glyph cells of `text`, including one cell between characters.
pub fn text_cells(text: &str) -> i32 {
    (text.chars().count() as i32 * (GLYPH_W + 1) - 1).max(0)
}

/// Draw `text` with its top-left at (x, y), each glyph cell `k` pixels square.
pub fn draw_text(buf: &mut PixelBuf, x: i32, y: i32, k: i32, text: &str, fg: Rgb) {
    for (i, ch) in text.chars().enumerate() {
        let Some(bits) = glyph(ch) else { continue };
        let gx = x + i as i32 * (GLYPH_W + 1) * k;
        for row in 0..GLYPH_H {
            for col in 0..GLYPH_W {
                if bits[(row * GLYPH_W + col) as usize] == 1 {
                    let px = gx + col * k;
                    let py = y + row * k;
                    buf.fill_rect(px + 1, py + 1, k, k, SHADOW);
                    buf.fill_rect(px, py, k, k, fg);
                }
            }
        }
    }
}
