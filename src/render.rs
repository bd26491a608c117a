use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::arcade::{Actor, ArcadeWorld, Rect};
use crate::host::{BLACK, Rgb, WHITE};
use crate::level::{BACKGROUND, BIRD, COLUMN, ROAD};

// ── Colors ──────────────────────────────────────────────────────────────────

fn term(c: Rgb) -> CColor {
    CColor::Rgb { r: c.0, g: c.1, b: c.2 }
}

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

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

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Queues the whole buffer; the caller flushes.
    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = BLACK;
        let mut prev_bg = BLACK;
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(term(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(term(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(term(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)
    }
}

// ── World → pixels ──────────────────────────────────────────────────────────

/// Scale from world units to buffer pixels.
#[derive(Clone, Copy)]
struct View {
    sx: f32,
    sy: f32,
}

impl View {
    fn of(world: &ArcadeWorld, buf: &PixelBuf) -> Self {
        View {
            sx: buf.w as f32 / world.width(),
            sy: buf.h as f32 / world.height(),
        }
    }

    /// Pixel box `(x, y, w, h)` covering `r`.
    fn rect(self, r: &Rect) -> (i32, i32, i32, i32) {
        let x = (r.left() * self.sx).round() as i32;
        let y = (r.top() * self.sy).round() as i32;
        let w = ((r.hw * 2.0 * self.sx).round() as i32).max(1);
        let h = ((r.hh * 2.0 * self.sy).round() as i32).max(1);
        (x, y, w, h)
    }
}

/// Paints every actor in creation order, so later actors draw on top.
pub fn draw_world(world: &ArcadeWorld, buf: &mut PixelBuf) {
    let view = View::of(world, buf);
    for actor in world.actors() {
        match actor.key.as_str() {
            BACKGROUND => draw_background(buf, view, actor),
            ROAD => draw_road(buf, view, actor),
            COLUMN => draw_column(buf, view, actor, world.height()),
            BIRD => draw_bird(buf, view, actor, world.frame()),
            _ => {
                let (x, y, w, h) = view.rect(&actor.rect());
                buf.fill_rect(x, y, w, h, BIRD_PUPIL);
            }
        }
    }
}

fn draw_background(buf: &mut PixelBuf, view: View, actor: &Actor) {
    let (x0, y0, w, h) = view.rect(&actor.rect());
    for y in 0..h {
        let t = (y as u32 * 256 / h.max(1) as u32) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..w {
            buf.set(x0 + x, y0 + y, c);
        }
    }

    let base = y0 + h;
    let scale = (h as f64 / 96.0).max(0.5);
    for x in 0..w {
        let fx = x as f64 * 0.04;
        let hgt = (fx.sin() * 6.0 + (fx * 1.7).sin() * 3.0) * scale;
        let top = base - hgt as i32 - (10.0 * scale) as i32;
        for y in top..base {
            buf.set(x0 + x, y, HILL_FAR);
        }
    }
    for x in 0..w {
        let fx = x as f64 * 0.06;
        let hgt = (fx.sin() * 4.0 + (fx * 2.3).sin() * 2.0) * scale;
        let top = base - hgt as i32 - (7.0 * scale) as i32;
        for y in top..base {
            buf.set(x0 + x, y, HILL_NEAR);
        }
    }
}

fn draw_road(buf: &mut PixelBuf, view: View, actor: &Actor) {
    let (x0, gy, w, h) = view.rect(&actor.rect());
    for x in x0..x0 + w {
        let alt = (x / 3) % 2 == 0;
        buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
        buf.set(x, gy + 1, GRASS);
    }
    for y in (gy + 2)..(gy + h) {
        for x in x0..x0 + w {
            let stripe = (x + (y - gy) * 2) % 12 < 6;
            buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
}

/// Columns hanging from the top of the world get their cap on the lower
/// end, the rest on the upper end.
fn draw_column(buf: &mut PixelBuf, view: View, actor: &Actor, world_h: f32) {
    let (px, top, pw, h) = view.rect(&actor.rect());
    let bottom = top + h;
    let cap_extra = (pw / 6).max(1);
    let cap_h = (h / 16).max(2);
    let hanging = actor.y < world_h / 2.0;

    for x in 0..pw {
        let c = pipe_shade(x, pw);
        for y in top..bottom {
            buf.set(px + x, y, c);
        }
    }

    let (cap_top, cap_bot) = if hanging { (bottom - cap_h, bottom) } else { (top, top + cap_h) };
    for x in -cap_extra..(pw + cap_extra) {
        let c = pipe_shade(x + cap_extra, pw + cap_extra * 2);
        for y in cap_top..cap_bot {
            buf.set(px + x, y, c);
        }
        buf.set(px + x, cap_top, CAP_DARK);
        buf.set(px + x, cap_bot - 1, CAP_DARK);
    }
}

/// Drawn over the physics box rather than the full spritesheet frame.
fn draw_bird(buf: &mut PixelBuf, view: View, actor: &Actor, frame: u64) {
    let (x, y, w, h) = view.rect(&actor.body());
    let cx = x + w / 2;
    let cy = y + h / 2;
    let bw = (w / 2).max(2);
    let bh = (h / 2).max(1);
    let tilt = (actor.vy / 160.0).clamp(-1.0, 1.0).round() as i32;

    buf.fill_rect(cx - bw, cy - bh, bw * 2, bh * 2, BIRD_Y);
    buf.fill_rect(cx - bw + 1, cy - bh, (bw * 2 - 2).max(1), 1, BIRD_HI);

    let wing_y_off = if frame % 8 < 4 { -1 } else { 1 };
    buf.fill_rect(cx - bw + 1, cy + wing_y_off + tilt, (bw / 2).max(1), (bh / 2).max(1), BIRD_WING);

    let ex = cx + bw / 2;
    let ey = cy - bh + 1;
    buf.set(ex, ey, BIRD_EYE);
    buf.set(ex + 1, ey, BIRD_PUPIL);

    buf.fill_rect(cx + bw, cy + tilt, (bw / 2).max(1), (bh / 2).max(1), BIRD_BEAK);
    buf.set(cx - bw - 1, cy + tilt, BIRD_WING);
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
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

// ── Text overlay ────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
struct Line {
    col: u16,
    row: u16,
    text: String,
    fg: Rgb,
    bg: Rgb,
}

/// Lays out every anchored text object in terminal cells: the last line sits
/// on the anchor row, earlier lines stack upward, each centred on the anchor.
fn text_lines(world: &ArcadeWorld, cols: u16, rows: u16) -> Vec<Line> {
    let mut out = Vec::new();
    for t in world.texts() {
        let Some((ax, ay)) = t.anchor else { continue };
        let lines: Vec<_> = t.value.lines().collect();
        let anchor_col = (ax / world.width() * cols as f32) as i32;
        let anchor_row = ((ay / world.height() * rows as f32) as i32).min(rows as i32 - 1);

        for (i, line) in lines.iter().enumerate() {
            let row = anchor_row - (lines.len() - 1 - i) as i32;
            if row < 0 {
                continue;
            }
            let padded = format!(" {line} ");
            let len = padded.chars().count() as i32;
            let col = (anchor_col - len / 2).clamp(0, (cols as i32 - len).max(0));
            out.push(Line {
                col: col as u16,
                row: row as u16,
                text: padded,
                fg: t.style.color,
                bg: t.style.background,
            });
        }
    }
    out
}

/// Draws the world into `buf`, writes it to `out` with the text overlay on
/// top, and flushes.
pub fn present(world: &ArcadeWorld, buf: &mut PixelBuf, out: &mut impl Write) -> io::Result<()> {
    draw_world(world, buf);
    buf.render(out)?;

    let cols = buf.w as u16;
    let rows = (buf.h / 2) as u16;
    for line in text_lines(world, cols, rows) {
        queue!(
            out,
            cursor::MoveTo(line.col, line.row),
            style::SetForegroundColor(term(line.fg)),
            style::SetBackgroundColor(term(line.bg)),
            style::Print(&line.text),
            style::ResetColor,
        )?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Host, Origin, Size, SpriteSpec, TextStyle};

    fn world_with_text(text: &str) -> ArcadeWorld {
        let mut w = ArcadeWorld::new(800.0, 600.0, 300.0);
        w.load_image(BACKGROUND, Size::new(800.0, 600.0)).unwrap();
        let bg = w.add_image(BACKGROUND, 0.0, 0.0, Origin::TOP_LEFT).unwrap();
        let style =
            TextStyle { font_family: "serif", font_size: 20, color: BLACK, background: WHITE };
        let t = w.add_text(text, style);
        w.align_bottom_center(t, bg, 50.0).unwrap();
        w
    }

    #[test]
    fn message_sits_bottom_centre() {
        let w = world_with_text("hi");
        let lines = text_lines(&w, 80, 30);
        assert_eq!(lines.len(), 1);
        // Anchor (400, 550) maps to column 40, row 27.
        assert_eq!(lines[0].row, 27);
        assert_eq!(lines[0].text, " hi ");
        assert_eq!(lines[0].col, 38);
        assert_eq!((lines[0].fg, lines[0].bg), (BLACK, WHITE));
    }

    #[test]
    fn multi_line_message_stacks_upward() {
        let w = world_with_text("first\nsecond");
        let lines = text_lines(&w, 80, 30);
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].row, lines[0].text.as_str()), (26, " first "));
        assert_eq!((lines[1].row, lines[1].text.as_str()), (27, " second "));
    }

    #[test]
    fn long_message_is_kept_inside_the_screen() {
        let w = world_with_text(&"x".repeat(30));
        let lines = text_lines(&w, 20, 10);
        assert_eq!(lines[0].col, 0);
    }

    #[test]
    fn view_scales_world_to_pixels() {
        let w = world_with_text("");
        let buf = PixelBuf::new(80, 60);
        let view = View::of(&w, &buf);
        let r = Rect { cx: 400.0, cy: 300.0, hw: 400.0, hh: 300.0 };
        assert_eq!(view.rect(&r), (0, 0, 80, 60));
    }

    #[test]
    fn bird_is_painted_over_background() {
        let mut w = world_with_text("");
        w.load_spritesheet(BIRD, Size::new(64.0, 96.0)).unwrap();
        let spec =
            SpriteSpec { x: 400.0, y: 300.0, scale: 2.0, bounce: 0.0, collide_world_bounds: false };
        w.add_sprite(BIRD, spec).unwrap();
        let mut buf = PixelBuf::new(80, 60);
        draw_world(&w, &mut buf);
        assert_eq!(buf.get(40, 29), BIRD_Y);
        assert_ne!(buf.get(2, 2), BIRD_Y);
    }

    #[test]
    fn render_emits_one_block_per_cell_pair() {
        let buf = PixelBuf::new(4, 4);
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(' ').count(), 8);
        assert!(!text.contains('\u{2580}'));
    }
}
