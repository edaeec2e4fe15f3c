use crate::color::{Color, to_rgb8};
use crate::geometry::Vertex;
use crate::settings::Settings;
use std::io::Write;

/// Consumer of the per-frame vertex buffer.
pub trait RenderCore {
    fn upload_vertices(&mut self, vertices: &[Vertex]);
    /// Draws the last upload. Mouse position is in pixels, origin top-left.
    fn draw(&mut self, mouse_x: f32, mouse_y: f32);
    fn vertex_count(&self) -> usize;
    /// Target size in pixels.
    fn size(&self) -> (usize, usize);
}

#[derive(Clone, Copy, Debug)]
struct Barrier {
    radius: f32, // pixels
    blur: f32,
    color: Color,
}

/// Software rasterizer targeting a truecolor terminal.
///
/// Each cell holds two square-ish pixels drawn with `▄`: the background
/// color is the top pixel, the foreground the bottom one.
pub struct TerminalRenderer {
    width: usize,
    height: usize,
    aspect: f32,
    barrier: Barrier,
    vertices: Vec<Vertex>,
    pixels: Vec<[f32; 3]>,
    output_buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new(settings: &Settings, width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);

        let barrier = Barrier {
            radius: settings.barrier.radius * height as f32 / 2.0,
            blur: settings.barrier.blur,
            color: if settings.barrier.draw {
                settings.barrier.color
            } else {
                Color::TRANSPARENT
            },
        };

        Self {
            width,
            height,
            aspect: width as f32 / height as f32,
            barrier,
            vertices: Vec::new(),
            pixels: vec![[0.0; 3]; width * height],
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    /// Renderer for a terminal of `cols` x `rows` cells.
    pub fn for_terminal(settings: &Settings, cols: u16, rows: u16) -> Self {
        Self::new(settings, cols as usize, rows as usize * 2)
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        self.pixels[y * self.width + x]
    }

    #[inline]
    fn to_screen(&self, v: &Vertex) -> (f32, f32) {
        let sx = (v.x / self.aspect + 1.0) * 0.5 * self.width as f32;
        let sy = (1.0 - v.y) * 0.5 * self.height as f32;
        (sx, sy)
    }

    fn fill_triangle(&mut self, tri: &[Vertex]) {
        let (x0, y0) = self.to_screen(&tri[0]);
        let (x1, y1) = self.to_screen(&tri[1]);
        let (x2, y2) = self.to_screen(&tri[2]);

        let area = (x1 - x0) * (y2 - y0) - (x2 - x0) * (y1 - y0);
        if area == 0.0 || !area.is_finite() {
            return;
        }

        let min_x = x0.min(x1).min(x2).floor().max(0.0) as usize;
        let min_y = y0.min(y1).min(y2).floor().max(0.0) as usize;
        let max_x = (x0.max(x1).max(x2).ceil() as usize).min(self.width);
        let max_y = (y0.max(y1).max(y2).ceil() as usize).min(self.height);

        // Triangles are flat shaded, so one color per triangle
        let color = tri[0].color();
        let sign = area.signum();

        for py in min_y..max_y {
            let cy = py as f32 + 0.5;
            for px in min_x..max_x {
                let cx = px as f32 + 0.5;
                let w0 = ((x1 - cx) * (y2 - cy) - (x2 - cx) * (y1 - cy)) * sign;
                let w1 = ((x2 - cx) * (y0 - cy) - (x0 - cx) * (y2 - cy)) * sign;
                let w2 = ((x0 - cx) * (y1 - cy) - (x1 - cx) * (y0 - cy)) * sign;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let idx = py * self.width + px;
                    self.pixels[idx] = color.over(self.pixels[idx]);
                }
            }
        }
    }

    fn apply_barrier(&mut self, mouse_x: f32, mouse_y: f32) {
        let Barrier { radius, blur, color } = self.barrier;
        if color.a <= 0.0 || radius <= 0.0 {
            return;
        }

        let reach = radius + blur + 1.0;
        let min_x = (mouse_x - reach).floor().max(0.0) as usize;
        let min_y = (mouse_y - reach).floor().max(0.0) as usize;
        let max_x = ((mouse_x + reach).ceil().max(0.0) as usize).min(self.width);
        let max_y = ((mouse_y + reach).ceil().max(0.0) as usize).min(self.height);

        for py in min_y..max_y {
            for px in min_x..max_x {
                let dx = px as f32 + 0.5 - mouse_x;
                let dy = py as f32 + 0.5 - mouse_y;
                let dist = (dx * dx + dy * dy).sqrt();
                let alpha = smoothstep(radius + blur, radius - blur, dist);
                if alpha > 0.0 {
                    let idx = py * self.width + px;
                    let top = Color { a: color.a * alpha, ..color };
                    self.pixels[idx] = top.over(self.pixels[idx]);
                }
            }
        }
    }

    pub fn present<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H"); // Move to home

        let mut prev_top: Option<(u8, u8, u8)> = None;
        let mut prev_bot: Option<(u8, u8, u8)> = None;

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = to_rgb8(self.pixels[y * self.width + x]);
                let bot = if y + 1 < self.height {
                    to_rgb8(self.pixels[(y + 1) * self.width + x])
                } else {
                    (0, 0, 0)
                };

                // Only emit color codes if changed
                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }
}

impl RenderCore for TerminalRenderer {
    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
    }

    fn draw(&mut self, mouse_x: f32, mouse_y: f32) {
        self.pixels.fill([0.0; 3]); // opaque black

        let vertices = std::mem::take(&mut self.vertices);
        for tri in vertices.chunks_exact(3) {
            self.fill_triangle(tri);
        }
        self.vertices = vertices;

        self.apply_barrier(mouse_x, mouse_y);
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 1.0 } else { 0.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
