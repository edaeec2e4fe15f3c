use crate::color::{Color, Gradient};
use crate::settings::Settings;
use crate::star::Star;
use crate::triangulation::{EMPTY, Triangulation, next_halfedge};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Vertex {
    #[inline]
    pub fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            x,
            y,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }

    pub fn color(&self) -> Color {
        Color::new(self.r, self.g, self.b, self.a)
    }
}

/// Turns star positions plus a triangulation into a flat triangle list.
///
/// Three passes, each optional except the first: flat-shaded triangles
/// colored by the background gradient, thick quads for interior edges, and
/// small polygons for the stars themselves.
pub struct GeometryBuilder {
    gradient: Gradient,
    draw_edges: bool,
    half_edge_width: f32,
    edge_color: Color,
    draw_stars: bool,
    star_color: Color,
    // per-segment offsets around a star, computed once
    x_offsets: Vec<f32>,
    y_offsets: Vec<f32>,
    vertices: Vec<Vertex>,
}

impl GeometryBuilder {
    pub fn new(settings: &Settings) -> Self {
        let stars = &settings.stars;
        let segments = if stars.draw { stars.segments } else { 0 };
        let step = TAU / segments.max(1) as f32;

        let (x_offsets, y_offsets) = (0..segments)
            .map(|i| {
                let angle = i as f32 * step;
                (stars.radius * angle.sin(), stars.radius * angle.cos())
            })
            .unzip();

        let mut builder = Self {
            gradient: Gradient::new(&settings.background_colors),
            draw_edges: settings.edges.draw,
            half_edge_width: settings.edges.width * 0.5,
            edge_color: settings.edges.color,
            draw_stars: stars.draw,
            star_color: stars.color,
            x_offsets,
            y_offsets,
            vertices: Vec::new(),
        };
        builder.reserve_for(stars.count);
        builder
    }

    pub fn segments(&self) -> usize {
        self.x_offsets.len()
    }

    /// Expected vertex count for `star_count` points. A sizing estimate only.
    pub fn capacity_hint(&self, star_count: usize) -> usize {
        let n = star_count;
        let triangles = (6 * n).saturating_sub(15);
        let edges = if self.draw_edges { (18 * n).saturating_sub(36) } else { 0 };
        let stars = if self.draw_stars { n * self.segments() * 3 } else { 0 };
        triangles + edges + stars
    }

    pub fn reserve_for(&mut self, star_count: usize) {
        let hint = self.capacity_hint(star_count);
        self.vertices.clear();
        self.vertices.reserve(hint);
        tracing::debug!(star_count, capacity = hint, "reserved vertex buffer");
    }

    pub fn build(&mut self, stars: &[Star], coords: &[f64], triangulation: &Triangulation) -> &[Vertex] {
        self.vertices.clear();
        self.insert_triangles(coords, triangulation);
        self.insert_edges(coords, triangulation);
        self.insert_stars(stars);
        &self.vertices
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn insert_triangles(&mut self, coords: &[f64], t: &Triangulation) {
        for tri in t.triangles.chunks_exact(3) {
            let (x1, y1) = point(coords, tri[0]);
            let (x2, y2) = point(coords, tri[1]);
            let (x3, y3) = point(coords, tri[2]);

            let mean_y = (y1 + y2 + y3) / 3.0;
            let color = self.gradient.interpolate((mean_y + 1.0) * 0.5);

            self.vertices.push(Vertex::new(x1, y1, color));
            self.vertices.push(Vertex::new(x2, y2, color));
            self.vertices.push(Vertex::new(x3, y3, color));
        }
    }

    fn insert_edges(&mut self, coords: &[f64], t: &Triangulation) {
        if !self.draw_edges {
            return;
        }

        let w = self.half_edge_width;
        let color = self.edge_color;

        for (e, &j) in t.halfedges.iter().enumerate() {
            // Lower index of a twin pair owns the edge; hull edges have no twin
            if j == EMPTY || e >= j {
                continue;
            }

            let (x1, y1) = point(coords, t.triangles[e]);
            let (x2, y2) = point(coords, t.triangles[next_halfedge(e)]);

            let dx = x2 - x1;
            let dy = y2 - y1;
            let length_sq = dx * dx + dy * dy;
            if length_sq == 0.0 {
                continue;
            }

            let length = length_sq.sqrt();
            let nx = -dy / length * w;
            let ny = dx / length * w;

            let p1 = Vertex::new(x1 + nx, y1 + ny, color);
            let p2 = Vertex::new(x1 - nx, y1 - ny, color);
            let p3 = Vertex::new(x2 - nx, y2 - ny, color);
            let p4 = Vertex::new(x2 + nx, y2 + ny, color);

            self.vertices.extend_from_slice(&[p1, p2, p3, p4, p3, p1]);
        }
    }

    fn insert_stars(&mut self, stars: &[Star]) {
        if !self.draw_stars {
            return;
        }

        let segs = self.segments();
        let color = self.star_color;

        for star in stars {
            let (cx, cy) = (star.x(), star.y());
            for j in 0..segs {
                let k = (j + 1) % segs;
                self.vertices.push(Vertex::new(cx, cy, color));
                self.vertices.push(Vertex::new(cx + self.x_offsets[j], cy + self.y_offsets[j], color));
                self.vertices.push(Vertex::new(cx + self.x_offsets[k], cy + self.y_offsets[k], color));
            }
        }
    }
}

#[inline]
fn point(coords: &[f64], index: usize) -> (f32, f32) {
    (coords[2 * index] as f32, coords[2 * index + 1] as f32)
}
