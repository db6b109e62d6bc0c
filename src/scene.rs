// Rotating wireframe icosahedron for the contact panel. Only the panel size flows in.

use std::f64::consts::TAU;
use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line},
        Block, Widget,
    },
};

const RADIUS: f64 = 1.2;
const CAMERA_DISTANCE: f64 = 5.0;
const FIELD_OF_VIEW_DEG: f64 = 50.0;
/// One full turn every 75 seconds.
const AUTO_ROTATE_SPEED: f64 = TAU / 75.0;
const TILT: f64 = 0.35;
/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 0.5;

type Vec3 = [f64; 3];

pub struct Scene {
    vertices: Vec<Vec3>,
    edges: Vec<(usize, usize)>,
    angle: f64,
    aspect: f64,
    size: (u16, u16),
    color: Color,
}

impl Scene {
    pub fn new(width: u16, height: u16, color: Color) -> Self {
        let (vertices, edges) = icosahedron(RADIUS);
        let mut scene = Self {
            vertices,
            edges,
            angle: 0.0,
            aspect: 1.0,
            size: (0, 0),
            color,
        };
        scene.resize(width, height);
        scene
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if self.size == (width, height) {
            return;
        }
        self.size = (width, height);
        self.aspect = if height == 0 {
            1.0
        } else {
            (width as f64 * CELL_ASPECT) / height as f64
        };
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.angle = (self.angle + AUTO_ROTATE_SPEED * elapsed.as_secs_f64()) % TAU;
    }

    #[cfg(test)]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[cfg(test)]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Projects every edge into normalized device coordinates (`-1.0..=1.0`).
    pub fn projected_edges(&self) -> Vec<([f64; 2], [f64; 2])> {
        let focal = 1.0 / (FIELD_OF_VIEW_DEG.to_radians() / 2.0).tan();
        let project = |v: Vec3| -> [f64; 2] {
            let [x, y, z] = rotate_x(rotate_y(v, self.angle), TILT);
            let depth = CAMERA_DISTANCE - z;
            [focal * x / (depth * self.aspect), focal * y / depth]
        };
        self.edges
            .iter()
            .map(|&(a, b)| (project(self.vertices[a]), project(self.vertices[b])))
            .collect()
    }

    pub fn widget<'a>(&'a self, block: Block<'a>) -> impl Widget + 'a {
        let color = self.color;
        let edges = self.projected_edges();
        Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([-1.0, 1.0])
            .y_bounds([-1.0, 1.0])
            .paint(move |ctx| {
                for (from, to) in &edges {
                    ctx.draw(&Line::new(from[0], from[1], to[0], to[1], color));
                }
            })
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, block: Block<'_>) {
        let inner = block.inner(area);
        self.resize(inner.width, inner.height);
        self.widget(block).render(area, buf);
    }
}

fn rotate_y([x, y, z]: Vec3, angle: f64) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    [x * cos + z * sin, y, -x * sin + z * cos]
}

fn rotate_x([x, y, z]: Vec3, angle: f64) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    [x, y * cos - z * sin, y * sin + z * cos]
}

/// Twelve vertices on the cyclic permutations of `(0, ±1, ±φ)`, scaled to
/// `radius`. Edges join vertex pairs at the minimal distance.
fn icosahedron(radius: f64) -> (Vec<Vec3>, Vec<(usize, usize)>) {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let mut raw = Vec::with_capacity(12);
    for &a in &[-1.0, 1.0] {
        for &b in &[-phi, phi] {
            raw.push([0.0, a, b]);
            raw.push([a, b, 0.0]);
            raw.push([b, 0.0, a]);
        }
    }
    let norm = (1.0 + phi * phi).sqrt();
    let vertices: Vec<Vec3> = raw
        .into_iter()
        .map(|[x, y, z]| [x / norm * radius, y / norm * radius, z / norm * radius])
        .collect();

    let edge_len = 2.0 / norm * radius;
    let mut edges = Vec::with_capacity(30);
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            if (distance(vertices[i], vertices[j]) - edge_len).abs() < 1e-6 {
                edges.push((i, j));
            }
        }
    }
    (vertices, edges)
}

fn distance(a: Vec3, b: Vec3) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}
