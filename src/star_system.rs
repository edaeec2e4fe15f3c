use crate::settings::Settings;
use crate::star::{MotionMode, MouseField, Star};
use std::f32::consts::TAU;

/// Simulation rectangle in aspect-scaled normalized device coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Bounds {
    /// The visible area (`x` in `[-aspect, aspect]`, `y` in `[-1, 1]`)
    /// grown by `offset` on every side, so stars can drift slightly off-screen.
    pub fn from_aspect(aspect: f32, offset: f32) -> Self {
        let half_height = 1.0 + offset;
        Self {
            left: -half_height * aspect,
            right: half_height * aspect,
            bottom: -half_height,
            top: half_height,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.bottom && y <= self.top
    }
}

#[derive(Clone, Copy, Debug)]
struct MotionConfig {
    count: usize,
    min_speed: f32,
    max_speed: f32,
    mode: MotionMode,
    keep_distance: f32,
    eccentricity: f32,
}

pub struct StarSystem {
    stars: Vec<Star>,
    bounds: Bounds,
    config: MotionConfig,
}

impl StarSystem {
    pub fn new(settings: &Settings, bounds: Bounds) -> Self {
        let config = MotionConfig {
            count: settings.stars.count,
            min_speed: settings.stars.min_speed,
            max_speed: settings.stars.max_speed,
            mode: MotionMode::from_interaction(settings.interaction.mouse_interaction),
            keep_distance: settings.interaction.distance_from_mouse,
            eccentricity: settings.interaction.mouse_eccentricity,
        };

        let mut system = Self {
            stars: Vec::with_capacity(config.count),
            bounds,
            config,
        };
        system.reset();
        system
    }

    pub fn reset(&mut self) {
        self.reset_with(&mut fastrand::Rng::new());
    }

    pub fn reset_with(&mut self, rng: &mut fastrand::Rng) {
        let b = self.bounds;
        let cfg = self.config;

        self.stars.clear();
        self.stars.reserve(cfg.count);
        for _ in 0..cfg.count {
            let x = uniform(rng, b.left, b.right);
            let y = uniform(rng, b.bottom, b.top);
            let speed = uniform(rng, cfg.min_speed, cfg.max_speed);
            let angle = uniform(rng, 0.0, TAU);
            self.stars.push(Star::new(x, y, speed, angle));
        }
    }

    pub fn update(&mut self, dt: f32, mouse_x: f32, mouse_y: f32) {
        let mouse = MouseField {
            x: mouse_x,
            y: mouse_y,
            keep_distance: self.config.keep_distance,
            eccentricity: self.config.eccentricity,
        };
        let mode = self.config.mode;
        let bounds = self.bounds;

        for star in &mut self.stars {
            star.advance(mode, dt, &mouse, &bounds);
        }
    }

    /// Rebuilds `coords` as `[x0, y0, x1, y1, ...]` in star order.
    pub fn write_coords(&self, coords: &mut Vec<f64>) {
        coords.clear();
        coords.reserve(self.stars.len() * 2);
        for star in &self.stars {
            coords.push(star.x() as f64);
            coords.push(star.y() as f64);
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn mode(&self) -> MotionMode {
        self.config.mode
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

// [start, end), collapsing to `start` for an empty range
fn uniform(rng: &mut fastrand::Rng, start: f32, end: f32) -> f32 {
    let v = start + rng.f32() * (end - start);
    if v >= end && end > start { start } else { v }
}
