use crate::geometry::GeometryBuilder;
use crate::pacer::FramePacer;
use crate::render::RenderCore;
use crate::settings::Settings;
use crate::star_system::{Bounds, StarSystem};
use crate::triangulation::triangulate;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

// Where the mouse sits before the first mouse event: far enough that no
// star or barrier pixel is affected.
const MOUSE_PARKED: f32 = -1.0e4;

/// Single-slot restart request shared with input handlers on any thread.
#[derive(Clone, Debug, Default)]
pub struct RestartSignal(Arc<AtomicBool>);

impl RestartSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns whether a restart was pending, clearing it.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::Relaxed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mouse {
    pub px: f32,
    pub py: f32,
    pub ndc_x: f32,
    pub ndc_y: f32,
}

/// Owns one simulation session and drives it frame by frame:
/// simulate, triangulate, build, upload, draw.
pub struct Application<R: RenderCore> {
    settings: Settings,
    stars: StarSystem,
    coords: Vec<f64>,
    geometry: GeometryBuilder,
    renderer: R,
    pacer: FramePacer,
    restart: RestartSignal,
    mouse: Mouse,
    frames: u64,
}

impl<R: RenderCore> Application<R> {
    pub fn new(settings: Settings, renderer: R) -> Self {
        let stars = StarSystem::new(&settings, bounds_for(&settings, &renderer));
        let geometry = GeometryBuilder::new(&settings);
        let pacer = FramePacer::new(settings.vsync, settings.target_fps);

        let mut app = Self {
            coords: Vec::with_capacity(stars.len() * 2),
            stars,
            geometry,
            renderer,
            pacer,
            restart: RestartSignal::new(),
            mouse: parked_mouse(),
            frames: 0,
            settings,
        };
        app.stars.write_coords(&mut app.coords);
        app
    }

    pub fn restart_signal(&self) -> RestartSignal {
        self.restart.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stars(&self) -> &StarSystem {
        &self.stars
    }

    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub fn geometry(&self) -> &GeometryBuilder {
        &self.geometry
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn mouse(&self) -> Mouse {
        self.mouse
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Places the mouse at a pixel position (origin top-left).
    pub fn set_mouse_pixel(&mut self, px: f32, py: f32) {
        let (width, height) = self.renderer.size();
        let (w, h) = (width as f32, height as f32);
        self.mouse = Mouse {
            px,
            py,
            ndc_x: (px / w * 2.0 - 1.0) * (w / h),
            ndc_y: -(py / h * 2.0 - 1.0),
        };
    }

    /// Places the mouse at the center of a terminal cell's lower pixel.
    pub fn set_mouse_cell(&mut self, column: u16, row: u16) {
        self.set_mouse_pixel(column as f32 + 0.5, row as f32 * 2.0 + 1.5);
    }

    /// Swaps in a renderer of a new size. Bounds depend on the aspect ratio
    /// and never change in place, so the star population is rebuilt.
    pub fn resize(&mut self, renderer: R) {
        self.renderer = renderer;
        let bounds = bounds_for(&self.settings, &self.renderer);
        self.stars = StarSystem::new(&self.settings, bounds);
        self.after_reset();
        self.mouse = parked_mouse();
        tracing::info!(size = ?self.renderer.size(), "resized");
    }

    pub fn frame(&mut self, dt: f32) {
        if self.restart.take() {
            self.stars.reset();
            self.after_reset();
            tracing::info!(stars = self.stars.len(), "restarted");
        }

        self.stars.update(dt, self.mouse.ndc_x, self.mouse.ndc_y);
        self.stars.write_coords(&mut self.coords);

        let triangulation = triangulate(&self.coords);
        let vertices = self.geometry.build(self.stars.stars(), &self.coords, &triangulation);

        self.renderer.upload_vertices(vertices);
        self.renderer.draw(self.mouse.px, self.mouse.py);
        self.frames += 1;
    }

    /// Sleeps off whatever is left of the frame interval after `work`.
    pub fn pace(&mut self, work: Duration) {
        self.pacer.tick(work);
    }

    pub fn pacer(&self) -> &FramePacer {
        &self.pacer
    }

    fn after_reset(&mut self) {
        self.pacer.reset();
        self.geometry.reserve_for(self.stars.len());
        self.stars.write_coords(&mut self.coords);
    }
}

fn bounds_for<R: RenderCore>(settings: &Settings, renderer: &R) -> Bounds {
    let (width, height) = renderer.size();
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    Bounds::from_aspect(aspect, settings.offset_bounds)
}

fn parked_mouse() -> Mouse {
    Mouse {
        px: MOUSE_PARKED,
        py: MOUSE_PARKED,
        ndc_x: MOUSE_PARKED,
        ndc_y: MOUSE_PARKED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex;

    #[derive(Default)]
    struct Recorder {
        uploads: usize,
        draws: usize,
        last: Vec<Vertex>,
        last_mouse: (f32, f32),
    }

    impl RenderCore for Recorder {
        fn upload_vertices(&mut self, vertices: &[Vertex]) {
            self.uploads += 1;
            self.last = vertices.to_vec();
        }

        fn draw(&mut self, mouse_x: f32, mouse_y: f32) {
            self.draws += 1;
            self.last_mouse = (mouse_x, mouse_y);
        }

        fn vertex_count(&self) -> usize {
            self.last.len()
        }

        fn size(&self) -> (usize, usize) {
            (200, 100)
        }
    }

    fn settings() -> Settings {
        let mut s = Settings::default();
        s.stars.count = 40;
        s
    }

    #[test]
    fn restart_flag_is_consumed_once() {
        let signal = RestartSignal::new();
        assert!(!signal.take());
        signal.request();
        signal.request();
        assert!(signal.take());
        assert!(!signal.take());
    }

    #[test]
    fn restart_can_be_requested_from_another_thread() {
        let signal = RestartSignal::new();
        let remote = signal.clone();
        std::thread::spawn(move || remote.request()).join().unwrap();
        assert!(signal.take());
    }

    #[test]
    fn frame_uploads_and_draws_once() {
        let mut app = Application::new(settings(), Recorder::default());
        app.frame(0.016);
        assert_eq!(app.renderer().uploads, 1);
        assert_eq!(app.renderer().draws, 1);
        assert_eq!(app.renderer().vertex_count(), app.geometry().vertex_count());
        assert!(app.renderer().vertex_count() > 0);
        assert_eq!(app.coords().len(), 80);
        assert_eq!(app.frames(), 1);
    }

    #[test]
    fn restart_regenerates_stars_on_next_frame() {
        let mut app = Application::new(settings(), Recorder::default());
        app.frame(0.016);
        let before: Vec<f32> = app.stars().stars().iter().map(|s| s.x()).collect();

        app.restart_signal().request();
        app.frame(0.0);
        let after: Vec<f32> = app.stars().stars().iter().map(|s| s.x()).collect();

        assert_eq!(after.len(), before.len());
        assert_ne!(before, after);
        assert_eq!(app.pacer().residue(), 0.0);
    }

    #[test]
    fn mouse_maps_to_aspect_scaled_ndc() {
        let mut app = Application::new(settings(), Recorder::default());
        app.set_mouse_pixel(100.0, 50.0);
        let m = app.mouse();
        assert!(m.ndc_x.abs() < 1e-6 && m.ndc_y.abs() < 1e-6);

        app.set_mouse_pixel(200.0, 0.0);
        let m = app.mouse();
        assert!((m.ndc_x - 2.0).abs() < 1e-6);
        assert!((m.ndc_y - 1.0).abs() < 1e-6);

        app.frame(0.016);
        assert_eq!(app.renderer().last_mouse, (200.0, 0.0));
    }

    #[test]
    fn bounds_follow_renderer_aspect() {
        let app = Application::new(settings(), Recorder::default());
        let b = app.stars().bounds();
        let offset = app.settings().offset_bounds;
        assert!((b.right - 2.0 * (1.0 + offset)).abs() < 1e-6);
        assert!((b.top - (1.0 + offset)).abs() < 1e-6);
    }
}
