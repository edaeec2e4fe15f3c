//! Animated Delaunay field: wandering stars, re-triangulated every frame and
//! drawn as a gradient-shaded mesh with optional edges, star dots and a
//! mouse barrier.

pub mod app;
pub mod color;
pub mod geometry;
pub mod pacer;
pub mod render;
pub mod settings;
pub mod star;
pub mod star_system;
pub mod triangulation;

pub use app::{Application, RestartSignal};
pub use color::{Color, Gradient};
pub use geometry::{GeometryBuilder, Vertex};
pub use pacer::{FrameClock, FramePacer, PaceMode};
pub use render::{RenderCore, TerminalRenderer};
pub use settings::{Settings, SettingsError};
pub use star::{MotionMode, Star};
pub use star_system::{Bounds, StarSystem};
pub use triangulation::{EMPTY, Triangulation, triangulate};
