use crate::color::Color;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

const MAX_STAR_COUNT: usize = 100_000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StarSettings {
    pub draw: bool,
    pub segments: usize,
    pub radius: f32,
    pub count: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    pub color: Color,
}

impl Default for StarSettings {
    fn default() -> Self {
        Self {
            draw: true,
            segments: 8,
            radius: 0.008,
            count: 140,
            min_speed: 0.02,
            max_speed: 0.08,
            color: Color::new(0.95, 0.95, 1.0, 0.9),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EdgeSettings {
    pub draw: bool,
    pub width: f32,
    pub color: Color,
}

impl Default for EdgeSettings {
    fn default() -> Self {
        Self {
            draw: true,
            width: 0.012,
            color: Color::new(1.0, 1.0, 1.0, 0.35),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InteractionSettings {
    pub mouse_interaction: bool,
    pub distance_from_mouse: f32,
    /// Scale applied to the x distance before the keep-distance test.
    pub mouse_eccentricity: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            mouse_interaction: true,
            distance_from_mouse: 0.25,
            mouse_eccentricity: 1.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BarrierSettings {
    pub draw: bool,
    pub radius: f32,
    pub color: Color,
    pub blur: f32,
}

impl Default for BarrierSettings {
    fn default() -> Self {
        Self {
            draw: true,
            radius: 0.22,
            color: Color::new(0.0, 0.0, 0.0, 0.45),
            blur: 2.0,
        }
    }
}

/// Session configuration. Validated once at startup and read-only afterwards.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    #[serde(rename = "fps")]
    pub target_fps: f32,
    pub vsync: bool,
    #[serde(rename = "background-colors")]
    pub background_colors: Vec<Color>,
    pub stars: StarSettings,
    pub edges: EdgeSettings,
    pub interaction: InteractionSettings,
    #[serde(rename = "mouse-barrier")]
    pub barrier: BarrierSettings,
    pub offset_bounds: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_fps: 30.0,
            vsync: false,
            background_colors: vec![
                Color::new(0.05, 0.03, 0.16, 1.0),
                Color::new(0.20, 0.10, 0.38, 1.0),
                Color::new(0.55, 0.18, 0.45, 1.0),
                Color::new(0.95, 0.45, 0.35, 1.0),
            ],
            stars: StarSettings::default(),
            edges: EdgeSettings::default(),
            interaction: InteractionSettings::default(),
            barrier: BarrierSettings::default(),
            offset_bounds: 0.1,
        }
    }
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), stars = settings.stars.count, "loaded settings");
        Ok(settings)
    }

    /// Loads `settings.json` from the working directory, or the built-in
    /// defaults when that file does not exist.
    pub fn load_default() -> Result<Self, SettingsError> {
        let path = Path::new(DEFAULT_SETTINGS_FILE);
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!("no {} found, using built-in defaults", DEFAULT_SETTINGS_FILE);
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.target_fps.is_finite() || self.target_fps <= 0.0 {
            return Err(invalid("fps", format!("must be a positive number, got {}", self.target_fps)));
        }

        let stars = &self.stars;
        if stars.count > MAX_STAR_COUNT {
            return Err(invalid("stars.count", format!("at most {MAX_STAR_COUNT} stars are supported")));
        }
        if stars.draw && stars.segments < 3 {
            return Err(invalid("stars.segments", format!("need at least 3 segments, got {}", stars.segments)));
        }
        non_negative("stars.radius", stars.radius)?;
        non_negative("stars.min-speed", stars.min_speed)?;
        non_negative("stars.max-speed", stars.max_speed)?;
        if stars.min_speed > stars.max_speed {
            return Err(invalid(
                "stars.min-speed",
                format!("{} is greater than max-speed {}", stars.min_speed, stars.max_speed),
            ));
        }
        check_color("stars.color", stars.color)?;

        non_negative("edges.width", self.edges.width)?;
        check_color("edges.color", self.edges.color)?;

        non_negative("interaction.distance-from-mouse", self.interaction.distance_from_mouse)?;
        let eccentricity = self.interaction.mouse_eccentricity;
        if !eccentricity.is_finite() || eccentricity <= 0.0 {
            return Err(invalid(
                "interaction.mouse-eccentricity",
                format!("must be a positive number, got {eccentricity}"),
            ));
        }

        non_negative("mouse-barrier.radius", self.barrier.radius)?;
        non_negative("mouse-barrier.blur", self.barrier.blur)?;
        check_color("mouse-barrier.color", self.barrier.color)?;

        non_negative("offset-bounds", self.offset_bounds)?;
        for color in &self.background_colors {
            check_color("background-colors", *color)?;
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> SettingsError {
    SettingsError::Invalid { field, reason }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a non-negative number, got {value}")))
    }
}

fn check_color(field: &'static str, color: Color) -> Result<(), SettingsError> {
    if color.components().iter().all(|c| c.is_finite() && (0.0..=1.0).contains(c)) {
        Ok(())
    } else {
        Err(invalid(field, format!("color components must lie in [0, 1], got {:?}", color.components())))
    }
}
