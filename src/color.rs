use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "[f32; 4]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    pub fn components(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Composite `self` over an opaque `bottom`. The result is opaque.
    #[inline]
    pub fn over(self, bottom: [f32; 3]) -> [f32; 3] {
        let a = self.a.clamp(0.0, 1.0);
        [
            self.r * a + bottom[0] * (1.0 - a),
            self.g * a + bottom[1] * (1.0 - a),
            self.b * a + bottom[2] * (1.0 - a),
        ]
    }
}

pub fn to_rgb8(rgb: [f32; 3]) -> (u8, u8, u8) {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    (q(rgb[0]), q(rgb[1]), q(rgb[2]))
}

pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

#[derive(Clone, Debug)]
enum Stops {
    None,
    Single(Color),
    Multi { colors: Vec<Color>, last_index: f32 },
}

/// Piecewise-linear color ramp over `[0, 1]`.
///
/// The lookup never fails: inputs outside the unit range clamp to the end
/// stops, and an empty gradient is opaque black everywhere.
#[derive(Clone, Debug)]
pub struct Gradient {
    stops: Stops,
}

impl Gradient {
    pub fn new(colors: &[Color]) -> Self {
        let stops = match colors {
            [] => Stops::None,
            [only] => Stops::Single(*only),
            _ => Stops::Multi {
                colors: colors.to_vec(),
                last_index: (colors.len() - 1) as f32,
            },
        };
        Self { stops }
    }

    pub fn interpolate(&self, t: f32) -> Color {
        match &self.stops {
            Stops::None => Color::BLACK,
            Stops::Single(color) => *color,
            Stops::Multi { colors, last_index } => {
                let t = if t.is_nan() { 0.0 } else { t };
                if t <= 0.0 {
                    return colors[0];
                }
                if t >= 1.0 {
                    return colors[colors.len() - 1];
                }

                let scaled = t * last_index;
                // scaled < last_index here, but rounding can land on it
                let index = (scaled as usize).min(colors.len() - 2);
                let local_t = scaled - index as f32;
                colors[index].lerp(colors[index + 1], local_t)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    const BLUE: Color = Color::new(0.0, 0.0, 1.0, 0.5);

    fn close(a: Color, b: Color) -> bool {
        a.components()
            .iter()
            .zip(b.components())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn empty_gradient_is_opaque_black() {
        let g = Gradient::new(&[]);
        for t in [-3.0, 0.0, 0.25, 1.0, 7.5, f32::NAN] {
            assert_eq!(g.interpolate(t), Color::BLACK);
        }
    }

    #[test]
    fn single_stop_is_constant() {
        let g = Gradient::new(&[BLUE]);
        for t in [-1.0, 0.0, 0.5, 1.0, 2.0] {
            assert_eq!(g.interpolate(t), BLUE);
        }
    }

    #[test]
    fn endpoints_match_first_and_last_stop() {
        let g = Gradient::new(&[RED, GREEN, BLUE]);
        assert_eq!(g.interpolate(0.0), RED);
        assert_eq!(g.interpolate(1.0), BLUE);
        assert_eq!(g.interpolate(-0.5), RED);
        assert_eq!(g.interpolate(1.5), BLUE);
        assert_eq!(g.interpolate(f32::NAN), RED);
    }

    #[test]
    fn interpolates_between_bracketing_stops() {
        let g = Gradient::new(&[RED, GREEN, BLUE]);
        assert!(close(g.interpolate(0.5), GREEN));
        assert!(close(g.interpolate(0.25), Color::new(0.5, 0.5, 0.0, 1.0)));
        assert!(close(g.interpolate(0.75), Color::new(0.0, 0.5, 0.5, 0.75)));
    }

    #[test]
    fn over_blends_by_alpha() {
        let top = Color::new(1.0, 1.0, 1.0, 0.25);
        let out = top.over([0.0, 0.0, 0.0]);
        assert!((out[0] - 0.25).abs() < 1e-6);
        assert_eq!(Color::TRANSPARENT.over([0.2, 0.3, 0.4]), [0.2, 0.3, 0.4]);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("1a1b26"), Some((0x1a, 0x1b, 0x26)));
        assert_eq!(parse_hex_color("#FFFFFF"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("fff"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }
}
