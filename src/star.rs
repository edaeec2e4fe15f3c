use crate::star_system::Bounds;

/// How stars move each tick. Chosen once per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionMode {
    Wander,
    AvoidMouse,
}

impl MotionMode {
    pub fn from_interaction(mouse_interaction: bool) -> Self {
        if mouse_interaction {
            MotionMode::AvoidMouse
        } else {
            MotionMode::Wander
        }
    }
}

/// Mouse state seen by the motion step, in aspect-scaled NDC.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseField {
    pub x: f32,
    pub y: f32,
    pub keep_distance: f32,
    pub eccentricity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    org_x: f32, // wander target
    org_y: f32,
    x: f32, // rendered position, chases the target
    y: f32,
    speed_x: f32,
    speed_y: f32,
}

impl Star {
    pub fn new(x: f32, y: f32, speed: f32, angle: f32) -> Self {
        Self {
            org_x: x,
            org_y: y,
            x,
            y,
            speed_x: angle.cos() * speed,
            speed_y: angle.sin() * speed,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn target(&self) -> (f32, f32) {
        (self.org_x, self.org_y)
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.speed_x, self.speed_y)
    }

    #[inline]
    pub fn advance(&mut self, mode: MotionMode, dt: f32, mouse: &MouseField, bounds: &Bounds) {
        match mode {
            MotionMode::Wander => self.wander(dt, bounds),
            MotionMode::AvoidMouse => self.avoid_mouse(dt, mouse, bounds),
        }
    }

    pub fn wander(&mut self, dt: f32, bounds: &Bounds) {
        if !(dt > 0.0) || !dt.is_finite() {
            return;
        }

        self.org_x += self.speed_x * dt;
        self.org_y += self.speed_y * dt;

        // Exponential smoothing toward the target
        self.x += (self.org_x - self.x) * dt;
        self.y += (self.org_y - self.y) * dt;

        // Reflect the velocity only; the target keeps its overshoot
        if self.org_x <= bounds.left {
            self.speed_x = self.speed_x.abs();
        } else if self.org_x >= bounds.right {
            self.speed_x = -self.speed_x.abs();
        }

        if self.org_y <= bounds.bottom {
            self.speed_y = self.speed_y.abs();
        } else if self.org_y >= bounds.top {
            self.speed_y = -self.speed_y.abs();
        }
    }

    pub fn avoid_mouse(&mut self, dt: f32, mouse: &MouseField, bounds: &Bounds) {
        if !(dt > 0.0) || !dt.is_finite() {
            return;
        }

        self.wander(dt, bounds);

        let to_mouse_x = mouse.x - self.x;
        let to_mouse_y = mouse.y - self.y;

        let scaled_x = to_mouse_x * mouse.eccentricity;
        let dist_sq = scaled_x * scaled_x + to_mouse_y * to_mouse_y;
        let keep_sq = mouse.keep_distance * mouse.keep_distance;

        if dist_sq > 0.0 && dist_sq < keep_sq {
            // Snap onto the keep-distance boundary, no easing
            let ratio = mouse.keep_distance / dist_sq.sqrt();
            self.x = to_mouse_x + self.x - to_mouse_x * ratio;
            self.y = to_mouse_y + self.y - to_mouse_y * ratio;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::from_aspect(1.0, 0.0)
    }

    fn mouse_at(x: f32, y: f32, keep: f32) -> MouseField {
        MouseField {
            x,
            y,
            keep_distance: keep,
            eccentricity: 1.0,
        }
    }

    #[test]
    fn new_star_starts_on_its_target() {
        let star = Star::new(0.3, -0.2, 2.0, 0.0);
        assert_eq!(star.target(), (0.3, -0.2));
        assert_eq!((star.x(), star.y()), (0.3, -0.2));
        let (vx, vy) = star.velocity();
        assert!((vx - 2.0).abs() < 1e-6 && vy.abs() < 1e-6);
    }

    #[test]
    fn wander_chases_target_with_lag() {
        let mut star = Star::new(0.0, 0.0, 1.0, 0.0);
        star.wander(0.1, &bounds());
        let (tx, _) = star.target();
        assert!((tx - 0.1).abs() < 1e-6);
        // Position moves 10% of the gap to the new target
        assert!((star.x() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let b = bounds();
        let mouse = mouse_at(0.0, 0.0, 0.5);
        for dt in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            let mut star = Star::new(0.1, 0.1, 1.0, 1.0);
            let before = star.clone();
            star.advance(MotionMode::Wander, dt, &mouse, &b);
            star.advance(MotionMode::AvoidMouse, dt, &mouse, &b);
            assert_eq!(star, before);
        }
    }

    #[test]
    fn velocity_reflects_outward_at_bounds() {
        let b = bounds();
        let mut star = Star::new(0.99, 0.0, 1.0, 0.0);
        star.wander(0.05, &b);
        assert!(star.velocity().0 < 0.0);

        let mut star = Star::new(-0.99, -0.99, 1.0, std::f32::consts::PI * 1.25);
        star.wander(0.05, &b);
        let (vx, vy) = star.velocity();
        assert!(vx > 0.0 && vy > 0.0);
    }

    #[test]
    fn target_stays_near_bounds_over_many_steps() {
        let b = bounds();
        let mut star = Star::new(0.0, 0.0, 0.8, 0.7);
        let step = 0.8 * 0.5;
        for _ in 0..2_000 {
            star.wander(0.5, &b);
            let (tx, ty) = star.target();
            assert!(tx.abs() <= 1.0 + step + 1e-4);
            assert!(ty.abs() <= 1.0 + step + 1e-4);
        }
    }

    #[test]
    fn mouse_pushes_star_onto_keep_distance() {
        let b = bounds();
        let mut star = Star::new(0.05, 0.02, 0.0, 0.0);
        let mouse = mouse_at(0.0, 0.0, 0.3);
        star.avoid_mouse(0.016, &mouse, &b);
        let dist = (star.x().powi(2) + star.y().powi(2)).sqrt();
        assert!((dist - 0.3).abs() < 1e-5, "dist = {dist}");
        // Pushed away from the mouse along the same direction
        assert!(star.x() > 0.0 && star.y() > 0.0);
    }

    #[test]
    fn mouse_ignores_stars_outside_radius_or_on_cursor() {
        let b = bounds();
        let mouse = mouse_at(0.0, 0.0, 0.1);

        let mut far = Star::new(0.5, 0.5, 0.0, 0.0);
        far.avoid_mouse(0.016, &mouse, &b);
        assert_eq!((far.x(), far.y()), (0.5, 0.5));

        let mut on_cursor = Star::new(0.0, 0.0, 0.0, 0.0);
        on_cursor.avoid_mouse(0.016, &mouse, &b);
        assert_eq!((on_cursor.x(), on_cursor.y()), (0.0, 0.0));
    }

    #[test]
    fn eccentricity_stretches_the_keep_region() {
        let b = bounds();
        let mouse = MouseField {
            eccentricity: 0.5,
            ..mouse_at(0.0, 0.0, 0.2)
        };
        // 0.3 away on x, but only 0.15 once scaled
        let mut star = Star::new(0.3, 0.0, 0.0, 0.0);
        star.avoid_mouse(0.016, &mouse, &b);
        assert!((star.x() - 0.4).abs() < 1e-5, "x = {}", star.x());
    }

    #[test]
    fn wander_mode_ignores_the_mouse() {
        let b = bounds();
        let mut star = Star::new(0.01, 0.0, 0.0, 0.0);
        star.advance(MotionMode::Wander, 0.016, &mouse_at(0.0, 0.0, 0.5), &b);
        assert!((star.x() - 0.01).abs() < 1e-6);
    }
}
