#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalize(self) -> Option<Self> {
        let l2 = self.dot(self);
        if l2 <= 0.0 || !l2.is_finite() {
            return None;
        }
        Some(self.scale(1.0 / l2.sqrt()))
    }

    /// Right-handed rotation about the X axis by `angle_rad`.
    pub fn rotate_x(self, angle_rad: f64) -> Self {
        let (sin, cos) = angle_rad.sin_cos();
        Self::new(
            self.x,
            self.y * cos - self.z * sin,
            self.y * sin + self.z * cos,
        )
    }

    pub fn as_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

#[cfg(test)]
mod tests {
    use super::Vec3;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: Vec3, b: Vec3, eps: f64) {
        let d = (a - b).length();
        assert!(d <= eps, "expected {a:?} ~= {b:?} (diff {d})");
    }

    #[test]
    fn vec3_add_sub_dot() {
        let a = Vec3::new(1.0, 2.0, -1.0);
        let b = Vec3::new(0.5, -2.0, 3.0);
        assert_eq!(a + b, Vec3::new(1.5, 0.0, 2.0));
        assert_eq!(a - b, Vec3::new(0.5, 4.0, -4.0));
        assert_eq!(a.dot(b), -6.5);
    }

    #[test]
    fn normalize_rejects_zero() {
        assert!(Vec3::ZERO.normalize().is_none());
        let n = Vec3::new(3.0, 0.0, 4.0).normalize().expect("unit");
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotate_x_quarter_turn_moves_y_to_z() {
        let v = Vec3::new(1.0, 1.0, 0.0).rotate_x(FRAC_PI_2);
        assert_close(v, Vec3::new(1.0, 0.0, 1.0), 1e-12);
        let back = v.rotate_x(-FRAC_PI_2);
        assert_close(back, Vec3::new(1.0, 1.0, 0.0), 1e-12);
    }
}
