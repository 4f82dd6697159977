use std::f64::consts::FRAC_PI_2;

use foundation::math::{GeoPoint, Vec3, geo_to_sphere, sphere_to_geo};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Nearest point where the ray enters (or, from inside, leaves) a sphere
    /// of `radius` centered at the origin.
    ///
    /// Only hits with a non-negative ray parameter count. A zero direction
    /// never hits.
    pub fn intersect_sphere(&self, radius: f64) -> Option<Vec3> {
        let dir = self.dir.normalize()?;
        // |o + t d|^2 = r^2 with |d| = 1  =>  t^2 + 2 b t + c = 0
        let b = self.origin.dot(dir);
        let c = self.origin.dot(self.origin) - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let t_near = -b - sq;
        let t_far = -b + sq;
        let t = if t_near >= 0.0 {
            t_near
        } else if t_far >= 0.0 {
            t_far
        } else {
            return None;
        };
        Some(self.origin + dir.scale(t))
    }
}

/// Result of picking the globe: where the ray hit (scene frame) and the
/// geographic coordinate underneath.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobePick {
    pub surface: Vec3,
    pub point: GeoPoint,
}

/// Placement of the rendered globe in the scene.
///
/// Geographic sphere coordinates (+Z north) are rotated about X by
/// `land_rotation_x` into the renderer's Y-up frame; the land and border
/// meshes carry the same rotation, so undoing it recovers coordinates in the
/// dataset's (lon, lat) space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeFrame {
    pub radius: f64,
    /// Picking sphere; slightly above the surface so border lines are hit.
    pub pick_radius: f64,
    pub land_rotation_x: f64,
    /// Camera distance from the globe center when focusing a point.
    pub camera_distance: f64,
}

impl Default for GlobeFrame {
    fn default() -> Self {
        Self {
            radius: 2.0,
            pick_radius: 2.01,
            land_rotation_x: -FRAC_PI_2,
            camera_distance: 3.5,
        }
    }
}

impl GlobeFrame {
    pub fn scene_to_geo(&self, p: Vec3) -> GeoPoint {
        sphere_to_geo(p.rotate_x(-self.land_rotation_x))
    }

    pub fn geo_to_scene(&self, point: GeoPoint) -> Vec3 {
        geo_to_sphere(point.lon_deg, point.lat_deg, self.radius).rotate_x(self.land_rotation_x)
    }

    pub fn pick(&self, ray: Ray) -> Option<GlobePick> {
        let surface = ray.intersect_sphere(self.pick_radius)?;
        Some(GlobePick {
            surface,
            point: self.scene_to_geo(surface),
        })
    }

    /// Camera eye that looks at `point` from straight above it.
    pub fn camera_position(&self, point: GeoPoint) -> Option<Vec3> {
        let dir = self.geo_to_scene(point).normalize()?;
        Some(dir.scale(self.camera_distance))
    }
}

/// Screen picking wrapper.
///
/// The caller supplies the screen->ray mapping of its active camera via
/// `make_ray`.
pub fn pick_screen<F>(frame: &GlobeFrame, x_px: f64, y_px: f64, mut make_ray: F) -> Option<GlobePick>
where
    F: FnMut(f64, f64) -> Option<Ray>,
{
    let ray = make_ray(x_px, y_px)?;
    frame.pick(ray)
}

#[cfg(test)]
mod tests {
    use super::{GlobeFrame, Ray, pick_screen};
    use foundation::math::{GeoPoint, Vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn ray_hits_near_side_of_sphere() {
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let hit = ray.intersect_sphere(2.0).expect("hit");
        assert_close(hit.x, 2.0, 1e-12);
    }

    #[test]
    fn ray_from_inside_hits_exit_point() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
        let hit = ray.intersect_sphere(2.0).expect("hit");
        assert_close(hit.z, 2.0, 1e-12);
    }

    #[test]
    fn ray_misses_or_points_away() {
        let miss = Ray::new(Vec3::new(10.0, 3.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!(miss.intersect_sphere(2.0).is_none());
        let away = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(away.intersect_sphere(2.0).is_none());
        let zero = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        assert!(zero.intersect_sphere(2.0).is_none());
    }

    #[test]
    fn scene_frame_is_y_up() {
        let frame = GlobeFrame::default();
        let north = frame.geo_to_scene(GeoPoint::new(90.0, 0.0));
        assert_close(north.y, 2.0, 1e-12);
        let east = frame.geo_to_scene(GeoPoint::new(0.0, 90.0));
        assert_close(east.z, -2.0, 1e-12);
        let origin = frame.geo_to_scene(GeoPoint::new(0.0, 0.0));
        assert_close(origin.x, 2.0, 1e-12);
    }

    #[test]
    fn pick_recovers_coordinate_through_inverse_rotation() {
        let frame = GlobeFrame::default();
        let delhi = GeoPoint::new(28.6, 77.2);
        let target = frame.geo_to_scene(delhi);
        let eye = target.scale(5.0);
        let ray = Ray::new(eye, target - eye);

        let pick = frame.pick(ray).expect("hit");
        assert_close(pick.surface.length(), frame.pick_radius, 1e-9);
        assert_close(pick.point.lat_deg, 28.6, 1e-9);
        assert_close(pick.point.lon_deg, 77.2, 1e-9);
    }

    #[test]
    fn pick_screen_uses_camera_mapping() {
        let frame = GlobeFrame::default();
        let none = pick_screen(&frame, 5.0, 5.0, |_, _| None);
        assert!(none.is_none());

        let hit = pick_screen(&frame, 0.0, 0.0, |_, _| {
            Some(Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0)))
        })
        .expect("hit");
        assert_close(hit.point.lat_deg, 90.0, 1e-9);
    }

    #[test]
    fn camera_looks_down_at_point() {
        let frame = GlobeFrame::default();
        let eye = frame.camera_position(GeoPoint::new(0.0, 0.0)).expect("eye");
        assert_close(eye.x, 3.5, 1e-12);
        assert_close(eye.length(), 3.5, 1e-12);
    }
}
