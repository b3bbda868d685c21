use glam::{Mat4, Vec3};

/// Orbit camera around a target point, in spherical coordinates.
///
/// `polar` is measured from straight up (+Y); `azimuth` from +Z toward +X.
/// Camera motion is not part of the animated scene state.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub azimuth: f32,
    pub polar: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub max_polar: f32,
    pub sensitivity: f32,
    pub zoom_step: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(10.0, 20.0, 50.0), Vec3::new(0.0, 2.0, 0.0))
    }
}

const MIN_POLAR: f32 = 0.01;

impl OrbitCamera {
    /// Place the eye at `eye` and orbit around `target`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        let mut camera = Self {
            target,
            distance,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            fov: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 500.0,
            min_distance: 20.0,
            max_distance: 80.0,
            max_polar: 90.0_f32.to_radians(),
            sensitivity: 0.005,
            zoom_step: 0.95,
        };
        camera.clamp();
        camera
    }

    pub fn with_limits(mut self, min_distance: f32, max_distance: f32, max_polar: f32) -> Self {
        self.min_distance = min_distance;
        self.max_distance = max_distance.max(min_distance);
        self.max_polar = max_polar;
        self.clamp();
        self
    }

    pub fn with_projection(mut self, fov: f32, near: f32, far: f32) -> Self {
        self.fov = fov;
        self.near = near;
        self.far = far;
        self
    }

    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        self.target + Vec3::new(sp * sa, cp, sp * ca) * self.distance
    }

    /// Drag by `dx`, `dy` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * self.sensitivity;
        self.polar -= dy * self.sensitivity;
        self.clamp();
    }

    /// Positive `scroll` moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance *= self.zoom_step.powf(scroll);
        self.clamp();
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    fn clamp(&mut self) {
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self.polar = self.polar.clamp(MIN_POLAR, self.max_polar.max(MIN_POLAR));
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_keeps_its_eye() {
        let cam = OrbitCamera::default();
        assert!(cam.eye().abs_diff_eq(Vec3::new(10.0, 20.0, 50.0), 1e-3));
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn distance_is_clamped() {
        let mut cam = OrbitCamera::default();
        for _ in 0..200 {
            cam.zoom(1.0);
        }
        assert!((cam.distance - 20.0).abs() < 1e-4);
        for _ in 0..200 {
            cam.zoom(-1.0);
        }
        assert!((cam.distance - 80.0).abs() < 1e-4);
    }

    #[test]
    fn cannot_orbit_below_horizon() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, -10_000.0);
        assert!(cam.eye().y >= cam.target.y - 1e-3);
        cam.orbit(0.0, 10_000.0);
        assert!(cam.polar > 0.0);
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut cam = OrbitCamera::default();
        let d = cam.distance;
        cam.orbit(120.0, 30.0);
        assert!((cam.eye().distance(cam.target) - d).abs() < 1e-3);
    }

    #[test]
    fn aspect_ignores_zero_size() {
        let mut cam = OrbitCamera::default();
        cam.set_aspect(0, 720);
        assert_eq!(cam.aspect, 16.0 / 9.0);
        cam.set_aspect(1280, 1280);
        assert_eq!(cam.aspect, 1.0);
    }
}
