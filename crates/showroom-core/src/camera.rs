//! Perspective camera and damped orbit controls

use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

use crate::config::OrbitConfig;

/// Perspective camera. `fov` is the vertical field of view in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    target: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
        }
    }

    /// Aspect ratio for a `width` x `height` surface. A degenerate surface
    /// yields 1.0 so the projection stays finite.
    pub fn aspect_for(width: u32, height: u32) -> f32 {
        if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Point the camera is currently aimed at
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }
}

/// Spherical coordinates around the orbit target, Y up.
/// `theta` is the azimuth around Y measured from +Z, `phi` the polar angle from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self { radius: 0.0, theta: 0.0, phi: 0.0 };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

const MIN_POLAR: f32 = 1e-6;
const EPSILON: f32 = 1e-6;

/// Damped orbit controls. Pointer handlers accumulate deltas; `update`
/// applies them to the camera and decays them when damping is on.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    spherical: Spherical,
    spherical_delta: Vec2,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitControls {
    /// Bind controls to `camera`, orbiting around `target`
    pub fn new(camera: &PerspectiveCamera, target: Vec3, config: &OrbitConfig) -> Self {
        Self {
            target,
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            spherical: Spherical::from_offset(camera.position - target),
            spherical_delta: Vec2::ZERO,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Pointer drag of (`dx`, `dy`) pixels on a viewport `viewport_height` tall
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.spherical_delta.x -= TAU * dx / h * self.rotate_speed;
        self.spherical_delta.y -= TAU * dy / h * self.rotate_speed;
    }

    /// Shift the target in the camera's screen plane
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32, camera: &PerspectiveCamera) {
        let h = viewport_height.max(1.0);
        let distance = (camera.position - self.target).length();
        // world units covered by one pixel at the target distance
        let per_pixel = 2.0 * distance * (camera.fov.to_radians() / 2.0).tan() / h;

        let forward = camera.forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        self.pan_offset += (-right * dx + up * dy) * per_pixel * self.pan_speed;
    }

    /// Zoom by `steps` wheel notches; positive moves closer
    pub fn dolly(&mut self, steps: f32) {
        self.scale *= 0.95f32.powf(self.zoom_speed * steps);
    }

    /// Multiply the orbit distance by `factor` on the next update; below 1.0
    /// moves closer. Used for pinch zoom.
    pub fn scale_distance(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale *= factor;
        }
    }

    /// Apply pending input to `camera`. Returns true when the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = (camera.position, camera.target());

        if self.enable_damping {
            self.spherical.theta += self.spherical_delta.x * self.damping_factor;
            self.spherical.phi += self.spherical_delta.y * self.damping_factor;
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.spherical.theta += self.spherical_delta.x;
            self.spherical.phi += self.spherical_delta.y;
            self.target += self.pan_offset;
        }

        self.spherical.theta = wrap_angle(self.spherical.theta);
        self.spherical.phi = self.spherical.phi.clamp(MIN_POLAR, PI - MIN_POLAR);
        // inverted bounds settle on max_distance
        self.spherical.radius = (self.spherical.radius * self.scale)
            .max(self.min_distance)
            .min(self.max_distance);
        self.scale = 1.0;

        camera.position = self.target + self.spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.spherical_delta *= keep;
            self.pan_offset *= keep;
        } else {
            self.spherical_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }

        before.0.distance_squared(camera.position) > EPSILON
            || before.1.distance_squared(camera.target()) > EPSILON
    }

    /// Drop pending rotation, zoom and pan, and adopt the camera's current
    /// pose so the next `update` leaves it in place
    pub fn reset(&mut self, camera: &PerspectiveCamera) {
        self.target = camera.target();
        self.spherical = Spherical::from_offset(camera.position - self.target);
        self.spherical_delta = Vec2::ZERO;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;
    }

    /// True while damped motion is still settling
    pub fn is_moving(&self) -> bool {
        self.spherical_delta.length_squared() > EPSILON * EPSILON
            || self.pan_offset.length_squared() > EPSILON * EPSILON
    }

    pub fn distance(&self) -> f32 {
        self.spherical.radius
    }
}

/// Wrap an angle into [0, 2π)
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3, target: Vec3) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(75.0, 1.5, 0.1, 1000.0);
        camera.position = position;
        camera.look_at(target);
        camera
    }

    fn controls(camera: &PerspectiveCamera) -> OrbitControls {
        OrbitControls::new(camera, camera.target(), &OrbitConfig::default())
    }

    #[test]
    fn test_aspect_for_degenerate_surface() {
        assert_eq!(PerspectiveCamera::aspect_for(800, 400), 2.0);
        assert_eq!(PerspectiveCamera::aspect_for(800, 0), 1.0);
    }

    #[test]
    fn test_spherical_round_trip() {
        let offset = Vec3::new(5.0, 1.0, 5.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!(back.abs_diff_eq(offset, 1e-5));
    }

    #[test]
    fn test_update_without_input_keeps_camera() {
        let mut camera = camera_at(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 1.0, 0.0));
        let mut orbit = controls(&camera);
        assert!(!orbit.update(&mut camera));
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 2.0, 5.0), 1e-5));
        assert_eq!(camera.target(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_damped_rotation_decays() {
        let mut camera = camera_at(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 1.0, 0.0));
        let mut orbit = controls(&camera);
        orbit.rotate(100.0, 0.0, 600.0);

        assert!(orbit.update(&mut camera));
        let first = orbit.spherical_delta.x;
        orbit.update(&mut camera);
        let second = orbit.spherical_delta.x;

        assert!(second.abs() < first.abs());
        assert!((second / first - (1.0 - orbit.damping_factor)).abs() < 1e-5);

        for _ in 0..2000 {
            orbit.update(&mut camera);
        }
        assert!(!orbit.is_moving());
        // orbiting keeps the distance to the target
        assert!((camera.position.distance(orbit.target) - orbit.distance()).abs() < 1e-4);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut camera = camera_at(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO);
        let mut orbit = controls(&camera);
        orbit.enable_damping = false;
        orbit.rotate(0.0, -100_000.0, 100.0);
        orbit.update(&mut camera);
        // pinned just short of straight below the target
        assert!((camera.position.y + orbit.distance()).abs() < 1e-3);
        assert!(camera.position.x.is_finite() && camera.position.z.is_finite());
    }

    #[test]
    fn test_dolly_respects_limits() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let mut orbit = controls(&camera);
        orbit.enable_damping = false;

        orbit.dolly(1.0);
        orbit.update(&mut camera);
        assert!((camera.position.length() - 5.0 * 0.95).abs() < 1e-4);

        orbit.dolly(10_000.0);
        orbit.update(&mut camera);
        assert!((camera.position.length() - orbit.min_distance).abs() < 1e-4);
    }

    #[test]
    fn test_inverted_distance_bounds_settle_on_max() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let mut orbit = controls(&camera);
        orbit.min_distance = 10.0;
        orbit.max_distance = 3.0;
        orbit.update(&mut camera);
        assert!((camera.position.length() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_scale_distance_ignores_bad_factors() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO);
        let mut orbit = controls(&camera);
        orbit.scale_distance(0.0);
        orbit.scale_distance(f32::NAN);
        orbit.scale_distance(0.5);
        orbit.update(&mut camera);
        assert!((camera.position.length() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_pan_moves_target_sideways() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let mut orbit = controls(&camera);
        orbit.enable_damping = false;
        orbit.pan(10.0, 0.0, 500.0, &camera);
        orbit.update(&mut camera);
        // looking down -Z, dragging right moves the target towards -X
        assert!(orbit.target.x < 0.0);
        assert!(orbit.target.y.abs() < 1e-6);
        assert!((camera.position - orbit.target).abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-4));
    }

    #[test]
    fn test_reset_clears_pending_motion() {
        let mut camera = camera_at(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO);
        let mut orbit = controls(&camera);
        orbit.rotate(300.0, 50.0, 600.0);
        orbit.dolly(3.0);
        orbit.update(&mut camera);

        camera.position = Vec3::new(5.0, 2.0, 5.0);
        camera.look_at(Vec3::new(0.0, 1.0, 0.0));
        orbit.reset(&camera);
        assert!(!orbit.is_moving());

        orbit.update(&mut camera);
        assert!(camera.position.abs_diff_eq(Vec3::new(5.0, 2.0, 5.0), 1e-5));
        assert_eq!(camera.target(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-6);
        assert!(wrap_angle(TAU) < TAU);
    }
}
