//! Showroom configuration
//!
//! Every field has a default, so an empty document is a valid config.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShowroomError};
use crate::palette::{Color, ModelName};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShowroomConfig {
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub orbit: OrbitConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl ShowroomConfig {
    /// Parse a TOML document and check the values the animation loop
    /// depends on
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.orbit.validate()?;
        config.animation.validate()?;
        Ok(config)
    }
}

fn check_non_negative(section: &str, key: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ShowroomError::InvalidConfig(format!(
            "[{}] {} must be a finite, non-negative number (got {})",
            section, key, value
        )));
    }
    Ok(())
}

/// Element ids in the hosting page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Container the canvas is mounted into
    #[serde(default = "default_container_id")]
    pub container_id: String,
    /// Optional "change vehicle" button
    #[serde(default = "default_change_button_id")]
    pub change_button_id: String,
    /// Optional "reset view" button
    #[serde(default = "default_reset_button_id")]
    pub reset_button_id: String,
    /// Draw an in-canvas overlay with the current model and its own buttons
    #[serde(default)]
    pub show_overlay: bool,
    /// Model built at startup
    #[serde(default)]
    pub initial_model: ModelName,
    /// Max log level: "error", "warn", "info", "debug" or "trace"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            container_id: default_container_id(),
            change_button_id: default_change_button_id(),
            reset_button_id: default_reset_button_id(),
            show_overlay: false,
            initial_model: ModelName::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_container_id() -> String {
    "tesla-3d".to_string()
}

fn default_change_button_id() -> String {
    "change-tesla".to_string()
}

fn default_reset_button_id() -> String {
    "reset-tesla".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Camera position after every rebuild
    #[serde(default = "default_initial_position")]
    pub initial_position: [f32; 3],
    /// Point the camera looks at, and the orbit target
    #[serde(default = "default_look_at")]
    pub look_at: [f32; 3],
    /// Camera position applied by the reset action
    #[serde(default = "default_reset_position")]
    pub reset_position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            initial_position: default_initial_position(),
            look_at: default_look_at(),
            reset_position: default_reset_position(),
        }
    }
}

impl CameraConfig {
    pub fn initial_position(&self) -> Vec3 {
        Vec3::from_array(self.initial_position)
    }

    pub fn look_at(&self) -> Vec3 {
        Vec3::from_array(self.look_at)
    }

    pub fn reset_position(&self) -> Vec3 {
        Vec3::from_array(self.reset_position)
    }
}

fn default_fov() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_initial_position() -> [f32; 3] {
    [0.0, 2.0, 5.0]
}

fn default_look_at() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_reset_position() -> [f32; 3] {
    [5.0, 2.0, 5.0]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitConfig {
    #[serde(default = "default_true")]
    pub enable_damping: bool,
    /// Fraction of pending motion applied (and removed) per frame
    #[serde(default = "default_damping_factor")]
    pub damping_factor: f32,
    #[serde(default = "default_rotate_speed")]
    pub rotate_speed: f32,
    #[serde(default = "default_one")]
    pub zoom_speed: f32,
    #[serde(default = "default_one")]
    pub pan_speed: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: default_damping_factor(),
            rotate_speed: default_rotate_speed(),
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
        }
    }
}

impl OrbitConfig {
    /// Reject values the orbit update cannot work with. The damping factor
    /// is clamped into 0..=1.
    pub fn validate(&mut self) -> Result<()> {
        for (key, value) in [
            ("damping_factor", self.damping_factor),
            ("rotate_speed", self.rotate_speed),
            ("zoom_speed", self.zoom_speed),
            ("pan_speed", self.pan_speed),
            ("min_distance", self.min_distance),
            ("max_distance", self.max_distance),
        ] {
            check_non_negative("orbit", key, value)?;
        }
        if self.min_distance > self.max_distance {
            return Err(ShowroomError::InvalidConfig(format!(
                "[orbit] min_distance {} is greater than max_distance {}",
                self.min_distance, self.max_distance
            )));
        }
        self.damping_factor = self.damping_factor.min(1.0);
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_one() -> f32 {
    1.0
}

fn default_damping_factor() -> f32 {
    0.05
}

fn default_rotate_speed() -> f32 {
    0.5
}

fn default_min_distance() -> f32 {
    0.5
}

fn default_max_distance() -> f32 {
    100.0
}

/// Per-frame rotation increments, in radians. Applied once per display
/// refresh with no delta-time scaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_body_yaw_step")]
    pub body_yaw_step: f32,
    #[serde(default = "default_wheel_pitch_step")]
    pub wheel_pitch_step: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            body_yaw_step: default_body_yaw_step(),
            wheel_pitch_step: default_wheel_pitch_step(),
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("body_yaw_step", self.body_yaw_step),
            ("wheel_pitch_step", self.wheel_pitch_step),
        ] {
            if !value.is_finite() {
                return Err(ShowroomError::InvalidConfig(format!(
                    "[animation] {} must be finite (got {})",
                    key, value
                )));
            }
        }
        Ok(())
    }
}

fn default_body_yaw_step() -> f32 {
    0.005
}

fn default_wheel_pitch_step() -> f32 {
    0.01
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_true")]
    pub antialias: bool,
    /// Transparent clear so the page shows through outside the background
    #[serde(default = "default_true")]
    pub alpha: bool,
    #[serde(default = "default_true")]
    pub match_device_pixel_ratio: bool,
    #[serde(default = "default_background")]
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            alpha: true,
            match_device_pixel_ratio: true,
            background: default_background(),
        }
    }
}

fn default_background() -> Color {
    Color::from_hex(0xf0f0f0)
}
