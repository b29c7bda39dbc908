//! Scene controller - owns the scene, camera, lights and current vehicle
//!
//! The host drives it with one `animate` call per display refresh plus the
//! `resize`, `change_vehicle` and `reset_view` actions. Everything runs on
//! one thread; each call completes before the next one starts.

use glam::Vec3;
use rand::Rng;
use tracing::{debug, error, info};

use crate::camera::{wrap_angle, OrbitControls, PerspectiveCamera};
use crate::config::ShowroomConfig;
use crate::error::{Result, ShowroomError};
use crate::palette::{BodyColor, Color, ModelName};
use crate::scene::{Light, NodeKind, Scene, Transform};
use crate::vehicle::{VehicleBlueprint, VehicleHandles};

/// Drawable region the scene is rendered into
pub trait RenderSurface {
    /// Current size in CSS pixels
    fn client_size(&self) -> (u32, u32);

    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }
}

/// Backend that turns a scene into pixels
pub trait Renderer {
    fn set_pixel_ratio(&mut self, ratio: f32);
    fn set_size(&mut self, width: u32, height: u32);
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn set_pixel_ratio(&mut self, ratio: f32) {
        (**self).set_pixel_ratio(ratio)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        (**self).set_size(width, height)
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        (**self).render(scene, camera)
    }
}

/// Ambient + directional light pair, re-added after every clear
#[derive(Debug, Clone, Copy)]
struct LightRig {
    ambient: Light,
    directional: Light,
    directional_position: Vec3,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: Light::Ambient {
                color: Color::WHITE,
                intensity: 0.6,
            },
            directional: Light::Directional {
                color: Color::WHITE,
                intensity: 0.8,
            },
            directional_position: Vec3::ONE,
        }
    }
}

impl LightRig {
    fn add_to(&self, scene: &mut Scene) {
        scene.add("ambient_light", NodeKind::Light(self.ambient), Transform::default());
        scene.add(
            "directional_light",
            NodeKind::Light(self.directional),
            Transform::from_position(self.directional_position),
        );
    }
}

/// The live vehicle: animated mesh handles and the orbit controls bound to
/// the camera. Replaced as a whole on every rebuild.
#[derive(Debug, Clone)]
pub struct CurrentVehicle {
    pub handles: VehicleHandles,
    pub controls: OrbitControls,
    pub body_color: BodyColor,
}

/// Result of a "change vehicle" action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleChange {
    pub model: ModelName,
    pub color: BodyColor,
}

pub struct SceneController<R> {
    config: ShowroomConfig,
    scene: Scene,
    camera: PerspectiveCamera,
    renderer: R,
    lights: LightRig,
    vehicle: CurrentVehicle,
    frames: u64,
}

impl<R: Renderer> SceneController<R> {
    /// Set up camera, renderer and lights for `surface` and build the default
    /// vehicle. Without a surface nothing is built and nothing is rendered.
    pub fn new<S>(surface: Option<&S>, mut renderer: R, config: ShowroomConfig) -> Result<Self>
    where
        S: RenderSurface + ?Sized,
    {
        let Some(surface) = surface else {
            error!("Render target #{} not found", config.page.container_id);
            return Err(ShowroomError::MissingRenderTarget(config.page.container_id.clone()));
        };

        let (width, height) = surface.client_size();
        let camera = PerspectiveCamera::new(
            config.camera.fov,
            PerspectiveCamera::aspect_for(width, height),
            config.camera.near,
            config.camera.far,
        );

        renderer.set_size(width, height);
        if config.render.match_device_pixel_ratio {
            renderer.set_pixel_ratio(surface.device_pixel_ratio());
        }

        let mut scene = Scene::new();
        let lights = LightRig::default();
        let vehicle = Self::build_into(&mut scene, &camera, &lights, &config, config.page.initial_model);

        let mut controller = Self {
            config,
            scene,
            camera,
            renderer,
            lights,
            vehicle,
            frames: 0,
        };
        controller.place_camera();

        info!("Showroom ready ({}x{})", width, height);
        Ok(controller)
    }

    /// Clear the scene and build a fresh vehicle. `model` is recorded but
    /// every model currently shares one geometry.
    pub fn build_vehicle(&mut self, model: ModelName) -> VehicleHandles {
        self.vehicle = Self::build_into(&mut self.scene, &self.camera, &self.lights, &self.config, model);
        self.place_camera();
        info!("Built vehicle {}", model);
        self.vehicle.handles
    }

    fn build_into(
        scene: &mut Scene,
        camera: &PerspectiveCamera,
        lights: &LightRig,
        config: &ShowroomConfig,
        model: ModelName,
    ) -> CurrentVehicle {
        scene.clear();
        lights.add_to(scene);
        let handles = VehicleBlueprint::for_model(model).spawn_into(scene);
        scene.set_background(config.render.background);

        let mut placed = camera.clone();
        placed.position = config.camera.initial_position();
        placed.look_at(config.camera.look_at());

        CurrentVehicle {
            handles,
            controls: OrbitControls::new(&placed, config.camera.look_at(), &config.orbit),
            body_color: BodyColor::DEFAULT,
        }
    }

    fn place_camera(&mut self) {
        self.camera.position = self.config.camera.initial_position();
        self.camera.look_at(self.config.camera.look_at());
    }

    /// One display-refresh step: spin body and wheels, settle the orbit
    /// controls, render once
    pub fn animate(&mut self) {
        let yaw_step = self.config.animation.body_yaw_step;
        let pitch_step = self.config.animation.wheel_pitch_step;
        let handles = self.vehicle.handles;

        if let Some(body) = self.scene.transform_mut(handles.body) {
            body.rotation.y = wrap_angle(body.rotation.y + yaw_step);
        }
        for wheel in handles.wheels {
            if let Some(t) = self.scene.transform_mut(wheel) {
                t.rotation.x = wrap_angle(t.rotation.x + pitch_step);
            }
        }

        self.vehicle.controls.update(&mut self.camera);
        self.renderer.render(&self.scene, &self.camera);
        self.frames += 1;
    }

    /// Surface size changed
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(PerspectiveCamera::aspect_for(width, height));
        self.renderer.set_size(width, height);
        debug!("Resized to {}x{}", width, height);
    }

    /// Rebuild with a random model, then repaint the body with a random
    /// palette color
    pub fn change_vehicle<G: Rng + ?Sized>(&mut self, rng: &mut G) -> VehicleChange {
        let model = ModelName::random(rng);
        let handles = self.build_vehicle(model);

        let color = BodyColor::random(rng);
        if let Some(material) = self.scene.material_mut(handles.body) {
            material.color = color.color;
        }
        self.vehicle.body_color = color;

        debug!("Changed vehicle to {} in {}", model, color.name);
        VehicleChange { model, color }
    }

    /// Move the camera to the reset position and clear the orbit state
    pub fn reset_view(&mut self) {
        self.camera.position = self.config.camera.reset_position();
        self.camera.look_at(self.config.camera.look_at());
        self.vehicle.controls.reset(&self.camera);
        debug!("View reset");
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn vehicle(&self) -> &CurrentVehicle {
        &self.vehicle
    }

    /// Orbit controls, for feeding pointer input
    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.vehicle.controls
    }

    /// Camera and controls together, for input that needs both (pan)
    pub fn camera_and_controls_mut(&mut self) -> (&PerspectiveCamera, &mut OrbitControls) {
        (&self.camera, &mut self.vehicle.controls)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn config(&self) -> &ShowroomConfig {
        &self.config
    }

    /// Number of `animate` steps run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
