//! Bevy side of the renderer: frame bookkeeping plus conversion of scene
//! nodes into Bevy meshes, materials and lights

use bevy::prelude::*;
use showroom_core::{Light, Material as SurfaceMaterial, PerspectiveCamera, Renderer, Scene, Shape};

/// Lux per unit of directional light intensity
const DIRECTIONAL_ILLUMINANCE: f32 = 10_000.0;
/// Ambient brightness per unit of ambient light intensity
const AMBIENT_BRIGHTNESS: f32 = 800.0;

/// Renderer handed to the scene controller. Bevy draws on its own after the
/// update schedule; `render` records which scene revision the frame showed so
/// the mirror knows when to respawn entities.
#[derive(Debug, Default)]
pub struct BevyRenderer {
    submitted_revision: Option<u64>,
}

impl BevyRenderer {
    pub fn submitted_revision(&self) -> Option<u64> {
        self.submitted_revision
    }
}

impl Renderer for BevyRenderer {
    fn set_pixel_ratio(&mut self, ratio: f32) {
        // Bevy follows the window scale factor itself
        tracing::debug!("Device pixel ratio {}", ratio);
    }

    fn set_size(&mut self, width: u32, height: u32) {
        // The canvas is fit to its parent; Bevy resizes the surface to match
        tracing::debug!("Render size {}x{}", width, height);
    }

    fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera) {
        self.submitted_revision = Some(scene.revision());
    }
}

pub fn to_bevy_color(color: showroom_core::Color) -> Color {
    let [r, g, b] = color.rgb_u8();
    Color::srgb_u8(r, g, b)
}

/// Blinn-Phong exponent to perceptual roughness, via the GGX alpha that
/// gives a similar highlight
pub fn roughness_from_shininess(shininess: f32) -> f32 {
    let alpha = (2.0 / (shininess.max(0.0) + 2.0)).sqrt();
    alpha.sqrt().clamp(0.089, 1.0)
}

/// Phong specular color to Bevy reflectance (F0 = 0.16 * reflectance²)
pub fn reflectance_from_specular(specular: showroom_core::Color) -> f32 {
    let f0 = specular.rgb_f32().into_iter().fold(0.0f32, f32::max);
    (f0 / 0.16).sqrt().min(1.0)
}

pub fn standard_material(material: &SurfaceMaterial) -> StandardMaterial {
    let [r, g, b] = material.color.rgb_f32();
    StandardMaterial {
        base_color: Color::srgba(r, g, b, material.opacity),
        perceptual_roughness: roughness_from_shininess(material.shininess),
        reflectance: reflectance_from_specular(material.specular),
        alpha_mode: if material.is_transparent() {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        ..default()
    }
}

pub fn mesh_for_shape(shape: &Shape) -> Mesh {
    match *shape {
        Shape::Box { size } => Cuboid::new(size.x, size.y, size.z).into(),
        Shape::Cylinder { radius, height, segments } => Cylinder::new(radius, height)
            .mesh()
            .resolution(segments)
            .build(),
    }
}

pub fn directional_light(light: &Light) -> Option<DirectionalLight> {
    match *light {
        Light::Directional { color, intensity } => Some(DirectionalLight {
            color: to_bevy_color(color),
            illuminance: intensity * DIRECTIONAL_ILLUMINANCE,
            shadows_enabled: false,
            ..default()
        }),
        Light::Ambient { .. } => None,
    }
}

pub fn ambient_light(light: &Light) -> Option<AmbientLight> {
    match *light {
        Light::Ambient { color, intensity } => Some(AmbientLight {
            color: to_bevy_color(color),
            brightness: intensity * AMBIENT_BRIGHTNESS,
            ..default()
        }),
        Light::Directional { .. } => None,
    }
}

pub fn to_bevy_transform(t: showroom_core::Transform) -> Transform {
    Transform {
        translation: Vec3::from_array(t.position.to_array()),
        rotation: Quat::from_array(t.quat().to_array()),
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showroom_core::{NodeKind, Transform as NodeTransform};

    #[test]
    fn test_color_conversion() {
        let c = to_bevy_color(showroom_core::Color::from_hex(0xe63946)).to_srgba();
        assert!((c.red - 0xe6 as f32 / 255.0).abs() < 1e-6);
        assert!((c.green - 0x39 as f32 / 255.0).abs() < 1e-6);
        assert!((c.blue - 0x46 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(c.alpha, 1.0);
    }

    #[test]
    fn test_material_conversion() {
        let glass = SurfaceMaterial::solid(showroom_core::Color::from_hex(0x000033)).with_opacity(0.6);
        let m = standard_material(&glass);
        assert!(matches!(m.alpha_mode, AlphaMode::Blend));
        assert!((m.base_color.alpha() - 0.6).abs() < 1e-6);

        let paint = SurfaceMaterial::solid(showroom_core::Color::from_hex(0x1a3a6c));
        let m = standard_material(&paint);
        assert!(matches!(m.alpha_mode, AlphaMode::Opaque));
        assert!((m.perceptual_roughness - 0.5).abs() < 1e-6);
        assert!(m.reflectance > 0.5 && m.reflectance < 0.7);
    }

    #[test]
    fn test_roughness_is_monotonic() {
        assert!(roughness_from_shininess(100.0) < roughness_from_shininess(30.0));
        assert!(roughness_from_shininess(30.0) < roughness_from_shininess(1.0));
        assert_eq!(roughness_from_shininess(0.0), 1.0);
    }

    #[test]
    fn test_lights_split_by_kind() {
        let ambient = Light::Ambient { color: showroom_core::Color::WHITE, intensity: 0.6 };
        let sun = Light::Directional { color: showroom_core::Color::WHITE, intensity: 0.8 };
        assert!(directional_light(&ambient).is_none());
        assert!(ambient_light(&sun).is_none());
        assert!((directional_light(&sun).unwrap().illuminance - 8_000.0).abs() < 1e-3);
        assert!((ambient_light(&ambient).unwrap().brightness - 480.0).abs() < 1e-3);
    }

    #[test]
    fn test_wheel_transform_conversion() {
        let t = NodeTransform::from_position(showroom_core::glam::Vec3::new(1.7, 0.3, 0.7))
            .with_rotation(showroom_core::glam::Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2));
        let bevy_t = to_bevy_transform(t);
        assert_eq!(bevy_t.translation, Vec3::new(1.7, 0.3, 0.7));
        // the cylinder axis (local Y) ends up along -X
        let axis = bevy_t.rotation * Vec3::Y;
        assert!(axis.abs_diff_eq(Vec3::NEG_X, 1e-6));
    }

    #[test]
    fn test_renderer_records_revision() {
        let mut renderer = BevyRenderer::default();
        let mut scene = Scene::new();
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        assert_eq!(renderer.submitted_revision(), None);

        scene.add(
            "ambient_light",
            NodeKind::Light(Light::Ambient { color: showroom_core::Color::WHITE, intensity: 0.6 }),
            NodeTransform::default(),
        );
        renderer.render(&scene, &camera);
        assert_eq!(renderer.submitted_revision(), Some(scene.revision()));

        scene.clear();
        renderer.render(&scene, &camera);
        assert_eq!(renderer.submitted_revision(), Some(scene.revision()));
    }
}
