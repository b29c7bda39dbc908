//! Box-based vehicle blueprint
//!
//! The car is a fixed set of primitives at constant offsets: a body box,
//! four wheel cylinders turned onto their side, and a few decorative boxes.
//! Coordinates are Y-up with the car's long axis along X.

use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

use crate::palette::{BodyColor, Color, ModelName};
use crate::scene::{Material, NodeId, NodeKind, Scene, Shape, Transform};

pub const BODY_SIZE: Vec3 = Vec3::new(4.5, 1.5, 2.0);
pub const BODY_HEIGHT: f32 = 0.75;

pub const WHEEL_RADIUS: f32 = 0.3;
pub const WHEEL_WIDTH: f32 = 0.2;
pub const WHEEL_SEGMENTS: u32 = 32;
/// Half the distance between front and rear axles
pub const WHEEL_BASE_HALF: f32 = 1.7;
/// Half the distance between left and right wheels
pub const WHEEL_TRACK_HALF: f32 = 0.7;

/// Which corner a wheel sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelCorner {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelCorner {
    pub const ALL: [WheelCorner; 4] = [
        WheelCorner::FrontLeft,
        WheelCorner::FrontRight,
        WheelCorner::RearLeft,
        WheelCorner::RearRight,
    ];

    pub fn position(self) -> Vec3 {
        let (x, z) = match self {
            WheelCorner::FrontLeft => (WHEEL_BASE_HALF, WHEEL_TRACK_HALF),
            WheelCorner::FrontRight => (-WHEEL_BASE_HALF, WHEEL_TRACK_HALF),
            WheelCorner::RearLeft => (WHEEL_BASE_HALF, -WHEEL_TRACK_HALF),
            WheelCorner::RearRight => (-WHEEL_BASE_HALF, -WHEEL_TRACK_HALF),
        };
        Vec3::new(x, WHEEL_RADIUS, z)
    }

    fn name(self) -> &'static str {
        match self {
            WheelCorner::FrontLeft => "wheel_front_left",
            WheelCorner::FrontRight => "wheel_front_right",
            WheelCorner::RearLeft => "wheel_rear_left",
            WheelCorner::RearRight => "wheel_rear_right",
        }
    }
}

/// Role of a part in the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartRole {
    Body,
    Wheel(WheelCorner),
    Headlight,
    Window,
    Logo,
}

impl PartRole {
    /// Body and wheels are animated; everything else is decoration
    pub fn is_structural(self) -> bool {
        matches!(self, PartRole::Body | PartRole::Wheel(_))
    }
}

/// One mesh of the vehicle, before it is placed in a scene
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: &'static str,
    pub role: PartRole,
    pub shape: Shape,
    pub material: Material,
    pub transform: Transform,
}

/// Full parts list for one vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleBlueprint {
    pub model: ModelName,
    body: Part,
    /// In `WheelCorner::ALL` order
    wheels: [Part; 4],
    decorations: Vec<Part>,
}

impl VehicleBlueprint {
    /// Parts list for `model`. All models currently share one geometry.
    pub fn for_model(model: ModelName) -> Self {
        let white = Material::solid(Color::WHITE);

        let body = Part {
            name: "body",
            role: PartRole::Body,
            shape: Shape::Box { size: BODY_SIZE },
            material: Material::solid(BodyColor::DEFAULT.color)
                .with_specular(Color::from_hex(0x111111), 30.0),
            transform: Transform::from_position(Vec3::new(0.0, BODY_HEIGHT, 0.0)),
        };

        let wheels = WheelCorner::ALL.map(|corner| Part {
            name: corner.name(),
            role: PartRole::Wheel(corner),
            shape: Shape::Cylinder {
                radius: WHEEL_RADIUS,
                height: WHEEL_WIDTH,
                segments: WHEEL_SEGMENTS,
            },
            material: Material::solid(Color::from_hex(0x333333)),
            transform: Transform::from_position(corner.position())
                .with_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2)),
        });

        let mut decorations = Vec::with_capacity(4);
        let headlight = Shape::Box { size: Vec3::new(0.3, 0.2, 0.1) };
        for (name, z) in [("headlight_left", 0.5), ("headlight_right", -0.5)] {
            decorations.push(Part {
                name,
                role: PartRole::Headlight,
                shape: headlight,
                material: white,
                transform: Transform::from_position(Vec3::new(2.2, 0.8, z)),
            });
        }

        decorations.push(Part {
            name: "windows",
            role: PartRole::Window,
            shape: Shape::Box { size: Vec3::new(4.0, 0.8, 0.1) },
            material: Material::solid(Color::from_hex(0x000033)).with_opacity(0.6),
            transform: Transform::from_position(Vec3::new(0.0, 1.1, 0.0)),
        });

        decorations.push(Part {
            name: "logo",
            role: PartRole::Logo,
            shape: Shape::Box { size: Vec3::new(0.3, 0.1, 0.6) },
            material: white,
            transform: Transform::from_position(Vec3::new(-0.1, 1.2, 0.0)),
        });

        Self { model, body, wheels, decorations }
    }

    /// Insert every part into `scene` and return handles to the structural
    /// meshes. Decorative meshes are placed but not tracked.
    pub fn spawn_into(&self, scene: &mut Scene) -> VehicleHandles {
        let body = add_part(scene, &self.body);
        let wheels = self.wheels.each_ref().map(|part| add_part(scene, part));
        for part in &self.decorations {
            add_part(scene, part);
        }

        VehicleHandles {
            model: self.model,
            body,
            wheels,
        }
    }
}

fn add_part(scene: &mut Scene, part: &Part) -> NodeId {
    scene.add(
        part.name,
        NodeKind::Mesh {
            shape: part.shape,
            material: part.material,
        },
        part.transform,
    )
}

/// Handles to the meshes the animation loop mutates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleHandles {
    pub model: ModelName,
    pub body: NodeId,
    /// Front-left, front-right, rear-left, rear-right
    pub wheels: [NodeId; 4],
}

impl VehicleHandles {
    pub fn structural(&self) -> [NodeId; 5] {
        let [fl, fr, rl, rr] = self.wheels;
        [self.body, fl, fr, rl, rr]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(bp: &VehicleBlueprint) -> impl Iterator<Item = &Part> {
        std::iter::once(&bp.body)
            .chain(bp.wheels.iter())
            .chain(bp.decorations.iter())
    }

    #[test]
    fn test_part_counts() {
        let bp = VehicleBlueprint::for_model(ModelName::Model3);
        assert_eq!(parts(&bp).count(), 9);
        assert_eq!(parts(&bp).filter(|p| p.role.is_structural()).count(), 5);
        assert_eq!(parts(&bp).filter(|p| p.role == PartRole::Headlight).count(), 2);
    }

    #[test]
    fn test_model_does_not_change_geometry() {
        let a = VehicleBlueprint::for_model(ModelName::Model3);
        let b = VehicleBlueprint::for_model(ModelName::ModelX);
        assert!(parts(&a).eq(parts(&b)));
        assert_ne!(a.model, b.model);
    }

    #[test]
    fn test_wheels_mirror_across_axes() {
        let positions: Vec<Vec3> = WheelCorner::ALL.iter().map(|c| c.position()).collect();
        for p in &positions {
            assert!(positions.iter().any(|q| (*q - Vec3::new(-p.x, p.y, p.z)).length() < 1e-6));
            assert!(positions.iter().any(|q| (*q - Vec3::new(p.x, p.y, -p.z)).length() < 1e-6));
        }
    }

    #[test]
    fn test_window_is_translucent() {
        let bp = VehicleBlueprint::for_model(ModelName::ModelS);
        let window = parts(&bp).find(|p| p.role == PartRole::Window).unwrap();
        assert!(window.material.is_transparent());
        assert!((window.material.opacity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_handles_resolve() {
        let mut scene = Scene::new();
        let handles = VehicleBlueprint::for_model(ModelName::ModelY).spawn_into(&mut scene);
        assert_eq!(scene.len(), 9);
        assert_eq!(handles.model, ModelName::ModelY);
        assert_eq!(scene.get(handles.body).unwrap().name, "body");
        for (corner, id) in WheelCorner::ALL.iter().zip(handles.wheels) {
            let node = scene.get(id).unwrap();
            assert_eq!(node.name, corner.name());
            assert_eq!(node.transform.position, corner.position());
        }

        // a second vehicle in the same scene gets its own handles
        let again = VehicleBlueprint::for_model(ModelName::ModelY).spawn_into(&mut scene);
        assert_eq!(scene.len(), 18);
        for id in again.structural() {
            assert!(!handles.structural().contains(&id));
        }
    }
}
