//! Scene graph - lights, meshes and background
//!
//! A flat list of nodes. Nothing is nested: the vehicle is a set of sibling
//! meshes, and rebuilding it clears the whole list.

use glam::{EulerRot, Quat, Vec3};

use crate::palette::Color;

/// Stable identifier of a node. Ids are never reused within one scene, so a
/// rebuilt vehicle always gets fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Position plus XYZ-ordered euler rotation, in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Rotation as a quaternion, applying X then Y then Z in the local frame
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

/// Primitive geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box: width (x), height (y), depth (z)
    Box { size: Vec3 },
    /// Cylinder along the local Y axis
    Cylinder { radius: f32, height: f32, segments: u32 },
}

/// Phong-style surface description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
    /// 1.0 is opaque
    pub opacity: f32,
}

impl Material {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            opacity: 1.0,
        }
    }

    pub fn with_specular(mut self, specular: Color, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Light sources
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { color: Color, intensity: f32 },
    /// Shines from the node's transform position towards the origin
    Directional { color: Color, intensity: f32 },
}

/// Node payload
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Light(Light),
    Mesh { shape: Shape, material: Material },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
}

impl Node {
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. })
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, NodeKind::Light(_))
    }

    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            NodeKind::Light(_) => None,
        }
    }
}

/// All renderable objects and lights currently eligible for rendering
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    background: Option<Color>,
    next_id: u64,
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node and return its id
    pub fn add(&mut self, name: impl Into<String>, kind: NodeKind, transform: Transform) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node {
            id,
            name: name.into(),
            kind,
            transform,
        });
        self.revision += 1;
        id
    }

    /// Remove every node, lights included
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.revision += 1;
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Transform access for per-frame animation. Does not bump the revision,
    /// the node set itself is unchanged.
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.iter_mut().find(|n| n.id == id).map(|n| &mut n.transform)
    }

    pub fn material_mut(&mut self, id: NodeId) -> Option<&mut Material> {
        let node = self.nodes.iter_mut().find(|n| n.id == id)?;
        match &mut node.kind {
            NodeKind::Mesh { material, .. } => {
                self.revision += 1;
                Some(material)
            }
            NodeKind::Light(_) => None,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_mesh())
    }

    pub fn lights(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_light())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        if self.background != Some(color) {
            self.background = Some(color);
            self.revision += 1;
        }
    }

    /// Counter bumped whenever nodes are added or removed, a material
    /// changes, or the background changes. Transforms do not count.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> NodeKind {
        NodeKind::Mesh {
            shape: Shape::Box { size: Vec3::ONE },
            material: Material::solid(Color::WHITE),
        }
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut scene = Scene::new();
        let a = scene.add("a", mesh(), Transform::default());
        scene.clear();
        assert!(scene.is_empty());
        let b = scene.add("b", mesh(), Transform::default());
        assert_ne!(a, b);
        assert!(scene.get(a).is_none());
        assert_eq!(scene.get(b).unwrap().name, "b");
    }

    #[test]
    fn test_revision_tracking() {
        let mut scene = Scene::new();
        let id = scene.add("a", mesh(), Transform::default());
        let rev = scene.revision();

        scene.transform_mut(id).unwrap().rotation.y += 1.0;
        assert_eq!(scene.revision(), rev);

        scene.material_mut(id).unwrap().color = Color::from_hex(0xe63946);
        assert!(scene.revision() > rev);

        let rev = scene.revision();
        scene.set_background(Color::from_hex(0xf0f0f0));
        scene.set_background(Color::from_hex(0xf0f0f0));
        assert_eq!(scene.revision(), rev + 1);
    }

    #[test]
    fn test_light_has_no_material() {
        let mut scene = Scene::new();
        let id = scene.add(
            "ambient",
            NodeKind::Light(Light::Ambient { color: Color::WHITE, intensity: 0.6 }),
            Transform::default(),
        );
        let rev = scene.revision();
        assert!(scene.material_mut(id).is_none());
        assert_eq!(scene.revision(), rev);
        assert_eq!(scene.lights().count(), 1);
        assert_eq!(scene.meshes().count(), 0);
    }

    #[test]
    fn test_transform_quat_order() {
        let t = Transform::default().with_rotation(Vec3::new(0.3, 0.0, std::f32::consts::FRAC_PI_2));
        let expected = Quat::from_rotation_x(0.3) * Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        assert!(t.quat().abs_diff_eq(expected, 1e-6));
    }
}
