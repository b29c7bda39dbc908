//! 3D scene management - drives the controller and mirrors its scene graph
//! into Bevy entities

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use showroom_core::{NodeId, NodeKind, SceneController};

use crate::actions::{ActionQueue, ViewerAction};
use crate::controls::{orbit_input, PointerCaptured};
use crate::render::{
    ambient_light, directional_light, mesh_for_shape, standard_material, to_bevy_color,
    to_bevy_transform, BevyRenderer,
};

/// The scene controller, owned by the Bevy world
#[derive(Resource)]
pub struct Showroom(pub SceneController<BevyRenderer>);

/// Links an entity to the scene node it mirrors
#[derive(Component)]
pub struct MirroredNode(pub NodeId);

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Scene revision currently spawned as entities
#[derive(Resource, Default)]
struct MirrorState {
    revision: Option<u64>,
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MirrorState>()
            .init_resource::<PointerCaptured>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, (
                handle_resize,
                orbit_input,
                apply_actions,
                animate,
                rebuild_mirror,
                sync_transforms,
                sync_camera,
            ).chain());
    }
}

fn setup_camera(mut commands: Commands, showroom: Res<Showroom>) {
    let controller = &showroom.0;
    let camera = controller.camera();
    let msaa = if controller.config().render.antialias {
        Msaa::Sample4
    } else {
        Msaa::Off
    };

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov.to_radians(),
            aspect_ratio: camera.aspect,
            near: camera.near,
            far: camera.far,
            ..default()
        }),
        msaa,
        camera_transform(camera),
        MainCamera,
    ));
}

fn camera_transform(camera: &showroom_core::PerspectiveCamera) -> Transform {
    let position = Vec3::from_array(camera.position.to_array());
    let target = Vec3::from_array(camera.target().to_array());
    Transform::from_translation(position).looking_at(target, Vec3::Y)
}

/// Forward canvas size changes to the controller, once per actual change
fn handle_resize(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut showroom: ResMut<Showroom>,
    mut last_size: Local<Option<(u32, u32)>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = (window.width().round() as u32, window.height().round() as u32);
    if *last_size == Some(size) {
        return;
    }
    *last_size = Some(size);
    showroom.0.resize(size.0, size.1);
}

/// Apply actions queued by the page buttons and the overlay
fn apply_actions(queue: Res<ActionQueue>, mut showroom: ResMut<Showroom>) {
    for action in queue.drain() {
        match action {
            ViewerAction::ChangeVehicle => {
                let change = showroom.0.change_vehicle(&mut rand::thread_rng());
                tracing::info!("Showing {} in {}", change.model, change.color.name);
            }
            ViewerAction::ResetView => showroom.0.reset_view(),
        }
    }
}

/// One animation step per frame; winit on the web schedules frames with
/// requestAnimationFrame
fn animate(mut showroom: ResMut<Showroom>) {
    showroom.0.animate();
}

/// Respawn every mirrored entity when the scene revision moves on
fn rebuild_mirror(
    mut commands: Commands,
    showroom: Res<Showroom>,
    mut state: ResMut<MirrorState>,
    mirrored: Query<Entity, With<MirroredNode>>,
    camera: Query<Entity, With<MainCamera>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut clear_color: ResMut<ClearColor>,
) {
    let controller = &showroom.0;
    let Some(revision) = controller.renderer().submitted_revision() else {
        return;
    };
    if state.revision == Some(revision) {
        return;
    }

    for entity in &mirrored {
        commands.entity(entity).despawn();
    }

    let scene = controller.scene();
    if let Some(background) = scene.background() {
        clear_color.0 = to_bevy_color(background);
    }

    for node in scene.nodes() {
        let transform = to_bevy_transform(node.transform);
        match &node.kind {
            NodeKind::Mesh { shape, material } => {
                commands.spawn((
                    Mesh3d(meshes.add(mesh_for_shape(shape))),
                    MeshMaterial3d(materials.add(standard_material(material))),
                    transform,
                    Name::new(node.name.clone()),
                    MirroredNode(node.id),
                ));
            }
            NodeKind::Light(light) => {
                if let Some(directional) = directional_light(light) {
                    commands.spawn((
                        directional,
                        Transform::from_translation(transform.translation)
                            .looking_at(Vec3::ZERO, Vec3::Y),
                        Name::new(node.name.clone()),
                        MirroredNode(node.id),
                    ));
                } else if let Some(ambient) = ambient_light(light) {
                    // Ambient light is per camera
                    if let Ok(camera) = camera.single() {
                        commands.entity(camera).insert(ambient);
                    }
                }
            }
        }
    }

    tracing::debug!("Mirrored scene revision {} ({} nodes)", revision, scene.len());
    state.revision = Some(revision);
}

/// Copy animated mesh transforms from the controller
fn sync_transforms(
    showroom: Res<Showroom>,
    mut mirrored: Query<(&MirroredNode, &mut Transform), Without<DirectionalLight>>,
) {
    let scene = showroom.0.scene();
    for (link, mut transform) in &mut mirrored {
        if let Some(node) = scene.get(link.0) {
            *transform = to_bevy_transform(node.transform);
        }
    }
}

fn sync_camera(
    showroom: Res<Showroom>,
    mut camera: Query<(&mut Transform, &mut Projection), (With<MainCamera>, Without<MirroredNode>)>,
) {
    let Ok((mut transform, mut projection)) = camera.single_mut() else {
        return;
    };
    let state = showroom.0.camera();
    *transform = camera_transform(state);
    if let Projection::Perspective(perspective) = projection.as_mut() {
        perspective.fov = state.fov.to_radians();
        perspective.aspect_ratio = state.aspect;
    }
}
