//! Pointer input for the orbit controls

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::scene::Showroom;

/// Pixels of pixel-unit scrolling that count as one wheel notch
const PIXELS_PER_LINE: f32 = 100.0;

/// Set by the overlay while egui owns the pointer
#[derive(Resource, Default)]
pub struct PointerCaptured(pub bool);

/// Feed mouse and touch input into the orbit controls. The controls apply
/// it, damped, during the next animation step.
pub fn orbit_input(
    mut showroom: ResMut<Showroom>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    captured: Res<PointerCaptured>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    if captured.0 {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let height = window.height();
    let delta = motion.delta;

    // Orbit with left mouse drag
    if mouse_button.pressed(MouseButton::Left) && delta != Vec2::ZERO {
        showroom.0.controls_mut().rotate(delta.x, delta.y, height);
    }

    // Pan with right mouse drag
    if mouse_button.pressed(MouseButton::Right) && delta != Vec2::ZERO {
        let (camera, controls) = showroom.0.camera_and_controls_mut();
        controls.pan(delta.x, delta.y, height, camera);
    }

    // Zoom with scroll
    if scroll.delta.y != 0.0 {
        let steps = match scroll.unit {
            MouseScrollUnit::Line => scroll.delta.y,
            MouseScrollUnit::Pixel => scroll.delta.y / PIXELS_PER_LINE,
        };
        showroom.0.controls_mut().dolly(steps);
    }

    // One finger orbits
    if touch_input.iter().count() == 1 {
        for touch in touch_input.iter() {
            let delta = touch.delta();
            if delta != Vec2::ZERO {
                showroom.0.controls_mut().rotate(delta.x, delta.y, height);
            }
        }
    }

    // Pinch to zoom
    if touch_input.iter().count() == 2 {
        let touches: Vec<_> = touch_input.iter().collect();
        if let (Some(t1), Some(t2)) = (touches.first(), touches.get(1)) {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            showroom.0.controls_mut().scale_distance(prev_dist / curr_dist.max(1.0));
        }
    }
}
