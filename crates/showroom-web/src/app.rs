//! Bevy application setup

use bevy::prelude::*;
use bevy::winit::WinitSettings;
use showroom_core::{SceneController, ShowroomConfig};

use crate::actions::{ActionQueue, ViewerAction};
use crate::dom::DomSurface;
use crate::overlay::OverlayPlugin;
use crate::render::{to_bevy_color, BevyRenderer};
use crate::scene::{ScenePlugin, Showroom};

/// Mount the viewer into the page and run the Bevy application. Returns
/// without starting anything if the container is missing.
pub fn run(config: ShowroomConfig) {
    let Some(surface) = DomSurface::find(&config.page.container_id) else {
        tracing::error!("Render target #{} not found", config.page.container_id);
        return;
    };

    let controller = match SceneController::new(Some(&surface), BevyRenderer::default(), config.clone()) {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!("Showroom not started: {}", e);
            return;
        }
    };

    let canvas = match surface.attach_canvas() {
        Ok(selector) => selector,
        Err(e) => {
            tracing::error!("Failed to create canvas: {:?}", e);
            return;
        }
    };

    let queue = ActionQueue::default();
    surface.wire_button(&config.page.change_button_id, &queue, ViewerAction::ChangeVehicle);
    surface.wire_button(&config.page.reset_button_id, &queue, ViewerAction::ResetView);

    tracing::info!("Mounting showroom into #{}", config.page.container_id);

    let mut app = App::new();
    app.insert_resource(ClearColor(to_bevy_color(config.render.background)))
        // Continuous rendering: the car never stops turning
        .insert_resource(WinitSettings::default())
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Showroom".to_string(),
                canvas: Some(canvas),
                fit_canvas_to_parent: true,
                // Keep wheel and drag gestures from scrolling the page
                prevent_default_event_handling: true,
                transparent: config.render.alpha,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Showroom(controller))
        .insert_resource(queue)
        .add_plugins(ScenePlugin);

    if config.page.show_overlay {
        app.add_plugins(OverlayPlugin);
    }

    app.run();
}
