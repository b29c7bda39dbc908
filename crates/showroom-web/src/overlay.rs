//! Optional in-canvas overlay showing the current vehicle, with its own
//! change/reset buttons

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};
use bevy_picking::DefaultPickingPlugins;

use crate::actions::{ActionQueue, ViewerAction};
use crate::controls::PointerCaptured;
use crate::scene::Showroom;

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        // Picking must be added BEFORE EguiPlugin so it can detect PickingPlugin
        app.add_plugins(DefaultPickingPlugins)
            .add_plugins(EguiPlugin::default())
            .add_systems(EguiPrimaryContextPass, draw_overlay);
    }
}

fn draw_overlay(
    mut contexts: EguiContexts,
    showroom: Res<Showroom>,
    queue: Res<ActionQueue>,
    mut captured: ResMut<PointerCaptured>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let vehicle = showroom.0.vehicle();
    let [r, g, b] = vehicle.body_color.color.rgb_u8();

    egui::Window::new("showroom")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(vehicle.handles.model.slug()).strong());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("■").color(egui::Color32::from_rgb(r, g, b)));
                ui.label(vehicle.body_color.name);
            });
            ui.horizontal(|ui| {
                if ui.button("Change").clicked() {
                    queue.push(ViewerAction::ChangeVehicle);
                }
                if ui.button("Reset view").clicked() {
                    queue.push(ViewerAction::ResetView);
                }
            });
        });

    captured.0 = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
    Ok(())
}
