//! Bevy application setup

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;
use strider_core::config::Tunables;
use strider_scene::StriderScenePlugin;

/// Run the Bevy application
pub fn run(tunables: Tunables) {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.06, 0.07, 0.09)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Strider".to_string(),
                        canvas: Some("#strider-canvas".to_string()),
                        fit_canvas_to_parent: true,
                        // Keep the page from scrolling or zooming under drags
                        prevent_default_event_handling: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Static hosting has no .meta files
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // egui hooks into picking, so it goes after DefaultPickingPlugins
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .add_plugins(StriderScenePlugin::new(tunables))
        .run();
}
