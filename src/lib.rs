//! Select, move and rotate scene editor for Bevy 0.18.
//!
//! The editor shows a set of cubes. Clicking one selects and highlights it;
//! `M` then spawns three axis arrows and `R` three axis rings around it.
//! Dragging a handle translates or rotates the object along that world axis.
//! Clicking empty space or pressing `Escape` returns to select mode.
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_gizmo_editor::{EditorCamera, OrbitCamera, SceneEditorPlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(SceneEditorPlugin::default())
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn((
//!         Camera3d::default(),
//!         Transform::from_xyz(0.0, 6.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
//!         EditorCamera,
//!         OrbitCamera::new(Vec3::ZERO),
//!     ));
//! }
//! ```
//!
//! # Structure
//!
//! All editor logic lives in [`EditorState`], which does not touch the ECS
//! world and is driven through the [`ViewportProjection`] trait. The Bevy
//! systems only translate input, mirror the registry onto mesh entities and
//! draw the handles.
//!
//! - [`SceneRegistry`]: objects and the [`SelectableSet`] used for picking
//! - [`GizmoFactory`]: spawns and clears [`GizmoHandle`]s with colliders
//! - [`EditorSettings`]: tunables, optionally loaded from JSON
//! - [`EditorStyle`]: handle colors and line sizes

#![warn(missing_docs)]

use std::path::PathBuf;

use bevy::prelude::*;

mod camera;
mod controller;
mod drag;
mod draw;
mod gizmo;
mod hud;
mod interaction;
mod math;
mod registry;
mod scene;
mod settings;
mod transform;
mod types;
mod view;

pub use camera::{orbit_offset, OrbitCamera};
pub use controller::EditorState;
pub use drag::{begin_drag, project_delta, screen_axis, MIN_SCREEN_AXIS_PIXELS};
pub use gizmo::{Collider, ColliderShape, GizmoFactory, GizmoHandle, HandleVisual};
pub use hud::{StatusChanged, StatusText};
pub use interaction::{GizmoHover, PointerButton, PointerTracker};
pub use math::{ray_capsule_intersection, ray_obb_intersection, ray_ring_intersection};
pub use registry::{procedural_layout, SceneObject, SceneRegistry, Selectable, SelectableSet};
pub use scene::{EditorObject, ObjectMaterials};
pub use settings::{EditorSettings, HandleGeometry, SettingsError};
pub use transform::{apply_rotation, apply_translation};
pub use types::{
    AxisColors, EditorCamera, EditorMode, EditorStyle, GizmoAxis, GizmoStateColors, HandleId,
    HandleRole, ObjectId, SelectableKey, StatusHint,
};
pub use view::{CameraView, PerspectiveView, Viewport, ViewportProjection};

use crate::camera::{orbit_camera, sync_orbit_enabled};
use crate::draw::draw_handles;
use crate::hud::{publish_status, spawn_status_overlay, update_status_text};
use crate::interaction::{
    configure_gizmos, handle_mode_keys, handle_pointer, handle_window_events, init_viewport,
    update_hovered_axis,
};
use crate::scene::{spawn_scene_objects, sync_scene_objects};

/// Plugin that sets up the editor.
///
/// Spawns the procedural scene described by the settings, the status
/// overlay, and registers the input, sync and drawing systems. The app must
/// provide a camera tagged with [`EditorCamera`]; add [`OrbitCamera`] to it
/// for orbiting in select mode.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_gizmo_editor::SceneEditorPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(SceneEditorPlugin::default().with_settings_file("editor_settings.json"))
///     .run();
/// ```
#[derive(Default)]
pub struct SceneEditorPlugin {
    /// Settings used when no file is given or the file cannot be used.
    pub settings: EditorSettings,
    /// Optional JSON file overriding `settings`.
    pub settings_path: Option<PathBuf>,
}

impl SceneEditorPlugin {
    /// Load settings from `path` when the plugin is built.
    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// Settings the plugin will run with.
    ///
    /// The file, when given and usable, wins. Otherwise `settings` is used
    /// if it validates, and the built-in defaults if it does not.
    pub fn resolve_settings(&self) -> EditorSettings {
        let fallback = match self.settings.validate() {
            Ok(()) => self.settings.clone(),
            Err(err) => {
                warn!("ignoring plugin settings: {err}");
                EditorSettings::default()
            }
        };
        let Some(path) = &self.settings_path else {
            return fallback;
        };
        match EditorSettings::load(path) {
            Ok(settings) => {
                info!("loaded editor settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no settings file at {}, using defaults", path.display());
                fallback
            }
            Err(err) => {
                warn!("ignoring {}: {err}", path.display());
                fallback
            }
        }
    }
}

impl Plugin for SceneEditorPlugin {
    fn build(&self, app: &mut App) {
        let settings = self.resolve_settings();
        let object_count = settings.object_count;
        let mut state = EditorState::new(settings);
        for object in procedural_layout(object_count) {
            state.insert_object(object);
        }

        app.insert_resource(state)
            .init_resource::<EditorStyle>()
            .init_resource::<GizmoHover>()
            .add_message::<StatusChanged>()
            .add_systems(
                Startup,
                (
                    configure_gizmos,
                    init_viewport,
                    spawn_scene_objects,
                    spawn_status_overlay,
                ),
            )
            .add_systems(
                Update,
                (
                    handle_window_events,
                    handle_mode_keys,
                    handle_pointer,
                    update_hovered_axis,
                    sync_orbit_enabled,
                    orbit_camera,
                    sync_scene_objects,
                    publish_status.run_if(resource_changed::<EditorState>),
                    update_status_text,
                    draw_handles,
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_plugin_settings_fall_back_to_defaults() {
        let plugin = SceneEditorPlugin {
            settings: EditorSettings {
                object_count: 0,
                drag_sensitivity: -1.0,
                ..default()
            },
            settings_path: None,
        };
        assert_eq!(plugin.resolve_settings(), EditorSettings::default());
    }

    #[test]
    fn valid_plugin_settings_are_kept() {
        let settings = EditorSettings {
            object_count: 1,
            click_slop_px: 8.0,
            ..default()
        };
        let plugin = SceneEditorPlugin {
            settings: settings.clone(),
            settings_path: None,
        };
        assert_eq!(plugin.resolve_settings(), settings);
    }

    #[test]
    fn missing_file_keeps_plugin_settings_checked() {
        let plugin = SceneEditorPlugin {
            settings: EditorSettings {
                object_count: 0,
                ..default()
            },
            settings_path: None,
        }
        .with_settings_file("does/not/exist/editor_settings.json");
        assert_eq!(plugin.resolve_settings(), EditorSettings::default());
    }

    #[test]
    fn built_app_uses_validated_object_count() {
        let mut app = App::new();
        app.add_plugins(SceneEditorPlugin {
            settings: EditorSettings {
                object_count: 0,
                ..default()
            },
            settings_path: None,
        });
        let state = app.world().resource::<EditorState>();
        assert_eq!(state.registry().object_count(), EditorSettings::default().object_count);
    }
}
