//! Scene editor example.
//!
//! Click a cube to select it, then press M for move arrows or R for rotate
//! rings and drag a handle. Escape or a click on empty space deselects.
//! Left-drag on empty space orbits the camera while nothing is being edited.

use bevy::prelude::*;
use bevy_gizmo_editor::{EditorCamera, OrbitCamera, SceneEditorPlugin};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(SceneEditorPlugin::default().with_settings_file("assets/editor_settings.json"))
        .add_systems(Startup, setup)
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 7.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
        EditorCamera,
        OrbitCamera::new(Vec3::ZERO),
    ));

    // Light
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 15.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Ground, just below the cubes
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(15.0)))),
        MeshMaterial3d(materials.add(Color::srgb(0.2, 0.22, 0.25))),
        Transform::from_xyz(0.0, -0.5, 0.0),
    ));
}
