//! Orbit camera used while picking objects.
//!
//! Left-drag orbits around the target and the scroll wheel zooms. The editor
//! turns the orbit off while a manipulation mode is active so that handle
//! drags never move the camera.

use std::f32::consts::FRAC_PI_2;

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseButton};
use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::controller::EditorState;

// Keep the camera off the poles so `looking_at` with up = Y stays stable.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;

/// Orbit the camera around `target`.
#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera looks at.
    pub target: Vec3,
    /// Whether pointer input currently moves the camera.
    pub enabled: bool,
    /// Radians of orbit per pixel of pointer motion.
    pub sensitivity: f32,
    /// Fraction of the distance covered per scroll line.
    pub zoom_speed: f32,
    /// Closest allowed distance to the target.
    pub min_distance: f32,
    /// Farthest allowed distance to the target.
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Orbit camera around `target` with default speeds.
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..default()
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            min_distance: 1.5,
            max_distance: 100.0,
        }
    }
}

/// New camera offset from the target after orbiting by `yaw`/`pitch`
/// radians and scaling the distance by `zoom`.
///
/// Pitch is clamped short of straight up or down; distance is clamped to
/// `[min_distance, max_distance]`.
pub fn orbit_offset(offset: Vec3, yaw: f32, pitch: f32, zoom: f32, orbit: &OrbitCamera) -> Vec3 {
    let distance = offset.length().max(1e-4);
    let current_yaw = offset.x.atan2(offset.z);
    let current_pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();

    let yaw = current_yaw + yaw;
    let pitch = (current_pitch + pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    let distance = (distance * zoom).clamp(orbit.min_distance, orbit.max_distance);

    Vec3::new(
        distance * pitch.cos() * yaw.sin(),
        distance * pitch.sin(),
        distance * pitch.cos() * yaw.cos(),
    )
}

/// Apply mouse drag and scroll to every enabled orbit camera.
pub fn orbit_camera(
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    mut cameras: Query<(&mut Transform, &OrbitCamera)>,
) {
    let drag = if buttons.pressed(MouseButton::Left) {
        motion.delta
    } else {
        Vec2::ZERO
    };
    if drag == Vec2::ZERO && scroll.delta.y == 0.0 {
        return;
    }

    for (mut transform, orbit) in &mut cameras {
        if !orbit.enabled {
            continue;
        }
        let zoom = (1.0 - scroll.delta.y * orbit.zoom_speed).max(0.1);
        let offset = orbit_offset(
            transform.translation - orbit.target,
            -drag.x * orbit.sensitivity,
            drag.y * orbit.sensitivity,
            zoom,
            orbit,
        );
        *transform =
            Transform::from_translation(orbit.target + offset).looking_at(orbit.target, Vec3::Y);
    }
}

/// Keep `OrbitCamera::enabled` in step with the editor mode.
pub fn sync_orbit_enabled(state: Res<EditorState>, mut cameras: Query<&mut OrbitCamera>) {
    let enabled = state.orbit_enabled();
    for mut orbit in &mut cameras {
        if orbit.enabled != enabled {
            orbit.enabled = enabled;
        }
    }
}
