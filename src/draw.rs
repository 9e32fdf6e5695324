//! Gizmo rendering systems.
//!
//! Handles are drawn every frame with Bevy's immediate-mode `Gizmos` API
//! from the handle set in [`EditorState`]; nothing is spawned into the
//! world for them.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::controller::EditorState;
use crate::gizmo::{ColliderShape, GizmoHandle, HandleVisual};
use crate::interaction::GizmoHover;
use crate::math::{axis_basis, circle_point};
use crate::types::{EditorStyle, HandleRole};

/// Number of line segments used to draw arrow head cones.
const CONE_SEGMENTS: usize = 16;

/// Lookup the display color for a handle based on the style and state.
fn handle_color(
    handle: &GizmoHandle,
    state: &EditorState,
    hover: &GizmoHover,
    style: &EditorStyle,
) -> Color {
    let group = match handle.role {
        HandleRole::Translate => &style.translate,
        HandleRole::Rotate => &style.rotate,
    };
    let colors = group.for_axis(handle.axis);

    if state.active_axis() == Some(handle.axis) {
        colors.active
    } else if hover.0 == Some(handle.axis) {
        colors.hover
    } else {
        colors.idle
    }
}

fn draw_arrow(
    gizmos: &mut Gizmos,
    origin: Vec3,
    direction: Vec3,
    length: f32,
    style: &EditorStyle,
    color: Color,
) {
    let direction = direction.normalize_or_zero();
    if direction.length_squared() < 1e-6 {
        return;
    }

    let cone_length = style.cone_length.min(length);
    let tip = origin + direction * length;
    let base = tip - direction * cone_length;
    gizmos.line(origin, base, color);

    let (t1, t2) = axis_basis(direction);
    for i in 0..CONE_SEGMENTS {
        let a0 = TAU * (i as f32) / (CONE_SEGMENTS as f32);
        let a1 = TAU * (i as f32 + 1.0) / (CONE_SEGMENTS as f32);
        let base0 = circle_point(base, t1, t2, style.cone_radius, a0);
        let base1 = circle_point(base, t1, t2, style.cone_radius, a1);

        gizmos.line(tip, base0, color);
        gizmos.line(base0, base1, color);
    }
}

/// Draw a full circle around `center` in the plane with normal `normal`.
fn draw_ring(
    gizmos: &mut Gizmos,
    center: Vec3,
    normal: Vec3,
    radius: f32,
    segments: usize,
    color: Color,
) {
    let (t1, t2) = axis_basis(normal);
    let steps = segments.max(3);

    let mut prev = circle_point(center, t1, t2, radius, 0.0);
    for i in 1..=steps {
        let angle = TAU * i as f32 / steps as f32;
        let point = circle_point(center, t1, t2, radius, angle);
        gizmos.line(prev, point, color);
        prev = point;
    }
}

/// Outline a collider (debugging aid).
fn draw_collider(gizmos: &mut Gizmos, shape: &ColliderShape, color: Color) {
    match *shape {
        ColliderShape::Capsule { start, end, radius } => {
            let (t1, t2) = axis_basis(end - start);
            for offset in [t1, -t1, t2, -t2] {
                gizmos.line(start + offset * radius, end + offset * radius, color);
            }
        }
        ColliderShape::Ring {
            center,
            normal,
            radius,
            thickness,
            segments,
        } => {
            draw_ring(gizmos, center, normal, radius - thickness, segments, color);
            draw_ring(gizmos, center, normal, radius + thickness, segments, color);
        }
    }
}

/// Draw the spawned handles of the editor, if any.
pub fn draw_handles(
    state: Res<EditorState>,
    hover: Res<GizmoHover>,
    style: Res<EditorStyle>,
    mut gizmos: Gizmos,
) {
    for (_, handle) in state.gizmos().handles() {
        let color = handle_color(handle, &state, &hover, &style);
        match handle.visual {
            HandleVisual::Arrow {
                origin,
                direction,
                length,
            } => draw_arrow(&mut gizmos, origin, direction, length, &style, color),
            HandleVisual::Ring {
                center,
                normal,
                radius,
                segments,
            } => draw_ring(&mut gizmos, center, normal, radius, segments, color),
        }

        if style.show_colliders {
            draw_collider(&mut gizmos, &handle.collider.shape, style.collider_color);
        }
    }
}
