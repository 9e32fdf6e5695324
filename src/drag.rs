//! Axis-constrained drag math.
//!
//! A drag starts by hit-testing the gizmo colliders. Each pointer movement is
//! then reduced to a signed scalar along the dragged world axis by projecting
//! the axis to screen space and measuring the movement along it.

use bevy::prelude::*;

use crate::registry::SceneRegistry;
use crate::types::GizmoAxis;
use crate::view::{Viewport, ViewportProjection};

/// A unit of world axis projecting shorter than this (in pixels) points
/// too close to the camera for a stable screen direction.
pub const MIN_SCREEN_AXIS_PIXELS: f32 = 2.0;

/// Hit-test the spawned gizmo colliders at the NDC position `ndc`.
///
/// Scene objects are ignored. Returns the axis of the nearest collider.
pub fn begin_drag(
    registry: &SceneRegistry,
    view: &impl ViewportProjection,
    ndc: Vec2,
) -> Option<GizmoAxis> {
    let ray = view.ndc_to_ray(ndc)?;
    registry.pick_collider(&ray).map(|collider| collider.axis)
}

/// Unit screen-space direction (pixels, y down) of "one unit along
/// `axis_dir` from `origin`".
///
/// `None` when either end cannot be projected or the projection is shorter
/// than [`MIN_SCREEN_AXIS_PIXELS`].
pub fn screen_axis(
    view: &impl ViewportProjection,
    viewport: &Viewport,
    origin: Vec3,
    axis_dir: Vec3,
) -> Option<Vec2> {
    let start = viewport.ndc_to_pixel(view.world_to_ndc(origin)?);
    let end = viewport.ndc_to_pixel(view.world_to_ndc(origin + axis_dir)?);
    let delta = end - start;
    if !delta.is_finite() || delta.length() < MIN_SCREEN_AXIS_PIXELS {
        return None;
    }
    Some(delta.normalize())
}

/// Convert a pointer movement (pixels, y down) into a signed drag scalar
/// along `axis`, through the current camera.
///
/// Recompute this for every movement: the camera may have moved since the
/// previous one. Returns `None` for a degenerate view, in which case the
/// caller skips the update.
pub fn project_delta(
    view: &impl ViewportProjection,
    viewport: &Viewport,
    origin: Vec3,
    axis: GizmoAxis,
    movement: Vec2,
    sensitivity: f32,
) -> Option<f32> {
    let direction = screen_axis(view, viewport, origin, axis.to_vec3())?;
    Some(movement.dot(direction) * sensitivity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gizmo::GizmoFactory;
    use crate::view::PerspectiveView;

    fn front_view() -> PerspectiveView {
        PerspectiveView::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            60f32.to_radians(),
            Viewport::new(800.0, 600.0).unwrap(),
        )
    }

    fn delta(view: &PerspectiveView, axis: GizmoAxis, movement: Vec2) -> Option<f32> {
        project_delta(view, &view.viewport(), Vec3::ZERO, axis, movement, 0.01)
    }

    #[test]
    fn horizontal_drag_along_screen_aligned_x() {
        let view = front_view();
        let scalar = delta(&view, GizmoAxis::X, Vec2::new(10.0, 0.0)).unwrap();
        assert!((scalar - 0.1).abs() < 1e-5);

        let back = delta(&view, GizmoAxis::X, Vec2::new(-10.0, 0.0)).unwrap();
        assert!((back + 0.1).abs() < 1e-5);
    }

    #[test]
    fn upward_drag_moves_along_positive_y() {
        let view = front_view();
        let scalar = delta(&view, GizmoAxis::Y, Vec2::new(0.0, -10.0)).unwrap();
        assert!((scalar - 0.1).abs() < 1e-5);
    }

    #[test]
    fn perpendicular_drag_is_zero() {
        let view = front_view();
        let scalar = delta(&view, GizmoAxis::X, Vec2::new(0.0, 25.0)).unwrap();
        assert!(scalar.abs() < 1e-5);
    }

    #[test]
    fn axis_pointing_at_camera_is_degenerate() {
        let view = front_view();
        assert!(delta(&view, GizmoAxis::Z, Vec2::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn axis_almost_pointing_at_camera_is_degenerate() {
        // Half a degree off the Z axis: Z projects to roughly a pixel.
        let view = PerspectiveView::new(
            Vec3::new(0.05, 0.0, 5.0),
            Vec3::ZERO,
            60f32.to_radians(),
            Viewport::new(800.0, 600.0).unwrap(),
        );
        let viewport = view.viewport();
        assert!(screen_axis(&view, &viewport, Vec3::ZERO, Vec3::Z).is_none());
        assert!(delta(&view, GizmoAxis::Z, Vec2::new(10.0, 0.0)).is_none());
        assert!(delta(&view, GizmoAxis::X, Vec2::new(10.0, 0.0)).is_some());
    }

    #[test]
    fn camera_motion_changes_projection() {
        let mut view = front_view();
        let viewport = view.viewport();
        let before = screen_axis(&view, &viewport, Vec3::ZERO, Vec3::X).unwrap();
        // Looking from +X, world +Z points left on screen and X collapses.
        view.look_at(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO);
        assert!(screen_axis(&view, &viewport, Vec3::ZERO, Vec3::X).is_none());
        let z = screen_axis(&view, &viewport, Vec3::ZERO, Vec3::Z).unwrap();
        assert!(z.x > 0.99 || z.x < -0.99);
        assert!(before.x > 0.99);
    }

    #[test]
    fn begin_drag_hits_only_colliders() {
        let view = front_view();
        let mut registry = SceneRegistry::new();
        registry.insert_object(crate::registry::SceneObject::cube(
            "cube",
            Vec3::ZERO,
            1.0,
            Color::WHITE,
        ));
        let on_arrow = view.world_to_ndc(Vec3::new(0.8, 0.0, 0.0)).unwrap();
        let on_cube = view.world_to_ndc(Vec3::new(-0.3, -0.3, 0.0)).unwrap();

        // Nothing spawned: the cube alone never starts a drag.
        assert_eq!(begin_drag(&registry, &view, on_cube), None);

        let mut factory = GizmoFactory::default();
        factory.spawn_move_handles(registry.selectable_mut(), Vec3::ZERO);
        assert_eq!(begin_drag(&registry, &view, on_arrow), Some(GizmoAxis::X));
        assert_eq!(begin_drag(&registry, &view, on_cube), None);
    }
}
