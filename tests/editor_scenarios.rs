//! End-to-end editing sessions driven through the public API.

use bevy::prelude::*;
use bevy_gizmo_editor::{
    EditorMode, EditorSettings, EditorState, GizmoAxis, HandleRole, HandleVisual, ObjectId,
    PerspectiveView, SceneObject, StatusHint, Viewport,
};

const CENTER: Vec2 = Vec2::new(400.0, 300.0);
const EMPTY: Vec2 = Vec2::new(20.0, 20.0);

fn front_view() -> PerspectiveView {
    PerspectiveView::new(
        Vec3::new(0.0, 0.0, 5.0),
        Vec3::ZERO,
        60f32.to_radians(),
        Viewport::new(800.0, 600.0).unwrap(),
    )
}

fn editor() -> (EditorState, ObjectId) {
    let mut state = EditorState::new(EditorSettings::default());
    assert!(state.resize(800.0, 600.0));
    let id = state.insert_object(SceneObject::cube(
        "cube",
        Vec3::ZERO,
        1.0,
        Color::srgb(1.0, 0.0, 0.0),
    ));
    (state, id)
}

fn assert_handles_match_colliders(state: &EditorState) {
    let handles = state.gizmos().len();
    assert_eq!(handles, state.registry().selectable().collider_count());
    assert!(handles == 0 || handles == 3, "unexpected handle count {handles}");
    assert!(state.gizmos().is_consistent_with(state.registry().selectable()));
}

#[test]
fn select_and_move_along_x() {
    let view = front_view();
    let (mut state, id) = editor();

    state.click(&view, CENTER);
    assert_eq!(state.selection(), Some(id));
    assert_eq!(state.object(id).unwrap().color, Color::srgb(0.0, 0.0, 1.0));
    assert_eq!(state.status(), StatusHint::ChooseTool);

    assert!(state.enter_mode(EditorMode::Move));
    assert_eq!(state.gizmos().len(), 3);
    assert_eq!(state.status(), StatusHint::DragArrow);
    assert!(!state.orbit_enabled());

    let on_arrow = view.world_to_pixel(Vec3::new(0.8, 0.0, 0.0)).unwrap();
    assert_eq!(state.pointer_down(&view, on_arrow), Some(GizmoAxis::X));
    assert!(state.pointer_move(&view, Vec2::new(10.0, 0.0)));
    state.pointer_up();

    let translation = state.object(id).unwrap().transform.translation;
    assert!((translation.x - 0.1).abs() < 1e-4);
    assert!(translation.y.abs() < 1e-6);
    assert!(translation.z.abs() < 1e-6);

    // The handles were respawned at the new position.
    for (_, handle) in state.gizmos().handles() {
        let HandleVisual::Arrow { origin, .. } = handle.visual else {
            panic!("move mode spawned a ring");
        };
        assert!(origin.distance(translation) < 1e-6);
    }
    assert_handles_match_colliders(&state);
}

#[test]
fn mode_switch_waits_for_drag_end() {
    let view = front_view();
    let (mut state, _) = editor();
    state.click(&view, CENTER);
    state.enter_mode(EditorMode::Move);

    let on_arrow = view.world_to_pixel(Vec3::new(0.0, 0.8, 0.0)).unwrap();
    assert_eq!(state.pointer_down(&view, on_arrow), Some(GizmoAxis::Y));

    assert!(!state.enter_mode(EditorMode::Rotate));
    assert_eq!(state.mode(), EditorMode::Move);
    assert_eq!(state.gizmos().role(), Some(HandleRole::Translate));

    state.pointer_up();
    assert!(state.enter_mode(EditorMode::Rotate));
    assert_eq!(state.mode(), EditorMode::Rotate);
    assert_eq!(state.gizmos().role(), Some(HandleRole::Rotate));
    assert_handles_match_colliders(&state);
}

#[test]
fn miss_in_rotate_mode_returns_to_select() {
    let view = front_view();
    let (mut state, id) = editor();
    state.click(&view, CENTER);
    state.enter_mode(EditorMode::Rotate);
    assert_eq!(state.registry().selectable().collider_count(), 3);

    state.click(&view, EMPTY);
    assert_eq!(state.mode(), EditorMode::Select);
    assert_eq!(state.selection(), None);
    assert_eq!(state.object(id).unwrap().color, Color::srgb(1.0, 0.0, 0.0));
    assert!(state.gizmos().is_empty());
    assert_eq!(state.registry().selectable().collider_count(), 0);
    assert!(state.orbit_enabled());
    assert_eq!(state.status(), StatusHint::PickObject);
}

#[test]
fn mode_commands_keep_handles_and_colliders_in_step() {
    let view = front_view();
    let (mut state, _) = editor();
    let commands = [
        EditorMode::Move,
        EditorMode::Select,
        EditorMode::Rotate,
        EditorMode::Move,
        EditorMode::Move,
        EditorMode::Rotate,
        EditorMode::Select,
        EditorMode::Select,
    ];

    // Without a selection nothing spawns.
    for mode in commands {
        state.enter_mode(mode);
        assert_handles_match_colliders(&state);
        assert!(state.gizmos().is_empty());
    }

    for mode in commands {
        state.click(&view, CENTER);
        state.enter_mode(mode);
        assert_handles_match_colliders(&state);
        let expected = if mode == EditorMode::Select { 0 } else { 3 };
        assert_eq!(state.gizmos().len(), expected);
    }
}

#[test]
fn rotation_drag_accumulates_about_world_axis() {
    let view = front_view();
    let (mut state, id) = editor();
    state.click(&view, CENTER);
    state.enter_mode(EditorMode::Rotate);

    // The Z ring faces the camera; grab it away from where the other rings
    // cross the screen.
    let radius = 1.2 * std::f32::consts::FRAC_1_SQRT_2;
    let on_ring = view.world_to_pixel(Vec3::new(radius, radius, 0.0)).unwrap();
    assert_eq!(state.pointer_down(&view, on_ring), Some(GizmoAxis::Z));

    // Z points at the camera, so every step is skipped and nothing changes.
    assert!(!state.pointer_move(&view, Vec2::new(10.0, 0.0)));
    state.pointer_up();
    assert_eq!(state.object(id).unwrap().transform.rotation, Quat::IDENTITY);

    // From an oblique view the Y ring projects fine. Three small steps
    // turn the cube as far as one large step.
    let oblique = PerspectiveView::new(
        Vec3::new(4.0, 3.0, 5.0),
        Vec3::ZERO,
        60f32.to_radians(),
        Viewport::new(800.0, 600.0).unwrap(),
    );
    let angle = std::f32::consts::FRAC_PI_4;
    let on_y_ring = Vec3::new(1.2 * angle.cos(), 0.0, 1.2 * angle.sin());
    let pixel = oblique.world_to_pixel(on_y_ring).unwrap();

    assert_eq!(state.pointer_down(&oblique, pixel), Some(GizmoAxis::Y));
    for _ in 0..3 {
        assert!(state.pointer_move(&oblique, Vec2::new(0.0, -10.0)));
    }
    state.pointer_up();
    let stepped = state.object(id).unwrap().transform;

    let (mut single, single_id) = editor();
    single.click(&oblique, oblique.world_to_pixel(Vec3::ZERO).unwrap());
    single.enter_mode(EditorMode::Rotate);
    assert_eq!(single.pointer_down(&oblique, pixel), Some(GizmoAxis::Y));
    assert!(single.pointer_move(&oblique, Vec2::new(0.0, -30.0)));
    let once = single.object(single_id).unwrap().transform;

    let (rotation_axis, turned) = stepped.rotation.to_axis_angle();
    assert!(turned > 1e-3);
    assert!(rotation_axis.cross(Vec3::Y).length() < 1e-4);
    assert!(stepped.rotation.angle_between(once.rotation) < 1e-4);
    assert_eq!(stepped.translation, Vec3::ZERO);
}

#[test]
fn focus_loss_then_mode_switch() {
    let view = front_view();
    let (mut state, _) = editor();
    state.click(&view, CENTER);
    state.enter_mode(EditorMode::Move);
    let on_arrow = view.world_to_pixel(Vec3::new(0.8, 0.0, 0.0)).unwrap();
    state.pointer_down(&view, on_arrow);
    assert!(state.is_dragging());

    state.focus_lost();
    assert!(!state.is_dragging());
    assert!(state.enter_mode(EditorMode::Rotate));
}

#[test]
fn status_reports_each_change_once() {
    let view = front_view();
    let (mut state, _) = editor();

    assert_eq!(state.take_status_change(), Some(StatusHint::PickObject));
    assert_eq!(state.take_status_change(), None);

    state.click(&view, CENTER);
    assert_eq!(state.take_status_change(), Some(StatusHint::ChooseTool));
    state.click(&view, CENTER);
    assert_eq!(state.take_status_change(), None);

    state.enter_mode(EditorMode::Move);
    state.enter_mode(EditorMode::Rotate);
    assert_eq!(state.take_status_change(), Some(StatusHint::DragRing));

    state.enter_mode(EditorMode::Select);
    assert_eq!(state.take_status_change(), Some(StatusHint::PickObject));
}
