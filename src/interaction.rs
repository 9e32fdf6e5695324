//! Input handling.
//!
//! These systems translate Bevy input into [`EditorState`] calls: mode keys,
//! pointer press/move/release, window resize and focus changes, and the
//! hover highlight.

use std::ops::DerefMut;

use bevy::gizmos::config::{DefaultGizmoConfigGroup, GizmoConfigStore};
use bevy::input::mouse::MouseButton;
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::controller::EditorState;
use crate::types::{EditorCamera, EditorMode, EditorStyle, GizmoAxis};
use crate::view::{CameraView, ViewportProjection};

/// Axis of the handle under the pointer, if any, while not dragging.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GizmoHover(pub Option<GizmoAxis>);

/// Left button edges seen in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerButton {
    /// Pressed this frame.
    pub just_pressed: bool,
    /// Held down.
    pub pressed: bool,
    /// Released this frame.
    pub just_released: bool,
}

impl PointerButton {
    /// Read the left mouse button.
    pub fn left(buttons: &ButtonInput<MouseButton>) -> Self {
        Self {
            just_pressed: buttons.just_pressed(MouseButton::Left),
            pressed: buttons.pressed(MouseButton::Left),
            just_released: buttons.just_released(MouseButton::Left),
        }
    }
}

/// Pointer positions remembered between frames.
#[derive(Debug, Default)]
pub struct PointerTracker {
    press: Option<Vec2>,
    last: Option<Vec2>,
}

impl PointerTracker {
    /// Feed one frame of pointer input to the editor.
    ///
    /// A press starts a drag when it lands on a handle. Only motion after
    /// the press moves the dragged object. A release ends the drag, and
    /// counts as a click when the pointer stayed within the click slop since
    /// the press.
    pub fn update<S>(
        &mut self,
        mut state: S,
        view: &impl ViewportProjection,
        cursor: Option<Vec2>,
        button: PointerButton,
    ) where
        S: DerefMut<Target = EditorState>,
    {
        if button.just_pressed {
            self.press = cursor;
            self.last = cursor;
            if let Some(cursor) = cursor {
                state.pointer_down(view, cursor);
            }
        }

        let movement = match (self.last, cursor) {
            (Some(last), Some(now)) => now - last,
            _ => Vec2::ZERO,
        };
        self.last = cursor;

        if (button.pressed || button.just_released)
            && movement != Vec2::ZERO
            && state.is_dragging()
        {
            state.pointer_move(view, movement);
        }

        if button.just_released {
            if state.is_dragging() {
                state.pointer_up();
            }
            if let (Some(start), Some(end)) = (self.press.take(), cursor) {
                if start.distance(end) <= state.settings().click_slop_px {
                    state.click(view, end);
                }
            }
        }
    }
}

/// Configure Bevy's built-in gizmo renderer using our style resource.
pub fn configure_gizmos(
    mut config_store: ResMut<GizmoConfigStore>,
    style: Res<EditorStyle>,
) {
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    config.line.width = style.line_width;
    config.depth_bias = style.depth_bias;
}

/// Seed the editor viewport from the primary window.
pub fn init_viewport(
    mut state: ResMut<EditorState>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some(window) = windows.iter().next() else {
        return;
    };
    state.resize(window.width(), window.height());
}

/// `M` enters move mode, `R` rotate mode and `Escape` returns to select.
pub fn handle_mode_keys(keys: Res<ButtonInput<KeyCode>>, mut state: ResMut<EditorState>) {
    if keys.just_pressed(KeyCode::KeyM) {
        state.enter_mode(EditorMode::Move);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        state.enter_mode(EditorMode::Rotate);
    }
    if keys.just_pressed(KeyCode::Escape) {
        state.enter_mode(EditorMode::Select);
    }
}

/// Forward resize events and end drags when the window loses focus.
pub fn handle_window_events(
    mut resized: MessageReader<WindowResized>,
    mut state: ResMut<EditorState>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    for event in resized.read() {
        state.resize(event.width, event.height);
    }

    let Some(window) = windows.iter().next() else {
        return;
    };
    if !window.focused && state.is_dragging() {
        state.focus_lost();
    }
}

/// Drive press, drag and click from the left mouse button.
pub fn handle_pointer(
    buttons: Res<ButtonInput<MouseButton>>,
    mut state: ResMut<EditorState>,
    mut tracker: Local<PointerTracker>,
    cameras: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some((camera, camera_transform)) = cameras.iter().next() else {
        return;
    };
    let Some(window) = windows.iter().next() else {
        return;
    };
    let view = CameraView::new(camera, camera_transform);
    tracker.update(
        state.reborrow(),
        &view,
        window.cursor_position(),
        PointerButton::left(&buttons),
    );
}

/// Determine which handle (if any) is under the pointer.
pub fn update_hovered_axis(
    state: Res<EditorState>,
    mut hover: ResMut<GizmoHover>,
    cameras: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    // The dragged handle is drawn with its active color instead.
    let axis = if state.is_dragging() || state.gizmos().is_empty() {
        None
    } else {
        hovered_axis(&state, &cameras, &windows)
    };
    if hover.0 != axis {
        hover.0 = axis;
    }
}

fn hovered_axis(
    state: &EditorState,
    cameras: &Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    windows: &Query<&Window, With<PrimaryWindow>>,
) -> Option<GizmoAxis> {
    let (camera, camera_transform) = cameras.iter().next()?;
    let cursor = windows.iter().next()?.cursor_position()?;
    state.handle_under(&CameraView::new(camera, camera_transform), cursor)
}
