//! Core types for the gizmo scene editor.
//!
//! This module contains the public types shared by the controller, the
//! gizmo factory and the Bevy systems: modes, axes, keys and the visual
//! style resource.

use bevy::prelude::*;
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Key of a [`SceneObject`](crate::SceneObject) in the scene registry.
    pub struct ObjectId;
    /// Key of a spawned [`GizmoHandle`](crate::GizmoHandle).
    pub struct HandleId;
    /// Key of an entry in the [`SelectableSet`](crate::SelectableSet).
    pub struct SelectableKey;
}

/// Interaction mode of the editor.
///
/// Exactly one mode is active at a time. `Select` is the initial mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum EditorMode {
    /// Clicking picks objects; the camera may orbit.
    #[default]
    Select,
    /// Arrow handles translate the selection along world axes.
    Move,
    /// Ring handles rotate the selection about world axes.
    Rotate,
}

impl EditorMode {
    /// The handle role spawned for this mode, if any.
    pub fn handle_role(self) -> Option<HandleRole> {
        match self {
            EditorMode::Select => None,
            EditorMode::Move => Some(HandleRole::Translate),
            EditorMode::Rotate => Some(HandleRole::Rotate),
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorMode::Select => f.write_str("Select"),
            EditorMode::Move => f.write_str("Move"),
            EditorMode::Rotate => f.write_str("Rotate"),
        }
    }
}

/// Identifies which world axis (X, Y, or Z) a gizmo handle operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoAxis {
    /// The X axis (typically red).
    X,
    /// The Y axis (typically green).
    Y,
    /// The Z axis (typically blue).
    Z,
}

impl GizmoAxis {
    /// All three axes in spawn order.
    pub const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    /// Converts the axis to its corresponding unit vector.
    pub fn to_vec3(self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }
}

impl fmt::Display for GizmoAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GizmoAxis::X => f.write_str("x"),
            GizmoAxis::Y => f.write_str("y"),
            GizmoAxis::Z => f.write_str("z"),
        }
    }
}

/// What a gizmo handle does when dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleRole {
    /// Arrow handle, translates along its axis.
    Translate,
    /// Ring handle, rotates about its axis.
    Rotate,
}

/// Instruction shown in the status overlay.
///
/// A pure function of the current mode and whether something is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusHint {
    /// Select mode with nothing selected.
    PickObject,
    /// Select mode with an object selected.
    ChooseTool,
    /// Move mode.
    DragArrow,
    /// Rotate mode.
    DragRing,
}

impl StatusHint {
    /// Derive the hint for a mode and selection state.
    pub fn for_state(mode: EditorMode, has_selection: bool) -> Self {
        match (mode, has_selection) {
            (EditorMode::Select, false) => StatusHint::PickObject,
            (EditorMode::Select, true) => StatusHint::ChooseTool,
            (EditorMode::Move, _) => StatusHint::DragArrow,
            (EditorMode::Rotate, _) => StatusHint::DragRing,
        }
    }

    /// Overlay text for this hint.
    pub fn text(self) -> &'static str {
        match self {
            StatusHint::PickObject => "pick an object",
            StatusHint::ChooseTool => "press r/m",
            StatusHint::DragArrow => "drag arrow",
            StatusHint::DragRing => "drag ring",
        }
    }
}

impl fmt::Display for StatusHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Marker component for the camera used for picking and drag projection.
///
/// Only the first camera carrying this marker is used.
#[derive(Component)]
pub struct EditorCamera;

/// Colors for a single gizmo element in different interaction states.
#[derive(Clone, Debug)]
pub struct GizmoStateColors {
    /// Color when the element is not being interacted with.
    pub idle: Color,
    /// Color when the pointer is over the element.
    pub hover: Color,
    /// Color while the element is being dragged.
    pub active: Color,
}

impl GizmoStateColors {
    /// Creates a new color set with the specified colors.
    pub fn new(idle: Color, hover: Color, active: Color) -> Self {
        Self {
            idle,
            hover,
            active,
        }
    }
}

/// Colors for each axis of a handle group.
#[derive(Clone, Debug)]
pub struct AxisColors {
    /// Colors for the X axis.
    pub x: GizmoStateColors,
    /// Colors for the Y axis.
    pub y: GizmoStateColors,
    /// Colors for the Z axis.
    pub z: GizmoStateColors,
}

impl AxisColors {
    /// Returns the colors for a specific axis.
    pub fn for_axis(&self, axis: GizmoAxis) -> &GizmoStateColors {
        match axis {
            GizmoAxis::X => &self.x,
            GizmoAxis::Y => &self.y,
            GizmoAxis::Z => &self.z,
        }
    }
}

impl Default for AxisColors {
    fn default() -> Self {
        Self {
            x: GizmoStateColors::new(
                Color::srgb(1.0, 0.0, 0.0),
                Color::srgb(1.0, 0.6, 0.6),
                Color::srgb(1.0, 1.0, 0.3),
            ),
            y: GizmoStateColors::new(
                Color::srgb(0.0, 1.0, 0.0),
                Color::srgb(0.6, 1.0, 0.6),
                Color::srgb(1.0, 1.0, 0.3),
            ),
            z: GizmoStateColors::new(
                Color::srgb(0.0, 0.3, 1.0),
                Color::srgb(0.6, 0.75, 1.0),
                Color::srgb(1.0, 1.0, 0.3),
            ),
        }
    }
}

/// Visual style of the gizmo handles.
///
/// Purely cosmetic. Handle geometry that affects hit-testing lives in
/// [`HandleGeometry`](crate::HandleGeometry).
#[derive(Resource, Clone)]
pub struct EditorStyle {
    /// Line width for handle rendering (in pixels).
    pub line_width: f32,
    /// Depth bias to draw handles on top of regular geometry.
    /// Negative values bring the handles closer to the camera.
    pub depth_bias: f32,
    /// Colors for arrow handles.
    pub translate: AxisColors,
    /// Colors for ring handles.
    pub rotate: AxisColors,
    /// Length of the arrow head cone.
    pub cone_length: f32,
    /// Radius of the arrow head cone at its base.
    pub cone_radius: f32,
    /// Whether to outline the invisible colliders (debugging aid).
    pub show_colliders: bool,
    /// Color of collider outlines.
    pub collider_color: Color,
}

impl Default for EditorStyle {
    fn default() -> Self {
        Self {
            line_width: 3.0,
            depth_bias: -1.0,
            translate: AxisColors::default(),
            rotate: AxisColors::default(),
            cone_length: 0.2,
            cone_radius: 0.06,
            show_colliders: false,
            collider_color: Color::srgba(1.0, 1.0, 1.0, 0.25),
        }
    }
}
