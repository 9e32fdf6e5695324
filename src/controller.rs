//! The gizmo interaction controller.
//!
//! [`EditorState`] owns everything the editor mutates: the scene registry,
//! the spawned handles, the mode, the selection and the drag in progress.
//! Input systems feed it pointer and key events; it never reads input on its
//! own, so it can be driven directly in tests.

use bevy::prelude::*;

use crate::drag::{begin_drag, project_delta};
use crate::gizmo::GizmoFactory;
use crate::registry::{SceneObject, SceneRegistry};
use crate::settings::EditorSettings;
use crate::transform::{apply_rotation, apply_translation};
use crate::types::{EditorMode, GizmoAxis, HandleRole, ObjectId, StatusHint};
use crate::view::{Viewport, ViewportProjection};

/// Editor state and the select/move/rotate state machine.
#[derive(Resource)]
pub struct EditorState {
    mode: EditorMode,
    registry: SceneRegistry,
    gizmos: GizmoFactory,
    selection: Option<ObjectId>,
    active_axis: Option<GizmoAxis>,
    viewport: Viewport,
    settings: EditorSettings,
    reported_status: Option<StatusHint>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditorState {
    /// An empty editor in select mode.
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            mode: EditorMode::Select,
            registry: SceneRegistry::new(),
            gizmos: GizmoFactory::new(settings.handles.clone()),
            selection: None,
            active_axis: None,
            viewport: Viewport::default(),
            settings,
            reported_status: None,
        }
    }

    /// Add a selectable object.
    pub fn insert_object(&mut self, object: SceneObject) -> ObjectId {
        self.registry.insert_object(object)
    }

    /// Current mode.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Selected object, if any.
    pub fn selection(&self) -> Option<ObjectId> {
        self.selection
    }

    /// Axis being dragged, if a drag is in progress.
    pub fn active_axis(&self) -> Option<GizmoAxis> {
        self.active_axis
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.active_axis.is_some()
    }

    /// Scene objects and the selectable set.
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Spawned handles.
    pub fn gizmos(&self) -> &GizmoFactory {
        &self.gizmos
    }

    /// Behavior settings.
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Last accepted viewport size.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Look up an object.
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.registry.object(id)
    }

    /// The selected object, if any.
    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selection.and_then(|id| self.registry.object(id))
    }

    /// Current overlay hint.
    pub fn status(&self) -> StatusHint {
        StatusHint::for_state(self.mode, self.selection.is_some())
    }

    /// Whether the orbit camera may react to pointer drags.
    ///
    /// Orbit is disabled while handles are shown so drags go to the gizmo.
    pub fn orbit_enabled(&self) -> bool {
        self.mode == EditorMode::Select && self.active_axis.is_none()
    }

    /// Pointer position in normalized device coordinates.
    pub fn pointer_ndc(&self, cursor: Vec2) -> Vec2 {
        self.viewport.pixel_to_ndc(cursor)
    }

    /// Nearest scene object under the NDC position `ndc`. Gizmo colliders
    /// are ignored.
    pub fn pick(&self, view: &impl ViewportProjection, ndc: Vec2) -> Option<ObjectId> {
        let ray = view.ndc_to_ray(ndc)?;
        self.registry.pick_object(&ray)
    }

    /// Axis of the spawned handle under `cursor`, if any.
    pub fn handle_under(&self, view: &impl ViewportProjection, cursor: Vec2) -> Option<GizmoAxis> {
        begin_drag(&self.registry, view, self.pointer_ndc(cursor))
    }

    /// Return the overlay hint if it differs from the one last returned.
    ///
    /// Yields once per actual change; repeated calls without a change yield
    /// `None`.
    pub fn take_status_change(&mut self) -> Option<StatusHint> {
        let status = self.status();
        if self.reported_status == Some(status) {
            return None;
        }
        self.reported_status = Some(status);
        Some(status)
    }

    /// Switch mode on a mode command.
    ///
    /// `Select` exits the current mode. `Move` and `Rotate` need a selection
    /// and are ignored while a drag is in progress. Returns whether the
    /// command was applied.
    pub fn enter_mode(&mut self, mode: EditorMode) -> bool {
        let Some(role) = mode.handle_role() else {
            self.exit_mode();
            return true;
        };
        if let Some(axis) = self.active_axis {
            debug!("ignoring switch to {mode} while dragging {axis}");
            return false;
        }
        let Some(position) = self.selected_object().map(|o| o.transform.translation) else {
            debug!("ignoring switch to {mode} without a selection");
            return false;
        };

        self.gizmos
            .spawn(self.registry.selectable_mut(), role, position);
        if self.mode != mode {
            info!("mode {} -> {}", self.mode, mode);
            self.mode = mode;
        }
        true
    }

    /// Return to select mode: handles are destroyed, the drag is dropped and
    /// the selection is cleared.
    pub fn exit_mode(&mut self) {
        self.gizmos.clear_handles(self.registry.selectable_mut());
        self.active_axis = None;
        self.set_selection(None);
        if self.mode != EditorMode::Select {
            info!("mode {} -> {}", self.mode, EditorMode::Select);
            self.mode = EditorMode::Select;
        }
    }

    /// Handle a click (press and release without travel) at `cursor`.
    pub fn click(&mut self, view: &impl ViewportProjection, cursor: Vec2) {
        if self.active_axis.is_some() {
            return;
        }
        let ndc = self.pointer_ndc(cursor);
        let Some(ray) = view.ndc_to_ray(ndc) else {
            return;
        };
        debug!("click at ndc {ndc}");

        // Colliders belong to the drag gesture, not to selection.
        if self.mode != EditorMode::Select && self.registry.pick_collider(&ray).is_some() {
            return;
        }

        match self.registry.pick_object(&ray) {
            Some(id) if self.selection == Some(id) => {}
            Some(id) => {
                self.set_selection(Some(id));
                self.refresh_handles();
            }
            None if self.mode == EditorMode::Select => self.set_selection(None),
            None => self.exit_mode(),
        }
    }

    /// Pointer pressed at `cursor`: start a drag if a collider is hit.
    pub fn pointer_down(
        &mut self,
        view: &impl ViewportProjection,
        cursor: Vec2,
    ) -> Option<GizmoAxis> {
        if self.active_axis.is_some() {
            return self.active_axis;
        }
        if self.mode.handle_role().is_none() || self.selection.is_none() {
            return None;
        }
        let axis = self.handle_under(view, cursor)?;
        debug!("drag on {axis} started");
        self.active_axis = Some(axis);
        Some(axis)
    }

    /// Pointer moved by `movement` pixels during a drag.
    ///
    /// Returns whether the selected object was changed. A degenerate view
    /// skips the update.
    pub fn pointer_move(&mut self, view: &impl ViewportProjection, movement: Vec2) -> bool {
        let Some(axis) = self.active_axis else {
            return false;
        };
        let Some(role) = self.mode.handle_role() else {
            return false;
        };
        let Some(id) = self.selection else {
            return false;
        };
        let Some(origin) = self.registry.object(id).map(|o| o.transform.translation) else {
            return false;
        };

        let Some(scalar) =
            project_delta(
                view,
                &self.viewport,
                origin,
                axis,
                movement,
                self.settings.drag_sensitivity,
            )
        else {
            debug!("skipping drag step: {axis} axis is degenerate on screen");
            return false;
        };

        let radians_per_unit = self.settings.rotate_radians_per_unit;
        let Some(object) = self.registry.object_mut(id) else {
            return false;
        };
        match role {
            HandleRole::Translate => apply_translation(&mut object.transform, axis.to_vec3(), scalar),
            HandleRole::Rotate => apply_rotation(
                &mut object.transform,
                axis.to_vec3(),
                scalar,
                radians_per_unit,
            ),
        }
        self.refresh_handles();
        true
    }

    /// Pointer released: the drag ends.
    pub fn pointer_up(&mut self) {
        if let Some(axis) = self.active_axis.take() {
            debug!("drag on {axis} ended");
        }
    }

    /// Input focus lost: treated like a release so no drag gets stuck.
    pub fn focus_lost(&mut self) {
        if self.active_axis.is_some() {
            debug!("focus lost during drag");
            self.pointer_up();
        }
    }

    /// Viewport resized. Pointer pixels are converted to NDC with this
    /// size. Zero-sized resizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let resized = self.viewport.resize(width, height);
        if !resized {
            debug!("ignoring resize to {width}x{height}");
        }
        resized
    }

    fn set_selection(&mut self, selection: Option<ObjectId>) {
        if let Some(previous) = self.selection {
            self.registry.reset_color(previous);
        }
        if let Some(id) = selection {
            self.registry.highlight(id, self.settings.highlight());
            if let Some(object) = self.registry.object(id) {
                debug!("selected {}", object.name);
            }
        }
        self.selection = selection;
    }

    /// Respawn the current mode's handles at the selected object.
    fn refresh_handles(&mut self) {
        let Some(role) = self.mode.handle_role() else {
            return;
        };
        let Some(position) = self.selected_object().map(|o| o.transform.translation) else {
            return;
        };
        self.gizmos
            .spawn(self.registry.selectable_mut(), role, position);
    }
}
