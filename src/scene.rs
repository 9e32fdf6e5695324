//! Scene entities mirroring the registry.
//!
//! Each [`SceneObject`](crate::SceneObject) gets a mesh entity at startup.
//! Afterwards the registry is the source of truth: poses and highlight
//! state are copied onto the entities whenever the editor state changes.

use bevy::prelude::*;

use crate::controller::EditorState;
use crate::types::ObjectId;

/// Marks the mesh entity of a registry object.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorObject(pub ObjectId);

/// Materials an object entity switches between.
#[derive(Component, Debug, Clone)]
pub struct ObjectMaterials {
    /// Material in the object's own color.
    pub base: Handle<StandardMaterial>,
    /// Shared selection highlight.
    pub highlight: Handle<StandardMaterial>,
}

impl ObjectMaterials {
    fn pick(&self, highlighted: bool) -> &Handle<StandardMaterial> {
        if highlighted {
            &self.highlight
        } else {
            &self.base
        }
    }
}

/// Spawn a cuboid entity for every registry object.
pub fn spawn_scene_objects(
    mut commands: Commands,
    state: Res<EditorState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let highlight = materials.add(state.settings().highlight());

    for (id, object) in state.registry().objects() {
        let object_materials = ObjectMaterials {
            base: materials.add(object.base_color),
            highlight: highlight.clone(),
        };
        let highlighted = state.selection() == Some(id);
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(object.half_extents * 2.0))),
            MeshMaterial3d(object_materials.pick(highlighted).clone()),
            object.transform,
            Name::new(object.name.clone()),
            EditorObject(id),
            object_materials,
        ));
    }

    debug!("spawned {} scene objects", state.registry().object_count());
}

/// Copy poses and highlight state from the registry onto the entities.
pub fn sync_scene_objects(
    state: Res<EditorState>,
    mut objects: Query<(
        &EditorObject,
        &ObjectMaterials,
        &mut Transform,
        &mut MeshMaterial3d<StandardMaterial>,
    )>,
) {
    if !state.is_changed() {
        return;
    }

    for (object, materials, mut transform, mut material) in &mut objects {
        let Some(source) = state.object(object.0) else {
            continue;
        };
        if *transform != source.transform {
            *transform = source.transform;
        }

        let wanted = materials.pick(state.selection() == Some(object.0));
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SceneObject;

    #[test]
    fn entities_follow_registry_pose() {
        let mut app = App::new();
        let mut state = EditorState::default();
        let id = state.insert_object(SceneObject::cube("cube", Vec3::ZERO, 1.0, Color::WHITE));
        app.insert_resource(state);
        app.add_systems(Update, sync_scene_objects);

        let materials = ObjectMaterials {
            base: Handle::default(),
            highlight: Handle::default(),
        };
        let entity = app
            .world_mut()
            .spawn((
                EditorObject(id),
                MeshMaterial3d(materials.base.clone()),
                materials,
                Transform::from_xyz(5.0, 5.0, 5.0),
            ))
            .id();

        app.update();
        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(transform.translation, Vec3::ZERO);
    }
}
