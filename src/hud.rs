//! Status overlay.
//!
//! The overlay text only changes when [`EditorState`] reports a new
//! [`StatusHint`]; the change travels as a [`StatusChanged`] message.

use bevy::prelude::*;

use crate::controller::EditorState;
use crate::types::StatusHint;

/// Sent once whenever the overlay hint changes.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChanged(pub StatusHint);

/// Marks the overlay text node.
#[derive(Component)]
pub struct StatusText;

/// Spawn the overlay in the top-left corner.
pub fn spawn_status_overlay(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::all(Val::Px(6.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(StatusHint::PickObject.text()),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                StatusText,
            ));
        });
}

/// Forward a pending hint change as a message.
///
/// Taking the change does not mark the state as changed again.
pub fn publish_status(mut state: ResMut<EditorState>, mut changes: MessageWriter<StatusChanged>) {
    if let Some(hint) = state.bypass_change_detection().take_status_change() {
        debug!("status: {hint}");
        changes.write(StatusChanged(hint));
    }
}

/// Show the latest hint.
pub fn update_status_text(
    mut changes: MessageReader<StatusChanged>,
    mut texts: Query<&mut Text, With<StatusText>>,
) {
    let Some(StatusChanged(hint)) = changes.read().last().copied() else {
        return;
    };
    for mut text in &mut texts {
        text.0 = hint.text().to_string();
    }
}
