//! Behavior and handle-geometry configuration.
//!
//! [`EditorSettings`] has sensible defaults and can be read from a JSON file,
//! so the drag feel and handle sizes can be tuned without recompiling.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading [`EditorSettings`].
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON for [`EditorSettings`].
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Sizes of the gizmo handles and their colliders, in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleGeometry {
    /// Length of each translation arrow, measured from the object origin.
    pub arrow_length: f32,
    /// Radius of the capsule collider around each arrow.
    pub arrow_collider_radius: f32,
    /// Radius of each rotation ring.
    pub ring_radius: f32,
    /// Tube radius of the collider around each ring.
    pub ring_collider_thickness: f32,
    /// Number of straight segments used to draw and hit-test a ring.
    pub ring_segments: usize,
}

impl Default for HandleGeometry {
    fn default() -> Self {
        Self {
            arrow_length: 1.0,
            arrow_collider_radius: 0.08,
            ring_radius: 1.2,
            ring_collider_thickness: 0.08,
            ring_segments: 64,
        }
    }
}

/// Editor behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// World units (or rotation units) per pixel of pointer movement along
    /// the projected axis.
    pub drag_sensitivity: f32,
    /// Radians of rotation per unit of drag scalar.
    pub rotate_radians_per_unit: f32,
    /// Pixels the pointer may travel between press and release for the
    /// gesture to still count as a click.
    pub click_slop_px: f32,
    /// Display color of the selected object (sRGB).
    pub highlight_color: [f32; 3],
    /// Number of procedurally generated objects in the demo scene.
    pub object_count: usize,
    /// Handle and collider sizes.
    pub handles: HandleGeometry,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.01,
            rotate_radians_per_unit: 1.0,
            click_slop_px: 4.0,
            highlight_color: [0.0, 0.0, 1.0],
            object_count: 10,
            handles: HandleGeometry::default(),
        }
    }
}

fn positive(value: f32, field: &'static str) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Invalid {
            field,
            reason: "must be a positive finite number",
        })
    }
}

impl EditorSettings {
    /// Parse settings from a JSON string and validate them.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the controller cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive(self.drag_sensitivity, "drag_sensitivity")?;
        positive(self.rotate_radians_per_unit, "rotate_radians_per_unit")?;
        if !self.click_slop_px.is_finite() || self.click_slop_px < 0.0 {
            return Err(SettingsError::Invalid {
                field: "click_slop_px",
                reason: "must be a non-negative finite number",
            });
        }
        if self.object_count == 0 {
            return Err(SettingsError::Invalid {
                field: "object_count",
                reason: "must be at least 1",
            });
        }
        positive(self.handles.arrow_length, "handles.arrow_length")?;
        positive(self.handles.arrow_collider_radius, "handles.arrow_collider_radius")?;
        positive(self.handles.ring_radius, "handles.ring_radius")?;
        positive(self.handles.ring_collider_thickness, "handles.ring_collider_thickness")?;
        if self.handles.ring_segments < 3 {
            return Err(SettingsError::Invalid {
                field: "handles.ring_segments",
                reason: "must be at least 3",
            });
        }
        Ok(())
    }

    /// Highlight color as a Bevy color.
    pub fn highlight(&self) -> Color {
        let [r, g, b] = self.highlight_color;
        Color::srgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EditorSettings::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings =
            EditorSettings::from_json_str(r#"{ "drag_sensitivity": 0.02, "handles": { "ring_radius": 2.0 } }"#)
                .unwrap();
        assert_eq!(settings.drag_sensitivity, 0.02);
        assert_eq!(settings.handles.ring_radius, 2.0);
        assert_eq!(settings.handles.arrow_length, 1.0);
        assert_eq!(settings.object_count, 10);
    }

    #[test]
    fn rejects_non_positive_sensitivity() {
        let err = EditorSettings::from_json_str(r#"{ "drag_sensitivity": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "drag_sensitivity",
                ..
            }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = EditorSettings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EditorSettings::load("/definitely/not/here/editor.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn json_round_trip_keeps_values() {
        let mut settings = EditorSettings::default();
        settings.object_count = 1;
        let json = settings.to_json_string().unwrap();
        assert_eq!(EditorSettings::from_json_str(&json).unwrap(), settings);
    }
}
