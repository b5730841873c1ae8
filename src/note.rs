//! Note data model: the canonical in-memory note, the raw wire shape the
//! server returns, and the create/update payloads sent back to it.
//!
//! The backing API encodes decimal columns as JSON strings, so [`NoteWire`]
//! accepts numbers or numeric strings for the geometry fields and is
//! normalized into [`Note`] on ingestion. Everything downstream of the API
//! seam works with `f64` geometry only.

#[cfg(test)]
#[path = "note_test.rs"]
mod note_test;

use serde::{Deserialize, Deserializer, Serialize};

/// Unique, server-assigned identifier for a note.
pub type NoteId = i64;

/// A note as held in the local store and rendered on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Left edge in world coordinates.
    pub pos_x: f64,
    /// Top edge in world coordinates.
    pub pos_y: f64,
    pub width: f64,
    pub height: f64,
    pub content: String,
    /// Free-form CSS color string.
    pub bg_color: String,
    /// Opaque server timestamp, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Opaque server timestamp, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A note as the server serializes it: geometry fields may arrive as JSON
/// strings rather than numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteWire {
    pub id: NoteId,
    #[serde(deserialize_with = "number_or_string")]
    pub pos_x: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub pos_y: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub width: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub height: f64,
    pub content: String,
    pub bg_color: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<NoteWire> for Note {
    fn from(wire: NoteWire) -> Self {
        Self {
            id: wire.id,
            pos_x: wire.pos_x,
            pos_y: wire.pos_y,
            width: wire.width,
            height: wire.height,
            content: wire.content,
            bg_color: wire.bg_color,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

/// Accept a JSON number or a numeric string for an `f64` field.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Payload for creating a note. Geometry and color fall back to server
/// defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNoteData {
    pub pos_x: f64,
    pub pos_y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
}

impl CreateNoteData {
    /// The payload that would recreate `note` (everything but the id).
    #[must_use]
    pub fn from_note(note: &Note) -> Self {
        Self {
            pos_x: note.pos_x,
            pos_y: note.pos_y,
            width: Some(note.width),
            height: Some(note.height),
            content: note.content.clone(),
            bg_color: Some(note.bg_color.clone()),
        }
    }
}

/// Sparse update for a note. Only present fields are sent and applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNoteData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
}

/// One entry of a bulk update request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub id: NoteId,
    pub data: UpdateNoteData,
}
