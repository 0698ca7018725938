//! Note records and request bodies

use serde::{Deserialize, Serialize};

/// Color given to notes created without one
pub const DEFAULT_NOTE_COLOR: &str = "#ffffff";

/// Named sticky-note colors offered by clients. The server stores any string.
pub const NOTE_PALETTE: [(&str, &str); 15] = [
    ("amber", "#FFC107"),
    ("orange", "#FF9800"),
    ("deep-orange", "#FF5722"),
    ("red", "#F44336"),
    ("pink", "#E91E63"),
    ("purple", "#9C27B0"),
    ("deep-purple", "#673AB7"),
    ("indigo", "#3F51B5"),
    ("blue", "#2196F3"),
    ("light-blue", "#03A9F4"),
    ("cyan", "#00BCD4"),
    ("teal", "#009688"),
    ("green", "#4CAF50"),
    ("light-green", "#8BC34A"),
    ("lime", "#CDDC39"),
];

/// Resolve a palette name to its hex value; anything else passes through.
pub fn palette_color(input: &str) -> String {
    NOTE_PALETTE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(input.trim()))
        .map(|(_, hex)| hex.to_string())
        .unwrap_or_else(|| input.trim().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub note_id: String,
    /// Owner. Set at creation, never changed.
    pub user_id: String,
    pub note_title: String,
    pub note_content: String,
    pub color: String,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    pub create_on: i64,
    pub last_update: i64,
}

/// POST /api/notes body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub note_title: String,
    #[serde(default)]
    pub note_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// PUT /api/notes/:id body. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl UpdateNoteRequest {
    pub fn is_empty(&self) -> bool {
        self.note_title.is_none() && self.note_content.is_none() && self.color.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup() {
        assert_eq!(palette_color("amber"), "#FFC107");
        assert_eq!(palette_color("Light-Blue"), "#03A9F4");
        assert_eq!(palette_color("#123456"), "#123456");
        assert_eq!(palette_color("chartreuse"), "chartreuse");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = serde_json::from_str::<CreateNoteRequest>(
            r#"{"note_title":"T","note_content":"B","owner":"someone-else"}"#,
        );
        assert!(result.is_err());

        let result = serde_json::from_str::<UpdateNoteRequest>(r#"{"user_id":"u2"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_update_serializes_only_supplied_fields() {
        let changes = UpdateNoteRequest {
            note_title: Some("T2".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&changes).unwrap(),
            r#"{"note_title":"T2"}"#
        );
        assert!(!changes.is_empty());
        assert!(UpdateNoteRequest::default().is_empty());
    }
}
