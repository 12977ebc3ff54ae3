//! User-facing failure notices

use serde::Serialize;

/// A non-fatal failure waiting to be shown to the user
///
/// Only the most recent notice is kept; a new failure replaces the old one.
/// `id` increases with every notice so renderers can tell a repeated
/// message from one they have already shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Sequence number, unique per controller
    pub id: u64,
    /// Text to display
    pub message: String,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
