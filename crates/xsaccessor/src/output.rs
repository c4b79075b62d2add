//! Command output

use serde::Serialize;
use std::fmt::Write as _;
use xsaccessor_intern::{InternStats, KeyId, SlotIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// A key and the id it was interned as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyAssignment {
    pub key: String,
    pub id: KeyId,
}

/// An external position and its internal index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionAssignment {
    pub position: usize,
    pub index: SlotIndex,
}

/// Everything a command produced, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<KeyAssignment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<PositionAssignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<InternStats>,
}

impl Report {
    pub fn render(&self, format: OutputFormat) -> serde_json::Result<String> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        for assignment in &self.keys {
            let _ = writeln!(out, "key {:?} -> {}", assignment.key, assignment.id);
        }
        for assignment in &self.positions {
            let _ = writeln!(
                out,
                "position {} -> {}",
                assignment.position, assignment.index
            );
        }
        if let Some(stats) = &self.stats {
            let _ = writeln!(
                out,
                "keys: {} (capacity {})",
                stats.keys, stats.key_capacity
            );
            let _ = writeln!(
                out,
                "indices: {} (capacity {})",
                stats.indices, stats.index_capacity
            );
            let _ = writeln!(out, "position slots: {}", stats.position_slots);
        }
        out
    }
}
