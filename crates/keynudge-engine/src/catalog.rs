//! The shortcut catalog: an immutable table of shortcut records grouped by
//! interaction type, built once from a comma separated source.

use keynudge_common::ShortcutRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const BUILTIN_CATALOG: &str = include_str!("../data/shortcuts.csv");

/// Minimum number of fields a row needs to become a record.
const MIN_FIELDS: usize = 4;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ShortcutRecord>,
    by_type: HashMap<String, Vec<ShortcutRecord>>,
}

impl Catalog {
    /// Parse catalog text. The first line is a header. Rows with fewer than
    /// four fields, or whose keys contain the ledger separator `|`, are dropped.
    pub fn parse(source: &str) -> Self {
        let mut records = Vec::new();

        for (line_no, line) in source.lines().enumerate().skip(1) {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let fields = split_row(trimmed);
            if fields.len() < MIN_FIELDS {
                debug!(line = line_no + 1, fields = fields.len(), "Skipping malformed catalog row");
                continue;
            }

            let record = ShortcutRecord {
                interaction_type: fields[0].clone(),
                implemented: fields[1].eq_ignore_ascii_case("true"),
                shortcut_keys: fields[2].clone(),
                action_description: fields[3].clone(),
            };
            // A record that cannot be stored in the ledger could never be learned.
            if let Err(e) = record.identity().encode() {
                warn!(line = line_no + 1, error = %e, "Skipping unlearnable catalog row");
                continue;
            }
            records.push(record);
        }

        Self::from_records(records)
    }

    pub fn from_records(records: Vec<ShortcutRecord>) -> Self {
        let mut by_type: HashMap<String, Vec<ShortcutRecord>> = HashMap::new();
        for record in &records {
            by_type
                .entry(record.interaction_type.clone())
                .or_default()
                .push(record.clone());
        }
        Self { records, by_type }
    }

    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::parse(&content);
        debug!(path = %path.display(), records = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_CATALOG)
    }

    /// Records for an interaction type, in source order.
    pub fn shortcuts_for_type(&self, interaction_type: &str) -> &[ShortcutRecord] {
        self.by_type
            .get(interaction_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn all_records(&self) -> &[ShortcutRecord] {
        &self.records
    }

    /// Distinct interaction types in order of first appearance.
    pub fn interaction_types(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.interaction_type.as_str()) {
                seen.push(record.interaction_type.as_str());
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Split one row on commas. A double quote toggles the quoted state and is
/// not kept; commas inside quotes belong to the field.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}
