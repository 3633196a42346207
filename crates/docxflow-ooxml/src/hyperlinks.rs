//! Hyperlink relationship registry

use std::collections::HashMap;

use tracing::debug;

use crate::relationships::Relationships;

/// Prefix of hyperlink relationship ids
pub const HYPERLINK_ID_PREFIX: &str = "docxflow_link";

/// Memoises hyperlink targets to relationship ids for one render session
#[derive(Debug, Clone)]
pub struct HyperlinkRegistry {
    relationships: Relationships,
    by_target: HashMap<String, String>,
}

impl Default for HyperlinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperlinkRegistry {
    pub fn new() -> Self {
        Self {
            relationships: Relationships::new(HYPERLINK_ID_PREFIX),
            by_target: HashMap::new(),
        }
    }

    /// Relationship id for `target`, registering it on first use
    pub fn register_hyperlink(&mut self, target: &str) -> String {
        if let Some(id) = self.by_target.get(target) {
            return id.clone();
        }

        let id = self
            .relationships
            .add(target.to_string(), Relationships::TYPE_HYPERLINK);
        debug!(target, id = %id, "registered hyperlink");
        self.by_target.insert(target.to_string(), id.clone());
        id
    }

    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}
