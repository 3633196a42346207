//! Style resolution for emitted blocks
//!
//! The emitter never invents style ids. Headings, captions, hyperlinks and
//! list numbering are resolved through a [`StyleGenerator`], so the markup can
//! be merged into a template whose style ids differ from Word's defaults.

use std::collections::HashMap;

use crate::config::StyleConfig;

/// Semantic roles that resolve to Word style ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Heading level 1-9
    Heading(u8),
    /// Figure or table caption
    Caption,
    /// Character style of hyperlink runs
    Hyperlink,
}

/// Maps semantic roles to style ids and list kinds to abstract numbering ids
pub trait StyleGenerator {
    /// Paragraph style id for a heading level
    fn heading_style_id(&self, level: u8) -> String;

    /// Paragraph style id for captions
    fn caption_style_id(&self) -> String;

    /// Character style id for hyperlink runs
    fn hyperlink_style_id(&self) -> String;

    /// `w:abstractNumId` backing ordered or bullet lists
    fn abstract_num_id_for_list(&self, ordered: bool) -> u32;
}

/// Style map with Word's built-in style ids as defaults
///
/// # Example
///
/// ```
/// use docxflow_ooxml::styles::{ElementType, StyleGenerator, StyleMap};
///
/// let mut map = StyleMap::default();
/// map.set(ElementType::Heading(1), "Titre1");
///
/// assert_eq!(map.heading_style_id(1), "Titre1");
/// assert_eq!(map.heading_style_id(2), "Heading2");
/// ```
#[derive(Debug, Clone)]
pub struct StyleMap {
    mappings: HashMap<ElementType, String>,
    bullet_abstract_num_id: u32,
    ordered_abstract_num_id: u32,
}

impl Default for StyleMap {
    fn default() -> Self {
        let mut mappings = HashMap::new();
        for level in 1..=9 {
            mappings.insert(ElementType::Heading(level), format!("Heading{}", level));
        }
        mappings.insert(ElementType::Caption, "Caption".to_string());
        mappings.insert(ElementType::Hyperlink, "Hyperlink".to_string());

        Self {
            mappings,
            bullet_abstract_num_id: 1,
            ordered_abstract_num_id: 2,
        }
    }
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from configuration, keeping defaults for anything unset
    pub fn from_config(config: &StyleConfig) -> Self {
        let mut map = Self::default();
        for (index, style) in config.headings.iter().enumerate().take(9) {
            map.set(ElementType::Heading(index as u8 + 1), style.clone());
        }
        if let Some(caption) = &config.caption {
            map.set(ElementType::Caption, caption.clone());
        }
        if let Some(hyperlink) = &config.hyperlink {
            map.set(ElementType::Hyperlink, hyperlink.clone());
        }
        map.bullet_abstract_num_id = config.bullet_abstract_num_id;
        map.ordered_abstract_num_id = config.ordered_abstract_num_id;
        map
    }

    /// Set a mapping from element type to style id
    pub fn set(&mut self, element: ElementType, style_id: impl Into<String>) {
        self.mappings.insert(element, style_id.into());
    }

    /// Style id for an element type, falling back to Word's built-in id
    pub fn get(&self, element: ElementType) -> &str {
        self.mappings
            .get(&element)
            .map(|s| s.as_str())
            .unwrap_or_else(|| Self::fallback_style(element))
    }

    fn fallback_style(element: ElementType) -> &'static str {
        match element {
            ElementType::Heading(_) => "Heading1",
            ElementType::Caption => "Caption",
            ElementType::Hyperlink => "Hyperlink",
        }
    }
}

impl StyleGenerator for StyleMap {
    fn heading_style_id(&self, level: u8) -> String {
        self.get(ElementType::Heading(level.clamp(1, 9))).to_string()
    }

    fn caption_style_id(&self) -> String {
        self.get(ElementType::Caption).to_string()
    }

    fn hyperlink_style_id(&self) -> String {
        self.get(ElementType::Hyperlink).to_string()
    }

    fn abstract_num_id_for_list(&self, ordered: bool) -> u32 {
        if ordered {
            self.ordered_abstract_num_id
        } else {
            self.bullet_abstract_num_id
        }
    }
}
