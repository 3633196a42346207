//! Relationships created while emitting a fragment
//!
//! Hyperlinks and images point at package parts through relationship ids.
//! Ids generated here carry a registry-specific prefix so they never clash
//! with the `rIdN` ids already present in a template's `document.xml.rels`.

use std::collections::HashMap;

use crate::xml::escape_text;

/// OOXML namespace for relationships
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Common relationship type URIs
impl Relationships {
    /// Hyperlink relationship type
    pub const TYPE_HYPERLINK: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
    /// Image relationship type
    pub const TYPE_IMAGE: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

/// A relationship target with its type and mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipTarget {
    /// The target URL or part path
    pub target: String,
    /// The relationship type URI
    pub rel_type: String,
    /// `External` for hyperlinks to URLs, `None` for package parts
    pub target_mode: Option<String>,
}

/// Relationships generated by one registry, in insertion order
#[derive(Debug, Clone)]
pub struct Relationships {
    prefix: String,
    order: Vec<String>,
    map: HashMap<String, RelationshipTarget>,
    next_id_counter: u32,
}

impl Relationships {
    /// Create an empty store whose ids look like `{prefix}1`, `{prefix}2`, ...
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            order: Vec::new(),
            map: HashMap::new(),
            next_id_counter: 1,
        }
    }

    /// Add a new relationship and return the generated id
    pub fn add(&mut self, target: String, rel_type: &str) -> String {
        let target_mode = if rel_type == Self::TYPE_HYPERLINK {
            Some("External".to_string())
        } else {
            None
        };

        let id = self.peek_next_id();
        self.next_id_counter += 1;
        self.order.push(id.clone());
        self.map.insert(
            id.clone(),
            RelationshipTarget {
                target,
                rel_type: rel_type.to_string(),
                target_mode,
            },
        );
        id
    }

    /// Get the target for a relationship id
    pub fn get(&self, id: &str) -> Option<&str> {
        self.map.get(id).map(|r| r.target.as_str())
    }

    /// Get the full relationship for an id
    pub fn get_target(&self, id: &str) -> Option<&RelationshipTarget> {
        self.map.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over relationships in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RelationshipTarget)> {
        self.order
            .iter()
            .filter_map(|id| self.map.get(id).map(|rel| (id.as_str(), rel)))
    }

    /// Id the next `add` will return
    pub fn peek_next_id(&self) -> String {
        format!("{}{}", self.prefix, self.next_id_counter)
    }

    /// Serialise as `Relationship` elements, to be merged into a `.rels` part
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        for (id, rel) in self.iter() {
            xml.push_str("<Relationship");
            xml.push_str(&format!(r#" Id="{}""#, escape_text(id)));
            xml.push_str(&format!(r#" Type="{}""#, escape_text(&rel.rel_type)));
            xml.push_str(&format!(r#" Target="{}""#, escape_text(&rel.target)));
            if let Some(mode) = &rel.target_mode {
                xml.push_str(&format!(r#" TargetMode="{}""#, escape_text(mode)));
            }
            xml.push_str("/>");
        }
        xml
    }
}

/// Wrap relationship elements into a standalone `.rels` document
pub fn rels_document<'a>(parts: impl IntoIterator<Item = &'a Relationships>) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));
    for rels in parts {
        xml.push_str(&rels.to_xml());
    }
    xml.push_str("</Relationships>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_generates_prefixed_ids() {
        let mut rels = Relationships::new("docxflow_link");
        assert_eq!(rels.peek_next_id(), "docxflow_link1");

        let id = rels.add(
            "https://example.com".to_string(),
            Relationships::TYPE_HYPERLINK,
        );
        assert_eq!(id, "docxflow_link1");
        assert_eq!(rels.get(&id), Some("https://example.com"));
        assert_eq!(
            rels.get_target(&id).unwrap().target_mode.as_deref(),
            Some("External")
        );
        assert_eq!(rels.peek_next_id(), "docxflow_link2");
    }

    #[test]
    fn test_image_relationship_is_internal() {
        let mut rels = Relationships::new("img");
        let id = rels.add("media/img1.png".to_string(), Relationships::TYPE_IMAGE);
        assert_eq!(rels.get_target(&id).unwrap().target_mode, None);
    }

    #[test]
    fn test_to_xml_escapes_targets() {
        let mut rels = Relationships::new("l");
        rels.add("https://x.test/?a=1&b=2".to_string(), Relationships::TYPE_HYPERLINK);
        let xml = rels.to_xml();
        assert!(xml.contains(r#"Target="https://x.test/?a=1&amp;b=2""#));
        assert!(xml.contains(r#"TargetMode="External""#));
    }

    #[test]
    fn test_rels_document_preserves_order() {
        let mut links = Relationships::new("l");
        let mut images = Relationships::new("i");
        links.add("https://a.test".to_string(), Relationships::TYPE_HYPERLINK);
        images.add("media/i1.png".to_string(), Relationships::TYPE_IMAGE);
        links.add("https://b.test".to_string(), Relationships::TYPE_HYPERLINK);

        let doc = rels_document([&links, &images]);
        assert!(doc.starts_with("<?xml"));
        let l1 = doc.find("Id=\"l1\"").unwrap();
        let l2 = doc.find("Id=\"l2\"").unwrap();
        let i1 = doc.find("Id=\"i1\"").unwrap();
        assert!(l1 < l2 && l2 < i1);
        assert!(doc.ends_with("</Relationships>"));
    }
}
