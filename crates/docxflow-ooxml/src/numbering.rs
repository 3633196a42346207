//! Numbering definitions allocated while emitting lists
//!
//! Each top-level list gets its own `w:num` so its numbering restarts. The
//! registry hands out ids above any hint the caller gives (the template's
//! highest existing `w:numId`) and serialises the definitions it created so
//! they can be appended to `word/numbering.xml`.

use tracing::debug;

/// One allocated `w:num` definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumDefinition {
    /// The allocated `w:numId`
    pub num_id: u32,
    /// The `w:abstractNumId` it instantiates
    pub abstract_num_id: u32,
    /// Ordered lists restart their counter at 1
    pub ordered: bool,
}

/// Allocator for numbering definitions within one render session
#[derive(Debug, Clone, Default)]
pub struct NumberingRegistry {
    definitions: Vec<NumDefinition>,
}

impl NumberingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh numbering definition
    ///
    /// The new id is greater than `max_num_id` and than every id this
    /// registry already handed out.
    pub fn add_num(
        &mut self,
        abstract_num_id: u32,
        max_num_id: Option<u32>,
        ordered: bool,
    ) -> NumDefinition {
        let last = self.definitions.last().map(|d| d.num_id).unwrap_or(0);
        let num_id = last.max(max_num_id.unwrap_or(0)) + 1;

        let definition = NumDefinition {
            num_id,
            abstract_num_id,
            ordered,
        };
        self.definitions.push(definition);
        debug!(num_id, abstract_num_id, ordered, "allocated numbering definition");
        definition
    }

    /// Look up a definition by its id
    pub fn get(&self, num_id: u32) -> Option<&NumDefinition> {
        self.definitions.iter().find(|d| d.num_id == num_id)
    }

    pub fn definitions(&self) -> &[NumDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Serialise the allocated `w:num` elements
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        for def in &self.definitions {
            xml.push_str(&format!("<w:num w:numId=\"{}\">", def.num_id));
            xml.push_str(&format!(
                "<w:abstractNumId w:val=\"{}\"/>",
                def.abstract_num_id
            ));
            if def.ordered {
                xml.push_str(
                    "<w:lvlOverride w:ilvl=\"0\"><w:startOverride w:val=\"1\"/></w:lvlOverride>",
                );
            }
            xml.push_str("</w:num>");
        }
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one() {
        let mut registry = NumberingRegistry::new();
        assert_eq!(registry.add_num(1, None, false).num_id, 1);
        assert_eq!(registry.add_num(1, None, false).num_id, 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_ids_stay_above_template_hint() {
        let mut registry = NumberingRegistry::new();
        assert_eq!(registry.add_num(2, Some(10), true).num_id, 11);
        assert_eq!(registry.add_num(2, Some(10), true).num_id, 12);
        assert_eq!(registry.add_num(2, Some(3), true).num_id, 13);
    }

    #[test]
    fn test_get_definition() {
        let mut registry = NumberingRegistry::new();
        let def = registry.add_num(7, None, true);
        assert_eq!(registry.get(def.num_id), Some(&def));
        assert_eq!(registry.get(99), None);
    }

    #[test]
    fn test_to_xml() {
        let mut registry = NumberingRegistry::new();
        registry.add_num(1, None, false);
        registry.add_num(2, None, true);
        assert_eq!(
            registry.to_xml(),
            "<w:num w:numId=\"1\"><w:abstractNumId w:val=\"1\"/></w:num>\
             <w:num w:numId=\"2\"><w:abstractNumId w:val=\"2\"/>\
             <w:lvlOverride w:ilvl=\"0\"><w:startOverride w:val=\"1\"/></w:lvlOverride></w:num>"
        );
    }
}
