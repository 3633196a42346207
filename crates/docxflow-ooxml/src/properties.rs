//! Property objects carried by start events
//!
//! These are the already-parsed forms of inline style declarations. The
//! upstream parser builds them; the emitter only reads them.

use serde::{Deserialize, Serialize};

/// Character-level formatting carried by a span or block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunProperties {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub subscript: bool,
    pub superscript: bool,
    /// Text colour as six hex digits without `#` (e.g. `ff0000`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Highlight colour name (e.g. `yellow`, `darkBlue`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

/// Properties of an inline span
pub type SpanProperties = RunProperties;

impl RunProperties {
    /// Whether any property would produce a `w:rPr` child
    pub fn is_empty(&self) -> bool {
        !(self.bold
            || self.italic
            || self.underline
            || self.strike
            || self.subscript
            || self.superscript
            || self.text_color.is_some()
            || self.highlight.is_some())
    }

    /// Serialise as a `w:rPr` element, or `None` when nothing is set
    pub fn to_rpr(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut xml = String::from("<w:rPr>");
        if self.bold {
            xml.push_str("<w:b/>");
        }
        if self.italic {
            xml.push_str("<w:i/>");
        }
        if self.underline {
            xml.push_str("<w:u w:val=\"single\"/>");
        }
        if self.strike {
            xml.push_str("<w:strike/>");
        }
        if self.subscript {
            xml.push_str("<w:vertAlign w:val=\"subscript\"/>");
        }
        if self.superscript {
            xml.push_str("<w:vertAlign w:val=\"superscript\"/>");
        }
        if let Some(color) = &self.text_color {
            xml.push_str(&format!(
                "<w:color w:val=\"{}\"/>",
                crate::xml::escape_text(color)
            ));
        }
        if let Some(highlight) = &self.highlight {
            xml.push_str(&format!(
                "<w:highlight w:val=\"{}\"/>",
                crate::xml::escape_text(highlight)
            ));
        }
        xml.push_str("</w:rPr>");
        Some(xml)
    }
}

/// Paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    Center,
    Right,
    Justify,
    /// Defer to the paragraph style; emits nothing
    Inherit,
}

impl TextAlignment {
    /// Value of `w:jc/@w:val`, if this alignment is written at all
    pub fn jc_value(self) -> Option<&'static str> {
        match self {
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
            Self::Justify => Some("both"),
            Self::Inherit => None,
        }
    }
}

/// Properties shared by paragraph-like containers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerProperties {
    /// Emit a page-break paragraph before the block
    pub page_break_before: bool,
    /// Emit a page-break paragraph after the block closes
    pub page_break_after: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<TextAlignment>,
    /// Explicit paragraph style id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
    /// Paragraph-mark run formatting
    #[serde(flatten)]
    pub run: RunProperties,
}

pub type ParagraphProperties = ContainerProperties;
pub type ListItemProperties = ContainerProperties;
pub type HeaderProperties = ContainerProperties;
pub type CaptionProperties = ContainerProperties;
pub type ListProperties = ContainerProperties;

/// Properties of a table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableProperties {
    /// Declared column count; when absent the widest row decides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<usize>,
    /// Table style id written as `w:tblStyle`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
}

/// Ambient formatting toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Bold,
    Italic,
    Underline,
    Strike,
    Subscript,
    Superscript,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_run_properties() {
        let props = RunProperties::default();
        assert!(props.is_empty());
        assert_eq!(props.to_rpr(), None);
    }

    #[test]
    fn test_rpr_element_order() {
        let props = RunProperties {
            bold: true,
            italic: true,
            underline: true,
            strike: true,
            subscript: true,
            text_color: Some("ff0000".to_string()),
            highlight: Some("yellow".to_string()),
            ..Default::default()
        };
        assert_eq!(
            props.to_rpr().unwrap(),
            "<w:rPr><w:b/><w:i/><w:u w:val=\"single\"/><w:strike/>\
             <w:vertAlign w:val=\"subscript\"/><w:color w:val=\"ff0000\"/>\
             <w:highlight w:val=\"yellow\"/></w:rPr>"
        );
    }

    #[test]
    fn test_color_alone_is_not_empty() {
        let props = RunProperties {
            highlight: Some("green".to_string()),
            ..Default::default()
        };
        assert!(!props.is_empty());
    }

    #[test]
    fn test_alignment_values() {
        assert_eq!(TextAlignment::Justify.jc_value(), Some("both"));
        assert_eq!(TextAlignment::Center.jc_value(), Some("center"));
        assert_eq!(TextAlignment::Inherit.jc_value(), None);
    }

    #[test]
    fn test_container_properties_from_json() {
        let props: ContainerProperties = serde_json::from_str(
            r#"{"page_break_after": true, "alignment": "right", "bold": true}"#,
        )
        .unwrap();
        assert!(props.page_break_after);
        assert!(!props.page_break_before);
        assert_eq!(props.alignment, Some(TextAlignment::Right));
        assert!(props.run.bold);
    }
}
