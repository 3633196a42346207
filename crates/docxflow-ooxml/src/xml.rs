//! Text normalisation for WordprocessingML character data

use std::borrow::Cow;

use quick_xml::escape::escape;

/// Normalise caller text for inclusion in markup.
///
/// Input may already carry entity references (upstream parsers differ on
/// whether they decode them), so the five predefined entities are decoded
/// first and everything is escaped once. `&amp;lt;` stays literal text.
pub fn normalize_text(text: &str) -> String {
    escape(unescape_predefined(text).as_ref()).into_owned()
}

/// Escape text that is known to be raw
pub fn escape_text(text: &str) -> String {
    escape(text).into_owned()
}

/// Decode the five predefined XML entities, leaving anything else untouched
pub fn unescape_predefined(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&quot;", '"'),
            ("&apos;", '\''),
        ]
        .iter()
        .find(|(entity, _)| tail.starts_with(entity));

        match decoded {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
