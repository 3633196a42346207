//! RFC 2397 `data:` URL decoding
//!
//! `data:[<mediatype>][;base64],<data>`. The media type defaults to
//! `text/plain` and the charset to US-ASCII. Non-base64 payloads are
//! percent-decoded and read in the declared charset; the decoded bytes are
//! returned as UTF-8.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::percent_decode_str;

use crate::error::DataUrlError;

const DATA_PREFIX: &str = "data:";
const BASE64_SUFFIX: &str = ";base64";
const DEFAULT_MIME_TYPE: &str = "text/plain";

/// Decoded content of a data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Base media type, lowercased and without parameters
    pub mime_type: String,
    /// Decoded payload
    pub data: Vec<u8>,
}

/// Charsets a non-base64 payload may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    UsAscii,
    Utf8,
    Latin1,
}

impl Charset {
    /// Look up a charset by its (case-insensitive) name or alias
    pub fn for_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "us-ascii" | "ascii" | "iso646-us" => Some(Self::UsAscii),
            "utf-8" | "utf8" => Some(Self::Utf8),
            "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin1" | "l1" => Some(Self::Latin1),
            _ => None,
        }
    }

    /// Decode bytes in this charset; unmappable bytes become U+FFFD
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::UsAscii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' })
                .collect(),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

/// Decode a data URL
///
/// Returns `Ok(None)` when `url` is not a data URL at all, so callers can
/// fall back to treating it as a regular URL.
///
/// # Example
///
/// ```
/// use docxflow_ooxml::data_url::parse_data_url;
///
/// let decoded = parse_data_url("data:,A%20brief%20note")?.unwrap();
/// assert_eq!(decoded.mime_type, "text/plain");
/// assert_eq!(decoded.data, b"A brief note");
/// # Ok::<(), docxflow_ooxml::DataUrlError>(())
/// ```
pub fn parse_data_url(url: &str) -> Result<Option<DataUrl>, DataUrlError> {
    let Some(rest) = url.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };
    let comma = rest.find(',').ok_or(DataUrlError::MissingComma)?;
    let header = &rest[..comma];
    let payload = &rest[comma + 1..];

    let base64 = header.ends_with(BASE64_SUFFIX);
    let media_type = if base64 {
        &header[..header.len() - BASE64_SUFFIX.len()]
    } else {
        header
    };

    let (mime_type, params) = if media_type.is_empty() {
        (DEFAULT_MIME_TYPE.to_string(), Vec::new())
    } else if let Some(params) = media_type.strip_prefix(';') {
        (DEFAULT_MIME_TYPE.to_string(), parse_parameters(params)?)
    } else {
        parse_media_type(media_type)?
    };

    let charset = match params.iter().find(|(name, _)| name == "charset") {
        Some((_, label)) => Charset::for_label(label)
            .ok_or_else(|| DataUrlError::UnsupportedCharset(label.clone()))?,
        None => Charset::UsAscii,
    };

    let data = if base64 {
        STANDARD
            .decode(payload)
            .map_err(|e| DataUrlError::Base64(e.to_string()))?
    } else {
        let raw: Vec<u8> = percent_decode_str(payload).collect();
        charset.decode(&raw).into_bytes()
    };

    Ok(Some(DataUrl { mime_type, data }))
}

/// Split `type/subtype;name=value...` into the lowercased base type and its
/// parameters
fn parse_media_type(media_type: &str) -> Result<(String, Vec<(String, String)>), DataUrlError> {
    let invalid = || DataUrlError::InvalidMediaType(media_type.to_string());

    let (essence, params) = match media_type.find(';') {
        Some(pos) => (&media_type[..pos], &media_type[pos + 1..]),
        None => (media_type, ""),
    };
    let (primary, sub) = essence.split_once('/').ok_or_else(invalid)?;
    let (primary, sub) = (primary.trim(), sub.trim());
    if !is_token(primary) || !is_token(sub) {
        return Err(invalid());
    }

    let params = if params.is_empty() && !media_type.contains(';') {
        Vec::new()
    } else {
        parse_parameters(params)?
    };

    Ok((
        format!("{}/{}", primary.to_ascii_lowercase(), sub.to_ascii_lowercase()),
        params,
    ))
}

/// Parse `name=value;name="quoted value"` parameters; names are lowercased
fn parse_parameters(params: &str) -> Result<Vec<(String, String)>, DataUrlError> {
    params
        .split(';')
        .map(|param| {
            let invalid = || DataUrlError::InvalidMediaType(param.to_string());
            let (name, value) = param.split_once('=').ok_or_else(invalid)?;
            let (name, value) = (name.trim(), value.trim());
            if !is_token(name) {
                return Err(invalid());
            }
            let value = match value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
            {
                Some(quoted) => quoted.replace("\\\"", "\""),
                None if is_token(value) => value.to_string(),
                None => return Err(invalid()),
            };
            Ok((name.to_ascii_lowercase(), value))
        })
        .collect()
}

/// RFC 2045 token: printable ASCII without spaces or tspecials
fn is_token(s: &str) -> bool {
    const TSPECIALS: &[u8] = b"()<>@,;:\\\"/[]?=";
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_graphic() && !TSPECIALS.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIF_PAYLOAD: &str = "R0lGODdhMAAwAPAAAAAAAP///ywAAAAAMAAwAAAC8IyPqcvt3wCcDkiLc7C0qwyGHhSWpjQu5yqmCYsapyuvUUlvONmOZtfzgFzByTB10QgxOR0TqBQejhRNzOfkVJ+5YiUqrXF5Y5lKh/DeuNcP5yLWGsEbtLiOSpa/TPg7JpJHxyendzWTBfX0cxOnKPjgBzi4diinWGdkF8kjdfnycQZXZeYGejmJlZeGl9i2icVqaNVailT6F5iJ90m6mvuTS4OK05M0vDk0Q4XUtwvKOzrcd3iq9uisF81M1OIcR7lEewwcLp7tuNNkM3uNna3F2JQFo97Vriy/Xl4/f1cf5VWzXyym7PHhhx4dbgYKAAA7";

    #[test]
    fn test_not_a_data_url() {
        assert_eq!(parse_data_url("https://example.com/a.png").unwrap(), None);
    }

    #[test]
    fn test_plain_text_defaults() {
        let decoded = parse_data_url("data:,A%20brief%20note").unwrap().unwrap();
        assert_eq!(decoded.mime_type, "text/plain");
        assert_eq!(decoded.data, b"A brief note");
    }

    #[test]
    fn test_base64_gif() {
        let url = format!("data:image/gif;base64,{}", GIF_PAYLOAD);
        let decoded = parse_data_url(&url).unwrap().unwrap();
        assert_eq!(decoded.mime_type, "image/gif");
        assert_eq!(decoded.data, STANDARD.decode(GIF_PAYLOAD).unwrap());
        assert!(decoded.data.starts_with(b"GIF87a"));
    }

    #[test]
    fn test_payload_may_contain_commas() {
        let decoded = parse_data_url(
            "data:application/vnd-xxx-query,select_vcount,fcol_from_fieldtable/local",
        )
        .unwrap()
        .unwrap();
        assert_eq!(decoded.mime_type, "application/vnd-xxx-query");
        assert_eq!(decoded.data, b"select_vcount,fcol_from_fieldtable/local");
    }

    #[test]
    fn test_parameters_without_mime_type() {
        let decoded = parse_data_url("data:;charset=utf-8,%C3%A9t%C3%A9")
            .unwrap()
            .unwrap();
        assert_eq!(decoded.mime_type, "text/plain");
        assert_eq!(String::from_utf8(decoded.data).unwrap(), "été");
    }

    #[test]
    fn test_latin1_payload_is_returned_as_utf8() {
        let decoded = parse_data_url("data:text/plain;charset=ISO-8859-1,caf%E9")
            .unwrap()
            .unwrap();
        assert_eq!(String::from_utf8(decoded.data).unwrap(), "café");
    }

    #[test]
    fn test_ascii_replaces_high_bytes() {
        let decoded = parse_data_url("data:,a%FFb").unwrap().unwrap();
        assert_eq!(String::from_utf8(decoded.data).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn test_base64_without_media_type() {
        let decoded = parse_data_url("data:;base64,aGk=").unwrap().unwrap();
        assert_eq!(decoded.mime_type, "text/plain");
        assert_eq!(decoded.data, b"hi");
    }

    #[test]
    fn test_mime_type_is_lowercased_without_parameters() {
        let decoded = parse_data_url("data:Image/PNG;name=\"a b\";base64,aGk=")
            .unwrap()
            .unwrap();
        assert_eq!(decoded.mime_type, "image/png");
    }

    #[test]
    fn test_missing_comma() {
        assert_eq!(
            parse_data_url("data:text/plain"),
            Err(DataUrlError::MissingComma)
        );
    }

    #[test]
    fn test_invalid_media_type() {
        assert!(matches!(
            parse_data_url("data:image,abc"),
            Err(DataUrlError::InvalidMediaType(_))
        ));
        assert!(matches!(
            parse_data_url("data:image/png;broken,abc"),
            Err(DataUrlError::InvalidMediaType(_))
        ));
    }

    #[test]
    fn test_unsupported_charset() {
        assert_eq!(
            parse_data_url("data:text/plain;charset=iso-8859-7,%be"),
            Err(DataUrlError::UnsupportedCharset("iso-8859-7".to_string()))
        );
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(
            parse_data_url("data:image/png;base64,@@@"),
            Err(DataUrlError::Base64(_))
        ));
    }
}
