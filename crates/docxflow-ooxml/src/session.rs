//! Per-document render session
//!
//! A session owns everything that must stay consistent across the fragments
//! of one document: configuration, style resolution, and the numbering,
//! hyperlink and image registries. Several fragments may be emitted against
//! one session; ids handed out by its registries never repeat.

use crate::config::EmitterConfig;
use crate::emitter::DocxEmitter;
use crate::error::Result;
use crate::fetch::ImageFetcher;
use crate::hyperlinks::HyperlinkRegistry;
use crate::image::ImageRegistry;
use crate::numbering::NumberingRegistry;
use crate::relationships::rels_document;
use crate::styles::{StyleGenerator, StyleMap};

#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use crate::fetch::HttpImageFetcher;

/// State shared by every fragment of one rendered document
pub struct RenderSession {
    pub(crate) config: EmitterConfig,
    pub(crate) styles: Box<dyn StyleGenerator>,
    pub(crate) numbering: NumberingRegistry,
    pub(crate) hyperlinks: HyperlinkRegistry,
    pub(crate) images: ImageRegistry,
    pub(crate) fetcher: Option<Box<dyn ImageFetcher>>,
}

impl RenderSession {
    /// Create a session from configuration
    ///
    /// With the `fetch` feature and `fetch_remote_images` enabled, regular
    /// image URLs are fetched over HTTP.
    pub fn new(config: EmitterConfig) -> Result<Self> {
        #[cfg(feature = "fetch")]
        let fetcher: Option<Box<dyn ImageFetcher>> = if config.fetch_remote_images {
            Some(Box::new(HttpImageFetcher::new(Duration::from_secs(
                config.fetch_timeout_secs,
            ))?))
        } else {
            None
        };
        #[cfg(not(feature = "fetch"))]
        let fetcher: Option<Box<dyn ImageFetcher>> = None;

        let mut session = Self::offline(config);
        session.fetcher = fetcher;
        Ok(session)
    }

    /// Create a session that never fetches remote images
    pub fn offline(config: EmitterConfig) -> Self {
        Self {
            styles: Box::new(StyleMap::from_config(&config.styles)),
            images: ImageRegistry::new(config.drawing_id_offset),
            numbering: NumberingRegistry::new(),
            hyperlinks: HyperlinkRegistry::new(),
            fetcher: None,
            config,
        }
    }

    /// Replace the image fetcher
    pub fn with_fetcher(mut self, fetcher: Box<dyn ImageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Replace the style generator
    pub fn with_style_generator(mut self, styles: Box<dyn StyleGenerator>) -> Self {
        self.styles = styles;
        self
    }

    /// Start emitting a new fragment against this session
    pub fn emitter(&mut self) -> DocxEmitter<'_> {
        DocxEmitter::new(self)
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn styles(&self) -> &dyn StyleGenerator {
        self.styles.as_ref()
    }

    pub fn numbering(&self) -> &NumberingRegistry {
        &self.numbering
    }

    pub fn hyperlinks(&self) -> &HyperlinkRegistry {
        &self.hyperlinks
    }

    pub fn images(&self) -> &ImageRegistry {
        &self.images
    }

    pub fn can_fetch(&self) -> bool {
        self.fetcher.is_some()
    }

    /// `w:num` elements to append to `word/numbering.xml`
    pub fn numbering_xml(&self) -> String {
        self.numbering.to_xml()
    }

    /// Standalone `.rels` document with every hyperlink and image relationship
    pub fn relationships_xml(&self) -> String {
        rels_document([
            self.hyperlinks.relationships(),
            self.images.relationships(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OoxmlError;

    struct RefusingFetcher;

    impl ImageFetcher for RefusingFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            Err(OoxmlError::Fetch {
                url: url.to_string(),
                message: "offline".to_string(),
            })
        }
    }

    struct Custom;

    impl StyleGenerator for Custom {
        fn heading_style_id(&self, level: u8) -> String {
            format!("Titre{}", level)
        }
        fn caption_style_id(&self) -> String {
            "Legende".to_string()
        }
        fn hyperlink_style_id(&self) -> String {
            "Lien".to_string()
        }
        fn abstract_num_id_for_list(&self, ordered: bool) -> u32 {
            if ordered {
                20
            } else {
                10
            }
        }
    }

    #[test]
    fn test_offline_session_has_no_fetcher() {
        let session = RenderSession::offline(EmitterConfig::default());
        assert!(!session.can_fetch());
        assert!(session.numbering().is_empty());
        assert!(session.hyperlinks().is_empty());
    }

    #[test]
    fn test_new_without_remote_images() {
        let config = EmitterConfig {
            fetch_remote_images: false,
            ..EmitterConfig::default()
        };
        let session = RenderSession::new(config).unwrap();
        assert!(!session.can_fetch());
    }

    #[test]
    fn test_with_fetcher() {
        let session =
            RenderSession::offline(EmitterConfig::default()).with_fetcher(Box::new(RefusingFetcher));
        assert!(session.can_fetch());
    }

    #[test]
    fn test_styles_follow_config() {
        let mut config = EmitterConfig::default();
        config.styles.caption = Some("Legende".to_string());
        let session = RenderSession::offline(config);
        assert_eq!(session.styles().caption_style_id(), "Legende");
        assert_eq!(session.styles().heading_style_id(2), "Heading2");
    }

    #[test]
    fn test_custom_style_generator() {
        let session = RenderSession::offline(EmitterConfig::default())
            .with_style_generator(Box::new(Custom));
        assert_eq!(session.styles().heading_style_id(3), "Titre3");
        assert_eq!(session.styles().abstract_num_id_for_list(true), 20);
    }

    #[test]
    fn test_empty_relationships_document() {
        let session = RenderSession::offline(EmitterConfig::default());
        let rels = session.relationships_xml();
        assert!(rels.contains("<Relationships"));
        assert!(!rels.contains("<Relationship "));
        assert_eq!(session.numbering_xml(), "");
    }
}
