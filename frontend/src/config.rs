use log::{warn, Level};
use serde::Deserialize;
use web_sys::Document;

use crate::error::SetupError;

/// Id of the optional `<script type="application/json">` block that
/// overrides the default selectors for a page.
pub const CONFIG_ELEMENT_ID: &str = "site-behavior-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

const CARD_SELECTOR: &str = ".solution-item, .value-item, .resource-item, .support-item";

/// Selectors the page behaviors look for.
///
/// Every field falls back to its default when left out of a page override,
/// so a page only lists what it renames.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub header: String,
    pub anchor_links: String,
    pub cards: String,
    pub reveal_targets: String,
    pub search_input_id: String,
    pub search_button_id: String,
    pub interactive: String,
    pub focusable: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            header: "header".to_string(),
            anchor_links: r##"a[href^="#"]"##.to_string(),
            cards: CARD_SELECTOR.to_string(),
            reveal_targets: CARD_SELECTOR.to_string(),
            search_input_id: "resource-search".to_string(),
            search_button_id: "search-button".to_string(),
            interactive: "button, .btn-primary, .btn-secondary".to_string(),
            focusable: r#"a, button, input, textarea, select, [tabindex]:not([tabindex="-1"])"#
                .to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(text: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads the page override if there is one. A broken override is logged
    /// and ignored rather than taking the page behaviors down with it.
    pub fn load(document: &Document) -> Self {
        let Some(block) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
            return Self::default();
        };
        let text = block.text_content().unwrap_or_default();
        if text.trim().is_empty() {
            return Self::default();
        }

        match Self::from_json(&text) {
            Ok(config) => config,
            Err(err) => {
                warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_page() {
        let config = SiteConfig::default();
        assert_eq!(config.header, "header");
        assert_eq!(config.search_input_id, "resource-search");
        assert_eq!(config.search_button_id, "search-button");
        assert_eq!(config.cards, config.reveal_targets);
        assert!(config.cards.contains(".support-item"));
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = SiteConfig::from_json(r##"{ "header": "#masthead", "cards": ".tile" }"##).unwrap();
        assert_eq!(config.header, "#masthead");
        assert_eq!(config.cards, ".tile");
        assert_eq!(config.reveal_targets, SiteConfig::default().reveal_targets);
        assert_eq!(config.focusable, SiteConfig::default().focusable);
    }

    #[test]
    fn empty_object_is_the_default_config() {
        assert_eq!(SiteConfig::from_json("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn malformed_override_is_a_config_error() {
        let err = SiteConfig::from_json("{ header: ").unwrap_err();
        assert!(matches!(err, SetupError::Config(_)));
        assert!(err.to_string().starts_with("invalid site config"));
    }
}
