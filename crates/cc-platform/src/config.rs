//! Runtime Configuration

use std::path::Path;

use serde::Deserialize;

use crate::PlatformError;

/// Button runtime configuration options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Selector for elements the delegated dispatcher treats as buttons
    pub button_selector: String,

    /// localStorage key holding the favorites map
    pub favorites_key: String,

    /// How long a feedback message stays visible (ms)
    pub message_duration_ms: u64,

    /// Message fade-out time before removal (ms)
    pub message_fade_ms: u64,

    /// Ripple lifetime (ms)
    pub ripple_duration_ms: u64,

    /// Ripple diameter relative to the larger side of the button
    pub ripple_scale: f64,

    /// Candidates for initial focus inside an opened modal
    pub focusable_selector: String,

    /// User-facing feedback text
    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            button_selector: "button".to_string(),
            favorites_key: "favs::cifras".to_string(),
            message_duration_ms: 1200,
            message_fade_ms: 150,
            ripple_duration_ms: 600,
            ripple_scale: 1.2,
            focusable_selector: "[tabindex], button, a, input".to_string(),
            messages: Messages::default(),
        }
    }
}

impl Config {
    /// Parse a JSON config; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, PlatformError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlatformError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// Feedback message text
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub no_action: String,
    pub preview_unavailable: String,
    pub preview_error: String,
    pub copied: String,
    pub copy_failed: String,
    pub nothing_to_copy: String,
    pub share_cancelled: String,
    pub link_copied: String,
    pub share_failed: String,
    pub favorite_added: String,
    pub favorite_removed: String,
    pub modal_unspecified: String,
    pub modal_not_found: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_action: "Botão sem função — personalize com data-action".to_string(),
            preview_unavailable: "Preview indisponível".to_string(),
            preview_error: "Erro ao tocar".to_string(),
            copied: "Copiado".to_string(),
            copy_failed: "Falha ao copiar".to_string(),
            nothing_to_copy: "Nada para copiar".to_string(),
            share_cancelled: "Compartilhamento cancelado".to_string(),
            link_copied: "Link copiado".to_string(),
            share_failed: "Não foi possível compartilhar".to_string(),
            favorite_added: "Adicionado aos favoritos".to_string(),
            favorite_removed: "Removido dos favoritos".to_string(),
            modal_unspecified: "Modal não especificado".to_string(),
            modal_not_found: "Modal não encontrado".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.button_selector, "button");
        assert_eq!(config.favorites_key, "favs::cifras");
        assert_eq!(config.message_duration_ms, 1200);
        assert_eq!(config.ripple_duration_ms, 600);
    }

    #[test]
    fn test_default_messages_are_portuguese() {
        let messages = Messages::default();
        assert_eq!(messages.no_action, "Botão sem função — personalize com data-action");
        assert_eq!(messages.preview_unavailable, "Preview indisponível");
        assert_eq!(messages.share_failed, "Não foi possível compartilhar");
        assert_eq!(messages.modal_not_found, "Modal não encontrado");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(
            r#"{ "message_duration_ms": 2000, "messages": { "copied": "Copied" } }"#,
        )
        .unwrap();

        assert_eq!(config.message_duration_ms, 2000);
        assert_eq!(config.messages.copied, "Copied");
        assert_eq!(config.messages.copy_failed, "Falha ao copiar");
        assert_eq!(config.favorites_key, "favs::cifras");
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cc.json");
        std::fs::write(&path, r#"{ "button_selector": "button, [role=button]" }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.button_selector, "button, [role=button]");
        assert!(matches!(Config::load(dir.path().join("missing.json")), Err(PlatformError::Io(_))));
    }
}
