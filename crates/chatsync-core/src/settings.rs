//! Frontend settings served by the remote store.

use serde::{Deserialize, Serialize};

/// Presentation settings nested in [`FrontendSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub chat_title: String,
    #[serde(default)]
    pub chat_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_share_button: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_chat_history_button: Option<bool>,
}

/// A boolean flag the server sends either as a JSON bool or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingFlag {
    Bool(bool),
    Text(String),
}

impl SettingFlag {
    pub fn is_set(&self) -> bool {
        match self {
            SettingFlag::Bool(value) => *value,
            SettingFlag::Text(value) => value.eq_ignore_ascii_case("true"),
        }
    }
}

/// Body of `GET /frontend_settings`. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrontendSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_enabled: Option<SettingFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_enabled: Option<SettingFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitize_answer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oyd_enabled: Option<bool>,
}

impl FrontendSettings {
    pub fn is_feedback_enabled(&self) -> bool {
        self.feedback_enabled.as_ref().is_some_and(SettingFlag::is_set)
    }

    pub fn is_auth_enabled(&self) -> bool {
        self.auth_enabled.as_ref().is_some_and(SettingFlag::is_set)
    }
}
