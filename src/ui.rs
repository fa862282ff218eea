//! Immediate-mode UI vocabulary sketch.
//!
//! Just the config/value types the engine's UI layer serializes across its
//! command boundary (`UiValue`, theme config), without the layout tree,
//! widget tree, or renderer the full UI owns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum UiValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiThemeConfig {
    #[serde(default)]
    pub font_families: HashMap<String, Vec<String>>,
    pub debug: Option<bool>,
}

impl Default for UiThemeConfig {
    fn default() -> Self {
        Self {
            font_families: HashMap::new(),
            debug: None,
        }
    }
}
