use std::{fs, path::Path};

use anyhow::{Context, Result};
use arbor::{Canvas, CanvasConfig, theme::Theme};
use serde::{Deserialize, Serialize};

/// Settings a demo reads from a JSON file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Canvas behaviour.
    pub canvas: CanvasConfig,
    /// Root theme.
    pub theme: Theme,
}

impl DemoConfig {
    /// Parse a configuration from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid demo configuration")
    }

    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("loading {}", path.display()))
    }

    /// Apply the configuration to a fresh canvas: canvas settings first,
    /// then the theme every node inherits from the root.
    pub fn apply(self, canvas: Canvas) -> Result<Canvas> {
        let mut canvas = canvas.with_config(self.canvas);
        let root = canvas.root_id();
        let id = canvas
            .core
            .node(root)
            .map(|n| n.theme())
            .context("canvas has no root")?;
        let theme = canvas
            .core
            .theme_mut(id)
            .context("root theme is not registered")?;
        *theme = self.theme;
        Ok(canvas)
    }
}
