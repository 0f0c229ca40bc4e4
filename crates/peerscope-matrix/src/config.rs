//! Matrix configuration: which entities to focus on, which regions to show,
//! and the colour palette.
//!
//! Defaults reproduce the tier-1 peering matrix; every field can be overridden
//! from a JSON file.

use std::collections::HashSet;
use std::path::Path;

use peerscope_model::Region;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("focus list is empty")]
    EmptyFocus,

    #[error("focus entity `{0}` is listed more than once")]
    DuplicateFocus(String),

    #[error("region `{}` is listed more than once", .0.name())]
    DuplicateRegion(Region),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An entity with its own table in the matrix view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusEntity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FocusEntity {
    pub fn new(id: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.map(str::to_string),
        }
    }

    /// `"<id> (<name>)"`, or just the id when no name is known.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.id, name),
            None => self.id.clone(),
        }
    }
}

const TIER1_NETWORKS: [(&str, &str); 17] = [
    ("174", "Cogent"),
    ("701", "Verizon"),
    ("1273", "Vodafone"),
    ("1299", "Arelion"),
    ("2914", "NTT"),
    ("3257", "GTT"),
    ("3320", "DTAG"),
    ("3356", "Lumen"),
    ("3491", "PCCW"),
    ("5511", "Orange"),
    ("6453", "TATA"),
    ("6461", "Zayo"),
    ("6762", "TI Sparkle"),
    ("6830", "Liberty Global"),
    ("6939", "Hurricane Electric"),
    ("7018", "AT&T"),
    ("12956", "Telxius"),
];

/// Fill and text colour for one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellColours {
    pub fill: String,
    pub text: String,
}

impl CellColours {
    fn new(fill: &str, text: &str) -> Self {
        Self {
            fill: fill.to_string(),
            text: text.to_string(),
        }
    }
}

/// Colour tokens (any CSS colour) per classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub no_data: CellColours,
    pub peer: CellColours,
    pub non_peer: CellColours,
    /// Fill for cells of an entity against itself.
    pub skip_fill: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            no_data: CellColours::new("white", "black"),
            peer: CellColours::new("#eaf8e0", "darkgreen"),
            non_peer: CellColours::new("lightgoldenrodyellow", "firebrick"),
            skip_fill: "#f0f0f0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Row and table order.
    pub focus: Vec<FocusEntity>,
    /// Column order (after the label column).
    pub regions: Vec<Region>,
    pub palette: Palette,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            focus: TIER1_NETWORKS
                .iter()
                .map(|(id, name)| FocusEntity::new(*id, Some(*name)))
                .collect(),
            regions: Region::ALL.to_vec(),
            palette: Palette::default(),
        }
    }
}

impl MatrixConfig {
    /// Unnamed focus entities, every region, default palette.
    pub fn for_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            focus: ids.into_iter().map(|id| FocusEntity::new(id, None)).collect(),
            ..Self::default()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.focus.is_empty() {
            return Err(ConfigError::EmptyFocus);
        }
        let mut seen = HashSet::new();
        for focus in &self.focus {
            if !seen.insert(focus.id.as_str()) {
                return Err(ConfigError::DuplicateFocus(focus.id.clone()));
            }
        }
        let mut seen = HashSet::new();
        for region in &self.regions {
            if !seen.insert(*region) {
                return Err(ConfigError::DuplicateRegion(*region));
            }
        }
        Ok(())
    }
}
