//! # Configuration
//!
//! Table configuration is loaded with [`confique`], layering sources in
//! priority order:
//!
//! 1. **Environment variables**: `REELTABLE_ROWS_PER_PAGE`
//! 2. **TOML file**: the path handed to [`TableConfig::load`], if any
//! 3. **Compiled defaults**
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `rows_per_page` | `100` | Page size of the table view |
//! | `stages` | built-in order | Ordered status stage names; defines status sort rank |

use crate::error::{Result, TableError};
use crate::model::StatusOrder;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_ROWS_PER_PAGE: usize = 100;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of rows on one page.
    #[config(default = 100, env = "REELTABLE_ROWS_PER_PAGE")]
    pub rows_per_page: usize,

    /// Status stages, first to last. When absent the built-in order is used.
    pub stages: Option<Vec<String>>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            stages: None,
        }
    }
}

impl TableConfig {
    /// Loads from the environment, then `path` (when given), then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        let config = builder.load()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows_per_page == 0 {
            return Err(TableError::InvalidConfig(
                "rows_per_page must be at least 1".to_string(),
            ));
        }

        if let Some(stages) = &self.stages {
            if stages.is_empty() {
                return Err(TableError::InvalidConfig(
                    "stages must list at least one stage".to_string(),
                ));
            }
            let mut seen = HashSet::new();
            for stage in stages {
                if stage.trim().is_empty() {
                    return Err(TableError::InvalidConfig(
                        "stage names cannot be empty".to_string(),
                    ));
                }
                if !seen.insert(stage.as_str()) {
                    return Err(TableError::InvalidConfig(format!(
                        "stage '{}' is listed twice",
                        stage
                    )));
                }
            }
        }

        Ok(())
    }

    /// The status rank table for these settings.
    pub fn status_order(&self) -> StatusOrder {
        match &self.stages {
            Some(stages) => StatusOrder::new(stages.iter().cloned()),
            None => StatusOrder::default(),
        }
    }
}
