//! Per-user layout storage.
//!
//! The launcher's geometry and dock state, plus the last geometry of each
//! panel kind, are kept in one JSON record:
//!
//! - Unix/macOS: `$XDG_CONFIG_HOME/term-panels/layout.json`, else
//!   `~/.config/term-panels/layout.json`
//! - Windows: `%APPDATA%\term-panels\layout.json`
//!
//! Nothing read from disk is trusted: callers re-clamp every value against
//! the live viewport before using it.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::toolbar::ToolbarLayoutState;
use crate::window::{PanelKind, Position, Size};

const APP_DIR: &str = "term-panels";
const LAYOUT_FILE: &str = "layout.json";
pub const LAYOUT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelGeometry {
    pub position: Position,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRecord {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub toolbar: Option<ToolbarLayoutState>,
    #[serde(default)]
    pub panels: BTreeMap<PanelKind, PanelGeometry>,
}

fn default_version() -> u32 {
    LAYOUT_VERSION
}

impl Default for LayoutRecord {
    fn default() -> Self {
        Self {
            version: LAYOUT_VERSION,
            toolbar: None,
            panels: BTreeMap::new(),
        }
    }
}

impl LayoutRecord {
    pub fn panel(&self, kind: PanelKind) -> Option<PanelGeometry> {
        self.panels.get(&kind).copied()
    }

    pub fn remember_panel(&mut self, kind: PanelKind, position: Position, size: Size) {
        self.panels.insert(kind, PanelGeometry { position, size });
    }

    /// `true` when there was geometry to drop.
    pub fn forget_panel(&mut self, kind: PanelKind) -> bool {
        self.panels.remove(&kind).is_some()
    }
}

/// `<config dir>/term-panels`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("APPDATA")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
            .map(|dir| dir.join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|dir| dir.join(APP_DIR))
    }
}

/// Reads and writes the layout record. A store without a path keeps nothing.
#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    path: Option<PathBuf>,
}

impl LayoutStore {
    /// The per-user default location.
    pub fn user_default() -> Result<Self, LayoutError> {
        let dir = config_dir().ok_or(LayoutError::NoConfigDir)?;
        Ok(Self::at(dir.join(LAYOUT_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// A missing file is an empty record, not an error.
    pub fn load(&self) -> Result<LayoutRecord, LayoutError> {
        let Some(path) = &self.path else {
            return Ok(LayoutRecord::default());
        };
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LayoutRecord::default());
            }
            Err(source) => {
                return Err(LayoutError::Io {
                    path: path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&contents).map_err(|source| LayoutError::Parse {
            path: path.clone(),
            source,
        })
    }

    /// Loads the record, falling back to the default on any failure.
    pub fn load_or_default(&self) -> LayoutRecord {
        match self.load() {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring persisted layout");
                LayoutRecord::default()
            }
        }
    }

    pub fn save(&self, record: &LayoutRecord) -> Result<(), LayoutError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| LayoutError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(record).map_err(|source| LayoutError::Parse {
            path: path.clone(),
            source,
        })?;
        fs::write(path, contents).map_err(io_err)?;
        tracing::trace!(path = %path.display(), "layout saved");
        Ok(())
    }

    /// Saves, logging instead of returning failures.
    pub fn save_logged(&self, record: &LayoutRecord) {
        if let Err(err) = self.save(record) {
            tracing::warn!(error = %err, "failed to save layout");
        }
    }
}
