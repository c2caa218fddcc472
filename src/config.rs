use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};
use crate::normalize::FieldLayout;
use crate::rank::Scope;

pub const DEFAULT_BRANCHES: &str = "IFI,IIT,IIB";
pub const DEFAULT_DATA_PATH: &str = "final.json";

/// Runtime settings shared by every command.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub branches: Vec<String>,
    pub layout: FieldLayout,
}

impl DashboardConfig {
    pub fn new(data_path: PathBuf, branches: &[String], layout_path: Option<&Path>) -> Result<Self> {
        let branches = normalize_branches(branches)?;
        let layout = match layout_path {
            Some(path) => load_layout(path)?,
            None => FieldLayout::default(),
        };

        Ok(Self {
            data_path,
            branches,
            layout,
        })
    }

    pub fn is_known_branch(&self, code: &str) -> bool {
        self.branches.iter().any(|branch| branch == code)
    }

    /// Maps a branch scope typed in any case onto the configured spelling.
    /// Codes outside the known list are returned unchanged.
    pub fn resolve_scope(&self, scope: Scope) -> Scope {
        match scope {
            Scope::Branch(code) => {
                let known = self
                    .branches
                    .iter()
                    .find(|branch| branch.eq_ignore_ascii_case(&code));
                Scope::Branch(known.cloned().unwrap_or(code))
            }
            Scope::Overall => Scope::Overall,
        }
    }
}

/// Trims and de-duplicates branch codes, keeping first-seen order. Codes are
/// compared exactly against record branches, so their case is kept.
pub fn normalize_branches(codes: &[String]) -> Result<Vec<String>> {
    let mut branches: Vec<String> = Vec::new();
    for code in codes {
        let code = code.trim().to_string();
        if !code.is_empty() && !branches.contains(&code) {
            branches.push(code);
        }
    }

    if branches.is_empty() {
        return Err(DashboardError::invalid_input(
            "at least one branch code must be configured",
        ));
    }
    Ok(branches)
}

pub fn load_layout(path: &Path) -> Result<FieldLayout> {
    let text = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let layout: FieldLayout = serde_json::from_str(&text).map_err(|source| DashboardError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(reason) = layout.problem() {
        return Err(DashboardError::Layout {
            path: path.to_path_buf(),
            reason,
        });
    }
    Ok(layout)
}
