use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::contract::DEFAULT_AUTHORITY;
use crate::course::ValidationRules;

pub const DEFAULT_CONTACT_URL: &str = "https://github.com/coursebook/coursebook/issues";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoursebookConfig {
    pub database: Option<String>,
    pub authority: Option<String>,
    pub contact_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationConfig>,
}

/// Optional overrides of the accepted credits/grade ranges
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidationConfig {
    pub credits_min: Option<i64>,
    pub credits_max: Option<i64>,
    pub grade_min: Option<i64>,
    pub grade_max: Option<i64>,
}

impl CoursebookConfig {
    pub fn authority(&self) -> &str {
        self.authority.as_deref().unwrap_or(DEFAULT_AUTHORITY)
    }

    pub fn contact_url(&self) -> &str {
        self.contact_url.as_deref().unwrap_or(DEFAULT_CONTACT_URL)
    }

    /// Default rules with any configured bounds applied
    pub fn validation_rules(&self) -> anyhow::Result<ValidationRules> {
        let defaults = ValidationRules::default();
        let Some(v) = &self.validation else {
            return Ok(defaults);
        };

        let credits = v.credits_min.unwrap_or(*defaults.credits.start())
            ..=v.credits_max.unwrap_or(*defaults.credits.end());
        let grade = v.grade_min.unwrap_or(*defaults.grade.start())
            ..=v.grade_max.unwrap_or(*defaults.grade.end());
        if credits.is_empty() || grade.is_empty() {
            anyhow::bail!("validation bounds are inverted (min must not exceed max)");
        }
        Ok(ValidationRules { credits, grade })
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("coursebook.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".coursebook").join("courses.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<CoursebookConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: CoursebookConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &CoursebookConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
