//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PacksmithError, PacksmithResult};

use super::types::Config;

pub const CONFIG_FILE: &str = "packsmith.toml";

const KNOWN_KEYS: &[&str] = &["roots", "builtin", "user", "cache", "logging", "level"];

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{suggestion}'?)")?;
        }
        Ok(())
    }
}

/// Load configuration and collect unknown keys as warnings.
pub fn load_with_warnings(path: &Path) -> PacksmithResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);
    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| PacksmithError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|dotted| {
            let key = dotted.rsplit('.').next().unwrap_or(&dotted).to_string();
            ConfigWarning {
                line: content
                    .lines()
                    .position(|line| line.contains(key.as_str()))
                    .map(|idx| idx + 1),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

pub fn load_or_default(explicit: Option<&Path>) -> PacksmithResult<(Config, Vec<ConfigWarning>)> {
    if let Some(path) = explicit {
        let (config, warnings) = load_with_warnings(path)?;
        return Ok((config.with_env_overrides(), warnings));
    }

    let candidates = [
        Some(PathBuf::from(CONFIG_FILE)),
        dirs::config_dir().map(|dir| dir.join("packsmith").join(CONFIG_FILE)),
    ];
    for path in candidates.into_iter().flatten() {
        if path.is_file() {
            debug!(path = %path.display(), "loading configuration");
            let (config, warnings) = load_with_warnings(&path)?;
            return Ok((config.with_env_overrides(), warnings));
        }
    }

    Ok((Config::default().with_env_overrides(), Vec::new()))
}

/// Apply PACKSMITH_* overrides read through `lookup`.
pub(super) fn with_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(path) = non_empty("PACKSMITH_BUILTIN_ROOT") {
        config.roots.builtin = Some(PathBuf::from(path));
    }
    if let Some(path) = non_empty("PACKSMITH_USER_ROOT") {
        config.roots.user = Some(PathBuf::from(path));
    }
    if let Some(path) = non_empty("PACKSMITH_CACHE_ROOT") {
        config.roots.cache = Some(PathBuf::from(path));
    }
    if let Some(level) = non_empty("PACKSMITH_LOG") {
        config.logging.level = level;
    }

    config
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

fn suggest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|candidate| (edit_distance(unknown, candidate), *candidate))
        .min()
        .filter(|(distance, _)| *distance <= 2)
        .map(|(_, candidate)| candidate.to_string())
}

/// Levenshtein distance over bytes.
pub(super) fn edit_distance(a: &str, b: &str) -> usize {
    let b = b.as_bytes();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.as_bytes().iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1)
                .min(row[j] + 1)
                .min(diagonal + usize::from(ca != cb));
            diagonal = above;
        }
    }
    row[b.len()]
}
