//! Editing policy for a [`StringTree`](crate::tree::StringTree).
//!
//! Policies can be written as rc-style flag files:
//!
//! ```text
//! # stringtree defaults
//! --lenient-insert
//! --prune-after-insert
//! ```
//!
//! Flags from several sources merge with [`ConfigFlags::union`]; the merged
//! flags resolve to the [`TreeConfig`] a tree runs with.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Resolved policy attached to a tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Silently ignore insertions that land inside a non-editable leaf
    /// instead of failing with `TreeError::NotEditable`.
    pub lenient_insert: bool,
    /// Run `prune` after every successful insertion.
    pub prune_after_insert: bool,
}

impl TreeConfig {
    #[must_use]
    pub const fn with_lenient_insert(mut self, lenient: bool) -> Self {
        self.lenient_insert = lenient;
        self
    }

    #[must_use]
    pub const fn with_prune_after_insert(mut self, prune: bool) -> Self {
        self.prune_after_insert = prune;
        self
    }
}

/// Flags as read from one source.
///
/// `lenient_insert` is `None` when the source says nothing about it, so a
/// later source can both switch it on (`--lenient-insert`) and off
/// (`--strict-insert`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConfigFlags {
    pub lenient_insert: Option<bool>,
    pub prune_after_insert: bool,
}

impl ConfigFlags {
    /// Merge `other` over `self`: explicit choices in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            lenient_insert: other.lenient_insert.or(self.lenient_insert),
            prune_after_insert: self.prune_after_insert || other.prune_after_insert,
        }
    }

    pub fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            lenient_insert: self.lenient_insert.unwrap_or(false),
            prune_after_insert: self.prune_after_insert,
        }
    }
}

impl From<TreeConfig> for ConfigFlags {
    fn from(config: TreeConfig) -> Self {
        Self {
            lenient_insert: Some(config.lenient_insert),
            prune_after_insert: config.prune_after_insert,
        }
    }
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# stringtree defaults".to_string()];
    match flags.lenient_insert {
        Some(true) => lines.push("--lenient-insert".to_string()),
        Some(false) => lines.push("--strict-insert".to_string()),
        None => {}
    }
    if flags.prune_after_insert {
        lines.push("--prune-after-insert".to_string());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Unknown tokens are ignored; the last of `--lenient-insert` and
/// `--strict-insert` wins.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    for token in tokens {
        match token.as_str() {
            "--lenient-insert" => flags.lenient_insert = Some(true),
            "--strict-insert" => flags.lenient_insert = Some(false),
            "--prune-after-insert" => flags.prune_after_insert = true,
            _ => {}
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&tokens(&[
            "--prune-after-insert",
            "--lenient-insert",
            "--unknown",
        ]));
        assert_eq!(flags.lenient_insert, Some(true));
        assert!(flags.prune_after_insert);
    }

    #[test]
    fn test_unset_policy_stays_none() {
        let flags = parse_flag_tokens(&tokens(&["--prune-after-insert"]));
        assert_eq!(flags.lenient_insert, None);
        assert!(!flags.tree_config().lenient_insert);
    }

    #[test]
    fn test_strict_insert_overrides_earlier_lenient() {
        let flags = parse_flag_tokens(&tokens(&["--lenient-insert", "--strict-insert"]));
        assert_eq!(flags.lenient_insert, Some(false));
    }

    #[test]
    fn test_union_lets_later_strict_override_lenient() {
        let file = parse_flag_tokens(&tokens(&["--lenient-insert", "--prune-after-insert"]));
        let cli = parse_flag_tokens(&tokens(&["stringtree", "--strict-insert"]));
        let config = file.union(&cli).tree_config();
        assert!(!config.lenient_insert);
        assert!(config.prune_after_insert);
    }

    #[test]
    fn test_union_keeps_earlier_choice_when_later_is_silent() {
        let file = parse_flag_tokens(&tokens(&["--lenient-insert"]));
        let cli = ConfigFlags::default();
        assert!(file.union(&cli).tree_config().lenient_insert);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let flags = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(flags, ConfigFlags::default());
    }

    #[test]
    fn test_save_and_load_config_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".stringtreerc");
        let flags = ConfigFlags::from(TreeConfig {
            lenient_insert: false,
            prune_after_insert: true,
        });

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);
        assert_eq!(loaded.lenient_insert, Some(false));
    }
}
