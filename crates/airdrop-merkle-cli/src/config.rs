use std::fs;
use std::path::Path;

use airdrop_merkle_primitives::HashKind;
use airdrop_merkle_tree::TreeOptions;
use anyhow::Context;
use serde::Deserialize;
use tracing::info;

/// Settings read from an optional TOML file, overridden by command-line flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildConfig {
    pub tree: TreeOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBuildConfig {
    tree: Option<RawTreeConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTreeConfig {
    hash_kind: Option<HashKind>,
    parallel_threshold: Option<usize>,
}

impl BuildConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        let Some(path) = path else {
            return Ok(config);
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let raw: RawBuildConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;

        if let Some(tree) = raw.tree {
            if let Some(kind) = tree.hash_kind {
                config.tree.hash_kind = kind;
            }
            if let Some(threshold) = tree.parallel_threshold {
                config.tree.parallel_threshold = threshold;
            }
        }

        info!(path = %path.display(), hash_kind = %config.tree.hash_kind, "loaded configuration");
        Ok(config)
    }

    pub fn with_hash_kind(mut self, kind: Option<HashKind>) -> Self {
        if let Some(kind) = kind {
            self.tree.hash_kind = kind;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_uses_defaults() {
        let config = BuildConfig::load(None).unwrap();
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn toml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tree]\nhash_kind = \"keccak256\"\nparallel_threshold = 16").unwrap();
        let config = BuildConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.tree.hash_kind, HashKind::Keccak256);
        assert_eq!(config.tree.parallel_threshold, 16);
    }

    #[test]
    fn flag_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tree]\nhash_kind = \"sha256\"").unwrap();
        let config = BuildConfig::load(Some(file.path()))
            .unwrap()
            .with_hash_kind(Some(HashKind::Rescue));
        assert_eq!(config.tree.hash_kind, HashKind::Rescue);
    }

    #[test]
    fn unknown_keys_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tree]\nhash = \"sha256\"").unwrap();
        assert!(BuildConfig::load(Some(file.path())).is_err());
    }
}
