//! Optional JSON config file (`--config`).

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use chaindrop_core::PipelineConfig;

use crate::logging::LogConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .pipeline
            .validate()
            .with_context(|| format!("invalid pipeline settings in {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: FileConfig =
            serde_json::from_str(r#"{ "pipeline": { "chunk_size": 1 }, "log": { "level": "debug" } }"#)
                .unwrap();
        assert_eq!(config.pipeline.chunk_size, 1);
        assert_eq!(config.pipeline.concurrency, 5);
        assert_eq!(config.log.level, "debug");
        assert!(config.rpc_url.is_none());
    }
}
