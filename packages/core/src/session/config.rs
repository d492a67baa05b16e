use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arbiter::DEFAULT_PROGRESS_WEIGHT;

/// [`SessionConfig`] の読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// ルームセッションのタイミング設定（任意の TOML ファイルから読み込む）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// `countdown` から `playing` までの待ち時間
    pub countdown_ms: u64,
    /// `playing` 中の終了判定の周期
    pub arbiter_interval_ms: u64,
    /// `playing` 中のローカル WPM 再計算の周期
    pub wpm_refresh_ms: u64,
    pub generator_timeout_ms: u64,
    /// スコアにおける進捗率の重み（同点決着用）
    pub progress_weight: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            countdown_ms: 3000,
            arbiter_interval_ms: 1000,
            wpm_refresh_ms: 1000,
            generator_timeout_ms: 10_000,
            progress_weight: DEFAULT_PROGRESS_WEIGHT,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// `path` から読み込む。ファイルにない項目は既定値のまま
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    pub fn countdown(&self) -> Duration {
        Duration::from_millis(self.countdown_ms)
    }

    pub fn arbiter_interval(&self) -> Duration {
        Duration::from_millis(self.arbiter_interval_ms.max(1))
    }

    pub fn wpm_refresh(&self) -> Duration {
        Duration::from_millis(self.wpm_refresh_ms.max(1))
    }

    pub fn generator_timeout(&self) -> Duration {
        Duration::from_millis(self.generator_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.countdown(), Duration::from_secs(3));
        assert_eq!(config.arbiter_interval(), Duration::from_secs(1));
        assert_eq!(config.generator_timeout(), Duration::from_secs(10));
        assert!((config.progress_weight - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        // テスト項目: 指定されていない項目は既定値のまま
        // when (操作):
        let config = SessionConfig::from_toml_str("countdown_ms = 500\nprogress_weight = 1.0\n").unwrap();

        // then (期待する結果):
        assert_eq!(config.countdown_ms, 500);
        assert!((config.progress_weight - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.wpm_refresh_ms, 1000);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            SessionConfig::from_toml_str("countdown_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = SessionConfig::load(Path::new("/nonexistent/typerace.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
