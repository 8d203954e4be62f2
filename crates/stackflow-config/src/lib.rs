pub mod error;

pub use error::*;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 設定ファイルパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "STACKFLOW_CONFIG_PATH";

/// stackflow のユーザー設定
///
/// すべての項目は省略可能で、省略時はデフォルト値が使われる。
/// CLI フラグが指定された場合はそちらが優先される。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// AWS リージョン
    pub region: Option<String>,

    /// AWS プロファイル名
    pub profile: Option<String>,

    /// SDK のリトライ回数上限
    pub max_attempts: u32,

    /// スタックイベントのポーリング間隔 (秒)
    pub poll_interval_secs: u64,

    /// ログのポーリング間隔 (秒)
    pub log_poll_interval_secs: u64,

    /// ログストリーム探索の間隔 (秒)
    pub discovery_interval_secs: u64,

    /// ログストリーム探索のタイムアウト (秒)
    pub discovery_timeout_secs: u64,

    /// スロットリング時の待機時間 (秒)
    pub throttle_backoff_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            max_attempts: 25,
            poll_interval_secs: 1,
            log_poll_interval_secs: 1,
            discovery_interval_secs: 2,
            discovery_timeout_secs: 5,
            throttle_backoff_secs: 5,
        }
    }
}

impl Settings {
    /// YAML 文字列から設定を読み込む。空の内容はデフォルト設定として扱う。
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Settings =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// 値の範囲チェック
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_attempts は 1 以上である必要があります".to_string(),
            ));
        }

        for (name, value) in [
            ("poll_interval_secs", self.poll_interval_secs),
            ("log_poll_interval_secs", self.log_poll_interval_secs),
            ("discovery_interval_secs", self.discovery_interval_secs),
            ("discovery_timeout_secs", self.discovery_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{} は 1 以上である必要があります",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn log_poll_interval(&self) -> Duration {
        Duration::from_secs(self.log_poll_interval_secs)
    }

    pub fn discovery_interval(&self) -> Duration {
        Duration::from_secs(self.discovery_interval_secs)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }

    pub fn throttle_backoff(&self) -> Duration {
        Duration::from_secs(self.throttle_backoff_secs)
    }
}

/// 設定ファイルを探す
///
/// 以下の優先順位で設定ファイルを検索:
/// 1. 環境変数 STACKFLOW_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: stackflow.yaml, .stackflow.yaml
/// 3. ~/.config/stackflow/config.yaml (グローバル設定)
///
/// どこにも無ければ `None`
pub fn find_config_file() -> Result<Option<PathBuf>> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        tracing::debug!("{} が指すファイルが存在しません: {}", CONFIG_PATH_ENV, path.display());
    }

    // 2. カレントディレクトリで検索
    let current_dir = std::env::current_dir()?;
    for filename in ["stackflow.yaml", ".stackflow.yaml"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 3. グローバル設定ファイル
    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("stackflow").join("config.yaml");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

/// 指定したファイルから設定を読み込む
pub fn load_from(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Settings::from_yaml(&content, path)
}

/// 設定ファイルを探して読み込む。見つからなければデフォルト設定。
pub fn load_settings() -> Result<Settings> {
    match find_config_file()? {
        Some(path) => {
            tracing::debug!("設定ファイルを読み込み: {}", path.display());
            load_from(&path)
        }
        None => Ok(Settings::default()),
    }
}
