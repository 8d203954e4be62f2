#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// 設定ファイルを置くための作業ディレクトリ
pub struct TestDir {
    pub root: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    #[allow(dead_code)]
    pub fn write_config(&self, content: &str) {
        fs::write(self.root.path().join("stackflow.yaml"), content).unwrap();
    }

    #[allow(dead_code)]
    pub fn write_template(&self, name: &str, content: &str) -> String {
        let path = self.root.path().join(name);
        fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// 作業ディレクトリで実行する stackflow コマンド。
    /// 外部の設定ファイルや認証情報の影響を受けないようにする。
    pub fn stackflow(&self) -> Command {
        let mut cmd = Command::cargo_bin("stackflow").unwrap();
        cmd.current_dir(self.path())
            .env_remove("STACKFLOW_CONFIG_PATH")
            .env("AWS_REGION", "us-east-1")
            .env("AWS_ACCESS_KEY_ID", "test")
            .env("AWS_SECRET_ACCESS_KEY", "test")
            .env("AWS_EC2_METADATA_DISABLED", "true");
        cmd
    }
}
