use crate::TemplateArgs;
use anyhow::Context as _;
use std::path::PathBuf;

/// テンプレートの取得元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    Url(reqwest::Url),
}

impl TemplateArgs {
    /// 指定されたテンプレートの取得元。未指定なら `None`
    pub fn source(&self) -> anyhow::Result<Option<TemplateSource>> {
        match (&self.file, &self.url) {
            (Some(_), Some(_)) => Err(anyhow::anyhow!(
                "--file と --url は同時に指定できません"
            )),
            (Some(path), None) => Ok(Some(TemplateSource::File(path.clone()))),
            (None, Some(url)) => {
                let url = reqwest::Url::parse(url)
                    .with_context(|| format!("URLの形式が正しくありません: {}", url))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(anyhow::anyhow!(
                        "URLは http または https である必要があります: {}",
                        url
                    ));
                }
                Ok(Some(TemplateSource::Url(url)))
            }
            (None, None) => Ok(None),
        }
    }
}

impl TemplateSource {
    /// テンプレート本文を読み込む
    pub async fn read(&self) -> anyhow::Result<String> {
        match self {
            TemplateSource::File(path) => {
                tracing::debug!("テンプレートを読み込み: {}", path.display());
                std::fs::read_to_string(path).with_context(|| {
                    format!("テンプレートファイルを読み込めません: {}", path.display())
                })
            }
            TemplateSource::Url(url) => {
                tracing::debug!("テンプレートを取得: {}", url);
                let response = reqwest::get(url.clone())
                    .await
                    .with_context(|| format!("テンプレートを取得できません: {}", url))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(anyhow::anyhow!(
                        "テンプレートの取得に失敗しました ({}): {}",
                        status,
                        url
                    ));
                }

                Ok(response.text().await?)
            }
        }
    }
}
