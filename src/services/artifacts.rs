use std::path::{Path, PathBuf};

use reqwest::Client as HttpClient;
use tokio::io::AsyncWriteExt;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::ArtifactKind,
};

/// Downloads one remote artifact to a local path
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> AppResult<()>;
}

/// Streams artifacts over HTTP.
///
/// The body is written to `<dest>.part` and renamed once complete, so an
/// interrupted download never appears at `dest`.
#[derive(Clone)]
pub struct HttpArtifactFetcher {
    http_client: HttpClient,
}

impl HttpArtifactFetcher {
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }
}

#[async_trait::async_trait]
impl ArtifactFetcher for HttpArtifactFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> AppResult<()> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "Artifact download from {} returned status {}",
                url, status
            )));
        }

        let partial = partial_path(dest);
        let written = match write_body(response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                tokio::fs::remove_file(&partial).await.ok();
                return Err(e);
            }
        };

        tokio::fs::rename(&partial, dest).await?;

        tracing::info!(url = %url, dest = %dest.display(), bytes = written, "Artifact downloaded");

        Ok(())
    }
}

async fn write_body(mut response: reqwest::Response, partial: &Path) -> AppResult<u64> {
    let mut file = tokio::fs::File::create(partial).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    Ok(written)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Remote location of each artifact
#[derive(Debug, Clone, Default)]
pub struct ArtifactSources {
    pub anime_table: Option<String>,
    pub user_anchor_table: Option<String>,
    pub item_similarity: Option<String>,
    pub user_similarity: Option<String>,
}

impl ArtifactSources {
    pub fn from_config(config: &Config) -> Self {
        Self {
            anime_table: config.anime_table_url.clone(),
            user_anchor_table: config.user_anchor_table_url.clone(),
            item_similarity: config.similarity_url.clone(),
            user_similarity: config.user_similarity_url.clone(),
        }
    }

    pub fn url(&self, kind: ArtifactKind) -> Option<&str> {
        match kind {
            ArtifactKind::AnimeTable => self.anime_table.as_deref(),
            ArtifactKind::UserAnchorTable => self.user_anchor_table.as_deref(),
            ArtifactKind::ItemSimilarity => self.item_similarity.as_deref(),
            ArtifactKind::UserSimilarity => self.user_similarity.as_deref(),
        }
    }
}

/// What `ensure_artifacts` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArtifactReport {
    /// Artifacts downloaded during this call
    pub fetched: usize,
    /// Artifacts already on disk and left untouched
    pub present: usize,
}

/// Makes sure all four artifacts exist under `dir`, downloading the missing ones.
///
/// An existing file is never re-validated or refreshed. A missing file without a
/// configured URL is an error.
pub async fn ensure_artifacts(
    dir: &Path,
    sources: &ArtifactSources,
    fetcher: &dyn ArtifactFetcher,
) -> AppResult<ArtifactReport> {
    tokio::fs::create_dir_all(dir).await?;

    let mut report = ArtifactReport::default();

    for kind in ArtifactKind::ALL {
        let dest = dir.join(kind.file_name());

        if tokio::fs::try_exists(&dest).await? {
            tracing::debug!(artifact = kind.file_name(), "Artifact present, skipping download");
            report.present += 1;
            continue;
        }

        let url = sources.url(kind).ok_or_else(|| {
            AppError::Artifact(format!(
                "{} is missing from {} and no download URL is configured",
                kind.file_name(),
                dir.display()
            ))
        })?;

        tracing::info!(artifact = kind.file_name(), url = %url, "Fetching missing artifact");
        fetcher.fetch(url, &dest).await?;
        report.fetched += 1;
    }

    tracing::info!(
        fetched = report.fetched,
        present = report.present,
        "Artifacts ready"
    );

    Ok(report)
}
