// Downloader that saves backend files into a local directory
use crate::application::presenter::Downloader;
use anyhow::{Context, Result};
use futures::{Stream, StreamExt};
use reqwest::header::{self, HeaderMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: reqwest::Client,
    dir: PathBuf,
}

impl HttpDownloader {
    pub fn new(client: reqwest::Client, dir: PathBuf) -> Self {
        Self { client, dir }
    }

    /// Fetch `url` and write the body into the download directory.
    pub async fn fetch(&self, url: &str) -> Result<PathBuf> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to request {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Download of {} failed with status {}: {}", url, status, body);
        }

        let filename = attachment_filename(response.headers())
            .or_else(|| filename_from_url(url))
            .context("Could not determine a file name for the download")?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.dir.join(&filename);

        write_file(&path, response.bytes_stream()).await?;

        Ok(path)
    }
}

impl Downloader for HttpDownloader {
    fn navigate_to(&self, url: &str) {
        let downloader = self.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            match downloader.fetch(&url).await {
                Ok(path) => tracing::info!("Downloaded {} to {}", url, path.display()),
                Err(e) => tracing::error!("Download failed: {:#}", e),
            }
        });
    }
}

/// Stream `body` into `<path>.part` and rename it into place once complete.
/// The partial file is removed if the body or the write fails.
async fn write_file<S, B, E>(path: &Path, body: S) -> Result<()>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
{
    let part = part_path(path);
    match write_part(&part, body).await {
        Ok(()) => tokio::fs::rename(&part, path)
            .await
            .with_context(|| format!("Failed to move download into {}", path.display())),
        Err(e) => {
            if let Err(remove_err) = tokio::fs::remove_file(&part).await
                && remove_err.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!("Could not remove {}: {}", part.display(), remove_err);
            }
            Err(e)
        }
    }
}

async fn write_part<S, B, E>(part: &Path, body: S) -> Result<()>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut file = tokio::fs::File::create(part)
        .await
        .with_context(|| format!("Failed to create {}", part.display()))?;
    let mut body = std::pin::pin!(body);
    while let Some(chunk) = body.next().await {
        let chunk = chunk.context("Download interrupted")?;
        file.write_all(chunk.as_ref()).await?;
    }
    file.flush().await?;
    Ok(())
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

/// File name from a `Content-Disposition: attachment; filename=...` header.
fn attachment_filename(headers: &HeaderMap) -> Option<String> {
    let disposition = headers.get(header::CONTENT_DISPOSITION)?.to_str().ok()?;

    disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"'))
        .and_then(safe_file_name)
}

fn filename_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let segment = path.rsplit('/').next()?;
    let decoded = urlencoding::decode(segment).ok()?;
    safe_file_name(&decoded)
}

// Keeps only the final path component so a download never escapes its directory.
fn safe_file_name(name: &str) -> Option<String> {
    let name = Path::new(name).file_name()?.to_str()?.trim();
    if name.is_empty() || name == ".." {
        return None;
    }
    Some(name.to_string())
}
