//! The download-and-deliver pipeline.
//!
//! One request moves through validate → fetch → resolve → read → deliver →
//! cleanup, sequentially within the handler invocation. Every failure is
//! handled here; nothing propagates to the dispatcher.

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use tracing::{error, info, warn};
use url::Url;

use crate::{
    config::Config,
    domain::{ChatId, DeliveryPayload, DownloadRequest},
    errors::Error,
    ports::{MediaFetcher, Messenger},
    Result,
};

/// Syntactic absolute-URI check.
///
/// Rejects empty strings, scheme-less input and anything `Url::parse` cannot
/// handle. Does not check reachability, scheme allow-listing or content type.
pub fn validate_url(candidate: &str) -> Result<DownloadRequest> {
    let url = Url::parse(candidate).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    Ok(DownloadRequest::new(url))
}

pub struct Pipeline {
    cfg: Arc<Config>,
    fetcher: Arc<dyn MediaFetcher>,
    seq: AtomicU64,
}

impl Pipeline {
    pub fn new(cfg: Arc<Config>, fetcher: Arc<dyn MediaFetcher>) -> Self {
        Self {
            cfg,
            fetcher,
            seq: AtomicU64::new(0),
        }
    }

    /// Handle one download request end to end.
    ///
    /// The user-visible outcome is decided here: a distinct message for
    /// invalid URLs, a generic one for any other failure before delivery,
    /// and silence (log only) for delivery/cleanup failures.
    pub async fn run(&self, chat_id: ChatId, candidate: &str, messenger: &dyn Messenger) {
        let request = match validate_url(candidate) {
            Ok(r) => r,
            Err(e) => {
                warn!(candidate, error = %e, "rejected download request");
                self.notify_failure(messenger, chat_id, &e).await;
                return;
            }
        };

        info!(url = %request.url(), "starting download");
        let workdir = self.request_workdir();
        if let Err(e) = tokio::fs::create_dir_all(&workdir).await {
            let e = Error::from(e);
            error!(url = %request.url(), error = %e, "download failed");
            self.notify_failure(messenger, chat_id, &e).await;
            return;
        }

        let (payload, file_path) = match self.prepare(&request, &workdir).await {
            Ok(v) => v,
            Err(e) => {
                error!(url = %request.url(), error = %e, "download failed");
                // Empty after a fetch/resolve failure; remove_dir refuses a
                // non-empty dir, so a file left behind by a read failure
                // stays in place.
                let _ = tokio::fs::remove_dir(&workdir).await;
                self.notify_failure(messenger, chat_id, &e).await;
                return;
            }
        };

        if let Err(e) = messenger.send_document(chat_id, &payload).await {
            // The file stays in place when the upload fails.
            error!(path = %file_path.display(), error = %e, "delivery failed");
            return;
        }
        info!(filename = %payload.filename, "delivered");

        self.cleanup(&file_path, &workdir).await;
    }

    /// Fetch, resolve and read: everything that has to succeed before an
    /// upload can be attempted.
    async fn prepare(
        &self,
        request: &DownloadRequest,
        workdir: &Path,
    ) -> Result<(DeliveryPayload, PathBuf)> {
        self.fetcher.fetch(request.url(), workdir).await?;

        let filename = self.fetcher.resolve_filename(request.url(), workdir).await?;
        if filename.is_empty() {
            return Err(Error::Resolve(
                "downloader printed no filename".to_string(),
            ));
        }

        let file_path = workdir.join(&filename);
        let bytes = tokio::fs::read(&file_path)
            .await
            .map_err(|source| Error::Read {
                path: file_path.clone(),
                source,
            })?;

        Ok((DeliveryPayload { filename, bytes }, file_path))
    }

    async fn cleanup(&self, file_path: &Path, workdir: &Path) {
        if let Err(e) = tokio::fs::remove_file(file_path).await {
            warn!(path = %file_path.display(), error = %e, "failed to remove downloaded file");
            return;
        }
        // Best-effort: leave the directory if anything else landed in it.
        let _ = tokio::fs::remove_dir(workdir).await;
    }

    /// A unique working directory per request, so two downloads resolving to
    /// the same title cannot clobber each other's output file.
    fn request_workdir(&self) -> PathBuf {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.cfg
            .download_dir
            .join(format!("req-{}-{millis}-{seq}", std::process::id()))
    }

    async fn notify_failure(&self, messenger: &dyn Messenger, chat_id: ChatId, e: &Error) {
        if let Err(send_err) = messenger.send_text(chat_id, e.user_message()).await {
            warn!(error = %send_err, "failed to send failure notice");
        }
    }
}
