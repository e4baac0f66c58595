//! Ports implemented by adapter crates.

use std::path::Path;

use async_trait::async_trait;
use url::Url;

use crate::{
    domain::{ChatId, DeliveryPayload},
    Result,
};

/// Outbound messaging to the chat transport.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a plain text status/error message.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;

    /// Upload a named document attachment; the payload filename is used as
    /// both the upload filename and the caption.
    async fn send_document(&self, chat_id: ChatId, payload: &DeliveryPayload) -> Result<()>;
}

/// External media downloader, invoked as a subprocess.
///
/// The two operations run the same tool with the same output template: one
/// performs the fetch, one only prints the filename the template resolves to.
/// The template must be deterministic for a given URL for the pair to agree.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download the media into `workdir`, blocking until the tool exits.
    async fn fetch(&self, url: &Url, workdir: &Path) -> Result<()>;

    /// Resolve the output filename for `url` without downloading.
    ///
    /// Returns the raw resolved name, which may be empty if the tool printed
    /// nothing; the caller decides how to treat that.
    async fn resolve_filename(&self, url: &Url, workdir: &Path) -> Result<String>;
}
