use url::Url;

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// A validated download request.
///
/// Constructed only via [`crate::pipeline::validate_url`]; holding one means
/// the URL is an absolute, well-formed URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadRequest {
    url: Url,
}

impl DownloadRequest {
    pub(crate) fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// The in-memory content of a downloaded file, ready for upload.
///
/// Lives for a single handler invocation; the filename doubles as the upload
/// caption.
#[derive(Clone, Debug)]
pub struct DeliveryPayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}
