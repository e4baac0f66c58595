use std::path::PathBuf;

/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the pipeline
/// can decide what the user sees (invalid-URL message vs generic failure).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("filename resolution failed: {0}")]
    Resolve(String),

    #[error("read failed: {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// What the user sees when this error aborts a request before delivery.
    ///
    /// Validation failures get a distinct message; everything else is the
    /// same generic failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::InvalidUrl(_) => "Invalid URL",
            _ => "Something went wrong",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_gets_distinct_user_message() {
        let e = Error::InvalidUrl("relative URL without a base".to_string());
        assert_eq!(e.user_message(), "Invalid URL");
    }

    #[test]
    fn other_errors_get_generic_user_message() {
        let fetch = Error::Fetch("yt-dlp exited with status 1".to_string());
        assert_eq!(fetch.user_message(), "Something went wrong");

        let read = Error::Read {
            path: PathBuf::from("/tmp/x.mp4"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(read.user_message(), "Something went wrong");
    }
}
