//! Telegram update handlers.
//!
//! Every text update is routed here: `/start` answers with the usage prompt,
//! `/download <url>` and plain text both feed the download pipeline. Non-text
//! updates are ignored.

use std::sync::Arc;

use teloxide::prelude::*;

use vget_core::domain::ChatId;

use crate::router::AppState;

/// Split `/cmd[@botname] rest`.
///
/// The rest is everything after the first space, verbatim: internal
/// whitespace is part of the argument.
fn parse_command(text: &str) -> Option<(String, &str)> {
    let stripped = text.strip_prefix('/')?;
    let (head, rest) = match stripped.split_once(' ') {
        Some((h, r)) => (h, r),
        None => (stripped, ""),
    };
    let cmd = head.split('@').next().unwrap_or("").to_lowercase();
    Some((cmd, rest))
}

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = ChatId(msg.chat.id.0);

    let candidate = match parse_command(text) {
        Some((cmd, rest)) => match cmd.as_str() {
            "start" => {
                let _ = bot
                    .send_message(msg.chat.id, "Please specify a video url")
                    .await;
                return Ok(());
            }
            "download" => rest,
            // Unknown commands fall through as URL candidates; the
            // validator sorts out the rest.
            _ => text,
        },
        None => text,
    };

    state
        .pipeline
        .run(chat_id, candidate, state.messenger.as_ref())
        .await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_argument_is_everything_after_the_first_space() {
        let (cmd, rest) = parse_command("/download https://example.com/v").unwrap();
        assert_eq!(cmd, "download");
        assert_eq!(rest, "https://example.com/v");
    }

    #[test]
    fn download_without_argument_yields_empty_candidate() {
        assert_eq!(parse_command("/download").unwrap(), ("download".to_string(), ""));
        assert_eq!(parse_command("/download ").unwrap(), ("download".to_string(), ""));
    }

    #[test]
    fn internal_whitespace_is_preserved_verbatim() {
        let (_, rest) = parse_command("/download  https://example.com/a b").unwrap();
        assert_eq!(rest, " https://example.com/a b");
    }

    #[test]
    fn bot_name_suffix_is_stripped_from_the_command() {
        let (cmd, rest) = parse_command("/start@vget_bot").unwrap();
        assert_eq!(cmd, "start");
        assert_eq!(rest, "");
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert!(parse_command("https://example.com/v").is_none());
    }
}
