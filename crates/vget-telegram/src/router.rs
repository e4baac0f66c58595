use std::sync::Arc;

use anyhow::Context;
use teloxide::{dispatching::Dispatcher, dptree, prelude::*, types::BotCommand};
use tracing::info;

use vget_core::{config::Config, pipeline::Pipeline, ports::Messenger};

use crate::{handlers, TelegramMessenger};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub messenger: Arc<dyn Messenger>,
}

pub async fn run_polling(cfg: Arc<Config>, pipeline: Arc<Pipeline>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    bot.set_my_commands(vec![
        BotCommand::new("start", "Say hello"),
        BotCommand::new("download", "Download video with the url"),
    ])
    .await
    .context("failed to register bot commands")?;

    if let Ok(me) = bot.get_me().await {
        info!(username = me.username(), "bot started");
    }
    info!(download_dir = %cfg.download_dir.display(), "downloads land here");

    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot.clone()));

    let state = Arc::new(AppState {
        pipeline,
        messenger,
    });

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    // Ctrl-C stops accepting new updates; in-flight downloader processes are
    // left to finish on their own.
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
