use std::sync::Arc;

use vget_core::{config::Config, pipeline::Pipeline};
use vget_ytdlp::YtDlpFetcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vget_core::logging::init("vget");

    let cfg = Arc::new(Config::load()?);
    let fetcher = Arc::new(YtDlpFetcher::new(&cfg));
    let pipeline = Arc::new(Pipeline::new(cfg.clone(), fetcher));

    vget_telegram::router::run_polling(cfg, pipeline).await
}
