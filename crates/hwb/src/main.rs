use std::{process, sync::Arc};

use hwb_core::{
    config::Config,
    errors::Error,
    poll::PollLoop,
    ports::SystemClock,
};
use hwb_practicum::PracticumClient;
use hwb_telegram::TelegramMessenger;

#[tokio::main]
async fn main() -> Result<(), Error> {
    hwb_core::logging::init("hwb")?;

    let cfg = Config::load().unwrap_or_else(|e| fatal(e));
    tracing::debug!(config = ?cfg, "configuration loaded");

    let source = Arc::new(PracticumClient::new(&cfg).unwrap_or_else(|e| fatal(e)));
    let messenger = Arc::new(TelegramMessenger::from_token(
        cfg.credentials.chat_token.clone(),
    ));

    PollLoop::new(&cfg, source, messenger, Arc::new(SystemClock))
        .run()
        .await;

    Ok(())
}

/// Startup failures happen before the chat is usable, so nothing is sent.
fn fatal(e: Error) -> ! {
    tracing::error!(severity = "critical", error = %e, "{e}. Завершаю работу!");
    process::exit(1);
}
