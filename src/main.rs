//! Expense bot - recurring spending estimator for Telegram
//!
//! Asks what the user spends on, how much one occurrence costs and how
//! often it happens per month, then reports the monthly and yearly totals.

mod config;
mod gateway;
mod liveness;
mod projection;
mod replies;
mod runtime;
mod session;
mod state_machine;
mod validation;

use config::Config;
use gateway::{run_polling, TelegramGateway, POLL_RETRY_DELAY};
use liveness::{serve_health, HttpPingTarget, SelfPinger};
use runtime::DialogManager;
use session::SessionStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expense_bot=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env()?;
    let cancel = CancellationToken::new();

    // Liveness keeper
    let addr = SocketAddr::from(([0, 0, 0, 0], config.liveness.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let health_task = tokio::spawn(serve_health(listener, cancel.clone()));

    let ping_task = match &config.liveness.self_url {
        Some(url) => {
            let pinger = SelfPinger::new(
                HttpPingTarget::new(url.clone())?,
                config.liveness.ping_interval,
                config.liveness.ping_retry_delay,
            );
            Some(tokio::spawn(pinger.run(cancel.clone())))
        }
        None => {
            tracing::info!("EXPENSE_BOT_SELF_URL not set, self-ping disabled");
            None
        }
    };

    // Dialogs
    let telegram = TelegramGateway::new(&config.telegram_api_base, &config.bot_token)?;
    let store = Arc::new(SessionStore::new());
    let manager = DialogManager::new(store, Arc::new(telegram.clone()));

    tokio::spawn(shutdown_on_signal(cancel.clone()));

    run_polling(telegram.updates(), &manager, cancel.clone(), POLL_RETRY_DELAY).await;

    // Polling only returns once shutdown has been requested
    cancel.cancel();
    if let Some(task) = ping_task {
        let _ = task.await;
    }
    match health_task.await {
        Ok(Err(e)) => tracing::error!(error = %e, "Health responder failed"),
        Err(e) => tracing::error!(error = %e, "Health responder task panicked"),
        Ok(Ok(())) => {}
    }

    let store = manager.store();
    if store.is_empty() {
        tracing::info!("Shut down");
    } else {
        tracing::info!(
            active_dialogs = store.len(),
            live_runtimes = manager.runtime_count().await,
            "Shut down, in-progress dialogs discarded"
        );
    }
    Ok(())
}

async fn shutdown_on_signal(cancel: CancellationToken) {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot listen for SIGTERM");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }

    tracing::info!("Shutdown requested");
    cancel.cancel();
}
