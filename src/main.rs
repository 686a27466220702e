// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use wallet_assets_server::{
    api::router,
    blockchain::{aggregate::KnownTokenAggregator, upstream::JsonRpcClient},
    config::{AppConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    services::WalletAssets,
    state::AppState,
};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let aggregator = JsonRpcClient::new(&config.aggregator_url, config.upstream_timeout)
        .expect("aggregator URL validated by config");
    let chain_rpc = JsonRpcClient::new(&config.chain_rpc_url, config.upstream_timeout)
        .expect("chain RPC URL validated by config");

    tracing::info!(
        aggregator = aggregator.host(),
        chain_rpc = chain_rpc.host(),
        blockchain = %config.blockchain,
        balance_source = config.balance_source.as_str(),
        known_tokens = config.known_tokens.len(),
        timeout_secs = config.upstream_timeout.as_secs(),
        "Configuration loaded"
    );

    let known_tokens = KnownTokenAggregator::new(Arc::new(chain_rpc), config.known_tokens);
    let mut assets = WalletAssets::new(
        Arc::new(aggregator),
        known_tokens,
        config.blockchain,
        config.balance_source,
    );
    if let Some(url) = &config.quicknode_url {
        let quicknode = JsonRpcClient::new(url, config.upstream_timeout)
            .expect("QuickNode URL validated by config");
        tracing::info!(quicknode = quicknode.host(), "QuickNode token API enabled");
        assets = assets.with_quicknode(Arc::new(quicknode));
    }
    let app = router(AppState::new(assets, config.public_base_url));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(addr = %config.bind_addr, "Wallet assets server listening (docs at /docs)");

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
    {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }

    tracing::info!("Wallet assets server stopped gracefully");
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
