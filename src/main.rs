//! Shipping quotes server binary.

use anyhow::Context;
use shipping_quotes::api::rest::{AppState, create_router};
use shipping_quotes::application::services::{
    GuideCreationService, MarginSettingsService, QuoteAggregator,
};
use shipping_quotes::config::{LogFormat, LoggingSettings, Settings};
use shipping_quotes::domain::entities::GlobalMarginConfig;
use shipping_quotes::infrastructure::persistence::in_memory::{
    InMemoryMarginConfigRepository, InMemoryTokenRepository,
};
use shipping_quotes::infrastructure::persistence::TokenRepository;
use shipping_quotes::infrastructure::providers::{
    GeAdapter, GuideProvider, HttpClient, ManuableAdapter, PakkeAdapter, QuoteProvider,
    ToneAdapter,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    init_tracing(&settings.logging)?;

    let environment = settings.environment.environment();
    let http = HttpClient::new(settings.http.timeout_ms).context("failed to build HTTP client")?;
    let tokens: Arc<dyn TokenRepository> = Arc::new(InMemoryTokenRepository::new());
    let margins = Arc::new(InMemoryMarginConfigRepository::with_config(
        GlobalMarginConfig::new(settings.margins.global_margin()),
    ));

    let providers = &settings.providers;
    let ge = Arc::new(GeAdapter::new(providers.ge.clone(), http.clone()));
    let tone = Arc::new(ToneAdapter::new(providers.tone.clone(), http.clone()));
    let pakke = Arc::new(PakkeAdapter::new(providers.pakke.clone(), http.clone()));
    let manuable = Arc::new(ManuableAdapter::new(
        providers.manuable.clone(),
        http,
        tokens,
        environment.is_prod(),
    ));

    let quote_providers: Vec<Arc<dyn QuoteProvider>> =
        vec![ge.clone(), tone.clone(), pakke.clone(), manuable.clone()];
    let guide_providers: [Arc<dyn GuideProvider>; 4] = [ge, tone, pakke, manuable];

    let aggregator = QuoteAggregator::new(quote_providers, margins.clone());
    let guides = guide_providers
        .into_iter()
        .fold(GuideCreationService::new(), GuideCreationService::with_provider);
    let margin_settings =
        MarginSettingsService::new(margins).with_default_margin(settings.margins.global_margin());

    let state = Arc::new(AppState {
        aggregator: Arc::new(aggregator),
        guides: Arc::new(guides),
        margins: Arc::new(margin_settings),
    });

    let addr = settings.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        %addr,
        %environment,
        global_margin = %settings.margins.global_margin(),
        "shipping quotes server listening"
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingSettings) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
