use relay_app::AppContext;
use std::net::{Ipv4Addr, SocketAddr};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let app_context = match AppContext::from_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let port = app_context.config.port;
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    tracing::info!("Environment: {}", app_context.config.environment);
    tracing::info!(
        "Serving static files from {}",
        app_context.config.static_dir.display()
    );
    if !app_context.config.is_production() {
        tracing::info!("Local server: go to http://localhost:{}", port);
    }

    if let Err(e) = relay_api::run_server(app_context, addr).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
