use anyhow::{Context, Result};
use clap::Parser;
use recipe_dash::config::Args;
use recipe_dash::{build_router, state};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.default_log_level()),
    )
    .init();

    log::info!("Starting recipe-dash v{}", env!("CARGO_PKG_VERSION"));

    let state = match state::load(&args.healthy, &args.epicurious) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to load datasets: {e:#}");
            return Err(e);
        }
    };

    let app = build_router(state);

    let addr = args.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("recipe-dash listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
