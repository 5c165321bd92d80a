use std::net::SocketAddr;

use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tomo_core::Config;

mod error;
mod routes;

#[derive(Clone)]
pub struct AppState {
	pub config: Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let config = Config::from_env();
	let port = config.port;
	let app = routes::router(AppState { config });

	// Listens on IPv6 and IPv4
	let mut addr = "[::]:8080".parse::<SocketAddr>()?;
	addr.set_port(port);
	let listener = tokio::net::TcpListener::bind(addr).await?;
	info!("Listening on http://localhost:{port}");

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(err) = signal::ctrl_c().await {
		tracing::error!(%err, "failed to install the shutdown handler");
	}
	info!("Shutting down");
}
