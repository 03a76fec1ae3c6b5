#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod dashboards;
pub mod projections;
pub mod routes;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;

    // The fact table must be complete before the first request is served
    let fact_table = projections::p910_sales_fact::repository::initialize_fact_table(&config.data)
        .map_err(|e| anyhow::anyhow!("sales data load failed: {e}"))?;
    tracing::info!("Sales data loaded: {} transactions", fact_table.len());

    let app = routes::configure_routes(&config.server.static_dir);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
