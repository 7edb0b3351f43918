// spire-client/examples/find_order.rs
// Look up an order and optionally put it on hold
//
// Usage: find_order <order_id> [--hold]
// Reads SPIRE_BASE_URL / SPIRE_TOKEN / SPIRE_TIMEOUT_SECS (a .env file is honoured).

use spire_client::{ClientConfig, ErrorKind, Order, OrderId};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(id) = args.get(1).and_then(|a| a.parse::<u64>().ok()) else {
        println!("Usage: {} <order_id> [--hold]", args[0]);
        return Ok(());
    };
    let hold = args.iter().any(|a| a == "--hold");

    let config = ClientConfig::from_env();
    let client = config.build_http_client()?;
    tracing::info!(base_url = %client.base_url(), "Client ready");

    let mut order = match Order::find(&client, OrderId(id)).await {
        Ok(order) => order,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(order_id = id, "Order does not exist");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let attrs = order.attributes();
    tracing::info!(
        order_no = ?attrs.order_no,
        status = ?order.status(),
        total = ?attrs.total,
        lines = attrs.items.as_ref().map_or(0, Vec::len),
        valid = order.is_valid(),
        "Order loaded"
    );

    if hold {
        order.put_on_hold();
        order.update(&client).await?;
        tracing::info!(changes = ?order.previous_changes(), "Order put on hold");
    }

    Ok(())
}
