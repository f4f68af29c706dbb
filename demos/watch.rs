use crypto_predictor::share::format_amount;
use crypto_predictor::{Dashboard, DashboardConfig, DashboardError, DashboardEvent};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional first argument picks the currency, e.g. `cargo run --example watch -- eur`
    let currency = std::env::args().nth(1);

    let dashboard = Dashboard::from_config(DashboardConfig::from_env())?;
    let mut events = dashboard.subscribe();

    if let Some(code) = currency {
        match dashboard.set_currency(&code).await {
            Ok(_) => {}
            Err(DashboardError::Fetch(e)) => {
                eprintln!("Switched to {}, but the first fetch failed: {}", code, e);
            }
            Err(e) => eprintln!("Could not switch to {}: {}", code, e),
        }
    }
    dashboard.start();

    println!("Crypto Predictor ({}), Ctrl-C to quit", dashboard.provider_name());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => {
                let Ok(event) = event else { continue };
                match event {
                    DashboardEvent::CoinsUpdated { .. } | DashboardEvent::FetchFailed { .. } => {
                        print_grid(&dashboard).await;
                    }
                    DashboardEvent::NotificationAdded { notification, .. } => {
                        println!(">> [{:?}] {}", notification.kind, notification.message);
                    }
                    _ => {}
                }
            }
        }
    }

    dashboard.shutdown();
    let metrics = dashboard.provider_metrics().await;
    println!(
        "Fetches: {} ({} failed), p50 {:.0}ms, p99 {:.0}ms",
        metrics.total_requests,
        metrics.failed_requests,
        metrics.latency_p50_ms,
        metrics.latency_p99_ms
    );

    Ok(())
}

async fn print_grid(dashboard: &Dashboard) {
    let state = dashboard.snapshot().await;
    let symbol = &state.currency().symbol;

    println!("\n{:-<78}", "");
    if let Some(error) = state.error() {
        println!("!! {}", error);
    }
    if let Some(message) = state.empty_state_message() {
        println!("{}", message);
        return;
    }

    println!(
        "{:<3}{:<18}{:<8}{:>16}{:>16}{:>9}{:>8}",
        "", "Name", "Symbol", "Price", "Predicted", "24h", "Exp."
    );
    for coin in state.filtered_coins() {
        let star = if state.is_favorite(&coin.symbol) { "*" } else { "" };
        println!(
            "{:<3}{:<18}{:<8}{:>16}{:>16}{:>8.2}%{:>7.2}%",
            star,
            coin.name,
            coin.symbol,
            format!("{}{}", symbol, format_amount(coin.current_price)),
            format!("{}{}", symbol, format_amount(coin.predicted_price)),
            coin.change_24h,
            coin.expected_change_pct()
        );
    }
}
