//! OptiFlow dashboard demo binary
//!
//! Builds the store over the mock service, activates it, loads every
//! resource and prints what a dashboard page would render.

use optiflow_dashboard::{
    selectors, DarkModeSignal, DashboardConfig, DashboardEnvironment, DashboardStore,
    FetchOutcome, Page,
};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Set to `1` to keep the demo running for one polling interval
const DEMO_POLL_VARIABLE: &str = "OPTIFLOW_DEMO_POLL";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "optiflow_dashboard=debug,optiflow_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "Demo failed");
            ExitCode::FAILURE
        },
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== OptiFlow Dashboard ===\n");

    let config = DashboardConfig::from_env()?;
    let signal = DarkModeSignal::default();
    let env = DashboardEnvironment::from_config(&config, Arc::new(signal.clone()));
    let store = DashboardStore::new(env, &config);

    let activation = store.activate().await?;
    println!("Activated with {} theme", signal.current());

    // Load every section
    println!("\n>>> Refreshing all resources");
    for (resource, outcome) in store.refresh_all().await? {
        match outcome {
            FetchOutcome::Loaded(dataset) => {
                println!("  {resource:<12} loaded {} record(s)", dataset.len());
            },
            FetchOutcome::Failed(message) => println!("  {resource:<12} failed: {message}"),
        }
    }

    // What the pages would render
    store
        .state(|state| {
            let kpis = &state.dashboard.kpis;
            println!("\n--- Dashboard ---");
            println!("  Forecast accuracy:  {:.1}%", kpis.forecast_accuracy);
            println!("  Cost savings:       ₹{}", kpis.cost_savings);
            println!("  Inventory turnover: {:.1}", kpis.inventory_turnover);
            println!("  Stockout rate:      {:.1}%", kpis.stockout_rate);
            for product in selectors::low_stock_products(&state.dashboard.top_products) {
                println!("  Low stock: {} ({} of {})", product.name, product.stock, product.demand);
            }

            println!("\n--- Orders ---");
            for (status, count) in selectors::order_status_breakdown(&state.orders) {
                println!("  {status:?}: {count}");
            }

            println!("\n--- Suppliers ---");
            println!("  Active: {}", selectors::active_supplier_count(&state.suppliers));
            if let Some(rating) = selectors::average_supplier_rating(&state.suppliers) {
                println!("  Average rating: {rating:.2}");
            }

            let summary = selectors::procurement_summary(&state.procurement);
            println!("\n--- Procurement ---");
            println!("  Total spend: ₹{}", summary.total_spend);
            println!(
                "  Active: {}  Delivered: {}  Delayed: {}",
                summary.active, summary.delivered, summary.delayed
            );
        })
        .await;

    println!("\n>>> Toggling theme");
    let theme = store.toggle_theme().await?;
    println!("Theme is now {theme} (platform shows {})", signal.current());

    println!("\n>>> Navigating to orders on an 800 px viewport");
    store.navigate(Page::Orders, 800).await?;
    let (page, sidebar_open) = store
        .state(|state| (state.ui.current_page, state.ui.sidebar_open))
        .await;
    println!("Page: {}, sidebar open: {sidebar_open}", page.label());

    if std::env::var(DEMO_POLL_VARIABLE).is_ok_and(|value| value == "1") {
        println!("\n>>> Waiting one polling interval ({:?})", config.poll_interval);
        tokio::time::sleep(config.poll_interval + Duration::from_secs(2)).await;
        println!("Polling ticks: {}", activation.ticks());
    }

    activation.deactivate().await?;
    store.shutdown(Duration::from_secs(5)).await?;

    println!("\n=== Demo Complete ===");
    Ok(())
}
