use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use log::info;

use farmdesk::backend::factory::create_store;
use farmdesk::backend::StoreHandle;
use farmdesk::config::Config;
use farmdesk::constants::ERROR_NO_PUBLIC_KEY;
use farmdesk::dashboard::Dashboard;
use farmdesk::notify::LogNotifier;
use farmdesk::utils::datetime;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_or_init()?;
    farmdesk::logger::init(&config.logging)?;

    // Check if the public key is set
    if config.store.backend == "http" && config.store.public_key().is_none() {
        eprintln!("{}", ERROR_NO_PUBLIC_KEY);
        eprintln!("\n💡 To use this app:");
        eprintln!("1. Copy the public key of your project from the record service console");
        eprintln!(
            "2. Set it as environment variable: export {}=your_key_here",
            config.store.public_key_env
        );
        eprintln!("3. Run the app again to see your farm data!");
        return Ok(());
    }

    let store = create_store(&config.store)?;
    info!("Using {} record store", store.store_type());

    let dashboard = Dashboard::new(StoreHandle::new(store), Arc::new(LogNotifier))
        .with_upcoming_window(config.dashboard.upcoming_window_days);
    let snapshot = dashboard.load().await;
    let today = Local::now().date_naive();

    println!("Farms ({})", snapshot.farms.len());
    for farm in &snapshot.farms {
        let crops = snapshot.crops_per_farm.get(&farm.id.to_string()).copied().unwrap_or(0);
        println!(
            "  {} - {} ({} {}) - {} crops",
            farm.name, farm.location, farm.size, farm.size_unit, crops
        );
    }

    println!("\nUpcoming tasks ({})", snapshot.upcoming_tasks.len());
    for task in &snapshot.upcoming_tasks {
        println!(
            "  [{}] {} - {}",
            task.priority,
            task.title,
            datetime::format_human_due(&task.due_date, today)
        );
    }

    let summary = &snapshot.summary;
    println!("\nIncome:   {:>12.2}", summary.total_income);
    println!("Expenses: {:>12.2}", summary.total_expenses);
    println!("Balance:  {:>12.2}", summary.net_balance);

    Ok(())
}
