use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use hotel_deposit_catalog::{deposit_stats, format_deposit};

use crate::CliError;

use super::{open_db, print_json};

pub(crate) fn run_stats(db: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let (conn, db_path) = open_db(db)?;

    let analytics = hotel_deposit_db::deposit_analytics(&conn)?;
    let policies = hotel_deposit_db::list_policies(&conn)?;
    let deposits = deposit_stats(&policies);

    if json {
        return print_json(&serde_json::json!({
            "analytics": analytics,
            "deposits": deposits,
        }));
    }

    log::info!(
        "{}",
        "Deposit Catalog Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("  Hotels:            {:>8}", analytics.total_hotels);
    log::info!("  Brands:            {:>8}", analytics.total_brands);
    log::info!("  Policies:          {:>8}", analytics.total_policies);
    log::info!("    fixed:           {:>8}", deposits.fixed_count);
    log::info!("    percentage:      {:>8}", deposits.percentage_count);
    crate::log_blank();
    log::info!(
        "  Average deposit:   {:>8}",
        format_deposit(analytics.avg_deposit.unwrap_or(0.0), false),
    );
    log::info!("  Lowest deposit:    {:>8}", format_deposit(deposits.min, false));
    log::info!("  Highest deposit:   {:>8}", format_deposit(deposits.max, false));

    Ok(())
}
