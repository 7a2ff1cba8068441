//! Read-only catalog commands.

use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use hotel_deposit_catalog::{
    HotelView, filter_by_deposit_amount, filter_by_deposit_percentage, format_deposit,
    sort_by_deposit_amount, top_brands_by_hotel_count,
};
use hotel_deposit_db::HotelFilter;

use crate::CliError;
use crate::cli_types::{HotelListArgs, SortArg};

use super::{location, open_db, print_json, truncate_str};

const NAME_WIDTH: usize = 36;

pub(crate) fn run_search(db: Option<PathBuf>, query: &str, json: bool) -> Result<(), CliError> {
    let (conn, _) = open_db(db)?;
    if query.trim().chars().count() < 2 {
        log::warn!("Search needs at least two characters.");
    }
    let hits = hotel_deposit_db::search_hotels(&conn, query)?;
    if json {
        return print_json(&hits);
    }
    if hits.is_empty() {
        log::info!("No hotels match '{}'.", query);
        return Ok(());
    }
    print_hotel_rows(&hits);
    Ok(())
}

pub(crate) fn run_hotels(db: Option<PathBuf>, args: HotelListArgs, json: bool) -> Result<(), CliError> {
    let (conn, _) = open_db(db)?;
    let filter = HotelFilter {
        city: args.city.clone(),
        brand: args.brand.clone(),
    };
    let mut page = hotel_deposit_db::list_hotels(&conn, &filter, args.page, args.limit)?;

    if args.min_amount.is_some() || args.max_amount.is_some() {
        page.hotels = filter_by_deposit_amount(&page.hotels, args.min_amount, args.max_amount);
    } else if args.min_percent.is_some() || args.max_percent.is_some() {
        page.hotels = filter_by_deposit_percentage(&page.hotels, args.min_percent, args.max_percent);
    }
    if let Some(sort) = args.sort {
        page.hotels = sort_by_deposit_amount(&page.hotels, matches!(sort, SortArg::Asc));
    }

    if json {
        return print_json(&page);
    }

    log::info!(
        "{}",
        format!(
            "Hotels (page {} of {}, {} total)",
            page.page,
            page.total_pages.max(1),
            page.total
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );
    print_hotel_rows(&page.hotels);
    Ok(())
}

pub(crate) fn run_hotel(db: Option<PathBuf>, slug: &str, json: bool) -> Result<(), CliError> {
    let (conn, _) = open_db(db)?;
    let Some(hotel) = hotel_deposit_db::find_hotel_by_slug(&conn, slug)? else {
        return Err(CliError::not_found(format!("No hotel with slug '{slug}'")));
    };
    if json {
        return print_json(&hotel);
    }

    log::info!("{}", hotel.hotel_name.if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Slug:      {}", hotel.slug.if_supports_color(Stdout, |t| t.cyan()));
    log::info!("  Id:        {}", hotel.id);
    if let Some(brand) = &hotel.brand_name {
        log::info!("  Brand:     {}", brand);
    }
    if let Some(address) = &hotel.address {
        log::info!("  Address:   {}", address);
    }
    let place = location(hotel.city.as_deref(), hotel.state.as_deref());
    match &hotel.zip {
        Some(zip) => log::info!("  Location:  {} {} ({})", place, zip, hotel.country),
        None => log::info!("  Location:  {} ({})", place, hotel.country),
    }
    if let Some(phone) = &hotel.phone {
        log::info!("  Phone:     {}", phone);
    }
    crate::log_blank();

    match hotel.deposit_display() {
        Some(deposit) => {
            log::info!("  Deposit:   {}", deposit.if_supports_color(Stdout, |t| t.green()));
            if let Some(days) = hotel.hold_duration_days {
                log::info!("  Held for:  {} day(s)", days);
            }
            if let Some(terms) = &hotel.refund_terms {
                log::info!("  Refunds:   {}", terms);
            }
            if let Some(updated) = &hotel.last_updated {
                log::info!("  Updated:   {}", updated.if_supports_color(Stdout, |t| t.dimmed()));
            }
        }
        None => log::info!("  {}", "No deposit policy on file".if_supports_color(Stdout, |t| t.dimmed())),
    }
    Ok(())
}

pub(crate) fn run_brands(
    db: Option<PathBuf>,
    brand: Option<String>,
    top: Option<usize>,
    json: bool,
) -> Result<(), CliError> {
    let (conn, _) = open_db(db)?;

    if let Some(name) = brand {
        let hotels = hotel_deposit_db::hotels_for_brand(&conn, &name)?;
        if json {
            return print_json(&hotels);
        }
        if hotels.is_empty() {
            log::info!("No hotels for brand '{}'.", name);
            return Ok(());
        }
        print_hotel_rows(&hotels);
        return Ok(());
    }

    let mut brands = hotel_deposit_db::list_brands(&conn)?;
    if let Some(limit) = top {
        brands = top_brands_by_hotel_count(&brands, limit);
    }
    if json {
        return print_json(&brands);
    }
    for brand in &brands {
        log::info!(
            "  {:>5}  {:<40} {}",
            brand.id.if_supports_color(Stdout, |t| t.dimmed()),
            brand.brand_name,
            format!("{} hotel(s)", brand.hotel_count).if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    Ok(())
}

pub(crate) fn run_cities(db: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let (conn, _) = open_db(db)?;
    let cities = hotel_deposit_db::list_cities(&conn)?;
    if json {
        return print_json(&cities);
    }
    for city in &cities {
        log::info!(
            "  {:<40} {:>5}",
            location(city.city.as_deref(), city.state.as_deref()),
            city.hotel_count,
        );
    }
    Ok(())
}

pub(crate) fn run_policies(db: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let (conn, _) = open_db(db)?;
    let policies = hotel_deposit_db::list_policies(&conn)?;
    if json {
        return print_json(&policies);
    }
    for p in &policies {
        log::info!(
            "  {:>5}  hotel {:>5}  {:>10}  {}",
            p.id,
            p.hotel_id,
            format_deposit(p.deposit_amount, p.is_percentage),
            p.refund_terms.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

pub(crate) fn run_history(db: Option<PathBuf>, limit: u32, json: bool) -> Result<(), CliError> {
    let (conn, _) = open_db(db)?;
    let logs = hotel_deposit_db::list_import_logs(&conn, Some(limit))?;
    if json {
        return print_json(&logs);
    }
    if logs.is_empty() {
        log::info!("No imports recorded yet.");
        return Ok(());
    }
    for entry in &logs {
        log::info!(
            "  {}  {:<5} {:<30} {} new, {} updated, {} skipped",
            entry.imported_at.if_supports_color(Stdout, |t| t.dimmed()),
            entry.source_type,
            truncate_str(&entry.source_name, 30),
            entry.records_created,
            entry.records_updated,
            entry.records_skipped,
        );
    }
    Ok(())
}

fn print_hotel_rows(rows: &[HotelView]) {
    for h in rows {
        let deposit = h.deposit_display().unwrap_or_else(|| "-".to_string());
        log::info!(
            "  {:<width$} {:<24} {:>10}  {}",
            truncate_str(&h.hotel_name, NAME_WIDTH),
            truncate_str(&location(h.city.as_deref(), h.state.as_deref()), 24),
            deposit,
            h.slug.if_supports_color(Stdout, |t| t.dimmed()),
            width = NAME_WIDTH,
        );
    }
}
