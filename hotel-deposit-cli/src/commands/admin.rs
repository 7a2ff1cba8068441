use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use hotel_deposit_import::admin::{self, AdminPayload, HotelInput, PolicyInput};

use crate::CliError;
use crate::cli_types::{AdminAction, HotelFieldArgs, OptionalPolicyArgs, PolicyArgs};

use super::{open_db, print_json};

pub(crate) fn run_admin(db: Option<PathBuf>, action: AdminAction, json: bool) -> Result<(), CliError> {
    let (mut conn, _) = open_db(db)?;

    match action {
        AdminAction::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let payload = AdminPayload::from_json_str(&content)?;
            let stats = admin::import_payload(&mut conn, &payload)?;
            if json {
                return print_json(&stats);
            }
            done(&format!(
                "Imported {} hotels ({} new, {} updated), {} policies",
                stats.imported, stats.hotels_created, stats.hotels_updated, stats.policies_written,
            ));
        }
        AdminAction::AddHotel { fields } => {
            let slug = admin::create_hotel(&mut conn, &hotel_input(fields))?;
            if json {
                return print_json(&serde_json::json!({ "slug": slug }));
            }
            done(&format!("Created hotel {}", slug.if_supports_color(Stdout, |t| t.cyan())));
        }
        AdminAction::UpdateHotel { id, fields } => {
            let slug = admin::update_hotel(&mut conn, id, &hotel_input(fields))?;
            if json {
                return print_json(&serde_json::json!({ "id": id, "slug": slug }));
            }
            done(&format!(
                "Updated hotel {} ({})",
                id,
                slug.if_supports_color(Stdout, |t| t.cyan())
            ));
        }
        AdminAction::DeleteHotel { id } => {
            admin::delete_hotel(&mut conn, id)?;
            done(&format!("Deleted hotel {id}"));
        }
        AdminAction::SetPolicy { hotel_id, policy } => {
            admin::set_policy(&mut conn, hotel_id, &policy_input(policy))?;
            done(&format!("Set deposit policy for hotel {hotel_id}"));
        }
        AdminAction::AddBrand { name } => {
            let id = admin::create_brand(&mut conn, &name)?;
            if json {
                return print_json(&serde_json::json!({ "id": id, "brand_name": name }));
            }
            done(&format!("Brand {} has id {}", name.if_supports_color(Stdout, |t| t.bold()), id));
        }
        AdminAction::DeleteBrand { id } => {
            admin::delete_brand(&mut conn, id)?;
            done(&format!("Deleted brand {id}"));
        }
    }
    Ok(())
}

fn done(message: &str) {
    log::info!(
        "  {} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        message
    );
}

fn hotel_input(args: HotelFieldArgs) -> HotelInput {
    HotelInput {
        name: args.name,
        brand_id: args.brand_id,
        address: args.address,
        city: args.city,
        state: args.state,
        zip: args.zip,
        country: args.country,
        phone: args.phone,
        policy: optional_policy(args.policy),
    }
}

fn optional_policy(args: OptionalPolicyArgs) -> Option<PolicyInput> {
    args.deposit.map(|deposit_amount| PolicyInput {
        deposit_amount,
        is_percentage: args.percentage,
        hold_duration_days: args.hold_days,
        refund_terms: args.refund_terms,
    })
}

fn policy_input(args: PolicyArgs) -> PolicyInput {
    PolicyInput {
        deposit_amount: args.deposit,
        is_percentage: args.percentage,
        hold_duration_days: args.hold_days,
        refund_terms: args.refund_terms,
    }
}
