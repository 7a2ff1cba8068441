//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use hotel_deposit_db::DEFAULT_PAGE_SIZE;

#[derive(Parser)]
#[command(name = "hotel-deposit")]
#[command(about = "Catalog hotel deposit policies", long_about = None)]
pub(crate) struct Cli {
    /// Deposit database (overrides HOTEL_DEPOSIT_DB and settings.toml)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Print query results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Import hotels, brands and policies from a .json or .csv file
    Import {
        /// File to import
        file: PathBuf,

        /// Input format (inferred from the extension by default)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Roll back the whole file on the first bad record (default for JSON)
        #[arg(long, conflicts_with = "skip_errors")]
        fail_fast: bool,

        /// Skip bad records and commit the rest (default for CSV)
        #[arg(long)]
        skip_errors: bool,
    },

    /// Administrative changes to hotels, policies and brands
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Search hotels by name or city
    Search {
        /// At least two characters
        query: String,
    },

    /// List hotels one page at a time
    Hotels {
        #[command(flatten)]
        filter: HotelListArgs,
    },

    /// Show one hotel with its brand and deposit policy
    Hotel {
        /// Hotel slug (e.g., grand-hotel-paris)
        slug: String,
    },

    /// List brands with hotel counts, or the hotels of one brand
    Brands {
        /// Show the hotels of this brand (case-insensitive)
        brand: Option<String>,

        /// Only the N brands with the most hotels
        #[arg(long)]
        top: Option<usize>,
    },

    /// List the cities with the most hotels
    Cities,

    /// List every deposit policy
    Policies,

    /// Show catalog totals and deposit statistics
    Stats,

    /// Show recent imports
    History {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum FormatArg {
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum SortArg {
    /// Smallest deposit first
    Asc,
    /// Largest deposit first
    Desc,
}

/// Paging, store-side filters, and deposit filters applied to the page.
#[derive(Args, Clone)]
pub(crate) struct HotelListArgs {
    /// Only hotels whose city contains this text
    #[arg(long)]
    pub city: Option<String>,

    /// Only hotels whose brand contains this text
    #[arg(long)]
    pub brand: Option<String>,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Hotels per page
    #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: u32,

    /// Minimum fixed deposit (keeps fixed deposits only)
    #[arg(long)]
    pub min_amount: Option<f64>,

    /// Maximum fixed deposit (keeps fixed deposits only)
    #[arg(long)]
    pub max_amount: Option<f64>,

    /// Minimum percentage deposit (keeps percentage deposits only)
    #[arg(long, conflicts_with_all = ["min_amount", "max_amount"])]
    pub min_percent: Option<f64>,

    /// Maximum percentage deposit (keeps percentage deposits only)
    #[arg(long, conflicts_with_all = ["min_amount", "max_amount"])]
    pub max_percent: Option<f64>,

    /// Sort the page by deposit amount
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
}

/// Hotel fields shared by `admin add-hotel` and `admin update-hotel`.
#[derive(Args, Clone)]
pub(crate) struct HotelFieldArgs {
    /// Hotel name
    #[arg(long)]
    pub name: String,

    /// Brand id
    #[arg(long)]
    pub brand_id: Option<i64>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub zip: Option<String>,

    /// Country (default: USA)
    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[command(flatten)]
    pub policy: OptionalPolicyArgs,
}

/// Deposit policy given inline with hotel fields. All optional; a policy is
/// written only when `--deposit` is given.
#[derive(Args, Clone)]
pub(crate) struct OptionalPolicyArgs {
    /// Deposit amount (currency, or percentage points with --percentage)
    #[arg(long)]
    pub deposit: Option<f64>,

    /// Treat the deposit as a percentage of the stay
    #[arg(long, requires = "deposit")]
    pub percentage: bool,

    /// Days the deposit is held
    #[arg(long, requires = "deposit")]
    pub hold_days: Option<i64>,

    /// Refund terms
    #[arg(long, requires = "deposit")]
    pub refund_terms: Option<String>,
}

/// A deposit policy set on its own.
#[derive(Args, Clone)]
pub(crate) struct PolicyArgs {
    /// Deposit amount (currency, or percentage points with --percentage)
    #[arg(long)]
    pub deposit: f64,

    /// Treat the deposit as a percentage of the stay
    #[arg(long)]
    pub percentage: bool,

    /// Days the deposit is held
    #[arg(long)]
    pub hold_days: Option<i64>,

    /// Refund terms
    #[arg(long)]
    pub refund_terms: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum AdminAction {
    /// Import a JSON payload of brands and hotels with nested policies
    Import {
        /// Payload file
        file: PathBuf,
    },

    /// Create a hotel (fails if its slug exists)
    AddHotel {
        #[command(flatten)]
        fields: HotelFieldArgs,
    },

    /// Rewrite every field of a hotel
    UpdateHotel {
        /// Hotel id
        id: i64,

        #[command(flatten)]
        fields: HotelFieldArgs,
    },

    /// Delete a hotel and its policy
    DeleteHotel {
        /// Hotel id
        id: i64,
    },

    /// Create or replace a hotel's deposit policy
    SetPolicy {
        /// Hotel id
        hotel_id: i64,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Create a brand
    AddBrand {
        /// Brand name (exact)
        name: String,
    },

    /// Delete a brand (its hotels keep existing without a brand)
    DeleteBrand {
        /// Brand id
        id: i64,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file and the resolved database path
    Show,

    /// Print the settings file path
    Path,

    /// Save the database path in settings.toml
    SetDb {
        /// Database file
        path: PathBuf,
    },

    /// Remove the saved database path
    ClearDb,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_import_with_globals() {
        let cli = Cli::try_parse_from([
            "hotel-deposit",
            "import",
            "hotels.csv",
            "--fail-fast",
            "--db",
            "x.db",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        match cli.command {
            Commands::Import {
                file, fail_fast, ..
            } => {
                assert_eq!(file, PathBuf::from("hotels.csv"));
                assert!(fail_fast);
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn fail_fast_conflicts_with_skip_errors() {
        let result = Cli::try_parse_from([
            "hotel-deposit",
            "import",
            "hotels.csv",
            "--fail-fast",
            "--skip-errors",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn policy_flags_require_deposit() {
        let result = Cli::try_parse_from([
            "hotel-deposit",
            "admin",
            "add-hotel",
            "--name",
            "Bay Inn",
            "--percentage",
        ]);
        assert!(result.is_err());
    }
}
