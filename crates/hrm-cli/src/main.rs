//! HRM CLI - Command-line interface for the embedded HR document store.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{Context, SelectArgs};
use hrm_config_and_utils::{init_logging, Config, DEFAULT_LOG_LEVEL};
use hrm_document_store::{
    CategoryScores, Collection, CreateEmployeeRequest, ErrorShape, SignUpOptions, StoreError,
};
use std::path::PathBuf;
use tracing::debug;

/// HRM CLI - Query and manage the embedded HR document store.
#[derive(Parser)]
#[command(name = "hrm")]
#[command(about = "Query, authenticate against, and back up the HR document store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error); defaults to the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Data directory (overrides HRM_DATA_DIR and ~/.hrm)
    #[arg(long, global = true, env = "HRM_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read records from a collection
    Select {
        /// Collection name (profiles, messages, tasks, meetings, attendance, evaluations, user_roles)
        collection: Collection,
        /// Columns to return: * or a comma-separated list
        #[arg(short, long, default_value = "*")]
        columns: String,
        /// Equality filter column=value; repeat to AND several
        #[arg(long = "eq", value_name = "COLUMN=VALUE")]
        filters: Vec<String>,
        /// Column to order by
        #[arg(long)]
        order: Option<String>,
        /// Order descending instead of ascending
        #[arg(long, requires = "order")]
        desc: bool,
        /// Maximum number of rows
        #[arg(long)]
        limit: Option<usize>,
        /// Return only the first row
        #[arg(long)]
        single: bool,
    },

    /// Insert one record or an array of records
    Insert {
        collection: Collection,
        /// JSON text, @file, or - for stdin
        json: String,
    },

    /// Merge a patch into every record matching a filter
    Update {
        collection: Collection,
        /// JSON patch, @file, or - for stdin
        json: String,
        /// Equality filter column=value
        #[arg(long = "eq", value_name = "COLUMN=VALUE")]
        filter: String,
    },

    /// Delete every record matching a filter
    Delete {
        collection: Collection,
        /// Equality filter column=value
        #[arg(long = "eq", value_name = "COLUMN=VALUE")]
        filter: String,
    },

    /// Insert a record, or merge it into the first record with the same key
    Upsert {
        collection: Collection,
        /// JSON record, @file, or - for stdin
        json: String,
        /// Field that decides update vs insert
        #[arg(long, default_value = "id")]
        on_conflict: String,
    },

    /// Sign up, sign in, sign out, show session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Write a backup of the whole store
    Export {
        /// Directory for the backup file (defaults to <data-dir>/exports)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print the document instead of writing a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },

    /// Replace the whole store with a backup file
    Import {
        file: PathBuf,
    },

    /// Manage employee accounts
    Employee {
        #[command(subcommand)]
        command: EmployeeCommands,
    },

    /// Record a performance evaluation
    Evaluate {
        /// Profile id of the employee being evaluated
        #[arg(long)]
        employee: String,
        /// Profile id of the evaluator (defaults to the signed-in user)
        #[arg(long)]
        evaluator: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        productivity: u8,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        quality: u8,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        teamwork: u8,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        communication: u8,
        #[arg(long)]
        comments: Option<String>,
    },

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Create an account and sign in
    SignUp {
        #[arg(long)]
        email: Option<String>,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        position: Option<String>,
    },
    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: Option<String>,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Clear the session
    SignOut,
    /// Show the current session
    Session,
}

#[derive(Subcommand)]
enum EmployeeCommands {
    /// Provision an employee with a temporary password
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        position: Option<String>,
        /// employee, manager, admin or hr
        #[arg(long)]
        role: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn run(cli: Cli) -> Result<()> {
    let format = cli.format;
    let paths = commands::resolve_paths(cli.data_dir)?;
    paths.ensure_dirs()?;

    // Init must work even when the existing config file does not load.
    if let Commands::Config {
        command: ConfigCommands::Init { force },
    } = cli.command
    {
        let level = cli.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
        init_logging(&paths, level, false);
        return commands::config_init(&paths, force, format);
    }

    let config = Config::load(&paths)?;
    let level = cli.log_level.unwrap_or_else(|| config.log_level.clone());
    init_logging(&paths, &level, config.log_to_stderr);
    debug!(data_dir = %paths.base_dir().display(), "Starting hrm");

    let ctx = Context::open(paths, config)?;

    match cli.command {
        Commands::Select {
            collection,
            columns,
            filters,
            order,
            desc,
            limit,
            single,
        } => commands::select(
            &ctx,
            SelectArgs {
                collection,
                columns: &columns,
                filters: &filters,
                order: order.as_deref(),
                descending: desc,
                limit,
                single,
            },
            format,
        ),
        Commands::Insert { collection, json } => commands::insert(&ctx, collection, &json, format),
        Commands::Update {
            collection,
            json,
            filter,
        } => commands::update(&ctx, collection, &json, &filter, format),
        Commands::Delete { collection, filter } => {
            commands::delete(&ctx, collection, &filter, format)
        }
        Commands::Upsert {
            collection,
            json,
            on_conflict,
        } => commands::upsert(&ctx, collection, &json, &on_conflict, format),
        Commands::Auth { command } => match command {
            AuthCommands::SignUp {
                email,
                password,
                full_name,
                department,
                position,
            } => commands::auth_sign_up(
                &ctx,
                email,
                password,
                SignUpOptions {
                    full_name,
                    department,
                    position,
                },
                format,
            ),
            AuthCommands::SignIn { email, password } => {
                commands::auth_sign_in(&ctx, email, password, format)
            }
            AuthCommands::SignOut => commands::auth_sign_out(&ctx, format),
            AuthCommands::Session => commands::auth_session(&ctx, format),
        },
        Commands::Export { out, stdout } => commands::export(&ctx, out, stdout, format),
        Commands::Import { file } => commands::import(&ctx, &file, format),
        Commands::Employee { command } => match command {
            EmployeeCommands::Create {
                email,
                full_name,
                department,
                position,
                role,
            } => commands::employee_create(
                &ctx,
                CreateEmployeeRequest {
                    email,
                    full_name,
                    department,
                    position,
                    role,
                },
                format,
            ),
        },
        Commands::Evaluate {
            employee,
            evaluator,
            productivity,
            quality,
            teamwork,
            communication,
            comments,
        } => commands::evaluate(
            &ctx,
            employee,
            evaluator,
            CategoryScores {
                productivity,
                quality,
                teamwork,
                communication,
            },
            comments,
            format,
        ),
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config_show(&ctx, format),
            ConfigCommands::Init { force } => commands::config_init(&ctx.paths, force, format),
        },
    }
}

fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    if let Err(e) = run(cli) {
        let shape = match e.downcast_ref::<StoreError>() {
            Some(err) => ErrorShape::from(err),
            None => ErrorShape {
                code: "cli_error".to_string(),
                message: format!("{:#}", e),
            },
        };
        output::print_error(&shape, format);
        std::process::exit(1);
    }
}
