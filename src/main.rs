use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use famfin::core::family::RelationKind;
use famfin::core::log::init_logging;
use famfin::core::record::{Category, MonthKey};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for famfin::AppCommand {
    fn from(cmd: Commands) -> famfin::AppCommand {
        match cmd {
            Commands::Register {
                username,
                name,
                email,
                birth_date,
            } => famfin::AppCommand::Register {
                username,
                name,
                email,
                birth_date,
            },
            Commands::Login { username, password } => famfin::AppCommand::Login {
                username,
                password: password.unwrap_or_default(),
            },
            Commands::Logout => famfin::AppCommand::Logout,
            Commands::Add {
                amount,
                description,
                category,
            } => famfin::AppCommand::Add {
                amount,
                description,
                category,
            },
            Commands::Remove { id } => famfin::AppCommand::Remove { id },
            Commands::Recent { limit } => famfin::AppCommand::Recent { limit },
            Commands::Summary { month } => famfin::AppCommand::Summary { month },
            Commands::Suggest => famfin::AppCommand::Suggest,
            Commands::Family { command } => famfin::AppCommand::Family(command.into()),
            Commands::Goal { monthly, savings } => famfin::AppCommand::Goal { monthly, savings },
            Commands::Snapshot { command } => famfin::AppCommand::Snapshot(command.into()),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Create an account and sign in
    Register {
        /// Username for the new account
        username: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: Option<NaiveDate>,
    },
    /// Sign in to an existing account
    Login {
        /// Username of the account
        username: String,
        /// Password for the account
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign out of the current account
    Logout,
    /// Record an expense
    Add {
        /// Amount spent
        amount: f64,
        /// What the money went to; omit for a quick entry
        #[arg(short, long)]
        description: Option<String>,
        /// Category: food, transport, leisure, housing, health, education or other
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Delete a recorded expense
    Remove {
        /// Id of the expense to delete
        id: String,
    },
    /// Display the most recent expenses
    Recent {
        /// How many records to show
        #[arg(short = 'n', long, default_value_t = 5)]
        limit: usize,
    },
    /// Display monthly spending summary
    Summary {
        /// Month to summarize (YYYY-MM); defaults to the current month
        #[arg(long)]
        month: Option<MonthKey>,
    },
    /// Display savings suggestions
    Suggest,
    /// Manage family members
    Family {
        #[command(subcommand)]
        command: FamilyCommands,
    },
    /// Set monthly spending and savings goals
    Goal {
        /// Monthly spending goal
        #[arg(long)]
        monthly: Option<f64>,
        /// Monthly savings goal
        #[arg(long)]
        savings: Option<f64>,
    },
    /// Save or list monthly snapshots
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommands,
    },
}

#[derive(Subcommand)]
enum FamilyCommands {
    /// Add a family member
    Add {
        /// Member name
        name: String,
        /// Relation: spouse, child, father, mother or free text
        #[arg(default_value = "Other")]
        relation: RelationKind,
        /// Self-reported monthly spend
        #[arg(default_value_t = 0.0)]
        spend: f64,
    },
    /// Remove a family member
    Remove {
        /// Id of the member to remove
        id: String,
    },
    /// List family members
    List,
}

impl From<FamilyCommands> for famfin::FamilyCommand {
    fn from(cmd: FamilyCommands) -> famfin::FamilyCommand {
        match cmd {
            FamilyCommands::Add {
                name,
                relation,
                spend,
            } => famfin::FamilyCommand::Add {
                name,
                relation,
                spend,
            },
            FamilyCommands::Remove { id } => famfin::FamilyCommand::Remove { id },
            FamilyCommands::List => famfin::FamilyCommand::List,
        }
    }
}

#[derive(Subcommand)]
enum SnapshotCommands {
    /// Capture the current month's standing
    Save,
    /// List saved snapshots
    List,
}

impl From<SnapshotCommands> for famfin::SnapshotCommand {
    fn from(cmd: SnapshotCommands) -> famfin::SnapshotCommand {
        match cmd {
            SnapshotCommands::Save => famfin::SnapshotCommand::Save,
            SnapshotCommands::List => famfin::SnapshotCommand::List,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => famfin::cli::setup::setup(),
        Some(cmd) => famfin::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
