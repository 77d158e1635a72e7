pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::auth::AuthGateway;
use crate::core::config::AppConfig;
use crate::core::documents::{DocumentStore, ExpensePaths};
use crate::core::family::RelationKind;
use crate::core::record::{Category, MonthKey};
use crate::providers::{LocalDocumentStore, LocalSession};
use crate::store::family::FamilyStore;
use crate::store::profiles::{ProfileDirectory, UserProfile};
use crate::store::session::SessionGate;
use crate::store::{ExpenseStore, LocalStore};
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long startup waits for the expense list's first sync.
const SYNC_WAIT: Duration = Duration::from_secs(2);

pub enum AppCommand {
    Register {
        username: String,
        name: String,
        email: String,
        birth_date: Option<NaiveDate>,
    },
    Login {
        username: String,
        password: String,
    },
    Logout,
    Add {
        amount: f64,
        description: Option<String>,
        category: Option<Category>,
    },
    Remove {
        id: String,
    },
    Recent {
        limit: usize,
    },
    Summary {
        month: Option<MonthKey>,
    },
    Suggest,
    Family(FamilyCommand),
    Goal {
        monthly: Option<f64>,
        savings: Option<f64>,
    },
    Snapshot(SnapshotCommand),
}

pub enum FamilyCommand {
    Add {
        name: String,
        relation: RelationKind,
        spend: f64,
    },
    Remove {
        id: String,
    },
    List,
}

pub enum SnapshotCommand {
    Save,
    List,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("famfin starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_path = config.default_data_path()?;
    let local = LocalStore::open(&data_path)?;
    let documents: Arc<dyn DocumentStore> = Arc::new(LocalDocumentStore::new(local.clone()));
    let auth: Arc<dyn AuthGateway> = Arc::new(LocalSession::open(local.clone())?);

    let paths = ExpensePaths::new(config.namespace.clone());
    let profiles = ProfileDirectory::new(Arc::clone(&documents), &paths);
    let family = FamilyStore::new(local);
    let expenses = Arc::new(ExpenseStore::new(documents, paths));

    // Point the store at the restored identity before the command reads
    // anything, then let the gate follow any sign-in the command performs.
    let owner = auth
        .identities()
        .borrow()
        .clone()
        .and_then(|identity| identity.as_owner().map(str::to_string));
    expenses.set_active_owner(owner.as_deref()).await;
    let gate = SessionGate::spawn(Arc::clone(&auth), Arc::clone(&expenses));
    if !expenses.wait_until_live(SYNC_WAIT).await {
        warn!("Expense list is not live yet; output may lag behind");
    }

    let result = dispatch(
        command,
        &config,
        auth.as_ref(),
        &profiles,
        &family,
        &expenses,
    )
    .await;

    // Tear down the gate and the live subscription before the keyspace
    // handles go out of scope, so no spawned task still holds them.
    gate.shutdown().await;
    expenses.set_active_owner(None).await;

    result
}

async fn dispatch(
    command: AppCommand,
    config: &AppConfig,
    auth: &dyn AuthGateway,
    profiles: &ProfileDirectory,
    family: &FamilyStore,
    expenses: &ExpenseStore,
) -> Result<()> {
    match command {
        AppCommand::Register {
            username,
            name,
            email,
            birth_date,
        } => cli::session::register(auth, profiles, &username, &name, &email, birth_date).await,
        AppCommand::Login { username, password } => {
            cli::session::login(auth, profiles, &username, &password).await
        }
        AppCommand::Logout => cli::session::logout(auth).await,
        AppCommand::Add {
            amount,
            description,
            category,
        } => cli::expenses::add(expenses, amount, description, category).await,
        AppCommand::Remove { id } => cli::expenses::remove(expenses, &id).await,
        AppCommand::Recent { limit } => cli::expenses::recent(expenses, limit, &config.currency),
        AppCommand::Summary { month } => {
            let profile = current_profile(auth, profiles).await?;
            cli::summary::run(expenses, family, profile.as_ref(), month, &config.currency)
        }
        AppCommand::Suggest => cli::suggest::run(expenses, &config.currency),
        AppCommand::Family(command) => cli::family::run(family, command, &config.currency),
        AppCommand::Goal { monthly, savings } => {
            let profile = current_profile(auth, profiles).await?;
            cli::goals::run(profiles, profile, monthly, savings, &config.currency).await
        }
        AppCommand::Snapshot(command) => {
            let profile = current_profile(auth, profiles).await?;
            cli::snapshots::run(family, expenses, profile.as_ref(), command, &config.currency)
        }
    }
}

/// Profile of the signed-in identity, if any. Anonymous sessions have no
/// profile.
async fn current_profile(
    auth: &dyn AuthGateway,
    profiles: &ProfileDirectory,
) -> Result<Option<UserProfile>> {
    let identity = auth.identities().borrow().clone();
    match identity.as_ref().and_then(|identity| identity.as_owner()) {
        Some(uid) => Ok(profiles.get(uid).await?),
        None => Ok(None),
    }
}
