//! DIDReg Command Line Interface
//!
//! Interactive wrappers around the identity registry: register, update,
//! deactivate, and look up DID records. The registry core stays in
//! `didreg-registry`; this binary only prompts, formats, persists, and
//! relays calls.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use didreg_registry::DidRegistry;
use didreg_store::RegistryDb;
use didreg_types::{Handle, Identity};
use rand::rngs::OsRng;
use serde_json::Value;
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

mod audit;
mod config;
mod documents;
mod logging;
mod prompt;

use crate::audit::AuditLog;
use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "didreg")]
#[command(about = "DIDReg identity registry command line interface", long_about = None)]
#[command(version)]
struct Cli {
    /// Caller identity key (falls back to DIDREG_IDENTITY or the config file)
    #[arg(long, global = true)]
    identity: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new DID record
    Create(CreateCommand),
    /// Update the documents of your DID record
    Update(UpdateCommand),
    /// Permanently deactivate your DID record
    Deactivate(DeactivateCommand),
    /// Look up DID records
    View {
        #[command(subcommand)]
        action: ViewCommands,
    },
    /// Resolve a public handle to its owner identity
    Resolve {
        /// Public handle
        handle: String,
    },
    /// Show record status and metadata
    Status {
        /// Owner identity (defaults to the caller identity)
        #[arg(value_name = "IDENTITY")]
        owner: Option<String>,
    },
}

#[derive(Args)]
struct CreateCommand {
    /// Full name (prompted when omitted)
    #[arg(long)]
    name: Option<String>,
    /// Email address (prompted when omitted)
    #[arg(long)]
    email: Option<String>,
    /// Organization (prompted when omitted)
    #[arg(long)]
    organization: Option<String>,
    /// Role (prompted when omitted)
    #[arg(long)]
    role: Option<String>,
    /// Public handle; a random 8-hex-character id is generated when omitted
    #[arg(long)]
    handle: Option<String>,
    /// Skip the interactive confirmation
    #[arg(long)]
    yes: bool,
}

#[derive(Args)]
struct UpdateCommand {
    /// New name (press Enter at the prompt to keep the current value)
    #[arg(long)]
    name: Option<String>,
    /// New email
    #[arg(long)]
    email: Option<String>,
    /// New organization
    #[arg(long)]
    organization: Option<String>,
    /// New role
    #[arg(long)]
    role: Option<String>,
    /// Skip the interactive confirmation
    #[arg(long)]
    yes: bool,
}

#[derive(Args)]
struct DeactivateCommand {
    /// Skip the interactive confirmation
    #[arg(long)]
    yes: bool,
}

#[derive(Subcommand)]
enum ViewCommands {
    /// Public view through a handle
    Public {
        /// Public handle
        handle: String,
    },
    /// Private view of your own record
    Private,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = CliConfig::load(cli.config.as_deref(), cli.identity.as_deref())?;
    logging::init(&cfg.log_level);

    let audit = AuditLog::open(&cfg.log_dir)?;
    let db = RegistryDb::open(&cfg.data_dir)
        .with_context(|| format!("failed to open record database at {}", cfg.data_dir))?;
    let registry = DidRegistry::from_records(db.load_records()?)
        .context("stored records are inconsistent")?;
    tracing::debug!(records = registry.len(), "registry rehydrated");

    let result = match cli.command {
        Commands::Create(cmd) => handle_create(cmd, &cfg, &registry, &db, &audit),
        Commands::Update(cmd) => handle_update(cmd, &cfg, &registry, &db, &audit),
        Commands::Deactivate(cmd) => handle_deactivate(cmd, &cfg, &registry, &db, &audit),
        Commands::View { action } => handle_view(action, &cfg, &registry),
        Commands::Resolve { handle } => handle_resolve(&handle, &registry),
        Commands::Status { owner } => handle_status(owner, &cfg, &registry),
    };

    if let Err(err) = &result {
        let _ = audit.error(&format!("{err:#}"));
    }
    result
}

fn handle_create(
    cmd: CreateCommand,
    cfg: &CliConfig,
    registry: &DidRegistry,
    db: &RegistryDb,
    audit: &AuditLog,
) -> Result<()> {
    let identity = cfg.require_identity()?;

    println!("\n=== DID Creation ===");
    let name = prompt::field("Enter your name", cmd.name)?;
    let email = prompt::field("Enter your email", cmd.email)?;
    let organization = prompt::field("Enter your organization", cmd.organization)?;
    let role = prompt::field("Enter your role", cmd.role)?;

    let handle = match cmd.handle {
        Some(raw) => Handle::new(raw).context("invalid handle")?,
        None => Handle::generate(&mut OsRng),
    };

    let private_document = documents::private_document(&name, &email, &organization, &role)?;
    let public_document = documents::public_document(&name, &organization)?;

    println!("\nCreating DID with the following information:");
    println!("Handle: {handle}");
    println!("\nPublic information (visible to everyone):");
    println!("  Name: {name}");
    println!("  Organization: {organization}");
    println!("\nPrivate information (only visible to you):");
    println!("  Email: {email}");
    println!("  Role: {role}");

    if !cmd.yes && !prompt::confirm("\nConfirm creation? (yes/no): ")? {
        println!("DID creation cancelled.");
        return Ok(());
    }

    registry
        .create(&identity, &private_document, &public_document, &handle)
        .context("failed to create DID")?;
    persist(db, registry, &identity)?;
    audit.record(&format!("record created: owner={identity} handle={handle}"))?;

    println!("\nDID created successfully.");
    println!("\nYour private management information");
    println!("----------------------------------------");
    println!("Identity key (keep this private, needed for updates):");
    println!("{identity}");
    println!("\nYour public sharing information");
    println!("----------------------------------------");
    println!("Handle (share this with others):");
    println!("{handle}");
    println!("\nIMPORTANT:");
    println!("1. Keep your identity key private");
    println!("2. Share your handle to let others view your public information");
    Ok(())
}

fn handle_update(
    cmd: UpdateCommand,
    cfg: &CliConfig,
    registry: &DidRegistry,
    db: &RegistryDb,
    audit: &AuditLog,
) -> Result<()> {
    let identity = cfg.require_identity()?;

    println!("\n=== DID Update ===");
    if !registry.is_active(&identity) {
        bail!("no active DID record found for this identity");
    }

    let view = registry
        .private_document(&identity, &identity)
        .context("failed to read current record")?;
    let current: Value = serde_json::from_str(&view.document).unwrap_or(Value::Null);
    let current_field = |key: &str| {
        current
            .pointer(&format!("/metadata/{key}"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };

    println!("\nCurrent DID information:");
    println!("  Name: {}", current_field("name"));
    println!("  Email: {}", current_field("email"));
    println!("  Organization: {}", current_field("organization"));
    println!("  Role: {}", current_field("role"));

    println!("\nEnter new DID information:");
    let name = prompt::field_with_default(
        "Enter new name (press Enter to keep current)",
        cmd.name,
        current_field("name"),
    )?;
    let email = prompt::field_with_default(
        "Enter new email (press Enter to keep current)",
        cmd.email,
        current_field("email"),
    )?;
    let organization = prompt::field_with_default(
        "Enter new organization (press Enter to keep current)",
        cmd.organization,
        current_field("organization"),
    )?;
    let role = prompt::field_with_default(
        "Enter new role (press Enter to keep current)",
        cmd.role,
        current_field("role"),
    )?;

    let private_document = documents::private_document(&name, &email, &organization, &role)?;
    let public_document = documents::public_document(&name, &organization)?;

    println!("\nPreparing to update DID with the following information:");
    println!("\nPrivate information (only visible to you):");
    println!("  Name: {name}");
    println!("  Email: {email}");
    println!("  Organization: {organization}");
    println!("  Role: {role}");
    println!("\nPublic information (visible to everyone):");
    println!("  Name: {name}");
    println!("  Organization: {organization}");

    if !cmd.yes && !prompt::confirm("\nConfirm update? (yes/no): ")? {
        println!("Update cancelled.");
        return Ok(());
    }

    registry
        .update(&identity, &private_document, &public_document)
        .context("failed to update DID")?;
    persist(db, registry, &identity)?;
    audit.record(&format!("record updated: owner={identity}"))?;

    println!("\nDID updated successfully.");
    println!("\nUpdated DID document:");
    println!("{}", pretty_document(&private_document));
    Ok(())
}

fn handle_deactivate(
    cmd: DeactivateCommand,
    cfg: &CliConfig,
    registry: &DidRegistry,
    db: &RegistryDb,
    audit: &AuditLog,
) -> Result<()> {
    let identity = cfg.require_identity()?;

    println!("\n=== DID Deactivation ===");
    let metadata = registry
        .record_metadata(&identity)
        .context("no DID record found for this identity")?;
    if !metadata.is_active {
        bail!("this DID record is already deactivated");
    }

    println!("\nDID record to be deactivated:");
    println!("  Handle: {}", metadata.handle);
    println!("  Created: {}", format_micros(metadata.created_at));
    println!("  Last updated: {}", format_micros(metadata.updated_at));

    if !cmd.yes
        && !prompt::confirm(
            "\nAre you sure you want to deactivate this DID? This cannot be undone. (yes/no): ",
        )?
    {
        println!("Deactivation cancelled.");
        return Ok(());
    }

    registry
        .deactivate(&identity)
        .context("failed to deactivate DID")?;
    persist(db, registry, &identity)?;
    audit.record(&format!("record deactivated: owner={identity}"))?;

    println!("\nDID successfully deactivated.");
    println!(
        "Final status: {}",
        if registry.is_active(&identity) {
            "Active"
        } else {
            "Inactive"
        }
    );
    Ok(())
}

fn handle_view(action: ViewCommands, cfg: &CliConfig, registry: &DidRegistry) -> Result<()> {
    match action {
        ViewCommands::Public { handle } => {
            let handle = Handle::new(handle).context("invalid handle")?;
            let document = registry
                .public_document(&handle)
                .context("could not find an active DID for this handle")?;

            println!("\n=== Public DID Information ===");
            println!("Handle: {handle}");
            println!("Status: Active");
            println!("{}", pretty_document(&document));
        }
        ViewCommands::Private => {
            let identity = cfg.require_identity()?;
            let view = registry
                .private_document(&identity, &identity)
                .context("could not read the private record for this identity")?;

            println!("\n=== Private DID Information ===");
            println!("{}", pretty_document(&view.document));
            println!("\nDID status:");
            println!("  Handle: {}", view.metadata.handle);
            println!("  Created: {}", format_micros(view.metadata.created_at));
            println!("  Last updated: {}", format_micros(view.metadata.updated_at));
            println!(
                "  Status: {}",
                if view.metadata.is_active {
                    "Active"
                } else {
                    "Inactive"
                }
            );
        }
    }
    Ok(())
}

fn handle_resolve(handle: &str, registry: &DidRegistry) -> Result<()> {
    let handle = Handle::new(handle).context("invalid handle")?;
    let owner = registry
        .resolve_owner(&handle)
        .context("could not find an active DID for this handle")?;
    println!("{owner}");
    Ok(())
}

fn handle_status(owner: Option<String>, cfg: &CliConfig, registry: &DidRegistry) -> Result<()> {
    let identity = match owner {
        Some(raw) => Identity::new(raw).context("invalid identity key")?,
        None => cfg.require_identity()?,
    };

    let metadata = registry
        .record_metadata(&identity)
        .context("no DID record found for this identity")?;

    println!("Owner: {identity}");
    println!("Handle: {}", metadata.handle);
    println!("Created: {}", format_micros(metadata.created_at));
    println!("Last updated: {}", format_micros(metadata.updated_at));
    println!(
        "Status: {}",
        if metadata.is_active { "Active" } else { "Inactive" }
    );
    Ok(())
}

/// Write the caller's record back to the snapshot store.
fn persist(db: &RegistryDb, registry: &DidRegistry, owner: &Identity) -> Result<()> {
    let records = registry.records();
    let record = records
        .iter()
        .find(|record| &record.owner == owner)
        .context("record missing after mutation")?;
    db.save_record(record)?;
    Ok(())
}

/// Re-indent a stored document; fall back to the raw text if it is not JSON.
fn pretty_document(document: &str) -> String {
    serde_json::from_str::<Value>(document)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| document.to_string())
}

/// Render a microsecond timestamp as RFC 3339, or the raw number if out of
/// range.
fn format_micros(micros: u64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000)
        .ok()
        .and_then(|ts| ts.format(&Rfc3339).ok())
        .unwrap_or_else(|| micros.to_string())
}
