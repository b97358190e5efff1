//! Shard-Admin: command-line access to the shard registry.
//!
//! - `derive`: predict a shard address
//! - `simulate`: run shard creation against the in-memory factory and input box
//! - `decode`: decode a notice payload

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use shard_registry::{
    decode_hex_bytes, AddressDeriver, InMemoryInputBox, InMemoryUnitFactory, InputEntry, Notice,
    RegistryConfig, ShardCreation, ShardId, ShardRegistryApi, ShardRegistryService, TemplateHash,
    UnitAddress,
};
use tracing::debug;

/// Shard-Admin: Shard Registry command-line tool
#[derive(Parser, Debug)]
#[command(name = "shard-admin")]
#[command(about = "Derive shard addresses, simulate shard creation and decode notices")]
pub struct Cli {
    /// Log level (overrides SHARD_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the address a shard would be created at
    Derive(DeriveArgs),
    /// Create a shard against an in-memory factory and input box
    Simulate(SimulateArgs),
    /// Decode a notice payload given as hex
    Decode(DecodeArgs),
}

/// Factory wiring; unset flags fall back to the SHARD_* environment.
#[derive(Args, Debug, Clone, Default)]
pub struct FactoryArgs {
    /// Application factory address
    #[arg(long)]
    pub factory: Option<UnitAddress>,

    /// Unit creation code as hex
    #[arg(long)]
    pub creation_code: Option<String>,
}

/// Shard descriptor shared by `derive` and `simulate`.
#[derive(Args, Debug, Clone)]
pub struct ShardArgs {
    /// Main unit address
    #[arg(long)]
    pub main: UnitAddress,

    /// Verifier template hash
    #[arg(long)]
    pub template: TemplateHash,

    /// Shard id (32-byte hex)
    #[arg(long)]
    pub shard_id: ShardId,
}

/// Arguments of `derive`.
#[derive(Args, Debug)]
pub struct DeriveArgs {
    #[command(flatten)]
    pub shard: ShardArgs,

    #[command(flatten)]
    pub factory: FactoryArgs,
}

/// Arguments of `simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub shard: ShardArgs,

    /// Account requesting the shard
    #[arg(long)]
    pub owner: UnitAddress,

    /// Create the same shard this many times (later attempts collide)
    #[arg(long, default_value = "1")]
    pub repeat: u32,

    #[command(flatten)]
    pub factory: FactoryArgs,
}

/// Arguments of `decode`.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Notice payload as hex (0x prefix optional)
    pub payload: String,
}

/// Output of one simulated creation attempt.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Attempt {
    /// Shard created and notified.
    Created {
        /// What the registry produced.
        creation: ShardCreation,
    },
    /// Creation failed.
    Failed {
        /// Error description.
        error: String,
        /// Whether the error is fatal.
        fatal: bool,
    },
}

/// Queue entry rendered for output.
#[derive(Debug, Serialize)]
pub struct RenderedInput {
    /// Inbox owner.
    pub target: UnitAddress,
    /// Inbox position.
    pub index: u64,
    /// Payload as `0x` hex.
    pub payload: String,
    /// Decoded payload, if recognized.
    pub notice: Option<Notice>,
}

impl From<&InputEntry> for RenderedInput {
    fn from(entry: &InputEntry) -> Self {
        Self {
            target: entry.receipt.target,
            index: entry.receipt.index,
            payload: format!("0x{}", hex::encode(&entry.payload)),
            notice: Notice::classify(&entry.payload).ok(),
        }
    }
}

/// Merge flag overrides into the environment configuration.
pub fn resolve_config(args: &FactoryArgs) -> Result<RegistryConfig> {
    let mut config = RegistryConfig::from_env().context("loading SHARD_* configuration")?;
    if let Some(factory) = args.factory {
        config.factory_address = factory;
    }
    if let Some(code) = &args.creation_code {
        config.unit_creation_code = decode_hex_bytes(code).context("decoding --creation-code")?;
    }
    Ok(config)
}

/// Execute `command` and return its JSON output.
pub fn run(command: &Command) -> Result<Value> {
    match command {
        Command::Derive(args) => derive(args),
        Command::Simulate(args) => simulate(args),
        Command::Decode(args) => decode(args),
    }
}

fn derive(args: &DeriveArgs) -> Result<Value> {
    let config = resolve_config(&args.factory)?;
    let shard = config
        .deriver()
        .derive(&args.shard.main, &args.shard.template, &args.shard.shard_id);

    debug!(shard = %shard, factory = %config.factory_address, "Derived shard address");
    Ok(json!({
        "factory": config.factory_address,
        "main": args.shard.main,
        "template": args.shard.template,
        "shard_id": args.shard.shard_id,
        "shard": shard,
    }))
}

fn simulate(args: &SimulateArgs) -> Result<Value> {
    if args.repeat == 0 {
        bail!("--repeat must be at least 1");
    }

    let config = resolve_config(&args.factory)?;
    let service = ShardRegistryService::from_config(
        &config,
        InMemoryUnitFactory::new(config.factory_address, config.unit_creation_code.clone()),
        InMemoryInputBox::new(config.registry_address),
    );

    let expected = service.calculate_shard_address(
        &args.shard.main,
        &args.shard.template,
        &args.shard.shard_id,
    );

    let attempts: Vec<Attempt> = (0..args.repeat)
        .map(|_| {
            match service.create_shard_detailed(
                &args.shard.main,
                &args.owner,
                &args.shard.template,
                &args.shard.shard_id,
            ) {
                Ok(creation) => Attempt::Created { creation },
                Err(err) => Attempt::Failed {
                    fatal: err.is_fatal(),
                    error: err.to_string(),
                },
            }
        })
        .collect();

    let inputs: Vec<RenderedInput> = service
        .queue()
        .all_inputs()
        .iter()
        .map(RenderedInput::from)
        .collect();

    let stats = service.stats();
    Ok(json!({
        "factory": service.factory().address(),
        "expected_shard": expected,
        "attempts": attempts,
        "inputs": inputs,
        "stats": {
            "shards_created": stats.shards_created,
            "notices_appended": stats.notices_appended,
            "identity_collisions": stats.identity_collisions,
            "address_mismatches": stats.address_mismatches,
            "other_failures": stats.other_failures,
        },
    }))
}

fn decode(args: &DecodeArgs) -> Result<Value> {
    let payload = decode_hex_bytes(&args.payload).context("payload is not valid hex")?;
    let notice = Notice::classify(&payload).context("payload is not a shard notice")?;
    Ok(serde_json::to_value(notice)?)
}
