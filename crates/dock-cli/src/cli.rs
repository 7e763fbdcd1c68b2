use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dock_types::Lane;

#[derive(Parser)]
#[command(
    name = "dock",
    about = "Dock: warehouse dispatch and return reconciliation",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Operator name sent with every request
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Use an in-memory backend seeded with a demo wave instead of HTTP
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a wave and show its manifest grouped by order
    Manifest(ManifestArgs),
    /// Reconcile a wave against removal scans and dispatch it
    Dispatch(DispatchArgs),
    /// Submit a single return
    Return(ReturnArgs),
    /// Read scans from stdin, one buffer per line.
    ///
    /// Each line is submitted as if Enter was pressed. Lines are handled one
    /// at a time and the command waits out the cooldown between them, so
    /// piped batches are not dropped.
    Scan(ScanArgs),
    /// Record coolers and ice handed back by a driver
    Equipment(EquipmentArgs),
}

#[derive(Args)]
pub struct ManifestArgs {
    pub wave: String,
}

#[derive(Args)]
pub struct DispatchArgs {
    pub wave: String,
    #[arg(long)]
    pub vehicle: String,
    #[arg(long)]
    pub driver: String,
    #[arg(long, default_value = "0")]
    pub coolers: u32,
    /// Barcode pulled from the shipment (repeatable)
    #[arg(long = "remove")]
    pub removals: Vec<String>,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ReturnArgs {
    pub barcode: String,
    #[arg(long)]
    pub damaged: bool,
}

#[derive(Args)]
pub struct ScanArgs {
    #[arg(long, default_value = "return")]
    pub lane: Lane,
}

#[derive(Args)]
pub struct EquipmentArgs {
    #[arg(long)]
    pub driver: Option<String>,
    #[arg(long, default_value = "0")]
    pub coolers: u32,
    #[arg(long, default_value = "0")]
    pub ice: u64,
}
