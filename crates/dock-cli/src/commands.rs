use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use dock_client::{DockBackend, HttpBackend, InMemoryBackend};
use dock_equipment::EquipmentLedger;
use dock_intake::{IntakeCoordinator, IntakeError, IntakeResult, SubmitOutcome};
use dock_manifest::{ManifestReconciler, Preconfirmed};
use dock_types::{DispatchRequest, Lane, ManifestItem, ReturnRecord};
use tokio::io::AsyncBufReadExt;

use crate::cli::*;
use crate::config::DockConfig;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = DockConfig::resolve(cli.config.as_deref(), cli.backend, cli.user)
        .context("loading configuration")?;
    let backend = connect(&config, cli.offline)?;

    match cli.command {
        Command::Manifest(args) => cmd_manifest(backend, &config, args).await,
        Command::Dispatch(args) => cmd_dispatch(backend, &config, args).await,
        Command::Return(args) => cmd_return(backend, config, args).await,
        Command::Scan(args) => cmd_scan(backend, config, args).await,
        Command::Equipment(args) => cmd_equipment(backend, &config, args).await,
    }
}

fn connect(config: &DockConfig, offline: bool) -> anyhow::Result<Arc<dyn DockBackend>> {
    if offline {
        tracing::info!("using in-memory backend");
        return Ok(Arc::new(demo_backend()));
    }
    tracing::debug!(url = %config.backend_url, "using http backend");
    let backend = HttpBackend::with_timeout(config.backend_url.clone(), config.request_timeout())
        .context("connecting to backend")?;
    Ok(Arc::new(backend))
}

fn demo_backend() -> InMemoryBackend {
    InMemoryBackend::new()
        .with_manifest(
            "7",
            vec![
                ManifestItem::new("A1", "O1", Some("12")).with_description("Lyon"),
                ManifestItem::new("A2", "O1", Some("OUT")).with_description("Lyon"),
                ManifestItem::new("A3", "O2", Some("12")).with_description("Nantes"),
            ],
        )
        .with_origin("A1", "Dana", Some("Lyon"))
        .with_origin("A3", "Lee", Some("Nantes"))
}

async fn cmd_manifest(
    backend: Arc<dyn DockBackend>,
    config: &DockConfig,
    args: ManifestArgs,
) -> anyhow::Result<()> {
    let mut reconciler = ManifestReconciler::new(backend, config.username.clone());
    if let Err(err) = reconciler.load_manifest(&args.wave).await {
        anyhow::bail!(err.user_message());
    }
    print_manifest(&reconciler);
    Ok(())
}

async fn cmd_dispatch(
    backend: Arc<dyn DockBackend>,
    config: &DockConfig,
    args: DispatchArgs,
) -> anyhow::Result<()> {
    let mut reconciler = ManifestReconciler::new(backend, config.username.clone());
    if let Err(err) = reconciler.load_manifest(&args.wave).await {
        anyhow::bail!(err.user_message());
    }

    for barcode in &args.removals {
        match reconciler.scan_removal(barcode) {
            Ok(item) => println!("  {} {}", "removed:".yellow(), item.barcode),
            Err(err) => println!("  {} {}", "rejected:".red(), err.user_message()),
        }
    }
    print_manifest(&reconciler);

    let result = if args.yes {
        reconciler
            .submit_dispatch(&args.vehicle, &args.driver, args.coolers, &Preconfirmed)
            .await
    } else {
        reconciler
            .submit_dispatch(&args.vehicle, &args.driver, args.coolers, &prompt)
            .await
    };
    match result {
        Ok(request) => {
            println!(
                "{} Dispatched wave {} on {} ({} items, {} coolers, {} ice)",
                "✓".green().bold(),
                request.wave_number.bold(),
                request.vehicle_number.yellow(),
                request.assets.len(),
                request.logistics.coolers(),
                request.logistics.ice(),
            );
            Ok(())
        }
        Err(err) => anyhow::bail!(err.user_message()),
    }
}

fn prompt(request: &DispatchRequest) -> bool {
    print!(
        "Dispatch {} items to {} with driver {}? [y/N] ",
        request.assets.len(),
        request.vehicle_number.bold(),
        request.driver_name.bold()
    );
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

fn print_manifest(reconciler: &ManifestReconciler) {
    let (Some(wave), Some(gate)) = (reconciler.wave_number(), reconciler.detected_gate()) else {
        return;
    };
    println!("Wave {}  gate {}", wave.bold(), gate.cyan().bold());
    for group in reconciler.group_by_order() {
        println!(
            "  order {}  ({} of {} shipping)",
            group.order_number.bold(),
            group.shipping_count(),
            group.total()
        );
        for item in &group.items {
            let status = if item.is_canceled() {
                "canceled".red()
            } else if reconciler.is_removed(&item.barcode) {
                "removed".yellow()
            } else {
                "ship".green()
            };
            let description = item.description.as_deref().unwrap_or("");
            println!("    {:<16} {:<9} {}", item.barcode, status, description.dimmed());
        }
    }
    let summary = reconciler.summary();
    println!(
        "Total {}  removed {}  canceled {}  shipping {}",
        summary.total,
        summary.removed,
        summary.canceled,
        summary.shipping.to_string().green().bold()
    );
}

async fn cmd_return(
    backend: Arc<dyn DockBackend>,
    config: DockConfig,
    args: ReturnArgs,
) -> anyhow::Result<()> {
    let coordinator = IntakeCoordinator::new(backend, config.username, config.scan);
    let lane = if args.damaged { Lane::Damage } else { Lane::Return };
    let outcome = coordinator
        .submit_scan(&args.barcode, lane, args.damaged)
        .await;
    print_outcome(lane, &args.barcode, &outcome);
    match outcome {
        Ok(_) => Ok(()),
        Err(err) => anyhow::bail!(err.user_message()),
    }
}

async fn cmd_scan(
    backend: Arc<dyn DockBackend>,
    config: DockConfig,
    args: ScanArgs,
) -> anyhow::Result<()> {
    let coordinator = IntakeCoordinator::new(backend, config.username, config.scan);
    let lane = args.lane;
    println!("Scanning into the {} lane; end input to finish.", lane.to_string().bold());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    scan_lines(&coordinator, lane, stdin, |barcode, outcome| {
        print_outcome(lane, barcode, outcome)
    })
    .await?;

    let history = coordinator.history();
    println!("\n{} returns this session:", history.len().to_string().bold());
    for record in &history {
        print_record(record);
    }
    Ok(())
}

/// Feed each line to `lane` as a buffer snapshot followed by Enter.
///
/// A line arriving during the cooldown would be dropped, so the cooldown is
/// waited out before each line is submitted.
async fn scan_lines<R>(
    coordinator: &IntakeCoordinator,
    lane: Lane,
    reader: R,
    mut report: impl FnMut(&str, &IntakeResult<SubmitOutcome>),
) -> anyhow::Result<()>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let cooldown = coordinator.config().cooldown();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if coordinator.is_cooling_down() {
            tokio::time::sleep(cooldown).await;
        }
        coordinator.input(lane, &line);
        let outcome = coordinator.enter(lane).await;
        report(line.trim(), &outcome);
    }
    Ok(())
}

fn print_outcome(lane: Lane, barcode: &str, outcome: &IntakeResult<SubmitOutcome>) {
    match outcome {
        Ok(SubmitOutcome::Recorded(record)) => print_record(record),
        Ok(SubmitOutcome::Skipped(reason)) => {
            if !barcode.is_empty() {
                println!("  {} {} ({})", "skipped".dimmed(), barcode, reason);
            }
        }
        Err(err @ IntakeError::AlreadyScanned { .. }) => {
            println!("  {} {}", "duplicate".yellow(), err.user_message());
        }
        Err(err) if err.kind().is_remote() => println!(
            "  {} [{}] {} (scan again to retry)",
            "error".red(),
            lane,
            err.user_message()
        ),
        Err(err) => println!("  {} [{}] {}", "error".red(), lane, err.user_message()),
    }
}

fn print_record(record: &ReturnRecord) {
    let damaged = if record.is_damaged {
        " damaged".red().to_string()
    } else {
        String::new()
    };
    println!(
        "  {} {}{}  from {}  {}  {}",
        "✓".green(),
        record.barcode.bold(),
        damaged,
        record.driver_name.as_deref().unwrap_or("unknown driver").cyan(),
        record.city.as_deref().unwrap_or("-"),
        record.timestamp.format("%H:%M:%S").to_string().dimmed()
    );
}

async fn cmd_equipment(
    backend: Arc<dyn DockBackend>,
    config: &DockConfig,
    args: EquipmentArgs,
) -> anyhow::Result<()> {
    let mut ledger = EquipmentLedger::new(backend, config.username.clone());
    match ledger
        .return_equipment(args.driver.as_deref(), args.coolers, args.ice)
        .await
    {
        Ok(accepted) => {
            println!(
                "{} {} returned {} coolers and {} ice",
                "✓".green().bold(),
                accepted.driver_name.bold(),
                accepted.coolers,
                accepted.ice
            );
            Ok(())
        }
        Err(err) => anyhow::bail!(err.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dock_client::Endpoint;
    use dock_scan::ScanConfig;

    #[tokio::test(start_paused = true)]
    async fn piped_lines_each_get_submitted() {
        let backend = Arc::new(InMemoryBackend::new());
        let coordinator = IntakeCoordinator::new(backend.clone(), "clerk", ScanConfig::default());
        let input: &[u8] = b"111111\n222222\n\n333333\n";

        let mut seen = Vec::new();
        scan_lines(&coordinator, Lane::Return, input, |barcode, outcome| {
            seen.push((barcode.to_string(), outcome.clone()));
        })
        .await
        .unwrap();

        assert_eq!(backend.calls(Endpoint::Return), 3);
        assert_eq!(coordinator.history().len(), 3);
        let recorded: Vec<_> = seen
            .iter()
            .filter(|(_, outcome)| matches!(outcome, Ok(o) if o.is_recorded()))
            .map(|(barcode, _)| barcode.as_str())
            .collect();
        assert_eq!(recorded, ["111111", "222222", "333333"]);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_line_is_a_duplicate() {
        let backend = Arc::new(InMemoryBackend::new());
        let coordinator = IntakeCoordinator::new(backend.clone(), "clerk", ScanConfig::default());
        let input: &[u8] = b"111111\n111111\n";

        let mut outcomes = Vec::new();
        scan_lines(&coordinator, Lane::Damage, input, |_, outcome| {
            outcomes.push(outcome.clone());
        })
        .await
        .unwrap();

        assert!(matches!(outcomes[1], Err(IntakeError::AlreadyScanned { .. })));
        assert_eq!(backend.calls(Endpoint::Return), 1);
        assert!(backend.returns()[0].is_damaged);
    }
}
