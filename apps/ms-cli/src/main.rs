use clap::{Parser, Subcommand};
use ms_app::{
    AppResult, ProgressEvent, audit_range, build_design, campaign_service, clean_range,
    compare_dataset, dispatch_batch, harvest_range, load_campaign, resubmit_needed,
    scheduler_for,
};
use ms_cases::CaseStatus;
use ms_results::HarvestMode;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ms-cli")]
#[command(about = "mixsim - impeller power-number campaign pipeline", long_about = None)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a campaign file and print its design
    Validate {
        /// Path to the campaign YAML file
        config: PathBuf,
    },
    /// Sample the design and write every case directory
    Generate {
        /// Path to the campaign YAML file
        config: PathBuf,
        /// Re-render existing case directories
        #[arg(long)]
        overwrite: bool,
    },
    /// Fill in the mesh sizes of a rendered geometry file
    RenderMesh {
        /// Case directory holding mixer.geo
        case_dir: PathBuf,
        #[arg(long, default_value_t = 0.003)]
        min_mesh_length: f64,
        /// Largest element size as a multiple of the smallest
        #[arg(long, default_value_t = 10.0)]
        max_ratio: f64,
    },
    /// Submit the next batch of cases within the job quota
    Dispatch {
        /// Path to the campaign YAML file
        config: PathBuf,
        /// Override dispatch.max_concurrent_jobs
        #[arg(long)]
        max_jobs: Option<usize>,
    },
    /// Check which dispatched cases completed
    Audit {
        /// Path to the campaign YAML file
        config: PathBuf,
        #[arg(long)]
        first: Option<usize>,
        /// Defaults to the last dispatched case
        #[arg(long)]
        last: Option<usize>,
        /// Resubmit cases that ran out of wall time
        #[arg(long)]
        resubmit: bool,
    },
    /// Count cases per lifecycle status
    Status {
        /// Path to the campaign YAML file
        config: PathBuf,
    },
    /// Collect power numbers into a dataset file
    Harvest {
        /// Path to the campaign YAML file
        config: PathBuf,
        #[arg(long)]
        first: usize,
        #[arg(long)]
        last: usize,
        /// Dataset file (default: mixer_database_<first>-<last>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Rewrite the dataset keeping one row per case
        #[arg(long)]
        reconcile: bool,
    },
    /// Remove launch artifacts and meshes to free quota
    Clean {
        /// Path to the campaign YAML file
        config: PathBuf,
        #[arg(long)]
        first: usize,
        #[arg(long)]
        last: usize,
    },
    /// Compare a dataset against the unbaffled power-number correlation
    Compare {
        /// Dataset file
        dataset: PathBuf,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Validate { config } => cmd_validate(&config),
        Commands::Generate { config, overwrite } => cmd_generate(&config, overwrite),
        Commands::RenderMesh {
            case_dir,
            min_mesh_length,
            max_ratio,
        } => cmd_render_mesh(&case_dir, min_mesh_length, max_ratio),
        Commands::Dispatch { config, max_jobs } => cmd_dispatch(&config, max_jobs),
        Commands::Audit {
            config,
            first,
            last,
            resubmit,
        } => cmd_audit(&config, first, last, resubmit),
        Commands::Status { config } => cmd_status(&config),
        Commands::Harvest {
            config,
            first,
            last,
            output,
            reconcile,
        } => cmd_harvest(&config, first, last, output.as_deref(), reconcile),
        Commands::Clean {
            config,
            first,
            last,
        } => cmd_clean(&config, first, last),
        Commands::Compare { dataset, json } => cmd_compare(&dataset, json),
    }
}

fn cmd_validate(config: &Path) -> AppResult<()> {
    println!("Validating campaign: {}", config.display());
    let campaign = load_campaign(config)?;
    let summary = campaign_service::summarize(&campaign);
    println!("✓ Campaign is valid");
    println!("  Name:    {}", summary.name);
    println!("  Cases:   {}", summary.sample_count);
    println!("  Seed:    {}", summary.seed);
    println!("  Design:  {}", &summary.fingerprint[..12]);
    for (variable, range) in &summary.sampled {
        println!("  {:<8} {}", variable.label(), range);
    }
    for (variable, value) in &summary.fixed {
        println!("  {:<8} fixed at {}", variable.label(), value);
    }
    Ok(())
}

fn cmd_generate(config: &Path, overwrite: bool) -> AppResult<()> {
    let campaign = load_campaign(config)?;
    println!("{}", build_design(&campaign)?);

    let mut last_emit = Instant::now();
    let report = campaign_service::generate(
        &campaign,
        overwrite,
        Some(&mut |event| {
            if event.done == event.total || last_emit.elapsed().as_millis() >= 100 {
                render_cli_progress(&event);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    println!("✓ Generated {} of {} cases", report.written, report.total);
    if report.already_present > 0 {
        println!("  Already present: {}", report.already_present);
    }
    if !report.skipped.is_empty() {
        println!("  Skipped: {}", report.skipped.len());
        for (id, err) in report.skipped.iter().take(10) {
            println!("    {}: {}", id, err);
        }
    }
    println!("  Design: {}", &report.fingerprint[..12]);
    Ok(())
}

fn cmd_render_mesh(case_dir: &Path, min_mesh_length: f64, max_ratio: f64) -> AppResult<()> {
    campaign_service::render_mesh(case_dir, min_mesh_length, max_ratio)?;
    println!("✓ Mesh sizes written to {}", case_dir.display());
    Ok(())
}

fn cmd_dispatch(config: &Path, max_jobs: Option<usize>) -> AppResult<()> {
    let campaign = load_campaign(config)?;
    let scheduler = scheduler_for(&campaign)?;
    let outcome = dispatch_batch(&campaign, &scheduler, max_jobs)?;

    println!(
        "Queue: {} jobs for {}, room for {}",
        outcome.queue_count,
        scheduler.user(),
        outcome.budget
    );
    println!("✓ Submitted {} cases", outcome.submitted.len());
    if let (Some(first), Some(last)) = (outcome.submitted.first(), outcome.submitted.last()) {
        println!("  {} .. {}", first, last);
    }
    for (id, err) in &outcome.failed {
        println!("  ✗ {}: {}", id, err);
    }
    if !outcome.state.retry.is_empty() {
        println!("  Pending retries: {}", outcome.state.retry.len());
    }
    Ok(())
}

fn cmd_audit(
    config: &Path,
    first: Option<usize>,
    last: Option<usize>,
    resubmit: bool,
) -> AppResult<()> {
    let campaign = load_campaign(config)?;
    let scheduler = scheduler_for(&campaign)?;
    let summary = audit_range(&campaign, &scheduler, first, last)?;

    if summary.statuses.is_empty() {
        println!("Nothing to audit");
        return Ok(());
    }
    println!("Audited {} cases:", summary.statuses.len());
    for (status, count) in &summary.counts {
        println!("  {:<15} {}", status, count);
    }

    if resubmit {
        let outcome = resubmit_needed(&campaign, &scheduler, &summary)?;
        println!("✓ Resubmitted {} cases", outcome.submitted.len());
        if !outcome.skipped_active.is_empty() {
            println!("  Still queued: {}", outcome.skipped_active.len());
        }
        for (id, err) in &outcome.failed {
            println!("  ✗ {}: {}", id, err);
        }
    } else {
        let pending = summary.needs_resubmit();
        if !pending.is_empty() {
            println!("  Run with --resubmit to continue {} cases", pending.len());
        }
    }
    Ok(())
}

fn cmd_status(config: &Path) -> AppResult<()> {
    let campaign = load_campaign(config)?;
    let scheduler = scheduler_for(&campaign)?;
    let status = ms_app::campaign_status(&campaign, &scheduler)?;

    println!("Campaign '{}' ({} cases)", campaign.config.name, status.total);
    match status.state.last {
        Some(last) => println!("  Dispatched through mixer_{}", last),
        None => println!("  Nothing dispatched yet"),
    }
    for status_kind in CaseStatus::ALL {
        println!("  {:<15} {}", status_kind, status.count(status_kind));
    }
    Ok(())
}

fn cmd_harvest(
    config: &Path,
    first: usize,
    last: usize,
    output: Option<&Path>,
    reconcile: bool,
) -> AppResult<()> {
    let campaign = load_campaign(config)?;
    let mode = if reconcile {
        HarvestMode::Reconcile
    } else {
        HarvestMode::Append
    };

    let mut last_emit = Instant::now();
    let report = harvest_range(
        &campaign,
        first,
        last,
        output,
        mode,
        Some(&mut |event| {
            if event.done == event.total || last_emit.elapsed().as_millis() >= 100 {
                render_cli_progress(&event);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    println!("✓ Harvested {} cases into {}", report.rows.len(), report.path.display());
    println!("  Power numbers: {}", report.succeeded);
    println!("  Failed:        {}", report.failed);
    if report.dropped_lines > 0 {
        println!("  Dropped {} unreadable line(s) from the old dataset", report.dropped_lines);
    }
    Ok(())
}

fn cmd_clean(config: &Path, first: usize, last: usize) -> AppResult<()> {
    let campaign = load_campaign(config)?;
    let report = clean_range(&campaign, first, last)?;
    println!(
        "✓ Removed {} files from {} cases",
        report.files_removed, report.cases
    );
    if report.errors > 0 {
        println!("  {} files could not be removed", report.errors);
    }
    Ok(())
}

fn cmd_compare(dataset: &Path, json: bool) -> AppResult<()> {
    let report = compare_dataset(dataset)?;

    if json {
        let text =
            serde_json::to_string_pretty(&report).map_err(ms_results::ResultsError::from)?;
        println!("{}", text);
        return Ok(());
    }

    println!("Compared {} cases", report.deviations.len());
    println!("  Failed rows:   {}", report.failures);
    println!("  Out of domain: {}", report.out_of_domain);
    if let (Some(mean), Some(max)) = (report.mean_abs_relative, report.max_abs_relative) {
        println!("  Mean |dev|:    {:.2}%", mean * 100.0);
        println!("  Max |dev|:     {:.2}%", max * 100.0);
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(80));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &ProgressEvent) {
    let width = 28usize;
    let fraction = event.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    print!(
        "\r[{}{}] {:>6.2}%  {}  {}/{}  elapsed={:.1}s",
        "#".repeat(filled),
        "-".repeat(width - filled),
        fraction * 100.0,
        event.stage.label(),
        event.done,
        event.total,
        event.elapsed_wall_s
    );
    let _ = io::stdout().flush();
}
