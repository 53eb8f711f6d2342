//! wellpath - wellbore trajectory variance report
//!
//! Runs the trajectory engine over a JSON well snapshot and prints the
//! station variances, scenario stations and bit projection.
//!
//! # Usage
//!
//! ```bash
//! # Text report using ./wellpath.toml (or built-in defaults)
//! wellpath report --input well.json
//!
//! # JSON output with an explicit config
//! wellpath --config project.toml report --input well.json --json
//!
//! # Check a config file for typos and inconsistent limits
//! wellpath check-config --config project.toml
//! ```
//!
//! # Environment Variables
//!
//! - `WELLPATH_CONFIG`: Path to config TOML (default: ./wellpath.toml)
//! - `RUST_LOG`: Logging level (default: info)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use wellpath::config::{self, validation, WellpathConfig};
use wellpath::engine::recompute;
use wellpath::snapshot::WellSnapshot;
use wellpath::types::{BitProjection, GeoValue, TrajectoryAnalysis};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "wellpath")]
#[command(about = "Wellbore trajectory geometry and plan variance report")]
#[command(version)]
struct CliArgs {
    /// Config TOML to use instead of the standard search order
    #[arg(long, global = true, env = "WELLPATH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Compute variances and bit projection for a well snapshot
    Report {
        /// Path to the JSON well snapshot
        #[arg(long, short)]
        input: PathBuf,

        /// Print the full analysis as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Validate a config file and print any warnings
    CheckConfig,
    /// Print the built-in default config as TOML
    DefaultConfig,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    match args.command {
        SubCommand::Report { input, json } => {
            config::init(load_config(args.config.as_deref())?);
            run_report(&input, json)
        }
        SubCommand::CheckConfig => run_check_config(args.config.as_deref()),
        SubCommand::DefaultConfig => {
            print!("{}", WellpathConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<WellpathConfig> {
    match path {
        Some(p) => WellpathConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(WellpathConfig::load()),
    }
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_report(input: &Path, json: bool) -> Result<()> {
    let well_config = config::get();
    info!(
        "Well: {} | Field: {} | Rig: {}",
        well_config.well.name,
        or_unset(&well_config.well.field),
        or_unset(&well_config.well.rig)
    );

    let snapshot = WellSnapshot::load(input)
        .with_context(|| format!("Failed to load snapshot {}", input.display()))?;
    let analysis = recompute(&snapshot.into_inputs(well_config));

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_report(&analysis);
    }
    Ok(())
}

fn run_check_config(path: Option<&Path>) -> Result<()> {
    let path = path.map_or_else(
        || PathBuf::from(config::defaults::LOCAL_CONFIG_FILE),
        Path::to_path_buf,
    );
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    for w in validation::validate_unknown_keys(&contents) {
        println!("  warning: {w}");
    }
    let config = WellpathConfig::from_toml_str(&contents)
        .with_context(|| format!("{} is not a valid config", path.display()))?;
    let (_, range_warnings) = validation::validate_physical_ranges(&config);
    for w in range_warnings {
        println!("  warning: {w}");
    }

    println!("{}: OK (well '{}')", path.display(), config.well.name);
    Ok(())
}

// ============================================================================
// Text Output
// ============================================================================

fn or_unset(s: &str) -> &str {
    if s.is_empty() {
        "unset"
    } else {
        s
    }
}

fn fmt_geo(v: GeoValue) -> String {
    v.as_option().map_or_else(|| "-".to_string(), |x| format!("{x:.2}"))
}

fn print_report(analysis: &TrajectoryAnalysis) {
    println!("VS azimuth: {:.2} deg", analysis.vs_azimuth);
    println!();
    println!(
        "{:>9} {:>6} {:>7} {:>9} {:>8} {:>8} {:>8} {:>8} {:>6} {:>6} {:>6} {:>7} {:>7}  STATUS",
        "MD", "INC", "AZI", "TVD", "dTVD", "dVS", "CLOS", "3D", "DLS", "BR", "TR", "reqBR", "reqTR"
    );
    for v in &analysis.variances {
        println!(
            "{:>9.2} {:>6.2} {:>7.2} {:>9} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>6.2} {:>6.2} {:>6.2} {:>7.2} {:>7.2}  {}",
            v.md,
            v.inc,
            v.azi,
            fmt_geo(v.tvd),
            v.deviation.tvd,
            v.deviation.vs,
            v.deviation.closure,
            v.deviation.distance_3d,
            v.dls,
            v.build_rate,
            v.turn_rate,
            v.required_build_rate,
            v.required_turn_rate,
            v.status
        );
    }

    let s = &analysis.summary;
    println!();
    println!(
        "Stations: {} | Alarms: {} | Warnings: {} | Max 3D: {:.2} m | Max DLS: {:.2} | Max |dTVD|: {:.2} m",
        s.station_count, s.alarm_count, s.warning_count, s.max_distance_3d, s.max_dls, s.max_tvd_variance
    );

    if !analysis.scenario.is_empty() {
        println!();
        println!("Scenario:");
        for (i, st) in analysis.scenario.iter().enumerate() {
            println!(
                "  [{i}] MD {:.2}  INC {:.2}  AZI {:.2}  TVD {:.2}  N {:.2}  E {:.2}  VS {:.2}  DLS {:.2}",
                st.md, st.inc, st.azi, st.tvd, st.northing, st.easting, st.vs, st.dls
            );
        }
    }

    println!();
    match &analysis.bit_projection {
        Some(bit) => print_bit(bit),
        None => println!("Bit projection: n/a (no plan or no stations)"),
    }
}

fn print_bit(bit: &BitProjection) {
    println!(
        "Bit @ MD {:.2} (from {:?} MD {:.2}): INC {:.2} AZI {:.2} TVD {:.2} N {:.2} E {:.2}",
        bit.md, bit.source, bit.from_md, bit.inc, bit.azi, bit.tvd, bit.northing, bit.easting
    );
    println!(
        "  vs plan: dTVD {:.2}  dVS {:.2}  closure {:.2}  3D {:.2}  reqBR {:.2}  reqTR {:.2}  {}",
        bit.deviation.tvd,
        bit.deviation.vs,
        bit.deviation.closure,
        bit.deviation.distance_3d,
        bit.required_build_rate,
        bit.required_turn_rate,
        bit.status
    );
    if let (Some(target), Some(distance)) = (bit.target_tvd, bit.distance_to_target) {
        println!(
            "  target TVD {:.2}: {:.2} m along hole at {:.2} deg/30m",
            target,
            distance,
            bit.required_build_rate_to_target.unwrap_or_default()
        );
    }
}
