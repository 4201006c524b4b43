//! PV sizer entry point: CLI wiring around the sizing core.

use std::path::Path;
use std::process;

use pv_sizer::autonomy::{self, AutonomyTable};
use pv_sizer::config::ScenarioConfig;
use pv_sizer::io::export::{export_autonomy_csv, export_mppt_csv};
use pv_sizer::logging::init_tracing;
use pv_sizer::sizing::{SizingReport, recommend_parallel_strings, size_array};
use pv_sizer::SizingError;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    series: Option<u32>,
    parallel: Option<u32>,
    dod: Option<f64>,
    report_out: Option<String>,
    autonomy_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("pv-sizer - PV string sizing against inverter MPPT limits");
    eprintln!();
    eprintln!("Usage: pv-sizer [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset ({})", ScenarioConfig::PRESETS.join(", "));
    eprintln!("  --series <n>             Override panels in series per string");
    eprintln!("  --parallel <n>           Override parallel strings per MPPT");
    eprintln!("  --dod <fraction>         Override battery depth of discharge");
    eprintln!("  --report-out <path>      Export the MPPT table to CSV");
    eprintln!("  --autonomy-out <path>    Export the autonomy table to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the report");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the default preset is used.");
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &str, what: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v.as_str(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_value<T: std::str::FromStr>(value: &str, flag: &str, what: &str) -> T {
    value.parse::<T>().unwrap_or_else(|_| {
        eprintln!("error: {flag} value \"{value}\" is not a valid {what}");
        process::exit(1);
    })
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        series: None,
        parallel: None,
        dod: None,
        report_out: None,
        autonomy_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                cli.scenario_path = Some(next_value(&args, i, flag, "a path argument").to_string());
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(next_value(&args, i, flag, "a name argument").to_string());
            }
            "--series" => {
                i += 1;
                let v = next_value(&args, i, flag, "a positive integer");
                cli.series = Some(parse_value(v, flag, "u32"));
            }
            "--parallel" => {
                i += 1;
                let v = next_value(&args, i, flag, "a positive integer");
                cli.parallel = Some(parse_value(v, flag, "u32"));
            }
            "--dod" => {
                i += 1;
                let v = next_value(&args, i, flag, "a fraction");
                cli.dod = Some(parse_value(v, flag, "number"));
            }
            "--report-out" => {
                i += 1;
                cli.report_out = Some(next_value(&args, i, flag, "a path argument").to_string());
            }
            "--autonomy-out" => {
                i += 1;
                cli.autonomy_out = Some(next_value(&args, i, flag, "a path argument").to_string());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let v = next_value(&args, i, flag, "a u16 argument");
                cli.port = parse_value(v, flag, "u16");
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.scenario_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --scenario and --preset are mutually exclusive");
        process::exit(1);
    }

    cli
}

/// Sizes the array and builds the autonomy table for a validated scenario.
fn run(cfg: &ScenarioConfig) -> Result<(SizingReport, u32, AutonomyTable), SizingError> {
    let report = size_array(&cfg.panel, &cfg.inverter, &cfg.derating, &cfg.array)?;
    let recommended = recommend_parallel_strings(&cfg.panel, &cfg.inverter, cfg.array.series);

    let au = &cfg.autonomy;
    let table = autonomy::estimate(&au.batteries()?, au.dod, &au.loads_w)?;

    Ok((report, recommended, table))
}

fn main() {
    init_tracing();
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then the default preset
    let loaded = if let Some(ref path) = cli.scenario_path {
        ScenarioConfig::from_toml_file(Path::new(path))
    } else {
        ScenarioConfig::from_preset(cli.preset.as_deref().unwrap_or("default"))
    };
    let mut scenario = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Some(series) = cli.series {
        scenario.array.series = series;
    }
    if let Some(parallel) = cli.parallel {
        scenario.array.parallel = parallel;
    }
    if let Some(dod) = cli.dod {
        scenario.autonomy.dod = dod;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let (report, recommended, table) = run(&scenario).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });
    tracing::info!(
        mppts = report.mppts.len(),
        dc_ac_ratio = report.summary.dc_ac_ratio,
        compliant = report.summary.compliant,
        "sizing complete"
    );

    println!("--- MPPT Inputs ---");
    for m in &report.mppts {
        println!("{m}");
    }
    println!("\n{}", report.summary);
    if recommended != scenario.array.parallel {
        println!(
            "Suggested parallel strings per MPPT for DC/AC ~1.2: {recommended} (current: {})",
            scenario.array.parallel
        );
    }
    println!("\n{table}");

    if let Some(ref path) = cli.report_out {
        if let Err(e) = export_mppt_csv(&report.mppts, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        tracing::info!(%path, "MPPT table written");
    }
    if let Some(ref path) = cli.autonomy_out {
        if let Err(e) = export_autonomy_csv(&table, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        tracing::info!(%path, "autonomy table written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(pv_sizer::api::AppState { scenario });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(pv_sizer::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
