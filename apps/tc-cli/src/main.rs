use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tc_app::{AppError, AppResult, CycleEngine, EngineOptions, load_config};
use tc_cycles::{CycleError, DiagramKind, MetricsRequest, ThermodynamicCycle};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "thermocycle")]
#[command(about = "Thermocycle CLI - ideal-gas thermodynamic cycle calculator", long_about = None)]
struct Cli {
    /// Log more detail (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in working fluids
    Fluids {
        /// Only show fluids whose name or alias contains this text
        filter: Option<String>,
    },
    /// Compute a cycle and print its states, processes and summary
    Cycle {
        /// Path to the cycle input file (YAML, or JSON with a .json extension)
        input_path: PathBuf,
        /// Also compute entropy generation, exergy and free energies
        #[arg(long)]
        extended: bool,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export diagram points as CSV
    Diagram {
        /// Path to the cycle input file
        input_path: PathBuf,
        /// Diagram projection
        #[arg(long, value_enum)]
        kind: DiagramArg,
        /// Segments per leg
        #[arg(long)]
        samples: Option<usize>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DiagramArg {
    Pv,
    Ts,
    Ph,
}

impl From<DiagramArg> for DiagramKind {
    fn from(arg: DiagramArg) -> Self {
        match arg {
            DiagramArg::Pv => DiagramKind::Pv,
            DiagramArg::Ts => DiagramKind::Ts,
            DiagramArg::Ph => DiagramKind::Ph,
        }
    }
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Fluids { filter } => cmd_fluids(filter.as_deref()),
        Commands::Cycle {
            input_path,
            extended,
            json,
        } => cmd_cycle(&input_path, extended, json),
        Commands::Diagram {
            input_path,
            kind,
            samples,
            output,
        } => cmd_diagram(&input_path, kind.into(), samples, output.as_deref()),
    };

    if let Some(hint) = result.as_ref().err().and_then(parameter_hint) {
        eprintln!("{}", hint);
    }
    result
}

/// Points the user at the input key behind a parameter error.
fn parameter_hint(err: &AppError) -> Option<String> {
    let key = err.as_cycle_error().and_then(CycleError::parameter)?;
    Some(format!("hint: check `{}` in the input file", key))
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_fluids(filter: Option<&str>) -> AppResult<()> {
    let fluids = tc_fluids::filter_fluids(filter.unwrap_or(""));
    if fluids.is_empty() {
        println!("No fluids match");
        return Ok(());
    }

    println!(
        "{:<16} {:>9} {:>7} {:>9} {:>9}",
        "Fluid", "R", "gamma", "cp", "cv"
    );
    for fluid in fluids {
        println!(
            "{:<16} {:>9.5} {:>7.3} {:>9.4} {:>9.4}",
            fluid.name, fluid.r, fluid.gamma, fluid.cp, fluid.cv
        );
    }
    println!("(R, cp, cv in kJ/(kg·K))");
    Ok(())
}

fn cmd_cycle(input_path: &Path, extended: bool, json: bool) -> AppResult<()> {
    let mut config = load_config(input_path)?;
    if extended && config.metrics == MetricsRequest::Basic {
        config.metrics = MetricsRequest::extended();
    }

    let mut engine = CycleEngine::new(EngineOptions::default())?;
    let cycle = engine.compute_cycle(&config)?;

    if json {
        let text = serde_json::to_string_pretty(&*cycle)
            .map_err(|e| AppError::Config(format!("Failed to serialize cycle: {}", e)))?;
        println!("{}", text);
    } else {
        print!("{}", render_cycle(&cycle));
    }
    Ok(())
}

fn render_cycle(cycle: &ThermodynamicCycle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", cycle.name);

    let _ = writeln!(out, "\nParameters:");
    for (key, value) in cycle.spec.parameters() {
        let _ = writeln!(out, "  {:<28} {}", key, value);
    }

    let _ = writeln!(out, "\nStates:");
    let _ = writeln!(
        out,
        "  {:<3} {:<26} {:>9} {:>11} {:>11} {:>10} {:>10}",
        "#", "name", "T [K]", "P [kPa]", "v [m³/kg]", "h [kJ/kg]", "s [kJ/kgK]"
    );
    for state in &cycle.states {
        let _ = writeln!(
            out,
            "  {:<3} {:<26} {:>9.2} {:>11.2} {:>11.5} {:>10.2} {:>10.4}",
            state.id().number(),
            state.name(),
            state.temperature_k(),
            state.pressure_kpa(),
            state.volume(),
            state.enthalpy(),
            state.entropy()
        );
    }

    let _ = writeln!(out, "\nProcesses:");
    for process in &cycle.processes {
        let _ = writeln!(
            out,
            "  {}→{} {:<34} W = {:>9.2}  Q = {:>9.2}  ΔS = {:>8.4}  ({})",
            process.start,
            process.end,
            process.name,
            process.work,
            process.heat,
            process.entropy_change,
            process.kind
        );
    }

    let _ = writeln!(out, "\nSummary:");
    let _ = writeln!(out, "  Heat in:   {:.2} kJ/kg", cycle.heat_in);
    let _ = writeln!(out, "  Heat out:  {:.2} kJ/kg", cycle.heat_out);
    let _ = writeln!(out, "  Net work:  {:.2} kJ/kg", cycle.net_work);
    if cycle.is_refrigeration() {
        let _ = writeln!(out, "  COP:       {:.4}", cycle.efficiency);
    } else {
        let _ = writeln!(
            out,
            "  Efficiency: {:.4} ({:.2}%)",
            cycle.efficiency,
            cycle.efficiency * 100.0
        );
    }

    if let Some(metrics) = &cycle.metrics {
        let _ = writeln!(out, "\nExtended metrics:");
        let _ = writeln!(
            out,
            "  Entropy generation: {:.5} kJ/(kg·K)",
            metrics.entropy_generation
        );
        let _ = writeln!(out, "  Exergy of heat in:  {:.2} kJ/kg", metrics.exergy);
        match metrics.quality {
            Some(x) => {
                let _ = writeln!(out, "  Quality:            {:.4}", x);
            }
            None => {
                let _ = writeln!(out, "  Quality:            n/a (single phase)");
            }
        }
        let _ = writeln!(
            out,
            "  Gibbs (state 1):     {:.2} kJ/kg",
            metrics.gibbs_free_energy
        );
        let _ = writeln!(
            out,
            "  Helmholtz (state 1): {:.2} kJ/kg",
            metrics.helmholtz_free_energy
        );
    }
    out
}

fn cmd_diagram(
    input_path: &Path,
    kind: DiagramKind,
    samples: Option<usize>,
    output: Option<&Path>,
) -> AppResult<()> {
    let config = load_config(input_path)?;
    let mut engine = CycleEngine::new(EngineOptions::default())?;
    let cycle = engine.compute_cycle(&config)?;
    let (count, csv) = diagram_csv(&mut engine, &cycle, kind, samples)?;

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} {} points to {}", count, kind, path.display());
    } else {
        print!("{}", csv);
    }

    Ok(())
}

/// Diagram points as CSV; `samples` falls back to the engine's segments per leg.
fn diagram_csv(
    engine: &mut CycleEngine,
    cycle: &ThermodynamicCycle,
    kind: DiagramKind,
    samples: Option<usize>,
) -> AppResult<(usize, String)> {
    let segments = samples.unwrap_or(engine.options().samples_per_leg);
    let points = engine.sample_diagram_with(cycle, kind, segments)?;

    let mut csv = format!("{},{},state\n", kind.x_axis(), kind.y_axis());
    for point in points.iter() {
        let _ = writeln!(
            csv,
            "{},{},{}",
            point.x,
            point.y,
            point.label.as_deref().unwrap_or("")
        );
    }
    Ok((points.len(), csv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_cycles::{CycleSpec, DieselParams, OttoParams, SimulationConfig};

    fn otto_cycle(engine: &mut CycleEngine) -> std::sync::Arc<ThermodynamicCycle> {
        let config = SimulationConfig::new(
            "air",
            CycleSpec::Otto(OttoParams {
                t1: 300.0,
                p1: 100.0,
                compression_ratio: 8.0,
                heat_added: 1000.0,
                polytropic_index: None,
            }),
        );
        engine.compute_cycle(&config).unwrap()
    }

    #[test]
    fn rendered_cycle_lists_its_inputs() {
        let mut engine = CycleEngine::new(EngineOptions::default()).unwrap();
        let cycle = otto_cycle(&mut engine);
        let text = render_cycle(&cycle);
        let params = text.find("Parameters:").unwrap();
        assert!(params < text.find("States:").unwrap());
        for (key, _) in cycle.spec.parameters() {
            assert!(text.contains(key), "{key} missing from:\n{text}");
        }
    }

    #[test]
    fn default_diagram_uses_engine_segments() {
        let options = EngineOptions {
            samples_per_leg: 5,
            ..EngineOptions::default()
        };
        let mut engine = CycleEngine::new(options).unwrap();
        let cycle = otto_cycle(&mut engine);

        let (count, csv) = diagram_csv(&mut engine, &cycle, DiagramKind::Pv, None).unwrap();
        assert_eq!(count, 4 * 5);
        assert_eq!(csv.lines().count(), count + 1);

        let (count, _) = diagram_csv(&mut engine, &cycle, DiagramKind::Pv, Some(8)).unwrap();
        assert_eq!(count, 4 * 8);
    }

    #[test]
    fn parameter_errors_name_the_key() {
        let missing = AppError::Cycle(CycleError::MissingParameter {
            key: "cutoff_ratio",
        });
        assert_eq!(
            parameter_hint(&missing).as_deref(),
            Some("hint: check `cutoff_ratio` in the input file")
        );

        let unknown = AppError::Cycle(CycleError::UnknownFluid {
            name: "plasma".to_string(),
        });
        assert_eq!(parameter_hint(&unknown), None);
    }

    #[test]
    fn diesel_parameters_include_cutoff() {
        let spec = CycleSpec::Diesel(DieselParams {
            t1: 300.0,
            p1: 100.0,
            compression_ratio: 18.0,
            cutoff_ratio: 2.0,
            polytropic_index: None,
        });
        let config = SimulationConfig::new("air", spec);
        let mut engine = CycleEngine::new(EngineOptions::default()).unwrap();
        let cycle = engine.compute_cycle(&config).unwrap();
        assert!(render_cycle(&cycle).contains("cutoff_ratio"));
    }
}
