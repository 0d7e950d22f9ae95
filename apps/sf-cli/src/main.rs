mod error;

use clap::{Parser, Subcommand};
use error::{CliError, CliResult};
use serde::Serialize;
use sf_core::units::{gpa, k};
use sf_eos::EosMethod;
use sf_minerals::{
    WeightFractions, calculate_partition_coefficient, calculate_phase_percents, catalog,
};
use sf_project::{RunOutput, run_project};
use sf_seismic::Averaging;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "seismoflow")]
#[command(about = "Seismic velocities and density profiles of mineral assemblages", long_about = None)]
struct Cli {
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project file
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Run the computation a project file describes
    Run {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Write the JSON result to this file as well
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List builtin minerals, optionally filtered by name
    Catalog {
        query: Option<String>,
    },
    /// List equations of state and averaging schemes
    Methods,
    /// Phase proportions and iron partitioning of a bulk composition
    Phases {
        /// Weight fraction of Mg
        #[arg(long)]
        mg: f64,
        /// Weight fraction of Fe
        #[arg(long)]
        fe: f64,
        /// Weight fraction of Si
        #[arg(long)]
        si: f64,
        #[arg(long, default_value_t = 0.0)]
        ca: f64,
        #[arg(long, default_value_t = 0.0)]
        al: f64,
        /// Pressure [GPa] for the iron partitioning
        #[arg(long, default_value_t = 25.0)]
        pressure_gpa: f64,
        /// Temperature [K] for the iron partitioning
        #[arg(long, default_value_t = 2000.0)]
        temperature_k: f64,
        /// Exchange coefficient at the reference pressure
        #[arg(long, default_value_t = 0.5)]
        kd0: f64,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let json = cli.json;
    let result = match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Run {
            project_path,
            output,
        } => cmd_run(&project_path, output.as_deref(), json),
        Commands::Catalog { query } => cmd_catalog(query.as_deref().unwrap_or(""), json),
        Commands::Methods => cmd_methods(json),
        Commands::Phases {
            mg,
            fe,
            si,
            ca,
            al,
            pressure_gpa,
            temperature_k,
            kd0,
        } => cmd_phases(
            &WeightFractions { mg, fe, si, ca, al },
            pressure_gpa,
            temperature_k,
            kd0,
            json,
        ),
    };

    if let Err(err) = result {
        if json {
            let report = serde_json::json!({ "error": err.to_string(), "kind": err.kind() });
            eprintln!("{report}");
        } else {
            eprintln!("error: {err}");
        }
        std::process::exit(1);
    }
}

fn print_json(value: &impl Serialize) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_validate(project_path: &Path) -> CliResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = sf_project::load(project_path).map_err(CliError::project(project_path))?;
    println!("✓ Project '{}' is valid ({})", project.name, project.computation.key());
    Ok(())
}

fn cmd_run(project_path: &Path, output: Option<&Path>, json: bool) -> CliResult<()> {
    let project = sf_project::load(project_path).map_err(CliError::project(project_path))?;
    let result = run_project(&project).map_err(CliError::project(project_path))?;

    if let Some(path) = output {
        let content = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, content).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "result written");
    }
    if json {
        return print_json(&result);
    }

    match &result {
        RunOutput::Velocities(report) => {
            println!(
                "{:>10} {:>9} {:>10} {:>9} {:>9} {:>9}",
                "P [GPa]", "T [K]", "rho", "Vp", "Vs", "Vphi"
            );
            let p = &report.properties;
            for i in 0..report.pressure.len() {
                println!(
                    "{:>10.3} {:>9.1} {:>10.1} {:>9.1} {:>9.1} {:>9.1}",
                    report.pressure[i] / 1.0e9,
                    report.temperature[i],
                    p.density[i],
                    p.v_p[i],
                    p.v_s[i],
                    p.v_phi[i]
                );
            }
            if let Some(misfit) = &report.misfit {
                println!(
                    "misfit (l2):  rho {:.4e}  vphi {:.4e}  vs {:.4e}",
                    misfit.l2.density, misfit.l2.v_phi, misfit.l2.v_s
                );
                println!(
                    "misfit (chi): rho {:.4}  vphi {:.4}  vs {:.4}",
                    misfit.chi_factor.density, misfit.chi_factor.v_phi, misfit.chi_factor.v_s
                );
            }
        }
        RunOutput::Depths(profile) | RunOutput::Pressures(profile) => {
            println!(
                "{:>10} {:>10} {:>9} {:>10}",
                "z [km]", "P [GPa]", "T [K]", "rho"
            );
            for i in 0..profile.len() {
                println!(
                    "{:>10.2} {:>10.3} {:>9.1} {:>10.1}",
                    profile.depth[i] / 1.0e3,
                    profile.pressure[i] / 1.0e9,
                    profile.temperature[i],
                    profile.density[i]
                );
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct CatalogRow<'a> {
    id: &'a str,
    name: &'a str,
    aliases: &'a [&'a str],
    citation: &'a str,
}

fn cmd_catalog(query: &str, json: bool) -> CliResult<()> {
    let rows: Vec<CatalogRow> = catalog::search(query)
        .into_iter()
        .map(|e| CatalogRow {
            id: e.canonical_id,
            name: e.display_name,
            aliases: e.aliases,
            citation: e.citation,
        })
        .collect();
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No minerals match '{query}'");
    }
    for row in rows {
        println!("  {:<26} {} ({})", row.id, row.name, row.citation);
    }
    Ok(())
}

#[derive(Serialize)]
struct MethodList {
    equations_of_state: Vec<&'static str>,
    averaging: Vec<&'static str>,
}

fn cmd_methods(json: bool) -> CliResult<()> {
    let list = MethodList {
        equations_of_state: EosMethod::ALL.iter().map(EosMethod::tag).collect(),
        averaging: Averaging::ALL.iter().map(Averaging::key).collect(),
    };
    if json {
        return print_json(&list);
    }
    println!("Equations of state:");
    for method in EosMethod::ALL {
        let kind = if method.is_thermal() { "thermal" } else { "isothermal" };
        println!("  {:<6} {kind}", method.tag());
    }
    println!("Averaging schemes:");
    for key in list.averaging {
        println!("  {key}");
    }
    Ok(())
}

fn cmd_phases(
    composition: &WeightFractions,
    pressure_gpa: f64,
    temperature_k: f64,
    kd0: f64,
    json: bool,
) -> CliResult<()> {
    let (phases, moles) = calculate_phase_percents(composition)?;
    let iron = calculate_partition_coefficient(gpa(pressure_gpa), k(temperature_k), &moles, kd0)?;
    if json {
        return print_json(&serde_json::json!({
            "phases": phases,
            "moles": moles,
            "iron_partition": iron,
        }));
    }
    println!("perovskite      {:.4}", phases.pv);
    println!("ferropericlase  {:.4}", phases.fp);
    println!(
        "Fe partitioning at {pressure_gpa} GPa, {temperature_k} K: fp {:.4}  pv {:.4}",
        iron.ferropericlase, iron.perovskite
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["seismoflow", "catalog", "perovskite", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Catalog { query: Some(ref q) } if q == "perovskite"));
    }

    #[test]
    fn phases_defaults() {
        let cli =
            Cli::try_parse_from(["seismoflow", "phases", "--mg", "0.2", "--fe", "0.06", "--si", "0.21"])
                .unwrap();
        let Commands::Phases { ca, kd0, pressure_gpa, .. } = cli.command else {
            panic!("expected phases");
        };
        assert_eq!(ca, 0.0);
        assert_eq!(kd0, 0.5);
        assert_eq!(pressure_gpa, 25.0);
    }
}
