//! Command dispatch

use std::path::{Path, PathBuf};

use chrono::Datelike;
use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::EvaluationEngine;
use crate::application::EvaluationReport;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{SelectionItem, Selector, SkimSelector};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Sites) => cmd_sites(cli),
        Some(Commands::Evaluate {
            site,
            year,
            wind,
            json,
        }) => cmd_evaluate(cli, site.as_deref(), *year, *wind, *json),
        Some(Commands::Map { site, year, wind }) => cmd_map(cli, site.as_deref(), *year, *wind),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "woprune", &mut std::io::stdout());
            Ok(())
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
    }
}

/// Directory searched for the local config file.
fn local_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(std::env::current_dir().map_err(|e| InfraError::io("current dir", e))?),
    }
}

/// Settings for this invocation; `--data-dir` wins over every config layer.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(Some(local_dir(cli)?.as_path()))?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?)?)
}

/// Given site name, or one chosen interactively from the catalog.
pub fn select_site(
    engine: &EvaluationEngine,
    site: Option<&str>,
    selector: &dyn Selector,
) -> CliResult<String> {
    if let Some(name) = site {
        return Ok(name.to_string());
    }
    let items: Vec<SelectionItem> = engine
        .sites()
        .iter()
        .map(SelectionItem::from_site)
        .collect();
    if items.is_empty() {
        return Err(CliError::Usage("site catalog is empty".to_string()));
    }
    selector
        .select_one(&items, "WO site> ")
        .map_err(|message| InfraError::Selector { message })?
        .map(|item| item.value)
        .ok_or_else(|| CliError::Usage("no site selected".to_string()))
}

fn run_evaluation(
    container: &ServiceContainer,
    site: Option<&str>,
    year: Option<i32>,
    wind: Option<f64>,
) -> CliResult<EvaluationReport> {
    let site = select_site(&container.engine, site, &SkimSelector)?;
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    let provider = container.wind_provider(wind);
    Ok(container.engine.evaluate_with(&site, year, provider.as_ref())?)
}

#[instrument(skip(cli))]
fn cmd_sites(cli: &Cli) -> CliResult<()> {
    let container = container(cli)?;
    output::site_table(&container.engine.sites());
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_evaluate(
    cli: &Cli,
    site: Option<&str>,
    year: Option<i32>,
    wind: Option<f64>,
    json: bool,
) -> CliResult<()> {
    let container = container(cli)?;
    let report = run_evaluation(&container, site, year, wind)?;

    if json {
        let text = to_pretty_json(&report, "report")?;
        output::info(&text);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Pretty JSON for `value`; a failure here is an internal error.
fn to_pretty_json<T: serde::Serialize>(value: &T, what: &str) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Internal(format!("cannot serialize {what}: {e}")))
}

#[instrument(skip(cli))]
fn cmd_map(cli: &Cli, site: Option<&str>, year: Option<i32>, wind: Option<f64>) -> CliResult<()> {
    let container = container(cli)?;
    let report = run_evaluation(&container, site, year, wind)?;
    let text = to_pretty_json(&report.to_geojson(), "map")?;
    output::info(&text);
    if report.has_unevaluable() {
        output::warning(&format!(
            "{} trees could not be evaluated and are not on the map",
            report.unevaluable.len()
        ));
    }
    Ok(())
}

fn print_report(report: &EvaluationReport) {
    output::action(
        "Wind",
        &format!(
            "{:.1} km/h around {} (evaluation year {})",
            report.wind_speed_kmh, report.site.name, report.evaluation_year
        ),
    );

    output::header("All trees");
    output::tree_table(&report.trees.iter().collect::<Vec<_>>());

    output::header("Pruning recommended");
    output::tree_table(&report.prune_recommended());

    output::header("Over maximum height");
    output::tree_table(&report.over_max());

    output::header("Near height limit");
    output::tree_table(&report.near_limit());

    if report.has_unevaluable() {
        output::warning(&format!(
            "{} trees could not be evaluated and appear in no risk table",
            report.unevaluable.len()
        ));
        output::unevaluable_table(&report.unevaluable);
    }
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::action("Global", &p.display()),
                None => output::action("Global", &"(no config directory)"),
            }
            output::action("Local", &local_config_path(&local_dir(cli)?).display());
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(&local_dir(cli)?)
            };
            write_template(&path)?;
            output::action("Created", &path.display());
            Ok(())
        }
    }
}

fn write_template(path: &Path) -> CliResult<()> {
    if path.exists() {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
    }
    std::fs::write(path, Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(())
}
