//! Command dispatch: wires CLI arguments to services and prints results.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::plans::{self, command_docs, planfiles};
use crate::application::services::{CleanupStatus, FileStatus, PlanReport};
use crate::application::{ApplicationError, EditPlan};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::util::path::display_path;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Planfiles) => cmd_run(cli, planfiles::plan()),
        Some(Commands::CommandDocs) => cmd_run(cli, command_docs::plan()),
        Some(Commands::Apply { plan }) => cmd_apply(cli, plan),
        Some(Commands::Plans { name }) => cmd_plans(name.as_deref()),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => {
            output::info("No command given. Run 'mdxfix --help' for usage.");
            Ok(())
        }
    }
}

/// Load layered settings, then apply CLI overrides.
fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let mut settings = Settings::load(cli.project_dir.as_deref())?;
    if let Some(root) = &cli.docs_root {
        settings.docs_root = root.clone();
    }
    if cli.no_normalize {
        settings.normalize_blank_lines = false;
    }
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings))
}

#[instrument(skip(cli, plan), fields(plan = %plan.name))]
fn cmd_run(cli: &Cli, plan: EditPlan) -> CliResult<()> {
    let container = build_container(cli)?;
    let report = container.rewrite_service(cli.dry_run).run(&plan)?;
    print_report(&report);
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_apply(cli: &Cli, plan_ref: &str) -> CliResult<()> {
    if let Some(plan) = plans::builtin(plan_ref) {
        return cmd_run(cli, plan);
    }

    let container = build_container(cli)?;
    let path = Path::new(plan_ref);
    if !container.fs.is_file(path) {
        return Err(ApplicationError::PlanNotFound(plan_ref.to_string()).into());
    }
    let plan = EditPlan::load(&container.fs, path)?;
    let report = container.rewrite_service(cli.dry_run).run(&plan)?;
    print_report(&report);
    Ok(())
}

fn cmd_plans(name: Option<&str>) -> CliResult<()> {
    match name {
        Some(name) => {
            let plan = plans::builtin(name)
                .ok_or_else(|| ApplicationError::PlanNotFound(name.to_string()))?;
            output::info(&plan.to_toml()?);
        }
        None => {
            output::header("Built-in plans");
            for name in plans::BUILTIN_PLAN_NAMES {
                if let Some(plan) = plans::builtin(name) {
                    output::detail(&format!(
                        "{:<14} {} ({} files, {} edits)",
                        plan.name,
                        plan.description,
                        plan.targets.len(),
                        plan.edit_count()
                    ));
                }
            }
        }
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    let project_dir = cli.project_dir.as_deref().unwrap_or_else(|| Path::new("."));
    match command {
        ConfigCommands::Show => {
            let container = build_container(cli)?;
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::warning("cannot determine global config directory"),
            }
            output::action("Local", &local_config_path(project_dir).display());
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };
            let container = ServiceContainer::new(Settings::default());
            if container.fs.exists(&path) {
                return Err(ApplicationError::AlreadyExists(path).into());
            }
            container
                .fs
                .ensure_parent(&path)
                .and_then(|_| container.fs.write(&path, &Settings::template()))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created {}", path.display()));
        }
    }
    Ok(())
}

fn print_report(report: &PlanReport) {
    if report.dry_run {
        output::header(&format!("Plan '{}' (dry run)", report.plan));
    } else {
        output::header(&format!("Plan '{}'", report.plan));
    }

    for file in &report.files {
        let shown = display_path(&file.path);
        match file.status {
            FileStatus::Missing => {
                output::warning(&format!("file not found, skipping: {}", shown));
                continue;
            }
            FileStatus::Unchanged => output::detail(&format!("unchanged: {}", shown)),
            FileStatus::WouldUpdate => output::action("Would update", &shown),
            FileStatus::Updated => output::success(&format!("Updated {}", shown)),
        }
        for edit in &file.edits {
            if edit.applied {
                output::diff_add(&edit.description);
            } else {
                output::diff_skip(&edit.description);
            }
        }
    }

    for entry in &report.cleanup {
        let shown = display_path(&entry.path);
        match entry.status {
            CleanupStatus::Removed => output::action("Removed", &shown),
            CleanupStatus::WouldRemove => output::action("Would remove", &shown),
            CleanupStatus::Absent => debug!("cleanup: {} not present", shown),
        }
    }

    let unchanged = report.files.len() - report.changed_count() - report.missing_count();
    output::info(&format!(
        "{} changed, {} unchanged, {} missing",
        report.changed_count(),
        unchanged,
        report.missing_count()
    ));
}
