//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::{
    OnboardingSubmission, SelectionProcessor, SessionFile, SessionService, TreePicker,
};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, SelectedFormat};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{branch_key, root_key, KeyPath, Level, Scope, TaxonomyKind};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, SelectionItem};
use crate::infrastructure::InfraError;

pub fn execute(cli: &Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli)?;
    debug!("execute: project_dir={}", project_dir.display());

    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => cmd_completion(*shell),
        Commands::Config { command } => cmd_config(command, &project_dir),
        other => {
            let settings = Settings::load(Some(&project_dir))?;
            let container = ServiceContainer::new(settings);
            dispatch(other, &container)
        }
    }
}

fn dispatch(command: &Commands, container: &ServiceContainer) -> CliResult<()> {
    match command {
        Commands::Tree { picker, all } => cmd_tree(container, (*picker).into(), *all),
        Commands::Toggle { picker, path } => cmd_toggle(container, (*picker).into(), path),
        Commands::Expand { picker, path } => cmd_expand(container, (*picker).into(), path),
        Commands::Selected { picker, format } => cmd_selected(container, (*picker).into(), *format),
        Commands::Pick { picker } => cmd_pick(container, (*picker).into()),
        Commands::Submit => cmd_submit(container),
        Commands::Reset { picker } => cmd_reset(container, picker.map(TaxonomyKind::from)),
        Commands::Completion { .. } | Commands::Config { .. } => Err(CliError::Usage(
            "command does not need picker state".to_string(),
        )),
    }
}

fn resolve_project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::from(InfraError::io("determine current directory", e))),
    }
}

/// Session plus the service that reads and writes it.
struct SessionState {
    service: SessionService,
    file: SessionFile,
}

impl SessionState {
    fn open(container: &ServiceContainer) -> CliResult<Self> {
        let service = container.session();
        let file = service.load()?;
        Ok(Self { service, file })
    }

    fn picker(&self, container: &ServiceContainer, kind: TaxonomyKind) -> CliResult<TreePicker> {
        let taxonomy = container.taxonomy(kind)?;
        Ok(self.service.restore(&self.file, taxonomy))
    }

    fn commit(&mut self, picker: &TreePicker) -> CliResult<()> {
        self.service.record(&mut self.file, picker);
        self.service.save(&self.file)?;
        Ok(())
    }
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, kind: TaxonomyKind, all: bool) -> CliResult<()> {
    let session = SessionState::open(container)?;
    let picker = session.picker(container, kind)?;
    output::info(&picker.render(all));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_toggle(
    container: &ServiceContainer,
    kind: TaxonomyKind,
    segments: &[String],
) -> CliResult<()> {
    let path = KeyPath::from_segments(segments)?;
    let mut session = SessionState::open(container)?;
    let picker = session.picker(container, kind)?;

    let state = if container.settings.strict {
        picker.toggle_strict(&path)?
    } else {
        picker.toggle(&path)
    };
    session.commit(&picker)?;

    output::toggled(&describe(kind, &path), state.is_checked(&path));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_expand(
    container: &ServiceContainer,
    kind: TaxonomyKind,
    segments: &[String],
) -> CliResult<()> {
    let key = match segments {
        [root] => root_key(root),
        [root, branch] => branch_key(root, branch),
        _ => {
            return Err(CliError::InvalidArgs(format!(
                "expand takes 1 or 2 path segments, got {}",
                segments.len()
            )))
        }
    };
    let mut session = SessionState::open(container)?;
    let mut picker = session.picker(container, kind)?;

    picker.toggle_expand(&key);
    session.commit(&picker)?;

    output::expanded(&key, picker.expansion().is_expanded(&key));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_selected(
    container: &ServiceContainer,
    kind: TaxonomyKind,
    format: SelectedFormat,
) -> CliResult<()> {
    let session = SessionState::open(container)?;
    let picker = session.picker(container, kind)?;

    match format {
        SelectedFormat::Json => {
            let json = serde_json::to_string_pretty(&picker.selected()).map_err(|e| {
                ApplicationError::OperationFailed {
                    context: "serialize selection".to_string(),
                    source: Box::new(e),
                }
            })?;
            output::info(&json);
        }
        SelectedFormat::Flat => {
            let scope = picker.mount(&Scope::root());
            let processor =
                SelectionProcessor::from_scope(&scope, kind, Some(picker.taxonomy().as_ref()))?;
            for line in processor.lines() {
                output::info(&line);
            }
        }
        SelectedFormat::Nested => {
            let groups = picker.selected();
            if groups.is_empty() {
                output::info("(nothing selected)");
            }
            for group in groups {
                let label = picker
                    .taxonomy()
                    .label_of(&KeyPath::Root(group.root.clone()))
                    .unwrap_or(group.root.as_str())
                    .to_string();
                output::header(&label);
                output::field(kind.level_name(Level::Branch), &group.branches.join(", "));
                output::field(kind.level_name(Level::Leaf), &group.leaves.join(", "));
            }
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_pick(container: &ServiceContainer, kind: TaxonomyKind) -> CliResult<()> {
    let mut session = SessionState::open(container)?;
    let picker = session.picker(container, kind)?;
    let state = picker.state();

    let items: Vec<SelectionItem> = picker
        .arena()
        .node_paths()
        .into_iter()
        .map(|path| {
            let checked = state.is_checked(&path);
            let mark = if checked { "[x]" } else { "[ ]" };
            SelectionItem {
                display: format!("{mark} {path}"),
                value: segments_of(&path).join("\t"),
            }
        })
        .collect();

    let chosen = container
        .selector
        .select_one(&items, &format!("{kind}> "))
        .map_err(|message| InfraError::Selector { message })?;

    let Some(item) = chosen else {
        debug!("cmd_pick: selection aborted");
        return Ok(());
    };
    let segments: Vec<&str> = item.value.split('\t').collect();
    let path = KeyPath::from_segments(&segments)?;
    let state = picker.toggle_strict(&path)?;
    session.commit(&picker)?;

    output::toggled(&describe(kind, &path), state.is_checked(&path));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_submit(container: &ServiceContainer) -> CliResult<()> {
    let session = SessionState::open(container)?;
    let expertise = session.picker(container, TaxonomyKind::Expertise)?;
    let location = session.picker(container, TaxonomyKind::Location)?;

    let scope = expertise.mount(&Scope::root());
    let scope = location.mount(&scope);
    let submission = OnboardingSubmission::from_scope(&scope)?;

    output::info(&submission.to_json()?);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_reset(container: &ServiceContainer, kind: Option<TaxonomyKind>) -> CliResult<()> {
    let mut session = SessionState::open(container)?;
    session.service.clear(&mut session.file, kind);
    session.service.save(&session.file)?;

    match kind {
        Some(kind) => output::success(&format!("{kind} picker reset")),
        None => output::success("all pickers reset"),
    }
    Ok(())
}

fn cmd_config(command: &ConfigCommands, project_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };
            let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
            if fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            fs.ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            fs.write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
        }
        ConfigCommands::Path => {
            let settings = Settings::load(Some(project_dir))?;
            match global_config_path() {
                Some(path) => output::field("global", &path.display()),
                None => output::field("global", "(unavailable)"),
            }
            output::field("local", &local_config_path(project_dir).display());
            output::field("session", &settings.session_file.display());
        }
    }
    Ok(())
}

fn cmd_completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

fn segments_of(path: &KeyPath) -> Vec<&str> {
    match path {
        KeyPath::Root(r) => vec![r.as_str()],
        KeyPath::Branch(r, b) => vec![r.as_str(), b.as_str()],
        KeyPath::Leaf(r, b, l) => vec![r.as_str(), b.as_str(), l.as_str()],
    }
}

fn describe(kind: TaxonomyKind, path: &KeyPath) -> String {
    format!("{} {}", kind.level_name(path.level()), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::PickerArg;

    #[test]
    fn given_leaf_path_when_segments_of_then_returns_three_parts() {
        let path = KeyPath::Leaf("Nigeria".into(), "Ogun".into(), "Ado-Odo/Ota".into());
        assert_eq!(segments_of(&path), vec!["Nigeria", "Ogun", "Ado-Odo/Ota"]);
    }

    #[test]
    fn given_branch_path_when_describe_then_uses_kind_level_name() {
        let path = KeyPath::Branch("Nigeria".into(), "Lagos".into());
        assert_eq!(
            describe(TaxonomyKind::Location, &path),
            "state Nigeria > Lagos"
        );
    }

    #[test]
    fn given_picker_arg_when_converted_then_maps_to_kind() {
        assert_eq!(
            TaxonomyKind::from(PickerArg::Expertise),
            TaxonomyKind::Expertise
        );
        assert_eq!(
            TaxonomyKind::from(PickerArg::Location),
            TaxonomyKind::Location
        );
    }
}
