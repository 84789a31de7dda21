use crate::cli::{ConfigArgs, ConfigCommands, ProfileSourceArgs};
use crate::error::{CliError, Result};
use crate::profile::store::read_record;
use crate::profile::{
    AnswerSource, FWorker, LaunchPad, ProfileError, ProfileKind, ProfileRecord, ProfileStore,
    QueueAdapter, ScriptedAnswers, TerminalAnswers,
};
use crate::settings::{RootSource, SettingsManager};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn run(args: ConfigArgs, profile_root: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Launchpad(source) => {
            let store = open_store(profile_root)?;
            report_saved::<LaunchPad>(&store_record(&store, &source, LaunchPad::collect)?);
        }
        ConfigCommands::Fworker(source) => {
            let store = open_store(profile_root)?;
            report_saved::<FWorker>(&store_record(&store, &source, FWorker::collect)?);
        }
        ConfigCommands::Queue(source) => {
            let store = open_store(profile_root)?;
            let adapter = match &source.file {
                Some(file) => {
                    info!("Importing {} profile from {:?}", QueueAdapter::KIND, file);
                    read_record::<QueueAdapter>(file).map_err(file_parsing_error)?
                }
                None => collect_answers(&source, QueueAdapter::collect)?,
            };
            let saved = store.save_queue_adapter(&source.name, adapter)?;
            report_saved::<QueueAdapter>(&saved.path);
            if let Some(warning) = saved.warning {
                eprintln!("⚠️  {}", warning);
            }
        }
        ConfigCommands::Jobscript { template, name } => {
            let target = open_store(profile_root)?.install_job_template(&template, &name)?;
            println!("Job template for '{}' installed at: {}", name, target.display());
        }
        ConfigCommands::Show { kind, name } => handle_show(&open_store(profile_root)?, kind, &name)?,
        ConfigCommands::List { kind } => handle_list(&open_store(profile_root)?, kind)?,
        ConfigCommands::Root => handle_root(&SettingsManager::new()?, profile_root)?,
        ConfigCommands::SetRoot { path } => {
            let absolute = SettingsManager::new()?.set_profile_root(&path)?;
            println!("Profile root set to: {}", absolute.display());
        }
        ConfigCommands::ResetRoot => {
            let settings = SettingsManager::new()?;
            settings.reset_profile_root()?;
            let (root, _) = settings.resolve_profile_root(None)?;
            println!("Profile root reset to: {}", root.display());
        }
    }
    Ok(())
}

/// Store at `--profile-root` when given. The settings file is only consulted
/// without one.
fn open_store(profile_root: Option<&Path>) -> Result<ProfileStore> {
    let root = match profile_root {
        Some(root) => {
            debug!("Using profile root {:?} from the command line", root);
            root.to_path_buf()
        }
        None => {
            let (root, source) = SettingsManager::new()?.resolve_profile_root(None)?;
            debug!(?source, "Using profile root {:?}", root);
            root
        }
    };
    Ok(ProfileStore::new(root))
}

fn file_parsing_error(error: ProfileError) -> CliError {
    match error {
        ProfileError::Parse { path, source } => CliError::FileParsing {
            path,
            source: source.into(),
        },
        other => other.into(),
    }
}

/// Imports the record from `--file` if given, otherwise collects it from the
/// answers and saves it. Returns the stored profile's path.
fn store_record<R, F>(store: &ProfileStore, source: &ProfileSourceArgs, collect: F) -> Result<PathBuf>
where
    R: ProfileRecord,
    F: FnOnce(&mut dyn AnswerSource) -> std::result::Result<R, ProfileError>,
{
    if let Some(file) = &source.file {
        info!("Importing {} profile from {:?}", R::KIND, file);
        return store
            .import::<R>(file, &source.name)
            .map_err(file_parsing_error);
    }
    let record = collect_answers(source, collect)?;
    Ok(store.save(&source.name, &record)?)
}

/// Answers from `--set` values or, when there are none, from the terminal.
fn collect_answers<R, F>(source: &ProfileSourceArgs, collect: F) -> Result<R>
where
    F: FnOnce(&mut dyn AnswerSource) -> std::result::Result<R, ProfileError>,
{
    let mut scripted = ScriptedAnswers::from_assignments(&source.set_values)?;
    let mut terminal = TerminalAnswers::new();
    let answers: &mut dyn AnswerSource = if scripted.is_empty() {
        debug!("No --set values given, asking on the terminal.");
        &mut terminal
    } else {
        &mut scripted
    };
    Ok(collect(answers)?)
}

fn report_saved<R: ProfileRecord>(path: &Path) {
    println!("Saved {} profile to: {}", R::KIND, path.display());
}

fn handle_root(settings: &SettingsManager, profile_root: Option<&Path>) -> Result<()> {
    debug!("Settings file: {:?}", settings.settings_file());
    let (root, source) = settings.resolve_profile_root(profile_root)?;
    let origin = match source {
        RootSource::CommandLine => "command line",
        RootSource::Settings => "settings file",
        RootSource::Default => "default",
    };
    println!("{} ({})", root.display(), origin);
    Ok(())
}

fn handle_show(store: &ProfileStore, kind: ProfileKind, name: &str) -> Result<()> {
    let path = store.profile_path(kind, name);
    let yaml = match kind {
        ProfileKind::Launchpad => load_as_yaml::<LaunchPad>(store, name),
        ProfileKind::Fworker => load_as_yaml::<FWorker>(store, name),
        ProfileKind::Qadapter => load_as_yaml::<QueueAdapter>(store, name),
    }
    .map_err(|e| {
        if e.is_not_found() {
            CliError::Argument(format!(
                "No {} profile named '{}' (expected at '{}').",
                kind,
                name,
                path.display()
            ))
        } else {
            e.into()
        }
    })?;
    println!("# {}", path.display());
    print!("{}", yaml);
    Ok(())
}

fn load_as_yaml<R: ProfileRecord>(
    store: &ProfileStore,
    name: &str,
) -> std::result::Result<String, ProfileError> {
    let record: R = store.load(name)?;
    serde_yaml::to_string(&record).map_err(ProfileError::Serialize)
}

fn handle_list(store: &ProfileStore, kind: Option<ProfileKind>) -> Result<()> {
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => ProfileKind::ALL.to_vec(),
    };
    println!("Profiles in {}:", store.root().display());
    for kind in kinds {
        let names = store.list(kind)?;
        if names.is_empty() {
            println!("  {}: (none)", kind);
        } else {
            println!("  {}: {}", kind, names.join(", "));
        }
    }
    Ok(())
}
