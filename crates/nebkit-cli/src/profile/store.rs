use super::error::ProfileError;
use super::records::{ProfileKind, ProfileRecord, QueueAdapter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const JOB_TEMPLATE_SUFFIX: &str = "_job_template.sh";

/// Creates `path` and its parents. An existing directory is not an error.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Deserializes a record from `path`. A missing file surfaces as the
/// underlying not-found I/O error.
pub fn read_record<R: ProfileRecord>(path: &Path) -> Result<R, ProfileError> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|source| ProfileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn validate_name(name: &str) -> Result<(), ProfileError> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ProfileError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Result of storing a queue adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueAdapterSaved {
    pub path: PathBuf,
    /// Set when the companion job template has not been installed yet.
    pub warning: Option<String>,
}

/// Profiles under a single root directory, one subdirectory per kind.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind_dir(&self, kind: ProfileKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    pub fn profile_path(&self, kind: ProfileKind, name: &str) -> PathBuf {
        self.kind_dir(kind).join(kind.file_name(name))
    }

    /// Companion job template of the queue adapter for fireworker `name`.
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.kind_dir(ProfileKind::Qadapter)
            .join(format!("{}{}", name, JOB_TEMPLATE_SUFFIX))
    }

    /// Writes `record` as profile `name`, replacing any previous one.
    pub fn save<R: ProfileRecord>(&self, name: &str, record: &R) -> Result<PathBuf, ProfileError> {
        validate_name(name)?;
        ensure_dir(&self.kind_dir(R::KIND))?;
        let path = self.profile_path(R::KIND, name);
        let yaml = serde_yaml::to_string(record).map_err(ProfileError::Serialize)?;
        fs::write(&path, yaml)?;
        info!("Saved {} profile '{}' to {:?}.", R::KIND, name, path);
        Ok(path)
    }

    pub fn load<R: ProfileRecord>(&self, name: &str) -> Result<R, ProfileError> {
        validate_name(name)?;
        let path = self.profile_path(R::KIND, name);
        debug!("Loading {} profile from {:?}", R::KIND, path);
        read_record(&path)
    }

    /// Reads a record from an arbitrary file and stores it as profile `name`.
    ///
    /// The file is parsed before anything is written, so a malformed file
    /// leaves an existing profile untouched.
    pub fn import<R: ProfileRecord>(&self, source: &Path, name: &str) -> Result<PathBuf, ProfileError> {
        validate_name(name)?;
        let record: R = read_record(source)?;
        debug!("Importing {} profile '{}' from {:?}", R::KIND, name, source);
        self.save(name, &record)
    }

    /// Stores a queue adapter for fireworker `name`, pointing it at the
    /// companion job template.
    ///
    /// A template that does not exist yet does not block the write; the
    /// returned value carries a warning instead.
    pub fn save_queue_adapter(
        &self,
        name: &str,
        mut adapter: QueueAdapter,
    ) -> Result<QueueAdapterSaved, ProfileError> {
        validate_name(name)?;
        let template = self.template_path(name);
        let warning = if template.is_file() {
            None
        } else {
            let message = format!(
                "No corresponding template file found. Don't forget to use \
                 `nebkit config jobscript` to add the template file of the '{}' fireworker.",
                name
            );
            warn!("{}", message);
            Some(message)
        };

        adapter.template_file = Some(template);
        let path = self.save(name, &adapter)?;
        Ok(QueueAdapterSaved { path, warning })
    }

    /// Copies a job-script template into place for fireworker `name`.
    pub fn install_job_template(&self, source: &Path, name: &str) -> Result<PathBuf, ProfileError> {
        validate_name(name)?;
        ensure_dir(&self.kind_dir(ProfileKind::Qadapter))?;
        let target = self.template_path(name);
        fs::copy(source, &target)?;
        info!("Installed job template {:?} as {:?}.", source, target);
        Ok(target)
    }

    /// Names of the stored profiles of `kind`, sorted. A missing kind
    /// directory means no profiles.
    pub fn list(&self, kind: ProfileKind) -> Result<Vec<String>, ProfileError> {
        let dir = self.kind_dir(kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(name) = file_name
                .to_str()
                .and_then(|n| n.strip_suffix(kind.file_suffix()))
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
