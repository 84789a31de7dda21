use super::answers::AnswerSource;
use super::error::ProfileError;
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned, de::Error as _};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Keys not modelled explicitly; kept so a round-trip does not lose them.
pub type ExtraFields = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ProfileKind {
    Launchpad,
    Fworker,
    Qadapter,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 3] = [Self::Launchpad, Self::Fworker, Self::Qadapter];

    /// Subdirectory of the profile root holding this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Launchpad => "launchpad",
            Self::Fworker => "fworker",
            Self::Qadapter => "qadapter",
        }
    }

    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::Launchpad => "_launchpad.yaml",
            Self::Fworker => "_fworker.yaml",
            Self::Qadapter => "_qadapter.yaml",
        }
    }

    pub fn file_name(self, name: &str) -> String {
        format!("{}{}", name, self.file_suffix())
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A record stored as `<root>/<kind>/<name>_<kind>.yaml`.
pub trait ProfileRecord: Serialize + DeserializeOwned {
    const KIND: ProfileKind;
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    27017
}

fn default_database() -> String {
    "fireworks".to_string()
}

fn default_authsource() -> String {
    "admin".to_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Reads a scalar that FireWorks files often leave as `null`. Flattened
/// records buffer their fields, and a null can then arrive as the plain
/// string `"null"`, so that spelling is treated as absent as well.
fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(text) => match text.as_str() {
            "" | "~" | "null" | "Null" | "NULL" => Ok(None),
            _ => Ok(Some(text)),
        },
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        other => Err(D::Error::custom(format!(
            "expected a string or null, found {:?}",
            other
        ))),
    }
}

fn authsource_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(nullable_string(deserializer)?.unwrap_or_else(default_authsource))
}

/// Connection details for the workflow database server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchPad {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "nullable_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<String>,
    #[serde(default = "default_true")]
    pub ssl: bool,
    #[serde(
        default = "default_authsource",
        deserialize_with = "authsource_or_default"
    )]
    pub authsource: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl ProfileRecord for LaunchPad {
    const KIND: ProfileKind = ProfileKind::Launchpad;
}

impl LaunchPad {
    /// Builds a launchpad from host, port, database name and credentials.
    ///
    /// Empty credentials are left out of the record.
    pub fn collect(answers: &mut dyn AnswerSource) -> Result<Self, ProfileError> {
        let host = answers.answer("host", "Please provide the server host")?;
        let port_answer = answers.answer("port", "Please provide the port number")?;
        let port = port_answer
            .trim()
            .parse::<u16>()
            .map_err(|e| ProfileError::InvalidAnswer {
                key: "port".to_string(),
                value: port_answer.clone(),
                reason: e.to_string(),
            })?;
        let name = answers.answer("name", "Please provide the server name")?;
        let username = answers.answer("username", "Please provide your username")?;
        let password = answers.answer("password", "Please provide your password")?;

        Ok(Self {
            host,
            port,
            name,
            username: non_empty(username),
            password: non_empty(password),
            ssl: true,
            authsource: default_authsource(),
            extra: ExtraFields::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Single(String),
    List(Vec<String>),
}

impl Default for Category {
    fn default() -> Self {
        Self::List(vec!["none".to_string(), "1nodes".to_string()])
    }
}

fn default_query() -> String {
    "{}".to_string()
}

/// Identity of a worker that pulls jobs from the launchpad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FWorker {
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default)]
    pub env: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl ProfileRecord for FWorker {
    const KIND: ProfileKind = ProfileKind::Fworker;
}

impl FWorker {
    pub fn collect(answers: &mut dyn AnswerSource) -> Result<Self, ProfileError> {
        let name = answers.answer("name", "Please provide the fireworker name")?;
        let vasp_cmd = answers.answer("vasp_cmd", "Please provide the full vasp command")?;

        let mut env = BTreeMap::new();
        env.insert("vasp_cmd".to_string(), Value::String(vasp_cmd));
        Ok(Self {
            name,
            category: Category::default(),
            query: default_query(),
            env,
            extra: ExtraFields::new(),
        })
    }
}

fn default_adapter_name() -> String {
    "CommonAdapter".to_string()
}

/// Queue-submission settings for one fireworker.
///
/// Everything apart from the adapter bookkeeping keys (`nodes`, `walltime`,
/// `rocket_launch`, ...) lives in `params` and fills the job template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueAdapter {
    #[serde(rename = "_fw_name", default = "default_adapter_name")]
    pub adapter: String,
    #[serde(rename = "_fw_q_type")]
    pub q_type: String,
    #[serde(
        rename = "_fw_template_file",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub template_file: Option<PathBuf>,
    #[serde(flatten)]
    pub params: ExtraFields,
}

impl ProfileRecord for QueueAdapter {
    const KIND: ProfileKind = ProfileKind::Qadapter;
}

impl QueueAdapter {
    pub fn collect(answers: &mut dyn AnswerSource) -> Result<Self, ProfileError> {
        let q_type = answers.answer("q_type", "Please provide the queue type (e.g. SLURM, PBS)")?;
        let rocket_launch =
            answers.answer("rocket_launch", "Please provide the rocket launch command")?;

        let mut params = ExtraFields::new();
        params.insert("rocket_launch".to_string(), Value::String(rocket_launch));
        Ok(Self {
            adapter: default_adapter_name(),
            q_type,
            template_file: None,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::answers::ScriptedAnswers;

    fn answers(pairs: &[&str]) -> ScriptedAnswers {
        ScriptedAnswers::from_assignments(pairs).unwrap()
    }

    #[test]
    fn kind_file_names_follow_convention() {
        assert_eq!(ProfileKind::Launchpad.file_name("base"), "base_launchpad.yaml");
        assert_eq!(ProfileKind::Fworker.file_name("leibniz"), "leibniz_fworker.yaml");
        assert_eq!(ProfileKind::Qadapter.dir_name(), "qadapter");
        assert_eq!(ProfileKind::Qadapter.to_string(), "qadapter");
    }

    #[test]
    fn launchpad_collect_fills_fixed_defaults() {
        let mut source = answers(&[
            "host=db.example.org",
            "port=27017",
            "name=neb",
            "username=alice",
            "password=secret",
        ]);

        let lpad = LaunchPad::collect(&mut source).unwrap();

        assert_eq!(lpad.host, "db.example.org");
        assert_eq!(lpad.port, 27017);
        assert_eq!(lpad.username.as_deref(), Some("alice"));
        assert!(lpad.ssl);
        assert_eq!(lpad.authsource, "admin");
    }

    #[test]
    fn launchpad_collect_rejects_non_numeric_port() {
        let mut source = answers(&["host=h", "port=mongo", "name=n", "username=", "password="]);

        let err = LaunchPad::collect(&mut source).unwrap_err();

        assert!(matches!(err, ProfileError::InvalidAnswer { key, value, .. }
            if key == "port" && value == "mongo"));
    }

    #[test]
    fn launchpad_collect_drops_empty_credentials() {
        let mut source = answers(&["host=h", "port=1", "name=n", "username=", "password="]);

        let lpad = LaunchPad::collect(&mut source).unwrap();

        assert_eq!(lpad.username, None);
        assert_eq!(lpad.password, None);
    }

    #[test]
    fn launchpad_yaml_keeps_unknown_keys() {
        let yaml = "host: db\nport: 27018\nname: neb\nlogdir: /tmp/logs\nstrm_lvl: INFO\n";

        let lpad: LaunchPad = serde_yaml::from_str(yaml).unwrap();
        let written = serde_yaml::to_string(&lpad).unwrap();
        let reread: LaunchPad = serde_yaml::from_str(&written).unwrap();

        assert_eq!(lpad.port, 27018);
        assert!(lpad.ssl);
        assert_eq!(reread.extra.get("logdir"), Some(&Value::String("/tmp/logs".into())));
        assert_eq!(reread, lpad);
    }

    #[test]
    fn launchpad_yaml_with_null_fields_falls_back_to_defaults() {
        let yaml = "host: localhost\nport: 27017\nname: fireworks\nusername: null\n\
                    password: null\nssl: false\nauthsource: null\nlogdir: null\nstrm_lvl: INFO\n";

        let lpad: LaunchPad = serde_yaml::from_str(yaml).unwrap();
        let written = serde_yaml::to_string(&lpad).unwrap();

        assert_eq!(lpad.authsource, "admin");
        assert_eq!(lpad.username, None);
        assert_eq!(lpad.password, None);
        assert!(!lpad.ssl);
        assert!(written.contains("authsource: admin"));
        assert!(!written.contains("'null'"));
        assert!(!written.contains("username"));
    }

    #[test]
    fn launchpad_yaml_keeps_numeric_password_as_text() {
        let lpad: LaunchPad = serde_yaml::from_str("host: db\npassword: 1234\n").unwrap();
        assert_eq!(lpad.password.as_deref(), Some("1234"));
    }

    #[test]
    fn fworker_collect_sets_category_and_vasp_command() {
        let mut source = answers(&["name=leibniz", "vasp_cmd=mpirun vasp_std"]);

        let worker = FWorker::collect(&mut source).unwrap();

        assert_eq!(worker.name, "leibniz");
        assert_eq!(worker.category, Category::default());
        assert_eq!(worker.query, "{}");
        assert_eq!(
            worker.env.get("vasp_cmd"),
            Some(&Value::String("mpirun vasp_std".into()))
        );
    }

    #[test]
    fn fworker_accepts_single_string_category() {
        let worker: FWorker = serde_yaml::from_str("name: w\ncategory: gpu\n").unwrap();
        assert_eq!(worker.category, Category::Single("gpu".to_string()));
    }

    #[test]
    fn queue_adapter_maps_fireworks_bookkeeping_keys() {
        let yaml = "_fw_name: CommonAdapter\n_fw_q_type: SLURM\nnodes: 2\nwalltime: '12:00:00'\n";

        let adapter: QueueAdapter = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(adapter.q_type, "SLURM");
        assert_eq!(adapter.template_file, None);
        assert_eq!(adapter.params.get("nodes").and_then(Value::as_u64), Some(2));
        assert!(!serde_yaml::to_string(&adapter).unwrap().contains("_fw_template_file"));
    }

    #[test]
    fn queue_adapter_collect_uses_common_adapter() {
        let mut source = answers(&["q_type=PBS", "rocket_launch=rlaunch singleshot"]);

        let adapter = QueueAdapter::collect(&mut source).unwrap();

        assert_eq!(adapter.adapter, "CommonAdapter");
        assert_eq!(adapter.q_type, "PBS");
        assert!(adapter.params.contains_key("rocket_launch"));
    }
}
