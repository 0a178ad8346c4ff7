//! Installation parameters: the per-environment trigger and badge settings.
//!
//! Two file shapes are accepted. A `.json` file is the flat key/value object a
//! CMS host hands to an installed extension (`gitlabBaseUrl`,
//! `gitlabPipelineProduction`, ...). Anything else is read as TOML with one
//! `[[environment]]` table per environment. Both end up as a [`DeployConfig`],
//! which is never mutated after load.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Extra variables sent by the legacy form-encoded trigger when none are configured.
pub const LEGACY_DEFAULT_VARIABLES: &str = "PREVIEW=0";

/// Where and how a pipeline is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerTarget {
    /// `POST {base_url}/projects/{project_id}/trigger/pipeline` with a form body.
    Form {
        base_url: String,
        project_id: String,
        token: String,
        git_ref: String,
        /// Raw `NAME=value&NAME2=value2` string, parsed when the request is built.
        variables: Option<String>,
    },
    /// A complete trigger URL (token and ref already in the query), POSTed with no body.
    Url { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub name: String,
    pub label: String,
    pub badge_url: String,
    pub target: TriggerTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub success: String,
    pub error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            success: "Deployment in progress...".to_string(),
            error: "Unable to deploy the site!".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub environments: Vec<EnvironmentConfig>,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub messages: Messages,
}

impl DeployConfig {
    pub fn new(environments: Vec<EnvironmentConfig>) -> Result<Self, ConfigError> {
        let config = Self {
            environments,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            messages: Messages::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_installation_json(&raw)
        } else {
            Self::from_toml(&raw)
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw)?;
        let environments = file
            .environment
            .into_iter()
            .map(EnvironmentEntry::into_config)
            .collect::<Result<Vec<_>, _>>()?;
        let defaults = Messages::default();
        let config = Self {
            environments,
            poll_interval: Duration::from_secs(
                file.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS).max(1),
            ),
            request_timeout: Duration::from_secs(
                file.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
                    .max(1),
            ),
            messages: Messages {
                success: file.messages.success.unwrap_or(defaults.success),
                error: file.messages.error.unwrap_or(defaults.error),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_installation_json(raw: &str) -> Result<Self, ConfigError> {
        let params: InstallationParameters = serde_json::from_str(raw)?;
        Self::from_installation(&params)
    }

    pub fn from_installation(params: &InstallationParameters) -> Result<Self, ConfigError> {
        let mut environments = Vec::new();
        for (name, suffix) in INSTALLATION_ENVIRONMENTS {
            if let Some(env) = params.environment(name, suffix)? {
                environments.push(env);
            }
        }
        Self::new(environments)
    }

    pub fn environment(&self, name: &str) -> Result<&EnvironmentConfig, ConfigError> {
        self.environments
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| ConfigError::UnknownEnvironment(name.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.environments.is_empty() {
            return Err(ConfigError::NoEnvironments);
        }
        let mut seen = HashSet::new();
        for env in &self.environments {
            if env.name.trim().is_empty() {
                return Err(ConfigError::EmptyEnvironmentName);
            }
            if !seen.insert(env.name.as_str()) {
                return Err(ConfigError::DuplicateEnvironment(env.name.clone()));
            }
            if env.badge_url.trim().is_empty() {
                return Err(ConfigError::MissingParameter(format!(
                    "{}.badge_url",
                    env.name
                )));
            }
            match &env.target {
                TriggerTarget::Url { url } if url.trim().is_empty() => {
                    return Err(ConfigError::MissingParameter(format!(
                        "{}.trigger_url",
                        env.name
                    )));
                }
                TriggerTarget::Form {
                    base_url,
                    project_id,
                    token,
                    git_ref,
                    variables,
                } => {
                    let fields = [
                        ("base_url", base_url),
                        ("project_id", project_id),
                        ("token", token),
                        ("ref", git_ref),
                    ];
                    if let Some((field, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
                        return Err(ConfigError::MissingParameter(format!(
                            "{}.pipeline.{field}",
                            env.name
                        )));
                    }
                    if let Some(vars) = variables {
                        parse_variables(vars)?;
                    }
                }
                TriggerTarget::Url { .. } => {}
            }
        }
        Ok(())
    }
}

/// Parse `NAME=value&NAME2=value2` into pairs.
///
/// Empty segments (a trailing `&`, or `&&`) are skipped. Only the first `=`
/// splits, so values may contain `=`.
pub fn parse_variables(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split('&')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.to_string()))
            }
            _ => Err(ConfigError::MalformedVariable {
                segment: segment.to_string(),
            }),
        })
        .collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// --- TOML file shape ---

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    poll_interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    messages: MessagesEntry,
    #[serde(default)]
    environment: Vec<EnvironmentEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MessagesEntry {
    success: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnvironmentEntry {
    name: String,
    label: Option<String>,
    badge_url: String,
    trigger_url: Option<String>,
    pipeline: Option<PipelineEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PipelineEntry {
    base_url: String,
    project_id: String,
    token: String,
    #[serde(rename = "ref")]
    git_ref: String,
    variables: Option<String>,
}

impl EnvironmentEntry {
    fn into_config(self) -> Result<EnvironmentConfig, ConfigError> {
        let target = match (self.trigger_url, self.pipeline) {
            (Some(url), None) => TriggerTarget::Url { url },
            (None, Some(p)) => TriggerTarget::Form {
                base_url: p.base_url,
                project_id: p.project_id,
                token: p.token,
                git_ref: p.git_ref,
                variables: p.variables,
            },
            (Some(_), Some(_)) => return Err(ConfigError::AmbiguousTarget(self.name)),
            (None, None) => {
                return Err(ConfigError::MissingParameter(format!(
                    "{}.trigger_url or {}.pipeline",
                    self.name, self.name
                )));
            }
        };
        let label = self
            .label
            .unwrap_or_else(|| format!("{} environment", capitalize(&self.name)));
        Ok(EnvironmentConfig {
            name: self.name,
            label,
            badge_url: self.badge_url,
            target,
        })
    }
}

// --- Flat installation parameters ---

const INSTALLATION_ENVIRONMENTS: [(&str, &str); 3] = [
    ("staging", "Staging"),
    ("preprod", "Preprod"),
    ("production", "Production"),
];

/// Flat key/value parameters as supplied by a CMS host at install time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct InstallationParameters(pub BTreeMap<String, serde_json::Value>);

impl InstallationParameters {
    /// String form of a parameter. Numbers (project ids) are accepted too.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn require(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingParameter(key.to_string()))
    }

    /// Per-URL keys (`gitlabPipeline<Env>`) win over the shared form keys.
    /// An environment with neither a pipeline URL nor a ref is not configured.
    fn environment(
        &self,
        name: &str,
        suffix: &str,
    ) -> Result<Option<EnvironmentConfig>, ConfigError> {
        let badge_key = format!("gitlabBadgeUrl{suffix}");
        let target = if let Some(url) = self.get(&format!("gitlabPipeline{suffix}")) {
            TriggerTarget::Url { url }
        } else if let Some(git_ref) = self.get(&format!("gitlabPipelineRef{suffix}")) {
            TriggerTarget::Form {
                base_url: self.require("gitlabBaseUrl")?,
                project_id: self.require("gitlabProjectId")?,
                token: self.require("gitlabPipelineTriggerToken")?,
                git_ref,
                variables: Some(
                    self.get("gitlabPipelineVariables")
                        .unwrap_or_else(|| LEGACY_DEFAULT_VARIABLES.to_string()),
                ),
            }
        } else {
            return Ok(None);
        };
        Ok(Some(EnvironmentConfig {
            name: name.to_string(),
            label: format!("{suffix} environment"),
            badge_url: self.require(&badge_key)?,
            target,
        }))
    }
}
