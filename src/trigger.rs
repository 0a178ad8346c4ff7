//! Building the pipeline trigger request for an environment.

use crate::config::{parse_variables, EnvironmentConfig, TriggerTarget};
use crate::error::ConfigError;

/// A ready-to-send `POST`. `form: None` means the request has no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest {
    pub environment: String,
    pub url: String,
    pub form: Option<Vec<(String, String)>>,
}

impl TriggerRequest {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .as_ref()?
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

pub fn build_request(env: &EnvironmentConfig) -> Result<TriggerRequest, ConfigError> {
    match &env.target {
        TriggerTarget::Url { url } => Ok(TriggerRequest {
            environment: env.name.clone(),
            url: url.clone(),
            form: None,
        }),
        TriggerTarget::Form {
            base_url,
            project_id,
            token,
            git_ref,
            variables,
        } => {
            let mut form = vec![
                ("ref".to_string(), git_ref.clone()),
                ("token".to_string(), token.clone()),
            ];
            if let Some(raw) = variables {
                for (name, value) in parse_variables(raw)? {
                    form.push((format!("variables[{name}]"), value));
                }
            }
            Ok(TriggerRequest {
                environment: env.name.clone(),
                url: format!(
                    "{}/projects/{}/trigger/pipeline",
                    base_url.trim_end_matches('/'),
                    project_id
                ),
                form: Some(form),
            })
        }
    }
}
