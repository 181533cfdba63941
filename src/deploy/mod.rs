//! Deployment configuration synthesis.
//!
//! The configuration is produced by a single prompt/response exchange with a
//! [`TextGenerator`]. The answer is expected to be a YAML document; when it
//! is not, a mapping recording the failure and the raw answer is used
//! instead so the caller always has something to write.

mod client;

pub use client::ChatClient;

use minijinja::{Environment, context};
use serde_json::{Value, json};
use std::io;
use thiserror::Error;
use tracing::{debug, warn};

const PROMPT_TEMPLATE: &str = "\
Based on the following documentation:
{{ context }}

Answer the question: what should the config.yaml for the component \
{{ component }} look like if it is built with Bazel?
Reply with the YAML document only.";

/// Message stored under `error` when the answer is not YAML.
pub const UNPARSEABLE_ANSWER: &str = "failed to parse the answer as YAML";

/// Errors returned by a [`TextGenerator`].
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The request could not be completed.
    #[error("request to the text generation service failed")]
    Transport(#[source] Box<ureq::Error>),
    /// The response body could not be read.
    #[error("failed to read the text generation response")]
    Read(#[source] io::Error),
    /// The request or response payload was not the expected JSON.
    #[error("malformed text generation payload")]
    Payload(#[source] serde_json::Error),
    /// The response contained no answer text.
    #[error("the text generation service returned no answer")]
    EmptyAnswer,
}

/// Errors raised while producing a [`DeployConfig`].
#[derive(Debug, Error)]
pub enum DeployError {
    /// The prompt template failed to render.
    #[error("failed to render the deployment prompt")]
    Prompt(#[source] minijinja::Error),
    /// The text generator failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Opaque prompt-to-answer collaborator.
#[cfg_attr(test, mockall::automock)]
pub trait TextGenerator {
    /// Produce an answer for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when no answer can be obtained.
    fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// A generated deployment configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployConfig(Value);

impl DeployConfig {
    /// Interpret a generator answer.
    ///
    /// Surrounding whitespace and one enclosing Markdown code fence are
    /// removed before parsing. An answer that is not valid YAML becomes
    /// `{error: ..., raw: <answer>}`.
    #[must_use]
    pub fn from_answer(answer: &str) -> Self {
        let body = strip_code_fence(answer);
        match serde_saphyr::from_str::<Value>(body) {
            Ok(value) => Self(value),
            Err(err) => {
                warn!(error = %err, "deployment answer is not valid YAML");
                Self(json!({ "error": UNPARSEABLE_ANSWER, "raw": answer.trim() }))
            }
        }
    }

    /// Whether this configuration records an unparseable answer.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.0.get("error").and_then(Value::as_str) == Some(UNPARSEABLE_ANSWER)
            && self.0.get("raw").is_some()
    }

    /// Borrow the configuration tree.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.0
    }

    /// Serialise the configuration as YAML.
    ///
    /// Block-style output is used when it reads back as the same value.
    /// `serde-saphyr` leaves some scalars unquoted (for example strings
    /// containing `": "`), so otherwise the value is written as JSON, which
    /// is also a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialised.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        let block = serde_saphyr::to_string(&self.0)
            .map_err(|err| anyhow::anyhow!("failed to serialise deployment config: {err}"))?;
        if serde_saphyr::from_str::<Value>(&block).is_ok_and(|parsed| parsed == self.0) {
            return Ok(block);
        }
        debug!("block YAML does not read back; writing JSON flow style");
        let mut flow = serde_json::to_string_pretty(&self.0)
            .map_err(|err| anyhow::anyhow!("failed to serialise deployment config: {err}"))?;
        flow.push('\n');
        Ok(flow)
    }
}

/// Render the prompt asking for the configuration of `component`.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_prompt(docs: &str, component: &str) -> Result<String, minijinja::Error> {
    Environment::new().render_str(PROMPT_TEMPLATE, context! { context => docs, component })
}

/// Ask `generator` for the deployment configuration of `component`.
///
/// `docs` is the concatenated documentation used as prompt context.
///
/// # Errors
///
/// Returns [`DeployError`] if the prompt cannot be rendered or the generator
/// fails. An unparseable answer is not an error.
pub fn generate_config(
    generator: &dyn TextGenerator,
    docs: &str,
    component: &str,
) -> Result<DeployConfig, DeployError> {
    let prompt = render_prompt(docs, component).map_err(DeployError::Prompt)?;
    debug!(component, prompt_bytes = prompt.len(), "requesting deployment config");
    let answer = generator.generate(&prompt)?;
    Ok(DeployConfig::from_answer(&answer))
}

fn strip_code_fence(answer: &str) -> &str {
    let trimmed = answer.trim();
    trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, |body| {
            body.split_once('\n').map_or(body, |(_, inner)| inner).trim()
        })
}

#[cfg(test)]
mod tests;
