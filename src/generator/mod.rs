//! Command generators
//!
//! A generator turns a prompt into a command sequence. The built-in
//! [`LocalGenerator`] never fails; [`RemoteGenerator`] asks an HTTP drawing
//! service and surfaces its failures to the caller, which decides whether to
//! fall back.

mod local;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;

use crate::command::Command;
use crate::config::{DrawbotConfig, GeneratorKind};
use crate::errors::Result;

pub use local::LocalGenerator;
pub use remote::{parse_generation_response, GenerateDrawingRequest, RemoteGenerator};

/// Longest prompt prefix used in a default title
const TITLE_PROMPT_CHARS: usize = 50;

/// Caller details sent along with a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    pub user_id: u64,
    pub title: String,
}

impl GenerationContext {
    pub fn new(user_id: u64, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
        }
    }

    /// Context with the default title derived from `prompt`
    pub fn for_prompt(user_id: u64, prompt: &str) -> Self {
        Self::new(user_id, default_title(prompt))
    }
}

/// `"Drawing: "` plus the first 50 characters of the prompt, with `...`
/// when it was cut.
pub fn default_title(prompt: &str) -> String {
    let head: String = prompt.chars().take(TITLE_PROMPT_CHARS).collect();
    if prompt.chars().count() > TITLE_PROMPT_CHARS {
        format!("Drawing: {head}...")
    } else {
        format!("Drawing: {head}")
    }
}

#[async_trait]
pub trait CommandGenerator: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, context: &GenerationContext) -> Result<Vec<Command>>;
}

/// Build the generator selected by `config`
pub fn from_config(config: &DrawbotConfig) -> Result<Arc<dyn CommandGenerator>> {
    match config.generator {
        GeneratorKind::Local => Ok(Arc::new(LocalGenerator::new())),
        GeneratorKind::Remote => Ok(Arc::new(RemoteGenerator::new(config.remote.clone())?)),
    }
}
