use async_trait::async_trait;
use tracing::debug;

use super::{CommandGenerator, GenerationContext};
use crate::command::Command;
use crate::errors::Result;
use crate::prompt;

/// Keyword interpreter behind the generator interface
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalGenerator;

impl LocalGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandGenerator for LocalGenerator {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate(&self, prompt: &str, context: &GenerationContext) -> Result<Vec<Command>> {
        debug!(user_id = context.user_id, "Generating locally");
        Ok(prompt::interpret(prompt))
    }
}
