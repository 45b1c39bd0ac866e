use async_trait::async_trait;
use tracing::debug;

use crate::errors::PromptError;
use crate::export::to_prompt;
use crate::snapshot::ItemRecord;

/// The generation collaborator boundary. Implementations turn a serialized
/// item into a single text block. Failures propagate to the caller, which
/// surfaces them; the in-memory tree is never rolled back on a failed
/// generation.
#[async_trait]
pub trait PromptGenerator: Send + Sync {
    async fn generate(
        &self,
        record: &ItemRecord,
        entity_type: &str,
    ) -> Result<String, PromptError>;
}

/// Offline generator: renders the prompt-engineering instruction through
/// handlebars. A remote LLM client would implement [`PromptGenerator`] and
/// send this instruction instead of returning it.
#[derive(Default)]
pub struct TemplatePromptGenerator {
    template: Option<String>,
}

impl TemplatePromptGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
        }
    }
}

#[async_trait]
impl PromptGenerator for TemplatePromptGenerator {
    async fn generate(
        &self,
        record: &ItemRecord,
        entity_type: &str,
    ) -> Result<String, PromptError> {
        debug!("Rendering tracking prompt for {:?} '{}'", entity_type, record.name);
        Ok(to_prompt::render(
            record,
            entity_type,
            self.template.as_deref(),
        )?)
    }
}
