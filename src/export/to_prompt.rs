use handlebars::RenderError;
use serde_json::json;

use crate::export::renderer;
use crate::snapshot::ItemRecord;

/// Default prompt-engineering instruction. The rendered block is what gets
/// sent to the generation collaborator; its output is the system prompt the
/// user pastes into their high-level assistant.
const DEFAULT_TEMPLATE: &str = r#"You are an expert AI prompt engineer. Your task is to generate a highly effective System Prompt for a High-Level LLM.

The High-Level LLM will be used by a user to manage and track the following {{entity_type}} daily.
Your output must be ONLY the System Prompt text, ready to be pasted into the High-Level LLM's configuration.

DATA CONTEXT:
{{{context}}}

REQUIREMENTS FOR THE GENERATED SYSTEM PROMPT:
1. Role: define the AI as an expert analyst for this specific domain.
2. Context: Include key details from the data structure (Name, Description, Stakeholders, Strategy).
3. Objective: The AI should search the web daily for news, competitor updates, and market shifts relevant to this entity.
4. Structure: The output prompt should be structured with "Role", "Context", "Daily Instructions", and "Output Format".
5. Tone: Professional, strategic, and actionable.

Generate the System Prompt now.
"#;

pub fn get_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

/// Render the instruction block for an item. `template` overrides the
/// default instruction; the item context is flattened to pretty JSON so the
/// template only ever deals with one `{{context}}` blob plus the entity
/// type.
pub fn render(
    record: &ItemRecord,
    entity_type: &str,
    template: Option<&str>,
) -> Result<String, RenderError> {
    let handlebars = crate::common::get_handlebars();

    let context = renderer::create_item_context(record);
    let context_json = serde_json::to_string_pretty(&context)
        .map_err(|e| RenderError::new(format!("Item context is not serializable: {}", e)))?;

    handlebars.render_template(
        template.unwrap_or(DEFAULT_TEMPLATE),
        &json!({
            "entity_type": entity_type,
            "context": context_json,
            "item": context,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TreeEditor;
    use crate::graph::{FieldPatch, ROOT_ID};
    use crate::snapshot::export_item;

    fn sample_record() -> ItemRecord {
        let mut editor = TreeEditor::new();
        editor.edit_fields(ROOT_ID, FieldPatch::name("Apollo"));
        let child = editor.add_child(ROOT_ID).unwrap();
        editor.edit_fields(&child, FieldPatch::name("Apollo API"));
        export_item(
            editor.graph(),
            &ItemRecord {
                entity_type: "Product".to_string(),
                stakeholders: "Jane Doe (PM)".to_string(),
                ..ItemRecord::default()
            },
        )
    }

    #[test]
    fn default_template_embeds_context() {
        let record = sample_record();
        let output = render(&record, "Product", None).unwrap();
        assert!(output.contains("track the following Product daily"));
        assert!(output.contains("\"name\": \"Apollo\""));
        assert!(output.contains("Apollo API"));
        assert!(output.contains("Generate the System Prompt now."));
    }

    #[test]
    fn custom_template_sees_item_fields() {
        let record = sample_record();
        let output = render(
            &record,
            "Product",
            Some("Track {{item.name}} for {{item.stakeholders}}"),
        )
        .unwrap();
        assert_eq!(output, "Track Apollo for Jane Doe (PM)");
    }
}
