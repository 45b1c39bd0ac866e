pub mod to_json;
pub mod to_prompt;

/// Shared context assembly used by the renderers.
pub mod renderer {
    use crate::snapshot::ItemRecord;
    use serde_json::{json, Value};

    fn or_placeholder(value: &str, placeholder: &str) -> Value {
        if value.is_empty() {
            json!(placeholder)
        } else {
            json!(value)
        }
    }

    /// The flattened item context handed to prompt templates: the tracked
    /// entity's fields with readable placeholders for anything unset, plus
    /// the strategy details and the nested product structure.
    pub fn create_item_context(record: &ItemRecord) -> Value {
        json!({
            "type": record.entity_type,
            "name": record.name,
            "description": or_placeholder(&record.description, "No description provided."),
            "link": or_placeholder(&record.link, "No link provided."),
            "stakeholders": or_placeholder(&record.stakeholders, "None listed"),
            "strategic_details": record.details,
            "product_structure": record.sub_products,
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn placeholders_fill_empty_fields() {
            let record = ItemRecord {
                name: "Apollo".to_string(),
                ..ItemRecord::default()
            };
            let context = create_item_context(&record);
            assert_eq!(context["name"], "Apollo");
            assert_eq!(context["description"], "No description provided.");
            assert_eq!(context["link"], "No link provided.");
            assert_eq!(context["stakeholders"], "None listed");
        }
    }
}
