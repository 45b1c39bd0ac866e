use crate::snapshot::ItemRecord;
use std::error::Error;

/// Render the full item document: record fields, the restorable snapshot,
/// and the derived hierarchy in one JSON artifact.
pub fn render(record: &ItemRecord) -> Result<String, Box<dyn Error>> {
    use serde_json::json;

    let res = json!({
        "type": record.entity_type,
        "name": record.name,
        "link": record.link,
        "description": record.description,
        "stakeholders": record.stakeholders,
        "details": record.details,
        "tree_data": record.tree_data,
        "sub_products": record.sub_products,
    });
    Ok(serde_json::to_string_pretty(&res)?)
}
