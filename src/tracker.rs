use serde::{Deserialize, Serialize};

/// ## Structure
/// This module contains the data structures for the tracker plan file.
///
/// ```text
/// TrackerPlan
///   ├── meta: Option<PlanMeta>
///   │   └── name: Option<String>
///   ├── item: ItemRef
///   │   ├── id: String
///   │   ├── store_dir: String
///   │   └── entity_type: String
///   ├── prompt: PromptConfig
///   │   ├── template: Option<String>
///   │   ├── config_id: String
///   │   └── persist: bool
///   └── outputs: Vec<OutputProfile>
///       ├── filename: String
///       └── artifact: ArtifactType
///           ├── Json
///           ├── Hierarchy
///           └── Prompt
/// ```

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TrackerPlan {
    #[serde(default)]
    pub meta: Option<PlanMeta>,
    #[serde(default)]
    pub item: ItemRef,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub outputs: Vec<OutputProfile>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PlanMeta {
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ItemRef {
    pub id: String,
    #[serde(default = "default_store_dir")]
    pub store_dir: String,
    #[serde(default = "default_entity_type")]
    pub entity_type: String,
}

impl Default for ItemRef {
    fn default() -> Self {
        Self {
            id: "my-product".to_string(),
            store_dir: default_store_dir(),
            entity_type: default_entity_type(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PromptConfig {
    /// Path to a custom instruction template, relative to the plan file.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default = "default_config_id")]
    pub config_id: String,
    /// Persist each generated prompt next to the item record.
    #[serde(default = "default_true")]
    pub persist: bool,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: None,
            config_id: default_config_id(),
            persist: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OutputProfile {
    pub filename: String,
    pub artifact: ArtifactType,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ArtifactType {
    /// The full item document: record, snapshot, hierarchy.
    Json,
    /// Only the derived sub-product hierarchy.
    Hierarchy,
    /// The rendered tracking prompt.
    Prompt,
}

fn default_store_dir() -> String {
    "store".to_string()
}

fn default_entity_type() -> String {
    "Product".to_string()
}

fn default_config_id() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}
