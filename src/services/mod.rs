pub mod item_store;
pub mod prompt_service;

pub use item_store::{GeneratedPrompt, ItemStore, JsonFileStore};
pub use prompt_service::{PromptGenerator, TemplatePromptGenerator};
