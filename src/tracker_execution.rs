use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tracing::{debug, error, info, warn};

use anyhow::{anyhow, Result};
use chrono::Utc;

use crate::common::write_string_to_file;
use crate::export::{to_json, to_prompt};
use crate::services::{
    GeneratedPrompt, ItemStore, JsonFileStore, PromptGenerator, TemplatePromptGenerator,
};
use crate::snapshot;
use crate::tracker::{ArtifactType, TrackerPlan};

/// Execute a tracker plan: load the stored record, rebuild the live tree,
/// render the configured artifacts, and generate the tracking prompt. With
/// `watch`, stay up and regenerate whenever the stored record changes.
pub async fn execute_tracker(plan: String, watch: bool) -> Result<()> {
    info!("Executing tracker plan {}", plan);

    let plan_file_path = Path::new(&plan).to_path_buf();
    let path_content = std::fs::read_to_string(&plan_file_path)?;
    let plan: TrackerPlan = serde_yaml::from_str(&path_content)?;

    debug!("Executing tracker plan: {:?}", plan);

    let plan_dir = plan_file_path
        .parent()
        .ok_or_else(|| anyhow!("Plan file has no parent directory"))?
        .to_path_buf();

    let store = JsonFileStore::new(plan_dir.join(&plan.item.store_dir));
    let generator = match &plan.prompt.template {
        Some(template_path) => {
            let template = std::fs::read_to_string(plan_dir.join(template_path))?;
            TemplatePromptGenerator::with_template(template)
        }
        None => TemplatePromptGenerator::new(),
    };

    run_tracker(&plan, &store, &generator, &plan_dir).await?;

    if watch {
        watch_for_changes(&plan, &store, &generator, &plan_dir).await?;
    }

    Ok(())
}

/// One regeneration pass. All graph work is a synchronous in-memory walk;
/// only the collaborator hand-offs are awaited.
pub async fn run_tracker(
    plan: &TrackerPlan,
    store: &dyn ItemStore,
    generator: &dyn PromptGenerator,
    plan_dir: &Path,
) -> Result<()> {
    let record = store
        .get_item(&plan.item.id)
        .await?
        .ok_or_else(|| anyhow!("Item '{}' not found in store", plan.item.id))?;

    let editor = snapshot::hydrate(&record);
    if let Err(errors) = editor.graph().verify_integrity() {
        warn!("Identified {} graph integrity error(s)", errors.len());
        errors.iter().for_each(|e| warn!("{}", e));
    }

    let exported = snapshot::export_item(editor.graph(), &record);
    info!(
        "Tree rebuilt for '{}': {}",
        plan.item.id,
        editor.graph().stats()
    );

    for profile in &plan.outputs {
        info!(
            "Rendering artifact {:?} to {}",
            profile.artifact, profile.filename
        );
        let output = match &profile.artifact {
            ArtifactType::Json => {
                to_json::render(&exported).map_err(|e| anyhow!("JSON artifact failed: {}", e))
            }
            ArtifactType::Hierarchy => serde_json::to_string_pretty(&exported.sub_products)
                .map_err(|e| anyhow!("Hierarchy artifact failed: {}", e)),
            ArtifactType::Prompt => generator
                .generate(&exported, &plan.item.entity_type)
                .await
                .map_err(|e| anyhow!("Prompt artifact failed: {}", e)),
        };

        match output {
            Ok(output) => {
                let target = plan_dir.join(&profile.filename);
                if let Err(e) = write_string_to_file(&target.to_string_lossy(), &output) {
                    error!("Failed to write to file {}: {}", profile.filename, e);
                }
            }
            Err(e) => {
                error!("Failed to render {}: {}", profile.filename, e);
            }
        }
    }

    // The generation hand-off is awaited so the caller only reports success
    // once a prompt actually exists; its failure is surfaced, not swallowed.
    if plan.prompt.persist {
        let prompt_content = generator
            .generate(&exported, &plan.item.entity_type)
            .await?;
        let prompt = GeneratedPrompt {
            item_id: plan.item.id.clone(),
            config_id: plan.prompt.config_id.clone(),
            prompt_content,
            source_data_snapshot: serde_json::to_value(&exported)?,
            created_at: Utc::now(),
        };
        store.save_prompt(&prompt).await?;
    }

    Ok(())
}

/// Watch the stored item record and regenerate on every modification.
///
/// The watcher callback and the regeneration passes are funneled through a
/// single queue, so an external change can never interleave with a pass
/// already in flight; a superseding change simply produces a newer
/// generation (last write wins).
async fn watch_for_changes(
    plan: &TrackerPlan,
    store: &JsonFileStore,
    generator: &TemplatePromptGenerator,
    plan_dir: &Path,
) -> Result<()> {
    let item_file = store.item_path(&plan.item.id);
    info!("Watching {} for changes", item_file.display());

    let (tx, mut rx) = tokio::sync::mpsc::channel(16);
    let mut watcher = RecommendedWatcher::new(
        move |event| {
            let _ = tx.blocking_send(event);
        },
        Config::default(),
    )?;
    watcher.watch(&item_file, RecursiveMode::NonRecursive)?;

    while let Some(event) = rx.recv().await {
        match event {
            Ok(event) => {
                if let EventKind::Modify(_) = event.kind {
                    debug!("File modified {:?}", event.paths);
                    info!("Change detected, regenerating");
                    if let Err(e) = run_tracker(plan, store, generator, plan_dir).await {
                        error!("Regeneration failed: {}", e);
                    }
                }
            }
            Err(e) => error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}
