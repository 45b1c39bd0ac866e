use prodscope::editor::TreeEditor;
use prodscope::graph::{FieldPatch, Position, ROOT_ID};
use prodscope::services::{ItemStore, JsonFileStore, PromptGenerator, TemplatePromptGenerator};
use prodscope::snapshot::{export_item, hydrate, ItemRecord};
use prodscope::tracker::{ArtifactType, OutputProfile, TrackerPlan};
use prodscope::tracker_execution::run_tracker;
use prodscope::zone::Tier;

/// Start with only the root, grow a two-level tree, export: the nested
/// hierarchy has the expected shape and the snapshot carries two edges.
#[test]
fn grow_and_export_two_levels() {
    let mut editor = TreeEditor::new();
    assert_eq!(editor.graph().node_count(), 1);

    let child = editor.add_child(ROOT_ID).unwrap();
    let child_node = editor.graph().get_node(&child).unwrap();
    assert_eq!(child_node.tier(), Tier::Branch);
    assert!(!editor.graph().parent_edge(&child).unwrap().invalid);

    let grandchild = editor.add_child(&child).unwrap();
    assert_eq!(
        editor.graph().get_node(&grandchild).unwrap().tier(),
        Tier::Leaf
    );

    let record = export_item(editor.graph(), &ItemRecord::default());
    assert_eq!(record.name, "");
    assert_eq!(record.sub_products.len(), 1);
    assert_eq!(record.sub_products[0].children.len(), 1);
    assert!(record.sub_products[0].children[0].children.is_empty());
    assert_eq!(record.tree_data.unwrap().edges.len(), 2);
}

/// Sibling creation on the root is rejected and nothing mutates.
#[test]
fn root_sibling_rejected() {
    let mut editor = TreeEditor::new();
    editor.add_child(ROOT_ID).unwrap();
    let nodes = editor.graph().node_count();
    let edges = editor.graph().edge_count();

    assert!(editor.add_sibling(ROOT_ID).is_err());
    assert_eq!(editor.graph().node_count(), nodes);
    assert_eq!(editor.graph().edge_count(), edges);
}

/// Deleting a mid-tree node detaches the subtree below it; the descendant
/// records survive but drop out of the exported hierarchy.
#[test]
fn delete_detaches_but_keeps_descendants() {
    let mut editor = TreeEditor::new();
    let branch = editor.add_child(ROOT_ID).unwrap();
    let leaf = editor.add_child(&branch).unwrap();

    assert!(editor.delete_node(&branch));
    assert!(editor.graph().get_node(&leaf).is_some());
    assert!(editor.graph().parent_edge(&leaf).is_none());

    let record = export_item(editor.graph(), &ItemRecord::default());
    assert!(record.sub_products.is_empty());
    assert_eq!(record.tree_data.unwrap().nodes.len(), 2);
}

/// Dragging a child above its parent flags the edge; dragging back clears
/// it. Export before and after is unaffected by the transient flag.
#[test]
fn drag_feedback_is_transient() {
    let mut editor = TreeEditor::new();
    let child = editor.add_child(ROOT_ID).unwrap();

    assert_eq!(editor.move_node(&child, Position::new(0.0, 60.0)), Some(true));
    assert_eq!(editor.move_node(&child, Position::new(0.0, 65.0)), None);
    assert_eq!(
        editor.move_node(&child, Position::new(0.0, 350.0)),
        Some(false)
    );

    let record = export_item(editor.graph(), &ItemRecord::default());
    let json = serde_json::to_string(&record).unwrap();
    assert!(!json.contains("invalid"));
}

/// Full persistence loop: edit, export, save, reload, hydrate, re-export.
/// The second export matches the first (round-trip idempotence) and the
/// generated prompt reflects the edited names.
#[tokio::test]
async fn store_and_prompt_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    let mut editor = TreeEditor::new();
    editor.edit_fields(ROOT_ID, FieldPatch::name("Project Apollo"));
    let child = editor.add_child(ROOT_ID).unwrap();
    editor.edit_fields(&child, FieldPatch::name("Apollo API"));

    let base = ItemRecord {
        entity_type: "Product".to_string(),
        stakeholders: "Jane Doe (PM)".to_string(),
        ..ItemRecord::default()
    };
    let exported = export_item(editor.graph(), &base);
    store.save_item("apollo", &exported).await.unwrap();

    let loaded = store.get_item("apollo").await.unwrap().unwrap();
    let restored = hydrate(&loaded);
    let re_exported = export_item(restored.graph(), &loaded);
    assert_eq!(exported.name, re_exported.name);
    assert_eq!(exported.sub_products, re_exported.sub_products);

    let generator = TemplatePromptGenerator::new();
    let prompt = generator.generate(&re_exported, "Product").await.unwrap();
    assert!(prompt.contains("Project Apollo"));
    assert!(prompt.contains("Apollo API"));
    assert!(prompt.contains("Jane Doe (PM)"));
}

/// A tracker pass renders the configured artifacts into the plan directory
/// and persists a generated prompt beside the record.
#[tokio::test]
async fn tracker_pass_renders_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("store"));

    let mut editor = TreeEditor::new();
    editor.edit_fields(ROOT_ID, FieldPatch::name("Project Apollo"));
    editor.add_child(ROOT_ID).unwrap();
    let record = export_item(editor.graph(), &ItemRecord::default());
    store.save_item("apollo", &record).await.unwrap();

    let plan: TrackerPlan = serde_yaml::from_str(
        r#"
item:
  id: apollo
  store_dir: store
"#,
    )
    .unwrap();
    let plan = TrackerPlan {
        outputs: vec![
            OutputProfile {
                filename: "out/item.json".to_string(),
                artifact: ArtifactType::Json,
            },
            OutputProfile {
                filename: "out/prompt.txt".to_string(),
                artifact: ArtifactType::Prompt,
            },
        ],
        ..plan
    };

    let generator = TemplatePromptGenerator::new();
    run_tracker(&plan, &store, &generator, dir.path())
        .await
        .unwrap();

    let item_out = std::fs::read_to_string(dir.path().join("out/item.json")).unwrap();
    assert!(item_out.contains("Project Apollo"));
    let prompt_out = std::fs::read_to_string(dir.path().join("out/prompt.txt")).unwrap();
    assert!(prompt_out.contains("Project Apollo"));

    let prompts: Vec<_> = std::fs::read_dir(dir.path().join("store/prompts"))
        .unwrap()
        .collect();
    assert_eq!(prompts.len(), 1);
}

/// A missing item is a surfaced error, not a panic or a silent pass.
#[tokio::test]
async fn tracker_surfaces_missing_item() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let plan = TrackerPlan::default();
    let generator = TemplatePromptGenerator::new();

    let err = run_tracker(&plan, &store, &generator, dir.path())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}
