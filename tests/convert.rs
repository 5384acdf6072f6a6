use pretty_assertions::assert_eq;
use robomigrate::{
    mapping::{MappingConfig, COMMENT_ACTIVITY},
    parser,
    pipeline::Converter,
};

fn fixture_doc() -> robomigrate::model::SourceDocument {
    let xml = std::fs::read_to_string("fixtures/order_entry.robot").unwrap();
    parser::parse_str(&xml, "order_entry").unwrap()
}

fn fixture_mapping() -> MappingConfig {
    MappingConfig::load_from_file("fixtures/action_mapping.json").unwrap()
}

#[test]
fn every_root_ir_node_yields_exactly_one_activity() {
    let doc = fixture_doc();
    let conversion = Converter::new(fixture_mapping()).convert(&doc);

    assert_eq!(conversion.activities.len(), doc.actions.len());
    let placeholders = conversion
        .activities
        .iter()
        .filter(|a| a.activity_type == COMMENT_ACTIVITY)
        .count();
    assert_eq!(placeholders, 1);
}

#[test]
fn fixture_conversion_rate_and_unresolved_items() {
    let conversion = Converter::new(fixture_mapping()).convert(&fixture_doc());

    // 5 root nodes, 1 unresolved type (ocrRead).
    assert!((conversion.conversion_rate - 0.8).abs() < 1e-9);
    assert_eq!(
        conversion.unresolved_items,
        vec!["Unmapped action 'ocrRead' requires manual conversion".to_string()]
    );
}

#[test]
fn matched_rules_rename_properties_and_keep_children() {
    let conversion = Converter::new(fixture_mapping()).convert(&fixture_doc());

    let cond = &conversion.activities[2];
    assert_eq!(cond.activity_type, "AkaBot.Core.Activities.If");
    assert_eq!(cond.display_name, "Has rows");
    assert_eq!(cond.properties["Condition"], "rows > 0");
    assert_eq!(cond.children.len(), 1);

    let each = &cond.children[0];
    assert_eq!(each.activity_type, "AkaBot.Core.Activities.ForEach");
    assert_eq!(each.children.len(), 2);
    assert_eq!(each.children[0].properties["Target.Selector"], ".row");
}

#[test]
fn explicitly_unsupported_action_becomes_noted_placeholder() {
    let conversion = Converter::new(fixture_mapping()).convert(&fixture_doc());

    let placeholder = &conversion.activities[3];
    assert_eq!(placeholder.activity_type, COMMENT_ACTIVITY);
    assert_eq!(placeholder.display_name, "TODO: ocrRead");
    assert_eq!(
        placeholder.properties["Text"],
        "OCR requires the Document Understanding package"
    );
    assert!(placeholder.children.is_empty());
}

#[test]
fn variables_are_translated_with_fallback() {
    let conversion = Converter::new(fixture_mapping()).convert(&fixture_doc());

    assert_eq!(conversion.variables.len(), 2);
    assert_eq!(conversion.variables[0].var_type, "System.String");
    assert_eq!(conversion.variables[0].default_value, "acme");
    assert_eq!(conversion.variables[1].var_type, "System.Int32");
}

#[test]
fn generated_document_is_well_formed_and_nested() {
    let conversion = Converter::new(fixture_mapping()).convert(&fixture_doc());

    let doc = roxmltree::Document::parse(&conversion.document_content).unwrap();
    assert_eq!(doc.root_element().tag_name().name(), "Activity");
    assert!(conversion.document_content.contains("<TypeInto.Target"));
    assert!(conversion.document_content.contains(r#"x:Class="Main""#));

    let manifest: serde_json::Value = serde_json::from_str(&conversion.manifest_content).unwrap();
    assert_eq!(manifest["name"], "PRJ_order_entry");
    assert_eq!(manifest["main"], "Main.xaml");
}

#[test]
fn empty_source_converts_to_zero_rate() {
    let doc = parser::parse_str("<robot/>", "empty").unwrap();
    let conversion = Converter::new(fixture_mapping()).convert(&doc);
    assert_eq!(conversion.conversion_rate, 0.0);
    assert!(conversion.activities.is_empty());
    assert!(conversion.unresolved_items.is_empty());
}

#[test]
fn save_output_writes_artifacts_and_conditional_checklist() {
    let dir = tempfile::tempdir().unwrap();
    let converter = Converter::new(fixture_mapping());
    let conversion = converter.convert(&fixture_doc());
    converter.save_output(&conversion, dir.path()).unwrap();

    let project = dir.path().join("PRJ_order_entry");
    assert!(project.join("Main.xaml").is_file());
    assert!(project.join("project.json").is_file());
    // The fixture has one unresolved action, so the checklist exists.
    let todo = std::fs::read_to_string(project.join("TODO.md")).unwrap();
    assert!(todo.contains("- [ ] 1. Unmapped action 'ocrRead'"));
}
