use pretty_assertions::assert_eq;
use robomigrate::{error::MigrateError, parser};
use std::io::Write;

fn fixture() -> String {
    std::fs::read_to_string("fixtures/order_entry.robot").unwrap()
}

#[test]
fn parses_fixture_structure() {
    let doc = parser::parse_str(&fixture(), "order_entry").unwrap();

    let types: Vec<&str> = doc.actions.iter().map(|a| a.action_type.as_str()).collect();
    assert_eq!(
        types,
        vec!["openBrowser", "typeInto", "if", "ocrRead", "executeRobot"]
    );

    let cond = &doc.actions[2];
    assert_eq!(cond.name, "Has rows");
    assert_eq!(cond.children.len(), 1);
    assert_eq!(cond.children[0].action_type, "forEach");
    assert_eq!(cond.children[0].children.len(), 2);
    assert!(cond.properties.contains_key("condition"));
    assert!(cond.line > 0);
}

#[test]
fn extracts_variables_and_sub_workflow_references() {
    let doc = parser::parse_str(&fixture(), "order_entry").unwrap();

    assert_eq!(doc.variables.len(), 2);
    assert_eq!(doc.variables[0].name, "strCustomer");
    assert_eq!(doc.variables[0].declared_type, "String");
    assert_eq!(doc.variables[0].default_value.as_deref(), Some("acme"));
    assert_eq!(doc.variables[1].default_value, None);
    assert_eq!(doc.variables[1].scope, "workflow");

    assert_eq!(doc.sub_workflows, vec!["Sub_Login.robot".to_string()]);
}

#[test]
fn actions_under_non_action_wrappers_surface_as_flat_top_level() {
    let xml = r#"<robot>
        <group>
            <click name="First"/>
            <click name="Second"/>
        </group>
        <if name="Cond">
            <annotation>
                <log name="Stray log"/>
            </annotation>
            <click name="Nested"/>
        </if>
    </robot>"#;
    let doc = parser::parse_str(xml, "wrappers").unwrap();

    let names: Vec<&str> = doc.actions.iter().map(|a| a.name.as_str()).collect();
    // Wrapper children flatten out; the action under the annotation wrapper
    // is discovered exactly once, as a top-level stray.
    assert_eq!(names, vec!["First", "Second", "Cond", "Stray log"]);
    let cond = &doc.actions[2];
    assert_eq!(cond.children.len(), 1);
    assert_eq!(cond.children[0].name, "Nested");
}

#[test]
fn text_content_becomes_synthetic_property() {
    let xml = r#"<robot><log name="Note">starting run</log></robot>"#;
    let doc = parser::parse_str(xml, "text").unwrap();
    assert_eq!(doc.actions[0].properties["_text"], "starting run");
}

#[test]
fn namespaced_tags_are_recognized() {
    let xml = r#"<r:robot xmlns:r="http://www.kapowtech.com/robot">
        <r:click name="Go"/>
    </r:robot>"#;
    let doc = parser::parse_str(xml, "ns").unwrap();
    assert_eq!(doc.actions.len(), 1);
    assert_eq!(doc.actions[0].action_type, "click");
}

#[test]
fn malformed_markup_is_a_parse_error() {
    let err = parser::parse_str("<robot><click></robot>", "bad").unwrap_err();
    assert!(matches!(err, MigrateError::Xml { .. }));
}

#[test]
fn unsupported_extension_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    writeln!(file, "<robot/>").unwrap();
    let err = parser::parse_path(file.path()).unwrap_err();
    assert!(matches!(err, MigrateError::UnsupportedFormat { extension } if extension == "txt"));
}
