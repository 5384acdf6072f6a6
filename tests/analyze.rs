use pretty_assertions::assert_eq;
use robomigrate::{
    classify, complexity, complexity::ComplexityThresholds, deps, model::DifficultyRank, parser,
};

fn fixture() -> String {
    std::fs::read_to_string("fixtures/order_entry.robot").unwrap()
}

#[test]
fn dependency_mapping_finds_connections_paths_and_urls() {
    let doc = parser::parse_str(&fixture(), "order_entry").unwrap();
    let doc = deps::map_dependencies(doc);

    assert_eq!(doc.external_connections.len(), 1);
    assert!(doc.external_connections[0].starts_with("Open portal.url:"));
    assert!(doc
        .file_paths
        .contains(&r"C:\data\out.xlsx".to_string()));
    assert_eq!(
        doc.api_calls,
        vec!["https://portal.example.com/login".to_string()]
    );
    assert!(doc.dependencies.contains(&"Sub_Login.robot".to_string()));
}

#[test]
fn fixture_complexity_score_and_rank() {
    let doc = parser::parse_str(&fixture(), "order_entry").unwrap();
    let doc = deps::map_dependencies(doc);
    let score = complexity::analyze(&doc, &ComplexityThresholds::default());

    assert_eq!(score.step_count, 8);
    assert_eq!(score.branch_depth, 1);
    assert_eq!(score.loop_depth, 1);
    assert_eq!(score.external_deps, 2);
    assert_eq!(score.risk_flags, vec!["ocrRead: Read scanned total".to_string()]);
    // 8*1 + 1*5 + 1*5 + 2*3 + 1*10
    assert_eq!(score.total_score, 34.0);
    assert_eq!(score.rank, DifficultyRank::C);
}

#[test]
fn fixture_classification_applies_risk_penalty() {
    let doc = parser::parse_str(&fixture(), "order_entry").unwrap();
    let doc = deps::map_dependencies(doc);
    let score = complexity::analyze(&doc, &ComplexityThresholds::default());
    let assessment = classify::classify(doc, score);

    assert!((assessment.auto_convertible_rate - 0.40).abs() < 1e-9);
    assert!((assessment.estimated_hours - 10.0).abs() < 1e-9);
    // 1 risk flag + 1 connection + 1 sub-workflow + 3 boilerplate entries.
    assert_eq!(assessment.manual_items.len(), 6);
    assert!(assessment.manual_items[0].starts_with("[manual] ocrRead:"));
    assert_eq!(assessment.priority, 0);
}

#[test]
fn empty_document_is_rank_a_with_boilerplate_manual_items() {
    let doc = parser::parse_str("<robot/>", "empty").unwrap();
    let doc = deps::map_dependencies(doc);
    let score = complexity::analyze(&doc, &ComplexityThresholds::default());
    assert_eq!(score.step_count, 0);
    assert_eq!(score.total_score, 0.0);
    assert_eq!(score.rank, DifficultyRank::A);

    let assessment = classify::classify(doc, score);
    assert!((assessment.auto_convertible_rate - 0.90).abs() < 1e-9);
    assert_eq!(assessment.manual_items.len(), 3);
}

#[test]
fn ocr_inside_conditional_inside_loop_ranks_b() {
    let xml = r#"<robot>
        <forEach name="Rows">
            <if name="Check">
                <ocrRead name="Scan"/>
            </if>
        </forEach>
    </robot>"#;
    let doc = parser::parse_str(xml, "nested").unwrap();
    let doc = deps::map_dependencies(doc);
    let score = complexity::analyze(&doc, &ComplexityThresholds::default());

    assert_eq!(score.step_count, 3);
    assert_eq!(score.branch_depth, 1);
    assert_eq!(score.loop_depth, 1);
    assert_eq!(score.risk_flags.len(), 1);
    // 3*1 + 1*5 + 1*5 + 0*3 + 1*10
    assert_eq!(score.total_score, 23.0);
    assert_eq!(score.rank, DifficultyRank::B);
}
