use notemark_babel::format::Format;
use notemark_babel::formats::JsonFormat;
use notemark_babel::ir::nodes::Block;
use notemark_babel::{parse, serialize, FormatRegistry};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn to_value(markdown: &str) -> Value {
    let text = JsonFormat::compact().serialize(&parse(markdown)).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_block_records_shape() {
    assert_eq!(
        to_value("# Hi\n\n- [x] a\n\n| A |\n| --- |\n| 1 |\n\n```mermaid\ng\n```"),
        json!({
            "blocks": [
                {"type": "heading", "data": {
                    "level": 1,
                    "content": [{"type": "text", "value": "Hi"}]
                }},
                {"type": "list", "data": {
                    "style": "checklist",
                    "items": [{
                        "content": [{"type": "text", "value": "a"}],
                        "checked": true
                    }]
                }},
                {"type": "table", "data": {
                    "with_headings": true,
                    "content": [["A"], ["1"]]
                }},
                {"type": "diagram", "data": {"source": "g"}}
            ]
        })
    );
}

#[test]
fn test_markdown_json_markdown() {
    let md = include_str!("../markdown/fixtures/kitchensink.md");
    let registry = FormatRegistry::default();
    let json = registry.serialize(&parse(md), "json").unwrap();
    let doc = registry.parse(&json, "json").unwrap();
    assert_eq!(serialize(&doc), md);
}

#[test]
fn test_ids_are_preserved() {
    let source = json!({
        "blocks": [
            {"id": "a1", "type": "paragraph", "data": {"content": [{"type": "text", "value": "x"}]}},
            {"id": "a2", "type": "thematic_break", "data": {}}
        ]
    })
    .to_string();
    let doc = JsonFormat::compact().parse(&source).unwrap();
    let ids: Vec<Option<&str>> = doc.blocks.iter().map(|r| r.id.as_deref()).collect();
    assert_eq!(ids, vec![Some("a1"), Some("a2")]);
}

#[test]
fn test_mismatched_payload_becomes_unknown() {
    let source = r#"{"blocks":[{"type":"heading","data":{"level":"high"}}]}"#;
    let doc = JsonFormat::compact().parse(source).unwrap();
    match &doc.blocks[0].block {
        Block::Unknown(unknown) => {
            assert_eq!(unknown.kind, "heading");
            assert_eq!(unknown.data, json!({"level": "high"}));
        }
        other => panic!("expected unknown block, got {other:?}"),
    }
}
