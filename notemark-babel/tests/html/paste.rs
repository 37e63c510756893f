use insta::assert_snapshot;
use notemark_babel::format::Format;
use notemark_babel::formats::html::{html_to_blocks, HtmlFormat};
use notemark_babel::ir::inline::{Inline, LinkedRef, RichText};
use notemark_babel::ir::nodes::Block;
use notemark_babel::{html_to_markdown, parse, serialize, CodecOptions};
use pretty_assertions::assert_eq;

const CLIPBOARD: &str = r#"<html><head><style>p { color: red }</style></head><body>
<h2>Meeting <em>notes</em></h2>
<p>Discussed the <a href="https://example.com/plan">plan</a> and
   <a data-link-target="people/ana">Ana</a>'s update.</p>
<ul>
  <li><input type="checkbox" checked> book room</li>
  <li><input type="checkbox"> send <strong>agenda</strong>
    <ul><li><input type="checkbox"> draft</li></ul>
  </li>
</ul>
<blockquote><p>Quoted line</p></blockquote>
<table>
  <thead><tr><th>Who</th><th>What</th></tr></thead>
  <tbody><tr><td>Ana</td><td>slides</td></tr></tbody>
</table>
<pre><code class="language-sh">make test
</code></pre>
<script>steal()</script>
</body></html>"#;

#[test]
fn test_clipboard_document() {
    assert_snapshot!(html_to_markdown(CLIPBOARD), @r"
    ## Meeting *notes*

    Discussed the [plan](https://example.com/plan) and [[people/ana|Ana]]'s update.

    - [x] book room
    - [ ] send **agenda**
      - [ ] draft

    > Quoted line

    | Who | What |
    | --- | --- |
    | Ana | slides |

    ```sh
    make test
    ```
    ");
}

#[test]
fn test_paste_output_is_canonical() {
    let md = html_to_markdown(CLIPBOARD);
    assert_eq!(serialize(&parse(&md)), md);
}

#[test]
fn test_unsafe_paste_containment() {
    for href in [
        "javascript:alert(1)",
        "JAVASCRIPT:alert(1)",
        " javascript:alert(1)",
        "data:text/html,<script>x</script>",
        "file:///etc/passwd",
        "vbscript:msgbox",
        "/relative/path",
        "",
    ] {
        let html = format!(r#"<p><a href="{href}">label</a></p>"#);
        let md = html_to_markdown(&html);
        assert_eq!(md, "\\[label\\]\n", "{href:?}");
        let links: Vec<Inline> = parse(&md)
            .iter_blocks()
            .filter_map(|block| match block {
                Block::Paragraph(p) => Some(p.content.0.clone()),
                _ => None,
            })
            .flatten()
            .filter(|node| matches!(node, Inline::Link { .. }))
            .collect();
        assert!(links.is_empty(), "{href:?}");
    }
}

#[test]
fn test_anchor_without_href_keeps_text() {
    assert_eq!(html_to_markdown(r#"<p><a name="top">Top</a></p>"#), "Top\n");
}

#[test]
fn test_linked_reference_markup_maps_back() {
    let content = RichText::new(vec![
        Inline::Text("see ".into()),
        Inline::LinkedRef(LinkedRef::new("Roadmap#Q3", Some("Q3 plan".into()))),
    ]);
    let html = format!("<p>{}</p>", content.to_html());
    let blocks = html_to_blocks(&html, &CodecOptions::default());
    assert_eq!(blocks, vec![Block::paragraph(content)]);
}

#[test]
fn test_editor_markup_round_trips_through_html() {
    let content = RichText::new(vec![
        Inline::Bold(vec![Inline::Text("a < b".into())]),
        Inline::Text(" & ".into()),
        Inline::Italic(vec![Inline::Text("c".into())]),
        Inline::Text(" ".into()),
        Inline::Strike(vec![Inline::Text("d".into())]),
        Inline::Text(" ".into()),
        Inline::Code("e".into()),
        Inline::Text(" ".into()),
        Inline::Link {
            href: "https://example.com/?q=1&r=2".into(),
            children: vec![Inline::Text("f".into())],
        },
    ]);
    let html = format!("<p>{}</p>", content.to_html());
    let blocks = html_to_blocks(&html, &CodecOptions::default());
    assert_eq!(blocks, vec![Block::paragraph(content)]);
}

#[test]
fn test_html_format_parses_to_blocks() {
    let doc = HtmlFormat::default()
        .parse("<ol><li>one</li><li>two</li></ol><hr><p>end</p>")
        .unwrap();
    let kinds: Vec<&str> = doc.iter_blocks().map(Block::kind).collect();
    assert_eq!(kinds, vec!["list", "thematic_break", "paragraph"]);
}

#[test]
fn test_empty_fragment() {
    assert_eq!(html_to_markdown(""), "\n");
    assert_eq!(html_to_markdown("<div>   </div>"), "\n");
}
