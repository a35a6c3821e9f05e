use pretty_assertions::assert_eq;

use domxml::*;

fn compact(doc: &Document) -> String {
    doc.to_xml_string(false).unwrap()
}

#[test]
fn minimal_round_trip() {
    let doc = Document::parse("<r/>").unwrap();
    assert_eq!(compact(&doc), "<r/>");
}

#[test]
fn built_tree_with_escapes() {
    let mut doc = Document::new();

    let root = doc.create_element("root");
    doc.root().append_child(&mut doc, root).unwrap();

    let e1 = doc.create_element("prefix:localname");
    root.append_child(&mut doc, e1).unwrap();

    let a = doc.create_element("a");
    let a_attr = doc.create_attribute("a", "value");
    a.append_attribute(&mut doc, a_attr).unwrap();
    root.append_child(&mut doc, a).unwrap();

    let a2 = doc.create_element("a2");
    let a2_attr = doc.create_attribute("a2", "&<>'\"");
    a2.append_attribute(&mut doc, a2_attr).unwrap();
    root.append_child(&mut doc, a2).unwrap();

    let c = doc.create_element("c");
    let comment = doc.create_comment("--comment--");
    c.append_child(&mut doc, comment).unwrap();
    root.append_child(&mut doc, c).unwrap();

    let t = doc.create_element("t");
    let text = doc.create_text("text");
    t.append_child(&mut doc, text).unwrap();
    root.append_child(&mut doc, t).unwrap();

    let cdata = doc.create_cdata("data &<>").unwrap();
    root.append_child(&mut doc, cdata).unwrap();

    assert_eq!(
        compact(&doc),
        "<root>\
           <prefix:localname/>\
           <a a=\"value\"/>\
           <a2 a2=\"&amp;&lt;&gt;&apos;&quot;\"/>\
           <c><!----comment----></c>\
           <t>text</t>\
           <![CDATA[data &<>]]>\
         </root>"
    );
}

#[test]
fn parse_serialize_parse_is_stable() {
    let inputs = [
        "<r/>",
        "<r a=\"1\" b=\"two\"/>",
        "<r><a/><b>text</b><!-- note --><?pi data?></r>",
        "<root><a2 a2=\"&amp;&lt;&gt;&apos;&quot;\"/><![CDATA[data &<>]]></root>",
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><r/>",
        "<p>one<b>two</b>three</p>",
    ];

    for input in inputs {
        let doc = Document::parse(input).unwrap();
        let once = compact(&doc);
        assert_eq!(once, input);

        let again = Document::parse(&once).unwrap();
        assert_eq!(compact(&again), once);
    }
}

#[test]
fn declaration_round_trip() {
    let data = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><r/>";
    let doc = Document::parse(data).unwrap();

    let decl = doc.declaration().unwrap();
    assert_eq!(decl.attribute_value(&doc, "version").as_deref(), Some("1.0"));
    assert_eq!(decl.attribute_value(&doc, "encoding").as_deref(), Some("UTF-8"));

    assert_eq!(compact(&doc), data);
}

#[test]
fn text_escaped_on_write() {
    let mut doc = Document::new();
    let root = doc.create_element("r");
    doc.root().append_child(&mut doc, root).unwrap();
    let text = doc.create_text("a < b & c");
    root.append_child(&mut doc, text).unwrap();

    assert_eq!(compact(&doc), "<r>a &lt; b &amp; c</r>");
}

#[test]
fn encoded_values_written_verbatim() {
    let mut doc = Document::new();
    let root = doc.create_element("r");
    doc.root().append_child(&mut doc, root).unwrap();
    let text = doc.create_text("");
    root.append_child(&mut doc, text).unwrap();

    // An `encoded` string must not be escaped again.
    text.set_xml_value(&mut doc, XmlString::encoded("a &amp; b"))
        .unwrap();
    assert_eq!(compact(&doc), "<r>a &amp; b</r>");
}

#[test]
fn escape_helpers_are_inverse() {
    let table = EntityTable::new();
    assert_eq!(escape("&<>'\""), "&amp;&lt;&gt;&apos;&quot;");
    assert_eq!(unescape("&amp;&lt;&gt;&apos;&quot;", &table), "&<>'\"");

    let plain = "no specials in here";
    assert_eq!(escape(plain), plain);

    let round = "mixed & matched < sometimes";
    assert_eq!(unescape(&escape(round), &table), round);
}

#[test]
fn attribute_quote_choice() {
    let mut doc = Document::new();
    let root = doc.create_element("r");
    doc.root().append_child(&mut doc, root).unwrap();

    // A pre-encoded value containing a double quote switches to single
    // quotes.
    let attr = doc.create_attribute("a", "");
    attr.set_xml_value(&mut doc, XmlString::encoded("say \"hi\""))
        .unwrap();
    root.append_attribute(&mut doc, attr).unwrap();

    assert_eq!(compact(&doc), "<r a='say \"hi\"'/>");
}

#[test]
fn doctype_round_trip() {
    let data = "<!DOCTYPE myDoc SYSTEM \"http://x/y\" [\
                  <!ELEMENT e ANY>\
                  <!ELEMENT seq (a,b?,(c|d)*)>\
                  <!ENTITY r \"replacement\">\
                  <!ATTLIST f g CDATA #REQUIRED>\
                  <!NOTATION n SYSTEM \"viewer\">\
                ]><r/>";

    let doc = Document::parse(data).unwrap();
    assert_eq!(compact(&doc), data);
}

#[test]
fn doctype_without_subset() {
    let data = "<!DOCTYPE r PUBLIC \"pub-id\" \"sys-id\"><r/>";
    let doc = Document::parse(data).unwrap();
    assert_eq!(compact(&doc), data);
}

#[test]
fn pretty_output_indents_children() {
    let doc = Document::parse("<a><b>text</b><c/></a>").unwrap();
    assert_eq!(
        doc.to_xml_string(true).unwrap(),
        "<a>\n  <b>text</b>\n  <c/>\n</a>"
    );
}

#[test]
fn pretty_keeps_single_text_inline() {
    let doc = Document::parse("<a><b><c>deep</c></b></a>").unwrap();
    assert_eq!(
        doc.to_xml_string(true).unwrap(),
        "<a>\n  <b>\n    <c>deep</c>\n  </b>\n</a>"
    );
}

#[test]
fn pretty_declaration_on_own_line() {
    let doc = Document::parse("<?xml version=\"1.0\"?><r><a/></r>").unwrap();
    assert_eq!(
        doc.to_xml_string(true).unwrap(),
        "<?xml version=\"1.0\"?>\n<r>\n  <a/>\n</r>"
    );
}

#[test]
fn preserved_whitespace_round_trips() {
    let options = ParseOptions {
        preserve_whitespace: true,
        ..ParseOptions::default()
    };
    let data = "<r>\n  <a/>  \n</r>";
    let doc = Document::parse_with_options(data, options).unwrap();
    assert_eq!(compact(&doc), data);
}

#[test]
fn single_node_write() {
    let doc = Document::parse("<r><a x=\"1\"><b/></a></r>").unwrap();
    let a = doc.document_element().unwrap().find_element(&doc, "a").unwrap();

    let mut out = Vec::new();
    let mut writer = XmlWriter::new(&mut out, false);
    a.write(&doc, &mut writer).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "<a x=\"1\"><b/></a>");
}

#[test]
fn entity_reference_node_written() {
    let mut doc = Document::parse("<r/>").unwrap();
    let root = doc.document_element().unwrap();
    let reference = doc.create_entity_reference("chapter");
    root.append_child(&mut doc, reference).unwrap();

    assert_eq!(compact(&doc), "<r>&chapter;</r>");
}

#[test]
fn file_round_trip() {
    let mut path = std::env::temp_dir();
    path.push(format!("domxml-test-{}.xml", std::process::id()));

    let doc = Document::parse("<r><a b=\"1\"/>text</r>").unwrap();
    doc.save_to_file(&path, false).unwrap();

    let reloaded = Document::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(compact(&reloaded), "<r><a b=\"1\"/>text</r>");
}
