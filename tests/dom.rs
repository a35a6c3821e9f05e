use pretty_assertions::assert_eq;

use domxml::*;

fn sample() -> (Document, Node) {
    let doc = Document::parse(
        "<catalog>\
           <book id=\"bk101\"><title>First</title></book>\
           <book id=\"bk102\"><title>Second</title></book>\
           <!-- marker -->\
         </catalog>",
    )
    .unwrap();
    let root = doc.document_element().unwrap();
    (doc, root)
}

#[test]
fn navigation() {
    let (doc, root) = sample();

    let first = root.first_child(&doc).unwrap();
    let last = root.last_child(&doc).unwrap();
    assert_eq!(first.attribute_value(&doc, "id").as_deref(), Some("bk101"));
    assert_eq!(last.node_type(&doc), NodeType::Comment);

    let second = first.next_sibling(&doc).unwrap();
    assert_eq!(second.prev_sibling(&doc), Some(first));
    assert_eq!(second.parent(&doc), Some(root));
    assert_eq!(root.parent(&doc), Some(doc.root()));
    assert!(doc.root().parent(&doc).is_none());
}

#[test]
fn levels() {
    let (doc, root) = sample();
    assert_eq!(doc.root().level(&doc), 0);
    assert_eq!(root.level(&doc), 1);

    let title = root.first_child(&doc).unwrap().first_child(&doc).unwrap();
    assert_eq!(title.level(&doc), 3);
}

#[test]
fn find_element_and_wildcard() {
    let (doc, root) = sample();
    assert!(root.find_element(&doc, "book").is_some());
    assert!(root.find_element(&doc, "title").is_none()); // children only
    assert_eq!(root.find_element(&doc, "*"), root.first_child(&doc));
}

#[test]
fn elements_by_tag_name() {
    let (doc, root) = sample();
    assert_eq!(root.elements_by_tag_name(&doc, "title").len(&doc).unwrap(), 2);
    assert_eq!(root.elements_by_tag_name(&doc, "*").len(&doc).unwrap(), 5);
}

#[test]
fn element_by_id() {
    let doc = Document::parse("<r><a Id=\"x\"/><b><c ID=\"y\"/></b></r>").unwrap();
    let root = doc.document_element().unwrap();

    let c = root.element_by_id(&doc, "y").unwrap();
    assert_eq!(c.full_name(&doc), "c");
    assert!(c.find_attribute_by_id(&doc).is_some());
    assert!(root.element_by_id(&doc, "z").is_none());
}

#[test]
fn append_and_detach() {
    let (mut doc, root) = sample();

    let extra = doc.create_element("appendix");
    assert!(extra.parent(&doc).is_none());

    root.append_child(&mut doc, extra).unwrap();
    assert_eq!(extra.parent(&doc), Some(root));
    assert_eq!(root.last_child(&doc), Some(extra));

    // Re-appending moves a node to the end of its new parent.
    let first_book = root.first_child(&doc).unwrap();
    let target = root.find_element(&doc, "book").unwrap();
    assert_eq!(first_book, target);
    root.append_child(&mut doc, first_book).unwrap();
    assert_eq!(root.last_child(&doc), Some(first_book));
}

#[test]
fn insert_before_and_after() {
    let mut doc = Document::parse("<r><a/><c/></r>").unwrap();
    let root = doc.document_element().unwrap();
    let a = root.find_element(&doc, "a").unwrap();
    let c = root.find_element(&doc, "c").unwrap();

    let b = doc.create_element("b");
    root.insert_child_before(&mut doc, b, c).unwrap();
    assert_eq!(a.next_sibling(&doc), Some(b));
    assert_eq!(b.next_sibling(&doc), Some(c));

    let d = doc.create_element("d");
    root.insert_child_after(&mut doc, d, c).unwrap();
    assert_eq!(root.last_child(&doc), Some(d));

    let stranger = doc.create_element("s");
    let orphan = doc.create_element("o");
    assert!(matches!(
        root.insert_child_before(&mut doc, stranger, orphan),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn replace_child_keeps_position() {
    let mut doc = Document::parse("<r><a/><b/><c/></r>").unwrap();
    let root = doc.document_element().unwrap();
    let a = root.find_element(&doc, "a").unwrap();
    let b = root.find_element(&doc, "b").unwrap();

    let x = doc.create_element("x");
    root.replace_child(&mut doc, x, b).unwrap();

    assert_eq!(a.next_sibling(&doc), Some(x));
    assert_eq!(x.next_sibling(&doc), root.find_element(&doc, "c"));
    assert!(b.parent(&doc).is_none());
}

#[test]
fn attribute_mutation() {
    let mut doc = Document::parse("<r/>").unwrap();
    let root = doc.document_element().unwrap();

    let attr = doc.create_attribute("lang", "en");
    root.append_attribute(&mut doc, attr).unwrap();
    assert_eq!(root.attribute_value(&doc, "lang").as_deref(), Some("en"));

    // Same name again is rejected outside of loading.
    let dup = doc.create_attribute("lang", "de");
    assert!(matches!(
        root.append_attribute(&mut doc, dup),
        Err(Error::InvalidOperation(_))
    ));

    // `ensure_attribute` hands back the existing node.
    let same = root.ensure_attribute(&mut doc, "lang").unwrap();
    assert_eq!(same, attr);
    let fresh = root.ensure_attribute(&mut doc, "dir").unwrap();
    assert_eq!(root.attributes(&doc).len(&doc).unwrap(), 2);

    root.remove_attribute(&mut doc, fresh).unwrap();
    assert!(root.find_attribute(&doc, "dir").is_none());

    root.remove_attribute_by_name(&mut doc, "lang").unwrap();
    assert!(!root.has_attributes(&doc));
}

#[test]
fn set_value_rules() {
    let mut doc = Document::parse("<r>t</r>").unwrap();
    let root = doc.document_element().unwrap();
    let text = root.first_child(&doc).unwrap();

    text.set_value(&mut doc, "changed").unwrap();
    assert_eq!(text.value(&doc).as_deref(), Some("changed"));

    // Elements hold no character data.
    assert!(matches!(
        root.set_value(&mut doc, "nope"),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn whitespace_nodes_reject_other_content() {
    let mut doc = Document::new();
    assert!(matches!(
        doc.create_whitespace("a b"),
        Err(Error::NotAllWhitespace)
    ));

    let ws = doc.create_significant_whitespace(" \t\n").unwrap();
    assert!(matches!(
        ws.set_value(&mut doc, "text"),
        Err(Error::NotAllWhitespace)
    ));
}

#[test]
fn cdata_rejects_terminator() {
    let mut doc = Document::new();
    assert!(matches!(
        doc.create_cdata("a ]]> b"),
        Err(Error::InvalidOperation(_))
    ));

    let cdata = doc.create_cdata("fine").unwrap();
    assert!(matches!(
        cdata.set_value(&mut doc, "also ]]> here"),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn no_self_or_ancestor_adoption() {
    let mut doc = Document::parse("<r><a><b/></a></r>").unwrap();
    let root = doc.document_element().unwrap();
    let a = root.find_element(&doc, "a").unwrap();
    let b = a.find_element(&doc, "b").unwrap();

    assert!(matches!(
        a.append_child(&mut doc, a),
        Err(Error::InvalidOperation(_))
    ));
    assert!(matches!(
        b.append_child(&mut doc, a),
        Err(Error::InvalidOperation(_))
    ));
    assert!(matches!(
        b.append_child(&mut doc, root),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn no_cross_document_moves() {
    let mut d1 = Document::new();
    let mut d2 = Document::new();

    let stray = d1.create_element("stray");
    let root = d2.create_element("root");
    d2.root().append_child(&mut d2, root).unwrap();

    assert!(matches!(
        root.append_child(&mut d2, stray),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn permitted_children_only() {
    let mut doc = Document::parse("<r/>").unwrap();
    let root = doc.document_element().unwrap();

    // Text directly under the document node is not permitted.
    let text = doc.create_text("stray");
    assert!(matches!(
        doc.root().append_child(&mut doc, text),
        Err(Error::InvalidOperation(_))
    ));

    // A second declaration is not permitted either.
    let decl = doc.create_declaration("1.0", None, None).unwrap();
    doc.root().append_child(&mut doc, decl).unwrap();
    let decl2 = doc.create_declaration("1.0", None, None).unwrap();
    assert!(matches!(
        doc.root().append_child(&mut doc, decl2),
        Err(Error::InvalidOperation(_))
    ));

    // Attributes never appear in child lists.
    let attr = doc.create_attribute("a", "1");
    assert!(matches!(
        root.append_child(&mut doc, attr),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn document_fragment_donates_children() {
    let mut doc = Document::parse("<r/>").unwrap();
    let root = doc.document_element().unwrap();

    let fragment = doc.create_document_fragment();
    let a = doc.create_element("a");
    let b = doc.create_text("b");
    fragment.append_child(&mut doc, a).unwrap();
    fragment.append_child(&mut doc, b).unwrap();

    root.append_child(&mut doc, fragment).unwrap();
    assert!(!fragment.has_children(&doc));
    assert_eq!(root.first_child(&doc), Some(a));
    assert_eq!(root.last_child(&doc), Some(b));
}

#[test]
fn remove_all_clears_attributes_and_children() {
    let mut doc = Document::parse("<r a=\"1\" b=\"2\"><x/><y/></r>").unwrap();
    let root = doc.document_element().unwrap();

    root.remove_all(&mut doc).unwrap();
    assert!(!root.has_children(&doc));
    assert!(!root.has_attributes(&doc));
}

#[test]
fn attribute_list_iteration() {
    let (doc, root) = sample();
    let book = root.first_child(&doc).unwrap();

    let mut attrs = book.attributes(&doc);
    assert_eq!(attrs.len(&doc).unwrap(), 1);
    let id = attrs.pop_front(&doc).unwrap().unwrap();
    assert_eq!(id.full_name(&doc), "id");
    assert!(attrs.pop_front(&doc).unwrap().is_none());
}

#[test]
fn child_list_operations() {
    let (doc, root) = sample();
    let list = root.child_nodes(&doc, false);

    assert_eq!(list.len(&doc).unwrap(), 3);
    assert!(!list.is_empty());

    let first = list.front().unwrap();
    assert_eq!(list.item(&doc, 0).unwrap(), Some(first));
    assert_eq!(list.index_of(&doc, first).unwrap(), Some(0));

    let back = list.back(&doc).unwrap().unwrap();
    assert_eq!(back.node_type(&doc), NodeType::Comment);
    assert_eq!(list.index_of(&doc, back).unwrap(), Some(2));
    assert_eq!(list.item(&doc, 3).unwrap(), None);
}

#[test]
fn list_save_is_independent() {
    let (doc, root) = sample();
    let mut list = root.child_nodes(&doc, false);

    let saved = list.save();
    list.pop_front(&doc).unwrap();
    list.pop_front(&doc).unwrap();

    assert_eq!(saved.len(&doc).unwrap(), 3);
    assert_eq!(saved.front(), root.first_child(&doc));
}

#[test]
fn list_reset_rewinds() {
    let (doc, root) = sample();
    let mut list = root.child_nodes(&doc, false);

    while list.pop_front(&doc).unwrap().is_some() {}
    assert!(list.is_empty());

    list.reset(&doc).unwrap();
    assert_eq!(list.front(), root.first_child(&doc));
}

#[test]
fn deep_list_counts_every_descendant() {
    // 12 books with 7 text-carrying children each: the subtree holds the
    // root element, the books, their children and one text node per child.
    let mut data = String::from("<catalog>");
    for book in 0..12 {
        data.push_str(&format!("<book id=\"bk{:03}\">", book));
        for field in 0..7 {
            data.push_str(&format!("<f{}>v</f{}>", field, field));
        }
        data.push_str("</book>");
    }
    data.push_str("</catalog>");

    let doc = Document::parse(&data).unwrap();
    let root = doc.document_element().unwrap();

    let expected = 1 + 12 + 12 * 7 + 12 * 7;
    assert_eq!(root.child_nodes(&doc, true).len(&doc).unwrap(), expected);
}

#[test]
fn deep_list_preorder() {
    let doc = Document::parse("<r><a><b/></a><c/></r>").unwrap();
    let root = doc.document_element().unwrap();

    let mut names = Vec::new();
    let mut list = root.child_nodes(&doc, true);
    while let Some(node) = list.pop_front(&doc).unwrap() {
        names.push(node.full_name(&doc).into_owned());
    }
    assert_eq!(names, vec!["r", "a", "b", "c"]);
}

#[test]
fn filtered_list_sees_only_matches() {
    let (doc, root) = sample();
    let mut books = root.elements_by_tag_name(&doc, "book");

    let mut n = 0;
    while let Some(node) = books.pop_front(&doc).unwrap() {
        assert_eq!(node.full_name(&doc), "book");
        n += 1;
    }
    assert_eq!(n, 2);
}

#[test]
fn list_detects_structural_changes() {
    let mut doc = Document::parse("<r><a/><b/><c/></r>").unwrap();
    let root = doc.document_element().unwrap();

    let mut list = root.child_nodes(&doc, false);
    list.pop_front(&doc).unwrap();

    let c = root.find_element(&doc, "c").unwrap();
    root.remove_child(&mut doc, c).unwrap();

    assert!(matches!(list.pop_front(&doc), Err(Error::ListChanged)));
}

#[test]
fn list_remove_all_detaches() {
    let mut doc = Document::parse("<r><a/><b/></r>").unwrap();
    let root = doc.document_element().unwrap();

    let mut list = root.child_nodes(&doc, false);
    list.remove_all(&mut doc).unwrap();
    assert!(!root.has_children(&doc));
    assert!(list.is_empty());
}

#[test]
fn flat_list() {
    let mut doc = Document::new();
    let nodes: Vec<Node> = (0..3).map(|i| doc.create_element(&format!("n{}", i))).collect();

    let list = NodeList::flat(nodes.clone());
    assert_eq!(list.len(&doc).unwrap(), 3);
    assert_eq!(list.item(&doc, 1).unwrap(), Some(nodes[1]));
    assert_eq!(list.back(&doc).unwrap(), Some(nodes[2]));
}

#[test]
fn case_insensitive_name_comparator() {
    let mut doc = Document::parse("<R Attr=\"1\"/>").unwrap();
    doc.set_name_comparator(names_equal_ignore_case);

    let root = doc.document_element().unwrap();
    assert!(root.has_name(&doc, "r"));
    assert!(root.find_attribute(&doc, "ATTR").is_some());
}

#[test]
fn qname_namespaces() {
    let mut doc = Document::parse("<x:r xmlns:a=\"u\"/>").unwrap();
    doc.set_default_uri("default-uri");

    let root = doc.document_element().unwrap();
    assert_eq!(root.namespace(&doc), "default-uri");

    let xmlns_attr = root.first_attribute(&doc).unwrap();
    assert_eq!(xmlns_attr.namespace(&doc), NS_XMLNS_URI);

    let xml_attr = doc.create_attribute("xml:space", "preserve");
    assert_eq!(xml_attr.namespace(&doc), NS_XML_URI);
}
