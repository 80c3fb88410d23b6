use evdb_rs::{ApiError, ForceArray, XmlValue, decode_document};

#[test]
fn test_decode_returns_root_element_content() {
    let xml = "<response><string>E-1</string><description>bad id</description></response>";
    let tree = decode_document(xml, &ForceArray::Off).unwrap();
    assert_eq!(tree.text_of("string"), Some("E-1"));
    assert_eq!(tree.text_of("description"), Some("bad id"));
}

#[test]
fn test_text_only_element_decodes_as_text() {
    let tree = decode_document("<total_items>42</total_items>", &ForceArray::Off).unwrap();
    assert_eq!(tree, XmlValue::Text("42".to_string()));
}

#[test]
fn test_attributes_merge_into_element_map() {
    let xml = r#"<event id="E1"><title>Picnic</title></event>"#;
    let tree = decode_document(xml, &ForceArray::Off).unwrap();
    assert_eq!(tree.text_of("id"), Some("E1"));
    assert_eq!(tree.text_of("title"), Some("Picnic"));
}

#[test]
fn test_namespace_prefixes_are_stripped() {
    let xml = r#"<ns:response xmlns:ns="urn:x"><ns:string>err</ns:string></ns:response>"#;
    let tree = decode_document(xml, &ForceArray::Off).unwrap();
    assert_eq!(tree.text_of("string"), Some("err"));
    // The xmlns declaration itself is not data.
    assert_eq!(tree.get("ns"), None);
}

#[test]
fn test_repeated_elements_collapse_into_list() {
    let xml = "<events><event>a</event><event>b</event><event>c</event></events>";
    let tree = decode_document(xml, &ForceArray::Off).unwrap();
    let list = tree.get("event").and_then(XmlValue::as_list).unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].as_text(), Some("a"));
    assert_eq!(list[2].as_text(), Some("c"));
}

#[test]
fn test_single_element_stays_singular_without_hint() {
    let xml = "<events><event>only</event></events>";
    let tree = decode_document(xml, &ForceArray::Off).unwrap();
    assert_eq!(tree.get("event"), Some(&XmlValue::Text("only".to_string())));
}

#[test]
fn test_force_array_tags_wraps_single_element() {
    let xml = "<search><event>only</event><total>1</total></search>";
    let tree = decode_document(xml, &ForceArray::tags(["event"])).unwrap();
    let list = tree.get("event").and_then(XmlValue::as_list).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].as_text(), Some("only"));
    // Unlisted siblings are unaffected.
    assert_eq!(tree.text_of("total"), Some("1"));
}

#[test]
fn test_force_array_all_wraps_everything() {
    let xml = "<r><a>1</a><b>2</b></r>";
    let tree = decode_document(xml, &ForceArray::All).unwrap();
    assert!(matches!(tree.get("a"), Some(XmlValue::List(_))));
    assert!(matches!(tree.get("b"), Some(XmlValue::List(_))));
    // text_of looks through the single-element list.
    assert_eq!(tree.text_of("a"), Some("1"));
}

#[test]
fn test_mixed_content_keeps_text_under_content_key() {
    let xml = r#"<note lang="en">hello there</note>"#;
    let tree = decode_document(xml, &ForceArray::Off).unwrap();
    assert_eq!(tree.text_of("lang"), Some("en"));
    assert_eq!(tree.text_of("content"), Some("hello there"));
}

#[test]
fn test_entities_and_cdata_are_unescaped() {
    let xml = "<r><a>fish &amp; chips</a><b><![CDATA[1 < 2]]></b></r>";
    let tree = decode_document(xml, &ForceArray::Off).unwrap();
    assert_eq!(tree.text_of("a"), Some("fish & chips"));
    assert_eq!(tree.text_of("b"), Some("1 < 2"));
}

#[test]
fn test_entity_in_the_middle_of_text_keeps_both_halves() {
    // The reader reports the reference as its own event between two text
    // chunks; all three pieces must land in the same field.
    let xml = "<r><title>Rock &amp; Roll Night</title></r>";
    let tree = decode_document(xml, &ForceArray::Off).unwrap();
    assert_eq!(tree.text_of("title"), Some("Rock & Roll Night"));
}

#[test]
fn test_character_references_resolve_to_chars() {
    let xml = "<r><a>caf&#233;</a><b>A&#x26;B</b></r>";
    let tree = decode_document(xml, &ForceArray::Off).unwrap();
    assert_eq!(tree.text_of("a"), Some("café"));
    assert_eq!(tree.text_of("b"), Some("A&B"));
}

#[test]
fn test_unknown_entity_keeps_literal_form() {
    let xml = "<r><a>10 &euro; fee</a></r>";
    let tree = decode_document(xml, &ForceArray::Off).unwrap();
    assert_eq!(tree.text_of("a"), Some("10 &euro; fee"));
}

#[test]
fn test_nested_structure() {
    let xml = "<response><events><event><id>E1</id></event></events></response>";
    let tree = decode_document(xml, &ForceArray::Off).unwrap();
    let event = tree.get("events").and_then(|e| e.get("event")).unwrap();
    assert_eq!(event.text_of("id"), Some("E1"));
}

#[test]
fn test_empty_document_is_an_error() {
    let err = decode_document("", &ForceArray::Off).unwrap_err();
    assert!(matches!(err, ApiError::EmptyResponse), "got {err:?}");
}

#[test]
fn test_document_without_root_element_is_an_error() {
    let err = decode_document("just some text", &ForceArray::Off).unwrap_err();
    assert!(matches!(err, ApiError::EmptyResponse), "got {err:?}");
}

#[test]
fn test_empty_element_decodes_as_empty_text() {
    let tree = decode_document("<r><nonce/></r>", &ForceArray::Off).unwrap();
    assert_eq!(tree.text_of("nonce"), Some(""));
}
