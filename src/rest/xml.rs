use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};

use crate::rest::error::ApiError;

/// Decoder hint: element names that always materialize as a [`XmlValue::List`]
/// even when only one instance is present.
///
/// Responses collapse repeated elements into a list automatically; the hint
/// exists for callers that index into elements which the service sometimes
/// returns singular (`events/search` with one hit, for example).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ForceArray {
    #[default]
    Off,
    /// Every element decodes as a list.
    All,
    /// Only the named elements decode as lists.
    Tags(Vec<String>),
}

impl ForceArray {
    pub fn tags<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Tags(names.into_iter().map(Into::into).collect())
    }

    fn applies(&self, name: &str) -> bool {
        match self {
            Self::Off => false,
            Self::All => true,
            Self::Tags(tags) => tags.iter().any(|t| t == name),
        }
    }
}

impl From<bool> for ForceArray {
    fn from(all: bool) -> Self {
        if all { Self::All } else { Self::Off }
    }
}

/// Decoded XML tree: per-element maps of child elements and attributes,
/// lists for repeated names, text for leaves.
///
/// No schema is enforced; callers pick fields out by convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    Text(String),
    List(Vec<XmlValue>),
    Map(BTreeMap<String, XmlValue>),
}

impl XmlValue {
    /// Child value by key, when this is a map.
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[XmlValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text content of the child at `key`. Looks through a force-arrayed
    /// single-element list so callers need not care about that hint.
    pub fn text_of(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            XmlValue::Text(text) => Some(text),
            XmlValue::List(items) => items.first().and_then(XmlValue::as_text),
            XmlValue::Map(_) => None,
        }
    }
}

struct Frame {
    name: String,
    children: BTreeMap<String, XmlValue>,
    text: String,
}

/// Decode an XML document into an [`XmlValue`] tree.
///
/// Attributes and child elements merge into one per-element map; namespace
/// prefixes are stripped (only local names matter); repeated child names
/// collapse into a list. A text-only element becomes [`XmlValue::Text`];
/// mixed content keeps its trimmed text under a `"content"` key. The return
/// value is the root element's value, so envelope fields like `string` sit
/// at the top level.
pub fn decode_document(xml: &str, force: &ForceArray) -> Result<XmlValue, ApiError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4 * 1024);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<XmlValue> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                stack.push(open_frame(&e));
            }
            Ok(Event::Empty(e)) => {
                close_frame(open_frame(&e), &mut stack, &mut root, force);
            }
            Ok(Event::Text(e)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&decode_text(e.as_ref()));
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            // Entity references arrive as their own events, split out of the
            // surrounding text; dropping them would corrupt any field that
            // contains `&amp;` and friends.
            Ok(Event::GeneralRef(e)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&decode_general_ref(e.as_ref()));
                }
            }
            Ok(Event::End(_)) => {
                if let Some(frame) = stack.pop() {
                    close_frame(frame, &mut stack, &mut root, force);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ApiError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    root.ok_or(ApiError::EmptyResponse)
}

/// Local element/attribute name with any namespace prefix stripped.
fn local_name(raw: &[u8]) -> String {
    let local = match raw.iter().position(|b| *b == b':') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    };
    String::from_utf8_lossy(local).into_owned()
}

/// Build a frame for an opened element, folding its attributes in as text
/// children. Malformed attributes are skipped rather than failing the whole
/// document; the service is not strict about its own output.
fn open_frame(event: &BytesStart<'_>) -> Frame {
    let mut frame = Frame {
        name: local_name(event.name().as_ref()),
        children: BTreeMap::new(),
        text: String::new(),
    };

    for attr in event.attributes().with_checks(false).flatten() {
        let raw_key = attr.key.as_ref();
        // xmlns declarations are bookkeeping, not data.
        if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
            continue;
        }
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        frame
            .children
            .insert(local_name(raw_key), XmlValue::Text(value));
    }

    frame
}

fn close_frame(
    frame: Frame,
    stack: &mut Vec<Frame>,
    root: &mut Option<XmlValue>,
    force: &ForceArray,
) {
    let Frame {
        name,
        mut children,
        text,
    } = frame;

    let trimmed = text.trim();
    let value = if children.is_empty() {
        XmlValue::Text(trimmed.to_string())
    } else {
        if !trimmed.is_empty() {
            children.insert("content".to_string(), XmlValue::Text(trimmed.to_string()));
        }
        XmlValue::Map(children)
    };

    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.children, name, value, force),
        None => {
            if root.is_none() {
                *root = Some(value);
            }
        }
    }
}

fn insert_child(
    children: &mut BTreeMap<String, XmlValue>,
    name: String,
    value: XmlValue,
    force: &ForceArray,
) {
    match children.get_mut(&name) {
        Some(XmlValue::List(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, XmlValue::Text(String::new()));
            *existing = XmlValue::List(vec![first, value]);
        }
        None => {
            if force.applies(&name) {
                children.insert(name, XmlValue::List(vec![value]));
            } else {
                children.insert(name, value);
            }
        }
    }
}

/// Resolve an entity reference (`raw` is the name between `&` and `;`):
/// predefined entities, then decimal/hex character references. Unknown
/// entities keep their literal `&name;` spelling instead of failing the
/// document.
fn decode_general_ref(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw);
    if let Some(resolved) = resolve_predefined_entity(&name) {
        return resolved.to_string();
    }
    if let Some(num) = name.strip_prefix('#') {
        let parsed = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => num.parse(),
        };
        if let Ok(code) = parsed
            && let Some(ch) = char::from_u32(code)
        {
            return ch.to_string();
        }
    }
    format!("&{name};")
}

/// Entity-decode a text node. Unknown entities and invalid UTF-8 fall back
/// to the literal bytes instead of failing the document.
fn decode_text(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) => match unescape(s) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => s.to_string(),
        },
        Err(_) => String::from_utf8_lossy(raw).into_owned(),
    }
}
