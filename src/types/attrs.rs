//! Ordered attribute lists parsed from tag text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Matches one `name=value` pair. Values may be double-quoted, single-quoted
/// or bare; anything the pattern cannot account for is skipped, so stray
/// tokens between attributes never abort a scan.
static ATTR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>/]+))"#)
        .expect("attribute pattern must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Quote {
    Double,
    Single,
    Bare,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Attribute {
    name: String,
    value: String,
    quote: Quote,
}

impl Attribute {
    fn render(&self) -> String {
        match self.quote {
            Quote::Double => format!("{}=\"{}\"", self.name, self.value),
            Quote::Single => format!("{}='{}'", self.name, self.value),
            Quote::Bare => format!("{}={}", self.name, self.value),
        }
    }
}

/// The attributes of a single tag, in document order.
///
/// Names are normalized to lowercase on entry; lookups are therefore
/// ASCII case-insensitive while values stay untouched. The original
/// quoting style of each attribute is kept so that a value replacement
/// does not reformat its neighbours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrList {
    attrs: Vec<Attribute>,
}

impl AttrList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts every recognizable `name=value` pair from the attribute
    /// portion of a tag line.
    pub fn parse(text: &str) -> Self {
        let attrs = ATTR_PATTERN
            .captures_iter(text)
            .map(|caps| {
                let name = caps[1].to_ascii_lowercase();
                let (value, quote) = if let Some(m) = caps.get(2) {
                    (m.as_str(), Quote::Double)
                } else if let Some(m) = caps.get(3) {
                    (m.as_str(), Quote::Single)
                } else {
                    (&caps[4], Quote::Bare)
                };
                Attribute {
                    name,
                    value: value.to_string(),
                    quote,
                }
            })
            .collect();
        Self { attrs }
    }

    /// Looks up a value by attribute name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Replaces the value of an existing attribute in place, keeping its
    /// position and quoting style. Returns false when the name is absent.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let name = name.to_ascii_lowercase();
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => {
                attr.value = value.to_string();
                // A bare value cannot carry whitespace or quotes. Promote
                // to double quotes when the replacement needs them.
                if attr.quote == Quote::Bare
                    && (attr.value.is_empty() || attr.value.contains(|c: char| c.is_whitespace()))
                {
                    attr.quote = Quote::Double;
                }
                true
            }
            None => false,
        }
    }

    /// Appends a new attribute after all existing ones.
    pub fn append(&mut self, name: &str, value: &str) {
        self.attrs.push(Attribute {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
            quote: Quote::Double,
        });
    }

    /// Removes an attribute by name. Returns false when the name is absent.
    pub fn remove(&mut self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        let before = self.attrs.len();
        self.attrs.retain(|a| a.name != name);
        self.attrs.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attrs.iter().map(|a| (a.name.as_str(), a.value.as_str()))
    }

    pub fn pairs(&self) -> Vec<(String, String)> {
        self.attrs
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Renders the list as tag text, one leading space before each attribute.
    /// An empty list renders as an empty string.
    pub fn render(&self) -> String {
        self.attrs
            .iter()
            .map(|a| format!(" {}", a.render()))
            .collect()
    }
}

impl Serialize for AttrList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
