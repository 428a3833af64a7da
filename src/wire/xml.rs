//! Encoder for the legacy XML dialect.
//!
//! The legacy service serialized plain key/value documents straight into
//! XML: the root element takes its name from the single top-level key,
//! child elements follow the mapping's own insertion order, list entries
//! are emitted as repeated sibling elements inside the parent element (no
//! plural wrapper is invented), and scalars become escaped text content.
//! Fields absent from the mapping are simply never emitted.

use std::fmt::Write as _;

/// A value inside a legacy XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    /// Text content of a leaf element.
    Scalar(String),
    /// Ordered child elements; insertion order is the wire order.
    Map(Vec<(String, XmlValue)>),
    /// Repeated sibling elements rendered in place inside the parent.
    List(Vec<XmlValue>),
}

impl XmlValue {
    /// Leaf text content.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Empty ordered mapping.
    pub fn map() -> Self {
        Self::Map(Vec::new())
    }

    /// Append a child entry, preserving insertion order.
    ///
    /// Appending to a scalar or list replaces nothing and is a programming
    /// error; the builder is only used on [`XmlValue::Map`] values.
    pub fn push(mut self, key: impl Into<String>, value: XmlValue) -> Self {
        if let Self::Map(entries) = &mut self {
            entries.push((key.into(), value));
        }
        self
    }

    /// Append a child entry only when the value is present.
    pub fn push_opt(self, key: impl Into<String>, value: Option<XmlValue>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    fn write_into(&self, out: &mut String) {
        match self {
            Self::Scalar(text) => escape_into(text, out),
            Self::Map(entries) => {
                for (name, value) in entries {
                    write_element(name, value, out);
                }
            }
            Self::List(entries) => {
                for value in entries {
                    value.write_into(out);
                }
            }
        }
    }
}

/// A complete legacy document: one named root element and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: String,
    content: XmlValue,
}

impl XmlDocument {
    /// Build a document whose root element is named after `root`.
    pub fn new(root: impl Into<String>, content: XmlValue) -> Self {
        Self {
            root: root.into(),
            content,
        }
    }

    /// Serialize to the wire string. The legacy dialect carries no XML
    /// declaration.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        write_element(&self.root, &self.content, &mut out);
        out
    }
}

fn write_element(name: &str, value: &XmlValue, out: &mut String) {
    // Writing to a String cannot fail; the unwrap-free form keeps the
    // encoder total.
    let _ = write!(out, "<{name}>");
    value.write_into(out);
    let _ = write!(out, "</{name}>");
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_success_payload() {
        let doc = XmlDocument::new(
            "person",
            XmlValue::map().push("pid", XmlValue::scalar("1800000001")),
        );
        assert_eq!(doc.encode(), "<person><pid>1800000001</pid></person>");
    }

    #[test]
    fn encodes_nested_error_document_in_key_order() {
        let error = XmlValue::map()
            .push("cause", XmlValue::scalar("X-Nintendo-Region"))
            .push("code", XmlValue::scalar("0002"))
            .push("message", XmlValue::scalar("X-Nintendo-Region format is invalid"));
        let doc = XmlDocument::new("errors", XmlValue::map().push("error", error));
        assert_eq!(
            doc.encode(),
            "<errors><error><cause>X-Nintendo-Region</cause><code>0002</code>\
             <message>X-Nintendo-Region format is invalid</message></error></errors>"
        );
    }

    #[test]
    fn omitted_fields_never_appear() {
        let error = XmlValue::map()
            .push_opt("cause", None)
            .push("code", XmlValue::scalar("0002"))
            .push("message", XmlValue::scalar("serialNumber format is invalid"));
        let doc = XmlDocument::new("errors", XmlValue::map().push("error", error));
        let encoded = doc.encode();
        assert!(!encoded.contains("<cause>"));
        assert!(encoded.starts_with("<errors><error><code>0002</code>"));
    }

    #[test]
    fn list_entries_render_as_repeated_siblings() {
        let image = |url: &str| {
            XmlValue::map().push(
                "mii_image",
                XmlValue::map().push("url", XmlValue::scalar(url)),
            )
        };
        let doc = XmlDocument::new(
            "mii_images",
            XmlValue::List(vec![image("a.tga"), image("b.tga")]),
        );
        assert_eq!(
            doc.encode(),
            "<mii_images><mii_image><url>a.tga</url></mii_image>\
             <mii_image><url>b.tga</url></mii_image></mii_images>"
        );
    }

    #[test]
    fn scalar_text_is_escaped() {
        let doc = XmlDocument::new(
            "person",
            XmlValue::map().push("user_id", XmlValue::scalar("a<b>&\"c'")),
        );
        assert_eq!(
            doc.encode(),
            "<person><user_id>a&lt;b&gt;&amp;&quot;c&apos;</user_id></person>"
        );
    }
}
