use std::fmt::Write as _;

/// The inline element a widget materialises as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineElement {
    pub tag: &'static str,
    pub class: &'static str,
    pub text: String,
    /// Attributes in insertion order.
    pub attributes: Vec<(&'static str, String)>,
    /// `false` keeps the host's caret out of the element.
    pub editable: bool,
}

impl InlineElement {
    pub fn new(tag: &'static str, class: &'static str) -> Self {
        Self {
            tag,
            class,
            text: String::new(),
            attributes: Vec::new(),
            editable: true,
        }
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Void elements render without text or a closing tag.
    fn is_void(&self) -> bool {
        self.tag == "hr"
    }

    /// HTML markup with escaped text and attribute values.
    pub fn to_html(&self) -> String {
        let mut out = format!("<{} class=\"{}\"", self.tag, self.class);
        for (name, value) in &self.attributes {
            let _ = write!(
                out,
                " {name}=\"{}\"",
                html_escape::encode_double_quoted_attribute(value)
            );
        }
        if !self.editable {
            out.push_str(" contenteditable=\"false\"");
        }
        if self.is_void() {
            out.push('>');
            return out;
        }
        let _ = write!(
            out,
            ">{}</{}>",
            html_escape::encode_text(&self.text),
            self.tag
        );
        out
    }
}
