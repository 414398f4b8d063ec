//! HTML document access.
//!
//! Thin wrapper over `scraper` exposing exactly the node-selection
//! primitives extraction needs: select-all, select-first, text and
//! attribute lookup. Parsing is pure; malformed markup degrades the way
//! html5ever degrades it rather than failing outright, so the only hard
//! parse failure is invalid input encoding.

use scraper::{ElementRef, Html, Selector};

use super::parsing::{ParsingError, ParsingResult};

/// A parsed HTML document ready for structural queries.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse raw bytes into a queryable document.
    pub fn parse(bytes: &[u8]) -> ParsingResult<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| ParsingError::InvalidEncoding {
            reason: e.to_string(),
        })?;
        Ok(Self::from_html(text))
    }

    /// Parse an HTML string. Never fails: html5ever recovers from
    /// arbitrary markup.
    pub fn from_html(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All elements matching `selector`, in document order. Empty when
    /// nothing matches; never an error.
    pub fn select_all<'a>(&'a self, selector: &Selector) -> Vec<Node<'a>> {
        self.html.select(selector).map(Node::new).collect()
    }

    /// First element matching `selector`, if any.
    pub fn select_first<'a>(&'a self, selector: &Selector) -> Option<Node<'a>> {
        self.html.select(selector).next().map(Node::new)
    }

    /// Visible text of the whole document, space-joined. Used for marker
    /// phrase checks that take priority over structural extraction.
    pub fn full_text(&self) -> String {
        self.html
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A reference to one element within a parsed document.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> Node<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Concatenated visible text of this element, trimmed.
    pub fn text(&self) -> String {
        self.element.text().collect::<String>().trim().to_string()
    }

    /// Attribute value, if present on the element.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// First descendant matching `selector`, if any.
    pub fn select_first(&self, selector: &Selector) -> Option<Node<'a>> {
        self.element.select(selector).next().map(Node::new)
    }

    /// All descendants matching `selector`, in document order.
    pub fn select_all(&self, selector: &Selector) -> Vec<Node<'a>> {
        self.element.select(selector).map(Node::new).collect()
    }
}
