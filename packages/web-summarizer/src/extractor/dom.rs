//! DOM traversal on top of `scraper`.
//!
//! Reduces a parsed document to what the extractor needs: the title, one
//! [`NodeRecord`] per candidate container, and the paragraph text of a chosen
//! container. Boilerplate subtrees are skipped everywhere.

use scraper::{ElementRef, Html, Node, Selector};

use super::scoring::NodeRecord;
use super::text::{collapse_whitespace, strip_markup};

/// Tags dropped with their whole subtree.
const REMOVED_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "footer", "header", "aside", "iframe", "form",
    "template", "svg", "button", "select", "object", "embed",
];

/// class/id tokens marking navigation, ads and other page furniture.
const BOILERPLATE_TOKENS: &[&str] = &[
    "nav", "navigation", "navbar", "ad", "ads", "advert", "advertisement", "sponsored",
    "sidebar", "footer", "header", "menu", "comment", "comments", "social", "share", "sharing",
    "related", "recommended", "popup", "modal", "banner", "cookie", "newsletter", "breadcrumb",
    "breadcrumbs",
];

/// Never removed because of their class or id.
const PROTECTED_TAGS: &[&str] = &["html", "body", "article", "main"];

/// Containers eligible to become the content root.
const CANDIDATE_TAGS: &[&str] = &["article", "main", "section", "div", "td", "blockquote", "body"];

const PARAGRAPH_TAGS: &[&str] = &["p", "pre", "blockquote"];

/// Elements that start a new paragraph in the output.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul",
    "ol", "blockquote", "pre", "table", "tr", "td", "th", "dl", "dt", "dd", "figure",
    "figcaption", "br", "hr", "address", "details", "summary", "body",
];

/// Lowercased class and id tokens, split on whitespace, `-` and `_`.
pub fn class_id_tokens(element: ElementRef<'_>) -> Vec<String> {
    let el = element.value();
    el.attr("class")
        .into_iter()
        .chain(el.attr("id"))
        .flat_map(|value| value.split(|c: char| c.is_whitespace() || c == '-' || c == '_'))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

pub fn is_boilerplate(element: ElementRef<'_>) -> bool {
    let el = element.value();
    let tag = el.name();

    if REMOVED_TAGS.contains(&tag) || el.attr("hidden").is_some() {
        return true;
    }
    if el.attr("aria-hidden") == Some("true") {
        return true;
    }
    if PROTECTED_TAGS.contains(&tag) {
        return false;
    }

    class_id_tokens(element)
        .iter()
        .any(|token| BOILERPLATE_TOKENS.contains(&token.as_str()))
}

/// Visible text of one subtree, split into paragraphs.
#[derive(Debug, Default)]
pub struct TextCollector {
    paragraphs: Vec<String>,
    current: String,
    link_depth: usize,
    link_chars: usize,
    paragraph_blocks: usize,
}

impl TextCollector {
    pub fn collect(root: ElementRef<'_>) -> Self {
        let mut collector = Self::default();
        collector.walk(root);
        collector.flush();
        collector
    }

    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    if self.link_depth > 0 {
                        self.link_chars += collapse_whitespace(text).chars().count();
                    }
                    self.current.push_str(text);
                }
                Node::Element(_) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if is_boilerplate(child) {
                        continue;
                    }
                    self.visit(child);
                }
                _ => {}
            }
        }
    }

    fn visit(&mut self, element: ElementRef<'_>) {
        let tag = element.value().name();
        let block = BLOCK_TAGS.contains(&tag);
        let is_link = tag == "a";

        if block {
            self.flush();
        }

        let before = self.paragraphs.len();
        if is_link {
            self.link_depth += 1;
        }
        self.walk(element);
        if is_link {
            self.link_depth -= 1;
        }

        if block {
            self.flush();
        }
        if PARAGRAPH_TAGS.contains(&tag) && self.paragraphs.len() > before {
            self.paragraph_blocks += 1;
        }
    }

    fn flush(&mut self) {
        let paragraph = strip_markup(&collapse_whitespace(&self.current));
        if !paragraph.is_empty() {
            self.paragraphs.push(paragraph);
        }
        self.current.clear();
    }

    pub fn into_paragraphs(self) -> Vec<String> {
        self.paragraphs
    }

    /// Characters of the paragraphs joined with single spaces.
    pub fn text_len(&self) -> usize {
        let chars: usize = self.paragraphs.iter().map(|p| p.chars().count()).sum();
        chars + self.paragraphs.len().saturating_sub(1)
    }

    pub fn link_text_len(&self) -> usize {
        self.link_chars
    }

    pub fn paragraph_blocks(&self) -> usize {
        self.paragraph_blocks
    }
}

/// A candidate container paired with its record.
pub struct Candidate<'a> {
    pub element: ElementRef<'a>,
    pub record: NodeRecord,
}

/// Every non-boilerplate candidate container holding at least one paragraph,
/// in document order.
pub fn candidates(document: &Html) -> Vec<Candidate<'_>> {
    let mut found = Vec::new();
    gather(document.root_element(), &mut found);
    found
}

fn gather<'a>(element: ElementRef<'a>, found: &mut Vec<Candidate<'a>>) {
    if CANDIDATE_TAGS.contains(&element.value().name()) {
        let collected = TextCollector::collect(element);
        if collected.paragraph_blocks() > 0 {
            found.push(Candidate {
                element,
                record: record_for(element, &collected),
            });
        }
    }

    for child in element.children().filter_map(ElementRef::wrap) {
        if !is_boilerplate(child) {
            gather(child, found);
        }
    }
}

fn record_for(element: ElementRef<'_>, collected: &TextCollector) -> NodeRecord {
    let ancestor_tokens = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .flat_map(class_id_tokens)
        .collect();

    NodeRecord {
        tag: element.value().name().to_string(),
        text_len: collected.text_len(),
        link_text_len: collected.link_text_len(),
        markup_len: element.html().len(),
        paragraph_count: collected.paragraph_blocks(),
        own_tokens: class_id_tokens(element),
        ancestor_tokens,
    }
}

/// `<body>`, or the document root when the parser produced none.
pub fn body(document: &Html) -> ElementRef<'_> {
    Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element())
}

/// Title from `<title>`, then the first `<h1>`, then `og:title`.
pub fn title(document: &Html) -> Option<String> {
    first_text(document, "title")
        .or_else(|| first_text(document, "h1"))
        .or_else(|| {
            let selector = Selector::parse(r#"meta[property="og:title"]"#).ok()?;
            document
                .select(&selector)
                .filter_map(|meta| meta.value().attr("content"))
                .map(collapse_whitespace)
                .find(|content| !content.is_empty())
        })
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .find(|text| !text.is_empty())
}
