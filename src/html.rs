//! Visible text and outbound links from a fetched schedule page.

use html_scraper::{Html, Selector};
use indexmap::IndexMap;
use std::sync::LazyLock;
use url::Url;

use crate::utils::normalize_domain;

/// Elements whose text never renders.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// A parsed schedule page.
pub struct SchedulePage {
    html: Html,
}

/// An `<a href>` with its visible label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorLink {
    pub label: String,
    pub href: String,
}

impl SchedulePage {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// All visible text nodes, trimmed, joined by single spaces.
    pub fn flattened_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for node in self.html.tree.root().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                parts.push(trimmed);
            }
        }
        parts.join(" ")
    }

    /// Every anchor with an `href`, in document order.
    ///
    /// The label is the anchor's text pieces, each trimmed, concatenated
    /// without a separator: `<a><b>Duke</b> <i>Blue Devils</i></a>` becomes
    /// `DukeBlue Devils`.
    pub fn anchors(&self) -> Vec<AnchorLink> {
        self.html
            .select(&ANCHOR_SEL)
            .filter_map(|el| {
                let href = el.value().attr("href")?;
                let label: String = el.text().map(str::trim).collect();
                Some(AnchorLink {
                    label,
                    href: href.to_string(),
                })
            })
            .collect()
    }

    /// Lookup of external link labels to their domains, excluding links back
    /// to `page_domain`.
    pub fn domain_lookup(&self, page_domain: &str) -> DomainLookup {
        DomainLookup::from_anchors(&self.anchors(), page_domain)
    }
}

/// Lowercased link label → bare domain, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainLookup {
    entries: IndexMap<String, String>,
}

impl DomainLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep anchors with an absolute `http…` href, a non-empty label and a
    /// domain that does not contain `page_domain`.
    pub fn from_anchors(anchors: &[AnchorLink], page_domain: &str) -> Self {
        let mut lookup = Self::new();
        for anchor in anchors {
            if !anchor.href.starts_with("http") || anchor.label.is_empty() {
                continue;
            }
            let Ok(url) = Url::parse(&anchor.href) else {
                continue;
            };
            let Some(host) = url.host_str() else {
                continue;
            };
            let domain = normalize_domain(host);
            if domain.is_empty() || domain.contains(page_domain) {
                continue;
            }
            lookup.insert(&anchor.label, domain);
        }
        lookup
    }

    /// Re-inserting a label replaces its domain but keeps its position.
    pub fn insert(&mut self, label: &str, domain: &str) {
        self.entries
            .insert(label.to_lowercase(), domain.to_string());
    }

    /// `(label, domain)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
