// Copyright 2026 Fale Relay Contributors
// SPDX-License-Identifier: Apache-2.0

//! Text-node rewriting over parsed markup.
//!
//! HTML is parsed with `scraper`, every text node outside
//! `<script>`/`<style>` has the replacement rules applied in place, and the
//! tree is serialized back out. XML (feeds, sitemaps, SVG) is streamed
//! through `quick-xml` with only text and CDATA events rewritten. In both
//! paths attributes (`href`, `src`, ...) and comments are never visited, so
//! links keep resolving to their original targets.

use std::borrow::Cow;

use quick_xml::events::{BytesCData, BytesText, Event};
use quick_xml::{Reader, Writer};
use scraper::{Html, Node, Selector};
use serde::{Deserialize, Serialize};

/// Elements whose text children are raw source, not prose.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A literal, case-sensitive substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRule {
    pub from: String,
    pub to: String,
}

impl ReplaceRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Yale → Fale in its title-case, upper-case and lower-case spellings.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Yale", "Fale"),
            Self::new("YALE", "FALE"),
            Self::new("yale", "fale"),
        ]
    }
}

/// Output of [`Rewriter::rewrite_html`] and [`Rewriter::rewrite_xml`].
#[derive(Debug, Clone)]
pub struct Rewritten {
    /// Serialized document after rewriting (HTML or XML, matching the input).
    pub html: String,
    /// Text of the first `<title>` element, after rewriting.
    pub title: Option<String>,
    /// Number of text nodes that changed.
    pub replaced: usize,
}

/// Applies a fixed rule set to the text content of markup documents.
#[derive(Debug, Clone)]
pub struct Rewriter {
    rules: Vec<ReplaceRule>,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new(ReplaceRule::defaults())
    }
}

impl Rewriter {
    /// Rules with an empty `from` would match everywhere and are dropped.
    pub fn new(rules: Vec<ReplaceRule>) -> Self {
        let rules = rules.into_iter().filter(|r| !r.from.is_empty()).collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[ReplaceRule] {
        &self.rules
    }

    /// Apply every rule to `text`, in order. Borrows when nothing matches.
    pub fn rewrite_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(text);
        for rule in &self.rules {
            if out.contains(rule.from.as_str()) {
                out = Cow::Owned(out.replace(rule.from.as_str(), &rule.to));
            }
        }
        out
    }

    /// Parse `html`, rewrite its text nodes and serialize the result.
    pub fn rewrite_html(&self, html: &str) -> Rewritten {
        let mut document = Html::parse_document(html);

        let mut pending = Vec::new();
        for node in document.tree.nodes() {
            let Node::Text(text) = node.value() else {
                continue;
            };
            let in_raw_text = node
                .parent()
                .and_then(|p| p.value().as_element().map(|el| el.name()))
                .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name));
            if in_raw_text {
                continue;
            }
            if let Cow::Owned(new_text) = self.rewrite_text(text) {
                pending.push((node.id(), new_text));
            }
        }

        let replaced = pending.len();
        for (id, new_text) in pending {
            if let Some(mut node) = document.tree.get_mut(id) {
                if let Node::Text(text) = node.value() {
                    text.text = new_text.as_str().into();
                }
            }
        }

        let title = Selector::parse("title").ok().and_then(|sel| {
            document
                .select(&sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
        });

        tracing::debug!(replaced, "rewrote document");

        Rewritten {
            html: document.html(),
            title,
            replaced,
        }
    }

    /// Rewrite an XML document, falling back to the HTML parser when the
    /// body is not well-formed.
    pub fn rewrite_markup_xml(&self, xml: &str) -> Rewritten {
        match self.rewrite_xml(xml) {
            Ok(out) => out,
            Err(e) => {
                tracing::debug!("XML rewrite failed, parsing as HTML: {e}");
                self.rewrite_html(xml)
            }
        }
    }

    /// Stream `xml` event by event, rewriting text and CDATA only.
    pub fn rewrite_xml(&self, xml: &str) -> anyhow::Result<Rewritten> {
        let mut reader = Reader::from_str(xml);
        let mut writer = Writer::new(Vec::with_capacity(xml.len()));

        let mut replaced = 0;
        let mut title: Option<String> = None;
        let mut in_title = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if title.is_none() && e.local_name().as_ref() == b"title" {
                        in_title = true;
                        title = Some(String::new());
                    }
                    writer.write_event(Event::Start(e))?;
                }
                Event::End(e) => {
                    if e.local_name().as_ref() == b"title" {
                        in_title = false;
                    }
                    writer.write_event(Event::End(e))?;
                }
                Event::Text(e) => {
                    let changed = {
                        let raw = e.unescape()?;
                        let new_text = self.rewrite_text(&raw);
                        if in_title {
                            if let Some(t) = title.as_mut() {
                                t.push_str(&new_text);
                            }
                        }
                        owned(new_text)
                    };
                    match changed {
                        Some(new_text) => {
                            replaced += 1;
                            writer.write_event(Event::Text(BytesText::new(&new_text)))?;
                        }
                        None => writer.write_event(Event::Text(e))?,
                    }
                }
                Event::CData(e) => {
                    let changed = owned(self.rewrite_text(std::str::from_utf8(&e)?));
                    match changed {
                        Some(new_text) => {
                            replaced += 1;
                            writer.write_event(Event::CData(BytesCData::new(new_text.as_str())))?;
                        }
                        None => writer.write_event(Event::CData(e))?,
                    }
                }
                Event::Eof => break,
                other => writer.write_event(other)?,
            }
        }

        tracing::debug!(replaced, "rewrote XML document");

        Ok(Rewritten {
            html: String::from_utf8(writer.into_inner())?,
            title: title.map(|t| t.trim().to_string()),
            replaced,
        })
    }
}

/// The rewritten text, or `None` when no rule matched.
fn owned(text: Cow<'_, str>) -> Option<String> {
    match text {
        Cow::Owned(s) => Some(s),
        Cow::Borrowed(_) => None,
    }
}
