//! Panel HTML inspection and rewriting.
//!
//! Panels are run through an HTML5 tokenizer rather than searched as text, so
//! `<HEAD lang="en">` or `<!doctype html>` are recognized like any other
//! spelling. Output bytes are otherwise identical to the input.

use lol_html::errors::RewritingError;
use lol_html::html_content::ContentType;
use lol_html::{RewriteStrSettings, doctype, element, rewrite_str};
use std::cell::Cell;

/// What a pass over a panel's HTML found, and the rewritten document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PanelDocument {
    pub has_head: bool,
    pub has_doctype: bool,
    pub html: String,
}

/// Scan `source` for `<head>` and a doctype, prepending `<h2>{heading}</h2>`
/// to the first `<body>` when a heading is given.
pub(crate) fn process_panel(
    source: &str,
    heading: Option<&str>,
) -> Result<PanelDocument, RewritingError> {
    let has_head = Cell::new(false);
    let has_doctype = Cell::new(false);
    let injected = Cell::new(false);
    let heading = heading.map(|title| format!("<h2>{}</h2>", escape_text(title)));

    let html = rewrite_str(
        source,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("head", |_el| {
                    has_head.set(true);
                    Ok(())
                }),
                element!("body", |el| {
                    if let Some(heading) = &heading {
                        if !injected.replace(true) {
                            el.prepend(heading, ContentType::Html);
                        }
                    }
                    Ok(())
                }),
            ],
            document_content_handlers: vec![doctype!(|_doctype| {
                has_doctype.set(true);
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;

    Ok(PanelDocument {
        has_head: has_head.get(),
        has_doctype: has_doctype.get(),
        html,
    })
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
