//! Markdown output
//!
//! A record is rendered as a YAML front-matter header followed by its body
//! converted from HTML to Markdown:
//!
//! ```text
//! ---
//! aid: 42
//! title: Hello
//! ...
//! ---
//!
//! first post
//! ```
//!
//! The body field (`content`, `about` or `description`) is left out of the
//! header. Comment contents stay in the header, converted to Markdown as well.

use crate::output::traits::{RecordSerializer, SerializeError, SerializeResult};
use crate::record::PageRecord;
use htmd::{Element, HtmlToMarkdown};
use scraper::Html;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownSerializer;

impl RecordSerializer for MarkdownSerializer {
    fn extension(&self) -> &str {
        "md"
    }

    fn serialize(&self, record: &PageRecord) -> SerializeResult<Vec<u8>> {
        Ok(render_markdown(record)?.into_bytes())
    }
}

/// Header-minus-body view of a record plus its converted body
#[derive(Debug, Clone)]
pub struct MarkdownProjection {
    pub header: serde_yaml::Value,
    pub body: String,
}

/// Splits a record into its front-matter header and Markdown body
///
/// The record itself is untouched; the projection works on a copy.
pub fn project(record: &PageRecord) -> SerializeResult<MarkdownProjection> {
    let mut header_record = record.clone();
    if let PageRecord::Article(article) = &mut header_record {
        for comment in &mut article.comments {
            comment.content = html_to_markdown(&comment.content);
        }
    }

    let mut header = serde_yaml::to_value(&header_record)?;
    match &mut header {
        serde_yaml::Value::Mapping(map) => {
            map.remove(record.body_field());
        }
        _ => {
            return Err(SerializeError::Markdown(format!(
                "{} record did not encode as a mapping",
                record.kind()
            )))
        }
    }

    let body = record.body().map(html_to_markdown).unwrap_or_default();

    Ok(MarkdownProjection { header, body })
}

/// Renders a record as front matter plus Markdown body
pub fn render_markdown(record: &PageRecord) -> SerializeResult<String> {
    let projection = project(record)?;

    let mut md = String::new();
    md.push_str("---\n");
    md.push_str(&serde_yaml::to_string(&projection.header)?);
    md.push_str("---\n");
    md.push('\n');
    md.push_str(&projection.body);
    md.push('\n');

    Ok(md)
}

/// Tags with no Markdown form; they are kept as HTML
const EMBED_TAGS: [&str; 5] = ["iframe", "video", "audio", "embed", "object"];

fn converter() -> &'static HtmlToMarkdown {
    static CONVERTER: OnceLock<HtmlToMarkdown> = OnceLock::new();
    CONVERTER.get_or_init(|| {
        HtmlToMarkdown::builder()
            .add_handler(EMBED_TAGS.to_vec(), |element: Element| {
                Some(rebuild_html(&element))
            })
            .add_handler(vec!["div"], |element: Element| {
                if has_class(&element, "videowrapper") {
                    Some(format!("\n\n{}\n\n", rebuild_html(&element)))
                } else {
                    Some(format!("\n\n{}\n\n", element.content))
                }
            })
            .build()
    })
}

fn has_class(element: &Element, class: &str) -> bool {
    element.attrs.iter().any(|attr| {
        &*attr.name.local == "class" && attr.value.split_whitespace().any(|c| c == class)
    })
}

/// Re-serializes an element around its already converted content
fn rebuild_html(element: &Element) -> String {
    let mut html = format!("<{}", element.tag);
    for attr in element.attrs {
        html.push_str(&format!(
            " {}=\"{}\"",
            &*attr.name.local,
            attr.value.replace('&', "&amp;").replace('"', "&quot;")
        ));
    }
    html.push('>');
    if element.tag != "embed" {
        html.push_str(element.content);
        html.push_str(&format!("</{}>", element.tag));
    }
    html
}

/// Converts an HTML fragment to Markdown
///
/// Media embeds are kept as HTML. Falls back to the fragment's plain text if
/// the converter rejects it.
pub fn html_to_markdown(html: &str) -> String {
    let converted = converter().convert(html).unwrap_or_else(|_| {
        let fragment = Html::parse_fragment(html);
        fragment.root_element().text().collect::<String>()
    });
    converted.trim().to_string()
}
