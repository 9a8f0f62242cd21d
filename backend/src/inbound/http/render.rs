//! Minimal HTML documents for the page scaffolds.
//!
//! Every interpolated string goes through `html_escape`, so callers pass
//! raw data.

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::domain::read_css_variable;

const BRAND_VARIABLE: &str = "--brand";
const BRAND_FALLBACK: &str = "#0f766e";

/// Builder for one scaffold page.
///
/// # Examples
/// ```
/// use portal_backend::inbound::http::render::Page;
///
/// let html = Page::new("Fleet <cars>").paragraph("2 records").into_html();
/// assert!(html.contains("<title>Fleet &lt;cars&gt;</title>"));
/// ```
#[derive(Debug, Clone)]
pub struct Page {
    title: String,
    blocks: Vec<String>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    #[must_use]
    pub fn heading(mut self, text: &str) -> Self {
        self.blocks.push(format!("<h2>{}</h2>", encode_text(text)));
        self
    }

    #[must_use]
    pub fn paragraph(mut self, text: &str) -> Self {
        self.blocks.push(format!("<p>{}</p>", encode_text(text)));
        self
    }

    /// Label/value rows rendered as a definition list.
    #[must_use]
    pub fn details<'a>(mut self, rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let items: String = rows
            .into_iter()
            .map(|(label, value)| {
                format!("<dt>{}</dt><dd>{}</dd>", encode_text(label), encode_text(value))
            })
            .collect();
        self.blocks.push(format!("<dl>{items}</dl>"));
        self
    }

    /// Bulleted list of plain items.
    #[must_use]
    pub fn list<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items: String = items
            .into_iter()
            .map(|item| format!("<li>{}</li>", encode_text(item.as_ref())))
            .collect();
        self.blocks.push(format!("<ul>{items}</ul>"));
        self
    }

    /// Bulleted list of `(label, href)` links.
    #[must_use]
    pub fn links<'a>(mut self, links: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let items: String = links
            .into_iter()
            .map(|(label, href)| {
                format!(
                    "<li><a href=\"{}\">{}</a></li>",
                    encode_double_quoted_attribute(href),
                    encode_text(label)
                )
            })
            .collect();
        self.blocks.push(format!("<ul>{items}</ul>"));
        self
    }

    pub fn into_html(self) -> String {
        let brand = read_css_variable(None, BRAND_VARIABLE, BRAND_FALLBACK);
        let title = encode_text(&self.title);
        format!(
            "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>{title}</title>\
             <style>:root{{{BRAND_VARIABLE}:{brand}}}h1{{color:var({BRAND_VARIABLE})}}</style>\
             </head><body><h1>{title}</h1>{body}</body></html>",
            brand = encode_text(&brand),
            body = self.blocks.concat(),
        )
    }

    /// `200 OK` with the rendered document.
    pub fn into_response(self) -> HttpResponse {
        HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(self.into_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn escapes_interpolated_text() {
        let html = Page::new("Profile")
            .details([("Name", "<script>alert(1)</script>")])
            .links([("Home", "/x?a=1&b=\"2\"")])
            .into_html();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("href=\"/x?a=1&amp;b=&quot;2&quot;\""));
    }

    #[rstest]
    fn brand_colour_uses_fallback_outside_a_browser() {
        let html = Page::new("Home").into_html();
        assert!(html.contains(&format!("--brand:{BRAND_FALLBACK}")));
    }

    #[rstest]
    fn blocks_keep_insertion_order() {
        let html = Page::new("T")
            .heading("first")
            .paragraph("second")
            .list(["third"])
            .into_html();
        let first = html.find("first").expect("first");
        let second = html.find("second").expect("second");
        let third = html.find("third").expect("third");
        assert!(first < second && second < third);
    }
}
