//! Email address extraction from HTML
//!
//! Two independent passes over a page, unioned into one set:
//! - `<a href="mailto:...">` links
//! - address-shaped tokens in the page's visible text

use ego_tree::NodeRef;
use regex::Regex;
use scraper::{node::Node, Html, Selector};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Elements whose text content is never rendered
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Elements rendered on their own line or cell; text on either side never fuses
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td",
    "tfoot", "th", "thead", "title", "tr", "ul",
];

/// `local-part@domain.tld` restricted to a closed set of top-level suffixes
const EMAIL_PATTERN: &str =
    r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.(?i:com|org|net|edu|gov|mil)\b";

const MAILTO_SCHEME: &str = "mailto:";

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"))
}

/// Extracts the distinct email addresses published on a page
///
/// Pure: the same input always yields the same set, and it is safe to call
/// from many tasks at once.
///
/// # Example
///
/// ```
/// use contact_harvest::harvest::extract_emails;
///
/// let html = r#"<a href="mailto:info@example.com">Mail</a><p>Reach sales@example.com</p>"#;
/// let emails = extract_emails(html);
/// assert!(emails.contains("info@example.com"));
/// assert!(emails.contains("sales@example.com"));
/// ```
pub fn extract_emails(html: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);

    let mut emails = extract_mailto_links(&document);
    emails.extend(extract_text_emails(&visible_text(&document)));
    emails
}

/// Collects addresses from `mailto:` hyperlinks
///
/// The header section (`?subject=...`) is dropped and comma-separated
/// recipient lists are split.
fn extract_mailto_links(document: &Html) -> BTreeSet<String> {
    let mut emails = BTreeSet::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return emails;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(address_part) = strip_mailto(href.trim()) else {
            continue;
        };

        let recipients = address_part.split('?').next().unwrap_or_default();
        for recipient in recipients.split(',') {
            let email = clean_email(recipient);
            if !email.is_empty() {
                emails.insert(email);
            }
        }
    }

    emails
}

/// Collects address-shaped tokens from text
fn extract_text_emails(text: &str) -> BTreeSet<String> {
    email_regex()
        .find_iter(text)
        .map(|m| clean_email(m.as_str()))
        .filter(|email| !email.is_empty())
        .collect()
}

/// Concatenates the page's rendered text
///
/// Inline markup is joined directly, so `info@<b>example.com</b>` reads as one
/// token; block boundaries become a space.
fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    collect_text(&document.tree.root(), &mut text);
    text
}

fn collect_text(node: &NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(fragment) => out.push_str(fragment),
        Node::Element(element) => {
            let name = element.name();
            if HIDDEN_ELEMENTS.contains(&name) {
                return;
            }

            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push(' ');
            }
            for child in node.children() {
                collect_text(&child, out);
            }
            if block {
                out.push(' ');
            }
        }
        _ => {
            for child in node.children() {
                collect_text(&child, out);
            }
        }
    }
}

/// Case-insensitive `mailto:` prefix strip
fn strip_mailto(href: &str) -> Option<&str> {
    let prefix = href.get(..MAILTO_SCHEME.len())?;
    if prefix.eq_ignore_ascii_case(MAILTO_SCHEME) {
        Some(&href[MAILTO_SCHEME.len()..])
    } else {
        None
    }
}

/// Decodes percent-escapes (e.g. `%20`) and trims surrounding whitespace
pub fn clean_email(raw: &str) -> String {
    let decoded = urlencoding::decode_binary(raw.as_bytes());
    String::from_utf8_lossy(&decoded).trim().to_string()
}
