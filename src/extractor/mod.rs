//! Metadata extraction from fetched HTML.
//!
//! Each field is described by an ordered list of [`Rule`]s. The first rule
//! that yields a non-empty, trimmed value wins.

use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, AppResult};
use crate::models::PreviewMetadata;

/// One place a metadata value may be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `<meta property="..." content="...">` (Open Graph).
    Property(&'static str),
    /// `<meta name="..." content="...">`, also accepting `property="..."`
    /// since card tags are published both ways.
    Card(&'static str),
    /// `<meta name="..." content="...">`.
    Name(&'static str),
    /// `<meta itemprop="..." content="...">`.
    ItemProp(&'static str),
    /// Text content of the first matching element.
    Text(&'static str),
}

pub const TITLE_RULES: &[Rule] = &[
    Rule::Property("og:title"),
    Rule::Card("twitter:title"),
    Rule::Name("title"),
    Rule::Text("title"),
    Rule::Text("h1"),
];

pub const DESCRIPTION_RULES: &[Rule] = &[
    Rule::Property("og:description"),
    Rule::Card("twitter:description"),
    Rule::Name("description"),
    Rule::ItemProp("description"),
];

pub const IMAGE_RULES: &[Rule] = &[
    Rule::Property("og:image"),
    Rule::Property("og:image:url"),
    Rule::Card("twitter:image"),
    Rule::Card("twitter:image:src"),
    Rule::ItemProp("image"),
];

pub const SITE_NAME_RULES: &[Rule] = &[
    Rule::Property("og:site_name"),
    Rule::Name("application-name"),
];

impl Rule {
    fn selector(&self) -> Option<Selector> {
        let css = match self {
            Rule::Property(p) => format!(r#"meta[property="{p}"]"#),
            Rule::Card(n) => format!(r#"meta[name="{n}"], meta[property="{n}"]"#),
            Rule::Name(n) => format!(r#"meta[name="{n}"]"#),
            Rule::ItemProp(n) => format!(r#"meta[itemprop="{n}"]"#),
            Rule::Text(tag) => (*tag).to_string(),
        };
        Selector::parse(&css).ok()
    }

    /// Evaluate against `doc`, returning the trimmed value if non-empty.
    pub fn eval(&self, doc: &Html) -> Option<String> {
        let selector = self.selector()?;
        let element = doc.select(&selector).next()?;
        let raw = match self {
            Rule::Text(_) => element.text().collect::<String>(),
            _ => element.value().attr("content")?.to_string(),
        };
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Walk `rules` in order and return the first non-empty value.
pub fn first_match(doc: &Html, rules: &[Rule]) -> Option<String> {
    rules.iter().find_map(|rule| rule.eval(doc))
}

/// Parse `html` and build the metadata record for `source`.
///
/// `raw_url` is echoed verbatim into the record; `source` is its parsed form
/// and supplies the hostname fallback and the base for relative images.
pub fn extract_metadata(html: &str, raw_url: &str, source: &Url) -> AppResult<PreviewMetadata> {
    let document = Html::parse_document(html);

    let title = first_match(&document, TITLE_RULES).unwrap_or_default();
    let description = first_match(&document, DESCRIPTION_RULES).unwrap_or_default();
    let image = match first_match(&document, IMAGE_RULES) {
        Some(image) => resolve_image(&image, source)?,
        None => String::new(),
    };
    let site_name = first_match(&document, SITE_NAME_RULES)
        .or_else(|| source.host_str().map(|h| h.to_string()))
        .unwrap_or_default();

    Ok(PreviewMetadata {
        url: raw_url.to_string(),
        title,
        description,
        image,
        site_name,
    })
}

/// Make `image` absolute against the root of `source`'s origin.
///
/// Values that already parse as absolute URLs are kept. Protocol-relative
/// values (`//cdn/...`) take the source's scheme. Anything else is resolved
/// from the host root, not from the page's path.
pub fn resolve_image(image: &str, source: &Url) -> AppResult<String> {
    let image = image.trim();
    if image.is_empty() || Url::parse(image).is_ok() {
        return Ok(image.to_string());
    }
    if image.starts_with("//") {
        return Ok(format!("{}:{}", source.scheme(), image));
    }

    let root = source
        .join("/")
        .map_err(|e| AppError::Extraction(format!("cannot resolve image against {source}: {e}")))?;
    root.join(image.trim_start_matches('/'))
        .map(|resolved| resolved.to_string())
        .map_err(|e| AppError::Extraction(format!("cannot resolve image {image}: {e}")))
}
