//! Structural edits on trusted HTML fragments.
//!
//! Fragments are parsed with `scraper` to find anchors, ids and radio inputs.
//! Each parsed element is paired with its start tag in the source by tag name
//! and document order, and edits are spliced into the source text, so markup
//! that is not edited comes back byte for byte.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::model::{PageLink, PageName};

/// Attribute marking an anchor as routed through the page navigator.
pub const PAGE_ATTRIBUTE: &str = "data-page";

static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([A-Za-z][A-Za-z0-9-]*)(?:[^>"']|"[^"]*"|'[^']*')*>"#)
        .expect("start tag pattern")
});
static END_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</([A-Za-z][A-Za-z0-9-]*)\s*>").expect("end tag pattern"));
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern"));

/// Fragment markup after relative anchors were marked for interception.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewrittenFragment {
    pub markup: String,
    pub links: Vec<PageLink>,
}

/// Mark every same-origin relative anchor with `data-page="<name>"` and
/// collect the links.
///
/// External links and absolute paths are left untouched. Anchors that
/// already carry the attribute are kept as they are, so rewriting is
/// idempotent. Markup the parser has to restructure (misnested anchors) is
/// reported in `links` but left unmarked.
#[must_use]
pub fn rewrite_relative_links(markup: &str) -> RewrittenFragment {
    let document = Html::parse_fragment(markup);
    let anchors = elements_named(&document, "a");
    let spans = tag_spans(&START_TAG, markup, "a");
    let aligned = anchors.len() == spans.len();

    let mut links = Vec::new();
    let mut edits = Vec::new();
    for (index, anchor) in anchors.iter().enumerate() {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(page) = PageName::from_href(href) else {
            continue;
        };
        if aligned && anchor.value().attr(PAGE_ATTRIBUTE).is_none() {
            edits.push((
                attribute_slot(markup, &spans[index]),
                format!(r#" {PAGE_ATTRIBUTE}="{page}""#),
            ));
        }
        links.push(PageLink {
            href: href.to_owned(),
            page,
        });
    }

    RewrittenFragment {
        markup: splice(markup, edits),
        links,
    }
}

/// Whether an element with this exact `id` is present.
#[must_use]
pub fn element_exists(markup: &str, id: &str) -> bool {
    let document = Html::parse_fragment(markup);
    all_elements(&document).any(|el| el.value().id() == Some(id))
}

/// Replace the children of the element whose `id` is `id`.
///
/// Returns `None` when no such element exists or it has no closing tag.
#[must_use]
pub fn fill_element(markup: &str, id: &str, inner: &str) -> Option<String> {
    let document = Html::parse_fragment(markup);
    let elements: Vec<ElementRef<'_>> = all_elements(&document).collect();
    let at = elements.iter().position(|el| el.value().id() == Some(id))?;
    let target = elements[at];
    let name = target.value().name();

    let starts = tag_spans(&START_TAG, markup, name);
    let same_name = elements.iter().filter(|el| el.value().name() == name).count();
    if starts.len() != same_name {
        return None;
    }
    let ordinal = elements[..at]
        .iter()
        .filter(|el| el.value().name() == name)
        .count();
    let nested = target
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == name)
        .count();

    let open = starts.get(ordinal)?.clone();
    let close = tag_spans(&END_TAG, markup, name)
        .into_iter()
        .filter(|span| span.start >= open.end)
        .nth(nested)?;

    let mut out = String::with_capacity(markup.len() + inner.len());
    out.push_str(&markup[..open.end]);
    out.push_str(inner);
    out.push_str(&markup[close.start..]);
    Some(out)
}

/// Mark the `index`-th radio input (by position) as checked.
///
/// Out-of-range positions leave the markup unchanged.
#[must_use]
pub fn check_radio(markup: &str, index: usize) -> String {
    let document = Html::parse_fragment(markup);
    let inputs = elements_named(&document, "input");
    let spans = tag_spans(&START_TAG, markup, "input");
    if inputs.len() != spans.len() {
        return markup.to_owned();
    }

    let radio = inputs
        .iter()
        .zip(&spans)
        .filter(|(input, _)| {
            input
                .value()
                .attr("type")
                .is_some_and(|kind| kind.eq_ignore_ascii_case("radio"))
        })
        .nth(index);
    match radio {
        Some((input, span)) if input.value().attr("checked").is_none() => splice(
            markup,
            vec![(attribute_slot(markup, span), r#" checked="checked""#.to_owned())],
        ),
        _ => markup.to_owned(),
    }
}

/// Append `children` as the last children of the root element of `parent`.
#[must_use]
pub fn append_children(parent: &str, children: &str) -> String {
    let body = parent.trim_end();
    let document = Html::parse_fragment(body);
    let close = document
        .root_element()
        .children()
        .find_map(ElementRef::wrap)
        .and_then(|root| tag_spans(&END_TAG, body, root.value().name()).pop());
    match close {
        Some(span) => format!("{}{}{}", &body[..span.start], children, &body[span.start..]),
        None => format!("{body}{children}"),
    }
}

/// Elements of the fragment in document order, without the synthetic root.
fn all_elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
}

fn elements_named<'a>(document: &'a Html, name: &str) -> Vec<ElementRef<'a>> {
    all_elements(document)
        .filter(|el| el.value().name() == name)
        .collect()
}

/// Source spans of the tags named `name` matched by `pattern`, outside comments.
fn tag_spans(pattern: &Regex, markup: &str, name: &str) -> Vec<Range<usize>> {
    let comments: Vec<Range<usize>> = COMMENT.find_iter(markup).map(|m| m.range()).collect();
    pattern
        .captures_iter(markup)
        .filter(|tag| tag[1].eq_ignore_ascii_case(name))
        .filter_map(|tag| tag.get(0))
        .map(|tag| tag.range())
        .filter(|span| !comments.iter().any(|comment| comment.contains(&span.start)))
        .collect()
}

/// Byte offset right before the `>` or `/>` closing a start tag.
fn attribute_slot(markup: &str, span: &Range<usize>) -> usize {
    if markup[span.clone()].ends_with("/>") {
        span.end - 2
    } else {
        span.end - 1
    }
}

fn splice(markup: &str, mut edits: Vec<(usize, String)>) -> String {
    edits.sort_by_key(|(at, _)| *at);
    let added: usize = edits.iter().map(|(_, insert)| insert.len()).sum();
    let mut out = String::with_capacity(markup.len() + added);
    let mut last = 0;
    for (at, insert) in edits {
        out.push_str(&markup[last..at]);
        out.push_str(&insert);
        last = at;
    }
    out.push_str(&markup[last..]);
    out
}
