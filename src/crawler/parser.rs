//! HTML parser for ranking pages and movie pages
//!
//! This module turns raw HTML into typed records:
//! - Movie links from a top-list page
//! - Title and cast from a movie page
//!
//! Parsing is pure: no I/O and no shared state.

use crate::crawler::{Actor, MoviePagePartial};
use crate::ParsingError;
use scraper::{ElementRef, Html, Selector};

/// Anchors naming a movie inside the ranking's content region
const TOP_LIST_LINK_SELECTOR: &str = "div.tab-content a.film-title-name";

/// The movie title heading
const TITLE_SELECTOR: &str = "h1";

/// Container holding every creators block (director, music, cast, ...)
const CREATORS_SELECTOR: &str = "#creators";

const CAST_HEADING_SELECTOR: &str = "h4";

/// Cast anchors, minus the "show more" toggle
const ACTOR_LINK_SELECTOR: &str = "a:not(.more)";

/// Label of the block listing the starring actors
const CAST_MARKER: &str = "Hrají:";

/// Parses a ranking page and returns its movie links in document order
///
/// A page without any matching anchor yields an empty list.
///
/// # Example
///
/// ```
/// use top_reel::crawler::parse_top_list;
///
/// let html = r#"<div class="tab-content"><a class="film-title-name" href="/film/1/">A</a></div>"#;
/// assert_eq!(parse_top_list(html), vec!["/film/1/".to_string()]);
/// ```
pub fn parse_top_list(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let link_selector = match selector(TOP_LIST_LINK_SELECTOR) {
        Ok(link_selector) => link_selector,
        Err(e) => {
            tracing::error!("Cannot parse top list: {}", e);
            return Vec::new();
        }
    };

    document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Parses a movie page into its title and ordered cast
///
/// # Rules
///
/// 1. The first `<h1>` is the title; without one the page is rejected.
/// 2. Exactly one `#creators` container must exist. Zero or several are
///    rejected rather than guessed at.
/// 3. The first direct child `<div>` whose `<h4>` contains "Hrají:" is the
///    cast block. Later blocks are never inspected.
/// 4. Every anchor in the cast block except `.more` controls becomes an
///    actor, provided it has both an `href` and visible text.
/// 5. No cast block means an empty cast, not an error.
pub fn parse_movie_page(html: &str) -> Result<MoviePagePartial, ParsingError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selector(TITLE_SELECTOR)?)
        .next()
        .map(|h1| stripped_text(&h1))
        .ok_or_else(|| ParsingError::new("missing title element in movie page"))?;

    let creators: Vec<ElementRef> = document.select(&selector(CREATORS_SELECTOR)?).collect();
    let creators = match creators.as_slice() {
        [] => {
            return Err(ParsingError::new(
                "missing creators section in movie page",
            ))
        }
        [single] => *single,
        _ => {
            return Err(ParsingError::new(
                "multiple creators sections in movie page",
            ))
        }
    };

    let heading = selector(CAST_HEADING_SELECTOR)?;
    let actor_links = selector(ACTOR_LINK_SELECTOR)?;

    let cast_block = creators
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|block| block.value().name() == "div")
        .find(|block| {
            block
                .select(&heading)
                .next()
                .is_some_and(|h4| h4.text().collect::<String>().contains(CAST_MARKER))
        });

    let actors = match cast_block {
        Some(block) => block
            .select(&actor_links)
            .filter_map(|anchor| {
                let url = anchor.value().attr("href")?;
                let name = stripped_text(&anchor);
                (!url.is_empty() && !name.is_empty()).then(|| Actor {
                    name,
                    url: url.to_string(),
                })
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(MoviePagePartial { title, actors })
}

fn selector(css: &str) -> Result<Selector, ParsingError> {
    Selector::parse(css).map_err(|e| ParsingError::new(format!("invalid selector '{}': {}", css, e)))
}

/// Concatenates the element's text nodes, each trimmed
fn stripped_text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect()
}
