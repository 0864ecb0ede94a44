//! Link-scan strategy for pages without a ranked list.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{canonical_link, image_alt, product_code, select_text, PRODUCT_LINK, RATING};
use crate::models::ListingItem;
use crate::utils::element_text;

/// How many ancestors above a link are searched for its item container.
pub const MAX_ANCESTOR_LEVELS: usize = 4;

/// Class fragments that mark an element as holding item details.
const CONTAINER_MARKERS: &[&str] = &["a-price", "a-icon-alt", "a-link-normal"];

static PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".a-price .a-offscreen").unwrap());

/// Extract one item per distinct product link, in document order.
///
/// Ranks are left unset; the caller assigns positions.
pub fn extract_from_links(document: &Html, base: Option<&Url>) -> Vec<ListingItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for link in document.select(&PRODUCT_LINK) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(code) = product_code(href) else {
            continue;
        };
        if !seen.insert(code.clone()) {
            continue;
        }

        let container = item_container(link, MAX_ANCESTOR_LEVELS);
        let title = image_alt(container).or_else(|| element_text(link));

        items.push(ListingItem {
            rank: None,
            title,
            link: canonical_link(base, href),
            identity: Some(code),
            price: select_text(container, &PRICE),
            rating: select_text(container, &RATING),
        });
    }

    items
}

/// Nearest of the link and its first `levels` ancestors that contains a
/// detail marker below it. The link itself when none does.
pub fn item_container(link: ElementRef<'_>, levels: usize) -> ElementRef<'_> {
    std::iter::once(link)
        .chain(link.ancestors().filter_map(ElementRef::wrap))
        .take(levels + 1)
        .find(|candidate| has_marker_below(*candidate))
        .unwrap_or(link)
}

fn has_marker_below(element: ElementRef<'_>) -> bool {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|el| {
            el.value()
                .classes()
                .any(|class| CONTAINER_MARKERS.iter().any(|m| class.contains(m)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_link(document: &Html) -> ElementRef<'_> {
        document.select(&PRODUCT_LINK).next().unwrap()
    }

    #[test]
    fn test_container_is_nearest_marked_ancestor() {
        let document = Html::parse_document(
            r#"<div id="outer"><span class="a-price">$9</span>
                 <div id="card"><span class="a-icon-alt">5 stars</span>
                   <p><a href="/dp/B0EEEEEEE1">x</a></p>
                 </div>
               </div>"#,
        );
        let container = item_container(first_link(&document), MAX_ANCESTOR_LEVELS);
        assert_eq!(container.value().attr("id"), Some("card"));
    }

    #[test]
    fn test_container_search_is_bounded() {
        let document = Html::parse_document(
            r#"<div id="far"><span class="a-price">$9</span>
                 <div><div><div><div><a href="/dp/B0EEEEEEE1">x</a></div></div></div></div>
               </div>"#,
        );
        let link = first_link(&document);
        assert_eq!(item_container(link, 4).value().name(), "a");
        assert_eq!(item_container(link, 5).value().attr("id"), Some("far"));
    }

    #[test]
    fn test_title_from_link_text_without_image() {
        let document = Html::parse_document(
            r#"<div><a class="a-link-normal" href="/dp/B0EEEEEEE1?ref=a">
                Mushroom  Forager Tee </a></div>"#,
        );
        let base = Url::parse("https://www.amazon.com").ok();
        let items = extract_from_links(&document, base.as_ref());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_deref(), Some("Mushroom Forager Tee"));
        assert_eq!(items[0].rank, None);
        assert_eq!(items[0].link.as_deref(), Some("https://www.amazon.com/dp/B0EEEEEEE1"));
    }
}
