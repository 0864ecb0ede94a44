//! Ordered-list strategy.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use url::Url;

use super::{canonical_link, image_alt, product_link, select_text, RATING};
use crate::models::ListingItem;
use crate::utils::element_text;

static ENTRY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static RANK_BADGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".zg-badge-text, .a-badge-text, .zg-rank-number").unwrap());
static TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.a-link-normal").unwrap());
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".a-price .a-offscreen, .p13n-sc-price").unwrap());

/// Extract one item per list entry that links to a product.
///
/// Entries without a product link are skipped; a product seen in an
/// earlier entry is dropped. Rank is the entry's badge text, if any.
pub fn extract_from_list(list: ElementRef<'_>, base: Option<&Url>) -> Vec<ListingItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for entry in list.select(&ENTRY) {
        let Some((link, code)) = product_link(entry) else {
            continue;
        };
        if !seen.insert(code.clone()) {
            continue;
        }

        let title = image_alt(entry)
            .or_else(|| select_text(entry, &TITLE_LINK))
            .or_else(|| element_text(link));

        items.push(ListingItem {
            rank: select_text(entry, &RANK_BADGE),
            title,
            link: link
                .value()
                .attr("href")
                .and_then(|href| canonical_link(base, href)),
            identity: Some(code),
            price: select_text(entry, &PRICE),
            rating: select_text(entry, &RATING),
        });
    }

    items
}
