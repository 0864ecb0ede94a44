//! Ranked item extraction from category page HTML.
//!
//! Two strategies, chosen by `extract_items`:
//! - `ranked_list`: the page has an ordered list whose entries hold
//!   product links. Rank badges, titles, prices and ratings come from
//!   each entry.
//! - `fallback`: no such list. Every product link in document order is
//!   an item, with details taken from a nearby ancestor.
//!
//! Both drop repeated product codes (first occurrence wins). Items that
//! end up without rank text get their 1-based position as `#n`.

mod fallback;
mod ranked_list;

pub use fallback::{extract_from_links, MAX_ANCESTOR_LEVELS};
pub use ranked_list::extract_from_list;

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::models::ListingItem;

/// Product code embedded in detail page links.
static PRODUCT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/dp/([A-Z0-9]{10})").unwrap());

pub(crate) static PRODUCT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href*='/dp/']").unwrap());
static ORDERED_LIST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ol").unwrap());
static LIST_ENTRY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
pub(crate) static RATING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".a-icon-alt").unwrap());

/// Extract ranked items from a category page.
///
/// Pure: no I/O, same output for the same input. Missing sub-fields come
/// back as `None`; malformed markup never fails.
pub fn extract_items(html: &str, base_url: &str) -> Vec<ListingItem> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    let mut items = match find_ranked_list(&document) {
        Some(list) => {
            debug!("Using ranked list strategy");
            extract_from_list(list, base.as_ref())
        }
        None => {
            debug!("No ranked list found, scanning product links");
            extract_from_links(&document, base.as_ref())
        }
    };

    assign_positional_ranks(&mut items);
    items
}

/// First `<ol>` with at least one entry that links to a product.
pub fn find_ranked_list(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&ORDERED_LIST).find(|list| {
        list.select(&LIST_ENTRY)
            .any(|entry| product_link(entry).is_some())
    })
}

/// Give every rank-less item its 1-based position.
fn assign_positional_ranks(items: &mut [ListingItem]) {
    for (i, item) in items.iter_mut().enumerate() {
        if item.rank.as_deref().map_or(true, |r| r.trim().is_empty()) {
            item.rank = Some(format!("#{}", i + 1));
        }
    }
}

/// Product code from a link target.
pub fn product_code(href: &str) -> Option<String> {
    PRODUCT_CODE
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First product link under `scope` with its code.
pub(crate) fn product_link(scope: ElementRef<'_>) -> Option<(ElementRef<'_>, String)> {
    scope.select(&PRODUCT_LINK).find_map(|a| {
        let code = product_code(a.value().attr("href")?)?;
        Some((a, code))
    })
}

/// Absolute detail page link without query string or fragment.
pub(crate) fn canonical_link(base: Option<&Url>, href: &str) -> Option<String> {
    let joined = match base {
        Some(base) => base.join(href).ok(),
        None => Url::parse(href).ok(),
    };
    match joined {
        Some(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            Some(url.to_string())
        }
        None => {
            let bare = href.split(['?', '#']).next().unwrap_or("").trim();
            (!bare.is_empty()).then(|| bare.to_string())
        }
    }
}

/// Alt text of the first image under `scope`.
pub(crate) fn image_alt(scope: ElementRef<'_>) -> Option<String> {
    scope
        .select(&IMAGE)
        .next()
        .and_then(|img| img.value().attr("alt"))
        .and_then(crate::utils::clean_text)
}

/// Cleaned text of the first match of `selector` under `scope`.
pub(crate) fn select_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(crate::utils::element_text)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const BASE: &str = "https://www.amazon.com";

    const RANKED_PAGE: &str = r##"
        <html><body>
        <ol class="breadcrumbs"><li><a href="/gp/bestsellers">Best Sellers</a></li></ol>
        <ol id="zg-ordered-list">
          <li>
            <span class="zg-badge-text">#1</span>
            <a class="a-link-normal" href="/Funny-Cat-Shirt/dp/B0AAAAAAA1?ref=zg_1">
              <img alt="Funny Cat Coffee Shirt" src="x.jpg">
            </a>
            <span class="a-price"><span class="a-offscreen">$19.99</span></span>
            <i><span class="a-icon-alt">4.6 out of 5 stars</span></i>
          </li>
          <li>
            <span class="zg-badge-text">#2</span>
            <a class="a-link-normal" href="/dp/B0AAAAAAA2">Retro Sunset Hiking Tee</a>
            <span class="p13n-sc-price">$15.00</span>
          </li>
          <li>
            <span class="zg-badge-text">#3</span>
            <a class="a-link-normal" href="/dp/B0AAAAAAA1">Duplicate entry</a>
          </li>
          <li><a href="/help">No product here</a></li>
        </ol>
        </body></html>
    "##;

    const LINK_PAGE: &str = r##"
        <html><body>
        <div class="grid">
          <div class="card">
            <div class="inner">
              <a href="https://www.amazon.com/dp/B0BBBBBBB1/ref=x?th=1">
                <img alt="Bigfoot Camping Shirt">
              </a>
            </div>
            <span class="a-price"><span class="a-offscreen">$21.50</span></span>
            <span class="a-icon-alt">4.2 out of 5 stars</span>
          </div>
          <div class="card">
            <a class="a-link-normal" href="/dp/B0BBBBBBB2">Pickleball Dad Tee</a>
          </div>
          <div class="card">
            <a href="/dp/B0BBBBBBB1">Same product again</a>
          </div>
          <a href="/dp/short">not a code</a>
        </div>
        </body></html>
    "##;

    #[test]
    fn test_product_code() {
        assert_eq!(product_code("/Some-Shirt/dp/B0ABCDEF12/ref=1"), Some("B0ABCDEF12".to_string()));
        assert_eq!(product_code("/dp/b0abcdef12"), None);
        assert_eq!(product_code("/dp/SHORT"), None);
        assert_eq!(product_code("/gp/bestsellers"), None);
    }

    #[test]
    fn test_canonical_link() {
        let base = Url::parse(BASE).unwrap();
        assert_eq!(
            canonical_link(Some(&base), "/x/dp/B0ABCDEF12?ref=zg#top").as_deref(),
            Some("https://www.amazon.com/x/dp/B0ABCDEF12")
        );
        assert_eq!(
            canonical_link(Some(&base), "https://smile.amazon.com/dp/B0ABCDEF12?a=1").as_deref(),
            Some("https://smile.amazon.com/dp/B0ABCDEF12")
        );
        assert_eq!(canonical_link(None, "/dp/B0ABCDEF12?x").as_deref(), Some("/dp/B0ABCDEF12"));
    }

    #[test]
    fn test_ranked_list_skips_lists_without_products() {
        let document = Html::parse_document(RANKED_PAGE);
        let list = find_ranked_list(&document).unwrap();
        assert_eq!(list.value().attr("id"), Some("zg-ordered-list"));
    }

    #[test]
    fn test_extract_ranked_page() {
        let items = extract_items(RANKED_PAGE, BASE);
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.rank.as_deref(), Some("#1"));
        assert_eq!(first.identity.as_deref(), Some("B0AAAAAAA1"));
        assert_eq!(first.title.as_deref(), Some("Funny Cat Coffee Shirt"));
        assert_eq!(
            first.link.as_deref(),
            Some("https://www.amazon.com/Funny-Cat-Shirt/dp/B0AAAAAAA1")
        );
        assert_eq!(first.price.as_deref(), Some("$19.99"));
        assert_eq!(first.rating.as_deref(), Some("4.6 out of 5 stars"));

        let second = &items[1];
        assert_eq!(second.rank.as_deref(), Some("#2"));
        assert_eq!(second.title.as_deref(), Some("Retro Sunset Hiking Tee"));
        assert_eq!(second.price.as_deref(), Some("$15.00"));
        assert_eq!(second.rating, None);
    }

    #[test]
    fn test_extract_falls_back_to_links() {
        let items = extract_items(LINK_PAGE, BASE);
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].identity.as_deref(), Some("B0BBBBBBB1"));
        assert_eq!(items[0].rank.as_deref(), Some("#1"));
        assert_eq!(items[0].title.as_deref(), Some("Bigfoot Camping Shirt"));
        assert_eq!(items[0].link.as_deref(), Some("https://www.amazon.com/dp/B0BBBBBBB1/ref=x"));
        assert_eq!(items[0].price.as_deref(), Some("$21.50"));
        assert_eq!(items[0].rating.as_deref(), Some("4.2 out of 5 stars"));

        assert_eq!(items[1].identity.as_deref(), Some("B0BBBBBBB2"));
        assert_eq!(items[1].rank.as_deref(), Some("#2"));
        assert_eq!(items[1].title.as_deref(), Some("Pickleball Dad Tee"));
        assert_eq!(items[1].price, None);
    }

    #[test]
    fn test_missing_badges_use_position() {
        let html = r#"<ol>
            <li><a href="/dp/B0CCCCCCC1">One</a></li>
            <li><span class="zg-badge-text">  </span><a href="/dp/B0CCCCCCC2">Two</a></li>
            <li><span class="zg-badge-text">#7</span><a href="/dp/B0CCCCCCC3">Three</a></li>
        </ol>"#;
        let ranks: Vec<_> = extract_items(html, BASE)
            .into_iter()
            .map(|item| item.rank.unwrap())
            .collect();
        assert_eq!(ranks, vec!["#1", "#2", "#7"]);
    }

    #[test]
    fn test_every_item_ranked_and_unique() {
        for page in [RANKED_PAGE, LINK_PAGE] {
            let items = extract_items(page, BASE);
            assert!(!items.is_empty());
            assert!(items.iter().all(|item| item.rank_number().is_some()));
            let codes: HashSet<_> = items.iter().filter_map(|i| i.identity.clone()).collect();
            assert_eq!(codes.len(), items.len());
        }
    }

    #[test]
    fn test_no_products_is_empty_not_error() {
        assert!(extract_items("<html><body><p>Robot check</p></body></html>", BASE).is_empty());
        assert!(extract_items("<ol><li>", BASE).is_empty());
        assert!(extract_items("", BASE).is_empty());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        assert_eq!(extract_items(RANKED_PAGE, BASE), extract_items(RANKED_PAGE, BASE));
    }
}
