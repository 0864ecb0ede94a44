//! Ranked listing items as extracted from a category page.

use serde::{Deserialize, Deserializer, Serialize};

/// One ranked entry of a category page at one point in time.
///
/// Field names follow the snapshot file schema; the stable product
/// identifier is stored under `asin`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingItem {
    /// Display rank such as `#3`. Extraction always fills this in.
    #[serde(default, deserialize_with = "string_or_number")]
    pub rank: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Absolute link to the detail page, without query string.
    #[serde(default)]
    pub link: Option<String>,
    /// Ten character product code, when the link carried one.
    #[serde(default, rename = "asin")]
    pub identity: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

impl ListingItem {
    /// Numeric rank, if the rank text contains digits.
    pub fn rank_number(&self) -> Option<u32> {
        self.rank.as_deref().and_then(parse_rank)
    }

    /// Join key for this item within the given category.
    pub fn composite_key(&self, category_url: Option<&str>) -> String {
        composite_key(
            category_url,
            self.identity.as_deref(),
            self.title.as_deref(),
        )
    }
}

/// Build the cross-snapshot join key: `category || (identity or title)`.
pub fn composite_key(
    category_url: Option<&str>,
    identity: Option<&str>,
    title: Option<&str>,
) -> String {
    let item_part = identity
        .filter(|s| !s.is_empty())
        .or(title)
        .unwrap_or("");
    format!("{}||{}", category_url.unwrap_or(""), item_part)
}

/// Resolve display rank text to a number by keeping only its digits.
///
/// `"#12"` is 12 and `"1,204"` is 1204. Text without digits is unresolved.
pub fn parse_rank(text: &str) -> Option<u32> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Accept ranks written either as strings or as bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RankValue {
        Text(String),
        Number(u64),
    }

    Ok(Option::<RankValue>::deserialize(deserializer)?.map(|value| match value {
        RankValue::Text(s) => s,
        RankValue::Number(n) => n.to_string(),
    }))
}
