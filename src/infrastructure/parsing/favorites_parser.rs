//! Favorites listing page parser.
//!
//! Extracts favorited galleries from the listing table and resolves the
//! next-page link. Selectors are compiled once at construction.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{ParsingError, ParsingResult};
use crate::domain::FavoriteItem;

const ROW_SELECTOR: &str = "table.itg tr";
const LINK_SELECTOR: &str = r#"a[href*="/g/"]"#;
const CATEGORY_SELECTOR: &str = "div[title]";
const TIME_SELECTOR: &str = "td.glfc p";
const NEXT_SELECTOR: &str = "div.searchnav a#unext";

/// Gallery link pattern: `/g/<numeric-id>/<token>`.
const GALLERY_HREF_PATTERN: &str = r"/g/(\d+)/(\w+)";

/// Parser for the paginated favorites listing.
pub struct FavoritesPageParser {
    row_selector: Selector,
    link_selector: Selector,
    category_selector: Selector,
    time_selector: Selector,
    next_selector: Selector,
    gallery_href: Regex,
}

impl FavoritesPageParser {
    pub fn new() -> ParsingResult<Self> {
        Ok(Self {
            row_selector: compile(ROW_SELECTOR)?,
            link_selector: compile(LINK_SELECTOR)?,
            category_selector: compile(CATEGORY_SELECTOR)?,
            time_selector: compile(TIME_SELECTOR)?,
            next_selector: compile(NEXT_SELECTOR)?,
            gallery_href: Regex::new(GALLERY_HREF_PATTERN).map_err(|e| {
                ParsingError::InvalidPattern {
                    pattern: GALLERY_HREF_PATTERN.to_string(),
                    reason: e.to_string(),
                }
            })?,
        })
    }

    /// Extract every recognizable favorite row from a listing page.
    ///
    /// Rows without a gallery link, or whose link does not carry an
    /// id/token pair, are skipped without aborting the page.
    pub fn parse_favorites(&self, html: &Html) -> Vec<FavoriteItem> {
        html.select(&self.row_selector)
            .filter_map(|row| self.extract_item(&row))
            .collect()
    }

    fn extract_item(&self, row: &ElementRef<'_>) -> Option<FavoriteItem> {
        let link = row.select(&self.link_selector).next()?;
        let href = link.value().attr("href")?;
        let Some(caps) = self.gallery_href.captures(href) else {
            debug!("skipping row: gallery link without id/token pair: {href}");
            return None;
        };

        let category = row
            .select(&self.category_selector)
            .next()
            .and_then(|element| element.value().attr("title"))
            .map(|title| title.trim().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let time_parts: Vec<String> = row
            .select(&self.time_selector)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .collect();
        let added_at = if time_parts.is_empty() {
            "Unknown".to_string()
        } else {
            time_parts.join(" ")
        };

        Some(FavoriteItem {
            id: caps[1].to_string(),
            token: caps[2].to_string(),
            category,
            added_at,
        })
    }

    /// Resolve the next-page link, if any.
    ///
    /// Relative links are resolved against the base URL with its last path
    /// segment stripped, which is how the listing emits them.
    pub fn next_page_url(&self, html: &Html, base_url: &str) -> Option<String> {
        let href = html
            .select(&self.next_selector)
            .next()
            .and_then(|element| element.value().attr("href"))?;

        if href.starts_with("http") {
            Some(href.to_string())
        } else {
            let parent = base_url.rsplit_once('/').map_or(base_url, |(head, _)| head);
            Some(format!("{parent}{href}"))
        }
    }
}

fn compile(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
