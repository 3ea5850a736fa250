//! Walks the paginated favorites listing.

use scraper::Html;
use tracing::{error, info};

use crate::domain::FavoriteItem;
use crate::infrastructure::HttpClient;
use crate::infrastructure::parsing::{FavoritesPageParser, ParsingResult};

/// Walks listing pages from the base URL until no next-page link remains,
/// accumulating every recognizable favorite row.
pub struct FavoritesPaginator<'a> {
    client: &'a HttpClient,
    parser: FavoritesPageParser,
}

impl<'a> FavoritesPaginator<'a> {
    pub fn new(client: &'a HttpClient) -> ParsingResult<Self> {
        Ok(Self {
            client,
            parser: FavoritesPageParser::new()?,
        })
    }

    /// Fetch and extract the complete favorites sequence.
    ///
    /// A transport error or non-200 response ends pagination early; items
    /// collected from earlier pages are kept.
    pub async fn collect_all(&self, base_url: &str) -> Vec<FavoriteItem> {
        let mut favorites = Vec::new();
        let mut next_page = Some(base_url.to_string());

        while let Some(url) = next_page {
            info!("fetching favorites page: {url}");
            let body = match self.client.get_text(&url).await {
                Ok(body) => body,
                Err(e) => {
                    error!("favorites page request failed: {e:#}");
                    break;
                }
            };

            let (items, next) = self.parse_page(&body, base_url);
            info!("extracted {} favorite(s) from page", items.len());
            favorites.extend(items);
            next_page = next;
        }

        favorites
    }

    // Parsing stays in a synchronous helper: the parsed document is not
    // Send and must not live across an await point.
    fn parse_page(&self, body: &str, base_url: &str) -> (Vec<FavoriteItem>, Option<String>) {
        let html = Html::parse_document(body);
        let items = self.parser.parse_favorites(&html);
        let next = self.parser.next_page_url(&html, base_url);
        (items, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::HttpClientConfig;

    #[test]
    fn page_parsing_yields_items_and_next_link() {
        let client = HttpClient::new(HttpClientConfig::default()).unwrap();
        let paginator = FavoritesPaginator::new(&client).unwrap();

        let body = r#"
            <table class="itg">
              <tr><td><a href="/g/42/cafebabe01/">G</a></td></tr>
            </table>
            <div class="searchnav"><a id="unext" href="?next=43">&gt;</a></div>"#;

        let (items, next) = paginator.parse_page(body, "https://exhentai.org/favorites.php");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "42");
        assert_eq!(next.as_deref(), Some("https://exhentai.org?next=43"));
    }

    #[test]
    fn last_page_has_no_next_link() {
        let client = HttpClient::new(HttpClientConfig::default()).unwrap();
        let paginator = FavoritesPaginator::new(&client).unwrap();

        let (items, next) = paginator.parse_page("<p>empty</p>", "https://exhentai.org/favorites.php");
        assert!(items.is_empty());
        assert!(next.is_none());
    }
}
