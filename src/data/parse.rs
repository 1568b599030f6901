//! HTML parsing for tracker news listings
//!
//! Scans a news listing page and extracts the raw entries. Building absolute
//! URLs and the final `NewsItem` is left to the tracker client.

use scraper::{ElementRef, Html, Selector};

/// A news entry as found in the listing markup, with whitespace trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsEntry {
    /// Headline text of the entry
    pub title: String,
    /// Date text of the entry
    pub date: String,
    /// Link to the entry, relative to the tracker root
    pub relative_url: String,
}

/// Extracts every news entry from a tracker listing page.
///
/// Each `li.list-group-item` is one candidate. The title comes from the first
/// `span.news-title`, the date from the first `span.news-date` and the link
/// from the first anchor. Candidates missing any of these are skipped.
///
/// # Arguments
/// * `markup` - Raw HTML of a news listing page
///
/// # Returns
/// The entries in document order (may be empty)
pub fn extract_news_entries(markup: &str) -> Vec<NewsEntry> {
    let (Ok(item_sel), Ok(title_sel), Ok(date_sel), Ok(link_sel)) = (
        Selector::parse("li.list-group-item"),
        Selector::parse("span.news-title"),
        Selector::parse("span.news-date"),
        Selector::parse("a[href]"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(markup);
    let mut entries = Vec::new();

    for item in document.select(&item_sel) {
        let title = first_text(item, &title_sel);
        let date = first_text(item, &date_sel);
        let relative_url = item
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| href.trim().to_string());

        match (title, date, relative_url) {
            (Some(title), Some(date), Some(relative_url)) => entries.push(NewsEntry {
                title,
                date,
                relative_url,
            }),
            _ => tracing::debug!("skipping list item without title, date or link"),
        }
    }

    entries
}

/// Returns the trimmed text of the first descendant matching `selector`
fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}
