use ringside_core::error::AppError;
use ringside_core::util::normalize_locator;
use scraper::Html;

use crate::html::{element_text, first, selector};

const RESULT_ROW: &str = "table.fcLeaderboard tr";
const FIGHTER_LINK: &str = "a[href*='/fightcenter/fighters/']";

/// A fighter row from the search results listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub name: String,
    pub locator: String,
}

/// All fighter rows on a search results page, in listing order.
///
/// Rows without a fighter link (headers, event or promotion hits) are
/// ignored. Fails with `NoSearchResults` when none remain.
pub fn parse_candidates(html: &str, query: &str) -> Result<Vec<SearchCandidate>, AppError> {
    let document = Html::parse_document(html);
    let row_sel = selector(RESULT_ROW)?;
    let link_sel = selector(FIGHTER_LINK)?;

    let candidates: Vec<SearchCandidate> = document
        .select(&row_sel)
        .filter_map(|row| first(row, &link_sel))
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            Some(SearchCandidate {
                name: element_text(link),
                locator: normalize_locator(href),
            })
        })
        .collect();

    if candidates.is_empty() {
        return Err(AppError::NoSearchResults {
            name: query.to_string(),
        });
    }
    Ok(candidates)
}

/// Pick the best match: the first fighter row.
pub fn best_match(html: &str, query: &str) -> Result<SearchCandidate, AppError> {
    let mut candidates = parse_candidates(html, query)?;
    if candidates.len() > 1 {
        tracing::debug!(%query, candidates = candidates.len(), chosen = %candidates[0].locator, "Multiple search hits, taking first");
    }
    Ok(candidates.swap_remove(0))
}
