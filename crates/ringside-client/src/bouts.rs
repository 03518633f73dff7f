//! Bout history extraction from a fighter's detail page.

use ringside_core::config::SourceConfig;
use ringside_core::dates;
use ringside_core::error::AppError;
use ringside_core::models::{Bout, BoutResult, Fighter, Roster};
use ringside_core::traits::Fetcher;
use ringside_core::util::normalize_locator;
use scraper::{ElementRef, Html, Selector};

use crate::html::{first, first_text, selector};

const BOUT_ROW: &str = "section.fighterFightResults li";
const OPPONENT_LINK: &str = "a[href*='/fightcenter/fighters/']";
const UPCOMING_MARKER: &str = "a[title='Confirmed Upcoming Bout']";
const RESULT_BADGE: &str = "div.result span";
const YEAR: &str = "div.date span.year";
const MONTH_DAY: &str = "div.date span.monthDay";

/// Bouts parsed from one detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoutPage {
    pub bouts: Vec<Bout>,
    /// Rows dropped for lacking an opponent link or a tracked opponent.
    pub skipped_rows: usize,
}

struct RowSelectors {
    row: Selector,
    opponent: Selector,
    upcoming: Selector,
    badge: Selector,
    year: Selector,
    month_day: Selector,
}

impl RowSelectors {
    fn new() -> Result<Self, AppError> {
        Ok(Self {
            row: selector(BOUT_ROW)?,
            opponent: selector(OPPONENT_LINK)?,
            upcoming: selector(UPCOMING_MARKER)?,
            badge: selector(RESULT_BADGE)?,
            year: selector(YEAR)?,
            month_day: selector(MONTH_DAY)?,
        })
    }
}

/// Parse `principal`'s detail page into bouts against tracked opponents.
///
/// Rows without an opponent link, rows against untracked opponents, and
/// rows linking back to the principal are skipped. A tracked row missing
/// its result or date is a hard `MalformedBoutRow`. Zero tracked rows means
/// the locator was mis-resolved and fails with `NoTrackedOpponentsFound`.
pub fn parse_bout_page(
    html: &str,
    principal: &Fighter,
    roster: &Roster,
) -> Result<BoutPage, AppError> {
    let locator = principal
        .locator
        .as_deref()
        .map(normalize_locator)
        .ok_or_else(|| AppError::MissingLocator(principal.name.clone()))?;
    let document = Html::parse_document(html);
    let sel = RowSelectors::new()?;

    let mut bouts = Vec::new();
    let mut skipped_rows = 0;

    for (index, row) in document.select(&sel.row).enumerate() {
        let Some(href) = first(row, &sel.opponent).and_then(|a| a.value().attr("href")) else {
            skipped_rows += 1;
            continue;
        };
        let opponent_locator = normalize_locator(href);
        if opponent_locator == locator {
            skipped_rows += 1;
            continue;
        }
        let Some(opponent) = roster.name_for(&opponent_locator) else {
            tracing::debug!(principal = %principal.name, opponent = %opponent_locator, "Untracked opponent, skipping row");
            skipped_rows += 1;
            continue;
        };

        let ctx = |what: &str| format!("{} row {}: {what}", principal.name, index + 1);
        let result = parse_result(row, &sel).map_err(|e| AppError::MalformedBoutRow(ctx(&e)))?;
        let (year, month_day) = first_text(row, &sel.year)
            .zip(first_text(row, &sel.month_day))
            .ok_or_else(|| AppError::MalformedBoutRow(ctx("missing date fragments")))?;
        let date = dates::parse_fragments(&year, &month_day).map_err(|e| match e {
            AppError::MalformedBoutRow(msg) => AppError::MalformedBoutRow(ctx(&msg)),
            other => other,
        })?;

        bouts.push(Bout::new(principal.name.as_str(), opponent, result, date));
    }

    if bouts.is_empty() {
        return Err(AppError::NoTrackedOpponentsFound {
            name: principal.name.clone(),
            locator,
        });
    }

    Ok(BoutPage {
        bouts,
        skipped_rows,
    })
}

fn parse_result(row: ElementRef<'_>, sel: &RowSelectors) -> Result<BoutResult, String> {
    if first(row, &sel.upcoming).is_some() {
        return Ok(BoutResult::Scheduled);
    }
    let badge = first_text(row, &sel.badge).ok_or("missing result badge")?;
    BoutResult::from_badge(&badge).ok_or_else(|| format!("unknown result badge '{badge}'"))
}

/// Fetches and parses detail pages, one fighter at a time.
#[derive(Clone)]
pub struct BoutExtractor<F> {
    fetcher: F,
    sources: SourceConfig,
}

impl<F: Fetcher> BoutExtractor<F> {
    pub fn new(fetcher: F, sources: SourceConfig) -> Self {
        Self { fetcher, sources }
    }

    pub async fn extract(&self, fighter: &Fighter, roster: &Roster) -> Result<BoutPage, AppError> {
        let locator = fighter
            .locator
            .as_deref()
            .ok_or_else(|| AppError::MissingLocator(fighter.name.clone()))?;
        let url = self.sources.detail_url(locator)?;
        tracing::debug!(name = %fighter.name, %url, "Fetching bout history");

        let html = self.fetcher.fetch(url.as_str()).await?;
        parse_bout_page(&html, fighter, roster)
    }
}
