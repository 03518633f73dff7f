//! Rankings listing extraction.
//!
//! The listing has one grouping per division: a header, then a table whose
//! caption holds the champion and whose rows hold the ranked contenders.
//! Pound-for-pound groupings are skipped. Any missing structural element
//! aborts the parse.

use std::collections::HashSet;

use regex::Regex;
use ringside_core::error::AppError;
use ringside_core::models::Fighter;
use scraper::{ElementRef, Html};

use crate::html::{element_text, first, first_text, selector};

const DIVISION_GROUP: &str = "div.view-grouping";
const DIVISION_HEADER: &str = ".view-grouping-header";
const TABLE: &str = "table";
const CHAMPION: &str = "caption h5";
const ROW: &str = "tbody tr";
const NAME_CELL: &str = "td.views-field-title";
const RANK_CELL: &str = "td.views-field-weight-class-rank";
const MOVEMENT_CELL: &str = "td.views-field-weight-class-rank-change";

const MOVEMENT_PATTERN: &str = r"Rank (increased|decreased) by (\d+)";
const POUND_FOR_POUND: [&str; 2] = ["men's pound-for-pound", "women's pound-for-pound"];

/// Parses "Rank increased by 3" style movement text.
pub struct MovementParser {
    pattern: Regex,
}

impl MovementParser {
    pub fn new() -> Result<Self, AppError> {
        let pattern = Regex::new(MOVEMENT_PATTERN)
            .map_err(|e| AppError::MalformedPage(format!("invalid movement pattern: {e}")))?;
        Ok(Self { pattern })
    }

    /// `+n` for increased, `-n` for decreased, 0 when the text does not match.
    pub fn parse(&self, text: &str) -> i32 {
        let Some(caps) = self.pattern.captures(text) else {
            return 0;
        };
        let Ok(amount) = caps[2].parse::<i32>() else {
            return 0;
        };
        if &caps[1] == "increased" { amount } else { -amount }
    }
}

/// Whether a division header names a pound-for-pound list.
pub fn is_pound_for_pound(header: &str) -> bool {
    let header = header.trim().to_lowercase().replace('\u{2019}', "'");
    POUND_FOR_POUND.iter().any(|marker| header.starts_with(marker))
}

/// Parse the rankings page into fighters, in page order.
///
/// Each division yields its champion (rank 0, movement 0) followed by its
/// ranked rows.
pub fn parse_rankings(html: &str) -> Result<Vec<Fighter>, AppError> {
    let document = Html::parse_document(html);
    let group_sel = selector(DIVISION_GROUP)?;
    let header_sel = selector(DIVISION_HEADER)?;
    let table_sel = selector(TABLE)?;
    let champion_sel = selector(CHAMPION)?;
    let row_sel = selector(ROW)?;
    let name_sel = selector(NAME_CELL)?;
    let rank_sel = selector(RANK_CELL)?;
    let movement_sel = selector(MOVEMENT_CELL)?;
    let movement = MovementParser::new()?;

    let mut fighters = Vec::new();
    let mut groups = 0;

    for group in document.select(&group_sel) {
        groups += 1;
        let division = first_text(group, &header_sel).ok_or_else(|| {
            AppError::MalformedPage(format!("division #{groups} has no header"))
        })?;

        if is_pound_for_pound(&division) {
            tracing::debug!(%division, "Skipping pound-for-pound list");
            continue;
        }

        let table = first(group, &table_sel)
            .ok_or_else(|| AppError::MalformedPage(format!("{division}: no rankings table")))?;

        let champion = first_text(table, &champion_sel)
            .ok_or_else(|| AppError::MalformedPage(format!("{division}: no champion heading")))?;
        fighters.push(Fighter::new(champion, division.as_str(), 0));

        for (index, row) in table.select(&row_sel).enumerate() {
            let ctx = RowContext {
                division: &division,
                index,
            };
            fighters.push(parse_row(row, &ctx, &name_sel, &rank_sel, &movement_sel, &movement)?);
        }
    }

    if groups == 0 {
        return Err(AppError::MalformedPage("no division groupings found".into()));
    }

    Ok(fighters)
}

struct RowContext<'a> {
    division: &'a str,
    index: usize,
}

fn parse_row(
    row: ElementRef<'_>,
    ctx: &RowContext<'_>,
    name_sel: &scraper::Selector,
    rank_sel: &scraper::Selector,
    movement_sel: &scraper::Selector,
    movement: &MovementParser,
) -> Result<Fighter, AppError> {
    let name = first_text(row, name_sel).ok_or_else(|| {
        AppError::MalformedPage(format!("{} row {}: no name cell", ctx.division, ctx.index + 1))
    })?;

    let rank_text = first_text(row, rank_sel).ok_or_else(|| {
        AppError::MalformedPage(format!("{} row {}: no rank cell", ctx.division, ctx.index + 1))
    })?;
    let rank = parse_rank(&rank_text).ok_or_else(|| {
        AppError::MalformedPage(format!(
            "{} row {}: bad rank '{rank_text}'",
            ctx.division,
            ctx.index + 1
        ))
    })?;

    let rank_movement = first(row, movement_sel)
        .map(|cell| movement.parse(&element_text(cell)))
        .unwrap_or(0);

    Ok(Fighter::new(name, ctx.division, rank).with_movement(rank_movement))
}

/// Parse a `#<int>` rank cell. The `#` marker is required.
pub fn parse_rank(text: &str) -> Option<u32> {
    text.trim().strip_prefix('#')?.trim().parse().ok()
}

/// Keep the first fighter of each name; later duplicates are returned
/// separately (a fighter ranked in two divisions).
pub fn dedupe_by_name(fighters: Vec<Fighter>) -> (Vec<Fighter>, Vec<Fighter>) {
    let mut seen = HashSet::new();
    fighters
        .into_iter()
        .partition(|f| seen.insert(f.name.clone()))
}
