//! Cross-record consistency over the full collected bout set.
//!
//! [`reconcile`] drops stale cancellations; [`check_reciprocity`] verifies
//! that every bout between two scraped fighters is recorded from both sides.
//! The check is a standalone step so a stored dataset can be validated on
//! demand.

use std::collections::{BTreeSet, HashSet};

use crate::error::AppError;
use crate::models::Bout;

/// Output of the reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Retained records, in input order, with canonical dates.
    pub bouts: Vec<Bout>,
    /// Number of CANCELLED records dropped.
    pub suppressed: usize,
}

/// Drop every CANCELLED record whose (principal, opponent) pair also has a
/// non-cancelled record. All other records are kept unchanged, in order.
///
/// Dates are stored as calendar dates and serialize in `YYYY-MM-DD` form,
/// so retained records need no further rewriting.
pub fn reconcile(bouts: Vec<Bout>) -> Reconciled {
    let settled: HashSet<(&str, &str)> = bouts
        .iter()
        .filter(|b| !b.result.is_cancelled())
        .map(|b| (b.principal.as_str(), b.opponent.as_str()))
        .collect();

    let keep: Vec<bool> = bouts
        .iter()
        .map(|b| {
            !(b.result.is_cancelled()
                && settled.contains(&(b.principal.as_str(), b.opponent.as_str())))
        })
        .collect();

    let total = bouts.len();
    let bouts: Vec<Bout> = bouts
        .into_iter()
        .zip(keep)
        .filter_map(|(bout, keep)| keep.then_some(bout))
        .collect();
    let suppressed = total - bouts.len();

    if suppressed > 0 {
        tracing::debug!(suppressed, "Suppressed stale cancellations");
    }

    Reconciled { bouts, suppressed }
}

/// Every directional pair (X, Y) where X and Y both appear as principals
/// must have a reverse record (Y, X).
///
/// A pair recorded only as CANCELLED is exempt: a cancellation listed on one
/// side only is not an extraction gap. For the same reason a CANCELLED
/// reverse record does not satisfy a completed or scheduled bout. All violations are logged; the first
/// one (in input order) is returned.
pub fn check_reciprocity(bouts: &[Bout]) -> Result<(), AppError> {
    let principals: HashSet<&str> = bouts.iter().map(|b| b.principal.as_str()).collect();
    check_pairs(bouts, &principals)
}

/// Like [`check_reciprocity`], but against an explicit tracked set.
///
/// A tracked fighter with no records of its own still owes the reverse of
/// every bout recorded against it.
pub fn check_reciprocity_among<'a>(
    bouts: &[Bout],
    tracked: impl IntoIterator<Item = &'a str>,
) -> Result<(), AppError> {
    let tracked: HashSet<&str> = tracked.into_iter().collect();
    check_pairs(bouts, &tracked)
}

fn check_pairs(bouts: &[Bout], tracked: &HashSet<&str>) -> Result<(), AppError> {
    let settled: HashSet<(&str, &str)> = bouts
        .iter()
        .filter(|b| !b.result.is_cancelled())
        .map(|b| (b.principal.as_str(), b.opponent.as_str()))
        .collect();

    let mut reported = BTreeSet::new();
    let mut first = None;

    for bout in bouts {
        let (x, y) = (bout.principal.as_str(), bout.opponent.as_str());
        if !tracked.contains(y) || !settled.contains(&(x, y)) {
            continue;
        }
        if settled.contains(&(y, x)) || !reported.insert((x, y)) {
            continue;
        }
        tracing::error!(principal = %x, opponent = %y, "Bout recorded from one side only");
        first.get_or_insert((x, y));
    }

    match first {
        Some((principal, opponent)) => Err(AppError::ReciprocityViolation {
            principal: principal.to_string(),
            opponent: opponent.to_string(),
        }),
        None => Ok(()),
    }
}
