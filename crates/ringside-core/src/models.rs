use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::util::normalize_locator;

/// A ranked fighter.
///
/// `rank` 0 is reserved for the division champion. `locator` stays `None`
/// until the identity resolver fills it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub name: String,
    pub division: String,
    pub rank: u32,
    pub rank_movement: i32,
    #[serde(default)]
    pub locator: Option<String>,
}

impl Fighter {
    pub fn new(name: impl Into<String>, division: impl Into<String>, rank: u32) -> Self {
        Self {
            name: name.into(),
            division: division.into(),
            rank,
            rank_movement: 0,
            locator: None,
        }
    }

    pub fn with_movement(mut self, rank_movement: i32) -> Self {
        self.rank_movement = rank_movement;
        self
    }

    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    pub fn is_champion(&self) -> bool {
        self.rank == 0
    }
}

/// Outcome of a bout from the principal's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoutResult {
    Win,
    Loss,
    Draw,
    NoContest,
    Scheduled,
    Cancelled,
}

impl BoutResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoutResult::Win => "WIN",
            BoutResult::Loss => "LOSS",
            BoutResult::Draw => "DRAW",
            BoutResult::NoContest => "NO_CONTEST",
            BoutResult::Scheduled => "SCHEDULED",
            BoutResult::Cancelled => "CANCELLED",
        }
    }

    /// Map a result badge (`W`, `L`, `D`, `NC`, `C`) to a result.
    ///
    /// `SCHEDULED` has no badge; it comes from the upcoming-bout marker.
    pub fn from_badge(badge: &str) -> Option<Self> {
        match badge.trim().to_ascii_uppercase().as_str() {
            "W" => Some(BoutResult::Win),
            "L" => Some(BoutResult::Loss),
            "D" => Some(BoutResult::Draw),
            "NC" => Some(BoutResult::NoContest),
            "C" => Some(BoutResult::Cancelled),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, BoutResult::Cancelled)
    }
}

impl fmt::Display for BoutResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BoutResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WIN" => Ok(BoutResult::Win),
            "LOSS" => Ok(BoutResult::Loss),
            "DRAW" => Ok(BoutResult::Draw),
            "NO_CONTEST" => Ok(BoutResult::NoContest),
            "SCHEDULED" => Ok(BoutResult::Scheduled),
            "CANCELLED" => Ok(BoutResult::Cancelled),
            other => BoutResult::from_badge(other).ok_or_else(|| format!("Unknown bout result: {s}")),
        }
    }
}

/// One directional bout record, as seen from `principal`'s page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bout {
    pub principal: String,
    pub opponent: String,
    pub result: BoutResult,
    #[serde(with = "crate::dates::canonical")]
    pub date: NaiveDate,
}

impl Bout {
    pub fn new(
        principal: impl Into<String>,
        opponent: impl Into<String>,
        result: BoutResult,
        date: NaiveDate,
    ) -> Self {
        Self {
            principal: principal.into(),
            opponent: opponent.into(),
            result,
            date,
        }
    }

    /// Whether this record and `other` describe the same directional pair.
    pub fn same_pair(&self, other: &Bout) -> bool {
        self.principal == other.principal && self.opponent == other.opponent
    }
}

/// The tracked fighter set, keyed by normalized locator.
///
/// Used by the bout extractor for opponent membership tests.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    by_locator: HashMap<String, String>,
}

impl Roster {
    /// Build from resolved fighters. Unresolved fighters are not tracked.
    ///
    /// Two fighters resolved to the same page is a resolution error: one of
    /// them would otherwise vanish from opponent matching.
    pub fn from_fighters(fighters: &[Fighter]) -> Result<Self, AppError> {
        let mut by_locator: HashMap<String, String> = HashMap::new();
        for fighter in fighters {
            let Some(locator) = fighter.locator.as_deref() else {
                continue;
            };
            match by_locator.entry(normalize_locator(locator)) {
                Entry::Occupied(entry) => {
                    return Err(AppError::DuplicateLocator {
                        locator: entry.key().clone(),
                        first: entry.get().clone(),
                        second: fighter.name.clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(fighter.name.clone());
                }
            }
        }
        Ok(Self { by_locator })
    }

    /// Name of the tracked fighter at `locator`, if any.
    pub fn name_for(&self, locator: &str) -> Option<&str> {
        self.by_locator
            .get(&normalize_locator(locator))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_locator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_locator.is_empty()
    }
}

/// The pipeline's output: ordered fighters plus reconciled bouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub fighters: Vec<Fighter>,
    pub bouts: Vec<Bout>,
}

impl Dataset {
    /// SHA-256 over the serialized dataset (for change detection between runs).
    pub fn data_hash(&self) -> Result<String, AppError> {
        Ok(compute_hash(&serde_json::to_string(self)?))
    }
}

/// Marker written after every successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastRun {
    pub last_run: DateTime<Utc>,
    pub data_hash: String,
    pub fighters: usize,
    pub bouts: usize,
}

impl LastRun {
    pub fn for_dataset(dataset: &Dataset) -> Result<Self, AppError> {
        Ok(Self {
            last_run: Utc::now(),
            data_hash: dataset.data_hash()?,
            fighters: dataset.fighters.len(),
            bouts: dataset.bouts.len(),
        })
    }
}

/// Compute a SHA-256 hash of a string, returned as 64-char hex.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
