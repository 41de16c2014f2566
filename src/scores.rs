//! Match score board
//!
//! Stores every submitted match result, serves the global top list and
//! per-player history. Persisted as a JSON file.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::WIN_POINTS_THRESHOLD;
use crate::error::ScoreError;
use crate::settings::Environment;

/// Entries returned by `top` when no limit is given
pub const DEFAULT_TOP_LIMIT: usize = 10;
/// Hard ceiling for `top`
pub const MAX_TOP_LIMIT: usize = 100;
/// Records returned by `history` when no limit is given
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

pub const DEFAULT_DIFFICULTY: &str = "normal";
pub const DEFAULT_MAP: &str = "Classic Arena";

/// A score submission as received from a client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewScore {
    pub player: Option<String>,
    pub points: Option<i64>,
    /// Match duration as displayed by the client (e.g. "03:12")
    pub time: Option<String>,
    pub difficulty: Option<String>,
    pub map: Option<String>,
}

/// A stored score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: u64,
    pub player: String,
    pub points: i64,
    pub time: Option<String>,
    pub difficulty: String,
    pub map: String,
    pub recorded_at: DateTime<Utc>,
}

/// A score with its 1-based position in the top list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScore {
    #[serde(flatten)]
    pub record: ScoreRecord,
    pub rank: usize,
}

/// Aggregates over all of a player's matches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    pub total_games: usize,
    pub best_score: Option<i64>,
    /// Rounded mean points
    pub average_points: Option<i64>,
    /// Matches above `WIN_POINTS_THRESHOLD`
    pub wins: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerHistory {
    pub player: String,
    /// Newest first
    pub history: Vec<ScoreRecord>,
    pub stats: PlayerStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBoard {
    records: Vec<ScoreRecord>,
    next_id: u64,
}

/// `None` and zero both mean "use the default"
fn effective_limit(limit: Option<usize>, default: usize) -> usize {
    limit.filter(|&n| n > 0).unwrap_or(default)
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate and store a score stamped with the current time
    pub fn submit(&mut self, score: NewScore) -> Result<ScoreRecord, ScoreError> {
        self.submit_at(score, Utc::now())
    }

    pub fn submit_at(
        &mut self,
        score: NewScore,
        recorded_at: DateTime<Utc>,
    ) -> Result<ScoreRecord, ScoreError> {
        let player = score
            .player
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or(ScoreError::MissingFields)?;
        let points = score.points.ok_or(ScoreError::MissingFields)?;

        let id = self.next_id.max(1);
        self.next_id = id + 1;

        let record = ScoreRecord {
            id,
            player,
            points,
            time: score.time.filter(|t| !t.is_empty()),
            difficulty: score
                .difficulty
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
            map: score
                .map
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MAP.to_string()),
            recorded_at,
        };
        self.records.push(record.clone());
        log::info!("Score saved: #{} {} = {}", record.id, record.player, record.points);
        Ok(record)
    }

    /// Highest scores first, at most `min(limit, 100)` entries
    pub fn top(&self, limit: Option<usize>) -> Vec<RankedScore> {
        let limit = effective_limit(limit, DEFAULT_TOP_LIMIT).min(MAX_TOP_LIMIT);
        let mut sorted: Vec<&ScoreRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.points.cmp(&a.points).then(a.id.cmp(&b.id)));
        sorted
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, record)| RankedScore {
                record: record.clone(),
                rank: i + 1,
            })
            .collect()
    }

    /// A player's most recent matches plus stats over all of them
    pub fn history(&self, player: &str, limit: Option<usize>) -> PlayerHistory {
        let limit = effective_limit(limit, DEFAULT_HISTORY_LIMIT);
        let mut mine: Vec<&ScoreRecord> =
            self.records.iter().filter(|r| r.player == player).collect();

        let total_games = mine.len();
        let best_score = mine.iter().map(|r| r.points).max();
        let average_points = (total_games > 0).then(|| {
            let sum: i128 = mine.iter().map(|r| r.points as i128).sum();
            (sum as f64 / total_games as f64).round() as i64
        });
        let wins = mine
            .iter()
            .filter(|r| r.points > WIN_POINTS_THRESHOLD)
            .count();

        mine.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));
        PlayerHistory {
            player: player.to_string(),
            history: mine.into_iter().take(limit).cloned().collect(),
            stats: PlayerStats {
                total_games,
                best_score,
                average_points,
                wins,
            },
        }
    }

    /// Delete every score. Refused in production.
    pub fn clear(&mut self, environment: Environment) -> Result<usize, ScoreError> {
        if environment.is_production() {
            log::warn!("Refusing to clear scores in production");
            return Err(ScoreError::Forbidden);
        }
        let removed = self.records.len();
        self.records.clear();
        log::warn!("All {} scores deleted", removed);
        Ok(removed)
    }

    /// Load the board from a JSON file; a missing file is an empty board
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScoreError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No score file at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path)?;
        let mut board: Self = serde_json::from_str(&json)?;
        // Never hand out an id that is already taken
        let max_id = board.records.iter().map(|r| r.id).max().unwrap_or(0);
        board.next_id = board.next_id.max(max_id + 1);
        log::info!("Loaded {} scores", board.records.len());
        Ok(board)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScoreError> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Scores saved ({} entries)", self.records.len());
        Ok(())
    }
}
