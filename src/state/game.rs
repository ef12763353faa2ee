//! Game and match state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of matches on a pool game coupon.
pub const MATCHES_PER_GAME: usize = 15;

/// A match outcome on the coupon: home win, draw or away win.
///
/// The derived `Ord` follows declaration order, so sorted outcome lists
/// always read `1`, `X`, `2` - the coupon's column order, which the
/// settlement backend expects on submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Home win, symbol `1`.
    #[serde(rename = "1")]
    Home,
    /// Draw, symbol `X`.
    #[serde(rename = "X")]
    Draw,
    /// Away win, symbol `2`.
    #[serde(rename = "2")]
    Away,
}

impl Outcome {
    /// All outcomes in coupon column order.
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    /// The coupon symbol for this outcome.
    pub fn symbol(&self) -> char {
        match self {
            Self::Home => '1',
            Self::Draw => 'X',
            Self::Away => '2',
        }
    }

    /// Parse a coupon symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            '1' => Some(Self::Home),
            'X' => Some(Self::Draw),
            '2' => Some(Self::Away),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::str::FromStr for Outcome {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Outcome::from_symbol(c)
                .ok_or_else(|| crate::Error::invalid_input(format!("unknown outcome '{s}'"))),
            _ => Err(crate::Error::invalid_input(format!(
                "unknown outcome '{s}'"
            ))),
        }
    }
}

/// A single match on a game coupon.
///
/// Immutable once loaded except for `result` and `cancelled`, which only
/// ever change when the catalog collaborator sends fresh game data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMatch {
    /// Match ID.
    pub id: String,
    /// Home team name.
    pub home_team: String,
    /// Away team name.
    pub away_team: String,
    /// Scheduled kickoff time.
    pub kickoff: DateTime<Utc>,
    /// Final result, once settled.
    pub result: Option<Outcome>,
    /// Whether the match was cancelled.
    pub cancelled: bool,
}

impl TeamMatch {
    /// Check if the match has a settled result.
    pub fn is_settled(&self) -> bool {
        self.result.is_some()
    }

    /// Display label, e.g. "Arsenal - Chelsea".
    pub fn label(&self) -> String {
        format!("{} - {}", self.home_team, self.away_team)
    }
}

/// A pool game: one coupon of matches sharing a submission deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Game ID.
    pub id: String,
    /// Game name, e.g. the round label.
    pub name: String,
    /// Submission deadline. No slips are accepted past this instant.
    pub deadline: DateTime<Utc>,
    /// The coupon matches.
    pub matches: Vec<TeamMatch>,
}

impl Game {
    /// Check whether the deadline has passed.
    pub fn deadline_passed(&self) -> bool {
        self.deadline_passed_at(Utc::now())
    }

    /// Check whether the deadline had passed at the given instant.
    pub fn deadline_passed_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    /// Look up a match on this coupon.
    pub fn find_match(&self, match_id: &str) -> Option<&TeamMatch> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    /// Time remaining until the deadline, zero if passed.
    pub fn time_to_deadline(&self) -> chrono::Duration {
        (self.deadline - Utc::now()).max(chrono::Duration::zero())
    }
}

/// State for the open-games catalog.
#[derive(Debug, Default)]
pub struct GameState {
    /// All loaded games.
    pub games: Vec<Game>,
    /// Currently selected game index.
    pub selected_index: Option<usize>,
    /// Search query filter.
    pub search_query: Option<String>,
    /// Whether games are currently loading.
    pub loading: bool,
    /// Last update timestamp.
    pub last_updated: Option<DateTime<Utc>>,
}

impl GameState {
    /// Get the currently selected game.
    pub fn selected_game(&self) -> Option<&Game> {
        self.selected_index
            .and_then(|i| self.filtered_games().get(i).copied())
    }

    /// Replace the catalog with freshly loaded games.
    pub fn games_loaded(&mut self, games: Vec<Game>) {
        self.games = games;
        self.loading = false;
        self.last_updated = Some(Utc::now());
        if self
            .selected_index
            .is_some_and(|i| i >= self.filtered_games().len())
        {
            self.selected_index = None;
        }
    }

    /// Get games matching the search filter, by game name or team name.
    pub fn filtered_games(&self) -> Vec<&Game> {
        self.games
            .iter()
            .filter(|g| {
                if let Some(query) = &self.search_query {
                    let query_lower = query.to_lowercase();
                    if !g.name.to_lowercase().contains(&query_lower)
                        && !g.matches.iter().any(|m| {
                            m.home_team.to_lowercase().contains(&query_lower)
                                || m.away_team.to_lowercase().contains(&query_lower)
                        })
                    {
                        return false;
                    }
                }
                true
            })
            .collect()
    }

    /// Get games that can still be played.
    pub fn open_games(&self) -> Vec<&Game> {
        self.games.iter().filter(|g| !g.deadline_passed()).collect()
    }
}
