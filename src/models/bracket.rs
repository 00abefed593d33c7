//! Bracket dependency graph.
//!
//! A bracket is a fixed, ordered list of games. Each game draws its two
//! teams from a [`TeamSource`]: either a static seed or the winner/loser of
//! an earlier game. Those references form the dependency graph the
//! scheduler follows: a game may only be placed once every game it draws
//! from has been placed.
//!
//! # Token Format
//! Sources are exchanged as strings: `W<n>` is the winner of game `n`,
//! `L<n>` the loser of game `n`, anything else names a seed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Position of a game in the bracket's game list (0-indexed).
pub type GameNum = usize;

/// Where a team in a game comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TeamSource {
    /// A fixed seed (e.g. `"A1"`, `"Seed 4"`).
    Seed(String),
    /// The winner of another game.
    Winner(GameNum),
    /// The loser of another game.
    Loser(GameNum),
}

impl TeamSource {
    /// Whether the source is a fixed seed.
    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(self, TeamSource::Seed(_))
    }

    /// The game this source depends on, if any.
    pub fn game(&self) -> Option<GameNum> {
        match self {
            TeamSource::Seed(_) => None,
            TeamSource::Winner(n) | TeamSource::Loser(n) => Some(*n),
        }
    }
}

impl FromStr for TeamSource {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(ScheduleError::InvalidToken(s.to_string()));
        }

        let game_ref = |rest: &str| -> Option<GameNum> {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                rest.parse().ok()
            } else {
                None
            }
        };

        if let Some(n) = token.strip_prefix('W').and_then(game_ref) {
            return Ok(TeamSource::Winner(n));
        }
        if let Some(n) = token.strip_prefix('L').and_then(game_ref) {
            return Ok(TeamSource::Loser(n));
        }
        Ok(TeamSource::Seed(token.to_string()))
    }
}

impl fmt::Display for TeamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSource::Seed(name) => f.write_str(name),
            TeamSource::Winner(n) => write!(f, "W{n}"),
            TeamSource::Loser(n) => write!(f, "L{n}"),
        }
    }
}

impl TryFrom<String> for TeamSource {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TeamSource> for String {
    fn from(value: TeamSource) -> Self {
        value.to_string()
    }
}

/// One game of a bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketGame {
    /// Source of the top team.
    pub top: TeamSource,
    /// Source of the bottom team. `None` for bye-like top-seed games.
    #[serde(default)]
    pub bottom: Option<TeamSource>,
    /// Where the loser goes next. Empty or `None` = eliminated.
    #[serde(default)]
    pub loser_destination: Option<String>,
}

impl BracketGame {
    /// Creates a game with both sources and no loser destination.
    pub fn new(top: TeamSource, bottom: TeamSource) -> Self {
        Self {
            top,
            bottom: Some(bottom),
            loser_destination: None,
        }
    }

    /// Creates a game with only a top source.
    pub fn single(top: TeamSource) -> Self {
        Self {
            top,
            bottom: None,
            loser_destination: None,
        }
    }

    /// Sets where the loser goes next.
    pub fn with_loser_destination(mut self, destination: impl Into<String>) -> Self {
        self.loser_destination = Some(destination.into());
        self
    }

    /// Whether losing this game ends a team's tournament.
    pub fn is_elimination(&self) -> bool {
        self.loser_destination
            .as_deref()
            .map_or(true, |d| d.trim().is_empty())
    }

    /// Games this game draws its teams from, top first.
    pub fn requirements(&self) -> Vec<GameNum> {
        std::iter::once(&self.top)
            .chain(self.bottom.as_ref())
            .filter_map(TeamSource::game)
            .collect()
    }
}

/// The static, read-only bracket layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BracketDefinition {
    games: Vec<BracketGame>,
}

impl BracketDefinition {
    /// Creates a bracket from its ordered game list.
    pub fn new(games: Vec<BracketGame>) -> Self {
        Self { games }
    }

    /// Number of games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether the bracket has no games.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// All games in bracket order.
    pub fn games(&self) -> &[BracketGame] {
        &self.games
    }

    /// Game numbers in bracket order.
    pub fn game_nums(&self) -> impl Iterator<Item = GameNum> {
        0..self.games.len()
    }

    /// Looks up a game.
    pub fn game(&self, game_num: GameNum) -> Option<&BracketGame> {
        self.games.get(game_num)
    }

    /// Predecessor games of `game_num`. Unknown games have none.
    pub fn get_game_requirements_for_game(&self, game_num: GameNum) -> Vec<GameNum> {
        self.game(game_num)
            .map(BracketGame::requirements)
            .unwrap_or_default()
    }

    /// Games whose top source is a fixed seed, in bracket order.
    pub fn get_first_round_games(&self) -> Vec<GameNum> {
        self.games
            .iter()
            .enumerate()
            .filter(|(_, g)| g.top.is_static())
            .map(|(n, _)| n)
            .collect()
    }

    /// Whether `game_num` is an elimination game. Unknown games are not.
    pub fn is_elimination_game(&self, game_num: GameNum) -> bool {
        self.game(game_num).is_some_and(BracketGame::is_elimination)
    }

    /// The championship game: the last game in bracket order.
    pub fn championship_game(&self) -> Option<GameNum> {
        self.games.len().checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(s: &str) -> TeamSource {
        TeamSource::Seed(s.into())
    }

    /// Four-team single elimination with a consolation game.
    ///
    /// 0: A1 v A4, 1: A2 v A3, 2: L0 v L1 (consolation), 3: W0 v W1 (final)
    fn four_team() -> BracketDefinition {
        BracketDefinition::new(vec![
            BracketGame::new(seed("A1"), seed("A4")).with_loser_destination("G3"),
            BracketGame::new(seed("A2"), seed("A3")).with_loser_destination("G3"),
            BracketGame::new(TeamSource::Loser(0), TeamSource::Loser(1)),
            BracketGame::new(TeamSource::Winner(0), TeamSource::Winner(1)),
        ])
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!("W3".parse::<TeamSource>().unwrap(), TeamSource::Winner(3));
        assert_eq!("L12".parse::<TeamSource>().unwrap(), TeamSource::Loser(12));
        assert_eq!("A1".parse::<TeamSource>().unwrap(), seed("A1"));
        // Prefix without a number is a seed name
        assert_eq!("Wildcard".parse::<TeamSource>().unwrap(), seed("Wildcard"));
        assert_eq!("W".parse::<TeamSource>().unwrap(), seed("W"));
        assert!("  ".parse::<TeamSource>().is_err());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(TeamSource::Winner(3).to_string(), "W3");
        assert_eq!(TeamSource::Loser(0).to_string(), "L0");
        assert_eq!(seed("B2").to_string(), "B2");
    }

    #[test]
    fn test_requirements() {
        let b = four_team();
        assert!(b.get_game_requirements_for_game(0).is_empty());
        assert_eq!(b.get_game_requirements_for_game(2), vec![0, 1]);
        assert_eq!(b.get_game_requirements_for_game(3), vec![0, 1]);
        assert!(b.get_game_requirements_for_game(99).is_empty());
    }

    #[test]
    fn test_missing_bottom_contributes_nothing() {
        let b = BracketDefinition::new(vec![
            BracketGame::new(seed("A1"), seed("A2")),
            BracketGame::single(TeamSource::Winner(0)),
        ]);
        assert_eq!(b.get_game_requirements_for_game(1), vec![0]);
    }

    #[test]
    fn test_first_round_games() {
        assert_eq!(four_team().get_first_round_games(), vec![0, 1]);
    }

    #[test]
    fn test_elimination_games() {
        let b = four_team();
        assert!(!b.is_elimination_game(0));
        assert!(!b.is_elimination_game(1));
        assert!(b.is_elimination_game(2));
        assert!(b.is_elimination_game(3));
        assert!(!b.is_elimination_game(42));

        let blank = BracketGame::new(seed("A"), seed("B")).with_loser_destination("  ");
        assert!(blank.is_elimination());
    }

    #[test]
    fn test_championship_game() {
        assert_eq!(four_team().championship_game(), Some(3));
        assert_eq!(BracketDefinition::default().championship_game(), None);
    }

    #[test]
    fn test_bracket_from_json() {
        let json = r#"{"games": [
            {"top": "A1", "bottom": "A2", "loser_destination": "G2"},
            {"top": "A3"},
            {"top": "W0", "bottom": "W1"}
        ]}"#;
        let b: BracketDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(b.len(), 3);
        assert_eq!(b.game(1).unwrap().bottom, None);
        assert_eq!(b.get_game_requirements_for_game(2), vec![0, 1]);
        assert!(!b.is_elimination_game(0));
        assert!(b.is_elimination_game(1));

        let back = serde_json::to_string(&b).unwrap();
        assert!(back.contains("\"W0\""));
    }
}
