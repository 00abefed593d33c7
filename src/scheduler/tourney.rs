//! The working schedule.
//!
//! A [`TourneyDef`] pairs an immutable bracket and rule set with the games
//! placed so far. It only grows: [`TourneyDef::add_game`] is the single
//! mutation entry point, and it synchronously invalidates every cache the
//! schedule keeps (packed slots per date, canonical hash, rank penalty).
//!
//! # Placement
//! A game can be placed once all of its predecessor games are placed. Its
//! earliest date is the day after the latest predecessor (never before the
//! tournament start). From there the earliest open slot across all fields
//! is taken, moving one day forward at a time up to the configured
//! lookahead.
//!
//! # Ranking
//! Each placeable game is ranked by elimination fairness plus date
//! penalty. The ranker branches over every placement tied at the minimum.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::error::ScheduleError;
use crate::models::{
    BracketDefinition, DateWithoutTime, FieldSlot, GameNum, Rules, TimeWithoutDate,
    TourneyGameDef,
};

use super::{Penalties, SlotManager, PENALTY_MAX};

/// A game's best placement and its rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRank {
    /// Bracket position.
    pub game_num: GameNum,
    /// Computed placement. `None` if the game cannot be placed yet.
    pub placement: Option<TourneyGameDef>,
    /// Rank penalty (lower is better). [`PENALTY_MAX`] when infeasible.
    pub rank: i64,
}

impl GameRank {
    fn infeasible(game_num: GameNum) -> Self {
        Self {
            game_num,
            placement: None,
            rank: PENALTY_MAX,
        }
    }
}

/// A partially or fully scheduled tournament.
#[derive(Debug, Clone)]
pub struct TourneyDef {
    bracket: Arc<BracketDefinition>,
    rules: Arc<Rules>,
    config: SearchConfig,
    games: BTreeMap<GameNum, TourneyGameDef>,
    slot_manager: SlotManager,
    hash_cache: OnceCell<String>,
    penalty_cache: OnceCell<i64>,
}

impl TourneyDef {
    /// Creates an empty schedule with the default search configuration.
    pub fn new(bracket: Arc<BracketDefinition>, rules: Arc<Rules>) -> Self {
        Self {
            bracket,
            rules,
            config: SearchConfig::default(),
            games: BTreeMap::new(),
            slot_manager: SlotManager::new(),
            hash_cache: OnceCell::new(),
            penalty_cache: OnceCell::new(),
        }
    }

    /// Sets the search configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// The bracket being scheduled.
    pub fn bracket(&self) -> &BracketDefinition {
        &self.bracket
    }

    /// The venue rules.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Placement of a game, if scheduled.
    pub fn game(&self, game_num: GameNum) -> Option<&TourneyGameDef> {
        self.games.get(&game_num)
    }

    /// Whether a game is scheduled.
    pub fn is_scheduled(&self, game_num: GameNum) -> bool {
        self.games.contains_key(&game_num)
    }

    /// Placed games in game-number order.
    pub fn games(&self) -> impl Iterator<Item = &TourneyGameDef> {
        self.games.values()
    }

    /// Number of placed games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether no game is placed.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Whether every bracket game is placed.
    pub fn is_complete(&self) -> bool {
        self.bracket.game_nums().all(|n| self.games.contains_key(&n))
    }

    /// Bracket games not yet placed, in bracket order.
    pub fn unscheduled_games(&self) -> Vec<GameNum> {
        self.bracket
            .game_nums()
            .filter(|n| !self.games.contains_key(n))
            .collect()
    }

    /// Placed games ordered by date, start time, then field name.
    pub fn games_chronological(&self) -> Vec<&TourneyGameDef> {
        let mut ordered: Vec<&TourneyGameDef> = self.games.values().collect();
        ordered.sort_by(|a, b| a.chronological_key().cmp(&b.chronological_key()));
        ordered
    }

    /// Date of the earliest placed game, or the start date if none.
    pub fn earliest_date(&self) -> DateWithoutTime {
        self.games
            .values()
            .map(|g| g.date)
            .min()
            .unwrap_or(self.rules.start_date)
    }

    /// Adds a placement.
    ///
    /// Predecessor ordering is not re-checked; placements built by
    /// [`TourneyDef::schedule_game`] satisfy it, imported ones are the
    /// caller's responsibility.
    ///
    /// # Errors
    /// [`ScheduleError::UnknownGame`] for a game outside the bracket,
    /// [`ScheduleError::DuplicateGame`] if the game is already placed.
    pub fn add_game(&mut self, game: TourneyGameDef) -> Result<(), ScheduleError> {
        if self.bracket.game(game.game_num).is_none() {
            return Err(ScheduleError::UnknownGame(game.game_num));
        }
        if self.games.contains_key(&game.game_num) {
            return Err(ScheduleError::DuplicateGame(game.game_num));
        }

        debug!(
            game = game.game_num,
            date = %game.date,
            field = %game.field_name(),
            start = %game.start(),
            "adding game"
        );
        self.games.insert(game.game_num, game);
        self.slot_manager.invalidate();
        self.hash_cache.take();
        self.penalty_cache.take();
        Ok(())
    }

    /// Adds a pre-existing placement, resolving its field by name.
    ///
    /// # Errors
    /// [`ScheduleError::UnknownField`] if no field has that name, plus the
    /// errors of [`TourneyDef::add_game`].
    pub fn import_game(
        &mut self,
        game_num: GameNum,
        date: DateWithoutTime,
        field_name: &str,
        start: TimeWithoutDate,
    ) -> Result<(), ScheduleError> {
        let field = self
            .rules
            .get_matching_field(field_name)
            .cloned()
            .ok_or_else(|| ScheduleError::UnknownField(field_name.to_string()))?;
        self.add_game(TourneyGameDef::new(game_num, date, FieldSlot::new(field, start)))
    }

    /// Computes the earliest placement for a game without adding it.
    ///
    /// Returns `Ok(None)` if a predecessor is unplaced or no slot opens
    /// within the lookahead.
    pub fn schedule_game(&self, game_num: GameNum) -> Result<Option<TourneyGameDef>, ScheduleError> {
        let mut earliest = self.rules.start_date;
        for required in self.bracket.get_game_requirements_for_game(game_num) {
            match self.games.get(&required) {
                Some(predecessor) => earliest = earliest.max(predecessor.date.add_days(1)),
                None => return Ok(None),
            }
        }

        for offset in 0..self.config.lookahead_days {
            let date = earliest.add_days(offset as i64);
            let slot = self.slot_manager.get_first_slot_available_or_null_for_date(
                &self.rules,
                self.games.values(),
                date,
            )?;
            if let Some(slot) = slot {
                return Ok(Some(TourneyGameDef::new(game_num, date, slot)));
            }
        }

        trace!(
            game = game_num,
            from = %earliest,
            days = self.config.lookahead_days,
            "no slot within lookahead"
        );
        Ok(None)
    }

    /// Ranks the earliest placement of a game.
    ///
    /// # Errors
    /// [`ScheduleError::UnknownGame`] for a game outside the bracket.
    pub fn calculate_game_rank_penalty(&self, game_num: GameNum) -> Result<GameRank, ScheduleError> {
        let game_def = self
            .bracket
            .game(game_num)
            .ok_or(ScheduleError::UnknownGame(game_num))?;

        let Some(placement) = self.schedule_game(game_num)? else {
            return Ok(GameRank::infeasible(game_num));
        };

        let rank = Penalties::calculate_elimination_penalty(self, game_def, &placement)
            + Penalties::calculate_date_penalty(self, &placement);
        Ok(GameRank {
            game_num,
            placement: Some(placement),
            rank,
        })
    }

    /// Rank of every unplaced game, in bracket order.
    pub fn game_rank_report(&self) -> Result<Vec<GameRank>, ScheduleError> {
        self.unscheduled_games()
            .into_iter()
            .map(|n| self.calculate_game_rank_penalty(n))
            .collect()
    }

    /// All placements tied at the minimum rank among unplaced games.
    ///
    /// Empty when nothing more can be placed (complete or stuck).
    pub fn get_next_game_options_to_schedule(&self) -> Result<Vec<TourneyGameDef>, ScheduleError> {
        let mut best_rank = PENALTY_MAX;
        let mut options = Vec::new();

        for game_num in self.unscheduled_games() {
            let ranked = self.calculate_game_rank_penalty(game_num)?;
            let Some(placement) = ranked.placement else {
                continue;
            };
            if ranked.rank < best_rank {
                best_rank = ranked.rank;
                options.clear();
                options.push(placement);
            } else if ranked.rank == best_rank {
                options.push(placement);
            }
        }

        Ok(options)
    }

    /// The first best-ranked placement, if any.
    pub fn get_next_game_to_schedule(&self) -> Result<Option<TourneyGameDef>, ScheduleError> {
        Ok(self.get_next_game_options_to_schedule()?.into_iter().next())
    }

    /// Greedily places games until none can be placed.
    ///
    /// Returns how many games were added.
    pub fn schedule_all_remaining_games(&mut self) -> Result<usize, ScheduleError> {
        let mut added = 0;
        while let Some(next) = self.get_next_game_to_schedule()? {
            self.add_game(next)?;
            added += 1;
        }
        Ok(added)
    }

    /// Tournament span in days ([`PENALTY_MAX`] while the championship is
    /// unplaced). Memoized until the next mutation.
    pub fn calculate_rank_penalty(&self) -> i64 {
        *self
            .penalty_cache
            .get_or_init(|| Penalties::calculate_tourney_penalty(self))
    }

    /// Canonical `day:mask-day:mask` key of which games fall on which
    /// epoch day. Memoized until the next mutation.
    ///
    /// Field and start time are ignored: two schedules with the same games
    /// on the same days share a hash.
    pub fn get_hash(&self) -> &str {
        self.hash_cache.get_or_init(|| self.build_hash())
    }

    fn build_hash(&self) -> String {
        let words = self.bracket.len().div_ceil(64).max(1);
        let mut days: BTreeMap<i64, Vec<u64>> = BTreeMap::new();
        for game in self.games.values() {
            let mask = days
                .entry(game.date.epoch_day())
                .or_insert_with(|| vec![0; words]);
            mask[game.game_num / 64] |= 1 << (game.game_num % 64);
        }

        let mut hash = String::new();
        for (i, (day, mask)) in days.iter().enumerate() {
            if i > 0 {
                hash.push('-');
            }
            hash.push_str(&day.to_string());
            hash.push(':');
            write_mask(&mut hash, mask);
        }
        hash
    }
}

/// Writes a multi-word bitmask as hex, most significant word first,
/// without leading zero words.
fn write_mask(out: &mut String, mask: &[u64]) {
    let mut words = mask.iter().rev().skip_while(|w| **w == 0);
    match words.next() {
        None => out.push('0'),
        Some(top) => {
            out.push_str(&format!("{top:x}"));
            for word in words {
                out.push_str(&format!("{word:016x}"));
            }
        }
    }
}
