//! Tournament scheduling domain models.
//!
//! Provides the value types the scheduler works over: time primitives,
//! fields and slots, venue restrictions, the bracket dependency graph,
//! and concrete game placements.
//!
//! # Domain Mappings
//!
//! | tourney-schedule | Meaning |
//! |------------------|---------|
//! | Field | A venue with a fixed game length |
//! | FieldSlot | A field at a start time |
//! | Restriction | When a field may host games |
//! | BracketDefinition | Which games feed which |
//! | TourneyGameDef | A game placed on a date and slot |

mod bracket;
mod field;
mod game;
mod restriction;
mod time;

pub use bracket::{BracketDefinition, BracketGame, GameNum, TeamSource};
pub use field::{Field, FieldSlot};
pub use game::TourneyGameDef;
pub use restriction::{
    DaysOfWeek, Restriction, RestrictionConfig, Rules, RulesConfig, DARK_LATEST_START,
    DEFAULT_DAY_START, LIGHTS_LATEST_START, SATURDAY_START, SUNDAY_START, WEEKDAY_START,
};
pub use time::{DateWithoutTime, TimeWithoutDate, MS_PER_DAY};
