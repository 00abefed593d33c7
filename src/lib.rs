//! Tournament bracket scheduling.
//!
//! Places every game of an elimination bracket onto field time slots,
//! honoring venue restrictions and game dependencies, and searches over
//! tied placements for the schedule with the shortest span between the
//! first game and the championship.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeWithoutDate`, `DateWithoutTime`,
//!   `Field`, `FieldSlot`, `Restriction`, `Rules`, `BracketDefinition`,
//!   `TourneyGameDef`
//! - **`scheduler`**: Slot packing (`AvailableSlots`, `SlotManager`),
//!   scoring (`Penalties`), the working schedule (`TourneyDef`), and the
//!   breadth-first search (`Ranker`)
//! - **`validation`**: Input integrity checks (duplicate fields, unknown
//!   references, bracket cycles)
//! - **`config`**: Search bounds
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tourney_schedule::models::{
//!     BracketDefinition, BracketGame, DateWithoutTime, Field, Rules, TeamSource,
//! };
//! use tourney_schedule::scheduler::{Ranker, TourneyDef};
//!
//! let seed = |s: &str| TeamSource::Seed(s.into());
//! let bracket = BracketDefinition::new(vec![
//!     BracketGame::new(seed("A1"), seed("A4")),
//!     BracketGame::new(seed("A2"), seed("A3")),
//!     BracketGame::new(TeamSource::Winner(0), TeamSource::Winner(1)),
//! ]);
//! let rules = Rules::new(DateWithoutTime::from_ymd(2024, 6, 1).unwrap())
//!     .with_field(Field::new("North", false, 90))
//!     .with_default_restrictions(None);
//!
//! let start = TourneyDef::new(Arc::new(bracket), Arc::new(rules));
//! let outcome = Ranker::new().rank(start).unwrap();
//! assert!(outcome.best.is_complete());
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::SearchConfig;
pub use error::ScheduleError;
