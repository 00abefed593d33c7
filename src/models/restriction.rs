//! Restriction model and venue rules.
//!
//! A [`Restriction`] narrows when a set of fields may host a game: on which
//! days of the week (optionally one specific date) and between which start
//! times. [`Rules`] holds the field catalog, the restriction list, and the
//! tournament start date, and answers the two questions the slot packer
//! asks:
//!
//! - Is a start time allowed for this field on this date?
//! - What is the earliest start allowed on this field and date?
//!
//! # Precedence
//! Restrictions are evaluated independently and never merged. A proposal
//! violates the rules iff *any* matching restriction excludes its start
//! time. The earliest start is the maximum earliest-start across all
//! matching restrictions; latest-starts are not consulted there.
//!
//! A restriction whose latest start precedes its earliest start excludes
//! every time, which blacks out the field for the matching days.

use std::collections::BTreeSet;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{DateWithoutTime, Field, FieldSlot, TimeWithoutDate};
use crate::error::ScheduleError;

/// Start floor used when no explicit time is given.
pub const DEFAULT_DAY_START: TimeWithoutDate = TimeWithoutDate::from_hm(8, 0);

/// Default earliest start on Saturdays.
pub const SATURDAY_START: TimeWithoutDate = TimeWithoutDate::from_hm(9, 0);

/// Default earliest start on Sundays.
pub const SUNDAY_START: TimeWithoutDate = TimeWithoutDate::from_hm(10, 0);

/// Default earliest start on weekdays.
pub const WEEKDAY_START: TimeWithoutDate = TimeWithoutDate::from_hm(18, 0);

/// Latest start on fields with lights.
pub const LIGHTS_LATEST_START: TimeWithoutDate = TimeWithoutDate::from_hm(20, 0);

/// Latest start on fields without lights.
pub const DARK_LATEST_START: TimeWithoutDate = TimeWithoutDate::from_hm(18, 0);

/// A set of days of the week, stored as a bitset (bit 0 = Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct DaysOfWeek(u8);

impl DaysOfWeek {
    /// Every day of the week.
    pub const ALL: Self = Self(0b111_1111);

    /// Monday through Friday.
    pub const WEEKDAYS: Self = Self(0b001_1111);

    /// An empty set.
    pub fn none() -> Self {
        Self(0)
    }

    /// A set containing one day.
    pub fn only(day: Weekday) -> Self {
        Self::none().with(day)
    }

    /// Adds a day to the set.
    pub fn with(mut self, day: Weekday) -> Self {
        self.0 |= 1 << day.num_days_from_monday();
        self
    }

    /// Whether the set contains a day.
    #[inline]
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Days in the set, Monday first.
    pub fn days(&self) -> Vec<Weekday> {
        let mut days = Vec::new();
        let mut day = Weekday::Mon;
        for _ in 0..7 {
            if self.contains(day) {
                days.push(day);
            }
            day = day.succ();
        }
        days
    }
}

impl From<Vec<Weekday>> for DaysOfWeek {
    fn from(value: Vec<Weekday>) -> Self {
        value.into_iter().fold(Self::none(), Self::with)
    }
}

impl From<DaysOfWeek> for Vec<Weekday> {
    fn from(value: DaysOfWeek) -> Self {
        value.days()
    }
}

/// A rule limiting which fields, days, and start times are usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    /// Field names covered. `None` = all fields.
    pub fields: Option<BTreeSet<String>>,
    /// Days of week covered. `None` = every day.
    pub days: Option<DaysOfWeek>,
    /// Single date covered. `None` = any date matching `days`.
    pub date: Option<DateWithoutTime>,
    /// Earliest allowed start.
    pub earliest_start: Option<TimeWithoutDate>,
    /// Latest allowed start.
    pub latest_start: Option<TimeWithoutDate>,
}

impl Restriction {
    /// Creates a restriction covering all fields and days with no time bounds.
    pub fn new() -> Self {
        Self {
            fields: None,
            days: None,
            date: None,
            earliest_start: None,
            latest_start: None,
        }
    }

    /// Creates a restriction covering one field.
    pub fn for_field(name: impl Into<String>) -> Self {
        Self::new().with_field(name)
    }

    /// Adds a field to the covered set.
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.fields.get_or_insert_with(BTreeSet::new).insert(name.into());
        self
    }

    /// Limits the restriction to a set of weekdays.
    pub fn on_days(mut self, days: DaysOfWeek) -> Self {
        self.days = Some(days);
        self
    }

    /// Limits the restriction to a single date.
    pub fn on_date(mut self, date: DateWithoutTime) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the earliest allowed start.
    pub fn with_earliest_start(mut self, time: TimeWithoutDate) -> Self {
        self.earliest_start = Some(time);
        self
    }

    /// Sets the latest allowed start.
    pub fn with_latest_start(mut self, time: TimeWithoutDate) -> Self {
        self.latest_start = Some(time);
        self
    }

    /// Blocks every start time on the matching fields and days.
    pub fn blackout(self) -> Self {
        self.with_earliest_start(TimeWithoutDate::END_OF_DAY)
            .with_latest_start(TimeWithoutDate::MIDNIGHT)
    }

    /// Whether the restriction covers a field on a date.
    pub fn applies_to(&self, field: &Field, date: &DateWithoutTime) -> bool {
        let field_matches = self
            .fields
            .as_ref()
            .map_or(true, |names| names.contains(&field.name));
        let day_matches = self
            .days
            .as_ref()
            .map_or(true, |days| days.contains(date.weekday()));
        let date_matches = self.date.as_ref().map_or(true, |d| d == date);
        field_matches && day_matches && date_matches
    }

    /// Whether a start time falls outside the restriction's bounds.
    pub fn excludes(&self, time: TimeWithoutDate) -> bool {
        let too_early = self.earliest_start.is_some_and(|earliest| time < earliest);
        let too_late = self.latest_start.is_some_and(|latest| time > latest);
        too_early || too_late
    }
}

impl Default for Restriction {
    fn default() -> Self {
        Self::new()
    }
}

/// Field catalog, restrictions, and tournament start date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rules {
    /// Tournament start date.
    pub start_date: DateWithoutTime,
    /// Field catalog.
    pub fields: Vec<Field>,
    /// Restrictions, evaluated independently.
    pub restrictions: Vec<Restriction>,
}

impl Rules {
    /// Creates rules with no fields and no restrictions.
    pub fn new(start_date: DateWithoutTime) -> Self {
        Self {
            start_date,
            fields: Vec::new(),
            restrictions: Vec::new(),
        }
    }

    /// Adds a field to the catalog.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a restriction.
    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    /// Adds the default per-field restrictions (see [`Rules::add_default_restrictions`]).
    pub fn with_default_restrictions(mut self, weekday_start: Option<TimeWithoutDate>) -> Self {
        self.add_default_restrictions(weekday_start);
        self
    }

    /// Builds rules from a payload, resolving restriction field names.
    pub fn from_config(config: &RulesConfig) -> Result<Self, ScheduleError> {
        let mut rules = Self::new(config.start_date);
        rules.fields = config.fields.clone();

        if config.use_default_restrictions {
            rules.add_default_restrictions(config.weekday_start);
        }

        for input in &config.restrictions {
            let mut restriction = Restriction::new();
            if let Some(names) = &input.fields {
                for name in names {
                    if rules.get_matching_field(name).is_none() {
                        return Err(ScheduleError::UnknownField(name.clone()));
                    }
                    restriction = restriction.with_field(name.as_str());
                }
            }
            restriction.days = input.days;
            restriction.date = input.date;
            restriction.earliest_start = input.earliest_start;
            restriction.latest_start = input.latest_start;
            rules.restrictions.push(restriction);
        }

        Ok(rules)
    }

    /// Finds a field by name.
    pub fn get_matching_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Restrictions covering a field on a date.
    fn matching<'a>(
        &'a self,
        field: &'a Field,
        date: &'a DateWithoutTime,
    ) -> impl Iterator<Item = &'a Restriction> + 'a {
        self.restrictions
            .iter()
            .filter(move |r| r.applies_to(field, date))
    }

    /// Whether starting a game at `time` on `field` and `date` breaks any
    /// matching restriction.
    pub fn does_proposal_violate_restrictions(
        &self,
        field: &Field,
        date: &DateWithoutTime,
        time: TimeWithoutDate,
    ) -> bool {
        self.matching(field, date).any(|r| r.excludes(time))
    }

    /// The first slot on `field` and `date` starting no earlier than `time`
    /// (default 08:00) and no earlier than any matching restriction's
    /// earliest start.
    ///
    /// Latest starts are not checked here; callers test the returned slot
    /// with [`Rules::does_proposal_violate_restrictions`].
    pub fn get_first_slot_for_field_date_after_time(
        &self,
        field: &Field,
        date: &DateWithoutTime,
        time: Option<TimeWithoutDate>,
    ) -> FieldSlot {
        let start = self
            .matching(field, date)
            .filter_map(|r| r.earliest_start)
            .fold(time.unwrap_or(DEFAULT_DAY_START), TimeWithoutDate::max);
        FieldSlot::new(field.clone(), start)
    }

    /// Adds the standard weekend/weekday restrictions for every field.
    ///
    /// Saturday starts at 09:00, Sunday at 10:00, Monday to Friday at
    /// `weekday_start` (default 18:00). The latest start is 20:00 on lit
    /// fields and 18:00 otherwise.
    pub fn add_default_restrictions(&mut self, weekday_start: Option<TimeWithoutDate>) {
        let weekday_start = weekday_start.unwrap_or(WEEKDAY_START);
        let mut defaults = Vec::with_capacity(self.fields.len() * 3);

        for field in &self.fields {
            let latest = if field.has_lights {
                LIGHTS_LATEST_START
            } else {
                DARK_LATEST_START
            };
            let days_and_starts = [
                (DaysOfWeek::only(Weekday::Sat), SATURDAY_START),
                (DaysOfWeek::only(Weekday::Sun), SUNDAY_START),
                (DaysOfWeek::WEEKDAYS, weekday_start),
            ];
            for (days, earliest) in days_and_starts {
                defaults.push(
                    Restriction::for_field(field.name.as_str())
                        .on_days(days)
                        .with_earliest_start(earliest)
                        .with_latest_start(latest),
                );
            }
        }

        self.restrictions.extend(defaults);
    }
}

/// Serialized form of [`Rules`] as supplied by an importing layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Tournament start date.
    pub start_date: DateWithoutTime,
    /// Field catalog.
    pub fields: Vec<Field>,
    /// Whether to generate the default weekend/weekday restrictions.
    #[serde(default)]
    pub use_default_restrictions: bool,
    /// Weekday earliest start for the default restrictions.
    #[serde(default)]
    pub weekday_start: Option<TimeWithoutDate>,
    /// Additional restrictions.
    #[serde(default)]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Serialized form of one [`Restriction`], referencing fields by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RestrictionConfig {
    /// Field names covered. `None` = all fields.
    pub fields: Option<Vec<String>>,
    /// Days of week covered. `None` = every day.
    pub days: Option<DaysOfWeek>,
    /// Single date covered.
    pub date: Option<DateWithoutTime>,
    /// Earliest allowed start.
    pub earliest_start: Option<TimeWithoutDate>,
    /// Latest allowed start.
    pub latest_start: Option<TimeWithoutDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sunday() -> DateWithoutTime {
        DateWithoutTime::from_ymd(2024, 6, 2).unwrap()
    }

    fn tuesday() -> DateWithoutTime {
        DateWithoutTime::from_ymd(2024, 6, 4).unwrap()
    }

    fn rules_with(fields: &[Field]) -> Rules {
        let mut rules = Rules::new(sunday());
        rules.fields = fields.to_vec();
        rules
    }

    #[test]
    fn test_days_of_week() {
        let days = DaysOfWeek::only(Weekday::Sat).with(Weekday::Sun);
        assert!(days.contains(Weekday::Sat));
        assert!(days.contains(Weekday::Sun));
        assert!(!days.contains(Weekday::Mon));
        assert_eq!(days.days(), vec![Weekday::Sat, Weekday::Sun]);
        assert!(DaysOfWeek::WEEKDAYS.contains(Weekday::Fri));
        assert!(!DaysOfWeek::WEEKDAYS.contains(Weekday::Sat));
        assert!(DaysOfWeek::none().is_empty());
    }

    #[test]
    fn test_days_of_week_serde() {
        let days = DaysOfWeek::only(Weekday::Mon).with(Weekday::Wed);
        let json = serde_json::to_string(&days).unwrap();
        let back: DaysOfWeek = serde_json::from_str(&json).unwrap();
        assert_eq!(back, days);
    }

    #[test]
    fn test_get_matching_field() {
        let rules = rules_with(&[Field::new("F1", false, 90), Field::new("F2", true, 90)]);
        assert!(rules.get_matching_field("F2").unwrap().has_lights);
        assert!(rules.get_matching_field("F3").is_none());
    }

    #[test]
    fn test_violation_requires_matching_field_and_day() {
        let f1 = Field::new("F1", false, 90);
        let f2 = Field::new("F2", false, 90);
        let rules = rules_with(&[f1.clone(), f2.clone()]).with_restriction(
            Restriction::for_field("F1")
                .on_days(DaysOfWeek::only(Weekday::Sun))
                .with_earliest_start(TimeWithoutDate::from_hm(12, 0)),
        );

        let nine = TimeWithoutDate::from_hm(9, 0);
        assert!(rules.does_proposal_violate_restrictions(&f1, &sunday(), nine));
        assert!(!rules.does_proposal_violate_restrictions(&f2, &sunday(), nine));
        assert!(!rules.does_proposal_violate_restrictions(&f1, &tuesday(), nine));
    }

    #[test]
    fn test_latest_start_is_inclusive() {
        let f = Field::new("F1", false, 90);
        let rules = rules_with(&[f.clone()]).with_default_restrictions(None);

        let date = sunday();
        assert!(!rules.does_proposal_violate_restrictions(&f, &date, DARK_LATEST_START));
        assert!(rules.does_proposal_violate_restrictions(
            &f,
            &date,
            TimeWithoutDate::from_hm(18, 1)
        ));
    }

    #[test]
    fn test_blackout_blocks_all_times() {
        let f = Field::new("F1", true, 90);
        let rules = rules_with(&[f.clone()])
            .with_restriction(Restriction::for_field("F1").on_date(sunday()).blackout());

        for hour in 0..24 {
            let t = TimeWithoutDate::from_hm(hour, 0);
            assert!(rules.does_proposal_violate_restrictions(&f, &sunday(), t));
        }
        let t = TimeWithoutDate::from_hm(12, 0);
        assert!(!rules.does_proposal_violate_restrictions(&f, &sunday().add_days(7), t));
    }

    #[test]
    fn test_first_slot_default_floor() {
        let f = Field::new("F1", false, 90);
        let rules = rules_with(&[f.clone()]);
        let slot = rules.get_first_slot_for_field_date_after_time(&f, &sunday(), None);
        assert_eq!(slot.start, DEFAULT_DAY_START);
        assert_eq!(slot.field, f);
    }

    #[test]
    fn test_first_slot_takes_most_restrictive_earliest() {
        let f = Field::new("F1", false, 90);
        let rules = rules_with(&[f.clone()])
            .with_restriction(Restriction::new().with_earliest_start(TimeWithoutDate::from_hm(9, 0)))
            .with_restriction(
                Restriction::for_field("F1")
                    .with_earliest_start(TimeWithoutDate::from_hm(11, 0))
                    .with_latest_start(TimeWithoutDate::from_hm(10, 0)),
            );

        let slot = rules.get_first_slot_for_field_date_after_time(&f, &sunday(), None);
        assert_eq!(slot.start, TimeWithoutDate::from_hm(11, 0));

        // Caller-supplied time beyond every restriction wins
        let later = TimeWithoutDate::from_hm(15, 0);
        let slot = rules.get_first_slot_for_field_date_after_time(&f, &sunday(), Some(later));
        assert_eq!(slot.start, later);
    }

    #[test]
    fn test_tightening_earliest_never_moves_first_slot_earlier() {
        let f = Field::new("F1", false, 90);
        let base = rules_with(&[f.clone()]).with_default_restrictions(None);
        let baseline = base.get_first_slot_for_field_date_after_time(&f, &sunday(), None);

        for hour in 0..24 {
            let tightened = base.clone().with_restriction(
                Restriction::for_field("F1").with_earliest_start(TimeWithoutDate::from_hm(hour, 0)),
            );
            let slot = tightened.get_first_slot_for_field_date_after_time(&f, &sunday(), None);
            assert!(slot.start >= baseline.start);
        }
    }

    #[test]
    fn test_default_restrictions() {
        let dark = Field::new("Dark", false, 90);
        let lit = Field::new("Lit", true, 90);
        let rules = rules_with(&[dark.clone(), lit.clone()])
            .with_default_restrictions(Some(TimeWithoutDate::from_hm(17, 30)));
        assert_eq!(rules.restrictions.len(), 6);

        let saturday = sunday().add_days(-1);
        let first = |f: &Field, d: &DateWithoutTime| {
            rules.get_first_slot_for_field_date_after_time(f, d, None).start
        };
        assert_eq!(first(&dark, &saturday), SATURDAY_START);
        assert_eq!(first(&dark, &sunday()), SUNDAY_START);
        assert_eq!(first(&lit, &tuesday()), TimeWithoutDate::from_hm(17, 30));

        let nineteen = TimeWithoutDate::from_hm(19, 0);
        assert!(rules.does_proposal_violate_restrictions(&dark, &tuesday(), nineteen));
        assert!(!rules.does_proposal_violate_restrictions(&lit, &tuesday(), nineteen));
    }

    #[test]
    fn test_from_config() {
        let json = r#"{
            "start_date": "2024-06-01",
            "fields": [
                {"name": "F1", "has_lights": false, "slot_length_minutes": 90},
                {"name": "F2", "has_lights": true, "slot_length_minutes": 120}
            ],
            "use_default_restrictions": true,
            "restrictions": [
                {"fields": ["F2"], "days": ["Sun"], "earliest_start": "13:00"}
            ]
        }"#;
        let config: RulesConfig = serde_json::from_str(json).unwrap();
        let rules = Rules::from_config(&config).unwrap();

        assert_eq!(rules.fields.len(), 2);
        assert_eq!(rules.restrictions.len(), 7);
        let f2 = rules.get_matching_field("F2").unwrap();
        let slot = rules.get_first_slot_for_field_date_after_time(f2, &sunday(), None);
        assert_eq!(slot.start, TimeWithoutDate::from_hm(13, 0));
    }

    #[test]
    fn test_from_config_serial_times() {
        // Spreadsheet export: date and times as date-serial numbers
        let json = r#"{
            "start_date": 45444,
            "fields": [{"name": "F1", "has_lights": false, "slot_length_minutes": 90}],
            "weekday_start": 0.8125,
            "restrictions": [
                {"fields": ["F1"], "date": 45445, "earliest_start": 0.375, "latest_start": 0.75}
            ]
        }"#;
        let config: RulesConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.start_date, DateWithoutTime::from_ymd(2024, 6, 1).unwrap());
        assert_eq!(config.weekday_start, Some(TimeWithoutDate::from_hm(19, 30)));

        let rules = Rules::from_config(&config).unwrap();
        let restriction = &rules.restrictions[0];
        assert_eq!(restriction.date, Some(sunday()));
        assert_eq!(restriction.earliest_start, Some(TimeWithoutDate::from_hm(9, 0)));
        assert_eq!(restriction.latest_start, Some(TimeWithoutDate::from_hm(18, 0)));

        let f1 = rules.get_matching_field("F1").unwrap();
        let slot = rules.get_first_slot_for_field_date_after_time(f1, &sunday(), None);
        assert_eq!(slot.start, TimeWithoutDate::from_hm(9, 0));
        assert!(rules.does_proposal_violate_restrictions(f1, &sunday(), TimeWithoutDate::from_hm(18, 30)));
    }

    #[test]
    fn test_from_config_unknown_field() {
        let config = RulesConfig {
            start_date: sunday(),
            fields: vec![Field::new("F1", false, 90)],
            use_default_restrictions: false,
            weekday_start: None,
            restrictions: vec![RestrictionConfig {
                fields: Some(vec!["Nope".into()]),
                ..Default::default()
            }],
        };
        assert_eq!(
            Rules::from_config(&config).unwrap_err(),
            ScheduleError::UnknownField("Nope".into())
        );
    }
}
