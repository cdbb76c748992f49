//! Capacity configuration
//!
//! [`CapacityConfig`] is the persisted, host-shaped description of supply.
//! [`CapacityConfig::validate`] turns it into a [`ResolvedCapacity`] that can
//! answer "how many hours are available on this business day?".

use crate::calendar;
use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Period the configured hours refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPeriod {
    /// Hours per Mon-Fri week
    #[default]
    Week,
    /// Hours per calendar month
    Month,
}

impl CapacityPeriod {
    /// First day of the period containing `date`
    #[must_use]
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Week => calendar::week_start(date),
            Self::Month => calendar::month_start(date),
        }
    }

    /// Business days the period's hours are spread over
    #[must_use]
    pub fn business_days(self, date: NaiveDate) -> u32 {
        match self {
            Self::Week => 5,
            Self::Month => calendar::business_days_in_month(date),
        }
    }
}

/// How capacity varies over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityMode {
    /// Same hours every period
    #[default]
    Fixed,
    /// Hours taken from a dated schedule
    VariableSchedule,
}

/// A team member's supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Display name, matched against work item assignees
    pub name: String,
    /// Hours available per period
    pub hours_per_period: f64,
    /// First active day, if bounded
    #[serde(default)]
    pub active_from: Option<NaiveDate>,
    /// Last active day, if bounded
    #[serde(default)]
    pub active_until: Option<NaiveDate>,
}

impl TeamMember {
    /// Create an always-active member
    #[must_use]
    pub fn new(name: impl Into<String>, hours_per_period: f64) -> Self {
        Self {
            name: name.into(),
            hours_per_period,
            active_from: None,
            active_until: None,
        }
    }

    /// With active date range
    #[inline]
    #[must_use]
    pub fn active_between(mut self, from: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        self.active_from = from;
        self.active_until = until;
        self
    }

    /// Whether the member supplies hours on `date`
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.active_from.map_or(true, |from| from <= date)
            && self.active_until.map_or(true, |until| date <= until)
    }
}

/// Hours bound to a schedule period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleAllocation {
    /// One figure for the whole team
    TeamTotal {
        /// Hours per period
        hours: f64,
    },
    /// Hours per named member
    PerMember {
        /// Member name to hours per period
        hours: BTreeMap<String, f64>,
    },
}

/// Schedule entry for variable-schedule mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitySchedulePeriod {
    /// Day the allocation takes effect (normalized to its period start)
    pub start_date: NaiveDate,
    /// Allocation from that period on
    pub allocation: ScheduleAllocation,
}

/// Persisted capacity configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    /// Period the hour figures refer to
    pub period: CapacityPeriod,
    /// Fixed or scheduled
    pub mode: CapacityMode,
    /// Flat team hours per period
    pub team_hours: Option<f64>,
    /// Per-member supply (takes precedence over `team_hours`)
    pub members: Vec<TeamMember>,
    /// Dated allocations for variable-schedule mode
    pub schedule: Vec<CapacitySchedulePeriod>,
}

impl CapacityConfig {
    /// Fixed team total per week
    #[must_use]
    pub fn team_per_week(hours: f64) -> Self {
        Self {
            team_hours: Some(hours),
            ..Self::default()
        }
    }

    /// Fixed team total per month
    #[must_use]
    pub fn team_per_month(hours: f64) -> Self {
        Self {
            period: CapacityPeriod::Month,
            team_hours: Some(hours),
            ..Self::default()
        }
    }

    /// Fixed per-member supply
    #[must_use]
    pub fn from_members(period: CapacityPeriod, members: Vec<TeamMember>) -> Self {
        Self {
            period,
            members,
            ..Self::default()
        }
    }

    /// Variable schedule
    #[must_use]
    pub fn scheduled(period: CapacityPeriod, schedule: Vec<CapacitySchedulePeriod>) -> Self {
        Self {
            period,
            mode: CapacityMode::VariableSchedule,
            schedule,
            ..Self::default()
        }
    }

    /// With member list
    #[inline]
    #[must_use]
    pub fn with_members(mut self, members: Vec<TeamMember>) -> Self {
        self.members = members;
        self
    }

    /// Check the configuration shape and resolve it for lookups
    ///
    /// # Errors
    /// Returns [`ConfigError`] naming the missing or invalid field.
    pub fn validate(&self) -> Result<ResolvedCapacity, ConfigError> {
        if let Some(hours) = self.team_hours {
            check_hours("team_hours".to_string(), hours)?;
        }
        for member in &self.members {
            check_hours(
                format!("members[{}].hours_per_period", member.name),
                member.hours_per_period,
            )?;
            if let (Some(from), Some(until)) = (member.active_from, member.active_until) {
                if until < from {
                    return Err(ConfigError::InvalidMemberRange {
                        name: member.name.clone(),
                    });
                }
            }
        }
        for (index, entry) in self.schedule.iter().enumerate() {
            match &entry.allocation {
                ScheduleAllocation::TeamTotal { hours } => {
                    check_hours(format!("schedule[{index}].hours"), *hours)?;
                }
                ScheduleAllocation::PerMember { hours } => {
                    for (name, value) in hours {
                        check_hours(format!("schedule[{index}].hours.{name}"), *value)?;
                    }
                }
            }
        }

        let base = if self.members.is_empty() {
            self.team_hours.map(BaseSupply::Team)
        } else {
            Some(BaseSupply::Members)
        };

        let schedule = match self.mode {
            CapacityMode::Fixed => {
                if base.is_none() {
                    return Err(ConfigError::MissingCapacitySource {
                        fields: "team_hours, members",
                    });
                }
                Vec::new()
            }
            CapacityMode::VariableSchedule => {
                if self.schedule.is_empty() {
                    return Err(ConfigError::MissingField("schedule"));
                }
                let mut entries: Vec<(NaiveDate, ScheduleAllocation)> = self
                    .schedule
                    .iter()
                    .map(|e| (self.period.period_start(e.start_date), e.allocation.clone()))
                    .collect();
                entries.sort_by_key(|(start, _)| *start);
                entries
            }
        };

        Ok(ResolvedCapacity {
            period: self.period,
            base,
            members: self.members.clone(),
            schedule,
        })
    }
}

fn check_hours(field: String, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidHours { field, value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BaseSupply {
    Team(f64),
    Members,
}

/// Validated capacity, ready for per-day lookups
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCapacity {
    period: CapacityPeriod,
    base: Option<BaseSupply>,
    members: Vec<TeamMember>,
    schedule: Vec<(NaiveDate, ScheduleAllocation)>,
}

impl ResolvedCapacity {
    /// Period the hour figures refer to
    #[inline]
    #[must_use]
    pub fn period(&self) -> CapacityPeriod {
        self.period
    }

    /// Configured team members
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    /// Team hours available on `date` (zero on weekends)
    #[must_use]
    pub fn hours_on(&self, date: NaiveDate) -> f64 {
        if !calendar::is_business_day(date) {
            return 0.0;
        }
        self.period_hours_on(date) / self.period_days(date)
    }

    /// Hours `name` supplies on `date`
    ///
    /// Returns `None` when the configuration has no per-member figure for
    /// that name on that day's allocation.
    #[must_use]
    pub fn member_hours_on(&self, name: &str, date: NaiveDate) -> Option<f64> {
        let member = self.members.iter().find(|m| m.name == name);
        let per_period = match self.allocation_for(date) {
            Some(ScheduleAllocation::PerMember { hours }) => hours.get(name).copied()?,
            Some(ScheduleAllocation::TeamTotal { .. }) => return None,
            None => match self.base {
                Some(BaseSupply::Members) => member?.hours_per_period,
                _ => return None,
            },
        };

        if !calendar::is_business_day(date) || member.is_some_and(|m| !m.is_active_on(date)) {
            return Some(0.0);
        }
        Some(per_period / self.period_days(date))
    }

    fn period_days(&self, date: NaiveDate) -> f64 {
        f64::from(self.period.business_days(date).max(1))
    }

    fn allocation_for(&self, date: NaiveDate) -> Option<&ScheduleAllocation> {
        let period_start = self.period.period_start(date);
        self.schedule
            .iter()
            .take_while(|(start, _)| *start <= period_start)
            .last()
            .map(|(_, allocation)| allocation)
    }

    fn period_hours_on(&self, date: NaiveDate) -> f64 {
        match self.allocation_for(date) {
            Some(ScheduleAllocation::TeamTotal { hours }) => *hours,
            Some(ScheduleAllocation::PerMember { hours }) => hours
                .iter()
                .filter(|(name, _)| {
                    self.members
                        .iter()
                        .find(|m| &m.name == *name)
                        .map_or(true, |m| m.is_active_on(date))
                })
                .map(|(_, h)| *h)
                .sum(),
            None => match self.base {
                Some(BaseSupply::Team(hours)) => hours,
                Some(BaseSupply::Members) => self
                    .members
                    .iter()
                    .filter(|m| m.is_active_on(date))
                    .map(|m| m.hours_per_period)
                    .sum(),
                None => 0.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn weekly_team_hours_spread_over_five_days() {
        let capacity = CapacityConfig::team_per_week(40.0).validate().unwrap();
        assert_eq!(capacity.hours_on(d("2024-01-08")), 8.0);
        assert_eq!(capacity.hours_on(d("2024-01-13")), 0.0);
    }

    #[test]
    fn monthly_team_hours_spread_over_month_business_days() {
        // January 2024 has 23 business days
        let capacity = CapacityConfig::team_per_month(230.0).validate().unwrap();
        assert!((capacity.hours_on(d("2024-01-10")) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn members_respect_active_range() {
        let members = vec![
            TeamMember::new("ana", 40.0),
            TeamMember::new("bo", 20.0).active_between(Some(d("2024-01-15")), None),
        ];
        let capacity = CapacityConfig::from_members(CapacityPeriod::Week, members)
            .validate()
            .unwrap();
        assert_eq!(capacity.hours_on(d("2024-01-12")), 8.0);
        assert_eq!(capacity.hours_on(d("2024-01-15")), 12.0);
        assert_eq!(capacity.member_hours_on("bo", d("2024-01-12")), Some(0.0));
        assert_eq!(capacity.member_hours_on("bo", d("2024-01-16")), Some(4.0));
        assert_eq!(capacity.member_hours_on("cy", d("2024-01-16")), None);
    }

    #[test]
    fn members_take_precedence_over_team_total() {
        let config = CapacityConfig::team_per_week(100.0)
            .with_members(vec![TeamMember::new("ana", 10.0)]);
        let capacity = config.validate().unwrap();
        assert_eq!(capacity.hours_on(d("2024-01-08")), 2.0);
    }

    #[test]
    fn schedule_picks_latest_entry_for_period() {
        let schedule = vec![
            CapacitySchedulePeriod {
                start_date: d("2024-01-08"),
                allocation: ScheduleAllocation::TeamTotal { hours: 40.0 },
            },
            // Starts mid-week: applies to the whole week of the 15th
            CapacitySchedulePeriod {
                start_date: d("2024-01-17"),
                allocation: ScheduleAllocation::PerMember {
                    hours: BTreeMap::from([("ana".to_string(), 20.0), ("bo".to_string(), 30.0)]),
                },
            },
        ];
        let capacity = CapacityConfig::scheduled(CapacityPeriod::Week, schedule)
            .validate()
            .unwrap();
        assert_eq!(capacity.hours_on(d("2024-01-05")), 0.0);
        assert_eq!(capacity.hours_on(d("2024-01-10")), 8.0);
        assert_eq!(capacity.hours_on(d("2024-01-15")), 10.0);
        assert_eq!(capacity.member_hours_on("ana", d("2024-01-15")), Some(4.0));
        assert_eq!(capacity.member_hours_on("ana", d("2024-01-10")), None);
    }

    #[test]
    fn missing_source_is_a_typed_error() {
        let err = CapacityConfig::default().validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingCapacitySource {
                fields: "team_hours, members"
            }
        );

        let err = CapacityConfig::scheduled(CapacityPeriod::Week, Vec::new())
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingField("schedule"));
    }

    #[test]
    fn negative_hours_rejected() {
        let err = CapacityConfig::team_per_week(-1.0).validate().unwrap_err();
        assert_eq!(err.field(), "team_hours");

        let members = vec![TeamMember::new("ana", 8.0)
            .active_between(Some(d("2024-02-01")), Some(d("2024-01-01")))];
        let err = CapacityConfig::from_members(CapacityPeriod::Week, members)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMemberRange { .. }));
    }
}
