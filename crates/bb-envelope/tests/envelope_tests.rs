use bb_envelope::{
    feasibility_score, EnvelopeBuilder, ForecastStatus, ForecastThresholds, Granularity,
};
use bb_model::{CapacityConfig, CapacityPeriod, CapacitySchedulePeriod, ScheduleAllocation};
use bb_test_utils::{date, dated_item, monday, team_capacity, undated_item, weekly_backlog};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_weekly_rollup_aggregates_business_days() {
    let capacity = team_capacity(40.0);
    let items = weekly_backlog(3, monday(), 30.0);
    let envelope =
        EnvelopeBuilder::new(&capacity, ForecastThresholds::default()).build(&items, monday());

    assert_eq!(envelope.totals.total_days, 15);
    let weeks = envelope.rollup(Granularity::Week);
    assert_eq!(weeks.len(), 3);
    for (i, week) in weeks.iter().enumerate() {
        assert_eq!(week.day_count, 5);
        assert!((week.capacity - 40.0).abs() < 1e-9);
        assert!((week.demand - 30.0).abs() < 1e-9);
        assert!(!week.overloaded);
        assert!((week.cumulative_demand - 30.0 * (i as f64 + 1.0)).abs() < 1e-9);
    }
    assert_eq!(weeks[1].period_start, date("2024-01-15"));

    let months = envelope.rollup(Granularity::Month);
    assert_eq!(months.len(), 1);
    assert_eq!(months[0].day_count, 15);
    assert_eq!(months[0].last_day, date("2024-01-26"));

    assert_eq!(envelope.rollup(Granularity::Day).len(), 15);
}

#[test]
fn test_overloaded_project_forecasts_slip() {
    // 20h/week against 120h over two weeks
    let capacity = team_capacity(20.0);
    let items = vec![dated_item("A", "2024-01-08", "2024-01-19", 120.0)];
    let envelope =
        EnvelopeBuilder::new(&capacity, ForecastThresholds::default()).build(&items, monday());

    assert_eq!(envelope.totals.total_capacity, 40.0);
    assert!(envelope.has_overload());
    assert_eq!(envelope.totals.overloaded_days, 10);
    // coverage 1/3 less the 0.3 cap
    assert_eq!(envelope.feasibility_score, 3);
    // 80h short at 4h/day
    assert_eq!(envelope.forecast.extra_days, Some(20));
    assert_eq!(envelope.forecast.status, ForecastStatus::Critical);
    assert!(envelope.peak_overload() > 70.0);
}

#[test]
fn test_variable_schedule_changes_daily_capacity() {
    let config = CapacityConfig::scheduled(
        CapacityPeriod::Week,
        vec![
            CapacitySchedulePeriod {
                start_date: date("2024-01-08"),
                allocation: ScheduleAllocation::TeamTotal { hours: 40.0 },
            },
            CapacitySchedulePeriod {
                start_date: date("2024-01-15"),
                allocation: ScheduleAllocation::TeamTotal { hours: 10.0 },
            },
        ],
    );
    let capacity = config.validate().unwrap();
    let items = vec![dated_item("A", "2024-01-08", "2024-01-19", 20.0)];
    let envelope =
        EnvelopeBuilder::new(&capacity, ForecastThresholds::default()).build(&items, monday());

    assert_eq!(envelope.day(date("2024-01-12")).unwrap().capacity, 8.0);
    assert_eq!(envelope.day(date("2024-01-15")).unwrap().capacity, 2.0);
    assert_eq!(envelope.totals.total_capacity, 50.0);
}

#[test]
fn test_unscheduled_demand_still_scores() {
    let capacity = team_capacity(40.0);
    let items = vec![
        dated_item("A", "2024-01-08", "2024-01-12", 20.0),
        undated_item("B", 40.0),
    ];
    let envelope =
        EnvelopeBuilder::new(&capacity, ForecastThresholds::default()).build(&items, monday());

    assert_eq!(envelope.totals.total_demand, 60.0);
    assert_eq!(envelope.feasibility_score, feasibility_score(40.0, 60.0, 0, 5));
    assert!(!envelope.has_overload());
}

proptest! {
    #[test]
    fn prop_cumulative_series_is_monotone(
        count in 1usize..30,
        hours in 0.0f64..80.0,
        weekly in 0.0f64..200.0,
    ) {
        let capacity = team_capacity(weekly);
        let items = weekly_backlog(count, monday(), hours);
        let envelope =
            EnvelopeBuilder::new(&capacity, ForecastThresholds::default()).build(&items, monday());

        let mut previous = (0.0f64, 0.0f64);
        for day in &envelope.days {
            prop_assert!(day.cumulative_capacity + 1e-9 >= previous.0);
            prop_assert!(day.cumulative_demand + 1e-9 >= previous.1);
            prop_assert!(day.overload >= 0.0);
            prop_assert!((0.0..=100.0).contains(&day.completion_percent));
            previous = (day.cumulative_capacity, day.cumulative_demand);
        }
        prop_assert!(envelope.feasibility_score <= 100);
        prop_assert!((previous.1 - envelope.totals.total_demand).abs() < 1e-6);
    }

    #[test]
    fn prop_more_demand_never_raises_score(
        capacity in 0.0f64..1000.0,
        demand in 0.0f64..1000.0,
        extra in 0.0f64..500.0,
        overloaded in 0u32..40,
        days in 1u32..40,
    ) {
        let base = feasibility_score(capacity, demand, overloaded, days);
        let heavier = feasibility_score(capacity, demand + extra, overloaded, days);
        prop_assert!(heavier <= base);
    }

    #[test]
    fn prop_more_capacity_never_lowers_score(
        capacity in 0.0f64..1000.0,
        demand in 0.0f64..1000.0,
        extra in 0.0f64..500.0,
        overloaded in 0u32..40,
        days in 1u32..40,
    ) {
        let base = feasibility_score(capacity, demand, overloaded, days);
        let stronger = feasibility_score(capacity + extra, demand, overloaded, days);
        prop_assert!(stronger >= base);
    }
}
