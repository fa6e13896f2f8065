use crate::models::{
    Activity, ActivityType, DashboardResponse, Goal, GoalProgressView, SeriesPoint,
    SeriesResponse, SummaryCard, User,
};
use chrono::{Duration, Local, NaiveDate};

const SERIES_DAYS: i64 = 7;
const RECENT_ACTIVITY_COUNT: usize = 5;

/// Sum of one type's values logged on a single day.
pub fn daily_total(activities: &[Activity], date: NaiveDate, activity_type: ActivityType) -> f64 {
    activities
        .iter()
        .filter(|activity| activity.date == date && activity.activity_type == activity_type)
        .map(|activity| activity.value)
        .sum()
}

/// All-time sum of one type's values. Goal progress is measured against this,
/// not against the daily total.
pub fn cumulative_total(activities: &[Activity], activity_type: ActivityType) -> f64 {
    activities
        .iter()
        .filter(|activity| activity.activity_type == activity_type)
        .map(|activity| activity.value)
        .sum()
}

pub fn goal_progress_percent(goal: &Goal) -> f64 {
    if goal.target <= 0.0 {
        return 0.0;
    }
    (goal.current / goal.target * 100.0).min(100.0)
}

/// Overwrites every goal's `current` and `completed` from the activity log.
pub fn recompute_goal_progress(goals: &mut [Goal], activities: &[Activity]) {
    for goal in goals {
        goal.current = cumulative_total(activities, goal.goal_type);
        goal.completed = goal.current >= goal.target;
    }
}

/// Daily totals for the seven calendar days ending on `today`, oldest first.
/// Days without activity are explicit zeros.
pub fn last_7_days(
    activities: &[Activity],
    activity_type: ActivityType,
    today: NaiveDate,
) -> Vec<SeriesPoint> {
    (0..SERIES_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            SeriesPoint {
                date,
                label: date.format("%b %d").to_string(),
                value: daily_total(activities, date, activity_type),
            }
        })
        .collect()
}

pub fn build_series(activities: &[Activity], activity_type: ActivityType) -> SeriesResponse {
    build_series_at(today(), activities, activity_type)
}

pub fn build_series_at(
    today: NaiveDate,
    activities: &[Activity],
    activity_type: ActivityType,
) -> SeriesResponse {
    SeriesResponse {
        activity_type,
        points: last_7_days(activities, activity_type, today),
    }
}

pub fn build_dashboard(activities: &[Activity], goals: &[Goal], user: &User) -> DashboardResponse {
    build_dashboard_at(today(), activities, goals, user)
}

pub fn build_dashboard_at(
    today: NaiveDate,
    activities: &[Activity],
    goals: &[Goal],
    user: &User,
) -> DashboardResponse {
    let cards = ActivityType::ALL
        .into_iter()
        .map(|activity_type| SummaryCard {
            activity_type,
            title: activity_type.title().to_string(),
            unit: activity_type.unit().to_string(),
            today_total: daily_total(activities, today, activity_type),
            goal_progress: goals
                .iter()
                .find(|goal| goal.goal_type == activity_type)
                .map(goal_progress_percent)
                .unwrap_or(0.0),
        })
        .collect();

    let goals = goals
        .iter()
        .map(|goal| GoalProgressView {
            progress: goal_progress_percent(goal),
            goal: goal.clone(),
        })
        .collect();

    DashboardResponse {
        greeting_name: user.name.clone(),
        date: today,
        date_label: today.format("%A, %B %-d, %Y").to_string(),
        cards,
        goals,
        recent_activities: activities.iter().take(RECENT_ACTIVITY_COUNT).cloned().collect(),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn activity(activity_type: ActivityType, value: f64, date: NaiveDate) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            activity_type,
            value,
            date,
            notes: None,
        }
    }

    fn goal(goal_type: ActivityType, target: f64, current: f64) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            goal_type,
            target,
            current,
            deadline: None,
            completed: false,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_total_only_counts_matching_day_and_type() {
        let today = day(2026, 10, 19);
        let activities = vec![
            activity(ActivityType::Steps, 4000.0, today),
            activity(ActivityType::Steps, 1500.0, today),
            activity(ActivityType::Steps, 9000.0, today - Duration::days(1)),
            activity(ActivityType::Calories, 300.0, today),
        ];

        assert_eq!(daily_total(&activities, today, ActivityType::Steps), 5500.0);
        assert_eq!(cumulative_total(&activities, ActivityType::Steps), 14500.0);
        assert_eq!(daily_total(&activities, today, ActivityType::Sleep), 0.0);
    }

    #[test]
    fn goal_progress_is_capped_at_one_hundred() {
        assert_eq!(goal_progress_percent(&goal(ActivityType::Steps, 10000.0, 2500.0)), 25.0);
        assert_eq!(goal_progress_percent(&goal(ActivityType::Steps, 10000.0, 25000.0)), 100.0);
        assert_eq!(goal_progress_percent(&goal(ActivityType::Steps, 0.0, 10.0)), 0.0);
    }

    #[test]
    fn recompute_sets_completed_from_all_time_total() {
        let today = day(2026, 10, 19);
        let activities = vec![
            activity(ActivityType::Workout, 20.0, today - Duration::days(30)),
            activity(ActivityType::Workout, 40.0, today),
        ];
        let mut goals = vec![
            goal(ActivityType::Workout, 60.0, 0.0),
            goal(ActivityType::Workout, 90.0, 500.0),
            goal(ActivityType::Sleep, 8.0, 8.0),
        ];

        recompute_goal_progress(&mut goals, &activities);

        assert_eq!(goals[0].current, 60.0);
        assert!(goals[0].completed);
        assert_eq!(goals[1].current, 60.0);
        assert!(!goals[1].completed);
        assert_eq!(goals[2].current, 0.0);
        assert!(!goals[2].completed);
    }

    #[test]
    fn series_has_seven_aligned_days_with_zero_gaps() {
        let today = day(2026, 10, 19);
        let three_days_ago = today - Duration::days(3);
        let activities = vec![
            activity(ActivityType::Sleep, 7.5, three_days_ago),
            activity(ActivityType::Sleep, 1.0, three_days_ago),
            activity(ActivityType::Sleep, 9.0, today - Duration::days(7)),
        ];

        let points = last_7_days(&activities, ActivityType::Sleep, today);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, day(2026, 10, 13));
        assert_eq!(points[0].label, "Oct 13");
        assert_eq!(points[6].date, today);
        assert_eq!(points[6].value, 0.0);

        let point = points
            .iter()
            .find(|point| point.date == three_days_ago)
            .expect("missing day");
        assert_eq!(point.value, 8.5);
        assert_eq!(points.iter().map(|point| point.value).sum::<f64>(), 8.5);
    }

    #[test]
    fn series_crosses_month_boundaries() {
        let points = last_7_days(&[], ActivityType::Steps, day(2026, 3, 2));
        let labels: Vec<_> = points.iter().map(|point| point.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Feb 24", "Feb 25", "Feb 26", "Feb 27", "Feb 28", "Mar 01", "Mar 02"]
        );
    }

    #[test]
    fn dashboard_cards_use_todays_totals_and_first_goal() {
        let today = day(2026, 10, 19);
        let activities = vec![
            activity(ActivityType::Steps, 3000.0, today - Duration::days(1)),
            activity(ActivityType::Steps, 2000.0, today),
        ];
        let goals = vec![
            goal(ActivityType::Steps, 10000.0, 5000.0),
            goal(ActivityType::Steps, 1000.0, 5000.0),
        ];

        let dashboard = build_dashboard_at(today, &activities, &goals, &User::default());

        assert_eq!(dashboard.greeting_name, "User");
        assert_eq!(dashboard.date_label, "Monday, October 19, 2026");
        assert_eq!(dashboard.cards.len(), 4);
        let steps = &dashboard.cards[0];
        assert_eq!(steps.activity_type, ActivityType::Steps);
        assert_eq!(steps.today_total, 2000.0);
        assert_eq!(steps.goal_progress, 50.0);
        assert_eq!(dashboard.cards[3].title, "Sleep (hrs)");
        assert_eq!(dashboard.cards[3].goal_progress, 0.0);
        assert_eq!(dashboard.goals[1].progress, 100.0);
    }

    #[test]
    fn dashboard_lists_first_five_activities_in_log_order() {
        let today = day(2026, 10, 19);
        let activities: Vec<_> = (1..=7)
            .map(|n| activity(ActivityType::Calories, f64::from(n), today))
            .collect();

        let dashboard = build_dashboard_at(today, &activities, &[], &User::default());
        let values: Vec<_> = dashboard
            .recent_activities
            .iter()
            .map(|activity| activity.value)
            .collect();
        assert_eq!(values, [1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
