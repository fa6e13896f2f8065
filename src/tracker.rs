//! The in-memory source of truth for activities, goals and the profile.
//!
//! Every mutation updates memory first and then rewrites each affected record
//! in the [`Store`]. Goal progress is recomputed on the write side: whenever
//! the activity log changes and is non-empty, every goal's `current` and
//! `completed` are overwritten from the all-time totals. Adding or editing a
//! goal does not trigger that recomputation, so a goal created after
//! activities were logged reads `0` until the next activity change.

use crate::errors::StoreError;
use crate::models::{Activity, ActivityType, Goal, GoalUpdate, NewActivity, NewGoal, User};
use crate::stats::{self, recompute_goal_progress};
use crate::storage::{Store, StoreKey};
use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug)]
pub struct FitnessTracker {
    store: Store,
    activities: Vec<Activity>,
    goals: Vec<Goal>,
    user: User,
}

impl FitnessTracker {
    /// Loads all three records, falling back to empty lists and the default
    /// profile for anything absent or unreadable.
    pub async fn load(store: Store) -> Self {
        let activities: Vec<Activity> = store.load(StoreKey::Activities).await.unwrap_or_default();
        let goals: Vec<Goal> = store.load(StoreKey::Goals).await.unwrap_or_default();
        let user: User = store.load(StoreKey::User).await.unwrap_or_default();
        Self {
            store,
            activities,
            goals,
            user,
        }
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Logs an activity stamped with today's date.
    pub async fn add_activity(&mut self, new_activity: NewActivity) -> Result<Activity, StoreError> {
        self.add_activity_on(new_activity, stats::today()).await
    }

    async fn add_activity_on(
        &mut self,
        new_activity: NewActivity,
        date: NaiveDate,
    ) -> Result<Activity, StoreError> {
        let activity = new_activity.into_activity(Uuid::new_v4(), date);
        debug!(
            id = %activity.id,
            activity_type = %activity.activity_type,
            value = activity.value,
            "logged activity"
        );
        self.activities.push(activity.clone());
        self.activities_changed().await?;
        Ok(activity)
    }

    pub async fn add_goal(&mut self, new_goal: NewGoal) -> Result<Goal, StoreError> {
        let goal = new_goal.into_goal(Uuid::new_v4());
        debug!(id = %goal.id, goal_type = %goal.goal_type, target = goal.target, "added goal");
        self.goals.push(goal.clone());
        self.store.save(StoreKey::Goals, &self.goals).await?;
        Ok(goal)
    }

    /// Merges `update` into the goal with `id`. Returns `false` when no goal
    /// matched, in which case nothing is written.
    pub async fn update_goal(&mut self, id: Uuid, update: GoalUpdate) -> Result<bool, StoreError> {
        let Some(goal) = self.goals.iter_mut().find(|goal| goal.id == id) else {
            return Ok(false);
        };
        update.apply(goal);
        debug!(%id, "updated goal");
        self.store.save(StoreKey::Goals, &self.goals).await?;
        Ok(true)
    }

    pub async fn update_user(&mut self, user: User) -> Result<(), StoreError> {
        self.user = user;
        debug!(name = %self.user.name, "updated profile");
        self.store.save(StoreKey::User, &self.user).await
    }

    pub async fn delete_activity(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let Some(index) = self.activities.iter().position(|activity| activity.id == id) else {
            return Ok(false);
        };
        self.activities.remove(index);
        debug!(%id, "deleted activity");
        self.activities_changed().await?;
        Ok(true)
    }

    pub async fn delete_goal(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let Some(index) = self.goals.iter().position(|goal| goal.id == id) else {
            return Ok(false);
        };
        self.goals.remove(index);
        debug!(%id, "deleted goal");
        self.store.save(StoreKey::Goals, &self.goals).await?;
        Ok(true)
    }

    pub fn activities_by_type(&self, activity_type: ActivityType) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|activity| activity.activity_type == activity_type)
            .collect()
    }

    pub fn activities_by_date(&self, date: NaiveDate) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|activity| activity.date == date)
            .collect()
    }

    pub fn goals_by_type(&self, goal_type: ActivityType) -> Vec<&Goal> {
        self.goals
            .iter()
            .filter(|goal| goal.goal_type == goal_type)
            .collect()
    }

    async fn activities_changed(&mut self) -> Result<(), StoreError> {
        self.store.save(StoreKey::Activities, &self.activities).await?;
        // An emptied log leaves goal totals as they were.
        if !self.activities.is_empty() {
            recompute_goal_progress(&mut self.goals, &self.activities);
            self.store.save(StoreKey::Goals, &self.goals).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn empty_tracker() -> FitnessTracker {
        FitnessTracker::load(Store::in_memory()).await
    }

    fn steps(value: f64) -> NewActivity {
        NewActivity::new(ActivityType::Steps, value, None).unwrap()
    }

    fn goal(goal_type: ActivityType, target: f64) -> NewGoal {
        NewGoal::new(goal_type, target, None).unwrap()
    }

    #[tokio::test]
    async fn empty_store_loads_defaults() {
        let tracker = empty_tracker().await;
        assert!(tracker.activities().is_empty());
        assert!(tracker.goals().is_empty());
        assert_eq!(tracker.user(), &User::default());
    }

    #[tokio::test]
    async fn new_goal_ignores_existing_activities_until_next_change() {
        let mut tracker = empty_tracker().await;

        let first = tracker.add_activity(steps(5000.0)).await.unwrap();
        assert_eq!(first.date, stats::today());
        assert_eq!(tracker.activities().len(), 1);

        let created = tracker
            .add_goal(goal(ActivityType::Steps, 10000.0))
            .await
            .unwrap();
        assert_eq!(created.current, 0.0);
        assert!(!created.completed);
        assert_eq!(tracker.goals_by_type(ActivityType::Steps)[0].current, 0.0);

        tracker.add_activity(steps(6000.0)).await.unwrap();

        let steps_goal = tracker.goals_by_type(ActivityType::Steps)[0];
        assert_eq!(steps_goal.current, 11000.0);
        assert!(steps_goal.completed);
    }

    #[tokio::test]
    async fn any_activity_change_recomputes_every_goal() {
        let mut tracker = empty_tracker().await;
        tracker.add_activity(steps(4000.0)).await.unwrap();
        tracker
            .add_goal(goal(ActivityType::Steps, 5000.0))
            .await
            .unwrap();
        tracker
            .add_goal(goal(ActivityType::Sleep, 8.0))
            .await
            .unwrap();

        let sleep = NewActivity::new(ActivityType::Sleep, 8.0, None).unwrap();
        tracker.add_activity(sleep).await.unwrap();

        for goal in tracker.goals() {
            let expected = stats::cumulative_total(tracker.activities(), goal.goal_type);
            assert_eq!(goal.current, expected);
            assert_eq!(goal.completed, goal.current >= goal.target);
        }
        assert_eq!(tracker.goals_by_type(ActivityType::Steps)[0].current, 4000.0);
        assert!(tracker.goals_by_type(ActivityType::Sleep)[0].completed);
    }

    #[tokio::test]
    async fn recompute_overwrites_manual_goal_updates() {
        let mut tracker = empty_tracker().await;
        let created = tracker
            .add_goal(goal(ActivityType::Calories, 2000.0))
            .await
            .unwrap();

        let update = GoalUpdate {
            current: Some(1999.0),
            completed: Some(true),
            ..GoalUpdate::default()
        };
        assert!(tracker.update_goal(created.id, update).await.unwrap());
        assert_eq!(tracker.goals()[0].current, 1999.0);
        assert!(tracker.goals()[0].completed);

        let calories = NewActivity::new(ActivityType::Calories, 250.0, None).unwrap();
        tracker.add_activity(calories).await.unwrap();
        assert_eq!(tracker.goals()[0].current, 250.0);
        assert!(!tracker.goals()[0].completed);
    }

    #[tokio::test]
    async fn update_goal_with_unknown_id_is_a_no_op() {
        let mut tracker = empty_tracker().await;
        tracker
            .add_goal(goal(ActivityType::Steps, 100.0))
            .await
            .unwrap();
        let before = tracker.goals().to_vec();

        let update = GoalUpdate {
            target: Some(50.0),
            ..GoalUpdate::default()
        };
        assert!(!tracker.update_goal(Uuid::new_v4(), update).await.unwrap());
        assert_eq!(tracker.goals(), before.as_slice());
    }

    #[tokio::test]
    async fn delete_activity_removes_exactly_one_and_keeps_order() {
        let mut tracker = empty_tracker().await;
        let a = tracker.add_activity(steps(1.0)).await.unwrap();
        let b = tracker.add_activity(steps(2.0)).await.unwrap();
        let c = tracker.add_activity(steps(3.0)).await.unwrap();

        assert!(!tracker.delete_activity(Uuid::new_v4()).await.unwrap());
        assert_eq!(tracker.activities().len(), 3);

        assert!(tracker.delete_activity(b.id).await.unwrap());
        let ids: Vec<_> = tracker.activities().iter().map(|activity| activity.id).collect();
        assert_eq!(ids, [a.id, c.id]);

        assert!(!tracker.delete_activity(b.id).await.unwrap());
        assert_eq!(tracker.activities().len(), 2);
    }

    #[tokio::test]
    async fn deleting_shrinks_totals_unless_log_becomes_empty() {
        let mut tracker = empty_tracker().await;
        let a = tracker.add_activity(steps(300.0)).await.unwrap();
        tracker
            .add_goal(goal(ActivityType::Steps, 400.0))
            .await
            .unwrap();
        let b = tracker.add_activity(steps(200.0)).await.unwrap();
        assert_eq!(tracker.goals()[0].current, 500.0);

        tracker.delete_activity(a.id).await.unwrap();
        assert_eq!(tracker.goals()[0].current, 200.0);

        tracker.delete_activity(b.id).await.unwrap();
        assert!(tracker.activities().is_empty());
        assert_eq!(tracker.goals()[0].current, 200.0);
    }

    #[tokio::test]
    async fn delete_goal_is_idempotent() {
        let mut tracker = empty_tracker().await;
        let kept = tracker
            .add_goal(goal(ActivityType::Steps, 100.0))
            .await
            .unwrap();
        let removed = tracker
            .add_goal(goal(ActivityType::Workout, 30.0))
            .await
            .unwrap();

        assert!(tracker.delete_goal(removed.id).await.unwrap());
        assert!(!tracker.delete_goal(removed.id).await.unwrap());
        assert_eq!(tracker.goals(), [kept].as_slice());
    }

    #[tokio::test]
    async fn queries_filter_without_side_effects() {
        let mut tracker = empty_tracker().await;
        let today = stats::today();
        let yesterday = today - Duration::days(1);
        tracker.add_activity_on(steps(10.0), yesterday).await.unwrap();
        tracker.add_activity_on(steps(20.0), today).await.unwrap();
        let workout = NewActivity::new(ActivityType::Workout, 45.0, None).unwrap();
        tracker.add_activity_on(workout, today).await.unwrap();

        assert_eq!(tracker.activities_by_type(ActivityType::Steps).len(), 2);
        assert_eq!(tracker.activities_by_date(today).len(), 2);
        assert_eq!(tracker.activities_by_date(yesterday)[0].value, 10.0);
        assert!(tracker.goals_by_type(ActivityType::Sleep).is_empty());
        assert_eq!(tracker.activities().len(), 3);
    }

    #[tokio::test]
    async fn reload_restores_persisted_state() {
        let store = Store::in_memory();
        let mut tracker = FitnessTracker::load(store.clone()).await;
        tracker
            .add_goal(goal(ActivityType::Steps, 8000.0))
            .await
            .unwrap();
        let with_notes =
            NewActivity::new(ActivityType::Steps, 9000.0, Some("hike".to_string())).unwrap();
        tracker.add_activity(with_notes).await.unwrap();
        tracker
            .update_user(User {
                name: "Alex".to_string(),
                age: 35,
                ..User::default()
            })
            .await
            .unwrap();

        let reloaded = FitnessTracker::load(store).await;
        assert_eq!(reloaded.activities(), tracker.activities());
        assert_eq!(reloaded.goals(), tracker.goals());
        assert_eq!(reloaded.user(), tracker.user());
        assert!(reloaded.goals()[0].completed);
    }

    #[tokio::test]
    async fn largest_values_keep_goals_across_reload() {
        use crate::models::MAX_AMOUNT;

        let store = Store::in_memory();
        let mut tracker = FitnessTracker::load(store.clone()).await;
        tracker
            .add_goal(goal(ActivityType::Steps, MAX_AMOUNT))
            .await
            .unwrap();
        assert!(NewActivity::new(ActivityType::Steps, 1e308, None).is_err());
        tracker.add_activity(steps(MAX_AMOUNT)).await.unwrap();
        tracker.add_activity(steps(MAX_AMOUNT)).await.unwrap();

        let current = tracker.goals()[0].current;
        assert!(current.is_finite());
        assert_eq!(current, MAX_AMOUNT * 2.0);

        let reloaded = FitnessTracker::load(store).await;
        assert_eq!(reloaded.goals(), tracker.goals());
        assert_eq!(reloaded.activities().len(), 2);
    }
}
