use crate::errors::InputError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Upper bound for any logged value, goal target or weight/height. Far above
/// anything a person logs, and low enough that running totals stay finite.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// The four things a user can log and set goals for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    #[default]
    Steps,
    Workout,
    Calories,
    Sleep,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [
        ActivityType::Steps,
        ActivityType::Workout,
        ActivityType::Calories,
        ActivityType::Sleep,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Steps => "steps",
            ActivityType::Workout => "workout",
            ActivityType::Calories => "calories",
            ActivityType::Sleep => "sleep",
        }
    }

    /// Heading used on the dashboard summary cards.
    pub fn title(self) -> &'static str {
        match self {
            ActivityType::Steps => "Steps",
            ActivityType::Workout => "Workout (min)",
            ActivityType::Calories => "Calories",
            ActivityType::Sleep => "Sleep (hrs)",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            ActivityType::Workout => "min",
            ActivityType::Sleep => "hrs",
            ActivityType::Steps | ActivityType::Calories => "",
        }
    }

    /// Label of the numeric input on the log-activity and goal forms.
    pub fn input_label(self) -> &'static str {
        match self {
            ActivityType::Steps => "Steps",
            ActivityType::Workout => "Minutes",
            ActivityType::Calories => "Calories",
            ActivityType::Sleep => "Hours",
        }
    }

    pub fn input_step(self) -> &'static str {
        match self {
            ActivityType::Sleep => "0.1",
            _ => "1",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ActivityType::Steps => "#3b82f6",
            ActivityType::Workout => "#8b5cf6",
            ActivityType::Calories => "#f97316",
            ActivityType::Sleep => "#6366f1",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "steps" => Ok(ActivityType::Steps),
            "workout" => Ok(ActivityType::Workout),
            "calories" => Ok(ActivityType::Calories),
            "sleep" => Ok(ActivityType::Sleep),
            other => Err(InputError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub value: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A target for one activity type. `current` and `completed` are derived from
/// the activity log by the tracker and are never taken from user input forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub goal_type: ActivityType,
    pub target: f64,
    pub current: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub completed: bool,
}

/// Partial update merged into an existing goal. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalUpdate {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<ActivityType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl GoalUpdate {
    pub fn validate(self) -> Result<Self, InputError> {
        if let Some(target) = self.target {
            positive("target", target)?;
        }
        if let Some(current) = self.current {
            if !current.is_finite() || current < 0.0 {
                return Err(InputError::Negative { field: "current" });
            }
            if current > MAX_AMOUNT {
                return Err(InputError::TooLarge {
                    field: "current",
                    max: MAX_AMOUNT,
                });
            }
        }
        Ok(self)
    }

    pub(crate) fn apply(self, goal: &mut Goal) {
        if let Some(goal_type) = self.goal_type {
            goal.goal_type = goal_type;
        }
        if let Some(target) = self.target {
            goal.target = target;
        }
        if let Some(deadline) = self.deadline {
            goal.deadline = Some(deadline);
        }
        if let Some(current) = self.current {
            goal.current = current;
        }
        if let Some(completed) = self.completed {
            goal.completed = completed;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(InputError::UnknownGender(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub weight: f64,
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
}

impl Default for User {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            weight: 70.0,
            height: 175.0,
            age: 30,
            gender: Gender::Other,
        }
    }
}

impl User {
    /// Checks a profile coming from a form or the API before it replaces the
    /// stored one.
    pub fn validate(mut self) -> Result<Self, InputError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(InputError::EmptyName);
        }
        positive("weight", self.weight)?;
        positive("height", self.height)?;
        Ok(self)
    }
}

/// A validated activity submission. Only constructible with a strictly
/// positive value, so the tracker never has to re-check it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    activity_type: ActivityType,
    value: f64,
    notes: Option<String>,
}

impl NewActivity {
    pub fn new(
        activity_type: ActivityType,
        value: f64,
        notes: Option<String>,
    ) -> Result<Self, InputError> {
        Ok(Self {
            activity_type,
            value: positive("value", value)?,
            notes: normalize_notes(notes),
        })
    }

    pub(crate) fn into_activity(self, id: Uuid, date: NaiveDate) -> Activity {
        Activity {
            id,
            activity_type: self.activity_type,
            value: self.value,
            date,
            notes: self.notes,
        }
    }
}

/// A validated goal submission with a strictly positive target.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    goal_type: ActivityType,
    target: f64,
    deadline: Option<NaiveDate>,
}

impl NewGoal {
    pub fn new(
        goal_type: ActivityType,
        target: f64,
        deadline: Option<NaiveDate>,
    ) -> Result<Self, InputError> {
        Ok(Self {
            goal_type,
            target: positive("target", target)?,
            deadline,
        })
    }

    pub(crate) fn into_goal(self, id: Uuid) -> Goal {
        Goal {
            id,
            goal_type: self.goal_type,
            target: self.target,
            current: 0.0,
            deadline: self.deadline,
            completed: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub value: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ActivityRequest {
    pub fn validate(self) -> Result<NewActivity, InputError> {
        NewActivity::new(self.activity_type, self.value, self.notes)
    }
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    #[serde(rename = "type")]
    pub goal_type: ActivityType,
    pub target: f64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

impl GoalRequest {
    pub fn validate(self) -> Result<NewGoal, InputError> {
        NewGoal::new(self.goal_type, self.target, self.deadline)
    }
}

/// Urlencoded body of the log-activity form. Fields arrive as raw text so a
/// blank or malformed number is dropped by `parse` instead of failing
/// extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityForm {
    #[serde(rename = "type", default)]
    pub activity_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub notes: String,
}

impl ActivityForm {
    pub fn parse(&self) -> Result<NewActivity, InputError> {
        NewActivity::new(
            self.activity_type.parse()?,
            parse_number("value", &self.value)?,
            Some(self.notes.clone()),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GoalForm {
    #[serde(rename = "type", default)]
    pub goal_type: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub deadline: String,
}

impl GoalForm {
    pub fn parse(&self) -> Result<NewGoal, InputError> {
        let deadline = match self.deadline.trim() {
            "" => None,
            raw => Some(parse_date(raw)?),
        };
        NewGoal::new(
            self.goal_type.parse()?,
            parse_number("target", &self.target)?,
            deadline,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: String,
}

impl ProfileForm {
    pub fn parse(&self) -> Result<User, InputError> {
        let age = self
            .age
            .trim()
            .parse::<u32>()
            .map_err(|_| InputError::NotANumber { field: "age" })?;
        User {
            name: self.name.clone(),
            weight: parse_number("weight", &self.weight)?,
            height: parse_number("height", &self.height)?,
            age,
            gender: self.gender.parse()?,
        }
        .validate()
    }
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    #[serde(rename = "type", default)]
    pub activity_type: Option<ActivityType>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct GoalQuery {
    #[serde(rename = "type", default)]
    pub goal_type: Option<ActivityType>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    #[serde(rename = "type", default)]
    pub activity_type: Option<ActivityType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeriesResponse {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub points: Vec<SeriesPoint>,
}

/// One dashboard card: today's total for a type next to the progress of the
/// first goal set for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryCard {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub title: String,
    pub unit: String,
    pub today_total: f64,
    pub goal_progress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgressView {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub greeting_name: String,
    pub date: NaiveDate,
    pub date_label: String,
    pub cards: Vec<SummaryCard>,
    pub goals: Vec<GoalProgressView>,
    pub recent_activities: Vec<Activity>,
}

fn positive(field: &'static str, value: f64) -> Result<f64, InputError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(InputError::NotPositive { field });
    }
    if value > MAX_AMOUNT {
        return Err(InputError::TooLarge {
            field,
            max: MAX_AMOUNT,
        });
    }
    Ok(value)
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, InputError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| InputError::NotANumber { field })
}

fn parse_date(raw: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| InputError::InvalidDate(raw.to_string()))
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_activity_rejects_non_positive_values() {
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = NewActivity::new(ActivityType::Steps, value, None).unwrap_err();
            assert_eq!(err, InputError::NotPositive { field: "value" });
        }
        assert!(NewActivity::new(ActivityType::Sleep, 0.1, None).is_ok());
    }

    #[test]
    fn amounts_above_the_cap_are_rejected() {
        let err = NewActivity::new(ActivityType::Steps, 1e308, None).unwrap_err();
        assert_eq!(
            err,
            InputError::TooLarge {
                field: "value",
                max: MAX_AMOUNT
            }
        );
        assert!(NewActivity::new(ActivityType::Steps, MAX_AMOUNT, None).is_ok());
        assert!(NewGoal::new(ActivityType::Calories, MAX_AMOUNT * 2.0, None).is_err());

        let update = GoalUpdate {
            current: Some(f64::MAX),
            ..GoalUpdate::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn blank_notes_are_dropped() {
        let activity =
            NewActivity::new(ActivityType::Workout, 30.0, Some("   ".to_string())).unwrap();
        assert_eq!(activity.notes, None);

        let activity =
            NewActivity::new(ActivityType::Workout, 30.0, Some(" legs ".to_string())).unwrap();
        assert_eq!(activity.notes.as_deref(), Some("legs"));
    }

    #[test]
    fn activity_form_parses_text_fields() {
        let form = ActivityForm {
            activity_type: "sleep".to_string(),
            value: "7.5".to_string(),
            notes: String::new(),
        };
        let parsed = form.parse().unwrap();
        assert_eq!(parsed.activity_type, ActivityType::Sleep);
        assert_eq!(parsed.value, 7.5);

        let blank = ActivityForm {
            activity_type: "steps".to_string(),
            value: String::new(),
            notes: String::new(),
        };
        assert_eq!(
            blank.parse().unwrap_err(),
            InputError::NotANumber { field: "value" }
        );
    }

    #[test]
    fn goal_form_accepts_missing_deadline() {
        let form = GoalForm {
            goal_type: "calories".to_string(),
            target: "2000".to_string(),
            deadline: String::new(),
        };
        let goal = form.parse().unwrap().into_goal(Uuid::new_v4());
        assert_eq!(goal.deadline, None);
        assert_eq!(goal.current, 0.0);
        assert!(!goal.completed);

        let bad = GoalForm {
            deadline: "19/10/2026".to_string(),
            ..form
        };
        assert!(matches!(bad.parse(), Err(InputError::InvalidDate(_))));
    }

    #[test]
    fn profile_form_requires_name_and_positive_measurements() {
        let form = ProfileForm {
            name: "  Sam ".to_string(),
            weight: "64.5".to_string(),
            height: "170".to_string(),
            age: "41".to_string(),
            gender: "female".to_string(),
        };
        let user = form.parse().unwrap();
        assert_eq!(user.name, "Sam");
        assert_eq!(user.gender, Gender::Female);

        let nameless = ProfileForm {
            name: " ".to_string(),
            ..form
        };
        assert_eq!(nameless.parse().unwrap_err(), InputError::EmptyName);
    }

    #[test]
    fn activity_serializes_type_and_date_like_the_stored_layout() {
        let activity = Activity {
            id: Uuid::nil(),
            activity_type: ActivityType::Steps,
            value: 5000.0,
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            notes: None,
        };
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "steps");
        assert_eq!(json["date"], "2026-10-19");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn goal_update_merges_only_present_fields() {
        let mut goal = NewGoal::new(ActivityType::Steps, 10000.0, None)
            .unwrap()
            .into_goal(Uuid::new_v4());
        GoalUpdate {
            target: Some(8000.0),
            ..GoalUpdate::default()
        }
        .apply(&mut goal);
        assert_eq!(goal.target, 8000.0);
        assert_eq!(goal.goal_type, ActivityType::Steps);

        let invalid = GoalUpdate {
            target: Some(0.0),
            ..GoalUpdate::default()
        };
        assert!(invalid.validate().is_err());
    }
}
