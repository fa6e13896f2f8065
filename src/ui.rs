use crate::models::{Activity, ActivityType, DashboardResponse, Gender, GoalProgressView, SummaryCard, User};
use chrono::{Duration, NaiveDate};
use serde_json::{json, Map, Value};

/// The goal form's deadline starts this many days after today.
const GOAL_DEADLINE_DAYS: i64 = 7;

pub fn render_index(today: NaiveDate, dashboard: &DashboardResponse, user: &User) -> String {
    let default_deadline = today + Duration::days(GOAL_DEADLINE_DAYS);
    INDEX_HTML
        .replace("{{TYPE_META}}", &type_meta_json())
        .replace("{{ACTIVITY_TYPES}}", &render_type_picker())
        .replace("{{GOAL_TYPES}}", &render_type_picker())
        .replace("{{GENDER_OPTIONS}}", &render_gender_options(user.gender))
        .replace("{{TODAY}}", &today.to_string())
        .replace("{{DEFAULT_DEADLINE}}", &default_deadline.to_string())
        .replace("{{DATE_LABEL}}", &dashboard.date_label)
        .replace("{{WEIGHT}}", &user.weight.to_string())
        .replace("{{HEIGHT}}", &user.height.to_string())
        .replace("{{AGE}}", &user.age.to_string())
        .replace("{{CARDS}}", &render_cards(&dashboard.cards))
        .replace("{{GOALS}}", &render_goals(&dashboard.goals))
        .replace("{{RECENT}}", &render_recent(&dashboard.recent_activities))
        .replace("{{NAME}}", &escape_html(&dashboard.greeting_name))
        .replace("{{PROFILE_NAME}}", &escape_html(&user.name))
}

fn render_cards(cards: &[SummaryCard]) -> String {
    cards
        .iter()
        .map(|card| {
            format!(
                r#"<article class="stat card" data-type="{kind}" style="--tone: {color}">
          <div class="card-head"><span class="label">{title}</span><span class="card-progress">{progress:.0}% of goal</span></div>
          <span class="value">{total}</span>
          <div class="bar"><div class="bar-fill" style="width: {progress}%"></div></div>
        </article>"#,
                kind = card.activity_type,
                color = card.activity_type.color(),
                title = card.title,
                progress = card.goal_progress,
                total = card.today_total,
            )
        })
        .collect()
}

fn render_goals(goals: &[GoalProgressView]) -> String {
    if goals.is_empty() {
        return r#"<p class="empty">No goals set yet. Add some goals to track your progress!</p>"#
            .to_string();
    }

    goals
        .iter()
        .map(|view| {
            let goal = &view.goal;
            let status = if goal.completed {
                r#"<span class="goal-status done">Completed</span>"#.to_string()
            } else {
                format!(r#"<span class="goal-status">{:.0}%</span>"#, view.progress)
            };
            let deadline = goal
                .deadline
                .map(|date| format!("<span>Due: {date}</span>"))
                .unwrap_or_default();
            format!(
                r#"<div class="goal" style="--tone: {color}">
          <div class="goal-head"><span class="goal-type">{name}</span>{status}</div>
          <div class="goal-meta"><span>{progress_text}</span>{deadline}</div>
          <div class="bar"><div class="bar-fill" style="width: {progress}%"></div></div>
          <button class="link-btn" type="button" data-delete-goal="{id}">Remove goal</button>
        </div>"#,
                color = goal.goal_type.color(),
                name = display_name(goal.goal_type),
                progress_text = with_unit(
                    &format!("{} / {}", goal.current, goal.target),
                    goal.goal_type
                ),
                progress = view.progress,
                id = goal.id,
            )
        })
        .collect()
}

fn render_recent(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return r#"<tr><td colspan="5" class="empty">No activities recorded yet. Start tracking to see your progress!</td></tr>"#
            .to_string();
    }

    activities
        .iter()
        .map(|activity| {
            let notes = activity
                .notes
                .as_deref()
                .map(escape_html)
                .unwrap_or_else(|| "-".to_string());
            format!(
                r#"<tr>
            <td><span class="dot" style="--tone: {color}"></span>{name}</td>
            <td>{value}</td>
            <td>{date}</td>
            <td class="muted">{notes}</td>
            <td><button class="link-btn" type="button" data-delete-activity="{id}">Delete</button></td>
          </tr>"#,
                color = activity.activity_type.color(),
                name = display_name(activity.activity_type),
                value = with_unit(&activity.value.to_string(), activity.activity_type),
                date = activity.date.format("%b %d, %Y"),
                id = activity.id,
            )
        })
        .collect()
}

fn render_type_picker() -> String {
    ActivityType::ALL
        .into_iter()
        .map(|activity_type| {
            let checked = if activity_type == ActivityType::default() {
                " checked"
            } else {
                ""
            };
            format!(
                r#"<label class="pick" style="--tone: {color}"><input type="radio" name="type" value="{kind}"{checked} /><span>{name}</span></label>"#,
                color = activity_type.color(),
                kind = activity_type,
                name = display_name(activity_type),
            )
        })
        .collect()
}

fn render_gender_options(selected: Gender) -> String {
    Gender::ALL
        .into_iter()
        .map(|gender| {
            let marker = if gender == selected { " selected" } else { "" };
            let value = gender.as_str();
            let mut label = value.to_string();
            label[..1].make_ascii_uppercase();
            format!(r#"<option value="{value}"{marker}>{label}</option>"#)
        })
        .collect()
}

/// Per-type display metadata handed to the page script.
fn type_meta_json() -> String {
    let meta: Map<String, Value> = ActivityType::ALL
        .into_iter()
        .map(|activity_type| {
            (
                activity_type.as_str().to_string(),
                json!({
                    "name": display_name(activity_type),
                    "title": activity_type.title(),
                    "unit": activity_type.unit(),
                    "label": activity_type.input_label(),
                    "step": activity_type.input_step(),
                    "color": activity_type.color(),
                }),
            )
        })
        .collect();
    Value::Object(meta).to_string()
}

fn display_name(activity_type: ActivityType) -> &'static str {
    match activity_type {
        ActivityType::Steps => "Steps",
        ActivityType::Workout => "Workout",
        ActivityType::Calories => "Calories",
        ActivityType::Sleep => "Sleep",
    }
}

fn with_unit(value: &str, activity_type: ActivityType) -> String {
    match activity_type.unit() {
        "" => value.to_string(),
        unit => format!("{value} {unit}"),
    }
}

/// Also escapes `{` so user text can never form a template placeholder.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>FitTrack</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
      --muted: #8b857d;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      grid-template-columns: 220px 1fr;
      gap: 24px;
      padding: 32px 24px 48px;
    }

    nav {
      display: grid;
      align-content: start;
      gap: 8px;
    }

    .brand {
      font-family: "Fraunces", "Georgia", serif;
      font-size: 1.6rem;
      margin: 0 0 16px 12px;
    }

    .nav-item {
      background: transparent;
      color: #6b645d;
      box-shadow: none;
      justify-content: flex-start;
      border-radius: 14px;
      padding: 12px 16px;
    }

    .nav-item.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    main {
      width: min(980px, 100%);
    }

    .app {
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
      animation: rise 600ms ease;
    }

    .app[hidden] {
      display: none;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0;
      font-size: 1.4rem;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
      font-size: 1rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--tone, var(--accent-2));
    }

    .card-head,
    .goal-head,
    .goal-meta {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 8px;
    }

    .card-progress,
    .goal-meta {
      font-size: 0.8rem;
      color: var(--muted);
    }

    .bar {
      width: 100%;
      height: 8px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.1);
      overflow: hidden;
    }

    .bar-fill {
      height: 100%;
      border-radius: 999px;
      background: var(--tone, var(--accent));
    }

    .columns {
      display: grid;
      grid-template-columns: 2fr 1fr;
      gap: 16px;
    }

    .goals {
      display: grid;
      gap: 12px;
      align-content: start;
    }

    .goal {
      background: #fbf8f3;
      border-radius: 14px;
      padding: 14px;
      display: grid;
      gap: 8px;
    }

    .goal-type {
      font-weight: 600;
    }

    .goal-status {
      font-size: 0.85rem;
      color: #6b645d;
    }

    .goal-status.done {
      color: #2d7a4b;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 20px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      transition: transform 150ms ease, box-shadow 150ms ease;
      display: inline-flex;
      align-items: center;
      justify-content: center;
      gap: 10px;
    }

    button:active {
      transform: scale(0.98);
    }

    .btn-primary {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(255, 107, 74, 0.3);
    }

    .link-btn {
      background: none;
      padding: 0;
      color: var(--muted);
      font-size: 0.8rem;
      font-weight: 500;
      justify-self: end;
    }

    .chart-header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
    }

    .tab {
      background: transparent;
      border-radius: 999px;
      padding: 8px 14px;
      font-size: 0.9rem;
      color: #6b645d;
      box-shadow: none;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    #chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    #chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke-width: 3;
    }

    .chart-area {
      opacity: 0.12;
    }

    .chart-point {
      fill: white;
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-label {
      fill: #7a746d;
      font-size: 11px;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.95rem;
    }

    th {
      text-align: left;
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
      padding: 10px 12px;
    }

    td {
      padding: 12px;
      border-top: 1px solid rgba(47, 72, 88, 0.08);
    }

    .dot {
      display: inline-block;
      width: 10px;
      height: 10px;
      border-radius: 50%;
      margin-right: 8px;
      background: var(--tone);
    }

    .muted,
    .empty {
      color: var(--muted);
    }

    .empty {
      text-align: center;
      padding: 16px 0;
    }

    form {
      display: grid;
      gap: 18px;
      max-width: 560px;
    }

    .field {
      display: grid;
      gap: 6px;
    }

    .field > label,
    .field > span {
      font-size: 0.9rem;
      font-weight: 500;
      color: #5f5c57;
    }

    input,
    select,
    textarea {
      font: inherit;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      background: white;
    }

    .picker {
      display: grid;
      grid-template-columns: repeat(4, 1fr);
      gap: 8px;
    }

    .pick input {
      position: absolute;
      opacity: 0;
    }

    .pick span {
      display: block;
      text-align: center;
      padding: 10px;
      border-radius: 12px;
      border: 2px solid transparent;
      background: rgba(47, 72, 88, 0.06);
      cursor: pointer;
    }

    .pick input:checked + span {
      border-color: var(--tone);
      color: var(--tone);
      background: white;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 800px) {
      body {
        grid-template-columns: 1fr;
      }
      nav {
        grid-auto-flow: column;
        overflow-x: auto;
      }
      .brand {
        display: none;
      }
      .columns {
        grid-template-columns: 1fr;
      }
      .app {
        padding: 28px 22px;
      }
    }
  </style>
</head>
<body>
  <nav>
    <p class="brand">FitTrack</p>
    <button class="nav-item active" type="button" data-tab="dashboard">Dashboard</button>
    <button class="nav-item" type="button" data-tab="activities">Log Activity</button>
    <button class="nav-item" type="button" data-tab="goals">Set Goals</button>
    <button class="nav-item" type="button" data-tab="profile">Profile</button>
  </nav>

  <main>
    <section class="app" id="panel-dashboard">
      <header>
        <h1>Welcome back, <span id="greeting">{{NAME}}</span>!</h1>
        <p class="subtitle" id="date-label">{{DATE_LABEL}}</p>
      </header>

      <section class="panel" id="cards">
        {{CARDS}}
      </section>

      <section class="columns">
        <div class="stat">
          <div class="chart-header">
            <h2>Activity Trends</h2>
            <div class="tabs" role="tablist">
              <button class="tab active" type="button" data-series="steps" role="tab" aria-selected="true">Steps</button>
              <button class="tab" type="button" data-series="workout" role="tab" aria-selected="false">Workout</button>
              <button class="tab" type="button" data-series="calories" role="tab" aria-selected="false">Calories</button>
              <button class="tab" type="button" data-series="sleep" role="tab" aria-selected="false">Sleep</button>
            </div>
          </div>
          <svg id="chart" viewBox="0 0 600 260" aria-label="Last 7 days" role="img"></svg>
        </div>

        <div class="stat">
          <h2>Goals Progress</h2>
          <div class="goals" id="goals">
            {{GOALS}}
          </div>
        </div>
      </section>

      <section class="stat">
        <h2>Recent Activities</h2>
        <table>
          <thead>
            <tr><th>Type</th><th>Value</th><th>Date</th><th>Notes</th><th></th></tr>
          </thead>
          <tbody id="recent">
            {{RECENT}}
          </tbody>
        </table>
      </section>
      <div class="status" id="dashboard-status"></div>
    </section>

    <section class="app" id="panel-activities" hidden>
      <h2>Log Activity</h2>
      <div class="status" id="activity-status"></div>
      <form id="activity-form" method="post" action="/activities">
        <div class="field">
          <span>Activity Type</span>
          <div class="picker">{{ACTIVITY_TYPES}}</div>
        </div>
        <div class="field">
          <label for="activity-value" id="activity-value-label">Steps</label>
          <input type="number" id="activity-value" name="value" min="0" step="1" required />
        </div>
        <div class="field">
          <label for="activity-notes">Notes (optional)</label>
          <textarea id="activity-notes" name="notes" rows="3"></textarea>
        </div>
        <button class="btn-primary" type="submit">Log Activity</button>
      </form>
    </section>

    <section class="app" id="panel-goals" hidden>
      <h2>Set New Goal</h2>
      <div class="status" id="goal-status"></div>
      <form id="goal-form" method="post" action="/goals">
        <div class="field">
          <span>Goal Type</span>
          <div class="picker">{{GOAL_TYPES}}</div>
        </div>
        <div class="field">
          <label for="goal-target" id="goal-target-label">Target Steps</label>
          <input type="number" id="goal-target" name="target" min="0" step="1" required />
        </div>
        <div class="field">
          <label for="goal-deadline">Deadline</label>
          <input type="date" id="goal-deadline" name="deadline" min="{{TODAY}}" value="{{DEFAULT_DEADLINE}}" data-default="{{DEFAULT_DEADLINE}}" />
        </div>
        <button class="btn-primary" type="submit">Set Goal</button>
      </form>
    </section>

    <section class="app" id="panel-profile" hidden>
      <h2>Profile</h2>
      <div class="status" id="profile-status"></div>
      <form id="profile-form" method="post" action="/profile">
        <div class="field">
          <label for="profile-name">Name</label>
          <input type="text" id="profile-name" name="name" value="{{PROFILE_NAME}}" required />
        </div>
        <div class="field">
          <label for="profile-weight">Weight (kg)</label>
          <input type="number" id="profile-weight" name="weight" min="0" step="0.1" value="{{WEIGHT}}" required />
        </div>
        <div class="field">
          <label for="profile-height">Height (cm)</label>
          <input type="number" id="profile-height" name="height" min="0" step="0.1" value="{{HEIGHT}}" required />
        </div>
        <div class="field">
          <label for="profile-age">Age</label>
          <input type="number" id="profile-age" name="age" min="0" step="1" value="{{AGE}}" required />
        </div>
        <div class="field">
          <label for="profile-gender">Gender</label>
          <select id="profile-gender" name="gender">{{GENDER_OPTIONS}}</select>
        </div>
        <button class="btn-primary" type="submit">Save Profile</button>
      </form>
    </section>
  </main>

  <script>
    const TYPES = {{TYPE_META}};
    const ACK_MS = 3000;

    const chartEl = document.getElementById('chart');
    const cardsEl = document.getElementById('cards');
    const goalsEl = document.getElementById('goals');
    const recentEl = document.getElementById('recent');
    const dashboardStatus = document.getElementById('dashboard-status');
    const navItems = Array.from(document.querySelectorAll('.nav-item'));
    const seriesTabs = Array.from(document.querySelectorAll('[data-series]'));

    let seriesType = 'steps';

    const escapeHtml = (text) =>
      String(text).replace(/[&<>"'{]/g, (ch) => ({
        '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;', '{': '&#123;'
      })[ch]);

    const withUnit = (value, type) => {
      const unit = TYPES[type].unit;
      return unit ? `${value} ${unit}` : `${value}`;
    };

    const formatDay = (iso) => {
      const [year, month, day] = iso.split('-').map(Number);
      return new Date(year, month - 1, day)
        .toLocaleDateString('en-US', { month: 'short', day: '2-digit', year: 'numeric' });
    };

    const setStatus = (el, message, type) => {
      el.textContent = message;
      el.dataset.type = type || '';
    };

    const acknowledge = (el, message) => {
      setStatus(el, message, 'ok');
      clearTimeout(el.ackTimer);
      el.ackTimer = setTimeout(() => setStatus(el, '', ''), ACK_MS);
    };

    const renderCards = (cards) => {
      cardsEl.innerHTML = cards.map((card) => `
        <article class="stat card" data-type="${card.type}" style="--tone: ${TYPES[card.type].color}">
          <div class="card-head"><span class="label">${card.title}</span><span class="card-progress">${card.goal_progress.toFixed(0)}% of goal</span></div>
          <span class="value">${card.today_total}</span>
          <div class="bar"><div class="bar-fill" style="width: ${card.goal_progress}%"></div></div>
        </article>`).join('');
    };

    const renderGoals = (goals) => {
      if (!goals.length) {
        goalsEl.innerHTML = '<p class="empty">No goals set yet. Add some goals to track your progress!</p>';
        return;
      }
      goalsEl.innerHTML = goals.map((goal) => {
        const status = goal.completed
          ? '<span class="goal-status done">Completed</span>'
          : `<span class="goal-status">${goal.progress.toFixed(0)}%</span>`;
        const deadline = goal.deadline ? `<span>Due: ${goal.deadline}</span>` : '';
        return `
        <div class="goal" style="--tone: ${TYPES[goal.type].color}">
          <div class="goal-head"><span class="goal-type">${TYPES[goal.type].name}</span>${status}</div>
          <div class="goal-meta"><span>${withUnit(`${goal.current} / ${goal.target}`, goal.type)}</span>${deadline}</div>
          <div class="bar"><div class="bar-fill" style="width: ${goal.progress}%"></div></div>
          <button class="link-btn" type="button" data-delete-goal="${goal.id}">Remove goal</button>
        </div>`;
      }).join('');
    };

    const renderRecent = (activities) => {
      if (!activities.length) {
        recentEl.innerHTML = '<tr><td colspan="5" class="empty">No activities recorded yet. Start tracking to see your progress!</td></tr>';
        return;
      }
      recentEl.innerHTML = activities.map((activity) => `
          <tr>
            <td><span class="dot" style="--tone: ${TYPES[activity.type].color}"></span>${TYPES[activity.type].name}</td>
            <td>${withUnit(activity.value, activity.type)}</td>
            <td>${formatDay(activity.date)}</td>
            <td class="muted">${activity.notes ? escapeHtml(activity.notes) : '-'}</td>
            <td><button class="link-btn" type="button" data-delete-activity="${activity.id}">Delete</button></td>
          </tr>`).join('');
    };

    const formatAxisValue = (value) => {
      const rounded = Math.round(value * 10) / 10;
      return Number.isInteger(rounded) ? rounded.toString() : rounded.toFixed(1);
    };

    const renderLineChart = (points, color) => {
      const width = 600;
      const height = 260;
      const paddingX = 52;
      const paddingY = 34;
      const top = 24;

      let max = Math.max(0, ...points.map((point) => point.value));
      if (max === 0) {
        max = 1;
      }

      const xStep = (width - paddingX * 2) / (points.length - 1);
      const scaleY = (height - top - paddingY) / max;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - value * scaleY;

      const line = points
        .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.value).toFixed(2)}`)
        .join(' ');
      const area = `${line} L ${x(points.length - 1).toFixed(2)} ${y(0)} L ${x(0).toFixed(2)} ${y(0)} Z`;

      const ticks = 4;
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = (max * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${formatAxisValue(value)}</text>`;
      }

      const xLabels = points
        .map((point, index) => `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${point.label}</text>`)
        .join('');

      const circles = points
        .map((point, index) => `<circle class="chart-point" stroke="${color}" cx="${x(index)}" cy="${y(point.value)}" r="4"><title>${withUnit(point.value, seriesType)}</title></circle>`)
        .join('');

      chartEl.innerHTML = `
        ${grid}
        <path class="chart-area" fill="${color}" d="${area}" />
        <path class="chart-line" stroke="${color}" d="${line}" />
        ${circles}
        ${xLabels}
      `;
    };

    const loadDashboard = async () => {
      const res = await fetch('/api/dashboard');
      if (!res.ok) {
        throw new Error('Unable to load dashboard');
      }
      const data = await res.json();
      document.getElementById('greeting').textContent = data.greeting_name;
      document.getElementById('date-label').textContent = data.date_label;
      renderCards(data.cards);
      renderGoals(data.goals);
      renderRecent(data.recent_activities);
    };

    const loadSeries = async () => {
      const res = await fetch(`/api/series?type=${seriesType}`);
      if (!res.ok) {
        throw new Error('Unable to load trends');
      }
      const data = await res.json();
      renderLineChart(data.points, TYPES[data.type].color);
    };

    const refresh = () =>
      Promise.all([loadDashboard(), loadSeries()])
        .catch((err) => setStatus(dashboardStatus, err.message, 'error'));

    const send = async (method, url, body) => {
      const res = await fetch(url, {
        method,
        headers: body ? { 'content-type': 'application/json' } : {},
        body: body ? JSON.stringify(body) : undefined
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res;
    };

    const setActiveTab = (tab) => {
      navItems.forEach((button) => {
        const isActive = button.dataset.tab === tab;
        button.classList.toggle('active', isActive);
        document.getElementById(`panel-${button.dataset.tab}`).hidden = !isActive;
      });
      if (tab === 'dashboard') {
        refresh();
      }
    };

    const setSeriesType = (type) => {
      seriesType = type;
      seriesTabs.forEach((button) => {
        const isActive = button.dataset.series === type;
        button.classList.toggle('active', isActive);
        button.setAttribute('aria-selected', String(isActive));
      });
      loadSeries().catch((err) => setStatus(dashboardStatus, err.message, 'error'));
    };

    const selectedType = (form) => form.querySelector('input[name="type"]:checked').value;

    const bindTypePicker = (form, label, input, prefix) => {
      const sync = () => {
        const meta = TYPES[selectedType(form)];
        label.textContent = `${prefix}${meta.label}`;
        input.step = meta.step;
      };
      form.querySelectorAll('input[name="type"]').forEach((radio) => radio.addEventListener('change', sync));
      sync();
    };

    const activityForm = document.getElementById('activity-form');
    const activityValue = document.getElementById('activity-value');
    const activityNotes = document.getElementById('activity-notes');
    const activityStatus = document.getElementById('activity-status');
    bindTypePicker(activityForm, document.getElementById('activity-value-label'), activityValue, '');

    activityForm.addEventListener('submit', (event) => {
      event.preventDefault();
      const value = Number(activityValue.value);
      if (!(value > 0)) {
        return;
      }
      const notes = activityNotes.value.trim();
      send('POST', '/api/activities', { type: selectedType(activityForm), value, notes: notes || null })
        .then(() => {
          activityValue.value = '';
          activityNotes.value = '';
          acknowledge(activityStatus, 'Activity logged successfully!');
        })
        .catch((err) => setStatus(activityStatus, err.message, 'error'));
    });

    const goalForm = document.getElementById('goal-form');
    const goalTarget = document.getElementById('goal-target');
    const goalDeadline = document.getElementById('goal-deadline');
    const goalStatus = document.getElementById('goal-status');
    bindTypePicker(goalForm, document.getElementById('goal-target-label'), goalTarget, 'Target ');

    goalForm.addEventListener('submit', (event) => {
      event.preventDefault();
      const target = Number(goalTarget.value);
      if (!(target > 0)) {
        return;
      }
      send('POST', '/api/goals', { type: selectedType(goalForm), target, deadline: goalDeadline.value || null })
        .then(() => {
          goalTarget.value = '';
          goalDeadline.value = goalDeadline.dataset.default;
          acknowledge(goalStatus, 'Goal set successfully!');
        })
        .catch((err) => setStatus(goalStatus, err.message, 'error'));
    });

    const profileForm = document.getElementById('profile-form');
    const profileStatus = document.getElementById('profile-status');

    profileForm.addEventListener('submit', (event) => {
      event.preventDefault();
      const user = {
        name: document.getElementById('profile-name').value.trim(),
        weight: Number(document.getElementById('profile-weight').value),
        height: Number(document.getElementById('profile-height').value),
        age: Number(document.getElementById('profile-age').value),
        gender: document.getElementById('profile-gender').value
      };
      if (!user.name || !(user.weight > 0) || !(user.height > 0) || !Number.isInteger(user.age) || user.age < 0) {
        return;
      }
      send('PUT', '/api/user', user)
        .then(() => acknowledge(profileStatus, 'Profile updated successfully!'))
        .catch((err) => setStatus(profileStatus, err.message, 'error'));
    });

    document.addEventListener('click', (event) => {
      const { deleteGoal, deleteActivity } = event.target.dataset;
      let request = null;
      if (deleteGoal) {
        request = send('DELETE', `/api/goals/${deleteGoal}`);
      } else if (deleteActivity) {
        request = send('DELETE', `/api/activities/${deleteActivity}`);
      }
      if (request) {
        request.then(refresh).catch((err) => setStatus(dashboardStatus, err.message, 'error'));
      }
    });

    navItems.forEach((button) => {
      button.addEventListener('click', () => setActiveTab(button.dataset.tab));
    });

    seriesTabs.forEach((button) => {
      button.addEventListener('click', () => setSeriesType(button.dataset.series));
    });

    refresh();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::build_dashboard_at;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn empty_state_renders_placeholders_and_defaults() {
        let user = User::default();
        let dashboard = build_dashboard_at(today(), &[], &[], &user);
        let html = render_index(today(), &dashboard, &user);

        assert!(html.contains("Welcome back, <span id=\"greeting\">User</span>!"));
        assert!(html.contains("Monday, October 19, 2026"));
        assert!(html.contains(r#"value="2026-10-26" data-default="2026-10-26""#));
        assert!(html.contains(r#"<option value="other" selected>Other</option>"#));
        assert_eq!(html.matches(r#"class="card-progress">0% of goal"#).count(), 4);
        assert!(!html.contains("{{"));
        assert!(render_goals(&dashboard.goals).starts_with(r#"<p class="empty">No goals set yet."#));
        assert!(render_recent(&[]).contains("No activities recorded yet."));
    }

    #[test]
    fn user_text_is_escaped() {
        let user = User {
            name: "<b>{{CARDS}}</b>".to_string(),
            ..User::default()
        };
        let activity = Activity {
            id: Uuid::new_v4(),
            activity_type: ActivityType::Sleep,
            value: 7.5,
            date: today(),
            notes: Some("\"late\" & tired".to_string()),
        };
        let dashboard = build_dashboard_at(today(), &[activity], &[], &user);
        let html = render_index(today(), &dashboard, &user);

        assert!(html.contains("&lt;b&gt;&#123;&#123;CARDS}}&lt;/b&gt;"));
        assert!(html.contains("&quot;late&quot; &amp; tired"));
        assert!(html.contains("7.5 hrs"));
        assert!(html.contains("Oct 19, 2026"));
    }

    #[test]
    fn type_meta_covers_every_activity_type() {
        let meta: Value = serde_json::from_str(&type_meta_json()).unwrap();
        for activity_type in ActivityType::ALL {
            assert_eq!(meta[activity_type.as_str()]["unit"], activity_type.unit());
        }
        assert_eq!(meta["sleep"]["step"], "0.1");
    }
}
