//! 时间线：目标按截止日期升序排列

use crate::components::icons::CalendarDays;
use crate::goals::use_goals;
use goaltracker_shared::date::{days_between, format_short_date, from_millis};
use goaltracker_shared::{Goal, GoalStatus};
use leptos::prelude::*;

/// 截止日期升序；没有截止日期的目标排在最后
fn by_due_date(goals: &[Goal]) -> Vec<Goal> {
    let mut sorted: Vec<Goal> = goals.to_vec();
    sorted.sort_by_key(|g| (g.due_date.is_none(), g.due_date));
    sorted
}

#[component]
pub fn TimelinePage() -> impl IntoView {
    let store = use_goals();

    let ordered = move || store.goals.with(|g| by_due_date(g));

    view! {
        <div class="max-w-3xl mx-auto">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title">"Timeline"</h2>
                    <p class="text-base-content/70 text-sm">"Goals ordered by due date."</p>

                    <Show when=move || store.error.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || store.error.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <Show when=move || store.initialized.get() && ordered().is_empty()>
                        <div class="text-center py-8 text-base-content/50">
                            "Nothing scheduled yet."
                        </div>
                    </Show>

                    <ul class="timeline timeline-vertical timeline-compact mt-4">
                        <For
                            each=ordered
                            key=|g| (g.id, g.updated_at)
                            children=|goal| {
                                let now = from_millis(js_sys::Date::now() as i64);
                                let due_label = goal.due_date.map(|d| format_short_date(&d));
                                let days_left = goal.due_date.map(|d| days_between(&now, &d));
                                let overdue = matches!(days_left, Some(n) if n < 0)
                                    && goal.status != GoalStatus::Completed;
                                let countdown = match days_left {
                                    Some(n) if n < 0 => format!("{} days overdue", -n),
                                    Some(0) => "due today".to_string(),
                                    Some(n) => format!("{} days left", n),
                                    None => "no due date".to_string(),
                                };
                                view! {
                                    <li>
                                        <div class="timeline-middle">
                                            <CalendarDays attr:class=if overdue { "h-5 w-5 text-error" } else { "h-5 w-5 text-primary" } />
                                        </div>
                                        <div class="timeline-end timeline-box w-full">
                                            <div class="flex items-center justify-between gap-2">
                                                <div>
                                                    <span class="font-semibold">{goal.title.clone()}</span>
                                                    <span class="text-xs text-base-content/60 ml-2">
                                                        {due_label.unwrap_or_default()}
                                                    </span>
                                                </div>
                                                <div class="flex items-center gap-2">
                                                    <span class=if overdue { "badge badge-error badge-sm" } else { "badge badge-ghost badge-sm" }>
                                                        {countdown}
                                                    </span>
                                                    <span class="text-sm text-base-content/70">
                                                        {format!("{}%", goal.latest_percentage())}
                                                    </span>
                                                </div>
                                            </div>
                                        </div>
                                        <hr/>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goaltracker_shared::date::parse_date_input;
    use goaltracker_shared::{GoalPriority, GoalStatus};

    fn make_goal(id: u64, due: Option<&str>) -> Goal {
        let ts = parse_date_input("2025-01-01").unwrap();
        Goal {
            id,
            title: format!("goal-{}", id),
            description: String::new(),
            job_role_id: None,
            status: GoalStatus::Active,
            priority: GoalPriority::Medium,
            due_date: due.map(|d| parse_date_input(d).unwrap()),
            tags: String::new(),
            progress: Vec::new(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn sorts_by_due_date_with_undated_last() {
        let goals = vec![
            make_goal(1, None),
            make_goal(2, Some("2025-06-01")),
            make_goal(3, Some("2025-02-01")),
        ];
        let sorted = by_due_date(&goals);
        let ids: Vec<u64> = sorted.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
