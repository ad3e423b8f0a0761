//! 仪表盘：统计条 + 目标卡片列表

use crate::components::icons::*;
use crate::components::progress_dialog::ProgressDialog;
use crate::goals::use_goals;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use goaltracker_shared::date::format_short_date;
use goaltracker_shared::protocol::GoalPayload;
use goaltracker_shared::{Goal, GoalPriority, GoalStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn status_badge_class(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Active => "badge badge-success badge-outline",
        GoalStatus::Paused => "badge badge-warning badge-outline",
        GoalStatus::Completed => "badge badge-neutral badge-outline",
    }
}

fn priority_badge_class(priority: GoalPriority) -> &'static str {
    match priority {
        GoalPriority::Low => "badge badge-ghost",
        GoalPriority::Medium => "badge badge-info badge-outline",
        GoalPriority::High => "badge badge-error badge-outline",
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let store = use_goals();
    let router = use_router();

    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    let set_status = move |goal: &Goal, status: GoalStatus| {
        let id = goal.id;
        let mut payload = GoalPayload::from(goal);
        payload.status = status;
        spawn_local(async move {
            match store.update(id, payload).await {
                Ok(_) => set_notification.set(Some(("Goal updated".to_string(), false))),
                Err(e) => {
                    set_notification.set(Some((format!("Update failed: {}", e), true)));
                }
            }
        });
    };

    let handle_delete = move |id: u64| {
        spawn_local(async move {
            match store.delete(id).await {
                Ok(_) => set_notification.set(Some(("Goal deleted".to_string(), false))),
                Err(e) => {
                    set_notification.set(Some((format!("Delete failed: {}", e), true)));
                }
            }
        });
    };

    // 统计数据的派生值
    let total = move || store.goals.with(|g| g.len());
    let active = move || {
        store
            .goals
            .with(|g| g.iter().filter(|g| g.status == GoalStatus::Active).count())
    };
    let completed = move || {
        store.goals.with(|g| {
            g.iter()
                .filter(|g| g.status == GoalStatus::Completed)
                .count()
        })
    };
    let avg_completion = move || {
        store.goals.with(|g| {
            let active: Vec<_> = g
                .iter()
                .filter(|g| g.status == GoalStatus::Active)
                .collect();
            if active.is_empty() {
                0
            } else {
                active
                    .iter()
                    .map(|g| g.latest_percentage() as usize)
                    .sum::<usize>()
                    / active.len()
            }
        })
    };

    view! {
        <div class="space-y-8">
            // 通知提示框
            <Show when=move || notification.get().is_some()>
                <div class="toast toast-top toast-end z-50">
                    <div class=move || {
                        let (_, is_err) = notification.get().unwrap_or_default();
                        if is_err {
                            "alert alert-error shadow-lg"
                        } else {
                            "alert alert-success shadow-lg"
                        }
                    }>
                        <span>{move || notification.get().unwrap_or_default().0}</span>
                    </div>
                </div>
            </Show>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-figure text-primary">
                        <Target attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Goals"</div>
                    <div class="stat-value text-primary">{total}</div>
                </div>

                <div class="stat">
                    <div class="stat-figure text-success">
                        <Activity attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Active"</div>
                    <div class="stat-value text-success">{active}</div>
                </div>

                <div class="stat">
                    <div class="stat-title">"Completed"</div>
                    <div class="stat-value">{completed}</div>
                </div>

                <div class="stat">
                    <div class="stat-figure text-secondary">
                        <TrendingUp attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Avg. completion"</div>
                    <div class="stat-value text-secondary">{move || format!("{}%", avg_completion())}</div>
                    <div class="stat-desc">"across active goals"</div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <div>
                            <h3 class="card-title">"Your goals"</h3>
                            <p class="text-base-content/70 text-sm">"Track progress and keep momentum."</p>
                        </div>
                        <div class="flex gap-2">
                            <button
                                on:click=move |_| store.fetch()
                                disabled=move || store.loading.get()
                                class="btn btn-ghost btn-circle"
                            >
                                <RefreshCw attr:class=move || if store.loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                            </button>
                            <button
                                on:click=move |_| router.navigate(AppRoute::NewGoal)
                                class="btn btn-primary gap-2"
                            >
                                <Plus attr:class="h-4 w-4" /> "New goal"
                            </button>
                        </div>
                    </div>

                    <Show when=move || store.error.get().is_some()>
                        <div role="alert" class="alert alert-error mx-6 my-2 text-sm py-2">
                            <span>{move || store.error.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <div class="p-6 pt-2 space-y-4">
                        // 首轮加载完成前不渲染空状态，避免"没有目标"一闪而过
                        <Show when=move || !store.initialized.get() && store.loading.get()>
                            <div class="text-center py-8 text-base-content/50">
                                <span class="loading loading-spinner loading-md"></span> " Loading..."
                            </div>
                        </Show>
                        <Show when=move || store.initialized.get() && total() == 0>
                            <div class="text-center py-8 text-base-content/50">
                                "No goals yet. Create one to get started."
                            </div>
                        </Show>

                        <For
                            each=move || store.goals.get()
                            key=|g| (g.id, g.updated_at, g.progress.len())
                            children=move |goal| {
                                let latest = goal.latest_percentage();
                                let description = goal.description.clone();
                                let due = goal.due_date.map(|d| format_short_date(&d));
                                let goal_for_status = goal.clone();
                                let goal_for_pause = goal.clone();
                                let id = goal.id;
                                let next_status = if goal.status == GoalStatus::Paused {
                                    GoalStatus::Active
                                } else {
                                    GoalStatus::Paused
                                };
                                let pause_label = if goal.status == GoalStatus::Paused { "Resume" } else { "Pause" };
                                view! {
                                    <div class="card card-compact bg-base-200">
                                        <div class="card-body">
                                            <div class="flex items-start justify-between gap-4">
                                                <div class="min-w-0">
                                                    <div class="flex items-center gap-2 flex-wrap">
                                                        <h4 class="font-bold text-base truncate">{goal.title.clone()}</h4>
                                                        <span class=status_badge_class(goal.status)>{goal.status.as_str()}</span>
                                                        <span class=priority_badge_class(goal.priority)>{goal.priority.as_str()}</span>
                                                    </div>
                                                    <Show when={
                                                        let desc = description.clone();
                                                        move || !desc.is_empty()
                                                    }>
                                                        <p class="text-sm text-base-content/70 mt-1">{description.clone()}</p>
                                                    </Show>
                                                    <div class="flex items-center gap-4 mt-2 text-xs text-base-content/60">
                                                        {due.map(|d| view! {
                                                            <span class="flex items-center gap-1">
                                                                <CalendarDays attr:class="h-3 w-3" /> {d}
                                                            </span>
                                                        })}
                                                        <span>{format!("{} progress entries", goal.progress.len())}</span>
                                                    </div>
                                                </div>
                                                <div class="flex items-center gap-2 shrink-0">
                                                    <div class="radial-progress text-primary text-xs"
                                                        style=format!("--value:{}; --size:3rem;", latest)>
                                                        {format!("{}%", latest)}
                                                    </div>
                                                    <ProgressDialog goal_id=id goal_title=goal.title.clone() store=store />
                                                    <div class="dropdown dropdown-end">
                                                        <div tabindex="0" role="button" class="btn btn-ghost btn-sm btn-square">
                                                            <MoreHorizontal attr:class="h-4 w-4" />
                                                        </div>
                                                        <ul tabindex="0" class="dropdown-content z-[1] menu p-2 shadow bg-base-100 rounded-box w-52">
                                                            <li>
                                                                <a on:click=move |_| set_status(&goal_for_status, GoalStatus::Completed)>
                                                                    "Mark completed"
                                                                </a>
                                                            </li>
                                                            <li>
                                                                <a on:click=move |_| set_status(&goal_for_pause, next_status)>
                                                                    {pause_label}
                                                                </a>
                                                            </li>
                                                            <li>
                                                                <a on:click=move |_| handle_delete(id) class="text-error hover:bg-error/10">
                                                                    <Trash2 attr:class="mr-2 h-4 w-4" />
                                                                    "Delete"
                                                                </a>
                                                            </li>
                                                        </ul>
                                                    </div>
                                                </div>
                                            </div>
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>
                </div>
            </div>
        </div>
    }
}
