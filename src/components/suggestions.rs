//! 目标建议页
//!
//! 选职位角色 -> 选职责 -> 查看预置建议，或按用户画像生成
//! AI 个性化建议；两者都可一键采纳为新目标。

use crate::api::use_api;
use crate::components::icons::{Plus, Sparkles};
use crate::goals::use_goals;
use goaltracker_shared::protocol::{
    AiGoalSuggestionsRequest, GetMyProfileRequest, GoalPayload, ListJobRolesRequest,
    ResponsibilitiesForRoleRequest, SuggestionsForResponsibilityRequest,
};
use goaltracker_shared::{AiGoalSuggestion, GoalSuggestion, JobRole, Responsibility};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn SuggestionsPage() -> impl IntoView {
    let api = use_api();
    let store = use_goals();

    let (job_roles, set_job_roles) = signal(Vec::<JobRole>::new());
    let (responsibilities, set_responsibilities) = signal(Vec::<Responsibility>::new());
    let (suggestions, set_suggestions) = signal(Vec::<GoalSuggestion>::new());
    let (ai_suggestions, set_ai_suggestions) = signal(Vec::<AiGoalSuggestion>::new());

    let (selected_role, set_selected_role) = signal(Option::<u64>::None);
    let (selected_resp, set_selected_resp) = signal(Option::<u64>::None);

    let (generating, set_generating) = signal(false);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    // 挂载时拉取职位角色目录
    spawn_local(async move {
        match api.send(&ListJobRolesRequest).await {
            Ok(resp) => set_job_roles.set(resp.data),
            Err(e) => {
                web_sys::console::error_1(&format!("[Suggestions] 拉取职位角色失败: {}", e).into());
                set_notification.set(Some(("Failed to load job roles".to_string(), true)));
            }
        }
    });

    let on_role_change = move |role_id: u64| {
        set_selected_role.set(Some(role_id));
        set_selected_resp.set(None);
        set_suggestions.set(Vec::new());
        set_ai_suggestions.set(Vec::new());
        spawn_local(async move {
            match api
                .send(&ResponsibilitiesForRoleRequest { job_role_id: role_id })
                .await
            {
                Ok(resp) => set_responsibilities.set(resp.data),
                Err(e) => {
                    web_sys::console::error_1(&format!("[Suggestions] 拉取职责失败: {}", e).into());
                    set_notification.set(Some(("Failed to load responsibilities".to_string(), true)));
                }
            }
        });
    };

    let on_resp_change = move |resp_id: u64| {
        set_selected_resp.set(Some(resp_id));
        set_ai_suggestions.set(Vec::new());
        spawn_local(async move {
            match api
                .send(&SuggestionsForResponsibilityRequest { responsibility_id: resp_id })
                .await
            {
                Ok(resp) => set_suggestions.set(resp.data),
                Err(e) => {
                    web_sys::console::error_1(&format!("[Suggestions] 拉取建议失败: {}", e).into());
                    set_notification.set(Some(("Failed to load suggestions".to_string(), true)));
                }
            }
        });
    };

    let on_generate = move |_| {
        let Some(resp_id) = selected_resp.get_untracked() else {
            set_notification.set(Some(("Pick a responsibility first".to_string(), true)));
            return;
        };
        set_generating.set(true);
        spawn_local(async move {
            // AI 请求需要用户画像做个性化输入
            let profile = match api.send(&GetMyProfileRequest).await {
                Ok(resp) => resp.data,
                Err(e) => {
                    web_sys::console::error_1(&format!("[Suggestions] 拉取资料失败: {}", e).into());
                    set_notification.set(Some(("Failed to load profile".to_string(), true)));
                    set_generating.set(false);
                    return;
                }
            };
            let req = AiGoalSuggestionsRequest {
                user_profile: profile,
                responsibility_id: resp_id,
                ..Default::default()
            };
            match api.send(&req).await {
                Ok(resp) => set_ai_suggestions.set(resp.data),
                Err(e) => {
                    web_sys::console::error_1(&format!("[Suggestions] AI 生成失败: {}", e).into());
                    set_notification.set(Some(("AI generation failed".to_string(), true)));
                }
            }
            set_generating.set(false);
        });
    };

    let adopt = move |payload: GoalPayload| {
        spawn_local(async move {
            match store.create(payload).await {
                Ok(goal) => {
                    set_notification.set(Some((format!("Added \"{}\"", goal.title), false)));
                }
                Err(e) => {
                    set_notification.set(Some((format!("Could not add goal: {}", e), true)));
                }
            }
        });
    };

    view! {
        <div class="max-w-4xl mx-auto space-y-6">
            <Show when=move || notification.get().is_some()>
                <div class="toast toast-top toast-end z-50">
                    <div class=move || {
                        let (_, is_err) = notification.get().unwrap_or_default();
                        if is_err { "alert alert-error shadow-lg" } else { "alert alert-success shadow-lg" }
                    }>
                        <span>{move || notification.get().unwrap_or_default().0}</span>
                    </div>
                </div>
            </Show>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title">"Goal suggestions"</h2>
                    <p class="text-base-content/70 text-sm">
                        "Browse curated goals for your role, or generate personalized ones."
                    </p>

                    <div class="grid md:grid-cols-2 gap-4 mt-2">
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Job role"</span>
                            </label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    if let Ok(id) = event_target_value(&ev).parse::<u64>() {
                                        on_role_change(id);
                                    }
                                }
                            >
                                <option value="" selected=move || selected_role.get().is_none()>
                                    "Select a role..."
                                </option>
                                <For
                                    each=move || job_roles.get()
                                    key=|r| r.id
                                    children=move |role| {
                                        let id = role.id;
                                        view! {
                                            <option
                                                value=id.to_string()
                                                selected=move || selected_role.get() == Some(id)
                                            >
                                                {role.title.clone()}
                                            </option>
                                        }
                                    }
                                />
                            </select>
                        </div>

                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Responsibility"</span>
                            </label>
                            <select
                                class="select select-bordered w-full"
                                disabled=move || selected_role.get().is_none()
                                on:change=move |ev| {
                                    if let Ok(id) = event_target_value(&ev).parse::<u64>() {
                                        on_resp_change(id);
                                    }
                                }
                            >
                                <option value="" selected=move || selected_resp.get().is_none()>
                                    "Select a responsibility..."
                                </option>
                                <For
                                    each=move || responsibilities.get()
                                    key=|r| r.id
                                    children=move |resp| {
                                        let id = resp.id;
                                        view! {
                                            <option
                                                value=id.to_string()
                                                selected=move || selected_resp.get() == Some(id)
                                            >
                                                {resp.title.clone()}
                                            </option>
                                        }
                                    }
                                />
                            </select>
                        </div>
                    </div>

                    <div class="mt-2">
                        <button
                            class="btn btn-secondary btn-sm gap-2"
                            disabled=move || generating.get() || selected_resp.get().is_none()
                            on:click=on_generate
                        >
                            {move || if generating.get() {
                                view! { <span class="loading loading-spinner loading-xs"></span> "Generating..." }.into_any()
                            } else {
                                view! { <Sparkles attr:class="h-4 w-4" /> "Generate with AI" }.into_any()
                            }}
                        </button>
                    </div>
                </div>
            </div>

            // 预置建议
            <Show when=move || !suggestions.get().is_empty()>
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title text-base">"Curated suggestions"</h3>
                        <div class="space-y-2">
                            <For
                                each=move || suggestions.get()
                                key=|s| s.id
                                children=move |s| {
                                    let payload = GoalPayload {
                                        title: s.title.clone(),
                                        description: s.description.clone(),
                                        priority: s.priority,
                                        ..Default::default()
                                    };
                                    let duration = s.estimated_duration.clone();
                                    view! {
                                        <div class="flex items-start justify-between gap-4 bg-base-200 rounded-lg p-4">
                                            <div class="min-w-0">
                                                <div class="font-semibold">{s.title.clone()}</div>
                                                <p class="text-sm text-base-content/70">{s.description.clone()}</p>
                                                <div class="flex gap-2 mt-1 text-xs text-base-content/60">
                                                    <span class="badge badge-ghost badge-sm">{s.category.clone()}</span>
                                                    <Show when={
                                                        let d = duration.clone();
                                                        move || !d.is_empty()
                                                    }>
                                                        <span>{format!("~{}", duration)}</span>
                                                    </Show>
                                                </div>
                                            </div>
                                            <button
                                                class="btn btn-primary btn-sm gap-1 shrink-0"
                                                on:click=move |_| adopt(payload.clone())
                                            >
                                                <Plus attr:class="h-4 w-4" /> "Add"
                                            </button>
                                        </div>
                                    }
                                }
                            />
                        </div>
                    </div>
                </div>
            </Show>

            // AI 个性化建议
            <Show when=move || !ai_suggestions.get().is_empty()>
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title text-base gap-2">
                            <Sparkles attr:class="h-5 w-5 text-secondary" /> "Personalized suggestions"
                        </h3>
                        <div class="space-y-2">
                            <For
                                each=move || ai_suggestions.get()
                                key=|s| s.title.clone()
                                children=move |s| {
                                    let payload = GoalPayload {
                                        title: s.title.clone(),
                                        description: s.personalized_description.clone(),
                                        ..Default::default()
                                    };
                                    view! {
                                        <div class="flex items-start justify-between gap-4 bg-base-200 rounded-lg p-4">
                                            <div class="min-w-0">
                                                <div class="font-semibold">{s.title.clone()}</div>
                                                <p class="text-sm text-base-content/70">{s.personalized_description.clone()}</p>
                                                <div class="flex gap-3 mt-1 text-xs text-base-content/60">
                                                    <span>{format!("~{} days", s.estimated_days)}</span>
                                                    <span>{format!("market fit {:.0}%", s.market_relevance_score * 100.0)}</span>
                                                </div>
                                            </div>
                                            <button
                                                class="btn btn-primary btn-sm gap-1 shrink-0"
                                                on:click=move |_| adopt(payload.clone())
                                            >
                                                <Plus attr:class="h-4 w-4" /> "Add"
                                            </button>
                                        </div>
                                    }
                                }
                            />
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
