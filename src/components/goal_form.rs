//! 新建目标表单
//!
//! 提交成功后返回仪表盘；失败时表单保持打开并显示错误，
//! 用户可修正后重试。附带两个 AI 辅助动作：SMART 精炼与
//! 里程碑生成。

mod form_state;

use crate::api::use_api;
use crate::components::icons::Sparkles;
use crate::goals::use_goals;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use form_state::FormState;
use goaltracker_shared::date::parse_date_input;
use goaltracker_shared::protocol::{GenerateMilestonesRequest, RefineGoalRequest};
use goaltracker_shared::{GoalPriority, Milestone};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn NewGoalPage() -> impl IntoView {
    let store = use_goals();
    let api = use_api();
    let router = use_router();

    let form = FormState::new();
    let (submitting, set_submitting) = signal(false);
    let (refining, set_refining) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (milestones, set_milestones) = signal(Vec::<Milestone>::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if form.title.get().trim().is_empty() {
            set_error_msg.set(Some("Title is required".to_string()));
            return;
        }

        set_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match store.create(form.to_payload()).await {
                Ok(_) => {
                    form.reset();
                    router.navigate(AppRoute::Home);
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("[Goals] 创建目标失败: {}", e).into());
                    set_error_msg.set(Some("Failed to create goal".to_string()));
                }
            }
            set_submitting.set(false);
        });
    };

    let on_refine = move |_| {
        if form.title.get().trim().is_empty() {
            set_error_msg.set(Some("Enter a title to refine".to_string()));
            return;
        }
        set_refining.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let req = RefineGoalRequest {
                title: form.title.get_untracked(),
                description: form.description.get_untracked(),
            };
            match api.send(&req).await {
                Ok(resp) => form.apply_refinement(&resp.data),
                Err(e) => {
                    web_sys::console::error_1(&format!("[AI] 精炼失败: {}", e).into());
                    set_error_msg.set(Some("AI refinement failed".to_string()));
                }
            }
            set_refining.set(false);
        });
    };

    let on_milestones = move |_| {
        if form.title.get().trim().is_empty() {
            set_error_msg.set(Some("Enter a title first".to_string()));
            return;
        }
        set_refining.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let req = GenerateMilestonesRequest {
                title: form.title.get_untracked(),
                description: form.description.get_untracked(),
                due_date: parse_date_input(&form.due_date.get_untracked()),
            };
            match api.send(&req).await {
                Ok(resp) => set_milestones.set(resp.data),
                Err(e) => {
                    web_sys::console::error_1(&format!("[AI] 里程碑生成失败: {}", e).into());
                    set_error_msg.set(Some("Milestone generation failed".to_string()));
                }
            }
            set_refining.set(false);
        });
    };

    view! {
        <div class="max-w-2xl mx-auto">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title">"New goal"</h2>

                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <form on:submit=on_submit class="space-y-4">
                        <div class="form-control">
                            <label for="goal_title" class="label">
                                <span class="label-text">"Title"</span>
                            </label>
                            <input id="goal_title" required
                                type="text"
                                placeholder="Learn Kubernetes fundamentals"
                                on:input=move |ev| form.title.set(event_target_value(&ev))
                                prop:value=form.title
                                class="input input-bordered w-full"
                            />
                        </div>

                        <div class="form-control">
                            <label for="goal_description" class="label">
                                <span class="label-text">"Description"</span>
                            </label>
                            <textarea id="goal_description"
                                placeholder="What does success look like?"
                                on:input=move |ev| form.description.set(event_target_value(&ev))
                                prop:value=form.description
                                class="textarea textarea-bordered w-full"
                            ></textarea>
                        </div>

                        <div class="grid grid-cols-2 gap-4">
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Priority"</span>
                                </label>
                                <select
                                    class="select select-bordered w-full"
                                    on:change=move |ev| {
                                        if let Some(p) = GoalPriority::parse(&event_target_value(&ev)) {
                                            form.priority.set(p);
                                        }
                                    }
                                >
                                    {GoalPriority::ALL
                                        .iter()
                                        .map(|&p| view! {
                                            <option
                                                value=p.as_str()
                                                selected=move || form.priority.get() == p
                                            >
                                                {p.as_str()}
                                            </option>
                                        })
                                        .collect_view()}
                                </select>
                            </div>
                            <div class="form-control">
                                <label for="goal_due" class="label">
                                    <span class="label-text">"Due date (optional)"</span>
                                </label>
                                <input id="goal_due"
                                    type="date"
                                    on:input=move |ev| form.due_date.set(event_target_value(&ev))
                                    prop:value=form.due_date
                                    class="input input-bordered w-full"
                                />
                            </div>
                        </div>

                        <div class="form-control">
                            <label for="goal_tags" class="label">
                                <span class="label-text">"Tags (optional)"</span>
                            </label>
                            <input id="goal_tags"
                                type="text"
                                placeholder="devops, learning"
                                on:input=move |ev| form.tags.set(event_target_value(&ev))
                                prop:value=form.tags
                                class="input input-bordered w-full"
                            />
                        </div>

                        <div class="flex gap-2">
                            <button type="button" class="btn btn-outline btn-sm gap-2"
                                disabled=move || refining.get()
                                on:click=on_refine
                            >
                                <Sparkles attr:class="h-4 w-4" /> "Refine with AI"
                            </button>
                            <button type="button" class="btn btn-outline btn-sm gap-2"
                                disabled=move || refining.get()
                                on:click=on_milestones
                            >
                                <Sparkles attr:class="h-4 w-4" /> "Suggest milestones"
                            </button>
                        </div>

                        <Show when=move || !milestones.get().is_empty()>
                            <div class="bg-base-200 rounded-lg p-4">
                                <h4 class="font-semibold text-sm mb-2">"Suggested milestones"</h4>
                                <ul class="space-y-1 text-sm">
                                    <For
                                        each=move || milestones.get()
                                        key=|m| m.title.clone()
                                        children=|m| view! {
                                            <li class="flex justify-between">
                                                <span>{m.title.clone()}</span>
                                                <span class="text-base-content/60">
                                                    {format!("{}% · ~{} days", m.percentage, m.eta_days)}
                                                </span>
                                            </li>
                                        }
                                    />
                                </ul>
                            </div>
                        </Show>

                        <div class="card-actions justify-end mt-4">
                            <button type="button" class="btn btn-ghost"
                                on:click=move |_| router.navigate(AppRoute::Home)
                            >
                                "Cancel"
                            </button>
                            <button type="submit" disabled=move || submitting.get() class="btn btn-primary">
                                {move || if submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating..." }.into_any()
                                } else {
                                    "Create goal".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
