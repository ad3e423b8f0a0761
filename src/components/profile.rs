//! 用户资料页
//!
//! 挂载时取回（后端在资料不存在时自动创建一份空资料），
//! 编辑角色/经验等级/行业后保存。

use crate::api::use_api;
use crate::components::icons::User;
use leptos::prelude::*;
use leptos::task::spawn_local;
use goaltracker_shared::ExperienceLevel;
use goaltracker_shared::protocol::{GetMyProfileRequest, UpdateProfileRequest};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let api = use_api();

    let (profile_id, set_profile_id) = signal(0u64);
    let (current_role, set_current_role) = signal(String::new());
    let (experience, set_experience) = signal(String::new());
    let (industry, set_industry) = signal(String::new());
    let (company_size, set_company_size) = signal(String::new());
    let (career_goals, set_career_goals) = signal(String::new());

    let (loading, set_loading) = signal(true);
    let (saving, set_saving) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (saved_msg, set_saved_msg) = signal(false);

    // 挂载时取回（或创建）资料
    spawn_local(async move {
        match api.send(&GetMyProfileRequest).await {
            Ok(resp) => {
                let p = resp.data;
                set_profile_id.set(p.id);
                set_current_role.set(p.current_role);
                set_experience.set(p.experience_level);
                set_industry.set(p.industry);
                set_company_size.set(p.company_size);
                set_career_goals.set(p.career_goals);
            }
            Err(e) => {
                web_sys::console::error_1(&format!("[Profile] 拉取资料失败: {}", e).into());
                set_error_msg.set(Some("Failed to load profile".to_string()));
            }
        }
        set_loading.set(false);
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_saving.set(true);
        set_error_msg.set(None);
        set_saved_msg.set(false);

        let req = UpdateProfileRequest {
            id: profile_id.get_untracked(),
            current_role: Some(current_role.get_untracked()),
            experience_level: Some(experience.get_untracked()),
            industry: Some(industry.get_untracked()),
            company_size: Some(company_size.get_untracked()),
            career_goals: Some(career_goals.get_untracked()),
        };

        spawn_local(async move {
            match api.send(&req).await {
                Ok(_) => set_saved_msg.set(true),
                Err(e) => {
                    web_sys::console::error_1(&format!("[Profile] 保存资料失败: {}", e).into());
                    set_error_msg.set(Some("Failed to save profile".to_string()));
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        <div class="max-w-2xl mx-auto">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="flex items-center gap-2">
                        <User attr:class="h-6 w-6 text-primary" />
                        <h2 class="card-title">"Your profile"</h2>
                    </div>
                    <p class="text-base-content/70 text-sm">
                        "Role and experience personalize your goal suggestions."
                    </p>

                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    <Show when=move || saved_msg.get()>
                        <div role="alert" class="alert alert-success text-sm py-2">
                            <span>"Profile saved."</span>
                        </div>
                    </Show>

                    <Show
                        when=move || !loading.get()
                        fallback=|| view! {
                            <div class="text-center py-8">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                    >
                        <form on:submit=on_submit class="space-y-4">
                            <div class="form-control">
                                <label for="profile_role" class="label">
                                    <span class="label-text">"Current role"</span>
                                </label>
                                <input id="profile_role" required
                                    type="text"
                                    placeholder="Backend Engineer"
                                    on:input=move |ev| set_current_role.set(event_target_value(&ev))
                                    prop:value=current_role
                                    class="input input-bordered w-full"
                                />
                            </div>

                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Experience level"</span>
                                </label>
                                <select
                                    class="select select-bordered w-full"
                                    on:change=move |ev| set_experience.set(event_target_value(&ev))
                                >
                                    <option value="" selected=move || experience.get().is_empty()>
                                        "Select..."
                                    </option>
                                    {ExperienceLevel::ALL
                                        .iter()
                                        .map(|&level| view! {
                                            <option
                                                value=level.as_str()
                                                selected=move || experience.get() == level.as_str()
                                            >
                                                {level.as_str()}
                                            </option>
                                        })
                                        .collect_view()}
                                </select>
                            </div>

                            <div class="grid grid-cols-2 gap-4">
                                <div class="form-control">
                                    <label for="profile_industry" class="label">
                                        <span class="label-text">"Industry"</span>
                                    </label>
                                    <input id="profile_industry"
                                        type="text"
                                        placeholder="Fintech"
                                        on:input=move |ev| set_industry.set(event_target_value(&ev))
                                        prop:value=industry
                                        class="input input-bordered w-full"
                                    />
                                </div>
                                <div class="form-control">
                                    <label for="profile_company" class="label">
                                        <span class="label-text">"Company size"</span>
                                    </label>
                                    <input id="profile_company"
                                        type="text"
                                        placeholder="50-200"
                                        on:input=move |ev| set_company_size.set(event_target_value(&ev))
                                        prop:value=company_size
                                        class="input input-bordered w-full"
                                    />
                                </div>
                            </div>

                            <div class="form-control">
                                <label for="profile_career" class="label">
                                    <span class="label-text">"Career goals (optional)"</span>
                                </label>
                                <textarea id="profile_career"
                                    placeholder="Where do you want to be in two years?"
                                    on:input=move |ev| set_career_goals.set(event_target_value(&ev))
                                    prop:value=career_goals
                                    class="textarea textarea-bordered w-full"
                                ></textarea>
                            </div>

                            <div class="card-actions justify-end">
                                <button type="submit" disabled=move || saving.get() class="btn btn-primary">
                                    {move || if saving.get() {
                                        view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                                    } else {
                                        "Save profile".into_any()
                                    }}
                                </button>
                            </div>
                        </form>
                    </Show>
                </div>
            </div>
        </div>
    }
}
