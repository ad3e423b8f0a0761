//! 管理端：后端健康、用户列表、AI 服务状态的只读视图

use crate::api::use_api;
use crate::components::icons::Activity;
use goaltracker_shared::protocol::{AdminAiStatusRequest, AdminHealthRequest, AdminUsersRequest};
use goaltracker_shared::{AdminHealth, AdminUser, AiStatus};
use goaltracker_shared::date::format_short_date;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn AdminPage() -> impl IntoView {
    let api = use_api();

    let (health, set_health) = signal(Option::<AdminHealth>::None);
    let (users, set_users) = signal(Vec::<AdminUser>::new());
    let (ai_status, set_ai_status) = signal(Option::<AiStatus>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    spawn_local(async move {
        match api.send(&AdminHealthRequest).await {
            Ok(resp) => set_health.set(Some(resp.data)),
            Err(e) => {
                web_sys::console::error_1(&format!("[Admin] 健康检查失败: {}", e).into());
                set_error_msg.set(Some("Failed to load admin data".to_string()));
            }
        }
        match api.send(&AdminUsersRequest).await {
            Ok(resp) => set_users.set(resp.data),
            Err(e) => {
                web_sys::console::error_1(&format!("[Admin] 用户列表拉取失败: {}", e).into());
            }
        }
        match api.send(&AdminAiStatusRequest).await {
            Ok(resp) => set_ai_status.set(Some(resp.data)),
            Err(e) => {
                web_sys::console::error_1(&format!("[Admin] AI 状态拉取失败: {}", e).into());
            }
        }
    });

    view! {
        <div class="max-w-4xl mx-auto space-y-6">
            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-figure text-success">
                        <Activity attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Database"</div>
                    <div class="stat-value text-success text-2xl">
                        {move || match health.get() {
                            Some(h) => format!("{:.0} ms", h.db_ms),
                            None => "—".to_string(),
                        }}
                    </div>
                    <div class="stat-desc">"ping latency"</div>
                </div>

                <div class="stat">
                    <div class="stat-title">"Users"</div>
                    <div class="stat-value text-2xl">{move || users.with(|u| u.len())}</div>
                </div>

                <div class="stat">
                    <div class="stat-title">"AI service"</div>
                    <div class="stat-value text-2xl">
                        {move || match ai_status.get() {
                            Some(s) if s.enabled => "enabled".to_string(),
                            Some(_) => "disabled".to_string(),
                            None => "—".to_string(),
                        }}
                    </div>
                    <div class="stat-desc">
                        {move || ai_status
                            .get()
                            .map(|s| format!("{} / {}", s.provider, s.model))
                            .unwrap_or_default()}
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-6 pb-2">
                        <h3 class="card-title">"Users"</h3>
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Email"</th>
                                    <th class="hidden md:table-cell">"Joined"</th>
                                    <th class="hidden md:table-cell">"Last sign-in"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || users.with(|u| u.is_empty())>
                                    <tr>
                                        <td colspan="3" class="text-center py-8 text-base-content/50">
                                            "No users to show."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || users.get()
                                    key=|u| u.id.clone()
                                    children=move |user| {
                                        view! {
                                            <tr>
                                                <td class="font-mono text-sm">{user.email.clone()}</td>
                                                <td class="hidden md:table-cell text-sm opacity-70">
                                                    {user.created_at.map(|d| format_short_date(&d)).unwrap_or_default()}
                                                </td>
                                                <td class="hidden md:table-cell text-sm opacity-70">
                                                    {user.last_sign_in_at.map(|d| format_short_date(&d)).unwrap_or_default()}
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
}
