//! 登录页：魔法链接与密码两种方式

use crate::auth::{login_with_password, request_magic_link, use_auth};
use crate::components::icons::Target;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy, PartialEq, Eq)]
enum LoginTab {
    MagicLink,
    Password,
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let (tab, set_tab) = signal(LoginTab::MagicLink);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (info_msg, set_info_msg) = signal(Option::<String>::None);

    let on_magic_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().is_empty() {
            set_error_msg.set(Some("Please enter your email".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);
        set_info_msg.set(None);

        spawn_local(async move {
            match request_magic_link(&auth, email.get_untracked()).await {
                Ok(()) => {
                    set_info_msg.set(Some("Check your email for the magic link.".to_string()));
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("[Auth] 魔法链接发送失败: {}", e).into());
                    set_error_msg.set(Some("Failed to send magic link".to_string()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    let on_password_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);
        set_info_msg.set(None);

        spawn_local(async move {
            // 成功后会话信号翻转，应用外壳自动切换到认证视图
            match login_with_password(&auth, email.get_untracked(), password.get_untracked()).await
            {
                Ok(()) => {}
                Err(e) => {
                    web_sys::console::error_1(&format!("[Auth] 密码登录失败: {}", e).into());
                    set_error_msg.set(Some("Sign-in failed. Check email and password.".to_string()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Target attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"GoalTracker"</h1>
                        <p class="text-base-content/70">"Sign in to track your goals"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <div class="card-body">
                        <div role="tablist" class="tabs tabs-boxed mb-2">
                            <a
                                role="tab"
                                class=move || if tab.get() == LoginTab::MagicLink { "tab tab-active" } else { "tab" }
                                on:click=move |_| set_tab.set(LoginTab::MagicLink)
                            >
                                "Magic link"
                            </a>
                            <a
                                role="tab"
                                class=move || if tab.get() == LoginTab::Password { "tab tab-active" } else { "tab" }
                                on:click=move |_| set_tab.set(LoginTab::Password)
                            >
                                "Password"
                            </a>
                        </div>

                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>
                        <Show when=move || info_msg.get().is_some()>
                            <div role="alert" class="alert alert-success text-sm py-2">
                                <span>{move || info_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <Show
                            when=move || tab.get() == LoginTab::Password
                            fallback=move || view! {
                                <form on:submit=on_magic_submit>
                                    <div class="form-control mt-6">
                                        <button class="btn btn-primary w-full" disabled=move || is_submitting.get()>
                                            {move || if is_submitting.get() {
                                                view! { <span class="loading loading-spinner"></span> "Sending..." }.into_any()
                                            } else {
                                                "Send magic link".into_any()
                                            }}
                                        </button>
                                    </div>
                                </form>
                            }
                        >
                            <form on:submit=on_password_submit>
                                <div class="form-control">
                                    <label class="label" for="password">
                                        <span class="label-text">"Password"</span>
                                    </label>
                                    <input
                                        id="password"
                                        type="password"
                                        placeholder="••••••••"
                                        on:input=move |ev| set_password.set(event_target_value(&ev))
                                        prop:value=password
                                        class="input input-bordered w-full"
                                        required
                                    />
                                </div>
                                <div class="form-control mt-6">
                                    <button class="btn btn-primary w-full" disabled=move || is_submitting.get()>
                                        {move || if is_submitting.get() {
                                            view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                        } else {
                                            "Sign in".into_any()
                                        }}
                                    </button>
                                </div>
                            </form>
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
}
