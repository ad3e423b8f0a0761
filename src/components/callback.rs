//! 身份回调着陆页
//!
//! 驱动回调握手流程并在完成后重定向回首页。等待会话事件的
//! 订阅是组件作用域内的 Effect，视图卸载时随作用域一起释放，
//! 不会留下游离回调。

pub mod flow;

use crate::auth::{AuthContext, AuthError, Session, use_auth};
use crate::web::router::{current_hash, use_router};
use crate::web::route::AppRoute;
use async_trait::async_trait;
use flow::{CallbackOutcome, CallbackPhase, RedirectOnce, run_callback_flow};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 真实身份服务对流程依赖的适配
struct AuthExchanger {
    auth: AuthContext,
}

#[async_trait(?Send)]
impl flow::SessionExchanger for AuthExchanger {
    async fn exchange(
        &self,
        access: Option<&str>,
        refresh: Option<&str>,
    ) -> Result<Session, AuthError> {
        self.auth.client().exchange_tokens(access, refresh).await
    }

    async fn existing_session(&self) -> Option<Session> {
        self.auth.session().get_untracked()
    }
}

#[component]
pub fn CallbackPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (status, set_status) = signal("Signing you in...".to_string());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (awaiting, set_awaiting) = signal(false);

    // 无论后续再收到多少会话事件，重定向只允许发生一次
    let redirected = StoredValue::new_local(RedirectOnce::default());
    let go_home = move || {
        if redirected.with_value(|r| r.fire()) {
            router.navigate(AppRoute::Home);
        }
    };

    // 等待期间的订阅：第一个非空会话触发唯一的一次重定向
    let is_authenticated = auth.is_authenticated_signal();
    Effect::new(move |_| {
        if awaiting.get() && is_authenticated.get() {
            go_home();
        }
    });

    spawn_local(async move {
        let exchanger = AuthExchanger { auth };
        let outcome = run_callback_flow(&current_hash(), &exchanger, move |phase| {
            set_status.set(
                match phase {
                    CallbackPhase::Extracting => "Signing you in...",
                    CallbackPhase::Exchanging => "Setting session...",
                    CallbackPhase::Finalizing => "Finalizing sign-in...",
                }
                .to_string(),
            );
        })
        .await;

        match outcome {
            CallbackOutcome::SignedIn(session) => {
                auth.set_session(session);
                go_home();
            }
            CallbackOutcome::AwaitSession => set_awaiting.set(true),
            CallbackOutcome::Failed(reason) => {
                web_sys::console::error_1(&format!("[Callback] 登录失败: {}", reason).into());
                set_error_msg.set(Some(
                    "Could not complete sign-in. You can try again.".to_string(),
                ));
            }
        }
    });

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content w-full max-w-md">
                <div class="card w-full shadow-2xl bg-base-100">
                    <div class="card-body text-center">
                        <h1 class="text-xl font-semibold">"Authenticating"</h1>
                        <Show
                            when=move || error_msg.get().is_none()
                            fallback=move || view! {
                                <p class="text-sm text-error">{move || error_msg.get().unwrap_or_default()}</p>
                            }
                        >
                            <p class="text-sm text-base-content/70">{status}</p>
                            <span class="loading loading-spinner loading-md mx-auto mt-2"></span>
                        </Show>
                        <div class="mt-6">
                            <a href="#/" class="btn btn-primary btn-sm">"Continue"</a>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
