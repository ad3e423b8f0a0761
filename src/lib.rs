//! GoalTracker 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话存储与身份客户端
//! - `api`: 后端 REST 客户端
//! - `events`: 类型化事件总线
//! - `goals`: 目标数据存储
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod admin;
    pub mod callback;
    pub mod dashboard;
    pub mod goal_form;
    mod icons;
    pub mod layout;
    pub mod login;
    pub mod profile;
    mod progress_dialog;
    pub mod suggestions;
    pub mod timeline;
}
mod config;
mod events;
mod goals;
mod prefs;

use crate::auth::{AuthContext, init_auth};
use crate::components::admin::AdminPage;
use crate::components::callback::CallbackPage;
use crate::components::dashboard::DashboardPage;
use crate::components::goal_form::NewGoalPage;
use crate::components::layout::LayoutShell;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::suggestions::SuggestionsPage;
use crate::components::timeline::TimelinePage;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use storage::LocalStorage;
    pub use timer::{Debouncer, Timeout};
}

use web::route::AppRoute;
use web::router::provide_router;

/// 认证后视图的路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Timeline => view! { <TimelinePage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::NewGoal => view! { <NewGoalPage /> }.into_any(),
        AppRoute::Suggestions => view! { <SuggestionsPage /> }.into_any(),
        AppRoute::Admin => view! { <AdminPage /> }.into_any(),
        // Home 与兜底都落在仪表盘；回调路由在外层已被拦截
        AppRoute::Home | AppRoute::AuthCallback => view! { <DashboardPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 共享上下文：认证、事件总线、API 客户端、路由
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    events::provide_event_bus();
    api::provide_api(auth_ctx);
    let router = provide_router();

    // 2. 恢复持久化会话
    init_auth(&auth_ctx);

    let is_authenticated = auth_ctx.is_authenticated_signal();
    let auth_loading = auth_ctx.loading_signal();

    // 3. 每次渲染的视图裁决，优先级从高到低：
    //    回调路由（无视会话状态）> 会话恢复占位 > 登录页 > 按路由分发。
    //    闭包同时追踪路由信号与认证信号，认证状态翻转会整棵重建
    //    认证子树，子视图的内部状态随之干净地重置。
    view! {
        {move || {
            let route = router.current_route().get();
            if route == AppRoute::AuthCallback {
                return view! { <CallbackPage /> }.into_any();
            }
            if auth_loading.get() {
                // 会话恢复期间渲染中性占位，避免登录页一闪而过
                return view! { <div class="min-h-screen bg-base-200"></div> }.into_any();
            }
            if !is_authenticated.get() {
                return view! { <LoginPage /> }.into_any();
            }
            view! { <LayoutShell>{route_matcher(route)}</LayoutShell> }.into_any()
        }}
    }
}
