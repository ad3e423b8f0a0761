//! 路由服务模块 - 核心引擎
//!
//! 封装了 location.hash 的读写与 hashchange 监听，实现高内聚：
//! 所有对浏览器导航状态的操作都集中在此模块。
//! 不做去抖，不做浏览器原生之外的历史管理。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 读取当前 location.hash（含 `#` 前缀；无 hash 时为空串）
pub fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// 写入 location.hash（内部工具函数）
fn set_location_hash(hash: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_hash(hash);
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 当前路由在每次导航事件时同步重算，页面之外没有持久化。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
}

impl RouterService {
    /// 创建新的路由服务，初始路由从 URL 解析
    fn new() -> Self {
        let initial_route = AppRoute::from_hash(&current_hash());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航到目标路由
    ///
    /// 同步更新路由信号并写入 location.hash。目标 hash 与当前
    /// 完全一致时为幂等空操作：重复调用不产生额外导航。
    pub fn navigate(&self, target: AppRoute) {
        if current_hash() == target.to_hash() {
            return;
        }
        set_location_hash(target.to_hash());
        self.set_route.set(target);
    }

    /// 初始化 hashchange 监听，在应用整个生命周期内存活
    fn init_hashchange_listener(&self) {
        let set_route = self.set_route;

        let closure = Closure::<dyn Fn()>::new(move || {
            set_route.set(AppRoute::from_hash(&current_hash()));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }
}

/// 提供路由服务到 Context 并初始化
pub fn provide_router() -> RouterService {
    let router = RouterService::new();
    router.init_hashchange_listener();

    web_sys::console::log_1(
        &format!("[Router] Initialized at {}", router.current_route.get_untracked()).into(),
    );

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure provide_router was called.")
}
