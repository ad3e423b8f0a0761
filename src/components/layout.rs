//! 认证后视图的外层布局：导航、主题切换、登出

use crate::auth::use_auth;
use crate::components::icons::{LogOut, Target};
use crate::prefs;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

const NAV_ITEMS: [(AppRoute, &str); 5] = [
    (AppRoute::Home, "Dashboard"),
    (AppRoute::Timeline, "Timeline"),
    (AppRoute::Suggestions, "Suggestions"),
    (AppRoute::Profile, "Profile"),
    (AppRoute::Admin, "Admin"),
];

#[component]
pub fn LayoutShell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (theme, set_theme) = signal(prefs::load_theme());
    Effect::new(move |_| prefs::apply_theme(theme.get()));

    let on_logout = move |_| {
        auth.sign_out();
        router.navigate(AppRoute::Home);
    };

    let email = move || {
        auth.session()
            .get()
            .map(|s| s.email)
            .unwrap_or_default()
    };

    let nav = move || {
        let current = router.current_route().get();
        NAV_ITEMS
            .iter()
            .map(|&(route, label)| {
                let class = if route == current {
                    "btn btn-ghost btn-sm btn-active"
                } else {
                    "btn btn-ghost btn-sm"
                };
                view! {
                    <button class=class on:click=move |_| router.navigate(route)>
                        {label}
                    </button>
                }
            })
            .collect_view()
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 shadow-md px-4">
                <div class="flex-1 gap-2">
                    <Target attr:class="text-primary h-6 w-6" />
                    <span class="text-xl font-bold">"GoalTracker"</span>
                    <nav class="ml-4 hidden md:flex gap-1">{nav}</nav>
                </div>
                <div class="flex-none gap-2 items-center">
                    <span class="badge badge-neutral hidden md:inline-flex">{email}</span>
                    <label class="swap btn btn-ghost btn-sm btn-circle">
                        <input
                            type="checkbox"
                            prop:checked=move || theme.get() == prefs::Theme::Dark
                            on:change=move |_| set_theme.update(|t| *t = t.toggled())
                        />
                        <span class="swap-on">"🌙"</span>
                        <span class="swap-off">"☀️"</span>
                    </label>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "Sign out"
                    </button>
                </div>
            </div>

            // 小屏底部导航
            <nav class="md:hidden flex justify-center gap-1 p-2 bg-base-100 shadow">{nav}</nav>

            <main class="p-4 md:p-8">
                <div class="max-w-7xl mx-auto">{children()}</div>
            </main>
        </div>
    }
}
