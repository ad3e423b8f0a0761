//! 本地偏好设置
//!
//! 主题、减少动效、条款确认等简单键值标记，存于 LocalStorage，
//! 不参与任何同步。

use crate::web::LocalStorage;

const STORAGE_THEME_KEY: &str = "goaltracker_theme";
const STORAGE_REDUCED_MOTION_KEY: &str = "goaltracker_reduced_motion";
const STORAGE_TERMS_KEY: &str = "goaltracker_terms_accepted";

/// 界面主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// 读取保存的主题，未保存或损坏时回到默认
pub fn load_theme() -> Theme {
    LocalStorage::get(STORAGE_THEME_KEY)
        .and_then(|s| Theme::parse(&s))
        .unwrap_or_default()
}

/// 保存主题并应用到文档根元素的 data-theme 属性
pub fn apply_theme(theme: Theme) {
    LocalStorage::set(STORAGE_THEME_KEY, theme.as_str());
    if let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    {
        let _ = root.set_attribute("data-theme", theme.as_str());
    }
}

pub fn reduced_motion() -> bool {
    LocalStorage::get(STORAGE_REDUCED_MOTION_KEY).as_deref() == Some("true")
}

pub fn set_reduced_motion(enabled: bool) {
    LocalStorage::set(
        STORAGE_REDUCED_MOTION_KEY,
        if enabled { "true" } else { "false" },
    );
}

pub fn terms_accepted() -> bool {
    LocalStorage::get(STORAGE_TERMS_KEY).as_deref() == Some("true")
}

pub fn set_terms_accepted(accepted: bool) {
    LocalStorage::set(STORAGE_TERMS_KEY, if accepted { "true" } else { "false" });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parse_round_trip() {
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("solarized"), None);
        assert_eq!(Theme::parse(Theme::Dark.as_str()), Some(Theme::Dark));
    }

    #[test]
    fn toggle_flips_both_ways() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
