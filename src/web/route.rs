//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! URL 片段（`#` 之后）编码当前视图。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 仪表盘（默认路由）
    #[default]
    Home,
    /// 按截止日期排列的时间线
    Timeline,
    /// 用户资料
    Profile,
    /// 新建目标表单
    NewGoal,
    /// 目录与 AI 目标建议
    Suggestions,
    /// 管理端
    Admin,
    /// 身份提供方回调着陆页
    AuthCallback,
}

impl AppRoute {
    /// 将 location.hash 解析为路由
    ///
    /// 身份提供方会在回调路由之后追加第二段
    /// `#access_token=...`，因此回调路由按前缀匹配。
    /// 空值与未识别的值回落到 Home。
    pub fn from_hash(hash: &str) -> Self {
        if hash.starts_with("#/auth/callback") {
            return Self::AuthCallback;
        }
        match hash {
            "" | "#" | "#/" => Self::Home,
            "#/timeline" => Self::Timeline,
            "#/profile" => Self::Profile,
            "#/new-goal" => Self::NewGoal,
            "#/suggestions" => Self::Suggestions,
            "#/admin" => Self::Admin,
            _ => Self::Home,
        }
    }

    /// 获取路由对应的 hash 形式
    pub fn to_hash(&self) -> &'static str {
        match self {
            Self::Home => "#/",
            Self::Timeline => "#/timeline",
            Self::Profile => "#/profile",
            Self::NewGoal => "#/new-goal",
            Self::Suggestions => "#/suggestions",
            Self::Admin => "#/admin",
            Self::AuthCallback => "#/auth/callback",
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_hash_maps_to_its_route() {
        assert_eq!(AppRoute::from_hash("#/"), AppRoute::Home);
        assert_eq!(AppRoute::from_hash("#/timeline"), AppRoute::Timeline);
        assert_eq!(AppRoute::from_hash("#/profile"), AppRoute::Profile);
        assert_eq!(AppRoute::from_hash("#/new-goal"), AppRoute::NewGoal);
        assert_eq!(AppRoute::from_hash("#/suggestions"), AppRoute::Suggestions);
        assert_eq!(AppRoute::from_hash("#/admin"), AppRoute::Admin);
        assert_eq!(AppRoute::from_hash("#/auth/callback"), AppRoute::AuthCallback);
    }

    #[test]
    fn empty_and_unknown_hashes_fall_back_to_home() {
        assert_eq!(AppRoute::from_hash(""), AppRoute::Home);
        assert_eq!(AppRoute::from_hash("#"), AppRoute::Home);
        assert_eq!(AppRoute::from_hash("#/no-such-page"), AppRoute::Home);
        assert_eq!(AppRoute::from_hash("#/timeline/extra"), AppRoute::Home);
    }

    #[test]
    fn callback_route_matches_with_trailing_token_fragment() {
        assert_eq!(
            AppRoute::from_hash("#/auth/callback#access_token=abc&refresh_token=xyz"),
            AppRoute::AuthCallback
        );
    }

    #[test]
    fn hash_round_trip() {
        for route in [
            AppRoute::Home,
            AppRoute::Timeline,
            AppRoute::Profile,
            AppRoute::NewGoal,
            AppRoute::Suggestions,
            AppRoute::Admin,
            AppRoute::AuthCallback,
        ] {
            assert_eq!(AppRoute::from_hash(route.to_hash()), route);
        }
    }
}
