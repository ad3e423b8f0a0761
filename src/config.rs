//! 编译期应用配置
//!
//! 各项取值在构建时通过环境变量注入，缺省值与本地开发
//! 反向代理的路径约定一致。

/// 应用配置
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    /// 后端 REST API 基础路径
    pub api_base: &'static str,
    /// 身份服务基础路径
    pub auth_base: &'static str,
    /// 身份服务的匿名公钥
    pub anon_key: &'static str,
    /// 单次请求的客户端超时（毫秒）
    pub request_timeout_ms: u32,
}

const fn env_or(value: Option<&'static str>, default: &'static str) -> &'static str {
    match value {
        Some(v) => v,
        None => default,
    }
}

pub const CONFIG: AppConfig = AppConfig {
    api_base: env_or(option_env!("GOALTRACKER_API_URL"), "/api/v1"),
    auth_base: env_or(option_env!("GOALTRACKER_AUTH_URL"), "/auth/v1"),
    anon_key: env_or(option_env!("GOALTRACKER_ANON_KEY"), ""),
    request_timeout_ms: 15_000,
};
