//! 认证模块
//!
//! 会话的唯一持有者：其余组件只能通过信号订阅或只读访问器
//! 观察会话。路由与数据层通过注入的认证信号保持解耦。
//!
//! 身份服务是一个 GoTrue 风格的 REST 提供方（魔法链接、
//! 密码登录、令牌刷新、注销）。提供方在回调时会以双片段
//! URL（`#/auth/callback#access_token=...`）送回令牌对。

use crate::config::CONFIG;
use crate::web::LocalStorage;
use crate::web::route::AppRoute;
use gloo_net::http::Request;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::{Deserialize, Serialize};

const STORAGE_SESSION_KEY: &str = "goaltracker_session";

/// 提供方未给出过期时间时采用的访问令牌有效期
const DEFAULT_TOKEN_TTL_MS: f64 = 3_600.0 * 1_000.0;

// =========================================================
// 令牌提取 (Token Extraction)
// =========================================================

/// 从 URL 片段中提取的令牌对
///
/// 仅在回调握手期间存在，消费一次后即丢弃。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// 解析身份提供方回调产生的双片段 URL
    ///
    /// 提供方以 `#/route#access_token=...&refresh_token=...` 形式
    /// 重定向，只有最后一个 `#` 之后的子串才是合法的查询串。
    /// 任意畸形输入都解析为字段缺失，绝不 panic。
    pub fn from_fragment(fragment: &str) -> Self {
        let Some(idx) = fragment.rfind('#') else {
            return Self::default();
        };

        let mut pair = Self::default();
        for piece in fragment[idx + 1..].split('&') {
            let mut kv = piece.splitn(2, '=');
            let (Some(key), Some(value)) = (kv.next(), kv.next()) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match key {
                "access_token" => pair.access_token = Some(value.to_string()),
                "refresh_token" => pair.refresh_token = Some(value.to_string()),
                _ => {}
            }
        }
        pair
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

// =========================================================
// 会话 (Session)
// =========================================================

/// 身份会话
///
/// 由成功的令牌兑换或登录创建；令牌刷新时整体替换；注销时
/// 销毁。持久化在 LocalStorage，启动时恢复。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// 过期时刻（Unix 毫秒）
    pub expires_at_ms: f64,
    pub user_id: String,
    #[serde(default)]
    pub email: String,
}

impl Session {
    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.expires_at_ms <= now_ms
    }
}

// =========================================================
// 错误类型
// =========================================================

/// 认证错误类型
#[derive(Debug)]
pub enum AuthError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败
    NetworkError(String),
    /// 提供方拒绝：状态码与响应体
    ProviderRejected(u16, String),
    /// 响应解析失败
    ResponseParseFailed(String),
    /// 没有可用于兑换的令牌
    MissingTokens,
}

impl core::fmt::Display for AuthError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AuthError::RequestBuildFailed(msg) => write!(f, "请求构建失败: {}", msg),
            AuthError::NetworkError(msg) => write!(f, "网络错误: {}", msg),
            AuthError::ProviderRejected(status, body) => {
                write!(f, "提供方拒绝 ({}): {}", status, body)
            }
            AuthError::ResponseParseFailed(msg) => write!(f, "响应解析失败: {}", msg),
            AuthError::MissingTokens => write!(f, "缺少可兑换的令牌"),
        }
    }
}

// =========================================================
// 身份服务客户端 (GoTrue REST)
// =========================================================

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    create_user: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<f64>,
    #[serde(default)]
    user: Option<AuthUser>,
}

/// 身份服务的 REST 客户端
#[derive(Clone, Debug, PartialEq)]
pub struct AuthClient {
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn session_from_token_response(
        &self,
        resp: gloo_net::http::Response,
    ) -> Result<Session, AuthError> {
        if !resp.ok() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::ProviderRejected(status, body));
        }
        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::ResponseParseFailed(e.to_string()))?;

        let ttl_ms = token
            .expires_in
            .map(|secs| secs * 1_000.0)
            .unwrap_or(DEFAULT_TOKEN_TTL_MS);
        let (user_id, email) = token
            .user
            .map(|u| (u.id, u.email))
            .unwrap_or_default();

        Ok(Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at_ms: js_sys::Date::now() + ttl_ms,
            user_id,
            email,
        })
    }

    /// 邮箱 + 密码登录
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let resp = Request::post(&self.url("/token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password })
            .map_err(|e| AuthError::RequestBuildFailed(e.to_string()))?
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;
        self.session_from_token_response(resp).await
    }

    /// 用刷新令牌换取新会话
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let resp = Request::post(&self.url("/token?grant_type=refresh_token"))
            .header("apikey", &self.anon_key)
            .json(&RefreshGrant { refresh_token })
            .map_err(|e| AuthError::RequestBuildFailed(e.to_string()))?
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;
        self.session_from_token_response(resp).await
    }

    /// 发送魔法链接邮件，访问链接后提供方重定向到 `redirect_to`
    pub async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        let encoded: String = js_sys::encode_uri_component(redirect_to).into();
        let resp = Request::post(&format!("{}/otp?redirect_to={}", self.base_url, encoded))
            .header("apikey", &self.anon_key)
            .json(&OtpRequest {
                email,
                create_user: true,
            })
            .map_err(|e| AuthError::RequestBuildFailed(e.to_string()))?
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;
        if !resp.ok() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::ProviderRejected(status, body));
        }
        Ok(())
    }

    /// 校验访问令牌并取回用户信息
    pub async fn fetch_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let resp = Request::get(&self.url("/user"))
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;
        if !resp.ok() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::ProviderRejected(status, body));
        }
        resp.json()
            .await
            .map_err(|e| AuthError::ResponseParseFailed(e.to_string()))
    }

    /// 用令牌对兑换会话
    ///
    /// 访问令牌在场时经 `/user` 校验后直接成为会话；访问令牌
    /// 缺失但刷新令牌在场时回落到仅刷新令牌的兑换。
    pub async fn exchange_tokens(
        &self,
        access: Option<&str>,
        refresh: Option<&str>,
    ) -> Result<Session, AuthError> {
        match (access, refresh) {
            (Some(access), _) => {
                let user = self.fetch_user(access).await?;
                Ok(Session {
                    access_token: access.to_string(),
                    refresh_token: refresh.map(str::to_string),
                    expires_at_ms: js_sys::Date::now() + DEFAULT_TOKEN_TTL_MS,
                    user_id: user.id,
                    email: user.email,
                })
            }
            (None, Some(refresh)) => self.refresh_session(refresh).await,
            (None, None) => Err(AuthError::MissingTokens),
        }
    }

    /// 通知提供方注销；失败只记录，不影响本地注销
    pub async fn sign_out_remote(&self, access_token: &str) {
        let result = Request::post(&self.url("/logout"))
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", access_token))
            .send()
            .await;
        if let Err(e) = result {
            web_sys::console::warn_1(&format!("[Auth] 注销通知失败: {}", e).into());
        }
    }
}

// =========================================================
// 认证上下文 (Auth Context)
// =========================================================

/// 认证上下文
///
/// 会话信号通过 Context 在组件间共享。订阅会话变化 = 在
/// Effect 中读取会话信号；响应式系统保证每个订阅者的通知
/// 串行触发、不会重入，且随组件作用域一起释放。
#[derive(Clone, Copy)]
pub struct AuthContext {
    session: RwSignal<Option<Session>>,
    /// 启动时的会话恢复是否仍在进行
    loading: RwSignal<bool>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(None),
            loading: RwSignal::new(true),
        }
    }

    pub fn client(&self) -> AuthClient {
        AuthClient::new(CONFIG.auth_base, CONFIG.anon_key)
    }

    /// 会话信号（只读）
    pub fn session(&self) -> ReadSignal<Option<Session>> {
        self.session.read_only()
    }

    /// 获取认证状态信号（用于路由与数据层注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.is_some()))
    }

    /// 会话恢复进行中信号
    pub fn loading_signal(&self) -> ReadSignal<bool> {
        self.loading.read_only()
    }

    /// 当前访问令牌（非响应式读取）
    ///
    /// 会话在启动时即已加载进信号，调用方不会与存储读取竞争。
    pub fn current_token(&self) -> Option<String> {
        self.session
            .with_untracked(|s| s.as_ref().map(|s| s.access_token.clone()))
    }

    /// 建立新会话：写入信号并持久化
    pub fn set_session(&self, session: Session) {
        LocalStorage::set_json(STORAGE_SESSION_KEY, &session);
        self.session.set(Some(session));
    }

    /// 注销：清除信号与持久化副本，恰好触发一次"无会话"通知，
    /// 并尽力通知提供方
    pub fn sign_out(&self) {
        let token = self.current_token();
        LocalStorage::delete(STORAGE_SESSION_KEY);
        self.session.set(None);

        if let Some(token) = token {
            let client = self.client();
            spawn_local(async move {
                client.sign_out_remote(&token).await;
            });
        }
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 从 LocalStorage 恢复持久化会话；已过期的会话先尝试一次
/// 刷新再放弃。网络/提供方错误降级为"无会话"并打印日志，
/// 绝不向渲染层传播。
pub fn init_auth(ctx: &AuthContext) {
    let ctx = *ctx;
    let Some(stored) = LocalStorage::get_json::<Session>(STORAGE_SESSION_KEY) else {
        ctx.loading.set(false);
        return;
    };

    spawn_local(async move {
        if !stored.is_expired(js_sys::Date::now()) {
            ctx.session.set(Some(stored));
        } else if let Some(refresh) = stored.refresh_token.clone() {
            match ctx.client().refresh_session(&refresh).await {
                Ok(session) => ctx.set_session(session),
                Err(e) => {
                    web_sys::console::warn_1(&format!("[Auth] 会话刷新失败: {}", e).into());
                    LocalStorage::delete(STORAGE_SESSION_KEY);
                }
            }
        } else {
            LocalStorage::delete(STORAGE_SESSION_KEY);
        }
        ctx.loading.set(false);
    });
}

/// 密码登录并建立会话
pub async fn login_with_password(
    ctx: &AuthContext,
    email: String,
    password: String,
) -> Result<(), AuthError> {
    let session = ctx.client().sign_in_with_password(&email, &password).await?;
    ctx.set_session(session);
    Ok(())
}

/// 发送魔法链接邮件，回调地址指向本应用的回调路由
pub async fn request_magic_link(ctx: &AuthContext, email: String) -> Result<(), AuthError> {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    let redirect = format!("{}/{}", origin, AppRoute::AuthCallback.to_hash());
    ctx.client().send_magic_link(&email, &redirect).await
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- 令牌提取 ----

    #[test]
    fn double_fragment_yields_both_tokens() {
        let pair =
            TokenPair::from_fragment("#/auth/callback#access_token=abc&refresh_token=xyz");
        assert_eq!(pair.access_token.as_deref(), Some("abc"));
        assert_eq!(pair.refresh_token.as_deref(), Some("xyz"));
    }

    #[test]
    fn single_fragment_has_no_tokens() {
        // 只有一个 `#`：其后是路由而非查询串
        let pair = TokenPair::from_fragment("#/auth/callback");
        assert!(pair.is_empty());

        let pair = TokenPair::from_fragment("#/");
        assert!(pair.is_empty());
    }

    #[test]
    fn no_delimiter_has_no_tokens() {
        assert!(TokenPair::from_fragment("").is_empty());
        assert!(TokenPair::from_fragment("access_token=abc").is_empty());
    }

    #[test]
    fn only_the_last_delimiter_counts() {
        let pair = TokenPair::from_fragment("#/a#b#access_token=tok");
        assert_eq!(pair.access_token.as_deref(), Some("tok"));
        assert!(pair.refresh_token.is_none());
    }

    #[test]
    fn malformed_params_never_panic() {
        assert!(TokenPair::from_fragment("#/route#").is_empty());
        assert!(TokenPair::from_fragment("#/route#&&&").is_empty());
        assert!(TokenPair::from_fragment("#/route#access_token").is_empty());
        assert!(TokenPair::from_fragment("#/route#access_token=").is_empty());
    }

    #[test]
    fn unrelated_params_are_ignored() {
        let pair = TokenPair::from_fragment(
            "#/auth/callback#expires_in=3600&refresh_token=r&token_type=bearer",
        );
        assert!(pair.access_token.is_none());
        assert_eq!(pair.refresh_token.as_deref(), Some("r"));
    }

    // ---- 会话 ----

    #[test]
    fn session_expiry_boundary() {
        let session = Session {
            access_token: "a".into(),
            refresh_token: None,
            expires_at_ms: 1_000.0,
            user_id: "u".into(),
            email: String::new(),
        };
        assert!(!session.is_expired(999.0));
        assert!(session.is_expired(1_000.0));
        assert!(session.is_expired(1_001.0));
    }
}
