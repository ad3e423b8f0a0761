//! 后端 REST 客户端
//!
//! 在 `ApiRequest` 协议之上统一发送请求：从配置的基础路径
//! 拼 URL，持有令牌时附加 Bearer 头，写操作附加 CSRF 头
//! （令牌取一次并缓存，被 403 CSRF 拒绝后重取并重试一次，
//! 重试的失败照常上抛）。每个请求带固定的客户端超时。

use crate::auth::AuthContext;
use crate::config::CONFIG;
use crate::web::Timeout;
use gloo_net::http::Request;
use goaltracker_shared::protocol::{ApiRequest, CsrfTokenRequest, HttpMethod};
use goaltracker_shared::{HEADER_AUTHORIZATION, HEADER_CSRF_TOKEN};
use leptos::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use web_sys::AbortController;

/// API 错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败
    NetworkError(String),
    /// 非 2xx 响应：状态码与响应体
    Status(u16, String),
    /// 响应解析失败
    ResponseParseFailed(String),
    /// 客户端超时中止
    Timeout,
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ApiError::RequestBuildFailed(msg) => write!(f, "请求构建失败: {}", msg),
            ApiError::NetworkError(msg) => write!(f, "网络错误: {}", msg),
            ApiError::Status(status, body) => write!(f, "请求失败 ({}): {}", status, body),
            ApiError::ResponseParseFailed(msg) => write!(f, "响应解析失败: {}", msg),
            ApiError::Timeout => write!(f, "请求超时"),
        }
    }
}

/// 后端 API 客户端
///
/// `Copy`：内部只持有认证上下文与信号，可在组件间任意传递。
#[derive(Clone, Copy)]
pub struct ApiClient {
    auth: AuthContext,
    /// 缓存的 CSRF 令牌
    csrf: RwSignal<Option<String>>,
}

impl ApiClient {
    pub fn new(auth: AuthContext) -> Self {
        Self {
            auth,
            csrf: RwSignal::new(None),
        }
    }

    /// 发送一个协议请求
    pub async fn send<R: ApiRequest>(&self, req: &R) -> Result<R::Response, ApiError> {
        let needs_csrf = R::METHOD.is_mutation();
        let mut refreshed = false;
        loop {
            let csrf = if needs_csrf {
                Some(self.csrf_token().await?)
            } else {
                None
            };
            match self.send_once(req, csrf.as_deref()).await {
                Err(ApiError::Status(403, body))
                    if needs_csrf && !refreshed && body.contains("CSRF") =>
                {
                    // CSRF 拒绝：作废缓存令牌，重取后重试一次
                    self.csrf.set(None);
                    refreshed = true;
                }
                other => return other,
            }
        }
    }

    /// 取 CSRF 令牌，带缓存（Double Submit Cookie：服务端会把
    /// 同值写进 Cookie，请求时两份一起提交）
    async fn csrf_token(&self) -> Result<String, ApiError> {
        if let Some(token) = self.csrf.get_untracked() {
            return Ok(token);
        }
        let resp = self.send_once(&CsrfTokenRequest, None).await?;
        self.csrf.set(Some(resp.csrf_token.clone()));
        Ok(resp.csrf_token)
    }

    async fn send_once<R: ApiRequest>(
        &self,
        req: &R,
        csrf: Option<&str>,
    ) -> Result<R::Response, ApiError> {
        let url = format!("{}{}", CONFIG.api_base, req.path());
        let mut builder = match R::METHOD {
            HttpMethod::Get => Request::get(&url),
            HttpMethod::Post => Request::post(&url),
            HttpMethod::Put => Request::put(&url),
            HttpMethod::Delete => Request::delete(&url),
        };

        if let Some(token) = self.auth.current_token() {
            builder = builder.header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        if let Some(csrf) = csrf {
            builder = builder.header(HEADER_CSRF_TOKEN, csrf);
        }

        // 固定客户端超时：计时器触发时中止 fetch
        let controller = AbortController::new().ok();
        let timed_out = Rc::new(Cell::new(false));
        let timeout_guard = controller.as_ref().map(|c| {
            let controller = c.clone();
            let flag = timed_out.clone();
            Timeout::new(CONFIG.request_timeout_ms, move || {
                flag.set(true);
                controller.abort();
            })
        });
        let abort_signal = controller.as_ref().map(|c| c.signal());
        builder = builder.abort_signal(abort_signal.as_ref());

        let result = if R::METHOD.is_mutation() {
            builder
                .json(req)
                .map_err(|e| ApiError::RequestBuildFailed(e.to_string()))?
                .send()
                .await
        } else {
            builder.send().await
        };

        // 响应头已到，后续的体读取不应再被计时器中止
        drop(timeout_guard);

        let resp = result.map_err(|e| {
            if timed_out.get() {
                ApiError::Timeout
            } else {
                ApiError::NetworkError(e.to_string())
            }
        })?;

        if !resp.ok() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status(status, body));
        }

        resp.json::<R::Response>()
            .await
            .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }
}

/// 创建 API 客户端并提供到 Context
pub fn provide_api(auth: AuthContext) -> ApiClient {
    let api = ApiClient::new(auth);
    provide_context(api);
    api
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> ApiClient {
    use_context::<ApiClient>().expect("ApiClient should be provided")
}
