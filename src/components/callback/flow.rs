//! 回调握手流程
//!
//! 纯异步状态机：提取令牌 -> 兑换会话 -> 收尾检查。
//! 不触碰 DOM，身份服务经 trait 注入，便于单元测试。

use crate::auth::{AuthError, Session, TokenPair};
use async_trait::async_trait;
use std::cell::Cell;

/// 流程所处的阶段，按发生顺序推进
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackPhase {
    /// 正在解析 URL 片段中的令牌
    Extracting,
    /// 正在用令牌兑换会话
    Exchanging,
    /// 正在检查既有会话 / 等待会话事件
    Finalizing,
}

/// 流程结束时的去向
#[derive(Debug, PartialEq)]
pub enum CallbackOutcome {
    /// 会话已建立，调用方应重定向回首页
    SignedIn(Session),
    /// 暂无会话：等待第一个非空会话事件后再重定向
    AwaitSession,
    /// 客户端侧故障，无法继续
    Failed(String),
}

/// 流程对身份服务的最小依赖
#[async_trait(?Send)]
pub trait SessionExchanger {
    /// 用令牌对兑换会话
    async fn exchange(
        &self,
        access: Option<&str>,
        refresh: Option<&str>,
    ) -> Result<Session, AuthError>;

    /// 提供方可能已通过隐式途径建立了会话
    async fn existing_session(&self) -> Option<Session>;
}

/// 执行回调握手
///
/// `on_phase` 在每个阶段开始时收到通知（驱动界面状态文案）。
///
/// 片段中没有令牌时直接进入收尾检查。兑换失败且片段同时带有
/// 访问与刷新令牌时，仅用刷新令牌重试一次（访问令牌缺失的
/// 情形由兑换方自身回落，不再重复）。兑换彻底失败后转入收尾
/// 检查：既有会话在场则直接成功，否则等待会话事件。
pub async fn run_callback_flow<P, F>(fragment: &str, provider: &P, on_phase: F) -> CallbackOutcome
where
    P: SessionExchanger,
    F: Fn(CallbackPhase),
{
    on_phase(CallbackPhase::Extracting);
    let tokens = TokenPair::from_fragment(fragment);

    if !tokens.is_empty() {
        on_phase(CallbackPhase::Exchanging);
        match provider
            .exchange(tokens.access_token.as_deref(), tokens.refresh_token.as_deref())
            .await
        {
            Ok(session) => return CallbackOutcome::SignedIn(session),
            Err(AuthError::RequestBuildFailed(msg)) => {
                return CallbackOutcome::Failed(msg);
            }
            Err(_) => {
                if tokens.access_token.is_some() {
                    if let Some(refresh) = tokens.refresh_token.as_deref() {
                        if let Ok(session) = provider.exchange(None, Some(refresh)).await {
                            return CallbackOutcome::SignedIn(session);
                        }
                    }
                }
            }
        }
    }

    on_phase(CallbackPhase::Finalizing);
    match provider.existing_session().await {
        Some(session) => CallbackOutcome::SignedIn(session),
        None => CallbackOutcome::AwaitSession,
    }
}

/// 幂等重定向闸门：首次触发返回 true，此后永远 false
///
/// 无论会话事件随后到来多少次，重定向只发生一次。
#[derive(Debug, Default)]
pub struct RedirectOnce(Cell<bool>);

impl RedirectOnce {
    pub fn fire(&self) -> bool {
        !self.0.replace(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    // =========================================================
    // Shared Mock Components
    // =========================================================

    struct TestContext {
        /// Operation log to verify calling order
        log: RefCell<Vec<String>>,
        /// Scripted results for successive exchange calls
        exchange_results: RefCell<VecDeque<Result<Session, AuthError>>>,
        /// Session the provider already holds, if any
        existing: RefCell<Option<Session>>,
    }

    impl TestContext {
        fn new() -> Self {
            Self {
                log: RefCell::new(Vec::new()),
                exchange_results: RefCell::new(VecDeque::new()),
                existing: RefCell::new(None),
            }
        }

        fn push_log(&self, msg: String) {
            self.log.borrow_mut().push(msg);
        }
    }

    struct TestExchanger {
        ctx: Rc<TestContext>,
    }

    #[async_trait(?Send)]
    impl SessionExchanger for TestExchanger {
        async fn exchange(
            &self,
            access: Option<&str>,
            refresh: Option<&str>,
        ) -> Result<Session, AuthError> {
            self.ctx.push_log(format!(
                "exchange:{}:{}",
                access.unwrap_or("-"),
                refresh.unwrap_or("-")
            ));
            self.ctx
                .exchange_results
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(AuthError::MissingTokens))
        }

        async fn existing_session(&self) -> Option<Session> {
            self.ctx.push_log("existing_session".to_string());
            self.ctx.existing.borrow().clone()
        }
    }

    fn setup_env() -> (Rc<TestContext>, TestExchanger, Rc<RefCell<Vec<CallbackPhase>>>) {
        let ctx = Rc::new(TestContext::new());
        let exchanger = TestExchanger { ctx: ctx.clone() };
        let phases = Rc::new(RefCell::new(Vec::new()));
        (ctx, exchanger, phases)
    }

    fn make_session(token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            refresh_token: None,
            expires_at_ms: f64::MAX,
            user_id: "user-1".to_string(),
            email: "user@example.com".to_string(),
        }
    }

    fn phase_recorder(phases: &Rc<RefCell<Vec<CallbackPhase>>>) -> impl Fn(CallbackPhase) {
        let phases = phases.clone();
        move |p| phases.borrow_mut().push(p)
    }

    // =========================================================
    // Tests
    // =========================================================

    #[tokio::test]
    async fn valid_access_token_signs_in_directly() {
        let (ctx, exchanger, phases) = setup_env();
        ctx.exchange_results
            .borrow_mut()
            .push_back(Ok(make_session("abc")));

        let outcome = run_callback_flow(
            "#/auth/callback#access_token=abc&refresh_token=xyz",
            &exchanger,
            phase_recorder(&phases),
        )
        .await;

        assert_eq!(outcome, CallbackOutcome::SignedIn(make_session("abc")));
        // Exactly one exchange, with both tokens, and no fallback probing
        assert_eq!(*ctx.log.borrow(), vec!["exchange:abc:xyz"]);
        assert_eq!(
            *phases.borrow(),
            vec![CallbackPhase::Extracting, CallbackPhase::Exchanging]
        );
    }

    #[tokio::test]
    async fn refresh_only_pair_exchanges_once() {
        let (ctx, exchanger, phases) = setup_env();
        ctx.exchange_results
            .borrow_mut()
            .push_back(Ok(make_session("fresh")));

        let outcome = run_callback_flow(
            "#/auth/callback#refresh_token=xyz",
            &exchanger,
            phase_recorder(&phases),
        )
        .await;

        assert_eq!(outcome, CallbackOutcome::SignedIn(make_session("fresh")));
        // Access token absent: the exchanger's own fallback handles it,
        // the flow must not issue a second call
        assert_eq!(*ctx.log.borrow(), vec!["exchange:-:xyz"]);
    }

    #[tokio::test]
    async fn rejected_access_token_retries_with_refresh_only() {
        let (ctx, exchanger, phases) = setup_env();
        {
            let mut results = ctx.exchange_results.borrow_mut();
            results.push_back(Err(AuthError::ProviderRejected(401, "bad token".into())));
            results.push_back(Ok(make_session("fresh")));
        }

        let outcome = run_callback_flow(
            "#/auth/callback#access_token=stale&refresh_token=xyz",
            &exchanger,
            phase_recorder(&phases),
        )
        .await;

        assert_eq!(outcome, CallbackOutcome::SignedIn(make_session("fresh")));
        assert_eq!(
            *ctx.log.borrow(),
            vec!["exchange:stale:xyz", "exchange:-:xyz"]
        );
    }

    #[tokio::test]
    async fn failed_exchange_falls_through_to_existing_session() {
        let (ctx, exchanger, phases) = setup_env();
        {
            let mut results = ctx.exchange_results.borrow_mut();
            results.push_back(Err(AuthError::ProviderRejected(401, "no".into())));
            results.push_back(Err(AuthError::ProviderRejected(401, "no".into())));
        }
        *ctx.existing.borrow_mut() = Some(make_session("implicit"));

        let outcome = run_callback_flow(
            "#/auth/callback#access_token=stale&refresh_token=xyz",
            &exchanger,
            phase_recorder(&phases),
        )
        .await;

        assert_eq!(outcome, CallbackOutcome::SignedIn(make_session("implicit")));
        assert_eq!(
            *phases.borrow(),
            vec![
                CallbackPhase::Extracting,
                CallbackPhase::Exchanging,
                CallbackPhase::Finalizing
            ]
        );
    }

    #[tokio::test]
    async fn no_tokens_and_no_session_awaits_session_event() {
        let (ctx, exchanger, phases) = setup_env();

        let outcome =
            run_callback_flow("#/auth/callback", &exchanger, phase_recorder(&phases)).await;

        assert_eq!(outcome, CallbackOutcome::AwaitSession);
        // No exchange attempted at all
        assert_eq!(*ctx.log.borrow(), vec!["existing_session"]);
        assert_eq!(
            *phases.borrow(),
            vec![CallbackPhase::Extracting, CallbackPhase::Finalizing]
        );
    }

    #[tokio::test]
    async fn no_tokens_with_implicit_session_signs_in() {
        let (ctx, exchanger, phases) = setup_env();
        *ctx.existing.borrow_mut() = Some(make_session("implicit"));

        let outcome =
            run_callback_flow("#/auth/callback", &exchanger, phase_recorder(&phases)).await;

        assert_eq!(outcome, CallbackOutcome::SignedIn(make_session("implicit")));
    }

    #[tokio::test]
    async fn client_side_fault_is_absorbing() {
        let (ctx, exchanger, phases) = setup_env();
        ctx.exchange_results
            .borrow_mut()
            .push_back(Err(AuthError::RequestBuildFailed("broken".into())));

        let outcome = run_callback_flow(
            "#/auth/callback#access_token=abc&refresh_token=xyz",
            &exchanger,
            phase_recorder(&phases),
        )
        .await;

        assert_eq!(outcome, CallbackOutcome::Failed("broken".to_string()));
        // No retry, no finalize probing after a client-side fault
        assert_eq!(*ctx.log.borrow(), vec!["exchange:abc:xyz"]);
    }

    #[test]
    fn redirect_fires_exactly_once() {
        let gate = RedirectOnce::default();
        assert!(gate.fire());
        assert!(!gate.fire());
        assert!(!gate.fire());
    }
}
