//! 定时器封装模块
//!
//! 使用 `web_sys` 的原生定时器 API 替代 `gloo-timers`，
//! 并在一次性定时器之上提供去抖器。

use std::cell::RefCell;
use wasm_bindgen::prelude::*;

/// 一次性定时器
///
/// 封装 `setTimeout` API。当 `Timeout` 被 drop 时，未触发的
/// 回调自动取消。
pub struct Timeout {
    handle: i32,
    #[allow(dead_code)]
    closure: Closure<dyn Fn()>,
}

impl Timeout {
    /// 创建新的一次性定时器
    ///
    /// # 参数
    /// - `millis`: 延迟时间（毫秒）
    /// - `callback`: 到期触发的回调函数
    ///
    /// # Panics
    /// 如果无法获取 window 对象或设置定时器失败
    pub fn new<F>(millis: u32, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        let closure = Closure::new(callback);
        let window = web_sys::window().expect("无法获取 window 对象");

        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis as i32,
            )
            .expect("设置定时器失败");

        Self { handle, closure }
    }

    /// 取消定时器
    ///
    /// 通常不需要手动调用，因为 drop 时会自动清除。
    pub fn cancel(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 去抖器
///
/// 每个实例持有唯一的定时器句柄：窗口期内的再次安排会取消并
/// 替换上一个定时器，只有最后一次安排会在窗口结束后执行。
pub struct Debouncer {
    delay_ms: u32,
    pending: RefCell<Option<Timeout>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: RefCell::new(None),
        }
    }

    /// 安排一次延迟执行，替换尚未触发的上一次安排
    pub fn schedule<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        let timeout = Timeout::new(self.delay_ms, callback);
        *self.pending.borrow_mut() = Some(timeout);
    }

    /// 取消尚未触发的安排
    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }
}
