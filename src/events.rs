//! 类型化事件总线
//!
//! 跨组件广播用单调递增的计数信号承载：发布方只递增计数，
//! 订阅方在 Effect 中观察计数变化。订阅随组件作用域一起
//! 释放，不存在游离回调。

use leptos::prelude::*;

/// 事件总线
#[derive(Clone, Copy)]
pub struct EventBus {
    goals_changed: RwSignal<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            goals_changed: RwSignal::new(0),
        }
    }

    /// 广播"目标数据已变更"
    pub fn emit_goals_changed(&self) {
        self.goals_changed.update(|n| *n += 1);
    }

    /// 目标变更计数信号（订阅用）
    pub fn goals_changed(&self) -> ReadSignal<u64> {
        self.goals_changed.read_only()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// 创建事件总线并提供到 Context
pub fn provide_event_bus() -> EventBus {
    let bus = EventBus::new();
    provide_context(bus);
    bus
}

/// 从 Context 获取事件总线
pub fn use_events() -> EventBus {
    use_context::<EventBus>().expect("EventBus should be provided")
}
