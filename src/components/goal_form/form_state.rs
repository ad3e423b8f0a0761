//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState` 结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到请求载荷的转换

use goaltracker_shared::date::parse_date_input;
use goaltracker_shared::protocol::GoalPayload;
use goaltracker_shared::{GoalPriority, GoalStatus, RefinedGoal};
use leptos::prelude::*;

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，适合作为 Props
/// 在组件间传递。
#[derive(Clone, Copy)]
pub struct FormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    pub priority: RwSignal<GoalPriority>,
    pub status: RwSignal<GoalStatus>,
    /// 日期输入框的原始值（YYYY-MM-DD，空串表示未设置）
    pub due_date: RwSignal<String>,
    pub tags: RwSignal<String>,
    pub job_role_id: RwSignal<Option<u64>>,
}

impl FormState {
    /// 创建新的表单状态，所有字段使用默认值
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            priority: RwSignal::new(GoalPriority::Medium),
            status: RwSignal::new(GoalStatus::Active),
            due_date: RwSignal::new(String::new()),
            tags: RwSignal::new(String::new()),
            job_role_id: RwSignal::new(None),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.title.set(String::new());
        self.description.set(String::new());
        self.priority.set(GoalPriority::Medium);
        self.status.set(GoalStatus::Active);
        self.due_date.set(String::new());
        self.tags.set(String::new());
        self.job_role_id.set(None);
    }

    /// 将表单状态转换为请求载荷
    pub fn to_payload(&self) -> GoalPayload {
        GoalPayload {
            title: self.title.get().trim().to_string(),
            description: self.description.get(),
            job_role_id: self.job_role_id.get(),
            status: self.status.get(),
            priority: self.priority.get(),
            due_date: parse_date_input(&self.due_date.get()),
            tags: self.tags.get(),
        }
    }

    /// 采纳 AI 精炼结果，覆盖标题与描述
    pub fn apply_refinement(&self, refined: &RefinedGoal) {
        self.title.set(refined.title.clone());
        if !refined.description.is_empty() {
            self.description.set(refined.description.clone());
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
