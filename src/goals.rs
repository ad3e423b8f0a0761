//! 目标数据存储
//!
//! 每个存储实例持有自己的目标列表缓存。列表拉取经由在途
//! 闸门串行化（同一实例同时至多一个列表请求）；变更操作
//! 各自发起单次请求，成功后补丁本地列表并广播变更事件；
//! 变更事件经去抖窗口合并为一次重新拉取。变更操作之间不
//! 做串行化，以最后到达的响应为准，由随后的重新拉取兜底
//! 对齐（后端是唯一权威数据源）。

use crate::api::{ApiClient, ApiError, use_api};
use crate::auth::{AuthContext, use_auth};
use crate::events::{EventBus, use_events};
use crate::web::Debouncer;
use goaltracker_shared::protocol::{
    CreateGoalRequest, CreateProgressRequest, DeleteGoalRequest, GoalPayload, ListGoalsRequest,
    UpdateGoalRequest,
};
use goaltracker_shared::{Goal, ProgressEntry, percentage_in_range};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cell::Cell;

/// 变更事件的合并窗口（毫秒）
const GOALS_REFETCH_DEBOUNCE_MS: u32 = 300;

/// 在途请求闸门
///
/// 保证同一实例同一时刻至多一个列表请求在途：重叠的
/// `try_begin` 返回 false，调用方应直接放弃本次拉取。
#[derive(Debug, Default)]
pub struct FetchGate(Cell<bool>);

impl FetchGate {
    /// 尝试占用闸门；已被占用时返回 false
    pub fn try_begin(&self) -> bool {
        if self.0.get() {
            return false;
        }
        self.0.set(true);
        true
    }

    /// 释放闸门
    pub fn finish(&self) {
        self.0.set(false);
    }
}

// =========================================================
// 列表补丁辅助（纯函数）
// =========================================================

/// 追加新建的目标
pub fn patch_created(list: &mut Vec<Goal>, goal: Goal) {
    list.push(goal);
}

/// 按 id 替换更新后的目标；id 不在列表中时不做任何事
pub fn patch_updated(list: &mut [Goal], goal: Goal) {
    if let Some(slot) = list.iter_mut().find(|g| g.id == goal.id) {
        *slot = goal;
    }
}

/// 按 id 移除目标
pub fn patch_removed(list: &mut Vec<Goal>, id: u64) {
    list.retain(|g| g.id != id);
}

/// 把新进度记录并入所属目标；目标不在列表中时不做任何事
pub fn patch_progress(list: &mut [Goal], entry: ProgressEntry) {
    if let Some(goal) = list.iter_mut().find(|g| g.id == entry.goal_id) {
        goal.progress.push(entry);
    }
}

// =========================================================
// 存储 (Store)
// =========================================================

/// 目标数据存储：一组可 Copy 的信号
#[derive(Clone, Copy)]
pub struct GoalsStore {
    api: ApiClient,
    auth: AuthContext,
    bus: EventBus,
    pub goals: RwSignal<Vec<Goal>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    /// 首次列表拉取是否已成功完成（区分"尚未加载"与"确实没有目标"）
    pub initialized: RwSignal<bool>,
    gate: StoredValue<FetchGate, LocalStorage>,
    debouncer: StoredValue<Debouncer, LocalStorage>,
}

impl GoalsStore {
    fn new(api: ApiClient, auth: AuthContext, bus: EventBus) -> Self {
        Self {
            api,
            auth,
            bus,
            goals: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            initialized: RwSignal::new(false),
            gate: StoredValue::new_local(FetchGate::default()),
            debouncer: StoredValue::new_local(Debouncer::new(GOALS_REFETCH_DEBOUNCE_MS)),
        }
    }

    /// 拉取目标列表
    ///
    /// 已有请求在途时本次调用为空操作。没有访问令牌时跳过
    /// 网络调用，列表保持为空。失败只置错误标记，保留上一份
    /// 列表（首轮加载时仍为空）。
    pub fn fetch(&self) {
        if !self.gate.with_value(|g| g.try_begin()) {
            return;
        }
        if self.auth.current_token().is_none() {
            self.gate.with_value(|g| g.finish());
            return;
        }

        let store = *self;
        store.loading.set(true);
        spawn_local(async move {
            match store.api.send(&ListGoalsRequest).await {
                Ok(resp) => {
                    store.goals.set(resp.data);
                    store.error.set(None);
                    store.initialized.set(true);
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("[Goals] 拉取目标失败: {}", e).into());
                    store.error.set(Some("Failed to fetch goals".to_string()));
                }
            }
            store.loading.set(false);
            store.gate.with_value(|g| g.finish());
        });
    }

    /// 创建目标；成功后补丁本地列表并广播变更，失败上抛给
    /// 调用方（表单据此决定是否保持打开）
    pub async fn create(&self, payload: GoalPayload) -> Result<Goal, ApiError> {
        match self.api.send(&CreateGoalRequest { goal: payload }).await {
            Ok(resp) => {
                let goal = resp.data;
                self.goals.update(|list| patch_created(list, goal.clone()));
                self.error.set(None);
                self.bus.emit_goals_changed();
                Ok(goal)
            }
            Err(e) => {
                self.error.set(Some("Failed to create goal".to_string()));
                Err(e)
            }
        }
    }

    /// 按 id 更新目标
    pub async fn update(&self, id: u64, payload: GoalPayload) -> Result<Goal, ApiError> {
        match self.api.send(&UpdateGoalRequest { id, goal: payload }).await {
            Ok(resp) => {
                let goal = resp.data;
                self.goals.update(|list| patch_updated(list, goal.clone()));
                self.error.set(None);
                self.bus.emit_goals_changed();
                Ok(goal)
            }
            Err(e) => {
                self.error.set(Some("Failed to update goal".to_string()));
                Err(e)
            }
        }
    }

    /// 按 id 删除目标
    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        match self.api.send(&DeleteGoalRequest { id }).await {
            Ok(_) => {
                self.goals.update(|list| patch_removed(list, id));
                self.error.set(None);
                self.bus.emit_goals_changed();
                Ok(())
            }
            Err(e) => {
                self.error.set(Some("Failed to delete goal".to_string()));
                Err(e)
            }
        }
    }

    /// 为目标追加一条进度记录
    ///
    /// 百分比在提交前校验进 [0, 100]，越界直接返回错误、不发请求。
    pub async fn add_progress(&self, req: CreateProgressRequest) -> Result<ProgressEntry, ApiError> {
        if !percentage_in_range(req.percentage) {
            self.error
                .set(Some("Progress percentage must be between 0 and 100".to_string()));
            return Err(ApiError::RequestBuildFailed(
                "percentage out of range".to_string(),
            ));
        }
        match self.api.send(&req).await {
            Ok(resp) => {
                let entry = resp.data;
                self.goals.update(|list| patch_progress(list, entry.clone()));
                self.error.set(None);
                self.bus.emit_goals_changed();
                Ok(entry)
            }
            Err(e) => {
                self.error.set(Some("Failed to record progress".to_string()));
                Err(e)
            }
        }
    }
}

/// 创建目标存储并接好自动拉取的触发线
///
/// 触发时机：(a) 创建时已持有令牌；(b) 会话转入已认证；
/// (c) 来自任意实例的目标变更事件，经去抖窗口合并。
pub fn use_goals() -> GoalsStore {
    let store = GoalsStore::new(use_api(), use_auth(), use_events());

    // 挂载时 + 会话转入已认证时拉取
    let authed = store.auth.is_authenticated_signal();
    Effect::new(move |_| {
        if authed.get() {
            store.fetch();
        }
    });

    // 目标变更事件：去抖后重新拉取。首轮运行只记录当前计数。
    let changed = store.bus.goals_changed();
    Effect::new(move |prev: Option<u64>| {
        let n = changed.get();
        if let Some(prev) = prev {
            if n != prev {
                store
                    .debouncer
                    .with_value(|d| d.schedule(move || store.fetch()));
            }
        }
        n
    });

    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use goaltracker_shared::date::parse_date_input;
    use goaltracker_shared::{GoalPriority, GoalStatus};

    fn make_goal(id: u64, title: &str) -> Goal {
        let ts = parse_date_input("2025-01-01").unwrap();
        Goal {
            id,
            title: title.to_string(),
            description: String::new(),
            job_role_id: None,
            status: GoalStatus::Active,
            priority: GoalPriority::Medium,
            due_date: None,
            tags: String::new(),
            progress: Vec::new(),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn make_entry(goal_id: u64, percentage: u8) -> ProgressEntry {
        let ts = parse_date_input("2025-01-02").unwrap();
        ProgressEntry {
            id: 1,
            goal_id,
            description: "step".to_string(),
            percentage,
            notes: String::new(),
            outcome: String::new(),
            action_taken: String::new(),
            next_steps: String::new(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn gate_rejects_overlapping_begin() {
        let gate = FetchGate::default();
        assert!(gate.try_begin());
        // 第一次占用未释放前，后续占用全部失败
        assert!(!gate.try_begin());
        assert!(!gate.try_begin());
        gate.finish();
        assert!(gate.try_begin());
    }

    #[test]
    fn created_goal_is_appended() {
        let mut list = vec![make_goal(1, "a")];
        patch_created(&mut list, make_goal(2, "b"));
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].id, 2);
    }

    #[test]
    fn updated_goal_replaces_by_id() {
        let mut list = vec![make_goal(1, "a"), make_goal(2, "b")];
        patch_updated(&mut list, make_goal(2, "renamed"));
        assert_eq!(list[1].title, "renamed");
        assert_eq!(list[0].title, "a");

        // 不在列表中的 id 不改变任何条目
        patch_updated(&mut list, make_goal(9, "ghost"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn removed_goal_leaves_the_rest() {
        let mut list = vec![make_goal(1, "a"), make_goal(2, "b")];
        patch_removed(&mut list, 1);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 2);

        patch_removed(&mut list, 42);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn progress_lands_on_its_goal() {
        let mut list = vec![make_goal(1, "a"), make_goal(2, "b")];
        patch_progress(&mut list, make_entry(2, 60));
        assert!(list[0].progress.is_empty());
        assert_eq!(list[1].progress.len(), 1);
        assert_eq!(list[1].latest_percentage(), 60);
    }
}
