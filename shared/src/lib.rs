use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 后端要求的 CSRF 请求头（Double Submit Cookie 模式）
pub const HEADER_CSRF_TOKEN: &str = "X-CSRF-Token";
/// Bearer Token 请求头
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// 进度百分比上限
pub const MAX_PERCENTAGE: u8 = 100;

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 目标状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

impl GoalStatus {
    pub const ALL: [GoalStatus; 3] =
        [GoalStatus::Active, GoalStatus::Paused, GoalStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Paused => "paused",
            GoalStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(GoalStatus::Active),
            "paused" => Some(GoalStatus::Paused),
            "completed" => Some(GoalStatus::Completed),
            _ => None,
        }
    }
}

/// 目标优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl GoalPriority {
    pub const ALL: [GoalPriority; 3] =
        [GoalPriority::Low, GoalPriority::Medium, GoalPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalPriority::Low => "low",
            GoalPriority::Medium => "medium",
            GoalPriority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(GoalPriority::Low),
            "medium" => Some(GoalPriority::Medium),
            "high" => Some(GoalPriority::High),
            _ => None,
        }
    }
}

/// 经验等级（资料表单的下拉选项）
///
/// 线上传输仍用字符串，因为后端允许空字符串表示未填写。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceLevel {
    Entry,
    Junior,
    Mid,
    Senior,
    Lead,
    Expert,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 6] = [
        ExperienceLevel::Entry,
        ExperienceLevel::Junior,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Lead,
        ExperienceLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
            ExperienceLevel::Expert => "expert",
        }
    }
}

/// 单条进度记录
///
/// 不变式：`percentage` ∈ [0, 100]。后端有数据库约束，客户端在提交前校验。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: u64,
    pub goal_id: u64,
    pub description: String,
    #[serde(default)]
    pub percentage: u8,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub action_taken: String,
    #[serde(default)]
    pub next_steps: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub job_role_id: Option<u64>,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub priority: GoalPriority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// JSON 编码的字符串数组，与后端存储格式一致
    #[serde(default)]
    pub tags: String,
    /// 列表接口可能不预载进度，此时该字段缺省为空
    #[serde(default)]
    pub progress: Vec<ProgressEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// 最近一条进度的百分比（没有进度时为 0）
    pub fn latest_percentage(&self) -> u8 {
        self.progress
            .iter()
            .max_by_key(|p| p.created_at)
            .map(|p| p.percentage)
            .unwrap_or(0)
    }
}

/// 用户资料
///
/// 字符串字段允许为空：空值表示用户还未完成引导填写。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub current_role: String,
    #[serde(default)]
    pub experience_level: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub company_size: String,
    #[serde(default)]
    pub career_goals: String,
}

impl UserProfile {
    /// 是否还需要完成引导（仅角色与经验等级为必填）
    pub fn needs_onboarding(&self) -> bool {
        self.current_role.is_empty() || self.experience_level.is_empty()
    }
}

/// 职位角色（目录资源，只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRole {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// 职责（隶属于某个职位角色）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Responsibility {
    pub id: u64,
    pub job_role_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

/// 预置的目标建议（按职责归类）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSuggestion {
    pub id: u64,
    pub responsibility_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: GoalPriority,
    #[serde(default)]
    pub estimated_duration: String,
}

/// 某目标可参考的进度建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSuggestion {
    pub id: u64,
    pub goal_suggestion_id: u64,
    pub progress_stage: String,
    pub suggested_outcome: String,
    #[serde(default)]
    pub action_prompt: String,
    #[serde(default)]
    pub next_step_prompt: String,
    #[serde(default)]
    pub percentage_range: String,
}

/// AI 生成的个性化目标建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiGoalSuggestion {
    pub title: String,
    #[serde(default)]
    pub personalized_description: String,
    #[serde(default)]
    pub learning_path: Vec<String>,
    #[serde(default)]
    pub real_world_scenarios: Vec<String>,
    #[serde(default)]
    pub market_relevance_score: f64,
    #[serde(default)]
    pub difficulty_score: f64,
    #[serde(default)]
    pub priority_score: f64,
    #[serde(default)]
    pub estimated_days: i64,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub success_metrics: Vec<String>,
    #[serde(default)]
    pub certification_path: String,
    #[serde(default)]
    pub career_impact: String,
}

/// SMART 精炼后的目标文案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedGoal {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rationale: String,
}

/// AI 生成的阶段里程碑
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    #[serde(default)]
    pub percentage: u8,
    #[serde(default)]
    pub eta_days: i64,
}

// =========================================================
// 管理端模型 (Admin)
// =========================================================

/// 健康检查结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminHealth {
    pub db_ms: f64,
    pub time: DateTime<Utc>,
}

/// 用户列表项（来自身份提供方的只读视图）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

/// AI 服务状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AiStatus {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub model: String,
}

// =========================================================
// 响应信封 (Response Envelope)
// =========================================================

/// 后端统一把负载包装为 `{ "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

// =========================================================
// 校验辅助
// =========================================================

/// 进度百分比是否在合法区间内
pub fn percentage_in_range(p: u8) -> bool {
    p <= MAX_PERCENTAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_priority_wire_form_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&GoalStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::from_str::<GoalPriority>("\"high\"").unwrap(),
            GoalPriority::High
        );
    }

    #[test]
    fn goal_deserializes_without_optional_fields() {
        let json = r#"{
            "id": 7,
            "title": "Learn Rust",
            "status": "active",
            "priority": "medium",
            "created_at": "2025-01-02T03:04:05Z",
            "updated_at": "2025-01-02T03:04:05Z"
        }"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.id, 7);
        assert!(goal.progress.is_empty());
        assert!(goal.due_date.is_none());
        assert_eq!(goal.latest_percentage(), 0);
    }

    #[test]
    fn latest_percentage_uses_newest_entry() {
        let json = r#"{
            "id": 1,
            "title": "t",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-03T00:00:00Z",
            "progress": [
                {"id": 1, "goal_id": 1, "description": "a", "percentage": 80,
                 "created_at": "2025-01-01T00:00:00Z", "updated_at": "2025-01-01T00:00:00Z"},
                {"id": 2, "goal_id": 1, "description": "b", "percentage": 40,
                 "created_at": "2025-01-02T00:00:00Z", "updated_at": "2025-01-02T00:00:00Z"}
            ]
        }"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        // 取创建时间最新的一条，而不是最大百分比
        assert_eq!(goal.latest_percentage(), 40);
    }

    #[test]
    fn envelope_unwraps_payload() {
        let json = r#"{"data": {"id": 1, "title": "Backend", "description": ""}}"#;
        let env: ApiEnvelope<JobRole> = serde_json::from_str(json).unwrap();
        assert_eq!(env.data.title, "Backend");
    }

    #[test]
    fn profile_onboarding_check() {
        let mut p = UserProfile::default();
        assert!(p.needs_onboarding());
        p.current_role = "Engineer".to_string();
        assert!(p.needs_onboarding());
        p.experience_level = "mid".to_string();
        assert!(!p.needs_onboarding());
    }

    #[test]
    fn percentage_bounds() {
        assert!(percentage_in_range(0));
        assert!(percentage_in_range(100));
        assert!(!percentage_in_range(101));
    }
}
