//! 请求协议定义
//!
//! 每个请求结构体通过 `ApiRequest` trait 声明自己的响应类型、
//! HTTP 方法与路径，前端客户端据此统一构造与发送请求。
//! 路径中带资源 id 的请求在 `path()` 里动态拼接，id 字段
//! 用 `#[serde(skip)]` 排除在请求体之外。

use crate::{
    AdminHealth, AdminUser, AiGoalSuggestion, AiStatus, ApiEnvelope, Goal, GoalPriority,
    GoalSuggestion, GoalStatus, Milestone, ProgressEntry, ProgressSuggestion, RefinedGoal,
    Responsibility, JobRole, UserProfile,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// 是否改变服务端状态（需要附带 CSRF 头）
    pub fn is_mutation(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// 定义某个 API 端点的请求-响应关系与元数据
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// 该请求对应的响应体类型
    type Response: DeserializeOwned;
    /// HTTP 方法
    const METHOD: HttpMethod;
    /// 相对于 API 基础路径的请求路径
    fn path(&self) -> String;
}

// =========================================================
// 目标 CRUD (Goals)
// =========================================================

/// 拉取当前用户的全部目标
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListGoalsRequest;

impl ApiRequest for ListGoalsRequest {
    type Response = ApiEnvelope<Vec<Goal>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/goals".to_string()
    }
}

/// 创建/更新目标共用的表单载荷
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalPayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_role_id: Option<u64>,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub priority: GoalPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: String,
}

impl From<&Goal> for GoalPayload {
    /// 以现有目标为底稿构造载荷（用于只改个别字段的更新）
    fn from(goal: &Goal) -> Self {
        Self {
            title: goal.title.clone(),
            description: goal.description.clone(),
            job_role_id: goal.job_role_id,
            status: goal.status,
            priority: goal.priority,
            due_date: goal.due_date,
            tags: goal.tags.clone(),
        }
    }
}

/// 创建目标
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateGoalRequest {
    #[serde(flatten)]
    pub goal: GoalPayload,
}

impl ApiRequest for CreateGoalRequest {
    type Response = ApiEnvelope<Goal>;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/goals".to_string()
    }
}

/// 按 id 更新目标
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateGoalRequest {
    #[serde(skip)]
    pub id: u64,
    #[serde(flatten)]
    pub goal: GoalPayload,
}

impl ApiRequest for UpdateGoalRequest {
    type Response = ApiEnvelope<Goal>;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/goals/{}", self.id)
    }
}

/// 按 id 删除目标
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeleteGoalRequest {
    #[serde(skip)]
    pub id: u64,
}

/// 删除接口不走 `data` 信封，返回一条确认消息
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteAck {
    pub message: String,
}

impl ApiRequest for DeleteGoalRequest {
    type Response = DeleteAck;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/goals/{}", self.id)
    }
}

// =========================================================
// 进度 (Progress)
// =========================================================

/// 拉取某个目标的进度记录
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListProgressRequest {
    #[serde(skip)]
    pub goal_id: u64,
}

impl ApiRequest for ListProgressRequest {
    type Response = ApiEnvelope<Vec<ProgressEntry>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/goals/{}/progress", self.goal_id)
    }
}

/// 为某个目标追加一条进度记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProgressRequest {
    #[serde(skip)]
    pub goal_id: u64,
    pub description: String,
    pub percentage: u8,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub action_taken: String,
    #[serde(default)]
    pub next_steps: String,
}

impl ApiRequest for CreateProgressRequest {
    type Response = ApiEnvelope<ProgressEntry>;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/goals/{}/progress", self.goal_id)
    }
}

// =========================================================
// 用户资料 (Profile)
// =========================================================

/// 获取当前用户资料（不存在时由后端创建空资料）
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GetMyProfileRequest;

impl ApiRequest for GetMyProfileRequest {
    type Response = ApiEnvelope<UserProfile>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/profiles/me".to_string()
    }
}

/// 更新用户资料，None 字段不提交
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(skip)]
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_goals: Option<String>,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = ApiEnvelope<UserProfile>;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/profiles/{}", self.id)
    }
}

// =========================================================
// 目录资源 (Catalog, 只读)
// =========================================================

/// 全部职位角色
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListJobRolesRequest;

impl ApiRequest for ListJobRolesRequest {
    type Response = ApiEnvelope<Vec<JobRole>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/job-roles".to_string()
    }
}

/// 全部职责
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListResponsibilitiesRequest;

impl ApiRequest for ListResponsibilitiesRequest {
    type Response = ApiEnvelope<Vec<Responsibility>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/responsibilities".to_string()
    }
}

/// 某个职位角色下的职责
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ResponsibilitiesForRoleRequest {
    #[serde(skip)]
    pub job_role_id: u64,
}

impl ApiRequest for ResponsibilitiesForRoleRequest {
    type Response = ApiEnvelope<Vec<Responsibility>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/responsibilities/job-role/{}", self.job_role_id)
    }
}

/// 某个职责下的预置目标建议
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SuggestionsForResponsibilityRequest {
    #[serde(skip)]
    pub responsibility_id: u64,
}

impl ApiRequest for SuggestionsForResponsibilityRequest {
    type Response = ApiEnvelope<Vec<GoalSuggestion>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/goal-suggestions/for-responsibility/{}", self.responsibility_id)
    }
}

/// 某个目标可参考的进度建议
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProgressSuggestionsForGoalRequest {
    #[serde(skip)]
    pub goal_id: u64,
}

impl ApiRequest for ProgressSuggestionsForGoalRequest {
    type Response = ApiEnvelope<Vec<ProgressSuggestion>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/progress-suggestions/for-goal/{}", self.goal_id)
    }
}

// =========================================================
// AI 接口
// =========================================================

/// 按用户画像生成个性化目标建议
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiGoalSuggestionsRequest {
    pub user_profile: UserProfile,
    pub responsibility_id: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub market_trends: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company_context: String,
}

impl ApiRequest for AiGoalSuggestionsRequest {
    type Response = ApiEnvelope<Vec<AiGoalSuggestion>>;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/ai/goal-suggestions".to_string()
    }
}

/// 把目标文案精炼为 SMART 形式
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefineGoalRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl ApiRequest for RefineGoalRequest {
    type Response = ApiEnvelope<RefinedGoal>;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/ai/refine-goal".to_string()
    }
}

/// 为目标生成阶段里程碑
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateMilestonesRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl ApiRequest for GenerateMilestonesRequest {
    type Response = ApiEnvelope<Vec<Milestone>>;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/ai/milestones".to_string()
    }
}

// =========================================================
// 管理端 (Admin)
// =========================================================

/// 后端健康检查
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AdminHealthRequest;

impl ApiRequest for AdminHealthRequest {
    type Response = ApiEnvelope<AdminHealth>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/admin/health".to_string()
    }
}

/// 用户列表
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AdminUsersRequest;

impl ApiRequest for AdminUsersRequest {
    type Response = ApiEnvelope<Vec<AdminUser>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/admin/users".to_string()
    }
}

/// AI 服务状态
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AdminAiStatusRequest;

impl ApiRequest for AdminAiStatusRequest {
    type Response = ApiEnvelope<AiStatus>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/admin/ai-status".to_string()
    }
}

// =========================================================
// CSRF
// =========================================================

/// 领取 CSRF 令牌（Double Submit Cookie：响应体与 Cookie 各一份）
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CsrfTokenRequest;

/// CSRF 接口不走 `data` 信封
#[derive(Debug, Serialize, Deserialize)]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

impl ApiRequest for CsrfTokenRequest {
    type Response = CsrfTokenResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/csrf-token".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_paths_interpolate_ids() {
        let update = UpdateGoalRequest {
            id: 42,
            goal: GoalPayload::default(),
        };
        assert_eq!(update.path(), "/goals/42");

        let progress = CreateProgressRequest {
            goal_id: 7,
            ..Default::default()
        };
        assert_eq!(progress.path(), "/goals/7/progress");

        let by_role = ResponsibilitiesForRoleRequest { job_role_id: 3 };
        assert_eq!(by_role.path(), "/responsibilities/job-role/3");
    }

    #[test]
    fn path_ids_stay_out_of_the_body() {
        let req = UpdateGoalRequest {
            id: 42,
            goal: GoalPayload {
                title: "t".to_string(),
                ..Default::default()
            },
        };
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["title"], "t");

        let progress = CreateProgressRequest {
            goal_id: 7,
            description: "d".to_string(),
            percentage: 50,
            ..Default::default()
        };
        let body = serde_json::to_value(&progress).unwrap();
        assert!(body.get("goal_id").is_none());
        assert_eq!(body["percentage"], 50);
    }

    #[test]
    fn profile_update_omits_unset_fields() {
        let req = UpdateProfileRequest {
            id: 1,
            current_role: Some("Engineer".to_string()),
            ..Default::default()
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["current_role"], "Engineer");
        assert!(body.get("industry").is_none());
    }

    #[test]
    fn only_get_skips_csrf() {
        assert!(!ListGoalsRequest::METHOD.is_mutation());
        assert!(CreateGoalRequest::METHOD.is_mutation());
        assert!(UpdateGoalRequest::METHOD.is_mutation());
        assert!(DeleteGoalRequest::METHOD.is_mutation());
    }
}
