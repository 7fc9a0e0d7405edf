use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::lottery::{DrawRecord, PrizeTier};

/// 抽奖请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DrawRequest {
    /// 抽取数量（默认 1）
    pub count: Option<usize>,
    /// 奖项ID（缺省表示不挂奖项，跳过配额限制）
    pub prize_id: Option<String>,
}

/// 抽奖结果响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResponse {
    /// 本次抽出的号码（按抽出顺序）
    pub numbers: Vec<i64>,
    /// 抽取后池内剩余号码数
    pub remaining_count: usize,
    /// 本次挂靠的奖项（扣减后的状态）
    pub prize: Option<PrizeTierResponse>,
}

/// 奖项状态响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrizeTierResponse {
    /// 奖项ID
    pub id: String,
    /// 奖项名称
    pub name: String,
    /// 配额总数
    pub total: i64,
    /// 剩余配额
    pub remaining: i64,
}

impl From<&PrizeTier> for PrizeTierResponse {
    fn from(t: &PrizeTier) -> Self {
        PrizeTierResponse {
            id: t.id.clone(),
            name: t.name.clone(),
            total: t.total,
            remaining: t.remaining,
        }
    }
}

/// 单条抽取历史响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawRecordResponse {
    /// 记录ID
    pub id: Uuid,
    /// 本次抽出的号码
    pub numbers: Vec<i64>,
    /// 抽取时间
    pub timestamp: DateTime<Utc>,
    /// 奖项名称快照
    pub prize: Option<String>,
}

impl From<&DrawRecord> for DrawRecordResponse {
    fn from(r: &DrawRecord) -> Self {
        DrawRecordResponse {
            id: r.id,
            numbers: r.numbers.clone(),
            timestamp: r.timestamp,
            prize: r.prize.clone(),
        }
    }
}

/// 完整奖池状态响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PoolStateResponse {
    /// 号码范围下界
    pub min_number: i64,
    /// 号码范围上界
    pub max_number: i64,
    /// 池内剩余号码数
    pub remaining_count: usize,
    /// 已抽号码（按抽出顺序）
    pub drawn_numbers: Vec<i64>,
    /// 剩余号码（升序）
    pub remaining_numbers: Vec<i64>,
    /// 黑名单
    pub blacklist: Vec<i64>,
    /// 白名单
    pub whitelist: Vec<i64>,
    /// 抽取历史
    pub draw_history: Vec<DrawRecordResponse>,
    /// 奖项状态
    pub prizes: Vec<PrizeTierResponse>,
    /// 当前选中奖项
    pub current_prize: Option<String>,
    /// 最近一次请求的抽取数量
    pub draw_count: usize,
}

/// 选择当前奖项请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SelectPrizeRequest {
    /// 奖项ID
    pub prize_id: String,
}

/// 号码范围变更请求（触发整池重建）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateRangeRequest {
    /// 新下界（默认 1）
    pub min_number: Option<i64>,
    /// 新上界
    pub max_number: i64,
}

/// 黑/白名单文本更新请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateListRequest {
    /// 文本格式号码列表，如 "1-10, 88, 100-105"；空串表示清空
    pub input: String,
}

/// 名单更新响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateListResponse {
    /// 解析后的号码（升序去重，非法 token 已丢弃）
    pub numbers: Vec<i64>,
    /// 规范化回显文本
    pub formatted: String,
    /// 更新后池内剩余号码数
    pub remaining_count: usize,
}

/// 存档摘要响应（用于恢复提示）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SnapshotInfoResponse {
    /// 是否存在存档
    pub exists: bool,
    /// 存档中的已抽号码数
    pub drawn_count: usize,
    /// 存档中的剩余号码数
    pub remaining_count: usize,
    /// 存档时间
    pub saved_at: Option<DateTime<Utc>>,
}

/// 滚动展示启动请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RollingStartRequest {
    /// 停止时真正抽取的数量（默认 1）
    pub count: Option<usize>,
    /// 停止时挂靠的奖项ID
    pub prize_id: Option<String>,
}

/// 滚动展示当前帧
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RollingDisplayResponse {
    /// 是否正在滚动
    pub rolling: bool,
    /// 展示用随机号码（纯装饰，不影响奖池）
    pub numbers: Vec<i64>,
}

/// 剪贴板文本导出响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExportSummaryResponse {
    /// 逐条记录的文本摘要（每行一条）
    pub text: String,
    /// 行数
    pub lines: usize,
}
