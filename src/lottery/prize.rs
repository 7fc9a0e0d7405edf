use serde::{Deserialize, Serialize};

/// 奖项配额
///
/// 不变量：`0 <= remaining <= total`。remaining 只随成功抽取递减，
/// 每次递减量为奖池实际返回的号码数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrizeTier {
    /// 奖项ID
    pub id: String,
    /// 奖项名称
    pub name: String,
    /// 配额总数
    pub total: i64,
    /// 剩余配额
    pub remaining: i64,
}

impl PrizeTier {
    pub fn new(id: impl Into<String>, name: impl Into<String>, total: i64) -> Self {
        PrizeTier {
            id: id.into(),
            name: name.into(),
            total,
            remaining: total,
        }
    }

    /// 扣减配额（按实际抽出数量，钳制不为负）
    pub fn consume(&mut self, count: usize) {
        self.remaining = (self.remaining - count as i64).max(0);
    }

    /// 恢复满额配额
    pub fn refill(&mut self) {
        self.remaining = self.total;
    }
}

/// 配额校验结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// 允许抽取，附带钳制后的实际数量
    Proceed(usize),
    /// 号码池已空
    PoolExhausted,
    /// 奖项配额已抽完
    TierExhausted,
}

/// 在调用奖池前校验一次抽取请求
///
/// 实际数量 = min(请求数量, 奖项剩余配额, 池内剩余号码数)；结果为 0 时
/// 给出具体原因且绝不触达奖池，保证历史里不会出现零号码记录。
/// `tier_remaining` 为 None 表示本次抽取不挂奖项，跳过配额限制。
pub fn evaluate_draw_request(
    requested: usize,
    tier_remaining: Option<i64>,
    pool_remaining: usize,
) -> QuotaDecision {
    if pool_remaining == 0 {
        return QuotaDecision::PoolExhausted;
    }

    let mut actual = requested.min(pool_remaining);
    if let Some(remaining) = tier_remaining {
        if remaining <= 0 {
            return QuotaDecision::TierExhausted;
        }
        actual = actual.min(remaining as usize);
    }

    if actual == 0 {
        // requested == 0 在服务层已被挡下，这里兜底按池空处理
        return QuotaDecision::PoolExhausted;
    }

    QuotaDecision::Proceed(actual)
}
