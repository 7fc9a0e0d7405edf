use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::config::LotteryConfig;
use crate::error::{AppError, AppResult};
use crate::lottery::{DrawRecord, LotteryPool, PrizeTier, QuotaDecision, evaluate_draw_request};
use crate::models::{
    DrawResponse, PoolStateResponse, PrizeTierResponse, RollingDisplayResponse,
    SnapshotInfoResponse, UpdateListResponse,
};
use crate::storage::{SnapshotStore, StoredData};
use crate::utils::number_list::{format_number_list, parse_number_list};
use crate::utils::random::random_element;

// 滚动展示刷新节奏：起始间隔与上限（毫秒），每帧递增放缓
const ROLLING_INTERVAL_START_MS: u64 = 80;
const ROLLING_INTERVAL_MAX_MS: u64 = 600;

/// 抽奖会话的全部可变状态，只通过服务层的互斥锁访问
struct LotteryState {
    min_number: i64,
    max_number: i64,
    blacklist: Vec<i64>,
    whitelist: Vec<i64>,
    pool: LotteryPool,
    prizes: Vec<PrizeTier>,
    current_prize: Option<String>,
    draw_count: usize,
    rolling: RollingState,
}

/// 滚动展示会话
///
/// generation 是取消令牌：start/stop/reset 都会自增，后台帧任务每帧
/// 校验自己的 generation，不相等立即退出，保证取消后不会有过期帧
/// （更不会有过期抽取）落到新状态上。
struct RollingState {
    active: bool,
    generation: u64,
    display: Vec<i64>,
    pending_count: usize,
    pending_prize: Option<String>,
}

impl RollingState {
    fn idle() -> Self {
        RollingState {
            active: false,
            generation: 0,
            display: Vec::new(),
            pending_count: 1,
            pending_prize: None,
        }
    }

    // 取消当前滚动任务（幂等，可重复调用）
    fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.active = false;
        self.display.clear();
    }
}

/// 抽奖服务
///
/// 持有唯一一份奖池状态（单写者模型），所有修改串行通过同一把
/// tokio Mutex；每次成功修改后尽力保存快照，保存失败只记日志，
/// 不影响抽奖结果。
#[derive(Clone)]
pub struct LotteryService {
    state: Arc<Mutex<LotteryState>>,
    store: SnapshotStore,
}

impl LotteryService {
    pub fn new(config: &LotteryConfig, store: SnapshotStore) -> Self {
        let prizes: Vec<PrizeTier> = config
            .prizes
            .iter()
            .map(|p| PrizeTier::new(p.id.clone(), p.name.clone(), p.total))
            .collect();

        let state = LotteryState {
            min_number: config.min_number,
            max_number: config.max_number,
            blacklist: Vec::new(),
            whitelist: Vec::new(),
            pool: LotteryPool::new(config.min_number, config.max_number, &[], &[]),
            prizes,
            current_prize: None,
            draw_count: 1,
            rolling: RollingState::idle(),
        };

        LotteryService {
            state: Arc::new(Mutex::new(state)),
            store,
        }
    }

    /// 当前完整状态
    pub async fn state(&self) -> PoolStateResponse {
        let state = self.state.lock().await;
        Self::state_response(&state)
    }

    /// 执行一次抽取（配额校验 → 奖池采样 → 保存快照）
    pub async fn draw(&self, count: Option<usize>, prize_id: Option<&str>) -> AppResult<DrawResponse> {
        let mut state = self.state.lock().await;
        let response = Self::draw_locked(&mut state, count, prize_id)?;
        self.save_snapshot(&state);
        Ok(response)
    }

    /// 奖项列表
    pub async fn prizes(&self) -> Vec<PrizeTierResponse> {
        let state = self.state.lock().await;
        state.prizes.iter().map(Into::into).collect()
    }

    /// 选择当前奖项
    pub async fn select_prize(&self, prize_id: &str) -> AppResult<PrizeTierResponse> {
        let mut state = self.state.lock().await;
        let tier = state
            .prizes
            .iter()
            .find(|t| t.id == prize_id)
            .ok_or_else(|| AppError::NotFound(format!("Prize tier not found: {prize_id}")))?;
        let response = PrizeTierResponse::from(tier);

        state.current_prize = Some(prize_id.to_string());
        self.save_snapshot(&state);
        Ok(response)
    }

    /// 重置奖池：重建号码池、清空历史、奖项恢复满额、删除存档
    pub async fn reset(&self) -> AppResult<PoolStateResponse> {
        let mut state = self.state.lock().await;
        state.rolling.cancel();

        let (min, max) = (state.min_number, state.max_number);
        let (blacklist, whitelist) = (state.blacklist.clone(), state.whitelist.clone());
        state.pool.reset(min, max, &blacklist, &whitelist);
        for tier in &mut state.prizes {
            tier.refill();
        }

        self.store.clear()?;
        log::info!("Lottery pool reset: range [{min}, {max}]");
        Ok(Self::state_response(&state))
    }

    /// 变更号码范围（整池重建，等同重置）
    pub async fn update_range(&self, min_number: i64, max_number: i64) -> AppResult<PoolStateResponse> {
        if min_number >= max_number {
            return Err(AppError::ValidationError(format!(
                "Invalid range: min_number ({min_number}) must be less than max_number ({max_number})"
            )));
        }

        let mut state = self.state.lock().await;
        state.rolling.cancel();
        state.min_number = min_number;
        state.max_number = max_number;

        let (blacklist, whitelist) = (state.blacklist.clone(), state.whitelist.clone());
        state.pool.reset(min_number, max_number, &blacklist, &whitelist);
        for tier in &mut state.prizes {
            tier.refill();
        }

        self.store.clear()?;
        log::info!("Lottery range changed to [{min_number}, {max_number}], pool rebuilt");
        Ok(Self::state_response(&state))
    }

    /// 更新黑名单（文本语法，保留已抽号码）
    pub async fn update_blacklist(&self, input: &str) -> AppResult<UpdateListResponse> {
        self.update_lists(input, true).await
    }

    /// 更新白名单（文本语法，保留已抽号码）
    pub async fn update_whitelist(&self, input: &str) -> AppResult<UpdateListResponse> {
        self.update_lists(input, false).await
    }

    async fn update_lists(&self, input: &str, is_blacklist: bool) -> AppResult<UpdateListResponse> {
        let mut state = self.state.lock().await;

        let numbers = parse_number_list(input, state.min_number, state.max_number);
        if is_blacklist {
            state.blacklist = numbers.clone();
        } else {
            state.whitelist = numbers.clone();
        }

        let (min, max) = (state.min_number, state.max_number);
        let (blacklist, whitelist) = (state.blacklist.clone(), state.whitelist.clone());
        state.pool.update_lists(min, max, &blacklist, &whitelist);

        self.save_snapshot(&state);
        Ok(UpdateListResponse {
            formatted: format_number_list(&numbers),
            numbers,
            remaining_count: state.pool.remaining_count(),
        })
    }

    /// 存档摘要（恢复提示用）
    pub async fn snapshot_info(&self) -> SnapshotInfoResponse {
        match self.store.load() {
            Some(data) => SnapshotInfoResponse {
                exists: true,
                drawn_count: data.drawn_numbers.len(),
                remaining_count: data.remaining_numbers.len(),
                saved_at: Some(data.timestamp),
            },
            None => SnapshotInfoResponse {
                exists: false,
                drawn_count: 0,
                remaining_count: 0,
                saved_at: None,
            },
        }
    }

    /// 从存档恢复会话状态
    ///
    /// 存档内容按原样覆盖当前状态，不重新校验已抽/剩余集合的一致性
    /// （一致性由写入方保证）。
    pub async fn restore(&self) -> AppResult<PoolStateResponse> {
        let data = self
            .store
            .load()
            .ok_or_else(|| AppError::NotFound("No stored snapshot found".to_string()))?;

        let mut state = self.state.lock().await;
        state.rolling.cancel();

        state.min_number = data.min_number;
        state.max_number = data.max_number;
        state.blacklist = data.blacklist;
        state.whitelist = data.whitelist;
        state.prizes = data.prize_state;
        state.current_prize = data.current_prize;
        state.draw_count = data.draw_count;
        state.pool.restore_state(
            &data.drawn_numbers,
            &data.remaining_numbers,
            Some(data.draw_history),
        );

        log::info!(
            "Session restored from snapshot: {} drawn, {} remaining",
            data.drawn_numbers.len(),
            data.remaining_numbers.len()
        );
        Ok(Self::state_response(&state))
    }

    /// 丢弃存档（用户选择重新开始）
    pub async fn discard_snapshot(&self) -> AppResult<()> {
        self.store.clear()
    }

    /// 抽取历史（导出用）
    pub async fn draw_history(&self) -> Vec<DrawRecord> {
        let state = self.state.lock().await;
        state.pool.draw_history().to_vec()
    }

    // -----------------------------
    // 滚动展示（纯装饰）
    // -----------------------------

    /// 启动滚动展示
    ///
    /// 后台任务以递减频率刷新展示号码；展示值是对当前剩余号码的
    /// 有放回采样，纯装饰，绝不修改奖池状态。重复 start 会替换
    /// 之前的会话（旧任务因 generation 不匹配自行退出）。
    pub async fn rolling_start(
        &self,
        count: Option<usize>,
        prize_id: Option<&str>,
    ) -> AppResult<RollingDisplayResponse> {
        let mut state = self.state.lock().await;

        let count = count.unwrap_or(state.draw_count);
        if count == 0 {
            return Err(AppError::ValidationError(
                "Draw count must be positive".to_string(),
            ));
        }
        if let Some(id) = prize_id
            && !state.prizes.iter().any(|t| t.id == id)
        {
            return Err(AppError::NotFound(format!("Prize tier not found: {id}")));
        }

        state.rolling.cancel();
        state.rolling.active = true;
        state.rolling.pending_count = count;
        state.rolling.pending_prize = prize_id.map(String::from);
        let generation = state.rolling.generation;
        drop(state);

        let shared = self.state.clone();
        tokio::spawn(async move {
            let mut interval_ms = ROLLING_INTERVAL_START_MS;
            loop {
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;

                let mut state = shared.lock().await;
                if state.rolling.generation != generation || !state.rolling.active {
                    // 已被取消（stop/reset/新的 start），本帧作废
                    break;
                }

                let remaining = state.pool.remaining_numbers();
                let count = state.rolling.pending_count;
                state.rolling.display = if remaining.is_empty() {
                    Vec::new()
                } else {
                    (0..count).map(|_| random_element(&remaining)).collect()
                };
                drop(state);

                interval_ms = (interval_ms * 115 / 100).min(ROLLING_INTERVAL_MAX_MS);
            }
        });

        Ok(RollingDisplayResponse {
            rolling: true,
            numbers: Vec::new(),
        })
    }

    /// 当前滚动帧
    pub async fn rolling_display(&self) -> RollingDisplayResponse {
        let state = self.state.lock().await;
        RollingDisplayResponse {
            rolling: state.rolling.active,
            numbers: state.rolling.display.clone(),
        }
    }

    /// 停止滚动并执行唯一一次真实抽取
    pub async fn rolling_stop(&self) -> AppResult<DrawResponse> {
        let mut state = self.state.lock().await;
        if !state.rolling.active {
            return Err(AppError::ValidationError(
                "Rolling display is not active".to_string(),
            ));
        }

        let count = state.rolling.pending_count;
        let prize = state.rolling.pending_prize.take();
        state.rolling.cancel();

        let response = Self::draw_locked(&mut state, Some(count), prize.as_deref())?;
        self.save_snapshot(&state);
        Ok(response)
    }

    // -----------------------------
    // 内部辅助方法
    // -----------------------------

    fn draw_locked(
        state: &mut LotteryState,
        count: Option<usize>,
        prize_id: Option<&str>,
    ) -> AppResult<DrawResponse> {
        let requested = count.unwrap_or(state.draw_count);
        if requested == 0 {
            return Err(AppError::ValidationError(
                "Draw count must be positive".to_string(),
            ));
        }
        state.draw_count = requested;

        let tier_index = match prize_id {
            Some(id) => Some(
                state
                    .prizes
                    .iter()
                    .position(|t| t.id == id)
                    .ok_or_else(|| AppError::NotFound(format!("Prize tier not found: {id}")))?,
            ),
            None => None,
        };
        let tier_remaining = tier_index.map(|i| state.prizes[i].remaining);

        let actual = match evaluate_draw_request(
            requested,
            tier_remaining,
            state.pool.remaining_count(),
        ) {
            QuotaDecision::Proceed(actual) => actual,
            QuotaDecision::PoolExhausted => return Err(AppError::PoolExhausted),
            QuotaDecision::TierExhausted => {
                let name = tier_index
                    .map(|i| state.prizes[i].name.clone())
                    .unwrap_or_default();
                return Err(AppError::TierExhausted(name));
            }
        };

        let prize_name = tier_index.map(|i| state.prizes[i].name.clone());
        let numbers = state.pool.draw_multiple(actual, prize_name.as_deref());

        // 按实际返回数量扣减，而不是按请求数量
        if let Some(i) = tier_index {
            state.prizes[i].consume(numbers.len());
        }

        log::info!(
            "Drew {} number(s){}, {} remaining",
            numbers.len(),
            prize_name
                .as_deref()
                .map(|n| format!(" for prize {n}"))
                .unwrap_or_default(),
            state.pool.remaining_count()
        );

        Ok(DrawResponse {
            numbers,
            remaining_count: state.pool.remaining_count(),
            prize: tier_index.map(|i| PrizeTierResponse::from(&state.prizes[i])),
        })
    }

    fn state_response(state: &LotteryState) -> PoolStateResponse {
        PoolStateResponse {
            min_number: state.min_number,
            max_number: state.max_number,
            remaining_count: state.pool.remaining_count(),
            drawn_numbers: state.pool.drawn_numbers().to_vec(),
            remaining_numbers: state.pool.remaining_numbers(),
            blacklist: state.blacklist.clone(),
            whitelist: state.whitelist.clone(),
            draw_history: state.pool.draw_history().iter().map(Into::into).collect(),
            prizes: state.prizes.iter().map(Into::into).collect(),
            current_prize: state.current_prize.clone(),
            draw_count: state.draw_count,
        }
    }

    // 尽力保存快照；失败只记日志（持久化是 best-effort，不能让抽奖失败）
    fn save_snapshot(&self, state: &LotteryState) {
        let data = StoredData {
            min_number: state.min_number,
            max_number: state.max_number,
            drawn_numbers: state.pool.drawn_numbers().to_vec(),
            remaining_numbers: state.pool.remaining_numbers(),
            blacklist: state.blacklist.clone(),
            whitelist: state.whitelist.clone(),
            draw_history: state.pool.draw_history().to_vec(),
            prize_state: state.prizes.clone(),
            current_prize: state.current_prize.clone(),
            draw_count: state.draw_count,
            timestamp: Utc::now(),
        };

        if let Err(e) = self.store.save(&data) {
            log::error!("Failed to save snapshot: {e}");
        }
    }
}
