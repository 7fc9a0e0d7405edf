use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::random::uniform_u32;

/// 一次抽取操作的历史记录（单抽与批量抽取都只产生一条）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawRecord {
    /// 记录ID
    pub id: Uuid,
    /// 本次抽出的号码（按抽出顺序）
    pub numbers: Vec<i64>,
    /// 抽取时间
    pub timestamp: DateTime<Utc>,
    /// 奖项名称快照（无奖项抽取为 None）
    pub prize: Option<String>,
}

impl DrawRecord {
    fn new(numbers: Vec<i64>, prize: Option<String>) -> Self {
        DrawRecord {
            id: Uuid::new_v4(),
            numbers,
            timestamp: Utc::now(),
            prize,
        }
    }
}

/// 奖池
///
/// 持有当前可抽号码集合、已抽号码序列与抽取历史，保证无放回均匀抽取：
/// 每次抽取都是对"当前剩余池"的一次独立均匀采样，抽出即从池中移除，
/// 同一号码在一次重置周期内不可能出现两次。
///
/// 纯内存状态，不做任何 IO；持有方（服务层）负责串行化修改与持久化。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryPool {
    pool: HashSet<i64>,
    drawn: Vec<i64>,
    drawn_set: HashSet<i64>,
    history: Vec<DrawRecord>,
}

impl LotteryPool {
    /// 构建奖池
    ///
    /// 池 = (whitelist 为空 ? [min..=max] : [min..=max] ∩ whitelist) − blacklist。
    /// 结果为空集是合法状态（例如全部号码都被排除），不报错。
    pub fn new(min_number: i64, max_number: i64, blacklist: &[i64], whitelist: &[i64]) -> Self {
        LotteryPool {
            pool: Self::build_pool(min_number, max_number, blacklist, whitelist),
            drawn: Vec::new(),
            drawn_set: HashSet::new(),
            history: Vec::new(),
        }
    }

    fn build_pool(
        min_number: i64,
        max_number: i64,
        blacklist: &[i64],
        whitelist: &[i64],
    ) -> HashSet<i64> {
        let whitelist_set: HashSet<i64> = whitelist.iter().copied().collect();
        let blacklist_set: HashSet<i64> = blacklist.iter().copied().collect();

        (min_number..=max_number)
            .filter(|n| whitelist_set.is_empty() || whitelist_set.contains(n))
            .filter(|n| !blacklist_set.contains(n))
            .collect()
    }

    /// 抽取单个号码
    ///
    /// 池空时返回 None（正常结果而非错误）。否则对当前池做一次均匀采样，
    /// 抽出的号码移入已抽序列，并追加一条单号码历史记录。
    pub fn draw_one(&mut self, prize: Option<&str>) -> Option<i64> {
        let number = self.take_one()?;
        self.history
            .push(DrawRecord::new(vec![number], prize.map(String::from)));
        Some(number)
    }

    /// 批量抽取
    ///
    /// 抽取数量钳制到当前池大小；内部逐个无放回抽取，但整批只追加
    /// 一条共享时间戳的历史记录。池空时返回空序列且不产生记录。
    pub fn draw_multiple(&mut self, count: usize, prize: Option<&str>) -> Vec<i64> {
        let actual = count.min(self.pool.len());
        let mut results = Vec::with_capacity(actual);

        for _ in 0..actual {
            if let Some(number) = self.take_one() {
                results.push(number);
            }
        }

        if !results.is_empty() {
            self.history
                .push(DrawRecord::new(results.clone(), prize.map(String::from)));
        }

        results
    }

    // 无放回抽取一个号码，不写历史
    fn take_one(&mut self) -> Option<i64> {
        if self.pool.is_empty() {
            return None;
        }

        let numbers: Vec<i64> = self.pool.iter().copied().collect();
        let index = uniform_u32(numbers.len() as u32) as usize;
        let number = numbers[index];

        self.pool.remove(&number);
        self.drawn.push(number);
        self.drawn_set.insert(number);

        Some(number)
    }

    /// 重置奖池：按构建规则重建号码池，清空已抽序列与历史
    pub fn reset(&mut self, min_number: i64, max_number: i64, blacklist: &[i64], whitelist: &[i64]) {
        self.pool = Self::build_pool(min_number, max_number, blacklist, whitelist);
        self.drawn.clear();
        self.drawn_set.clear();
        self.history.clear();
    }

    /// 从外部快照直接恢复状态（崩溃/会话恢复）
    ///
    /// 直接覆盖已抽序列与号码池，不按范围/名单重新推导，也不校验两个
    /// 集合互斥——一致性由调用方保证（信任边界）。
    pub fn restore_state(
        &mut self,
        drawn_numbers: &[i64],
        remaining_numbers: &[i64],
        draw_history: Option<Vec<DrawRecord>>,
    ) {
        self.drawn = drawn_numbers.to_vec();
        self.drawn_set = drawn_numbers.iter().copied().collect();
        self.pool = remaining_numbers.iter().copied().collect();
        if let Some(history) = draw_history {
            self.history = history;
        }
    }

    /// 变更黑白名单（保留已抽号码）
    ///
    /// 按新名单重建号码池，再把已抽过的号码从新池中移除。已抽序列与
    /// 历史原样保留。幂等：用相同名单重复调用得到相同的池。
    pub fn update_lists(
        &mut self,
        min_number: i64,
        max_number: i64,
        blacklist: &[i64],
        whitelist: &[i64],
    ) {
        let mut pool = Self::build_pool(min_number, max_number, blacklist, whitelist);
        for n in &self.drawn {
            pool.remove(n);
        }
        self.pool = pool;
    }

    /// 号码是否已被抽出
    pub fn is_drawn(&self, number: i64) -> bool {
        self.drawn_set.contains(&number)
    }

    /// 号码是否仍在池中
    pub fn is_available(&self, number: i64) -> bool {
        self.pool.contains(&number)
    }

    /// 剩余号码数量
    pub fn remaining_count(&self) -> usize {
        self.pool.len()
    }

    /// 已抽号码（按抽出顺序）
    pub fn drawn_numbers(&self) -> &[i64] {
        &self.drawn
    }

    /// 剩余号码（升序，用于展示与快照）
    pub fn remaining_numbers(&self) -> Vec<i64> {
        let mut numbers: Vec<i64> = self.pool.iter().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    /// 抽取历史
    pub fn draw_history(&self) -> &[DrawRecord] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_construction_applies_filters() {
        // 规格示例：[1,10] 排除 5 → 9 个号码
        let pool = LotteryPool::new(1, 10, &[5], &[]);
        assert_eq!(pool.remaining_count(), 9);
        assert!(!pool.is_available(5));
        assert!(pool.is_available(1) && pool.is_available(10));
    }

    #[test]
    fn test_whitelist_intersects_range() {
        let pool = LotteryPool::new(1, 100, &[], &[3, 7, 500]);
        assert_eq!(pool.remaining_numbers(), vec![3, 7]);
    }

    #[test]
    fn test_blacklist_applies_after_whitelist() {
        let pool = LotteryPool::new(1, 100, &[7], &[3, 7, 9]);
        assert_eq!(pool.remaining_numbers(), vec![3, 9]);
    }

    #[test]
    fn test_all_excluded_is_valid_empty_pool() {
        let mut pool = LotteryPool::new(1, 3, &[1, 2, 3], &[]);
        assert_eq!(pool.remaining_count(), 0);
        assert_eq!(pool.draw_one(None), None);
    }

    #[test]
    fn test_draw_one_moves_number_out_of_pool() {
        let mut pool = LotteryPool::new(1, 10, &[], &[]);
        let number = pool.draw_one(None).unwrap();

        assert!((1..=10).contains(&number));
        assert!(pool.is_drawn(number));
        assert!(!pool.is_available(number));
        assert_eq!(pool.remaining_count(), 9);
        assert_eq!(pool.draw_history().len(), 1);
        assert_eq!(pool.draw_history()[0].numbers, vec![number]);
    }

    #[test]
    fn test_uniqueness_until_exhaustion() {
        let mut pool = LotteryPool::new(1, 50, &[], &[]);
        let mut seen = HashSet::new();
        while let Some(n) = pool.draw_one(None) {
            assert!(seen.insert(n), "number {n} drawn twice");
        }
        assert_eq!(seen.len(), 50);
        assert_eq!(pool.remaining_count(), 0);
    }

    #[test]
    fn test_conservation_invariant() {
        let mut pool = LotteryPool::new(1, 30, &[2, 4], &[]);
        let size = pool.remaining_count();
        for _ in 0..10 {
            pool.draw_one(None);
            assert_eq!(pool.remaining_count() + pool.drawn_numbers().len(), size);
        }
    }

    #[test]
    fn test_draw_multiple_single_record() {
        let mut pool = LotteryPool::new(1, 20, &[], &[]);
        let numbers = pool.draw_multiple(5, Some("三等奖"));

        assert_eq!(numbers.len(), 5);
        let unique: HashSet<&i64> = numbers.iter().collect();
        assert_eq!(unique.len(), 5);
        for n in &numbers {
            assert!(!pool.is_available(*n));
        }

        // 批量抽取只产生一条含全部号码的记录
        assert_eq!(pool.draw_history().len(), 1);
        assert_eq!(pool.draw_history()[0].numbers, numbers);
        assert_eq!(pool.draw_history()[0].prize.as_deref(), Some("三等奖"));
    }

    #[test]
    fn test_draw_multiple_clamps_to_pool_size() {
        let mut pool = LotteryPool::new(1, 3, &[], &[]);
        let numbers = pool.draw_multiple(10, None);
        assert_eq!(numbers.len(), 3);
        assert_eq!(pool.remaining_count(), 0);
    }

    #[test]
    fn test_draw_on_empty_pool_is_noop() {
        let mut pool = LotteryPool::new(1, 2, &[], &[]);
        pool.draw_multiple(2, None);

        assert_eq!(pool.draw_one(None), None);
        assert_eq!(pool.draw_multiple(3, None), Vec::<i64>::new());
        // 空抽不追加历史
        assert_eq!(pool.draw_history().len(), 1);
        assert_eq!(pool.drawn_numbers().len(), 2);
    }

    #[test]
    fn test_exhaustion_scenario_from_product() {
        // [1,10] 排除 5，批量抽 9 个抽空，第 10 次单抽无结果
        let mut pool = LotteryPool::new(1, 10, &[5], &[]);
        let numbers = pool.draw_multiple(9, None);
        assert_eq!(numbers.len(), 9);
        assert!(!numbers.contains(&5));
        assert_eq!(pool.draw_one(None), None);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut pool = LotteryPool::new(1, 10, &[], &[]);
        pool.draw_multiple(4, None);

        pool.reset(1, 10, &[], &[]);
        assert_eq!(pool.remaining_count(), 10);
        assert!(pool.drawn_numbers().is_empty());
        assert!(pool.draw_history().is_empty());
    }

    #[test]
    fn test_restore_state_round_trip() {
        let mut pool = LotteryPool::new(1, 10, &[], &[]);
        pool.draw_multiple(3, Some("二等奖"));

        let drawn = pool.drawn_numbers().to_vec();
        let remaining = pool.remaining_numbers();
        let history = pool.draw_history().to_vec();

        let mut restored = LotteryPool::new(1, 10, &[], &[]);
        restored.restore_state(&drawn, &remaining, Some(history.clone()));

        assert_eq!(restored.drawn_numbers(), drawn.as_slice());
        assert_eq!(restored.remaining_numbers(), remaining);
        assert_eq!(restored.draw_history().len(), history.len());
        for n in &drawn {
            assert!(restored.is_drawn(*n));
        }
    }

    #[test]
    fn test_update_lists_removes_drawn_from_new_pool() {
        let mut pool = LotteryPool::new(1, 10, &[], &[]);
        let drawn = pool.draw_multiple(3, None);

        pool.update_lists(1, 10, &[9], &[]);
        for n in &drawn {
            assert!(!pool.is_available(*n));
            assert!(pool.is_drawn(*n));
        }
        assert!(!pool.is_available(9));
        // 历史在名单变更后保留
        assert_eq!(pool.draw_history().len(), 1);
    }

    #[test]
    fn test_update_lists_is_idempotent() {
        let mut pool = LotteryPool::new(1, 20, &[], &[]);
        pool.draw_multiple(5, None);

        pool.update_lists(1, 20, &[1, 2, 3], &[]);
        let first = pool.remaining_numbers();
        let first_drawn = pool.drawn_numbers().to_vec();

        pool.update_lists(1, 20, &[1, 2, 3], &[]);
        assert_eq!(pool.remaining_numbers(), first);
        assert_eq!(pool.drawn_numbers(), first_drawn.as_slice());
    }
}
