use rand::RngCore;
use rand::rngs::OsRng;

/// 从加密级随机源生成 [0, n) 上的均匀整数
///
/// 使用拒绝采样消除取模偏差：只接受落在 n 的最大整数倍以下的采样值，
/// 保证 n 个结果严格等概率（公平性敏感场景不能用 `random() % n`）。
///
/// # Panics
///
/// `n == 0` 属于调用方契约错误，直接 panic。
pub fn uniform_u32(n: u32) -> u32 {
    assert!(n > 0, "uniform_u32: n must be positive");

    let n = n as u64;
    // 2^32 以内 n 的最大整数倍，超过该值的采样全部丢弃重抽
    let limit = (1u64 << 32) / n * n;

    let mut rng = OsRng;
    loop {
        let sample = rng.next_u32() as u64;
        if sample < limit {
            return (sample % n) as u32;
        }
    }
}

/// 生成 [min, max] 闭区间内的均匀随机整数
///
/// # Panics
///
/// `min > max` 属于调用方契约错误，直接 panic。
pub fn random_int(min: i64, max: i64) -> i64 {
    assert!(min <= max, "random_int: min must not exceed max");

    let range = (max - min + 1) as u32;
    min + uniform_u32(range) as i64
}

/// 从非空切片中均匀随机取一个元素
///
/// # Panics
///
/// 空切片属于调用方契约错误，直接 panic。
pub fn random_element<T: Copy>(items: &[T]) -> T {
    assert!(
        !items.is_empty(),
        "random_element: cannot pick from an empty slice"
    );
    items[uniform_u32(items.len() as u32) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_u32_in_range() {
        for _ in 0..1000 {
            assert!(uniform_u32(7) < 7);
        }
        assert_eq!(uniform_u32(1), 0);
    }

    #[test]
    #[should_panic(expected = "n must be positive")]
    fn test_uniform_u32_zero_panics() {
        uniform_u32(0);
    }

    #[test]
    fn test_random_int_bounds() {
        for _ in 0..1000 {
            let v = random_int(-3, 3);
            assert!((-3..=3).contains(&v));
        }
        assert_eq!(random_int(5, 5), 5);
    }

    #[test]
    #[should_panic(expected = "min must not exceed max")]
    fn test_random_int_inverted_range_panics() {
        random_int(10, 1);
    }

    #[test]
    fn test_random_element() {
        let items = [11, 22, 33];
        for _ in 0..100 {
            assert!(items.contains(&random_element(&items)));
        }
    }

    #[test]
    fn test_uniform_distribution() {
        // 10 万次 n=10 采样，各结果频率应落在 1/10 附近
        // (容差取 ±1.5%，对应远超 6 个标准差，几乎不可能误报)
        const TRIALS: usize = 100_000;
        let mut counts = [0usize; 10];
        for _ in 0..TRIALS {
            counts[uniform_u32(10) as usize] += 1;
        }

        let expected = TRIALS as f64 / 10.0;
        for (value, &count) in counts.iter().enumerate() {
            let deviation = (count as f64 - expected).abs() / TRIALS as f64;
            assert!(
                deviation < 0.015,
                "value {value} drawn {count} times, outside tolerance"
            );
        }
    }
}
