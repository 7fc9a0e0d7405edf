use regex::Regex;

/// 解析号码列表输入（支持单个号码与范围，如 "1-10, 88, 100-105"）
///
/// 返回去重后升序排列的号码；格式错误、区间倒置或超出 [min, max]
/// 的号码一律静默丢弃，不会使整个输入解析失败。
pub fn parse_number_list(input: &str, min: i64, max: i64) -> Vec<i64> {
    let single = Regex::new(r"^\d+$").unwrap();
    let range = Regex::new(r"^(\d+)\s*-\s*(\d+)$").unwrap();

    let mut numbers = std::collections::BTreeSet::new();

    for part in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(caps) = range.captures(part) {
            let start: Option<i64> = caps[1].parse().ok();
            let end: Option<i64> = caps[2].parse().ok();
            if let (Some(start), Some(end)) = (start, end)
                && start <= end
            {
                for n in start..=end {
                    if n >= min && n <= max {
                        numbers.insert(n);
                    }
                }
            }
        } else if single.is_match(part)
            && let Ok(n) = part.parse::<i64>()
            && n >= min
            && n <= max
        {
            numbers.insert(n);
        }
    }

    numbers.into_iter().collect()
}

/// 把号码列表格式化为紧凑字符串（连续号码折叠成范围）
///
/// 与 [`parse_number_list`] 互逆，用于设置界面回显。
pub fn format_number_list(numbers: &[i64]) -> String {
    if numbers.is_empty() {
        return String::new();
    }

    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges: Vec<String> = Vec::new();
    let mut start = sorted[0];
    let mut end = sorted[0];

    for &n in &sorted[1..] {
        if n == end + 1 {
            end = n;
        } else {
            ranges.push(format_range(start, end));
            start = n;
            end = n;
        }
    }
    ranges.push(format_range(start, end));

    ranges.join(", ")
}

fn format_range(start: i64, end: i64) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_singles_and_ranges() {
        assert_eq!(
            parse_number_list("1-5, 88, 100-102", 1, 300),
            vec![1, 2, 3, 4, 5, 88, 100, 101, 102]
        );
    }

    #[test]
    fn test_parse_dedup_and_sort() {
        assert_eq!(parse_number_list("9, 3, 3, 1-4", 1, 300), vec![1, 2, 3, 4, 9]);
    }

    #[test]
    fn test_parse_drops_malformed_tokens() {
        // 非法 token 丢弃，不影响其余部分
        assert_eq!(parse_number_list("abc, 5, 7-x, 9", 1, 300), vec![5, 9]);
        assert_eq!(parse_number_list("", 1, 300), Vec::<i64>::new());
    }

    #[test]
    fn test_parse_drops_out_of_bounds() {
        assert_eq!(parse_number_list("0, 5, 301, 299-305", 1, 300), vec![5, 299, 300]);
    }

    #[test]
    fn test_parse_drops_inverted_range() {
        assert_eq!(parse_number_list("10-3, 7", 1, 300), vec![7]);
    }

    #[test]
    fn test_format_collapses_runs() {
        assert_eq!(
            format_number_list(&[1, 2, 3, 4, 5, 88, 100, 101, 102]),
            "1-5, 88, 100-102"
        );
        assert_eq!(format_number_list(&[42]), "42");
        assert_eq!(format_number_list(&[]), "");
    }

    #[test]
    fn test_parse_format_round_trip() {
        let input = "1-10, 88, 100-105";
        let parsed = parse_number_list(input, 1, 300);
        assert_eq!(format_number_list(&parsed), input);
    }
}
