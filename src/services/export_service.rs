use chrono::{DateTime, Local, Utc};

use crate::lottery::DrawRecord;

/// 把抽取历史展开成 CSV（每个中奖号码一行）
///
/// 列：序号、中奖号码、抽取时间（本地时区）、奖项。序号跨记录连续，
/// 与原始导出表格一致。纯读操作，不触碰奖池状态。
pub fn history_to_csv(history: &[DrawRecord]) -> String {
    let mut csv = String::from("序号,中奖号码,抽取时间,奖项\n");

    let mut index = 1;
    for record in history {
        let time = format_local(record.timestamp);
        let prize = record.prize.as_deref().unwrap_or("");
        for number in &record.numbers {
            csv.push_str(&format!(
                "{},{},{},{}\n",
                index,
                number,
                csv_field(&time),
                csv_field(prize)
            ));
            index += 1;
        }
    }

    csv
}

/// 把抽取历史格式化为剪贴板文本（每条记录一行）
///
/// 行格式："<序号>. <逗号分隔号码> (<本地时间>)"
pub fn history_to_summary(history: &[DrawRecord]) -> String {
    history
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let numbers = record
                .numbers
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}. {} ({})", index + 1, numbers, format_local(record.timestamp))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 导出文件名（带当天日期）
pub fn export_filename() -> String {
    format!("中奖名单_{}.csv", Local::now().format("%Y-%m-%d"))
}

fn format_local(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y/%m/%d %H:%M:%S")
        .to_string()
}

// 含分隔符或引号的字段加引号转义
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn record(numbers: Vec<i64>, prize: Option<&str>) -> DrawRecord {
        DrawRecord {
            id: Uuid::new_v4(),
            numbers,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 15, 11, 30, 0).unwrap(),
            prize: prize.map(String::from),
        }
    }

    #[test]
    fn test_csv_one_row_per_number() {
        let history = vec![
            record(vec![5], Some("特等奖")),
            record(vec![12, 30, 7], Some("三等奖")),
        ];
        let csv = history_to_csv(&history);
        let lines: Vec<&str> = csv.trim_end().lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "序号,中奖号码,抽取时间,奖项");
        assert!(lines[1].starts_with("1,5,"));
        assert!(lines[1].ends_with("特等奖"));
        // 序号跨记录连续
        assert!(lines[2].starts_with("2,12,"));
        assert!(lines[4].starts_with("4,7,"));
    }

    #[test]
    fn test_csv_empty_history() {
        let csv = history_to_csv(&[]);
        assert_eq!(csv.trim_end().lines().count(), 1);
    }

    #[test]
    fn test_csv_escapes_prize_with_comma() {
        let history = vec![record(vec![1], Some("一等奖,大礼包"))];
        let csv = history_to_csv(&history);
        assert!(csv.contains("\"一等奖,大礼包\""));
    }

    #[test]
    fn test_summary_one_line_per_record() {
        let history = vec![
            record(vec![5], None),
            record(vec![12, 30], Some("二等奖")),
        ];
        let summary = history_to_summary(&history);
        let lines: Vec<&str> = summary.lines().collect();
        let time = format_local(history[0].timestamp);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("1. 5 ({time})"));
        assert_eq!(lines[1], format!("2. 12, 30 ({time})"));
    }

    #[test]
    fn test_summary_empty_history() {
        assert_eq!(history_to_summary(&[]), "");
    }

    #[test]
    fn test_export_filename_has_date_suffix() {
        let name = export_filename();
        assert!(name.starts_with("中奖名单_"));
        assert!(name.ends_with(".csv"));
    }
}
