// ==========================================
// 机队持续适航维修管理系统 - 技术日志文件解析器
// ==========================================
// 依据: Techlog_Import_Spec.md - 2. 文件读取与字段映射
// 支持: CSV (.csv)
// ==========================================

use crate::domain::RawTechlogRecord;
use crate::importer::error::{ImportError, ImportResult};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// CsvTechlogParser - CSV 技术日志解析器
// ==========================================
// 职责: 文件 → 按表头取值 → 类型转换（失败置 None, 交由 DQ 校验报告）
pub struct CsvTechlogParser;

impl CsvTechlogParser {
    pub fn new() -> Self {
        Self
    }

    /// 解析 CSV 文件为原始技术日志记录
    ///
    /// # 参数
    /// - file_path: CSV 文件路径（.csv）
    ///
    /// # 返回
    /// - Ok(Vec<RawTechlogRecord>): 逐行原始记录（含行号, 全空行跳过）
    /// - Err(ImportError): 文件不存在 / 格式不支持 / 解析失败
    pub fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawTechlogRecord>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        if let Some(ext) = file_path.extension() {
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            // 行号按数据行计: 表头为第 1 行
            records.push(Self::map_row(&row_map, row_idx + 2));
        }

        Ok(records)
    }

    /// 按表头映射单行（别名兼容常见导出表头）
    fn map_row(row: &HashMap<String, String>, row_number: usize) -> RawTechlogRecord {
        RawTechlogRecord {
            date: get_str(row, &["date", "flight_date"]).and_then(|s| parse_date(&s)),
            block_hrs: get_str(row, &["block_hrs", "block_hours", "hours"])
                .and_then(|s| s.parse::<f64>().ok()),
            cycles: get_str(row, &["cycles", "landings"]).and_then(|s| s.parse::<i64>().ok()),
            from_icao: get_str(row, &["from", "from_icao", "dep"]),
            to_icao: get_str(row, &["to", "to_icao", "arr"]),
            techlog_no: get_str(row, &["techlog_no", "techlog", "tlb_no"]),
            pilot: get_str(row, &["pilot", "captain"]),
            remarks: get_str(row, &["remarks", "remark"]),
            cofa_reset: get_str(row, &["cofa_reset"])
                .map(|s| parse_flag(&s))
                .unwrap_or(false),
            check_override_hrs: get_str(row, &["check_override_hrs", "check_override"])
                .and_then(|s| s.parse::<f64>().ok()),
            is_extension: get_str(row, &["is_extension", "extension"])
                .map(|s| parse_flag(&s))
                .unwrap_or(false),
            row_number,
        }
    }
}

impl Default for CsvTechlogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// 取首个命中的非空表头值
fn get_str(row: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .find(|v| !v.is_empty())
        .cloned()
}

/// 日期解析: 仅接受 YYYY-MM-DD
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// 布尔标记解析: 1/true/yes/y 视为 true（不区分大小写）
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("Yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_parse_date_strict_format() {
        assert_eq!(
            parse_date("2026-03-15"),
            NaiveDate::from_ymd_opt(2026, 3, 15)
        );
        assert_eq!(parse_date("15/03/2026"), None);
    }
}
