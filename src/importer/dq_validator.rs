// ==========================================
// 机队持续适航维修管理系统 - 数据质量校验器
// ==========================================
// 依据: Techlog_Import_Spec.md - 4. 数据质量规则
// 职责: 必填 / 数值范围 / 批内重复 / 一致性校验 + DQ 报告
// 口径: ERROR 阻断该行, WARNING 导入但记录
// ==========================================

use crate::domain::{DqLevel, DqViolation, RawTechlogRecord};
use chrono::NaiveDate;
use std::collections::HashSet;

pub struct TechlogDqValidator;

impl TechlogDqValidator {
    pub fn new() -> Self {
        Self
    }

    /// 批量校验: 逐行规则 + 批内重复
    pub fn validate_batch(
        &self,
        records: &[RawTechlogRecord],
        today: NaiveDate,
    ) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        for record in records {
            violations.extend(self.validate_required(record));
            violations.extend(self.validate_ranges(record));
            violations.extend(self.validate_consistency(record, today));
        }

        violations.extend(self.validate_duplicates(records));
        violations
    }

    /// 必填字段校验（缺失即阻断: 台账事件不可补默认值）
    fn validate_required(&self, record: &RawTechlogRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        if record.date.is_none() {
            violations.push(DqViolation {
                row_number: record.row_number,
                field: "date".to_string(),
                level: DqLevel::Error,
                message: "飞行日期缺失或格式错误（期望 YYYY-MM-DD）".to_string(),
            });
        }

        if record.block_hrs.is_none() {
            violations.push(DqViolation {
                row_number: record.row_number,
                field: "block_hrs".to_string(),
                level: DqLevel::Error,
                message: "轮挡小时缺失或非数值".to_string(),
            });
        }

        if record.cycles.is_none() {
            violations.push(DqViolation {
                row_number: record.row_number,
                field: "cycles".to_string(),
                level: DqLevel::Error,
                message: "起落循环缺失或非整数".to_string(),
            });
        }

        violations
    }

    /// 数值范围校验
    fn validate_ranges(&self, record: &RawTechlogRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        if let Some(block_hrs) = record.block_hrs {
            if block_hrs < 0.0 || !block_hrs.is_finite() {
                violations.push(DqViolation {
                    row_number: record.row_number,
                    field: "block_hrs".to_string(),
                    level: DqLevel::Error,
                    message: format!("轮挡小时非法: {}", block_hrs),
                });
            } else if block_hrs > 20.0 {
                violations.push(DqViolation {
                    row_number: record.row_number,
                    field: "block_hrs".to_string(),
                    level: DqLevel::Warning,
                    message: format!("轮挡小时异常偏大: {:.1}，可能单位错误", block_hrs),
                });
            }
        }

        if let Some(cycles) = record.cycles {
            if cycles < 0 {
                violations.push(DqViolation {
                    row_number: record.row_number,
                    field: "cycles".to_string(),
                    level: DqLevel::Error,
                    message: format!("起落循环为负数: {}", cycles),
                });
            }
        }

        if let Some(override_hrs) = record.check_override_hrs {
            if override_hrs < 0.0 || !override_hrs.is_finite() {
                violations.push(DqViolation {
                    row_number: record.row_number,
                    field: "check_override_hrs".to_string(),
                    level: DqLevel::Error,
                    message: format!("定检覆写小时非法: {}", override_hrs),
                });
            }
        }

        violations
    }

    /// 一致性校验（事件修饰标记之间的约束）
    fn validate_consistency(
        &self,
        record: &RawTechlogRecord,
        today: NaiveDate,
    ) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        // 红线: 延期标记必须携带覆写值, 否则倒计数语义不成立
        if record.is_extension && record.check_override_hrs.is_none() {
            violations.push(DqViolation {
                row_number: record.row_number,
                field: "is_extension".to_string(),
                level: DqLevel::Error,
                message: "延期标记缺少定检覆写小时".to_string(),
            });
        }

        if let Some(date) = record.date {
            if date > today {
                violations.push(DqViolation {
                    row_number: record.row_number,
                    field: "date".to_string(),
                    level: DqLevel::Warning,
                    message: format!("飞行日期晚于当前日期: {}", date),
                });
            }
        }

        violations
    }

    /// 批内技术记录本编号重复校验
    fn validate_duplicates(&self, records: &[RawTechlogRecord]) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for record in records {
            if let Some(techlog_no) = &record.techlog_no {
                if !seen.insert(techlog_no.clone()) {
                    violations.push(DqViolation {
                        row_number: record.row_number,
                        field: "techlog_no".to_string(),
                        level: DqLevel::Error,
                        message: format!("技术记录本编号重复（同批次内）: {}", techlog_no),
                    });
                }
            }
        }

        violations
    }
}

impl Default for TechlogDqValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row_number: usize) -> RawTechlogRecord {
        RawTechlogRecord {
            date: NaiveDate::from_ymd_opt(2026, 3, 1),
            block_hrs: Some(2.5),
            cycles: Some(3),
            from_icao: None,
            to_icao: None,
            techlog_no: None,
            pilot: None,
            remarks: None,
            cofa_reset: false,
            check_override_hrs: None,
            is_extension: false,
            row_number,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_valid_record_passes() {
        let validator = TechlogDqValidator::new();
        assert!(validator.validate_batch(&[record(2)], today()).is_empty());
    }

    #[test]
    fn test_missing_required_fields_block() {
        let validator = TechlogDqValidator::new();
        let mut r = record(2);
        r.date = None;
        r.block_hrs = None;

        let violations = validator.validate_batch(&[r], today());
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.level == DqLevel::Error));
    }

    #[test]
    fn test_extension_without_override_blocks() {
        let validator = TechlogDqValidator::new();
        let mut r = record(2);
        r.is_extension = true;

        let violations = validator.validate_batch(&[r], today());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "is_extension");
        assert_eq!(violations[0].level, DqLevel::Error);
    }

    #[test]
    fn test_duplicate_techlog_no_in_batch() {
        let validator = TechlogDqValidator::new();
        let mut a = record(2);
        a.techlog_no = Some("TLB-100".to_string());
        let mut b = record(3);
        b.techlog_no = Some("TLB-100".to_string());

        let violations = validator.validate_batch(&[a, b], today());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].row_number, 3);
    }

    #[test]
    fn test_future_date_is_warning_only() {
        let validator = TechlogDqValidator::new();
        let mut r = record(2);
        r.date = NaiveDate::from_ymd_opt(2026, 4, 1);

        let violations = validator.validate_batch(&[r], today());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].level, DqLevel::Warning);
    }
}
