// ==========================================
// 机队持续适航维修管理系统 - 输入校验器
// ==========================================
// 职责: 飞行记录提交的入口校验
// 红线: 校验失败在回放前拒绝, 不产生任何部分状态
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::flight_log::NewFlightLog;

// ==========================================
// FlightLogValidator - 飞行记录校验器
// ==========================================
pub struct FlightLogValidator;

impl FlightLogValidator {
    /// 校验飞行记录提交输入
    ///
    /// # 规则
    /// - aircraft_id 非空
    /// - block_hrs 为有限非负数
    /// - cycles 非负
    /// - 覆写小时（如有）为有限非负数
    /// - is_extension 必须伴随覆写值
    pub fn validate(input: &NewFlightLog) -> ApiResult<()> {
        if input.aircraft_id.trim().is_empty() {
            return Err(ApiError::FieldValueError {
                field: "aircraft_id".to_string(),
                message: "飞机标识不能为空".to_string(),
            });
        }

        if !input.block_hrs.is_finite() || input.block_hrs < 0.0 {
            return Err(ApiError::FieldValueError {
                field: "block_hrs".to_string(),
                message: format!("轮挡小时必须为非负数: {}", input.block_hrs),
            });
        }

        if input.cycles < 0 {
            return Err(ApiError::FieldValueError {
                field: "cycles".to_string(),
                message: format!("起落循环必须为非负数: {}", input.cycles),
            });
        }

        if let Some(override_hrs) = input.check_override_hrs {
            if !override_hrs.is_finite() || override_hrs < 0.0 {
                return Err(ApiError::FieldValueError {
                    field: "check_override_hrs".to_string(),
                    message: format!("定检覆写小时必须为非负数: {}", override_hrs),
                });
            }
        } else if input.is_extension {
            return Err(ApiError::InvalidInput(
                "延期标记必须伴随定检覆写小时".to_string(),
            ));
        }

        Ok(())
    }
}
