// ==========================================
// 机队持续适航维修管理系统 - 使用配置读取 Trait
// ==========================================
// 依据: CAMO_Core_Spec.md - PART E 工程结构
// 职责: 定义引擎/API 所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::aircraft::UsageBaseline;
use crate::engine::due_classifier::DueThresholds;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// UsageConfigReader Trait
// ==========================================
// 用途: 台账回放与到期判定所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait UsageConfigReader: Send + Sync {
    /// 获取某机的使用基准快照
    ///
    /// # 返回
    /// - Some(UsageBaseline): 该机已配置基准
    /// - None: 未配置（该机禁止录入飞行记录）
    async fn get_usage_baseline(
        &self,
        aircraft_id: &str,
    ) -> Result<Option<UsageBaseline>, Box<dyn Error>>;

    /// 获取临近到期阈值组合
    ///
    /// # 默认值
    /// - 10 小时 / 10 循环 / 7 天
    async fn get_due_thresholds(&self) -> Result<DueThresholds, Box<dyn Error>>;

    /// 获取预测窗口列表（天）
    ///
    /// # 默认值
    /// - [30, 60, 90]
    async fn get_projection_windows(&self) -> Result<Vec<i64>, Box<dyn Error>>;
}
