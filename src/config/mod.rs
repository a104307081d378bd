// ==========================================
// 机队持续适航维修管理系统 - 配置层
// ==========================================
// 依据: CAMO_Core_Spec.md - PART E 工程结构
// 红线: 使用基准 (UsageBaseline) 是配置而非代码,
//       禁止在引擎中硬编码任何机队期初数值
// ==========================================

pub mod config_manager;
pub mod usage_config_trait;

pub use config_manager::ConfigManager;
pub use usage_config_trait::UsageConfigReader;

/// 配置键常量
pub mod config_keys {
    /// 每机使用基准（JSON, scope 为 global, 键带 aircraft_id 后缀）
    pub const USAGE_BASELINE_PREFIX: &str = "usage_baseline/";

    /// 临近到期阈值 - 小时
    pub const DUE_SOON_HOURS: &str = "due_soon_threshold_hours";
    /// 临近到期阈值 - 循环
    pub const DUE_SOON_CYCLES: &str = "due_soon_threshold_cycles";
    /// 临近到期阈值 - 日历天
    pub const DUE_SOON_DAYS: &str = "due_soon_threshold_days";

    /// 预测窗口列表（JSON 数组, 天）
    pub const PROJECTION_WINDOWS: &str = "projection_window_days";
}
