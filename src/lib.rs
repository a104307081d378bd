// ==========================================
// 机队持续适航维修管理系统 - 核心库
// ==========================================
// 依据: CAMO_Core_Spec.md - 系统宪法
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (放行决定权归持证人员)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AircraftStatus, AssemblyKind, DueStatus, DueUnit, TaskType};

// 领域实体
pub use domain::{
    Aircraft, Assembly, ComplianceRecord, FlightLogEntry, IntervalSet, ItemKind,
    MaintenanceItem, NewFlightLog, UsageAnchor, UsageBaseline, UsageSnapshot,
};

// 引擎
pub use engine::{
    ComputedDue, DueClassifier, DueLimit, DueThresholds, LedgerReplayEngine,
    ProjectionEngine, ReplayOutcome,
};

// API
pub use api::{DueApi, FlightLogApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "机队持续适航维修管理系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 预编译检查
// ==========================================

// 确保编译时所有模块可见
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
