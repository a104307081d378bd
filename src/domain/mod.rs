// ==========================================
// 机队持续适航维修管理系统 - 领域层
// ==========================================
// 依据: CAMO_Core_Spec.md - PART C 数据与状态体系
// 红线: 领域实体不含数据访问逻辑
// ==========================================

pub mod aircraft;
pub mod flight_log;
pub mod maintenance;
pub mod types;

pub use aircraft::{Aircraft, Assembly, UsageBaseline};
pub use flight_log::{
    DqLevel, DqViolation, FlightLogEntry, ImportReport, NewFlightLog, RawTechlogRecord,
    UsageSnapshot,
};
pub use maintenance::{ComplianceRecord, IntervalSet, ItemKind, MaintenanceItem, UsageAnchor};
