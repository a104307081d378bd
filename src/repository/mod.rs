// ==========================================
// 机队持续适航维修管理系统 - 数据仓储层
// ==========================================
// 依据: CAMO_Core_Spec.md - PART D 引擎铁律
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod aircraft_repo;
pub mod assembly_repo;
pub mod compliance_repo;
pub mod error;
pub mod flight_log_repo;
pub mod maintenance_item_repo;

pub use aircraft_repo::AircraftRepository;
pub use assembly_repo::AssemblyRepository;
pub use compliance_repo::ComplianceRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use flight_log_repo::FlightLogRepository;
pub use maintenance_item_repo::MaintenanceItemRepository;
