// ==========================================
// 机队持续适航维修管理系统 - API 层
// ==========================================
// 职责: 面向展示层的业务接口; 编排仓储与引擎
// 红线: API 不实现判定/回放算法, 只做校验与编排
// ==========================================

pub mod due_api;
pub mod error;
pub mod flight_log_api;
pub mod validator;

pub use due_api::{DueApi, ProjectionWindowReport};
pub use error::{ApiError, ApiResult};
pub use flight_log_api::{FlightLogApi, FlightLogSubmission};
pub use validator::FlightLogValidator;
