// ==========================================
// 机队持续适航维修管理系统 - 导入层
// ==========================================
// 依据: Techlog_Import_Spec.md - 1. 导入主流程
// 职责: 外部技术日志数据导入, 经 DQ 校验后进入台账回放链路
// 支持: CSV
// ==========================================

// 模块声明
pub mod dq_validator;
pub mod error;
pub mod techlog_importer;
pub mod techlog_parser;

// 重导出核心类型
pub use dq_validator::TechlogDqValidator;
pub use error::{ImportError, ImportResult};
pub use techlog_importer::TechlogImporter;
pub use techlog_parser::CsvTechlogParser;
