// ==========================================
// 机队持续适航维修管理系统 - 引擎层
// ==========================================
// 依据: CAMO_Core_Spec.md - PART D 引擎体系
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不直接写库; 回放/判定为输入的纯函数,
//       缓存(如有)属于外部失效感知层
// ==========================================

pub mod due_classifier;
pub mod ledger_replay;
pub mod projection;

// 重导出核心引擎
pub use due_classifier::{ComputedDue, DueClassifier, DueLimit, DueThresholds};
pub use ledger_replay::{LedgerReplayEngine, ReplayOutcome};
pub use projection::ProjectionEngine;
