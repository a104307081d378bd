// ==========================================
// 机队持续适航维修管理系统 - 飞行记录领域模型
// ==========================================
// 依据: Usage_Ledger_Spec_v0.2.md - 1. 台账事件口径
// 红线: 台账只追加, 不改写不重排; 日期相同按插入顺序定序
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// UsageSnapshot - 回放后的 state-at-time 快照
// ==========================================
// 用途: 固化到每条飞行记录上, 同时写入 aircraft 当前状态
// 说明: 发动机 TSO/CSO 在翻修事件建模前恒为基准值;
//       螺旋桨 TSO 随飞行累计（期初未翻修归零）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub aircraft_hrs: f64,     // 机体累计小时
    pub aircraft_cyc: i64,     // 机体累计循环
    pub engine_tsn: f64,       // 发动机自新小时
    pub engine_csn: i64,       // 发动机自新循环
    pub engine_tso: f64,       // 发动机翻修后小时
    pub engine_cso: i64,       // 发动机翻修后循环
    pub engine_oh: f64,        // 发动机距翻修剩余小时
    pub prop_tsn: f64,         // 螺旋桨自新小时
    pub prop_tso: f64,         // 螺旋桨翻修后小时
    pub prop_oh: f64,          // 螺旋桨距翻修剩余小时
    pub cofa_hours: f64,       // 适航证小时计数
    pub hours_to_check: f64,   // 距下次定检剩余小时
}

// ==========================================
// FlightLogEntry - 台账事件（不可变）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightLogEntry {
    // ===== 主键与关联 =====
    pub entry_id: String,                 // 事件 ID（UUID）
    pub aircraft_id: String,              // 所属飞机（FK）

    // ===== 飞行数据 =====
    pub date: NaiveDate,                  // 飞行日期
    pub block_hrs: f64,                   // 轮挡小时
    pub cycles: i64,                      // 起落循环
    pub from_icao: Option<String>,        // 起飞机场
    pub to_icao: Option<String>,          // 降落机场
    pub techlog_no: Option<String>,       // 技术记录本编号
    pub pilot: Option<String>,            // 机长
    pub remarks: Option<String>,          // 备注

    // ===== 事件修饰（影响倒计数的标记）=====
    pub cofa_reset: bool,                 // 适航证检查: 小时计数在本事件起点归零
    pub check_override_hrs: Option<f64>,  // 定检剩余小时覆写值
    pub is_extension: bool,               // true=延期（加回），false=完成定检（替换）

    // ===== 回放固化值 =====
    pub snapshot: Option<UsageSnapshot>,  // state-at-time（每次回放重写）

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,        // 录入时间（定义同日事件顺序）
}

// ==========================================
// NewFlightLog - 飞行记录提交输入
// ==========================================
// 用途: API 层提交表单; 校验通过后生成 FlightLogEntry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFlightLog {
    pub aircraft_id: String,
    pub date: NaiveDate,
    pub block_hrs: f64,
    pub cycles: i64,
    pub from_icao: Option<String>,
    pub to_icao: Option<String>,
    pub techlog_no: Option<String>,
    pub pilot: Option<String>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub cofa_reset: bool,
    pub check_override_hrs: Option<f64>,
    #[serde(default)]
    pub is_extension: bool,
}

// ==========================================
// RawTechlogRecord - 导入中间结构体
// ==========================================
// 用途: CSV 技术日志导入管道中间产物（文件解析 → 此结构 → DQ 校验）
// 生命周期: 仅在导入流程内
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTechlogRecord {
    // 源字段（已类型转换, 转换失败为 None）
    pub date: Option<NaiveDate>,
    pub block_hrs: Option<f64>,
    pub cycles: Option<i64>,
    pub from_icao: Option<String>,
    pub to_icao: Option<String>,
    pub techlog_no: Option<String>,
    pub pilot: Option<String>,
    pub remarks: Option<String>,
    pub cofa_reset: bool,
    pub check_override_hrs: Option<f64>,
    pub is_extension: bool,

    // 元信息
    pub row_number: usize, // 原始文件行号（用于 DQ 报告）
}

// ==========================================
// DQ 校验结果
// ==========================================

/// DQ 违规等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,   // 阻断: 该行不导入
    Warning, // 警告: 导入但记录
}

/// 单条 DQ 违规
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,
    pub field: String,
    pub level: DqLevel,
    pub message: String,
}

// ==========================================
// ImportReport - 导入批次报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,              // 批次 ID（UUID）
    pub aircraft_id: String,           // 目标飞机
    pub file_name: Option<String>,     // 源文件名
    pub total_rows: usize,             // 总行数
    pub imported_rows: usize,          // 成功导入行数
    pub blocked_rows: usize,           // 阻断行数（DQ ERROR）
    pub warning_rows: usize,           // 警告行数（DQ WARNING）
    pub violations: Vec<DqViolation>,  // 全部违规明细
    pub elapsed_ms: i64,               // 导入耗时（毫秒）
}
