// ==========================================
// 机队持续适航维修管理系统 - 飞机领域模型
// ==========================================
// 依据: CAMO_Core_Spec.md - PART C 数据与状态体系
// 依据: Usage_Ledger_Spec_v0.2.md - aircraft/assembly 字段口径
// ==========================================

use crate::domain::types::{AircraftStatus, AssemblyKind};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Aircraft - 飞机主数据 + 当前累计状态
// ==========================================
// 红线: 累计状态字段 (current_*/cofa_hours/hours_to_check/engine_oh/prop_oh)
//       由台账回放引擎独占写入, 其他模块只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    // ===== 主键与标识 =====
    pub aircraft_id: String,          // 飞机唯一标识
    pub registration: String,         // 注册号（如 5H-AAF）
    pub aircraft_type: String,        // 机型（如 C208B）
    pub msn: Option<String>,          // 制造序列号
    pub status: AircraftStatus,       // 运营状态
    pub base: Option<String>,         // 驻地

    // ===== 当前累计状态（台账回放输出）=====
    pub current_hrs: f64,             // 机体累计小时 (TSN)
    pub current_cyc: i64,             // 机体累计循环 (CSN)
    pub current_date: Option<NaiveDate>, // 最近台账事件日期

    // ===== 日均利用率（仅预测引擎使用）=====
    pub avg_daily_hrs: f64,           // 日均飞行小时
    pub avg_daily_cyc: f64,           // 日均起落循环

    // ===== 派生倒计数（台账回放输出）=====
    pub cofa_hours: Option<f64>,      // 适航证小时计数（检查事件归零后累计）
    pub hours_to_check: Option<f64>,  // 距下次定检剩余小时
    pub engine_oh: Option<f64>,       // 发动机距翻修剩余小时
    pub prop_oh: Option<f64>,         // 螺旋桨距翻修剩余小时

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,    // 记录创建时间
    pub updated_at: DateTime<Utc>,    // 记录更新时间
}

// ==========================================
// Assembly - 装机件（发动机/螺旋桨）
// ==========================================
// 红线: tsn_hrs/csn 为派生列, 每次台账回放后按
//       tsn = aircraft.current_hrs - tso / csn = aircraft.current_cyc - cso
//       重新推导, 禁止独立累加
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assembly {
    pub assembly_id: String,              // 装机件唯一标识
    pub aircraft_id: String,              // 所属飞机（FK）
    pub kind: AssemblyKind,               // 发动机 / 螺旋桨
    pub position: Option<String>,         // 安装位置（L/R/C）
    pub model: Option<String>,            // 型号
    pub serial: Option<String>,           // 序号
    pub tsn_hrs: f64,                     // 自新小时（派生）
    pub csn: i64,                         // 自新循环（派生）
    pub tso_hrs: f64,                     // 翻修后小时基准
    pub cso: i64,                         // 翻修后循环基准
    pub last_overhaul_date: Option<NaiveDate>, // 上次翻修日期
    pub tbo_hrs: Option<f64>,             // 翻修间隔（小时）
    pub updated_at: DateTime<Utc>,        // 记录更新时间
}

// ==========================================
// UsageBaseline - 使用基准快照（期初常量）
// ==========================================
// 用途: 台账回放的起点; 每机一份, 存于 config_kv
//       (usage_baseline/{aircraft_id}), 不得硬编码
// 对齐: Usage_Ledger_Spec_v0.2.md - 2.1 基准口径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageBaseline {
    pub epoch_date: NaiveDate,    // 基准日期（此前的使用不在台账内）
    pub aircraft_hrs: f64,        // 机体累计小时基准
    pub aircraft_cyc: i64,        // 机体累计循环基准
    pub engine_tsn: f64,          // 发动机自新小时基准
    pub engine_csn: i64,          // 发动机自新循环基准
    pub engine_tso: f64,          // 发动机翻修后小时基准（翻修前恒为基准值）
    pub engine_cso: i64,          // 发动机翻修后循环基准
    pub engine_oh: f64,           // 发动机距翻修剩余小时基准
    pub prop_tsn: f64,            // 螺旋桨自新小时基准
    pub prop_tso: f64,            // 螺旋桨翻修后小时基准（随飞行累计）
    pub prop_oh: f64,             // 螺旋桨距翻修剩余小时基准
    pub cofa_hours: f64,          // 适航证小时计数基准
    pub hours_to_check: f64,      // 距下次定检剩余小时基准
}
