// ==========================================
// 机队持续适航维修管理系统 - 领域类型定义
// ==========================================
// 依据: CAMO_Core_Spec.md - PART A2 红线
// 依据: Due_Engine_Spec_v0.2.md - 0.2 到期状态体系
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 到期状态 (Due Status)
// ==========================================
// 红线: 等级制,不是评分制; 多限制取最严结果
// 序列化格式: SCREAMING_SNAKE_CASE (与前端展示一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DueStatus {
    Ok,       // 正常
    DueSoon,  // 临近到期
    Due,      // 到期
    Overdue,  // 超期
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::Ok => write!(f, "OK"),
            DueStatus::DueSoon => write!(f, "DUE_SOON"),
            DueStatus::Due => write!(f, "DUE"),
            DueStatus::Overdue => write!(f, "OVERDUE"),
        }
    }
}

// ==========================================
// 管控单位 (Due Unit)
// ==========================================
// 一个维修项目可同时受多个单位管控 (小时/循环/日历天)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DueUnit {
    Hours,  // 飞行小时
    Cycles, // 起落循环
    Days,   // 日历天
}

impl fmt::Display for DueUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueUnit::Hours => write!(f, "HOURS"),
            DueUnit::Cycles => write!(f, "CYCLES"),
            DueUnit::Days => write!(f, "DAYS"),
        }
    }
}

// ==========================================
// 飞机运营状态 (Aircraft Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AircraftStatus {
    InService,    // 运营中
    OutOfService, // 退出运营
}

impl fmt::Display for AircraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AircraftStatus::InService => write!(f, "IN_SERVICE"),
            AircraftStatus::OutOfService => write!(f, "OUT_OF_SERVICE"),
        }
    }
}

// ==========================================
// 装机件类型 (Assembly Kind)
// ==========================================
// 单发机队假设: 每机一台发动机 + 一副螺旋桨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssemblyKind {
    Engine,    // 发动机
    Propeller, // 螺旋桨
}

impl fmt::Display for AssemblyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyKind::Engine => write!(f, "ENGINE"),
            AssemblyKind::Propeller => write!(f, "PROPELLER"),
        }
    }
}

// ==========================================
// 任务类型 (Task Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Inspection, // 检查
    Overhaul,   // 翻修
    Ad,         // 适航指令
    Sb,         // 服务通告
    Custom,     // 自定义
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskType::Inspection => write!(f, "INSPECTION"),
            TaskType::Overhaul => write!(f, "OVERHAUL"),
            TaskType::Ad => write!(f, "AD"),
            TaskType::Sb => write!(f, "SB"),
            TaskType::Custom => write!(f, "CUSTOM"),
        }
    }
}

// ==========================================
// 字符串解析（数据库 TEXT 列 → 枚举）
// ==========================================

impl DueUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "HOURS" => Some(DueUnit::Hours),
            "CYCLES" => Some(DueUnit::Cycles),
            "DAYS" => Some(DueUnit::Days),
            _ => None,
        }
    }
}

impl AircraftStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IN_SERVICE" => Some(AircraftStatus::InService),
            "OUT_OF_SERVICE" => Some(AircraftStatus::OutOfService),
            _ => None,
        }
    }
}

impl AssemblyKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ENGINE" => Some(AssemblyKind::Engine),
            "PROPELLER" => Some(AssemblyKind::Propeller),
            _ => None,
        }
    }
}

impl TaskType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INSPECTION" => Some(TaskType::Inspection),
            "OVERHAUL" => Some(TaskType::Overhaul),
            "AD" => Some(TaskType::Ad),
            "SB" => Some(TaskType::Sb),
            "CUSTOM" => Some(TaskType::Custom),
            _ => None,
        }
    }
}
