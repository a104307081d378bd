// ==========================================
// 机队持续适航维修管理系统 - 维修项目领域模型
// ==========================================
// 依据: Due_Engine_Spec_v0.2.md - 1. 项目统一建模
// 红线: 任务/定检/部件统一为 "间隔 + 锚点" 归一形状,
//       到期判定引擎不感知项目种类差异
// ==========================================

use crate::domain::types::TaskType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// IntervalSet - 管控间隔集合
// ==========================================
// 每个管控单位各有"初始间隔"与"重复间隔";
// 历史数据只有单一间隔时, 初始/重复取同值（legacy 口径）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalSet {
    pub initial_hrs: Option<f64>,   // 初始间隔（小时）
    pub initial_cyc: Option<i64>,   // 初始间隔（循环）
    pub initial_days: Option<i64>,  // 初始间隔（天）
    pub repeat_hrs: Option<f64>,    // 重复间隔（小时）
    pub repeat_cyc: Option<i64>,    // 重复间隔（循环）
    pub repeat_days: Option<i64>,   // 重复间隔（天）
}

impl IntervalSet {
    /// 由 legacy 单一间隔构造（初始 = 重复）
    pub fn single(hrs: Option<f64>, cyc: Option<i64>, days: Option<i64>) -> Self {
        Self {
            initial_hrs: hrs,
            initial_cyc: cyc,
            initial_days: days,
            repeat_hrs: hrs,
            repeat_cyc: cyc,
            repeat_days: days,
        }
    }

    /// 有效小时间隔: 有执行履历取重复间隔, 否则取初始间隔;
    /// 所取侧缺失时回落到另一侧（legacy 单间隔兼容）
    pub fn effective_hrs(&self, has_history: bool) -> Option<f64> {
        if has_history {
            self.repeat_hrs.or(self.initial_hrs)
        } else {
            self.initial_hrs.or(self.repeat_hrs)
        }
    }

    /// 有效循环间隔（口径同 effective_hrs）
    pub fn effective_cyc(&self, has_history: bool) -> Option<i64> {
        if has_history {
            self.repeat_cyc.or(self.initial_cyc)
        } else {
            self.initial_cyc.or(self.repeat_cyc)
        }
    }

    /// 有效日历天间隔（口径同 effective_hrs）
    pub fn effective_days(&self, has_history: bool) -> Option<i64> {
        if has_history {
            self.repeat_days.or(self.initial_days)
        } else {
            self.initial_days.or(self.repeat_days)
        }
    }

    /// 是否未声明任何管控单位
    pub fn is_empty(&self) -> bool {
        self.initial_hrs.is_none()
            && self.initial_cyc.is_none()
            && self.initial_days.is_none()
            && self.repeat_hrs.is_none()
            && self.repeat_cyc.is_none()
            && self.repeat_days.is_none()
    }
}

// ==========================================
// UsageAnchor - 上次完成锚点
// ==========================================
// 任务/定检: 上次执行时的日期与机体使用;
// 部件: 安装日期与安装时机体使用（installed_at 口径统一到此处）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageAnchor {
    pub date: Option<NaiveDate>, // 上次完成/安装日期
    pub hrs: Option<f64>,        // 完成/安装时机体小时
    pub cyc: Option<i64>,        // 完成/安装时机体循环
}

// ==========================================
// ItemKind - 项目种类（带标签变体）
// ==========================================
// 红线: 种类差异只体现在归属/排除规则, 不改变判定算法
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    /// 工作项目; check_id 非空时归入父定检, 不独立列出到期
    Task {
        task_type: TaskType,
        check_id: Option<String>,
    },
    /// 定检（可作为任务的父项）
    Check,
    /// 部件（件号/序号; 锚点为安装口径）
    Component {
        part_no: Option<String>,
        serial_no: Option<String>,
    },
}

// ==========================================
// MaintenanceItem - 维修项目（统一实体）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceItem {
    // ===== 主键与关联 =====
    pub item_id: String,            // 项目唯一标识
    pub aircraft_id: String,        // 所属飞机（FK）

    // ===== 基础信息 =====
    pub title: String,              // 项目名称
    pub reference: Option<String>,  // 依据文件号（AMP 章节/AD 号等）
    pub kind: ItemKind,             // 项目种类

    // ===== 管控口径 =====
    pub intervals: IntervalSet,     // 管控间隔集合
    pub last_done: UsageAnchor,     // 上次完成/安装锚点

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,  // 记录创建时间
    pub updated_at: DateTime<Utc>,  // 记录更新时间
}

impl MaintenanceItem {
    /// 是否独立参与到期列表
    ///
    /// 归入父定检的任务 (check_id 非空) 由父定检统一承载, 不独立判定
    pub fn is_standalone(&self) -> bool {
        !matches!(
            &self.kind,
            ItemKind::Task {
                check_id: Some(_),
                ..
            }
        )
    }
}

// ==========================================
// ComplianceRecord - 执行履历
// ==========================================
// 用途: "标记完成"写入; 判定引擎据此选择初始/重复间隔
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub record_id: String,          // 履历 ID（UUID）
    pub item_id: String,            // 维修项目（FK）
    pub aircraft_id: String,        // 所属飞机（FK）
    pub date: NaiveDate,            // 执行日期
    pub hrs_at: Option<f64>,        // 执行时机体小时
    pub cyc_at: Option<i64>,        // 执行时机体循环
    pub remark: Option<String>,     // 备注
    pub created_at: DateTime<Utc>,  // 记录创建时间
}
