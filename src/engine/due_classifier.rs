// ==========================================
// 机队持续适航维修管理系统 - 到期判定引擎
// ==========================================
// 依据: Due_Engine_Spec_v0.2.md - 2. 判定算法
// 红线: 多限制取最严结果（等级制, 非评分制）;
//       任一管控单位越限, 整个项目即非 OK
// ==========================================
// 职责: 按管控单位计算剩余裕度 + 聚合到期状态
// 输入: MaintenanceItem + Aircraft 当前使用 + 执行履历有无
// 输出: ComputedDue（临时派生, 不落库）
// ==========================================

use crate::domain::aircraft::Aircraft;
use crate::domain::maintenance::MaintenanceItem;
use crate::domain::types::{DueStatus, DueUnit};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ==========================================
// DueThresholds - 临近到期阈值
// ==========================================
// 按单位给定的固定绝对裕度; 存于 config_kv, 此处仅默认值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DueThresholds {
    pub due_soon_hrs: f64,   // 小时阈值
    pub due_soon_cyc: i64,   // 循环阈值
    pub due_soon_days: i64,  // 日历天阈值
}

impl Default for DueThresholds {
    fn default() -> Self {
        Self {
            due_soon_hrs: 10.0,
            due_soon_cyc: 10,
            due_soon_days: 7,
        }
    }
}

// ==========================================
// DueLimit - 单个管控单位的剩余裕度
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueLimit {
    pub unit: DueUnit,   // 管控单位
    pub remaining: f64,  // 剩余裕度（负数=已超期; 天/循环亦以 f64 承载）
}

// ==========================================
// ComputedDue - 到期判定结果（临时派生）
// ==========================================
// 红线: 不落库; 每次查询由当前使用 + 项目口径重算
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputedDue {
    pub item_id: String,              // 项目 ID
    pub title: String,                // 项目名称
    pub limits: Vec<DueLimit>,        // 各管控单位裕度（声明了间隔的单位）
    pub status: DueStatus,            // 聚合状态（最严）
    pub estimated_days: Option<i64>,  // 预计天数（预测引擎填充, 供展示）
}

impl ComputedDue {
    /// 各限制裕度中的最小值（到期列表排序口径）
    pub fn min_remaining(&self) -> f64 {
        self.limits
            .iter()
            .map(|l| l.remaining)
            .fold(f64::INFINITY, f64::min)
    }
}

// ==========================================
// DueClassifier - 到期判定引擎
// ==========================================
pub struct DueClassifier {
    thresholds: DueThresholds,
}

impl DueClassifier {
    /// 创建新的到期判定引擎
    ///
    /// # 参数
    /// - thresholds: 临近到期阈值（来自配置）
    pub fn new(thresholds: DueThresholds) -> Self {
        Self { thresholds }
    }

    /// 判定单个管控单位的状态
    ///
    /// 口径: remaining < 0 → OVERDUE; = 0 → DUE;
    ///       ≤ 阈值 → DUE_SOON; 其余 → OK
    pub fn classify_limit(&self, limit: &DueLimit) -> DueStatus {
        let band = match limit.unit {
            DueUnit::Hours => self.thresholds.due_soon_hrs,
            DueUnit::Cycles => self.thresholds.due_soon_cyc as f64,
            DueUnit::Days => self.thresholds.due_soon_days as f64,
        };

        if limit.remaining < 0.0 {
            DueStatus::Overdue
        } else if limit.remaining == 0.0 {
            DueStatus::Due
        } else if limit.remaining <= band {
            DueStatus::DueSoon
        } else {
            DueStatus::Ok
        }
    }

    /// 计算维修项目的到期判定
    ///
    /// # 参数
    /// - item: 维修项目（任务/定检/部件统一形状）
    /// - aircraft: 当前机体使用（台账回放输出, 只读）
    /// - has_history: 是否有执行履历（决定初始/重复间隔）
    /// - today: 判定日（DAYS 口径基准）
    ///
    /// # 返回
    /// - Some(ComputedDue): 正常判定结果
    /// - None: 项目不独立参与到期列表
    ///   （归入父定检的任务, 或未声明任何管控间隔）
    ///
    /// # 口径
    /// - HOURS:  remaining = (锚点小时 + 有效间隔) - current_hrs
    /// - CYCLES: remaining = (锚点循环 + 有效间隔) - current_cyc
    /// - DAYS:   remaining = (锚点日期 + 有效间隔) - today
    /// - 锚点小时/循环缺失按 0 处理（自新口径）; 锚点日期缺失则
    ///   DAYS 限制无法计算, 该单位不列入
    #[instrument(skip(self, item, aircraft), fields(item_id = %item.item_id))]
    pub fn compute_due(
        &self,
        item: &MaintenanceItem,
        aircraft: &Aircraft,
        has_history: bool,
        today: NaiveDate,
    ) -> Option<ComputedDue> {
        if !item.is_standalone() {
            return None;
        }

        let mut limits = Vec::new();

        if let Some(interval_hrs) = item.intervals.effective_hrs(has_history) {
            let anchor_hrs = item.last_done.hrs.unwrap_or(0.0);
            limits.push(DueLimit {
                unit: DueUnit::Hours,
                remaining: (anchor_hrs + interval_hrs) - aircraft.current_hrs,
            });
        }

        if let Some(interval_cyc) = item.intervals.effective_cyc(has_history) {
            let anchor_cyc = item.last_done.cyc.unwrap_or(0);
            limits.push(DueLimit {
                unit: DueUnit::Cycles,
                remaining: ((anchor_cyc + interval_cyc) - aircraft.current_cyc) as f64,
            });
        }

        if let Some(interval_days) = item.intervals.effective_days(has_history) {
            if let Some(anchor_date) = item.last_done.date {
                let next_due = anchor_date + Duration::days(interval_days);
                limits.push(DueLimit {
                    unit: DueUnit::Days,
                    remaining: (next_due - today).num_days() as f64,
                });
            }
        }

        if limits.is_empty() {
            // 未受任何间隔管控: 不进入到期列表
            return None;
        }

        let status = limits
            .iter()
            .map(|l| self.classify_limit(l))
            .max()
            .unwrap_or(DueStatus::Ok);

        Some(ComputedDue {
            item_id: item.item_id.clone(),
            title: item.title.clone(),
            limits,
            status,
            estimated_days: None,
        })
    }
}

impl Default for DueClassifier {
    fn default() -> Self {
        Self::new(DueThresholds::default())
    }
}
