// ==========================================
// 机队持续适航维修管理系统 - 到期预测引擎
// ==========================================
// 依据: Due_Engine_Spec_v0.2.md - 3. 预测窗口
// ==========================================
// 职责: 将小时/循环裕度按日均利用率折算为预计天数,
//       回答"未来 N 天内是否到期"
// 输入: ComputedDue + Aircraft 日均利用率
// 输出: 预计天数 / 窗口命中
// ==========================================
// 说明: 利用率取局部线性假设（近期均值延续）,
//       输出是估计而非保证, 展示层须如实标注
// ==========================================

use crate::domain::aircraft::Aircraft;
use crate::domain::types::DueUnit;
use crate::engine::due_classifier::ComputedDue;

// ==========================================
// ProjectionEngine - 到期预测引擎
// ==========================================
pub struct ProjectionEngine;

impl ProjectionEngine {
    /// 创建新的预测引擎
    pub fn new() -> Self {
        Self
    }

    /// 估计项目距到期的天数（各可折算限制的最小值）
    ///
    /// # 口径
    /// - DAYS 限制: 直接取剩余天数
    /// - HOURS/CYCLES 限制: remaining / 日均利用率, 向上取整
    /// - 日均利用率为 0 或缺失: 该单位不可折算, 从预测中排除
    ///   （定义性回退, 非错误 — 预测本身是建议性输出）
    ///
    /// # 返回
    /// - Some(days): 可预测, 负值表示已越限
    /// - None: 无任何可折算限制
    pub fn estimated_days(&self, due: &ComputedDue, aircraft: &Aircraft) -> Option<i64> {
        let mut estimate: Option<i64> = None;

        for limit in &due.limits {
            let days = match limit.unit {
                DueUnit::Days => Some(limit.remaining as i64),
                DueUnit::Hours if aircraft.avg_daily_hrs > 0.0 => {
                    Some((limit.remaining / aircraft.avg_daily_hrs).ceil() as i64)
                }
                DueUnit::Cycles if aircraft.avg_daily_cyc > 0.0 => {
                    Some((limit.remaining / aircraft.avg_daily_cyc).ceil() as i64)
                }
                // 利用率缺失: 该单位排除
                _ => None,
            };

            if let Some(d) = days {
                estimate = Some(match estimate {
                    Some(prev) => prev.min(d),
                    None => d,
                });
            }
        }

        estimate
    }

    /// 项目是否预计在 window_days 天内到期
    ///
    /// 单调性: 对固定输入, 命中集合随 window_days 单调扩大
    pub fn in_projection_window(
        &self,
        due: &ComputedDue,
        aircraft: &Aircraft,
        window_days: i64,
    ) -> bool {
        match self.estimated_days(due, aircraft) {
            Some(days) => days <= window_days,
            None => false,
        }
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new()
    }
}
