// ==========================================
// 机队持续适航维修管理系统 - 使用台账回放引擎
// ==========================================
// 依据: Usage_Ledger_Spec_v0.2.md - 2. 回放算法
// 红线: 累计状态只能由回放产生, 禁止增量修补;
//       适航证/定检倒计数用前向折叠实现
//       (标记事件处归零/覆写), 禁止每次查询反向扫描
// ==========================================
// 职责: 从使用基准折叠有序台账, 产出每事件 state-at-time
//       快照与最新累计状态
// 输入: UsageBaseline + FlightLogEntry 有序集合
// 输出: ReplayOutcome (每事件快照 + 最新快照)
// ==========================================

use crate::domain::aircraft::UsageBaseline;
use crate::domain::flight_log::{FlightLogEntry, UsageSnapshot};
use chrono::NaiveDate;
use tracing::instrument;

// ==========================================
// ReplayOutcome - 回放结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    /// 每条台账事件的 state-at-time 快照（与输入事件一一对应, 回放顺序）
    pub per_entry: Vec<(String, UsageSnapshot)>,
    /// 最新累计状态（无台账事件时等于基准快照）
    pub latest: UsageSnapshot,
    /// 最近台账事件日期（无事件时为基准日期）
    pub latest_date: NaiveDate,
}

// ==========================================
// LedgerReplayEngine - 使用台账回放引擎
// ==========================================
// 红线: 不直接写库, 只计算; 持久化由 API 层完成
pub struct LedgerReplayEngine;

impl LedgerReplayEngine {
    /// 创建新的台账回放引擎
    pub fn new() -> Self {
        Self
    }

    /// 基准快照（回放起点, 零事件时的当前状态）
    pub fn baseline_snapshot(baseline: &UsageBaseline) -> UsageSnapshot {
        UsageSnapshot {
            aircraft_hrs: baseline.aircraft_hrs,
            aircraft_cyc: baseline.aircraft_cyc,
            engine_tsn: baseline.engine_tsn,
            engine_csn: baseline.engine_csn,
            engine_tso: baseline.engine_tso,
            engine_cso: baseline.engine_cso,
            engine_oh: baseline.engine_oh,
            prop_tsn: baseline.prop_tsn,
            prop_tso: baseline.prop_tso,
            prop_oh: baseline.prop_oh,
            cofa_hours: baseline.cofa_hours,
            hours_to_check: baseline.hours_to_check,
        }
    }

    /// 折叠单条台账事件（回放的单步状态转移）
    ///
    /// # 口径
    /// - 机体/发动机/螺旋桨小时与循环: 逐事件累加（单发机队假设）
    /// - 发动机 TSO/CSO: 翻修事件建模前钉死在基准值
    /// - 螺旋桨 TSO: 随飞行累计（期初未归零）
    /// - engine_oh/prop_oh: 距翻修剩余小时, 逐事件递减
    /// - cofa_hours: 适航证检查事件处先归零, 本事件飞行小时计入新周期
    /// - hours_to_check:
    ///     无覆写         → value -= block_hrs
    ///     延期覆写       → value = value - block_hrs + override（飞行小时照扣, 再加回延期量）
    ///     完成定检覆写   → value = override - block_hrs（计数被新间隔替换, 随即扣除本段飞行）
    pub fn fold_entry(
        baseline: &UsageBaseline,
        prev: &UsageSnapshot,
        entry: &FlightLogEntry,
    ) -> UsageSnapshot {
        let block = entry.block_hrs;

        let cofa_hours = if entry.cofa_reset {
            // 检查在本事件起点完成: 计数归零后, 本事件自身的飞行小时开始累计
            block
        } else {
            prev.cofa_hours + block
        };

        let hours_to_check = match entry.check_override_hrs {
            Some(override_hrs) if entry.is_extension => {
                prev.hours_to_check - block + override_hrs
            }
            Some(override_hrs) => override_hrs - block,
            None => prev.hours_to_check - block,
        };

        UsageSnapshot {
            aircraft_hrs: prev.aircraft_hrs + block,
            aircraft_cyc: prev.aircraft_cyc + entry.cycles,
            engine_tsn: prev.engine_tsn + block,
            engine_csn: prev.engine_csn + entry.cycles,
            engine_tso: baseline.engine_tso,
            engine_cso: baseline.engine_cso,
            engine_oh: prev.engine_oh - block,
            prop_tsn: prev.prop_tsn + block,
            prop_tso: prev.prop_tso + block,
            prop_oh: prev.prop_oh - block,
            cofa_hours,
            hours_to_check,
        }
    }

    /// 全量回放: 从基准折叠全部台账事件
    ///
    /// # 参数
    /// - baseline: 该机使用基准（配置, 非代码）
    /// - entries: 台账事件; 引擎按日期稳定排序,
    ///   同日事件保持传入顺序（即插入顺序）
    ///
    /// # 返回
    /// - ReplayOutcome: 每事件快照 + 最新累计状态
    ///
    /// # 不变式
    /// - 确定性: 相同输入必产出相同结果
    /// - 乱序插入: 因每次回放都从基准全量折叠并重写全部快照,
    ///   早于已有事件的新事件会自动修正其后所有事件的固化值
    /// - 合法事件不存在回放内部失败路径
    #[instrument(skip(self, baseline, entries), fields(count = entries.len()))]
    pub fn replay(
        &self,
        baseline: &UsageBaseline,
        entries: &[FlightLogEntry],
    ) -> ReplayOutcome {
        // 稳定排序: 日期升序, 同日保持插入顺序
        let mut ordered: Vec<&FlightLogEntry> = entries.iter().collect();
        ordered.sort_by_key(|e| e.date);

        let mut current = Self::baseline_snapshot(baseline);
        let mut latest_date = baseline.epoch_date;
        let mut per_entry = Vec::with_capacity(ordered.len());

        for entry in ordered {
            current = Self::fold_entry(baseline, &current, entry);
            latest_date = entry.date;
            per_entry.push((entry.entry_id.clone(), current.clone()));
        }

        ReplayOutcome {
            per_entry,
            latest: current,
            latest_date,
        }
    }
}

impl Default for LedgerReplayEngine {
    fn default() -> Self {
        Self::new()
    }
}
