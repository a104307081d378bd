// ==========================================
// 机队持续适航维修管理系统 - 飞行记录 API
// ==========================================
// 职责: 飞行记录提交 + 台账回放落库
// 红线: 累计状态唯一写入口; 校验失败在回放前拒绝
// 依据: Usage_Ledger_Spec_v0.2.md - 4. 提交流程
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::FlightLogValidator;
use crate::config::UsageConfigReader;
use crate::domain::aircraft::{Aircraft, UsageBaseline};
use crate::domain::flight_log::{FlightLogEntry, NewFlightLog};
use crate::engine::ledger_replay::LedgerReplayEngine;
use crate::repository::{AircraftRepository, AssemblyRepository, FlightLogRepository};

// ==========================================
// FlightLogSubmission - 提交结果
// ==========================================
/// 提交结果: 新事件（含固化快照）+ 更新后的飞机状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightLogSubmission {
    pub entry: FlightLogEntry,
    pub aircraft: Aircraft,
}

// ==========================================
// FlightLogApi - 飞行记录 API
// ==========================================

/// 飞行记录API
///
/// 职责：
/// 1. 提交校验（ValidationError/ReferenceError 在回放前拒绝）
/// 2. 台账追加 + 全量回放
/// 3. 快照固化（每事件 state-at-time + 飞机当前状态 + 装机件派生）
pub struct FlightLogApi<C>
where
    C: UsageConfigReader,
{
    aircraft_repo: Arc<AircraftRepository>,
    assembly_repo: Arc<AssemblyRepository>,
    flight_log_repo: Arc<FlightLogRepository>,
    replay_engine: LedgerReplayEngine,
    config: Arc<C>,
}

impl<C> FlightLogApi<C>
where
    C: UsageConfigReader,
{
    /// 创建新的FlightLogApi实例
    pub fn new(
        aircraft_repo: Arc<AircraftRepository>,
        assembly_repo: Arc<AssemblyRepository>,
        flight_log_repo: Arc<FlightLogRepository>,
        config: Arc<C>,
    ) -> Self {
        Self {
            aircraft_repo,
            assembly_repo,
            flight_log_repo,
            replay_engine: LedgerReplayEngine::new(),
            config,
        }
    }

    /// 提交一条飞行记录
    ///
    /// # 流程
    /// 1. 入口校验（字段合法性）
    /// 2. 引用校验（飞机存在且已配置使用基准）
    /// 3. 台账追加
    /// 4. 从基准全量回放（乱序日期的事件自动修正后续快照）
    /// 5. 固化: 每事件快照 + 飞机当前状态 + 装机件 TSN/CSN 派生
    ///
    /// # 返回
    /// - FlightLogSubmission: 新事件与更新后的飞机状态
    #[instrument(skip(self, input), fields(aircraft_id = %input.aircraft_id, date = %input.date))]
    pub async fn submit_flight_log(
        &self,
        input: NewFlightLog,
    ) -> ApiResult<FlightLogSubmission> {
        // === 步骤 1: 入口校验 ===
        FlightLogValidator::validate(&input)?;

        // === 步骤 2: 引用校验 ===
        let aircraft = self
            .aircraft_repo
            .find_by_id(&input.aircraft_id)?
            .ok_or_else(|| ApiError::NotFound(format!("aircraft (id={})", input.aircraft_id)))?;

        let baseline = self.baseline_for(&aircraft.aircraft_id).await?;

        // === 步骤 3: 台账追加 ===
        let entry = FlightLogEntry {
            entry_id: Uuid::new_v4().to_string(),
            aircraft_id: input.aircraft_id.clone(),
            date: input.date,
            block_hrs: input.block_hrs,
            cycles: input.cycles,
            from_icao: input.from_icao,
            to_icao: input.to_icao,
            techlog_no: input.techlog_no,
            pilot: input.pilot,
            remarks: input.remarks,
            cofa_reset: input.cofa_reset,
            check_override_hrs: input.check_override_hrs,
            is_extension: input.is_extension,
            snapshot: None,
            created_at: Utc::now(),
        };
        self.flight_log_repo.append(&entry)?;

        // === 步骤 4-5: 回放 + 固化 ===
        let aircraft = self.replay_and_persist(&aircraft.aircraft_id, &baseline).await?;

        let entry = self
            .flight_log_repo
            .find_by_id(&entry.entry_id)?
            .ok_or_else(|| ApiError::InternalError("新事件回读失败".to_string()))?;

        info!(
            aircraft_id = %aircraft.aircraft_id,
            current_hrs = aircraft.current_hrs,
            current_cyc = aircraft.current_cyc,
            "飞行记录提交完成"
        );

        Ok(FlightLogSubmission { entry, aircraft })
    }

    /// 从基准全量回放并固化（提交路径与导入后修复共用）
    ///
    /// # 说明
    /// - 回放是输入的纯函数; 本方法只负责编排与落库
    #[instrument(skip(self, baseline), fields(aircraft_id = %aircraft_id))]
    pub async fn replay_and_persist(
        &self,
        aircraft_id: &str,
        baseline: &UsageBaseline,
    ) -> ApiResult<Aircraft> {
        let entries = self.flight_log_repo.list_for_aircraft(aircraft_id)?;
        let outcome = self.replay_engine.replay(baseline, &entries);

        debug!(
            entries = entries.len(),
            latest_hrs = outcome.latest.aircraft_hrs,
            "台账回放完成"
        );

        // 固化每事件 state-at-time（单事务, 乱序修正在此生效）
        self.flight_log_repo
            .batch_update_snapshots(&outcome.per_entry)?;

        // 飞机当前状态 = 最新快照
        self.aircraft_repo.update_usage_snapshot(
            aircraft_id,
            &outcome.latest,
            outcome.latest_date,
        )?;

        // 装机件 TSN/CSN 重新派生（禁止独立累加）
        self.assembly_repo.rederive_counters(
            aircraft_id,
            outcome.latest.aircraft_hrs,
            outcome.latest.aircraft_cyc,
        )?;

        self.aircraft_repo
            .find_by_id(aircraft_id)?
            .ok_or_else(|| ApiError::NotFound(format!("aircraft (id={})", aircraft_id)))
    }

    /// 读取某机使用基准（缺失视为配置错误）
    async fn baseline_for(&self, aircraft_id: &str) -> ApiResult<UsageBaseline> {
        self.config
            .get_usage_baseline(aircraft_id)
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?
            .ok_or_else(|| {
                ApiError::MissingConfig(format!("usage_baseline/{} 未配置", aircraft_id))
            })
    }

    /// 按飞机列出台账（含固化快照, 回放顺序）
    pub fn list_flight_logs(&self, aircraft_id: &str) -> ApiResult<Vec<FlightLogEntry>> {
        Ok(self.flight_log_repo.list_for_aircraft(aircraft_id)?)
    }
}
