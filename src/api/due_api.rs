// ==========================================
// 机队持续适航维修管理系统 - 到期查询 API
// ==========================================
// 职责: 到期列表 / 预测窗口报告 / 标记完成
// 依据: Due_Engine_Spec_v0.2.md - 4. 查询口径
// 红线: ComputedDue 为临时派生, 每次查询重算, 不落库
// ==========================================

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::UsageConfigReader;
use crate::domain::aircraft::Aircraft;
use crate::domain::maintenance::{ComplianceRecord, UsageAnchor};
use crate::engine::due_classifier::{ComputedDue, DueClassifier};
use crate::engine::projection::ProjectionEngine;
use crate::repository::{
    AircraftRepository, ComplianceRepository, MaintenanceItemRepository,
};

// ==========================================
// ProjectionWindowReport - 单窗口预测报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionWindowReport {
    pub window_days: i64,          // 窗口（天）
    pub items: Vec<ComputedDue>,   // 预计在窗口内到期的项目
}

// ==========================================
// DueApi - 到期查询 API
// ==========================================

/// 到期查询API
///
/// 职责：
/// 1. 到期列表（全部独立项目, 按最小裕度升序）
/// 2. 预测窗口报告（30/60/90 天, 可配置）
/// 3. 标记完成（写执行履历 + 刷新锚点）
pub struct DueApi<C>
where
    C: UsageConfigReader,
{
    aircraft_repo: Arc<AircraftRepository>,
    item_repo: Arc<MaintenanceItemRepository>,
    compliance_repo: Arc<ComplianceRepository>,
    projection_engine: ProjectionEngine,
    config: Arc<C>,
}

impl<C> DueApi<C>
where
    C: UsageConfigReader,
{
    /// 创建新的DueApi实例
    pub fn new(
        aircraft_repo: Arc<AircraftRepository>,
        item_repo: Arc<MaintenanceItemRepository>,
        compliance_repo: Arc<ComplianceRepository>,
        config: Arc<C>,
    ) -> Self {
        Self {
            aircraft_repo,
            item_repo,
            compliance_repo,
            projection_engine: ProjectionEngine::new(),
            config,
        }
    }

    /// 某机的到期列表
    ///
    /// # 口径
    /// - 仅独立项目（归入父定检的任务不列出）
    /// - 未声明任何间隔的项目不列出
    /// - 排序: 各限制最小裕度升序（最紧的排最前）
    /// - estimated_days 由预测引擎折算填充（仅展示用）
    #[instrument(skip(self), fields(aircraft_id = %aircraft_id))]
    pub async fn list_due(
        &self,
        aircraft_id: &str,
        today: NaiveDate,
    ) -> ApiResult<Vec<ComputedDue>> {
        let aircraft = self.load_aircraft(aircraft_id)?;
        let classifier = self.classifier().await?;
        let items = self.item_repo.list_for_aircraft(aircraft_id)?;

        let mut rows = Vec::new();
        for item in &items {
            let has_history = self.compliance_repo.has_history(&item.item_id)?;
            if let Some(mut due) = classifier.compute_due(item, &aircraft, has_history, today) {
                due.estimated_days = self.projection_engine.estimated_days(&due, &aircraft);
                rows.push(due);
            }
        }

        rows.sort_by(|a, b| {
            a.min_remaining()
                .partial_cmp(&b.min_remaining())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(items = items.len(), due_rows = rows.len(), "到期列表计算完成");
        Ok(rows)
    }

    /// 某机的预测窗口报告（窗口列表来自配置, 默认 30/60/90 天）
    #[instrument(skip(self), fields(aircraft_id = %aircraft_id))]
    pub async fn projection_report(
        &self,
        aircraft_id: &str,
        today: NaiveDate,
    ) -> ApiResult<Vec<ProjectionWindowReport>> {
        let aircraft = self.load_aircraft(aircraft_id)?;
        let windows = self
            .config
            .get_projection_windows()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let due_rows = self.list_due(aircraft_id, today).await?;

        let reports = windows
            .into_iter()
            .map(|window_days| ProjectionWindowReport {
                window_days,
                items: due_rows
                    .iter()
                    .filter(|due| {
                        self.projection_engine
                            .in_projection_window(due, &aircraft, window_days)
                    })
                    .cloned()
                    .collect(),
            })
            .collect();

        Ok(reports)
    }

    /// 标记项目完成
    ///
    /// # 流程
    /// 1. 项目与飞机引用校验
    /// 2. 写执行履历（执行日 + 当前机体小时/循环）
    /// 3. 刷新项目锚点（此后判定切换到重复间隔）
    #[instrument(skip(self, remark), fields(item_id = %item_id))]
    pub async fn mark_done(
        &self,
        item_id: &str,
        done_date: NaiveDate,
        remark: Option<String>,
    ) -> ApiResult<ComplianceRecord> {
        let item = self
            .item_repo
            .find_by_id(item_id)?
            .ok_or_else(|| ApiError::NotFound(format!("maintenance_item (id={})", item_id)))?;
        let aircraft = self.load_aircraft(&item.aircraft_id)?;

        let record = ComplianceRecord {
            record_id: Uuid::new_v4().to_string(),
            item_id: item.item_id.clone(),
            aircraft_id: aircraft.aircraft_id.clone(),
            date: done_date,
            hrs_at: Some(aircraft.current_hrs),
            cyc_at: Some(aircraft.current_cyc),
            remark,
            created_at: Utc::now(),
        };
        self.compliance_repo.insert(&record)?;

        self.item_repo.update_last_done(
            item_id,
            &UsageAnchor {
                date: Some(done_date),
                hrs: Some(aircraft.current_hrs),
                cyc: Some(aircraft.current_cyc),
            },
        )?;

        Ok(record)
    }

    /// 构造判定引擎（阈值来自配置）
    async fn classifier(&self) -> ApiResult<DueClassifier> {
        let thresholds = self
            .config
            .get_due_thresholds()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(DueClassifier::new(thresholds))
    }

    fn load_aircraft(&self, aircraft_id: &str) -> ApiResult<Aircraft> {
        self.aircraft_repo
            .find_by_id(aircraft_id)?
            .ok_or_else(|| ApiError::NotFound(format!("aircraft (id={})", aircraft_id)))
    }
}
