// ==========================================
// 机队持续适航维修管理系统 - 技术日志导入器
// ==========================================
// 依据: Techlog_Import_Spec.md - 1. 导入主流程
// 流程: 解析 → DQ 校验 → 库内查重 → 逐行走提交回放链路 → 批次报告
// 红线: 导入行与手工提交走同一条回放链路, 不存在旁路写入
// ==========================================

use crate::api::FlightLogApi;
use crate::config::UsageConfigReader;
use crate::domain::{DqLevel, DqViolation, ImportReport, NewFlightLog, RawTechlogRecord};
use crate::importer::dq_validator::TechlogDqValidator;
use crate::importer::error::ImportResult;
use crate::importer::techlog_parser::CsvTechlogParser;
use crate::repository::FlightLogRepository;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// TechlogImporter - 技术日志导入器
// ==========================================
pub struct TechlogImporter<C>
where
    C: UsageConfigReader,
{
    flight_log_repo: Arc<FlightLogRepository>,
    flight_log_api: Arc<FlightLogApi<C>>,
    parser: CsvTechlogParser,
    dq_validator: TechlogDqValidator,
}

impl<C> TechlogImporter<C>
where
    C: UsageConfigReader,
{
    pub fn new(
        flight_log_repo: Arc<FlightLogRepository>,
        flight_log_api: Arc<FlightLogApi<C>>,
    ) -> Self {
        Self {
            flight_log_repo,
            flight_log_api,
            parser: CsvTechlogParser::new(),
            dq_validator: TechlogDqValidator::new(),
        }
    }

    /// 从 CSV 文件导入技术日志
    ///
    /// # 参数
    /// - aircraft_id: 目标飞机 ID
    /// - file_path: CSV 文件路径
    /// - today: 业务日期（未来日期告警的参照）
    ///
    /// # 返回
    /// - Ok(ImportReport): 批次报告（导入/阻断/告警计数 + 违规明细）
    /// - Err(ImportError): 文件级错误（不存在 / 格式 / 解析失败）
    ///
    /// # 说明
    /// - 行级错误不中断批次: ERROR 行被阻断并记入报告, 其余行照常导入
    /// - 每行追加都会触发一次全量回放, 批内乱序日期由回放自行纠正
    #[instrument(skip(self, file_path), fields(aircraft_id = %aircraft_id, batch_id))]
    pub async fn import_from_csv(
        &self,
        aircraft_id: &str,
        file_path: &Path,
        today: NaiveDate,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        info!(batch_id = %batch_id, file = %file_path.display(), "开始导入技术日志");

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let records = self.parser.parse_to_raw_records(file_path)?;
        let total_rows = records.len();

        // === 步骤 2: DQ 校验 ===
        debug!("步骤 2: DQ 校验");
        let mut violations = self.dq_validator.validate_batch(&records, today);

        // === 步骤 3: 库内技术记录本编号查重 ===
        debug!("步骤 3: 库内查重");
        for record in &records {
            if let Some(techlog_no) = &record.techlog_no {
                let exists = self
                    .flight_log_repo
                    .techlog_no_exists(aircraft_id, techlog_no)
                    .map_err(|e| {
                        crate::importer::error::ImportError::InternalError(e.to_string())
                    })?;
                if exists {
                    violations.push(DqViolation {
                        row_number: record.row_number,
                        field: "techlog_no".to_string(),
                        level: DqLevel::Error,
                        message: format!("技术记录本编号已存在于台账: {}", techlog_no),
                    });
                }
            }
        }

        let blocked: HashSet<usize> = violations
            .iter()
            .filter(|v| v.level == DqLevel::Error)
            .map(|v| v.row_number)
            .collect();
        let warned: HashSet<usize> = violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning)
            .map(|v| v.row_number)
            .collect();

        // === 步骤 4: 逐行提交（与手工提交同链路）===
        debug!("步骤 4: 逐行提交");
        let mut imported_rows = 0usize;
        for record in &records {
            if blocked.contains(&record.row_number) {
                continue;
            }

            let input = Self::to_new_flight_log(aircraft_id, record);
            match self.flight_log_api.submit_flight_log(input).await {
                Ok(_) => imported_rows += 1,
                Err(e) => {
                    // 提交失败按阻断记录, 不中断批次
                    warn!(row = record.row_number, error = %e, "行提交失败");
                    violations.push(DqViolation {
                        row_number: record.row_number,
                        field: "-".to_string(),
                        level: DqLevel::Error,
                        message: format!("提交失败: {}", e),
                    });
                }
            }
        }

        let blocked_rows = total_rows - imported_rows;
        let warning_rows = warned.len();
        let elapsed_ms = start_time.elapsed().as_millis() as i64;
        info!(
            batch_id = %batch_id,
            total = total_rows,
            imported = imported_rows,
            blocked = blocked_rows,
            warnings = warning_rows,
            elapsed_ms = elapsed_ms,
            "技术日志导入完成"
        );

        Ok(ImportReport {
            batch_id,
            aircraft_id: aircraft_id.to_string(),
            file_name: file_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            total_rows,
            imported_rows,
            blocked_rows,
            warning_rows,
            violations,
            elapsed_ms,
        })
    }

    /// 原始记录 → 提交输入（调用前提: 必填字段已通过 DQ 校验）
    fn to_new_flight_log(aircraft_id: &str, record: &RawTechlogRecord) -> NewFlightLog {
        NewFlightLog {
            aircraft_id: aircraft_id.to_string(),
            date: record.date.unwrap_or_default(),
            block_hrs: record.block_hrs.unwrap_or(0.0),
            cycles: record.cycles.unwrap_or(0),
            from_icao: record.from_icao.clone(),
            to_icao: record.to_icao.clone(),
            techlog_no: record.techlog_no.clone(),
            pilot: record.pilot.clone(),
            remarks: record.remarks.clone(),
            cofa_reset: record.cofa_reset,
            check_override_hrs: record.check_override_hrs,
            is_extension: record.is_extension,
        }
    }
}
