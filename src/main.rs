// ==========================================
// 机队持续适航维修管理系统 - 主入口
// ==========================================
// 依据: CAMO_Core_Spec.md
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (放行决定权归持证人员)
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::Local;
use fleet_camo::api::DueApi;
use fleet_camo::config::ConfigManager;
use fleet_camo::db::{init_schema, open_sqlite_connection, read_schema_version};
use fleet_camo::repository::{
    AircraftRepository, ComplianceRepository, MaintenanceItemRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fleet_camo::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 决策支持系统", fleet_camo::APP_NAME);
    tracing::info!("系统版本: {}", fleet_camo::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fleet_camo.db".to_string());
    tracing::info!("使用数据库: {}", db_path);

    let conn = open_sqlite_connection(&db_path)?;
    if read_schema_version(&conn)?.is_none() {
        tracing::info!("数据库为空, 初始化 schema");
        init_schema(&conn)?;
    }
    let conn = Arc::new(Mutex::new(conn));

    let aircraft_repo = Arc::new(AircraftRepository::from_connection(conn.clone()));
    let item_repo = Arc::new(MaintenanceItemRepository::from_connection(conn.clone()));
    let compliance_repo = Arc::new(ComplianceRepository::from_connection(conn.clone()));
    let config = Arc::new(ConfigManager::from_connection(conn.clone())?);

    let due_api = DueApi::new(aircraft_repo.clone(), item_repo, compliance_repo, config);

    let today = Local::now().date_naive();
    let fleet = aircraft_repo.list_all()?;
    if fleet.is_empty() {
        tracing::warn!("机队为空 (可先执行 reset_and_seed_demo_db 写入演示数据)");
        return Ok(());
    }

    for aircraft in &fleet {
        tracing::info!(
            registration = %aircraft.registration,
            current_hrs = aircraft.current_hrs,
            current_cyc = aircraft.current_cyc,
            "---- 机队状态 ----"
        );

        let due_rows = due_api.list_due(&aircraft.aircraft_id, today).await?;
        for due in &due_rows {
            tracing::info!(
                item = %due.title,
                status = %due.status,
                min_remaining = due.min_remaining(),
                estimated_days = ?due.estimated_days,
                "到期项目"
            );
        }

        let reports = due_api
            .projection_report(&aircraft.aircraft_id, today)
            .await?;
        for report in &reports {
            tracing::info!(
                window_days = report.window_days,
                items = report.items.len(),
                "预测窗口"
            );
        }
    }

    Ok(())
}
