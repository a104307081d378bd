// Dev utility: reset the demo database and seed the 5H-AAF fleet scenario.
//
// Usage:
//   cargo run --bin reset_and_seed_demo_db -- [db_path]
//
// Seeds one C208B aircraft with its usage baseline (config_kv), engine and
// propeller assemblies, the standard checks/tasks set, and a short ledger so
// the due list and projection report have something to show.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, Utc};
use uuid::Uuid;

use fleet_camo::config::{config_keys, ConfigManager};
use fleet_camo::db::{init_schema, open_sqlite_connection};
use fleet_camo::domain::types::{AircraftStatus, AssemblyKind, TaskType};
use fleet_camo::domain::{
    Aircraft, Assembly, IntervalSet, ItemKind, MaintenanceItem, NewFlightLog, UsageAnchor,
    UsageBaseline,
};
use fleet_camo::repository::{
    AircraftRepository, AssemblyRepository, FlightLogRepository, MaintenanceItemRepository,
};
use fleet_camo::FlightLogApi;

const AIRCRAFT_ID: &str = "ac-AAF";
const REGISTRATION: &str = "5H-AAF";
const AIRCRAFT_TYPE: &str = "C208B";

// 5H-AAF 期初基准（台账起点, 此前使用不在台账内）
const BASE_AIRCRAFT_HRS: f64 = 12101.4;
const BASE_AIRCRAFT_CYC: i64 = 15423;
const BASE_ENGINE_TSN: f64 = 2335.3;
const BASE_ENGINE_CSN: i64 = 3435;
const BASE_ENGINE_OH: f64 = 2764.7;
const BASE_PROP_TSN: f64 = 11244.6;
const BASE_PROP_TSO: f64 = 2335.3;
const BASE_PROP_OH: f64 = 664.7;
const BASE_COFA_HOURS: f64 = 1345.4;
const BASE_HOURS_TO_CHECK: f64 = 170.8;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fleet_camo::logging::init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fleet_camo.db".to_string());

    if Path::new(&db_path).exists() {
        fs::remove_file(&db_path)?;
        tracing::info!("已删除旧数据库: {}", db_path);
    }

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let aircraft_repo = Arc::new(AircraftRepository::from_connection(conn.clone()));
    let assembly_repo = Arc::new(AssemblyRepository::from_connection(conn.clone()));
    let flight_log_repo = Arc::new(FlightLogRepository::from_connection(conn.clone()));
    let item_repo = Arc::new(MaintenanceItemRepository::from_connection(conn.clone()));
    let config = Arc::new(ConfigManager::from_connection(conn.clone())?);

    let today = Local::now().date_naive();
    let epoch_date = today - Duration::days(30);
    let now = Utc::now();

    // === 使用基准（config_kv, 禁止硬编码进引擎）===
    let baseline = UsageBaseline {
        epoch_date,
        aircraft_hrs: BASE_AIRCRAFT_HRS,
        aircraft_cyc: BASE_AIRCRAFT_CYC,
        engine_tsn: BASE_ENGINE_TSN,
        engine_csn: BASE_ENGINE_CSN,
        engine_tso: 0.0,
        engine_cso: 0,
        engine_oh: BASE_ENGINE_OH,
        prop_tsn: BASE_PROP_TSN,
        prop_tso: BASE_PROP_TSO,
        prop_oh: BASE_PROP_OH,
        cofa_hours: BASE_COFA_HOURS,
        hours_to_check: BASE_HOURS_TO_CHECK,
    };
    config.set_usage_baseline(AIRCRAFT_ID, &baseline)?;

    // 判定阈值与预测窗口（演示默认值, 可在 config_kv 调整）
    config.set_config_value(config_keys::DUE_SOON_HOURS, "10")?;
    config.set_config_value(config_keys::DUE_SOON_CYCLES, "10")?;
    config.set_config_value(config_keys::DUE_SOON_DAYS, "7")?;
    config.set_config_value(config_keys::PROJECTION_WINDOWS, "[30,60,90]")?;

    // === 飞机主数据（累计状态 = 基准, 回放后覆盖）===
    let aircraft = Aircraft {
        aircraft_id: AIRCRAFT_ID.to_string(),
        registration: REGISTRATION.to_string(),
        aircraft_type: AIRCRAFT_TYPE.to_string(),
        msn: Some("208B-2021".to_string()),
        status: AircraftStatus::InService,
        base: Some("HTDA".to_string()),
        current_hrs: BASE_AIRCRAFT_HRS,
        current_cyc: BASE_AIRCRAFT_CYC,
        current_date: Some(epoch_date),
        avg_daily_hrs: 7.0,
        avg_daily_cyc: 6.0,
        cofa_hours: Some(BASE_COFA_HOURS),
        hours_to_check: Some(BASE_HOURS_TO_CHECK),
        engine_oh: Some(BASE_ENGINE_OH),
        prop_oh: Some(BASE_PROP_OH),
        created_at: now,
        updated_at: now,
    };
    aircraft_repo.insert(&aircraft)?;

    // === 装机件 ===
    // tso_hrs/cso 列存机体口径偏移: tsn = current_hrs - tso_hrs 恒成立
    let engine = Assembly {
        assembly_id: "asm-AAF-engine".to_string(),
        aircraft_id: AIRCRAFT_ID.to_string(),
        kind: AssemblyKind::Engine,
        position: Some("C".to_string()),
        model: Some("PT6A-114A".to_string()),
        serial: Some("PCE-PU0821".to_string()),
        tsn_hrs: BASE_ENGINE_TSN,
        csn: BASE_ENGINE_CSN,
        tso_hrs: BASE_AIRCRAFT_HRS - BASE_ENGINE_TSN,
        cso: BASE_AIRCRAFT_CYC - BASE_ENGINE_CSN,
        last_overhaul_date: None,
        tbo_hrs: Some(3600.0),
        updated_at: now,
    };
    assembly_repo.insert(&engine)?;

    let prop = Assembly {
        assembly_id: "asm-AAF-prop".to_string(),
        aircraft_id: AIRCRAFT_ID.to_string(),
        kind: AssemblyKind::Propeller,
        position: Some("C".to_string()),
        model: Some("McCauley 3GFR34C703".to_string()),
        serial: Some("981112".to_string()),
        tsn_hrs: BASE_PROP_TSN,
        csn: BASE_AIRCRAFT_CYC,
        tso_hrs: BASE_AIRCRAFT_HRS - BASE_PROP_TSN,
        cso: 0,
        last_overhaul_date: None,
        tbo_hrs: Some(3000.0),
        updated_at: now,
    };
    assembly_repo.insert(&prop)?;

    // === 维修项目（定检/任务/部件）===
    let items = vec![
        MaintenanceItem {
            item_id: "check-C208B-100hr".to_string(),
            aircraft_id: AIRCRAFT_ID.to_string(),
            title: "100 Hour Check".to_string(),
            reference: Some("AMP-C208B-CH5-100H".to_string()),
            kind: ItemKind::Check,
            intervals: IntervalSet::single(Some(100.0), None, None),
            last_done: UsageAnchor {
                date: Some(epoch_date),
                hrs: Some(BASE_AIRCRAFT_HRS - 80.0),
                cyc: Some(BASE_AIRCRAFT_CYC - 95),
            },
            created_at: now,
            updated_at: now,
        },
        MaintenanceItem {
            item_id: "check-C208B-5-15-01".to_string(),
            aircraft_id: AIRCRAFT_ID.to_string(),
            title: "5-15-01 12M".to_string(),
            reference: Some("5-15-01".to_string()),
            kind: ItemKind::Check,
            intervals: IntervalSet::single(None, None, Some(365)),
            last_done: UsageAnchor {
                date: Some(epoch_date),
                hrs: None,
                cyc: None,
            },
            created_at: now,
            updated_at: now,
        },
        MaintenanceItem {
            item_id: "task-C208-A.1".to_string(),
            aircraft_id: AIRCRAFT_ID.to_string(),
            title: "A.1 Flap Bell Crank NDI".to_string(),
            reference: Some("A.1".to_string()),
            kind: ItemKind::Task {
                task_type: TaskType::Inspection,
                check_id: None,
            },
            intervals: IntervalSet::single(None, Some(500), None),
            last_done: UsageAnchor {
                date: Some(epoch_date),
                hrs: None,
                cyc: Some(BASE_AIRCRAFT_CYC - 420),
            },
            created_at: now,
            updated_at: now,
        },
        // 归入 100 小时检的子任务: 不独立出现在到期列表
        MaintenanceItem {
            item_id: "task-C208-oil-filter".to_string(),
            aircraft_id: AIRCRAFT_ID.to_string(),
            title: "Oil Filter Inspection".to_string(),
            reference: Some("AMP-C208B-CH5-100H-05".to_string()),
            kind: ItemKind::Task {
                task_type: TaskType::Inspection,
                check_id: Some("check-C208B-100hr".to_string()),
            },
            intervals: IntervalSet::single(Some(100.0), None, None),
            last_done: UsageAnchor::default(),
            created_at: now,
            updated_at: now,
        },
        MaintenanceItem {
            item_id: "comp-C208-starter-gen".to_string(),
            aircraft_id: AIRCRAFT_ID.to_string(),
            title: "Starter Generator".to_string(),
            reference: Some("23085-009".to_string()),
            kind: ItemKind::Component {
                part_no: Some("23085-009".to_string()),
                serial_no: Some("SG-4471".to_string()),
            },
            intervals: IntervalSet::single(Some(1000.0), None, None),
            last_done: UsageAnchor {
                date: Some(epoch_date - Duration::days(60)),
                hrs: Some(BASE_AIRCRAFT_HRS - 310.0),
                cyc: Some(BASE_AIRCRAFT_CYC - 360),
            },
            created_at: now,
            updated_at: now,
        },
    ];
    for item in &items {
        item_repo.insert(item)?;
    }

    // === 演示台账（逐条走正式提交链路, 回放即被触发）===
    let api = FlightLogApi::new(
        aircraft_repo.clone(),
        assembly_repo,
        flight_log_repo,
        config,
    );

    let legs: [(i64, f64, i64, &str, &str); 4] = [
        (4, 3.2, 3, "HTDA", "HTZA"),
        (3, 2.8, 2, "HTZA", "HTMW"),
        (2, 4.1, 4, "HTMW", "HTDA"),
        (1, 1.9, 2, "HTDA", "HTZA"),
    ];
    for (days_ago, block_hrs, cycles, from, to) in legs {
        let submission = api
            .submit_flight_log(NewFlightLog {
                aircraft_id: AIRCRAFT_ID.to_string(),
                date: today - Duration::days(days_ago),
                block_hrs,
                cycles,
                from_icao: Some(from.to_string()),
                to_icao: Some(to.to_string()),
                techlog_no: Some(format!("TLB-{}", Uuid::new_v4().simple())),
                pilot: Some("J. Mwakyusa".to_string()),
                remarks: None,
                cofa_reset: false,
                check_override_hrs: None,
                is_extension: false,
            })
            .await?;
        tracing::info!(
            date = %submission.entry.date,
            current_hrs = submission.aircraft.current_hrs,
            "演示航段已提交"
        );
    }

    tracing::info!("演示数据写入完成: {}", db_path);
    Ok(())
}
