// ==========================================
// 飞行记录 API 集成测试
// ==========================================
// 测试范围:
// 1. 提交链路端到端（校验 → 追加 → 回放 → 固化）
// 2. 校验失败在回放前拒绝, 不产生部分状态
// 3. 引用/配置缺失拒绝
// 4. 乱序提交后历史快照被修正
// 5. 装机件 TSN/CSN 派生
// ==========================================

mod test_helpers;

use std::sync::{Arc, Mutex};

use chrono::Utc;
use fleet_camo::api::ApiError;
use fleet_camo::config::ConfigManager;
use fleet_camo::domain::types::AssemblyKind;
use fleet_camo::domain::{Assembly, NewFlightLog};
use fleet_camo::repository::{
    AircraftRepository, AssemblyRepository, FlightLogRepository,
};
use fleet_camo::FlightLogApi;
use rusqlite::Connection;
use test_helpers::{date, test_aircraft, test_baseline};

// ==========================================
// 辅助函数
// ==========================================

struct TestContext {
    _temp_file: tempfile::NamedTempFile,
    aircraft_repo: Arc<AircraftRepository>,
    flight_log_repo: Arc<FlightLogRepository>,
    assembly_repo: Arc<AssemblyRepository>,
    api: FlightLogApi<ConfigManager>,
}

fn setup(with_baseline: bool) -> TestContext {
    let (temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let conn = test_helpers::open_test_connection(&db_path).expect("打开数据库失败");
    let conn: Arc<Mutex<Connection>> = Arc::new(Mutex::new(conn));

    let aircraft_repo = Arc::new(AircraftRepository::from_connection(conn.clone()));
    let assembly_repo = Arc::new(AssemblyRepository::from_connection(conn.clone()));
    let flight_log_repo = Arc::new(FlightLogRepository::from_connection(conn.clone()));
    let config = Arc::new(ConfigManager::from_connection(conn).expect("创建配置管理器失败"));

    let baseline = test_baseline(date(2026, 1, 1));
    let aircraft = test_aircraft("ac-TST", &baseline);
    aircraft_repo.insert(&aircraft).expect("插入飞机失败");

    if with_baseline {
        config
            .set_usage_baseline("ac-TST", &baseline)
            .expect("写入基准失败");
    }

    let api = FlightLogApi::new(
        aircraft_repo.clone(),
        assembly_repo.clone(),
        flight_log_repo.clone(),
        config,
    );

    TestContext {
        _temp_file: temp_file,
        aircraft_repo,
        flight_log_repo,
        assembly_repo,
        api,
    }
}

fn new_log(d: chrono::NaiveDate, block_hrs: f64, cycles: i64) -> NewFlightLog {
    NewFlightLog {
        aircraft_id: "ac-TST".to_string(),
        date: d,
        block_hrs,
        cycles,
        from_icao: Some("HTDA".to_string()),
        to_icao: Some("HTZA".to_string()),
        techlog_no: None,
        pilot: None,
        remarks: None,
        cofa_reset: false,
        check_override_hrs: None,
        is_extension: false,
    }
}

// ==========================================
// 提交链路
// ==========================================

#[tokio::test]
async fn test_submit_updates_aircraft_and_persists_snapshot() {
    let ctx = setup(true);

    let submission = ctx
        .api
        .submit_flight_log(new_log(date(2026, 1, 5), 2.5, 3))
        .await
        .expect("提交失败");

    // 返回的事件携带固化快照
    let snapshot = submission.entry.snapshot.as_ref().expect("快照未固化");
    assert_eq!(snapshot.aircraft_hrs, 1002.5);
    assert_eq!(snapshot.aircraft_cyc, 803);

    // 飞机当前状态 = 最新快照
    assert_eq!(submission.aircraft.current_hrs, 1002.5);
    assert_eq!(submission.aircraft.current_cyc, 803);
    assert_eq!(submission.aircraft.current_date, Some(date(2026, 1, 5)));
    assert_eq!(submission.aircraft.hours_to_check, Some(97.5));

    // 落库回读一致
    let stored = ctx
        .aircraft_repo
        .find_by_id("ac-TST")
        .unwrap()
        .expect("飞机丢失");
    assert_eq!(stored.current_hrs, 1002.5);
}

#[tokio::test]
async fn test_out_of_order_submit_rewrites_history_snapshots() {
    let ctx = setup(true);

    ctx.api
        .submit_flight_log(new_log(date(2026, 1, 10), 3.0, 2))
        .await
        .expect("提交失败");

    // 晚录入但日期更早的事件
    ctx.api
        .submit_flight_log(new_log(date(2026, 1, 5), 2.0, 1))
        .await
        .expect("提交失败");

    let entries = ctx.flight_log_repo.list_for_aircraft("ac-TST").unwrap();
    assert_eq!(entries.len(), 2);
    // 列表按日期排序, 快照按折叠顺序递增
    assert_eq!(entries[0].date, date(2026, 1, 5));
    assert_eq!(entries[0].snapshot.as_ref().unwrap().aircraft_hrs, 1002.0);
    assert_eq!(entries[1].date, date(2026, 1, 10));
    assert_eq!(entries[1].snapshot.as_ref().unwrap().aircraft_hrs, 1005.0);

    let aircraft = ctx.aircraft_repo.find_by_id("ac-TST").unwrap().unwrap();
    assert_eq!(aircraft.current_hrs, 1005.0);
    assert_eq!(aircraft.current_date, Some(date(2026, 1, 10)));
}

#[tokio::test]
async fn test_assembly_counters_rederived_after_submit() {
    let ctx = setup(true);

    let engine = Assembly {
        assembly_id: "asm-engine".to_string(),
        aircraft_id: "ac-TST".to_string(),
        kind: AssemblyKind::Engine,
        position: Some("C".to_string()),
        model: None,
        serial: None,
        tsn_hrs: 1000.0,
        csn: 800,
        tso_hrs: 0.0,
        cso: 0,
        last_overhaul_date: None,
        tbo_hrs: Some(3600.0),
        updated_at: Utc::now(),
    };
    ctx.assembly_repo.insert(&engine).expect("插入装机件失败");

    ctx.api
        .submit_flight_log(new_log(date(2026, 1, 5), 4.0, 5))
        .await
        .expect("提交失败");

    let assemblies = ctx.assembly_repo.list_for_aircraft("ac-TST").unwrap();
    assert_eq!(assemblies.len(), 1);
    // tsn = current_hrs - tso, csn = current_cyc - cso
    assert_eq!(assemblies[0].tsn_hrs, 1004.0);
    assert_eq!(assemblies[0].csn, 805);
}

// ==========================================
// 拒绝路径
// ==========================================

#[tokio::test]
async fn test_invalid_input_is_rejected_without_state_change() {
    let ctx = setup(true);

    let err = ctx
        .api
        .submit_flight_log(new_log(date(2026, 1, 5), -1.0, 0))
        .await
        .expect_err("负数轮挡小时应被拒绝");
    assert!(matches!(err, ApiError::FieldValueError { .. }));

    // 回放前拒绝: 台账无事件, 飞机状态未动
    assert_eq!(ctx.flight_log_repo.count_for_aircraft("ac-TST").unwrap(), 0);
    let aircraft = ctx.aircraft_repo.find_by_id("ac-TST").unwrap().unwrap();
    assert_eq!(aircraft.current_hrs, 1000.0);
}

#[tokio::test]
async fn test_extension_without_override_is_rejected() {
    let ctx = setup(true);

    let mut input = new_log(date(2026, 1, 5), 1.0, 1);
    input.is_extension = true;

    let err = ctx
        .api
        .submit_flight_log(input)
        .await
        .expect_err("延期无覆写应被拒绝");
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_unknown_aircraft_is_rejected() {
    let ctx = setup(true);

    let mut input = new_log(date(2026, 1, 5), 1.0, 1);
    input.aircraft_id = "ac-GHOST".to_string();

    let err = ctx
        .api
        .submit_flight_log(input)
        .await
        .expect_err("未知飞机应被拒绝");
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_missing_baseline_is_config_error() {
    let ctx = setup(false);

    let err = ctx
        .api
        .submit_flight_log(new_log(date(2026, 1, 5), 1.0, 1))
        .await
        .expect_err("基准缺失应被拒绝");
    assert!(matches!(err, ApiError::MissingConfig(_)));
}
