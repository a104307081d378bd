// ==========================================
// 技术日志导入集成测试
// ==========================================
// 测试范围:
// 1. 合法批次全量导入并驱动台账回放
// 2. DQ ERROR 行阻断, 其余行照常导入
// 3. 批内/库内技术记录本编号查重
// 4. WARNING 行导入但计入报告
// 5. 文件级错误
// ==========================================

mod test_helpers;

use std::io::Write;
use std::sync::{Arc, Mutex};

use fleet_camo::config::ConfigManager;
use fleet_camo::importer::{ImportError, TechlogImporter};
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
    api: Arc<FlightLogApi<ConfigManager>>,
    importer: TechlogImporter<ConfigManager>,
}

fn setup() -> TestContext {
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
    config
        .set_usage_baseline("ac-TST", &baseline)
        .expect("写入基准失败");

    let api = Arc::new(FlightLogApi::new(
        aircraft_repo.clone(),
        assembly_repo,
        flight_log_repo.clone(),
        config,
    ));
    let importer = TechlogImporter::new(flight_log_repo.clone(), api.clone());

    TestContext {
        _temp_file: temp_file,
        aircraft_repo,
        flight_log_repo,
        api,
        importer,
    }
}

fn write_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("创建临时 CSV 失败");
    file.write_all(content.as_bytes()).expect("写入 CSV 失败");
    file.flush().unwrap();
    file
}

const HEADER: &str = "date,block_hrs,cycles,from,to,techlog_no\n";

// ==========================================
// 导入链路
// ==========================================

#[tokio::test]
async fn test_valid_batch_imports_and_replays() {
    let ctx = setup();
    let csv = write_csv(&format!(
        "{}2026-01-05,2.5,3,HTDA,HTZA,TLB-001\n2026-01-06,1.5,2,HTZA,HTDA,TLB-002\n",
        HEADER
    ));

    let report = ctx
        .importer
        .import_from_csv("ac-TST", csv.path(), date(2026, 2, 1))
        .await
        .expect("导入失败");

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.imported_rows, 2);
    assert_eq!(report.blocked_rows, 0);
    assert!(report.violations.is_empty());

    // 导入走提交链路: 台账与飞机状态同步更新
    assert_eq!(ctx.flight_log_repo.count_for_aircraft("ac-TST").unwrap(), 2);
    let aircraft = ctx.aircraft_repo.find_by_id("ac-TST").unwrap().unwrap();
    assert_eq!(aircraft.current_hrs, 1004.0);
    assert_eq!(aircraft.current_cyc, 805);
}

#[tokio::test]
async fn test_error_row_is_blocked_others_import() {
    let ctx = setup();
    // 第 3 行缺轮挡小时
    let csv = write_csv(&format!(
        "{}2026-01-05,2.5,3,HTDA,HTZA,TLB-001\n2026-01-06,,2,HTZA,HTDA,TLB-002\n",
        HEADER
    ));

    let report = ctx
        .importer
        .import_from_csv("ac-TST", csv.path(), date(2026, 2, 1))
        .await
        .expect("导入失败");

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.imported_rows, 1);
    assert_eq!(report.blocked_rows, 1);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].row_number, 3);
    assert_eq!(report.violations[0].field, "block_hrs");

    assert_eq!(ctx.flight_log_repo.count_for_aircraft("ac-TST").unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_techlog_no_within_batch_blocks_second_row() {
    let ctx = setup();
    let csv = write_csv(&format!(
        "{}2026-01-05,2.5,3,HTDA,HTZA,TLB-001\n2026-01-06,1.5,2,HTZA,HTDA,TLB-001\n",
        HEADER
    ));

    let report = ctx
        .importer
        .import_from_csv("ac-TST", csv.path(), date(2026, 2, 1))
        .await
        .expect("导入失败");

    assert_eq!(report.imported_rows, 1);
    assert_eq!(report.blocked_rows, 1);
    assert!(report
        .violations
        .iter()
        .any(|v| v.row_number == 3 && v.field == "techlog_no"));
}

#[tokio::test]
async fn test_techlog_no_already_in_ledger_blocks_row() {
    let ctx = setup();

    // 先经正常提交链路写入 TLB-001
    ctx.api
        .submit_flight_log(fleet_camo::domain::NewFlightLog {
            aircraft_id: "ac-TST".to_string(),
            date: date(2026, 1, 4),
            block_hrs: 1.0,
            cycles: 1,
            from_icao: None,
            to_icao: None,
            techlog_no: Some("TLB-001".to_string()),
            pilot: None,
            remarks: None,
            cofa_reset: false,
            check_override_hrs: None,
            is_extension: false,
        })
        .await
        .expect("提交失败");

    let csv = write_csv(&format!("{}2026-01-05,2.5,3,HTDA,HTZA,TLB-001\n", HEADER));
    let report = ctx
        .importer
        .import_from_csv("ac-TST", csv.path(), date(2026, 2, 1))
        .await
        .expect("导入失败");

    assert_eq!(report.imported_rows, 0);
    assert_eq!(report.blocked_rows, 1);
    assert_eq!(ctx.flight_log_repo.count_for_aircraft("ac-TST").unwrap(), 1);
}

#[tokio::test]
async fn test_future_date_imports_with_warning() {
    let ctx = setup();
    let csv = write_csv(&format!("{}2026-03-05,2.5,3,HTDA,HTZA,TLB-001\n", HEADER));

    let report = ctx
        .importer
        .import_from_csv("ac-TST", csv.path(), date(2026, 2, 1))
        .await
        .expect("导入失败");

    assert_eq!(report.imported_rows, 1);
    assert_eq!(report.blocked_rows, 0);
    assert_eq!(report.warning_rows, 1);
    assert_eq!(report.violations.len(), 1);
}

// ==========================================
// 文件级错误
// ==========================================

#[tokio::test]
async fn test_missing_file_is_rejected() {
    let ctx = setup();

    let err = ctx
        .importer
        .import_from_csv(
            "ac-TST",
            std::path::Path::new("/nonexistent/techlog.csv"),
            date(2026, 2, 1),
        )
        .await
        .expect_err("不存在的文件应报错");
    assert!(matches!(err, ImportError::FileNotFound(_)));
}

#[tokio::test]
async fn test_unsupported_extension_is_rejected() {
    let ctx = setup();
    let mut file = tempfile::Builder::new()
        .suffix(".xlsx")
        .tempfile()
        .expect("创建临时文件失败");
    file.write_all(b"not a csv").unwrap();

    let err = ctx
        .importer
        .import_from_csv("ac-TST", file.path(), date(2026, 2, 1))
        .await
        .expect_err("非 CSV 扩展名应报错");
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}
