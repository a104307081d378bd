// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、基准与测试数据生成
// ==========================================

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use fleet_camo::db::init_schema;
use fleet_camo::domain::types::AircraftStatus;
use fleet_camo::domain::{Aircraft, UsageBaseline};
use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（PRAGMA 同生产路径）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(fleet_camo::db::open_sqlite_connection(db_path)?)
}

/// 构造日期（测试便捷写法）
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 标准测试基准: 机体 1000.0h / 800cyc, 发动机与机体同步,
/// 定检倒计数 100h, 适航证计数 40h
pub fn test_baseline(epoch_date: NaiveDate) -> UsageBaseline {
    UsageBaseline {
        epoch_date,
        aircraft_hrs: 1000.0,
        aircraft_cyc: 800,
        engine_tsn: 1000.0,
        engine_csn: 800,
        engine_tso: 0.0,
        engine_cso: 0,
        engine_oh: 600.0,
        prop_tsn: 1000.0,
        prop_tso: 200.0,
        prop_oh: 300.0,
        cofa_hours: 40.0,
        hours_to_check: 100.0,
    }
}

/// 按基准构造测试飞机（累计状态 = 基准）
pub fn test_aircraft(aircraft_id: &str, baseline: &UsageBaseline) -> Aircraft {
    let now = Utc::now();
    Aircraft {
        aircraft_id: aircraft_id.to_string(),
        registration: "5H-TST".to_string(),
        aircraft_type: "C208B".to_string(),
        msn: None,
        status: AircraftStatus::InService,
        base: None,
        current_hrs: baseline.aircraft_hrs,
        current_cyc: baseline.aircraft_cyc,
        current_date: Some(baseline.epoch_date),
        avg_daily_hrs: 5.0,
        avg_daily_cyc: 4.0,
        cofa_hours: Some(baseline.cofa_hours),
        hours_to_check: Some(baseline.hours_to_check),
        engine_oh: Some(baseline.engine_oh),
        prop_oh: Some(baseline.prop_oh),
        created_at: now,
        updated_at: now,
    }
}
