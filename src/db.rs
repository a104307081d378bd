// ==========================================
// 机队持续适航维修管理系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供嵌入式建库脚本（schema v1）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 说明：
/// - 版本号用于**提示/告警**（不做自动迁移），避免静默在旧库上运行导致隐性错误。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化数据库 schema（幂等）
///
/// 表清单:
/// - aircraft: 机队主数据 + 当前累计状态（由台账回放引擎独占写入）
/// - assembly: 发动机/螺旋桨装机件（TSN/CSN 为派生列）
/// - flight_log: 飞行记录台账（只追加，随行固化 state-at-time 快照）
/// - maintenance_item: 维修项目（任务/定检/部件统一建模）
/// - compliance_record: 执行履历
/// - config_kv: 配置键值（含每机使用基准）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS aircraft (
            aircraft_id TEXT PRIMARY KEY,
            registration TEXT NOT NULL UNIQUE,
            aircraft_type TEXT NOT NULL,
            msn TEXT,
            status TEXT NOT NULL DEFAULT 'IN_SERVICE',
            base TEXT,
            current_hrs REAL NOT NULL DEFAULT 0,
            current_cyc INTEGER NOT NULL DEFAULT 0,
            last_log_date TEXT,
            avg_daily_hrs REAL NOT NULL DEFAULT 0,
            avg_daily_cyc REAL NOT NULL DEFAULT 0,
            cofa_hours REAL,
            hours_to_check REAL,
            engine_oh REAL,
            prop_oh REAL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS assembly (
            assembly_id TEXT PRIMARY KEY,
            aircraft_id TEXT NOT NULL REFERENCES aircraft(aircraft_id),
            kind TEXT NOT NULL,
            position TEXT,
            model TEXT,
            serial TEXT,
            tsn_hrs REAL NOT NULL DEFAULT 0,
            csn INTEGER NOT NULL DEFAULT 0,
            tso_hrs REAL NOT NULL DEFAULT 0,
            cso INTEGER NOT NULL DEFAULT 0,
            last_overhaul_date TEXT,
            tbo_hrs REAL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_assembly_aircraft ON assembly(aircraft_id);

        CREATE TABLE IF NOT EXISTS flight_log (
            entry_id TEXT PRIMARY KEY,
            aircraft_id TEXT NOT NULL REFERENCES aircraft(aircraft_id),
            flight_date TEXT NOT NULL,
            block_hrs REAL NOT NULL,
            cycles INTEGER NOT NULL,
            from_icao TEXT,
            to_icao TEXT,
            techlog_no TEXT,
            pilot TEXT,
            remarks TEXT,
            cofa_reset INTEGER NOT NULL DEFAULT 0,
            check_override_hrs REAL,
            is_extension INTEGER NOT NULL DEFAULT 0,
            snapshot_json TEXT,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_flight_log_aircraft_date
            ON flight_log(aircraft_id, flight_date);

        CREATE TABLE IF NOT EXISTS maintenance_item (
            item_id TEXT PRIMARY KEY,
            aircraft_id TEXT NOT NULL REFERENCES aircraft(aircraft_id),
            title TEXT NOT NULL,
            reference TEXT,
            kind TEXT NOT NULL,
            task_type TEXT,
            check_id TEXT,
            part_no TEXT,
            serial_no TEXT,
            initial_interval_hrs REAL,
            initial_interval_cyc INTEGER,
            initial_interval_days INTEGER,
            repeat_interval_hrs REAL,
            repeat_interval_cyc INTEGER,
            repeat_interval_days INTEGER,
            last_done_date TEXT,
            last_done_hrs REAL,
            last_done_cyc INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_maintenance_item_aircraft
            ON maintenance_item(aircraft_id);

        CREATE TABLE IF NOT EXISTS compliance_record (
            record_id TEXT PRIMARY KEY,
            item_id TEXT NOT NULL REFERENCES maintenance_item(item_id),
            aircraft_id TEXT NOT NULL REFERENCES aircraft(aircraft_id),
            done_date TEXT NOT NULL,
            hrs_at REAL,
            cyc_at INTEGER,
            remark TEXT,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_compliance_item ON compliance_record(item_id);

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        "#,
    )?;
    Ok(())
}
