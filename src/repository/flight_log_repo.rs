// ==========================================
// 机队持续适航维修管理系统 - 飞行记录台账仓储
// ==========================================
// 依据: Usage_Ledger_Spec_v0.2.md - 1. 台账事件口径
// 红线: 台账只追加; 读取按 (日期, rowid) 升序,
//       同日事件以插入顺序定序
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::flight_log::{FlightLogEntry, UsageSnapshot};
use crate::repository::aircraft_repo::parse_utc;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// FlightLogRepository - 飞行记录台账仓储
// ==========================================
pub struct FlightLogRepository {
    conn: Arc<Mutex<Connection>>,
}

const FLIGHT_LOG_COLUMNS: &str = r#"
    entry_id, aircraft_id, flight_date, block_hrs, cycles,
    from_icao, to_icao, techlog_no, pilot, remarks,
    cofa_reset, check_override_hrs, is_extension,
    snapshot_json, created_at
"#;

impl FlightLogRepository {
    /// 创建新的 FlightLogRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加一条台账事件
    ///
    /// # 说明
    /// - 只追加, 无 UPDATE 路径（快照固化走 update_snapshot）
    pub fn append(&self, entry: &FlightLogEntry) -> RepositoryResult<()> {
        let snapshot_json = entry
            .snapshot
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO flight_log (
                entry_id, aircraft_id, flight_date, block_hrs, cycles,
                from_icao, to_icao, techlog_no, pilot, remarks,
                cofa_reset, check_override_hrs, is_extension,
                snapshot_json, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                entry.entry_id,
                entry.aircraft_id,
                entry.date.to_string(),
                entry.block_hrs,
                entry.cycles,
                entry.from_icao,
                entry.to_icao,
                entry.techlog_no,
                entry.pilot,
                entry.remarks,
                entry.cofa_reset as i32,
                entry.check_override_hrs,
                entry.is_extension as i32,
                snapshot_json,
                entry.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 按飞机列出台账（回放顺序: 日期升序, 同日按插入顺序）
    pub fn list_for_aircraft(&self, aircraft_id: &str) -> RepositoryResult<Vec<FlightLogEntry>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM flight_log WHERE aircraft_id = ?1 ORDER BY flight_date ASC, rowid ASC",
            FLIGHT_LOG_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params![aircraft_id], map_flight_log_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// 按 entry_id 查询
    pub fn find_by_id(&self, entry_id: &str) -> RepositoryResult<Option<FlightLogEntry>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM flight_log WHERE entry_id = ?1", FLIGHT_LOG_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        let result = stmt.query_row(params![entry_id], map_flight_log_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 固化 state-at-time 快照（每次回放重写全部受影响事件）
    pub fn update_snapshot(
        &self,
        entry_id: &str,
        snapshot: &UsageSnapshot,
    ) -> RepositoryResult<()> {
        let snapshot_json = serde_json::to_string(snapshot)?;

        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE flight_log SET snapshot_json = ?1 WHERE entry_id = ?2",
            params![snapshot_json, entry_id],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "flight_log".to_string(),
                id: entry_id.to_string(),
            });
        }
        Ok(())
    }

    /// 批量固化快照（单事务）
    pub fn batch_update_snapshots(
        &self,
        snapshots: &[(String, UsageSnapshot)],
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for (entry_id, snapshot) in snapshots {
            let snapshot_json = serde_json::to_string(snapshot)?;
            tx.execute(
                "UPDATE flight_log SET snapshot_json = ?1 WHERE entry_id = ?2",
                params![snapshot_json, entry_id],
            )?;
            count += 1;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    /// 同机同批技术记录本编号是否已存在（导入查重）
    pub fn techlog_no_exists(
        &self,
        aircraft_id: &str,
        techlog_no: &str,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM flight_log WHERE aircraft_id = ?1 AND techlog_no = ?2",
            params![aircraft_id, techlog_no],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// 按飞机统计台账事件数
    pub fn count_for_aircraft(&self, aircraft_id: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM flight_log WHERE aircraft_id = ?1",
            params![aircraft_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// ==========================================
// 行映射
// ==========================================

fn map_flight_log_row(row: &Row<'_>) -> rusqlite::Result<FlightLogEntry> {
    let date_raw: String = row.get(2)?;
    let cofa_reset: i32 = row.get(10)?;
    let is_extension: i32 = row.get(12)?;
    let snapshot_json: Option<String> = row.get(13)?;
    let created_at_raw: String = row.get(14)?;

    Ok(FlightLogEntry {
        entry_id: row.get(0)?,
        aircraft_id: row.get(1)?,
        date: date_raw.parse::<NaiveDate>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?,
        block_hrs: row.get(3)?,
        cycles: row.get(4)?,
        from_icao: row.get(5)?,
        to_icao: row.get(6)?,
        techlog_no: row.get(7)?,
        pilot: row.get(8)?,
        remarks: row.get(9)?,
        cofa_reset: cofa_reset != 0,
        check_override_hrs: row.get(11)?,
        is_extension: is_extension != 0,
        snapshot: snapshot_json.and_then(|s| serde_json::from_str::<UsageSnapshot>(&s).ok()),
        created_at: parse_utc(&created_at_raw),
    })
}
