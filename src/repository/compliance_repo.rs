// ==========================================
// 机队持续适航维修管理系统 - 执行履历仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 用途: 判定引擎按 has_history 选择初始/重复间隔
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::maintenance::ComplianceRecord;
use crate::repository::aircraft_repo::parse_utc;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ComplianceRepository - 执行履历仓储
// ==========================================
pub struct ComplianceRepository {
    conn: Arc<Mutex<Connection>>,
}

const COMPLIANCE_COLUMNS: &str = r#"
    record_id, item_id, aircraft_id, done_date, hrs_at, cyc_at, remark, created_at
"#;

impl ComplianceRepository {
    /// 创建新的 ComplianceRepository 实例
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

    /// 追加一条执行履历
    pub fn insert(&self, record: &ComplianceRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO compliance_record (
                record_id, item_id, aircraft_id, done_date, hrs_at, cyc_at, remark, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.record_id,
                record.item_id,
                record.aircraft_id,
                record.date.to_string(),
                record.hrs_at,
                record.cyc_at,
                record.remark,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 按项目列出履历（执行日期降序）
    pub fn list_for_item(&self, item_id: &str) -> RepositoryResult<Vec<ComplianceRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM compliance_record WHERE item_id = ?1 ORDER BY done_date DESC, rowid DESC",
            COMPLIANCE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params![item_id], map_compliance_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// 项目是否有执行履历（至少执行过一次）
    pub fn has_history(&self, item_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM compliance_record WHERE item_id = ?1",
            params![item_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

// ==========================================
// 行映射
// ==========================================

fn map_compliance_row(row: &Row<'_>) -> rusqlite::Result<ComplianceRecord> {
    let date_raw: String = row.get(3)?;
    let created_at_raw: String = row.get(7)?;

    Ok(ComplianceRecord {
        record_id: row.get(0)?,
        item_id: row.get(1)?,
        aircraft_id: row.get(2)?,
        date: date_raw.parse::<NaiveDate>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?,
        hrs_at: row.get(4)?,
        cyc_at: row.get(5)?,
        remark: row.get(6)?,
        created_at: parse_utc(&created_at_raw),
    })
}
