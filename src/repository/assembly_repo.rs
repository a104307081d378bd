// ==========================================
// 机队持续适航维修管理系统 - 装机件数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: tsn_hrs/csn 的派生公式由引擎层给定,
//       本层只负责按机批量落库
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::aircraft::Assembly;
use crate::domain::types::AssemblyKind;
use crate::repository::aircraft_repo::parse_utc;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// AssemblyRepository - 装机件数据仓储
// ==========================================
pub struct AssemblyRepository {
    conn: Arc<Mutex<Connection>>,
}

const ASSEMBLY_COLUMNS: &str = r#"
    assembly_id, aircraft_id, kind, position, model, serial,
    tsn_hrs, csn, tso_hrs, cso, last_overhaul_date, tbo_hrs, updated_at
"#;

impl AssemblyRepository {
    /// 创建新的 AssemblyRepository 实例
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

    /// 插入装机件（INSERT OR REPLACE）
    pub fn insert(&self, assembly: &Assembly) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO assembly (
                assembly_id, aircraft_id, kind, position, model, serial,
                tsn_hrs, csn, tso_hrs, cso, last_overhaul_date, tbo_hrs, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                assembly.assembly_id,
                assembly.aircraft_id,
                assembly.kind.to_string(),
                assembly.position,
                assembly.model,
                assembly.serial,
                assembly.tsn_hrs,
                assembly.csn,
                assembly.tso_hrs,
                assembly.cso,
                assembly.last_overhaul_date.map(|d| d.to_string()),
                assembly.tbo_hrs,
                assembly.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 按飞机列出装机件
    pub fn list_for_aircraft(&self, aircraft_id: &str) -> RepositoryResult<Vec<Assembly>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM assembly WHERE aircraft_id = ?1 ORDER BY kind, position",
            ASSEMBLY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params![aircraft_id], map_assembly_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// 按机重新推导 TSN/CSN（tsn = current_hrs - tso, csn = current_cyc - cso）
    ///
    /// # 说明
    /// - 仅台账回放路径调用; 单条 UPDATE 覆盖该机全部装机件, 保证派生一致性
    pub fn rederive_counters(
        &self,
        aircraft_id: &str,
        current_hrs: f64,
        current_cyc: i64,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE assembly SET
                tsn_hrs = ?1 - tso_hrs,
                csn = ?2 - cso,
                updated_at = ?3
            WHERE aircraft_id = ?4
            "#,
            params![
                current_hrs,
                current_cyc,
                Utc::now().to_rfc3339(),
                aircraft_id
            ],
        )?;
        Ok(changed)
    }
}

// ==========================================
// 行映射
// ==========================================

fn map_assembly_row(row: &Row<'_>) -> rusqlite::Result<Assembly> {
    let kind_raw: String = row.get(2)?;
    let last_overhaul_raw: Option<String> = row.get(10)?;
    let updated_at_raw: String = row.get(12)?;

    Ok(Assembly {
        assembly_id: row.get(0)?,
        aircraft_id: row.get(1)?,
        kind: AssemblyKind::parse(&kind_raw).unwrap_or(AssemblyKind::Engine),
        position: row.get(3)?,
        model: row.get(4)?,
        serial: row.get(5)?,
        tsn_hrs: row.get(6)?,
        csn: row.get(7)?,
        tso_hrs: row.get(8)?,
        cso: row.get(9)?,
        last_overhaul_date: last_overhaul_raw.and_then(|s| s.parse::<NaiveDate>().ok()),
        tbo_hrs: row.get(11)?,
        updated_at: parse_utc(&updated_at_raw),
    })
}
