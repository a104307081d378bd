// ==========================================
// 机队持续适航维修管理系统 - 飞机数据仓储
// ==========================================
// 依据: CAMO_Core_Spec.md - PART D 引擎铁律
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::aircraft::Aircraft;
use crate::domain::flight_log::UsageSnapshot;
use crate::domain::types::AircraftStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// AircraftRepository - 飞机数据仓储
// ==========================================
/// 飞机数据仓储
/// 职责: 管理 aircraft 表的 CRUD 操作
/// 红线: 不含业务逻辑，只负责数据访问
pub struct AircraftRepository {
    conn: Arc<Mutex<Connection>>,
}

const AIRCRAFT_COLUMNS: &str = r#"
    aircraft_id, registration, aircraft_type, msn, status, base,
    current_hrs, current_cyc, last_log_date,
    avg_daily_hrs, avg_daily_cyc,
    cofa_hours, hours_to_check, engine_oh, prop_oh,
    created_at, updated_at
"#;

impl AircraftRepository {
    /// 创建新的 AircraftRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入飞机主数据（INSERT OR REPLACE）
    pub fn insert(&self, aircraft: &Aircraft) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO aircraft (
                aircraft_id, registration, aircraft_type, msn, status, base,
                current_hrs, current_cyc, last_log_date,
                avg_daily_hrs, avg_daily_cyc,
                cofa_hours, hours_to_check, engine_oh, prop_oh,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            "#,
            params![
                aircraft.aircraft_id,
                aircraft.registration,
                aircraft.aircraft_type,
                aircraft.msn,
                aircraft.status.to_string(),
                aircraft.base,
                aircraft.current_hrs,
                aircraft.current_cyc,
                aircraft.current_date.map(|d| d.to_string()),
                aircraft.avg_daily_hrs,
                aircraft.avg_daily_cyc,
                aircraft.cofa_hours,
                aircraft.hours_to_check,
                aircraft.engine_oh,
                aircraft.prop_oh,
                aircraft.created_at.to_rfc3339(),
                aircraft.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 按 aircraft_id 查询
    ///
    /// # 返回
    /// - Ok(Some(Aircraft)): 找到记录
    /// - Ok(None): 未找到记录
    pub fn find_by_id(&self, aircraft_id: &str) -> RepositoryResult<Option<Aircraft>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM aircraft WHERE aircraft_id = ?1", AIRCRAFT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        let result = stmt.query_row(params![aircraft_id], map_aircraft_row);
        match result {
            Ok(aircraft) => Ok(Some(aircraft)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 列出全部飞机（按注册号排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Aircraft>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM aircraft ORDER BY registration", AIRCRAFT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map([], map_aircraft_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// 将最新回放快照写入飞机当前状态
    ///
    /// # 说明
    /// - 仅台账回放路径调用（累计状态唯一写入口）
    pub fn update_usage_snapshot(
        &self,
        aircraft_id: &str,
        snapshot: &UsageSnapshot,
        current_date: NaiveDate,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE aircraft SET
                current_hrs = ?1,
                current_cyc = ?2,
                last_log_date = ?3,
                cofa_hours = ?4,
                hours_to_check = ?5,
                engine_oh = ?6,
                prop_oh = ?7,
                updated_at = ?8
            WHERE aircraft_id = ?9
            "#,
            params![
                snapshot.aircraft_hrs,
                snapshot.aircraft_cyc,
                current_date.to_string(),
                snapshot.cofa_hours,
                snapshot.hours_to_check,
                snapshot.engine_oh,
                snapshot.prop_oh,
                Utc::now().to_rfc3339(),
                aircraft_id,
            ],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "aircraft".to_string(),
                id: aircraft_id.to_string(),
            });
        }
        Ok(())
    }

    /// 更新日均利用率（由运行数据统计路径写入）
    pub fn update_avg_daily_rates(
        &self,
        aircraft_id: &str,
        avg_daily_hrs: f64,
        avg_daily_cyc: f64,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE aircraft SET avg_daily_hrs = ?1, avg_daily_cyc = ?2, updated_at = ?3
            WHERE aircraft_id = ?4
            "#,
            params![
                avg_daily_hrs,
                avg_daily_cyc,
                Utc::now().to_rfc3339(),
                aircraft_id
            ],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "aircraft".to_string(),
                id: aircraft_id.to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// 行映射
// ==========================================

fn map_aircraft_row(row: &Row<'_>) -> rusqlite::Result<Aircraft> {
    let status_raw: String = row.get(4)?;
    let current_date_raw: Option<String> = row.get(8)?;
    let created_at_raw: String = row.get(15)?;
    let updated_at_raw: String = row.get(16)?;

    Ok(Aircraft {
        aircraft_id: row.get(0)?,
        registration: row.get(1)?,
        aircraft_type: row.get(2)?,
        msn: row.get(3)?,
        status: AircraftStatus::parse(&status_raw).unwrap_or(AircraftStatus::InService),
        base: row.get(5)?,
        current_hrs: row.get(6)?,
        current_cyc: row.get(7)?,
        current_date: current_date_raw.and_then(|s| s.parse::<NaiveDate>().ok()),
        avg_daily_hrs: row.get(9)?,
        avg_daily_cyc: row.get(10)?,
        cofa_hours: row.get(11)?,
        hours_to_check: row.get(12)?,
        engine_oh: row.get(13)?,
        prop_oh: row.get(14)?,
        created_at: parse_utc(&created_at_raw),
        updated_at: parse_utc(&updated_at_raw),
    })
}

/// 解析 RFC3339 时间戳（历史数据缺失时回落到当前时间）
pub(crate) fn parse_utc(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
