// ==========================================
// 机队持续适航维修管理系统 - 维修项目仓储
// ==========================================
// 依据: Due_Engine_Spec_v0.2.md - 1. 项目统一建模
// 红线: Repository 不含业务逻辑; 种类差异只体现在
//       kind/task_type/check_id/part_no 列的映射上
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::maintenance::{IntervalSet, ItemKind, MaintenanceItem, UsageAnchor};
use crate::domain::types::TaskType;
use crate::repository::aircraft_repo::parse_utc;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// MaintenanceItemRepository - 维修项目仓储
// ==========================================
pub struct MaintenanceItemRepository {
    conn: Arc<Mutex<Connection>>,
}

const ITEM_COLUMNS: &str = r#"
    item_id, aircraft_id, title, reference, kind, task_type, check_id,
    part_no, serial_no,
    initial_interval_hrs, initial_interval_cyc, initial_interval_days,
    repeat_interval_hrs, repeat_interval_cyc, repeat_interval_days,
    last_done_date, last_done_hrs, last_done_cyc,
    created_at, updated_at
"#;

impl MaintenanceItemRepository {
    /// 创建新的 MaintenanceItemRepository 实例
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

    /// 插入维修项目（INSERT OR REPLACE）
    pub fn insert(&self, item: &MaintenanceItem) -> RepositoryResult<()> {
        let (kind, task_type, check_id, part_no, serial_no) = flatten_kind(&item.kind);

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO maintenance_item (
                item_id, aircraft_id, title, reference, kind, task_type, check_id,
                part_no, serial_no,
                initial_interval_hrs, initial_interval_cyc, initial_interval_days,
                repeat_interval_hrs, repeat_interval_cyc, repeat_interval_days,
                last_done_date, last_done_hrs, last_done_cyc,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20
            )
            "#,
            params![
                item.item_id,
                item.aircraft_id,
                item.title,
                item.reference,
                kind,
                task_type,
                check_id,
                part_no,
                serial_no,
                item.intervals.initial_hrs,
                item.intervals.initial_cyc,
                item.intervals.initial_days,
                item.intervals.repeat_hrs,
                item.intervals.repeat_cyc,
                item.intervals.repeat_days,
                item.last_done.date.map(|d| d.to_string()),
                item.last_done.hrs,
                item.last_done.cyc,
                item.created_at.to_rfc3339(),
                item.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 按 item_id 查询
    pub fn find_by_id(&self, item_id: &str) -> RepositoryResult<Option<MaintenanceItem>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM maintenance_item WHERE item_id = ?1", ITEM_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        let result = stmt.query_row(params![item_id], map_item_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按飞机列出维修项目
    pub fn list_for_aircraft(&self, aircraft_id: &str) -> RepositoryResult<Vec<MaintenanceItem>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM maintenance_item WHERE aircraft_id = ?1 ORDER BY title",
            ITEM_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params![aircraft_id], map_item_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// 更新上次完成锚点（"标记完成"路径）
    pub fn update_last_done(
        &self,
        item_id: &str,
        anchor: &UsageAnchor,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE maintenance_item SET
                last_done_date = ?1,
                last_done_hrs = ?2,
                last_done_cyc = ?3,
                updated_at = ?4
            WHERE item_id = ?5
            "#,
            params![
                anchor.date.map(|d| d.to_string()),
                anchor.hrs,
                anchor.cyc,
                Utc::now().to_rfc3339(),
                item_id,
            ],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "maintenance_item".to_string(),
                id: item_id.to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// kind 列映射
// ==========================================

type FlatKind<'a> = (
    &'static str,
    Option<String>,
    Option<&'a String>,
    Option<&'a String>,
    Option<&'a String>,
);

fn flatten_kind(kind: &ItemKind) -> FlatKind<'_> {
    match kind {
        ItemKind::Task {
            task_type,
            check_id,
        } => ("TASK", Some(task_type.to_string()), check_id.as_ref(), None, None),
        ItemKind::Check => ("CHECK", None, None, None, None),
        ItemKind::Component { part_no, serial_no } => {
            ("COMPONENT", None, None, part_no.as_ref(), serial_no.as_ref())
        }
    }
}

fn map_item_row(row: &Row<'_>) -> rusqlite::Result<MaintenanceItem> {
    let kind_raw: String = row.get(4)?;
    let task_type_raw: Option<String> = row.get(5)?;
    let check_id: Option<String> = row.get(6)?;
    let part_no: Option<String> = row.get(7)?;
    let serial_no: Option<String> = row.get(8)?;
    let last_done_date_raw: Option<String> = row.get(15)?;
    let created_at_raw: String = row.get(18)?;
    let updated_at_raw: String = row.get(19)?;

    let kind = match kind_raw.as_str() {
        "CHECK" => ItemKind::Check,
        "COMPONENT" => ItemKind::Component { part_no, serial_no },
        // 未知种类按任务兜底（CUSTOM）
        _ => ItemKind::Task {
            task_type: task_type_raw
                .as_deref()
                .and_then(TaskType::parse)
                .unwrap_or(TaskType::Custom),
            check_id,
        },
    };

    Ok(MaintenanceItem {
        item_id: row.get(0)?,
        aircraft_id: row.get(1)?,
        title: row.get(2)?,
        reference: row.get(3)?,
        kind,
        intervals: IntervalSet {
            initial_hrs: row.get(9)?,
            initial_cyc: row.get(10)?,
            initial_days: row.get(11)?,
            repeat_hrs: row.get(12)?,
            repeat_cyc: row.get(13)?,
            repeat_days: row.get(14)?,
        },
        last_done: UsageAnchor {
            date: last_done_date_raw.and_then(|s| s.parse::<NaiveDate>().ok()),
            hrs: row.get(16)?,
            cyc: row.get(17)?,
        },
        created_at: parse_utc(&created_at_raw),
        updated_at: parse_utc(&updated_at_raw),
    })
}
