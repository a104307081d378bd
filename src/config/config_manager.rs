// ==========================================
// 机队持续适航维修管理系统 - 配置管理器
// ==========================================
// 依据: CAMO_Core_Spec.md - 配置项全集
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::config_keys;
use crate::config::usage_config_trait::UsageConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::aircraft::UsageBaseline;
use crate::engine::due_classifier::DueThresholds;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 参数
    /// - key: 配置键
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入配置值（INSERT OR REPLACE, scope_id='global'）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 写入某机使用基准（JSON 序列化）
    pub fn set_usage_baseline(
        &self,
        aircraft_id: &str,
        baseline: &UsageBaseline,
    ) -> Result<(), Box<dyn Error>> {
        let key = format!("{}{}", config_keys::USAGE_BASELINE_PREFIX, aircraft_id);
        let json = serde_json::to_string(baseline)?;
        self.set_config_value(&key, &json)
    }

    /// 读取 f64 配置（缺失/解析失败取默认值）
    fn get_f64_or(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(default))
    }

    /// 读取 i64 配置（缺失/解析失败取默认值）
    fn get_i64_or(&self, key: &str, default: i64) -> Result<i64, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(default))
    }
}

// ==========================================
// UsageConfigReader 实现
// ==========================================

#[async_trait]
impl UsageConfigReader for ConfigManager {
    async fn get_usage_baseline(
        &self,
        aircraft_id: &str,
    ) -> Result<Option<UsageBaseline>, Box<dyn Error>> {
        let key = format!("{}{}", config_keys::USAGE_BASELINE_PREFIX, aircraft_id);
        let raw = match self.get_config_value(&key)? {
            Some(v) => v,
            None => return Ok(None),
        };

        let baseline: UsageBaseline = serde_json::from_str(&raw)?;
        Ok(Some(baseline))
    }

    async fn get_due_thresholds(&self) -> Result<DueThresholds, Box<dyn Error>> {
        Ok(DueThresholds {
            due_soon_hrs: self.get_f64_or(config_keys::DUE_SOON_HOURS, 10.0)?,
            due_soon_cyc: self.get_i64_or(config_keys::DUE_SOON_CYCLES, 10)?,
            due_soon_days: self.get_i64_or(config_keys::DUE_SOON_DAYS, 7)?,
        })
    }

    async fn get_projection_windows(&self) -> Result<Vec<i64>, Box<dyn Error>> {
        let raw = self.get_config_value(config_keys::PROJECTION_WINDOWS)?;
        let windows = raw
            .and_then(|v| serde_json::from_str::<Vec<i64>>(&v).ok())
            .unwrap_or_else(|| vec![30, 60, 90]);
        Ok(windows)
    }
}
