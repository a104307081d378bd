// ==========================================
// 到期预测引擎测试
// ==========================================
// 测试范围:
// 1. DAYS 限制直接取剩余天数
// 2. HOURS/CYCLES 按日均利用率折算（向上取整）
// 3. 利用率为 0 的单位从预测中排除
// 4. 多限制取最小估计
// 5. 窗口命中的单调性
// ==========================================

mod test_helpers;

use fleet_camo::domain::types::{DueStatus, DueUnit};
use fleet_camo::{ComputedDue, DueLimit, ProjectionEngine};
use test_helpers::{date, test_aircraft, test_baseline};

// ==========================================
// 辅助函数
// ==========================================

fn due_with(limits: Vec<DueLimit>) -> ComputedDue {
    ComputedDue {
        item_id: "it-1".to_string(),
        title: "Test Item".to_string(),
        limits,
        status: DueStatus::Ok,
        estimated_days: None,
    }
}

fn aircraft(avg_daily_hrs: f64, avg_daily_cyc: f64) -> fleet_camo::Aircraft {
    let b = test_baseline(date(2026, 1, 1));
    let mut a = test_aircraft("ac-TST", &b);
    a.avg_daily_hrs = avg_daily_hrs;
    a.avg_daily_cyc = avg_daily_cyc;
    a
}

fn limit(unit: DueUnit, remaining: f64) -> DueLimit {
    DueLimit { unit, remaining }
}

// ==========================================
// 折算口径
// ==========================================

#[test]
fn test_days_limit_taken_directly() {
    let engine = ProjectionEngine::new();
    let due = due_with(vec![limit(DueUnit::Days, 45.0)]);

    assert_eq!(engine.estimated_days(&due, &aircraft(5.0, 4.0)), Some(45));
}

#[test]
fn test_hours_limit_scaled_by_daily_rate_with_ceiling() {
    let engine = ProjectionEngine::new();
    // 32h / 5h/天 = 6.4 → 7 天
    let due = due_with(vec![limit(DueUnit::Hours, 32.0)]);

    assert_eq!(engine.estimated_days(&due, &aircraft(5.0, 4.0)), Some(7));
}

#[test]
fn test_cycles_limit_scaled_by_daily_rate() {
    let engine = ProjectionEngine::new();
    // 10cyc / 4cyc/天 = 2.5 → 3 天
    let due = due_with(vec![limit(DueUnit::Cycles, 10.0)]);

    assert_eq!(engine.estimated_days(&due, &aircraft(5.0, 4.0)), Some(3));
}

#[test]
fn test_overdue_limit_projects_negative_days() {
    let engine = ProjectionEngine::new();
    let due = due_with(vec![limit(DueUnit::Hours, -10.0)]);

    assert_eq!(engine.estimated_days(&due, &aircraft(5.0, 4.0)), Some(-2));
}

// ==========================================
// 利用率缺失
// ==========================================

#[test]
fn test_zero_rate_unit_is_excluded() {
    let engine = ProjectionEngine::new();
    let due = due_with(vec![
        limit(DueUnit::Hours, 10.0),
        limit(DueUnit::Days, 40.0),
    ]);

    // 日均小时为 0: HOURS 不可折算, 只剩 DAYS
    assert_eq!(engine.estimated_days(&due, &aircraft(0.0, 4.0)), Some(40));
}

#[test]
fn test_no_convertible_limit_yields_none() {
    let engine = ProjectionEngine::new();
    let due = due_with(vec![limit(DueUnit::Hours, 10.0)]);

    assert_eq!(engine.estimated_days(&due, &aircraft(0.0, 0.0)), None);
    assert!(!engine.in_projection_window(&due, &aircraft(0.0, 0.0), 90));
}

// ==========================================
// 多限制与窗口
// ==========================================

#[test]
fn test_minimum_across_limits() {
    let engine = ProjectionEngine::new();
    let due = due_with(vec![
        limit(DueUnit::Hours, 100.0), // 100/5 = 20 天
        limit(DueUnit::Cycles, 20.0), // 20/4 = 5 天
        limit(DueUnit::Days, 60.0),
    ]);

    assert_eq!(engine.estimated_days(&due, &aircraft(5.0, 4.0)), Some(5));
}

#[test]
fn test_window_hit_is_monotonic() {
    let engine = ProjectionEngine::new();
    let a = aircraft(5.0, 4.0);
    let due = due_with(vec![limit(DueUnit::Days, 45.0)]);

    assert!(!engine.in_projection_window(&due, &a, 30));
    assert!(engine.in_projection_window(&due, &a, 60));
    assert!(engine.in_projection_window(&due, &a, 90));
}
