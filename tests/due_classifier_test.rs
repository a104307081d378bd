// ==========================================
// 到期判定引擎测试
// ==========================================
// 测试范围:
// 1. 单限制边界判定（OVERDUE / DUE / DUE_SOON / OK）
// 2. 多限制取最严
// 3. 初始/重复间隔选择与 legacy 回落
// 4. 排除规则（归入父定检 / 未声明间隔 / 锚点日期缺失）
// ==========================================

mod test_helpers;

use chrono::Utc;
use fleet_camo::domain::types::{DueStatus, DueUnit, TaskType};
use fleet_camo::domain::{IntervalSet, ItemKind, MaintenanceItem, UsageAnchor};
use fleet_camo::{DueClassifier, DueLimit, DueThresholds};
use test_helpers::{date, test_aircraft, test_baseline};

// ==========================================
// 辅助函数
// ==========================================

fn item(item_id: &str, intervals: IntervalSet, last_done: UsageAnchor) -> MaintenanceItem {
    let now = Utc::now();
    MaintenanceItem {
        item_id: item_id.to_string(),
        aircraft_id: "ac-TST".to_string(),
        title: format!("Item {}", item_id),
        reference: None,
        kind: ItemKind::Check,
        intervals,
        last_done,
        created_at: now,
        updated_at: now,
    }
}

fn aircraft_at(current_hrs: f64, current_cyc: i64) -> fleet_camo::Aircraft {
    let b = test_baseline(date(2026, 1, 1));
    let mut a = test_aircraft("ac-TST", &b);
    a.current_hrs = current_hrs;
    a.current_cyc = current_cyc;
    a
}

fn classifier() -> DueClassifier {
    DueClassifier::new(DueThresholds::default())
}

// ==========================================
// 单限制边界
// ==========================================

#[test]
fn test_hours_limit_boundaries() {
    let c = classifier();
    let today = date(2026, 3, 1);
    // 锚点 0h + 间隔 100h
    let it = item(
        "100hr",
        IntervalSet::single(Some(100.0), None, None),
        UsageAnchor {
            date: None,
            hrs: Some(0.0),
            cyc: None,
        },
    );

    let cases = [
        (100.0, DueStatus::Due),
        (101.0, DueStatus::Overdue),
        (92.0, DueStatus::DueSoon), // 剩余 8 ≤ 阈值 10
        (50.0, DueStatus::Ok),
    ];
    for (hrs, expected) in cases {
        let due = c
            .compute_due(&it, &aircraft_at(hrs, 0), false, today)
            .unwrap();
        assert_eq!(due.status, expected, "current_hrs={}", hrs);
    }
}

#[test]
fn test_days_limit_uses_anchor_date() {
    let c = classifier();
    let it = item(
        "12m",
        IntervalSet::single(None, None, Some(365)),
        UsageAnchor {
            date: Some(date(2025, 3, 1)),
            hrs: None,
            cyc: None,
        },
    );
    let a = aircraft_at(0.0, 0);

    // 到期日 2026-03-01
    let due = c.compute_due(&it, &a, false, date(2026, 3, 1)).unwrap();
    assert_eq!(due.status, DueStatus::Due);

    let due = c.compute_due(&it, &a, false, date(2026, 3, 2)).unwrap();
    assert_eq!(due.status, DueStatus::Overdue);

    let due = c.compute_due(&it, &a, false, date(2026, 2, 25)).unwrap();
    assert_eq!(due.status, DueStatus::DueSoon);
}

#[test]
fn test_missing_usage_anchor_defaults_to_zero() {
    let c = classifier();
    // 无小时锚点: 自新口径, 下次到期 = 0 + 100
    let it = item(
        "tsn",
        IntervalSet::single(Some(100.0), None, None),
        UsageAnchor::default(),
    );

    let due = c
        .compute_due(&it, &aircraft_at(120.0, 0), false, date(2026, 3, 1))
        .unwrap();
    assert_eq!(due.status, DueStatus::Overdue);
    assert_eq!(due.min_remaining(), -20.0);
}

// ==========================================
// 多限制聚合
// ==========================================

#[test]
fn test_aggregate_takes_worst_limit() {
    let c = classifier();
    let today = date(2026, 3, 1);
    // 小时充裕, 循环已超限
    let it = item(
        "multi",
        IntervalSet::single(Some(1000.0), Some(100), None),
        UsageAnchor {
            date: None,
            hrs: Some(0.0),
            cyc: Some(0),
        },
    );

    let due = c
        .compute_due(&it, &aircraft_at(100.0, 150), false, today)
        .unwrap();
    assert_eq!(due.status, DueStatus::Overdue);
    assert_eq!(due.limits.len(), 2);
    assert_eq!(due.min_remaining(), -50.0);
}

#[test]
fn test_classify_limit_per_unit_bands() {
    let c = classifier();
    // 循环阈值 10, 天阈值 7
    assert_eq!(
        c.classify_limit(&DueLimit {
            unit: DueUnit::Cycles,
            remaining: 10.0
        }),
        DueStatus::DueSoon
    );
    assert_eq!(
        c.classify_limit(&DueLimit {
            unit: DueUnit::Days,
            remaining: 8.0
        }),
        DueStatus::Ok
    );
}

// ==========================================
// 初始/重复间隔
// ==========================================

#[test]
fn test_repeat_interval_after_history() {
    let c = classifier();
    let today = date(2026, 3, 1);
    let mut it = item(
        "rep",
        IntervalSet::default(),
        UsageAnchor {
            date: None,
            hrs: Some(500.0),
            cyc: None,
        },
    );
    it.intervals.initial_hrs = Some(200.0);
    it.intervals.repeat_hrs = Some(100.0);

    let a = aircraft_at(550.0, 0);
    // 无履历: 初始间隔 200 → 剩余 150
    let due = c.compute_due(&it, &a, false, today).unwrap();
    assert_eq!(due.min_remaining(), 150.0);
    // 有履历: 重复间隔 100 → 剩余 50
    let due = c.compute_due(&it, &a, true, today).unwrap();
    assert_eq!(due.min_remaining(), 50.0);
}

#[test]
fn test_legacy_single_interval_falls_back_across_sides() {
    let c = classifier();
    let today = date(2026, 3, 1);
    // 只声明重复间隔: 无履历时回落使用
    let mut it = item("legacy", IntervalSet::default(), UsageAnchor::default());
    it.intervals.repeat_hrs = Some(100.0);

    let due = c
        .compute_due(&it, &aircraft_at(30.0, 0), false, today)
        .unwrap();
    assert_eq!(due.min_remaining(), 70.0);
}

// ==========================================
// 排除规则
// ==========================================

#[test]
fn test_task_subsumed_by_check_is_excluded() {
    let c = classifier();
    let mut it = item(
        "sub",
        IntervalSet::single(Some(100.0), None, None),
        UsageAnchor::default(),
    );
    it.kind = ItemKind::Task {
        task_type: TaskType::Inspection,
        check_id: Some("check-parent".to_string()),
    };

    assert!(c
        .compute_due(&it, &aircraft_at(0.0, 0), false, date(2026, 3, 1))
        .is_none());
}

#[test]
fn test_item_without_intervals_is_excluded() {
    let c = classifier();
    let it = item("none", IntervalSet::default(), UsageAnchor::default());

    assert!(c
        .compute_due(&it, &aircraft_at(0.0, 0), false, date(2026, 3, 1))
        .is_none());
}

#[test]
fn test_days_limit_omitted_without_anchor_date() {
    let c = classifier();
    // 天间隔声明但无锚点日期: DAYS 单位不列入, 小时单位照常
    let it = item(
        "mixed",
        IntervalSet::single(Some(100.0), None, Some(365)),
        UsageAnchor {
            date: None,
            hrs: Some(0.0),
            cyc: None,
        },
    );

    let due = c
        .compute_due(&it, &aircraft_at(50.0, 0), false, date(2026, 3, 1))
        .unwrap();
    assert_eq!(due.limits.len(), 1);
    assert_eq!(due.limits[0].unit, DueUnit::Hours);
}
