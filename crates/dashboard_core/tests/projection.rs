use chrono::{NaiveDate, NaiveDateTime};
use dashboard_core::{
    aggregate, distribution, project, project_messages, Distribution, Filter, Message, MessageKind,
    Projection, RedoCommand,
};
use pretty_assertions::assert_eq;

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn message(id: i64, kind: MessageKind, success: bool) -> Message {
    Message {
        id,
        kind,
        success,
        source: format!("/source/{id}.mkv"),
        destination: None,
        message: None,
        timestamp: at((id % 24) as u32),
    }
}

fn mixed_snapshot() -> Vec<Message> {
    vec![
        message(9, MessageKind::FileProcess, true),
        message(8, MessageKind::System, false),
        message(7, MessageKind::Error, false),
        message(6, MessageKind::FileProcess, false),
        message(5, MessageKind::Success, false),
        message(4, MessageKind::System, false),
        message(3, MessageKind::FileProcess, true),
    ]
}

fn ids(projection: &Projection) -> Vec<i64> {
    match projection {
        Projection::Messages(items) => items.iter().map(|m| m.id).collect(),
        Projection::Redo(items) => items.iter().map(|c| c.id).collect(),
    }
}

#[test]
fn filter_all_returns_snapshot_unchanged() {
    let snapshot = mixed_snapshot();
    let projection = project(&snapshot, &[], Filter::All);
    assert_eq!(projection, Projection::Messages(snapshot.clone()));
}

#[test]
fn type_filters_keep_only_matching_items_in_order() {
    let snapshot = mixed_snapshot();
    let cases = [
        (Filter::FileProcess, MessageKind::FileProcess, vec![9, 6, 3]),
        (Filter::Error, MessageKind::Error, vec![7]),
        (Filter::System, MessageKind::System, vec![8, 4]),
    ];

    for (filter, kind, expected) in cases {
        let projection = project(&snapshot, &[], filter);
        assert_eq!(ids(&projection), expected, "filter {filter:?}");
        if let Projection::Messages(items) = &projection {
            assert!(items.iter().all(|m| m.kind == kind));
        }
    }
}

#[test]
fn projection_is_idempotent() {
    let snapshot = mixed_snapshot();
    for kind in [
        None,
        Some(MessageKind::FileProcess),
        Some(MessageKind::Error),
        Some(MessageKind::System),
    ] {
        let once = project_messages(&snapshot, kind);
        let twice = project_messages(&once, kind);
        assert_eq!(once, twice);
    }
}

#[test]
fn projection_does_not_touch_the_snapshot() {
    let snapshot = mixed_snapshot();
    let before = snapshot.clone();
    let _ = project(&snapshot, &[], Filter::Error);
    assert_eq!(snapshot, before);
}

#[test]
fn redo_filter_selects_the_redo_list() {
    let snapshot = mixed_snapshot();
    let redo = vec![
        RedoCommand {
            id: 41,
            message: Some("retry rename".to_string()),
            timestamp: at(1),
        },
        RedoCommand {
            id: 40,
            message: None,
            timestamp: at(2),
        },
    ];

    let projection = project(&snapshot, &redo, Filter::Redo);
    assert_eq!(projection, Projection::Redo(redo));
}

#[test]
fn three_message_scenario_projects_and_aggregates() {
    let snapshot = vec![
        message(3, MessageKind::Error, false),
        message(2, MessageKind::FileProcess, true),
        message(1, MessageKind::System, false),
    ];

    let projection = project(&snapshot, &[], Filter::All);
    assert_eq!(ids(&projection), vec![3, 2, 1]);

    assert_eq!(
        aggregate(&snapshot).distribution,
        Distribution {
            system: 1,
            file_process: 1,
            error: 1,
            success: 1,
        }
    );
}

#[test]
fn distribution_bounds_hold() {
    let snapshot = mixed_snapshot();
    let dist = distribution(&snapshot);
    assert!(dist.system + dist.file_process + dist.error <= snapshot.len());
    assert!(dist.success <= dist.file_process);
    assert_eq!(dist.success, 2);
    assert_eq!(dist.file_process, 3);
}
