use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use reeltable::bulk::BulkKind;
use reeltable::config::TableConfig;
use reeltable::criteria::TimeWindow;
use reeltable::sort::{SortDirection, SortKey};
use reeltable::store::memory::fixtures::{RecordingStore, StoreCall, StoreFixture};
use reeltable::store::memory::MemStore;
use reeltable::table::Escaped;
use reeltable::{RecordId, RecordPatch, RecordStore, RelationAxis, Status, TableEngine};
use std::collections::BTreeSet;

fn config(rows: usize) -> TableConfig {
    TableConfig {
        rows_per_page: rows,
        ..Default::default()
    }
}

fn fixed_now() -> DateTime<Local> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .unwrap()
        .with_timezone(&Local)
}

fn board() -> RecordingStore {
    StoreFixture::new()
        .with_movie("m1", "Alien", "Done", &["c1"], &["x1"])
        .with_movie("m2", "aliens", "Playlist", &["c2"], &[])
        .with_movie("m3", "Heat", "Upload", &["c1", "c2"], &["x2"])
        .with_movie("m4", "Ronin", "Archived", &[], &[])
        .with_movie("m5", "Collateral", "Download", &["c3"], &["x1"])
        .recording()
}

fn ids(table: &TableEngine<RecordingStore>) -> Vec<String> {
    table
        .view()
        .records
        .iter()
        .map(|r| r.id.to_string())
        .collect()
}

#[test]
fn select_all_selects_every_filtered_record_across_pages() {
    let store = StoreFixture::new().with_movies(10, "Playlist").recording();
    let mut table = TableEngine::new(store, &config(2));
    table.set_status_filter(["Playlist"]);
    table.set_search("movie 0");
    assert_eq!(table.view().total_count, 9);

    table.set_search("movie 1");
    assert_eq!(table.view().total_count, 1);

    table.clear_filters();
    table.set_search("movie 0");
    table.toggle_all();

    assert_eq!(table.selection().len(), 9);
    assert!(table.is_all_selected());
    assert_eq!(table.view().records.len(), 2);

    table.toggle_all();
    assert!(table.selection().is_empty());
}

#[test]
fn select_all_takes_exactly_the_filtered_ids() {
    let mut fixture = StoreFixture::new();
    for i in 1..=10 {
        let status = if [2, 5, 9].contains(&i) { "Done" } else { "Playlist" };
        let id = format!("m{}", i);
        let name = format!("Movie {:02}", i);
        fixture = fixture.with_movie(&id, &name, status, &[], &[]);
    }
    let mut table = TableEngine::new(fixture.recording(), &config(2));
    table.set_status_filter(["Done"]);

    table.toggle_all();

    let selected: BTreeSet<&str> = table.selection().ids().iter().map(|id| id.as_str()).collect();
    assert_eq!(selected, BTreeSet::from(["m2", "m5", "m9"]));
    assert_eq!(table.selection().ids(), table.filtered_ids().as_slice());
    assert!(table.is_all_selected());
}

#[test]
fn bulk_status_commit_issues_one_call_and_clears_selection() {
    let mut table = TableEngine::new(board(), &config(10));
    table.toggle_row(&RecordId::from("m2"));
    table.toggle_row(&RecordId::from("m5"));

    table.open_bulk_menu(BulkKind::Status);
    assert!(table.pick_bulk_value("Editing"));
    let report = table.commit_bulk().unwrap();

    assert!(report.is_clean());
    assert_eq!(report.calls, 1);
    assert_eq!(
        table.store().calls,
        vec![StoreCall::BulkStatus(
            vec![RecordId::from("m2"), RecordId::from("m5")],
            Status::from("Editing"),
        )]
    );
    assert!(table.selection().is_empty());
    assert!(!table.bulk_menu().is_open());

    let editing = table
        .store()
        .inner
        .records()
        .iter()
        .filter(|r| r.status.as_str() == "Editing")
        .count();
    assert_eq!(editing, 2);
}

#[test]
fn bulk_relation_commit_fans_out_and_survives_failures() {
    let store = board().failing_on("m3");
    let mut table = TableEngine::new(store, &config(10));
    for id in ["m1", "m3", "m4"] {
        table.toggle_row(&RecordId::from(id));
    }

    table.open_bulk_menu(BulkKind::Relation(RelationAxis::B));
    table.pick_bulk_value("x9");
    let report = table.commit_bulk().unwrap();

    assert_eq!(report.calls, 3);
    assert_eq!(report.failures, 1);
    let patch = RecordPatch::relations(RelationAxis::B, vec!["x9".to_string()]);
    assert_eq!(
        table.store().calls,
        vec![
            StoreCall::Update(RecordId::from("m1"), patch.clone()),
            StoreCall::Update(RecordId::from("m3"), patch.clone()),
            StoreCall::Update(RecordId::from("m4"), patch),
        ]
    );
    let m3 = table.store().inner.get(&RecordId::from("m3")).unwrap();
    assert_eq!(m3.relations_b, vec!["x2".to_string()]);
}

#[test]
fn switching_bulk_menus_drops_the_pending_value() {
    let mut table = TableEngine::new(board(), &config(10));
    table.toggle_row(&RecordId::from("m1"));
    table.open_bulk_menu(BulkKind::Status);
    table.pick_bulk_value("Done");
    table.open_bulk_menu(BulkKind::Relation(RelationAxis::A));

    assert_eq!(table.bulk_menu().pending(), None);
    assert!(table.commit_bulk().is_none());
    assert!(table.store().calls.is_empty());
}

#[test]
fn filters_combine_with_and_and_any_of_within_a_relation() {
    let mut table = TableEngine::new(board(), &config(10));
    table.set_relation_filter(RelationAxis::A, ["c1", "c3"]);
    table.sort_by(SortKey::Name);
    assert_eq!(ids(&table), vec!["m1", "m5", "m3"]);

    table.set_search("ALIEN");
    assert_eq!(ids(&table), vec!["m1"]);

    table.set_search("");
    table.set_status_filter(["Upload", "Download"]);
    assert_eq!(ids(&table), vec!["m5", "m3"]);
}

#[test]
fn status_sort_puts_unknown_stages_last_both_ways() {
    let mut table = TableEngine::new(board(), &config(10));
    table.sort_by(SortKey::Status);
    assert_eq!(ids(&table), vec!["m2", "m5", "m3", "m1", "m4"]);

    table.sort_by(SortKey::Status);
    assert_eq!(table.sort().direction, SortDirection::Descending);
    assert_eq!(ids(&table), vec!["m1", "m3", "m5", "m2", "m4"]);
}

#[test]
fn sort_keeps_page_and_search_resets_it() {
    let store = StoreFixture::new().with_movies(10, "Playlist").recording();
    let mut table = TableEngine::new(store, &config(3));
    table.next_page();
    table.next_page();
    assert_eq!(table.page(), 3);

    table.sort_by(SortKey::Name);
    assert_eq!(table.page(), 3);
    assert_eq!(table.view().range(), Some((7, 9)));

    table.set_search("movie");
    assert_eq!(table.page(), 1);
}

#[test]
fn page_past_the_end_is_empty_but_keeps_totals() {
    let store = StoreFixture::new().with_movies(5, "Playlist").recording();
    let mut table = TableEngine::new(store, &config(2));
    table.go_to_page(4);

    let view = table.view();
    assert!(view.records.is_empty());
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.total_count, 5);
    assert_eq!(view.range(), None);
}

#[test]
fn time_windows_follow_the_engine_clock() {
    let now = fixed_now().with_timezone(&Utc);
    let store = StoreFixture::new()
        .with_movie_created("m1", "Fresh", now)
        .with_movie_created("m2", "Recent", now - Duration::days(3))
        .with_movie_created("m3", "Older", now - Duration::days(20))
        .with_movie_created("m4", "Ancient", now - Duration::days(40))
        .build();
    let mut table: TableEngine<MemStore> =
        TableEngine::new(store, &config(10)).with_clock(fixed_now);

    table.set_window(Some(TimeWindow::Today));
    assert_eq!(table.view().total_count, 1);

    table.set_window(Some(TimeWindow::Last7Days));
    assert_eq!(table.view().total_count, 2);

    table.set_window(Some(TimeWindow::Last30Days));
    assert_eq!(table.view().total_count, 3);

    table.set_window(None);
    assert_eq!(table.view().total_count, 4);
}

#[test]
fn delete_flow_confirms_through_escape_layers() {
    let mut table = TableEngine::new(board(), &config(10));
    table.toggle_row(&RecordId::from("m4"));
    table.toggle_row(&RecordId::from("m2"));

    assert!(table.request_delete());
    assert_eq!(table.escape(), Escaped::DeleteDialog);
    assert_eq!(table.selection().len(), 2);

    table.request_delete();
    let report = table.confirm_delete().unwrap();

    assert_eq!(
        report.deleted,
        vec![RecordId::from("m4"), RecordId::from("m2")]
    );
    assert_eq!(
        table.store().calls,
        vec![
            StoreCall::Delete(RecordId::from("m4")),
            StoreCall::Delete(RecordId::from("m2")),
        ]
    );
    assert!(table.selection().is_empty());
    assert_eq!(table.view().total_count, 3);
}

#[test]
fn selection_survives_filter_changes() {
    let mut table = TableEngine::new(board(), &config(10));
    table.toggle_row(&RecordId::from("m4"));
    table.set_search("alien");

    assert_eq!(table.view().total_count, 2);
    assert!(table.selection().contains(&RecordId::from("m4")));
    assert!(!table.is_all_selected());
}

#[test]
fn pasted_lines_become_records_in_the_first_stage() {
    let mut table = TableEngine::new(board(), &config(10));
    let created = table
        .add_records("Thief\tMann debut\nheat\n\n  Thief  \nManhunter\n")
        .unwrap();

    assert_eq!(created, 2);
    let thief = table
        .store()
        .inner
        .records()
        .iter()
        .find(|r| r.name == "Thief")
        .unwrap();
    assert_eq!(thief.status.as_str(), "Playlist");
    assert_eq!(thief.note(), "Mann debut");
}
