//! Behaviour of the generic entity list view against an in-memory backend.

mod common;

use std::time::Duration;

use andon_console::SubmitOutcome;
use andon_core::classify::ErrorClass;
use andon_core::entity::{EntityKind, EntityRecord};
use andon_core::error::CoreError;
use andon_core::listing::SortOrder;
use andon_core::modal::{Modal, ModalKind};
use andon_core::notification::Severity;
use assert_matches::assert_matches;
use common::{names, site, Call, Failure, Harness};

fn alpha_beta() -> Harness {
    Harness::new(
        EntityKind::Site,
        vec![site("2", "Beta"), site("1", "Alpha")],
    )
}

fn open_add(h: &mut Harness, name: &str, description: &str) {
    assert!(h.view.open_modal(ModalKind::Add, None, None));
    h.view.set_field("name", name).unwrap();
    h.view.set_field("description", description).unwrap();
}

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_sorts_ascending_and_counts() {
    let mut h = alpha_beta();
    assert_eq!(h.view.title(), "Sites");

    h.view.load().await;

    assert_eq!(names(h.view.records()), vec!["Alpha", "Beta"]);
    assert_eq!(h.view.title(), "Sites (2)");
    assert!(h.view.records().iter().all(|r| r.visible));
    assert!(!h.view.is_loading());
    assert!(h.view.error().is_none());
}

#[tokio::test]
async fn load_failure_leaves_empty_list_with_banner() {
    let mut h = alpha_beta();
    h.service.fail_next(Failure::Http(500));

    h.view.load().await;

    assert!(h.view.records().is_empty());
    assert_eq!(h.view.error(), Some("Failed to get sites."));
    assert!(!h.view.is_loading());
    // Load failures are shown inline, not as toasts.
    assert!(h.drain_toasts().is_empty());
}

#[tokio::test]
async fn reload_clears_previous_error() {
    let mut h = alpha_beta();
    h.service.fail_next(Failure::Http(503));
    h.view.load().await;
    assert!(h.view.error().is_some());

    h.view.load().await;
    assert!(h.view.error().is_none());
    assert_eq!(h.view.records().len(), 2);
}

#[tokio::test]
async fn failed_reload_resets_title_count() {
    let mut h = alpha_beta();
    h.view.load().await;
    assert_eq!(h.view.title(), "Sites (2)");

    h.service.fail_next(Failure::Http(500));
    h.view.load().await;

    assert!(h.view.records().is_empty());
    assert_eq!(h.view.title(), "Sites (0)");
}

#[tokio::test]
async fn reload_keeps_search_keyword() {
    let mut h = alpha_beta();
    h.view.load().await;
    h.view.on_search_change("bet");
    h.view.on_sort_change(SortOrder::Desc);

    h.view.load().await;

    assert_eq!(h.view.search_keyword(), "bet");
    assert_eq!(h.view.sort_order(), SortOrder::Asc);
    assert_eq!(names(h.view.visible_records()), vec!["Beta"]);
}

#[tokio::test]
async fn loading_flag_is_up_while_list_is_pending() {
    let mut h = alpha_beta();
    h.service.stall_next();

    let mut pending = Box::pin(h.view.load());
    let polled = tokio::time::timeout(Duration::from_millis(20), &mut pending).await;
    assert!(polled.is_err());
    // Keep the stalled load alive (its guard undropped) and inspect the view.
    std::mem::forget(pending);

    assert!(h.view.is_loading());
}

#[tokio::test]
async fn abandoned_load_lowers_loading_flag() {
    let mut h = alpha_beta();
    h.service.stall_next();

    let abandoned = tokio::time::timeout(Duration::from_millis(20), h.view.load()).await;
    assert!(abandoned.is_err());
    assert!(!h.view.is_loading());

    h.view.load().await;
    assert_eq!(h.view.title(), "Sites (2)");
}

#[tokio::test]
async fn child_view_lists_by_parent() {
    let mut h = Harness::new(
        EntityKind::Area,
        vec![
            EntityRecord::new("a1", "Paint").with_parent("s1"),
            EntityRecord::new("a2", "Weld").with_parent("s2"),
        ],
    );
    h.view = h.view.with_parent("s1");

    h.view.load().await;

    assert_eq!(names(h.view.records()), vec!["Paint"]);
    assert_eq!(
        h.service.calls(),
        vec![Call::List(EntityKind::Area, Some("s1".to_string()))]
    );
}

// ---------------------------------------------------------------------------
// search and sort
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_filters_without_reordering() {
    let mut h = Harness::new(
        EntityKind::Site,
        vec![site("1", "Press Shop"), site("2", "Paint"), site("3", "Weld")],
    );
    h.view.load().await;
    let before = names(h.view.records()).join(",");

    h.view.on_search_change("P");

    assert_eq!(names(h.view.records()).join(","), before);
    assert_eq!(names(h.view.visible_records()), vec!["Paint", "Press Shop"]);
    assert_eq!(h.view.search_keyword(), "P");

    h.view.on_search_change("");
    assert_eq!(h.view.visible_records().count(), 3);
}

#[tokio::test]
async fn sort_preserves_visibility() {
    let mut h = Harness::new(
        EntityKind::Site,
        vec![site("1", "Alpha"), site("2", "Beta"), site("3", "Gamma")],
    );
    h.view.load().await;
    h.view.on_search_change("ph");
    let visible_before: Vec<(String, bool)> = h
        .view
        .records()
        .iter()
        .map(|r| (r.id.clone(), r.visible))
        .collect();

    h.view.on_sort_change(SortOrder::Desc);

    assert_eq!(names(h.view.records()), vec!["Gamma", "Beta", "Alpha"]);
    assert_eq!(h.view.sort_order(), SortOrder::Desc);
    assert_eq!(names(h.view.visible_records()), vec!["Alpha"]);
    for (id, visible) in visible_before {
        let record = h.view.records().iter().find(|r| r.id == id).unwrap();
        assert_eq!(record.visible, visible, "visibility of {id} changed");
    }
}

// ---------------------------------------------------------------------------
// modal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_modal_type_warns_and_stays_closed() {
    let mut h = alpha_beta();
    h.view.load().await;

    assert!(!h.view.open_modal_named("Unknown", None, None));

    assert_eq!(*h.view.modal(), Modal::None);
    let toasts = h.drain_toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].severity, Severity::Warning);
    assert!(toasts[0].message.contains("Unsupported modal type: Unknown"));
}

#[tokio::test]
async fn only_one_modal_at_a_time() {
    let mut h = alpha_beta();
    h.view.load().await;

    assert!(h.view.open_modal_named("add", None, None));
    assert!(!h.view.open_modal(ModalKind::Delete, Some("1"), None));

    assert_eq!(h.view.modal().kind(), Some(ModalKind::Add));
    assert_eq!(h.drain_toasts()[0].severity, Severity::Warning);
}

#[tokio::test]
async fn delete_modal_needs_known_record() {
    let mut h = alpha_beta();
    h.view.load().await;

    assert!(!h.view.open_modal(ModalKind::Delete, Some("missing"), None));
    assert!(!h.view.modal().is_open());
    let toasts = h.drain_toasts();
    assert_eq!(toasts[0].message, "Site missing was not found.");
    assert_eq!(toasts[0].severity, Severity::Warning);

    assert!(h.view.open_modal(ModalKind::Delete, Some("1"), None));
    assert_matches!(h.view.modal(), Modal::Delete { id, name } if id == "1" && name == "Alpha");
    assert_eq!(h.view.modal_title().as_deref(), Some("Delete Site"));
    assert!(h.view.delete_warning().unwrap().contains("every area"));
}

#[tokio::test]
async fn close_modal_discards_form() {
    let mut h = alpha_beta();
    open_add(&mut h, "Draft", "d");
    assert!(h.view.can_submit());

    h.view.close_modal();

    assert!(!h.view.modal().is_open());
    assert!(!h.view.can_submit());
    assert_matches!(h.view.set_field("name", "x"), Err(CoreError::NoForm));
}

// ---------------------------------------------------------------------------
// submit_add
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_success_patches_list_and_notifies() {
    let mut h = alpha_beta();
    h.view.load().await;
    open_add(&mut h, "New Site", "d");

    let outcome = h.view.submit_add().await;

    assert_eq!(outcome, SubmitOutcome::Completed);
    assert_eq!(names(h.view.records()), vec!["Alpha", "Beta", "New Site"]);
    assert_eq!(h.view.title(), "Sites (3)");
    assert!(!h.view.is_modal_processing());
    assert!(!h.view.modal().is_open());

    let toasts = h.drain_toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Site has been added.");
    assert_eq!(toasts[0].severity, Severity::Info);
    assert_eq!(toasts[0].duration_secs, 5);

    assert_eq!(h.metrics.sent(), vec![serde_json::json!({"site": 1})]);
}

#[tokio::test]
async fn added_record_respects_keyword_and_sort() {
    let mut h = alpha_beta();
    h.view.load().await;
    h.view.on_sort_change(SortOrder::Desc);
    h.view.on_search_change("alp");
    open_add(&mut h, "Aardvark", "d");

    h.view.submit_add().await;

    assert_eq!(names(h.view.records()), vec!["Beta", "Alpha", "Aardvark"]);
    let added = h.view.records().last().unwrap();
    assert!(!added.visible);
}

#[tokio::test]
async fn abandoned_submit_releases_the_dialog() {
    let mut h = alpha_beta();
    h.view.load().await;
    open_add(&mut h, "Gamma", "d");
    h.service.stall_next();

    let abandoned = tokio::time::timeout(Duration::from_millis(20), h.view.submit_add()).await;
    assert!(abandoned.is_err());

    assert!(!h.view.is_modal_processing());
    assert!(h.view.modal().is_open());
    assert!(h.view.can_submit());

    assert_eq!(h.view.submit_add().await, SubmitOutcome::Completed);
    assert_eq!(names(h.view.records()), vec!["Alpha", "Beta", "Gamma"]);
}

#[tokio::test]
async fn abandoned_delete_can_still_be_cancelled() {
    let mut h = alpha_beta();
    h.view.load().await;
    assert!(h.view.open_modal(ModalKind::Delete, Some("1"), None));
    h.service.stall_next();

    let abandoned = tokio::time::timeout(Duration::from_millis(20), h.view.submit_delete()).await;
    assert!(abandoned.is_err());

    h.view.close_modal();
    assert!(!h.view.modal().is_open());
    assert_eq!(h.view.records().len(), 2);
}

#[tokio::test]
async fn add_duplicate_keeps_form_open() {
    let mut h = alpha_beta();
    h.view.load().await;
    open_add(&mut h, "Alpha", "d");
    h.service.fail_next(Failure::Tagged("DataDuplicatedError"));

    let outcome = h.view.submit_add().await;

    assert_eq!(outcome, SubmitOutcome::Failed(ErrorClass::Duplicate));
    assert_eq!(h.view.modal().kind(), Some(ModalKind::Add));
    assert_eq!(h.view.modal().form().unwrap().value("name"), Some("Alpha"));
    assert!(!h.view.is_modal_processing());
    assert_eq!(h.view.records().len(), 2);

    let toasts = h.drain_toasts();
    assert_eq!(toasts[0].message, "The site name already exists.");
    assert_eq!(toasts[0].severity, Severity::Error);
    assert!(h.metrics.sent().is_empty());
}

#[tokio::test]
async fn add_unauthorized_and_generic_failures() {
    let mut h = alpha_beta();
    h.view.load().await;
    open_add(&mut h, "Gamma", "d");

    h.service.fail_next(Failure::Tagged("Unauthorized"));
    assert_eq!(
        h.view.submit_add().await,
        SubmitOutcome::Failed(ErrorClass::Unauthorized)
    );

    h.service.fail_next(Failure::Http(500));
    assert_eq!(
        h.view.submit_add().await,
        SubmitOutcome::Failed(ErrorClass::Generic)
    );

    let messages: Vec<String> = h.drain_toasts().into_iter().map(|t| t.message).collect();
    assert_eq!(
        messages,
        vec![
            "You are not authorized to perform this action.".to_string(),
            "Failed to create site.".to_string(),
        ]
    );

    // The form is still open, so the user can retry.
    assert_eq!(h.view.submit_add().await, SubmitOutcome::Completed);
}

#[tokio::test]
async fn invalid_form_never_reaches_backend() {
    let mut h = alpha_beta();
    h.view.load().await;
    open_add(&mut h, "Bad!", "d");

    assert!(!h.view.can_submit());
    let outcome = h.view.submit_add().await;

    assert_eq!(outcome, SubmitOutcome::Invalid(vec!["name".to_string()]));
    assert_eq!(h.service.calls().len(), 1); // only the initial list
    assert!(h.drain_toasts().is_empty());
}

#[tokio::test]
async fn submit_without_matching_modal_is_ignored() {
    let mut h = alpha_beta();
    h.view.load().await;
    assert_eq!(h.view.submit_add().await, SubmitOutcome::NoModal);
    assert_eq!(h.view.submit_delete().await, SubmitOutcome::NoModal);

    open_add(&mut h, "X", "d");
    assert_eq!(h.view.submit_edit().await, SubmitOutcome::NoModal);
}

#[tokio::test]
async fn child_add_sends_parent_id() {
    let mut h = Harness::new(EntityKind::Station, vec![]);
    h.view = h.view.with_parent("a1");
    h.view.load().await;
    open_add(&mut h, "Press 1", "Stamping press");

    assert_eq!(h.view.submit_add().await, SubmitOutcome::Completed);

    let calls = h.service.calls();
    assert_matches!(&calls[1], Call::Create(EntityKind::Station, input) if input.parent_id.as_deref() == Some("a1"));
    assert_eq!(h.view.records()[0].parent_id.as_deref(), Some("a1"));
    assert_eq!(h.metrics.sent(), vec![serde_json::json!({"station": 1})]);
}

// ---------------------------------------------------------------------------
// submit_edit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_replaces_record_in_place() {
    let mut h = alpha_beta();
    h.view.load().await;
    assert!(h.view.open_modal(ModalKind::Edit, Some("1"), None));
    assert_eq!(h.view.modal().form().unwrap().value("name"), Some("Alpha"));
    h.view.set_field("name", "Zeta").unwrap();

    assert_eq!(h.view.submit_edit().await, SubmitOutcome::Completed);

    assert_eq!(names(h.view.records()), vec!["Beta", "Zeta"]);
    assert_eq!(h.view.records()[1].id, "1");
    assert_eq!(h.view.title(), "Sites (2)");
    assert_eq!(h.drain_toasts()[0].message, "Site has been updated.");
}

#[tokio::test]
async fn edit_duplicate_is_reported() {
    let mut h = alpha_beta();
    h.view.load().await;
    h.view.open_modal(ModalKind::Edit, Some("1"), None);
    h.view.set_field("name", "Beta").unwrap();
    h.service.fail_next(Failure::Tagged("DataDuplicatedError"));

    assert_eq!(
        h.view.submit_edit().await,
        SubmitOutcome::Failed(ErrorClass::Duplicate)
    );
    assert_eq!(names(h.view.records()), vec!["Alpha", "Beta"]);
    assert!(h.view.modal().is_open());
}

// ---------------------------------------------------------------------------
// submit_delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_success_removes_record() {
    let mut h = alpha_beta();
    h.view.load().await;
    h.view.open_modal(ModalKind::Delete, Some("1"), Some("Alpha"));

    assert_eq!(h.view.submit_delete().await, SubmitOutcome::Completed);

    assert_eq!(names(h.view.records()), vec!["Beta"]);
    assert_eq!(h.view.title(), "Sites (1)");
    assert!(!h.view.modal().is_open());
    assert!(!h.view.is_modal_processing());

    let toasts = h.drain_toasts();
    assert_eq!(toasts[0].message, "Site has been deleted.");
    assert_eq!(toasts[0].severity, Severity::Success);
    assert!(h.metrics.sent().is_empty());
}

#[tokio::test]
async fn delete_failure_keeps_dialog_for_retry() {
    let mut h = alpha_beta();
    h.view.load().await;
    h.view.open_modal(ModalKind::Delete, Some("1"), None);

    h.service.fail_next(Failure::Tagged("Unauthorized"));
    assert_eq!(
        h.view.submit_delete().await,
        SubmitOutcome::Failed(ErrorClass::Unauthorized)
    );
    assert_eq!(h.view.modal().kind(), Some(ModalKind::Delete));
    assert!(!h.view.is_modal_processing());
    assert_eq!(h.view.records().len(), 2);

    // Duplicates are meaningless for deletes and read as generic failures.
    h.service.fail_next(Failure::Tagged("DataDuplicatedError"));
    assert_eq!(
        h.view.submit_delete().await,
        SubmitOutcome::Failed(ErrorClass::Generic)
    );

    let messages: Vec<String> = h.drain_toasts().into_iter().map(|t| t.message).collect();
    assert_eq!(messages[1], "Failed to delete site.");

    assert_eq!(h.view.submit_delete().await, SubmitOutcome::Completed);
    assert_eq!(names(h.view.records()), vec!["Beta"]);
}

#[tokio::test]
async fn non_cascading_kind_has_no_delete_warning() {
    let mut h = Harness::new(
        EntityKind::Device,
        vec![EntityRecord::new("d1", "Tablet").with_parent("st1")],
    );
    h.view.load().await;
    h.view.open_modal(ModalKind::Delete, Some("d1"), None);
    assert!(h.view.delete_warning().is_none());
}
