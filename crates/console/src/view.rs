//! Generic entity list view.
//!
//! [`EntityListView`] is the one component behind every CRUD screen of the
//! console. It owns the list of records for one [`EntityKind`] (optionally
//! scoped to a parent record), the search keyword and sort order, and the
//! single modal dialog. All state changes go through its methods.
//!
//! Backend failures never escape a view: they are logged, classified, and
//! turned into one notification on the [`NotificationRelay`]. Each submit
//! returns a [`SubmitOutcome`] describing what happened.

use std::sync::Arc;

use andon_core::classify::ErrorClass;
use andon_core::entity::{EntityInput, EntityKind, EntityRecord};
use andon_core::error::CoreError;
use andon_core::listing::{
    count_title, make_visible_by_keyword, matches_keyword, sort_by_name, SortOrder,
};
use andon_core::messages;
use andon_core::modal::{FormState, Modal, ModalKind};
use andon_core::notification::{Severity, DEFAULT_DURATION_SECS};
use andon_core::types::EntityId;
use andon_events::{MetricsSink, NotificationRelay};
use andon_graphql::{ApiError, EntityService};

/// Result of a submit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The mutation succeeded and the list was patched.
    Completed,
    /// A mutation is already in flight; nothing was sent.
    Busy,
    /// No dialog of the matching kind is open; nothing was sent.
    NoModal,
    /// The form has invalid fields; nothing was sent.
    Invalid(Vec<String>),
    /// The backend rejected the mutation. The dialog stays open.
    Failed(ErrorClass),
}

/// Holds a busy flag up for as long as a backend call is pending.
///
/// The flag drops back when the guard does, including when the caller
/// abandons the submit or load future mid-call.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn set(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// List + search + sort + modal CRUD for one entity kind.
pub struct EntityListView<S> {
    kind: EntityKind,
    parent_id: Option<EntityId>,
    service: S,
    relay: Arc<NotificationRelay>,
    metrics: Arc<dyn MetricsSink>,
    notification_secs: u32,

    records: Vec<EntityRecord>,
    title: String,
    is_loading: bool,
    error: Option<String>,
    search_keyword: String,
    sort: SortOrder,
    modal: Modal,
    is_modal_processing: bool,
}

impl<S: EntityService> EntityListView<S> {
    pub fn new(
        kind: EntityKind,
        service: S,
        relay: Arc<NotificationRelay>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            kind,
            parent_id: None,
            service,
            relay,
            metrics,
            notification_secs: DEFAULT_DURATION_SECS,
            records: Vec::new(),
            title: kind.plural().to_string(),
            is_loading: false,
            error: None,
            search_keyword: String::new(),
            sort: SortOrder::Asc,
            modal: Modal::None,
            is_modal_processing: false,
        }
    }

    /// Scope the view to the children of one parent record.
    pub fn with_parent(mut self, parent_id: impl Into<EntityId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Override how long notifications stay on screen.
    pub fn with_notification_secs(mut self, secs: u32) -> Self {
        self.notification_secs = secs;
        self
    }

    // ---- accessors ----

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Every record, in display order.
    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    /// Records matching the current keyword, in display order.
    pub fn visible_records(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.iter().filter(|record| record.visible)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Inline load-failure banner text.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_keyword(&self) -> &str {
        &self.search_keyword
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn is_modal_processing(&self) -> bool {
        self.is_modal_processing
    }

    pub fn modal_title(&self) -> Option<String> {
        self.modal
            .kind()
            .map(|modal| messages::modal_title(self.kind, modal))
    }

    /// Cascade warning for an open delete dialog.
    pub fn delete_warning(&self) -> Option<&'static str> {
        match self.modal {
            Modal::Delete { .. } => messages::delete_warning(self.kind),
            _ => None,
        }
    }

    /// Whether the submit button of the open dialog is enabled.
    pub fn can_submit(&self) -> bool {
        if self.is_modal_processing {
            return false;
        }
        match &self.modal {
            Modal::None => false,
            Modal::Delete { .. } => true,
            Modal::Add { form } | Modal::Edit { form, .. } => form.is_submittable(),
        }
    }

    // ---- loading ----

    /// Fetch every record from the backend and replace the local list.
    ///
    /// The sort order goes back to ascending; the search keyword is kept
    /// and reapplied. On failure the list is left empty and
    /// [`error`](Self::error) holds the banner text.
    pub async fn load(&mut self) {
        self.error = None;

        let result = {
            let _loading = InFlight::set(&mut self.is_loading);
            self.service.list(self.kind, self.parent_id.as_deref()).await
        };

        match result {
            Ok(mut records) => {
                make_visible_by_keyword(&mut records, &self.search_keyword);
                self.sort = SortOrder::Asc;
                sort_by_name(&mut records, self.sort);
                self.records = records;
                tracing::debug!(kind = %self.kind, count = self.records.len(), "Records loaded");
            }
            Err(e) => {
                tracing::error!(kind = %self.kind, error = %e, "Error while getting records");
                self.records.clear();
                self.error = Some(messages::load_failed(self.kind));
            }
        }
        self.refresh_title();
    }

    // ---- search and sort ----

    /// Recompute visibility of every record. Order is unchanged.
    pub fn on_search_change(&mut self, keyword: impl Into<String>) {
        self.search_keyword = keyword.into();
        make_visible_by_keyword(&mut self.records, &self.search_keyword);
    }

    /// Re-sort every record by name. Visibility is unchanged.
    pub fn on_sort_change(&mut self, order: SortOrder) {
        self.sort = order;
        sort_by_name(&mut self.records, order);
    }

    // ---- modal ----

    /// Open a dialog by its string name, as sent by a UI control.
    ///
    /// Unsupported names produce a warning notification and leave the
    /// modal closed.
    pub fn open_modal_named(&mut self, kind: &str, id: Option<&str>, name: Option<&str>) -> bool {
        match kind.parse::<ModalKind>() {
            Ok(modal) => self.open_modal(modal, id, name),
            Err(e) => {
                self.warn(e.to_string());
                false
            }
        }
    }

    /// Open the add, edit, or delete dialog.
    ///
    /// Edit and delete need the id of a record in the list. Returns whether
    /// a dialog was opened; refusals are reported as warnings.
    pub fn open_modal(&mut self, kind: ModalKind, id: Option<&str>, name: Option<&str>) -> bool {
        if self.modal.is_open() {
            self.warn(messages::modal_already_open());
            return false;
        }

        let modal = match kind {
            ModalKind::Add => Modal::Add {
                form: FormState::new(self.kind.fields()),
            },
            ModalKind::Edit | ModalKind::Delete => {
                let Some(record) = id.and_then(|id| self.find(id)) else {
                    let missing = CoreError::NotFound {
                        kind: self.kind,
                        id: id.unwrap_or_default().to_string(),
                    };
                    self.warn(missing.to_string());
                    return false;
                };

                if kind == ModalKind::Edit {
                    Modal::Edit {
                        id: record.id.clone(),
                        form: FormState::from_record(self.kind.fields(), record),
                    }
                } else {
                    Modal::Delete {
                        id: record.id.clone(),
                        name: name.unwrap_or(&record.name).to_string(),
                    }
                }
            }
        };

        tracing::debug!(kind = %self.kind, modal = %kind, "Opening modal");
        self.modal = modal;
        true
    }

    /// Close the open dialog and discard its form. Ignored while a
    /// mutation is in flight.
    pub fn close_modal(&mut self) {
        if self.is_modal_processing {
            return;
        }
        self.modal = Modal::None;
    }

    /// Update one field of the open add or edit form.
    ///
    /// Returns the field's new validity.
    pub fn set_field(&mut self, key: &str, value: impl Into<String>) -> Result<bool, CoreError> {
        let form = self
            .modal
            .form_mut()
            .ok_or(CoreError::NoForm)?;
        form.set(key, value)
    }

    // ---- mutations ----

    /// Create a record from the open add form.
    pub async fn submit_add(&mut self) -> SubmitOutcome {
        if self.is_modal_processing {
            return SubmitOutcome::Busy;
        }
        let Modal::Add { form } = &self.modal else {
            return SubmitOutcome::NoModal;
        };
        if let Some(invalid) = Self::invalid_fields(form) {
            return invalid;
        }
        let input = EntityInput::from_form(form.values(), self.parent_id.clone());

        let result = {
            let _processing = InFlight::set(&mut self.is_modal_processing);
            self.service.create(self.kind, &input).await
        };
        match result {
            Ok(record) => {
                self.insert(record);
                self.finish_success(messages::added(self.kind), Severity::Info);

                let mut data = serde_json::Map::new();
                data.insert(self.kind.as_str().to_string(), 1.into());
                self.metrics.send(serde_json::Value::Object(data)).await;
                SubmitOutcome::Completed
            }
            Err(e) => self.finish_failure(ModalKind::Add, &e),
        }
    }

    /// Save the open edit form over the existing record.
    pub async fn submit_edit(&mut self) -> SubmitOutcome {
        if self.is_modal_processing {
            return SubmitOutcome::Busy;
        }
        let Modal::Edit { id, form } = &self.modal else {
            return SubmitOutcome::NoModal;
        };
        if let Some(invalid) = Self::invalid_fields(form) {
            return invalid;
        }
        let id = id.clone();
        let parent_id = self
            .find(&id)
            .and_then(|record| record.parent_id.clone())
            .or_else(|| self.parent_id.clone());
        let input = EntityInput::from_form(form.values(), parent_id);

        let result = {
            let _processing = InFlight::set(&mut self.is_modal_processing);
            self.service.update(self.kind, &id, &input).await
        };
        match result {
            Ok(mut record) => {
                // Identity never changes, whatever the backend echoes.
                record.id = id.clone();
                self.records.retain(|existing| existing.id != id);
                self.insert(record);
                self.finish_success(messages::updated(self.kind), Severity::Info);
                SubmitOutcome::Completed
            }
            Err(e) => self.finish_failure(ModalKind::Edit, &e),
        }
    }

    /// Delete the record named by the open delete dialog.
    pub async fn submit_delete(&mut self) -> SubmitOutcome {
        if self.is_modal_processing {
            return SubmitOutcome::Busy;
        }
        let Modal::Delete { id, .. } = &self.modal else {
            return SubmitOutcome::NoModal;
        };
        let id = id.clone();

        let result = {
            let _processing = InFlight::set(&mut self.is_modal_processing);
            self.service.delete(self.kind, &id).await
        };
        match result {
            Ok(_) => {
                self.records.retain(|record| record.id != id);
                self.refresh_title();
                self.finish_success(messages::deleted(self.kind), Severity::Success);
                SubmitOutcome::Completed
            }
            Err(e) => self.finish_failure(ModalKind::Delete, &e),
        }
    }

    // ---- private helpers ----

    fn find(&self, id: &str) -> Option<&EntityRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    fn invalid_fields(form: &FormState) -> Option<SubmitOutcome> {
        if form.is_submittable() {
            return None;
        }
        Some(SubmitOutcome::Invalid(
            form.invalid_fields().into_iter().map(str::to_string).collect(),
        ))
    }

    /// Add a record returned by the backend, keeping order and filter.
    fn insert(&mut self, mut record: EntityRecord) {
        if record.parent_id.is_none() {
            record.parent_id = self.parent_id.clone();
        }
        record.visible = matches_keyword(&record.name, &self.search_keyword);
        self.records.push(record);
        sort_by_name(&mut self.records, self.sort);
        self.refresh_title();
    }

    fn refresh_title(&mut self) {
        self.title = count_title(self.kind.plural(), self.records.len());
    }

    fn finish_success(&mut self, message: String, severity: Severity) {
        self.modal = Modal::None;
        self.relay.notify(message, severity, self.notification_secs);
    }

    fn finish_failure(&mut self, modal: ModalKind, error: &ApiError) -> SubmitOutcome {
        let class = match modal {
            ModalKind::Delete => ErrorClass::for_delete(error.error_type()),
            ModalKind::Add | ModalKind::Edit => ErrorClass::from_error_type(error.error_type()),
        };
        tracing::error!(
            kind = %self.kind,
            modal = %modal,
            class = ?class,
            error = %error,
            "Mutation failed"
        );

        self.relay.notify(
            messages::mutation_failed(self.kind, modal, class),
            Severity::Error,
            self.notification_secs,
        );
        SubmitOutcome::Failed(class)
    }

    fn warn(&self, message: String) {
        tracing::warn!(kind = %self.kind, %message, "View warning");
        self.relay
            .notify(message, Severity::Warning, self.notification_secs);
    }
}
