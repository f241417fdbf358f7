use std::sync::Arc;

use common::{JobKey, JobRecord, ListParams};

use crate::client::ListQuery;
use crate::dispatcher::{BatchDispatcher, BatchKind, BatchOutcome};
use crate::error::{BatchError, RequestFailure};
use crate::gate::{self, ActionGate};
use crate::selection::SelectionStore;

pub struct JobListView {
    query: Arc<dyn ListQuery>,
    dispatcher: BatchDispatcher,
    params: ListParams,
    jobs: Vec<JobRecord>,
    count: u64,
    selection: SelectionStore,
    error: Option<BatchError>,
    content_error: Option<RequestFailure>,
}

impl JobListView {
    pub fn new(query: Arc<dyn ListQuery>, dispatcher: BatchDispatcher, params: ListParams) -> Self {
        Self {
            query,
            dispatcher,
            params,
            jobs: Vec::new(),
            count: 0,
            selection: SelectionStore::new(),
            error: None,
            content_error: None,
        }
    }

    pub async fn load(&mut self, params: ListParams) -> Result<(), RequestFailure> {
        self.params = params;
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<(), RequestFailure> {
        match self.query.read(&self.params).await {
            Ok(page) => {
                self.count = page.count;
                self.jobs = page.results;
                if self.selection.retain_page(&self.jobs) {
                    log::debug!("Selection no longer matches the page, cleared");
                }
                self.content_error = None;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to read job list: {}", e);
                self.content_error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn params(&self) -> &ListParams {
        &self.params
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn is_selected(&self, key: &JobKey) -> bool {
        self.selection.contains(key)
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.jobs)
    }

    /// Toggles the row with `key`. Returns false when it is not on the page.
    pub fn select_key(&mut self, key: &JobKey) -> bool {
        match self.jobs.iter().find(|record| record.key() == *key) {
            Some(record) => {
                self.selection.toggle(record);
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, record: &JobRecord) {
        self.selection.toggle(record);
    }

    pub fn select_all(&mut self, selected: bool) {
        if selected {
            self.selection.select_all(&self.jobs);
        } else {
            self.selection.clear();
        }
    }

    pub fn items_to_delete(&self) -> Vec<JobRecord> {
        gate::items_to_delete(self.selection.records())
    }

    pub fn jobs_to_cancel(&self) -> Vec<JobRecord> {
        gate::jobs_to_cancel(self.selection.records())
    }

    pub fn delete_gate(&self) -> ActionGate {
        ActionGate::evaluate(BatchKind::Delete, self.selection.records())
    }

    pub fn cancel_gate(&self) -> ActionGate {
        ActionGate::evaluate(BatchKind::Cancel, self.selection.records())
    }

    pub async fn delete_selected(&mut self) -> BatchOutcome {
        self.run(BatchKind::Delete).await
    }

    pub async fn cancel_selected(&mut self) -> BatchOutcome {
        self.run(BatchKind::Cancel).await
    }

    pub fn error(&self) -> Option<&BatchError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn content_error(&self) -> Option<&RequestFailure> {
        self.content_error.as_ref()
    }

    async fn run(&mut self, kind: BatchKind) -> BatchOutcome {
        let records = ActionGate::evaluate(kind, self.selection.records()).eligible;
        let outcome = self.dispatcher.run_batch(kind, &records).await;
        if outcome.is_empty() {
            return outcome;
        }

        self.error = outcome.error();
        self.selection.clear();
        if let Err(e) = self.refresh().await {
            log::error!("Job list not refreshed after batch {}: {}", outcome.id, e);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CollectionClient;
    use crate::registry::Registry;
    use async_trait::async_trait;
    use common::{JobId, JobType, ListPage};
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Mutex;

    struct Pages {
        pages: Mutex<Vec<Result<ListPage, RequestFailure>>>,
    }

    #[async_trait]
    impl ListQuery for Pages {
        async fn read(&self, _params: &ListParams) -> Result<ListPage, RequestFailure> {
            let mut pages = self.pages.lock().unwrap();
            if pages.len() > 1 {
                pages.remove(0)
            } else {
                pages[0].clone()
            }
        }
    }

    struct Accepting;

    #[async_trait]
    impl CollectionClient for Accepting {
        async fn destroy(&self, _id: JobId) -> Result<(), RequestFailure> {
            Ok(())
        }

        async fn cancel(&self, _id: JobId) -> Result<(), RequestFailure> {
            Ok(())
        }
    }

    fn page(ids: &[u64]) -> ListPage {
        page_with_status(ids, "successful")
    }

    fn page_with_status(ids: &[u64], status: &str) -> ListPage {
        let results = ids
            .iter()
            .map(|id| {
                serde_json::from_value(json!({
                    "id": id,
                    "type": "job",
                    "status": status,
                    "related": { "cancel": format!("/api/v2/jobs/{}/cancel", id) },
                    "summary_fields": { "user_capabilities": { "delete": true, "start": true } }
                }))
                .unwrap()
            })
            .collect();
        ListPage {
            count: ids.len() as u64,
            results,
            ..ListPage::default()
        }
    }

    fn view(pages: Vec<Result<ListPage, RequestFailure>>) -> JobListView {
        let registry = Registry::from_fn(|_| -> Arc<dyn CollectionClient> { Arc::new(Accepting) });
        JobListView::new(
            Arc::new(Pages { pages: Mutex::new(pages) }),
            BatchDispatcher::new(Arc::new(registry)),
            ListParams::new(),
        )
    }

    fn key(id: u64) -> JobKey {
        JobKey { job_type: JobType::Job, id: JobId(id) }
    }

    #[tokio::test]
    async fn select_key_only_toggles_rows_on_the_page() {
        let mut view = view(vec![Ok(page(&[1, 2]))]);
        view.refresh().await.unwrap();

        assert!(view.select_key(&key(2)));
        assert!(view.is_selected(&key(2)));
        assert!(!view.select_key(&key(9)));
        assert_eq!(view.selection().len(), 1);
    }

    #[tokio::test]
    async fn refresh_drops_selection_that_left_the_page() {
        let mut view = view(vec![Ok(page(&[1, 2])), Ok(page(&[2, 3]))]);
        view.refresh().await.unwrap();
        view.select_all(true);
        assert!(view.is_all_selected());

        view.refresh().await.unwrap();
        assert!(view.selection().is_empty());
        assert_eq!(view.jobs()[1].id, JobId(3));
    }

    #[tokio::test]
    async fn refresh_updates_selected_records() {
        let mut view = view(vec![Ok(page_with_status(&[1], "running")), Ok(page(&[1]))]);
        view.refresh().await.unwrap();
        view.select_all(true);
        assert!(!view.delete_gate().is_enabled());
        assert_eq!(view.jobs_to_cancel().len(), 1);

        view.refresh().await.unwrap();

        assert_eq!(view.selection().len(), 1);
        assert!(view.delete_gate().is_enabled());
        assert!(view.jobs_to_cancel().is_empty());
        assert!(!view.cancel_gate().is_enabled());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_outcome_and_records_content_error() {
        let failure = RequestFailure::from_response(Method::GET, "/api/v2/unified_jobs/", 503, json!("down"));
        let mut view = view(vec![Ok(page(&[1])), Err(failure.clone())]);
        view.refresh().await.unwrap();
        view.select_all(true);

        let outcome = view.delete_selected().await;

        assert_eq!(outcome.succeeded().count(), 1);
        assert!(view.error().is_none());
        assert!(view.selection().is_empty());
        assert_eq!(view.content_error(), Some(&failure));
    }

    #[tokio::test]
    async fn nothing_eligible_leaves_selection_alone() {
        let mut view = view(vec![Ok(page(&[1]))]);
        view.refresh().await.unwrap();
        view.select_all(true);

        // Finished jobs have nothing to cancel.
        let outcome = view.cancel_selected().await;

        assert!(outcome.is_empty());
        assert_eq!(view.selection().len(), 1);
    }
}
