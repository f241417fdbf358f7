use common::{JobKey, JobRecord};

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selected: Vec<JobRecord>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, record: &JobRecord) {
        let key = record.key();
        match self.position(&key) {
            Some(idx) => {
                self.selected.remove(idx);
            }
            None => self.selected.push(record.clone()),
        }
    }

    pub fn select_all(&mut self, records: &[JobRecord]) {
        self.selected = records.to_vec();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn snapshot(&self) -> Vec<JobRecord> {
        self.selected.clone()
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.selected
    }

    pub fn contains(&self, key: &JobKey) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_all_selected(&self, page: &[JobRecord]) -> bool {
        !page.is_empty()
            && self.selected.len() == page.len()
            && page.iter().all(|record| self.contains(&record.key()))
    }

    /// Swaps every selected record for its fresh copy from `page`, or clears
    /// the selection when one of them is gone. Returns whether it was cleared.
    pub fn retain_page(&mut self, page: &[JobRecord]) -> bool {
        let current: Option<Vec<JobRecord>> = self
            .selected
            .iter()
            .map(|selected| page.iter().find(|record| record.key() == selected.key()).cloned())
            .collect();
        match current {
            Some(records) => {
                self.selected = records;
                false
            }
            None => {
                self.clear();
                true
            }
        }
    }

    fn position(&self, key: &JobKey) -> Option<usize> {
        self.selected.iter().position(|record| record.key() == *key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{JobId, JobStatus, JobType};

    fn record(id: u64, job_type: JobType) -> JobRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "type": job_type,
            "status": JobStatus::Successful,
        }))
        .unwrap()
    }

    fn page() -> Vec<JobRecord> {
        vec![
            record(1, JobType::ProjectUpdate),
            record(2, JobType::Job),
            record(3, JobType::InventoryUpdate),
        ]
    }

    #[test]
    fn toggle_twice_restores_previous_state() {
        let page = page();
        let mut selection = SelectionStore::new();
        selection.toggle(&page[0]);

        selection.toggle(&page[1]);
        assert_eq!(selection.len(), 2);
        selection.toggle(&page[1]);

        assert_eq!(selection.len(), 1);
        assert!(selection.contains(&page[0].key()));
        assert!(!selection.contains(&page[1].key()));
    }

    #[test]
    fn same_id_in_different_collections_is_distinct() {
        let mut selection = SelectionStore::new();
        selection.toggle(&record(4, JobType::Job));
        selection.toggle(&record(4, JobType::WorkflowJob));

        assert_eq!(selection.len(), 2);
        assert!(selection.contains(&JobKey { job_type: JobType::WorkflowJob, id: JobId(4) }));
    }

    #[test]
    fn select_all_and_clear() {
        let page = page();
        let mut selection = SelectionStore::new();
        assert!(!selection.is_all_selected(&page));

        selection.select_all(&page);
        assert!(selection.is_all_selected(&page));
        assert_eq!(selection.snapshot(), page);

        selection.toggle(&page[2]);
        assert!(!selection.is_all_selected(&page));

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn empty_page_is_never_all_selected() {
        assert!(!SelectionStore::new().is_all_selected(&[]));
    }

    #[test]
    fn retain_page_takes_fresh_records() {
        let mut selection = SelectionStore::new();
        let mut running = record(1, JobType::Job);
        running.status = JobStatus::Running;
        selection.toggle(&running);

        let fresh = vec![record(1, JobType::Job), record(2, JobType::Job)];
        assert!(!selection.retain_page(&fresh));

        assert_eq!(selection.len(), 1);
        assert_eq!(selection.records()[0].status, JobStatus::Successful);
    }

    #[test]
    fn retain_page_clears_when_a_selected_row_disappears() {
        let page = page();
        let mut selection = SelectionStore::new();
        selection.toggle(&page[0]);

        assert!(!selection.retain_page(&page));
        assert_eq!(selection.len(), 1);

        assert!(selection.retain_page(&page[1..]));
        assert!(selection.is_empty());
    }
}
