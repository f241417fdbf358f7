use std::sync::Arc;

use common::JobType;

use crate::client::{ApiClient, CollectionClient, HttpCollection};

pub struct Registry {
    ad_hoc_commands: Arc<dyn CollectionClient>,
    inventory_updates: Arc<dyn CollectionClient>,
    jobs: Arc<dyn CollectionClient>,
    project_updates: Arc<dyn CollectionClient>,
    system_jobs: Arc<dyn CollectionClient>,
    workflow_jobs: Arc<dyn CollectionClient>,
}

impl Registry {
    pub fn from_fn<F>(mut make: F) -> Self
    where
        F: FnMut(JobType) -> Arc<dyn CollectionClient>,
    {
        Self {
            ad_hoc_commands: make(JobType::AdHocCommand),
            inventory_updates: make(JobType::InventoryUpdate),
            jobs: make(JobType::Job),
            project_updates: make(JobType::ProjectUpdate),
            system_jobs: make(JobType::SystemJob),
            workflow_jobs: make(JobType::WorkflowJob),
        }
    }

    pub fn http(api: &ApiClient) -> Self {
        Self::from_fn(|job_type| -> Arc<dyn CollectionClient> {
            Arc::new(HttpCollection::new(api.clone(), job_type))
        })
    }

    pub fn client_for(&self, job_type: JobType) -> &dyn CollectionClient {
        let client = match job_type {
            JobType::AdHocCommand => &self.ad_hoc_commands,
            JobType::InventoryUpdate => &self.inventory_updates,
            JobType::Job => &self.jobs,
            JobType::ProjectUpdate => &self.project_updates,
            JobType::SystemJob => &self.system_jobs,
            JobType::WorkflowJob => &self.workflow_jobs,
        };
        client.as_ref()
    }
}
