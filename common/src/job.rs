use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A page containing any other `type` fails to decode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    AdHocCommand,
    InventoryUpdate,
    Job,
    ProjectUpdate,
    SystemJob,
    WorkflowJob,
}

impl JobType {
    pub const ALL: [JobType; 6] = [
        JobType::AdHocCommand,
        JobType::InventoryUpdate,
        JobType::Job,
        JobType::ProjectUpdate,
        JobType::SystemJob,
        JobType::WorkflowJob,
    ];

    /// Path segment of the collection under the API prefix.
    pub fn collection(self) -> &'static str {
        match self {
            JobType::AdHocCommand => "ad_hoc_commands",
            JobType::InventoryUpdate => "inventory_updates",
            JobType::Job => "jobs",
            JobType::ProjectUpdate => "project_updates",
            JobType::SystemJob => "system_jobs",
            JobType::WorkflowJob => "workflow_jobs",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobType::AdHocCommand => "ad_hoc_command",
            JobType::InventoryUpdate => "inventory_update",
            JobType::Job => "job",
            JobType::ProjectUpdate => "project_update",
            JobType::SystemJob => "system_job",
            JobType::WorkflowJob => "workflow_job",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        JobType::ALL
            .into_iter()
            .find(|t| t.as_str() == s || t.collection() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown job type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    New,
    Pending,
    Waiting,
    Running,
    Successful,
    Failed,
    Error,
    Canceled,
    #[serde(other)]
    Other,
}

impl JobStatus {
    /// Unsettled work: cancelable, not deletable.
    pub fn is_running(self) -> bool {
        matches!(
            self,
            JobStatus::New | JobStatus::Pending | JobStatus::Waiting | JobStatus::Running
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::New => "new",
            JobStatus::Pending => "pending",
            JobStatus::Waiting => "waiting",
            JobStatus::Running => "running",
            JobStatus::Successful => "successful",
            JobStatus::Failed => "failed",
            JobStatus::Error => "error",
            JobStatus::Canceled => "canceled",
            JobStatus::Other => "other",
        };
        f.write_str(s)
    }
}

/// Identity of a row in the unified list. Ids are only unique per collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey {
    pub job_type: JobType,
    pub id: JobId,
}

impl std::fmt::Display for JobKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.job_type, self.id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCapabilities {
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub start: bool,
    #[serde(default)]
    pub edit: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryFields {
    #[serde(default)]
    pub user_capabilities: UserCapabilities,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Related {
    pub cancel: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRecord {
    pub id: JobId,
    #[serde(rename = "type")]
    pub job_type: JobType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub status: JobStatus,
    #[serde(default)]
    pub launch_type: Option<String>,
    #[serde(default)]
    pub started: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished: Option<DateTime<Utc>>,
    #[serde(default)]
    pub related: Related,
    #[serde(default)]
    pub summary_fields: SummaryFields,
}

impl JobRecord {
    pub fn key(&self) -> JobKey {
        JobKey {
            job_type: self.job_type,
            id: self.id,
        }
    }

    pub fn capabilities(&self) -> &UserCapabilities {
        &self.summary_fields.user_capabilities
    }

    pub fn can_delete(&self) -> bool {
        self.capabilities().delete
    }

    pub fn can_cancel(&self) -> bool {
        let caps = self.capabilities();
        caps.start || caps.edit
    }

    pub fn has_cancel_link(&self) -> bool {
        self.related.cancel.is_some()
    }
}
