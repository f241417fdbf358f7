pub mod job;
pub mod list;

pub use job::{JobId, JobKey, JobRecord, JobStatus, JobType, Related, SummaryFields, UserCapabilities};
pub use list::{ListPage, ListParams};

/// Prefix every collection path lives under.
pub const API_PREFIX: &str = "/api/v2";
pub const UNIFIED_JOBS_COLLECTION: &str = "unified_jobs";

pub const DEFAULT_CONFIG_PATH: &str = "/etc/jobdeck/config.yaml";
pub const USER_CONFIG_PATH: &str = "~/.config/jobdeck/config.yaml";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8013";
