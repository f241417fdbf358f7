use serde::{Deserialize, Serialize};
use crate::job::JobRecord;

/// Sent again unchanged when the list is refreshed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListParams(Vec<(String, String)>);

impl ListParams {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parameters of the default jobs list: newest first, sync launches hidden.
    pub fn job_list(order_by: &str, exclude_launch_type: &str, page_size: u32) -> Self {
        Self::new()
            .with("order_by", order_by)
            .with("not__launch_type", exclude_launch_type)
            .with("page", 1)
            .with("page_size", page_size)
    }

    /// Sets `key`, replacing a previous value in place.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPage {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<JobRecord>,
}
