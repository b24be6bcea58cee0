use std::time::Duration;

use serde::Deserialize;

use crate::args::{ResourceKind, TaskSet, ThinkTime};

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub realm: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub auth_client_id: Option<String>,
    pub auth_client_secret: Option<String>,
    pub task_set: Option<TaskSet>,
    pub resources: Option<Vec<ResourceKind>>,
    #[serde(alias = "concurrency")]
    pub users: Option<usize>,
    pub spawn_rate: Option<usize>,
    pub spawn_interval: Option<u64>,
    pub duration: Option<u64>,
    pub max_iterations: Option<u64>,
    pub think_time: Option<ThinkTime>,
    pub batch_size: Option<usize>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub insecure: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, String> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err("Duration must be > 0.".to_owned())
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }
}
