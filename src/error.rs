use crate::domain::{GroupId, SemesterId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Semester {0} not found")]
    SemesterNotFound(SemesterId),

    #[error("No classroom fits group(s): {}", format_ids(.groups))]
    NoClassroomFits { groups: Vec<GroupId> },

    #[error("Configuration Error: {0}")]
    InvalidConfig(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

fn format_ids(ids: &[GroupId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type SchedResult<T> = Result<T, SchedulerError>;
