//! Training entries: the in-flight draft and the finalized record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::ChatIdentity;

/// Finalized training, as stored in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingEntry {
    pub start_time: DateTime<Utc>,
    pub muscle_group: String,
    pub duration_hours: f64,
    pub weight: Option<f64>, // kg, None = not recorded
}

/// Training under construction; required fields stay empty until the
/// matching dialogue step fills them in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub start_time: DateTime<Utc>,
    pub muscle_group: Option<String>,
    pub duration_hours: Option<f64>,
    pub weight: Option<f64>,
}

impl DraftEntry {
    pub fn new() -> Self {
        Self {
            start_time: Utc::now(),
            muscle_group: None,
            duration_hours: None,
            weight: None,
        }
    }

    /// Convert into a history record, naming the first missing field on failure
    pub fn finalize(&self, chat: ChatIdentity) -> Result<TrainingEntry, StoreError> {
        let muscle_group = match &self.muscle_group {
            Some(group) if !group.is_empty() => group.clone(),
            _ => {
                return Err(StoreError::IncompleteEntry {
                    chat,
                    field: "muscle group",
                });
            }
        };
        let duration_hours = self.duration_hours.ok_or(StoreError::IncompleteEntry {
            chat,
            field: "duration",
        })?;

        Ok(TrainingEntry {
            start_time: self.start_time,
            muscle_group,
            duration_hours,
            weight: self.weight,
        })
    }
}

impl Default for DraftEntry {
    fn default() -> Self {
        Self::new()
    }
}
