//! Tabular request feed.
//!
//! The batch driver consumes requests as rows of named numeric features,
//! typically loaded from a CSV export. The feed carries the two column
//! lists the predictive models were trained on and projects each row into
//! the feature vector a given task expects. Missing columns project to 0.0
//! rather than failing the row; the predictors own any further handling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::predictor::{Features, PredictorTask};

/// One request row: identity plus named numeric features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedRow {
    /// Request identifier.
    pub id: String,
    /// Feature values keyed by column name.
    pub features: HashMap<String, f64>,
}

impl FeedRow {
    /// Creates a row with no features yet.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            features: HashMap::new(),
        }
    }

    /// Sets one feature value.
    pub fn with_feature(mut self, column: impl Into<String>, value: f64) -> Self {
        self.features.insert(column.into(), value);
        self
    }
}

/// An ordered set of request rows with per-task column lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestFeed {
    rows: Vec<FeedRow>,
    need_columns: Vec<String>,
    duration_columns: Vec<String>,
}

impl RequestFeed {
    /// Creates an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the column list the need classifier expects.
    pub fn with_need_columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.need_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the column list the duration regressor expects.
    pub fn with_duration_columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.duration_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a row.
    pub fn with_row(mut self, row: FeedRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Appends several rows.
    pub fn with_rows(mut self, rows: Vec<FeedRow>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// The rows, in feed order.
    pub fn rows(&self) -> &[FeedRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the feed has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Projects a row onto the column list for one task.
    ///
    /// Columns absent from the row project to 0.0.
    pub fn features_for(&self, row: &FeedRow, task: PredictorTask) -> Features {
        let columns = match task {
            PredictorTask::Need => &self.need_columns,
            PredictorTask::Duration => &self.duration_columns,
        };
        columns
            .iter()
            .map(|c| (c.clone(), row.features.get(c).copied().unwrap_or(0.0)))
            .collect()
    }
}
