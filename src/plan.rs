//! Replayable plans.
//!
//! A plan is a TOML list of steps applied to an [`Engine`] in order. It is
//! how the CLI drives the engine and a convenient fixture format for tests.
//!
//! ```toml
//! [[step]]
//! action = "submit"
//! work_type = "sync"
//! dedup_key = "account=7"
//! priority = 3
//!
//! [[step]]
//! action = "drain"
//! worker = "w1"
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::model::{NewWorkItem, WorkItem};
use crate::queue::Priority;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    #[serde(default)]
    pub step: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    Submit {
        work_type: String,
        #[serde(default = "default_source")]
        source: String,
        dedup_key: Option<String>,
        priority: Option<Priority>,
        position: Option<usize>,
        #[serde(default)]
        urgent: bool,
        #[serde(default)]
        to_end: bool,
        /// JSON text handed to the worker verbatim.
        params: Option<String>,
    },
    /// Claim one item, if any is pending.
    Claim {
        #[serde(default = "default_worker")]
        worker: String,
    },
    /// Claim until nothing is pending.
    Drain {
        #[serde(default = "default_worker")]
        worker: String,
    },
    Clear,
}

fn default_source() -> String {
    "plan".to_string()
}

fn default_worker() -> String {
    "plan".to_string()
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Plan(e.to_string()))
    }

    /// Apply every step to `engine`. Returns the claimed items in claim order.
    ///
    /// Stops at the first failing step; earlier steps stay applied.
    pub fn run(&self, engine: &mut Engine) -> Result<Vec<WorkItem>> {
        let mut claimed = Vec::new();

        for (index, step) in self.step.iter().enumerate() {
            debug!(step = index, ?step, "applying plan step");
            match step {
                Step::Submit {
                    work_type,
                    source,
                    dedup_key,
                    priority,
                    position,
                    urgent,
                    to_end,
                    params,
                } => {
                    let mut new = NewWorkItem::new(work_type, source);
                    if let Some(key) = dedup_key {
                        new = new.dedup_key(key);
                    }
                    if let Some(priority) = priority {
                        new = new.priority(*priority);
                    }
                    if let Some(position) = position {
                        new = new.position(*position);
                    }
                    if *urgent {
                        new = new.urgent();
                    }
                    if *to_end {
                        new = new.to_end();
                    }
                    if let Some(json) = params {
                        new = new.params(serde_json::from_str(json)?);
                    }
                    engine.submit(new)?;
                }
                Step::Claim { worker } => claimed.extend(engine.claim(worker)),
                Step::Drain { worker } => {
                    while let Some(item) = engine.claim(worker) {
                        claimed.push(item);
                    }
                }
                Step::Clear => {
                    engine.clear();
                }
            }
        }

        Ok(claimed)
    }
}
