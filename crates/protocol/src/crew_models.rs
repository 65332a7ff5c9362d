//! Crew settings from the `[crew]` table of `config.toml`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How the tasks of a crew are scheduled.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum ProcessKind {
    /// Tasks run one after another in declaration order.
    #[default]
    Sequential,

    /// A manager agent delegates tasks. Recognised but not supported.
    Hierarchical,
}

/// Crew-level settings.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct CrewConfig {
    /// Display name of the crew.
    #[serde(default = "default_crew_name")]
    pub name: String,

    /// Scheduling strategy.
    #[serde(default)]
    pub process: ProcessKind,

    /// Log task prompts and outputs.
    #[serde(default)]
    pub verbose: bool,
}

fn default_crew_name() -> String {
    "crew".to_string()
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self {
            name: default_crew_name(),
            process: ProcessKind::default(),
            verbose: false,
        }
    }
}
