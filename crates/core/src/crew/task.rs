//! Task descriptors.

use crate::crew::error::CrewError;
use crate::crew::template::{interpolate, Inputs};
use ck_protocol::task_models::TaskConfig;

/// A unit of work bound to one agent by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub expected_output: String,
    pub agent: String,
    pub output_file: Option<String>,
}

/// A task with every placeholder resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTask {
    pub description: String,
    pub expected_output: String,
    pub output_file: Option<String>,
}

impl Task {
    pub fn render(&self, inputs: &Inputs) -> Result<RenderedTask, CrewError> {
        let fill = |text: &str| {
            interpolate(text, inputs).map_err(|name| CrewError::MissingInput {
                owner: self.name.clone(),
                name,
            })
        };

        Ok(RenderedTask {
            description: fill(&self.description)?,
            expected_output: fill(&self.expected_output)?,
            output_file: self.output_file.as_deref().map(fill).transpose()?,
        })
    }
}

pub fn build_task(config: &TaskConfig) -> Task {
    Task {
        name: config.name.clone(),
        description: config.description.clone(),
        expected_output: config.expected_output.clone(),
        agent: config.agent.clone(),
        output_file: config.output_file.clone(),
    }
}
