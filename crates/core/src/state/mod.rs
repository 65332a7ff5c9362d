//! Run state for crew executions.

pub mod run;
