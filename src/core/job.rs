use std::time::{Duration, Instant};

use log::{error, info};
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    step::{Step, StepExecution},
};

pub type JobResult<T> = Result<T, BatchError>;

/// A batch run made of steps executed one after the other.
///
/// # Example Usage
///
/// ```
/// use xmlable_batch::core::job::{Job, JobBuilder};
/// use xmlable_batch::core::reflect::Reflect;
/// use xmlable_batch::core::step::StepBuilder;
/// use xmlable_batch::item::memory::InMemoryItemReader;
/// use xmlable_batch::item::xml::XmlExportWriterBuilder;
///
/// let records: Vec<Box<dyn Reflect>> = Vec::new();
/// let reader = InMemoryItemReader::new(records);
/// let writer = XmlExportWriterBuilder::new().from_writer(Vec::new()).unwrap();
///
/// let step = StepBuilder::new()
///     .name("export-records".to_string())
///     .reader(&reader)
///     .writer(&writer)
///     .build()
///     .unwrap();
///
/// let job = JobBuilder::new()
///     .name("nightly-export".to_string())
///     .start(&step)
///     .build();
///
/// let execution = job.run().unwrap();
/// assert_eq!(execution.steps.len(), 1);
/// ```
pub trait Job {
    /// Runs every step in order and stops at the first failing one.
    fn run(&self) -> JobResult<JobExecution>;
}

/// Timing and step details of a successful job run.
#[derive(Debug)]
pub struct JobExecution {
    pub id: Uuid,
    pub name: String,
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    /// One entry per step, in execution order
    pub steps: Vec<StepExecution>,
}

/// A configured job, ready to run. Built with [`JobBuilder`].
pub struct JobInstance<'a> {
    id: Uuid,
    name: String,
    steps: Vec<&'a dyn Step>,
}

impl JobInstance<'_> {
    pub fn get_id(&self) -> Uuid {
        self.id
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }
}

impl Job for JobInstance<'_> {
    fn run(&self) -> JobResult<JobExecution> {
        let start = Instant::now();
        info!("Start of job: {}, id: {}", self.name, self.id);

        let mut executions = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            match step.execute() {
                Ok(execution) => executions.push(execution),
                Err(err) => {
                    error!("Job {} aborted: {}", self.name, err);
                    return Err(BatchError::Step(step.get_name().to_owned()));
                }
            }
        }

        info!("End of job: {}, id: {}", self.name, self.id);

        Ok(JobExecution {
            id: self.id,
            name: self.name.clone(),
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            steps: executions,
        })
    }
}

/// Builder for a [`JobInstance`].
///
/// Without an explicit name, the job gets a random 8-character one.
#[derive(Default)]
pub struct JobBuilder<'a> {
    name: Option<String>,
    steps: Vec<&'a dyn Step>,
}

impl<'a> JobBuilder<'a> {
    pub fn new() -> Self {
        Self {
            name: None,
            steps: Vec::new(),
        }
    }

    pub fn name(mut self, name: String) -> JobBuilder<'a> {
        self.name = Some(name);
        self
    }

    /// Adds the first step. Same as [`next`](Self::next), reads better at the start of a chain.
    pub fn start(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    pub fn next(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> JobInstance<'a> {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            steps: self.steps,
        }
    }
}
