use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use log::{debug, error, info};
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    item::{ItemReader, ItemWriter},
};

/// Outcome of reading one chunk.
#[derive(Debug, PartialEq)]
enum ChunkStatus {
    /// The reader is exhausted; the chunk may be partially filled.
    Finished,
    /// The chunk reached its configured size.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Starting,
    Started,
    Success,
    Failed,
}

/// Execution details of a successful step.
#[derive(Debug)]
pub struct StepExecution {
    pub id: Uuid,
    pub name: String,
    pub status: StepStatus,
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    /// Number of items successfully read
    pub read_count: usize,
    /// Number of items successfully written
    pub write_count: usize,
    pub read_error_count: usize,
    pub write_error_count: usize,
}

pub type StepResult = Result<StepExecution, BatchError>;

/// A sequential phase of a job.
pub trait Step {
    /// Executes the step.
    ///
    /// # Returns
    /// - `Ok(StepExecution)`: The step completed successfully
    /// - `Err(BatchError::Step)`: The step failed
    fn execute(&self) -> StepResult;

    fn get_name(&self) -> &str;

    fn get_status(&self) -> StepStatus;
}

/// Chunk-oriented step moving items from a reader to a writer.
///
/// Items keep their read order. The first read or write error fails the step:
/// no retry and no skipping. The writer is closed on every exit path.
pub struct StepInstance<'a, I> {
    id: Uuid,
    name: String,
    reader: &'a dyn ItemReader<I>,
    writer: &'a dyn ItemWriter<I>,
    chunk_size: usize,
    status: Cell<StepStatus>,
    read_count: Cell<usize>,
    write_count: Cell<usize>,
    read_error_count: Cell<usize>,
    write_error_count: Cell<usize>,
}

impl<I> Step for StepInstance<'_, I> {
    fn execute(&self) -> StepResult {
        let start = Instant::now();

        info!("Start of step: {}, id: {}", self.name, self.id);
        self.status.set(StepStatus::Started);

        let outcome = self.writer.open().and_then(|()| self.process_chunks());
        let closed = self.writer.close();

        let status = match outcome.and(closed) {
            Ok(()) => StepStatus::Success,
            Err(err) => {
                error!("Step {} failed: {}", self.name, err);
                StepStatus::Failed
            }
        };
        self.status.set(status);

        info!("End of step: {}, id: {}", self.name, self.id);

        if status == StepStatus::Failed {
            return Err(BatchError::Step(self.name.clone()));
        }

        Ok(StepExecution {
            id: self.id,
            name: self.name.clone(),
            status,
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            read_count: self.read_count.get(),
            write_count: self.write_count.get(),
            read_error_count: self.read_error_count.get(),
            write_error_count: self.write_error_count.get(),
        })
    }

    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_status(&self) -> StepStatus {
        self.status.get()
    }
}

impl<I> StepInstance<'_, I> {
    pub fn get_read_count(&self) -> usize {
        self.read_count.get()
    }

    pub fn get_write_count(&self) -> usize {
        self.write_count.get()
    }

    pub fn get_read_error_count(&self) -> usize {
        self.read_error_count.get()
    }

    pub fn get_write_error_count(&self) -> usize {
        self.write_error_count.get()
    }

    fn process_chunks(&self) -> Result<(), BatchError> {
        let mut chunk: Vec<I> = Vec::with_capacity(self.chunk_size);

        loop {
            let chunk_status = self.read_chunk(&mut chunk)?;

            if !chunk.is_empty() {
                self.write_chunk(&chunk)?;
            }

            if chunk_status == ChunkStatus::Finished {
                return Ok(());
            }
        }
    }

    fn read_chunk(&self, chunk: &mut Vec<I>) -> Result<ChunkStatus, BatchError> {
        debug!("Start reading chunk");
        chunk.clear();

        while chunk.len() < self.chunk_size {
            match self.reader.read() {
                Ok(Some(item)) => {
                    chunk.push(item);
                    self.read_count.set(self.read_count.get() + 1);
                }
                Ok(None) => {
                    debug!("End reading chunk: FINISHED");
                    return Ok(ChunkStatus::Finished);
                }
                Err(err) => {
                    self.read_error_count.set(self.read_error_count.get() + 1);
                    error!("Error occured during read item: {}", err);
                    return Err(err);
                }
            }
        }

        debug!("End reading chunk: FULL");
        Ok(ChunkStatus::Full)
    }

    fn write_chunk(&self, chunk: &[I]) -> Result<(), BatchError> {
        debug!("Start writing chunk");

        match self.writer.write(chunk).and_then(|()| self.writer.flush()) {
            Ok(()) => {
                self.write_count.set(self.write_count.get() + chunk.len());
                debug!("End writing chunk");
                Ok(())
            }
            Err(err) => {
                self.write_error_count
                    .set(self.write_error_count.get() + chunk.len());
                error!("ItemWriter error: {}", err);
                Err(err)
            }
        }
    }
}

/// Builder for a [`StepInstance`].
///
/// The chunk size defaults to 1 and is never less than 1.
pub struct StepBuilder<'a, I> {
    name: Option<String>,
    reader: Option<&'a dyn ItemReader<I>>,
    writer: Option<&'a dyn ItemWriter<I>>,
    chunk_size: usize,
}

impl<I> Default for StepBuilder<'_, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, I> StepBuilder<'a, I> {
    pub fn new() -> Self {
        Self {
            name: None,
            reader: None,
            writer: None,
            chunk_size: 1,
        }
    }

    pub fn name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn reader(mut self, reader: &'a impl ItemReader<I>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn writer(mut self, writer: &'a impl ItemWriter<I>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn chunk(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Builds the step, failing when the reader or the writer is missing.
    pub fn build(self) -> Result<StepInstance<'a, I>, BatchError> {
        let reader = self
            .reader
            .ok_or_else(|| BatchError::Config("a step needs a reader".to_string()))?;
        let writer = self
            .writer
            .ok_or_else(|| BatchError::Config("a step needs a writer".to_string()))?;

        Ok(StepInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            reader,
            writer,
            chunk_size: self.chunk_size,
            status: Cell::new(StepStatus::Starting),
            read_count: Cell::new(0),
            write_count: Cell::new(0),
            read_error_count: Cell::new(0),
            write_error_count: Cell::new(0),
        })
    }
}
