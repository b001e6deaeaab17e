use crate::error::BatchError;

/// Result of reading one item: `Ok(None)` once the reader is exhausted.
pub type ItemReaderResult<I> = Result<Option<I>, BatchError>;

/// Result of an [`ItemWriter`] operation.
pub type ItemWriterResult = Result<(), BatchError>;

/// Source of items for a step, one item at a time.
pub trait ItemReader<I> {
    fn read(&self) -> ItemReaderResult<I>;
}

/// Destination of a step, one chunk of items at a time.
///
/// `open` is called once before the first chunk and `close` once after the
/// last one, whether the step succeeded or not.
pub trait ItemWriter<O> {
    fn write(&self, items: &[O]) -> ItemWriterResult;

    fn flush(&self) -> ItemWriterResult {
        Ok(())
    }

    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}
