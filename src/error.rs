use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),

    #[error("Step {0} failed")]
    Step(String),

    /// A declared slot could not be read from a record.
    #[error("Unable to read slot `{slot}` of {type_name}")]
    SlotAccess { type_name: String, slot: String },

    /// A slot selected for export holds no value.
    #[error("Slot `{slot}` of {type_name} has no value")]
    NullValue { type_name: String, slot: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}
