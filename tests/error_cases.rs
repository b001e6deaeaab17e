mod common;

use std::io;

use common::{HEADER, MockFile, as_refs, faculty, init_logger, librarian, professor};
use tempfile::NamedTempFile;
use xmlable_batch::{
    core::{
        job::{Job, JobBuilder},
        reflect::Reflect,
        step::{Step, StepBuilder, StepStatus},
    },
    error::BatchError,
    item::{
        memory::InMemoryItemReader,
        xml::{NullValuePolicy, XmlExportWriterBuilder, serialize, serialize_to_writer},
    },
};

fn failing_sink() -> MockFile {
    let mut sink = MockFile::new();
    sink.expect_write().returning(|_| Err(io::Error::other("disk full")));
    sink.expect_flush().returning(|| Ok(()));
    sink
}

#[test]
fn sink_failure_aborts_the_run() {
    let result = serialize_to_writer(&[&professor("X", 40, "Physics")], failing_sink());

    match result {
        Err(BatchError::ItemWriter(message)) => assert!(message.contains("disk full")),
        Err(other) => panic!("Expected ItemWriter error, got {:?}", other),
        Ok(_) => panic!("Expected an error"),
    }
}

#[test]
fn sink_failure_mid_stream_is_reported() {
    // Larger than the write buffer, so the failure happens while writing events.
    let long_name = "Z".repeat(64 * 1024);
    let record = professor(&long_name, 40, "Physics");
    let records = [&record as &dyn Reflect];
    let writer = XmlExportWriterBuilder::new().from_writer(failing_sink()).unwrap();

    match writer.export(records) {
        Err(BatchError::ItemWriter(message)) => {
            assert!(message.contains("Failed to write XML"))
        }
        other => panic!("Expected ItemWriter error, got {:?}", other),
    }
}

#[test]
fn invalid_path_is_reported() {
    let result = serialize(
        &[&professor("X", 40, "Physics")],
        "/nonexistent/directory/output.xml",
    );

    match result {
        Err(BatchError::ItemWriter(message)) => {
            assert!(message.contains("Failed to create XML file"))
        }
        other => panic!("Expected ItemWriter error, got {:?}", other),
    }
}

#[test]
fn step_fails_when_the_sink_fails() {
    init_logger();
    let reader = InMemoryItemReader::new(faculty());
    let writer = XmlExportWriterBuilder::new().from_writer(failing_sink()).unwrap();

    let step = StepBuilder::new()
        .name("export-faculty".to_string())
        .reader(&reader)
        .writer(&writer)
        .chunk(2)
        .build()
        .unwrap();

    let job = JobBuilder::new().start(&step).build();
    let result = job.run();

    match result {
        Err(BatchError::Step(name)) => assert_eq!(name, "export-faculty"),
        other => panic!("Expected Step error, got {:?}", other),
    }
    assert_eq!(step.get_status(), StepStatus::Failed);
    assert_eq!(step.get_write_count(), 0);
    assert_eq!(step.get_write_error_count(), 2);
    assert_eq!(reader.remaining(), 4);
}

#[test]
fn null_value_fails_the_run_when_configured() {
    let temp_file = NamedTempFile::new().unwrap();
    let writer = XmlExportWriterBuilder::new()
        .null_values(NullValuePolicy::Fail)
        .from_path(temp_file.path())
        .unwrap();

    let records = vec![
        Box::new(librarian("John", "Doe", Some("Library Science"))) as Box<dyn Reflect>,
        Box::new(librarian("Jane", "Smith", None)),
        Box::new(professor("X", 40, "Physics")),
    ];

    let result = writer.export(as_refs(&records));

    match result {
        Err(BatchError::NullValue { type_name, slot }) => {
            assert_eq!(type_name, "Librarian");
            assert_eq!(slot, "specialization");
        }
        other => panic!("Expected NullValue error, got {:?}", other),
    }

    // No rollback: the first record and the start of the second stay on the sink.
    drop(writer);
    let content = std::fs::read_to_string(temp_file.path()).unwrap();
    assert!(content.starts_with(HEADER));
    assert!(content.contains("<specialization type=\"String\">Library Science</specialization>"));
    assert!(!content.contains("<Professor>"));
}

#[test]
fn null_value_is_an_empty_element_by_default() {
    init_logger();
    let output =
        serialize_to_writer(&[&librarian("Jane", "Smith", None)], Vec::new()).unwrap();
    let xml = String::from_utf8(output).unwrap();

    assert!(xml.contains("  <specialization type=\"String\"></specialization>\n"));
    assert!(xml.ends_with("</Librarian>\n"));
}
