//! Exports the staff and students of a small university to `output.xml`.
//!
//! ```text
//! cargo run --example university_export -- [output.xml] [export-config.json]
//! ```
use std::env;

use log::info;
use xmlable_batch::{
    core::{
        job::{Job, JobBuilder},
        reflect::{Marker, Reflect, XmlField},
        step::{Step, StepBuilder},
    },
    error::BatchError,
    impl_reflect,
    item::{
        memory::InMemoryItemReader,
        xml::{ExportConfig, XmlExportWriterBuilder},
    },
};

struct Professor {
    first_name: String,
    last_name: String,
    age: u32,
    department: String,
}

impl_reflect! {
    Professor [Marker::XmlAble] {
        first_name: [],
        last_name: [Marker::XmlField(XmlField::new("String"))],
        age: [Marker::XmlField(XmlField::new("int"))],
        department: [Marker::XmlField(XmlField::new("String"))],
    }
}

struct Librarian {
    first_name: String,
    last_name: String,
    age: u32,
    specialization: String,
}

impl_reflect! {
    Librarian [Marker::XmlAble] {
        first_name: [Marker::XmlField(XmlField::new("String").name("firstName"))],
        last_name: [Marker::XmlField(XmlField::new("String").name("lastName"))],
        age: [Marker::XmlField(XmlField::new("int"))],
        specialization: [Marker::XmlField(XmlField::new("String"))],
    }
}

/// Students are not exported.
struct Student {
    first_name: String,
    last_name: String,
    age: u32,
}

impl_reflect! {
    Student [] {
        first_name: [],
        last_name: [],
        age: [],
    }
}

fn professor(first_name: &str, last_name: &str, age: u32, department: &str) -> Box<dyn Reflect> {
    Box::new(Professor {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        age,
        department: department.to_string(),
    })
}

fn librarian(first_name: &str, last_name: &str, age: u32, specialization: &str) -> Box<dyn Reflect> {
    Box::new(Librarian {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        age,
        specialization: specialization.to_string(),
    })
}

fn student(first_name: &str, last_name: &str, age: u32) -> Box<dyn Reflect> {
    Box::new(Student {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        age,
    })
}

fn main() -> Result<(), BatchError> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "output.xml".to_string());
    let config = match args.next() {
        Some(path) => ExportConfig::from_path(path)?,
        None => ExportConfig::default(),
    };

    let people = vec![
        librarian("John", "Doe", 35, "Library Science"),
        professor("Prof", "X", 40, "Computer Science"),
        student("Jane", "Doe", 25),
        student("John", "Smith", 30),
        professor("Prof", "Y", 45, "Physics"),
        librarian("Jane", "Smith", 35, "Library Science"),
    ];

    let reader = InMemoryItemReader::new(people);
    let writer = XmlExportWriterBuilder::from_config(&config).from_path(&output)?;

    let step = StepBuilder::new()
        .name("export-university".to_string())
        .reader(&reader)
        .writer(&writer)
        .chunk(3)
        .build()?;

    let job = JobBuilder::new()
        .name("university-export".to_string())
        .start(&step)
        .build();
    let execution = job.run()?;

    info!(
        "{}: {} records exported to {} in {:?} ({:?})",
        step.get_name(),
        step.get_write_count(),
        output,
        execution.duration,
        step.get_status()
    );

    Ok(())
}
