#![allow(dead_code)]

mod mocks;

pub use mocks::MockFile;

use xmlable_batch::{
    core::reflect::{Marker, Reflect, XmlField},
    impl_reflect,
};

pub const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Routes `log` output through the test harness. Safe to call from every test.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Professor {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub department: String,
}

impl_reflect! {
    Professor [Marker::XmlAble] {
        first_name: [],
        last_name: [Marker::XmlField(XmlField::new("String"))],
        age: [Marker::XmlField(XmlField::new("int"))],
        department: [Marker::XmlField(XmlField::new("String"))],
    }
}

pub struct Librarian {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub specialization: Option<String>,
}

impl_reflect! {
    Librarian [Marker::XmlAble] {
        first_name: [Marker::XmlField(XmlField::new("String").name("firstName"))],
        last_name: [Marker::XmlField(XmlField::new("String").name("lastName"))],
        age: [],
        specialization: [Marker::XmlField(XmlField::new("String"))],
    }
}

pub struct Student {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
}

impl_reflect! {
    Student [] {
        first_name: [Marker::XmlField(XmlField::new("String"))],
        last_name: [Marker::XmlField(XmlField::new("String"))],
        age: [Marker::XmlField(XmlField::new("int"))],
    }
}

pub struct Archive;

impl_reflect! {
    Archive [Marker::XmlAble] {}
}

pub fn professor(last_name: &str, age: u32, department: &str) -> Professor {
    Professor {
        first_name: "Prof".to_string(),
        last_name: last_name.to_string(),
        age,
        department: department.to_string(),
    }
}

pub fn librarian(first_name: &str, last_name: &str, specialization: Option<&str>) -> Librarian {
    Librarian {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        age: 35,
        specialization: specialization.map(str::to_string),
    }
}

pub fn student(first_name: &str, last_name: &str, age: u32) -> Student {
    Student {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        age,
    }
}

/// The faculty of the sample university, in a fixed order.
pub fn faculty() -> Vec<Box<dyn Reflect>> {
    vec![
        Box::new(librarian("John", "Doe", Some("Library Science"))),
        Box::new(professor("X", 40, "Computer Science")),
        Box::new(student("Jane", "Doe", 25)),
        Box::new(student("John", "Smith", 30)),
        Box::new(professor("Y", 45, "Physics")),
        Box::new(librarian("Jane", "Smith", Some("Library Science"))),
    ]
}

/// Borrows boxed records as trait objects, keeping their order.
pub fn as_refs(records: &[Box<dyn Reflect>]) -> Vec<&dyn Reflect> {
    records.iter().map(|record| &**record as &dyn Reflect).collect()
}
