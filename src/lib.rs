#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 # XMLable Batch

 Export heterogeneous collections of in-memory records to XML, driven by
 declarative, per-type and per-field metadata. Built on the same reader /
 writer / step / job concepts as a chunk-oriented batch framework.

 ## Core Concepts

- **Marker:** Declarative metadata. `Marker::XmlAble` on a type makes its instances eligible for
  export; `Marker::XmlField` on a slot selects that slot, with a kind label and an optional output name.
- **Reflect:** The capability a record implements so its markers and slot values can be inspected at
  runtime. The `impl_reflect!` macro registers a plain struct.
- **MetadataCache:** Builds the export shape (`ClassInfo`) of each runtime type on first sight and
  reuses it for every later record of that type.
- **XmlExportWriter:** An `ItemWriter` emitting one element per exportable record and a
  `<notXMLable />` placeholder for the others, in input order.
- **Step / Job:** Move records from an `ItemReader` to an `ItemWriter`, chunk by chunk.

 ## Features

| **Feature**   | **Description**                                               |
|---------------|---------------------------------------------------------------|
| xml           | Enables the XML export writer (default)                       |
| full          | Enables all available features                                |

 ## Getting Started

```rust
# use xmlable_batch::{
#     core::{
#         job::{Job, JobBuilder},
#         reflect::{Marker, Reflect, XmlField},
#         step::{Step, StepBuilder, StepStatus},
#     },
#     error::BatchError,
#     impl_reflect,
#     item::{memory::InMemoryItemReader, xml::XmlExportWriterBuilder},
# };
# use std::env::temp_dir;
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
        department: [Marker::XmlField(XmlField::new("String").name("dept"))],
    }
}

struct Student {
    name: String,
}

impl_reflect! {
    Student [] {
        name: [],
    }
}

fn main() -> Result<(), BatchError> {
    let records: Vec<Box<dyn Reflect>> = vec![
        Box::new(Professor {
            first_name: "Prof".to_string(),
            last_name: "X".to_string(),
            age: 40,
            department: "Computer Science".to_string(),
        }),
        Box::new(Student { name: "Jane".to_string() }),
    ];

    let reader = InMemoryItemReader::new(records);
    let writer = XmlExportWriterBuilder::new().from_path(temp_dir().join("faculty.xml"))?;

    let step = StepBuilder::new()
        .reader(&reader)
        .writer(&writer)
        .chunk(10)
        .build()?;

    let job = JobBuilder::new().start(&step).build();
    let result = job.run();

    assert!(result.is_ok());
    assert!(step.get_status() == StepStatus::Success);

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.

 ## Contribution
 Unless you explicitly state otherwise, any contribution intentionally submitted
 for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
 dual licensed as above, without any additional terms or conditions

 */

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of items readers / writers (for example: XML export writer)
pub mod item;
