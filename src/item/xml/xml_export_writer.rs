use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, error, warn};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::core::item::{ItemWriter, ItemWriterResult};
use crate::core::metadata::{FieldInfo, Introspector, MarkerIntrospector, MetadataCache};
use crate::core::reflect::Reflect;
use crate::error::BatchError;

use super::xml_export_config::{ExportConfig, NullValuePolicy};

const NEW_LINE: &str = "\n";
const FIELD_INDENT: &str = "  ";

/// Writes records as XML elements, driven by their export markers.
///
/// The document starts with an XML declaration, written by `open`. Each
/// record then becomes, in input order:
/// - for an exportable type, an element named after the type holding one
///   `<tag type="kind">value</tag>` line per exported slot;
/// - otherwise, the self-closing placeholder element `<notXMLable />`.
///
/// Type metadata is built on the first record of each type and reused for
/// the lifetime of the writer.
///
/// # Examples
///
/// ```
/// use xmlable_batch::core::item::ItemWriter;
/// use xmlable_batch::core::reflect::{Marker, Reflect, XmlField};
/// use xmlable_batch::impl_reflect;
/// use xmlable_batch::item::xml::XmlExportWriterBuilder;
///
/// struct Person {
///     name: String,
/// }
///
/// impl_reflect! {
///     Person [Marker::XmlAble] {
///         name: [Marker::XmlField(XmlField::new("String").name("n"))],
///     }
/// }
///
/// struct Secret {
///     code: u32,
/// }
///
/// impl_reflect! {
///     Secret [] {
///         code: [],
///     }
/// }
///
/// let records: Vec<Box<dyn Reflect>> = vec![
///     Box::new(Person { name: "Ann".to_string() }),
///     Box::new(Secret { code: 7 }),
/// ];
///
/// let writer = XmlExportWriterBuilder::new().from_writer(Vec::new()).unwrap();
/// writer.open().unwrap();
/// writer.write(&records).unwrap();
/// writer.close().unwrap();
///
/// let xml = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(
///     xml,
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
///      <Person>\n  <n type=\"String\">Ann</n>\n</Person>\n\
///      <notXMLable />\n"
/// );
/// ```
pub struct XmlExportWriter<W: Write = File> {
    writer: RefCell<Writer<BufWriter<W>>>,
    cache: RefCell<MetadataCache>,
    config: ExportConfig,
    header_written: Cell<bool>,
}

impl<W: Write> XmlExportWriter<W> {
    /// Writes a whole run: header, every record in order, then flush.
    pub fn export<'r, I>(&self, records: I) -> ItemWriterResult
    where
        I: IntoIterator<Item = &'r dyn Reflect>,
    {
        self.write_records(records)?;
        self.flush_sink()
    }

    /// Writes records in order, preceded by the header if it is not out yet.
    pub fn write_records<'r, I>(&self, records: I) -> ItemWriterResult
    where
        I: IntoIterator<Item = &'r dyn Reflect>,
    {
        self.write_header()?;
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Number of distinct types seen so far.
    pub fn known_types(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Flushes buffered output and returns the underlying sink.
    pub fn into_inner(self) -> Result<W, BatchError> {
        self.writer
            .into_inner()
            .into_inner()
            .into_inner()
            .map_err(|e| BatchError::ItemWriter(format!("Failed to flush XML sink: {}", e.error())))
    }

    fn write_header(&self) -> ItemWriterResult {
        if self.header_written.replace(true) {
            return Ok(());
        }

        let mut writer = self.writer.borrow_mut();
        write_event(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        write_event(&mut writer, Event::Text(BytesText::from_escaped(NEW_LINE)))
    }

    fn write_record(&self, record: &dyn Reflect) -> ItemWriterResult {
        let mut cache = self.cache.borrow_mut();
        let class_info = cache.get_or_build(record);
        let mut writer = self.writer.borrow_mut();

        if !class_info.is_xmlable() {
            let tag = &self.config.placeholder_tag;
            let placeholder = BytesStart::from_content(format!("{} ", tag), tag.len());
            write_event(&mut writer, Event::Empty(placeholder))?;
            return write_event(&mut writer, Event::Text(BytesText::from_escaped(NEW_LINE)));
        }

        let class_name = class_info.class_name();
        write_event(&mut writer, Event::Start(BytesStart::new(class_name)))?;
        write_event(&mut writer, Event::Text(BytesText::from_escaped(NEW_LINE)))?;

        for field in class_info.fields() {
            let text = match record.slot_value(field.slot()) {
                Ok(Some(value)) => value.to_string(),
                Ok(None) => match self.config.null_values {
                    NullValuePolicy::EmptyElement => {
                        warn!("Slot {} of {} has no value", field.slot(), class_name);
                        String::new()
                    }
                    NullValuePolicy::Fail => {
                        return Err(BatchError::NullValue {
                            type_name: class_name.to_string(),
                            slot: field.slot().to_string(),
                        });
                    }
                },
                Err(err) => {
                    error!("Field {} skipped: {}", field.tag(), err);
                    continue;
                }
            };

            self.write_field(&mut writer, field, &text)?;
        }

        write_event(&mut writer, Event::End(BytesEnd::new(class_name)))?;
        write_event(&mut writer, Event::Text(BytesText::from_escaped(NEW_LINE)))
    }

    fn write_field(
        &self,
        writer: &mut Writer<BufWriter<W>>,
        field: &FieldInfo,
        text: &str,
    ) -> ItemWriterResult {
        let mut start = BytesStart::new(field.tag());
        start.push_attribute(("type", field.kind()));

        let text = if self.config.escape_text {
            BytesText::new(text)
        } else {
            BytesText::from_escaped(text)
        };

        write_event(writer, Event::Text(BytesText::from_escaped(FIELD_INDENT)))?;
        write_event(writer, Event::Start(start))?;
        write_event(writer, Event::Text(text))?;
        write_event(writer, Event::End(BytesEnd::new(field.tag())))?;
        write_event(writer, Event::Text(BytesText::from_escaped(NEW_LINE)))
    }

    fn flush_sink(&self) -> ItemWriterResult {
        self.writer
            .borrow_mut()
            .get_mut()
            .flush()
            .map_err(|e| BatchError::ItemWriter(format!("Failed to flush XML file: {}", e)))
    }
}

fn write_event<'a, W: Write>(
    writer: &mut Writer<BufWriter<W>>,
    event: Event<'a>,
) -> ItemWriterResult {
    writer
        .write_event(event)
        .map_err(|e| BatchError::ItemWriter(format!("Failed to write XML: {}", e)))
}

impl<W: Write> ItemWriter<Box<dyn Reflect>> for XmlExportWriter<W> {
    fn write(&self, items: &[Box<dyn Reflect>]) -> ItemWriterResult {
        self.write_records(items.iter().map(|item| &**item as &dyn Reflect))
    }

    fn flush(&self) -> ItemWriterResult {
        self.flush_sink()
    }

    fn open(&self) -> ItemWriterResult {
        self.write_header()
    }

    fn close(&self) -> ItemWriterResult {
        debug!("Closing XML export, {} types seen", self.known_types());
        self.flush_sink()
    }
}

/// Builder for [`XmlExportWriter`].
///
/// # Examples
///
/// ```
/// use xmlable_batch::item::xml::{NullValuePolicy, XmlExportWriterBuilder};
///
/// let writer = XmlExportWriterBuilder::new()
///     .escape_text(true)
///     .null_values(NullValuePolicy::Fail)
///     .placeholder_tag("skipped")
///     .from_writer(Vec::new())
///     .unwrap();
///
/// assert!(writer.config().escape_text);
/// ```
pub struct XmlExportWriterBuilder {
    config: ExportConfig,
    introspector: Box<dyn Introspector>,
}

impl Default for XmlExportWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlExportWriterBuilder {
    pub fn new() -> Self {
        Self {
            config: ExportConfig::default(),
            introspector: Box::new(MarkerIntrospector),
        }
    }

    /// Starts from a loaded configuration.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            config: config.clone(),
            ..Self::new()
        }
    }

    pub fn escape_text(mut self, yes: bool) -> Self {
        self.config.escape_text = yes;
        self
    }

    pub fn null_values(mut self, policy: NullValuePolicy) -> Self {
        self.config.null_values = policy;
        self
    }

    pub fn placeholder_tag(mut self, tag: &str) -> Self {
        self.config.placeholder_tag = tag.to_string();
        self
    }

    /// Replaces the source of type metadata.
    pub fn introspector(mut self, introspector: impl Introspector + 'static) -> Self {
        self.introspector = Box::new(introspector);
        self
    }

    /// Creates the file at `path` and writes to it.
    ///
    /// The configuration is checked first: an invalid placeholder tag fails
    /// with [`BatchError::Config`] and no file is created.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<XmlExportWriter<File>, BatchError> {
        self.config.validate()?;
        let file = File::create(path.as_ref())
            .map_err(|e| BatchError::ItemWriter(format!("Failed to create XML file: {}", e)))?;
        debug!("XML export to {}", path.as_ref().display());
        self.from_writer(file)
    }

    /// Writes to `wtr`. Fails with [`BatchError::Config`] on an invalid placeholder tag.
    pub fn from_writer<W: Write>(self, wtr: W) -> Result<XmlExportWriter<W>, BatchError> {
        self.config.validate()?;
        Ok(XmlExportWriter {
            writer: RefCell::new(Writer::new(BufWriter::new(wtr))),
            cache: RefCell::new(MetadataCache::with_boxed_introspector(self.introspector)),
            config: self.config,
            header_written: Cell::new(false),
        })
    }
}
