use std::any::TypeId;
use std::collections::HashMap;

use log::debug;

use super::reflect::{Marker, Reflect, TypeIdentity};

/// Export descriptor of one slot, resolved from its [`XmlField`] marker.
///
/// [`XmlField`]: super::reflect::XmlField
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    slot: &'static str,
    kind: &'static str,
    tag: &'static str,
}

impl FieldInfo {
    /// Name of the slot to read.
    pub fn slot(&self) -> &'static str {
        self.slot
    }

    /// Declared kind label, emitted as the `type` attribute.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Output tag: the override name, or the slot name when none was given.
    pub fn tag(&self) -> &'static str {
        self.tag
    }
}

/// Export shape of one runtime type, built once and never modified.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    identity: TypeIdentity,
    xmlable: bool,
    class_name: &'static str,
    fields: Vec<FieldInfo>,
}

impl ClassInfo {
    /// Inspects the markers of `record`'s type.
    ///
    /// A type without [`Marker::XmlAble`] still gets an entry, with no fields.
    /// For an exportable type every slot carrying an [`Marker::XmlField`]
    /// becomes a field, in declaration order; other slots are left out.
    pub fn from_record(record: &dyn Reflect) -> Self {
        let identity = record.type_identity();
        let xmlable = record
            .type_markers()
            .iter()
            .any(|marker| matches!(marker, Marker::XmlAble));

        let mut fields: Vec<FieldInfo> = Vec::new();

        if xmlable {
            for slot in record.slots() {
                for marker in slot.markers() {
                    if let Marker::XmlField(descriptor) = marker {
                        let field = FieldInfo {
                            slot: slot.name(),
                            kind: descriptor.kind(),
                            tag: descriptor.output_name().unwrap_or(slot.name()),
                        };

                        // One descriptor per slot name, the last one scanned wins.
                        match fields.iter_mut().find(|known| known.slot == field.slot) {
                            Some(known) => *known = field,
                            None => fields.push(field),
                        }
                    }
                }
            }
        }

        ClassInfo {
            identity,
            xmlable,
            class_name: identity.short_name(),
            fields,
        }
    }

    pub fn identity(&self) -> TypeIdentity {
        self.identity
    }

    pub fn is_xmlable(&self) -> bool {
        self.xmlable
    }

    /// Element name wrapping each exported instance.
    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }
}

/// Turns a record's type into its [`ClassInfo`].
pub trait Introspector {
    fn introspect(&self, record: &dyn Reflect) -> ClassInfo;
}

/// Reads the declarative markers registered through [`Reflect`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerIntrospector;

impl Introspector for MarkerIntrospector {
    fn introspect(&self, record: &dyn Reflect) -> ClassInfo {
        ClassInfo::from_record(record)
    }
}

/// Lazily built mapping from runtime type to [`ClassInfo`].
///
/// Each type is introspected on first sight only. Entries are never evicted.
/// The cache is not synchronized; one export run owns it.
pub struct MetadataCache {
    introspector: Box<dyn Introspector>,
    entries: HashMap<TypeId, ClassInfo>,
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::with_introspector(MarkerIntrospector)
    }

    pub fn with_introspector(introspector: impl Introspector + 'static) -> Self {
        Self::with_boxed_introspector(Box::new(introspector))
    }

    pub fn with_boxed_introspector(introspector: Box<dyn Introspector>) -> Self {
        Self {
            introspector,
            entries: HashMap::new(),
        }
    }

    /// Returns the entry for `record`'s type, introspecting it if unseen.
    pub fn get_or_build(&mut self, record: &dyn Reflect) -> &ClassInfo {
        let identity = record.type_identity();
        let introspector = &self.introspector;

        self.entries.entry(identity.id()).or_insert_with(|| {
            let class_info = introspector.introspect(record);
            debug!(
                "Metadata built for {}: xmlable={}, fields={}",
                identity.path(),
                class_info.is_xmlable(),
                class_info.fields().len()
            );
            class_info
        })
    }

    pub fn get(&self, identity: &TypeIdentity) -> Option<&ClassInfo> {
        self.entries.get(&identity.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::core::reflect::{SlotInfo, SlotResult, XmlField};

    struct Professor {
        first_name: String,
        last_name: String,
        age: u32,
    }

    crate::impl_reflect! {
        Professor [Marker::XmlAble] {
            first_name: [],
            last_name: [Marker::XmlField(XmlField::new("String"))],
            age: [Marker::XmlField(XmlField::new("int").name("years"))],
        }
    }

    struct Student {
        name: String,
    }

    crate::impl_reflect! {
        Student [] {
            name: [Marker::XmlField(XmlField::new("String"))],
        }
    }

    struct Empty;

    crate::impl_reflect! {
        Empty [Marker::XmlAble] {}
    }

    struct Annotated {
        code: String,
        note: String,
    }

    crate::impl_reflect! {
        Annotated [Marker::Other("Entity"), Marker::XmlAble] {
            code: [
                Marker::XmlField(XmlField::new("String")),
                Marker::XmlField(XmlField::new("Code").name("id")),
            ],
            note: [Marker::Other("Transient")],
        }
    }

    /// Declares a slot it has no value for.
    struct Broken;

    impl Reflect for Broken {
        fn type_identity(&self) -> TypeIdentity {
            TypeIdentity::of::<Self>()
        }

        fn type_markers(&self) -> &'static [Marker] {
            &[Marker::XmlAble]
        }

        fn slots(&self) -> &'static [SlotInfo] {
            const HIDDEN: &[Marker] = &[Marker::XmlField(XmlField::new("String"))];
            const SLOTS: &[SlotInfo] = &[SlotInfo::new("hidden", HIDDEN)];
            SLOTS
        }

        fn slot_value(&self, name: &str) -> SlotResult<'_> {
            Err(crate::core::reflect::slot_access_error(
                self.type_identity(),
                name,
            ))
        }
    }

    struct CountingIntrospector {
        calls: Rc<Cell<usize>>,
    }

    impl Introspector for CountingIntrospector {
        fn introspect(&self, record: &dyn Reflect) -> ClassInfo {
            self.calls.set(self.calls.get() + 1);
            MarkerIntrospector.introspect(record)
        }
    }

    fn professor() -> Professor {
        Professor {
            first_name: "Charles".to_string(),
            last_name: "Xavier".to_string(),
            age: 40,
        }
    }

    #[test]
    fn exportable_type_keeps_only_marked_slots() {
        let class_info = ClassInfo::from_record(&professor());

        assert!(class_info.is_xmlable());
        assert_eq!(class_info.class_name(), "Professor");

        let slots: Vec<&str> = class_info.fields().iter().map(FieldInfo::slot).collect();
        assert_eq!(slots, vec!["last_name", "age"]);
    }

    #[test]
    fn output_name_override_and_default() {
        let class_info = ClassInfo::from_record(&professor());

        assert_eq!(class_info.fields()[0].tag(), "last_name");
        assert_eq!(class_info.fields()[0].kind(), "String");
        assert_eq!(class_info.fields()[1].tag(), "years");
        assert_eq!(class_info.fields()[1].kind(), "int");
    }

    #[test]
    fn type_without_marker_has_no_fields() {
        let class_info = ClassInfo::from_record(&Student {
            name: "Jane".to_string(),
        });

        assert!(!class_info.is_xmlable());
        assert_eq!(class_info.class_name(), "Student");
        assert!(class_info.fields().is_empty());
    }

    #[test]
    fn exportable_type_without_fields() {
        let class_info = ClassInfo::from_record(&Empty);

        assert!(class_info.is_xmlable());
        assert!(class_info.fields().is_empty());
    }

    #[test]
    fn last_descriptor_of_a_slot_wins_and_other_markers_are_ignored() {
        let class_info = ClassInfo::from_record(&Annotated {
            code: "A1".to_string(),
            note: "n/a".to_string(),
        });

        assert!(class_info.is_xmlable());
        assert_eq!(class_info.fields().len(), 1);
        assert_eq!(class_info.fields()[0].slot(), "code");
        assert_eq!(class_info.fields()[0].tag(), "id");
        assert_eq!(class_info.fields()[0].kind(), "Code");
    }

    #[test]
    fn introspection_does_not_read_values() {
        let class_info = ClassInfo::from_record(&Broken);

        assert_eq!(class_info.fields().len(), 1);
        assert_eq!(class_info.fields()[0].slot(), "hidden");
    }

    #[test]
    fn cache_introspects_each_type_once() {
        let calls = Rc::new(Cell::new(0));
        let mut cache = MetadataCache::with_introspector(CountingIntrospector {
            calls: Rc::clone(&calls),
        });

        for _ in 0..5 {
            cache.get_or_build(&professor());
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);

        cache.get_or_build(&Student {
            name: "Jane".to_string(),
        });
        cache.get_or_build(&professor());
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cached_entry_is_reused_unchanged() {
        let mut cache = MetadataCache::new();
        assert!(cache.is_empty());

        let first = cache.get_or_build(&professor()).clone();
        let second = cache.get_or_build(&professor()).clone();

        assert_eq!(first.identity(), second.identity());
        assert_eq!(first.fields(), second.fields());
        assert!(cache.get(&TypeIdentity::of::<Professor>()).is_some());
        assert!(cache.get(&TypeIdentity::of::<Student>()).is_none());
    }

    #[test]
    fn boxed_introspector_is_used_as_is() {
        let calls = Rc::new(Cell::new(0));
        let introspector: Box<dyn Introspector> = Box::new(CountingIntrospector {
            calls: Rc::clone(&calls),
        });
        let mut cache = MetadataCache::with_boxed_introspector(introspector);

        cache.get_or_build(&professor());
        cache.get_or_build(&professor());

        assert_eq!(calls.get(), 1);
    }
}
