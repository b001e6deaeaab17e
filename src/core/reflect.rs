//! Declarative export markers and the `Reflect` capability.
//!
//! Rust has no runtime reflection, so every exportable record registers its
//! shape once: the markers attached to the type, the slots it declares (in
//! declaration order) with their own markers, and a way to read a slot value
//! by name. The [`impl_reflect!`](crate::impl_reflect) macro writes that
//! registration for plain structs.
//!
//! ```
//! use xmlable_batch::core::reflect::{Marker, Reflect, XmlField};
//! use xmlable_batch::impl_reflect;
//!
//! struct Book {
//!     title: String,
//!     pages: u32,
//!     isbn: String,
//! }
//!
//! impl_reflect! {
//!     Book [Marker::XmlAble] {
//!         title: [Marker::XmlField(XmlField::new("String"))],
//!         pages: [Marker::XmlField(XmlField::new("int").name("pageCount"))],
//!         isbn: [],
//!     }
//! }
//!
//! let book = Book { title: "Dune".to_string(), pages: 412, isbn: "0441013597".to_string() };
//! assert_eq!(book.type_identity().short_name(), "Book");
//! assert_eq!(book.slots().len(), 3);
//! assert_eq!(book.slot_value("pages").unwrap().unwrap().to_string(), "412");
//! ```

use std::any::{TypeId, type_name};
use std::fmt::Display;
use std::hash::{Hash, Hasher};

use crate::error::BatchError;

/// Result of reading one slot: `Ok(None)` when the slot holds no value.
pub type SlotResult<'a> = Result<Option<&'a dyn Display>, BatchError>;

/// Field Export Descriptor marker.
///
/// `kind` is a free-form label emitted verbatim as the `type` attribute.
/// `name` overrides the output tag; an empty name means "use the slot name".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlField {
    kind: &'static str,
    name: &'static str,
}

impl XmlField {
    pub const fn new(kind: &'static str) -> Self {
        Self { kind, name: "" }
    }

    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The explicit output name, if one was given.
    pub fn output_name(&self) -> Option<&'static str> {
        if self.name.is_empty() {
            None
        } else {
            Some(self.name)
        }
    }
}

/// A declarative marker attached to a type or to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Instances of the type are eligible for export.
    XmlAble,
    /// The slot is exported with the given descriptor.
    XmlField(XmlField),
    /// Any other marker. Export ignores it.
    Other(&'static str),
}

/// One member slot declared directly on a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInfo {
    name: &'static str,
    markers: &'static [Marker],
}

impl SlotInfo {
    pub const fn new(name: &'static str, markers: &'static [Marker]) -> Self {
        Self { name, markers }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn markers(&self) -> &'static [Marker] {
        self.markers
    }
}

/// Runtime identity of a concrete type.
#[derive(Debug, Clone, Copy)]
pub struct TypeIdentity {
    id: TypeId,
    path: &'static str,
}

impl TypeIdentity {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type path, as reported by the compiler.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Type name without module path or generic arguments.
    ///
    /// `my_app::model::Professor` and `my_app::Wrapper<u8>` give `Professor`
    /// and `Wrapper`.
    pub fn short_name(&self) -> &'static str {
        let without_generics = self.path.split('<').next().unwrap_or(self.path);
        without_generics
            .rsplit("::")
            .next()
            .unwrap_or(without_generics)
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Capability of a record whose shape can be inspected at runtime.
///
/// The trait is object safe: heterogeneous collections are passed around as
/// `Box<dyn Reflect>` or `&dyn Reflect`.
pub trait Reflect {
    /// Identity of the concrete runtime type.
    fn type_identity(&self) -> TypeIdentity;

    /// Markers attached to the type itself.
    fn type_markers(&self) -> &'static [Marker];

    /// Slots declared directly on the type, in declaration order.
    fn slots(&self) -> &'static [SlotInfo];

    /// Reads the current value of a slot.
    ///
    /// Returns [`BatchError::SlotAccess`] when the slot cannot be read.
    fn slot_value(&self, name: &str) -> SlotResult<'_>;
}

/// Textual view of a slot value, `None` when the value is absent.
pub trait SlotText {
    fn slot_text(&self) -> Option<&dyn Display>;
}

macro_rules! impl_slot_text {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SlotText for $ty {
                fn slot_text(&self) -> Option<&dyn Display> {
                    Some(self)
                }
            }
        )*
    };
}

impl_slot_text!(
    String, &'static str, char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128,
    usize, f32, f64
);

impl<T: SlotText> SlotText for Option<T> {
    fn slot_text(&self) -> Option<&dyn Display> {
        self.as_ref().and_then(|value| value.slot_text())
    }
}

impl<T: SlotText + ?Sized> SlotText for Box<T> {
    fn slot_text(&self) -> Option<&dyn Display> {
        (**self).slot_text()
    }
}

/// Builds the error returned when a record is asked for a slot it cannot read.
pub fn slot_access_error(identity: TypeIdentity, slot: &str) -> BatchError {
    BatchError::SlotAccess {
        type_name: identity.short_name().to_string(),
        slot: slot.to_string(),
    }
}

/// Registers a struct's export markers by implementing [`Reflect`] for it.
///
/// Type markers go in the first bracket, then every slot is listed in
/// declaration order with its own markers. Slot types must implement
/// [`SlotText`].
///
/// [`Reflect`]: crate::core::reflect::Reflect
/// [`SlotText`]: crate::core::reflect::SlotText
#[macro_export]
macro_rules! impl_reflect {
    (
        $ty:ty [$($type_marker:expr),* $(,)?] {
            $($slot:ident : [$($slot_marker:expr),* $(,)?]),* $(,)?
        }
    ) => {
        impl $crate::core::reflect::Reflect for $ty {
            fn type_identity(&self) -> $crate::core::reflect::TypeIdentity {
                $crate::core::reflect::TypeIdentity::of::<Self>()
            }

            fn type_markers(&self) -> &'static [$crate::core::reflect::Marker] {
                const MARKERS: &[$crate::core::reflect::Marker] = &[$($type_marker),*];
                MARKERS
            }

            fn slots(&self) -> &'static [$crate::core::reflect::SlotInfo] {
                const SLOTS: &[$crate::core::reflect::SlotInfo] = &[
                    $({
                        const MARKERS: &[$crate::core::reflect::Marker] = &[$($slot_marker),*];
                        $crate::core::reflect::SlotInfo::new(stringify!($slot), MARKERS)
                    }),*
                ];
                SLOTS
            }

            fn slot_value(&self, name: &str) -> $crate::core::reflect::SlotResult<'_> {
                match name {
                    $(stringify!($slot) => Ok($crate::core::reflect::SlotText::slot_text(&self.$slot)),)*
                    _ => Err($crate::core::reflect::slot_access_error(
                        $crate::core::reflect::TypeIdentity::of::<Self>(),
                        name,
                    )),
                }
            }
        }
    };
}
