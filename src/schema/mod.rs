//! Verifying decoded data against a schema.
//!
//! A [`Schema`] describes what a tree of nodes is supposed to look like. It
//! is made up of concrete types which have to match the tag of a node and,
//! if constructed, describe the node’s children, and of three kinds of
//! schema elements that don’t correspond to a value: a CHOICE between
//! alternative schemas, ANY which matches every node, and a repetition of
//! a schema for SEQUENCE OF and SET OF.
//!
//! Schema elements can be named. When a tree is verified via [`verify`] or
//! [`verify_node`], every node matched by a named element is bound to that
//! name in the resulting [`Bindings`].
//!
//! Schemas are built once and can be used for any number of verifications.
//! For instance, this schema describes an algorithm identifier with an
//! optional parameter:
//!
//! ```
//! use bertree::Schema;
//!
//! let schema = Schema::sequence(vec![
//!     Schema::oid().named("algorithm"),
//!     Schema::any().named("parameters").optional(),
//! ]);
//! let verified = bertree::verify(
//!     b"\x30\x0D\x06\x09\x2A\x86\x48\x86\xF7\x0D\x01\x01\x0B\x05\x00",
//!     &schema
//! );
//! assert!(verified.is_verified());
//! assert_eq!(
//!     verified.bindings().node("algorithm")
//!         .and_then(|node| node.value().as_oid())
//!         .map(ToString::to_string),
//!     Some("1.2.840.113549.1.1.11".into())
//! );
//! ```

pub use self::verify::{
    Binding, Bindings, Mismatch, Verification, verify, verify_node,
    verify_with,
};

use crate::ident::{Class, Ident};
use crate::node::Node;
use crate::string::StringKind;
use crate::tag;

mod verify;


//------------ Schema --------------------------------------------------------

/// A schema element.
///
/// Every element can have a name and can be optional. What the element
/// matches is determined by its [`SchemaKind`].
#[derive(Clone, Debug)]
pub struct Schema {
    /// What the element matches.
    kind: SchemaKind,

    /// The name to bind matched nodes to.
    name: Option<String>,

    /// Whether the element can be missing.
    optional: bool,
}

/// The kinds of schema elements.
#[derive(Clone, Debug)]
pub enum SchemaKind {
    /// A concrete type matching nodes with a given tag.
    Type(TypeSchema),

    /// A choice between alternatives.
    ///
    /// The first alternative that matches wins.
    Choice(Vec<Schema>),

    /// Any node at all.
    Any,

    /// All remaining children of a constructed value.
    Repeated(RepeatedSchema),
}

/// # Creation
///
impl Schema {
    fn new(kind: SchemaKind) -> Self {
        Schema { kind, name: None, optional: false }
    }

    /// Creates a schema for values with the given identifier octets.
    ///
    /// If the identifier is constructed, the schema matches any children.
    pub fn tagged(ident: Ident) -> Self {
        Self::constructed(ident, Vec::new())
    }

    /// Creates a schema for a constructed value with the given children.
    ///
    /// If `children` is empty, the schema matches any children.
    pub fn constructed(ident: Ident, children: Vec<Schema>) -> Self {
        Self::new(SchemaKind::Type(TypeSchema {
            ident, children, primitive_schema: None
        }))
    }

    /// Creates a schema for a primitive universal type.
    pub fn universal(number: u64) -> Self {
        Self::tagged(Ident::universal(number, false))
    }

    /// Creates a schema for a BOOLEAN.
    pub fn boolean() -> Self {
        Self::universal(tag::BOOLEAN)
    }

    /// Creates a schema for an INTEGER.
    pub fn integer() -> Self {
        Self::universal(tag::INTEGER)
    }

    /// Creates a schema for an ENUMERATED value.
    pub fn enumerated() -> Self {
        Self::universal(tag::ENUMERATED)
    }

    /// Creates a schema for a primitive BIT STRING.
    pub fn bit_string() -> Self {
        Self::universal(tag::BIT_STRING)
    }

    /// Creates a schema for a primitive OCTET STRING.
    pub fn octet_string() -> Self {
        Self::universal(tag::OCTET_STRING)
    }

    /// Creates a schema for a NULL.
    pub fn null() -> Self {
        Self::universal(tag::NULL)
    }

    /// Creates a schema for an OBJECT IDENTIFIER.
    pub fn oid() -> Self {
        Self::universal(tag::OID)
    }

    /// Creates a schema for a character string of the given kind.
    pub fn string(kind: StringKind) -> Self {
        Self::universal(kind.number())
    }

    /// Creates a schema for a UTCTime.
    pub fn utc_time() -> Self {
        Self::universal(tag::UTC_TIME)
    }

    /// Creates a schema for a GeneralizedTime.
    pub fn generalized_time() -> Self {
        Self::universal(tag::GENERALIZED_TIME)
    }

    /// Creates a schema for a SEQUENCE.
    pub fn sequence(children: Vec<Schema>) -> Self {
        Self::constructed(Ident::universal(tag::SEQUENCE, true), children)
    }

    /// Creates a schema for a SET.
    ///
    /// The children have to appear in the given order.
    pub fn set(children: Vec<Schema>) -> Self {
        Self::constructed(Ident::universal(tag::SET, true), children)
    }

    /// Creates a schema for an implicitly tagged primitive value.
    pub fn implicit(number: u64) -> Self {
        Self::tagged(Ident::context(number, false))
    }

    /// Creates a schema for an explicitly tagged value.
    pub fn explicit(number: u64, inner: Schema) -> Self {
        Self::constructed(Ident::context(number, true), vec![inner])
    }

    /// Creates a schema for a constructed context-specific value.
    pub fn context(number: u64, children: Vec<Schema>) -> Self {
        Self::constructed(Ident::context(number, true), children)
    }

    /// Creates a schema matching any node.
    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    /// Creates a schema matching the first matching alternative.
    pub fn choice(alternatives: Vec<Schema>) -> Self {
        Self::new(SchemaKind::Choice(alternatives))
    }

    /// Creates a schema matching all remaining children against `inner`.
    ///
    /// This is only allowed as a child of a constructed schema.
    pub fn repeated(inner: Schema) -> Self {
        Self::new(SchemaKind::Repeated(RepeatedSchema {
            inner: Box::new(inner), local: false
        }))
    }

    /// Creates a schema from a template node.
    ///
    /// The schema matches nodes with the same tags as the template and its
    /// children. Names and optional flags are taken from the template’s
    /// nodes. Values of primitive nodes are ignored.
    pub fn template(node: &Node) -> Self {
        let mut res = if node.is_constructed() {
            Self::constructed(
                node.ident().clone(),
                node.children().iter().map(Self::template).collect()
            )
        }
        else {
            Self::tagged(node.ident().clone())
        };
        res.name = node.name().map(Into::into);
        res.optional = node.is_optional();
        res
    }

    /// Returns the schema with a name.
    ///
    /// Leading and trailing white space is ignored when binding. Empty
    /// names are not bound at all.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the schema marked as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Returns a repeated schema binding its matches locally.
    ///
    /// Locally bound matches become part of the binding of the enclosing
    /// node rather than being bound next to it. This has no effect on
    /// schemas other than [`SchemaKind::Repeated`].
    pub fn local(mut self) -> Self {
        if let SchemaKind::Repeated(ref mut repeated) = self.kind {
            repeated.local = true
        }
        self
    }

    /// Returns the schema with a schema for the content of a primitive.
    ///
    /// The content octets of a matching primitive value are decoded and
    /// the result is verified against `inner`. This has no effect on
    /// schemas other than [`SchemaKind::Type`].
    pub fn with_primitive_schema(mut self, inner: Schema) -> Self {
        if let SchemaKind::Type(ref mut schema) = self.kind {
            schema.primitive_schema = Some(Box::new(inner))
        }
        self
    }

    /// Creates a schema for a tag with a number too large for a `u64`.
    ///
    /// The octets are the tag number octets following the first identifier
    /// octet.
    pub fn tagged_raw(
        class: Class, constructed: bool, octets: &[u8]
    ) -> Result<Self, crate::error::Error> {
        Ident::hex_only(class, constructed, octets).map(Self::tagged)
    }
}

/// # Access
///
impl Schema {
    /// Returns what the schema matches.
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Returns the name as given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the name used for binding.
    ///
    /// This is the trimmed name unless it is empty.
    pub(crate) fn binding_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }

    /// Returns whether the schema is optional.
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}


//------------ TypeSchema ----------------------------------------------------

/// A schema for a concrete type.
#[derive(Clone, Debug)]
pub struct TypeSchema {
    /// The identifier octets matching nodes must have.
    ident: Ident,

    /// The schemas for the children of constructed values.
    children: Vec<Schema>,

    /// The schema for the decoded content of primitive values.
    primitive_schema: Option<Box<Schema>>,
}

impl TypeSchema {
    /// Returns the identifier octets.
    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    /// Returns the schemas for the children.
    pub fn children(&self) -> &[Schema] {
        &self.children
    }

    /// Returns the schema for the content of a primitive value.
    pub fn primitive_schema(&self) -> Option<&Schema> {
        self.primitive_schema.as_deref()
    }
}


//------------ RepeatedSchema ------------------------------------------------

/// A schema for the repeated children of a constructed value.
#[derive(Clone, Debug)]
pub struct RepeatedSchema {
    /// The schema for each child.
    inner: Box<Schema>,

    /// Whether the matches are bound to the enclosing node.
    local: bool,
}

impl RepeatedSchema {
    /// Returns the schema for each child.
    pub fn inner(&self) -> &Schema {
        &self.inner
    }

    /// Returns whether matches are bound to the enclosing node.
    pub fn is_local(&self) -> bool {
        self.local
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn template() {
        let node = Node::sequence(vec![
            Node::integer(0).named("version"),
            Node::null().named("params").optional(),
        ]).named(" outer ");
        let schema = Schema::template(&node);
        assert_eq!(schema.name(), Some(" outer "));
        assert_eq!(schema.binding_name(), Some("outer"));
        let children = match schema.kind() {
            SchemaKind::Type(schema) => {
                assert_eq!(
                    schema.ident(), &Ident::universal(tag::SEQUENCE, true)
                );
                schema.children()
            }
            _ => panic!("expected a type schema"),
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name(), Some("version"));
        assert!(!children[0].is_optional());
        assert!(children[1].is_optional());
    }

    #[test]
    fn modifiers() {
        assert_eq!(Schema::any().named("  ").binding_name(), None);
        match Schema::repeated(Schema::integer()).local().kind() {
            SchemaKind::Repeated(repeated) => assert!(repeated.is_local()),
            _ => panic!("expected a repeated schema"),
        }
        assert!(matches!(Schema::null().local().kind(), SchemaKind::Type(_)));
        match Schema::octet_string()
            .with_primitive_schema(Schema::null()).kind()
        {
            SchemaKind::Type(schema) => {
                assert!(schema.primitive_schema().is_some())
            }
            _ => panic!("expected a type schema"),
        }
        assert!(Schema::tagged_raw(Class::Private, false, b"\x81").is_err());
    }
}
