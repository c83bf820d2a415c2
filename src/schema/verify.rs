//! Matching nodes against schemas.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use log::{debug, trace};
use crate::decode::Decoder;
use crate::error::Error;
use crate::ident::{Ident, TagNumber};
use crate::mode::DecodeOptions;
use crate::node::Node;
use crate::region::Region;
use super::{RepeatedSchema, Schema, SchemaKind, TypeSchema};


//------------ verify, verify_with, verify_node ------------------------------

/// Decodes data and verifies it against a schema.
///
/// Decoding failures are reported as a failed verification.
pub fn verify(data: &[u8], schema: &Schema) -> Verification {
    verify_with(data, schema, &DecodeOptions::default())
}

/// Decodes data and verifies it against a schema using the given options.
///
/// The maximum depth of the options applies to both decoding and matching.
pub fn verify_with(
    data: &[u8], schema: &Schema, options: &DecodeOptions
) -> Verification {
    match Decoder::new(*options).decode(data) {
        Ok(node) => Matcher::new(*options).verify(&node, schema),
        Err(err) => {
            debug!("verification failed: {}", err);
            Verification::Failed(Mismatch {
                error: err.into_error(),
                bindings: Bindings::default(),
            })
        }
    }
}

/// Verifies a node against a schema.
pub fn verify_node(node: &Node, schema: &Schema) -> Verification {
    Matcher::new(DecodeOptions::default()).verify(node, schema)
}


//------------ Verification --------------------------------------------------

/// The outcome of verifying data against a schema.
#[derive(Clone, Debug)]
pub enum Verification {
    /// The data matches the schema.
    Verified(Bindings),

    /// The data doesn’t match the schema.
    Failed(Mismatch),
}

impl Verification {
    /// Returns whether the data matched.
    pub fn is_verified(&self) -> bool {
        matches!(*self, Verification::Verified(_))
    }

    /// Returns the bindings.
    ///
    /// For a failed verification, these are the bindings made up to the
    /// point of failure.
    pub fn bindings(&self) -> &Bindings {
        match *self {
            Verification::Verified(ref bindings) => bindings,
            Verification::Failed(ref mismatch) => &mismatch.bindings,
        }
    }

    /// Returns the error of a failed verification.
    pub fn error(&self) -> Option<&Error> {
        match *self {
            Verification::Verified(_) => None,
            Verification::Failed(ref mismatch) => Some(&mismatch.error),
        }
    }

    /// Converts the verification into a result.
    pub fn into_result(self) -> Result<Bindings, Mismatch> {
        match self {
            Verification::Verified(bindings) => Ok(bindings),
            Verification::Failed(mismatch) => Err(mismatch),
        }
    }
}


//------------ Mismatch ------------------------------------------------------

/// Data didn’t match a schema.
#[derive(Clone, Debug)]
pub struct Mismatch {
    /// What went wrong.
    error: Error,

    /// The bindings made before things went wrong.
    bindings: Bindings,
}

impl Mismatch {
    /// Returns the error.
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Returns the bindings made before the mismatch.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }
}


//------------ Binding -------------------------------------------------------

/// A value bound to a name.
#[derive(Clone, Debug)]
pub enum Binding {
    /// A single matched node.
    Node(Node),

    /// The matches of a repeated schema in order.
    Repeated(Vec<Node>),

    /// A matched node with the local bindings of its children.
    Scoped {
        /// The matched node.
        node: Node,

        /// The local bindings.
        bindings: Bindings,
    },
}

impl Binding {
    /// Returns the node of a single or scoped binding.
    pub fn node(&self) -> Option<&Node> {
        match *self {
            Binding::Node(ref node) => Some(node),
            Binding::Scoped { ref node, .. } => Some(node),
            Binding::Repeated(_) => None,
        }
    }

    /// Returns the nodes of a repeated binding.
    pub fn repeated(&self) -> Option<&[Node]> {
        match *self {
            Binding::Repeated(ref nodes) => Some(nodes),
            _ => None,
        }
    }

    /// Returns the local bindings of a scoped binding.
    pub fn scope(&self) -> Option<&Bindings> {
        match *self {
            Binding::Scoped { ref bindings, .. } => Some(bindings),
            _ => None,
        }
    }
}


//------------ Bindings ------------------------------------------------------

/// The names bound while matching a schema.
///
/// Bindings are kept in the order the matched nodes appear in the data. If
/// a name was bound more than once, the methods looking up a name return
/// the last binding.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    items: Vec<(String, Binding)>,
}

impl Bindings {
    /// Returns the binding for a name.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.items.iter().rev().find_map(|(key, binding)| {
            (key == name).then_some(binding)
        })
    }

    /// Returns the node bound to a name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.get(name).and_then(Binding::node)
    }

    /// Returns the nodes of a repeated schema bound to a name.
    pub fn repeated(&self, name: &str) -> Option<&[Node]> {
        self.get(name).and_then(Binding::repeated)
    }

    /// Returns the local bindings of the node bound to a name.
    pub fn scope(&self, name: &str) -> Option<&Bindings> {
        self.get(name).and_then(Binding::scope)
    }

    /// Returns whether a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns an iterator over all names and bindings in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.items.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    fn push(&mut self, name: &str, binding: Binding) {
        self.items.push((name.into(), binding))
    }

    fn insert(&mut self, index: usize, name: &str, binding: Binding) {
        self.items.insert(index, (name.into(), binding))
    }

    fn truncate(&mut self, len: usize) {
        self.items.truncate(len)
    }

    fn append(&mut self, other: Bindings) {
        self.items.extend(other.items)
    }
}


//------------ Matcher -------------------------------------------------------

/// The state of matching a tree against a schema.
struct Matcher {
    /// The options for decoding primitive content and the depth limit.
    options: DecodeOptions,
}

impl Matcher {
    fn new(options: DecodeOptions) -> Self {
        Matcher { options }
    }

    fn verify(&self, node: &Node, schema: &Schema) -> Verification {
        let mut bindings = Bindings::default();
        match self.match_node(node, schema, &mut bindings, 1) {
            Ok(()) => Verification::Verified(bindings),
            Err(error) => {
                debug!("verification failed: {}", error);
                Verification::Failed(Mismatch { error, bindings })
            }
        }
    }

    /// Matches a node against a schema.
    ///
    /// Bindings are added to `bindings`. If matching fails, the bindings
    /// made by nested schemas remain in place. Whoever recovers from the
    /// failure has to remove them.
    fn match_node(
        &self,
        node: &Node,
        schema: &Schema,
        bindings: &mut Bindings,
        depth: usize,
    ) -> Result<(), Error> {
        if depth > self.options.max_depth() {
            return Err(Error::TooDeep(self.options.max_depth()))
        }
        let mark = bindings.len();
        match schema.kind() {
            SchemaKind::Any => {
                if let Some(name) = schema.binding_name() {
                    bindings.push(name, Binding::Node(node.clone()))
                }
                Ok(())
            }
            SchemaKind::Choice(alternatives) => {
                for alternative in alternatives {
                    match self.match_node(node, alternative, bindings, depth) {
                        Ok(()) => {
                            if let Some(name) = schema.binding_name() {
                                bindings.insert(
                                    mark, name, Binding::Node(node.clone())
                                )
                            }
                            return Ok(())
                        }
                        Err(err) => {
                            trace!("CHOICE alternative failed: {}", err);
                            bindings.truncate(mark)
                        }
                    }
                }
                Err(Error::mismatch("Wrong values for CHOICE type"))
            }
            SchemaKind::Type(type_schema) => {
                let local = self.match_type(
                    node, type_schema, bindings, depth
                )?;
                match schema.binding_name() {
                    Some(name) => {
                        let binding = if local.is_empty() {
                            Binding::Node(node.clone())
                        }
                        else {
                            Binding::Scoped {
                                node: node.clone(), bindings: local
                            }
                        };
                        bindings.insert(mark, name, binding)
                    }
                    None => bindings.append(local),
                }
                Ok(())
            }
            SchemaKind::Repeated(_) => {
                Err(Error::Param("REPEATED outside of a constructed schema"))
            }
        }
    }

    /// Matches a node against a concrete type.
    ///
    /// Returns the local bindings of repeated children.
    fn match_type(
        &self,
        node: &Node,
        schema: &TypeSchema,
        bindings: &mut Bindings,
        depth: usize,
    ) -> Result<Bindings, Error> {
        if !ident_matches(schema.ident(), node.ident()) {
            return Err(Error::mismatch(format!(
                "expected {} but found {}", schema.ident(), node.ident()
            )))
        }
        if schema.ident().is_constructed() {
            if schema.primitive_schema().is_some() {
                return Err(Error::Param(
                    "primitive schema for a constructed type"
                ))
            }
            return self.match_children(
                node.children(), schema.children(), bindings, depth
            )
        }
        if let Some(inner) = schema.primitive_schema() {
            let content = match node.value().content_octets() {
                Some(content) => content,
                None => {
                    return Err(Error::mismatch(format!(
                        "{} has no content to decode", node.ident()
                    )))
                }
            };
            let mut source = Region::from_bytes(content)?;
            let inner_node = Decoder::new(self.options).decode_root(
                &mut source, depth + 1
            ).map_err(|err| err.into_error())?;
            self.match_node(&inner_node, inner, bindings, depth + 1)?;
        }
        Ok(Bindings::default())
    }

    /// Matches the children of a constructed node.
    ///
    /// Returns the local bindings of repeated children.
    fn match_children(
        &self,
        nodes: &[Node],
        schemas: &[Schema],
        bindings: &mut Bindings,
        depth: usize,
    ) -> Result<Bindings, Error> {
        let mut local = Bindings::default();
        if schemas.is_empty() {
            return Ok(local)
        }
        let mut nodes = nodes.iter().peekable();
        let mut skipped = None;
        for schema in schemas {
            if let SchemaKind::Repeated(repeated) = schema.kind() {
                skipped = None;
                let matched = self.match_repeated(
                    &mut nodes, schema, repeated, bindings, depth
                )?;
                if let Some(name) = schema.binding_name() {
                    let binding = Binding::Repeated(matched);
                    if repeated.is_local() {
                        local.push(name, binding)
                    }
                    else {
                        bindings.push(name, binding)
                    }
                }
                continue
            }
            let node = match nodes.peek() {
                Some(node) => *node,
                None if schema.is_optional() => continue,
                None => {
                    return Err(Error::mismatch("Inconsistent object length"))
                }
            };
            let mark = bindings.len();
            match self.match_node(node, schema, bindings, depth + 1) {
                Ok(()) => {
                    nodes.next();
                    skipped = None;
                }
                Err(err) if schema.is_optional() => {
                    trace!("skipping optional element: {}", err);
                    bindings.truncate(mark);
                    skipped = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        // Remaining children are allowed unless the last element checked
        // against a child was skipped.
        match skipped {
            Some(err) => Err(err),
            None => Ok(local)
        }
    }

    /// Matches all remaining nodes against a repeated schema.
    ///
    /// Returns the matching nodes in order.
    fn match_repeated<'a>(
        &self,
        nodes: &mut impl Iterator<Item = &'a Node>,
        schema: &Schema,
        repeated: &RepeatedSchema,
        bindings: &mut Bindings,
        depth: usize,
    ) -> Result<Vec<Node>, Error> {
        let mut matched = Vec::new();
        let mut seen = false;
        for node in nodes {
            seen = true;
            let mark = bindings.len();
            match self.match_node(node, repeated.inner(), bindings, depth + 1) {
                Ok(()) => matched.push(node.clone()),
                Err(err) if schema.is_optional() => {
                    trace!("skipping repeated element: {}", err);
                    bindings.truncate(mark);
                }
                Err(err) => return Err(err),
            }
        }
        if !seen && !schema.is_optional() {
            return Err(Error::mismatch("Inconsistent object length"))
        }
        Ok(matched)
    }
}


//------------ Helpers -------------------------------------------------------

/// Returns whether a node’s identifier octets match those of a schema.
///
/// Tag numbers that are only available as raw octets are compared octet by
/// octet.
fn ident_matches(schema: &Ident, node: &Ident) -> bool {
    if schema.class() != node.class()
        || schema.is_constructed() != node.is_constructed()
    {
        return false
    }
    match (schema.number(), node.number()) {
        (TagNumber::Number(left), TagNumber::Number(right)) => left == right,
        (TagNumber::HexOnly(left), TagNumber::HexOnly(right)) => {
            left.len() == right.len()
                && (0..left.len()).all(|i| left[i] == right[i])
        }
        _ => false,
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::encode;
    use crate::ident::Class;

    fn seq_int_bool() -> Schema {
        Schema::sequence(vec![
            Schema::integer().named("version"),
            Schema::boolean().named("critical"),
        ])
    }

    #[test]
    fn accept_and_reject() {
        let data = encode::encode(&Node::sequence(vec![
            Node::integer(1), Node::boolean(true)
        ]));
        let res = verify(&data, &seq_int_bool());
        assert!(res.is_verified());
        assert_eq!(res.bindings().node("version"), Some(&Node::integer(1)));
        assert_eq!(
            res.bindings().node("critical"), Some(&Node::boolean(true))
        );

        let data = encode::encode(&Node::sequence(vec![
            Node::integer(1), Node::octet_string(&b"x"[..])
        ]));
        let res = verify(&data, &seq_int_bool());
        assert!(!res.is_verified());
        assert!(matches!(res.error(), Some(Error::SchemaMismatch(_))));
        assert!(res.bindings().contains("version"));
        assert!(!res.bindings().contains("critical"));
    }

    #[test]
    fn decode_failures() {
        let res = verify(b"\x30\x05\x02\x01", &seq_int_bool());
        assert!(matches!(res.error(), Some(Error::TruncatedInput(_))));
        assert!(res.bindings().is_empty());
        assert!(matches!(
            verify(b"", &Schema::any()).error(), Some(Error::Param(_))
        ));
    }

    #[test]
    fn optional_trailing() {
        let schema = Schema::sequence(vec![
            Schema::integer().named("version"),
            Schema::boolean().named("critical").optional(),
            Schema::null().named("params").optional(),
        ]);
        let res = verify_node(
            &Node::sequence(vec![Node::integer(3)]), &schema
        );
        assert!(res.is_verified());
        assert_eq!(res.bindings().len(), 1);

        let res = verify_node(
            &Node::sequence(vec![Node::integer(3), Node::null()]), &schema
        );
        assert!(res.is_verified());
        assert!(res.bindings().contains("params"));
        assert!(!res.bindings().contains("critical"));

        let res = verify_node(&Node::sequence(vec![]), &seq_int_bool());
        assert_eq!(
            res.error(),
            Some(&Error::SchemaMismatch("Inconsistent object length".into()))
        );
    }

    #[test]
    fn trailing_data() {
        let res = verify_node(
            &Node::sequence(vec![
                Node::integer(1), Node::boolean(true), Node::null()
            ]),
            &seq_int_bool()
        );
        assert!(res.is_verified());
        assert!(res.bindings().contains("critical"));

        let res = verify_node(
            &Node::sequence(vec![Node::integer(1), Node::null()]),
            &Schema::sequence(vec![Schema::integer().named("v")])
        );
        assert!(res.is_verified());
        assert_eq!(res.bindings().len(), 1);
    }

    #[test]
    fn skipped_last_optional() {
        let schema = Schema::sequence(vec![
            Schema::integer().named("version"),
            Schema::boolean().named("critical").optional(),
        ]);
        let res = verify_node(
            &Node::sequence(vec![Node::integer(1), Node::null()]), &schema
        );
        assert!(!res.is_verified());
        assert!(matches!(res.error(), Some(Error::SchemaMismatch(_))));
        assert!(!res.bindings().contains("critical"));
    }

    #[test]
    fn empty_children_match_anything() {
        let res = verify_node(
            &Node::sequence(vec![Node::null(), Node::null()]),
            &Schema::sequence(vec![]).named("all")
        );
        assert!(res.is_verified());
        assert_eq!(
            res.bindings().node("all").map(|n| n.children().len()), Some(2)
        );
    }

    #[test]
    fn repeated() {
        let node = Node::sequence(vec![
            Node::integer(1), Node::integer(2), Node::integer(3)
        ]);
        let schema = Schema::sequence(vec![
            Schema::repeated(Schema::integer().named("last")).named("ints")
        ]);
        let res = verify_node(&node, &schema);
        assert!(res.is_verified());
        assert_eq!(
            res.bindings().repeated("ints"),
            Some(
                &[Node::integer(1), Node::integer(2), Node::integer(3)][..]
            )
        );
        assert_eq!(res.bindings().node("last"), Some(&Node::integer(3)));

        let mixed = Node::sequence(vec![
            Node::integer(1), Node::null(), Node::integer(3)
        ]);
        assert!(!verify_node(&mixed, &schema).is_verified());

        let lenient = Schema::sequence(vec![
            Schema::repeated(Schema::integer()).named("ints").optional()
        ]);
        let res = verify_node(&mixed, &lenient);
        assert!(res.is_verified());
        assert_eq!(res.bindings().repeated("ints").map(|n| n.len()), Some(2));

        assert!(!verify_node(&Node::sequence(vec![]), &schema).is_verified());
        assert!(verify_node(&Node::sequence(vec![]), &lenient).is_verified());
    }

    #[test]
    fn repeated_after_fixed_children() {
        let node = Node::sequence(vec![
            Node::oid("1.2.3").unwrap(), Node::null(), Node::null()
        ]);
        let schema = Schema::sequence(vec![
            Schema::oid().named("type"),
            Schema::repeated(Schema::null()).named("values"),
        ]);
        let res = verify_node(&node, &schema);
        assert!(res.is_verified());
        assert_eq!(
            res.bindings().repeated("values").map(|n| n.len()), Some(2)
        );
    }

    #[test]
    fn local_repeated() {
        let node = Node::sequence(vec![
            Node::set(vec![Node::integer(1), Node::integer(2)]),
        ]);
        let schema = Schema::sequence(vec![
            Schema::set(vec![
                Schema::repeated(Schema::integer()).named("items").local()
            ]).named("set")
        ]);
        let res = verify_node(&node, &schema);
        assert!(res.is_verified());
        assert!(!res.bindings().contains("items"));
        let scope = res.bindings().scope("set").unwrap();
        assert_eq!(scope.repeated("items").map(|n| n.len()), Some(2));
        assert_eq!(
            res.bindings().node("set").map(|n| n.children().len()), Some(2)
        );

        // Without a named enclosing node, local bindings end up outside.
        let schema = Schema::sequence(vec![
            Schema::set(vec![
                Schema::repeated(Schema::integer()).named("items").local()
            ])
        ]);
        let res = verify_node(&node, &schema);
        assert_eq!(
            res.bindings().repeated("items").map(|n| n.len()), Some(2)
        );
    }

    #[test]
    fn choice() {
        let schema = Schema::sequence(vec![
            Schema::choice(vec![
                Schema::utc_time().named("utc"),
                Schema::generalized_time().named("general"),
            ]).named("time"),
        ]);
        let node = Node::sequence(vec![
            Node::generalized_time(
                crate::time::Timestamp::new(2050, 1, 1, 0, 0, 0).unwrap()
            ).unwrap()
        ]);
        let res = verify_node(&node, &schema);
        assert!(res.is_verified());
        assert!(res.bindings().contains("general"));
        assert!(res.bindings().contains("time"));
        assert!(!res.bindings().contains("utc"));

        let res = verify_node(&Node::sequence(vec![Node::null()]), &schema);
        assert_eq!(
            res.error(),
            Some(&Error::SchemaMismatch("Wrong values for CHOICE type".into()))
        );
    }

    #[test]
    fn optional_backtracking_removes_bindings() {
        let schema = Schema::sequence(vec![
            Schema::sequence(vec![
                Schema::integer().named("inner"),
                Schema::boolean(),
            ]).named("pair").optional(),
            Schema::sequence(vec![Schema::integer()]).named("single"),
        ]);
        let node = Node::sequence(vec![
            Node::sequence(vec![Node::integer(5)]),
        ]);
        let res = verify_node(&node, &schema);
        assert!(res.is_verified());
        assert!(!res.bindings().contains("inner"));
        assert!(!res.bindings().contains("pair"));
        assert!(res.bindings().contains("single"));
    }

    #[test]
    fn names_are_trimmed() {
        let res = verify_node(
            &Node::null(), &Schema::null().named("  value \t")
        );
        assert!(res.bindings().contains("value"));
        let res = verify_node(&Node::null(), &Schema::null().named("   "));
        assert!(res.bindings().is_empty());
    }

    #[test]
    fn binding_order() {
        let schema = Schema::sequence(vec![
            Schema::integer().named("a"),
            Schema::explicit(0, Schema::boolean().named("c")).named("b"),
        ]).named("root");
        let node = Node::sequence(vec![
            Node::integer(1), Node::explicit(0, Node::boolean(false))
        ]);
        let res = verify_node(&node, &schema);
        let names: Vec<_> = res.bindings().iter()
            .map(|(name, _)| name).collect();
        assert_eq!(names, ["root", "a", "b", "c"]);
    }

    #[test]
    fn primitive_schema() {
        let inner = encode::encode(&Node::sequence(vec![Node::integer(7)]));
        let node = Node::octet_string(inner);
        let schema = Schema::octet_string().named("wrapper")
            .with_primitive_schema(
                Schema::sequence(vec![Schema::integer().named("value")])
            );
        let res = verify_node(&node, &schema);
        assert!(res.is_verified());
        assert_eq!(res.bindings().node("value"), Some(&Node::integer(7)));
        assert!(res.bindings().contains("wrapper"));

        let res = verify_node(&Node::octet_string(&b"\x05"[..]), &schema);
        assert!(matches!(res.error(), Some(Error::TruncatedInput(_))));

        let bad = Schema::sequence(vec![])
            .with_primitive_schema(Schema::any());
        assert!(matches!(
            verify_node(&Node::sequence(vec![]), &bad).error(),
            Some(Error::Param(_))
        ));
    }

    #[test]
    fn repeated_at_top_level() {
        assert!(matches!(
            verify_node(&Node::null(), &Schema::repeated(Schema::null()))
                .error(),
            Some(Error::Param(_))
        ));
    }

    #[test]
    fn tag_mismatches() {
        let node = Node::primitive(Class::Context, 0, bytes::Bytes::new());
        assert!(verify_node(&node, &Schema::implicit(0)).is_verified());
        assert!(!verify_node(&node, &Schema::implicit(1)).is_verified());
        assert!(!verify_node(&node, &Schema::null()).is_verified());
        assert!(
            !verify_node(&node, &Schema::context(0, vec![])).is_verified()
        );
    }

    #[test]
    fn raw_tags_compare_every_octet() {
        let data = b"\x5F\x81\x80\x80\x80\x80\x80\x80\x80\x82\x03\x00";
        let node = crate::decode::decode(data).unwrap();
        let same = Schema::tagged_raw(
            Class::Application, false,
            b"\x81\x80\x80\x80\x80\x80\x80\x80\x82\x03"
        ).unwrap();
        assert!(verify_node(&node, &same).is_verified());

        // Differs in the last octet only.
        let other = Schema::tagged_raw(
            Class::Application, false,
            b"\x81\x80\x80\x80\x80\x80\x80\x80\x82\x04"
        ).unwrap();
        assert!(!verify_node(&node, &other).is_verified());
    }

    #[test]
    fn depth_limit() {
        let mut node = Node::null();
        let mut schema = Schema::null();
        for _ in 0..10 {
            node = Node::sequence(vec![node]);
            schema = Schema::sequence(vec![schema]);
        }
        assert!(verify_node(&node, &schema).is_verified());
        let data = encode::encode(&node);
        let res = verify_with(
            &data, &schema, &DecodeOptions::new().with_max_depth(5)
        );
        assert_eq!(res.error(), Some(&Error::TooDeep(5)));
    }
}
