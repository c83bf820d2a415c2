//! Encoding modes and decoder configuration.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.


//------------ Mode ----------------------------------------------------------

/// The encoding rules to use when encoding a tree.
///
/// Decoding always accepts BER. When encoding, the mode decides what
/// happens to the choices BER leaves to the encoder.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// Constructed values whose length block is indefinite are encoded with
    /// indefinite length and an end-of-contents marker. Bit and octet
    /// strings decoded from the constructed form keep their segments.
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values in their shortest
    /// form. Bit and octet strings are always primitive.
    #[default]
    Der,
}

impl Mode {
    /// Returns whether this mode allows indefinite length values.
    pub fn allows_indefinite(self) -> bool {
        matches!(self, Mode::Ber)
    }
}


//------------ DecodeOptions -------------------------------------------------

/// Configuration for decoding and verification.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DecodeOptions {
    /// The maximum nesting depth of values.
    ///
    /// The outermost value has a depth of one. Every constructed value
    /// as well as every primitive value whose content is decoded for a
    /// schema adds one level.
    max_depth: usize,
}

impl DecodeOptions {
    /// The default maximum nesting depth.
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// Creates the default options.
    pub fn new() -> Self {
        DecodeOptions { max_depth: Self::DEFAULT_MAX_DEPTH }
    }

    /// Returns options with the given maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the maximum nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}
