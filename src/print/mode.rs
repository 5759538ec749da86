use bitflags::bitflags;

bitflags! {
    /// Character-printing context, passed by value down the tree walk.
    ///
    /// The empty set is normal text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mode: u8 {
        /// Whitespace is significant; no wrap points.
        const PREFORMATTED = 1 << 0;
        /// Inside a comment; characters pass through.
        const COMMENT      = 1 << 1;
        /// Inside an attribute value.
        const ATTR_VALUE   = 1 << 2;
        /// Never wrap.
        const NO_WRAP      = 1 << 3;
        /// Verbatim content; nothing is escaped.
        const CDATA        = 1 << 4;
    }
}

impl Mode {
    pub const NORMAL: Mode = Mode::empty();
}
