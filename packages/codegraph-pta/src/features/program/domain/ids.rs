//! Arena handles for program entities
//!
//! Every entity of the program model lives in a `Vec` owned by `Program`;
//! these handles are indices into those arenas. Equality and hashing are
//! O(1) integer operations.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Class or interface
    ClassId,
    "c"
);
arena_id!(
    /// Method (concrete, abstract or native)
    MethodId,
    "m"
);
arena_id!(
    /// Static or instance field
    FieldId,
    "f"
);
arena_id!(
    /// Local variable, parameter or `this`
    VarId,
    "v"
);
arena_id!(
    /// Statement; doubles as allocation-site and call-site identity
    StmtId,
    "s"
);
