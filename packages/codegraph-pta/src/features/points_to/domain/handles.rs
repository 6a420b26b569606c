//! Interned handles for analysis entities
//!
//! Issued densely from 0 by the entity manager and the context pool; a handle
//! is only meaningful together with the solver run that issued it.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! handle_id {
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

handle_id!(
    /// Abstract heap object (one per allocation site)
    ObjId,
    "o"
);
handle_id!(
    /// Interned context; `ContextId::EMPTY` is the empty context
    ContextId,
    "ctx"
);
handle_id!(
    /// Context-qualified abstract object
    CSObjId,
    "cso"
);
handle_id!(
    /// Context-qualified call site
    CSCallSiteId,
    "csc"
);
handle_id!(
    /// Context-qualified method
    CSMethodId,
    "csm"
);
handle_id!(
    /// Pointer (variable, static field, instance field or array slot)
    PointerId,
    "p"
);

impl ContextId {
    pub const EMPTY: ContextId = ContextId(0);

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}
