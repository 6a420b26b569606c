//! Abstract heap objects

use super::handles::ObjId;
use crate::features::program::domain::{ClassId, MethodId, StmtId, Type};
use serde::{Deserialize, Serialize};

/// Abstract object standing for every allocation at one site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obj {
    pub id: ObjId,

    /// The `New` statement
    pub site: StmtId,

    /// Allocated type; the runtime type used for dispatch
    pub ty: Type,

    /// Method containing the allocation site
    pub container: MethodId,

    /// Declaring class of `container` (the element type sensitivity uses)
    pub container_class: ClassId,
}
