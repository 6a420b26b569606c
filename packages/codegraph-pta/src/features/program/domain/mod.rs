//! Program model: arena handles, types, statements and declarations

pub mod ids;
pub mod program;
pub mod stmt;
pub mod types;

pub use ids::{ClassId, FieldId, MethodId, StmtId, VarId};
pub use program::{Class, Field, Method, MethodBody, Program, Var, VarUses};
pub use stmt::{CallKind, Invoke, Stmt};
pub use types::{FieldRef, MethodRef, Subsignature, Type};
