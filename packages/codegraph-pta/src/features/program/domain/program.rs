//! Whole-program model consumed by the analyses
//!
//! Read-only after construction (see `ProgramBuilder`). Passed explicitly to
//! every analysis; there is no ambient "current program".

use super::ids::{ClassId, FieldId, MethodId, StmtId, VarId};
use super::stmt::Stmt;
use super::types::Subsignature;
use rustc_hash::FxHashMap;

/// Class or interface declaration
#[derive(Debug, Clone)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub superclass: Option<ClassId>,

    /// Implemented interfaces (for an interface: extended interfaces)
    pub interfaces: Vec<ClassId>,

    pub is_interface: bool,
    pub is_abstract: bool,

    pub(crate) methods: FxHashMap<Subsignature, MethodId>,
    pub(crate) fields: FxHashMap<String, FieldId>,
}

impl Class {
    /// Method declared directly in this class
    #[inline]
    pub fn declared_method(&self, subsignature: &Subsignature) -> Option<MethodId> {
        self.methods.get(subsignature).copied()
    }

    /// Field declared directly in this class
    #[inline]
    pub fn declared_field(&self, name: &str) -> Option<FieldId> {
        self.fields.get(name).copied()
    }

    pub fn declared_methods(&self) -> impl Iterator<Item = MethodId> + '_ {
        self.methods.values().copied()
    }
}

/// Method body: the IR of a concrete method
#[derive(Debug, Clone, Default)]
pub struct MethodBody {
    /// `this` variable, instance methods only
    pub this: Option<VarId>,
    pub params: Vec<VarId>,

    /// Variables returned by `Return` statements, in first-return order
    pub return_vars: Vec<VarId>,

    pub stmts: Vec<StmtId>,
}

/// Method declaration
#[derive(Debug, Clone)]
pub struct Method {
    pub id: MethodId,
    pub subsignature: Subsignature,
    pub class: ClassId,
    pub is_static: bool,
    pub is_abstract: bool,

    /// `None` for abstract and native methods
    pub body: Option<MethodBody>,
}

impl Method {
    #[inline]
    pub fn name(&self) -> &str {
        self.subsignature.method_name()
    }
}

/// Field declaration
#[derive(Debug, Clone)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    pub class: ClassId,
    pub is_static: bool,
}

/// Local variable
#[derive(Debug, Clone)]
pub struct Var {
    pub id: VarId,
    pub name: String,
    pub method: MethodId,
}

/// Statements that dereference a variable
///
/// Walked by the solver whenever the variable's points-to set grows.
#[derive(Debug, Clone, Default)]
pub struct VarUses {
    /// `v.f = x`
    pub store_fields: Vec<StmtId>,
    /// `x = v.f`
    pub load_fields: Vec<StmtId>,
    /// `v[i] = x`
    pub store_arrays: Vec<StmtId>,
    /// `x = v[i]`
    pub load_arrays: Vec<StmtId>,
    /// `v.m(...)` (special, virtual and interface calls)
    pub invokes: Vec<StmtId>,
}

impl VarUses {
    pub fn is_empty(&self) -> bool {
        self.store_fields.is_empty()
            && self.load_fields.is_empty()
            && self.store_arrays.is_empty()
            && self.load_arrays.is_empty()
            && self.invokes.is_empty()
    }
}

/// Whole program
#[derive(Debug, Clone)]
pub struct Program {
    pub(crate) classes: Vec<Class>,
    pub(crate) methods: Vec<Method>,
    pub(crate) fields: Vec<Field>,
    pub(crate) vars: Vec<Var>,
    pub(crate) stmts: Vec<Stmt>,
    pub(crate) stmt_owner: Vec<MethodId>,
    pub(crate) var_uses: Vec<VarUses>,
    pub(crate) class_by_name: FxHashMap<String, ClassId>,
    pub(crate) entry: MethodId,
    pub(crate) root_class: Option<ClassId>,
}

impl Program {
    // ═══════════════════════════════════════════════════════════════════════
    // Arena Access
    // ═══════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.index()]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn var(&self, id: VarId) -> &Var {
        &self.vars[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Method containing a statement
    #[inline]
    pub fn stmt_method(&self, id: StmtId) -> MethodId {
        self.stmt_owner[id.index()]
    }

    /// Statements dereferencing `var`
    #[inline]
    pub fn uses_of(&self, var: VarId) -> &VarUses {
        &self.var_uses[var.index()]
    }

    /// Program entry (e.g. `main`)
    #[inline]
    pub fn entry(&self) -> MethodId {
        self.entry
    }

    /// Root of the class hierarchy, used to dispatch on array receivers
    #[inline]
    pub fn root_class(&self) -> Option<ClassId> {
        self.root_class
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter()
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn num_methods(&self) -> usize {
        self.methods.len()
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_stmts(&self) -> usize {
        self.stmts.len()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lookup by Name
    // ═══════════════════════════════════════════════════════════════════════

    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    /// Method declared in `class_name` with the given subsignature
    pub fn method_by_name(&self, class_name: &str, subsignature: &str) -> Option<MethodId> {
        let class = self.class_by_name(class_name)?;
        self.class(class).declared_method(&Subsignature::new(subsignature))
    }

    /// Variable of `method` named `name`
    pub fn var_by_name(&self, method: MethodId, name: &str) -> Option<VarId> {
        self.vars
            .iter()
            .find(|v| v.method == method && v.name == name)
            .map(|v| v.id)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Rendering
    // ═══════════════════════════════════════════════════════════════════════

    /// `<Class: subsignature>`
    pub fn method_signature(&self, id: MethodId) -> String {
        let method = self.method(id);
        format!("<{}: {}>", self.class(method.class).name, method.subsignature)
    }

    /// `Class.field`
    pub fn field_name(&self, id: FieldId) -> String {
        let field = self.field(id);
        format!("{}.{}", self.class(field.class).name, field.name)
    }

    /// `<Class: subsignature>/name`
    pub fn var_name(&self, id: VarId) -> String {
        let var = self.var(id);
        format!("{}/{}", self.method_signature(var.method), var.name)
    }
}
