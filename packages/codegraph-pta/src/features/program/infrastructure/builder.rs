//! Program construction
//!
//! Fluent builder used by IR producers and tests. Handles are handed out
//! eagerly; every structural check is deferred to `build()`, which either
//! returns a consistent `Program` or a `PtaError::MalformedIr`.

use crate::errors::{PtaError, Result};
use crate::features::program::domain::{
    Class, ClassId, Field, FieldId, FieldRef, Invoke, Method, MethodBody, MethodId, Program,
    Stmt, StmtId, Subsignature, Type, Var, VarId, VarUses,
};
use rustc_hash::FxHashMap;

/// How a method is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Class method with a body
    Static,
    /// Instance method with a body and a `this` variable
    Instance,
    /// Instance method without a body
    Abstract,
    /// Instance method implemented outside the program
    Native,
}

/// Builder for `Program`
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    classes: Vec<Class>,
    methods: Vec<Method>,
    fields: Vec<Field>,
    vars: Vec<Var>,
    stmts: Vec<Stmt>,
    stmt_owner: Vec<MethodId>,
    entry: Option<MethodId>,
    root_class: Option<ClassId>,
    errors: Vec<String>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Declarations
    // ═══════════════════════════════════════════════════════════════════════

    /// Declare a class
    pub fn add_class(&mut self, name: impl Into<String>, superclass: Option<ClassId>) -> ClassId {
        self.push_class(name.into(), superclass, Vec::new(), false)
    }

    /// Declare an interface extending `extends`
    pub fn add_interface(&mut self, name: impl Into<String>, extends: &[ClassId]) -> ClassId {
        self.push_class(name.into(), None, extends.to_vec(), true)
    }

    fn push_class(
        &mut self,
        name: String,
        superclass: Option<ClassId>,
        interfaces: Vec<ClassId>,
        is_interface: bool,
    ) -> ClassId {
        let id = ClassId::new(self.classes.len());
        self.classes.push(Class {
            id,
            name,
            superclass,
            interfaces,
            is_interface,
            is_abstract: is_interface,
            methods: FxHashMap::default(),
            fields: FxHashMap::default(),
        });
        id
    }

    /// Record that `class` implements `interface`
    pub fn implement(&mut self, class: ClassId, interface: ClassId) {
        match self.classes.get_mut(class.index()) {
            Some(c) => c.interfaces.push(interface),
            None => self.errors.push(format!("implement: unknown class {}", class)),
        }
    }

    pub fn set_abstract(&mut self, class: ClassId) {
        match self.classes.get_mut(class.index()) {
            Some(c) => c.is_abstract = true,
            None => self.errors.push(format!("set_abstract: unknown class {}", class)),
        }
    }

    /// Declare a field
    pub fn add_field(&mut self, class: ClassId, name: impl Into<String>, is_static: bool) -> FieldId {
        let id = FieldId::new(self.fields.len());
        let name = name.into();
        match self.classes.get_mut(class.index()) {
            Some(c) => {
                if c.fields.insert(name.clone(), id).is_some() {
                    self.errors.push(format!("duplicate field {}.{}", c.name, name));
                }
            }
            None => self.errors.push(format!("field {}: unknown class {}", name, class)),
        }
        self.fields.push(Field {
            id,
            name,
            class,
            is_static,
        });
        id
    }

    /// Declare a method; instance methods with a body get a `this` variable
    pub fn add_method(&mut self, class: ClassId, subsignature: impl Into<Subsignature>, kind: MethodKind) -> MethodId {
        let id = MethodId::new(self.methods.len());
        let subsignature = subsignature.into();

        match self.classes.get_mut(class.index()) {
            Some(c) => {
                if c.methods.insert(subsignature.clone(), id).is_some() {
                    self.errors.push(format!("duplicate method <{}: {}>", c.name, subsignature));
                }
            }
            None => self.errors.push(format!("method {}: unknown class {}", subsignature, class)),
        }

        let body = match kind {
            MethodKind::Static | MethodKind::Instance => Some(MethodBody::default()),
            MethodKind::Abstract | MethodKind::Native => None,
        };
        self.methods.push(Method {
            id,
            subsignature,
            class,
            is_static: kind == MethodKind::Static,
            is_abstract: kind == MethodKind::Abstract,
            body,
        });

        if kind == MethodKind::Instance {
            let this = self.push_var(id, "this".to_string());
            if let Some(body) = self.body_mut(id) {
                body.this = Some(this);
            }
        }
        id
    }

    /// Append a formal parameter
    pub fn add_param(&mut self, method: MethodId, name: impl Into<String>) -> VarId {
        let var = self.push_var(method, name.into());
        match self.body_mut(method) {
            Some(body) => body.params.push(var),
            None => self.errors.push(format!("add_param: {} has no body", method)),
        }
        var
    }

    /// Declare a local variable
    pub fn add_var(&mut self, method: MethodId, name: impl Into<String>) -> VarId {
        self.push_var(method, name.into())
    }

    pub fn this_var(&self, method: MethodId) -> Option<VarId> {
        self.methods
            .get(method.index())
            .and_then(|m| m.body.as_ref())
            .and_then(|b| b.this)
    }

    fn push_var(&mut self, method: MethodId, name: String) -> VarId {
        let id = VarId::new(self.vars.len());
        self.vars.push(Var { id, name, method });
        id
    }

    fn body_mut(&mut self, method: MethodId) -> Option<&mut MethodBody> {
        self.methods.get_mut(method.index()).and_then(|m| m.body.as_mut())
    }

    pub fn set_entry(&mut self, method: MethodId) {
        self.entry = Some(method);
    }

    pub fn set_root_class(&mut self, class: ClassId) {
        self.root_class = Some(class);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════════

    /// Append a statement to `method`'s body
    pub fn push_stmt(&mut self, method: MethodId, stmt: Stmt) -> StmtId {
        let id = StmtId::new(self.stmts.len());
        self.stmts.push(stmt);
        self.stmt_owner.push(method);
        match self.body_mut(method) {
            Some(body) => body.stmts.push(id),
            None => self.errors.push(format!("statement {} added to bodiless {}", id, method)),
        }
        id
    }

    /// `lhs = new ty`
    pub fn alloc(&mut self, method: MethodId, lhs: VarId, ty: Type) -> StmtId {
        self.push_stmt(method, Stmt::New { lhs, ty })
    }

    /// `lhs = rhs`
    pub fn copy(&mut self, method: MethodId, lhs: VarId, rhs: VarId) -> StmtId {
        self.push_stmt(method, Stmt::Copy { lhs, rhs })
    }

    /// `lhs = base.f`
    pub fn load_field(&mut self, method: MethodId, lhs: VarId, base: VarId, field: FieldRef) -> StmtId {
        self.push_stmt(
            method,
            Stmt::LoadField {
                lhs,
                base: Some(base),
                field,
            },
        )
    }

    /// `base.f = rhs`
    pub fn store_field(&mut self, method: MethodId, base: VarId, field: FieldRef, rhs: VarId) -> StmtId {
        self.push_stmt(
            method,
            Stmt::StoreField {
                base: Some(base),
                field,
                rhs,
            },
        )
    }

    /// `lhs = T.f`
    pub fn load_static(&mut self, method: MethodId, lhs: VarId, field: FieldRef) -> StmtId {
        self.push_stmt(method, Stmt::LoadField { lhs, base: None, field })
    }

    /// `T.f = rhs`
    pub fn store_static(&mut self, method: MethodId, field: FieldRef, rhs: VarId) -> StmtId {
        self.push_stmt(method, Stmt::StoreField { base: None, field, rhs })
    }

    /// `lhs = base[i]`
    pub fn load_array(&mut self, method: MethodId, lhs: VarId, base: VarId) -> StmtId {
        self.push_stmt(method, Stmt::LoadArray { lhs, base })
    }

    /// `base[i] = rhs`
    pub fn store_array(&mut self, method: MethodId, base: VarId, rhs: VarId) -> StmtId {
        self.push_stmt(method, Stmt::StoreArray { base, rhs })
    }

    pub fn invoke(&mut self, method: MethodId, invoke: Invoke) -> StmtId {
        self.push_stmt(method, Stmt::Invoke(invoke))
    }

    /// `return value`
    pub fn ret(&mut self, method: MethodId, value: Option<VarId>) -> StmtId {
        self.push_stmt(method, Stmt::Return { value })
    }

    pub fn nop(&mut self, method: MethodId) -> StmtId {
        self.push_stmt(method, Stmt::Nop)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Validation
    // ═══════════════════════════════════════════════════════════════════════

    /// Validate and freeze into a `Program`
    pub fn build(mut self) -> Result<Program> {
        if let Some(first) = self.errors.first() {
            return Err(PtaError::malformed(first.clone()));
        }

        let entry = self
            .entry
            .ok_or_else(|| PtaError::malformed("no entry method"))?;
        match self.methods.get(entry.index()) {
            Some(m) if m.body.is_some() => {}
            Some(_) => return Err(PtaError::malformed(format!("entry {} has no body", entry))),
            None => return Err(PtaError::malformed(format!("unknown entry method {}", entry))),
        }
        if let Some(root) = self.root_class {
            self.check_class(root, "root class")?;
        }

        self.check_classes()?;
        self.check_bodies()?;
        self.collect_return_vars();
        let var_uses = self.index_var_uses();

        let mut class_by_name = FxHashMap::default();
        for class in &self.classes {
            if class_by_name.insert(class.name.clone(), class.id).is_some() {
                return Err(PtaError::malformed(format!("duplicate class {}", class.name)));
            }
        }

        Ok(Program {
            classes: self.classes,
            methods: self.methods,
            fields: self.fields,
            vars: self.vars,
            stmts: self.stmts,
            stmt_owner: self.stmt_owner,
            var_uses,
            class_by_name,
            entry,
            root_class: self.root_class,
        })
    }

    fn check_class(&self, id: ClassId, what: &str) -> Result<()> {
        if id.index() < self.classes.len() {
            Ok(())
        } else {
            Err(PtaError::malformed(format!("{}: unknown class {}", what, id)))
        }
    }

    fn check_classes(&self) -> Result<()> {
        for class in &self.classes {
            if let Some(sup) = class.superclass {
                self.check_class(sup, &class.name)?;
                if self.classes[sup.index()].is_interface {
                    return Err(PtaError::malformed(format!(
                        "{} extends interface {}",
                        class.name, self.classes[sup.index()].name
                    )));
                }
            }
            for &iface in &class.interfaces {
                self.check_class(iface, &class.name)?;
                if !self.classes[iface.index()].is_interface {
                    return Err(PtaError::malformed(format!(
                        "{} implements non-interface {}",
                        class.name, self.classes[iface.index()].name
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_var(&self, var: VarId, method: MethodId) -> Result<()> {
        match self.vars.get(var.index()) {
            Some(v) if v.method == method => Ok(()),
            Some(v) => Err(PtaError::malformed(format!(
                "variable {} ({}) of {} used in {}",
                var, v.name, v.method, method
            ))),
            None => Err(PtaError::malformed(format!("unknown variable {}", var))),
        }
    }

    fn check_bodies(&self) -> Result<()> {
        for method in &self.methods {
            let Some(body) = &method.body else { continue };
            for var in body.this.iter().chain(body.params.iter()) {
                self.check_var(*var, method.id)?;
            }
            for &sid in &body.stmts {
                let stmt = &self.stmts[sid.index()];
                for var in stmt.vars() {
                    self.check_var(var, method.id)?;
                }
                self.check_stmt(sid, stmt)?;
            }
        }
        Ok(())
    }

    fn check_stmt(&self, sid: StmtId, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::New { ty, .. } => self.check_class(ty.base_class(), "allocation"),
            Stmt::LoadField { field, .. } | Stmt::StoreField { field, .. } => {
                self.check_class(field.class, &format!("field ref {}", field.name))
            }
            Stmt::Invoke(invoke) => {
                self.check_class(invoke.method_ref.class, &format!("call site {}", sid))?;
                if invoke.kind.has_receiver() != invoke.receiver.is_some() {
                    return Err(PtaError::malformed(format!(
                        "call site {}: {} call {} a receiver",
                        sid,
                        invoke.kind,
                        if invoke.receiver.is_some() { "must not have" } else { "requires" }
                    )));
                }
                Ok(())
            }
            Stmt::Copy { .. }
            | Stmt::LoadArray { .. }
            | Stmt::StoreArray { .. }
            | Stmt::Return { .. }
            | Stmt::Nop => Ok(()),
        }
    }

    fn collect_return_vars(&mut self) {
        let stmts = &self.stmts;
        for method in &mut self.methods {
            let Some(body) = method.body.as_mut() else { continue };
            for &sid in &body.stmts {
                if let Stmt::Return { value: Some(v) } = &stmts[sid.index()] {
                    if !body.return_vars.contains(v) {
                        body.return_vars.push(*v);
                    }
                }
            }
        }
    }

    fn index_var_uses(&self) -> Vec<VarUses> {
        let mut uses = vec![VarUses::default(); self.vars.len()];
        for (index, stmt) in self.stmts.iter().enumerate() {
            let sid = StmtId::new(index);
            match stmt {
                Stmt::StoreField { base: Some(b), .. } => uses[b.index()].store_fields.push(sid),
                Stmt::LoadField { base: Some(b), .. } => uses[b.index()].load_fields.push(sid),
                Stmt::StoreArray { base, .. } => uses[base.index()].store_arrays.push(sid),
                Stmt::LoadArray { base, .. } => uses[base.index()].load_arrays.push(sid),
                Stmt::Invoke(Invoke { receiver: Some(r), .. }) => uses[r.index()].invokes.push(sid),
                Stmt::StoreField { base: None, .. }
                | Stmt::LoadField { base: None, .. }
                | Stmt::Invoke(_)
                | Stmt::New { .. }
                | Stmt::Copy { .. }
                | Stmt::Return { .. }
                | Stmt::Nop => {}
            }
        }
        uses
    }
}
