//! Class hierarchy oracle
//!
//! Direct-subtype indexes plus method dispatch and field resolution. All
//! walks are iterative with a visited set; hierarchies are acyclic by
//! construction but a malformed one must not hang the analysis.

use crate::errors::{PtaError, Result};
use crate::features::program::domain::{
    ClassId, FieldId, FieldRef, MethodId, MethodRef, Program, Subsignature, Type,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Read-only view of the program's type hierarchy
#[derive(Debug)]
pub struct ClassHierarchy<'p> {
    program: &'p Program,
    direct_subclasses: Vec<Vec<ClassId>>,
    direct_subinterfaces: Vec<Vec<ClassId>>,
    direct_implementors: Vec<Vec<ClassId>>,
}

impl<'p> ClassHierarchy<'p> {
    pub fn new(program: &'p Program) -> Self {
        let n = program.num_classes();
        let mut direct_subclasses = vec![Vec::new(); n];
        let mut direct_subinterfaces = vec![Vec::new(); n];
        let mut direct_implementors = vec![Vec::new(); n];

        for class in program.classes() {
            if let Some(sup) = class.superclass {
                direct_subclasses[sup.index()].push(class.id);
            }
            for &iface in &class.interfaces {
                if class.is_interface {
                    direct_subinterfaces[iface.index()].push(class.id);
                } else {
                    direct_implementors[iface.index()].push(class.id);
                }
            }
        }

        Self {
            program,
            direct_subclasses,
            direct_subinterfaces,
            direct_implementors,
        }
    }

    #[inline]
    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn direct_subclasses_of(&self, class: ClassId) -> &[ClassId] {
        &self.direct_subclasses[class.index()]
    }

    pub fn direct_subinterfaces_of(&self, interface: ClassId) -> &[ClassId] {
        &self.direct_subinterfaces[interface.index()]
    }

    pub fn direct_implementors_of(&self, interface: ClassId) -> &[ClassId] {
        &self.direct_implementors[interface.index()]
    }

    #[inline]
    pub fn superclass(&self, class: ClassId) -> Option<ClassId> {
        self.program.class(class).superclass
    }

    /// Superclass chain starting at `class` itself
    fn superclass_chain(&self, class: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(class);
        while let Some(c) = current {
            if !seen.insert(c) {
                break;
            }
            chain.push(c);
            current = self.superclass(c);
        }
        chain
    }

    /// Whether `sub` is `sup` or transitively extends/implements it
    pub fn is_subtype(&self, sub: ClassId, sup: ClassId) -> bool {
        let mut queue = VecDeque::from([sub]);
        let mut visited = FxHashSet::default();
        while let Some(c) = queue.pop_front() {
            if c == sup {
                return true;
            }
            if !visited.insert(c) {
                continue;
            }
            let class = self.program.class(c);
            queue.extend(class.superclass);
            queue.extend(class.interfaces.iter().copied());
        }
        false
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Dispatch
    // ═══════════════════════════════════════════════════════════════════════

    /// Method selected for `subsignature` on an instance of `class`
    ///
    /// Ascends the superclass chain first, then searches the interfaces of
    /// that chain breadth-first. Abstract declarations are skipped; the first
    /// one seen is returned only when no concrete declaration exists.
    pub fn dispatch(&self, class: ClassId, subsignature: &Subsignature) -> Option<MethodId> {
        let chain = self.superclass_chain(class);
        let mut abstract_decl = None;

        for &c in &chain {
            if let Some(m) = self.concrete_or_note(c, subsignature, &mut abstract_decl) {
                return Some(m);
            }
        }

        let mut queue: VecDeque<ClassId> = chain
            .iter()
            .flat_map(|&c| self.program.class(c).interfaces.iter().copied())
            .collect();
        let mut visited: FxHashSet<ClassId> = chain.into_iter().collect();
        while let Some(iface) = queue.pop_front() {
            if !visited.insert(iface) {
                continue;
            }
            if let Some(m) = self.concrete_or_note(iface, subsignature, &mut abstract_decl) {
                return Some(m);
            }
            queue.extend(self.program.class(iface).interfaces.iter().copied());
        }
        abstract_decl
    }

    /// Concrete method `class` declares for `subsignature`; an abstract
    /// declaration is recorded in `abstract_decl` if none was seen yet
    fn concrete_or_note(
        &self,
        class: ClassId,
        subsignature: &Subsignature,
        abstract_decl: &mut Option<MethodId>,
    ) -> Option<MethodId> {
        let m = self.program.class(class).declared_method(subsignature)?;
        if self.program.method(m).is_abstract {
            abstract_decl.get_or_insert(m);
            return None;
        }
        Some(m)
    }

    /// Concrete method for `subsignature` on the superclass chain of `class`
    ///
    /// Same answer as `dispatch` whenever that answer is a concrete class
    /// method. `memo` caches per class and must only be reused for the same
    /// subsignature; with it, resolving every class of a chain is linear.
    pub fn concrete_in_chain(
        &self,
        class: ClassId,
        subsignature: &Subsignature,
        memo: &mut FxHashMap<ClassId, Option<MethodId>>,
    ) -> Option<MethodId> {
        let mut pending = Vec::new();
        let mut current = Some(class);
        let mut found = None;
        while let Some(c) = current {
            if let Some(&cached) = memo.get(&c) {
                found = cached;
                break;
            }
            // Cyclic hierarchy
            if pending.len() > self.program.num_classes() {
                break;
            }
            pending.push(c);
            let declared = self.program.class(c).declared_method(subsignature);
            if let Some(m) = declared.filter(|&m| !self.program.method(m).is_abstract) {
                found = Some(m);
                break;
            }
            current = self.superclass(c);
        }
        for c in pending {
            memo.insert(c, found);
        }
        found
    }

    /// Dispatch on the runtime type of an object; arrays use the root class
    pub fn dispatch_on_type(&self, ty: &Type, subsignature: &Subsignature) -> Option<MethodId> {
        match ty {
            Type::Class(c) => self.dispatch(*c, subsignature),
            Type::Array(_) => self
                .program
                .root_class()
                .and_then(|root| self.dispatch(root, subsignature)),
        }
    }

    /// Resolve a symbolic method reference from its declared class
    #[inline]
    pub fn resolve_method(&self, method_ref: &MethodRef) -> Option<MethodId> {
        self.dispatch(method_ref.class, &method_ref.subsignature)
    }

    /// Resolve a symbolic field reference; fails when nothing declares it
    pub fn resolve_field(&self, field_ref: &FieldRef) -> Result<FieldId> {
        let mut queue = VecDeque::from(self.superclass_chain(field_ref.class));
        let mut visited = FxHashSet::default();
        while let Some(c) = queue.pop_front() {
            if !visited.insert(c) {
                continue;
            }
            let class = self.program.class(c);
            if let Some(f) = class.declared_field(&field_ref.name) {
                return Ok(f);
            }
            queue.extend(class.interfaces.iter().copied());
        }
        Err(PtaError::UnresolvedField {
            class: self.program.class(field_ref.class).name.clone(),
            field: field_ref.name.clone(),
        })
    }

    /// `class` and every transitive subclass, subinterface and implementor,
    /// breadth-first
    pub fn all_subtypes(&self, class: ClassId) -> Vec<ClassId> {
        let mut result = Vec::new();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([class]);
        while let Some(c) = queue.pop_front() {
            if !visited.insert(c) {
                continue;
            }
            result.push(c);
            queue.extend(self.direct_subclasses_of(c).iter().copied());
            queue.extend(self.direct_subinterfaces_of(c).iter().copied());
            queue.extend(self.direct_implementors_of(c).iter().copied());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::program::infrastructure::builder::{MethodKind, ProgramBuilder};

    struct Fixture {
        program: Program,
        a: ClassId,
        b: ClassId,
        c: ClassId,
        i: ClassId,
        a_m: MethodId,
        b_m: MethodId,
        i_n: MethodId,
    }

    /// A <- B <- C, B implements I; I declares default `n`
    fn fixture() -> Fixture {
        let mut b = ProgramBuilder::new();
        let object = b.add_class("Object", None);
        let i = b.add_interface("I", &[]);
        let a = b.add_class("A", Some(object));
        let bc = b.add_class("B", Some(a));
        let c = b.add_class("C", Some(bc));
        b.implement(bc, i);
        b.add_field(a, "f", false);

        let a_m = b.add_method(a, "void m()", MethodKind::Instance);
        let b_m = b.add_method(bc, "void m()", MethodKind::Instance);
        let i_n = b.add_method(i, "void n()", MethodKind::Instance);
        let main = b.add_method(a, "void main()", MethodKind::Static);
        b.set_entry(main);
        b.set_root_class(object);

        Fixture {
            program: b.build().unwrap(),
            a,
            b: bc,
            c,
            i,
            a_m,
            b_m,
            i_n,
        }
    }

    #[test]
    fn test_dispatch_picks_most_derived_override() {
        let f = fixture();
        let ch = ClassHierarchy::new(&f.program);
        let m = Subsignature::new("void m()");
        assert_eq!(ch.dispatch(f.a, &m), Some(f.a_m));
        assert_eq!(ch.dispatch(f.b, &m), Some(f.b_m));
        assert_eq!(ch.dispatch(f.c, &m), Some(f.b_m));
    }

    #[test]
    fn test_dispatch_reaches_interface_default() {
        let f = fixture();
        let ch = ClassHierarchy::new(&f.program);
        assert_eq!(ch.dispatch(f.c, &Subsignature::new("void n()")), Some(f.i_n));
        assert_eq!(ch.dispatch(f.a, &Subsignature::new("void n()")), None);
    }

    #[test]
    fn test_dispatch_keeps_looking_past_abstract_declarations() {
        let mut b = ProgramBuilder::new();
        let object = b.add_class("Object", None);
        let i = b.add_interface("I", &[]);
        let j = b.add_interface("J", &[i]);
        let i_m = b.add_method(i, "void m()", MethodKind::Abstract);
        let j_m = b.add_method(j, "void m()", MethodKind::Instance);
        let both = b.add_class("Both", Some(object));
        b.implement(both, i);
        b.implement(both, j);
        let only_i = b.add_class("OnlyI", Some(object));
        b.implement(only_i, i);
        let main = b.add_method(object, "void main()", MethodKind::Static);
        b.set_entry(main);
        let program = b.build().unwrap();

        let ch = ClassHierarchy::new(&program);
        let m = Subsignature::new("void m()");
        assert_eq!(ch.dispatch(both, &m), Some(j_m));
        assert_eq!(ch.dispatch(only_i, &m), Some(i_m));
    }

    #[test]
    fn test_concrete_in_chain_agrees_with_dispatch() {
        let f = fixture();
        let ch = ClassHierarchy::new(&f.program);
        let m = Subsignature::new("void m()");
        let mut memo = FxHashMap::default();

        assert_eq!(ch.concrete_in_chain(f.c, &m, &mut memo), Some(f.b_m));
        assert_eq!(memo.get(&f.c), Some(&Some(f.b_m)));
        assert_eq!(memo.get(&f.b), Some(&Some(f.b_m)));
        assert!(!memo.contains_key(&f.a));

        for class in [f.a, f.b, f.c] {
            assert_eq!(ch.concrete_in_chain(class, &m, &mut memo), ch.dispatch(class, &m));
        }
        // Interface defaults are outside the superclass chain
        let n = Subsignature::new("void n()");
        assert_eq!(ch.concrete_in_chain(f.c, &n, &mut FxHashMap::default()), None);
    }

    #[test]
    fn test_dispatch_on_array_uses_root() {
        let f = fixture();
        let ch = ClassHierarchy::new(&f.program);
        let ty = Type::array_of(Type::Class(f.c));
        assert_eq!(ch.dispatch_on_type(&ty, &Subsignature::new("void m()")), None);
    }

    #[test]
    fn test_resolve_field_ascends() {
        let f = fixture();
        let ch = ClassHierarchy::new(&f.program);
        let field = ch.resolve_field(&FieldRef::new(f.c, "f")).unwrap();
        assert_eq!(f.program.field(field).class, f.a);

        let err = ch.resolve_field(&FieldRef::new(f.c, "missing")).unwrap_err();
        assert!(matches!(err, PtaError::UnresolvedField { .. }));
    }

    #[test]
    fn test_subtypes_breadth_first() {
        let f = fixture();
        let ch = ClassHierarchy::new(&f.program);
        assert_eq!(ch.all_subtypes(f.a), vec![f.a, f.b, f.c]);
        assert_eq!(ch.all_subtypes(f.i), vec![f.i, f.b, f.c]);
        assert!(ch.is_subtype(f.c, f.i));
        assert!(!ch.is_subtype(f.a, f.i));
    }
}
