//! Shared program fixtures for integration tests

#![allow(dead_code)]

use codegraph_pta::prelude::*;

/// `Main.main()` plus an `A` class, ready for statements
pub struct Skeleton {
    pub b: ProgramBuilder,
    pub object: ClassId,
    pub main_class: ClassId,
    pub a: ClassId,
    pub main: MethodId,
}

pub fn skeleton() -> Skeleton {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    b.set_root_class(object);
    let main_class = b.add_class("Main", Some(object));
    let a = b.add_class("A", Some(object));
    let main = b.add_method(main_class, "void main()", MethodKind::Static);
    b.set_entry(main);
    Skeleton {
        b,
        object,
        main_class,
        a,
        main,
    }
}

pub fn analyze(program: &Program, sensitivity: ContextSensitivity) -> PointerAnalysisResult {
    let config = PtaConfig::default().sensitivity(sensitivity);
    PointerAnalyzer::new(config)
        .expect("valid config")
        .analyze(program)
        .expect("analysis succeeds")
}

pub fn analyze_ci(program: &Program) -> PointerAnalysisResult {
    analyze(program, ContextSensitivity::Insensitive)
}

/// Objects allocated at the given sites
pub fn objs(result: &PointerAnalysisResult, sites: &[StmtId]) -> std::collections::BTreeSet<ObjId> {
    sites
        .iter()
        .map(|&s| result.obj_at(s).expect("allocation site reached"))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Scenario A: copy propagation
// ═══════════════════════════════════════════════════════════════════════════

pub struct CopyScenario {
    pub program: Program,
    pub x: VarId,
    pub y: VarId,
    pub site: StmtId,
}

/// `x = new A(); y = x;`
pub fn copy_scenario() -> CopyScenario {
    let Skeleton { mut b, a, main, .. } = skeleton();
    let x = b.add_var(main, "x");
    let y = b.add_var(main, "y");
    let site = b.alloc(main, x, Type::Class(a));
    b.copy(main, y, x);
    CopyScenario {
        program: b.build().expect("valid program"),
        x,
        y,
        site,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scenario B: merge at a join
// ═══════════════════════════════════════════════════════════════════════════

pub struct JoinScenario {
    pub program: Program,
    pub x: VarId,
    pub site_a: StmtId,
    pub site_b: StmtId,
}

/// `if (c) x = new A(); else x = new B();`
pub fn join_scenario() -> JoinScenario {
    let Skeleton {
        mut b, object, a, main, ..
    } = skeleton();
    let bc = b.add_class("B", Some(object));
    let x = b.add_var(main, "x");
    b.nop(main); // if (c)
    let site_a = b.alloc(main, x, Type::Class(a));
    let site_b = b.alloc(main, x, Type::Class(bc));
    JoinScenario {
        program: b.build().expect("valid program"),
        x,
        site_a,
        site_b,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scenario C: field round trip
// ═══════════════════════════════════════════════════════════════════════════

pub struct FieldScenario {
    pub program: Program,
    pub a_var: VarId,
    pub b_var: VarId,
    pub x: VarId,
    pub y: VarId,
    pub f: FieldId,
    pub holder_site: StmtId,
}

/// `x = new A(); a = new T(); x.f = a; y = x; b = y.f;`
pub fn field_scenario() -> FieldScenario {
    let Skeleton {
        mut b, object, a, main, ..
    } = skeleton();
    let t = b.add_class("T", Some(object));
    let f = b.add_field(a, "f", false);
    let x = b.add_var(main, "x");
    let a_var = b.add_var(main, "a");
    let y = b.add_var(main, "y");
    let b_var = b.add_var(main, "b");
    let holder_site = b.alloc(main, x, Type::Class(a));
    b.alloc(main, a_var, Type::Class(t));
    b.store_field(main, x, FieldRef::new(a, "f"), a_var);
    b.copy(main, y, x);
    b.load_field(main, b_var, y, FieldRef::new(a, "f"));
    FieldScenario {
        program: b.build().expect("valid program"),
        a_var,
        b_var,
        x,
        y,
        f,
        holder_site,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scenario D: virtual dispatch
// ═══════════════════════════════════════════════════════════════════════════

pub struct DispatchScenario {
    pub program: Program,
    pub call_site: StmtId,
    pub a_m: MethodId,
    pub b_m: MethodId,
    pub c_m: MethodId,
    /// Override in a subclass that is never instantiated
    pub d_m: MethodId,
}

/// `B extends A`, both define `m`; `C` is unrelated with its own `m`;
/// `D extends A` overrides `m` but is never allocated.
/// `a = cond ? new A() : new B(); a.m(); c = new C();`
pub fn dispatch_scenario() -> DispatchScenario {
    let Skeleton {
        mut b, object, a, main, ..
    } = skeleton();
    let bc = b.add_class("B", Some(a));
    let c = b.add_class("C", Some(object));
    let d = b.add_class("D", Some(a));
    let a_m = b.add_method(a, "void m()", MethodKind::Instance);
    let b_m = b.add_method(bc, "void m()", MethodKind::Instance);
    let c_m = b.add_method(c, "void m()", MethodKind::Instance);
    let d_m = b.add_method(d, "void m()", MethodKind::Instance);

    let a_var = b.add_var(main, "a");
    let c_var = b.add_var(main, "c");
    b.alloc(main, a_var, Type::Class(a));
    b.alloc(main, a_var, Type::Class(bc));
    let call_site = b.invoke(
        main,
        Invoke::new(CallKind::Virtual, MethodRef::new(a, "void m()")).with_receiver(a_var),
    );
    b.alloc(main, c_var, Type::Class(c));

    DispatchScenario {
        program: b.build().expect("valid program"),
        call_site,
        a_m,
        b_m,
        c_m,
        d_m,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scenario E: static call parameter binding
// ═══════════════════════════════════════════════════════════════════════════

pub struct StaticCallScenario {
    pub program: Program,
    pub id: MethodId,
    pub p: VarId,
    pub arg: VarId,
    pub r: VarId,
    pub site: StmtId,
    pub call_site: StmtId,
}

/// `static A id(A p) { return p; }  arg = new A(); r = id(arg);`
pub fn static_call_scenario() -> StaticCallScenario {
    let Skeleton {
        mut b,
        main_class,
        a,
        main,
        ..
    } = skeleton();
    let id = b.add_method(main_class, "A id(A)", MethodKind::Static);
    let p = b.add_param(id, "p");
    b.ret(id, Some(p));

    let arg = b.add_var(main, "arg");
    let r = b.add_var(main, "r");
    let site = b.alloc(main, arg, Type::Class(a));
    let call_site = b.invoke(
        main,
        Invoke::new(CallKind::Static, MethodRef::new(main_class, "A id(A)"))
            .with_args([arg])
            .with_result(r),
    );

    StaticCallScenario {
        program: b.build().expect("valid program"),
        id,
        p,
        arg,
        r,
        site,
        call_site,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Context-sensitivity fixtures
// ═══════════════════════════════════════════════════════════════════════════

pub struct ContainerScenario {
    pub program: Program,
    pub x1: VarId,
    pub x2: VarId,
    pub o1: StmtId,
    pub o2: StmtId,
}

/// Two `Box` objects whose `set`/`get` go through `this.f`:
/// `b1.set(o1); b2.set(o2); x1 = b1.get(); x2 = b2.get();`
pub fn container_scenario() -> ContainerScenario {
    let Skeleton {
        mut b, object, a, main, ..
    } = skeleton();
    let boxc = b.add_class("Box", Some(object));
    b.add_field(boxc, "f", false);

    let set = b.add_method(boxc, "void set(Object)", MethodKind::Instance);
    let set_this = b.this_var(set).expect("instance method");
    let v = b.add_param(set, "v");
    b.store_field(set, set_this, FieldRef::new(boxc, "f"), v);

    let get = b.add_method(boxc, "Object get()", MethodKind::Instance);
    let get_this = b.this_var(get).expect("instance method");
    let r = b.add_var(get, "r");
    b.load_field(get, r, get_this, FieldRef::new(boxc, "f"));
    b.ret(get, Some(r));

    let b1 = b.add_var(main, "b1");
    let b2 = b.add_var(main, "b2");
    let v1 = b.add_var(main, "v1");
    let v2 = b.add_var(main, "v2");
    let x1 = b.add_var(main, "x1");
    let x2 = b.add_var(main, "x2");
    b.alloc(main, b1, Type::Class(boxc));
    b.alloc(main, b2, Type::Class(boxc));
    let o1 = b.alloc(main, v1, Type::Class(a));
    let o2 = b.alloc(main, v2, Type::Class(a));
    for (recv, arg) in [(b1, v1), (b2, v2)] {
        b.invoke(
            main,
            Invoke::new(CallKind::Virtual, MethodRef::new(boxc, "void set(Object)"))
                .with_receiver(recv)
                .with_args([arg]),
        );
    }
    for (recv, res) in [(b1, x1), (b2, x2)] {
        b.invoke(
            main,
            Invoke::new(CallKind::Virtual, MethodRef::new(boxc, "Object get()"))
                .with_receiver(recv)
                .with_result(res),
        );
    }

    ContainerScenario {
        program: b.build().expect("valid program"),
        x1,
        x2,
        o1,
        o2,
    }
}

/// Static identity called from two sites: `r1 = id(v1); r2 = id(v2);`
pub fn identity_scenario() -> ContainerScenario {
    let Skeleton {
        mut b,
        main_class,
        a,
        main,
        ..
    } = skeleton();
    let id = b.add_method(main_class, "Object id(Object)", MethodKind::Static);
    let p = b.add_param(id, "p");
    b.ret(id, Some(p));

    let v1 = b.add_var(main, "v1");
    let v2 = b.add_var(main, "v2");
    let x1 = b.add_var(main, "r1");
    let x2 = b.add_var(main, "r2");
    let o1 = b.alloc(main, v1, Type::Class(a));
    let o2 = b.alloc(main, v2, Type::Class(a));
    for (arg, res) in [(v1, x1), (v2, x2)] {
        b.invoke(
            main,
            Invoke::new(CallKind::Static, MethodRef::new(main_class, "Object id(Object)"))
                .with_args([arg])
                .with_result(res),
        );
    }

    ContainerScenario {
        program: b.build().expect("valid program"),
        x1,
        x2,
        o1,
        o2,
    }
}

/// `Box` objects that each allocate an inner `Cell` in `init()`; `set` and
/// `get` delegate to the cell. Only a 2-level heap context separates the
/// two cells.
pub fn nested_container_scenario() -> ContainerScenario {
    let Skeleton {
        mut b, object, a, main, ..
    } = skeleton();
    let cell = b.add_class("Cell", Some(object));
    let boxc = b.add_class("Box", Some(object));
    b.add_field(cell, "v", false);
    b.add_field(boxc, "cell", false);

    let put = b.add_method(cell, "void put(Object)", MethodKind::Instance);
    let put_this = b.this_var(put).expect("instance method");
    let x = b.add_param(put, "x");
    b.store_field(put, put_this, FieldRef::new(cell, "v"), x);

    let take = b.add_method(cell, "Object take()", MethodKind::Instance);
    let take_this = b.this_var(take).expect("instance method");
    let tr = b.add_var(take, "r");
    b.load_field(take, tr, take_this, FieldRef::new(cell, "v"));
    b.ret(take, Some(tr));

    let init = b.add_method(boxc, "void init()", MethodKind::Instance);
    let init_this = b.this_var(init).expect("instance method");
    let c = b.add_var(init, "c");
    b.alloc(init, c, Type::Class(cell));
    b.store_field(init, init_this, FieldRef::new(boxc, "cell"), c);

    let set = b.add_method(boxc, "void set(Object)", MethodKind::Instance);
    let set_this = b.this_var(set).expect("instance method");
    let sv = b.add_param(set, "v");
    let sc = b.add_var(set, "c");
    b.load_field(set, sc, set_this, FieldRef::new(boxc, "cell"));
    b.invoke(
        set,
        Invoke::new(CallKind::Virtual, MethodRef::new(cell, "void put(Object)"))
            .with_receiver(sc)
            .with_args([sv]),
    );

    let get = b.add_method(boxc, "Object get()", MethodKind::Instance);
    let get_this = b.this_var(get).expect("instance method");
    let gc = b.add_var(get, "c");
    let gr = b.add_var(get, "r");
    b.load_field(get, gc, get_this, FieldRef::new(boxc, "cell"));
    b.invoke(
        get,
        Invoke::new(CallKind::Virtual, MethodRef::new(cell, "Object take()"))
            .with_receiver(gc)
            .with_result(gr),
    );
    b.ret(get, Some(gr));

    let b1 = b.add_var(main, "b1");
    let b2 = b.add_var(main, "b2");
    let v1 = b.add_var(main, "v1");
    let v2 = b.add_var(main, "v2");
    let x1 = b.add_var(main, "x1");
    let x2 = b.add_var(main, "x2");
    b.alloc(main, b1, Type::Class(boxc));
    b.alloc(main, b2, Type::Class(boxc));
    for recv in [b1, b2] {
        b.invoke(
            main,
            Invoke::new(CallKind::Virtual, MethodRef::new(boxc, "void init()")).with_receiver(recv),
        );
    }
    let o1 = b.alloc(main, v1, Type::Class(a));
    let o2 = b.alloc(main, v2, Type::Class(a));
    for (recv, arg) in [(b1, v1), (b2, v2)] {
        b.invoke(
            main,
            Invoke::new(CallKind::Virtual, MethodRef::new(boxc, "void set(Object)"))
                .with_receiver(recv)
                .with_args([arg]),
        );
    }
    for (recv, res) in [(b1, x1), (b2, x2)] {
        b.invoke(
            main,
            Invoke::new(CallKind::Virtual, MethodRef::new(boxc, "Object get()"))
                .with_receiver(recv)
                .with_result(res),
        );
    }

    ContainerScenario {
        program: b.build().expect("valid program"),
        x1,
        x2,
        o1,
        o2,
    }
}

/// Like `container_scenario`, but each box is allocated by a different
/// factory class (`F1.make()`, `F2.make()`)
pub fn factory_container_scenario() -> ContainerScenario {
    let Skeleton {
        mut b, object, a, main, ..
    } = skeleton();
    let boxc = b.add_class("Box", Some(object));
    b.add_field(boxc, "f", false);

    let set = b.add_method(boxc, "void set(Object)", MethodKind::Instance);
    let set_this = b.this_var(set).expect("instance method");
    let v = b.add_param(set, "v");
    b.store_field(set, set_this, FieldRef::new(boxc, "f"), v);

    let get = b.add_method(boxc, "Object get()", MethodKind::Instance);
    let get_this = b.this_var(get).expect("instance method");
    let r = b.add_var(get, "r");
    b.load_field(get, r, get_this, FieldRef::new(boxc, "f"));
    b.ret(get, Some(r));

    let mut factories = Vec::new();
    for name in ["F1", "F2"] {
        let f = b.add_class(name, Some(object));
        let make = b.add_method(f, "Box make()", MethodKind::Static);
        let nb = b.add_var(make, "b");
        b.alloc(make, nb, Type::Class(boxc));
        b.ret(make, Some(nb));
        factories.push(f);
    }

    let b1 = b.add_var(main, "b1");
    let b2 = b.add_var(main, "b2");
    let v1 = b.add_var(main, "v1");
    let v2 = b.add_var(main, "v2");
    let x1 = b.add_var(main, "x1");
    let x2 = b.add_var(main, "x2");
    for (f, res) in factories.iter().zip([b1, b2]) {
        b.invoke(
            main,
            Invoke::new(CallKind::Static, MethodRef::new(*f, "Box make()")).with_result(res),
        );
    }
    let o1 = b.alloc(main, v1, Type::Class(a));
    let o2 = b.alloc(main, v2, Type::Class(a));
    for (recv, arg) in [(b1, v1), (b2, v2)] {
        b.invoke(
            main,
            Invoke::new(CallKind::Virtual, MethodRef::new(boxc, "void set(Object)"))
                .with_receiver(recv)
                .with_args([arg]),
        );
    }
    for (recv, res) in [(b1, x1), (b2, x2)] {
        b.invoke(
            main,
            Invoke::new(CallKind::Virtual, MethodRef::new(boxc, "Object get()"))
                .with_receiver(recv)
                .with_result(res),
        );
    }

    ContainerScenario {
        program: b.build().expect("valid program"),
        x1,
        x2,
        o1,
        o2,
    }
}
