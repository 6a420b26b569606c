//! Allocation-site heap abstraction

use crate::errors::{PtaError, Result};
use crate::features::points_to::domain::{Obj, ObjId};
use crate::features::points_to::ports::HeapModel;
use crate::features::program::domain::{Program, Stmt, StmtId};
use rustc_hash::FxHashMap;

/// One abstract object per `New` statement
#[derive(Debug, Default)]
pub struct AllocationSiteHeapModel {
    objects: Vec<Obj>,
    by_site: FxHashMap<StmtId, ObjId>,
}

impl AllocationSiteHeapModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HeapModel for AllocationSiteHeapModel {
    fn obj_for(&mut self, program: &Program, site: StmtId) -> Result<ObjId> {
        if let Some(&id) = self.by_site.get(&site) {
            return Ok(id);
        }
        let Stmt::New { ty, .. } = program.stmt(site) else {
            return Err(PtaError::malformed(format!("{} is not an allocation site", site)));
        };

        let container = program.stmt_method(site);
        let id = ObjId::new(self.objects.len());
        self.objects.push(Obj {
            id,
            site,
            ty: ty.clone(),
            container,
            container_class: program.method(container).class,
        });
        self.by_site.insert(site, id);
        Ok(id)
    }

    fn obj(&self, id: ObjId) -> &Obj {
        &self.objects[id.index()]
    }

    fn objects(&self) -> &[Obj] {
        &self.objects
    }
}
