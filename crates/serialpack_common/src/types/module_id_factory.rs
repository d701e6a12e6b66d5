use std::{
  path::{Path, PathBuf},
  sync::atomic::{AtomicU32, Ordering},
};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::{ModuleId, ModulePath};

/// Assigns runtime ids to modules. Created once per build and shared by every chunk, so a
/// module path maps to the same id wherever it is emitted.
pub trait ModuleIdFactory: Send + Sync {
  fn module_id(&self, path: &ModulePath) -> ModuleId;

  /// Called with every path the build may ask about before any lookup runs in parallel.
  /// Factories whose ids depend on request order must assign them here.
  fn seed(&self, _paths: &[ModulePath], _project_root: &Path) {}
}

impl<F> ModuleIdFactory for F
where
  F: Fn(&ModulePath) -> ModuleId + Send + Sync,
{
  fn module_id(&self, path: &ModulePath) -> ModuleId {
    self(path)
  }
}

/// Numeric ids handed out in first-request order.
///
/// [SequentialModuleIds::seed] assigns ids in a reproducible order up front so that parallel
/// lookups afterwards never race for a fresh id.
#[derive(Debug, Default)]
pub struct SequentialModuleIds {
  ids: DashMap<ModulePath, u32, FxBuildHasher>,
  next_id: AtomicU32,
}

impl SequentialModuleIds {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.ids.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }
}

impl ModuleIdFactory for SequentialModuleIds {
  fn module_id(&self, path: &ModulePath) -> ModuleId {
    if let Some(id) = self.ids.get(path) {
      return ModuleId::Numeric(*id);
    }
    let id = *self
      .ids
      .entry(path.clone())
      .or_insert_with(|| self.next_id.fetch_add(1, Ordering::Relaxed));
    ModuleId::Numeric(id)
  }

  /// Assign ids to `paths` sorted by their stabilized form. Paths that already have an id
  /// keep it.
  fn seed(&self, paths: &[ModulePath], project_root: &Path) {
    let mut paths = paths.iter().map(|path| (path.stabilize(project_root), path)).collect::<Vec<_>>();
    paths.sort_unstable();
    for (_, path) in paths {
      self.module_id(path);
    }
  }
}

/// Uses the stabilized path as the id. Readable, at the cost of bundle size.
#[derive(Debug, Clone)]
pub struct PathModuleIds {
  project_root: PathBuf,
}

impl PathModuleIds {
  pub fn new(project_root: impl Into<PathBuf>) -> Self {
    Self { project_root: project_root.into() }
  }
}

impl ModuleIdFactory for PathModuleIds {
  fn module_id(&self, path: &ModulePath) -> ModuleId {
    ModuleId::Named(path.stabilize(&self.project_root).into())
  }
}
