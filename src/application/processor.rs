//! Content processor
//!
//! The lock-holding front of the resolver. Every entry point takes the one
//! orchestrator lock, so scans of different content roots never interleave
//! and the registries only ever see a single writer.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::entities::{CompiledPack, ModuleKind, Resource};
use crate::domain::ports::{LoadedModule, ModuleLoader};
use crate::domain::services::{Phase, ResolutionReport, Resolver};
use crate::domain::value_objects::{GenericIdentifier, Identifier};

/// Where a content root comes from. Roots are processed in this order, which
/// decides first-write-wins outcomes across roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RootOrigin {
    BuiltIn,
    User,
    Cache,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentRoot {
    pub origin: RootOrigin,
    pub path: PathBuf,
}

impl ContentRoot {
    pub fn new(origin: RootOrigin, path: impl Into<PathBuf>) -> Self {
        Self {
            origin,
            path: path.into(),
        }
    }
}

pub struct ContentProcessor<L>
where
    L: ModuleLoader,
{
    loader: L,
    resolver: Mutex<Resolver>,
}

impl<L> ContentProcessor<L>
where
    L: ModuleLoader,
{
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            resolver: Mutex::new(Resolver::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Resolver> {
        self.resolver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register every module under `root/resources` and `root/packs`.
    ///
    /// Unreadable or invalid modules are recorded and skipped.
    pub fn scan(&self, root: &Path) -> ResolutionReport {
        let mut resolver = self.lock();
        self.scan_locked(&mut resolver, root)
    }

    pub fn validate(&self) -> ResolutionReport {
        self.lock().validate()
    }

    pub fn compile(&self) -> ResolutionReport {
        self.lock().compile()
    }

    /// Scan one root and compile everything it contributed.
    pub fn process(&self, root: &Path) -> ResolutionReport {
        let mut resolver = self.lock();
        let mut report = self.scan_locked(&mut resolver, root);
        report.merge(resolver.compile());
        report
    }

    /// Process roots in origin order (built-in, user, cache). Missing roots
    /// are skipped.
    pub fn process_all(&self, roots: &[ContentRoot]) -> ResolutionReport {
        let mut ordered: Vec<&ContentRoot> = roots.iter().collect();
        ordered.sort_by_key(|root| root.origin);

        let mut report = ResolutionReport::new();
        for root in ordered {
            if !root.path.is_dir() {
                warn!(origin = ?root.origin, path = %root.path.display(), "content root not found, skipping");
                continue;
            }
            info!(origin = ?root.origin, path = %root.path.display(), "processing content root");
            report.merge(self.process(&root.path));
        }
        report
    }

    fn scan_locked(&self, resolver: &mut Resolver, root: &Path) -> ResolutionReport {
        let mut report = ResolutionReport::new();
        for kind in [ModuleKind::Resource, ModuleKind::Pack] {
            let dir = root.join(kind.directory());
            if !dir.is_dir() {
                debug!(path = %dir.display(), "no module directory");
                continue;
            }
            let module_dirs = match list_module_dirs(&dir) {
                Ok(dirs) => dirs,
                Err(e) => {
                    report.record_message(Phase::Scan, dir.display(), "load_error", e);
                    continue;
                }
            };
            for module_dir in module_dirs {
                self.register_dir(resolver, &module_dir, kind, &mut report);
            }
        }
        report
    }

    fn register_dir(
        &self,
        resolver: &mut Resolver,
        dir: &Path,
        kind: ModuleKind,
        report: &mut ResolutionReport,
    ) {
        let LoadedModule { module, dropped } = match self.loader.load(dir, kind) {
            Ok(loaded) => loaded,
            Err(e) => {
                report.record_message(Phase::Scan, dir.display(), "load_error", e);
                return;
            }
        };
        let identifier = module.identifier().clone();
        match resolver.register(module) {
            Ok(()) => {
                debug!(module = %identifier, ?kind, "registered");
                for error in dropped {
                    report.record(Phase::Scan, &identifier, error);
                }
                report.registered.push(identifier);
            }
            Err(error) => report.record(Phase::Scan, &identifier, error),
        }
    }

    pub fn pack(&self, identifier: &Identifier) -> Option<Arc<CompiledPack>> {
        self.lock().content().pack(identifier).cloned()
    }

    pub fn packs(&self, generic: &GenericIdentifier) -> Vec<Arc<CompiledPack>> {
        self.lock().content().packs(generic).cloned().collect()
    }

    pub fn all_packs(&self) -> Vec<Arc<CompiledPack>> {
        self.lock().content().all_packs().cloned().collect()
    }

    pub fn resource(&self, identifier: &Identifier) -> Option<Arc<Resource>> {
        self.lock().content().resource(identifier).cloned()
    }

    pub fn resources(&self, generic: &GenericIdentifier) -> Vec<Arc<Resource>> {
        self.lock().content().resources(generic).cloned().collect()
    }

    pub fn all_resources(&self) -> Vec<Arc<Resource>> {
        self.lock().content().all_resources().cloned().collect()
    }

    /// Every registered exact identifier of one generic identity.
    pub fn registered(&self, generic: &GenericIdentifier) -> Vec<Identifier> {
        self.lock().modules().packs_of(generic).cloned().collect()
    }

    /// Run `f` against a consistent view of the resolver.
    pub fn inspect<R>(&self, f: impl FnOnce(&Resolver) -> R) -> R {
        f(&self.lock())
    }
}

/// Immediate subdirectories, sorted by name for a deterministic scan order.
fn list_module_dirs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
