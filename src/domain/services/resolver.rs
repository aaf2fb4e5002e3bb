//! Resolver
//!
//! The scan → validate → compile state machine over an explicit context that
//! owns every registry. Phases are idempotent and can be re-entered after
//! more modules are registered.
//!
//! Validation and compilation walk the dependency graph with explicit stacks.
//! A module leaves `pending` before its constraints are examined, so a
//! dependency cycle ends in a failed match instead of endless descent; the
//! stack of modules under resolution turns that failure into a
//! `CircularDependency` diagnostic.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{
    CompiledPack, DependencyConstraint, ModuleKind, RawModule, Resource,
};
use crate::domain::services::asset_validator::validate_assets;
use crate::domain::services::report::{Phase, ResolutionReport};
use crate::domain::services::{ContentRegistry, ModuleRegistry};
use crate::domain::value_objects::Identifier;
use crate::domain::ResolveError;

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    modules: ModuleRegistry,
    content: ContentRegistry,
}

struct Frame {
    module: Identifier,
    constraints: Vec<DependencyConstraint>,
    next: usize,
    /// Untried pending candidates for `constraints[next]`, popped from the back.
    candidates: Option<Vec<Identifier>>,
    matched: bool,
}

enum Step {
    Descend(Identifier),
    Finish(Result<(), ResolveError>),
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn content(&self) -> &ContentRegistry {
        &self.content
    }

    /// Register one raw record.
    ///
    /// Declaration checks run first. Resources are published immediately since
    /// they have nothing to resolve; packs are queued for validation.
    pub fn register(&mut self, module: RawModule) -> Result<(), ResolveError> {
        module.check_declarations()?;
        match module.kind() {
            ModuleKind::Pack => self.modules.register(module),
            ModuleKind::Resource => {
                let resource = Resource::try_from(&module)?;
                self.modules.register(module)?;
                self.content.insert_resource(resource);
                Ok(())
            }
        }
    }

    /// Validate every pending pack.
    pub fn validate(&mut self) -> ResolutionReport {
        let mut report = ResolutionReport::new();
        while let Some(root) = self.modules.take_next_pending() {
            self.validate_from(root, &mut report);
        }
        report
    }

    /// Compile every validated pack, validating leftovers first.
    pub fn compile(&mut self) -> ResolutionReport {
        let mut report = if self.modules.pending().is_empty() {
            ResolutionReport::new()
        } else {
            self.validate()
        };
        while let Some(root) = self.modules.first_validated().cloned() {
            self.compile_from(root, &mut report);
        }
        report
    }

    fn open_frame(&self, module: Identifier) -> Frame {
        debug!(module = %module, "validating");
        let constraints = self
            .modules
            .pack_of(&module)
            .map(|raw| raw.asset_dependencies().to_vec())
            .unwrap_or_default();
        Frame {
            module,
            constraints,
            next: 0,
            candidates: None,
            matched: false,
        }
    }

    fn validate_from(&mut self, root: Identifier, report: &mut ResolutionReport) {
        let mut stack = vec![self.open_frame(root)];
        let mut child: Option<bool> = None;

        loop {
            let step = match stack.split_last_mut() {
                None => break,
                Some((frame, parents)) => {
                    if child.take() == Some(true) {
                        frame.matched = true;
                    }
                    self.step(frame, parents)
                }
            };

            match step {
                Step::Descend(candidate) => {
                    self.modules.remove_pending(&candidate);
                    stack.push(self.open_frame(candidate));
                }
                Step::Finish(outcome) => {
                    let Some(frame) = stack.pop() else { break };
                    match outcome {
                        Ok(()) => {
                            debug!(module = %frame.module, "validated");
                            self.modules.mark_validated(frame.module.clone());
                            report.validated.push(frame.module);
                            child = Some(true);
                        }
                        Err(error) => {
                            report.record(Phase::Validate, &frame.module, error);
                            child = Some(false);
                        }
                    }
                }
            }
        }
    }

    fn step(&self, frame: &mut Frame, parents: &[Frame]) -> Step {
        loop {
            let Some(constraint) = frame.constraints.get(frame.next) else {
                return Step::Finish(self.finish_validation(&frame.module));
            };

            if frame.candidates.is_none() {
                if self.content.has_pack_overlapping(constraint)
                    || !self.modules.validated_overlapping(constraint).is_empty()
                {
                    frame.next += 1;
                    continue;
                }
                frame.matched = false;
                let mut candidates = self.modules.pending_overlapping(constraint);
                candidates.reverse();
                frame.candidates = Some(candidates);
            }

            let next_candidate = frame.candidates.as_mut().and_then(Vec::pop);
            if let Some(candidate) = next_candidate {
                if self.modules.is_pending(&candidate) {
                    return Step::Descend(candidate);
                }
                if self.modules.is_validated(&candidate) {
                    frame.matched = true;
                }
                continue;
            }

            if !frame.matched {
                return Step::Finish(Err(self.unmatched(frame, parents, constraint)));
            }
            frame.candidates = None;
            frame.next += 1;
        }
    }

    /// Failure for a constraint nothing satisfied. When a module further up
    /// the chain would have matched, the failure is a cycle.
    fn unmatched(
        &self,
        frame: &Frame,
        parents: &[Frame],
        constraint: &DependencyConstraint,
    ) -> ResolveError {
        let chain: Vec<&Identifier> = parents
            .iter()
            .map(|parent| &parent.module)
            .chain(std::iter::once(&frame.module))
            .collect();

        if let Some(start) = chain.iter().position(|id| constraint.overlaps(id)) {
            let mut cycle: Vec<Identifier> = chain[start..].iter().map(|id| (*id).clone()).collect();
            cycle.push(chain[start].clone());
            return ResolveError::CircularDependency {
                module: frame.module.clone(),
                dependency: constraint.clone(),
                chain: cycle,
            };
        }

        ResolveError::UnresolvedDependency {
            module: frame.module.clone(),
            dependency: constraint.clone(),
            near_misses: self.modules.near_misses(ModuleKind::Pack, constraint),
        }
    }

    /// Resource constraints and the version hierarchy, once every asset
    /// constraint has a match.
    fn finish_validation(&self, module: &Identifier) -> Result<(), ResolveError> {
        let Some(raw) = self.modules.pack_of(module) else {
            return Ok(());
        };

        for constraint in raw.resource_dependencies() {
            if self
                .modules
                .overlapping(ModuleKind::Resource, constraint)
                .is_empty()
            {
                return Err(ResolveError::UnresolvedDependency {
                    module: module.clone(),
                    dependency: constraint.clone(),
                    near_misses: self.modules.near_misses(ModuleKind::Resource, constraint),
                });
            }
        }

        self.check_version_hierarchy(raw)
    }

    /// No registered module reachable through ASSET constraints may require a
    /// strictly older build of `raw`.
    fn check_version_hierarchy(&self, raw: &RawModule) -> Result<(), ResolveError> {
        let identifier = raw.identifier();
        let mut visited: BTreeSet<Identifier> = BTreeSet::new();

        for dependency in raw.asset_dependencies() {
            let mut stack = self.modules.overlapping(ModuleKind::Pack, dependency);
            visited.extend(stack.iter().cloned());

            while let Some(current) = stack.pop() {
                let Some(reached) = self.modules.pack_of(&current) else {
                    continue;
                };
                for subdependency in reached.asset_dependencies() {
                    if subdependency.compatible(identifier)
                        && subdependency.is_below(identifier.version())
                    {
                        return Err(ResolveError::VersionHierarchy {
                            module: identifier.clone(),
                            dependency: dependency.clone(),
                            subdependency: subdependency.clone(),
                        });
                    }
                    for next in self.modules.overlapping(ModuleKind::Pack, subdependency) {
                        if visited.insert(next.clone()) {
                            stack.push(next);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Post-order walk: validated dependencies are compiled before `root`.
    fn compile_from(&mut self, root: Identifier, report: &mut ResolutionReport) {
        let mut stack = vec![(root, false)];
        let mut on_path: BTreeSet<Identifier> = BTreeSet::new();

        while let Some((module, expanded)) = stack.pop() {
            if !self.modules.is_validated(&module) {
                continue;
            }
            if expanded {
                on_path.remove(&module);
                self.compile_one(module, report);
                continue;
            }

            on_path.insert(module.clone());
            stack.push((module.clone(), true));

            let Some(raw) = self.modules.pack_of(&module) else {
                continue;
            };
            let mut dependencies = Vec::new();
            for constraint in raw.asset_dependencies() {
                for candidate in self.modules.validated_overlapping(constraint) {
                    if on_path.contains(&candidate) {
                        debug!(module = %module, dependency = %candidate, "skipping dependency already being compiled");
                        continue;
                    }
                    dependencies.push((candidate, false));
                }
            }
            dependencies.reverse();
            stack.extend(dependencies);
        }
    }

    fn compile_one(&mut self, identifier: Identifier, report: &mut ResolutionReport) {
        self.modules.remove_validated(&identifier);
        let Some(raw) = self.modules.pack_of(&identifier) else {
            return;
        };

        let mut asset_dependencies = BTreeSet::new();
        for constraint in raw.asset_dependencies() {
            asset_dependencies.extend(self.content.packs_overlapping(constraint));
        }
        let mut resources = BTreeSet::new();
        for constraint in raw.resource_dependencies() {
            resources.extend(self.content.resources_overlapping(constraint));
        }

        let dependency_packs: Vec<Arc<CompiledPack>> = asset_dependencies
            .iter()
            .filter_map(|dependency| self.content.pack(dependency).cloned())
            .collect();
        let validation = validate_assets(raw, &dependency_packs);

        let pack = CompiledPack::new(
            identifier.clone(),
            raw.root().cloned(),
            asset_dependencies,
            resources,
            validation.assets,
            validation.missing,
        );
        for error in validation.errors {
            report.record(Phase::Compile, &identifier, error);
        }

        if self.content.insert_pack(pack) {
            info!(pack = %identifier, "compiled");
            report.compiled.push(identifier);
        } else {
            debug!(pack = %identifier, "already published, keeping the first");
        }
    }
}
