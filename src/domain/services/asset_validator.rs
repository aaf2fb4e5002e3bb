//! Asset-level validation
//!
//! Runs while a pack is compiled. Every outgoing reference of every declared
//! asset must resolve, in order, to:
//!
//! 1. an asset of this pack that already passed validation
//! 2. an asset of this pack not yet visited (validated first, depth-first)
//! 3. an asset of one of the pack's resolved dependency packs (deferred and
//!    recorded as missing)
//!
//! Anything else drops that single declaration, never the pack. Traversal
//! uses an explicit stack, so reference chains cannot exhaust the thread stack.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::{
    AssetDeclaration, AssetMap, AssetReference, CompiledPack, MissingAssets, RawModule,
};
use crate::domain::value_objects::{AssetType, GenericIdentifier};
use crate::domain::ResolveError;

type AssetKey = (AssetType, GenericIdentifier);

/// Outcome of validating one pack's declarations.
#[derive(Debug, Default)]
pub struct AssetValidation {
    pub assets: AssetMap,
    pub missing: MissingAssets,
    pub errors: Vec<ResolveError>,
}

struct Frame<'m> {
    declaration: &'m AssetDeclaration,
    next: usize,
}

enum Step<'m> {
    Descend(&'m AssetDeclaration),
    Finish(Result<(), ResolveError>),
}

pub struct AssetValidator<'m> {
    module: &'m RawModule,
    dependencies: &'m [Arc<CompiledPack>],
    unvalidated: BTreeSet<AssetKey>,
    result: AssetValidation,
}

impl<'m> AssetValidator<'m> {
    pub fn new(module: &'m RawModule, dependencies: &'m [Arc<CompiledPack>]) -> Self {
        let unvalidated = module
            .assets()
            .iter()
            .flat_map(|(asset_type, by_id)| by_id.keys().map(|id| (*asset_type, id.clone())))
            .collect();
        Self {
            module,
            dependencies,
            unvalidated,
            result: AssetValidation::default(),
        }
    }

    pub fn run(mut self) -> AssetValidation {
        while let Some(key) = self.unvalidated.pop_first() {
            if let Some(declaration) = self.declaration(&key) {
                self.validate_from(declaration);
            }
        }
        self.result
    }

    fn declaration(&self, (asset_type, id): &AssetKey) -> Option<&'m AssetDeclaration> {
        self.module.assets().get(asset_type)?.get(id)
    }

    fn validate_from(&mut self, root: &'m AssetDeclaration) {
        let mut stack = vec![Frame {
            declaration: root,
            next: 0,
        }];
        let mut child: Option<bool> = None;

        loop {
            let step = match stack.split_last_mut() {
                None => break,
                Some((frame, parents)) => self.step(frame, parents, child.take()),
            };

            match step {
                Step::Descend(declaration) => stack.push(Frame {
                    declaration,
                    next: 0,
                }),
                Step::Finish(outcome) => {
                    let Some(frame) = stack.pop() else { break };
                    let declaration = frame.declaration;
                    match outcome {
                        Ok(()) => {
                            self.result
                                .assets
                                .entry(declaration.asset_type())
                                .or_default()
                                .insert(declaration.identifier().clone(), declaration.clone());
                            child = Some(true);
                        }
                        Err(error) => {
                            debug!(
                                pack = %self.module.identifier(),
                                asset = %declaration.identifier(),
                                "dropping asset declaration"
                            );
                            self.result.errors.push(error);
                            child = Some(false);
                        }
                    }
                }
            }
        }
    }

    fn step(
        &mut self,
        frame: &mut Frame<'m>,
        parents: &[Frame<'m>],
        child: Option<bool>,
    ) -> Step<'m> {
        let declaration = frame.declaration;

        if let Some(resolved) = child {
            if !resolved {
                let reference = &declaration.references()[frame.next];
                if let Err(error) = self.resolve_elsewhere(declaration, reference, parents) {
                    return Step::Finish(Err(error));
                }
            }
            frame.next += 1;
        }

        while let Some(reference) = declaration.references().get(frame.next) {
            let key = (reference.asset_type, reference.identifier.clone());
            if self.is_validated(&key) {
                frame.next += 1;
                continue;
            }
            if self.unvalidated.remove(&key) {
                if let Some(target) = self.declaration(&key) {
                    return Step::Descend(target);
                }
            }
            if let Err(error) = self.resolve_elsewhere(declaration, reference, parents) {
                return Step::Finish(Err(error));
            }
            frame.next += 1;
        }

        Step::Finish(Ok(()))
    }

    fn is_validated(&self, (asset_type, id): &AssetKey) -> bool {
        self.result
            .assets
            .get(asset_type)
            .is_some_and(|by_id| by_id.contains_key(id))
    }

    /// Fallback once the pack itself cannot supply `reference`: defer to a
    /// dependency pack, otherwise fail the referencing declaration.
    fn resolve_elsewhere(
        &mut self,
        declaration: &AssetDeclaration,
        reference: &AssetReference,
        parents: &[Frame<'m>],
    ) -> Result<(), ResolveError> {
        let supplied = self
            .dependencies
            .iter()
            .any(|pack| pack.contains_asset(reference.asset_type, &reference.identifier));
        if supplied {
            self.result
                .missing
                .entry(reference.asset_type)
                .or_default()
                .insert(reference.identifier.clone());
            return Ok(());
        }

        let in_progress = std::iter::once(declaration)
            .chain(parents.iter().map(|frame| frame.declaration))
            .any(|d| d.asset_type() == reference.asset_type && *d.identifier() == reference.identifier);

        let pack = self.module.identifier().clone();
        let asset_type = declaration.asset_type();
        let asset = declaration.identifier().clone();
        let reference = reference.clone();
        if in_progress {
            Err(ResolveError::CircularReference {
                pack,
                asset_type,
                asset,
                reference,
            })
        } else {
            Err(ResolveError::ReferenceWithoutDefinition {
                pack,
                asset_type,
                asset,
                reference,
            })
        }
    }
}

/// Validate every declaration of `module` against itself and `dependencies`.
pub fn validate_assets(module: &RawModule, dependencies: &[Arc<CompiledPack>]) -> AssetValidation {
    AssetValidator::new(module, dependencies).run()
}

#[cfg(test)]
mod tests;
