//! Type alias expansion
//!
//! Aliases are expanded on demand. Expansion keeps a stack of the aliases
//! currently being expanded; meeting one of them again means the alias
//! definition is circular.

use super::{AppliedType, DeclId, ProducedType, TypeArgMap, TypeModel};
use std::borrow::Cow;

/// Outcome of expanding every alias in a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasResolution {
    Resolved(ProducedType),
    /// The named alias refers to itself
    Cycle(DeclId),
}

impl AliasResolution {
    /// The expanded type, or `Unknown` for a circular alias
    pub fn into_type(self) -> ProducedType {
        match self {
            AliasResolution::Resolved(ty) => ty,
            AliasResolution::Cycle(_) => ProducedType::Unknown,
        }
    }
}

impl TypeModel {
    pub fn is_alias(&self, id: DeclId) -> bool {
        self.alias(id).is_some()
    }

    /// Expand every alias occurring in `ty`
    pub fn resolve_alias_type(&self, ty: &ProducedType) -> AliasResolution {
        let mut resolving = Vec::new();
        match self.expand(ty, &mut resolving) {
            Ok(resolved) => AliasResolution::Resolved(resolved),
            Err(alias) => AliasResolution::Cycle(alias),
        }
    }

    /// Expand every alias occurring in `ty`; circular aliases become `Unknown`
    pub fn resolve_aliases(&self, ty: &ProducedType) -> ProducedType {
        self.resolve_alias_type(ty).into_type()
    }

    /// Expand `ty` only if it is itself an alias application
    pub(crate) fn unalias<'a>(&self, ty: &'a ProducedType) -> Cow<'a, ProducedType> {
        match ty {
            ProducedType::Declared(applied) if self.is_alias(applied.decl) => {
                Cow::Owned(self.resolve_aliases(ty))
            }
            _ => Cow::Borrowed(ty),
        }
    }

    fn expand(&self, ty: &ProducedType, resolving: &mut Vec<DeclId>) -> Result<ProducedType, DeclId> {
        match ty {
            ProducedType::Declared(applied) => {
                let args = applied
                    .args
                    .iter()
                    .map(|arg| self.expand(arg, resolving))
                    .collect::<Result<Vec<_>, _>>()?;
                let qualifying = match &applied.qualifying {
                    Some(q) => Some(Box::new(self.expand(q, resolving)?)),
                    None => None,
                };
                let Some(alias) = self.alias(applied.decl) else {
                    return Ok(ProducedType::Declared(AppliedType {
                        decl: applied.decl,
                        args,
                        use_site: applied.use_site.clone(),
                        qualifying,
                    }));
                };
                if resolving.contains(&applied.decl) {
                    return Err(applied.decl);
                }
                resolving.push(applied.decl);
                let map: TypeArgMap = alias
                    .type_parameters
                    .iter()
                    .copied()
                    .zip(args)
                    .collect();
                let result = self.expand(&replace_parameters(&alias.aliased, &map), resolving);
                resolving.pop();
                result
            }
            ProducedType::Union(cases) => {
                let cases = cases
                    .iter()
                    .map(|c| self.expand(c, resolving))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.union(cases))
            }
            ProducedType::Intersection(types) => {
                let types = types
                    .iter()
                    .map(|t| self.expand(t, resolving))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.intersection(types))
            }
            ProducedType::Parameter(_) | ProducedType::Nothing | ProducedType::Unknown => {
                Ok(ty.clone())
            }
        }
    }
}

/// Structural parameter replacement without canonicalization; the result
/// may still mention aliases, so it must not be fed to the algebra before
/// expansion finishes.
fn replace_parameters(ty: &ProducedType, map: &TypeArgMap) -> ProducedType {
    match ty {
        ProducedType::Parameter(p) => map.get(p).cloned().unwrap_or_else(|| ty.clone()),
        ProducedType::Declared(applied) => ProducedType::Declared(AppliedType {
            decl: applied.decl,
            args: applied.args.iter().map(|a| replace_parameters(a, map)).collect(),
            use_site: applied.use_site.clone(),
            qualifying: applied
                .qualifying
                .as_ref()
                .map(|q| Box::new(replace_parameters(q, map))),
        }),
        ProducedType::Union(cases) => {
            ProducedType::Union(cases.iter().map(|c| replace_parameters(c, map)).collect())
        }
        ProducedType::Intersection(types) => {
            ProducedType::Intersection(types.iter().map(|t| replace_parameters(t, map)).collect())
        }
        ProducedType::Nothing | ProducedType::Unknown => ty.clone(),
    }
}
