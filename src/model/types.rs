//! Produced types: instantiations of type declarations

use super::{DeclId, Variance};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from type parameters to their arguments
pub type TypeArgMap = HashMap<DeclId, ProducedType>;

/// A type, as produced by applying a declaration to type arguments or by
/// combining other types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProducedType {
    /// A class, interface or alias applied to arguments
    Declared(AppliedType),
    /// A reference to a type parameter
    Parameter(DeclId),
    /// Union of the listed cases
    Union(Vec<ProducedType>),
    /// Intersection of the listed satisfied types
    Intersection(Vec<ProducedType>),
    /// The bottom type
    Nothing,
    /// Error marker, compatible with every type
    Unknown,
}

/// A declaration applied to type arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppliedType {
    pub decl: DeclId,
    pub args: Vec<ProducedType>,
    /// Use-site variance per argument; empty when no argument carries one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_site: Vec<Option<Variance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifying: Option<Box<ProducedType>>,
}

impl AppliedType {
    /// Use-site variance annotation of the argument at `index`
    pub fn use_site_variance(&self, index: usize) -> Option<Variance> {
        self.use_site.get(index).copied().flatten()
    }
}

impl ProducedType {
    /// Apply `decl` to `args`
    pub fn declared(decl: DeclId, args: Vec<ProducedType>) -> Self {
        ProducedType::Declared(AppliedType {
            decl,
            args,
            use_site: Vec::new(),
            qualifying: None,
        })
    }

    /// A non-generic declaration's type
    pub fn simple(decl: DeclId) -> Self {
        Self::declared(decl, Vec::new())
    }

    /// Attach a qualifying (outer) type
    pub fn qualified_by(self, outer: ProducedType) -> Self {
        match self {
            ProducedType::Declared(mut applied) => {
                applied.qualifying = Some(Box::new(outer));
                ProducedType::Declared(applied)
            }
            other => other,
        }
    }

    /// Annotate the argument at `index` with a use-site variance
    pub fn with_use_site(self, index: usize, variance: Variance) -> Self {
        match self {
            ProducedType::Declared(mut applied) => {
                if applied.use_site.len() < applied.args.len() {
                    applied.use_site.resize(applied.args.len(), None);
                }
                if index < applied.use_site.len() {
                    applied.use_site[index] = Some(variance);
                }
                ProducedType::Declared(applied)
            }
            other => other,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ProducedType::Unknown)
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, ProducedType::Nothing)
    }

    /// The applied declaration, for class/interface/alias types
    pub fn declaration(&self) -> Option<DeclId> {
        match self {
            ProducedType::Declared(applied) => Some(applied.decl),
            ProducedType::Parameter(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_applied(&self) -> Option<&AppliedType> {
        match self {
            ProducedType::Declared(applied) => Some(applied),
            _ => None,
        }
    }

    /// Type arguments, empty for everything but applied declarations
    pub fn args(&self) -> &[ProducedType] {
        match self {
            ProducedType::Declared(applied) => &applied.args,
            _ => &[],
        }
    }

    pub fn arg(&self, index: usize) -> Option<&ProducedType> {
        self.args().get(index)
    }

    pub fn qualifying(&self) -> Option<&ProducedType> {
        match self {
            ProducedType::Declared(applied) => applied.qualifying.as_deref(),
            _ => None,
        }
    }

    /// Check whether the type mentions `Unknown` anywhere
    pub fn contains_unknown(&self) -> bool {
        match self {
            ProducedType::Unknown => true,
            ProducedType::Declared(applied) => {
                applied.args.iter().any(ProducedType::contains_unknown)
                    || applied
                        .qualifying
                        .as_deref()
                        .is_some_and(ProducedType::contains_unknown)
            }
            ProducedType::Union(types) | ProducedType::Intersection(types) => {
                types.iter().any(ProducedType::contains_unknown)
            }
            ProducedType::Parameter(_) | ProducedType::Nothing => false,
        }
    }

    /// Check whether the type mentions any of the given type parameters
    pub fn mentions_any(&self, params: &[DeclId]) -> bool {
        match self {
            ProducedType::Parameter(p) => params.contains(p),
            ProducedType::Declared(applied) => {
                applied.args.iter().any(|a| a.mentions_any(params))
                    || applied
                        .qualifying
                        .as_deref()
                        .is_some_and(|q| q.mentions_any(params))
            }
            ProducedType::Union(types) | ProducedType::Intersection(types) => {
                types.iter().any(|t| t.mentions_any(params))
            }
            ProducedType::Nothing | ProducedType::Unknown => false,
        }
    }

    /// Check whether the type mentions a type parameter at all
    pub fn mentions_type_parameter(&self) -> bool {
        match self {
            ProducedType::Parameter(_) => true,
            ProducedType::Declared(applied) => {
                applied.args.iter().any(ProducedType::mentions_type_parameter)
                    || applied
                        .qualifying
                        .as_deref()
                        .is_some_and(ProducedType::mentions_type_parameter)
            }
            ProducedType::Union(types) | ProducedType::Intersection(types) => {
                types.iter().any(ProducedType::mentions_type_parameter)
            }
            ProducedType::Nothing | ProducedType::Unknown => false,
        }
    }
}
