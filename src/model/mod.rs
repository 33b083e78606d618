//! The declaration graph and type algebra
//!
//! Declarations are owned by a [`TypeModel`] arena and addressed by
//! [`DeclId`]. The binding pass fills the arena; the type checker only reads
//! it. All type operations (union, intersection, substitution, subtyping,
//! supertype search, tuple encoding) are methods on the model, because they
//! need to consult declaration shapes.

mod algebra;
mod alias;
mod language;
mod names;
mod tuple;
mod types;

pub use alias::AliasResolution;
pub use algebra::SupertypeSearch;
pub use language::LanguageModule;
pub use types::{AppliedType, ProducedType, TypeArgMap};

use serde::{Deserialize, Serialize};

/// Index of a declaration in the model arena
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DeclId(pub u32);

/// Declaration-site (or use-site) variance of a type parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    Covariant,
    Contravariant,
    Invariant,
}

/// A declaration in the graph
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    /// Enclosing declaration; `None` for toplevel declarations
    pub container: Option<DeclId>,
    pub kind: DeclKind,
}

/// The closed set of declaration kinds
#[derive(Debug, Clone)]
pub enum DeclKind {
    Class(ClassOrInterface),
    Interface(ClassOrInterface),
    TypeParameter(TypeParameter),
    Alias(TypeAlias),
    Value(Value),
    Function(Function),
}

/// Shape shared by classes and interfaces
#[derive(Debug, Clone, Default)]
pub struct ClassOrInterface {
    pub type_parameters: Vec<DeclId>,
    /// Superclass, classes only
    pub extended: Option<ProducedType>,
    pub satisfied: Vec<ProducedType>,
    /// Enumerated cases (`of A | B`)
    pub case_types: Vec<ProducedType>,
    /// The type parameter acting as this declaration's self type
    pub self_type: Option<DeclId>,
    /// Initializer parameters, classes only
    pub parameters: Option<ParameterList>,
    pub is_abstract: bool,
    pub is_final: bool,
    /// An `object` declaration's anonymous class
    pub anonymous: bool,
}

#[derive(Debug, Clone)]
pub struct TypeParameter {
    pub owner: DeclId,
    pub variance: Variance,
    /// Upper bounds
    pub satisfied: Vec<ProducedType>,
    /// Enumerated constraint (`given T of A | B`)
    pub case_types: Vec<ProducedType>,
    /// Set when the parameter is the self type of its owner
    pub is_self_type: bool,
    pub default: Option<ProducedType>,
}

#[derive(Debug, Clone)]
pub struct TypeAlias {
    pub type_parameters: Vec<DeclId>,
    pub aliased: ProducedType,
}

/// A value, getter or parameter
#[derive(Debug, Clone, Default)]
pub struct Value {
    /// Declared type; `None` for `value x = ...`
    pub ty: Option<ProducedType>,
    pub variable: bool,
    pub late: bool,
    /// A getter, recomputed on each evaluation
    pub transient: bool,
    pub formal: bool,
    pub default: bool,
    pub parameter: bool,
    /// Nullity is not statically checked (foreign interop values)
    pub unchecked_null: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Function {
    pub type_parameters: Vec<DeclId>,
    pub parameter_lists: Vec<ParameterList>,
    /// Declared return type; `None` when inferred
    pub return_type: Option<ProducedType>,
    pub declared_void: bool,
    pub formal: bool,
    pub default: bool,
    /// Non-empty for an abstraction standing for overloaded declarations
    pub overloads: Vec<DeclId>,
}

/// A parameter of a function or class initializer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// The value declaration through which the body refers to the parameter
    pub decl: DeclId,
    pub defaulted: bool,
    pub sequenced: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList {
    pub parameters: Vec<Parameter>,
}

impl ParameterList {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Index of the first defaulted parameter
    pub fn first_defaulted(&self) -> Option<usize> {
        self.parameters.iter().position(|p| p.defaulted)
    }

    pub fn has_sequenced(&self) -> bool {
        self.parameters.last().is_some_and(|p| p.sequenced)
    }
}

/// Declaration arena plus the built-in language module
#[derive(Debug, Clone)]
pub struct TypeModel {
    decls: Vec<Declaration>,
    lang: LanguageModule,
}

impl Default for TypeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeModel {
    /// Create a model containing the language module
    pub fn new() -> Self {
        let mut model = TypeModel {
            decls: Vec::new(),
            lang: LanguageModule::placeholder(),
        };
        model.lang = LanguageModule::register(&mut model);
        model
    }

    /// The built-in declarations
    pub fn lang(&self) -> &LanguageModule {
        &self.lang
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0 as usize]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.0 as usize]
    }

    pub fn name(&self, id: DeclId) -> &str {
        &self.decl(id).name
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Iterate over all declaration ids
    pub fn ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.decls.len() as u32).map(DeclId)
    }

    fn push(&mut self, name: &str, container: Option<DeclId>, kind: DeclKind) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(Declaration {
            name: name.to_string(),
            container,
            kind,
        });
        id
    }

    // Builders used by the binding pass

    pub fn add_class(&mut self, name: &str, class: ClassOrInterface) -> DeclId {
        self.push(name, None, DeclKind::Class(class))
    }

    pub fn add_interface(&mut self, name: &str, interface: ClassOrInterface) -> DeclId {
        self.push(name, None, DeclKind::Interface(interface))
    }

    /// Declare an `object`: an anonymous final class plus a value of that type
    pub fn add_object(&mut self, name: &str, class: ClassOrInterface) -> (DeclId, DeclId) {
        let class_id = self.add_class(
            name,
            ClassOrInterface {
                anonymous: true,
                is_final: true,
                ..class
            },
        );
        let value = self.add_value(
            name,
            Value {
                ty: Some(ProducedType::simple(class_id)),
                ..Value::default()
            },
        );
        (class_id, value)
    }

    pub fn add_alias(&mut self, name: &str, aliased: ProducedType) -> DeclId {
        self.push(
            name,
            None,
            DeclKind::Alias(TypeAlias {
                type_parameters: Vec::new(),
                aliased,
            }),
        )
    }

    pub fn add_value(&mut self, name: &str, value: Value) -> DeclId {
        self.push(name, None, DeclKind::Value(value))
    }

    pub fn add_function(&mut self, name: &str, function: Function) -> DeclId {
        self.push(name, None, DeclKind::Function(function))
    }

    /// Declare a parameter: a value declaration plus its list entry
    pub fn add_parameter(&mut self, name: &str, ty: ProducedType) -> Parameter {
        let decl = self.add_value(
            name,
            Value {
                ty: Some(ty),
                parameter: true,
                ..Value::default()
            },
        );
        Parameter {
            name: name.to_string(),
            decl,
            defaulted: false,
            sequenced: false,
        }
    }

    /// Declare a type parameter of `owner` and append it to the owner's list
    pub fn add_type_parameter(&mut self, owner: DeclId, name: &str, variance: Variance) -> DeclId {
        let id = self.push(
            name,
            Some(owner),
            DeclKind::TypeParameter(TypeParameter {
                owner,
                variance,
                satisfied: Vec::new(),
                case_types: Vec::new(),
                is_self_type: false,
                default: None,
            }),
        );
        match &mut self.decl_mut(owner).kind {
            DeclKind::Class(ci) | DeclKind::Interface(ci) => ci.type_parameters.push(id),
            DeclKind::Function(f) => f.type_parameters.push(id),
            DeclKind::Alias(a) => a.type_parameters.push(id),
            DeclKind::TypeParameter(_) | DeclKind::Value(_) => {}
        }
        id
    }

    pub fn set_container(&mut self, id: DeclId, container: DeclId) {
        self.decl_mut(id).container = Some(container);
    }

    pub fn class_or_interface_mut(&mut self, id: DeclId) -> Option<&mut ClassOrInterface> {
        match &mut self.decl_mut(id).kind {
            DeclKind::Class(ci) | DeclKind::Interface(ci) => Some(ci),
            _ => None,
        }
    }

    pub fn type_parameter_mut(&mut self, id: DeclId) -> Option<&mut TypeParameter> {
        match &mut self.decl_mut(id).kind {
            DeclKind::TypeParameter(tp) => Some(tp),
            _ => None,
        }
    }

    pub fn function_mut(&mut self, id: DeclId) -> Option<&mut Function> {
        match &mut self.decl_mut(id).kind {
            DeclKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn value_mut(&mut self, id: DeclId) -> Option<&mut Value> {
        match &mut self.decl_mut(id).kind {
            DeclKind::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn alias_mut(&mut self, id: DeclId) -> Option<&mut TypeAlias> {
        match &mut self.decl_mut(id).kind {
            DeclKind::Alias(a) => Some(a),
            _ => None,
        }
    }

    // Shape queries

    pub fn class_or_interface(&self, id: DeclId) -> Option<&ClassOrInterface> {
        match &self.decl(id).kind {
            DeclKind::Class(ci) | DeclKind::Interface(ci) => Some(ci),
            _ => None,
        }
    }

    pub fn type_parameter(&self, id: DeclId) -> Option<&TypeParameter> {
        match &self.decl(id).kind {
            DeclKind::TypeParameter(tp) => Some(tp),
            _ => None,
        }
    }

    pub fn value(&self, id: DeclId) -> Option<&Value> {
        match &self.decl(id).kind {
            DeclKind::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn function(&self, id: DeclId) -> Option<&Function> {
        match &self.decl(id).kind {
            DeclKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn alias(&self, id: DeclId) -> Option<&TypeAlias> {
        match &self.decl(id).kind {
            DeclKind::Alias(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_class(&self, id: DeclId) -> bool {
        matches!(self.decl(id).kind, DeclKind::Class(_))
    }

    pub fn is_interface(&self, id: DeclId) -> bool {
        matches!(self.decl(id).kind, DeclKind::Interface(_))
    }

    pub fn is_toplevel(&self, id: DeclId) -> bool {
        self.decl(id).container.is_none()
    }

    /// Anonymous classes and classes declared `final`
    pub fn is_final(&self, id: DeclId) -> bool {
        match &self.decl(id).kind {
            DeclKind::Class(ci) => ci.is_final || ci.anonymous,
            _ => false,
        }
    }

    pub fn is_anonymous(&self, id: DeclId) -> bool {
        matches!(&self.decl(id).kind, DeclKind::Class(ci) if ci.anonymous)
    }

    pub fn is_abstract(&self, id: DeclId) -> bool {
        matches!(&self.decl(id).kind, DeclKind::Class(ci) if ci.is_abstract)
    }

    /// An unresolved group of overloaded declarations
    pub fn is_abstraction(&self, id: DeclId) -> bool {
        self.function(id).is_some_and(|f| !f.overloads.is_empty())
    }

    pub fn type_parameters(&self, id: DeclId) -> &[DeclId] {
        match &self.decl(id).kind {
            DeclKind::Class(ci) | DeclKind::Interface(ci) => &ci.type_parameters,
            DeclKind::Function(f) => &f.type_parameters,
            DeclKind::Alias(a) => &a.type_parameters,
            DeclKind::TypeParameter(_) | DeclKind::Value(_) => &[],
        }
    }

    pub fn is_generic(&self, id: DeclId) -> bool {
        !self.type_parameters(id).is_empty()
    }

    pub fn variance(&self, param: DeclId) -> Variance {
        self.type_parameter(param)
            .map(|tp| tp.variance)
            .unwrap_or(Variance::Invariant)
    }

    pub fn is_contravariant(&self, param: DeclId) -> bool {
        self.variance(param) == Variance::Contravariant
    }

    /// Satisfied types of a class or interface, or upper bounds of a type
    /// parameter
    pub fn satisfied_types(&self, id: DeclId) -> &[ProducedType] {
        match &self.decl(id).kind {
            DeclKind::Class(ci) | DeclKind::Interface(ci) => &ci.satisfied,
            DeclKind::TypeParameter(tp) => &tp.satisfied,
            _ => &[],
        }
    }

    pub fn extended_type(&self, id: DeclId) -> Option<&ProducedType> {
        match &self.decl(id).kind {
            DeclKind::Class(ci) => ci.extended.as_ref(),
            _ => None,
        }
    }

    pub fn case_types(&self, id: DeclId) -> &[ProducedType] {
        match &self.decl(id).kind {
            DeclKind::Class(ci) | DeclKind::Interface(ci) => &ci.case_types,
            DeclKind::TypeParameter(tp) => &tp.case_types,
            _ => &[],
        }
    }

    /// The self type parameter of a class or interface
    pub fn self_type(&self, id: DeclId) -> Option<DeclId> {
        self.class_or_interface(id).and_then(|ci| ci.self_type)
    }

    pub fn is_self_type(&self, param: DeclId) -> bool {
        self.type_parameter(param).is_some_and(|tp| tp.is_self_type)
    }

    /// The type of a class or interface as seen from inside its own body:
    /// applied to its own type parameters
    pub fn declared_type(&self, id: DeclId) -> ProducedType {
        if self.type_parameter(id).is_some() {
            return ProducedType::Parameter(id);
        }
        let args = self
            .type_parameters(id)
            .iter()
            .map(|p| ProducedType::Parameter(*p))
            .collect();
        let ty = ProducedType::declared(id, args);
        match self.decl(id).container {
            Some(outer) if self.class_or_interface(outer).is_some() => {
                ty.qualified_by(self.declared_type(outer))
            }
            _ => ty,
        }
    }

    /// Parameter lists of a function, or the initializer list of a class
    pub fn parameter_lists(&self, id: DeclId) -> &[ParameterList] {
        match &self.decl(id).kind {
            DeclKind::Function(f) => &f.parameter_lists,
            DeclKind::Class(ci) => ci.parameters.as_slice(),
            _ => &[],
        }
    }

    /// Functions and classes with an initializer may be invoked directly
    pub fn is_functional(&self, id: DeclId) -> bool {
        match &self.decl(id).kind {
            DeclKind::Function(_) => true,
            DeclKind::Class(ci) => ci.parameters.is_some(),
            _ => false,
        }
    }

    /// Declared type of a parameter
    pub fn parameter_type(&self, param: &Parameter) -> ProducedType {
        self.value(param.decl)
            .and_then(|v| v.ty.clone())
            .unwrap_or(ProducedType::Unknown)
    }

    /// Check whether `id` is (transitively) contained in `container`
    pub fn is_contained_in(&self, id: DeclId, container: DeclId) -> bool {
        let mut current = self.decl(id).container;
        while let Some(c) = current {
            if c == container {
                return true;
            }
            current = self.decl(c).container;
        }
        false
    }
}

#[cfg(test)]
mod tests;
