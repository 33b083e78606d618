//! Built-in declarations of the language module

use super::{
    ClassOrInterface, DeclId, ParameterList, ProducedType, TypeModel, Variance,
};

/// Ids of the built-in declarations the algebra and operators refer to
#[derive(Debug, Clone, Default)]
pub struct LanguageModule {
    pub anything: DeclId,
    pub object: DeclId,
    pub null: DeclId,
    pub null_object: DeclId,
    pub null_value: DeclId,
    pub basic: DeclId,
    pub identifiable: DeclId,
    pub category: DeclId,
    pub iterable: DeclId,
    pub correspondence: DeclId,
    pub ranged: DeclId,
    pub sequential: DeclId,
    pub sequence: DeclId,
    pub empty: DeclId,
    pub empty_object: DeclId,
    pub empty_value: DeclId,
    pub tuple: DeclId,
    pub callable: DeclId,
    pub summable: DeclId,
    pub invertable: DeclId,
    pub numeric: DeclId,
    pub integral: DeclId,
    pub exponentiable: DeclId,
    pub comparable: DeclId,
    pub ordinal: DeclId,
    pub integer: DeclId,
    pub float: DeclId,
    pub string: DeclId,
    pub character: DeclId,
    pub boolean: DeclId,
    pub true_object: DeclId,
    pub true_value: DeclId,
    pub false_object: DeclId,
    pub false_value: DeclId,
    pub comparison: DeclId,
    pub smaller: DeclId,
    pub equal: DeclId,
    pub larger: DeclId,
    pub range: DeclId,
    pub entry: DeclId,
    pub set: DeclId,
    pub exception: DeclId,
}

fn t(decl: DeclId) -> ProducedType {
    ProducedType::simple(decl)
}

fn p(decl: DeclId) -> ProducedType {
    ProducedType::Parameter(decl)
}

fn applied(decl: DeclId, args: &[ProducedType]) -> ProducedType {
    ProducedType::declared(decl, args.to_vec())
}

fn interface() -> ClassOrInterface {
    ClassOrInterface::default()
}

fn class_extending(extended: ProducedType) -> ClassOrInterface {
    ClassOrInterface {
        extended: Some(extended),
        ..ClassOrInterface::default()
    }
}

impl LanguageModule {
    /// Ids before registration; only valid until [`LanguageModule::register`]
    /// has run
    pub(super) fn placeholder() -> Self {
        Self::default()
    }

    /// Add the language module declarations to `model`
    pub(super) fn register(model: &mut TypeModel) -> Self {
        let mut lang = Self::placeholder();

        lang.anything = model.add_class(
            "Anything",
            ClassOrInterface {
                is_abstract: true,
                ..ClassOrInterface::default()
            },
        );
        lang.object = model.add_class(
            "Object",
            ClassOrInterface {
                is_abstract: true,
                ..class_extending(t(lang.anything))
            },
        );
        lang.null = model.add_class(
            "Null",
            ClassOrInterface {
                is_abstract: true,
                ..class_extending(t(lang.anything))
            },
        );
        (lang.null_object, lang.null_value) =
            model.add_object("null", class_extending(t(lang.null)));
        set_cases(model, lang.null, vec![t(lang.null_object)]);
        set_cases(model, lang.anything, vec![t(lang.object), t(lang.null)]);

        lang.identifiable = model.add_interface("Identifiable", interface());
        lang.basic = model.add_class(
            "Basic",
            ClassOrInterface {
                is_abstract: true,
                satisfied: vec![t(lang.identifiable)],
                ..class_extending(t(lang.object))
            },
        );
        lang.category = model.add_interface("Category", interface());

        // Iterable<out Element, out Absent=Null> given Absent satisfies Null
        lang.iterable = model.add_interface(
            "Iterable",
            ClassOrInterface {
                satisfied: vec![t(lang.category)],
                ..interface()
            },
        );
        model.add_type_parameter(lang.iterable, "Element", Variance::Covariant);
        let absent = model.add_type_parameter(lang.iterable, "Absent", Variance::Covariant);
        if let Some(tp) = model.type_parameter_mut(absent) {
            tp.satisfied = vec![t(lang.null)];
            tp.default = Some(t(lang.null));
        }

        lang.correspondence = model.add_interface("Correspondence", interface());
        let key = model.add_type_parameter(lang.correspondence, "Key", Variance::Contravariant);
        bound(model, key, t(lang.object));
        model.add_type_parameter(lang.correspondence, "Item", Variance::Covariant);

        lang.ranged = model.add_interface("Ranged", interface());
        model.add_type_parameter(lang.ranged, "Index", Variance::Contravariant);
        model.add_type_parameter(lang.ranged, "Span", Variance::Covariant);

        // Numeric hierarchy; each of these is its own self type
        lang.summable = self_typed_interface(model, "Summable", "Other", Variance::Invariant);
        lang.invertable = model.add_interface("Invertable", interface());
        model.add_type_parameter(lang.invertable, "Inverse", Variance::Covariant);
        lang.comparable = self_typed_interface(model, "Comparable", "Other", Variance::Contravariant);
        lang.ordinal = self_typed_interface(model, "Ordinal", "Other", Variance::Covariant);
        lang.numeric = self_typed_interface(model, "Numeric", "Other", Variance::Invariant);
        let other = model.type_parameters(lang.numeric)[0];
        satisfy(
            model,
            lang.numeric,
            vec![applied(lang.summable, &[p(other)]), applied(lang.invertable, &[p(other)])],
        );
        lang.integral = self_typed_interface(model, "Integral", "Other", Variance::Invariant);
        let other = model.type_parameters(lang.integral)[0];
        satisfy(
            model,
            lang.integral,
            vec![applied(lang.numeric, &[p(other)]), applied(lang.ordinal, &[p(other)])],
        );
        lang.exponentiable = self_typed_interface(model, "Exponentiable", "This", Variance::Invariant);
        let this = model.type_parameters(lang.exponentiable)[0];
        let power = model.add_type_parameter(lang.exponentiable, "Other", Variance::Invariant);
        bound(model, power, applied(lang.numeric, &[p(power)]));
        if let Some(tp) = model.type_parameter_mut(this) {
            tp.satisfied = vec![applied(lang.exponentiable, &[p(this), p(power)])];
        }
        satisfy(model, lang.exponentiable, vec![applied(lang.numeric, &[p(this)])]);

        // Sequences
        lang.sequential = model.add_interface("Sequential", interface());
        lang.sequence = model.add_interface("Sequence", interface());
        lang.empty = model.add_interface("Empty", interface());
        lang.integer = model.add_class(
            "Integer",
            ClassOrInterface {
                is_final: true,
                ..class_extending(t(lang.object))
            },
        );

        let element = model.add_type_parameter(lang.sequential, "Element", Variance::Covariant);
        satisfy(
            model,
            lang.sequential,
            vec![
                applied(lang.iterable, &[p(element), t(lang.null)]),
                applied(lang.correspondence, &[t(lang.integer), p(element)]),
                applied(
                    lang.ranged,
                    &[t(lang.integer), applied(lang.sequential, &[p(element)])],
                ),
            ],
        );
        set_cases(
            model,
            lang.sequential,
            vec![t(lang.empty), applied(lang.sequence, &[p(element)])],
        );

        let element = model.add_type_parameter(lang.sequence, "Element", Variance::Covariant);
        satisfy(
            model,
            lang.sequence,
            vec![
                applied(lang.sequential, &[p(element)]),
                applied(lang.iterable, &[p(element), ProducedType::Nothing]),
            ],
        );

        satisfy(
            model,
            lang.empty,
            vec![
                applied(lang.sequential, &[ProducedType::Nothing]),
                applied(lang.ranged, &[t(lang.integer), t(lang.empty)]),
            ],
        );
        (lang.empty_object, lang.empty_value) = model.add_object(
            "empty",
            ClassOrInterface {
                satisfied: vec![t(lang.empty)],
                ..class_extending(t(lang.object))
            },
        );
        set_cases(model, lang.empty, vec![t(lang.empty_object)]);

        // Tuple<out Element, out First, out Rest>
        //     given First satisfies Element
        //     given Rest satisfies Sequential<Element>
        lang.tuple = model.add_class(
            "Tuple",
            ClassOrInterface {
                is_final: true,
                ..class_extending(t(lang.object))
            },
        );
        let element = model.add_type_parameter(lang.tuple, "Element", Variance::Covariant);
        let first = model.add_type_parameter(lang.tuple, "First", Variance::Covariant);
        let rest = model.add_type_parameter(lang.tuple, "Rest", Variance::Covariant);
        bound(model, first, p(element));
        bound(model, rest, applied(lang.sequential, &[p(element)]));
        satisfy(model, lang.tuple, vec![applied(lang.sequence, &[p(element)])]);
        let first_param = model.add_parameter("first", p(first));
        let rest_param = model.add_parameter("rest", p(rest));
        initializer(model, lang.tuple, ParameterList::new(vec![first_param, rest_param]));

        // Callable<out Return, in Arguments>
        lang.callable = model.add_interface("Callable", interface());
        model.add_type_parameter(lang.callable, "Return", Variance::Covariant);
        let arguments = model.add_type_parameter(lang.callable, "Arguments", Variance::Contravariant);
        bound(model, arguments, applied(lang.sequential, &[t(lang.anything)]));

        // Scalars
        satisfy(
            model,
            lang.integer,
            vec![
                applied(lang.integral, &[t(lang.integer)]),
                applied(lang.exponentiable, &[t(lang.integer), t(lang.integer)]),
                applied(lang.comparable, &[t(lang.integer)]),
            ],
        );
        lang.float = model.add_class(
            "Float",
            ClassOrInterface {
                is_final: true,
                ..class_extending(t(lang.object))
            },
        );
        satisfy(
            model,
            lang.float,
            vec![
                applied(lang.numeric, &[t(lang.float)]),
                applied(lang.exponentiable, &[t(lang.float), t(lang.float)]),
                applied(lang.comparable, &[t(lang.float)]),
            ],
        );
        lang.character = model.add_class(
            "Character",
            ClassOrInterface {
                is_final: true,
                ..class_extending(t(lang.object))
            },
        );
        satisfy(
            model,
            lang.character,
            vec![
                applied(lang.comparable, &[t(lang.character)]),
                applied(lang.ordinal, &[t(lang.character)]),
            ],
        );
        lang.string = model.add_class(
            "String",
            ClassOrInterface {
                is_final: true,
                ..class_extending(t(lang.object))
            },
        );
        satisfy(
            model,
            lang.string,
            vec![
                applied(lang.iterable, &[t(lang.character), t(lang.null)]),
                applied(lang.correspondence, &[t(lang.integer), t(lang.character)]),
                applied(lang.ranged, &[t(lang.integer), t(lang.string)]),
                applied(lang.summable, &[t(lang.string)]),
                applied(lang.comparable, &[t(lang.string)]),
            ],
        );

        lang.boolean = model.add_class(
            "Boolean",
            ClassOrInterface {
                is_abstract: true,
                ..class_extending(t(lang.basic))
            },
        );
        (lang.true_object, lang.true_value) = model.add_object("true", class_extending(t(lang.boolean)));
        (lang.false_object, lang.false_value) =
            model.add_object("false", class_extending(t(lang.boolean)));
        set_cases(model, lang.boolean, vec![t(lang.true_object), t(lang.false_object)]);

        lang.comparison = model.add_class(
            "Comparison",
            ClassOrInterface {
                is_abstract: true,
                ..class_extending(t(lang.basic))
            },
        );
        (lang.smaller, _) = model.add_object("smaller", class_extending(t(lang.comparison)));
        (lang.equal, _) = model.add_object("equal", class_extending(t(lang.comparison)));
        (lang.larger, _) = model.add_object("larger", class_extending(t(lang.comparison)));
        set_cases(
            model,
            lang.comparison,
            vec![t(lang.smaller), t(lang.equal), t(lang.larger)],
        );

        // Range<Element> given Element satisfies Ordinal<Element> & Comparable<Element>
        lang.range = model.add_class(
            "Range",
            ClassOrInterface {
                is_final: true,
                ..class_extending(t(lang.object))
            },
        );
        let element = model.add_type_parameter(lang.range, "Element", Variance::Invariant);
        if let Some(tp) = model.type_parameter_mut(element) {
            tp.satisfied = vec![
                applied(lang.ordinal, &[p(element)]),
                applied(lang.comparable, &[p(element)]),
            ];
        }
        satisfy(model, lang.range, vec![applied(lang.sequence, &[p(element)])]);
        let first_param = model.add_parameter("first", p(element));
        let last_param = model.add_parameter("last", p(element));
        initializer(model, lang.range, ParameterList::new(vec![first_param, last_param]));

        // Entry<out Key, out Item> given Key satisfies Object given Item satisfies Object
        lang.entry = model.add_class(
            "Entry",
            ClassOrInterface {
                is_final: true,
                ..class_extending(t(lang.object))
            },
        );
        let key = model.add_type_parameter(lang.entry, "Key", Variance::Covariant);
        let item = model.add_type_parameter(lang.entry, "Item", Variance::Covariant);
        bound(model, key, t(lang.object));
        bound(model, item, t(lang.object));
        let key_param = model.add_parameter("key", p(key));
        let item_param = model.add_parameter("item", p(item));
        initializer(model, lang.entry, ParameterList::new(vec![key_param, item_param]));

        lang.set = model.add_interface("Set", interface());
        let element = model.add_type_parameter(lang.set, "Element", Variance::Covariant);
        bound(model, element, t(lang.object));
        satisfy(
            model,
            lang.set,
            vec![applied(lang.iterable, &[p(element), t(lang.null)])],
        );

        lang.exception = model.add_class("Exception", class_extending(t(lang.basic)));
        let optional_string = ProducedType::Union(vec![t(lang.null), t(lang.string)]);
        let optional_exception = ProducedType::Union(vec![t(lang.null), t(lang.exception)]);
        let mut description = model.add_parameter("description", optional_string);
        description.defaulted = true;
        let mut cause = model.add_parameter("cause", optional_exception);
        cause.defaulted = true;
        initializer(model, lang.exception, ParameterList::new(vec![description, cause]));

        lang
    }
}

fn set_cases(model: &mut TypeModel, id: DeclId, cases: Vec<ProducedType>) {
    if let Some(ci) = model.class_or_interface_mut(id) {
        ci.case_types = cases;
    }
}

fn satisfy(model: &mut TypeModel, id: DeclId, satisfied: Vec<ProducedType>) {
    if let Some(ci) = model.class_or_interface_mut(id) {
        ci.satisfied.extend(satisfied);
    }
}

fn initializer(model: &mut TypeModel, id: DeclId, parameters: ParameterList) {
    for param in &parameters.parameters {
        model.set_container(param.decl, id);
    }
    if let Some(ci) = model.class_or_interface_mut(id) {
        ci.parameters = Some(parameters);
    }
}

fn bound(model: &mut TypeModel, param: DeclId, upper: ProducedType) {
    if let Some(tp) = model.type_parameter_mut(param) {
        tp.satisfied.push(upper);
    }
}

/// `interface Name<Other> of Other given Other satisfies Name<Other>`
fn self_typed_interface(model: &mut TypeModel, name: &str, param: &str, variance: Variance) -> DeclId {
    let id = model.add_interface(name, interface());
    let other = model.add_type_parameter(id, param, variance);
    if let Some(tp) = model.type_parameter_mut(other) {
        tp.is_self_type = true;
        tp.satisfied = vec![applied(id, &[p(other)])];
    }
    if let Some(ci) = model.class_or_interface_mut(id) {
        ci.self_type = Some(other);
        ci.case_types = vec![p(other)];
    }
    id
}

/// Constructors for the built-in types
impl TypeModel {
    pub fn anything_type(&self) -> ProducedType {
        t(self.lang.anything)
    }

    pub fn object_type(&self) -> ProducedType {
        t(self.lang.object)
    }

    pub fn null_type(&self) -> ProducedType {
        t(self.lang.null)
    }

    pub fn boolean_type(&self) -> ProducedType {
        t(self.lang.boolean)
    }

    pub fn integer_type(&self) -> ProducedType {
        t(self.lang.integer)
    }

    pub fn float_type(&self) -> ProducedType {
        t(self.lang.float)
    }

    pub fn string_type(&self) -> ProducedType {
        t(self.lang.string)
    }

    pub fn character_type(&self) -> ProducedType {
        t(self.lang.character)
    }

    pub fn comparison_type(&self) -> ProducedType {
        t(self.lang.comparison)
    }

    pub fn exception_type(&self) -> ProducedType {
        t(self.lang.exception)
    }

    pub fn empty_type(&self) -> ProducedType {
        t(self.lang.empty)
    }

    pub fn sequential_type(&self, element: ProducedType) -> ProducedType {
        applied(self.lang.sequential, &[element])
    }

    pub fn sequence_type(&self, element: ProducedType) -> ProducedType {
        applied(self.lang.sequence, &[element])
    }

    pub fn iterable_type(&self, element: ProducedType, absent: ProducedType) -> ProducedType {
        applied(self.lang.iterable, &[element, absent])
    }

    pub fn entry_type(&self, key: ProducedType, item: ProducedType) -> ProducedType {
        applied(self.lang.entry, &[key, item])
    }

    pub fn range_type(&self, element: ProducedType) -> ProducedType {
        applied(self.lang.range, &[element])
    }

    pub fn set_type(&self, element: ProducedType) -> ProducedType {
        applied(self.lang.set, &[element])
    }

    pub fn callable_type(&self, ret: ProducedType, arguments: ProducedType) -> ProducedType {
        applied(self.lang.callable, &[ret, arguments])
    }

    /// `T?`
    pub fn optional_type(&self, ty: ProducedType) -> ProducedType {
        self.union([self.null_type(), ty])
    }
}
