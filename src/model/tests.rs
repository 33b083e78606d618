use super::*;
use pretty_assertions::assert_eq;

fn generic_interface(model: &mut TypeModel, name: &str, variance: Variance) -> (DeclId, DeclId) {
    let id = model.add_interface(name, ClassOrInterface::default());
    let param = model.add_type_parameter(id, "T", variance);
    (id, param)
}

fn class(model: &mut TypeModel, name: &str) -> DeclId {
    model.add_class(name, ClassOrInterface::default())
}

#[test]
fn test_language_module_registered() {
    let model = TypeModel::new();
    let lang = model.lang();
    assert_eq!(model.name(lang.string), "String");
    assert_eq!(model.name(lang.iterable), "Iterable");
    assert_eq!(model.type_parameters(lang.tuple).len(), 3);
    assert!(model.is_final(lang.integer));
    assert!(model.is_anonymous(lang.null_object));
    assert_eq!(model.self_type(lang.comparable), model.type_parameters(lang.comparable).first().copied());
}

#[test]
fn test_subtyping_basics() {
    let model = TypeModel::new();
    let string = model.string_type();
    assert!(model.is_subtype_of(&string, &model.object_type()));
    assert!(model.is_subtype_of(&string, &model.anything_type()));
    assert!(!model.is_subtype_of(&model.object_type(), &string));
    assert!(model.is_subtype_of(&ProducedType::Nothing, &string));
    assert!(model.is_subtype_of(&ProducedType::Unknown, &string));
    assert!(model.is_subtype_of(&string, &ProducedType::Unknown));
    assert!(!model.is_subtype_of(&model.null_type(), &model.object_type()));
}

#[test]
fn test_subtyping_through_generic_supertypes() {
    let model = TypeModel::new();
    let integer = model.integer_type();
    let comparable = ProducedType::declared(model.lang().comparable, vec![integer.clone()]);
    assert!(model.is_subtype_of(&integer, &comparable));

    let strings = model.sequential_type(model.string_type());
    let iterable_objects = model.iterable_type(model.object_type(), model.null_type());
    assert!(model.is_subtype_of(&strings, &iterable_objects));
    assert!(!model.is_subtype_of(&iterable_objects, &strings));
}

#[test]
fn test_variance() {
    let mut model = TypeModel::new();
    let (producer, _) = generic_interface(&mut model, "Producer", Variance::Covariant);
    let (consumer, _) = generic_interface(&mut model, "Consumer", Variance::Contravariant);
    let (list, _) = generic_interface(&mut model, "List", Variance::Invariant);
    let string = model.string_type();
    let object = model.object_type();
    let of = |d: DeclId, t: &ProducedType| ProducedType::declared(d, vec![t.clone()]);

    assert!(model.is_subtype_of(&of(producer, &string), &of(producer, &object)));
    assert!(!model.is_subtype_of(&of(producer, &object), &of(producer, &string)));
    assert!(model.is_subtype_of(&of(consumer, &object), &of(consumer, &string)));
    assert!(!model.is_subtype_of(&of(list, &string), &of(list, &object)));

    // List<String> <: List<out Object>
    let out_object = of(list, &object).with_use_site(0, Variance::Covariant);
    assert!(model.is_subtype_of(&of(list, &string), &out_object));
    assert!(!model.is_subtype_of(&out_object, &of(list, &object)));
}

#[test]
fn test_union_canonical_form() {
    let model = TypeModel::new();
    let string = model.string_type();
    let object = model.object_type();
    assert_eq!(model.union([string.clone(), object.clone()]), object);
    assert_eq!(model.union([string.clone(), ProducedType::Nothing]), string);
    assert_eq!(model.union(Vec::new()), ProducedType::Nothing);
    assert_eq!(
        model.union([string.clone(), ProducedType::Unknown]),
        ProducedType::Unknown
    );

    let nested = model.union([
        model.union([string.clone(), model.integer_type()]),
        model.null_type(),
        string.clone(),
    ]);
    assert_eq!(
        nested,
        ProducedType::Union(vec![string, model.integer_type(), model.null_type()])
    );
}

#[test]
fn test_intersection_canonical_form() {
    let model = TypeModel::new();
    let string = model.string_type();
    assert_eq!(model.intersection2(string.clone(), model.anything_type()), string);
    assert_eq!(model.intersection2(string.clone(), model.object_type()), string);
    assert_eq!(
        model.intersection2(string.clone(), ProducedType::Nothing),
        ProducedType::Nothing
    );
    // two unrelated classes
    assert_eq!(
        model.intersection2(string.clone(), model.integer_type()),
        ProducedType::Nothing
    );
    assert_eq!(
        model.intersection2(model.null_type(), model.object_type()),
        ProducedType::Nothing
    );
    // distribution: (String|Null)&Object = String
    let optional = model.optional_type(string.clone());
    assert_eq!(model.intersection2(optional, model.object_type()), string);
}

#[test]
fn test_intersection_of_interfaces_is_kept() {
    let mut model = TypeModel::new();
    let a = model.add_interface("A", ClassOrInterface::default());
    let b = model.add_interface("B", ClassOrInterface::default());
    let ab = model.intersection2(ProducedType::simple(a), ProducedType::simple(b));
    assert_eq!(
        ab,
        ProducedType::Intersection(vec![ProducedType::simple(a), ProducedType::simple(b)])
    );
    assert!(model.is_subtype_of(&ab, &ProducedType::simple(a)));
    assert_eq!(model.type_name(&ab), "A&B");
}

#[test]
fn test_final_class_disjoint_from_interface_it_lacks() {
    let mut model = TypeModel::new();
    let shape = model.add_interface("Shape", ClassOrInterface::default());
    let shape_type = ProducedType::simple(shape);
    assert!(model.is_disjoint(&model.string_type(), &shape_type));
    let plain = class(&mut model, "Plain");
    assert!(!model.is_disjoint(&ProducedType::simple(plain), &shape_type));
}

#[test]
fn test_enumerated_cases_disjointness() {
    let model = TypeModel::new();
    let lang = model.lang();
    let sequence = model.sequence_type(model.string_type());
    assert!(model.is_disjoint(&model.empty_type(), &sequence));
    assert!(model.is_disjoint(&model.null_type(), &sequence));
    assert!(!model.is_disjoint(
        &model.sequential_type(model.string_type()),
        &ProducedType::simple(lang.empty)
    ));
}

#[test]
fn test_substitute() {
    let mut model = TypeModel::new();
    let (list, t) = generic_interface(&mut model, "List", Variance::Invariant);
    let mut map = TypeArgMap::new();
    map.insert(t, model.string_type());

    let ty = model.union([
        ProducedType::declared(list, vec![ProducedType::Parameter(t)]),
        ProducedType::Parameter(t),
    ]);
    let substituted = model.substitute(&ty, &map);
    assert_eq!(
        substituted,
        ProducedType::Union(vec![
            ProducedType::declared(list, vec![model.string_type()]),
            model.string_type(),
        ])
    );

    // unmapped parameters are left alone
    let other = model.add_type_parameter(list, "U", Variance::Invariant);
    assert_eq!(
        model.substitute(&ProducedType::Parameter(other), &map),
        ProducedType::Parameter(other)
    );
}

#[test]
fn test_supertype_of_union_joins_arguments() {
    let model = TypeModel::new();
    let strings = model.sequential_type(model.string_type());
    let integers = model.sequence_type(model.integer_type());
    let either = model.union2(strings, integers);
    let iterable = model.supertype(&either, model.lang().iterable).unwrap();
    assert_eq!(
        iterable.arg(0).cloned().unwrap(),
        model.union2(model.string_type(), model.integer_type())
    );
    // Iterable<String,Null> joined with Iterable<Integer,Nothing>
    assert_eq!(iterable.arg(1).cloned().unwrap(), model.null_type());
}

#[test]
fn test_supertype_meets_principal_instantiation() {
    let model = TypeModel::new();
    let sequence = model.sequence_type(model.string_type());
    let iterable = model.supertype(&sequence, model.lang().iterable).unwrap();
    assert_eq!(iterable.arg(1).cloned().unwrap(), ProducedType::Nothing);
    assert!(model.is_nonempty_iterable(&sequence));
}

#[test]
fn test_ambiguous_invariant_supertype() {
    let mut model = TypeModel::new();
    let (list, _) = generic_interface(&mut model, "List", Variance::Invariant);
    let both = model.add_interface(
        "Both",
        ClassOrInterface {
            satisfied: vec![
                ProducedType::declared(list, vec![model.string_type()]),
                ProducedType::declared(list, vec![model.integer_type()]),
            ],
            ..ClassOrInterface::default()
        },
    );
    assert!(matches!(
        model.supertype_search(&ProducedType::simple(both), list),
        SupertypeSearch::Ambiguous(..)
    ));
}

#[test]
fn test_optional_helpers() {
    let model = TypeModel::new();
    let string = model.string_type();
    let optional = model.optional_type(string.clone());
    assert!(model.is_optional(&optional));
    assert!(!model.is_optional(&string));
    assert!(!model.is_optional(&ProducedType::Unknown));
    assert_eq!(model.definite(&optional), string);
    assert_eq!(model.type_name(&optional), "String?");
}

#[test]
fn test_nonempty_helpers() {
    let model = TypeModel::new();
    let strings = model.sequential_type(model.string_type());
    assert!(model.is_possibly_empty(&strings));
    assert_eq!(model.nonempty(&strings), model.sequence_type(model.string_type()));
    let optional = model.optional_type(strings.clone());
    assert_eq!(model.nonempty(&optional), model.sequence_type(model.string_type()));
    assert_eq!(model.iterated_type(&strings), Some(model.string_type()));
    assert_eq!(model.iterated_type(&model.string_type()), Some(model.character_type()));
    assert_eq!(model.type_name(&strings), "String[]");
}

#[test]
fn test_minus_and_cases() {
    let model = TypeModel::new();
    let lang = model.lang();
    let boolean = model.boolean_type();
    let true_type = ProducedType::simple(lang.true_object);
    let false_type = ProducedType::simple(lang.false_object);
    assert_eq!(model.minus(&boolean, &true_type), false_type);
    assert_eq!(model.minus(&model.anything_type(), &model.null_type()), model.object_type());
    assert_eq!(
        model.minus(&model.sequential_type(model.string_type()), &model.empty_type()),
        model.sequence_type(model.string_type())
    );
    assert_eq!(
        model.union_of_cases(&boolean),
        ProducedType::Union(vec![true_type, false_type])
    );
}

#[test]
fn test_covers() {
    let model = TypeModel::new();
    let lang = model.lang();
    let true_or_false = model.union2(
        ProducedType::simple(lang.true_object),
        ProducedType::simple(lang.false_object),
    );
    assert!(model.covers(&true_or_false, &model.boolean_type()));
    assert!(!model.covers(
        &ProducedType::simple(lang.true_object),
        &model.boolean_type()
    ));
    let string_or_integer = model.union2(model.string_type(), model.integer_type());
    assert!(model.covers(&string_or_integer, &string_or_integer));
    assert!(!model.covers(&model.string_type(), &string_or_integer));
}

#[test]
fn test_tuple_encoding() {
    let model = TypeModel::new();
    let string = model.string_type();
    let integer = model.integer_type();
    let pair = model.tuple_type(&[string.clone(), integer.clone()], false, false, None);
    assert_eq!(model.tuple_element_types(&pair), vec![string.clone(), integer.clone()]);
    assert_eq!(model.tuple_minimum_length(&pair), 2);
    assert!(!model.is_tuple_length_unbounded(&pair));
    assert!(model.is_subtype_of(
        &pair,
        &model.sequence_type(model.union2(string.clone(), integer.clone()))
    ));

    let defaulted = model.tuple_type(&[string.clone(), integer.clone()], false, false, Some(1));
    assert_eq!(model.tuple_minimum_length(&defaulted), 1);
    assert_eq!(model.tuple_element_types(&defaulted), vec![string.clone(), integer.clone()]);

    let variadic = model.tuple_type(&[string.clone(), integer.clone()], true, false, None);
    assert!(model.is_tuple_length_unbounded(&variadic));
    assert!(!model.is_tuple_variant_at_least_one(&variadic));
    assert_eq!(
        model.tuple_element_types(&variadic),
        vec![string, model.sequential_type(integer)]
    );
    assert_eq!(model.tuple_type(&[], false, false, None), model.empty_type());
}

#[test]
fn test_spread_type() {
    let model = TypeModel::new();
    let integer = model.integer_type();
    let integers = model.sequential_type(integer.clone());
    assert_eq!(
        model.spread_type(&integers, true),
        model.sequential_type(integer.clone())
    );

    let pair = model.tuple_type(&[integer.clone(), model.string_type()], false, false, None);
    assert_eq!(model.spread_type(&pair, true), pair);

    // a String is iterable but not sequential
    let spread = model.spread_type(&model.string_type(), true);
    assert_eq!(spread, model.sequential_type(model.character_type()));

    // a nonempty iterable spreads to a sequence
    let nonempty = model.iterable_type(integer.clone(), ProducedType::Nothing);
    assert_eq!(model.spread_type(&nonempty, false), model.sequence_type(integer));
}

#[test]
fn test_alias_resolution_and_cycles() {
    let mut model = TypeModel::new();
    let number = model.add_alias("Number", model.union2(model.integer_type(), model.float_type()));
    let number_type = ProducedType::simple(number);
    assert!(model.is_subtype_of(&model.integer_type(), &number_type));
    assert_eq!(
        model.resolve_aliases(&number_type),
        model.union2(model.integer_type(), model.float_type())
    );

    let looping = model.add_alias("Loop", model.string_type());
    let loop_type = ProducedType::simple(looping);
    let circular = ProducedType::Union(vec![loop_type.clone(), model.string_type()]);
    model.alias_mut(looping).unwrap().aliased = circular;
    assert_eq!(
        model.resolve_alias_type(&loop_type),
        AliasResolution::Cycle(looping)
    );
    assert_eq!(model.resolve_aliases(&loop_type), ProducedType::Unknown);
}

#[test]
fn test_denotable_type_of_local_object() {
    let mut model = TypeModel::new();
    let outer = model.add_function("f", Function::default());
    let shape = model.add_interface("Shape", ClassOrInterface::default());
    let (anon, _) = model.add_object(
        "circle",
        ClassOrInterface {
            satisfied: vec![ProducedType::simple(shape)],
            ..ClassOrInterface::default()
        },
    );
    model.set_container(anon, outer);
    let denotable = model.denotable(&ProducedType::simple(anon));
    assert_eq!(
        denotable,
        ProducedType::Intersection(vec![
            ProducedType::simple(model.lang().basic),
            ProducedType::simple(shape)
        ])
    );
}

#[test]
fn test_type_names() {
    let mut model = TypeModel::new();
    let (list, t) = generic_interface(&mut model, "List", Variance::Invariant);
    let ty = ProducedType::declared(list, vec![ProducedType::Parameter(t)])
        .with_use_site(0, Variance::Covariant);
    assert_eq!(model.type_name(&ty), "List<out T>");
    assert_eq!(model.type_name(&ProducedType::Nothing), "Nothing");
    assert_eq!(model.type_name(&ProducedType::Unknown), "unknown");
    let either = model.union2(model.string_type(), model.integer_type());
    assert_eq!(model.type_name(&model.sequential_type(either)), "<String|Integer>[]");
}

#[test]
fn test_parameter_tuple() {
    let mut model = TypeModel::new();
    let a = model.add_parameter("a", model.integer_type());
    let mut rest = model.add_parameter("rest", model.sequential_type(model.integer_type()));
    rest.sequenced = true;
    let list = ParameterList::new(vec![a, rest]);
    let tuple = model.parameter_tuple(&list);
    assert_eq!(
        tuple,
        model.tuple_type(
            &[model.integer_type(), model.integer_type()],
            true,
            false,
            None
        )
    );
    assert_eq!(model.tuple_minimum_length(&tuple), 1);
}
