//! Laws of the type algebra over the built-in declarations

use lumen::ast::AstBuilder;
use lumen::model::{Function, ParameterList, Value};
use lumen::prelude::*;
use proptest::prelude::*;

const POOL: usize = 16;

/// A fixed set of ground types; strategies pick indices into it
fn pool(model: &TypeModel) -> Vec<ProducedType> {
    let lang = model.lang();
    let string = model.string_type();
    let integer = model.integer_type();
    vec![
        ProducedType::Nothing,
        model.anything_type(),
        model.object_type(),
        model.null_type(),
        integer.clone(),
        model.float_type(),
        string.clone(),
        model.character_type(),
        model.boolean_type(),
        model.optional_type(integer.clone()),
        model.union([string.clone(), integer.clone()]),
        model.sequential_type(string.clone()),
        model.sequence_type(string),
        model.empty_type(),
        model.iterable_type(model.character_type(), model.null_type()),
        ProducedType::declared(lang.comparable, vec![integer]),
    ]
}

proptest! {
    #[test]
    fn subtyping_is_reflexive(a in 0..POOL) {
        let model = TypeModel::new();
        let types = pool(&model);
        prop_assert!(model.is_subtype_of(&types[a], &types[a]));
    }

    #[test]
    fn subtyping_is_transitive(a in 0..POOL, b in 0..POOL, c in 0..POOL) {
        let model = TypeModel::new();
        let types = pool(&model);
        let (a, b, c) = (&types[a], &types[b], &types[c]);
        if model.is_subtype_of(a, b) && model.is_subtype_of(b, c) {
            prop_assert!(model.is_subtype_of(a, c));
        }
    }

    #[test]
    fn union_is_an_upper_bound(a in 0..POOL, b in 0..POOL) {
        let model = TypeModel::new();
        let types = pool(&model);
        let union = model.union([types[a].clone(), types[b].clone()]);
        prop_assert!(model.is_subtype_of(&types[a], &union));
        prop_assert!(model.is_subtype_of(&types[b], &union));
    }

    #[test]
    fn union_is_below_common_supertypes(a in 0..POOL, b in 0..POOL, c in 0..POOL) {
        let model = TypeModel::new();
        let types = pool(&model);
        let union = model.union([types[a].clone(), types[b].clone()]);
        let every_case = model.is_subtype_of(&types[a], &types[c])
            && model.is_subtype_of(&types[b], &types[c]);
        prop_assert_eq!(model.is_subtype_of(&union, &types[c]), every_case);
    }

    #[test]
    fn intersection_is_a_lower_bound(a in 0..POOL, b in 0..POOL) {
        let model = TypeModel::new();
        let types = pool(&model);
        let meet = model.intersection2(types[a].clone(), types[b].clone());
        prop_assert!(model.is_subtype_of(&meet, &types[a]), "{}", model.type_name(&meet));
        prop_assert!(model.is_subtype_of(&meet, &types[b]), "{}", model.type_name(&meet));
    }

    #[test]
    fn intersection_identity_and_zero(a in 0..POOL) {
        let model = TypeModel::new();
        let types = pool(&model);
        let with_anything = model.intersection2(types[a].clone(), model.anything_type());
        prop_assert!(model.is_exactly(&with_anything, &types[a]));
        let with_nothing = model.intersection2(types[a].clone(), ProducedType::Nothing);
        prop_assert!(with_nothing.is_nothing());
    }

    #[test]
    fn narrowing_is_idempotent(known in 0..POOL, tested in 0..POOL) {
        let model = TypeModel::new();
        let types = pool(&model);
        let once = model.intersection2(types[tested].clone(), types[known].clone());
        let twice = model.intersection2(types[tested].clone(), once.clone());
        prop_assert!(model.is_exactly(&once, &twice));
    }

    #[test]
    fn definite_types_are_not_optional(a in 0..POOL) {
        let model = TypeModel::new();
        let types = pool(&model);
        let definite = model.definite(&types[a]);
        prop_assert!(!model.is_optional(&definite), "{}", model.type_name(&definite));
        prop_assert!(model.is_subtype_of(&definite, &types[a]));
    }

    #[test]
    fn inferred_argument_accepts_the_argument(a in 0..POOL) {
        let mut model = TypeModel::new();
        let argument_type = pool(&model)[a].clone();
        let identity = model.add_function("identity", Function::default());
        let t = model.add_type_parameter(identity, "T", Variance::Covariant);
        let param = model.add_parameter("t", ProducedType::Parameter(t));
        if let Some(function) = model.function_mut(identity) {
            function.parameter_lists = vec![ParameterList::new(vec![param])];
            function.return_type = Some(ProducedType::Parameter(t));
        }
        let x = model.add_value(
            "x",
            Value {
                ty: Some(argument_type.clone()),
                ..Value::default()
            },
        );

        let mut b = AstBuilder::default();
        let callee = b.member(identity, "identity");
        let argument = b.member(x, "x");
        let call = b.call(callee, vec![argument]);
        let statement = b.expr_stmt(call);
        let unit = b.finish(vec![statement]);
        let analysis = check_unit(&model, &unit, &TypeckConfig::default());

        prop_assert!(!analysis.has_errors());
        let result = analysis.type_of(call).cloned().unwrap_or(ProducedType::Unknown);
        prop_assert!(model.is_subtype_of(&argument_type, &result));
    }
}
