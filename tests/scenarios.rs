//! End-to-end checks of small compilation units
//!
//! Each scenario builds a model and a unit the way the binding pass would
//! hand them over, runs the checker, and compares the analysis summary.

use lumen::ast::{ConditionVariable, PositionalArg};
use lumen::model::{ClassOrInterface, Function, ParameterList, Value};
use lumen::prelude::*;
use pretty_assertions::assert_eq;

fn run(model: &TypeModel, builder: AstBuilder, roots: Vec<NodeId>) -> Analysis {
    let unit = builder.finish(roots);
    check_unit(model, &unit, &TypeckConfig::default())
}

fn untyped(model: &mut TypeModel, name: &str) -> DeclId {
    model.add_value(name, Value::default())
}

fn typed(model: &mut TypeModel, name: &str, ty: ProducedType) -> DeclId {
    model.add_value(
        name,
        Value {
            ty: Some(ty),
            ..Value::default()
        },
    )
}

#[test]
fn value_declaration_infers_literal_type() {
    let mut model = TypeModel::new();
    let x = untyped(&mut model, "x");
    let mut b = AstBuilder::default();
    let s = b.string("s");
    let decl = b.value(x, Some(s));
    let analysis = run(&model, b, vec![decl]);

    insta::assert_json_snapshot!(analysis.summary(&model), @r###"
    {
      "errors": 0,
      "warnings": 0,
      "diagnostics": [],
      "declarations": {
        "x": "String"
      }
    }
    "###);
}

#[test]
fn generic_identity_infers_type_argument() {
    let mut model = TypeModel::new();
    let identity = model.add_function("identity", Function::default());
    let t = model.add_type_parameter(identity, "T", Variance::Invariant);
    let param = model.add_parameter("t", ProducedType::Parameter(t));
    if let Some(function) = model.function_mut(identity) {
        function.parameter_lists = vec![ParameterList::new(vec![param])];
        function.return_type = Some(ProducedType::Parameter(t));
    }
    let result = untyped(&mut model, "result");

    let mut b = AstBuilder::default();
    let callee = b.member(identity, "identity");
    let s = b.string("s");
    let call = b.call(callee, vec![s]);
    let decl = b.value(result, Some(call));
    let analysis = run(&model, b, vec![decl]);

    assert!(!analysis.has_errors());
    let inferred: Vec<String> = analysis
        .type_arguments(call)
        .unwrap_or(&[])
        .iter()
        .map(|ty| model.type_name(ty))
        .collect();
    assert_eq!(inferred, vec!["String"]);
    assert_eq!(
        analysis.summary(&model).declarations.get("result").map(String::as_str),
        Some("String")
    );
}

#[test]
fn sequenced_parameter_matching() {
    let mut model = TypeModel::new();
    let integer = model.integer_type();
    let a = model.add_parameter("a", integer.clone());
    let sequential = model.sequential_type(integer);
    let mut rest = model.add_parameter("rest", sequential);
    rest.sequenced = true;
    let anything = model.anything_type();
    let f = model.add_function(
        "f",
        Function {
            parameter_lists: vec![ParameterList::new(vec![a, rest])],
            return_type: Some(anything),
            ..Function::default()
        },
    );

    let mut b = AstBuilder::default();
    let callee = b.member(f, "f");
    let args = vec![b.integer(1), b.integer(2), b.integer(3)];
    let full = b.call(callee, args);
    let callee = b.member(f, "f");
    let empty = b.call(callee, Vec::new());
    let roots = vec![b.expr_stmt(full), b.expr_stmt(empty)];
    let analysis = run(&model, b, roots);

    assert_eq!(analysis.bindings(full).len(), 3);
    let summary = analysis.summary(&model);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.diagnostics[0].code, "E2002");
    assert_eq!(
        summary.diagnostics[0].message,
        "missing argument to required parameter a of f"
    );
    assert_eq!(summary.diagnostics[0].node, Some(empty));
}

#[test]
fn exhaustive_switch_over_union() {
    let mut model = TypeModel::new();
    let either = model.union([model.string_type(), model.integer_type()]);
    let x = typed(&mut model, "x", either);
    let (s, i) = (untyped(&mut model, "s"), untyped(&mut model, "i"));

    let mut b = AstBuilder::default();
    let subject = b.member(x, "x");
    let body = b.block(Vec::new());
    let string_case = b.case_is(model.string_type(), Some(s), body);
    let body = b.block(Vec::new());
    let integer_case = b.case_is(model.integer_type(), Some(i), body);
    let switch = b.switch(subject, vec![string_case, integer_case], None);
    let analysis = run(&model, b, vec![switch]);

    insta::assert_json_snapshot!(analysis.summary(&model), @r###"
    {
      "errors": 0,
      "warnings": 0,
      "diagnostics": [],
      "declarations": {
        "i": "Integer",
        "s": "String"
      }
    }
    "###);
}

#[test]
fn is_condition_narrowing() {
    let mut model = TypeModel::new();
    let either = model.union([model.string_type(), model.integer_type()]);
    let x = typed(&mut model, "x", either);
    let string = model.string_type();
    let plain = typed(&mut model, "plain", string);
    let (s, t) = (untyped(&mut model, "s"), untyped(&mut model, "t"));

    let mut b = AstBuilder::default();
    let subject = b.member(x, "x");
    let narrowing = b.is_condition(
        false,
        model.string_type(),
        Some(ConditionVariable {
            decl: s,
            synthetic: false,
        }),
        subject,
    );
    let then_block = b.block(Vec::new());
    let first = b.if_else(vec![narrowing], then_block, None);

    let subject = b.member(plain, "plain");
    let vacuous = b.is_condition(
        false,
        model.string_type(),
        Some(ConditionVariable {
            decl: t,
            synthetic: false,
        }),
        subject,
    );
    let then_block = b.block(Vec::new());
    let second = b.if_else(vec![vacuous], then_block, None);
    let analysis = run(&model, b, vec![first, second]);

    let summary = analysis.summary(&model);
    assert_eq!(summary.declarations.get("s").map(String::as_str), Some("String"));
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.diagnostics[0].node, Some(vacuous));
    assert_eq!(
        summary.diagnostics[0].message,
        "does not narrow type: String is a subtype of String"
    );
}

#[test]
fn second_catch_already_handled() {
    let mut model = TypeModel::new();
    let exception = model.exception_type();
    let my_error = model.add_class(
        "MyError",
        ClassOrInterface {
            extended: Some(exception.clone()),
            ..ClassOrInterface::default()
        },
    );
    let e = typed(&mut model, "e", exception);
    let m = typed(&mut model, "m", ProducedType::simple(my_error));

    let mut b = AstBuilder::default();
    let body = b.block(Vec::new());
    let first_body = b.block(Vec::new());
    let first = b.catch(e, first_body);
    let second_body = b.block(Vec::new());
    let second = b.catch(m, second_body);
    let statement = b.try_catch(body, vec![first, second], None);
    let analysis = run(&model, b, vec![statement]);

    assert_eq!(second, NodeId(4));
    insta::assert_json_snapshot!(analysis.summary(&model), @r###"
    {
      "errors": 1,
      "warnings": 0,
      "diagnostics": [
        {
          "code": "E3009",
          "message": "exception type is already handled by earlier catch clause: MyError",
          "node": 4
        }
      ],
      "declarations": {}
    }
    "###);
}

#[test]
fn tuple_literal_and_index() {
    let model = TypeModel::new();
    let mut b = AstBuilder::default();
    let one = b.integer(1);
    let s = b.string("s");
    let pair = b.tuple(vec![PositionalArg::Listed(one), PositionalArg::Listed(s)]);
    let index = b.integer(0);
    let first = b.index(pair, index);
    let statement = b.expr_stmt(first);
    let analysis = run(&model, b, vec![statement]);

    let name = |node| analysis.type_of(node).map(|ty| model.type_name(ty));
    assert_eq!(
        name(pair).as_deref(),
        Some("Tuple<String|Integer, Integer, Tuple<String, String, Empty>>")
    );
    assert_eq!(name(first).as_deref(), Some("Integer"));
}

#[test]
fn match_cases_over_enumerated_objects() {
    let mut model = TypeModel::new();
    let boolean = model.boolean_type();
    let flag = typed(&mut model, "flag", boolean);
    let (yes, no) = (model.lang().true_value, model.lang().false_value);

    let mut b = AstBuilder::default();
    let subject = b.member(flag, "flag");
    let value = b.member(yes, "true");
    let body = b.block(Vec::new());
    let yes_case = b.case_match(vec![value], body);
    let switch = b.switch(subject, vec![yes_case], None);
    let analysis = run(&model, b, vec![switch]);

    let summary = analysis.summary(&model);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.diagnostics[0].code, "E3006");
    assert_eq!(summary.diagnostics[0].node, Some(switch));

    let mut b = AstBuilder::default();
    let subject = b.member(flag, "flag");
    let cases = [(yes, "true"), (no, "false")]
        .into_iter()
        .map(|(decl, name)| {
            let value = b.member(decl, name);
            let body = b.block(Vec::new());
            b.case_match(vec![value], body)
        })
        .collect();
    let switch = b.switch(subject, cases, None);
    let analysis = run(&model, b, vec![switch]);
    assert!(analysis.diagnostics().is_empty());
}
