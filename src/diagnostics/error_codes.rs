//! Error code definitions

/// Typing and reference errors (E1xxx)
pub mod types {
    pub const TYPE_MISMATCH: &str = "E1001";
    pub const UNRESOLVED_REFERENCE: &str = "E1002";
    pub const AMBIGUOUS_REFERENCE: &str = "E1003";
    pub const CANNOT_INFER_TYPE: &str = "E1004";
    pub const INVALID_OPERAND: &str = "E1005";
    pub const AMBIGUOUS_SUPERTYPE: &str = "E1006";
    pub const NOT_VARIABLE: &str = "E1007";
    pub const INVALID_LITERAL: &str = "E1008";
    pub const RECURSIVE_ALIAS: &str = "E1009";
    pub const WRONG_TYPE_ARGUMENT_COUNT: &str = "E1010";
    pub const UPPER_BOUND_VIOLATION: &str = "E1011";
    pub const ENUMERATED_CONSTRAINT: &str = "E1012";
    pub const MISPLACED_EXPRESSION: &str = "E1013";
    pub const INVALID_RETURN: &str = "E1014";
}

/// Invocation errors (E2xxx)
pub mod invocation {
    pub const EXTRA_ARGUMENT: &str = "E2001";
    pub const MISSING_ARGUMENT: &str = "E2002";
    pub const DUPLICATE_ARGUMENT: &str = "E2003";
    pub const NO_MATCHING_PARAMETER: &str = "E2004";
    pub const NOT_INVOCABLE: &str = "E2005";
    pub const NAMED_ARGUMENTS_UNSUPPORTED: &str = "E2006";
    pub const ARGUMENT_MISMATCH: &str = "E2007";
    pub const ABSTRACT_INSTANTIATION: &str = "E2008";
}

/// Narrowing and case analysis errors (E3xxx)
pub mod narrowing {
    pub const VACUOUS_NARROWING: &str = "E3001";
    pub const NARROWS_TO_NOTHING: &str = "E3002";
    pub const NON_CONSTANT_REFERENCE: &str = "E3003";
    pub const NOT_OPTIONAL: &str = "E3004";
    pub const NOT_POSSIBLY_EMPTY: &str = "E3005";
    pub const NON_EXHAUSTIVE_SWITCH: &str = "E3006";
    pub const NON_DISJOINT_CASES: &str = "E3007";
    pub const INVALID_CASE: &str = "E3008";
    pub const ALREADY_HANDLED: &str = "E3009";
    pub const DEFINITELY_EMPTY: &str = "E3010";
}

/// Declaration errors (E4xxx)
pub mod declarations {
    pub const SELF_TYPE_VIOLATION: &str = "E4001";
    pub const ENUMERATED_SUPERTYPE_VARIANCE: &str = "E4002";
    pub const ENUMERATED_SUPERTYPE_CASE: &str = "E4003";
    pub const EXTENDS_FINAL: &str = "E4004";
    pub const DUPLICATE_SATISFIED_TYPE: &str = "E4005";
    pub const INVALID_CASE_TYPE: &str = "E4006";
}

/// Warnings (W0xxx)
pub mod warnings {
    pub const UNCHECKED_TYPE_ARGUMENTS: &str = "W0001";
}
