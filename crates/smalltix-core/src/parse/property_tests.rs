// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for Smalltix lexing and parsing.
//!
//! These tests verify that the front end handles all input safely:
//!
//! 1. **`lex` never panics** — it returns Ok or Err on arbitrary input
//! 2. **`parse_source` never panics** — including on truncated input
//! 3. **Keyword selector arity law** — `:`-terminated parts always match
//!    the argument count
//! 4. **Round-trip law** — unparse then re-parse is a fixed point on the
//!    supported subset

use proptest::prelude::*;

use crate::ast::{Expression, MessageSelector, Method};
use crate::parse::{lex, parse_source};
use crate::unparse::unparse_method;

// ============================================================================
// Generators
// ============================================================================

/// Valid method sources covering every grammar production.
const METHODS: &[&str] = &[
    "double ^ self + self .",
    "setX: n x := n .",
    "foo ^ 3 + 4 .",
    "pi ^ 3.14 .",
    "neg ^ -17 .",
    "+ other ^ other .",
    "at: i put: v | old | old := i . ^ old .",
    "run | a b | a := 1 . b := a . ^ a + b .",
    "run coll add: 1; add: 2; yourself .",
    "run ^ (self at: 1) size .",
    "run ^ self size printNl .",
    "run coll do: [ :each | each printNl ] .",
    "run ^ [ :x | | t | t := x . t ] .",
    "run a do: [ :x | b do: [ :y | x + y ] ] .",
    "isOk ^ true .",
    "make ^ Array new .",
    "run x := y := 1 .",
    "between: lo and: hi ^ lo <= hi .",
    "initialize",
];

fn valid_method() -> impl Strategy<Value = String> {
    prop::sample::select(METHODS).prop_map(std::string::ToString::to_string)
}

fn near_valid_method() -> impl Strategy<Value = String> {
    prop_oneof![
        valid_method(),
        // Truncated at an arbitrary ASCII boundary.
        (valid_method(), 0.0..1.0f64).prop_map(|(s, frac)| {
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_precision_loss,
                clippy::cast_sign_loss,
                reason = "fraction of a small test string length"
            )]
            let mut cut = (s.len() as f64 * frac) as usize;
            while cut > 0 && !s.is_char_boundary(cut) {
                cut -= 1;
            }
            s[..cut].to_string()
        }),
        // Concatenated fragments (usually invalid, must not panic).
        (valid_method(), valid_method()).prop_map(|(a, b)| format!("{a} {b}")),
    ]
}

// ============================================================================
// Helpers
// ============================================================================

/// Checks the keyword arity invariant on every send in the tree.
fn keyword_arity_holds(expr: &Expression) -> bool {
    match expr {
        Expression::Literal(..) | Expression::Variable(_) => true,
        Expression::Assignment { value, .. } | Expression::Return { value, .. } => {
            keyword_arity_holds(value)
        }
        Expression::MessageSend {
            receiver,
            selector,
            arguments,
            ..
        } => {
            selector_arity_matches(selector, arguments.len())
                && keyword_arity_holds(receiver)
                && arguments.iter().all(keyword_arity_holds)
        }
        Expression::Cascade {
            receiver, messages, ..
        } => {
            keyword_arity_holds(receiver)
                && messages.iter().all(|m| {
                    selector_arity_matches(&m.selector, m.arguments.len())
                        && m.arguments.iter().all(keyword_arity_holds)
                })
        }
        Expression::Block(block) => block.body.iter().all(keyword_arity_holds),
    }
}

fn selector_arity_matches(selector: &MessageSelector, argument_count: usize) -> bool {
    let colon_parts = selector.name().matches(':').count();
    match selector {
        MessageSelector::Unary(_) => argument_count == 0 && colon_parts == 0,
        MessageSelector::Binary(_) => argument_count == 1 && colon_parts == 0,
        MessageSelector::Keyword(_) => colon_parts == argument_count,
    }
}

fn method_arity_holds(method: &Method) -> bool {
    method.selector.arity() == method.parameters.len()
        && method.body.iter().all(keyword_arity_holds)
}

// ============================================================================
// Property tests
// ============================================================================

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: `lex` never panics on arbitrary input.
    #[test]
    fn lex_never_panics(input in "\\PC{0,300}") {
        let _result = lex(&input);
    }

    /// Property 2: `parse_source` never panics, even on truncated or
    /// concatenated input.
    #[test]
    fn parse_never_panics(input in near_valid_method()) {
        let _result = parse_source(&input);
    }

    /// Property 2b: `parse_source` never panics on arbitrary input.
    #[test]
    fn parse_never_panics_arbitrary(input in "\\PC{0,300}") {
        let _result = parse_source(&input);
    }

    /// Property 3: every keyword selector's `:` count equals its
    /// argument count, throughout the parsed tree.
    #[test]
    fn keyword_selector_arity_law(input in valid_method()) {
        let method = parse_source(&input).expect("valid methods parse");
        prop_assert!(method_arity_holds(&method), "arity violated for {input:?}");
    }

    /// Property 4: unparse then re-parse reaches a fixed point.
    ///
    /// Spans differ after a round trip, so the law is stated on the
    /// unparsed text rather than on AST equality.
    #[test]
    fn unparse_roundtrip_is_fixed_point(input in valid_method()) {
        let method = parse_source(&input).expect("valid methods parse");
        let once = unparse_method(&method);
        let reparsed = parse_source(&once).expect("unparsed source re-parses");
        let twice = unparse_method(&reparsed);
        prop_assert_eq!(once, twice, "round trip diverged for {:?}", input);
    }

    /// Property 4b: the round trip preserves the selector and shape.
    #[test]
    fn unparse_roundtrip_preserves_structure(input in valid_method()) {
        let method = parse_source(&input).expect("valid methods parse");
        let reparsed = parse_source(&unparse_method(&method)).expect("re-parses");
        prop_assert_eq!(method.selector.name(), reparsed.selector.name());
        prop_assert_eq!(method.parameters.len(), reparsed.parameters.len());
        prop_assert_eq!(method.temporaries.len(), reparsed.temporaries.len());
        prop_assert_eq!(method.body.len(), reparsed.body.len());
    }
}
