// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for Smalltix code generation.
//!
//! These tests verify that the code generator handles all parsed ASTs
//! safely:
//!
//! 1. **`compile` never panics** — it returns Ok or Err on any input
//! 2. **Script names are pairwise distinct** — including sibling and
//!    nested block scripts
//! 3. **Every script binds the receiver first** — `self=$1` follows the
//!    comment header in every generated script
//! 4. **Capture containers lead with the receiver** — the first captured
//!    value is always `$self`

use proptest::prelude::*;

use crate::compile;

// ============================================================================
// Generators
// ============================================================================

/// Valid method sources, weighted towards block-heavy shapes.
const METHODS: &[&str] = &[
    "double ^ self + self .",
    "setX: n x := n .",
    "foo ^ 3 + 4 .",
    "run | a b | a := 1 . b := a + 2 . ^ b .",
    "run coll add: 1; add: 2; yourself .",
    "run ^ coll add: 1; yourself .",
    "run coll do: [ :each | each printNl ] .",
    "run a do: [ :x | x ] . b do: [ :y | y ] .",
    "run a do: [ :x | b do: [ :y | x + y ] ] .",
    "collect: n | acc | acc := n . ^ [ :e | acc + e ] .",
    "run: e | a b c d | ^ [ :x | a + x ] .",
    "run | f | f := [ :x | x ] . ^ f .",
    "run ^ [ :x | | t | t := x . t ] .",
];

fn valid_method() -> impl Strategy<Value = String> {
    prop::sample::select(METHODS).prop_map(std::string::ToString::to_string)
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

    /// Property 1: `compile` never panics on arbitrary input.
    #[test]
    fn compile_never_panics(input in "\\PC{0,300}") {
        let _result = compile(&input);
    }

    /// Property 2: all script names within one compilation are distinct.
    #[test]
    fn script_names_are_pairwise_distinct(input in valid_method()) {
        let compiled = compile(&input).expect("valid methods compile");
        let names: Vec<_> = compiled.scripts().map(|s| s.name.clone()).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        prop_assert_eq!(names.len(), deduped.len(), "duplicate script name in {:?}", input);
    }

    /// Property 3: every generated script binds the receiver from `$1`
    /// immediately after its comment header.
    #[test]
    fn every_script_binds_receiver_first(input in valid_method()) {
        let compiled = compile(&input).expect("valid methods compile");
        for script in compiled.scripts() {
            let first_code_line = script
                .contents
                .lines()
                .find(|line| !line.starts_with('#'));
            prop_assert_eq!(
                first_code_line,
                Some("self=$1"),
                "script {} does not bind the receiver first",
                script.name,
            );
        }
    }

    /// Property 4: every captured-bindings container leads with `$self`,
    /// whichever construction path was taken.
    #[test]
    fn capture_container_leads_with_receiver(input in valid_method()) {
        let compiled = compile(&input).expect("valid methods compile");
        for line in compiled.primary.contents.lines() {
            if line.contains("./send Array with-") {
                prop_assert!(
                    line.contains("- $self"),
                    "capture container does not start with $self: {line}",
                );
            }
            if line.contains("at-put- int/1 ") {
                prop_assert!(
                    line.ends_with("int/1 $self)"),
                    "first indexed capture is not $self: {line}",
                );
            }
        }
    }
}
