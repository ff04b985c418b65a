// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for the public compilation pipeline.
//!
//! Each test drives `smalltix_core::compile` on a complete method and
//! checks the emitted scripts against the runtime's documented
//! conventions: `self=$1` receiver binding, `./send` dispatch with
//! mangled selectors, tagged numeric literals, file-backed instance
//! variables, and extracted block scripts with captured bindings.

use smalltix_core::codegen::CompiledMethod;
use smalltix_core::error::Error;

fn compile(source: &str) -> CompiledMethod {
    smalltix_core::compile(source).expect("compiles cleanly")
}

#[test]
fn tail_return_streams_result_directly() {
    let compiled = compile("double ^ self + self .");
    assert!(compiled.primary.contents.ends_with("./send $self + $self"));
    // No intermediate capture of the dispatcher result.
    assert!(!compiled.primary.contents.contains("tmp1"));
}

#[test]
fn setter_writes_instance_variable_file() {
    let compiled = compile("setX: n x := n .");
    let lines: Vec<&str> = compiled.primary.contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            "# setX: n x := n .",
            "#",
            "self=$1",
            "n=$2",
            "echo $n > $self/x"
        ]
    );
}

#[test]
fn numeric_literals_carry_kind_tags() {
    let compiled = compile("foo ^ 3 + 4 .");
    assert!(compiled.primary.contents.contains("./send int/3 + int/4"));

    let compiled = compile("half ^ 0.5 .");
    assert!(compiled.primary.contents.contains("echo float/0.5"));
}

#[test]
fn cascade_sends_in_order_to_one_receiver() {
    let compiled = compile("run coll add: 1; add: 2; yourself .");
    let contents = &compiled.primary.contents;
    let read = contents.find("$(cat $self/coll)").expect("receiver read");
    let first = contents.find("add- int/1").expect("first send");
    let second = contents.find("add- int/2").expect("second send");
    let last = contents.find("yourself").expect("last send");
    assert!(read < first && first < second && second < last);
}

#[test]
fn block_compiles_to_sibling_script_with_closure() {
    let compiled = compile("run coll do: [ :each | each printNl ] .");

    assert_eq!(compiled.blocks.len(), 1);
    assert_eq!(compiled.blocks[0].name, "run~block1");

    // Use site: one-element capture container plus a closure value.
    let contents = &compiled.primary.contents;
    assert!(contents.contains("./send Array with- $self"));
    assert!(contents.contains("./send BlockClosure script-bindings- run~block1"));

    // The extracted script takes the receiver plus the block parameter.
    let block_lines: Vec<&str> = compiled.blocks[0].contents.lines().collect();
    assert_eq!(
        block_lines,
        vec![
            "# each printNl",
            "#",
            "self=$1",
            "each=$2",
            "./send $each printNl"
        ]
    );
}

#[test]
fn nested_and_sibling_block_names_are_unique() {
    let compiled = compile("run a do: [ :x | c do: [ :y | x ] ] . b do: [ :z | z ] .");
    let mut names: Vec<_> = compiled.scripts().map(|s| s.name.clone()).collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total);
    assert!(names.iter().any(|n| n == "run~block1~block1"));
    assert!(names.iter().any(|n| n == "run~block2"));
}

#[test]
fn string_literal_as_value_fails_with_no_output() {
    let result = smalltix_core::compile("greet ^ 'hello' .");
    match result {
        Err(Error::CodeGen(error)) => {
            assert!(error.to_string().contains("string literals"));
        }
        other => panic!("expected an unsupported-feature error, got {other:?}"),
    }
}

#[test]
fn lex_and_parse_errors_surface_through_compile() {
    assert!(matches!(
        smalltix_core::compile("run ^ {"),
        Err(Error::Lex(_))
    ));
    assert!(matches!(
        smalltix_core::compile("run ^ [ :x | x"),
        Err(Error::Parse(_))
    ));
}

#[test]
fn primary_script_is_named_by_mangled_selector() {
    assert_eq!(compile("at: i put: v ^ v .").primary.name, "at-put-");
    assert_eq!(compile("+ other ^ other .").primary.name, "+");
    assert_eq!(compile("size ^ 0 .").primary.name, "size");
}
