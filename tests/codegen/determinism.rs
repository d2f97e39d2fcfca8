//! Property tests for generation
//!
//! Identical input must give byte-identical output, and the spelling of a
//! type must not change what it resolves to.

use std::path::Path;

use bindery_analysis::analyze_file;
use bindery_codegen::generate;
use bindery_syntax::parse_source;
use proptest::prelude::*;

fn generate_source(source: &str) -> Option<String> {
    let path = Path::new("Graph.swift");
    let tree = parse_source(source, path).ok()?;
    let file = analyze_file(&tree, path).ok()?;
    let analysis = bindery_analysis::Analysis::new(file.components, file.imports);
    generate(&analysis, "GraphContainer").ok()
}

/// A random acyclic component graph: component `i` may depend on any
/// `j < i`, on a few unprovided types, and may be a singleton.
fn graph_source() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            prop::collection::btree_set(0usize..12, 0..4),
            prop::collection::btree_set(0usize..5, 0..3),
            any::<bool>(),
        ),
        1..12,
    )
    .prop_map(|nodes| {
        nodes
            .iter()
            .enumerate()
            .map(|(i, (deps, externals, singleton))| {
                let head = if *singleton {
                    "@Singleton final class"
                } else {
                    "@Reusable struct"
                };
                let params: Vec<String> = deps
                    .iter()
                    .filter(|&&d| d < i)
                    .map(|d| format!("n{d}: Node{d}"))
                    .chain(externals.iter().map(|e| format!("x{e}: Service{e}")))
                    .collect();
                format!("{head} Node{i} {{ @Inject init({}) {{}} }}\n", params.join(", "))
            })
            .collect()
    })
}

/// Inserts random whitespace between the tokens of a type.
fn respelled(parts: &[&str], gaps: &[bool]) -> String {
    parts
        .iter()
        .zip(gaps.iter().chain(std::iter::repeat(&false)))
        .map(|(part, gap)| if *gap { format!("{part} ") } else { (*part).to_string() })
        .collect()
}

proptest! {
    #[test]
    fn generation_is_byte_identical(source in graph_source()) {
        let first = generate_source(&source);
        let second = generate_source(&source);
        prop_assert!(first.is_some());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn type_spelling_does_not_change_output(gaps in prop::collection::vec(any::<bool>(), 8)) {
        let parts = ["[", "String", ":", "[", "Int", "]", "]", "?"];
        let dependency = respelled(&parts, &gaps);
        let canonical = "@Reusable struct Feed { @Inject init(index: [String: [Int]]?) {} }";
        let spelled = format!("@Reusable struct Feed {{ @Inject init(index: {dependency}) {{}} }}");
        prop_assert_eq!(generate_source(canonical), generate_source(&spelled));
    }
}
