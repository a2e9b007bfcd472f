//! Behavior of the built-in rule catalog on representative sources.
//!
//! Drives the engine and batch driver with the compiled default catalog and
//! checks the concrete rewrites, guard gating and idempotence of every shipped
//! rule set.

use std::path::{Path, PathBuf};

use srcfix::batch::{BatchOptions, run_batch};
use srcfix::core::engine::{rewrite_unit, unstable_rule_sets};
use srcfix::core::rule_set::RuleSet;
use srcfix::core::types::{FileUnit, Summary};
use srcfix::io::config::SrcfixConfig;
use srcfix::io::writer::FsWriter;
use srcfix::test_support::{RecordingReporter, SourceTree, SpyWriter};

const SAMPLES: &[(&str, &str)] = &[
    (
        "src/components/Status.tsx",
        "import { Badge } from \"@/components/ui/Badge\";\nimport { Card } from '@/components/ui/Card';\n\nexport const Status = () => <Badge>ok</Badge>;\n",
    ),
    (
        "src/app/page.tsx",
        "\"use client\";\nimport React from \"react\";\nimport { useState } from \"react\";\n\nexport default function Page() {\n  return <p>Say \"hi\" to them</p>;\n}\n",
    ),
    (
        "src/lib/util.ts",
        "import { } from \"./types\";\nimport React from 'react';\nexport const x = 1;\n",
    ),
    (
        "src/components/Quote.jsx",
        "export const Quote = () => <blockquote>\"a\" and \"b\"</blockquote>;\n",
    ),
];

fn catalog() -> Vec<RuleSet> {
    SrcfixConfig::builtin()
        .expect("builtin")
        .compile()
        .expect("compile")
}

fn rewrite(path: &str, content: &str) -> (String, Vec<String>) {
    let mut unit = FileUnit::new(PathBuf::from(path), content.to_string());
    let applied = rewrite_unit(&mut unit, &catalog());
    (unit.current, applied)
}

#[test]
fn badge_import_is_lowercased_exactly_once() {
    let input = "import { Badge } from \"@/components/ui/Badge\";\nconst label = \"Badge\";\n";
    let (output, applied) = rewrite("src/a.ts", input);
    assert_eq!(
        output,
        "import { Badge } from \"@/components/ui/badge\";\nconst label = \"Badge\";\n"
    );
    assert_eq!(output.matches("@/components/ui/badge").count(), 1);
    assert_eq!(applied, vec!["ui-import-casing"]);
}

#[test]
fn single_quoted_imports_keep_their_quotes() {
    let (output, _) = rewrite("src/a.ts", "import { Tabs } from '@/components/ui/Tabs';\n");
    assert_eq!(output, "import { Tabs } from '@/components/ui/tabs';\n");
}

#[test]
fn unknown_components_are_left_alone() {
    let input = "import { DataGrid } from \"@/components/ui/DataGrid\";\n";
    let (output, applied) = rewrite("src/a.ts", input);
    assert_eq!(output, input);
    assert!(applied.is_empty());
}

#[test]
fn react_import_removed_only_in_client_components() {
    let client = "\"use client\";\nimport React from \"react\";\nexport const A = 1;\n";
    let (output, applied) = rewrite("src/a.tsx", client);
    assert_eq!(output, "\"use client\";\nexport const A = 1;\n");
    assert_eq!(applied, vec!["client-react-import"]);

    let import_first = "import React from \"react\";\n\"use client\";\nexport const A = 1;\n";
    let (output, applied) = rewrite("src/a.tsx", import_first);
    assert_eq!(output, "\"use client\";\nexport const A = 1;\n");
    assert_eq!(applied, vec!["client-react-import"]);

    let server = "import React from \"react\";\nexport const A = 1;\n";
    let (output, applied) = rewrite("src/a.tsx", server);
    assert_eq!(output, server);
    assert!(applied.is_empty());
}

#[test]
fn empty_named_imports_are_removed() {
    let (output, _) = rewrite(
        "src/a.ts",
        "import {  } from \"./types\";\nimport { a } from \"./a\";\n",
    );
    assert_eq!(output, "import { a } from \"./a\";\n");
}

#[test]
fn removing_an_empty_import_does_not_join_its_neighbours() {
    let input = "import {\nimport { } from \"a\";\n} from \"b\";\nexport const x = 1;\n";
    let (once, applied) = rewrite("src/a.ts", input);
    assert_eq!(once, "import {\n} from \"b\";\nexport const x = 1;\n");
    assert_eq!(applied, vec!["empty-imports"]);

    let (twice, applied) = rewrite("src/a.ts", &once);
    assert_eq!(twice, once);
    assert!(applied.is_empty());
    assert!(unstable_rule_sets(Path::new("src/a.ts"), input, &catalog()).is_empty());
}

#[test]
fn jsx_text_quotes_are_escaped_only_in_markup_files() {
    let input = "const el = <p>Say \"hi\" and \"bye\"</p>;\n";
    let (output, applied) = rewrite("src/a.tsx", input);
    assert_eq!(output, "const el = <p>Say &quot;hi&quot; and &quot;bye&quot;</p>;\n");
    assert_eq!(applied, vec!["jsx-text-quotes"]);

    let (output, _) = rewrite("src/a.ts", input);
    assert_eq!(output, input);
}

#[test]
fn jsx_attributes_and_expressions_are_not_escaped() {
    let input = "const el = <a title=\"t\" onClick={() => go(\"x\")}>Go</a>;\n";
    let (output, _) = rewrite("src/a.tsx", input);
    assert_eq!(output, input);
}

#[test]
fn every_default_rule_set_is_idempotent_on_samples() {
    let rule_sets = catalog();
    for (path, content) in SAMPLES {
        let unstable = unstable_rule_sets(Path::new(path), content, &rule_sets);
        assert!(unstable.is_empty(), "{path}: unstable {unstable:?}");

        let (once, _) = rewrite(path, content);
        let (twice, applied) = rewrite(path, &once);
        assert_eq!(twice, once, "{path}: second pass changed content");
        assert!(applied.is_empty(), "{path}: second pass applied {applied:?}");
    }
}

#[test]
fn already_lowercase_tree_produces_no_writes_on_repeated_runs() {
    let tree = SourceTree::new().expect("tree");
    let paths = vec![
        tree.write("src/a.tsx", "import { Badge } from \"@/components/ui/badge\";\n")
            .expect("write"),
        tree.write("src/b.ts", "import { card } from '@/components/ui/card';\n")
            .expect("write"),
    ];
    let rule_sets = catalog();

    for _ in 0..2 {
        let spy = SpyWriter::default();
        let mut reporter = RecordingReporter::default();
        let summary = run_batch(&paths, &rule_sets, &spy, &mut reporter, BatchOptions::default());
        assert_eq!(
            summary,
            Summary {
                changed: 0,
                unchanged: 2,
                failed: 0
            }
        );
        assert_eq!(spy.writes(), 0);
    }
}

#[test]
fn batch_rewrites_sample_tree_on_disk() {
    let tree = SourceTree::new().expect("tree");
    let paths: Vec<PathBuf> = SAMPLES
        .iter()
        .map(|(path, content)| tree.write(path, content).expect("write"))
        .collect();
    let rule_sets = catalog();

    let mut reporter = RecordingReporter::default();
    let first = run_batch(&paths, &rule_sets, &FsWriter, &mut reporter, BatchOptions::default());
    assert_eq!(first.changed, 4);
    assert_eq!(first.failed, 0);

    let page = tree.read("src/app/page.tsx").expect("read page");
    assert!(!page.contains("import React from"));
    assert!(page.contains("import { useState } from \"react\";"));
    assert!(page.contains("<p>Say &quot;hi&quot; to them</p>"));

    // `util.ts` has no client marker, so its React import survives.
    let util = tree.read("src/lib/util.ts").expect("read util");
    assert_eq!(util, "import React from 'react';\nexport const x = 1;\n");

    let mut reporter = RecordingReporter::default();
    let second = run_batch(&paths, &rule_sets, &FsWriter, &mut reporter, BatchOptions::default());
    assert_eq!(second.changed, 0);
    assert_eq!(second.unchanged, 4);
}
