use std::fs;
use std::io::Cursor;

use axiom_loader::legacy;
use axiom_loader::script::{self, ConcreteNode, ConcreteNodeKind, ConcreteTree, ScriptError};

fn tokens<'t>(nodes: impl Iterator<Item = &'t ConcreteNode>) -> Vec<&'t str> {
    nodes.map(|n| n.token.as_str()).collect()
}

/// Follows the child with each token in turn, starting from `root`.
fn descend<'t>(tree: &'t ConcreteTree, root: &'t ConcreteNode, path: &[&str]) -> &'t ConcreteNode {
    path.iter().fold(root, |node, step| {
        node.children
            .iter()
            .map(|id| &tree[*id])
            .find(|child| child.token == *step)
            .unwrap_or_else(|| panic!("no `{step}` under `{}`", node.token))
    })
}

#[test]
fn parses_material_fixture() {
    let source = fs::read_to_string("tests/fixtures/example.material").unwrap();
    let tree = script::compile(&source, "example.material").expect("valid script");

    let roots = tokens(tree.root_nodes());
    assert_eq!(roots, vec!["import", "material", "material"]);

    let import = &tree[tree.roots()[0]];
    assert_eq!(import.kind, ConcreteNodeKind::Import);
    let import_args = tokens(tree.children(tree.roots()[0]));
    assert_eq!(import_args, vec!["*", "base.material"]);

    let rock = &tree[tree.roots()[1]];
    let rock_children = tokens(tree.children(tree.roots()[1]));
    assert_eq!(rock_children, vec!["Examples/Rock", ":", "{", "}"]);
    let base = descend(&tree, rock, &[":", "Examples/Base"]);
    assert_eq!(base.line, 4);

    let pass_block = descend(&tree, rock, &["{", "technique", "{", "pass", "{"]);
    let statements: Vec<_> = pass_block
        .children
        .iter()
        .map(|id| (tree[*id].token.as_str(), tree[*id].line))
        .collect();
    assert_eq!(
        statements,
        vec![("ambient", 10), ("diffuse", 11), ("texture_unit", 13)]
    );

    let texture = descend(&tree, pass_block, &["texture_unit", "{", "texture"]);
    let file = &tree[texture.children[0]];
    assert_eq!(file.token, "rock face.png");
    assert_eq!(file.kind, ConcreteNodeKind::Quote);
    assert_eq!(file.line, 15);
    assert_eq!(file.file, "example.material");

    let moss = tokens(tree.children(tree.roots()[2]));
    assert_eq!(moss, vec!["Examples/Moss", "{", "}"]);
}

#[test]
fn reports_malformed_import_with_line() {
    let source = "material A\n{\n}\nimport \"x\" from\n";
    let err = script::compile(source, "bad.material").unwrap_err();

    assert_eq!(err.line(), 4);
    assert!(matches!(err, ScriptError::MalformedImport { expected: "source", .. }));
    assert_eq!(err.to_string(), "bad.material(4): expected import source");
}

#[test]
fn reads_legacy_fixture_line_by_line() {
    let source = fs::read_to_string("tests/fixtures/legacy.material").unwrap();
    let mut reader = Cursor::new(source);

    assert_eq!(
        legacy::read_line(&mut reader).unwrap().as_deref(),
        Some("// line-per-directive material")
    );
    assert_eq!(
        legacy::read_line(&mut reader).unwrap().as_deref(),
        Some("Examples/OldRock")
    );

    // into the pass block
    for _ in 0..3 {
        legacy::skip_to_next_open_brace(&mut reader).unwrap();
    }

    let ambient = legacy::read_line(&mut reader).unwrap().unwrap();
    let values = legacy::split_line(&ambient);
    assert_eq!(values[0], "ambient");
    let color = legacy::parse_color_directive(&values, "Examples/OldRock").unwrap();
    assert_eq!((color.r, color.g, color.b, color.a), (0.5, 0.5, 0.5, 1.0));

    let lighting = legacy::read_line(&mut reader).unwrap().unwrap();
    let values = legacy::split_line(&lighting);
    assert_eq!(values, vec!["lighting", "on"]);
    assert!(legacy::parse_bool(values[1]));

    legacy::skip_to_next_close_brace(&mut reader).unwrap();
    legacy::skip_to_next_close_brace(&mut reader).unwrap();
    assert_eq!(legacy::read_line(&mut reader).unwrap().as_deref(), Some("}"));
    assert_eq!(legacy::read_line(&mut reader).unwrap(), None);
}
