use ringwick::model::NO_SUPPORT;
use ringwick::newick::{self, NewickParser};
use ringwick::parser::{InMemoryInput, ParsingErrorType};
use ringwick::{RingTree, parse_newick_file, parse_newick_str};
use std::path::Path;

const EPSILON: f64 = 1e-9;

/// Returns the sorted tip labels of a tree.
fn sorted_labels(tree: &RingTree) -> Vec<String> {
    let mut labels: Vec<String> = tree.tip_labels().iter().map(|l| l.to_string()).collect();
    labels.sort();
    labels
}

// --- TESTS FOR PSEUDO-ROOT ---

#[test]
fn test_basic_pseudo_root() {
    let tree = parse_newick_str("(A:1,B:2,C:3);").unwrap();

    assert!(tree.is_valid());
    assert!(tree.is_unrooted());
    assert_eq!(tree.num_tips(), 3);
    assert_eq!(tree.num_inner(), 1);
    assert_eq!(tree.num_edges(), 3);

    let entry = tree.entry().unwrap();
    let root = tree.vertex_of(entry);
    assert!(root.is_inner());
    assert_eq!(root.support(), None);

    // Ring slots: next -> left, next.next -> right, primary -> third
    let expected = [("A", 1.0), ("B", 2.0), ("C", 3.0)];
    let slots = [tree.next(entry), tree.next(tree.next(entry)), entry];
    for (slot, (label, length)) in slots.iter().zip(expected) {
        let child = tree.back(*slot).unwrap();
        assert_eq!(tree.vertex_of(child).label(), Some(label));
        assert!((tree.half_edge(*slot).back_length() - length).abs() < EPSILON);
        assert!((tree.half_edge(child).back_length() - length).abs() < EPSILON);
    }
}

#[test]
fn test_nested_bifurcation() {
    let tree = parse_newick_str("(A:1,(B:2,C:3)90:4,D:5);").unwrap();
    assert!(tree.is_valid());
    assert_eq!(tree.num_tips(), 4);
    assert_eq!(tree.num_inner(), 2);

    let entry = tree.entry().unwrap();
    let second_slot = tree.next(tree.next(entry));
    let inner = tree.back(second_slot).unwrap();

    let vertex = tree.vertex_of(inner);
    assert!(vertex.is_inner());
    assert_eq!(vertex.support(), Some(90.0));
    assert!((tree.half_edge(inner).back_length() - 4.0).abs() < EPSILON);
    assert_eq!(tree.half_edge(inner).back_support(), None);

    // Child edges of the bifurcating vertex carry its support
    let b = tree.back(tree.next(inner)).unwrap();
    let c = tree.back(tree.next(tree.next(inner))).unwrap();
    assert_eq!(tree.vertex_of(b).label(), Some("B"));
    assert_eq!(tree.vertex_of(c).label(), Some("C"));
    assert!((tree.half_edge(b).back_length() - 2.0).abs() < EPSILON);
    assert!((tree.half_edge(c).back_length() - 3.0).abs() < EPSILON);
    assert_eq!(tree.half_edge(b).back_support(), Some(90.0));
    assert_eq!(tree.half_edge(c).back_support_or_sentinel(), 90.0);
}

#[test]
fn test_no_lengths() {
    let tree = parse_newick_str("(A,B,(C,D));").unwrap();
    assert!(tree.is_valid());
    assert_eq!(sorted_labels(&tree), vec!["A", "B", "C", "D"]);
    assert_eq!(tree.total_branch_length(), 0.0);
    assert_eq!(tree.num_edges(), 5);
}

#[test]
fn test_whitespace() {
    let tree = parse_newick_str("  ( A : 1 ,\tB:2 , ( C :3, D:4 ) 75 : 0.5 ) ;  ").unwrap();
    assert!(tree.is_valid());
    assert_eq!(sorted_labels(&tree), vec!["A", "B", "C", "D"]);
    assert!((tree.total_branch_length() - 10.5).abs() < EPSILON);

    let c = tree.find_tip("C").unwrap();
    let inner = tree.back(c).unwrap();
    assert_eq!(tree.vertex_of(inner).support(), Some(75.0));
}

#[test]
fn test_scientific_branch_lengths() {
    let tree = parse_newick_str("(A:1e-3,B:2.5E2,C:+0.5);").unwrap();
    let a = tree.find_tip("A").unwrap();
    let b = tree.find_tip("B").unwrap();
    let c = tree.find_tip("C").unwrap();
    assert!((tree.half_edge(a).back_length() - 0.001).abs() < EPSILON);
    assert!((tree.half_edge(b).back_length() - 250.0).abs() < EPSILON);
    assert!((tree.half_edge(c).back_length() - 0.5).abs() < EPSILON);
}

// --- TESTS FOR SUPPORT AND BRANCH LABELS ---

#[test]
fn test_support_labels() {
    let cases = [
        ("100", Some(100.0)),
        ("1", Some(1.0)),
        ("0", None),
        ("07", None),
        ("abc", None),
        ("0.95", None),
        ("", None),
    ];

    for (label, expected) in cases {
        let newick = format!("(A:1,B:1,(C:1,D:1){label}:1);");
        let tree = parse_newick_str(&newick).unwrap();
        let c = tree.find_tip("C").unwrap();
        let inner = tree.back(c).unwrap();

        assert_eq!(tree.vertex_of(inner).support(), expected, "label {label:?}");
        assert_eq!(
            tree.vertex_of(inner).support_or_sentinel(),
            expected.unwrap_or(NO_SUPPORT)
        );
    }
}

#[test]
fn test_branch_label_on_both_sides() {
    let tree = parse_newick_str("(A:1.5[comment],B:1,C:1);").unwrap();
    let a = tree.find_tip("A").unwrap();
    let parent = tree.back(a).unwrap();

    assert_eq!(tree.half_edge(a).back_label(), Some("comment"));
    assert_eq!(tree.half_edge(parent).back_label(), Some("comment"));
    assert!((tree.half_edge(parent).back_length() - 1.5).abs() < EPSILON);

    let b = tree.find_tip("B").unwrap();
    assert_eq!(tree.half_edge(b).back_label(), None);
}

#[test]
fn test_brackets_without_length_belong_to_label() {
    // Tip labels run until ':', ',', ')' or ';'
    let tree = parse_newick_str("(A[x],B,C);").unwrap();
    assert!(tree.find_tip("A[x]").is_some());
    assert_eq!(tree.half_edge(tree.find_tip("A[x]").unwrap()).back_label(), None);
}

// --- TESTS FOR ROOTED TREES ---

#[test]
fn test_rooted_tree() {
    let tree = parse_newick_str("((A:1,B:2):3,C:4);").unwrap();
    assert!(tree.is_valid());
    assert!(!tree.is_unrooted());
    assert_eq!(tree.num_tips(), 3);
    assert_eq!(tree.num_inner(), 2);

    // Bifurcating top-level vertex keeps its primary half-edge unlinked
    let entry = tree.entry().unwrap();
    assert_eq!(tree.back(entry), None);
    assert!((tree.total_branch_length() - 10.0).abs() < EPSILON);
}

#[test]
fn test_rooted_tree_with_root_branch() {
    let tree = parse_newick_str("((A:1,B:2)95:3,C:4)root:0.25[origin];").unwrap();
    assert!(tree.is_valid());
    // The root branch has no edge to attach to
    assert!((tree.total_branch_length() - 10.0).abs() < EPSILON);
    assert_eq!(tree.vertex_of(tree.entry().unwrap()).support(), None);
}

#[test]
fn test_optional_semicolon() {
    let tree = parse_newick_str("(A,B,C)").unwrap();
    assert_eq!(tree.num_tips(), 3);
}

#[test]
fn test_optional_semicolon_rooted() {
    let tree = parse_newick_str("((A:1,B:2):3,C:4)").unwrap();
    assert!(tree.is_valid());
    assert!(!tree.is_unrooted());
    assert_eq!(tree.num_tips(), 3);
    assert!((tree.total_branch_length() - 10.0).abs() < EPSILON);

    // Node label running into the end of input
    let tree = parse_newick_str("((A:1,B:2)95:3,C:4)100").unwrap();
    assert_eq!(tree.vertex_of(tree.entry().unwrap()).support(), Some(100.0));

    let (tree, end) = NewickParser::new().parse("((A,B),C)", 0).unwrap();
    assert_eq!(end, 9);
    assert_eq!(tree.num_inner(), 2);
}

#[test]
fn test_parse_returns_position() {
    let input = "(A:1,B:2,C:3)  ;(D,E,F);";
    let (tree, end) = newick::parse(input, 0).unwrap();
    assert_eq!(tree.num_tips(), 3);
    assert_eq!(&input[end..], ";(D,E,F);");

    let (tree, end) = newick::parse(input, end + 1).unwrap();
    assert_eq!(sorted_labels(&tree), vec!["D", "E", "F"]);
    assert_eq!(end, input.len() - 1);
}

// --- TESTS FOR CORRUPT INPUT ---

#[test]
fn test_missing_comma() {
    let err = parse_newick_str("(A:1 B:2,C:3);").unwrap_err();
    assert_eq!(
        err.kind(),
        &ParsingErrorType::UnexpectedCharacter {
            expected: ",".to_string(),
            found: 'B'
        }
    );
    assert_eq!(err.position(), 5);
}

#[test]
fn test_unterminated_tree() {
    let err = parse_newick_str("(A:1,B:2").unwrap_err();
    assert!(matches!(
        err.kind(),
        ParsingErrorType::UnterminatedToken { .. }
    ));
}

#[test]
fn test_unmatched_parentheses() {
    assert!(parse_newick_str("((A,B),C;").is_err());
    assert!(parse_newick_str("(A,B,C));").is_err());
}

#[test]
fn test_invalid_branch_length() {
    let err = parse_newick_str("(A:x,B:1,C:1);").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::MalformedNumber(String::new()));
    assert_eq!(err.position(), 3);

    let err = parse_newick_str("(A:1-2,B:1,C:1);").unwrap_err();
    assert_eq!(
        err.kind(),
        &ParsingErrorType::MalformedNumber("1-2".to_string())
    );
}

#[test]
fn test_unclosed_branch_label() {
    let err = parse_newick_str("(A:1[never,B:1,C:1);").unwrap_err();
    assert_eq!(
        err.kind(),
        &ParsingErrorType::UnterminatedToken {
            expected: "]".to_string()
        }
    );
}

#[test]
fn test_nested_pseudo_root() {
    assert!(parse_newick_str("(A,(B,C,D),E);").is_err());
}

#[test]
fn test_single_child() {
    assert!(parse_newick_str("(A);").is_err());
}

#[test]
fn test_empty_input() {
    let err = parse_newick_str("").unwrap_err();
    assert!(matches!(
        err.kind(),
        ParsingErrorType::UnterminatedToken { .. }
    ));
}

#[test]
fn test_error_context() {
    let err = parse_newick_str("(A:1,B:2;C:3);").unwrap_err();
    assert_eq!(err.position(), 8);
    assert_eq!(err.context(), ";C:3);");
    assert!(err.to_string().contains("at position 8"));
}

// --- TESTS FOR MULTIPLE TREES ---

#[test]
fn test_parse_all() {
    let input = "(A,B,C);\n((A,B),C);\n\n  (A:1,(B:1,C:1):1,D:1);\n";
    let trees = NewickParser::new().parse_all(input).unwrap();

    assert_eq!(trees.len(), 3);
    assert!(trees[0].is_unrooted());
    assert!(!trees[1].is_unrooted());
    assert_eq!(trees[2].num_tips(), 4);
    assert!(trees.iter().all(|t| t.is_valid()));
}

#[test]
fn test_parse_all_requires_semicolon() {
    let input = "(A,B,C);\n(D,E,F)\n";
    let err = NewickParser::new().parse_all(input).unwrap_err();
    assert!(matches!(
        err.kind(),
        ParsingErrorType::UnexpectedCharacter { found: '\n', .. }
    ));
}

#[test]
fn test_iterator() {
    let input = InMemoryInput::for_str("(A,B,C);\n(D,E,F);\n(G,H,I)x;");
    let mut iter = NewickParser::new().into_iter(input);

    let first = iter.next().unwrap().unwrap();
    assert_eq!(sorted_labels(&first), vec!["A", "B", "C"]);
    let second = iter.next().unwrap().unwrap();
    assert_eq!(sorted_labels(&second), vec!["D", "E", "F"]);

    // A node label after a pseudo-root is not part of the format
    assert!(iter.next().unwrap().is_err());
    assert!(iter.next().is_none());

    let parser = iter.into_parser();
    assert_eq!(parser.num_tips(), 3);
}

#[test]
fn test_iterator_empty_input() {
    let mut iter = NewickParser::new().into_iter(" \n\t\n".to_string());
    assert!(iter.next().is_none());
}

#[test]
fn test_num_tips_configuration() {
    let mut parser = NewickParser::new().with_num_tips(6);
    assert_eq!(parser.num_tips(), 6);
    let (tree, _) = parser.parse("(A,B,C)", 0).unwrap();
    assert_eq!(tree.num_tips(), 3);
    // Configured value is kept
    assert_eq!(parser.num_tips(), 6);
}

// --- TESTS WITH FILE ---

#[test]
fn test_parse_file() {
    let path = Path::new("tests").join("fixtures").join("ratites_t3.nwk");
    let trees = parse_newick_file(&path).unwrap();

    assert_eq!(trees.len(), 3);
    for tree in &trees {
        assert!(tree.is_valid());
        assert_eq!(tree.num_tips(), 6);
    }
    assert_eq!(trees[0].num_inner(), 4);
    assert_eq!(trees[1].num_inner(), 5);
    assert_eq!(trees[2].num_inner(), 4);

    assert!((trees[0].total_branch_length() - 0.8).abs() < EPSILON);
    assert!((trees[1].total_branch_length() - 0.8).abs() < EPSILON);
    assert_eq!(sorted_labels(&trees[0]), sorted_labels(&trees[2]));

    let kiwi = trees[0].find_tip("Apteryx_owenii").unwrap();
    let parent = trees[0].back(kiwi).unwrap();
    assert_eq!(trees[0].vertex_of(parent).support(), Some(97.0));
}

#[test]
fn test_parse_missing_file() {
    let err = parse_newick_file("tests/fixtures/does_not_exist.nwk").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::IoError(_)));
}
