use criterion::{Criterion, criterion_group, criterion_main};
use ringwick::newick::{BranchLengthFormat, NewickParser, NewickWriter};
use std::hint::black_box;

const REGRESSION_TREE_SIZES: &[(&str, usize)] = &[("n64", 64), ("n512", 512), ("n4096", 4096)];

const REPORTING_TREE_SIZES: &[(&str, usize)] = &[("n32768", 32768)];

/// Balanced unrooted tree on `num_tips` tips as Newick string.
fn balanced_newick(num_tips: usize) -> String {
    fn subtree(first: usize, count: usize, newick: &mut String) {
        if count == 1 {
            newick.push_str(&format!("taxon_{first}:0.{first}"));
            return;
        }
        let left = count / 2;
        newick.push('(');
        subtree(first, left, newick);
        newick.push(',');
        subtree(first + left, count - left, newick);
        newick.push_str(&format!("){count}:0.5"));
    }

    let mut newick = String::from("(");
    subtree(0, 1, &mut newick);
    newick.push(',');
    subtree(1, 1, &mut newick);
    newick.push(',');
    subtree(2, num_tips - 2, &mut newick);
    newick.push_str(");");
    newick
}

/// Same number of trees repeated, one per line.
fn tree_file(num_tips: usize, num_trees: usize) -> String {
    let tree = balanced_newick(num_tips);
    let mut input = String::with_capacity((tree.len() + 1) * num_trees);
    for _ in 0..num_trees {
        input.push_str(&tree);
        input.push('\n');
    }
    input
}

fn newick_parsing(c: &mut Criterion) {
    for (name, num_tips) in REGRESSION_TREE_SIZES {
        let input = tree_file(*num_tips, 100);
        c.bench_function(&format!("parse {name}"), |b| {
            b.iter(|| NewickParser::new().parse_all(black_box(input.as_str())).unwrap());
        });
    }
}

fn newick_writing(c: &mut Criterion) {
    let writer = NewickWriter::new().with_length_format(BranchLengthFormat::Shortest);
    for (name, num_tips) in REGRESSION_TREE_SIZES {
        let tree = NewickParser::new()
            .parse(&balanced_newick(*num_tips), 0)
            .unwrap()
            .0;
        let start = tree.find_tip("taxon_1").unwrap();
        c.bench_function(&format!("write {name}"), |b| {
            b.iter(|| writer.write(black_box(&tree), start).unwrap());
        });
    }
}

fn newick_reporting(c: &mut Criterion) {
    for (name, num_tips) in REPORTING_TREE_SIZES {
        let input = tree_file(*num_tips, 10);
        c.bench_function(&format!("parse {name}"), |b| {
            b.iter(|| NewickParser::new().parse_all(black_box(input.as_str())).unwrap());
        });
    }
}

criterion_group!(regression, newick_parsing, newick_writing);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = newick_reporting
}
criterion_main!(regression, reporting);
