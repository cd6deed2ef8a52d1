use rand::prelude::*;

use crate::data::Record;

/// Comment categories used by [`synthetic_comments`].
pub const CATEGORIES: [&str; 4] = ["meta", "precondition", "postcondition", "instruction"];

const STATEMENTS: [&str; 6] = [
	"Block",
	"IfStatement",
	"ForStatement",
	"ReturnStatement",
	"MethodDeclaration",
	"ExpressionStatement",
];

/// Generate *synthetic* comment records with the fields of the standard
/// feature set.
///
/// Labels follow simple rules over the generated fields, with a fraction
/// `noise` of labels replaced by a random category:
/// - javadoc comments are `meta`
/// - trailing comments (same line as the previous token) are `postcondition`
/// - comments directly inside an `IfStatement` are `precondition`
/// - everything else is `instruction`
pub fn synthetic_comments(n: usize, seed: u64, noise: f64) -> Vec<Record> {
	assert!((0.0..=1.0).contains(&noise));
	let mut rng = StdRng::seed_from_u64(seed);

	(0..n)
		.map(|_| {
			let kind = ["Line", "Block", "Javadoc"][rng.gen_range(0..3)];
			let line: i64 = rng.gen_range(1..500);
			let prev_line = line - rng.gen_range(0..4);
			let cols: i64 = rng.gen_range(0..80);
			let parents = types(&mut rng, 1..4);
			let left = types(&mut rng, 0..3);
			let right = types(&mut rng, 0..3);

			let label = if rng.gen_bool(noise) {
				CATEGORIES[rng.gen_range(0..CATEGORIES.len())]
			} else if kind == "Javadoc" {
				"meta"
			} else if line == prev_line {
				"postcondition"
			} else if parents.starts_with("IfStatement") {
				"precondition"
			} else {
				"instruction"
			};

			let mut builder = Record::builder()
				.field("type", kind)
				.field("line", line)
				.field("prevLine", prev_line)
				.field("cols", cols)
				.field("parentTypes", parents)
				.field("parentStart", ["Block", "Class", "Method"][rng.gen_range(0..3)])
				.label(label);
			// Some comments have no left/right siblings at all.
			if !left.is_empty() {
				builder = builder.field("leftTypes", left);
			}
			if !right.is_empty() {
				builder = builder.field("rightTypes", right);
			}
			if rng.gen_bool(0.8) {
				builder = builder.field("prevCols", rng.gen_range(0..80i64));
			}
			builder.build()
		})
		.collect()
}

fn types(rng: &mut StdRng, count: std::ops::Range<usize>) -> String {
	let n = rng.gen_range(count);
	(0..n)
		.map(|_| STATEMENTS[rng.gen_range(0..STATEMENTS.len())])
		.collect::<Vec<_>>()
		.join(",")
}

/// Deterministic train/valid split.
///
/// Returns `(train, valid)`.
pub fn split_records(records: &[Record], valid_fraction: f32, seed: u64) -> (Vec<Record>, Vec<Record>) {
	assert!((0.0..1.0).contains(&valid_fraction));
	let mut idx: Vec<usize> = (0..records.len()).collect();
	let mut rng = StdRng::seed_from_u64(seed);
	idx.shuffle(&mut rng);

	let valid_len = ((records.len() as f32) * valid_fraction).round() as usize;
	let valid_len = valid_len.min(records.len());
	let (valid, train) = idx.split_at(valid_len);
	let pick = |ids: &[usize]| -> Vec<Record> { ids.iter().map(|&i| records[i].clone()).collect() };
	(pick(train), pick(valid))
}
