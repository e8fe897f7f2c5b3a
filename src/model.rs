//! Baseline models over the assembled dataset: a seeded stratified split,
//! gradient-descent logistic regression, and a small bagged-tree forest.
//! Every random choice goes through an injected seed.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::{Dataset, Evaluation, ModelMetrics, TaskEvaluation};

#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub seed: u64,
    pub test_fraction: f64,
    pub score_bins: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.3,
            score_bins: 4,
        }
    }
}

pub fn evaluate(dataset: &Dataset, config: &EvalConfig) -> Result<Evaluation> {
    if dataset.is_empty() {
        bail!("the assembled dataset is empty; nothing to evaluate");
    }

    let rows: Vec<_> = dataset.rows.values().collect();
    let features: Vec<[f64; 2]> = rows
        .iter()
        .map(|row| {
            [
                row.interviewer_interjections as f64,
                row.repetitions as f64,
            ]
        })
        .collect();
    let groups: Vec<i32> = rows.iter().map(|row| row.group).collect();

    let mut tasks = vec![evaluate_group_task(&features, &groups, config)?];

    // Rows without a recorded score are filtered here, never erred on.
    let scored: Vec<(usize, i32)> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| row.score.map(|score| (index, score)))
        .collect();
    if scored.len() < 2 * config.score_bins {
        log::warn!(
            "only {} rows carry a screening score; skipping the score model",
            scored.len()
        );
    } else {
        let score_values: Vec<f64> = scored.iter().map(|(_, score)| *score as f64).collect();
        let bins = quantile_bins(&score_values, config.score_bins);
        let scored_features: Vec<[f64; 2]> =
            scored.iter().map(|(index, _)| features[*index]).collect();
        tasks.push(evaluate_score_task(&scored_features, &bins, config)?);
    }

    Ok(Evaluation {
        transcripts: dataset.len(),
        seed: config.seed,
        test_fraction: config.test_fraction,
        tasks,
    })
}

fn evaluate_group_task(
    features: &[[f64; 2]],
    labels: &[i32],
    config: &EvalConfig,
) -> Result<TaskEvaluation> {
    let classes: BTreeSet<i32> = labels.iter().copied().collect();
    if classes.len() < 2 {
        bail!("the corpus contains a single group; cannot fit a group classifier");
    }

    let (train_idx, test_idx) = stratified_split(labels, config.test_fraction, config.seed);
    if train_idx.is_empty() || test_idx.is_empty() {
        bail!(
            "a {:.0}% test split leaves an empty fold on {} rows",
            config.test_fraction * 100.0,
            labels.len()
        );
    }

    let (x_train, y_train) = design_matrix(features, labels, &train_idx);
    let (x_test, y_test) = design_matrix(features, labels, &test_idx);
    let (x_train, x_test) = standardize(x_train, x_test);

    let mut models = Vec::new();

    let mut logistic = LogisticRegression::new()
        .with_learning_rate(0.1)
        .with_max_iter(1000)
        .with_tolerance(1e-4);
    logistic.fit(&x_train, &y_train)?;
    let predicted = logistic.predict(&x_test);
    models.push(ModelMetrics {
        model: "logistic regression".to_string(),
        accuracy: accuracy(&y_test, &predicted),
        f1: f1_binary(&y_test, &predicted, 1),
    });

    let mut forest = RandomForestClassifier::new()
        .with_n_trees(100)
        .with_max_depth(8)
        .with_seed(config.seed);
    forest.fit(&x_train, &y_train)?;
    let predicted = forest.predict(&x_test);
    models.push(ModelMetrics {
        model: "random forest".to_string(),
        accuracy: accuracy(&y_test, &predicted),
        f1: f1_binary(&y_test, &predicted, 1),
    });

    Ok(TaskEvaluation {
        target: "group".to_string(),
        train_size: train_idx.len(),
        test_size: test_idx.len(),
        models,
    })
}

fn evaluate_score_task(
    features: &[[f64; 2]],
    bins: &[i32],
    config: &EvalConfig,
) -> Result<TaskEvaluation> {
    let (train_idx, test_idx) = stratified_split(bins, config.test_fraction, config.seed);
    if train_idx.is_empty() || test_idx.is_empty() {
        bail!(
            "a {:.0}% test split leaves an empty fold on {} scored rows",
            config.test_fraction * 100.0,
            bins.len()
        );
    }

    let (x_train, y_train) = design_matrix(features, bins, &train_idx);
    let (x_test, y_test) = design_matrix(features, bins, &test_idx);

    let mut forest = RandomForestClassifier::new()
        .with_n_trees(100)
        .with_max_depth(8)
        .with_seed(config.seed);
    forest.fit(&x_train, &y_train)?;
    let predicted = forest.predict(&x_test);

    Ok(TaskEvaluation {
        target: "screening score (quartile)".to_string(),
        train_size: train_idx.len(),
        test_size: test_idx.len(),
        models: vec![ModelMetrics {
            model: "random forest".to_string(),
            accuracy: accuracy(&y_test, &predicted),
            f1: macro_f1(&y_test, &predicted),
        }],
    })
}

// Shuffle within each class so both folds keep the corpus balance, then
// hand out a rounded share of every class to the test fold.
pub fn stratified_split(
    labels: &[i32],
    test_fraction: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut by_class: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (index, label) in labels.iter().enumerate() {
        by_class.entry(*label).or_default().push(index);
    }

    let mut train = Vec::new();
    let mut test = Vec::new();
    for (_, mut indices) in by_class {
        indices.shuffle(&mut rng);
        let test_len = ((indices.len() as f64) * test_fraction).round() as usize;
        let test_len = test_len.min(indices.len());
        test.extend(indices.drain(..test_len));
        train.extend(indices);
    }
    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

fn design_matrix(
    features: &[[f64; 2]],
    labels: &[i32],
    indices: &[usize],
) -> (Array2<f64>, Vec<i32>) {
    let mut x = Array2::zeros((indices.len(), 2));
    let mut y = Vec::with_capacity(indices.len());
    for (row, &index) in indices.iter().enumerate() {
        for (col, value) in features[index].iter().enumerate() {
            x[[row, col]] = *value;
        }
        y.push(labels[index]);
    }
    (x, y)
}

// Z-score with train-fold statistics; the test fold reuses them.
fn standardize(mut train: Array2<f64>, mut test: Array2<f64>) -> (Array2<f64>, Array2<f64>) {
    for col in 0..train.ncols() {
        let column = train.column(col);
        let mean = column.mean().unwrap_or(0.0);
        let deviation = column.std(0.0);
        let deviation = if deviation > 0.0 { deviation } else { 1.0 };
        train
            .column_mut(col)
            .mapv_inplace(|value| (value - mean) / deviation);
        test.column_mut(col)
            .mapv_inplace(|value| (value - mean) / deviation);
    }
    (train, test)
}

pub struct LogisticRegression {
    weights: Array1<f64>,
    bias: f64,
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            weights: Array1::zeros(0),
            bias: 0.0,
            learning_rate: 0.1,
            max_iter: 1000,
            tolerance: 1e-4,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        if x.nrows() == 0 {
            bail!("cannot fit logistic regression on an empty training set");
        }
        if x.nrows() != y.len() {
            bail!(
                "feature matrix has {} rows but {} labels were given",
                x.nrows(),
                y.len()
            );
        }

        let n = x.nrows() as f64;
        let targets =
            Array1::from_iter(y.iter().map(|&label| if label > 0 { 1.0 } else { 0.0 }));
        self.weights = Array1::zeros(x.ncols());
        self.bias = 0.0;

        let mut previous_loss = f64::INFINITY;
        for _ in 0..self.max_iter {
            let probabilities = (x.dot(&self.weights) + self.bias).mapv(sigmoid);
            let residual = &probabilities - &targets;
            let gradient_w = x.t().dot(&residual) / n;
            let gradient_b = residual.sum() / n;
            self.weights = &self.weights - &(gradient_w * self.learning_rate);
            self.bias -= self.learning_rate * gradient_b;

            let loss = log_loss(&probabilities, &targets);
            if (previous_loss - loss).abs() < self.tolerance {
                break;
            }
            previous_loss = loss;
        }
        Ok(())
    }

    pub fn predict_proba(&self, x: &Array2<f64>) -> Array1<f64> {
        (x.dot(&self.weights) + self.bias).mapv(sigmoid)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Vec<i32> {
        self.predict_proba(x)
            .iter()
            .map(|&p| if p >= 0.5 { 1 } else { 0 })
            .collect()
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn log_loss(probabilities: &Array1<f64>, targets: &Array1<f64>) -> f64 {
    let eps = 1e-12;
    let mut total = 0.0;
    for (p, t) in probabilities.iter().zip(targets.iter()) {
        let p = p.clamp(eps, 1.0 - eps);
        total -= t * p.ln() + (1.0 - t) * (1.0 - p).ln();
    }
    total / probabilities.len() as f64
}

pub struct RandomForestClassifier {
    n_trees: usize,
    max_depth: usize,
    min_samples_split: usize,
    seed: u64,
    trees: Vec<TreeNode>,
}

enum TreeNode {
    Leaf {
        class: i32,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl RandomForestClassifier {
    pub fn new() -> Self {
        Self {
            n_trees: 100,
            max_depth: 8,
            min_samples_split: 2,
            seed: 0,
            trees: Vec::new(),
        }
    }

    pub fn with_n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        if x.nrows() == 0 {
            bail!("cannot fit a random forest on an empty training set");
        }
        if x.nrows() != y.len() {
            bail!(
                "feature matrix has {} rows but {} labels were given",
                x.nrows(),
                y.len()
            );
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        self.trees.clear();
        for _ in 0..self.n_trees {
            let sample: Vec<usize> = (0..x.nrows())
                .map(|_| rng.gen_range(0..x.nrows()))
                .collect();
            self.trees.push(grow_tree(
                x,
                y,
                &sample,
                0,
                self.max_depth,
                self.min_samples_split,
                &mut rng,
            ));
        }
        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Vec<i32> {
        (0..x.nrows())
            .map(|index| {
                let row = x.row(index);
                let mut votes: BTreeMap<i32, usize> = BTreeMap::new();
                for tree in &self.trees {
                    *votes.entry(classify_row(tree, &row)).or_default() += 1;
                }
                majority(&votes)
            })
            .collect()
    }
}

fn grow_tree(
    x: &Array2<f64>,
    y: &[i32],
    indices: &[usize],
    depth: usize,
    max_depth: usize,
    min_samples_split: usize,
    rng: &mut StdRng,
) -> TreeNode {
    let class_counts = count_classes(y, indices);
    if depth >= max_depth || indices.len() < min_samples_split || class_counts.len() <= 1 {
        return TreeNode::Leaf {
            class: majority(&class_counts),
        };
    }

    match best_split(x, y, indices, rng) {
        Some((feature, threshold)) => {
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&index| x[[index, feature]] <= threshold);
            if left.is_empty() || right.is_empty() {
                return TreeNode::Leaf {
                    class: majority(&class_counts),
                };
            }
            TreeNode::Split {
                feature,
                threshold,
                left: Box::new(grow_tree(
                    x,
                    y,
                    &left,
                    depth + 1,
                    max_depth,
                    min_samples_split,
                    rng,
                )),
                right: Box::new(grow_tree(
                    x,
                    y,
                    &right,
                    depth + 1,
                    max_depth,
                    min_samples_split,
                    rng,
                )),
            }
        }
        None => TreeNode::Leaf {
            class: majority(&class_counts),
        },
    }
}

// Candidate thresholds are midpoints between consecutive distinct values
// of a sqrt-sized random feature subset; the lowest weighted Gini wins.
fn best_split(
    x: &Array2<f64>,
    y: &[i32],
    indices: &[usize],
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let n_features = x.ncols();
    let subset_len = ((n_features as f64).sqrt().ceil() as usize).max(1);
    let mut features: Vec<usize> = (0..n_features).collect();
    features.shuffle(rng);
    features.truncate(subset_len);

    let mut best: Option<(usize, f64, f64)> = None;
    for &feature in &features {
        let mut values: Vec<f64> = indices.iter().map(|&index| x[[index, feature]]).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();
        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;
            let impurity = split_gini(x, y, indices, feature, threshold);
            if best.map_or(true, |(_, _, current)| impurity < current) {
                best = Some((feature, threshold, impurity));
            }
        }
    }
    best.map(|(feature, threshold, _)| (feature, threshold))
}

fn split_gini(x: &Array2<f64>, y: &[i32], indices: &[usize], feature: usize, threshold: f64) -> f64 {
    let mut left: BTreeMap<i32, usize> = BTreeMap::new();
    let mut right: BTreeMap<i32, usize> = BTreeMap::new();
    for &index in indices {
        let side = if x[[index, feature]] <= threshold {
            &mut left
        } else {
            &mut right
        };
        *side.entry(y[index]).or_default() += 1;
    }

    let total = indices.len() as f64;
    let left_total: usize = left.values().sum();
    let right_total: usize = right.values().sum();
    (left_total as f64 / total) * gini(&left) + (right_total as f64 / total) * gini(&right)
}

fn gini(counts: &BTreeMap<i32, usize>) -> f64 {
    let total: usize = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            p * p
        })
        .sum::<f64>()
}

fn count_classes(y: &[i32], indices: &[usize]) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for &index in indices {
        *counts.entry(y[index]).or_default() += 1;
    }
    counts
}

// Ties resolve to the smallest class.
fn majority(votes: &BTreeMap<i32, usize>) -> i32 {
    let mut best_class = 0;
    let mut best_count = 0;
    for (&class, &count) in votes {
        if count > best_count {
            best_class = class;
            best_count = count;
        }
    }
    best_class
}

fn classify_row(tree: &TreeNode, row: &ArrayView1<f64>) -> i32 {
    match tree {
        TreeNode::Leaf { class } => *class,
        TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if row[*feature] <= *threshold {
                classify_row(left, row)
            } else {
                classify_row(right, row)
            }
        }
    }
}

// qcut-style binning: linear-interpolated quantile edges, values at or
// below an edge fall in the lower bin, so equal values share a bin.
pub fn quantile_bins(values: &[f64], bins: usize) -> Vec<i32> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let edges: Vec<f64> = (1..bins)
        .map(|k| quantile(&sorted, k as f64 / bins as f64))
        .collect();

    values
        .iter()
        .map(|&value| edges.iter().filter(|&&edge| value > edge).count() as i32)
        .collect()
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

pub fn accuracy(truth: &[i32], predicted: &[i32]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let hits = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    hits as f64 / truth.len() as f64
}

pub fn f1_binary(truth: &[i32], predicted: &[i32], positive: i32) -> f64 {
    let mut true_positives = 0.0;
    let mut false_positives = 0.0;
    let mut false_negatives = 0.0;
    for (&t, &p) in truth.iter().zip(predicted) {
        if p == positive && t == positive {
            true_positives += 1.0;
        } else if p == positive {
            false_positives += 1.0;
        } else if t == positive {
            false_negatives += 1.0;
        }
    }
    if true_positives == 0.0 {
        return 0.0;
    }
    let precision = true_positives / (true_positives + false_positives);
    let recall = true_positives / (true_positives + false_negatives);
    2.0 * precision * recall / (precision + recall)
}

pub fn macro_f1(truth: &[i32], predicted: &[i32]) -> f64 {
    let classes: BTreeSet<i32> = truth.iter().copied().collect();
    if classes.is_empty() {
        return 0.0;
    }
    let total: f64 = classes
        .iter()
        .map(|&class| f1_binary(truth, predicted, class))
        .sum();
    total / classes.len() as f64
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::models::DatasetRow;

    #[test]
    fn accuracy_matches_hand_count() {
        let truth = [1, 0, 1, 1];
        let predicted = [1, 0, 0, 1];
        assert_abs_diff_eq!(accuracy(&truth, &predicted), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn f1_matches_hand_count() {
        // tp = 2, fp = 0, fn = 1 -> precision 1.0, recall 2/3, f1 0.8
        let truth = [1, 0, 1, 1];
        let predicted = [1, 0, 0, 1];
        assert_abs_diff_eq!(f1_binary(&truth, &predicted, 1), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn f1_is_zero_when_positive_class_is_never_predicted() {
        let truth = [1, 1, 0];
        let predicted = [0, 0, 0];
        assert_eq!(f1_binary(&truth, &predicted, 1), 0.0);
    }

    #[test]
    fn macro_f1_averages_over_truth_classes() {
        let truth = [0, 0, 1, 1];
        let predicted = [0, 0, 1, 1];
        assert_abs_diff_eq!(macro_f1(&truth, &predicted), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn stratified_split_partitions_and_honors_the_fraction() {
        let labels: Vec<i32> = std::iter::repeat(0)
            .take(10)
            .chain(std::iter::repeat(1).take(10))
            .collect();
        let (train, test) = stratified_split(&labels, 0.3, 42);

        assert_eq!(train.len(), 14);
        assert_eq!(test.len(), 6);
        assert_eq!(test.iter().filter(|&&i| labels[i] == 0).count(), 3);
        assert_eq!(test.iter().filter(|&&i| labels[i] == 1).count(), 3);

        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn stratified_split_is_seed_deterministic() {
        let labels: Vec<i32> = (0..30).map(|i| i % 2).collect();
        assert_eq!(
            stratified_split(&labels, 0.3, 7),
            stratified_split(&labels, 0.3, 7)
        );
    }

    #[test]
    fn quantile_bins_form_quartiles() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        assert_eq!(quantile_bins(&values, 4), vec![0, 0, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn equal_values_share_a_bin() {
        let values = [5.0, 5.0, 5.0, 5.0];
        let bins = quantile_bins(&values, 4);
        assert!(bins.iter().all(|&bin| bin == bins[0]));
    }

    fn separable_data() -> (Array2<f64>, Vec<i32>) {
        let mut x = Array2::zeros((8, 2));
        let points = [
            (0.0, 0.4),
            (0.5, 0.1),
            (0.2, 0.3),
            (0.4, 0.0),
            (5.0, 5.5),
            (5.5, 5.1),
            (6.0, 5.8),
            (5.2, 6.2),
        ];
        for (row, (a, b)) in points.iter().enumerate() {
            x[[row, 0]] = *a;
            x[[row, 1]] = *b;
        }
        (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
    }

    #[test]
    fn logistic_regression_separates_obvious_clusters() {
        let (x, y) = separable_data();
        let mut model = LogisticRegression::new()
            .with_learning_rate(0.1)
            .with_max_iter(1000)
            .with_tolerance(1e-6);
        model.fit(&x, &y).unwrap();
        assert_eq!(model.predict(&x), y);
    }

    #[test]
    fn random_forest_separates_obvious_clusters() {
        let (x, y) = separable_data();
        let mut model = RandomForestClassifier::new()
            .with_n_trees(50)
            .with_max_depth(4)
            .with_seed(42);
        model.fit(&x, &y).unwrap();
        assert_eq!(model.predict(&x), y);
    }

    #[test]
    fn random_forest_is_seed_deterministic() {
        let (x, y) = separable_data();
        let mut first = RandomForestClassifier::new().with_seed(9);
        let mut second = RandomForestClassifier::new().with_seed(9);
        first.fit(&x, &y).unwrap();
        second.fit(&x, &y).unwrap();
        assert_eq!(first.predict(&x), second.predict(&x));
    }

    fn synthetic_dataset() -> Dataset {
        let mut dataset = Dataset::default();
        for index in 0..8 {
            dataset.rows.insert(
                format!("ctl-{index}"),
                DatasetRow {
                    group: 0,
                    score: Some(26 + (index % 4) as i32),
                    interviewer_interjections: 1 + index % 2,
                    repetitions: index % 2,
                },
            );
            dataset.rows.insert(
                format!("dem-{index}"),
                DatasetRow {
                    group: 1,
                    score: Some(12 + (index % 4) as i32),
                    interviewer_interjections: 6 + index % 3,
                    repetitions: 5 + index % 3,
                },
            );
        }
        dataset
    }

    #[test]
    fn evaluate_covers_both_tasks_on_a_scored_corpus() {
        let dataset = synthetic_dataset();
        let evaluation = evaluate(&dataset, &EvalConfig::default()).unwrap();

        assert_eq!(evaluation.transcripts, 16);
        assert_eq!(evaluation.tasks.len(), 2);
        assert_eq!(evaluation.tasks[0].target, "group");
        assert_eq!(evaluation.tasks[0].models.len(), 2);
        for task in &evaluation.tasks {
            assert_eq!(task.train_size + task.test_size, 16);
            for metrics in &task.models {
                assert!((0.0..=1.0).contains(&metrics.accuracy));
                assert!((0.0..=1.0).contains(&metrics.f1));
            }
        }
    }

    #[test]
    fn evaluate_skips_the_score_task_when_scores_are_sparse() {
        let mut dataset = synthetic_dataset();
        for (index, row) in dataset.rows.values_mut().enumerate() {
            if index > 2 {
                row.score = None;
            }
        }
        let evaluation = evaluate(&dataset, &EvalConfig::default()).unwrap();
        assert_eq!(evaluation.tasks.len(), 1);
    }

    #[test]
    fn evaluate_refuses_a_single_group_corpus() {
        let mut dataset = Dataset::default();
        for index in 0..6 {
            dataset.rows.insert(
                format!("ctl-{index}"),
                DatasetRow {
                    group: 0,
                    score: None,
                    interviewer_interjections: index,
                    repetitions: 0,
                },
            );
        }
        assert!(evaluate(&dataset, &EvalConfig::default()).is_err());
    }
}
