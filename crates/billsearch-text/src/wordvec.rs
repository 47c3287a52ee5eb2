//! Word-frequency vectors for cheap lexical similarity

use std::collections::HashMap;

/// Cosine similarity of term-frequency vectors over the vocabulary of just
/// these two token sequences. Zero when either side is empty.
pub fn word_cosine<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let mut vocab: HashMap<&str, usize> = HashMap::new();
    for token in a.iter().chain(b.iter()) {
        let next = vocab.len();
        vocab.entry(token.as_ref()).or_insert(next);
    }

    let mut vec_a = vec![0.0; vocab.len()];
    let mut vec_b = vec![0.0; vocab.len()];
    for token in a {
        vec_a[vocab[token.as_ref()]] += 1.0;
    }
    for token in b {
        vec_b[vocab[token.as_ref()]] += 1.0;
    }

    let norm_a = norm(&vec_a);
    let norm_b = norm(&vec_b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot_product(&vec_a, &vec_b) / (norm_a * norm_b)
}

fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
