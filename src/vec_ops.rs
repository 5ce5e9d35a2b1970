/// Indices and scores of the `k` largest entries, highest first.
/// Equal scores keep their original relative order.
pub fn top_k(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(k);
    ranked
}

/// Scale `v` in place so it sums to one. A zero vector is left untouched.
pub fn normalize_sum(v: &mut [f32]) {
    let total: f32 = v.iter().sum();
    if total <= 0.0 {
        return;
    }
    for x in v.iter_mut() {
        *x /= total;
    }
}

pub fn add_assign(acc: &mut [f32], other: &[f32]) {
    for (a, b) in acc.iter_mut().zip(other) {
        *a += b;
    }
}

pub fn scale(v: &mut [f32], factor: f32) {
    for x in v.iter_mut() {
        *x *= factor;
    }
}
