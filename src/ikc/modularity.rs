/// Single-community Newman modularity: `e_H/m - (d_H/2m)^2`.
///
/// `e_h` is the number of edges with both endpoints in the candidate
/// cluster; `d_h` is the sum of each member's degree *in the original
/// graph*, not the shrinking working graph the driver peels from; `m` is
/// the total edge count of the original graph, fixed for the whole run.
pub fn modularity(e_h: u64, d_h: u64, total_m: f64) -> f64 {
    if total_m == 0.0 {
        return 0.0;
    }
    let e_h = e_h as f64;
    let d_h = d_h as f64;
    e_h / total_m - (d_h / (2.0 * total_m)).powi(2)
}
