use std::io::Write;

use crate::error::IkcResult;
use crate::ikc::Clustering;

struct Membership {
    node_id: u64,
    cluster_id: usize,
    k_value: u32,
    modularity: f64,
}

fn memberships(clustering: &Clustering) -> Vec<Membership> {
    let mut rows: Vec<Membership> = clustering
        .iter()
        .enumerate()
        .flat_map(|(idx, cluster)| {
            cluster.nodes.iter().map(move |&node_id| Membership {
                node_id,
                cluster_id: idx + 1,
                k_value: cluster.k_value,
                modularity: cluster.modularity,
            })
        })
        .collect();
    rows.sort_by_key(|r| (r.cluster_id, r.node_id));
    rows
}

/// `node_id\tcluster_id` per line, no header, sorted by (cluster_id, node_id).
pub fn write_tsv(clustering: &Clustering, mut out: impl Write) -> IkcResult<()> {
    for row in memberships(clustering) {
        writeln!(out, "{}\t{}", row.node_id, row.cluster_id)?;
    }
    Ok(())
}

/// `node_id,cluster_id,k_value,modularity` with a header line; modularity
/// is printed via `{}`, which for `f64` produces the shortest string that
/// round-trips back to the same binary64 value.
pub fn write_csv(clustering: &Clustering, mut out: impl Write) -> IkcResult<()> {
    writeln!(out, "node_id,cluster_id,k_value,modularity")?;
    for row in memberships(clustering) {
        writeln!(
            out,
            "{},{},{},{}",
            row.node_id, row.cluster_id, row.k_value, row.modularity
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ikc::Cluster;

    fn sample() -> Clustering {
        vec![
            Cluster {
                nodes: vec![10, 11, 12],
                k_value: 2,
                modularity: 0.25,
            },
            Cluster {
                nodes: vec![0, 1, 2],
                k_value: 3,
                modularity: 0.5,
            },
        ]
    }

    #[test]
    fn tsv_sorts_by_cluster_then_node() {
        let mut buf = Vec::new();
        write_tsv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "10\t1\n11\t1\n12\t1\n0\t2\n1\t2\n2\t2\n");
    }

    #[test]
    fn csv_has_header_and_one_based_cluster_ids() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "node_id,cluster_id,k_value,modularity");
        assert_eq!(lines.next().unwrap(), "10,1,2,0.25");
    }
}
