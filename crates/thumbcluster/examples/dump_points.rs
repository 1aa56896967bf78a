//! Print the resolved MINI cluster points as JSON.
//!
//! Usage:
//!   cargo run -p thumbcluster --example dump_points
//!   cargo run -p thumbcluster --example dump_points -- report

use thumbcluster::prelude::*;

fn main() {
    let body = ReferenceBody::default();
    let cluster = match ThumbCluster::new(
        &ClusterParameters::default(),
        ClusterVariant::Mini,
        &body,
        MountDims::default(),
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("cluster rejected: {e}");
            std::process::exit(1);
        }
    };
    let mode = std::env::args().nth(1).unwrap_or_else(|| "points".to_string());
    let json = match mode.as_str() {
        "points" => serde_json::to_string_pretty(&cluster.points()),
        "report" => serde_json::to_string_pretty(cluster.validation()),
        _ => {
            eprintln!("usage: dump_points [points|report]");
            return;
        }
    };
    match json {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("serialize failed: {e}"),
    }
}
