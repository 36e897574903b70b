//! Parse a cluster configuration file and print its routing table.
//!
//! ```text
//! cargo run --example inspect -- bucket.json [key ...]
//! ```

use crema_topology::{Config, ConfigFactory};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("crema_topology=debug,info")
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: inspect <config.json> [key ...]")?;
    let keys: Vec<String> = args.collect();

    let config = ConfigFactory::new().parse_file(&path)?;

    println!("Kind: {}", config.kind());
    println!("Servers:");
    for (i, server) in config.servers().iter().enumerate() {
        println!("  [{}] {}", i, server);
    }

    match &config {
        Config::Simple(_) => {}
        Config::Partitioned(map) => {
            println!("Hash algorithm: {}", map.hash_algorithm().name());
            println!("Replicas: {}", map.replicas_count());
            println!("VBuckets: {}", map.vbuckets_count());
            for url in map.couch_servers() {
                println!("  couchApiBase: {}", url);
            }

            for key in &keys {
                let vb = map.vbucket_for_key(key.as_bytes());
                let master = map.master_server_for_key(key.as_bytes())?;
                println!("{} -> vbucket {} -> {}", key, vb, master);
            }
        }
    }

    println!("\n{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}
