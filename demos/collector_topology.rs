//! Builds an AS adjacency set from the AS paths of a RIB dump.
use bgpstream::backend::memory::{MemoryBackend, MemoryElem, MemoryRecord};
use bgpstream::{RecordType, StreamConfig};
use std::collections::HashSet;

fn rib_backend() -> MemoryBackend {
    let peer = "192.0.2.1".parse().unwrap();
    let record = MemoryRecord::new(RecordType::Rib, 1427846400.0, "ris", "rrc06")
        .with_elem(
            MemoryElem::rib_entry(peer, 25152, "203.0.113.0/24".parse().unwrap())
                .with_as_path("25152 2914 15169"),
        )
        .with_elem(
            MemoryElem::rib_entry(peer, 25152, "198.51.100.0/24".parse().unwrap())
                .with_as_path("25152 2914 2914 3356"),
        )
        .with_elem(
            MemoryElem::rib_entry(peer, 25152, "192.0.2.0/24".parse().unwrap())
                .with_as_path("25152 3356 15169"),
        );
    MemoryBackend::with_records([record])
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let stream = StreamConfig::new()
        .collector("rrc06")
        .record_type("ribs")
        .from_time("2015-04-01 00:00:00")
        .until_time("2015-04-01 00:05:00")
        .open(rib_backend())?;

    let mut as_topology: HashSet<(String, String)> = HashSet::new();
    let mut rib_entries = 0usize;

    for elem in stream {
        rib_entries += 1;
        let Some(path) = elem.fields().as_path.clone() else {
            continue;
        };
        let ases: Vec<&str> = path.split(' ').collect();
        for pair in ases.windows(2) {
            // skip prepended ASes
            if pair[0] != pair[1] {
                let mut link = [pair[0], pair[1]];
                link.sort();
                as_topology.insert((link[0].to_string(), link[1].to_string()));
            }
        }
    }

    println!("Processed {} rib entries", rib_entries);
    println!("Found {} AS adjacencies", as_topology.len());
    Ok(())
}
