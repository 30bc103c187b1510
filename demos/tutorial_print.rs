//! Prints every record and element of a stream.
//!
//! The in-memory backend stands in for the native data source, so the
//! program runs without network access.
use bgpstream::backend::memory::{MemoryBackend, MemoryElem, MemoryRecord};
use bgpstream::{RecordType, StreamConfig};

fn sample_backend() -> MemoryBackend {
    let peer = "192.0.2.1".parse().unwrap();
    MemoryBackend::with_records([
        MemoryRecord::new(RecordType::Update, 1427846570.0, "ris", "rrc06")
            .with_elem(
                MemoryElem::announcement(peer, 25152, "203.0.113.0/24".parse().unwrap())
                    .with_next_hop(peer)
                    .with_as_path("25152 2914 15169")
                    .with_communities(["2914:410", "2914:1201"]),
            )
            .with_elem(MemoryElem::withdrawal(
                peer,
                25152,
                "198.51.100.0/24".parse().unwrap(),
            )),
        MemoryRecord::new(RecordType::Update, 1427846600.0, "ris", "rrc06").with_elem(
            MemoryElem::peer_state(peer, 25152, "established", "idle"),
        ),
    ])
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut stream = StreamConfig::new()
        .from_time("2015-04-01 00:02:50")
        .until_time("2015-04-01 00:04:30")
        .collector("rrc06")
        .record_type("updates")
        .open(sample_backend())?;

    for mut record in stream.records() {
        println!(
            "{} {}.{} {}",
            record.status(),
            record.project(),
            record.collector(),
            record.time()
        );
        for elem in record.elems() {
            println!("\t{}", elem);
        }
    }
    Ok(())
}
