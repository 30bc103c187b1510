/*!
`bgpstream` is an ergonomic, iterator-based interface over a lower-level
BGP data access library.

The heavy lifting — collector protocols, MRT/BGP parsing, filter grammar,
data retrieval — happens behind the [StreamBackend] trait family; this
crate only translates friendly configuration (free-form time strings,
singular or plural project/collector/record-type filters, a raw filter
expression) into backend calls and wraps the records and elements the
backend serves into [BgpRecord] and [BgpElem] for iteration.

```
use bgpstream::backend::memory::{MemoryBackend, MemoryElem, MemoryRecord};
use bgpstream::{RecordType, StreamConfig};

# fn main() -> Result<(), bgpstream::BgpStreamError> {
let mut backend = MemoryBackend::new();
backend.push_record(
    MemoryRecord::new(RecordType::Update, 1499385600.0, "routeviews", "route-views.sg")
        .with_elem(MemoryElem::announcement(
            "192.0.2.1".parse().unwrap(),
            11666,
            "203.0.113.0/24".parse().unwrap(),
        )),
);

let stream = StreamConfig::new()
    .from_time("2017-07-07 00:00:00")
    .collector("route-views.sg")
    .record_type("updates")
    .open(backend)?;

// the default iterator flattens records into their elements
for elem in stream {
    println!("{}", elem);
}
# Ok(())
# }
```

Iteration is lazy, single-pass and forward-only: the backend is started
on the first record request and cannot be rewound.
*/
pub mod backend;
pub mod error;
pub mod models;
pub mod stream;

pub use crate::backend::{
    BackendError, ElemHandle, FilterCategory, RecordHandle, StreamBackend,
};
pub use crate::error::BgpStreamError;
pub use crate::models::{
    BgpElem, BgpRecord, DumpPosition, ElemFields, ElemType, RecordInfo, RecordStatus, RecordType,
};
pub use crate::stream::iters::{
    ElemIter, ElemIterator, FallibleElemIterator, FallibleRecordIterator, RecordIter,
    RecordIterator,
};
pub use crate::stream::{BgpStream, StreamConfig};
