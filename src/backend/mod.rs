/*!
Defines the seam between the stream adapter and the lower-level BGP data
access library.

The underlying library is treated as an opaque collaborator: this module
only captures the small procedural API the adapter is allowed to call
(configure filters and intervals, start, pull the next record, pull the
next element of a record, read the element field mapping) as a set of
traits. The adapter never looks behind these traits; filter-expression
grammar, collector protocols and MRT/BGP parsing all live on the other
side of them.
*/
pub mod memory;

use crate::models::{DumpPosition, ElemFields, ElemType, RecordStatus, RecordType};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use thiserror::Error;

/// Error reported by the underlying data access library.
///
/// The adapter introduces no error taxonomy of its own: whatever message
/// the library produces is carried through untranslated.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BackendError(String);

impl BackendError {
    pub fn new(msg: impl Into<String>) -> Self {
        BackendError(msg.into())
    }
}

/// Filter categories understood by the underlying library.
///
/// The adapter issues one `add_filter` call per configured value, always
/// with one of these fixed category names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    Project,
    Collector,
    RecordType,
}

impl FilterCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterCategory::Project => "project",
            FilterCategory::Collector => "collector",
            FilterCategory::RecordType => "record-type",
        }
    }
}

impl Display for FilterCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The procedural API of the lower-level stream object.
///
/// Configuration calls must happen before [start](StreamBackend::start);
/// after that the backend only serves [next_record](StreamBackend::next_record)
/// until it returns `Ok(None)`, the normal end-of-stream signal. Calls
/// block until the library produces a result; no timeout or cancellation
/// is exposed here.
pub trait StreamBackend {
    type Record: RecordHandle;

    /// Selects the data interface used to retrieve records.
    fn set_data_interface(&mut self, name: &str) -> Result<(), BackendError>;

    /// Sets an option of a specific data interface, e.g. the input file of
    /// the `singlefile` interface.
    fn set_data_interface_option(
        &mut self,
        interface: &str,
        option: &str,
        value: &str,
    ) -> Result<(), BackendError>;

    /// Restricts the stream to records matching `value` in the given
    /// category. Repeated calls within one category are OR-ed by the
    /// library.
    fn add_filter(&mut self, category: FilterCategory, value: &str) -> Result<(), BackendError>;

    /// Restricts the stream to records within `[from_epoch, until_epoch]`.
    /// A bound of 0 means unbounded on that side.
    fn add_interval(&mut self, from_epoch: i64, until_epoch: i64) -> Result<(), BackendError>;

    /// Hands a textual filter expression to the library. The grammar is
    /// entirely the library's; the string is consumed verbatim.
    fn parse_filter_string(&mut self, expr: &str) -> Result<(), BackendError>;

    fn start(&mut self) -> Result<(), BackendError>;

    /// Pulls the next record, or `Ok(None)` at end-of-stream.
    fn next_record(&mut self) -> Result<Option<Self::Record>, BackendError>;
}

/// One retrieved record. Field getters mirror the library's record
/// attributes; [next_elem](RecordHandle::next_elem) drains the record's
/// elements one at a time, `Ok(None)` terminating the sequence.
pub trait RecordHandle {
    type Elem: ElemHandle;

    fn record_type(&self) -> RecordType;
    fn dump_position(&self) -> DumpPosition;
    /// Record timestamp in floating seconds.
    fn time(&self) -> f64;
    fn project(&self) -> &str;
    fn collector(&self) -> &str;
    fn router(&self) -> Option<&str>;
    fn router_ip(&self) -> Option<IpAddr>;
    fn status(&self) -> RecordStatus;
    fn dump_time(&self) -> u64;

    fn next_elem(&mut self) -> Result<Option<Self::Elem>, BackendError>;
}

/// One routing-update or routing-table entry within a record.
pub trait ElemHandle {
    fn elem_type(&self) -> ElemType;
    fn peer_address(&self) -> IpAddr;
    fn peer_asn(&self) -> u32;
    /// The type-specific field mapping (prefix, next-hop, as-path,
    /// communities, old-state, new-state).
    fn fields(&self) -> &ElemFields;

    /// Looks up an element attribute by name, rendered as a string.
    /// Returns `None` for attributes the element does not carry; callers
    /// wanting record fallback should go through
    /// [BgpElem::get](crate::BgpElem::get).
    fn get(&self, attr: &str) -> Option<String> {
        match attr {
            "type" => Some(self.elem_type().to_string()),
            "peer_address" => Some(self.peer_address().to_string()),
            "peer_asn" => Some(self.peer_asn().to_string()),
            _ => self.fields().get(attr),
        }
    }
}
