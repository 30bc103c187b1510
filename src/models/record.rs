use crate::backend::{BackendError, RecordHandle};
use crate::models::{BgpElem, OptionToStr};
use crate::stream::iters::ElemIter;
use std::fmt::{Display, Formatter};
use std::net::IpAddr;

/// The kind of a retrieved record: a routing-table dump entry or an
/// update message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Rib,
    Update,
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::Rib => write!(f, "rib"),
            RecordType::Update => write!(f, "update"),
        }
    }
}

/// Position of a record within the dump it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DumpPosition {
    Start,
    Middle,
    End,
}

impl Display for DumpPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DumpPosition::Start => write!(f, "start"),
            DumpPosition::Middle => write!(f, "middle"),
            DumpPosition::End => write!(f, "end"),
        }
    }
}

/// Retrieval status reported by the library for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordStatus {
    Valid,
    FilteredSource,
    EmptySource,
    CorruptedSource,
    CorruptedRecord,
}

impl Display for RecordStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecordStatus::Valid => "valid",
            RecordStatus::FilteredSource => "filtered-source",
            RecordStatus::EmptySource => "empty-source",
            RecordStatus::CorruptedSource => "corrupted-source",
            RecordStatus::CorruptedRecord => "corrupted-record",
        };
        write!(f, "{}", s)
    }
}

/// Snapshot of a record's fields.
///
/// Elements carry one of these so that record attributes stay available
/// after the stream has moved past the record itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInfo {
    pub record_type: RecordType,
    pub dump_position: DumpPosition,
    pub time: f64,
    pub project: String,
    pub collector: String,
    pub router: Option<String>,
    pub router_ip: Option<IpAddr>,
    pub status: RecordStatus,
    pub dump_time: u64,
}

impl RecordInfo {
    /// Looks up a record attribute by name, rendered as a string.
    pub fn get(&self, attr: &str) -> Option<String> {
        match attr {
            "type" => Some(self.record_type.to_string()),
            "dump_position" => Some(self.dump_position.to_string()),
            "time" => Some(self.time.to_string()),
            "project" => Some(self.project.clone()),
            "collector" => Some(self.collector.clone()),
            "router" => self.router.clone(),
            "router_ip" => self.router_ip.map(|ip| ip.to_string()),
            "status" => Some(self.status.to_string()),
            "dump_time" => Some(self.dump_time.to_string()),
            _ => None,
        }
    }
}

/// Wrapper around one record pulled from the stream.
///
/// A record is only valid for the duration of its iteration step: once
/// the stream moves on, its elements can no longer be pulled. Elements
/// are drained lazily via [next_elem](BgpRecord::next_elem) or
/// [elems](BgpRecord::elems).
pub struct BgpRecord<R> {
    handle: R,
}

impl<R: RecordHandle> BgpRecord<R> {
    pub(crate) fn new(handle: R) -> Self {
        BgpRecord { handle }
    }

    pub fn record_type(&self) -> RecordType {
        self.handle.record_type()
    }

    pub fn dump_position(&self) -> DumpPosition {
        self.handle.dump_position()
    }

    pub fn time(&self) -> f64 {
        self.handle.time()
    }

    pub fn project(&self) -> &str {
        self.handle.project()
    }

    pub fn collector(&self) -> &str {
        self.handle.collector()
    }

    pub fn router(&self) -> Option<&str> {
        self.handle.router()
    }

    pub fn router_ip(&self) -> Option<IpAddr> {
        self.handle.router_ip()
    }

    pub fn status(&self) -> RecordStatus {
        self.handle.status()
    }

    pub fn dump_time(&self) -> u64 {
        self.handle.dump_time()
    }

    /// Snapshots the record's fields.
    pub fn info(&self) -> RecordInfo {
        RecordInfo {
            record_type: self.record_type(),
            dump_position: self.dump_position(),
            time: self.time(),
            project: self.project().to_string(),
            collector: self.collector().to_string(),
            router: self.router().map(|r| r.to_string()),
            router_ip: self.router_ip(),
            status: self.status(),
            dump_time: self.dump_time(),
        }
    }

    /// Looks up a record attribute by name, rendered as a string.
    pub fn get(&self, attr: &str) -> Option<String> {
        self.info().get(attr)
    }

    /// Pulls the next element of this record, or `Ok(None)` once the
    /// record is drained.
    pub fn next_elem(&mut self) -> Result<Option<BgpElem<R::Elem>>, BackendError> {
        let info = self.info();
        Ok(self.handle.next_elem()?.map(|e| BgpElem::new(info, e)))
    }

    /// Lazily iterates the remaining elements of this record. Backend
    /// errors are logged and terminate the iteration; use
    /// [next_elem](BgpRecord::next_elem) to observe them instead.
    pub fn elems(&mut self) -> ElemIter<'_, R> {
        ElemIter::new(self)
    }
}

impl<R: RecordHandle> Display for BgpRecord<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{:.6}|{}|{}|{}|{}|{}|{}",
            self.record_type(),
            self.dump_position(),
            self.time(),
            self.project(),
            self.collector(),
            OptionToStr(&self.router()),
            OptionToStr(&self.router_ip()),
            self.status(),
            self.dump_time(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryRecord;

    #[test]
    fn test_record_display() {
        let rec = BgpRecord::new(
            MemoryRecord::new(RecordType::Update, 1499385600.0, "routeviews", "route-views.sg")
                .with_dump_time(1499385600),
        );
        assert_eq!(
            rec.to_string(),
            "update|middle|1499385600.000000|routeviews|route-views.sg|||valid|1499385600"
        );
    }

    #[test]
    fn test_record_get() {
        let rec = BgpRecord::new(MemoryRecord::new(
            RecordType::Rib,
            0.0,
            "ris",
            "rrc00",
        ));
        assert_eq!(rec.get("type").as_deref(), Some("rib"));
        assert_eq!(rec.get("collector").as_deref(), Some("rrc00"));
        assert_eq!(rec.get("status").as_deref(), Some("valid"));
        assert_eq!(rec.get("router"), None);
        assert_eq!(rec.get("no_such_attr"), None);
    }
}
