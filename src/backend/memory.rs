/*!
An in-memory [StreamBackend] implementation.

The real data access library lives behind an FFI boundary and is not part
of this crate; this backend stands in for it in tests and example
programs. It serves a fixed list of records, honoring the project,
collector, record-type and interval filters installed on it, and records
every delegated configuration call so the translation contract of the
adapter can be asserted. Textual filter expressions are stored verbatim
but not interpreted; their grammar belongs to the real library.
*/
use crate::backend::{BackendError, ElemHandle, FilterCategory, RecordHandle, StreamBackend};
use crate::models::{DumpPosition, ElemFields, ElemType, RecordStatus, RecordType};
use ipnet::IpNet;
use std::collections::VecDeque;
use std::net::IpAddr;

/// An element held by a [MemoryRecord].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryElem {
    elem_type: ElemType,
    peer_address: IpAddr,
    peer_asn: u32,
    fields: ElemFields,
}

impl MemoryElem {
    pub fn announcement(peer_address: IpAddr, peer_asn: u32, prefix: IpNet) -> Self {
        MemoryElem {
            elem_type: ElemType::Announce,
            peer_address,
            peer_asn,
            fields: ElemFields {
                prefix: Some(prefix),
                ..ElemFields::default()
            },
        }
    }

    pub fn withdrawal(peer_address: IpAddr, peer_asn: u32, prefix: IpNet) -> Self {
        MemoryElem {
            elem_type: ElemType::Withdraw,
            peer_address,
            peer_asn,
            fields: ElemFields {
                prefix: Some(prefix),
                ..ElemFields::default()
            },
        }
    }

    pub fn rib_entry(peer_address: IpAddr, peer_asn: u32, prefix: IpNet) -> Self {
        MemoryElem {
            elem_type: ElemType::Rib,
            peer_address,
            peer_asn,
            fields: ElemFields {
                prefix: Some(prefix),
                ..ElemFields::default()
            },
        }
    }

    pub fn peer_state(
        peer_address: IpAddr,
        peer_asn: u32,
        old_state: impl Into<String>,
        new_state: impl Into<String>,
    ) -> Self {
        MemoryElem {
            elem_type: ElemType::PeerState,
            peer_address,
            peer_asn,
            fields: ElemFields {
                old_state: Some(old_state.into()),
                new_state: Some(new_state.into()),
                ..ElemFields::default()
            },
        }
    }

    pub fn with_next_hop(mut self, next_hop: IpAddr) -> Self {
        self.fields.next_hop = Some(next_hop);
        self
    }

    pub fn with_as_path(mut self, as_path: impl Into<String>) -> Self {
        self.fields.as_path = Some(as_path.into());
        self
    }

    pub fn with_communities<I>(mut self, communities: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.fields.communities = Some(communities.into_iter().map(Into::into).collect());
        self
    }
}

impl ElemHandle for MemoryElem {
    fn elem_type(&self) -> ElemType {
        self.elem_type
    }

    fn peer_address(&self) -> IpAddr {
        self.peer_address
    }

    fn peer_asn(&self) -> u32 {
        self.peer_asn
    }

    fn fields(&self) -> &ElemFields {
        &self.fields
    }
}

/// A record held by a [MemoryBackend].
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    record_type: RecordType,
    dump_position: DumpPosition,
    time: f64,
    project: String,
    collector: String,
    router: Option<String>,
    router_ip: Option<IpAddr>,
    status: RecordStatus,
    dump_time: u64,
    elems: VecDeque<MemoryElem>,
}

impl MemoryRecord {
    pub fn new(
        record_type: RecordType,
        time: f64,
        project: impl Into<String>,
        collector: impl Into<String>,
    ) -> Self {
        MemoryRecord {
            record_type,
            dump_position: DumpPosition::Middle,
            time,
            project: project.into(),
            collector: collector.into(),
            router: None,
            router_ip: None,
            status: RecordStatus::Valid,
            dump_time: time as u64,
            elems: VecDeque::new(),
        }
    }

    pub fn with_dump_position(mut self, dump_position: DumpPosition) -> Self {
        self.dump_position = dump_position;
        self
    }

    pub fn with_router(mut self, router: impl Into<String>, router_ip: IpAddr) -> Self {
        self.router = Some(router.into());
        self.router_ip = Some(router_ip);
        self
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_dump_time(mut self, dump_time: u64) -> Self {
        self.dump_time = dump_time;
        self
    }

    pub fn with_elem(mut self, elem: MemoryElem) -> Self {
        self.elems.push_back(elem);
        self
    }
}

impl RecordHandle for MemoryRecord {
    type Elem = MemoryElem;

    fn record_type(&self) -> RecordType {
        self.record_type
    }

    fn dump_position(&self) -> DumpPosition {
        self.dump_position
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn project(&self) -> &str {
        &self.project
    }

    fn collector(&self) -> &str {
        &self.collector
    }

    fn router(&self) -> Option<&str> {
        self.router.as_deref()
    }

    fn router_ip(&self) -> Option<IpAddr> {
        self.router_ip
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn dump_time(&self) -> u64 {
        self.dump_time
    }

    fn next_elem(&mut self) -> Result<Option<MemoryElem>, BackendError> {
        Ok(self.elems.pop_front())
    }
}

/// In-memory stream backend serving a fixed list of records.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: VecDeque<MemoryRecord>,
    filters: Vec<(FilterCategory, String)>,
    interval: Option<(i64, i64)>,
    filter_strings: Vec<String>,
    data_interface: Option<String>,
    interface_options: Vec<(String, String, String)>,
    started: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    pub fn with_records<I: IntoIterator<Item = MemoryRecord>>(records: I) -> Self {
        MemoryBackend {
            records: records.into_iter().collect(),
            ..MemoryBackend::default()
        }
    }

    pub fn push_record(&mut self, record: MemoryRecord) {
        self.records.push_back(record);
    }

    /// The `(category, value)` pairs installed via
    /// [add_filter](StreamBackend::add_filter), in call order.
    pub fn filters(&self) -> &[(FilterCategory, String)] {
        &self.filters
    }

    pub fn interval(&self) -> Option<(i64, i64)> {
        self.interval
    }

    pub fn filter_strings(&self) -> &[String] {
        &self.filter_strings
    }

    pub fn data_interface(&self) -> Option<&str> {
        self.data_interface.as_deref()
    }

    pub fn interface_options(&self) -> &[(String, String, String)] {
        &self.interface_options
    }

    pub fn started(&self) -> bool {
        self.started
    }

    fn matches(&self, record: &MemoryRecord) -> bool {
        if let Some((from, until)) = self.interval {
            if from != 0 && record.time < from as f64 {
                return false;
            }
            if until != 0 && record.time > until as f64 {
                return false;
            }
        }
        for category in [
            FilterCategory::Project,
            FilterCategory::Collector,
            FilterCategory::RecordType,
        ] {
            let values: Vec<&str> = self
                .filters
                .iter()
                .filter(|(c, _)| *c == category)
                .map(|(_, v)| v.as_str())
                .collect();
            if values.is_empty() {
                continue;
            }
            let matched = match category {
                FilterCategory::Project => values.contains(&record.project.as_str()),
                FilterCategory::Collector => values.contains(&record.collector.as_str()),
                // filter values use the plural spelling ("ribs", "updates")
                FilterCategory::RecordType => values
                    .iter()
                    .any(|v| v.trim_end_matches('s') == record.record_type.to_string()),
            };
            if !matched {
                return false;
            }
        }
        true
    }
}

impl StreamBackend for MemoryBackend {
    type Record = MemoryRecord;

    fn set_data_interface(&mut self, name: &str) -> Result<(), BackendError> {
        self.data_interface = Some(name.to_string());
        Ok(())
    }

    fn set_data_interface_option(
        &mut self,
        interface: &str,
        option: &str,
        value: &str,
    ) -> Result<(), BackendError> {
        self.interface_options.push((
            interface.to_string(),
            option.to_string(),
            value.to_string(),
        ));
        Ok(())
    }

    fn add_filter(&mut self, category: FilterCategory, value: &str) -> Result<(), BackendError> {
        self.filters.push((category, value.to_string()));
        Ok(())
    }

    fn add_interval(&mut self, from_epoch: i64, until_epoch: i64) -> Result<(), BackendError> {
        self.interval = Some((from_epoch, until_epoch));
        Ok(())
    }

    fn parse_filter_string(&mut self, expr: &str) -> Result<(), BackendError> {
        self.filter_strings.push(expr.to_string());
        Ok(())
    }

    fn start(&mut self) -> Result<(), BackendError> {
        if self.started {
            return Err(BackendError::new("stream already started"));
        }
        self.started = true;
        Ok(())
    }

    fn next_record(&mut self) -> Result<Option<MemoryRecord>, BackendError> {
        if !self.started {
            return Err(BackendError::new("stream not started"));
        }
        while let Some(record) = self.records.pop_front() {
            if self.matches(&record) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn peer() -> IpAddr {
        IpAddr::from_str("192.0.2.1").unwrap()
    }

    fn prefix() -> IpNet {
        IpNet::from_str("203.0.113.0/24").unwrap()
    }

    #[test]
    fn test_pull_before_start_is_an_error() {
        let mut backend = MemoryBackend::new();
        assert!(backend.next_record().is_err());
    }

    #[test]
    fn test_double_start_is_an_error() {
        let mut backend = MemoryBackend::new();
        backend.start().unwrap();
        assert!(backend.start().is_err());
    }

    #[test]
    fn test_collector_filter() {
        let mut backend = MemoryBackend::with_records([
            MemoryRecord::new(RecordType::Update, 10.0, "routeviews", "route-views.sg"),
            MemoryRecord::new(RecordType::Update, 11.0, "routeviews", "route-views.eqix"),
            MemoryRecord::new(RecordType::Update, 12.0, "ris", "rrc00"),
        ]);
        backend
            .add_filter(FilterCategory::Collector, "route-views.sg")
            .unwrap();
        backend
            .add_filter(FilterCategory::Collector, "rrc00")
            .unwrap();
        backend.start().unwrap();

        let mut collectors = vec![];
        while let Some(rec) = backend.next_record().unwrap() {
            collectors.push(rec.collector().to_string());
        }
        assert_eq!(collectors, vec!["route-views.sg", "rrc00"]);
    }

    #[test]
    fn test_record_type_filter_accepts_plural_value() {
        let mut backend = MemoryBackend::with_records([
            MemoryRecord::new(RecordType::Rib, 10.0, "ris", "rrc00")
                .with_elem(MemoryElem::rib_entry(peer(), 64496, prefix())),
            MemoryRecord::new(RecordType::Update, 11.0, "ris", "rrc00")
                .with_elem(MemoryElem::announcement(peer(), 64496, prefix())),
        ]);
        backend
            .add_filter(FilterCategory::RecordType, "updates")
            .unwrap();
        backend.start().unwrap();

        let rec = backend.next_record().unwrap().unwrap();
        assert_eq!(rec.record_type(), RecordType::Update);
        assert!(backend.next_record().unwrap().is_none());
    }

    #[test]
    fn test_interval_filter() {
        let mut backend = MemoryBackend::with_records([
            MemoryRecord::new(RecordType::Update, 5.0, "ris", "rrc00"),
            MemoryRecord::new(RecordType::Update, 15.0, "ris", "rrc00"),
            MemoryRecord::new(RecordType::Update, 25.0, "ris", "rrc00"),
        ]);
        backend.add_interval(10, 20).unwrap();
        backend.start().unwrap();

        let rec = backend.next_record().unwrap().unwrap();
        assert_eq!(rec.time(), 15.0);
        assert!(backend.next_record().unwrap().is_none());
    }

    #[test]
    fn test_open_ended_interval_keeps_tail() {
        let mut backend = MemoryBackend::with_records([
            MemoryRecord::new(RecordType::Update, 5.0, "ris", "rrc00"),
            MemoryRecord::new(RecordType::Update, 15.0, "ris", "rrc00"),
        ]);
        backend.add_interval(10, 0).unwrap();
        backend.start().unwrap();

        let rec = backend.next_record().unwrap().unwrap();
        assert_eq!(rec.time(), 15.0);
        assert!(backend.next_record().unwrap().is_none());
    }

    #[test]
    fn test_record_drains_elems_in_order() {
        let mut record = MemoryRecord::new(RecordType::Update, 10.0, "ris", "rrc00")
            .with_elem(MemoryElem::announcement(peer(), 64496, prefix()))
            .with_elem(MemoryElem::withdrawal(peer(), 64496, prefix()));

        let first = record.next_elem().unwrap().unwrap();
        assert_eq!(first.elem_type(), ElemType::Announce);
        let second = record.next_elem().unwrap().unwrap();
        assert_eq!(second.elem_type(), ElemType::Withdraw);
        assert!(record.next_elem().unwrap().is_none());
    }
}
