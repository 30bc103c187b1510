use crate::backend::ElemHandle;
use crate::models::RecordInfo;
use ipnet::IpNet;
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::net::IpAddr;

/// The type of an element, rendered with the library's single-letter
/// codes: RIB entry, announcement, withdrawal, or peer-state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElemType {
    Rib,
    Announce,
    Withdraw,
    PeerState,
}

impl Display for ElemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ElemType::Rib => "R",
            ElemType::Announce => "A",
            ElemType::Withdraw => "W",
            ElemType::PeerState => "S",
        };
        write!(f, "{}", s)
    }
}

/// The type-specific field mapping of an element.
///
/// Which entries are present depends on the element type: prefix-carrying
/// elements have `prefix` (and, for announcements and RIB entries,
/// next-hop, AS path and communities), peer-state elements have the old
/// and new state strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElemFields {
    pub prefix: Option<IpNet>,
    pub next_hop: Option<IpAddr>,
    pub as_path: Option<String>,
    pub communities: Option<Vec<String>>,
    pub old_state: Option<String>,
    pub new_state: Option<String>,
}

impl ElemFields {
    /// Looks up a field by its mapping name, rendered as a string.
    /// Communities are space-joined.
    pub fn get(&self, name: &str) -> Option<String> {
        match name {
            "prefix" => self.prefix.map(|p| p.to_string()),
            "next-hop" => self.next_hop.map(|ip| ip.to_string()),
            "as-path" => self.as_path.clone(),
            "communities" => self.communities.as_ref().map(|c| c.iter().join(" ")),
            "old-state" => self.old_state.clone(),
            "new-state" => self.new_state.clone(),
            _ => None,
        }
    }
}

/// Renders `Some` through `Display` and `None` as the empty string,
/// matching the canonical pipe-delimited text format for absent fields.
pub(crate) struct OptionToStr<'a, T>(pub &'a Option<T>);

impl<T: Display> Display for OptionToStr<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            None => Ok(()),
            Some(x) => write!(f, "{}", x),
        }
    }
}

/// Wrapper around one element pulled from a record.
///
/// Carries a snapshot of the owning record's fields so that attribute
/// lookups can fall back to the record: [get](BgpElem::get) first queries
/// the element, then the record, with `"record_type"` mapping to the
/// record's `"type"` attribute.
pub struct BgpElem<E> {
    record: RecordInfo,
    handle: E,
}

impl<E: ElemHandle> BgpElem<E> {
    pub(crate) fn new(record: RecordInfo, handle: E) -> Self {
        BgpElem { record, handle }
    }

    pub fn elem_type(&self) -> ElemType {
        self.handle.elem_type()
    }

    pub fn peer_address(&self) -> IpAddr {
        self.handle.peer_address()
    }

    pub fn peer_asn(&self) -> u32 {
        self.handle.peer_asn()
    }

    pub fn fields(&self) -> &ElemFields {
        self.handle.fields()
    }

    /// The fields of the record this element was pulled from.
    pub fn record(&self) -> &RecordInfo {
        &self.record
    }

    /// The element's timestamp. Elements do not carry a time of their
    /// own; this is the owning record's time.
    pub fn time(&self) -> f64 {
        self.record.time
    }

    /// Looks up an attribute by name: the element's value when the
    /// element carries it, the owning record's otherwise. A request for
    /// `"record_type"` returns the record's `"type"` value.
    pub fn get(&self, attr: &str) -> Option<String> {
        if let Some(v) = self.handle.get(attr) {
            return Some(v);
        }
        let attr = if attr == "record_type" { "type" } else { attr };
        self.record.get(attr)
    }
}

impl<E: ElemHandle> Display for BgpElem<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields = self.handle.fields();
        let communities = fields.communities.as_ref().map(|c| c.iter().join(" "));
        write!(
            f,
            "{}|{}|{:.6}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
            self.record.record_type,
            self.elem_type(),
            self.time(),
            self.record.project,
            self.record.collector,
            OptionToStr(&self.record.router),
            OptionToStr(&self.record.router_ip),
            self.peer_asn(),
            self.peer_address(),
            OptionToStr(&fields.prefix),
            OptionToStr(&fields.next_hop),
            OptionToStr(&fields.as_path),
            OptionToStr(&communities),
            OptionToStr(&fields.old_state),
            OptionToStr(&fields.new_state),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DumpPosition, RecordStatus, RecordType};
    use crate::backend::memory::MemoryElem;
    use std::str::FromStr;

    fn update_record_info() -> RecordInfo {
        RecordInfo {
            record_type: RecordType::Update,
            dump_position: DumpPosition::Middle,
            time: 1499385600.0,
            project: "routeviews".to_string(),
            collector: "route-views.sg".to_string(),
            router: None,
            router_ip: None,
            status: RecordStatus::Valid,
            dump_time: 1499385600,
        }
    }

    #[test]
    fn test_elem_display() {
        let elem = BgpElem::new(
            update_record_info(),
            MemoryElem::announcement(
                IpAddr::from_str("192.0.2.1").unwrap(),
                11666,
                IpNet::from_str("203.0.113.0/24").unwrap(),
            )
            .with_next_hop(IpAddr::from_str("192.0.2.1").unwrap())
            .with_as_path("11666 3356 64496")
            .with_communities(["3356:2", "3356:100"]),
        );
        assert_eq!(
            elem.to_string(),
            "update|A|1499385600.000000|routeviews|route-views.sg|||11666|192.0.2.1\
             |203.0.113.0/24|192.0.2.1|11666 3356 64496|3356:2 3356:100||"
        );
    }

    #[test]
    fn test_elem_display_peer_state() {
        let elem = BgpElem::new(
            update_record_info(),
            MemoryElem::peer_state(
                IpAddr::from_str("192.0.2.1").unwrap(),
                11666,
                "connected",
                "established",
            ),
        );
        assert_eq!(
            elem.to_string(),
            "update|S|1499385600.000000|routeviews|route-views.sg|||11666|192.0.2.1\
             |||||connected|established"
        );
    }

    #[test]
    fn test_attribute_fallback() {
        let elem = BgpElem::new(
            update_record_info(),
            MemoryElem::withdrawal(
                IpAddr::from_str("192.0.2.1").unwrap(),
                11666,
                IpNet::from_str("203.0.113.0/24").unwrap(),
            ),
        );

        // present on the element itself
        assert_eq!(elem.get("peer_asn").as_deref(), Some("11666"));
        assert_eq!(elem.get("prefix").as_deref(), Some("203.0.113.0/24"));
        // "type" resolves to the element's type, not the record's
        assert_eq!(elem.get("type").as_deref(), Some("W"));
        // absent on the element, present on the record
        assert_eq!(elem.get("collector").as_deref(), Some("route-views.sg"));
        assert_eq!(elem.get("dump_position").as_deref(), Some("middle"));
        // the renaming rule
        assert_eq!(elem.get("record_type").as_deref(), Some("update"));
        // absent on both
        assert_eq!(elem.get("no_such_attr"), None);
    }
}
