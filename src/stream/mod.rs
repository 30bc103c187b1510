/*!
The stream adapter: translates human-friendly configuration into backend
calls and exposes lazy iteration over records and elements.
*/
pub mod iters;
pub mod time;

use crate::backend::{FilterCategory, StreamBackend};
use crate::error::BgpStreamError;
use crate::models::BgpRecord;
use crate::stream::iters::RecordIter;
use crate::stream::time::datestr_to_epoch;

/// Configuration for a [BgpStream], mirroring the constructor options of
/// the underlying library's historical interface.
///
/// Project, collector and record-type filters accept either a singular
/// value, a plural list, or both; the singular value is appended after
/// the plural list before being applied. Time bounds are free-form date
/// strings; an unset bound means unbounded.
///
/// # Example
///
/// ```no_run
/// use bgpstream::backend::memory::MemoryBackend;
/// use bgpstream::StreamConfig;
///
/// # fn main() -> Result<(), bgpstream::BgpStreamError> {
/// let stream = StreamConfig::new()
///     .from_time("2017-07-07 00:00:00")
///     .until_time("2017-07-07 00:10:00")
///     .collectors(["route-views.sg", "route-views.eqix"])
///     .record_type("updates")
///     .filter("peer 11666 and prefix more 210.180.0.0/16")
///     .open(MemoryBackend::new())?;
/// for elem in stream {
///     println!("{}", elem);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    from_time: Option<String>,
    until_time: Option<String>,
    data_interface: Option<String>,
    project: Option<String>,
    projects: Vec<String>,
    collector: Option<String>,
    collectors: Vec<String>,
    record_type: Option<String>,
    record_types: Vec<String>,
    filter: Option<String>,
}

impl StreamConfig {
    pub fn new() -> Self {
        StreamConfig::default()
    }

    /// Lower bound of the time interval, as a free-form date string.
    pub fn from_time(mut self, time: impl Into<String>) -> Self {
        self.from_time = Some(time.into());
        self
    }

    /// Upper bound of the time interval, as a free-form date string.
    pub fn until_time(mut self, time: impl Into<String>) -> Self {
        self.until_time = Some(time.into());
        self
    }

    /// Selects the backend data interface to retrieve records with.
    pub fn data_interface(mut self, name: impl Into<String>) -> Self {
        self.data_interface = Some(name.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn projects<I>(mut self, projects: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.projects.extend(projects.into_iter().map(Into::into));
        self
    }

    pub fn collector(mut self, collector: impl Into<String>) -> Self {
        self.collector = Some(collector.into());
        self
    }

    pub fn collectors<I>(mut self, collectors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.collectors
            .extend(collectors.into_iter().map(Into::into));
        self
    }

    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn record_types<I>(mut self, record_types: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.record_types
            .extend(record_types.into_iter().map(Into::into));
        self
    }

    /// A raw filter expression, handed verbatim to the backend's own
    /// grammar.
    pub fn filter(mut self, expr: impl Into<String>) -> Self {
        self.filter = Some(expr.into());
        self
    }

    /// Applies this configuration to `backend` and wraps it in a
    /// [BgpStream].
    ///
    /// Time strings are parsed here; if both bounds are unset no interval
    /// filter is installed and the backend default (unbounded) applies.
    /// Each filter value results in one delegated `add_filter` call.
    pub fn open<B: StreamBackend>(self, mut backend: B) -> Result<BgpStream<B>, BgpStreamError> {
        let from_epoch = datestr_to_epoch(self.from_time.as_deref())?;
        let until_epoch = datestr_to_epoch(self.until_time.as_deref())?;
        if from_epoch != 0 || until_epoch != 0 {
            backend.add_interval(from_epoch, until_epoch)?;
        }

        if let Some(name) = &self.data_interface {
            backend.set_data_interface(name)?;
        }

        apply_filters(&mut backend, FilterCategory::Project, &self.projects, &self.project)?;
        apply_filters(
            &mut backend,
            FilterCategory::Collector,
            &self.collectors,
            &self.collector,
        )?;
        apply_filters(
            &mut backend,
            FilterCategory::RecordType,
            &self.record_types,
            &self.record_type,
        )?;

        if let Some(expr) = &self.filter {
            backend.parse_filter_string(expr)?;
        }

        Ok(BgpStream {
            backend,
            started: false,
        })
    }
}

/// One `add_filter` call per value: the plural list first, then the
/// singular value appended.
fn apply_filters<B: StreamBackend>(
    backend: &mut B,
    category: FilterCategory,
    values: &[String],
    single: &Option<String>,
) -> Result<(), BgpStreamError> {
    for value in values.iter().chain(single.iter()) {
        backend.add_filter(category, value)?;
    }
    Ok(())
}

/// A configured stream of BGP records.
///
/// The backend is started lazily, exactly once, on the first record
/// request. Iteration is single-pass and forward-only; the underlying
/// library supports no rewinding or random access.
#[derive(Debug)]
pub struct BgpStream<B> {
    backend: B,
    started: bool,
}

impl<B: StreamBackend> BgpStream<B> {
    /// Wraps an unconfigured backend. Use [StreamConfig::open] to apply
    /// time bounds and filters first.
    pub fn new(backend: B) -> Self {
        BgpStream {
            backend,
            started: false,
        }
    }

    /// Pulls the next record, starting the backend on the first call.
    /// `Ok(None)` is the normal end of the stream.
    pub fn next_record(&mut self) -> Result<Option<BgpRecord<B::Record>>, BgpStreamError> {
        if !self.started {
            self.backend.start()?;
            self.started = true;
        }
        Ok(self.backend.next_record()?.map(BgpRecord::new))
    }

    /// Lazily iterates the remaining records. Backend errors are logged
    /// and terminate the iteration; use [next_record](BgpStream::next_record)
    /// or [into_fallible_record_iter](BgpStream::into_fallible_record_iter)
    /// to observe them instead.
    pub fn records(&mut self) -> RecordIter<'_, B> {
        RecordIter::new(self)
    }

    /// Access to the underlying backend, for calls the adapter does not
    /// wrap (e.g. data-interface options).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the underlying backend.
    ///
    /// Configuration calls made after the stream has started are subject
    /// to the backend's own rules.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;

    #[test]
    fn test_singular_and_plural_filters_are_equivalent() {
        let singular = StreamConfig::new()
            .collector("route-views.sg")
            .open(MemoryBackend::new())
            .unwrap();
        let plural = StreamConfig::new()
            .collectors(["route-views.sg"])
            .open(MemoryBackend::new())
            .unwrap();
        assert_eq!(
            singular.backend().filters(),
            plural.backend().filters(),
        );
    }

    #[test]
    fn test_singular_appended_after_plural() {
        let stream = StreamConfig::new()
            .projects(["ris", "routeviews"])
            .project("ris-live")
            .open(MemoryBackend::new())
            .unwrap();
        let values: Vec<&str> = stream
            .backend()
            .filters()
            .iter()
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(values, vec!["ris", "routeviews", "ris-live"]);
    }

    #[test]
    fn test_filter_categories() {
        let stream = StreamConfig::new()
            .project("routeviews")
            .collector("route-views.sg")
            .record_type("updates")
            .open(MemoryBackend::new())
            .unwrap();
        let filters = stream.backend().filters();
        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0].0.as_str(), "project");
        assert_eq!(filters[1].0.as_str(), "collector");
        assert_eq!(filters[2].0.as_str(), "record-type");
    }

    #[test]
    fn test_no_interval_when_both_bounds_unset() {
        let stream = StreamConfig::new().open(MemoryBackend::new()).unwrap();
        assert_eq!(stream.backend().interval(), None);
    }

    #[test]
    fn test_interval_from_time_strings() {
        let stream = StreamConfig::new()
            .from_time("2017-07-07 00:00:00")
            .until_time("2017-07-07 00:10:00")
            .open(MemoryBackend::new())
            .unwrap();
        assert_eq!(stream.backend().interval(), Some((1499385600, 1499386200)));
    }

    #[test]
    fn test_open_ended_interval() {
        let stream = StreamConfig::new()
            .from_time("2017-07-07 00:00:00")
            .open(MemoryBackend::new())
            .unwrap();
        assert_eq!(stream.backend().interval(), Some((1499385600, 0)));
    }

    #[test]
    fn test_bad_time_string_fails_at_open() {
        let err = StreamConfig::new()
            .from_time("not a date")
            .open(MemoryBackend::new())
            .unwrap_err();
        assert!(matches!(err, BgpStreamError::InvalidTimeString { .. }));
    }

    #[test]
    fn test_data_interface_and_filter_string_delegated() {
        let stream = StreamConfig::new()
            .data_interface("singlefile")
            .filter("peer 11666 and prefix more 210.180.0.0/16")
            .open(MemoryBackend::new())
            .unwrap();
        assert_eq!(stream.backend().data_interface(), Some("singlefile"));
        assert_eq!(
            stream.backend().filter_strings(),
            ["peer 11666 and prefix more 210.180.0.0/16".to_string()]
        );
    }
}
