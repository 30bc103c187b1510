/*!
Iterator implementations for the stream adapter.

Two families, following the convention of skipping-vs-surfacing errors:

- default iterators ([RecordIter], [ElemIter], and the owning
  [RecordIterator] / [ElemIterator]) log backend errors and terminate;
- fallible iterators ([FallibleRecordIterator], [FallibleElemIterator])
  yield `Result` items so callers can handle the error themselves.

All of them are single-pass: the underlying library supports neither
rewinding nor random access, so a consumed stream cannot be iterated
again.
*/
use crate::backend::{RecordHandle, StreamBackend};
use crate::error::BgpStreamError;
use crate::models::{BgpElem, BgpRecord};
use crate::stream::BgpStream;
use log::error;

/// Use [ElemIterator] as the default iterator: `for elem in stream {}`
/// visits every record and, within each, every element.
impl<B: StreamBackend> IntoIterator for BgpStream<B> {
    type Item = BgpElem<<B::Record as RecordHandle>::Elem>;
    type IntoIter = ElemIterator<B>;

    fn into_iter(self) -> Self::IntoIter {
        ElemIterator::new(self)
    }
}

impl<B: StreamBackend> BgpStream<B> {
    pub fn into_record_iter(self) -> RecordIterator<B> {
        RecordIterator::new(self)
    }

    pub fn into_elem_iter(self) -> ElemIterator<B> {
        ElemIterator::new(self)
    }

    /// Record iterator that yields backend errors instead of logging
    /// them.
    pub fn into_fallible_record_iter(self) -> FallibleRecordIterator<B> {
        FallibleRecordIterator::new(self)
    }

    /// Element iterator that yields backend errors instead of logging
    /// them.
    pub fn into_fallible_elem_iter(self) -> FallibleElemIterator<B> {
        FallibleElemIterator::new(self)
    }
}

/// Borrowing record iterator returned by [BgpStream::records].
pub struct RecordIter<'a, B> {
    stream: &'a mut BgpStream<B>,
}

impl<'a, B: StreamBackend> RecordIter<'a, B> {
    pub(crate) fn new(stream: &'a mut BgpStream<B>) -> Self {
        RecordIter { stream }
    }
}

impl<B: StreamBackend> Iterator for RecordIter<'_, B> {
    type Item = BgpRecord<B::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.stream.next_record() {
            Ok(record) => record,
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }
}

/// Borrowing element iterator returned by [BgpRecord::elems].
pub struct ElemIter<'a, R> {
    record: &'a mut BgpRecord<R>,
}

impl<'a, R: RecordHandle> ElemIter<'a, R> {
    pub(crate) fn new(record: &'a mut BgpRecord<R>) -> Self {
        ElemIter { record }
    }
}

impl<R: RecordHandle> Iterator for ElemIter<'_, R> {
    type Item = BgpElem<R::Elem>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.record.next_elem() {
            Ok(elem) => elem,
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }
}

/// Owning record iterator.
pub struct RecordIterator<B> {
    stream: BgpStream<B>,
}

impl<B: StreamBackend> RecordIterator<B> {
    fn new(stream: BgpStream<B>) -> Self {
        RecordIterator { stream }
    }
}

impl<B: StreamBackend> Iterator for RecordIterator<B> {
    type Item = BgpRecord<B::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.stream.next_record() {
            Ok(record) => record,
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }
}

/// Owning flattened element iterator: every record in stream order,
/// every element within each record.
pub struct ElemIterator<B: StreamBackend> {
    stream: BgpStream<B>,
    current: Option<BgpRecord<B::Record>>,
}

impl<B: StreamBackend> ElemIterator<B> {
    fn new(stream: BgpStream<B>) -> Self {
        ElemIterator {
            stream,
            current: None,
        }
    }
}

impl<B: StreamBackend> Iterator for ElemIterator<B> {
    type Item = BgpElem<<B::Record as RecordHandle>::Elem>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.current.as_mut() {
                match record.next_elem() {
                    Ok(Some(elem)) => return Some(elem),
                    Ok(None) => {
                        // record drained, move on to the next one
                        self.current = None;
                    }
                    Err(e) => {
                        error!("{}", e);
                        return None;
                    }
                }
            }
            match self.stream.next_record() {
                Ok(Some(record)) => self.current = Some(record),
                Ok(None) => return None,
                Err(e) => {
                    error!("{}", e);
                    return None;
                }
            }
        }
    }
}

/// Record iterator yielding `Result` items.
pub struct FallibleRecordIterator<B> {
    stream: BgpStream<B>,
}

impl<B: StreamBackend> FallibleRecordIterator<B> {
    fn new(stream: BgpStream<B>) -> Self {
        FallibleRecordIterator { stream }
    }
}

impl<B: StreamBackend> Iterator for FallibleRecordIterator<B> {
    type Item = Result<BgpRecord<B::Record>, BgpStreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stream.next_record().transpose()
    }
}

/// Flattened element iterator yielding `Result` items.
pub struct FallibleElemIterator<B: StreamBackend> {
    stream: BgpStream<B>,
    current: Option<BgpRecord<B::Record>>,
}

impl<B: StreamBackend> FallibleElemIterator<B> {
    fn new(stream: BgpStream<B>) -> Self {
        FallibleElemIterator {
            stream,
            current: None,
        }
    }
}

impl<B: StreamBackend> Iterator for FallibleElemIterator<B> {
    type Item = Result<BgpElem<<B::Record as RecordHandle>::Elem>, BgpStreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.current.as_mut() {
                match record.next_elem() {
                    Ok(Some(elem)) => return Some(Ok(elem)),
                    Ok(None) => self.current = None,
                    Err(e) => {
                        self.current = None;
                        return Some(Err(e.into()));
                    }
                }
            }
            match self.stream.next_record() {
                Ok(Some(record)) => self.current = Some(record),
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
