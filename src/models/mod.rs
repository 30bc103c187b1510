/*!
Wrapper types around the records and elements served by the backend.
*/
mod elem;
mod record;

pub use elem::{BgpElem, ElemFields, ElemType};
pub use record::{BgpRecord, DumpPosition, RecordInfo, RecordStatus, RecordType};

pub(crate) use elem::OptionToStr;
