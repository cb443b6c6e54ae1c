//! Where change records come from. The pipeline never reaches for a source on
//! its own; callers hand one in.

mod channel_source;
mod json_file_source;
mod record_source;

pub use channel_source::{ChannelSource, SourceRequest};
pub use json_file_source::JsonFileSource;
pub use record_source::{RecordSource, SourceError};
