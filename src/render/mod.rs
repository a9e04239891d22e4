//! Rendering of [`ProfileRecord`]s into text blocks.
//!
//! Rendering is pure: the same record always yields the same text, and nothing
//! here touches the sink. Two layouts exist, selected by the record's
//! [`LogStyle`](crate::marker::LogStyle): SIMPLE (bare prefixed lines) and
//! PRETTIER (a framed fixed-width table). Both produce a multi-line block with
//! a leading newline, ready to be appended to the sink at INFO level.

mod prettier;
mod simple;
pub mod time;
pub mod value;

pub use time::format_nanos;
pub use value::{pretty, simple_type_name, truncate};

use crate::marker::LogStyle;
use crate::record::ProfileRecord;

/// Renders a record in its selected layout.
pub fn render(record: &ProfileRecord) -> String {
    match record.style {
        LogStyle::Simple => simple::render_simple(record),
        LogStyle::Prettier => prettier::render_prettier(record),
    }
}
