//! The SIMPLE layout: bare `"| "`-prefixed lines under a small banner, no
//! framing and no alignment.

use crate::record::ProfileRecord;
use crate::render::time::format_nanos;
use crate::render::value::pretty;

pub(crate) fn render_simple(record: &ProfileRecord) -> String {
    let marker = &record.marker.marker;
    let mut out = String::from("\n");

    out.push_str("\n+------------------+");
    out.push_str("\n| Profiling info:  |");
    out.push_str("\n+------------------+");
    out.push_str("\n| ");
    out.push_str(&marker.message);
    out.push_str(&format!("\n| Method: {}", record.method_qualified));

    if marker.log_caller_info {
        out.push_str(&format!("\n| CallerInfo: {}", record.caller));
    }

    if marker.log_params {
        out.push_str("\n| Params: ");
        for (index, argument) in record.arguments.iter().enumerate() {
            out.push_str(&format!(
                "\n| [{index}] {} = {}",
                argument.type_name,
                pretty(&argument.value)
            ));
        }
    }

    if let Some(thrown) = &record.thrown {
        // Abnormal termination is always visible, independent of `log_result`.
        out.push_str(&format!("\n| Error: {thrown}"));
        out.push('\n');
    } else if marker.log_result {
        let result = record
            .result
            .as_ref()
            .map_or_else(|| "null".to_string(), pretty);
        out.push_str(&format!("\n| Result: {result}"));
        out.push('\n');
    }

    if marker.log_time {
        out.push_str(&format!("\n| Time: {}", format_nanos(record.elapsed_nanos)));
        out.push('\n');
    }

    out
}
