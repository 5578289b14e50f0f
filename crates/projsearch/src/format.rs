//! Result shaping: word wrapping, display metadata, truncation.

use crate::index::ProjectIndex;
use crate::types::ResultMeta;

/// Column width the result tile allows before the name wraps.
pub const RESULT_NAME_WRAP_WIDTH: usize = 15;

/// Maps identifiers to display metadata.
///
/// Unknown identifiers are logged and skipped; a stale id from the host
/// must never fail the whole batch.
pub fn result_metas(index: &ProjectIndex, ids: &[String]) -> Vec<ResultMeta> {
    let mut metas = Vec::with_capacity(ids.len());
    for id in ids {
        match index.lookup(id) {
            Some(project) => metas.push(ResultMeta {
                id: id.clone(),
                name: wrap_text(&project.name, RESULT_NAME_WRAP_WIDTH),
                path: project.path.clone(),
            }),
            None => log::warn!("failed to find project with id: {id}"),
        }
    }
    metas
}

/// Returns the first `max` results, preserving order.
pub fn filter_results(results: Vec<String>, max: usize) -> Vec<String> {
    if results.len() <= max {
        return results;
    }
    results.into_iter().take(max).collect()
}

/// Wraps `text` at `width` columns without ever splitting inside a word.
///
/// Each existing line is wrapped independently: a break replaces the last
/// whitespace at or before column `width`; a word longer than `width` is
/// kept whole and the break moves to the whitespace after it. Re-wrapping
/// already-wrapped text with the same width is a no-op.
pub fn wrap_text(text: &str, width: usize) -> String {
    text.split('\n')
        .map(|segment| wrap_segment(segment, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_segment(segment: &str, width: usize) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut out = String::with_capacity(segment.len());
    let mut start = 0usize;

    loop {
        let remaining = chars.len() - start;
        if remaining <= width {
            out.extend(&chars[start..]);
            return out;
        }

        // Prefer the last whitespace within the window; with none there,
        // the word is longer than the width and breaks at the next
        // whitespace instead of mid-word.
        let window = &chars[start..start + width + 1];
        let break_at = window
            .iter()
            .rposition(|c| c.is_whitespace())
            .or_else(|| chars[start..].iter().position(|c| c.is_whitespace()));

        match break_at {
            Some(offset) => {
                out.extend(&chars[start..start + offset]);
                out.push('\n');
                start += offset + 1;
            }
            None => {
                out.extend(&chars[start..]);
                return out;
            }
        }
    }
}
