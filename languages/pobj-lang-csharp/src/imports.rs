//! Listing and removing using directives
//!
//! Removal is byte-exact: only the removed directives and the whitespace
//! that belonged to them disappear, every other byte of the unit survives.

use crate::parser::parse_using_directives;
use pobj_plugin_api::{ImportDirective, PluginApiError, PluginResult};

/// Using directives of a unit in source order
pub fn import_directives(source: &str) -> PluginResult<Vec<ImportDirective>> {
    Ok(parse_using_directives(source)?
        .into_iter()
        .map(|u| u.directive)
        .collect())
}

/// Remove the given directives from `source`
///
/// A directive alone on its line takes the whole line with it. A directive
/// sharing its line with other code only takes its own text plus trailing
/// spaces. When the unit ends up with no directives at all, the blank lines
/// that used to separate them from the code are dropped as well.
pub fn remove_imports(source: &str, directives: &[ImportDirective]) -> PluginResult<String> {
    if directives.is_empty() {
        return Ok(source.to_string());
    }

    let present = import_directives(source)?;
    for directive in directives {
        let found = present
            .iter()
            .any(|p| p.span == directive.span && p.target == directive.target);
        if !found {
            return Err(PluginApiError::invalid_input(format!(
                "Using directive '{}' at {} is not present in the unit",
                directive.target, directive.span
            )));
        }
    }

    let mut ranges: Vec<(usize, usize)> = directives
        .iter()
        .map(|d| removal_range(source, d.span.start, d.span.end))
        .collect();
    ranges.sort_unstable();
    ranges.dedup();

    // Work back to front so earlier offsets stay valid
    let mut text = source.to_string();
    for &(start, end) in ranges.iter().rev() {
        text.replace_range(start..end, "");
    }

    let removed_all = present.len() <= count_distinct(directives);
    if removed_all {
        if let Some(&(first, _)) = ranges.first() {
            strip_blank_lines_at(&mut text, first);
        }
    }

    Ok(text)
}

fn count_distinct(directives: &[ImportDirective]) -> usize {
    let mut spans: Vec<_> = directives.iter().map(|d| d.span).collect();
    spans.sort_unstable_by_key(|s| (s.start, s.end));
    spans.dedup();
    spans.len()
}

fn removal_range(source: &str, start: usize, end: usize) -> (usize, usize) {
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[end..].find('\n').map_or(source.len(), |i| end + i + 1);

    let before = &source[line_start..start];
    let after = source[end..line_end].trim_end_matches(['\n', '\r']);

    if is_blank(before) && is_blank(after) {
        (line_start, line_end)
    } else {
        let trailing = after.len() - after.trim_start_matches([' ', '\t']).len();
        (start, end + trailing)
    }
}

fn strip_blank_lines_at(text: &mut String, offset: usize) {
    if offset > 0 && text.as_bytes().get(offset - 1) != Some(&b'\n') {
        return;
    }
    let mut end = offset;
    while end < text.len() {
        let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i + 1);
        if !is_blank(text[end..line_end].trim_end_matches(['\n', '\r'])) || line_end == end {
            break;
        }
        if line_end == text.len() && !text[end..].ends_with('\n') {
            break;
        }
        end = line_end;
    }
    text.replace_range(offset..end, "");
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c == ' ' || c == '\t')
}
