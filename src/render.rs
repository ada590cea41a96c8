use std::cmp::Ordering;

use tracing::debug;

use crate::{
    dom::{Document, Node, Tag, el},
    record::{PublicationRecord, YearKey},
};

/// Separator between the authors and the venue in an entry's meta line.
pub const META_SEPARATOR: &str = " \u{b7} ";

/// Publications sharing a year key, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGroup<'a> {
    pub year: YearKey,
    pub records: Vec<&'a PublicationRecord>,
}

/// Bucket `records` by year and order the buckets for display.
///
/// Buckets keep first-seen order internally. Numeric years come first, largest first; labels that
/// aren't numbers follow in first-seen order; the unknown bucket is always last.
pub fn group_by_year(records: &[PublicationRecord]) -> Vec<YearGroup<'_>> {
    let mut groups: Vec<YearGroup<'_>> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|g| g.year == record.year) {
            Some(group) => group.records.push(record),
            None => groups.push(YearGroup {
                year: record.year.clone(),
                records: vec![record],
            }),
        }
    }
    // `sort_by` is stable, so equal keys stay in grouping order.
    groups.sort_by(|a, b| compare_years(&a.year, &b.year));
    groups
}

fn compare_years(a: &YearKey, b: &YearKey) -> Ordering {
    match (a.is_unknown(), b.is_unknown()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match (a.numeric(), b.numeric()) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Rebuild the contents of the element `container_id` from `records`.
///
/// Does nothing when the document has no such element. Whatever the container held before is
/// dropped, so the result only depends on the latest call.
pub fn render(document: &mut Document, container_id: &str, records: &[PublicationRecord]) {
    let Some(root) = document.element_by_id_mut(container_id) else {
        debug!(container_id, "publications container not found, skipping render");
        return;
    };
    root.clear();

    let groups = group_by_year(records);
    debug!(groups = groups.len(), records = records.len(), "rendering publications");
    for group in &groups {
        let heading = group.year.to_string();
        root.append(el(Tag::H3, &[("class", "pub-year"), ("text", heading.as_str())], vec![]));
        let items = group.records.iter().map(|r| entry(r)).collect();
        root.append(el(Tag::Ol, &[], items));
    }
}

fn entry(record: &PublicationRecord) -> Node {
    let title = el(
        Tag::A,
        &[
            ("href", record.link_target()),
            ("target", "_blank"),
            ("rel", "noopener noreferrer"),
            ("class", "pub-title"),
            ("text", record.display_title()),
        ],
        vec![],
    );
    let meta_line = record.meta_line(META_SEPARATOR);
    let meta = el(Tag::Div, &[("class", "pub-meta"), ("text", meta_line.as_str())], vec![]);
    el(Tag::Li, &[("class", "pub-item")], vec![title.into(), meta.into()]).into()
}
