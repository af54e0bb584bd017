use std::cmp::Ordering;

use crate::{Document, SortBy, SortOrder};

/// Sort documents in place by the given criterion and direction.
///
/// The sort is stable: documents with equal keys keep their original
/// relative order. Callers sort a copy; shared state is never reordered.
pub fn sort_documents(documents: &mut [Document], sort_by: SortBy, order: SortOrder) {
    documents.sort_by(|a, b| {
        let ordering = compare_documents(a, b, sort_by);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_documents(a: &Document, b: &Document, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Name => a.name.cmp(&b.name),
        SortBy::Version => a.version.cmp(&b.version),
        SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn doc(id: &str, name: &str, version: u32, day: u32) -> Document {
        Document {
            id: id.to_string(),
            name: name.to_string(),
            contributors: vec![],
            version,
            created_at: Utc.with_ymd_and_hms(2026, 8, day, 0, 0, 0).unwrap(),
            attachments: vec![],
        }
    }

    #[test]
    fn sorts_by_version_ascending() {
        let mut docs = vec![doc("a", "A", 3, 1), doc("b", "B", 1, 2), doc("c", "C", 2, 3)];

        sort_documents(&mut docs, SortBy::Version, SortOrder::Asc);

        let versions: Vec<u32> = docs.iter().map(|d| d.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[test]
    fn sorts_by_version_descending() {
        let mut docs = vec![doc("a", "A", 3, 1), doc("b", "B", 1, 2), doc("c", "C", 2, 3)];

        sort_documents(&mut docs, SortBy::Version, SortOrder::Desc);

        let versions: Vec<u32> = docs.iter().map(|d| d.version).collect();
        assert_eq!(versions, vec![3, 2, 1]);
    }

    #[test]
    fn sorts_by_name_lexicographically() {
        let mut docs = vec![doc("1", "notes", 1, 1), doc("2", "agenda", 1, 2)];

        sort_documents(&mut docs, SortBy::Name, SortOrder::Asc);

        assert_eq!(docs[0].name, "agenda");
        assert_eq!(docs[1].name, "notes");
    }

    #[test]
    fn sorts_by_creation_time() {
        let mut docs = vec![doc("1", "A", 1, 15), doc("2", "B", 1, 3), doc("3", "C", 1, 9)];

        sort_documents(&mut docs, SortBy::CreatedAt, SortOrder::Asc);

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn equal_keys_keep_original_order() {
        let mut docs = vec![
            doc("first", "Same", 2, 1),
            doc("second", "Same", 2, 2),
            doc("third", "Same", 2, 3),
        ];

        sort_documents(&mut docs, SortBy::Name, SortOrder::Asc);

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }
}
