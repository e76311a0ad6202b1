//! Maps backend content records onto the `Content` view model.

use crate::models::{
    content::{Content, ContentRecord},
    metadata::{Metadata, MetadataInfo, MetadataMap, MetadataType},
};

/// Map a whole list payload, keeping record order.
pub fn map_content_records(records: Vec<ContentRecord>) -> Vec<Content> {
    records.into_iter().map(map_content_record).collect()
}

pub fn map_content_record(record: ContentRecord) -> Content {
    Content {
        id: record.id,
        title: record.title,
        description: record.description,
        notes: record.additional_notes,
        active: record.active,
        file_url: record.content_file,
        file_name: record.file_name,
        filesize: record.filesize,
        original_source: record.original_source,
        copyrighter: record.copyright_by,
        copyright_site: record.copyright_site,
        copyright: record.copyright_notes,
        copyright_approved: record.copyright_approved,
        creator: record.created_by,
        created_date: record.created_on,
        reviewed: record.reviewed,
        reviewer: record.reviewed_by,
        reviewed_date: record.reviewed_on,
        date_published: record.published_year,
        rights_statement: record.rights_statement,
        status: record.status,
        metadata: group_metadata(record.metadata_info),
    }
}

/// Fold the flat `metadata_info` list into lists keyed by metadata type id.
///
/// Entries are appended, so each list keeps the order of the source payload.
pub fn group_metadata(entries: Vec<MetadataInfo>) -> MetadataMap {
    let mut grouped = MetadataMap::new();
    for info in entries {
        grouped.entry(info.type_id).or_default().push(Metadata {
            id: info.id,
            name: info.name,
            creator: String::new(),
            metadata_type: MetadataType {
                id: info.type_id,
                name: info.type_name,
            },
        });
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: u64, type_id: u64) -> MetadataInfo {
        MetadataInfo {
            id,
            name: format!("m{id}"),
            type_id,
            type_name: format!("type{type_id}"),
        }
    }

    #[test]
    fn groups_by_type_in_encounter_order() {
        let grouped = group_metadata(vec![
            info(10, 1),
            info(20, 2),
            info(11, 1),
            info(30, 3),
            info(12, 1),
            info(21, 2),
        ]);

        assert_eq!(grouped.len(), 3);
        let ids = |t: u64| grouped[&t].iter().map(|m| m.id).collect::<Vec<_>>();
        assert_eq!(ids(1), vec![10, 11, 12]);
        assert_eq!(ids(2), vec![20, 21]);
        assert_eq!(ids(3), vec![30]);
        assert_eq!(grouped[&2][1].metadata_type.name, "type2");
        assert!(grouped[&1].iter().all(|m| m.creator.is_empty()));
    }

    #[test]
    fn empty_metadata_yields_empty_map() {
        let content = map_content_record(ContentRecord {
            id: 5,
            ..Default::default()
        });
        assert!(content.metadata.is_empty());
    }

    #[test]
    fn renames_backend_fields() {
        let record = ContentRecord {
            id: 9,
            created_by: Some("curator".into()),
            content_file: Some("/media/a.pdf".into()),
            copyright_by: Some("Press".into()),
            copyright_notes: Some("cc-by".into()),
            additional_notes: Some("note".into()),
            published_year: Some("2001".into()),
            status: "Active".into(),
            title: "A".into(),
            metadata_info: vec![info(1, 4)],
            ..Default::default()
        };

        let content = map_content_records(vec![record]).remove(0);
        assert_eq!(content.id, 9);
        assert_eq!(content.creator.as_deref(), Some("curator"));
        assert_eq!(content.file_url.as_deref(), Some("/media/a.pdf"));
        assert_eq!(content.copyrighter.as_deref(), Some("Press"));
        assert_eq!(content.copyright.as_deref(), Some("cc-by"));
        assert_eq!(content.notes.as_deref(), Some("note"));
        assert_eq!(content.date_published.as_deref(), Some("2001"));
        assert_eq!(content.metadata[&4].len(), 1);
    }
}
