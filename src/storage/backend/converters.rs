use crate::storage::LinkRecord;
use migration::entities::link;

pub fn model_to_record(model: link::Model) -> LinkRecord {
    LinkRecord {
        id: model.id,
        destination: model.link,
        identity_hash: model.identity_hash,
        created_at: model.created_at,
    }
}

pub fn record_to_active_model(record: &LinkRecord) -> link::ActiveModel {
    use sea_orm::ActiveValue::Set;

    link::ActiveModel {
        id: Set(record.id.clone()),
        link: Set(record.destination.clone()),
        identity_hash: Set(record.identity_hash.clone()),
        created_at: Set(record.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn test_model_to_record() {
        let record = model_to_record(link::Model {
            id: "ab12Cd".to_string(),
            link: "https://example.com".to_string(),
            identity_hash: None,
            created_at: 1_700_000_000,
        });

        assert_eq!(record.id, "ab12Cd");
        assert_eq!(record.destination, "https://example.com");
        assert!(record.identity_hash.is_none());
        assert_eq!(record.created_at, 1_700_000_000);
    }

    #[test]
    fn test_active_model_sets_every_column() {
        let record = LinkRecord::new("ab12Cd", "https://example.com", Some("h".into()), 5);
        let model = record_to_active_model(&record);

        assert!(matches!(model.id, ActiveValue::Set(ref id) if id == "ab12Cd"));
        assert!(matches!(model.link, ActiveValue::Set(ref l) if l == "https://example.com"));
        assert!(matches!(model.identity_hash, ActiveValue::Set(Some(ref h)) if h == "h"));
        assert!(matches!(model.created_at, ActiveValue::Set(5)));
    }
}
