use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::NotSet, Set};
use voterroll_core::{Field, Provenance, Record, RecordFields, RelationKind, RelationTag};
use voterroll_entities::{records, relations};

pub fn record_from_model(m: records::Model) -> Record {
    let fields = RecordFields {
        serial_number: m.serial_number,
        name: m.name,
        voter_number: m.voter_number,
        father_name: m.father_name,
        mother_name: m.mother_name,
        occupation: m.occupation,
        date_of_birth: m.date_of_birth,
        address: m.address,
    };

    Record {
        id: m.id,
        fields,
        provenance: Provenance::parse(&m.file_name),
        uploaded_at: m.uploaded_at,
    }
}

pub fn tag_from_model(m: relations::Model) -> RelationTag {
    let kind = m
        .relation_type
        .parse::<RelationKind>()
        .unwrap_or(RelationKind::None);
    let fields = RecordFields {
        serial_number: m.serial_number,
        name: m.name,
        voter_number: m.voter_number,
        father_name: m.father_name,
        mother_name: m.mother_name,
        occupation: m.occupation,
        date_of_birth: m.date_of_birth,
        address: m.address,
    };

    RelationTag {
        id: m.id,
        record_id: m.record_id,
        kind,
        fields,
        file_name: m.file_name,
        folder: m.folder,
        created_at: m.created_at,
    }
}

pub fn new_record_model(
    fields: &RecordFields,
    provenance_key: &str,
    uploaded_at: DateTime<Utc>,
) -> records::ActiveModel {
    records::ActiveModel {
        id: NotSet,
        serial_number: Set(fields.serial_number.clone()),
        name: Set(fields.name.clone()),
        voter_number: Set(fields.voter_number.clone()),
        father_name: Set(fields.father_name.clone()),
        mother_name: Set(fields.mother_name.clone()),
        occupation: Set(fields.occupation.clone()),
        date_of_birth: Set(fields.date_of_birth.clone()),
        address: Set(fields.address.clone()),
        file_name: Set(provenance_key.to_string()),
        uploaded_at: Set(uploaded_at),
    }
}

/// Snapshot a record into a new tag row.
pub fn new_tag_model(
    record: &records::Model,
    kind: RelationKind,
    created_at: DateTime<Utc>,
) -> relations::ActiveModel {
    let folder = Provenance::parse(&record.file_name)
        .folder()
        .map(str::to_string);

    relations::ActiveModel {
        id: NotSet,
        record_id: Set(record.id),
        relation_type: Set(kind.as_str().to_string()),
        serial_number: Set(record.serial_number.clone()),
        name: Set(record.name.clone()),
        voter_number: Set(record.voter_number.clone()),
        father_name: Set(record.father_name.clone()),
        mother_name: Set(record.mother_name.clone()),
        occupation: Set(record.occupation.clone()),
        date_of_birth: Set(record.date_of_birth.clone()),
        address: Set(record.address.clone()),
        file_name: Set(record.file_name.clone()),
        folder: Set(folder),
        created_at: Set(created_at),
    }
}

/// Mark one field column as changed on an existing record.
pub fn set_field(model: &mut records::ActiveModel, field: Field, value: &str) {
    let value = Set(Some(value.to_string()));
    match field {
        Field::SerialNumber => model.serial_number = value,
        Field::Name => model.name = value,
        Field::VoterNumber => model.voter_number = value,
        Field::FatherName => model.father_name = value,
        Field::MotherName => model.mother_name = value,
        Field::Occupation => model.occupation = value,
        Field::DateOfBirth => model.date_of_birth = value,
        Field::Address => model.address = value,
    }
}
