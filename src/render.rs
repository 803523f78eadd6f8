use std::io::Write;

use prettytable::{Cell, Row, Table};
use serde_json::{Map, Value};
use strum_macros::Display;

use crate::error::CliError;
use crate::model::VolumeRecord;

/// Volume attributes that can be displayed, labelled as the operator sees
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum VolumeField {
    Id,
    CreatedAt,
    UpdatedAt,
    Name,
    Description,
    Size,
    AvailabilityZone,
    Status,
    PoolId,
    ProfileId,
    Metadata,
    GroupId,
    SnapshotId,
    MultiAttach,
}

use VolumeField::*;

pub const CREATE_FIELDS: &[VolumeField] = &[
    Id, CreatedAt, Name, Description, Size, AvailabilityZone, Status, PoolId, ProfileId,
    Metadata, GroupId, MultiAttach,
];

pub const SHOW_FIELDS: &[VolumeField] = &[
    Id, CreatedAt, UpdatedAt, Name, Description, Size, AvailabilityZone, Status, PoolId,
    ProfileId, Metadata, GroupId, SnapshotId, MultiAttach,
];

pub const LIST_FIELDS: &[VolumeField] = &[
    Id, Name, Description, Size, Status, ProfileId, AvailabilityZone,
];

pub const UPDATE_FIELDS: &[VolumeField] = &[
    Id, UpdatedAt, Name, Description, Size, AvailabilityZone, Status, PoolId, ProfileId,
    Metadata, GroupId, MultiAttach,
];

pub const EXTEND_FIELDS: &[VolumeField] = &[
    Id, CreatedAt, UpdatedAt, Name, Description, Size, AvailabilityZone, Status, PoolId,
    ProfileId, Metadata, GroupId, MultiAttach,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl VolumeField {
    fn value(self, record: &VolumeRecord) -> Value {
        match self {
            Id => Value::from(record.id.as_str()),
            CreatedAt => Value::from(record.created_at.as_str()),
            UpdatedAt => Value::from(record.updated_at.as_str()),
            Name => Value::from(record.name.as_str()),
            Description => Value::from(record.description.as_str()),
            Size => Value::from(record.size),
            AvailabilityZone => Value::from(record.availability_zone.as_str()),
            Status => Value::from(record.status.as_str()),
            PoolId => Value::from(record.pool_id.as_str()),
            ProfileId => Value::from(record.profile_id.as_str()),
            Metadata => Value::Object(record.metadata.clone()),
            GroupId => Value::from(record.group_id.as_str()),
            SnapshotId => Value::from(record.snapshot_id.as_str()),
            MultiAttach => Value::from(record.multi_attach),
        }
    }
}

/// The fields of one record selected for display, in display order.
pub type Projection = Vec<(VolumeField, Value)>;

pub fn project(record: &VolumeRecord, fields: &[VolumeField]) -> Projection {
    fields
        .iter()
        .map(|field| (*field, field.value(record)))
        .collect()
}

/// Table text of a projected value. Mappings go through the JSON formatter.
fn format_value(field: VolumeField, value: &Value) -> String {
    match (field, value) {
        (Metadata, value) => serde_json::to_string_pretty(value).unwrap_or_default(),
        (_, Value::String(text)) => text.clone(),
        (_, Value::Null) => String::new(),
        (_, other) => other.to_string(),
    }
}

fn to_json_object(projection: Projection) -> Value {
    let object: Map<String, Value> = projection
        .into_iter()
        .map(|(field, value)| (field.to_string(), value))
        .collect();
    Value::Object(object)
}

pub fn record_table(projection: &Projection) -> Table {
    let mut table = Table::new();
    table.set_titles(Row::new(vec![Cell::new("Property"), Cell::new("Value")]));
    for (field, value) in projection {
        table.add_row(Row::new(vec![
            Cell::new(&field.to_string()),
            Cell::new(&format_value(*field, value)),
        ]));
    }
    table
}

pub fn list_table(projections: &[Projection], fields: &[VolumeField]) -> Table {
    let mut table = Table::new();
    table.set_titles(Row::new(
        fields
            .iter()
            .map(|field| Cell::new(&field.to_string()))
            .collect(),
    ));
    for projection in projections {
        table.add_row(Row::new(
            projection
                .iter()
                .map(|(field, value)| Cell::new(&format_value(*field, value)))
                .collect(),
        ));
    }
    table
}

pub fn print_record(
    out: &mut dyn Write,
    record: &VolumeRecord,
    fields: &[VolumeField],
    format: OutputFormat,
) -> Result<(), CliError> {
    let projection = project(record, fields);
    match format {
        OutputFormat::Table => {
            record_table(&projection).print(out)?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&to_json_object(projection))?)?;
        }
    }
    Ok(())
}

pub fn print_list(
    out: &mut dyn Write,
    records: &[VolumeRecord],
    fields: &[VolumeField],
    format: OutputFormat,
) -> Result<(), CliError> {
    let projections: Vec<Projection> = records
        .iter()
        .map(|record| project(record, fields))
        .collect();
    match format {
        OutputFormat::Table => {
            list_table(&projections, fields).print(out)?;
        }
        OutputFormat::Json => {
            let rows: Vec<Value> = projections.into_iter().map(to_json_object).collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        }
    }
    Ok(())
}
