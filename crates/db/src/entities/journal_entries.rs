//! `SeaORM` Entity for journal_entries table.

use neraca_core::ledger::JournalEntry;
use neraca_shared::types::JournalEntryId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Posting sequence; assigned by the database on insert.
    #[sea_orm(unique)]
    pub sequence: i64,
    pub entry_date: Date,
    pub reference: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: EntryStatus,
    pub posted_at: Option<DateTimeWithTimeZone>,
    pub posted_by: Option<String>,
    pub voided_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_lines::Entity")]
    JournalLines,
}

impl Related<super::journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for JournalEntry {
    fn from(model: Model) -> Self {
        Self {
            id: JournalEntryId::from_uuid(model.id),
            entry_date: model.entry_date,
            reference: model.reference,
            description: model.description,
            status: model.status.into(),
            posted_at: model.posted_at.map(Into::into),
            posted_by: model.posted_by,
        }
    }
}
