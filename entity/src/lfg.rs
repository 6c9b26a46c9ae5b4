use sea_orm::entity::prelude::*;

/// One scheduled looking-for-group event.
///
/// Roster columns hold comma-joined Discord user IDs and are an empty string,
/// never NULL, when the roster is empty. `datetime` holds the zone-qualified
/// `zone:YYYY-MM-DD:HH-MM` text form.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lfg")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub game: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub datetime: Option<String>,
    pub guild: Option<i64>,
    pub owner: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub participants: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub alternatives: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
