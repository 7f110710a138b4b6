use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tournaments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub created_by: String,
    #[sea_orm(unique)]
    pub invite_code: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tournament_players::Entity")]
    TournamentPlayers,
    #[sea_orm(has_many = "super::fixtures::Entity")]
    Fixtures,
    #[sea_orm(has_many = "super::standings::Entity")]
    Standings,
    #[sea_orm(has_many = "super::chat_messages::Entity")]
    ChatMessages,
}

impl Related<super::tournament_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TournamentPlayers.def()
    }
}

impl Related<super::fixtures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fixtures.def()
    }
}

impl Related<super::standings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Standings.def()
    }
}

impl Related<super::chat_messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChatMessages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
