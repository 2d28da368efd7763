use sea_orm::entity::prelude::*;

/// One row per live login. At most one row per user survives any
/// successful login (see `SessionRepository::replace_for_user`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Opaque random token, also the primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,

    pub user_id: i64,

    /// RFC3339 UTC. Rows with expires_at in the past are treated as
    /// absent by lookups; the sweeper reclaims them later.
    pub expires_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
