use crate::entities::categories;
use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Forum sections available from day one. "General" must stay id 1:
/// posts created without a category land there.
const SEED: &[(&str, &str)] = &[
    ("General", "Anything that fits nowhere else"),
    ("Technology", "Hardware, software and everything in between"),
    ("Gaming", "Video games, board games, game design"),
    ("Creative", "Writing, art, music and other projects"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, description) in SEED {
            let insert = Query::insert()
                .into_table(Categories)
                .columns([categories::Column::Name, categories::Column::Description])
                .values_panic([(*name).into(), (*description).into()])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names: Vec<&str> = SEED.iter().map(|(name, _)| *name).collect();

        let delete = Query::delete()
            .from_table(Categories)
            .and_where(Expr::col(categories::Column::Name).is_in(names))
            .to_owned();

        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
