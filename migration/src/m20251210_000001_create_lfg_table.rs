use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lfg::Table)
                    .if_not_exists()
                    .col(integer(Lfg::Id).primary_key())
                    .col(text(Lfg::Name))
                    .col(text_null(Lfg::Description))
                    .col(text_null(Lfg::Game))
                    .col(text_null(Lfg::Datetime))
                    .col(big_integer_null(Lfg::Guild))
                    .col(big_integer_null(Lfg::Owner))
                    .col(text_null(Lfg::Participants))
                    .col(text_null(Lfg::Alternatives))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lfg::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Lfg {
    Table,
    Id,
    Name,
    Description,
    Game,
    Datetime,
    Guild,
    Owner,
    Participants,
    Alternatives,
}
