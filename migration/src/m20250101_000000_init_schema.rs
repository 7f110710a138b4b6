use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Bio).text().not_null().default(""))
                    .col(ColumnDef::new(Users::Wins).integer().not_null().default(0))
                    .col(ColumnDef::new(Users::Losses).integer().not_null().default(0))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // Create tournaments table
        manager
            .create_table(
                Table::create()
                    .table(Tournaments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tournaments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tournaments::Name).string().not_null())
                    .col(ColumnDef::new(Tournaments::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Tournaments::InviteCode)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Tournaments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create tournament_players table
        manager
            .create_table(
                Table::create()
                    .table(TournamentPlayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TournamentPlayers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TournamentPlayers::TournamentId).integer().not_null())
                    .col(ColumnDef::new(TournamentPlayers::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(TournamentPlayers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tournament_players_tournament_id")
                            .from(TournamentPlayers::Table, TournamentPlayers::TournamentId)
                            .to(Tournaments::Table, Tournaments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tournament_players_user_id")
                            .from(TournamentPlayers::Table, TournamentPlayers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tournament_players_membership")
                    .table(TournamentPlayers::Table)
                    .col(TournamentPlayers::TournamentId)
                    .col(TournamentPlayers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create fixtures table
        manager
            .create_table(
                Table::create()
                    .table(Fixtures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fixtures::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fixtures::TournamentId).integer().not_null())
                    .col(ColumnDef::new(Fixtures::Home).string().not_null())
                    .col(ColumnDef::new(Fixtures::Away).string().not_null())
                    .col(ColumnDef::new(Fixtures::HomeScore).integer().not_null().default(0))
                    .col(ColumnDef::new(Fixtures::AwayScore).integer().not_null().default(0))
                    .col(ColumnDef::new(Fixtures::Played).boolean().not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fixtures_tournament_id")
                            .from(Fixtures::Table, Fixtures::TournamentId)
                            .to(Tournaments::Table, Tournaments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create standings table
        manager
            .create_table(
                Table::create()
                    .table(Standings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Standings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Standings::TournamentId).integer().not_null())
                    .col(ColumnDef::new(Standings::Player).string().not_null())
                    .col(ColumnDef::new(Standings::Played).integer().not_null().default(0))
                    .col(ColumnDef::new(Standings::Won).integer().not_null().default(0))
                    .col(ColumnDef::new(Standings::Drawn).integer().not_null().default(0))
                    .col(ColumnDef::new(Standings::Lost).integer().not_null().default(0))
                    .col(ColumnDef::new(Standings::Gf).integer().not_null().default(0))
                    .col(ColumnDef::new(Standings::Ga).integer().not_null().default(0))
                    .col(ColumnDef::new(Standings::Gd).integer().not_null().default(0))
                    .col(ColumnDef::new(Standings::Points).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_standings_tournament_id")
                            .from(Standings::Table, Standings::TournamentId)
                            .to(Tournaments::Table, Tournaments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_standings_tournament_player")
                    .table(Standings::Table)
                    .col(Standings::TournamentId)
                    .col(Standings::Player)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create chat_messages table
        manager
            .create_table(
                Table::create()
                    .table(ChatMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatMessages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChatMessages::TournamentId).integer().not_null())
                    .col(ColumnDef::new(ChatMessages::UserId).integer().not_null())
                    .col(ColumnDef::new(ChatMessages::Username).string().not_null())
                    .col(ColumnDef::new(ChatMessages::Body).text().not_null())
                    .col(
                        ColumnDef::new(ChatMessages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_messages_tournament_id")
                            .from(ChatMessages::Table, ChatMessages::TournamentId)
                            .to(Tournaments::Table, Tournaments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_messages_user_id")
                            .from(ChatMessages::Table, ChatMessages::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(ChatMessages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Standings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Fixtures::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TournamentPlayers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tournaments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Bio,
    Wins,
    Losses,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tournaments {
    Table,
    Id,
    Name,
    CreatedBy,
    InviteCode,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TournamentPlayers {
    Table,
    Id,
    TournamentId,
    UserId,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Fixtures {
    Table,
    Id,
    TournamentId,
    Home,
    Away,
    HomeScore,
    AwayScore,
    Played,
}

#[derive(DeriveIden)]
enum Standings {
    Table,
    Id,
    TournamentId,
    Player,
    Played,
    Won,
    Drawn,
    Lost,
    Gf,
    Ga,
    Gd,
    Points,
}

#[derive(DeriveIden)]
enum ChatMessages {
    Table,
    Id,
    TournamentId,
    UserId,
    Username,
    Body,
    CreatedAt,
}
