use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create charts table
        manager
            .create_table(
                Table::create()
                    .table(Charts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Charts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Charts::Name).string().not_null())
                    .col(ColumnDef::new(Charts::VizType).string().not_null())
                    .col(ColumnDef::new(Charts::Owner).string().not_null())
                    .col(ColumnDef::new(Charts::DatasetId).integer())
                    .col(ColumnDef::new(Charts::Mapping).text().not_null())
                    .col(ColumnDef::new(Charts::VizOptions).text().not_null())
                    .col(ColumnDef::new(Charts::AppliedFilters).text().not_null())
                    .col(ColumnDef::new(Charts::Public).boolean().not_null())
                    .col(
                        ColumnDef::new(Charts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Charts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create reports table
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reports::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reports::Name).string().not_null())
                    .col(ColumnDef::new(Reports::Owner).string().not_null())
                    .col(ColumnDef::new(Reports::Heading).text().not_null())
                    .col(ColumnDef::new(Reports::Rows).text().not_null())
                    .col(ColumnDef::new(Reports::Public).boolean().not_null())
                    .col(
                        ColumnDef::new(Reports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reports::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create datasets table
        manager
            .create_table(
                Table::create()
                    .table(Datasets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Datasets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Datasets::Name).string().not_null())
                    .col(ColumnDef::new(Datasets::Category).string())
                    .col(ColumnDef::new(Datasets::Owner).string().not_null())
                    .col(ColumnDef::new(Datasets::Public).boolean().not_null())
                    .col(
                        ColumnDef::new(Datasets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Datasets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create data_themes table
        manager
            .create_table(
                Table::create()
                    .table(DataThemes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DataThemes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DataThemes::Name).string().not_null())
                    .col(ColumnDef::new(DataThemes::Owner).string().not_null())
                    .col(ColumnDef::new(DataThemes::Tabs).text().not_null())
                    .col(ColumnDef::new(DataThemes::Public).boolean().not_null())
                    .col(
                        ColumnDef::new(DataThemes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DataThemes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DataThemes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Datasets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Charts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Charts {
    Table,
    Id,
    Name,
    VizType,
    Owner,
    DatasetId,
    Mapping,
    VizOptions,
    AppliedFilters,
    Public,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Reports {
    Table,
    Id,
    Name,
    Owner,
    Heading,
    Rows,
    Public,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Datasets {
    Table,
    Id,
    Name,
    Category,
    Owner,
    Public,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DataThemes {
    Table,
    Id,
    Name,
    Owner,
    Tabs,
    Public,
    CreatedAt,
    UpdatedAt,
}
