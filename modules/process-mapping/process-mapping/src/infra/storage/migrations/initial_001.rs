use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const OPERATION_ACTIVE_INDEX: &str = "idx_api_process_mappings_operation_active";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApiProcessMappings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApiProcessMappings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApiProcessMappings::TenantId).uuid())
                    .col(ColumnDef::new(ApiProcessMappings::ProductId).string())
                    .col(ColumnDef::new(ApiProcessMappings::ChannelType).string())
                    .col(
                        ColumnDef::new(ApiProcessMappings::OperationId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ApiProcessMappings::ApiPath).string())
                    .col(ColumnDef::new(ApiProcessMappings::HttpMethod).string())
                    .col(
                        ColumnDef::new(ApiProcessMappings::ProcessId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ApiProcessMappings::ProcessVersion).string())
                    .col(
                        ColumnDef::new(ApiProcessMappings::Priority)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(ApiProcessMappings::EffectiveFrom)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(ApiProcessMappings::EffectiveTo).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ApiProcessMappings::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ApiProcessMappings::CreatedBy).string())
                    .col(ColumnDef::new(ApiProcessMappings::UpdatedBy).string())
                    .col(
                        ColumnDef::new(ApiProcessMappings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApiProcessMappings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApiProcessMappings::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(OPERATION_ACTIVE_INDEX)
                    .table(ApiProcessMappings::Table)
                    .col(ApiProcessMappings::OperationId)
                    .col(ApiProcessMappings::IsActive)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(OPERATION_ACTIVE_INDEX)
                    .table(ApiProcessMappings::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ApiProcessMappings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ApiProcessMappings {
    Table,
    Id,
    TenantId,
    ProductId,
    ChannelType,
    OperationId,
    ApiPath,
    HttpMethod,
    ProcessId,
    ProcessVersion,
    Priority,
    EffectiveFrom,
    EffectiveTo,
    IsActive,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
    Version,
}
