use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create partner table
        manager
            .create_table(
                Table::create()
                    .table(Partner::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Partner::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Partner::PartnerCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Partner::Name).string().not_null())
                    .col(ColumnDef::new(Partner::City).string().not_null())
                    .col(ColumnDef::new(Partner::Region).string())
                    .col(ColumnDef::new(Partner::BusinessStatus).integer().not_null())
                    .col(
                        ColumnDef::new(Partner::CooperationStatus)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Partner::CapacityType).integer().not_null())
                    .col(
                        ColumnDef::new(Partner::CarTarget)
                            .integer()
                            .not_null()
                            .default(50),
                    )
                    .col(
                        ColumnDef::new(Partner::BikeTarget)
                            .integer()
                            .not_null()
                            .default(50),
                    )
                    .col(
                        ColumnDef::new(Partner::TotalTarget)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(ColumnDef::new(Partner::Email).string())
                    .col(ColumnDef::new(Partner::SecondaryEmail).string())
                    .col(ColumnDef::new(Partner::Phone).string())
                    .col(ColumnDef::new(Partner::ManagerIds).text())
                    .col(
                        ColumnDef::new(Partner::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Partner::Version).big_integer().not_null())
                    .col(ColumnDef::new(Partner::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Partner::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // 列表过滤和看板聚合的常用索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_partner_region")
                    .table(Partner::Table)
                    .col(Partner::Region)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_partner_cooperation_status")
                    .table(Partner::Table)
                    .col(Partner::CooperationStatus)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_partner_name")
                    .table(Partner::Table)
                    .col(Partner::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Partner::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Partner {
    Table,
    Id,
    PartnerCode,
    Name,
    City,
    Region,
    BusinessStatus,
    CooperationStatus,
    CapacityType,
    CarTarget,
    BikeTarget,
    TotalTarget,
    Email,
    SecondaryEmail,
    Phone,
    ManagerIds,
    IsActive,
    Version,
    CreatedAt,
    UpdatedAt,
}
