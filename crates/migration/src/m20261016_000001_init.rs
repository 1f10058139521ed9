use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Signers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Signers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Signers::NamaLengkap).string().not_null())
                    .col(ColumnDef::new(Signers::NoKegiatan).string().not_null())
                    .col(
                        ColumnDef::new(Signers::Status)
                            .string_len(16)
                            .not_null()
                            .default("aktif"),
                    )
                    .col(
                        ColumnDef::new(Signers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Certificates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Certificates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Certificates::NoSertifikat)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Certificates::NamaPeserta).string().not_null())
                    .col(ColumnDef::new(Certificates::NamaKegiatan).text().not_null())
                    .col(ColumnDef::new(Certificates::TanggalDitetapkan).date().null())
                    .col(
                        ColumnDef::new(Certificates::PdfUrl)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Certificates::Status)
                            .string_len(16)
                            .not_null()
                            .default("aktif"),
                    )
                    .col(ColumnDef::new(Certificates::CompetencyUnits).json_binary().null())
                    .col(ColumnDef::new(Certificates::SignerId).uuid().null())
                    .col(
                        ColumnDef::new(Certificates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("certificates_signer_id_fkey")
                            .from(Certificates::Table, Certificates::SignerId)
                            .to(Signers::Table, Signers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("certificates_created_at_idx")
                    .table(Certificates::Table)
                    .col(Certificates::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("signers_created_at_idx")
                    .table(Signers::Table)
                    .col(Signers::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Certificates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Signers::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Signers {
    Table,
    Id,
    NamaLengkap,
    NoKegiatan,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Certificates {
    Table,
    Id,
    NoSertifikat,
    NamaPeserta,
    NamaKegiatan,
    TanggalDitetapkan,
    PdfUrl,
    Status,
    CompetencyUnits,
    SignerId,
    CreatedAt,
}
