use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        // ==================== 默认费用配置 ====================
        // 金额以最小货币单位（分）存储
        let default_configs: Vec<(&str, Option<&str>, i64, i32)> = vec![
            ("monthly", None, 8000, 7),
            ("grading", Some("Yellow"), 3000, 14),
            ("grading", Some("Orange"), 3000, 14),
            ("grading", Some("Green"), 3500, 14),
            ("grading", Some("Blue"), 3500, 14),
            ("grading", Some("Purple"), 4000, 14),
            ("grading", Some("Brown 3"), 4500, 14),
            ("grading", Some("Brown 2"), 4500, 14),
            ("grading", Some("Brown 1"), 5000, 14),
            ("grading", Some("Black"), 12000, 30),
        ];

        for (fee_type, belt_level, amount, due_days) in default_configs {
            let insert = Query::insert()
                .into_table(FeeConfigs::Table)
                .columns([
                    FeeConfigs::FeeType,
                    FeeConfigs::BeltLevel,
                    FeeConfigs::Amount,
                    FeeConfigs::DueDays,
                    FeeConfigs::UpdatedAt,
                ])
                .values_panic([
                    fee_type.into(),
                    belt_level.map(|b| b.to_string()).into(),
                    amount.into(),
                    due_days.into(),
                    now.into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete().from_table(FeeConfigs::Table).to_owned();
        manager.exec_stmt(delete).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum FeeConfigs {
    #[sea_orm(iden = "fee_configs")]
    Table,
    FeeType,
    BeltLevel,
    Amount,
    DueDays,
    UpdatedAt,
}
