use mangaverse_api::{
    db::{create_orm_conn, run_migrations},
    migration::Migrator,
};
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    for migration in Migrator::get_applied_migrations(&orm).await? {
        println!("applied {}", migration.name());
    }
    println!("Migrations applied");
    Ok(())
}
