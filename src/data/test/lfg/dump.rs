use super::*;

/// Tests that the dump holds the schema and every row inside one transaction.
///
/// Expected: Ok with CREATE TABLE and one INSERT per row
#[tokio::test]
async fn dumps_schema_and_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_lfg_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::lfg::LfgFactory::new(db, 0)
        .name("Raid night")
        .build()
        .await?;
    factory::lfg::LfgFactory::new(db, 1)
        .name("Dungeon night")
        .build()
        .await?;

    let script = LfgRepository::new(db).dump().await?;

    assert!(script.starts_with("BEGIN TRANSACTION;\n"));
    assert!(script.ends_with("COMMIT;\n"));
    assert!(script.contains("CREATE TABLE"));
    assert_eq!(script.matches("INSERT INTO \"lfg\"").count(), 2);
    assert!(script.contains("'Raid night'"));
    assert!(script.contains("'Dungeon night'"));

    Ok(())
}

/// Tests dumping an empty store.
///
/// Expected: Ok with schema but no INSERT statements
#[tokio::test]
async fn dumps_schema_for_empty_store() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_lfg_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let script = LfgRepository::new(db).dump().await?;

    assert!(script.contains("CREATE TABLE"));
    assert!(!script.contains("INSERT"));

    Ok(())
}
