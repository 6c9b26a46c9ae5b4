use super::*;

/// Tests creating the table on a blank database.
///
/// Expected: Ok, and the table accepts rows afterwards
#[tokio::test]
async fn creates_missing_table() -> Result<(), DbErr> {
    let test = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = LfgRepository::new(db);
    repo.ensure_table().await?;

    factory::lfg::create_lfg(db, 0).await?;
    assert_eq!(entity::prelude::Lfg::find().count(db).await?, 1);

    Ok(())
}

/// Tests that an existing table and its rows are left alone.
///
/// Expected: Ok with existing row preserved
#[tokio::test]
async fn keeps_existing_table() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_lfg_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::lfg::create_lfg(db, 7).await?;

    let repo = LfgRepository::new(db);
    repo.ensure_table().await?;

    assert_eq!(entity::prelude::Lfg::find().count(db).await?, 1);

    Ok(())
}
