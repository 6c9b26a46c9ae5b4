use super::*;

/// Tests reading an empty table.
///
/// Expected: Ok with no rows
#[tokio::test]
async fn returns_empty_for_empty_table() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_lfg_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let rows = LfgRepository::new(db).get_all().await?;

    assert!(rows.is_empty());

    Ok(())
}

/// Tests that rows come back ordered by id regardless of insertion order.
///
/// Expected: Ok with ids ascending
#[tokio::test]
async fn returns_rows_ordered_by_id() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_lfg_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::lfg::create_lfg(db, 5).await?;
    factory::lfg::create_lfg(db, 1).await?;
    factory::lfg::create_lfg(db, 3).await?;

    let rows = LfgRepository::new(db).get_all().await?;

    assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3, 5]);

    Ok(())
}
