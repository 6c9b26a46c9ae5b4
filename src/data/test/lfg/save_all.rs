use super::*;

/// Tests that a record with a new id is inserted.
///
/// Expected: Ok with one insert and the row stored as CSV and time text
#[tokio::test]
async fn inserts_new_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_lfg_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut lfg = record(0, "Raid night");
    lfg.participants.push(UserId::new(42));
    lfg.alternatives.push(UserId::new(43));

    let report = LfgRepository::new(db).save_all(vec![lfg], Vec::new()).await?;

    assert_eq!(
        report,
        SaveReport {
            inserted: 1,
            updated: 0,
            removed: 0
        }
    );
    let stored = entity::prelude::Lfg::find_by_id(0).one(db).await?.unwrap();
    assert_eq!(stored.name, "Raid night");
    assert_eq!(stored.datetime.as_deref(), Some("UTC:2030-1-1:20-0"));
    assert_eq!(
        stored.participants,
        Some(format!("{},42", factory::lfg::DEFAULT_OWNER_ID))
    );
    assert_eq!(stored.alternatives.as_deref(), Some("43"));

    Ok(())
}

/// Tests that saving the same id twice takes the conflict path.
///
/// The second save hits the primary key and must fall back to an UPDATE carrying
/// the latest values.
///
/// Expected: first save inserts, second updates, row reflects second values
#[tokio::test]
async fn updates_existing_rows_on_conflict() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_lfg_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = LfgRepository::new(db);

    let first = repo.save_all(vec![record(0, "Raid night")], Vec::new()).await?;
    let mut renamed = record(0, "Dungeon night");
    renamed.alternatives.push(UserId::new(99));
    let second = repo.save_all(vec![renamed], Vec::new()).await?;

    assert_eq!(first.inserted, 1);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.updated, 1);
    let rows = entity::prelude::Lfg::find().all(db).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Dungeon night");
    assert_eq!(rows[0].alternatives.as_deref(), Some("99"));

    Ok(())
}

/// Tests that only rows listed as deleted are removed.
///
/// Expected: deleted row gone, unlisted stored row kept
#[tokio::test]
async fn removes_only_deleted_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_lfg_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::lfg::create_lfg(db, 0).await?;
    factory::lfg::create_lfg(db, 1).await?;
    factory::lfg::create_lfg(db, 3).await?;

    let report = LfgRepository::new(db)
        .save_all(vec![record(1, "Kept"), record(2, "New")], vec![0])
        .await?;

    assert_eq!(report.removed, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.inserted, 1);
    let ids: Vec<i32> = entity::prelude::Lfg::find()
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    Ok(())
}

/// Tests a deleted id that was reassigned before the save.
///
/// Expected: the new row is written and not removed
#[tokio::test]
async fn keeps_deleted_id_that_was_reused() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_lfg_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::lfg::create_lfg(db, 0).await?;

    let report = LfgRepository::new(db)
        .save_all(vec![record(0, "Replacement")], vec![0])
        .await?;

    assert_eq!(report.removed, 0);
    let stored = entity::prelude::Lfg::find_by_id(0).one(db).await?.unwrap();
    assert_eq!(stored.name, "Replacement");

    Ok(())
}

/// Tests that non-conflict failures are surfaced.
///
/// Expected: Err when the table is missing
#[tokio::test]
async fn fails_without_table() -> Result<(), DbErr> {
    let test = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let result = LfgRepository::new(db)
        .save_all(vec![record(0, "Raid night")], Vec::new())
        .await;

    assert!(result.is_err());

    Ok(())
}
