use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, QueryFilter, QueryOrder, QueryTrait, Schema, SqlErr,
    Statement, TransactionTrait,
};
use std::collections::HashSet;

use crate::model::lfg::record::LfgRecord;

/// Counts of what a `save_all` call did to the `lfg` table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    /// Rows written for ids the table did not contain yet.
    pub inserted: usize,
    /// Rows overwritten after the insert hit the primary key.
    pub updated: usize,
    /// Stored rows dropped because their LFG was deleted.
    pub removed: u64,
}

/// How a single record reached the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowWrite {
    Inserted,
    Updated,
}

/// A schema object as listed by `sqlite_master`.
#[derive(Debug, FromQueryResult)]
struct SchemaObject {
    sql: String,
}

pub struct LfgRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LfgRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the `lfg` table if it does not exist yet.
    ///
    /// # Returns
    /// - `Ok(())` - Table exists
    /// - `Err(DbErr)` - Database error while creating the table
    pub async fn ensure_table(&self) -> Result<(), DbErr> {
        let schema = Schema::new(self.db.get_database_backend());
        let mut stmt = schema.create_table_from_entity(entity::prelude::Lfg);
        stmt.if_not_exists();

        self.db.execute(&stmt).await?;

        Ok(())
    }

    /// Gets every stored LFG row ordered by id.
    ///
    /// # Returns
    /// - `Ok(Vec<Model>)` - All rows, possibly empty
    /// - `Err(DbErr)` - Database error
    pub async fn get_all(&self) -> Result<Vec<entity::lfg::Model>, DbErr> {
        entity::prelude::Lfg::find()
            .order_by_asc(entity::lfg::Column::Id)
            .all(self.db)
            .await
    }

    /// Writes a snapshot of all in-memory LFGs in one transaction.
    ///
    /// Each record is inserted; when the insert violates the primary key the same values
    /// are written with an UPDATE instead. Afterwards the rows listed in `deleted` are
    /// removed, except ids that are also in the snapshot. Rows that are neither written
    /// nor listed are left untouched, including rows a load could not restore.
    ///
    /// # Arguments
    /// - `records` - Every LFG currently held in memory
    /// - `deleted` - Ids of LFGs deleted since the last successful save
    ///
    /// # Returns
    /// - `Ok(SaveReport)` - Per-path counts
    /// - `Err(DbErr)` - Any other database error; the transaction is rolled back
    pub async fn save_all(
        &self,
        records: Vec<LfgRecord>,
        deleted: Vec<i32>,
    ) -> Result<SaveReport, DbErr> {
        let txn = self.db.begin().await?;
        let mut report = SaveReport::default();
        let written: HashSet<i32> = records.iter().map(|record| record.id).collect();

        for record in records {
            match insert_or_update(&txn, record).await? {
                RowWrite::Inserted => report.inserted += 1,
                RowWrite::Updated => report.updated += 1,
            }
        }

        let deleted: Vec<i32> = deleted
            .into_iter()
            .filter(|id| !written.contains(id))
            .collect();
        if !deleted.is_empty() {
            report.removed = entity::prelude::Lfg::delete_many()
                .filter(entity::lfg::Column::Id.is_in(deleted))
                .exec(&txn)
                .await?
                .rows_affected;
        }

        txn.commit().await?;

        Ok(report)
    }

    /// Renders a script that rebuilds the store: schema first, then every `lfg` row.
    ///
    /// # Returns
    /// - `Ok(String)` - `BEGIN TRANSACTION;` ... `COMMIT;` with one statement per line
    /// - `Err(DbErr)` - Database error while reading schema or rows
    pub async fn dump(&self) -> Result<String, DbErr> {
        let backend = self.db.get_database_backend();

        let objects = SchemaObject::find_by_statement(Statement::from_string(
            backend,
            "SELECT sql FROM sqlite_master \
             WHERE sql IS NOT NULL AND name NOT LIKE 'sqlite_%' \
             ORDER BY CASE type WHEN 'table' THEN 0 ELSE 1 END, name",
        ))
        .all(self.db)
        .await?;

        let mut script = String::from("BEGIN TRANSACTION;\n");

        for object in objects {
            script.push_str(&object.sql);
            script.push_str(";\n");
        }

        for model in self.get_all().await? {
            let insert = entity::prelude::Lfg::insert(model.into_active_model()).build(backend);
            script.push_str(&insert.to_string());
            script.push_str(";\n");
        }

        script.push_str("COMMIT;\n");

        Ok(script)
    }
}

/// Inserts a record, falling back to an UPDATE by id on a uniqueness conflict.
async fn insert_or_update<C: ConnectionTrait>(
    conn: &C,
    record: LfgRecord,
) -> Result<RowWrite, DbErr> {
    let model = record.into_active_model();

    match entity::prelude::Lfg::insert(model.clone())
        .exec_without_returning(conn)
        .await
    {
        Ok(_) => Ok(RowWrite::Inserted),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            model.update(conn).await?;
            Ok(RowWrite::Updated)
        }
        Err(err) => Err(err),
    }
}
