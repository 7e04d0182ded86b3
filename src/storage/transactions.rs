//! Stock movement operations on the inventory store
//!
//! Recording a movement and adjusting the item's quantity happen in one
//! SQLite transaction, so a rejected stock-out leaves nothing behind.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::store::{opt_uuid_col, parsed_col, sql_bound, uuid_col, InventoryStore};
use crate::storage::types::{
    ItemSummary, NewTransaction, Transaction, TransactionDetail, TransactionKind,
};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const SELECT_DETAIL: &str = "
    SELECT t.id, t.item_id, t.kind, t.quantity, t.notes, t.created_by, t.date,
           i.name, i.sku, i.quantity
    FROM transactions t
    JOIN items i ON i.id = t.item_id";

impl InventoryStore {
    /// Record a stock-in or stock-out and apply it to the item's quantity
    pub fn record_transaction(
        &self,
        new: NewTransaction,
        created_by: Option<Uuid>,
    ) -> StorageResult<TransactionDetail> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let available: i64 = tx
            .query_row(
                "SELECT quantity FROM items WHERE id = ?1",
                params![new.item_id.to_string()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| {
                StorageError::InvalidReference(format!("Item {} does not exist", new.item_id))
            })?;

        let remaining = match new.kind {
            TransactionKind::In => available.checked_add(new.quantity).ok_or_else(|| {
                StorageError::Conflict("Stock quantity would overflow".to_string())
            })?,
            TransactionKind::Out => {
                if new.quantity > available {
                    return Err(StorageError::InsufficientStock {
                        requested: new.quantity,
                        available,
                    });
                }
                available - new.quantity
            }
        };

        let transaction = Transaction {
            id: Uuid::new_v4(),
            item_id: new.item_id,
            kind: new.kind,
            quantity: new.quantity,
            notes: new
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_by,
            date: Utc::now(),
        };

        tx.execute(
            "UPDATE items SET quantity = ?1, updated_at = ?2 WHERE id = ?3",
            params![remaining, transaction.date, new.item_id.to_string()],
        )?;
        tx.execute(
            "INSERT INTO transactions (id, item_id, kind, quantity, notes, created_by, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                transaction.id.to_string(),
                transaction.item_id.to_string(),
                transaction.kind.as_str(),
                transaction.quantity,
                transaction.notes,
                transaction.created_by.map(|id| id.to_string()),
                transaction.date,
            ],
        )?;
        tx.commit()?;

        tracing::info!(
            transaction_id = %transaction.id,
            item_id = %transaction.item_id,
            kind = transaction.kind.as_str(),
            quantity = transaction.quantity,
            remaining,
            "Recorded stock movement"
        );

        fetch_transaction(&conn, transaction.id)?
            .ok_or_else(|| StorageError::NotFound("Transaction".to_string()))
    }

    pub fn get_transaction(&self, id: Uuid) -> StorageResult<Option<TransactionDetail>> {
        let conn = self.conn()?;
        fetch_transaction(&conn, id)
    }

    /// Movements newest first, optionally for a single item
    pub fn list_transactions(
        &self,
        item_id: Option<Uuid>,
        limit: Option<usize>,
    ) -> StorageResult<Vec<TransactionDetail>> {
        let mut sql = SELECT_DETAIL.to_string();
        let mut args: Vec<Value> = Vec::new();

        if let Some(item_id) = item_id {
            args.push(Value::Text(item_id.to_string()));
            sql.push_str(" WHERE t.item_id = ?1");
        }
        sql.push_str(" ORDER BY t.date DESC, t.id");
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", sql_bound(limit)));
        }

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(params_from_iter(args.iter()), detail_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(transactions)
    }
}

fn fetch_transaction(conn: &Connection, id: Uuid) -> StorageResult<Option<TransactionDetail>> {
    let transaction = conn
        .query_row(
            &format!("{} WHERE t.id = ?1", SELECT_DETAIL),
            params![id.to_string()],
            detail_from_row,
        )
        .optional()?;
    Ok(transaction)
}

fn detail_from_row(row: &Row<'_>) -> rusqlite::Result<TransactionDetail> {
    let transaction = Transaction {
        id: uuid_col(row, 0)?,
        item_id: uuid_col(row, 1)?,
        kind: parsed_col(row, 2)?,
        quantity: row.get(3)?,
        notes: row.get(4)?,
        created_by: opt_uuid_col(row, 5)?,
        date: row.get(6)?,
    };

    let item = ItemSummary {
        id: transaction.item_id,
        name: row.get(7)?,
        sku: row.get(8)?,
        quantity: row.get(9)?,
    };

    Ok(TransactionDetail { transaction, item })
}
