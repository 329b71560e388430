// src/db/sequence.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::store::{SequenceAllocator, Table},
};

// Usa a sequence da coluna identity. `nextval` é atômico, então não existe
// a corrida do "maior id + 1".
#[derive(Clone)]
pub struct PgSequenceAllocator {
    pool: PgPool,
}

impl PgSequenceAllocator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SequenceAllocator for PgSequenceAllocator {
    async fn next_id(&self, table: Table) -> Result<i64, AppError> {
        let next: i64 = sqlx::query_scalar("SELECT nextval(pg_get_serial_sequence($1, $2))")
            .bind(table.name())
            .bind(table.key_column())
            .fetch_one(&self.pool)
            .await?;

        Ok(next)
    }
}
