// src/services/stock_service.rs

use std::sync::Arc;

use crate::{
    common::error::{AppError, InputError},
    db::ItemStore,
    models::{
        inventory::{StockDelta, StockLevel},
        voucher::VoucherLine,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    Increase,
    Decrease,
}

/// Converte linhas `{itemId, quantity}` em deltas de saldo, mantendo a ordem.
pub fn plan_deltas(lines: &[VoucherLine], direction: StockDirection) -> Result<Vec<StockDelta>, AppError> {
    lines
        .iter()
        .map(|line| {
            if line.quantity <= 0 {
                return Err(AppError::InvalidInput(InputError::NonPositiveQuantity));
            }
            let delta = match direction {
                StockDirection::Increase => line.quantity,
                StockDirection::Decrease => -line.quantity,
            };
            Ok(StockDelta { item_id: line.item_id, delta })
        })
        .collect()
}

#[derive(Clone)]
pub struct StockService {
    items: Arc<dyn ItemStore>,
}

impl StockService {
    pub fn new(items: Arc<dyn ItemStore>) -> Self {
        Self { items }
    }

    // Tudo ou nada: se uma linha deixaria saldo negativo, nenhuma é gravada.
    pub async fn adjust_stock(
        &self,
        lines: &[VoucherLine],
        direction: StockDirection,
    ) -> Result<Vec<StockLevel>, AppError> {
        let deltas = plan_deltas(lines, direction)?;
        let levels = self.items.apply_stock_deltas(&deltas).await?;

        tracing::info!("Estoque ajustado ({:?}): {} linha(s)", direction, levels.len());
        Ok(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::memory::MemoryStore, services::testing::item};

    #[test]
    fn decrease_negates_quantities() {
        let lines = [VoucherLine::new(1, 3), VoucherLine::new(2, 1)];
        let deltas = plan_deltas(&lines, StockDirection::Decrease).unwrap();

        assert_eq!(
            deltas,
            vec![
                StockDelta { item_id: 1, delta: -3 },
                StockDelta { item_id: 2, delta: -1 },
            ]
        );
    }

    #[test]
    fn rejects_zero_quantities() {
        let err = plan_deltas(&[VoucherLine::new(1, 0)], StockDirection::Increase).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(InputError::NonPositiveQuantity)));
    }

    #[tokio::test]
    async fn decrease_is_all_or_nothing() {
        let store = Arc::new(MemoryStore::new());
        store.seed_item(item(1, 10, 2));
        store.seed_item(item(2, 1, 0));
        let service = StockService::new(store.clone());

        let err = service
            .adjust_stock(
                &[VoucherLine::new(1, 4), VoucherLine::new(2, 2)],
                StockDirection::Decrease,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::OutOfStock(2)));
        assert_eq!(store.item(1).unwrap().stock, 10);
        assert_eq!(store.item(2).unwrap().stock, 1);
    }

    #[tokio::test]
    async fn increase_reports_new_levels() {
        let store = Arc::new(MemoryStore::new());
        store.seed_item(item(1, 10, 2));
        let service = StockService::new(store.clone());

        let levels = service
            .adjust_stock(&[VoucherLine::new(1, 5)], StockDirection::Increase)
            .await
            .unwrap();

        assert_eq!(levels, vec![StockLevel { id: 1, stock: 15 }]);
    }
}
