// src/services/dashboard_service.rs

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, i18n::I18nStore},
    db::Stores,
    models::{
        dashboard::{
            Activity, ActivityKind, DashboardMetrics, InitialData, LoanStatusSummary,
            ReorderAlert, TopIssuedItem,
        },
        inventory::PpeItem,
        loan::{LoanStatus, LoanTransaction},
        receive::{ReceiveTransaction, RECEIVE_COMPLETED},
        voucher::IssueVoucher,
    },
};

pub const TOP_ISSUED_LIMIT: usize = 5;
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

// =============================================================================
//  Métricas (funções puras sobre os snapshots)
// =============================================================================

pub fn total_stock_value(items: &[PpeItem]) -> Decimal {
    items
        .iter()
        .map(|item| Decimal::from(item.stock) * item.price)
        .sum()
}

fn item_name<'a>(items: &'a [PpeItem], id: i64, unknown: &'a str) -> &'a str {
    items
        .iter()
        .find(|item| item.id == id)
        .map(|item| item.name.as_str())
        .unwrap_or(unknown)
}

/// Soma as quantidades pedidas nas fichas aprovadas (total ou parcial), por item.
/// Empates ficam na ordem em que o item apareceu pela primeira vez.
pub fn top_issued_items(
    items: &[PpeItem],
    vouchers: &[IssueVoucher],
    n: usize,
    unknown: &str,
) -> Vec<TopIssuedItem> {
    let mut totals: Vec<(i64, i64)> = Vec::new();
    let mut positions: HashMap<i64, usize> = HashMap::new();

    for voucher in vouchers.iter().filter(|v| v.status.is_issued()) {
        for line in voucher.lines() {
            let slot = *positions.entry(line.item_id).or_insert_with(|| {
                totals.push((line.item_id, 0));
                totals.len() - 1
            });
            totals[slot].1 += i64::from(line.quantity);
        }
    }

    // sort_by é estável: preserva a ordem de inserção nos empates
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    totals
        .into_iter()
        .take(n)
        .map(|(item_id, total_quantity)| TopIssuedItem {
            item_id,
            item_name: item_name(items, item_id, unknown).to_string(),
            total_quantity,
        })
        .collect()
}

pub fn loan_status_summary(loans: &[LoanTransaction]) -> LoanStatusSummary {
    loans
        .iter()
        .fold(LoanStatusSummary::default(), |mut summary, loan| {
            match loan.status {
                LoanStatus::OnLoan => summary.on_loan += 1,
                LoanStatus::Returned => summary.returned += 1,
            }
            summary
        })
}

pub fn reorder_alerts(items: &[PpeItem]) -> Vec<ReorderAlert> {
    items
        .iter()
        .filter(|item| item.needs_reorder())
        .map(|item| ReorderAlert {
            item_id: item.id,
            item_name: item.name.clone(),
            stock: item.stock,
            reorder_point: item.reorder_point,
        })
        .collect()
}

// Snapshots de entrada para a linha do tempo.
pub struct ActivitySources<'a> {
    pub items: &'a [PpeItem],
    pub vouchers: &'a [IssueVoucher],
    pub loans: &'a [LoanTransaction],
    pub receipts: &'a [ReceiveTransaction],
}

/// Junta criação de fichas, empréstimos, devoluções e recebimentos numa linha do
/// tempo só, do mais recente para o mais antigo.
pub fn recent_activities(
    sources: &ActivitySources<'_>,
    limit: usize,
    lang: &str,
    i18n: &I18nStore,
) -> Vec<Activity> {
    let unknown = i18n.translate(lang, "activity.unknown_item", &[]);
    let mut activities = Vec::new();

    for voucher in sources.vouchers {
        let status_text = i18n.translate(lang, &format!("status.{}", voucher.status.as_str()), &[]);
        activities.push(Activity {
            kind: ActivityKind::IssueVoucher,
            id: voucher.id,
            timestamp: voucher.timestamp,
            description: i18n.translate(
                lang,
                "activity.issue_voucher",
                &[
                    ("id", voucher.id.to_string()),
                    ("user", voucher.user.clone()),
                    ("status", status_text),
                ],
            ),
            status: voucher.status.as_str().to_string(),
        });
    }

    for loan in sources.loans {
        let args = [
            ("item", item_name(sources.items, loan.item_id, &unknown).to_string()),
            ("borrower", loan.borrower_name.clone()),
        ];

        activities.push(Activity {
            kind: ActivityKind::LoanTransaction,
            id: loan.loan_id,
            timestamp: loan.borrow_date,
            description: i18n.translate(lang, "activity.loan", &args),
            status: loan.status.as_str().to_string(),
        });

        if let Some(returned_at) = loan.return_date {
            activities.push(Activity {
                kind: ActivityKind::ReturnTransaction,
                id: loan.loan_id,
                timestamp: returned_at,
                description: i18n.translate(lang, "activity.return", &args),
                status: LoanStatus::Returned.as_str().to_string(),
            });
        }
    }

    for receipt in sources.receipts {
        activities.push(Activity {
            kind: ActivityKind::ReceiveTransaction,
            id: receipt.id,
            timestamp: receipt.timestamp,
            description: i18n.translate(
                lang,
                "activity.receive",
                &[
                    ("item", receipt.item_name.clone()),
                    ("quantity", receipt.quantity.to_string()),
                ],
            ),
            status: RECEIVE_COMPLETED.to_string(),
        });
    }

    activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activities.truncate(limit);
    activities
}

// =============================================================================
//  Carga inicial do painel
// =============================================================================

#[derive(Clone)]
pub struct DashboardService {
    stores: Stores,
    i18n: I18nStore,
}

impl DashboardService {
    pub fn new(stores: Stores, i18n: I18nStore) -> Self {
        Self { stores, i18n }
    }

    pub async fn initial_data(&self, lang: &str) -> Result<InitialData, AppError> {
        let (
            ppe_items,
            issue_vouchers,
            receive_transactions,
            loan_transactions,
            categories,
            departments,
            feedback_data,
            ppe_matrix,
            ppe_documents,
        ) = tokio::try_join!(
            self.stores.items.list_items(),
            self.stores.vouchers.list_vouchers(),
            self.stores.receipts.list_receipts(),
            self.stores.loans.list_loans(),
            self.stores.catalog.list_categories(),
            self.stores.catalog.list_departments(),
            self.stores.auxiliary.list_feedback(),
            self.stores.auxiliary.list_matrix_rules(),
            self.stores.auxiliary.list_documents(),
        )?;

        let unknown = self.i18n.translate(lang, "activity.unknown_item", &[]);
        let sources = ActivitySources {
            items: &ppe_items,
            vouchers: &issue_vouchers,
            loans: &loan_transactions,
            receipts: &receive_transactions,
        };

        let dashboard_metrics = DashboardMetrics {
            total_stock_value: total_stock_value(&ppe_items),
            top_issued_items: top_issued_items(&ppe_items, &issue_vouchers, TOP_ISSUED_LIMIT, &unknown),
            loan_status_summary: loan_status_summary(&loan_transactions),
            recent_activities: recent_activities(&sources, RECENT_ACTIVITY_LIMIT, lang, &self.i18n),
            reorder_alerts: reorder_alerts(&ppe_items),
        };

        tracing::debug!(
            "Carga inicial: {} itens, {} fichas, {} empréstimos",
            ppe_items.len(),
            issue_vouchers.len(),
            loan_transactions.len()
        );

        Ok(InitialData {
            ppe_items,
            issue_vouchers,
            receive_transactions,
            loan_transactions,
            categories,
            departments,
            feedback_data,
            ppe_matrix,
            ppe_documents,
            dashboard_metrics,
        })
    }
}
