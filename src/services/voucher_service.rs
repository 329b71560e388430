// src/services/voucher_service.rs

use std::sync::Arc;

use chrono::{Local, Utc};
use sqlx::types::Json;

use crate::{
    common::{
        error::{AppError, InputError},
        i18n::I18nStore,
    },
    db::{SequenceAllocator, Table, VoucherStore},
    models::{
        inventory::StockDelta,
        voucher::{
            IssueVoucher, ReceiptConfirmation, ReceiptOutcome, VoucherDecision, VoucherLine,
            VoucherStatus,
        },
    },
    services::{
        notification::{NotificationSink, PushMessage},
        stock_service::{plan_deltas, StockDirection},
    },
};

#[derive(Debug, Clone)]
pub struct NewVoucher {
    pub user: String,
    pub department: String,
    pub employee_id: String,
    pub user_id: String,
    pub lines: Vec<VoucherLine>,
}

// Resultado da conferência de uma aprovação parcial.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialPlan {
    pub status: VoucherStatus,
    pub deductions: Vec<StockDelta>,
    pub note_lines: Vec<String>,
}

/// Compara as linhas aprovadas com as pedidas.
///
/// Cada linha aprovada é casada com a primeira linha original do mesmo item. Só
/// linhas com quantidade positiva baixam estoque. Basta uma linha abaixo do pedido
/// para o status final ser `partially_approved`.
pub fn plan_partial_approval(
    original: &[VoucherLine],
    approved: &[VoucherLine],
) -> Result<PartialPlan, AppError> {
    let mut fully_approved = true;
    let mut deductions = Vec::new();
    let mut note_lines = Vec::new();

    for line in approved {
        let requested = original.iter().find(|o| o.item_id == line.item_id);

        if line.quantity > 0 {
            deductions.push(StockDelta { item_id: line.item_id, delta: -line.quantity });

            let name = line
                .item_name
                .clone()
                .or_else(|| requested.and_then(|o| o.item_name.clone()))
                .unwrap_or_else(|| format!("#{}", line.item_id));
            let requested_qty = requested
                .map(|o| o.quantity.to_string())
                .unwrap_or_else(|| "?".to_string());
            note_lines.push(format!("- {}: {}/{}", name, line.quantity, requested_qty));
        }

        if let Some(requested) = requested {
            if line.quantity < requested.quantity {
                fully_approved = false;
            }
        }
    }

    if deductions.is_empty() {
        return Err(AppError::InvalidInput(InputError::NoApprovedLines));
    }

    let status = if fully_approved {
        VoucherStatus::Approved
    } else {
        VoucherStatus::PartiallyApproved
    };

    Ok(PartialPlan { status, deductions, note_lines })
}

#[derive(Clone)]
pub struct VoucherService {
    sequence: Arc<dyn SequenceAllocator>,
    vouchers: Arc<dyn VoucherStore>,
    notifier: Arc<dyn NotificationSink>,
    i18n: I18nStore,
    // Idioma das notas gravadas e das mensagens para o admin.
    system_lang: String,
    admin_recipient: Option<String>,
}

impl VoucherService {
    pub fn new(
        sequence: Arc<dyn SequenceAllocator>,
        vouchers: Arc<dyn VoucherStore>,
        notifier: Arc<dyn NotificationSink>,
        i18n: I18nStore,
        system_lang: String,
        admin_recipient: Option<String>,
    ) -> Self {
        Self {
            sequence,
            vouchers,
            notifier,
            i18n,
            system_lang,
            admin_recipient,
        }
    }

    async fn pending_voucher(&self, id: i64) -> Result<IssueVoucher, AppError> {
        let voucher = self
            .vouchers
            .find_voucher(id)
            .await?
            .ok_or(AppError::VoucherNotFound(id))?;

        if voucher.status != VoucherStatus::Pending {
            return Err(AppError::VoucherAlreadyProcessed(id));
        }
        Ok(voucher)
    }

    // --- CREATE ---
    pub async fn create(&self, request: NewVoucher) -> Result<IssueVoucher, AppError> {
        if request.lines.is_empty() {
            return Err(AppError::InvalidInput(InputError::EmptyVoucher));
        }
        if request.lines.iter().any(|line| line.quantity <= 0) {
            return Err(AppError::InvalidInput(InputError::NonPositiveQuantity));
        }

        let id = self.sequence.next_id(Table::IssueVouchers).await?;
        let voucher = IssueVoucher {
            id,
            timestamp: Utc::now(),
            user: request.user,
            department: request.department,
            employee_id: request.employee_id,
            user_id: request.user_id,
            status: VoucherStatus::Pending,
            admin_notes: String::new(),
            items_json: Json(request.lines),
            status_received: None,
            received_at: None,
            received_by: None,
        };

        let created = self.vouchers.insert_voucher(&voucher).await?;
        tracing::info!("Ficha #{} criada por {} ({} linha(s))", created.id, created.user, created.lines().len());
        Ok(created)
    }

    // --- APROVAÇÃO TOTAL ---
    pub async fn approve_full(&self, id: i64) -> Result<VoucherDecision, AppError> {
        let voucher = self.pending_voucher(id).await?;
        // Fichas antigas podem ter linhas zeradas: não baixam nada.
        let lines: Vec<VoucherLine> = voucher
            .lines()
            .iter()
            .filter(|line| line.quantity > 0)
            .cloned()
            .collect();
        let deductions = plan_deltas(&lines, StockDirection::Decrease)?;
        let note = self.i18n.translate(&self.system_lang, "voucher.note_approved", &[]);

        let levels = self
            .vouchers
            .settle_voucher(id, VoucherStatus::Approved, &note, &deductions)
            .await?;

        tracing::info!("Ficha #{} aprovada, {} item(ns) baixado(s)", id, levels.len());
        Ok(VoucherDecision {
            updated_voucher_id: id,
            status: VoucherStatus::Approved,
            updated_stock_items: Some(levels),
        })
    }

    // --- APROVAÇÃO PARCIAL ---
    pub async fn approve_partial(
        &self,
        id: i64,
        approved: &[VoucherLine],
    ) -> Result<VoucherDecision, AppError> {
        let voucher = self.pending_voucher(id).await?;
        let plan = plan_partial_approval(voucher.lines(), approved)?;

        let header = self.i18n.translate(&self.system_lang, "voucher.note_partial", &[]);
        let note = std::iter::once(header)
            .chain(plan.note_lines)
            .collect::<Vec<_>>()
            .join(" ");

        let levels = self
            .vouchers
            .settle_voucher(id, plan.status, &note, &plan.deductions)
            .await?;

        tracing::info!("Ficha #{} -> {}", id, plan.status.as_str());
        Ok(VoucherDecision {
            updated_voucher_id: id,
            status: plan.status,
            updated_stock_items: Some(levels),
        })
    }

    // --- REJEIÇÃO ---
    pub async fn reject(&self, id: i64) -> Result<VoucherDecision, AppError> {
        self.pending_voucher(id).await?;
        let note = self.i18n.translate(&self.system_lang, "voucher.note_rejected", &[]);

        self.vouchers
            .settle_voucher(id, VoucherStatus::Rejected, &note, &[])
            .await?;

        tracing::info!("Ficha #{} rejeitada", id);
        Ok(VoucherDecision {
            updated_voucher_id: id,
            status: VoucherStatus::Rejected,
            updated_stock_items: None,
        })
    }

    // --- CONFIRMAÇÃO DE RECEBIMENTO ---
    pub async fn confirm_receive(
        &self,
        id: i64,
        user_id: &str,
        user_name: Option<&str>,
    ) -> Result<ReceiptConfirmation, AppError> {
        let receiver = user_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(user_id);

        let marked = self.vouchers.mark_received(id, receiver, Utc::now()).await?;
        if !marked {
            return Ok(ReceiptConfirmation {
                status: ReceiptOutcome::AlreadyReceived,
                voucher_id: id,
            });
        }
        tracing::info!("Ficha #{} recebida por {}", id, receiver);

        self.notify_admin(id, receiver).await;

        Ok(ReceiptConfirmation {
            status: ReceiptOutcome::Received,
            voucher_id: id,
        })
    }

    // Melhor esforço: falha na LINE só vai para o log.
    async fn notify_admin(&self, id: i64, receiver: &str) {
        let Some(recipient) = self.admin_recipient.as_deref() else {
            return;
        };

        let text = self.i18n.translate(
            &self.system_lang,
            "notify.receipt_confirmed",
            &[
                ("id", id.to_string()),
                ("receiver", receiver.to_string()),
                ("time", Local::now().format("%d/%m/%Y %H:%M:%S").to_string()),
            ],
        );

        if let Err(e) = self.notifier.push(recipient, PushMessage::Text(text)).await {
            tracing::warn!("Falha ao avisar o admin sobre a ficha #{}: {}", id, e);
        }
    }
}
