// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::dispatch::dispatch,
        handlers::push::push,
    ),
    components(
        schemas(
            // --- Envelope ---
            handlers::dispatch::DispatchRequest,
            handlers::dispatch::DispatchResponse,
            handlers::push::PushPayload,

            // --- Inventory ---
            models::inventory::Category,
            models::inventory::Department,
            models::inventory::PpeItem,
            models::inventory::StockLevel,
            models::inventory::LoanableStock,
            models::inventory::SavedItem,

            // --- Vouchers ---
            models::voucher::VoucherStatus,
            models::voucher::ReceiptStatus,
            models::voucher::VoucherLine,
            models::voucher::IssueVoucher,
            models::voucher::VoucherDecision,
            models::voucher::ReceiptOutcome,
            models::voucher::ReceiptConfirmation,

            // --- Loans ---
            models::loan::LoanStatus,
            models::loan::LoanTransaction,
            models::loan::BorrowOutcome,
            models::loan::ReturnOutcome,

            // --- Receiving ---
            models::receive::ReceiveTransaction,
            models::receive::ReceiveOutcome,

            // --- Auxiliary ---
            models::auxiliary::Feedback,
            models::auxiliary::MatrixRule,
            models::auxiliary::PpeDocument,

            // --- Dashboard ---
            models::dashboard::TopIssuedItem,
            models::dashboard::LoanStatusSummary,
            models::dashboard::ActivityKind,
            models::dashboard::Activity,
            models::dashboard::ReorderAlert,
            models::dashboard::DashboardMetrics,
            models::dashboard::InitialData,

            // --- Payloads ---
            handlers::payloads::VoucherIdPayload,
            handlers::payloads::LoanIdPayload,
            handlers::payloads::CategoryIdPayload,
            handlers::payloads::IdPayload,
            handlers::payloads::NewVoucherPayload,
            handlers::payloads::PartialApprovalPayload,
            handlers::payloads::ConfirmReceivePayload,
            handlers::payloads::BorrowPayload,
            handlers::payloads::ReceivePayload,
            handlers::payloads::CredentialsPayload,
            handlers::payloads::CategoryPayload,
            handlers::payloads::ItemPayload,
            handlers::payloads::FeedbackPayload,
            handlers::payloads::MatrixRulePayload,
            handlers::payloads::UploadDocumentPayload,
        )
    ),
    tags(
        (name = "PPE", description = "Estoque de EPI: fichas, empréstimos, recebimentos e painel")
    )
)]
pub struct ApiDoc;
