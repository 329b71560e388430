pub mod auth;
pub mod auxiliary_service;
pub mod dashboard_service;
pub mod inventory_service;
pub mod loan_service;
pub mod notification;
pub mod stock_service;
pub mod voucher_service;

pub use auth::AuthService;
pub use auxiliary_service::AuxiliaryService;
pub use dashboard_service::DashboardService;
pub use inventory_service::InventoryService;
pub use loan_service::LoanService;
pub use notification::{LineMessagingClient, NotificationSink, PushMessage};
pub use voucher_service::VoucherService;

// Fixtures compartilhadas pelos testes dos services e dos handlers.
#[cfg(test)]
pub mod testing {
    use std::{path::PathBuf, sync::Arc};

    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json;

    use crate::{
        config::{AppState, Settings},
        db::{memory::MemoryStore, Stores},
        models::{
            inventory::PpeItem,
            loan::{LoanStatus, LoanTransaction},
            voucher::{IssueVoucher, VoucherLine, VoucherStatus},
        },
        services::{
            notification::testing::RecordingSink, AuxiliaryService, DashboardService,
            InventoryService, LoanService, VoucherService,
        },
    };

    pub fn item(id: i64, stock: i32, reorder_point: i32) -> PpeItem {
        PpeItem {
            id,
            code: format!("PPE-{:03}", id),
            name: format!("Item {}", id),
            category: "Geral".into(),
            unit: "un".into(),
            reorder_point,
            stock,
            on_loan_quantity: 0,
            price: Decimal::ONE,
            image_url: String::new(),
        }
    }

    pub fn line(item_id: i64, quantity: i32) -> VoucherLine {
        VoucherLine::new(item_id, quantity)
    }

    pub fn named_line(item_id: i64, name: &str, quantity: i32) -> VoucherLine {
        VoucherLine {
            item_id,
            item_name: Some(name.to_string()),
            quantity,
        }
    }

    pub fn pending_voucher(id: i64, lines: Vec<VoucherLine>) -> IssueVoucher {
        IssueVoucher {
            id,
            timestamp: Utc::now(),
            user: "Somchai".into(),
            department: "Manutenção".into(),
            employee_id: "E-01".into(),
            user_id: "U-01".into(),
            status: VoucherStatus::Pending,
            admin_notes: String::new(),
            items_json: Json(lines),
            status_received: None,
            received_at: None,
            received_by: None,
        }
    }

    pub fn loan(loan_id: i64, item_id: i64, status: LoanStatus) -> LoanTransaction {
        LoanTransaction {
            loan_id,
            item_id,
            borrower_name: "Niran".into(),
            employee_id: "E-02".into(),
            user_id: "U-02".into(),
            department: "Elétrica".into(),
            borrow_date: Utc::now(),
            due_date: None,
            return_date: None,
            status,
            notes: String::new(),
        }
    }

    // AppState completo sobre o MemoryStore, com a LINE trocada por um gravador.
    pub struct Harness {
        pub store: Arc<MemoryStore>,
        pub sink: Arc<RecordingSink>,
        pub state: AppState,
        pub vouchers: VoucherService,
        pub loans: LoanService,
        pub inventory: InventoryService,
        pub dashboard: DashboardService,
        pub auxiliary: AuxiliaryService,
        pub documents_dir: PathBuf,
        _documents: tempfile::TempDir,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_sink(Arc::new(RecordingSink::default()))
        }

        pub fn with_sink(sink: Arc<RecordingSink>) -> Self {
            let documents = tempfile::tempdir().expect("tempdir");
            let documents_dir = documents.path().join("documents");

            let store = Arc::new(MemoryStore::new());
            let state = AppState::assemble(
                Stores::in_memory(store.clone()),
                sink.clone(),
                Settings::for_tests(documents_dir.clone()),
            );

            Self {
                vouchers: state.voucher_service.clone(),
                loans: state.loan_service.clone(),
                inventory: state.inventory_service.clone(),
                dashboard: state.dashboard_service.clone(),
                auxiliary: state.auxiliary_service.clone(),
                store,
                sink,
                state,
                documents_dir,
                _documents: documents,
            }
        }
    }
}
