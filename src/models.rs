pub mod auxiliary;
pub mod dashboard;
pub mod inventory;
pub mod loan;
pub mod receive;
pub mod voucher;
