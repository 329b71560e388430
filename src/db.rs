pub mod store;
pub use store::{
    AuxiliaryStore, CatalogStore, ItemStore, LoanStore, ReceiveStore, SequenceAllocator, Stores,
    Table, VoucherStore,
};
pub mod sequence;
pub use sequence::PgSequenceAllocator;
pub mod item_repo;
pub use item_repo::ItemRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod voucher_repo;
pub use voucher_repo::VoucherRepository;
pub mod loan_repo;
pub use loan_repo::LoanRepository;
pub mod receive_repo;
pub use receive_repo::ReceiveRepository;
pub mod auxiliary_repo;
pub use auxiliary_repo::AuxiliaryRepository;

#[cfg(test)]
pub mod memory;
