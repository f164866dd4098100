pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
