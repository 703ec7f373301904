use std::sync::Arc;

use configs::{StorageBackend, StorageConfig};
use models::{Employee, Product};
use service::storage::KvEntityStore;
use service::{EmployeeService, ProductService};
use tracing::info;

pub type EmployeeStore = KvEntityStore<Employee>;
pub type ProductStore = KvEntityStore<Product>;

/// Services shared by every handler. Built once at startup from config.
#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<EmployeeService<EmployeeStore>>,
    pub products: Arc<ProductService<ProductStore>>,
}

impl AppState {
    pub fn new(employees: EmployeeStore, products: ProductStore) -> Self {
        Self {
            employees: Arc::new(EmployeeService::new(Arc::new(employees))),
            products: Arc::new(ProductService::new(Arc::new(products))),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(KvEntityStore::in_memory(), KvEntityStore::in_memory())
    }

    pub async fn from_config(cfg: &StorageConfig) -> anyhow::Result<Self> {
        match cfg.backend {
            StorageBackend::Memory => {
                info!(backend = "memory", "storage ready");
                Ok(Self::in_memory())
            }
            StorageBackend::File => {
                common::env::ensure_data_dir(&cfg.data_dir).await?;
                let employees = KvEntityStore::open(&cfg.data_dir, "employees").await?;
                let products = KvEntityStore::open(&cfg.data_dir, "products").await?;
                info!(backend = "file", data_dir = %cfg.data_dir, "storage ready");
                Ok(Self::new(employees, products))
            }
        }
    }
}
