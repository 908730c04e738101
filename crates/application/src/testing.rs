//! In-memory product service used by the use case tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::significant_drop_tightening)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use catalog_domain::{
    CanonicalRecord, ListParams, Product, ProductDraft, ProductId, ProductPage,
};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use tokio::sync::oneshot;

use crate::ports::ProductGateway;
use crate::{ApplicationError, ApplicationResult};

/// A call received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(ListParams),
    Categories,
    Get(ProductId),
    Create(ProductDraft),
    Update(ProductId, ProductDraft),
    Delete(ProductId),
    Bulk(usize),
}

type QueuedPage = (Option<oneshot::Receiver<()>>, ApplicationResult<ProductPage>);

pub struct MockGateway {
    calls: Mutex<Vec<Call>>,
    queued_pages: Mutex<VecDeque<QueuedPage>>,
    products: Mutex<Vec<Product>>,
    categories: Mutex<ApplicationResult<Vec<String>>>,
    mutation_error: Mutex<Option<ApplicationError>>,
    accepted: Mutex<Option<u64>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            queued_pages: Mutex::new(VecDeque::new()),
            products: Mutex::new(vec![product(1, "Desk", 120), product(2, "Lamp", 35)]),
            categories: Mutex::new(Ok(vec!["Office".to_string()])),
            mutation_error: Mutex::new(None),
            accepted: Mutex::new(None),
        }
    }

    /// Queues a list response, optionally held back until `gate` fires.
    pub fn queue_page(
        &self,
        gate: Option<oneshot::Receiver<()>>,
        result: ApplicationResult<ProductPage>,
    ) {
        self.queued_pages
            .lock()
            .expect("Lock poisoned")
            .push_back((gate, result));
    }

    pub fn fail_categories(&self, error: ApplicationError) {
        *self.categories.lock().expect("Lock poisoned") = Err(error);
    }

    pub fn fail_mutations(&self, error: ApplicationError) {
        *self.mutation_error.lock().expect("Lock poisoned") = Some(error);
    }

    pub fn accept_only(&self, count: u64) {
        *self.accepted.lock().expect("Lock poisoned") = Some(count);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("Lock poisoned").clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("Lock poisoned").push(call);
    }

    fn mutation_result(&self) -> ApplicationResult<()> {
        match self.mutation_error.lock().expect("Lock poisoned").clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProductGateway for MockGateway {
    async fn list_products(&self, params: &ListParams) -> ApplicationResult<ProductPage> {
        self.record(Call::List(params.clone()));
        let queued = self.queued_pages.lock().expect("Lock poisoned").pop_front();
        if let Some((gate, result)) = queued {
            if let Some(gate) = gate {
                gate.await.expect("gate dropped");
            }
            return result;
        }
        let data = self.products.lock().expect("Lock poisoned").clone();
        Ok(page(data, 1))
    }

    async fn list_categories(&self) -> ApplicationResult<Vec<String>> {
        self.record(Call::Categories);
        self.categories.lock().expect("Lock poisoned").clone()
    }

    async fn get_product(&self, id: ProductId) -> ApplicationResult<Product> {
        self.record(Call::Get(id));
        self.products
            .lock()
            .expect("Lock poisoned")
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ApplicationError::Rejected {
                status: 404,
                detail: Some("Product not found".to_string()),
            })
    }

    async fn create_product(&self, draft: &ProductDraft) -> ApplicationResult<Product> {
        self.record(Call::Create(draft.clone()));
        self.mutation_result()?;
        let mut products = self.products.lock().expect("Lock poisoned");
        let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let created = from_draft(id, draft);
        products.push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> ApplicationResult<Product> {
        self.record(Call::Update(id, draft.clone()));
        self.mutation_result()?;
        let updated = from_draft(id, draft);
        let mut products = self.products.lock().expect("Lock poisoned");
        if let Some(slot) = products.iter_mut().find(|p| p.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete_product(&self, id: ProductId) -> ApplicationResult<()> {
        self.record(Call::Delete(id));
        self.mutation_result()?;
        self.products
            .lock()
            .expect("Lock poisoned")
            .retain(|p| p.id != id);
        Ok(())
    }

    async fn bulk_upload(&self, records: &[CanonicalRecord]) -> ApplicationResult<u64> {
        self.record(Call::Bulk(records.len()));
        self.mutation_result()?;
        let accepted = self.accepted.lock().expect("Lock poisoned");
        Ok(accepted.unwrap_or(records.len() as u64))
    }
}

pub fn product(id: ProductId, name: &str, price: i64) -> Product {
    Product {
        id,
        name: name.to_string(),
        price: Decimal::new(price, 0),
        category: "Office".to_string(),
        description: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        updated_at: None,
    }
}

pub fn page(data: Vec<Product>, page: u32) -> ProductPage {
    let total = data.len() as u64;
    ProductPage {
        data,
        page,
        limit: 10,
        total,
        total_pages: u32::try_from(total.div_ceil(10)).unwrap(),
    }
}

pub fn page_with_total(data: Vec<Product>, total: u64) -> ProductPage {
    ProductPage {
        total,
        total_pages: u32::try_from(total.div_ceil(10)).unwrap(),
        ..page(data, 1)
    }
}

fn from_draft(id: ProductId, draft: &ProductDraft) -> Product {
    Product {
        id,
        name: draft.name.clone(),
        price: draft.price,
        category: draft.category.clone(),
        description: Some(draft.description.clone()),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        updated_at: None,
    }
}
