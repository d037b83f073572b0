use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::data::{
    errors::StoreError,
    trace_context::TraceContext,
    types::{Binding, BoundTerm, MutationStatement},
};
use crate::services::statements::DEFAULT_NAMESPACE;
use crate::traits::{QueryExecutor, StoreAdmin};

/// In-memory stand-in for a graph store.
///
/// Serves a canned set of bindings to every SELECT, records each submitted
/// statement and admin call, and can be told to fail the next request.
#[derive(Debug, Default)]
pub struct FakeGraphStore {
    bindings: Mutex<Vec<Binding>>,
    statements: Mutex<Vec<MutationStatement>>,
    admin_calls: Mutex<Vec<String>>,
    select_count: Mutex<usize>,
    select_failures: Mutex<VecDeque<StoreError>>,
    update_failures: Mutex<VecDeque<StoreError>>,
}

impl FakeGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: Vec<Binding>) -> Self {
        let store = Self::new();
        store.set_bindings(bindings);
        store
    }

    /// Replace what subsequent SELECTs return
    pub fn set_bindings(&self, bindings: Vec<Binding>) {
        *self.bindings.lock() = bindings;
    }

    pub fn fail_next_select(&self, error: StoreError) {
        self.select_failures.lock().push_back(error);
    }

    pub fn fail_next_update(&self, error: StoreError) {
        self.update_failures.lock().push_back(error);
    }

    /// Statements acknowledged so far, oldest first
    pub fn statements(&self) -> Vec<MutationStatement> {
        self.statements.lock().clone()
    }

    pub fn select_count(&self) -> usize {
        *self.select_count.lock()
    }

    /// Admin calls as `"drop:<db>"` / `"create:<db>"`
    pub fn admin_calls(&self) -> Vec<String> {
        self.admin_calls.lock().clone()
    }
}

#[async_trait]
impl QueryExecutor for FakeGraphStore {
    async fn select(
        &self,
        _trace_ctx: &TraceContext,
        _database: &str,
        _query: &str,
    ) -> Result<Vec<Binding>, StoreError> {
        *self.select_count.lock() += 1;
        if let Some(error) = self.select_failures.lock().pop_front() {
            return Err(error);
        }
        Ok(self.bindings.lock().clone())
    }

    async fn update(
        &self,
        _trace_ctx: &TraceContext,
        _database: &str,
        statement: &MutationStatement,
    ) -> Result<(), StoreError> {
        if let Some(error) = self.update_failures.lock().pop_front() {
            return Err(error);
        }
        self.statements.lock().push(statement.clone());
        Ok(())
    }
}

#[async_trait]
impl StoreAdmin for FakeGraphStore {
    async fn drop_database(&self, _trace_ctx: &TraceContext, database: &str) -> Result<(), StoreError> {
        self.admin_calls.lock().push(format!("drop:{}", database));
        Ok(())
    }

    async fn create_database(&self, _trace_ctx: &TraceContext, database: &str) -> Result<(), StoreError> {
        self.admin_calls.lock().push(format!("create:{}", database));
        Ok(())
    }
}

/// One result row of the character query, as Stardog would return it.
pub fn character_binding(id: i64, name: &str, kind: &str, home_planet: Option<&str>, movie: &str) -> Binding {
    let mut binding = Binding::new();
    binding.insert(
        "id".to_string(),
        BoundTerm::typed_literal(id.to_string(), "http://www.w3.org/2001/XMLSchema#integer"),
    );
    binding.insert("name".to_string(), BoundTerm::literal(name));
    binding.insert("kind".to_string(), BoundTerm::uri(format!("{}{}", DEFAULT_NAMESPACE, kind)));
    if let Some(planet) = home_planet {
        binding.insert(
            "homePlanet".to_string(),
            BoundTerm::uri(format!("{}{}", DEFAULT_NAMESPACE, planet)),
        );
    }
    binding.insert("movie".to_string(), BoundTerm::uri(format!("{}{}", DEFAULT_NAMESPACE, movie)));
    binding
}
