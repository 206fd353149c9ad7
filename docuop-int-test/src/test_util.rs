use docuop::collection::TenantScopedCollection;
use docuop::database::Database;
use docuop::doc;
use docuop::errors::UopResult;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};

/// Runs `test` against the context made by `before`, then always runs
/// `after`, even when the test fails or panics.
pub fn run_test<B, T, A>(before: B, test: T, after: A)
where
    B: FnOnce() -> UopResult<TestContext>,
    T: FnOnce(TestContext) -> UopResult<()>,
    A: FnOnce(TestContext) -> UopResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_ctx = ctx.clone();
    let outcome = catch_unwind(AssertUnwindSafe(move || test(test_ctx)));
    let cleanup = after(ctx);

    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(panic) => resume_unwind(panic),
    }

    if let Err(e) = cleanup {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    db: Database,
}

impl TestContext {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> Database {
        self.db.clone()
    }
}

/// A fresh `testdb<N>` database on its own in-memory store.
pub fn create_test_context() -> UopResult<TestContext> {
    let db = Database::builder().open_test_database()?;
    Ok(TestContext::new(db))
}

pub fn cleanup(ctx: TestContext) -> UopResult<()> {
    let db = ctx.db();
    if db.is_open() {
        db.drop_database()?;
        db.close()?;
    }
    Ok(())
}

/// Inserts three people with ids 1, 2 and 3.
pub fn insert_test_documents(collection: &TenantScopedCollection) -> UopResult<()> {
    collection.insert(doc! {
        id: 1,
        first_name: "fn1",
        last_name: "ln1",
        age: 31,
        address: { city: "Boston" },
        tags: ["admin", "ops"],
    })?;
    collection.insert(doc! {
        id: 2,
        first_name: "fn2",
        last_name: "ln2",
        age: 45,
        address: { city: "Denver" },
        tags: ["ops"],
    })?;
    collection.insert(doc! {
        id: 3,
        first_name: "fn3",
        last_name: "ln2",
        age: 27,
        address: { city: "Boston" },
        tags: [],
    })?;
    Ok(())
}
