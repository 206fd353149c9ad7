use docuop::database::{Database, DatabaseConfig};
use docuop::doc;
use docuop::errors::ErrorKind;
use docuop::store::memory::InMemoryStoreModule;
use docuop::store::TransactionCapability;
use docuop_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_open_and_close() {
    let db = Database::builder()
        .host("localhost")
        .port(27017)
        .database_name("inventory")
        .open()
        .unwrap();
    assert!(db.is_open());
    assert_eq!(db.name(), "inventory");

    db.close().unwrap();
    assert!(!db.is_open());
    let err = db.managed_collection("items", None).err().unwrap();
    assert_eq!(err.kind(), &ErrorKind::DatabaseClosed);
}

#[test]
fn test_invalid_configuration_fails_at_open() {
    let err = Database::builder()
        .port(0)
        .database_name("inventory")
        .open()
        .err()
        .unwrap();
    assert_eq!(err.kind(), &ErrorKind::InvalidConfiguration);

    let err = Database::builder().database_name("bad.name").open().err().unwrap();
    assert_eq!(err.kind(), &ErrorKind::InvalidConfiguration);
}

#[test]
fn test_credentials_checked_at_open() {
    let module = InMemoryStoreModule::with_config()
        .user("app", "s3cret")
        .build()
        .unwrap();

    let rejected = Database::builder()
        .database_name("inventory")
        .username("app")
        .password("guess")
        .store_module(module.clone())
        .open();
    assert_eq!(rejected.err().unwrap().kind(), &ErrorKind::SecurityError);

    let anonymous = Database::builder()
        .database_name("inventory")
        .store_module(module.clone())
        .open();
    assert_eq!(anonymous.err().unwrap().kind(), &ErrorKind::SecurityError);

    let db = Database::builder()
        .database_name("inventory")
        .username("app")
        .password("s3cret")
        .store_module(module)
        .open()
        .unwrap();
    assert!(db.is_open());
}

#[test]
fn test_registry_reuses_collections() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let first = db.managed_collection("items", None)?;
            first.insert(doc! { id: 1 })?;

            let second = db.clone().managed_collection("items", None)?;
            assert_eq!(second.count(doc! {})?, 1);
            assert_eq!(db.collection_names()?, vec!["items"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_existing_and_dropped_databases() {
    let config = DatabaseConfig::new("alpha");
    let alpha = Database::open(config.clone()).unwrap();
    alpha.managed_collection("items", None).unwrap().insert(doc! { id: 1 }).unwrap();

    let beta = Database::make_named_database("beta", &config).unwrap();
    beta.raw_collection("items").unwrap();
    let _empty = Database::make_named_database("gamma", &config).unwrap();

    assert_eq!(Database::existing_db_names(&config).unwrap(), vec!["alpha", "beta"]);

    Database::drop_named_database("alpha", &config).unwrap();
    assert_eq!(Database::existing_db_names(&config).unwrap(), vec!["beta"]);

    beta.drop_database().unwrap();
    assert!(Database::existing_db_names(&config).unwrap().is_empty());
}

#[test]
fn test_test_database_names() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            assert!(db.name().starts_with("testdb"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_transactions_unsupported_in_memory() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            assert_eq!(db.transaction_capability(), TransactionCapability::Unsupported);

            let err = db.begin_transaction().err().unwrap();
            assert_eq!(err.kind(), &ErrorKind::TransactionNotSupported);
            db.commit()?;
            Ok(())
        },
        cleanup,
    )
}
