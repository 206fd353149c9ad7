use docuop::common::Value;
use docuop::criteria::Criteria;
use docuop::doc;
use docuop::errors::ErrorKind;
use docuop_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

#[test]
fn test_remove_by_criteria() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            assert_eq!(coll.remove(doc! { last_name: "ln2" })?, 2);
            assert_eq!(coll.count(doc! {})?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_by_id() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            assert_eq!(coll.remove(2)?, 1);
            assert_eq!(coll.remove(Value::from(2))?, 0);
            assert!(coll.find_one(doc! { id: 2 })?.is_none());
            assert_eq!(coll.count(doc! {})?, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_all() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            assert_eq!(coll.remove(Criteria::all())?, 3);
            assert_eq!(coll.count(doc! {})?, 0);
            assert_eq!(coll.remove(doc! {})?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_with_invalid_native_filter() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let err = coll.remove(doc! { "$where": "true" }).err().unwrap();
            assert_eq!(err.kind(), &ErrorKind::FilterError);
            assert_eq!(coll.count(doc! {})?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_unindexes_documents() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().indexed_collection("people", None)?;
            insert_test_documents(&coll)?;

            coll.remove(1)?;
            assert!(coll.cached(1).is_none());
            assert!(coll.cached(2).is_some());
            assert!(coll.find_one(doc! { id: 1 })?.is_none());
            Ok(())
        },
        cleanup,
    )
}
