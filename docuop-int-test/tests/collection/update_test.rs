use docuop::collection::FindOptions;
use docuop::common::Value;
use docuop::doc;
use docuop::errors::ErrorKind;
use docuop_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

#[test]
fn test_partial_update_keeps_other_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let result = coll.update(doc! { last_name: "ln2" }, doc! { age: 50 }, true)?;
            assert_eq!(result.matched_count, 2);
            assert_eq!(result.modified_count, 2);

            let doc = coll.find_one(doc! { id: 3 })?.unwrap();
            assert_eq!(doc.get("age"), Some(&Value::from(50)));
            assert_eq!(doc.get("first_name"), Some(&Value::from("fn3")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_full_update_replaces_document() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let result = coll.update(doc! { id: 1 }, doc! { first_name: "solo" }, false)?;
            assert_eq!(result.modified_count, 1);

            let doc = coll.find_one(doc! { id: 1 })?.unwrap();
            assert_eq!(doc.get("first_name"), Some(&Value::from("solo")));
            assert!(!doc.contains_key("last_name"));
            assert_eq!(doc.get("id"), Some(&Value::from(1)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_with_native_operators() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            coll.update(doc! {}, doc! { "$inc": { age: 1 } }, false)?;
            let ages = coll.distinct("age", doc! {})?;
            assert_eq!(ages, vec![Value::from(32), Value::from(46), Value::from(28)]);

            coll.update(doc! { id: 2 }, doc! { "$unset": { address: "" } }, false)?;
            let doc = coll.find_one(doc! { id: 2 })?.unwrap();
            assert!(!doc.contains_key("address"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_without_matches() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let result = coll.update(doc! { first_name: "nobody" }, doc! { age: 1 }, true)?;
            assert_eq!(result.matched_count, 0);
            assert_eq!(result.modified_count, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_cannot_change_identifier() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let err = coll.update(doc! { id: 1 }, doc! { id: 10 }, true).err().unwrap();
            assert_eq!(err.kind(), &ErrorKind::UpdateError);
            assert!(coll.find_one(doc! { id: 1 })?.is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_one_by_id() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let result = coll.update_one(1, doc! { first_name: "first" }, true)?;
            assert_eq!(result.matched_count, 1);

            let renamed = coll.find(doc! { first_name: "first" }, FindOptions::new())?;
            assert_eq!(renamed.len(), 1);

            let result = coll.update_one(99, doc! { first_name: "ghost" }, true)?;
            assert_eq!(result.matched_count, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_indexed_collection_forgets_updated_documents() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().indexed_collection("people", None)?;
            insert_test_documents(&coll)?;
            assert!(coll.cached(1).is_some());

            coll.update_one(1, doc! { age: 99 }, true)?;
            assert!(coll.cached(1).is_none());

            let doc = coll.find_one(doc! { id: 1 })?.unwrap();
            assert_eq!(doc.get("age"), Some(&Value::from(99)));

            coll.update(doc! { last_name: "ln2" }, doc! { age: 1 }, true)?;
            assert!(coll.cached(2).is_none());
            assert!(coll.cached(3).is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_indexed_handle_sees_writes_from_other_handles() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let indexed = db.indexed_collection("people", None)?;
            let plain = db.managed_collection("people", None)?;
            indexed.insert(doc! { id: 1, name: "a" })?;

            plain.update(doc! { id: 1 }, doc! { name: "z" }, true)?;
            let via_indexed = indexed.find_one(doc! { id: 1 })?;
            assert_eq!(via_indexed, plain.find_one(doc! { id: 1 })?);
            assert_eq!(
                via_indexed.and_then(|doc| doc.get("name").cloned()),
                Some(Value::from("z"))
            );

            plain.remove(1)?;
            assert!(indexed.find_one(doc! { id: 1 })?.is_none());

            indexed.insert(doc! { id: 2, name: "b" })?;
            db.drop_database()?;
            assert!(indexed.find_one(doc! { id: 2 })?.is_none());
            Ok(())
        },
        cleanup,
    )
}
