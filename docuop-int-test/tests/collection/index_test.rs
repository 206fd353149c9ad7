use docuop::common::SortOrder;
use docuop::doc;
use docuop_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

#[test]
fn test_ensure_index_is_idempotent() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let coll = db.managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            assert!(coll.ensure_index(&[("last_name", true), ("age", false)])?);
            assert!(!coll.ensure_index(&[("last_name", true), ("age", false)])?);

            let indexes = db.raw_collection("people")?.index_information()?;
            assert_eq!(indexes.len(), 2);
            assert_eq!(indexes[1].name, "last_name_1_age_-1");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_direction_and_order_matter() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;

            assert!(coll.ensure_index(&[("age", true)])?);
            assert!(coll.ensure_index(&[("age", false)])?);
            assert!(coll.ensure_index(&[("age", true), ("last_name", true)])?);
            assert!(coll.ensure_index(&[("last_name", true), ("age", true)])?);
            assert!(!coll.ensure_index(&[("age", false)])?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_on_logical_id() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let coll = db.managed_collection("people", None)?;

            assert!(!coll.ensure_index(&[("id", true)])?);
            assert!(coll.ensure_index(&[("id", false)])?);

            let indexes = db.raw_collection("people")?.index_information()?;
            assert!(indexes
                .iter()
                .any(|index| index.keys == vec![("_id".to_string(), SortOrder::Descending)]));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_does_not_change_results() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;
            let before = coll.count(doc! { last_name: "ln2" })?;

            coll.ensure_index(&[("last_name", true)])?;
            assert_eq!(coll.count(doc! { last_name: "ln2" })?, before);
            Ok(())
        },
        cleanup,
    )
}
