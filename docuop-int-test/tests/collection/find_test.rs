use docuop::collection::{ids_only, limit_to, only_cols, order_by, FindOptions};
use docuop::common::Value;
use docuop::criteria::Criteria;
use docuop::doc;
use docuop_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

#[test]
fn test_find_all() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let result = coll.find(doc! {}, FindOptions::new())?;
            assert_eq!(result.len(), 3);

            let docs = result.into_documents();
            assert!(docs.iter().all(|doc| doc.contains_key("id")));
            assert!(docs.iter().all(|doc| !doc.contains_key("_id")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_by_id() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let doc = coll.find_one(doc! { id: 2 })?.unwrap();
            assert_eq!(doc.get("first_name"), Some(&Value::from("fn2")));
            assert_eq!(doc.get("id"), Some(&Value::from(2)));

            assert!(coll.find_one(doc! { id: 42 })?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_with_comparison() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            assert_eq!(coll.find(doc! { gt: { age: 30 } }, FindOptions::new())?.len(), 2);
            assert_eq!(coll.find(doc! { "$lte": { age: 31 } }, FindOptions::new())?.len(), 2);
            assert_eq!(coll.find(doc! { neq: { last_name: "ln2" } }, FindOptions::new())?.len(), 1);
            assert_eq!(coll.find(Criteria::gte("age", 45), FindOptions::new())?.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_with_containment() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let result = coll.find(doc! { id: { in: [1, 3, 99] } }, FindOptions::new())?;
            assert_eq!(result.len(), 2);

            let result = coll.find(doc! { first_name: { "$in": ["fn2"] } }, FindOptions::new())?;
            assert_eq!(result.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_with_native_filter() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let boston = coll.find(doc! { "address.city": "Boston" }, FindOptions::new())?;
            assert_eq!(boston.len(), 2);

            let ops = coll.find(doc! { tags: "ops" }, FindOptions::new())?;
            assert_eq!(ops.len(), 2);

            let native = doc! {
                "$or": [{ age: { "$lt": 28 } }, { first_name: "fn1" }],
            };
            assert_eq!(coll.find(native, FindOptions::new())?.len(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_with_sort_and_limit() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let docs = coll.find(doc! {}, order_by(&["-age"]))?.into_documents();
            let ages: Vec<Value> = docs.iter().filter_map(|d| d.get("age").cloned()).collect();
            assert_eq!(ages, vec![Value::from(45), Value::from(31), Value::from(27)]);

            let docs = coll
                .find(doc! {}, order_by(&["last_name", "-first_name"]).limit(2))?
                .into_documents();
            assert_eq!(docs[0].get("first_name"), Some(&Value::from("fn1")));
            assert_eq!(docs[1].get("first_name"), Some(&Value::from("fn3")));

            assert_eq!(coll.find(doc! {}, limit_to(1))?.len(), 1);
            assert_eq!(coll.find(doc! {}, limit_to(0))?.len(), 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_with_projection() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let docs = coll
                .find(doc! { id: 1 }, only_cols(&["first_name", "age"]))?
                .into_documents();
            assert_eq!(docs.len(), 1);
            assert_eq!(docs[0].size(), 3);
            assert!(docs[0].contains_key("id"));
            assert!(!docs[0].contains_key("last_name"));

            let names = coll
                .find(doc! {}, only_cols(&["first_name"]).order_by(&["first_name"]))?
                .into_values();
            assert_eq!(
                names,
                vec![Value::from("fn1"), Value::from("fn2"), Value::from("fn3")]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_ids_only() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let ids = coll.find(doc! { last_name: "ln2" }, ids_only())?.into_values();
            assert_eq!(ids.len(), 2);
            assert!(ids.contains(&Value::from(2)));
            assert!(ids.contains(&Value::from(3)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_count_and_distinct() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            assert_eq!(coll.count(doc! {})?, 3);
            assert_eq!(coll.count(doc! { last_name: "ln2" })?, 2);
            assert_eq!(coll.count(None::<Criteria>)?, 3);

            let last_names = coll.distinct("last_name", doc! {})?;
            assert_eq!(last_names, vec![Value::from("ln1"), Value::from("ln2")]);

            let tags = coll.distinct("tags", doc! {})?;
            assert_eq!(tags, vec![Value::from("admin"), Value::from("ops")]);

            let ids = coll.distinct("id", doc! { lt: { age: 40 } })?;
            assert_eq!(ids, vec![Value::from(1), Value::from(3)]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_bulk_load() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("people", None)?;
            insert_test_documents(&coll)?;

            let docs = coll.bulk_load(vec![3, 1, 7])?;
            assert_eq!(docs.len(), 2);
            assert!(docs.iter().all(|doc| doc.contains_key("id")));

            assert!(coll.bulk_load(Vec::<i32>::new())?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_scenario() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("scenario", None)?;
            coll.insert(doc! { id: 1, age: 5 })?;
            coll.insert(doc! { id: 2, age: 2 })?;

            let found = coll.find(doc! { gt: { age: 3 } }, FindOptions::new())?.into_documents();
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].get("id"), Some(&Value::from(1)));

            assert_eq!(coll.count(doc! {})?, 2);
            assert_eq!(coll.remove(1)?, 1);
            assert_eq!(coll.count(doc! {})?, 1);
            Ok(())
        },
        cleanup,
    )
}
