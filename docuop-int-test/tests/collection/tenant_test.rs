use docuop::collection::{FindOptions, TenantModifier};
use docuop::common::{Document, Value};
use docuop::doc;
use docuop_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_insert_stamps_tenant() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let acme = db.managed_collection("orders", Some(TenantModifier::scoped_to("tenant", "acme")))?;
            acme.insert(doc! { id: 1, total: 10 })?;

            let raw = db.raw_collection("orders")?;
            let stored = raw.find_one(&doc! { "_id": 1 })?.unwrap();
            assert_eq!(stored.get("tenant"), Some(&Value::from("acme")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_tenants_are_isolated() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let acme = db.managed_collection("orders", Some(TenantModifier::scoped_to("tenant", "acme")))?;
            let globex = db.managed_collection("orders", Some(TenantModifier::scoped_to("tenant", "globex")))?;

            acme.insert(doc! { id: 1, total: 10 })?;
            acme.insert(doc! { id: 2, total: 20 })?;
            globex.insert(doc! { id: 3, total: 30 })?;

            assert_eq!(acme.count(doc! {})?, 2);
            assert_eq!(globex.count(doc! {})?, 1);
            assert!(globex.find_one(doc! { id: 1 })?.is_none());
            assert_eq!(globex.find(doc! { gt: { total: 5 } }, FindOptions::new())?.len(), 1);
            assert_eq!(acme.distinct("total", doc! {})?, vec![Value::from(10), Value::from(20)]);
            assert!(globex.bulk_load(vec![1, 2])?.is_empty());

            assert_eq!(globex.remove(doc! {})?, 1);
            assert_eq!(acme.count(doc! {})?, 2);

            let unscoped = db.managed_collection("orders", None)?;
            assert_eq!(unscoped.count(doc! {})?, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_tenant_update_stays_in_tenant() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let acme = db.managed_collection("orders", Some(TenantModifier::scoped_to("tenant", "acme")))?;
            let globex = db.managed_collection("orders", Some(TenantModifier::scoped_to("tenant", "globex")))?;
            acme.insert(doc! { id: 1, status: "open" })?;
            globex.insert(doc! { id: 2, status: "open" })?;

            let result = acme.update(doc! { status: "open" }, doc! { status: "closed" }, true)?;
            assert_eq!(result.matched_count, 1);
            assert_eq!(globex.count(doc! { status: "open" })?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_one_ignores_tenant() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let acme = db.managed_collection("orders", Some(TenantModifier::scoped_to("tenant", "acme")))?;
            let globex = db.managed_collection("orders", Some(TenantModifier::scoped_to("tenant", "globex")))?;
            globex.insert(doc! { id: 2, status: "open" })?;

            let result = acme.update_one(2, doc! { status: "closed" }, true)?;
            assert_eq!(result.matched_count, 1);
            assert_eq!(globex.count(doc! { status: "closed" })?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_custom_tenant_modifier() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let modifier = TenantModifier::new(|mut doc: Document| {
                let _ = doc.put("org", "north");
                let _ = doc.put("region", 7);
                doc
            });
            let north = db.managed_collection("sites", Some(modifier))?;
            north.insert(doc! { id: 1, name: "depot" })?;

            let other = db.managed_collection("sites", Some(TenantModifier::scoped_to("org", "south")))?;
            other.insert(doc! { id: 2, name: "yard" })?;

            let found = north.find(doc! {}, FindOptions::new())?.into_documents();
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].get("region"), Some(&Value::from(7)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_column_class_check() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.db().managed_collection("entities", None)?;
            coll.insert(doc! { id: 1, class: "Widget_3f2a-11" })?;
            coll.insert(doc! { id: 2, class: "Widget_9b7c-22" })?;
            coll.insert(doc! { id: 3, class: "Gadget_3f2a-11" })?;

            let criteria = coll.column_class_check("class", "3f2a-11");
            assert_eq!(coll.count(criteria)?, 2);
            Ok(())
        },
        cleanup,
    )
}
