use crate::common::{Document, Value};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Rewrites native filters and inserted documents for one tenant.
///
/// The modifier is applied to every native filter after translation and to
/// every document before it is inserted, so a collection built with it only
/// ever sees that tenant's data.
#[derive(Clone)]
pub struct TenantModifier {
    inner: Arc<dyn Fn(Document) -> Document + Send + Sync>,
}

impl TenantModifier {
    pub fn new<F>(modifier: F) -> TenantModifier
    where
        F: Fn(Document) -> Document + Send + Sync + 'static,
    {
        TenantModifier {
            inner: Arc::new(modifier),
        }
    }

    /// Embeds `field = value` in every document and filter.
    pub fn scoped_to<T: Into<Value>>(field: &str, value: T) -> TenantModifier {
        let field = field.to_string();
        let value = value.into();
        TenantModifier::new(move |mut doc: Document| {
            if let Err(e) = doc.put(field.clone(), value.clone()) {
                log::error!("Failed to scope document to tenant: {}", e);
            }
            doc
        })
    }

    pub fn apply(&self, doc: Document) -> Document {
        (self.inner)(doc)
    }
}

impl Debug for TenantModifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TenantModifier")
    }
}
