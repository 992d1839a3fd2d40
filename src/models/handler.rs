use std::sync::Arc;

use crate::database::store::Store;

#[derive(Clone)]
pub struct Handler {
    pub store: Arc<Store>,
}
