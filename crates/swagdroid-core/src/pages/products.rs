use std::sync::Arc;

use crate::engine::{ActionEngine, EngineError};
use crate::locator::{Locator, LocatorRegistry};

const PRODUCTS_TITLE: &str = "products_title";

/// The product catalogue shown after a successful login.
pub struct ProductsPage {
    engine: Arc<ActionEngine>,
    locators: LocatorRegistry,
}

impl ProductsPage {
    pub fn new(engine: Arc<ActionEngine>) -> Self {
        let locators = LocatorRegistry::builder(engine.driver().clone())
            .uncached(PRODUCTS_TITLE, Locator::text_view("PRODUCTS"))
            .build();
        Self { engine, locators }
    }

    pub fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }

    pub async fn is_title_displayed(&self) -> Result<bool, EngineError> {
        self.engine.is_displayed(&self.locators, PRODUCTS_TITLE).await
    }
}
