//! Screen stack the controller pushes detail views onto

use crate::models::Product;

/// A screen that can be shown, with its parameters
#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    Products,
    ProductDetails(Product),
}

static ROOT: Route = Route::Products;

/// Host capable of pushing a named screen with a typed parameter
pub trait Navigator {
    fn push(&mut self, route: Route);
}

/// Stack of routes rooted at the product list
#[derive(Debug)]
pub struct ScreenStack {
    routes: Vec<Route>,
}

impl Default for ScreenStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenStack {
    pub fn new() -> Self {
        ScreenStack {
            routes: vec![Route::Products],
        }
    }

    pub fn current(&self) -> &Route {
        // The root is never popped, so the fallback is unreachable
        self.routes.last().unwrap_or(&ROOT)
    }

    /// Pop the top screen. Returns false when already at the root.
    pub fn pop(&mut self) -> bool {
        if self.routes.len() > 1 {
            self.routes.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.routes.len()
    }

    /// Product shown by the top screen, if it is a details screen
    pub fn current_product(&self) -> Option<&Product> {
        match self.current() {
            Route::ProductDetails(product) => Some(product),
            Route::Products => None,
        }
    }
}

impl Navigator for ScreenStack {
    fn push(&mut self, route: Route) {
        tracing::debug!(depth = self.routes.len() + 1, "Pushing screen");
        self.routes.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_pop_details() {
        let mut stack = ScreenStack::new();
        let product = Product::new(3, "Jacket", 55.99, "jacket.png");
        stack.push(Route::ProductDetails(product.clone()));

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current_product(), Some(&product));
        assert!(stack.pop());
        assert_eq!(stack.current(), &Route::Products);
    }

    #[test]
    fn test_root_is_never_popped() {
        let mut stack = ScreenStack::new();
        assert!(!stack.pop());
        assert_eq!(stack.depth(), 1);
        assert!(stack.current_product().is_none());
    }
}
