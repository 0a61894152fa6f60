//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with the workspace migrations applied (feature: "postgres")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let name = builder.product_name("pears");
//!     let price_cents = builder.price_cents();
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// The same test name always produces the same data, and different tests
/// produce different product names, so tests sharing a database do not
/// trip over the unique name index.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("product", "main"), "test-product-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Unique product name, short enough for the 100 character column
    pub fn product_name(&self, suffix: &str) -> String {
        self.name("product", suffix)
    }

    /// A unit price in cents between 1.00 and 9999.99
    pub fn price_cents(&self) -> i64 {
        100 + (self.seed % 999_900) as i64
    }

    /// A stock level between 1 and 500
    pub fn quantity(&self) -> i32 {
        1 + (self.seed % 500) as i32
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that two floats agree within `tolerance`
    pub fn assert_close(actual: f64, expected: f64, tolerance: f64, context: &str) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "{}: expected {} (±{}), got {}",
            context,
            expected,
            tolerance,
            actual
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.product_name("a"), builder2.product_name("a"));
        assert_eq!(builder1.price_cents(), builder2.price_cents());
        assert_eq!(builder1.quantity(), builder2.quantity());
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        // Different test names should generate different data
        assert_ne!(builder1.product_name("a"), builder2.product_name("a"));
    }

    #[test]
    fn test_generated_values_in_range() {
        for seed in [0, 1, 499, 500, 999_899, 999_900, u64::MAX] {
            let builder = TestDataBuilder::new(seed);
            assert!((100..=999_999).contains(&builder.price_cents()));
            assert!((1..=500).contains(&builder.quantity()));
            assert!(builder.product_name("suffix").len() <= 100);
        }
    }

    #[test]
    fn test_assert_close() {
        assertions::assert_close(8.333, 8.33, 0.01, "percent");
        assert_eq!(assertions::assert_some(Some(3), "value"), 3);
    }
}
