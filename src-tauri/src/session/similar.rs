//! Name-based narrowing of the recommendation list.
//!
//! "Show Similar" keeps the candidates whose names are close to the
//! selected product's name: substring match either way, or a normalized
//! Levenshtein similarity above 0.6. Caps the result at five entries and
//! preserves list order.

use strsim::normalized_levenshtein;

use crate::assistant::types::Product;

pub const MAX_SIMILAR: usize = 5;
const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Filter `products` down to those similar to the one at `reference`.
///
/// The reference product always matches itself, so the result is never
/// empty for a valid index. Out-of-range indices return the input as-is;
/// the session transition validates the index before calling this.
pub fn narrow(products: &[Product], reference: usize) -> Vec<Product> {
    let Some(selected) = products.get(reference) else {
        return products.to_vec();
    };
    let target = selected.name.to_lowercase();

    products
        .iter()
        .filter(|candidate| {
            let name = candidate.name.to_lowercase();
            name.contains(&target)
                || target.contains(&name)
                || normalized_levenshtein(&target, &name) > SIMILARITY_THRESHOLD
        })
        .take(MAX_SIMILAR)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> Product {
        Product {
            id: None,
            name: name.to_string(),
            price: 100.0,
            brand: String::new(),
            color: String::new(),
            category: None,
        }
    }

    #[test]
    fn keeps_the_reference_product() {
        let products = vec![product("AirX Runner"), product("Formal Oxford")];
        let narrowed = narrow(&products, 0);
        assert!(narrowed.iter().any(|p| p.name == "AirX Runner"));
    }

    #[test]
    fn substring_matches_are_kept() {
        let products = vec![
            product("AirX"),
            product("AirX Pro"),
            product("Desk Lamp"),
        ];
        let narrowed = narrow(&products, 0);
        let names: Vec<_> = narrowed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["AirX", "AirX Pro"]);
    }

    #[test]
    fn near_identical_names_are_kept() {
        let products = vec![product("Trail Runner 2"), product("Trail Runner 3")];
        let narrowed = narrow(&products, 0);
        assert_eq!(narrowed.len(), 2);
    }

    #[test]
    fn never_returns_more_than_the_cap() {
        let products: Vec<_> = (0..10).map(|i| product(&format!("AirX {}", i))).collect();
        let narrowed = narrow(&products, 0);
        assert_eq!(narrowed.len(), MAX_SIMILAR);
    }

    #[test]
    fn preserves_input_order() {
        let products = vec![
            product("AirX 1"),
            product("Desk Lamp"),
            product("AirX 2"),
        ];
        let narrowed = narrow(&products, 2);
        let names: Vec<_> = narrowed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["AirX 1", "AirX 2"]);
    }

    #[test]
    fn out_of_range_reference_returns_everything() {
        let products = vec![product("AirX"), product("Desk Lamp")];
        assert_eq!(narrow(&products, 9).len(), 2);
    }
}
