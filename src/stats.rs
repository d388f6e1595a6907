use std::collections::HashMap;
use std::hash::Hash;

// The key space of `expected` is taken as the space of categories.
// Both maps hold relative frequencies, not raw counts.
pub fn chi_sq<T: Eq + Hash>(observed: &HashMap<T, f64>, expected: &HashMap<T, f64>) -> f64 {
    expected
        .iter()
        .fold(0f64, |acc, (category, e)| {
            let &o = observed
                .get(category)
                .unwrap_or(&0f64);
            acc + ((e - o).powi(2)) / e
        })
}

#[test]
fn test_chi_sq() {
    let expected = HashMap::from([('a', 0.5), ('b', 0.5)]);
    assert_eq!(0f64, chi_sq(&expected, &expected));

    let observed = HashMap::from([('a', 1.0)]);
    assert_eq!(1.0, chi_sq(&observed, &expected));
}
