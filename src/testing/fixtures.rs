//! Pre-built test datasets for grouping, join and ordering scenarios.

use serde::{Deserialize, Serialize};

/// A person record, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub age: u32,
}

/// An order placed by a [`Person`], joined through `customer_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u32,
    pub customer_id: u32,
    pub product: String,
    pub amount: f64,
}

fn person(id: u32, name: &str, city: &str, age: u32) -> Person {
    Person {
        id,
        name: name.to_owned(),
        city: city.to_owned(),
        age,
    }
}

fn order(id: u32, customer_id: u32, product: &str, amount: f64) -> Order {
    Order {
        id,
        customer_id,
        product: product.to_owned(),
        amount,
    }
}

/// Five people across three cities, with two sharing an age.
///
/// # Example
///
/// ```
/// use ironseq::testing::sample_people;
///
/// let people = sample_people();
/// assert_eq!(people.len(), 5);
/// ```
#[must_use]
pub fn sample_people() -> Vec<Person> {
    vec![
        person(1, "Ada", "London", 36),
        person(2, "Brian", "Paris", 29),
        person(3, "Chloe", "London", 29),
        person(4, "Dmitri", "Berlin", 41),
        person(5, "Erin", "Paris", 23),
    ]
}

/// Orders for [`sample_people`]: Ada has two, Brian and Dmitri one each,
/// Chloe and Erin none, and one order references an unknown customer (99).
///
/// # Example
///
/// ```
/// use ironseq::testing::{sample_orders, sample_people};
///
/// let ids: Vec<u32> = sample_people().iter().map(|p| p.id).collect();
/// assert!(sample_orders().iter().any(|o| !ids.contains(&o.customer_id)));
/// ```
#[must_use]
pub fn sample_orders() -> Vec<Order> {
    vec![
        order(100, 1, "keyboard", 49.5),
        order(101, 2, "monitor", 199.0),
        order(102, 1, "mouse", 19.25),
        order(103, 4, "desk", 320.0),
        order(104, 99, "lamp", 15.0),
    ]
}

/// A short word list with repeats and mixed initials.
///
/// # Example
///
/// ```
/// use ironseq::testing::word_list;
///
/// assert!(word_list().contains(&"banana"));
/// ```
#[must_use]
pub fn word_list() -> Vec<&'static str> {
    vec!["apple", "banana", "cherry", "avocado", "blueberry", "apple", "cranberry", "banana"]
}
