//! Priced shopping list persisted as a JSON array.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::console::Console;
use crate::errors::{InputError, PersistenceError, ShoppingError};
use crate::log_store_operation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "nombre", alias = "name")]
    pub name: String,
    #[serde(rename = "precio", alias = "price")]
    pub price: f64,
    #[serde(rename = "cantidad", alias = "quantity")]
    pub quantity: u32,
}

impl Item {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShoppingList {
    items: Vec<Item>,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Capitalize the first letter of every word, lowercasing the rest
fn title_case(text: &str) -> String {
    let mut previous_is_letter = false;
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }
    result
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn add_item(&mut self, name: &str, price: f64, quantity: u32) -> Result<&Item, ShoppingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ShoppingError::EmptyName);
        }
        if !price.is_finite() {
            return Err(ShoppingError::InvalidPrice);
        }
        if price < 0.0 {
            return Err(ShoppingError::NegativePrice);
        }
        if quantity < 1 {
            return Err(ShoppingError::InvalidQuantity);
        }

        self.items.push(Item {
            name: title_case(name),
            price: round_cents(price),
            quantity,
        });
        Ok(&self.items[self.items.len() - 1])
    }

    /// Remove by 0-based index
    pub fn remove_item(&mut self, index: usize) -> Result<Item, ShoppingError> {
        if index >= self.items.len() {
            return Err(ShoppingError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(Item::subtotal).sum()
    }

    pub fn apply_discount(&mut self, index: usize, percent: f64) -> Result<&Item, ShoppingError> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(ShoppingError::InvalidDiscount(percent));
        }
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(ShoppingError::IndexOutOfRange { index, len })?;

        let discount = item.price * (percent / 100.0);
        item.price = round_cents(item.price - discount);
        Ok(item)
    }

    /// Formatted listing with a total line
    pub fn lines(&self) -> Vec<String> {
        if self.items.is_empty() {
            return vec!["📝 The shopping list is empty".to_string()];
        }

        let rule = "-".repeat(40);
        let mut lines = vec!["🛒 SHOPPING LIST".to_string(), rule.clone()];
        lines.extend(self.items.iter().enumerate().map(|(i, item)| {
            format!(
                "{}. {} - ${:.2} x {} = ${:.2}",
                i + 1,
                item.name,
                item.price,
                item.quantity,
                item.subtotal()
            )
        }));
        lines.push(rule);
        lines.push(format!("💰 TOTAL: ${:.2}", self.total()));
        lines
    }

    /// Missing file gives an empty list; corrupt JSON gives an empty list with a warning
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Self::new(),
            Err(e) => {
                log_store_operation!(error, "load_list", path = path, error = e);
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<Item>>(&content) {
            Ok(items) => {
                log_store_operation!(debug, "load_list", path = path, count = items.len());
                Self { items }
            }
            Err(e) => {
                log_store_operation!(warn, "load_list", path = path, format!("corrupt list JSON, starting with an empty list: {}", e));
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
            }
        }
        let json = serde_json::to_string_pretty(&self.items)?;
        fs::write(path, json).map_err(|e| PersistenceError::io(path, e))?;
        log_store_operation!(debug, "save_list", path = path, count = self.items.len());
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(console: &mut dyn Console, input: &str) -> Option<T> {
    match input.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            console.write_line(&format!("❌ Invalid number: '{}'", input.trim()));
            None
        }
    }
}

/// Ask for a 1-based item number and turn it into an index
fn prompt_index(console: &mut dyn Console, prompt: &str) -> Result<Option<usize>, InputError> {
    let input = console.read_line(prompt)?;
    let Some(number) = parse_number::<usize>(console, &input) else {
        return Ok(None);
    };
    if number == 0 {
        console.write_line("❌ Item numbers start at 1");
    }
    Ok(number.checked_sub(1))
}

fn report(console: &mut dyn Console, error: ShoppingError) {
    console.write_line(&format!("❌ {}", error));
}

fn show(console: &mut dyn Console, list: &ShoppingList) {
    for line in list.lines() {
        console.write_line(&line);
    }
}

/// Interactive menu over the list stored at `path`. An interrupt leaves without saving.
pub fn run_menu(console: &mut dyn Console, path: &Path) -> Result<(), InputError> {
    let mut list = ShoppingList::load(path);
    match menu_loop(console, &mut list, path) {
        Err(InputError::Cancelled) => {
            console.write_line("👋 Goodbye! (changes not saved)");
            Ok(())
        }
        other => other,
    }
}

fn menu_loop(console: &mut dyn Console, list: &mut ShoppingList, path: &Path) -> Result<(), InputError> {
    let rule = "=".repeat(50);
    loop {
        console.write_line("");
        console.write_line(&rule);
        console.write_line("🛒 SHOPPING LIST MANAGER");
        console.write_line(&rule);
        console.write_line("1. Add item");
        console.write_line("2. View list");
        console.write_line("3. Remove item");
        console.write_line("4. Apply discount to item");
        console.write_line("5. Calculate total");
        console.write_line("6. Save and exit");
        console.write_line("7. Exit without saving");
        console.write_line(&rule);

        let option = console.read_line("Choose an option (1-7): ")?;
        match option.trim() {
            "1" => {
                let name = console.read_line("Product name: ")?;
                let price = console.read_line("Unit price: ")?;
                let Some(price) = parse_number::<f64>(console, &price) else {
                    continue;
                };
                let quantity = console.read_line("Quantity: ")?;
                let Some(quantity) = parse_number::<u32>(console, &quantity) else {
                    continue;
                };
                match list.add_item(&name, price, quantity) {
                    Ok(item) => {
                        let message = format!("✅ Item added: {}", item.name);
                        console.write_line(&message);
                    }
                    Err(e) => report(console, e),
                }
            }
            "2" => show(console, list),
            "3" => {
                show(console, list);
                if list.is_empty() {
                    continue;
                }
                if let Some(index) = prompt_index(console, "Number of the item to remove: ")? {
                    match list.remove_item(index) {
                        Ok(item) => console.write_line(&format!("🗑️  Item removed: {}", item.name)),
                        Err(e) => report(console, e),
                    }
                }
            }
            "4" => {
                show(console, list);
                if list.is_empty() {
                    continue;
                }
                let Some(index) = prompt_index(console, "Number of the item to discount: ")? else {
                    continue;
                };
                let percent = console.read_line("Discount percentage: ")?;
                let Some(percent) = parse_number::<f64>(console, &percent) else {
                    continue;
                };
                match list.apply_discount(index, percent) {
                    Ok(item) => {
                        let message = format!("🎯 {}% discount applied to {}", percent, item.name);
                        console.write_line(&message);
                    }
                    Err(e) => report(console, e),
                }
            }
            "5" => console.write_line(&format!("💰 LIST TOTAL: ${:.2}", list.total())),
            "6" => {
                match list.save(path) {
                    Ok(()) => console.write_line(&format!("✅ List saved to {}", path.display())),
                    Err(e) => console.write_line(&format!("❌ Could not save the list: {}", e)),
                }
                console.write_line("👋 Goodbye!");
                return Ok(());
            }
            "7" => {
                console.write_line("👋 Goodbye! (changes not saved)");
                return Ok(());
            }
            _ => console.write_line("❌ Invalid option. Try again."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item_normalizes_fields() {
        let mut list = ShoppingList::new();
        let item = list.add_item("  green apple ", 1.499, 2).unwrap();

        assert_eq!(item.name, "Green Apple");
        assert_eq!(item.price, 1.5);
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_add_item_rejects_invalid_values() {
        let mut list = ShoppingList::new();
        assert_eq!(list.add_item("Apple", -1.5, 1), Err(ShoppingError::NegativePrice));
        assert_eq!(list.add_item("Apple", 1.5, 0), Err(ShoppingError::InvalidQuantity));
        assert_eq!(list.add_item("   ", 1.5, 1), Err(ShoppingError::EmptyName));
        assert_eq!(list.add_item("Apple", f64::NAN, 1), Err(ShoppingError::InvalidPrice));
        assert!(list.is_empty());
    }

    #[test]
    fn test_title_case_matches_word_boundaries() {
        assert_eq!(title_case("pan de MOLDE"), "Pan De Molde");
        assert_eq!(title_case("coca-cola 2l"), "Coca-Cola 2L");
    }

    #[test]
    fn test_discount_out_of_range_rejected() {
        let mut list = ShoppingList::new();
        list.add_item("Apple", 10.0, 1).unwrap();
        assert_eq!(
            list.apply_discount(0, 120.0),
            Err(ShoppingError::InvalidDiscount(120.0))
        );
        assert_eq!(
            list.apply_discount(3, 10.0),
            Err(ShoppingError::IndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_empty_list_lines() {
        assert_eq!(ShoppingList::new().lines(), vec!["📝 The shopping list is empty"]);
    }
}
