//! Name-to-quantity shopping list kept in insertion order.

use indexmap::IndexMap;

use crate::console::Console;
use crate::errors::{InputError, ShoppingError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantityList {
    items: IndexMap<String, u32>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl QuantityList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `name`, summing with any existing entry. Returns the new quantity.
    pub fn add(&mut self, name: &str, quantity: u32) -> Result<u32, ShoppingError> {
        let name = normalize(name);
        if name.is_empty() {
            return Err(ShoppingError::EmptyName);
        }
        if quantity < 1 {
            return Err(ShoppingError::InvalidQuantity);
        }

        let entry = self.items.entry(name).or_insert(0);
        *entry = entry.saturating_add(quantity);
        Ok(*entry)
    }

    /// Remove `name` entirely, returning the quantity it had
    pub fn remove(&mut self, name: &str) -> Result<u32, ShoppingError> {
        let key = normalize(name);
        self.items
            .shift_remove(&key)
            .ok_or(ShoppingError::ItemNotFound(key))
    }

    pub fn quantity(&self, name: &str) -> Option<u32> {
        self.items.get(&normalize(name)).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(name, quantity)| (name.as_str(), *quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

fn show(console: &mut dyn Console, list: &QuantityList) {
    if list.is_empty() {
        console.write_line("📝 The list is empty");
        return;
    }
    console.write_line("🛒 Your shopping list:");
    for (name, quantity) in list.entries() {
        console.write_line(&format!("- {}: {}", name, quantity));
    }
}

/// Menu-driven session over an in-memory list; the list is returned when the operator leaves
pub fn run_menu(console: &mut dyn Console) -> Result<QuantityList, InputError> {
    let mut list = QuantityList::new();
    match menu_loop(console, &mut list) {
        Ok(()) => Ok(list),
        Err(InputError::Cancelled) => {
            console.write_line("👋 Goodbye!");
            Ok(list)
        }
        Err(e) => Err(e),
    }
}

fn menu_loop(console: &mut dyn Console, list: &mut QuantityList) -> Result<(), InputError> {
    loop {
        console.write_line("");
        console.write_line("1. Add item");
        console.write_line("2. Remove item");
        console.write_line("3. Show list");
        console.write_line("4. Exit");

        let option = console.read_line("Choose an option: ")?;

        match option.trim() {
            "1" => {
                let name = console.read_line("Item name: ")?;
                let quantity = console.read_line("Quantity: ")?;
                let Ok(quantity) = quantity.trim().parse::<u32>() else {
                    console.write_line(&format!("❌ Invalid number: '{}'", quantity.trim()));
                    continue;
                };
                match list.add(&name, quantity) {
                    Ok(total) => console.write_line(&format!(
                        "✅ {} now at {}",
                        normalize(&name),
                        total
                    )),
                    Err(e) => console.write_line(&format!("❌ {}", e)),
                }
            }
            "2" => {
                let name = console.read_line("Item to remove: ")?;
                match list.remove(&name) {
                    Ok(_) => console.write_line(&format!("🗑️  Removed {}", normalize(&name))),
                    Err(e) => console.write_line(&format!("❌ {}", e)),
                }
            }
            "3" => show(console, list),
            "4" => {
                console.write_line("👋 Goodbye!");
                return Ok(());
            }
            _ => console.write_line("❌ Invalid option. Try again."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    #[test]
    fn test_add_sums_normalized_names() {
        let mut list = QuantityList::new();
        assert_eq!(list.add("Milk", 2), Ok(2));
        assert_eq!(list.add("  milk ", 3), Ok(5));
        assert_eq!(list.len(), 1);
        assert_eq!(list.quantity("MILK"), Some(5));
    }

    #[test]
    fn test_add_rejects_zero_and_blank() {
        let mut list = QuantityList::new();
        assert_eq!(list.add("bread", 0), Err(ShoppingError::InvalidQuantity));
        assert_eq!(list.add("  ", 1), Err(ShoppingError::EmptyName));
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_unknown_item() {
        let mut list = QuantityList::new();
        list.add("eggs", 12).unwrap();
        assert_eq!(
            list.remove("Bacon"),
            Err(ShoppingError::ItemNotFound("bacon".to_string()))
        );
        assert_eq!(list.remove("EGGS"), Ok(12));
        assert!(list.is_empty());
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut list = QuantityList::new();
        list.add("rice", 1).unwrap();
        list.add("beans", 2).unwrap();
        list.add("rice", 1).unwrap();

        let entries: Vec<_> = list.entries().collect();
        assert_eq!(entries, vec![("rice", 2), ("beans", 2)]);
    }

    #[test]
    fn test_menu_session() {
        let mut console = ScriptedConsole::new([
            "1", "Apples", "3", "1", "apples", "x", "2", "pears", "3", "4",
        ]);
        let list = run_menu(&mut console).unwrap();

        assert_eq!(list.quantity("apples"), Some(3));
        let transcript = console.transcript();
        assert!(transcript.contains("❌ Invalid number: 'x'"));
        assert!(transcript.contains("❌ 'pears' is not on the list"));
        assert!(transcript.contains("- apples: 3"));
    }

    #[test]
    fn test_menu_interrupt_keeps_list() {
        let mut console = ScriptedConsole::new(["1", "tea", "2"]);
        let list = run_menu(&mut console).unwrap();
        assert_eq!(list.quantity("tea"), Some(2));
    }
}
