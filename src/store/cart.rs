use std::sync::Arc;

use dashmap::DashMap;
use teloxide::types::ChatId;

use crate::models::Medicine;

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub medicine: Medicine,
    pub quantity: u32,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.medicine.price * f64::from(self.quantity)
    }
}

/// In-memory cart. Stock limits are checked by callers, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, medicine_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.medicine.id == medicine_id)
    }

    pub fn quantity_of(&self, medicine_id: &str) -> u32 {
        self.get(medicine_id).map_or(0, |item| item.quantity)
    }

    pub fn add_to_cart(&mut self, medicine: Medicine, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self
            .items
            .iter_mut()
            .find(|item| item.medicine.id == medicine.id)
        {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem { medicine, quantity }),
        }
    }

    pub fn remove(&mut self, medicine_id: &str) {
        self.items.retain(|item| item.medicine.id != medicine_id);
    }

    /// Sets the quantity exactly; zero or less removes the entry.
    pub fn update_quantity(&mut self, medicine_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove(medicine_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.medicine.id == medicine_id)
        {
            item.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }
}

/// One cart per chat.
#[derive(Clone, Debug, Default)]
pub struct CartRegistry {
    carts: Arc<DashMap<ChatId, Cart>>,
}

impl CartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, chat: ChatId) -> Cart {
        self.carts
            .get(&chat)
            .map(|cart| cart.clone())
            .unwrap_or_default()
    }

    /// Runs `f` against the chat's cart, creating an empty one if needed.
    pub fn update<R>(&self, chat: ChatId, f: impl FnOnce(&mut Cart) -> R) -> R {
        let mut cart = self.carts.entry(chat).or_default();
        f(&mut cart)
    }

    pub fn clear(&self, chat: ChatId) {
        self.carts.remove(&chat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medicine(id: &str, price: f64, stock: u32) -> Medicine {
        Medicine {
            id: id.into(),
            name: format!("Medicine {id}"),
            description: None,
            price,
            stock,
            manufacturer: None,
            category_id: None,
            category: None,
            seller_id: Some("s1".into()),
            image: None,
        }
    }

    #[test]
    fn adding_same_medicine_merges_quantities() {
        let mut cart = Cart::default();
        cart.add_to_cart(medicine("a", 10.0, 9), 1);
        cart.add_to_cart(medicine("a", 10.0, 9), 2);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of("a"), 3);
    }

    #[test]
    fn merged_quantity_saturates() {
        let mut cart = Cart::default();
        cart.add_to_cart(medicine("a", 1.0, 9), u32::MAX - 1);
        cart.add_to_cart(medicine("a", 1.0, 9), 5);
        assert_eq!(cart.quantity_of("a"), u32::MAX);
    }

    #[test]
    fn zero_or_negative_quantity_removes() {
        let mut cart = Cart::default();
        cart.add_to_cart(medicine("a", 10.0, 9), 2);
        cart.add_to_cart(medicine("b", 1.0, 9), 1);

        cart.update_quantity("a", 0);
        assert!(cart.get("a").is_none());

        cart.update_quantity("b", -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn update_sets_exact_quantity() {
        let mut cart = Cart::default();
        cart.add_to_cart(medicine("a", 10.0, 9), 2);
        cart.update_quantity("a", 5);
        assert_eq!(cart.quantity_of("a"), 5);
        cart.update_quantity("missing", 5);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn totals_are_reductions() {
        let mut cart = Cart::default();
        cart.add_to_cart(medicine("a", 10.0, 9), 2);
        cart.add_to_cart(medicine("b", 5.0, 9), 1);
        assert_eq!(cart.total_price(), 25.0);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn registry_keeps_carts_apart() {
        let carts = CartRegistry::new();
        carts.update(ChatId(1), |cart| cart.add_to_cart(medicine("a", 2.0, 3), 1));
        assert_eq!(carts.snapshot(ChatId(1)).total_items(), 1);
        assert!(carts.snapshot(ChatId(2)).is_empty());

        carts.clear(ChatId(1));
        assert!(carts.snapshot(ChatId(1)).is_empty());
    }
}
