//! Campaign economy: item catalog, stock ledgers and credits
//!
//! Two parallel ledgers track what the player owns and what the market
//! holds, both indexed by the item catalog. Buying and selling move one
//! unit at a time against the catalog price.

use ahash::AHashMap;
use serde::Deserialize;

use crate::core::types::ItemId;

/// Static item definition from the campaign data
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub price: i32,
}

/// All purchasable items, in definition order. The order is load-bearing:
/// save files write per-item counts in catalog order.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<ItemDef>,
    index: AHashMap<String, ItemId>,
}

impl ItemCatalog {
    pub fn new(items: Vec<ItemDef>) -> Self {
        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id.clone(), ItemId(i)))
            .collect();
        Self { items, index }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(id.0)
    }

    pub fn find(&self, key: &str) -> Option<ItemId> {
        self.index.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &ItemDef)> {
        self.items.iter().enumerate().map(|(i, d)| (ItemId(i), d))
    }
}

/// Per-item stock counts plus loose ammunition rounds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub counts: Vec<i32>,
    pub loose: Vec<u8>,
}

impl Inventory {
    pub fn sized_for(catalog: &ItemCatalog) -> Self {
        Self {
            counts: vec![0; catalog.len()],
            loose: vec![0; catalog.len()],
        }
    }

    pub fn count(&self, id: ItemId) -> i32 {
        self.counts.get(id.0).copied().unwrap_or(0)
    }

    pub fn add(&mut self, id: ItemId, amount: i32) {
        if let Some(slot) = self.counts.get_mut(id.0) {
            *slot += amount;
        }
    }
}

/// The whole money side of a campaign
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Economy {
    pub owned: Inventory,
    pub market: Inventory,
    pub credits: i32,
}

impl Economy {
    pub fn new(catalog: &ItemCatalog, credits: i32) -> Self {
        Self {
            owned: Inventory::sized_for(catalog),
            market: Inventory::sized_for(catalog),
            credits,
        }
    }

    /// Buy one unit from the market. Refused when credits or market
    /// stock are short.
    pub fn buy(&mut self, id: ItemId, catalog: &ItemCatalog) -> bool {
        let Some(def) = catalog.get(id) else {
            return false;
        };
        if self.credits < def.price || self.market.count(id) < 1 {
            return false;
        }
        self.market.add(id, -1);
        self.owned.add(id, 1);
        self.credits -= def.price;
        true
    }

    /// Sell one owned unit back to the market
    pub fn sell(&mut self, id: ItemId, catalog: &ItemCatalog) -> bool {
        let Some(def) = catalog.get(id) else {
            return false;
        };
        if self.owned.count(id) < 1 {
            return false;
        }
        self.owned.add(id, -1);
        self.market.add(id, 1);
        self.credits += def.price;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ItemCatalog {
        ItemCatalog::new(vec![
            ItemDef {
                id: "assault_rifle".into(),
                name: "Assault Rifle".into(),
                price: 1_200,
            },
            ItemDef {
                id: "medikit".into(),
                name: "Medikit".into(),
                price: 300,
            },
        ])
    }

    #[test]
    fn test_catalog_lookup() {
        let cat = catalog();
        assert_eq!(cat.len(), 2);
        let id = cat.find("medikit").unwrap();
        assert_eq!(cat.get(id).unwrap().price, 300);
        assert!(cat.find("plasma_blade").is_none());
    }

    #[test]
    fn test_buy_moves_stock_and_credits() {
        let cat = catalog();
        let rifle = cat.find("assault_rifle").unwrap();
        let mut eco = Economy::new(&cat, 2_000);
        eco.market.add(rifle, 3);

        assert!(eco.buy(rifle, &cat));
        assert_eq!(eco.credits, 800);
        assert_eq!(eco.owned.count(rifle), 1);
        assert_eq!(eco.market.count(rifle), 2);

        // second purchase would overdraw
        assert!(!eco.buy(rifle, &cat));
        assert_eq!(eco.credits, 800);
    }

    #[test]
    fn test_buy_requires_market_stock() {
        let cat = catalog();
        let kit = cat.find("medikit").unwrap();
        let mut eco = Economy::new(&cat, 10_000);
        assert!(!eco.buy(kit, &cat));
    }

    #[test]
    fn test_sell_requires_owned_stock() {
        let cat = catalog();
        let kit = cat.find("medikit").unwrap();
        let mut eco = Economy::new(&cat, 0);
        assert!(!eco.sell(kit, &cat));

        eco.owned.add(kit, 1);
        assert!(eco.sell(kit, &cat));
        assert_eq!(eco.credits, 300);
        assert_eq!(eco.market.count(kit), 1);
    }
}
