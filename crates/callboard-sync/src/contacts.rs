//! Seller and buyer contact lookup.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use callboard_core::normalize;
use callboard_models::BoardItem;

/// Item ids as written into relation values; numeric ids travel as numbers.
pub(crate) fn id_value(id: &str) -> Value {
    id.parse::<u64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(id))
}

/// Which contact board an item lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Seller,
    Buyer,
}

impl ContactKind {
    /// French label used in the contact link column.
    pub fn label(&self) -> &'static str {
        match self {
            ContactKind::Seller => "Vendeur",
            ContactKind::Buyer => "Acquéreur",
        }
    }

    /// Reads the kind back from a contact link text.
    pub fn from_link(text: &str) -> Option<Self> {
        if text.contains("Acquéreur:") {
            Some(ContactKind::Buyer)
        } else if text.contains("Vendeur:") {
            Some(ContactKind::Seller)
        } else {
            None
        }
    }
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A contact matched by phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRef {
    pub id: String,
    pub name: String,
    pub kind: ContactKind,
}

impl ContactRef {
    /// `Vendeur: <name> (ID: <id>)`.
    pub fn link_text(&self) -> String {
        format!("{}: {} (ID: {})", self.kind, self.name, self.id)
    }
}

/// Contacts keyed by normalized phone number.
#[derive(Debug, Default)]
pub struct ContactIndex {
    sellers: HashMap<String, ContactRef>,
    buyers: HashMap<String, ContactRef>,
}

impl ContactIndex {
    /// Adds every item of a contact board that has a phone in `phone_column`.
    ///
    /// When several items share a number, the first one in board order is kept.
    pub fn index(&mut self, kind: ContactKind, items: &[BoardItem], phone_column: &str) {
        let map = match kind {
            ContactKind::Seller => &mut self.sellers,
            ContactKind::Buyer => &mut self.buyers,
        };
        for item in items {
            let Some(phone) = item.column_text(phone_column).map(normalize) else {
                continue;
            };
            if phone.is_empty() {
                continue;
            }
            map.entry(phone).or_insert_with(|| ContactRef {
                id: item.id.clone(),
                name: item.name.clone(),
                kind,
            });
        }
        debug!(kind = %kind, indexed = map.len(), "Indexed contacts");
    }

    /// Sellers take precedence over buyers.
    pub fn lookup(&self, phone: &str) -> Option<&ContactRef> {
        let phone = normalize(phone);
        if phone.is_empty() {
            return None;
        }
        self.sellers.get(&phone).or_else(|| self.buyers.get(&phone))
    }

    pub fn len(&self) -> usize {
        self.sellers.len() + self.buyers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sellers_win() {
        let mut index = ContactIndex::default();
        index.index(
            ContactKind::Buyer,
            &[BoardItem::new("b1", "Durand").with_text("phone", "06 12 34 56 78")],
            "phone",
        );
        index.index(
            ContactKind::Seller,
            &[BoardItem::new("s1", "Martin").with_text("phone", "+33 6 12 34 56 78")],
            "phone",
        );

        let found = index.lookup("0033612345678").unwrap();
        assert_eq!(found.kind, ContactKind::Seller);
        assert_eq!(found.link_text(), "Vendeur: Martin (ID: s1)");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_first_contact_with_a_number_is_kept() {
        let mut index = ContactIndex::default();
        index.index(
            ContactKind::Seller,
            &[
                BoardItem::new("s1", "Martin").with_text("phone", "06 12 34 56 78"),
                BoardItem::new("s2", "Bernard").with_text("phone", "+33612345678"),
            ],
            "phone",
        );

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("0612345678").unwrap().id, "s1");
    }

    #[test]
    fn test_items_without_phone_are_ignored() {
        let mut index = ContactIndex::default();
        index.index(
            ContactKind::Seller,
            &[BoardItem::new("s1", "Martin"), BoardItem::new("s2", "Petit").with_text("phone", "  ")],
            "phone",
        );
        assert!(index.is_empty());
        assert!(index.lookup("").is_none());
    }

    #[test]
    fn test_kind_from_link() {
        assert_eq!(
            ContactKind::from_link("Acquéreur: Durand (ID: 4)"),
            Some(ContactKind::Buyer)
        );
        assert_eq!(ContactKind::from_link("Vendeur: Martin (ID: 3)"), Some(ContactKind::Seller));
        assert_eq!(ContactKind::from_link("Contact non trouvé"), None);
    }
}
