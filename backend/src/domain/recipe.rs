//! Recipe attributes owned by a single user: tags and ingredients.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Maximum length of a tag or ingredient name.
pub const ITEM_NAME_MAX: usize = 255;

/// Validation errors for tag and ingredient names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemNameValidationError {
    /// Name was blank once trimmed.
    #[error("name must not be empty")]
    Empty,
    /// Name exceeded [`ITEM_NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    TooLong {
        /// Allowed maximum.
        max: usize,
    },
}

/// Trimmed, non-empty tag or ingredient name.
///
/// # Examples
/// ```
/// use recipe_backend::domain::ItemName;
///
/// let name = ItemName::new("  Vegan ").unwrap();
/// assert_eq!(name.as_ref(), "Vegan");
/// assert!(ItemName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Validate and construct an [`ItemName`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ItemNameValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ItemNameValidationError::Empty);
        }
        if trimmed.chars().count() > ITEM_NAME_MAX {
            return Err(ItemNameValidationError::TooLong { max: ITEM_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = ItemNameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

macro_rules! owned_item {
    (
        $(#[$id_meta:meta])* $id:ident,
        $(#[$item_meta:meta])* $item:ident,
        $(#[$new_meta:meta])* $new:ident
    ) => {
        $(#[$id_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $id(i64);

        impl $id {
            /// Wrap a database identifier.
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw database identifier.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        $(#[$item_meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $item {
            id: $id,
            user_id: UserId,
            name: ItemName,
        }

        impl $item {
            /// Assemble a persisted record.
            pub fn new(id: $id, user_id: UserId, name: ItemName) -> Self {
                Self { id, user_id, name }
            }

            /// Identifier.
            pub fn id(&self) -> $id {
                self.id
            }

            /// Owning user.
            pub fn user_id(&self) -> &UserId {
                &self.user_id
            }

            /// Name.
            pub fn name(&self) -> &ItemName {
                &self.name
            }
        }

        $(#[$new_meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $new {
            /// Owning user.
            pub user_id: UserId,
            /// Validated name.
            pub name: ItemName,
        }
    };
}

owned_item!(
    /// Database identifier of a [`Tag`].
    TagId,
    /// Label used to group recipes, owned by one user.
    Tag,
    /// Tag awaiting an identifier from storage.
    NewTag
);

owned_item!(
    /// Database identifier of an [`Ingredient`].
    IngredientId,
    /// Ingredient a user cooks with, owned by one user.
    Ingredient,
    /// Ingredient awaiting an identifier from storage.
    NewIngredient
);

/// Listing order shared by every adapter: name descending, newest first on
/// ties.
pub fn listing_order<Id: Ord>(a: (&ItemName, Id), b: (&ItemName, Id)) -> std::cmp::Ordering {
    b.0.cmp(a.0).then_with(|| b.1.cmp(&a.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", ItemNameValidationError::Empty)]
    #[case("  \t", ItemNameValidationError::Empty)]
    fn blank_names_are_rejected(#[case] raw: &str, #[case] expected: ItemNameValidationError) {
        assert_eq!(ItemName::new(raw), Err(expected));
    }

    #[rstest]
    fn overlong_names_are_rejected() {
        let raw = "x".repeat(ITEM_NAME_MAX + 1);
        assert_eq!(
            ItemName::new(raw),
            Err(ItemNameValidationError::TooLong { max: ITEM_NAME_MAX })
        );
    }

    #[rstest]
    fn listing_sorts_by_name_descending() {
        let kale = ItemName::new("Kale").expect("name");
        let salt = ItemName::new("Salt").expect("name");
        let mut items = vec![(kale.clone(), TagId::new(1)), (salt.clone(), TagId::new(2))];
        items.sort_by(|a, b| listing_order((&a.0, a.1), (&b.0, b.1)));
        assert_eq!(items.first().map(|item| &item.0), Some(&salt));
    }
}
