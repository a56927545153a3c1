//! `define_port_error!` declares a `thiserror` enum for a port and gives
//! each variant a snake_case constructor whose arguments take `impl Into<_>`.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum TokenRepositoryError {
//!         Query { message: String } => "token query failed: {message}",
//!     }
//! }
//! let err = TokenRepositoryError::query("relation does not exist");
//! ```

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( {
                    $(
                        #[allow(missing_docs, reason = "fields are described by the variant message")]
                        $field : $ty
                    ),*
                } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum ShelfError {
            Offline { message: String } => "shelf offline: {message}",
            NoSuchItem { item_id: i64 } => "no item {item_id}",
            Clash { name: String, owner_id: i64 } => "{name} already on shelf {owner_id}",
            Locked => "shelf locked",
        }
    }

    #[test]
    fn string_fields_take_borrowed_text() {
        assert_eq!(
            ShelfError::offline("timeout").to_string(),
            "shelf offline: timeout"
        );
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        assert_eq!(
            ShelfError::no_such_item(42_i64),
            ShelfError::NoSuchItem { item_id: 42 }
        );
    }

    #[test]
    fn multi_field_and_unit_variants_get_constructors() {
        assert_eq!(
            ShelfError::clash("Salt", 9_i64).to_string(),
            "Salt already on shelf 9"
        );
        assert_eq!(ShelfError::locked().to_string(), "shelf locked");
    }
}
