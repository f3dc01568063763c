//! Generates port error enums with snake_case constructors.
//!
//! Variants tagged `[unavailable]` report `true` from `is_unavailable`, which
//! the HTTP adapter maps to `503 Service Unavailable` instead of `500`.

macro_rules! define_port_error {
    (@unavailable unavailable) => { true };
    (@unavailable) => { false };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )?
                    => $message:literal $( [$marker:ident] )?
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($($($field: impl Into<$ty>),*)?) -> Self {
                        Self::$variant $( { $($field: $field.into()),* } )?
                    }
                )*

                /// Whether the failure means the backing service is unreachable.
                pub fn is_unavailable(&self) -> bool {
                    match self {
                        $(
                            Self::$variant { .. } => define_port_error!(@unavailable $($marker)?),
                        )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;
