//! Declares port error enums together with snake_case constructors.
//!
//! Each variant becomes a `thiserror` variant carrying the given message, and
//! gains a constructor named after it. Field arguments accept anything that
//! converts into the field type, so `&str` works for `String` fields.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),+ }) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                Self::$variant {
                    $($field: $field.into()),+
                }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),+ $(,)? } )? => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field: $ty),+ } )?,
            )+
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field: $ty),+ } )?);
            )+
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ShelterPortError {
            Locked => "shelter is locked",
            Flooded { level: String } => "shelter flooded: {level}",
            Overrun { count: u32 } => "shelter overrun by {count} infected",
            Breached { gate: String, count: u32 } => "gate {gate} breached ({count})",
        }
    }

    #[test]
    fn unit_variants_get_plain_constructors() {
        assert_eq!(ShelterPortError::locked().to_string(), "shelter is locked");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ShelterPortError::flooded("knee deep");
        assert_eq!(err.to_string(), "shelter flooded: knee deep");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = ShelterPortError::overrun(12_u32);
        assert_eq!(err.to_string(), "shelter overrun by 12 infected");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ShelterPortError::breached("north", 3_u32);
        assert_eq!(err.to_string(), "gate north breached (3)");
    }
}
