//! Helper macro for declaring port error enums.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor whose
//! parameters accept anything convertible into the field types, so adapters
//! can write `TeamRepositoryError::query("boom")`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),+ },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = "Construct the `" $variant "` variant."]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Connection { message: String } => "connection failed: {message}",
            Limit { count: u32 } => "limit reached: {count}",
            Mixed { message: String, count: u32 } => "{message} ({count})",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(
            SamplePortError::connection("refused").to_string(),
            "connection failed: refused"
        );
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        assert_eq!(SamplePortError::limit(3_u32), SamplePortError::Limit { count: 3 });
    }

    #[test]
    fn mixed_fields_render_in_order() {
        assert_eq!(SamplePortError::mixed("slow", 7_u32).to_string(), "slow (7)");
    }
}
