//! Type-safe domain values
//!
//! Sizes and intervals that must never be zero are enforced at construction,
//! so the collector and its buffers never need to re-check them.

/// Generate a non-zero newtype with serde support and checked construction
macro_rules! nonzero_newtype {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($nonzero:ty : $primitive:ty, error $error:ident);
    ) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $name($nonzero);

        impl $name {
            /// Create a new instance, returning None if value is 0
            #[must_use]
            pub const fn new(value: $primitive) -> Option<Self> {
                match <$nonzero>::new(value) {
                    Some(nz) => Some(Self(nz)),
                    None => None,
                }
            }

            /// Create a new instance, reporting a zero value as a validation error
            pub fn try_new(value: $primitive) -> Result<Self, $crate::types::ValidationError> {
                Self::new(value).ok_or($crate::types::ValidationError::$error)
            }

            /// Get the inner value
            #[must_use]
            #[inline]
            pub const fn get(&self) -> $primitive {
                self.0.get()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.get())
            }
        }

        impl From<$name> for $primitive {
            fn from(val: $name) -> Self {
                val.get()
            }
        }

        impl TryFrom<$primitive> for $name {
            type Error = $crate::types::ValidationError;

            fn try_from(value: $primitive) -> Result<Self, Self::Error> {
                Self::try_new(value)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_u64(self.get() as u64)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = <$primitive>::deserialize(deserializer)?;
                Self::new(value).ok_or_else(|| {
                    serde::de::Error::custom(concat!(stringify!($name), " cannot be 0"))
                })
            }
        }
    };
}

mod interval;
mod rates;
mod sizes;
mod validated;

pub use interval::{SampleInterval, duration_millis};
pub use rates::{BytesPerSecond, QueriesPerSecond};
pub use sizes::{HistorySize, SubscriberCapacity, WindowSize};
pub use validated::ValidationError;
