//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
/// - `FromStr` so IDs can be taken from command-line arguments
///
/// # Example
///
/// ```rust
/// # use logos_core::define_id;
/// define_id!(ServiceId);
/// define_id!(OrderId);
///
/// let service_id = ServiceId::new(1);
/// let order_id = OrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ServiceId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(LineItemId);

/// Issues [`LineItemId`]s for new cart lines.
///
/// IDs are millisecond timestamps, bumped past the last issued or observed
/// ID so they stay unique and strictly increasing even when several lines
/// are created within the same millisecond or the clock moves backwards.
#[derive(Debug, Clone, Default)]
pub struct LineItemIdGenerator {
    last: i64,
}

impl LineItemIdGenerator {
    /// Create a generator with no issued IDs.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Issue the next ID.
    ///
    /// Once `i64::MAX` has been issued or observed there is nothing left
    /// above it, so the smallest positive ID for which `in_use` returns
    /// `false` is issued instead.
    pub fn next_id(&mut self, in_use: impl Fn(LineItemId) -> bool) -> LineItemId {
        let Some(floor) = self.last.checked_add(1) else {
            return (1..=i64::MAX)
                .map(LineItemId::new)
                .find(|id| !in_use(*id))
                .unwrap_or(LineItemId::new(0));
        };
        let now = chrono::Utc::now().timestamp_millis();
        let id = now.max(floor);
        self.last = id;
        LineItemId::new(id)
    }

    /// Record an ID that already exists (e.g. restored from storage) so it
    /// is never issued again.
    pub fn observe(&mut self, id: LineItemId) {
        self.last = self.last.max(id.as_i64());
    }
}
