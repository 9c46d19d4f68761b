//! Entity identifiers.
//!
//! Row identities cross the store boundary as UUIDs (or, for zip codes, the
//! numeric row id the driver coverage sets refer to). Wrapping them keeps a
//! vendor id from being handed to a driver lookup.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_uuid {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap a raw UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Unwrap to the raw UUID.
            #[must_use]
            pub const fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                Display::fmt(&self.0, f)
            }
        }
    };
}

entity_uuid! {
    /// A vendor row.
    VendorId
}

entity_uuid! {
    /// A purchasable product or accessory row.
    ProductId
}

entity_uuid! {
    /// A cart or order line row.
    LineId
}

entity_uuid! {
    /// A persisted order row.
    OrderId
}

entity_uuid! {
    /// A driver profile row.
    DriverId
}

entity_uuid! {
    /// A delivery time-slot row.
    TimeslotId
}

/// A zip-code row id. Driver coverage sets store these as numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZipcodeId(i64);

impl ZipcodeId {
    /// Wrap a raw row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Unwrap to the raw row id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for ZipcodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
