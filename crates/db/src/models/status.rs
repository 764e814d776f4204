//! Status helper enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data in the
//! corresponding `*_statuses` table and the constants in `mes_core`.

pub use mes_core::types::StatusId;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Quality/usage status of a ledger resource.
    ResourceStatus {
        Available = mes_core::resource::RESOURCE_STATUS_AVAILABLE,
        Hold = mes_core::resource::RESOURCE_STATUS_HOLD,
        Inspection = mes_core::resource::RESOURCE_STATUS_INSPECTION,
        Monitor = mes_core::resource::RESOURCE_STATUS_MONITOR,
        Unavailable = mes_core::resource::RESOURCE_STATUS_UNAVAILABLE,
    }
}

define_status_enum! {
    /// Production batch lifecycle status.
    BatchStatus {
        Preparing = mes_core::batch::BATCH_STATUS_PREPARING,
        Producing = mes_core::batch::BATCH_STATUS_PRODUCING,
        OnHold = mes_core::batch::BATCH_STATUS_ON_HOLD,
        Canceled = mes_core::batch::BATCH_STATUS_CANCELED,
        Closing = mes_core::batch::BATCH_STATUS_CLOSING,
        Closed = mes_core::batch::BATCH_STATUS_CLOSED,
    }
}
