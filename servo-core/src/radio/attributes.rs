//! Local attribute table of the servo service.
//!
//! Every mutation carries a [`WriteOrigin`]. Only locally-initiated writes
//! can ask for a notification; a value the peer just wrote is committed
//! silently so it is never echoed straight back.

use servo_proto::encode_percent;

use super::{PeripheralStack, RadioError};
use crate::types::{ActuatorId, WriteOrigin};

/// What a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttributeRole {
    Absolute(ActuatorId),
    Relative(ActuatorId),
    /// Notification subscription descriptor of the absolute attribute.
    Subscription(ActuatorId),
}

/// Handle layout of the service, indexed by [`ActuatorId::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoAttributes {
    pub absolute: [u16; 2],
    pub subscription: [u16; 2],
    pub relative: [u16; 2],
}

/// Handles as registered by the reference attribute table.
pub const DEFAULT_ATTRIBUTES: ServoAttributes = ServoAttributes {
    absolute: [0x0012, 0x0018],
    subscription: [0x0013, 0x0019],
    relative: [0x0015, 0x001B],
};

impl ServoAttributes {
    pub fn classify(&self, handle: u16) -> Option<AttributeRole> {
        ActuatorId::ALL.into_iter().find_map(|id| {
            let i = id.index();
            if handle == self.absolute[i] {
                Some(AttributeRole::Absolute(id))
            } else if handle == self.relative[i] {
                Some(AttributeRole::Relative(id))
            } else if handle == self.subscription[i] {
                Some(AttributeRole::Subscription(id))
            } else {
                None
            }
        })
    }
}

/// Whether the caller should push the new value to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Publish {
    Notify,
    Silent,
}

/// Mirror of the readable position attributes and their subscriptions.
#[derive(Debug, Clone)]
pub struct AttributeStore {
    map: ServoAttributes,
    values: [u8; 2],
    subscribed: [bool; 2],
}

impl AttributeStore {
    pub const fn new(map: ServoAttributes) -> Self {
        Self {
            map,
            values: [0; 2],
            subscribed: [false; 2],
        }
    }

    pub fn map(&self) -> &ServoAttributes {
        &self.map
    }

    pub fn value(&self, id: ActuatorId) -> u8 {
        self.values[id.index()]
    }

    pub fn is_subscribed(&self, id: ActuatorId) -> bool {
        self.subscribed[id.index()]
    }

    /// Commit a position to the stack's attribute table.
    pub fn write_position<S: PeripheralStack>(
        &mut self,
        stack: &mut S,
        id: ActuatorId,
        percent: u8,
        origin: WriteOrigin,
    ) -> Result<Publish, RadioError> {
        let handle = self.map.absolute[id.index()];
        let data = encode_percent(percent);
        match origin {
            WriteOrigin::PeerInitiated => stack.write_attribute_from_peer(handle, &data)?,
            WriteOrigin::LocallyInitiated => stack.write_local_attribute(handle, &data)?,
        }
        self.values[id.index()] = data[0];

        match origin {
            WriteOrigin::LocallyInitiated if self.is_subscribed(id) => Ok(Publish::Notify),
            _ => Ok(Publish::Silent),
        }
    }

    pub fn set_subscription(&mut self, id: ActuatorId, enabled: bool) {
        self.subscribed[id.index()] = enabled;
    }

    /// Forget all subscriptions (new connection).
    pub fn reset_subscriptions(&mut self) {
        self.subscribed = [false; 2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::mock::{Call, MockStack};

    #[test]
    fn test_classify() {
        let map = DEFAULT_ATTRIBUTES;
        assert_eq!(map.classify(0x0012), Some(AttributeRole::Absolute(ActuatorId::A)));
        assert_eq!(map.classify(0x001B), Some(AttributeRole::Relative(ActuatorId::B)));
        assert_eq!(map.classify(0x0019), Some(AttributeRole::Subscription(ActuatorId::B)));
        assert_eq!(map.classify(0x0001), None);
    }

    #[test]
    fn test_peer_write_is_silent_even_when_subscribed() {
        let mut stack = MockStack::new();
        let mut store = AttributeStore::new(DEFAULT_ATTRIBUTES);
        store.set_subscription(ActuatorId::A, true);

        let publish = store
            .write_position(&mut stack, ActuatorId::A, 30, WriteOrigin::PeerInitiated)
            .unwrap();
        assert_eq!(publish, Publish::Silent);
        assert_eq!(store.value(ActuatorId::A), 30);
        assert_eq!(stack.calls, [Call::PeerWrite(0x0012, 30)]);
    }

    #[test]
    fn test_local_write_notifies_only_subscribers() {
        let mut stack = MockStack::new();
        let mut store = AttributeStore::new(DEFAULT_ATTRIBUTES);
        let local = WriteOrigin::LocallyInitiated;
        assert_eq!(store.write_position(&mut stack, ActuatorId::B, 10, local), Ok(Publish::Silent));
        store.set_subscription(ActuatorId::B, true);
        assert_eq!(store.write_position(&mut stack, ActuatorId::B, 11, local), Ok(Publish::Notify));
        store.reset_subscriptions();
        assert!(!store.is_subscribed(ActuatorId::B));
    }

    #[test]
    fn test_failed_write_leaves_value() {
        let mut stack = MockStack::new();
        stack.fail_writes = Some(RadioError::Busy);
        let mut store = AttributeStore::new(DEFAULT_ATTRIBUTES);
        assert_eq!(
            store.write_position(&mut stack, ActuatorId::A, 40, WriteOrigin::LocallyInitiated),
            Err(RadioError::Busy)
        );
        assert_eq!(store.value(ActuatorId::A), 0);
    }
}
