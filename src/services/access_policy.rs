use crate::models::{Actor, Device, Visibility};

/// Operations that can be authorized against a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReadSensors,
    CreateSensor,
    ReadSensor,
    UpdateSensorAttribute,
    ReadValues,
    PushValue,
    DeleteDevice,
}

impl Operation {
    /// What a stranger may do on a public device. PushValue is included
    /// on purpose: public devices accept readings from third-party
    /// reporters. Structural changes stay with the owner.
    fn open_to_public(&self) -> bool {
        matches!(
            self,
            Operation::ReadSensors
                | Operation::ReadSensor
                | Operation::ReadValues
                | Operation::PushValue
        )
    }
}

/// An authorization verdict. Deny is an ordinary outcome here; the
/// service layer decides how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Pure decision function over (actor, device, operation). Admins win,
/// then owners, then the visibility flag for everyone else.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn evaluate(&self, actor: &Actor, device: &Device, operation: Operation) -> Access {
        if actor.is_admin() {
            return Access::Allow;
        }

        if actor.id == device.owner {
            return Access::Allow;
        }

        match device.visibility() {
            Visibility::Public if operation.open_to_public() => Access::Allow,
            _ => Access::Deny,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use crate::models::Role;

    use super::*;

    fn device(owner: &str, visibility: &str) -> Device {
        Device {
            id: "dev-1".to_string(),
            name: None,
            owner: owner.to_string(),
            visibility: visibility.to_string(),
            date_created: OffsetDateTime::now_utc(),
        }
    }

    const ALL_OPERATIONS: [Operation; 7] = [
        Operation::ReadSensors,
        Operation::CreateSensor,
        Operation::ReadSensor,
        Operation::UpdateSensorAttribute,
        Operation::ReadValues,
        Operation::PushValue,
        Operation::DeleteDevice,
    ];

    #[test]
    fn test_admin_is_always_allowed() {
        let policy = AccessPolicy;
        let admin = Actor::new("root", Role::Admin);

        for operation in ALL_OPERATIONS {
            assert_eq!(
                policy.evaluate(&admin, &device("alice", "private"), operation),
                Access::Allow
            );
        }
    }

    #[test]
    fn test_owner_is_allowed_regardless_of_visibility() {
        let policy = AccessPolicy;
        let alice = Actor::new("alice", Role::User);

        for operation in ALL_OPERATIONS {
            assert_eq!(
                policy.evaluate(&alice, &device("alice", "private"), operation),
                Access::Allow
            );
        }
    }

    #[test]
    fn test_stranger_on_public_device() {
        let policy = AccessPolicy;
        let bob = Actor::new("bob", Role::User);
        let device = device("alice", "public");

        assert_eq!(
            policy.evaluate(&bob, &device, Operation::ReadSensors),
            Access::Allow
        );
        assert_eq!(
            policy.evaluate(&bob, &device, Operation::ReadSensor),
            Access::Allow
        );
        assert_eq!(
            policy.evaluate(&bob, &device, Operation::ReadValues),
            Access::Allow
        );
        assert_eq!(
            policy.evaluate(&bob, &device, Operation::PushValue),
            Access::Allow
        );

        assert_eq!(
            policy.evaluate(&bob, &device, Operation::CreateSensor),
            Access::Deny
        );
        assert_eq!(
            policy.evaluate(&bob, &device, Operation::UpdateSensorAttribute),
            Access::Deny
        );
        assert_eq!(
            policy.evaluate(&bob, &device, Operation::DeleteDevice),
            Access::Deny
        );
    }

    #[test]
    fn test_stranger_on_private_device_is_denied_everything() {
        let policy = AccessPolicy;
        let bob = Actor::new("bob", Role::User);

        for operation in ALL_OPERATIONS {
            assert_eq!(
                policy.evaluate(&bob, &device("alice", "private"), operation),
                Access::Deny
            );
        }
    }
}
