//! Delivery policy decision points
//!
//! Rate limiting and relay routing live in their own subsystems. The account
//! layer only exposes where those decisions are asked for, through a
//! replaceable [`DeliveryPolicy`].

use super::types::Account;

/// Policy consulted by message routing before delivering to an account
pub trait DeliveryPolicy {
    /// Whether deliveries to `account` go through rate limiting
    fn is_rate_limited(&self, account: &Account) -> bool;

    /// Remote relay that owns `account`, or `None` for local delivery
    fn relay(&self, account: &Account) -> Option<String>;
}

/// Every account is rate limited and delivered locally
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultDeliveryPolicy;

impl DeliveryPolicy for DefaultDeliveryPolicy {
    fn is_rate_limited(&self, _account: &Account) -> bool {
        true
    }

    fn relay(&self, _account: &Account) -> Option<String> {
        None
    }
}

impl Account {
    /// Rate limiting decision under [`DefaultDeliveryPolicy`]
    pub fn is_rate_limited(&self) -> bool {
        DefaultDeliveryPolicy.is_rate_limited(self)
    }

    /// Relay under [`DefaultDeliveryPolicy`]
    pub fn relay(&self) -> Option<String> {
        DefaultDeliveryPolicy.relay(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FederatedPolicy {
        relay: String,
    }

    impl DeliveryPolicy for FederatedPolicy {
        fn is_rate_limited(&self, account: &Account) -> bool {
            !account.number().starts_with("+1")
        }

        fn relay(&self, _account: &Account) -> Option<String> {
            Some(self.relay.clone())
        }
    }

    #[test]
    fn test_default_policy() {
        let account = Account::new();
        assert!(account.is_rate_limited());
        assert_eq!(account.relay(), None);
        assert!(DefaultDeliveryPolicy.is_rate_limited(&account));
    }

    #[test]
    fn test_policy_is_replaceable() {
        let mut account = Account::new();
        account.set_number("+14155555555");

        let policy: Box<dyn DeliveryPolicy> = Box::new(FederatedPolicy {
            relay: "relay.example.org".to_string(),
        });
        assert!(!policy.is_rate_limited(&account));
        assert_eq!(policy.relay(&account).as_deref(), Some("relay.example.org"));
    }
}
