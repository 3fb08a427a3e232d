//! Row-level visibility rules.
//!
//! Uniform across every collection carrying an audience tag: owners and
//! admins see the whole collection, tenants see rows aimed at everyone or at
//! tenants, and nothing targeted exclusively at owners. Maintenance requests
//! and payments follow their own, stricter rules (requester-private and
//! payer-private respectively). Results are recomputed on every call and
//! ordered newest-first; nothing here caches.

use chrono::{DateTime, Utc};

use crate::domain::{Actor, Role, TargetAudience};
use crate::maintenance::domain::MaintenanceRequest;
use crate::payments::domain::Payment;

/// Broadcast content with an audience tag and a creation time.
pub trait Broadcast {
    fn audience(&self) -> TargetAudience;
    fn posted_at(&self) -> DateTime<Utc>;
}

/// Subset of `rows` the actor may see, newest first.
pub fn visible_rows<'a, T: Broadcast>(actor: &Actor, rows: &'a [T]) -> Vec<&'a T> {
    let mut selected: Vec<&T> = rows
        .iter()
        .filter(|row| match actor.role() {
            Some(Role::Owner) | Some(Role::Admin) => true,
            Some(Role::Tenant) => row.audience() != TargetAudience::Owner,
            None => false,
        })
        .collect();
    selected.sort_by(|a, b| b.posted_at().cmp(&a.posted_at()));
    selected
}

/// Maintenance requests are requester-private: tenants see only their own
/// rows; owners and admins see the full queue.
pub fn visible_requests<'a>(
    actor: &Actor,
    rows: &'a [MaintenanceRequest],
) -> Vec<&'a MaintenanceRequest> {
    let mut selected: Vec<&MaintenanceRequest> = rows
        .iter()
        .filter(|row| match actor.role() {
            Some(Role::Owner) | Some(Role::Admin) => true,
            Some(Role::Tenant) => actor
                .account()
                .is_some_and(|account| account.id == row.requester_id),
            None => false,
        })
        .collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected
}

/// Payments are payer-private for tenants. Owners see the global ledger:
/// reporting is deliberately not org-scoped, matching the observed design.
pub fn visible_payments<'a>(actor: &Actor, rows: &'a [Payment]) -> Vec<&'a Payment> {
    let mut selected: Vec<&Payment> = rows
        .iter()
        .filter(|row| match actor.role() {
            Some(Role::Owner) | Some(Role::Admin) => true,
            Some(Role::Tenant) => actor
                .account()
                .is_some_and(|account| account.id == row.payer_id),
            None => false,
        })
        .collect();
    selected.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, ActorAccount};
    use chrono::TimeZone;

    struct Bulletin {
        audience: TargetAudience,
        posted_at: DateTime<Utc>,
    }

    impl Broadcast for Bulletin {
        fn audience(&self) -> TargetAudience {
            self.audience
        }

        fn posted_at(&self) -> DateTime<Utc> {
            self.posted_at
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    fn actor(role: Role, id: u64) -> Actor {
        Actor::Account(ActorAccount {
            id: AccountId(id),
            username: format!("account-{id}"),
            role,
            tenant_org_id: None,
            unit_id: None,
        })
    }

    fn bulletins() -> Vec<Bulletin> {
        vec![
            Bulletin {
                audience: TargetAudience::Owner,
                posted_at: at(9),
            },
            Bulletin {
                audience: TargetAudience::Tenant,
                posted_at: at(11),
            },
            Bulletin {
                audience: TargetAudience::Everyone,
                posted_at: at(10),
            },
        ]
    }

    #[test]
    fn tenants_never_see_owner_only_rows() {
        let rows = bulletins();
        let visible = visible_rows(&actor(Role::Tenant, 1), &rows);
        assert_eq!(visible.len(), 2);
        assert!(visible
            .iter()
            .all(|row| row.audience() != TargetAudience::Owner));
    }

    #[test]
    fn owners_and_admins_see_everything_newest_first() {
        let rows = bulletins();
        for role in [Role::Owner, Role::Admin] {
            let visible = visible_rows(&actor(role, 2), &rows);
            assert_eq!(visible.len(), 3);
            assert_eq!(visible[0].posted_at(), at(11));
            assert_eq!(visible[2].posted_at(), at(9));
        }
    }

    #[test]
    fn anonymous_sees_nothing() {
        let rows = bulletins();
        assert!(visible_rows(&Actor::Anonymous, &rows).is_empty());
    }

    #[test]
    fn repeated_calls_recompute_the_same_answer() {
        let rows = bulletins();
        let tenant = actor(Role::Tenant, 3);
        let first: Vec<_> = visible_rows(&tenant, &rows)
            .iter()
            .map(|row| row.posted_at())
            .collect();
        let second: Vec<_> = visible_rows(&tenant, &rows)
            .iter()
            .map(|row| row.posted_at())
            .collect();
        assert_eq!(first, second);
    }
}
