//! Authorization policy: pure decisions over (actor, action, scope).
//!
//! Rules are evaluated in a fixed precedence order:
//!
//! 1. anonymous actors are denied everything except the public entry points
//!    (login and the two registration flows);
//! 2. each action carries a static role set, and a role outside it is denied;
//! 3. org-scoped actions additionally require the actor to administer the
//!    target organization (admins are exempt);
//! 4. everything else is allowed.
//!
//! Every denial is logged with the actor identity (or "anonymous") and the
//! attempted action. That audit line is part of the contract, not decoration.

use crate::domain::{Actor, ActorAccount, Role, TenantOrgId};

/// Operations subject to the policy. One variant per gated intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LogIn,
    RegisterAccount,
    RegisterTenantOrg,
    ViewOwnerDashboard,
    ViewTenantDashboard,
    MakePayment,
    ViewPayments,
    ViewReports,
    ExportReports,
    ViewNotifications,
    CreateNotification,
    ViewMaintenance,
    CreateMaintenanceRequest,
    UpdateMaintenanceStatus,
    ViewDocuments,
    UploadDocument,
    DownloadDocument,
    AddProperty,
    AddUnit,
    ManageTenantOrg,
}

impl Action {
    /// Actions reachable without an authenticated actor.
    pub const fn public(self) -> bool {
        matches!(
            self,
            Action::LogIn | Action::RegisterAccount | Action::RegisterTenantOrg
        )
    }

    /// Static role restriction; `None` means any authenticated role.
    pub const fn allowed_roles(self) -> Option<&'static [Role]> {
        match self {
            Action::ViewOwnerDashboard
            | Action::ViewReports
            | Action::ExportReports
            | Action::CreateNotification => Some(&[Role::Owner]),
            Action::UpdateMaintenanceStatus => Some(&[Role::Owner, Role::Admin]),
            Action::ViewTenantDashboard
            | Action::MakePayment
            | Action::CreateMaintenanceRequest => Some(&[Role::Tenant]),
            Action::AddProperty | Action::AddUnit => Some(&[Role::Tenant, Role::Admin]),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Action::LogIn => "log_in",
            Action::RegisterAccount => "register_account",
            Action::RegisterTenantOrg => "register_tenant_org",
            Action::ViewOwnerDashboard => "view_owner_dashboard",
            Action::ViewTenantDashboard => "view_tenant_dashboard",
            Action::MakePayment => "make_payment",
            Action::ViewPayments => "view_payments",
            Action::ViewReports => "view_reports",
            Action::ExportReports => "export_reports",
            Action::ViewNotifications => "view_notifications",
            Action::CreateNotification => "create_notification",
            Action::ViewMaintenance => "view_maintenance",
            Action::CreateMaintenanceRequest => "create_maintenance_request",
            Action::UpdateMaintenanceStatus => "update_maintenance_status",
            Action::ViewDocuments => "view_documents",
            Action::UploadDocument => "upload_document",
            Action::DownloadDocument => "download_document",
            Action::AddProperty => "add_property",
            Action::AddUnit => "add_unit",
            Action::ManageTenantOrg => "manage_tenant_org",
        }
    }
}

/// Resource a scoped action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceScope {
    TenantOrg(TenantOrgId),
}

/// Why an access attempt was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DenyReason {
    #[error("authentication required")]
    Unauthenticated,
    #[error("role not permitted")]
    RoleNotPermitted,
    #[error("not the resource owner")]
    NotResourceOwner,
}

/// Denial carrying the attempted action for audit and transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("access denied: {reason}")]
pub struct AccessDenied {
    pub action: Action,
    pub reason: DenyReason,
}

/// Decide whether `actor` may perform `action`, optionally against `scope`.
pub fn authorize(
    actor: &Actor,
    action: Action,
    scope: Option<ResourceScope>,
) -> Result<(), AccessDenied> {
    let account = match actor {
        Actor::Account(account) => account,
        Actor::Anonymous => {
            if action.public() {
                return Ok(());
            }
            return Err(deny(actor, action, scope, DenyReason::Unauthenticated));
        }
    };

    if let Some(roles) = action.allowed_roles() {
        if !roles.contains(&account.role) {
            return Err(deny(actor, action, scope, DenyReason::RoleNotPermitted));
        }
    }

    if let Some(ResourceScope::TenantOrg(org_id)) = scope {
        if !administers_org(account, org_id) {
            return Err(deny(actor, action, scope, DenyReason::NotResourceOwner));
        }
    }

    Ok(())
}

/// Authorize and hand back the account context, which is guaranteed to exist
/// for any non-public action that passed the policy.
pub fn authorized_account<'a>(
    actor: &'a Actor,
    action: Action,
    scope: Option<ResourceScope>,
) -> Result<&'a ActorAccount, AccessDenied> {
    authorize(actor, action, scope)?;
    match actor {
        Actor::Account(account) => Ok(account),
        Actor::Anonymous => Err(deny(actor, action, scope, DenyReason::Unauthenticated)),
    }
}

fn administers_org(account: &ActorAccount, org_id: TenantOrgId) -> bool {
    account.role == Role::Admin || account.tenant_org_id == Some(org_id)
}

fn deny(
    actor: &Actor,
    action: Action,
    scope: Option<ResourceScope>,
    reason: DenyReason,
) -> AccessDenied {
    match scope {
        Some(ResourceScope::TenantOrg(org_id)) => tracing::warn!(
            actor = actor.identity_label(),
            action = action.label(),
            org = %org_id,
            %reason,
            "access denied"
        ),
        None => tracing::warn!(
            actor = actor.identity_label(),
            action = action.label(),
            %reason,
            "access denied"
        ),
    }
    AccessDenied { action, reason }
}
