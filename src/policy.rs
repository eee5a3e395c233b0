use uuid::Uuid;

use crate::error::ApiError;

/// Actor
///
/// The identity context a request carries into an authorization decision.
/// `Anonymous` is a first-class actor here: several read paths and the
/// memory-submission path are deliberately open to unauthenticated visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User { id: Uuid, is_admin: bool },
}

/// Action
///
/// Every policy-relevant operation in the API, named by what it does to the
/// resource. Photo mutations (upload, set-main, delete) all fall under
/// `EditMemorial` since they share the owner-or-admin rule with field updates
/// and record deletion. Video upload is its own action because its rule is
/// strictly narrower: the owner only, with no admin override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Browse the approved+unhidden public listing.
    ReadPublicListing,
    /// Fetch a single memorial by id (unfiltered detail view).
    ReadMemorial,
    /// Append a visitor memory to a memorial.
    SubmitMemory,
    /// Create a new memorial (the actor becomes its owner).
    CreateMemorial,
    /// List the memorials created by some user, visibility-unfiltered.
    ListOwned,
    /// Update fields, delete the record, or mutate its photos.
    EditMemorial,
    /// Attach a video. Owner only.
    AddVideo,
    /// Approve, toggle hidden, or use the admin memorial surface.
    Moderate,
    /// List, create, or delete user accounts.
    ManageUsers,
}

/// Deny
///
/// The two failure signals an authorization decision can carry. Callers map
/// them to distinct response codes: missing/invalid credential is 401,
/// a valid credential with insufficient privilege is 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deny {
    Unauthenticated,
    Forbidden,
}

impl From<Deny> for ApiError {
    fn from(deny: Deny) -> Self {
        match deny {
            Deny::Unauthenticated => ApiError::Unauthenticated("No token, authorization denied"),
            Deny::Forbidden => ApiError::Forbidden,
        }
    }
}

/// authorize
///
/// The single decision point for who may do what. `owner` carries the
/// `created_by` of the targeted memorial for ownership-scoped actions and is
/// ignored (pass `None`) for actions that have no owning resource.
///
/// Rules, in precedence order:
/// 1. Anonymous actors may read the public listing, read any memorial by id,
///    and submit a memory. Everything else is `Unauthenticated`.
/// 2. Any authenticated user may create a memorial and query owner listings,
///    and may edit a memorial they own.
/// 3. Admins may edit any memorial, moderate, and manage users, but video
///    upload stays owner-only even for admins.
/// 4. Everything else is `Forbidden`.
pub fn authorize(actor: &Actor, action: Action, owner: Option<Uuid>) -> Result<(), Deny> {
    match action {
        // Open to everyone, identity or not.
        Action::ReadPublicListing | Action::ReadMemorial | Action::SubmitMemory => Ok(()),

        _ => match *actor {
            Actor::Anonymous => Err(Deny::Unauthenticated),

            Actor::User { id, is_admin } => match action {
                Action::CreateMemorial | Action::ListOwned => Ok(()),

                Action::EditMemorial => {
                    if is_admin || owner == Some(id) {
                        Ok(())
                    } else {
                        Err(Deny::Forbidden)
                    }
                }

                // Deliberately narrower than EditMemorial: no admin override.
                Action::AddVideo => {
                    if owner == Some(id) {
                        Ok(())
                    } else {
                        Err(Deny::Forbidden)
                    }
                }

                Action::Moderate | Action::ManageUsers => {
                    if is_admin {
                        Ok(())
                    } else {
                        Err(Deny::Forbidden)
                    }
                }

                // Already handled by the outer match.
                Action::ReadPublicListing | Action::ReadMemorial | Action::SubmitMemory => Ok(()),
            },
        },
    }
}
