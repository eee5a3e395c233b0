use memorial_api::policy::{Action, Actor, Deny, authorize};
use uuid::Uuid;

fn owner() -> Actor {
    Actor::User {
        id: Uuid::from_u128(1),
        is_admin: false,
    }
}

fn stranger() -> Actor {
    Actor::User {
        id: Uuid::from_u128(2),
        is_admin: false,
    }
}

fn admin() -> Actor {
    Actor::User {
        id: Uuid::from_u128(3),
        is_admin: true,
    }
}

fn owned() -> Option<Uuid> {
    Some(Uuid::from_u128(1))
}

// --- Anonymous actors ---

#[test]
fn anonymous_may_read_and_submit_memories() {
    let anon = Actor::Anonymous;
    assert!(authorize(&anon, Action::ReadPublicListing, None).is_ok());
    assert!(authorize(&anon, Action::ReadMemorial, owned()).is_ok());
    assert!(authorize(&anon, Action::SubmitMemory, owned()).is_ok());
}

#[test]
fn anonymous_mutations_are_unauthenticated_not_forbidden() {
    let anon = Actor::Anonymous;
    for action in [
        Action::CreateMemorial,
        Action::EditMemorial,
        Action::AddVideo,
        Action::ListOwned,
        Action::Moderate,
        Action::ManageUsers,
    ] {
        assert_eq!(
            authorize(&anon, action, owned()),
            Err(Deny::Unauthenticated),
            "anonymous {action:?} must be 401, never 403"
        );
    }
}

// --- Authenticated non-owners ---

#[test]
fn any_authenticated_user_may_create_and_list_owned() {
    assert!(authorize(&stranger(), Action::CreateMemorial, None).is_ok());
    assert!(authorize(&stranger(), Action::ListOwned, None).is_ok());
}

#[test]
fn non_owner_mutations_are_forbidden() {
    assert_eq!(
        authorize(&stranger(), Action::EditMemorial, owned()),
        Err(Deny::Forbidden)
    );
    assert_eq!(
        authorize(&stranger(), Action::AddVideo, owned()),
        Err(Deny::Forbidden)
    );
}

#[test]
fn non_admin_cannot_moderate_or_manage_users() {
    assert_eq!(
        authorize(&stranger(), Action::Moderate, None),
        Err(Deny::Forbidden)
    );
    assert_eq!(
        authorize(&owner(), Action::ManageUsers, None),
        Err(Deny::Forbidden)
    );
}

// --- Owners ---

#[test]
fn owner_may_edit_and_add_videos() {
    assert!(authorize(&owner(), Action::EditMemorial, owned()).is_ok());
    assert!(authorize(&owner(), Action::AddVideo, owned()).is_ok());
}

// --- Admins ---

#[test]
fn admin_may_edit_any_memorial() {
    assert!(authorize(&admin(), Action::EditMemorial, owned()).is_ok());
    assert!(authorize(&admin(), Action::Moderate, None).is_ok());
    assert!(authorize(&admin(), Action::ManageUsers, None).is_ok());
}

#[test]
fn video_upload_has_no_admin_override() {
    // The one rule narrower than edit: an admin who is not the creator is
    // still refused.
    assert_eq!(
        authorize(&admin(), Action::AddVideo, owned()),
        Err(Deny::Forbidden)
    );

    // An admin who IS the creator passes like any owner.
    let admin_owner = Actor::User {
        id: Uuid::from_u128(1),
        is_admin: true,
    };
    assert!(authorize(&admin_owner, Action::AddVideo, owned()).is_ok());
}
