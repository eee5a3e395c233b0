use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use memorial_api::models::{Memorial, UpdateMemorialRequest, User};
use memorial_api::qr;
use uuid::Uuid;

fn blank_memorial() -> Memorial {
    Memorial {
        id: Uuid::new_v4(),
        name: "Ada Lovelace".to_string(),
        biography: "Pioneer of computing".to_string(),
        birth_date: Utc::now(),
        death_date: Utc::now(),
        created_by: Uuid::new_v4(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        is_public: true,
        ..Default::default()
    }
}

fn main_count(m: &Memorial) -> usize {
    m.photos.iter().filter(|p| p.is_main).count()
}

// --- Main-photo invariant ---

#[test]
fn first_photo_becomes_main_automatically() {
    let mut m = blank_memorial();
    m.add_photo("/uploads/memorials/1-a.jpg".to_string());
    assert!(m.photos[0].is_main);

    m.add_photo("/uploads/memorials/2-b.jpg".to_string());
    assert!(m.photos[0].is_main);
    assert!(!m.photos[1].is_main);
    assert_eq!(main_count(&m), 1);
}

#[test]
fn deleting_the_main_photo_promotes_the_first_remaining() {
    // The canonical lifecycle: add img1, add img2, delete img1.
    let mut m = blank_memorial();
    m.add_photo("/uploads/memorials/1-a.jpg".to_string());
    m.add_photo("/uploads/memorials/2-b.jpg".to_string());
    let img1 = m.photos[0].id;
    let img2 = m.photos[1].id;

    let removed = m.remove_photo(img1).expect("img1 exists");
    assert!(removed.is_main);
    assert_eq!(m.photos.len(), 1);
    assert_eq!(m.photos[0].id, img2);
    assert!(m.photos[0].is_main, "img2 must be promoted to main");
    assert_eq!(main_count(&m), 1);
}

#[test]
fn deleting_a_non_main_photo_leaves_the_main_flag_alone() {
    let mut m = blank_memorial();
    m.add_photo("/uploads/memorials/1-a.jpg".to_string());
    m.add_photo("/uploads/memorials/2-b.jpg".to_string());
    let img1 = m.photos[0].id;
    let img2 = m.photos[1].id;

    m.remove_photo(img2).expect("img2 exists");
    assert_eq!(m.photos[0].id, img1);
    assert!(m.photos[0].is_main);
    assert_eq!(main_count(&m), 1);
}

#[test]
fn deleting_the_last_photo_leaves_an_empty_collection() {
    let mut m = blank_memorial();
    m.add_photo("/uploads/memorials/1-a.jpg".to_string());
    let only = m.photos[0].id;
    m.remove_photo(only).expect("photo exists");
    assert!(m.photos.is_empty());
    assert_eq!(main_count(&m), 0);
}

#[test]
fn set_main_photo_unsets_every_other_flag() {
    let mut m = blank_memorial();
    m.add_photo("/uploads/memorials/1-a.jpg".to_string());
    m.add_photo("/uploads/memorials/2-b.jpg".to_string());
    m.add_photo("/uploads/memorials/3-c.jpg".to_string());
    let third = m.photos[2].id;

    assert!(m.set_main_photo(third));
    assert!(!m.photos[0].is_main);
    assert!(!m.photos[1].is_main);
    assert!(m.photos[2].is_main);
    assert_eq!(main_count(&m), 1);
}

#[test]
fn set_main_photo_with_unknown_id_is_rejected_and_changes_nothing() {
    let mut m = blank_memorial();
    m.add_photo("/uploads/memorials/1-a.jpg".to_string());
    let before = m.photos.clone();

    assert!(!m.set_main_photo(Uuid::new_v4()));
    assert_eq!(m.photos, before);
}

#[test]
fn remove_photo_with_unknown_id_returns_none() {
    let mut m = blank_memorial();
    m.add_photo("/uploads/memorials/1-a.jpg".to_string());
    assert!(m.remove_photo(Uuid::new_v4()).is_none());
    assert_eq!(m.photos.len(), 1);
}

// --- Video & memory ordering ---

#[test]
fn videos_and_memories_are_newest_first() {
    let mut m = blank_memorial();
    m.add_video("/uploads/memorials/old.mp4".to_string(), None);
    m.add_video(
        "/uploads/memorials/new.mp4".to_string(),
        Some("graduation".to_string()),
    );
    assert_eq!(m.videos[0].url, "/uploads/memorials/new.mp4");
    assert_eq!(m.videos[0].caption.as_deref(), Some("graduation"));
    assert_eq!(m.videos[1].url, "/uploads/memorials/old.mp4");

    m.add_memory("first".to_string(), "A neighbor".to_string());
    m.add_memory("second".to_string(), "An old friend".to_string());
    assert_eq!(m.memories[0].content, "second");
    assert_eq!(m.memories[1].content, "first");
}

// --- Listing eligibility ---

#[test]
fn public_listing_requires_approved_and_not_hidden() {
    let mut m = blank_memorial();
    assert!(!m.is_publicly_listed(), "unapproved by default");

    m.is_approved = true;
    assert!(m.is_publicly_listed());

    m.is_hidden = true;
    assert!(!m.is_publicly_listed(), "hidden trumps approved");
}

// --- Wire shape ---

#[test]
fn memorial_serializes_with_camel_case_keys() {
    let m = blank_memorial();
    let json = serde_json::to_string(&m).unwrap();
    for key in [
        "\"birthDate\"",
        "\"deathDate\"",
        "\"createdBy\"",
        "\"isApproved\"",
        "\"isHidden\"",
        "\"isPublic\"",
        "\"qrCode\"",
        "\"createdAt\"",
        "\"updatedAt\"",
    ] {
        assert!(json.contains(key), "missing {key} in {json}");
    }
}

#[test]
fn photo_serializes_is_main_and_uploaded_at() {
    let mut m = blank_memorial();
    m.add_photo("/uploads/memorials/1-a.jpg".to_string());
    let json = serde_json::to_string(&m.photos[0]).unwrap();
    assert!(json.contains("\"isMain\":true"));
    assert!(json.contains("\"uploadedAt\""));
}

#[test]
fn user_serialization_never_leaks_the_password_hash() {
    let user = User {
        id: Uuid::new_v4(),
        name: "Grace".to_string(),
        email: "grace@example.com".to_string(),
        password_hash: "$2b$12$secret-hash".to_string(),
        is_admin: false,
        created_at: Utc::now(),
    };
    let json = serde_json::to_string(&user).unwrap();
    assert!(!json.contains("secret-hash"));
    assert!(!json.contains("passwordHash"));
    assert!(json.contains("\"isAdmin\":false"));
}

#[test]
fn update_request_omits_absent_fields() {
    let partial = UpdateMemorialRequest {
        name: Some("New Name".to_string()),
        ..Default::default()
    };
    let json = serde_json::to_string(&partial).unwrap();
    assert!(json.contains("\"name\":\"New Name\""));
    assert!(!json.contains("biography"));
    assert!(!json.contains("birthDate"));
}

// --- QR payload ---

#[test]
fn qr_payload_is_an_svg_data_uri_encoding_the_deep_link() {
    let id = Uuid::new_v4();
    let uri = qr::memorial_qr_data_uri("http://localhost:3000/", id).unwrap();

    let encoded = uri
        .strip_prefix("data:image/svg+xml;base64,")
        .expect("data URI prefix");
    let svg = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
    assert!(svg.contains("<svg"));
}
