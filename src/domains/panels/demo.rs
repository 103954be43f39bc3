//! Demo data served by the bundled panels.

use serde_json::json;

use super::runtime::UserDirectory;
use crate::core::context::User;
use crate::core::query::{MemoryStore, Record};

const USER_MODEL: &str = "app::models::User";
const POST_MODEL: &str = "app::models::Post";
const CATEGORY_MODEL: &str = "app::models::Category";

/// Users that may sign in: `1` is an admin, `2` an editor.
pub fn demo_users() -> UserDirectory {
    UserDirectory::new()
        .with_user(User::new("1", "Ada Lovelace").with_role("admin"))
        .with_user(User::new("2", "Grace Hopper").with_role("editor"))
}

/// A store seeded with users, blog posts and translated categories.
pub fn demo_store(driver: &str) -> MemoryStore {
    let store = MemoryStore::new(driver).with_translatable(CATEGORY_MODEL, ["name"]);

    let ada = Record::new(USER_MODEL, 1)
        .with_attribute("name", "Ada Lovelace")
        .with_attribute("email", "ada@example.com");
    let grace = Record::new(USER_MODEL, 2)
        .with_attribute("name", "Grace Hopper")
        .with_attribute("email", "grace@example.com");

    let posts = [
        (1, "Announcing 1.0", "published", &ada),
        (2, "Writing policies", "draft", &grace),
        (3, "Search tips", "draft", &ada),
    ];
    for (key, title, status, author) in posts {
        store.insert(
            Record::new(POST_MODEL, key)
                .with_attribute("title", title)
                .with_attribute("status", status)
                .with_attribute("author_id", author.key.clone())
                .with_relation("author", vec![author.clone()]),
        );
    }

    store.insert(
        Record::new(CATEGORY_MODEL, 1).with_attribute("name", json!({"en": "Releases", "fr": "Versions"})),
    );
    store.insert(Record::new(CATEGORY_MODEL, 2).with_attribute("name", json!({"en": "Guides"})));

    store.insert(ada);
    store.insert(grace);
    store
}
